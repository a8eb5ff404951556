//! Region-scoped cache of the backend's POI inventory.

use crate::gateway::{GatewayResult, PoiLookupRequest};
use crate::models::{Poi, PoiId};

use super::state::RequestToken;

/// Handle for one in-flight POI listing refresh.
#[derive(Debug)]
pub struct PoiRefreshTicket {
    pub(crate) token: RequestToken,
    pub(crate) request: PoiLookupRequest,
}

impl PoiRefreshTicket {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn request(&self) -> &PoiLookupRequest {
        &self.request
    }
}

/// The POIs of the current region, keyed by its own refresh token.
///
/// This listing is the universe removal toggles validate against. It
/// follows the region: any region change invalidates it, and a refresh
/// that fails just leaves it empty. An empty listing only disables the
/// removal interaction, so failures here degrade silently instead of
/// surfacing an error.
#[derive(Debug, Default)]
pub struct PoiListing {
    pois: Vec<Poi>,
    latest_token: u64,
}

impl PoiListing {
    pub fn new() -> Self {
        PoiListing::default()
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn contains(&self, id: PoiId) -> bool {
        self.pois.iter().any(|poi| poi.id == id)
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Drop the cached set and invalidate any refresh still in flight.
    pub(crate) fn invalidate(&mut self) {
        self.latest_token += 1;
        self.pois.clear();
    }

    /// Start a refresh for the given request.
    pub(crate) fn begin_refresh(&mut self, request: PoiLookupRequest) -> PoiRefreshTicket {
        self.invalidate();
        PoiRefreshTicket {
            token: RequestToken(self.latest_token),
            request,
        }
    }

    /// Apply a finished refresh. Returns whether the outcome was current.
    pub(crate) fn apply_refresh(
        &mut self,
        ticket: PoiRefreshTicket,
        result: GatewayResult<Vec<Poi>>,
    ) -> bool {
        if ticket.token.0 != self.latest_token {
            tracing::debug!(token = %ticket.token, "discarding stale POI listing response");
            return false;
        }
        match result {
            Ok(pois) => {
                tracing::debug!(count = pois.len(), "POI listing refreshed");
                self.pois = pois;
            }
            Err(error) => {
                tracing::warn!(error = %error, "POI listing refresh failed, removal disabled");
                self.pois.clear();
            }
        }
        true
    }
}
