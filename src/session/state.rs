//! Computation lifecycle state and request tickets.

use crate::gateway::ComputationRequest;
use crate::models::{DistrictStats, FeatureCollection, GridStats};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Monotonically increasing identifier of one computation trigger.
///
/// Responses carry the token of the trigger that produced them; a response
/// whose token is no longer the latest is stale and gets discarded, so a
/// slow early request can never overwrite the result of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub(crate) u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the computation flow.
///
/// One discriminated state instead of independent loading/error flags:
/// a stale error sitting next to a loading spinner is unrepresentable.
#[derive(Debug)]
pub enum ComputationState {
    /// No computation has run yet.
    Idle,
    /// A request is in flight.
    Loading {
        token: RequestToken,
        started_at: DateTime<Utc>,
    },
    /// The latest computation succeeded. Exactly one statistics slot is
    /// populated, matching the analysis level active when the response
    /// was applied.
    Success {
        geodata: FeatureCollection,
        grid: Option<GridStats>,
        districts: Option<BTreeMap<String, DistrictStats>>,
        completed_at: DateTime<Utc>,
    },
    /// The latest computation failed; inputs are untouched and a retry
    /// may succeed.
    Failed { message: String },
}

impl ComputationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ComputationState::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ComputationState::Success { .. })
    }

    /// The surfaced error message, when the last computation failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ComputationState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn geodata(&self) -> Option<&FeatureCollection> {
        match self {
            ComputationState::Success { geodata, .. } => Some(geodata),
            _ => None,
        }
    }

    pub fn grid_stats(&self) -> Option<&GridStats> {
        match self {
            ComputationState::Success { grid, .. } => grid.as_ref(),
            _ => None,
        }
    }

    pub fn district_stats(&self) -> Option<&BTreeMap<String, DistrictStats>> {
        match self {
            ComputationState::Success { districts, .. } => districts.as_ref(),
            _ => None,
        }
    }
}

/// Handle for one triggered computation.
///
/// Created by `begin_computation`, consumed by `apply_computation`. The
/// embedded request is the immutable snapshot of every input at trigger
/// time; statistics derivation reads this snapshot, never the live
/// session inputs, which may have moved on while the call was in flight.
#[derive(Debug)]
pub struct ComputationTicket {
    pub(crate) token: RequestToken,
    pub(crate) request: ComputationRequest,
}

impl ComputationTicket {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// The request body to send to the gateway.
    pub fn request(&self) -> &ComputationRequest {
        &self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ordering() {
        assert!(RequestToken(1) < RequestToken(2));
        assert_eq!(RequestToken(3).to_string(), "#3");
    }

    #[test]
    fn test_state_accessors() {
        let idle = ComputationState::Idle;
        assert!(!idle.is_loading());
        assert!(!idle.is_success());
        assert!(idle.error_message().is_none());
        assert!(idle.geodata().is_none());

        let failed = ComputationState::Failed {
            message: "API /computation 500: boom".to_string(),
        };
        assert_eq!(failed.error_message(), Some("API /computation 500: boom"));
        assert!(failed.grid_stats().is_none());
        assert!(failed.district_stats().is_none());
    }
}
