//! Session layer: owns all mutable state of the analysis screens.
//!
//! [`CityScopeSession`] drives the scenario screen: region and category
//! selection, what-if edits, the computation lifecycle and the POI
//! listing. [`ReachSession`] drives the single-origin screen. Each
//! session is owned by exactly one controller; every method takes
//! `&mut self` and suspends only across gateway calls, so there is no
//! locking, only sequencing.
//!
//! Network flows are split-phase: a `begin_*` call snapshots the inputs
//! into a ticket and flips the state, the caller awaits the gateway, and
//! an `apply_*` call folds the outcome back in. Tickets carry monotone
//! tokens; an outcome whose token is no longer the latest is discarded,
//! so overlapping triggers resolve to the last one triggered, not the
//! last one to answer.

pub mod poi_listing;
pub mod reach;
pub mod state;


pub use poi_listing::{PoiListing, PoiRefreshTicket};
pub use reach::ReachSession;
pub use state::{ComputationState, ComputationTicket, RequestToken};

use chrono::Utc;
use std::collections::BTreeMap;

use crate::gateway::{
    CityGateway, ComputationRequest, GatewayResult, PoiLookupRequest, UserPoiPayload,
};
use crate::models::{
    AnalysisLevel, Category, CategorySet, DistrictStats, FeatureCollection, GridStats, Poi, PoiId,
    Region, ScenarioMode, ScenarioState, TransportMode, UserPoi,
};
use crate::services;

/// Default time threshold in minutes.
pub const DEFAULT_THRESHOLD_MINUTES: u32 = 15;

/// The user's region choice.
///
/// `Unset` and `Invalid` both leave the session without a region, but
/// they differ downstream: with no rectangle drawn yet a computation may
/// run against the backend's default region, while an invalid rectangle
/// disables computation until a new one is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RegionSelection {
    Unset,
    Valid(Region),
    Invalid,
}

impl RegionSelection {
    fn region(&self) -> Option<Region> {
        match self {
            RegionSelection::Valid(region) => Some(*region),
            _ => None,
        }
    }

    fn is_invalid(&self) -> bool {
        matches!(self, RegionSelection::Invalid)
    }
}

/// Orchestrator of the scenario analysis screen.
pub struct CityScopeSession {
    region: RegionSelection,
    categories: CategorySet,
    threshold_minutes: u32,
    transport_mode: TransportMode,
    analysis_level: AnalysisLevel,
    scenario: ScenarioState,
    poi_listing: PoiListing,
    state: ComputationState,
    latest_token: u64,
    districts_cache: Option<FeatureCollection>,
}

impl Default for CityScopeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CityScopeSession {
    pub fn new() -> Self {
        CityScopeSession {
            region: RegionSelection::Unset,
            categories: CategorySet::all(),
            threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
            transport_mode: TransportMode::Walk,
            analysis_level: AnalysisLevel::Grid,
            scenario: ScenarioState::new(),
            poi_listing: PoiListing::new(),
            state: ComputationState::Idle,
            latest_token: 0,
            districts_cache: None,
        }
    }

    // ===== Input accessors =====

    pub fn region(&self) -> Option<Region> {
        self.region.region()
    }

    /// Whether the last drawn rectangle failed validation.
    pub fn has_invalid_region(&self) -> bool {
        self.region.is_invalid()
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn threshold_minutes(&self) -> u32 {
        self.threshold_minutes
    }

    pub fn transport_mode(&self) -> TransportMode {
        self.transport_mode
    }

    pub fn analysis_level(&self) -> AnalysisLevel {
        self.analysis_level
    }

    pub fn scenario(&self) -> &ScenarioState {
        &self.scenario
    }

    pub fn poi_listing(&self) -> &PoiListing {
        &self.poi_listing
    }

    // ===== Computation lifecycle =====

    pub fn state(&self) -> &ComputationState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }

    pub fn geodata(&self) -> Option<&FeatureCollection> {
        self.state.geodata()
    }

    pub fn grid_stats(&self) -> Option<&GridStats> {
        self.state.grid_stats()
    }

    pub fn district_stats(&self) -> Option<&BTreeMap<String, DistrictStats>> {
        self.state.district_stats()
    }

    /// Start a computation, snapshotting every input into the ticket.
    ///
    /// Returns `None` as a silent guard when no categories are selected
    /// or the drawn rectangle was invalid. Starting while an earlier
    /// request is still in flight supersedes it: the old ticket's token
    /// stops being the latest and its outcome will be discarded.
    pub fn begin_computation(
        &mut self,
        mode: TransportMode,
        minutes: u32,
    ) -> Option<ComputationTicket> {
        if self.categories.is_empty() {
            tracing::debug!("computation skipped: no categories selected");
            return None;
        }
        if self.region.is_invalid() {
            tracing::debug!("computation skipped: invalid region");
            return None;
        }

        self.transport_mode = mode;
        self.threshold_minutes = minutes;
        self.latest_token += 1;
        let token = RequestToken(self.latest_token);

        let request = ComputationRequest {
            mode,
            categories: self.categories.clone(),
            bbox: self.region.region(),
            current_minutes: minutes,
            removed_poi_ids: self.scenario.sorted_removed_ids(),
            user_pois: self
                .scenario
                .user_pois()
                .iter()
                .map(UserPoiPayload::from)
                .collect(),
        };

        self.state = ComputationState::Loading {
            token,
            started_at: Utc::now(),
        };
        tracing::info!(%token, mode = %mode, minutes, "computation started");
        Some(ComputationTicket { token, request })
    }

    /// Fold a finished computation back into the session.
    ///
    /// Stale outcomes (ticket token no longer the latest) are discarded
    /// untouched and the method returns `false`. On success the geodata
    /// is stored first, then the active level's statistics are derived
    /// from the ticket's snapshot of categories and threshold. On failure
    /// geodata and both statistics are gone and only the message remains;
    /// the inputs stay as they were, so a retry is one trigger away.
    pub fn apply_computation(
        &mut self,
        ticket: ComputationTicket,
        result: GatewayResult<FeatureCollection>,
    ) -> bool {
        if ticket.token.0 != self.latest_token {
            tracing::debug!(token = %ticket.token, "discarding stale computation response");
            return false;
        }

        match result {
            Ok(geodata) => {
                let (grid, districts) = self.derive_for_level(&geodata, &ticket.request);
                tracing::info!(
                    token = %ticket.token,
                    features = geodata.len(),
                    "computation succeeded"
                );
                self.state = ComputationState::Success {
                    geodata,
                    grid,
                    districts,
                    completed_at: Utc::now(),
                };
            }
            Err(error) => {
                let message = error.to_string();
                tracing::warn!(token = %ticket.token, error = %message, "computation failed");
                self.state = ComputationState::Failed { message };
            }
        }
        true
    }

    /// Convenience driver: begin, await the gateway, apply.
    pub async fn run_computation(
        &mut self,
        gateway: &dyn CityGateway,
        mode: TransportMode,
        minutes: u32,
    ) -> bool {
        let Some(ticket) = self.begin_computation(mode, minutes) else {
            return false;
        };
        let result = gateway.compute(ticket.request()).await;
        self.apply_computation(ticket, result)
    }

    fn derive_for_level(
        &self,
        geodata: &FeatureCollection,
        request: &ComputationRequest,
    ) -> (Option<GridStats>, Option<BTreeMap<String, DistrictStats>>) {
        match self.analysis_level {
            AnalysisLevel::Grid => (
                services::grid_statistics(
                    geodata,
                    &request.categories,
                    request.current_minutes as f64,
                ),
                None,
            ),
            AnalysisLevel::District => (
                None,
                Some(services::district_statistics(geodata, &request.categories)),
            ),
        }
    }

    /// Re-run the engine against stored geodata after a selection change.
    /// Touches no network and never flips the loading state.
    fn rederive_statistics(&mut self) {
        let ComputationState::Success {
            geodata,
            grid,
            districts,
            ..
        } = &mut self.state
        else {
            return;
        };

        match self.analysis_level {
            AnalysisLevel::Grid => {
                *grid =
                    services::grid_statistics(geodata, &self.categories, self.threshold_minutes as f64);
                *districts = None;
            }
            AnalysisLevel::District => {
                *districts = Some(services::district_statistics(geodata, &self.categories));
                *grid = None;
            }
        }
    }

    // ===== Selection changes (pure re-derivation) =====

    pub fn set_categories(&mut self, categories: CategorySet) {
        self.categories = categories;
        self.rederive_statistics();
    }

    pub fn set_threshold(&mut self, minutes: u32) {
        self.threshold_minutes = minutes;
        self.rederive_statistics();
    }

    pub fn set_analysis_level(&mut self, level: AnalysisLevel) {
        if self.analysis_level != level {
            self.analysis_level = level;
            self.rederive_statistics();
        }
    }

    pub fn set_transport_mode(&mut self, mode: TransportMode) {
        self.transport_mode = mode;
    }

    // ===== Region and POI listing =====

    /// Replace the region with a validated one and start a POI refresh.
    ///
    /// Any region change drops the removed-POI ids; they named POIs of
    /// the old region. Added POIs survive.
    pub fn set_region(&mut self, region: Region) -> PoiRefreshTicket {
        self.region = RegionSelection::Valid(region);
        self.scenario.on_region_change();
        self.poi_listing.begin_refresh(PoiLookupRequest {
            bbox: region,
            categories: self.categories.clone(),
        })
    }

    /// Accept a rectangle in map-drawn order.
    ///
    /// An invalid rectangle clears the region, the removed ids and the
    /// listing, and returns `None` without touching the network.
    pub fn set_drawn_region(
        &mut self,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    ) -> Option<PoiRefreshTicket> {
        match Region::from_drawn(west, south, east, north) {
            Some(region) => Some(self.set_region(region)),
            None => {
                tracing::debug!("drawn rectangle is invalid, region cleared");
                self.region = RegionSelection::Invalid;
                self.scenario.on_region_change();
                self.poi_listing.invalidate();
                None
            }
        }
    }

    /// Remove the region entirely.
    pub fn clear_region(&mut self) {
        self.region = RegionSelection::Unset;
        self.scenario.on_region_change();
        self.poi_listing.invalidate();
    }

    /// Fold a finished POI refresh into the listing.
    pub fn apply_poi_listing(
        &mut self,
        ticket: PoiRefreshTicket,
        result: GatewayResult<Vec<Poi>>,
    ) -> bool {
        self.poi_listing.apply_refresh(ticket, result)
    }

    /// Convenience driver: set the region and await the POI refresh.
    pub async fn change_region(&mut self, gateway: &dyn CityGateway, region: Region) -> bool {
        let ticket = self.set_region(region);
        let result = gateway.list_pois(ticket.request()).await;
        self.apply_poi_listing(ticket, result)
    }

    /// Replace the region and run the POI refresh and a computation
    /// concurrently. The two flows are independent; either may fail or
    /// be superseded without affecting the other.
    pub async fn change_region_and_compute(
        &mut self,
        gateway: &dyn CityGateway,
        region: Region,
        mode: TransportMode,
        minutes: u32,
    ) -> bool {
        let poi_ticket = self.set_region(region);
        let compute_ticket = self.begin_computation(mode, minutes);

        let (poi_result, compute_result) = futures::join!(
            gateway.list_pois(poi_ticket.request()),
            async {
                match &compute_ticket {
                    Some(ticket) => Some(gateway.compute(ticket.request()).await),
                    None => None,
                }
            }
        );

        self.apply_poi_listing(poi_ticket, poi_result);
        match (compute_ticket, compute_result) {
            (Some(ticket), Some(result)) => self.apply_computation(ticket, result),
            _ => false,
        }
    }

    /// District polygons, fetched once per session and cached.
    pub async fn districts(
        &mut self,
        gateway: &dyn CityGateway,
    ) -> GatewayResult<&FeatureCollection> {
        if self.districts_cache.is_none() {
            let fetched = gateway.districts().await?;
            self.districts_cache = Some(fetched);
        }
        Ok(self
            .districts_cache
            .get_or_insert_with(FeatureCollection::empty))
    }

    // ===== Scenario editing =====

    pub fn scenario_mode(&self) -> ScenarioMode {
        self.scenario.mode()
    }

    pub fn set_scenario_mode(&mut self, mode: ScenarioMode) {
        self.scenario.set_mode(mode);
    }

    /// Place a user POI at a map click. No-op outside adding mode.
    pub fn place_poi(&mut self, lat: f64, lon: f64, category: Category) -> Option<&UserPoi> {
        self.scenario.add_poi(lat, lon, category)
    }

    pub fn remove_user_poi(&mut self, id: &str) -> bool {
        self.scenario.remove_user_poi(id)
    }

    /// Toggle the removal mark on a listed POI.
    ///
    /// Ids outside the current listing are ignored (`None`); the listing
    /// is the universe removals draw from.
    pub fn toggle_poi_removed(&mut self, id: PoiId) -> Option<bool> {
        if !self.poi_listing.contains(id) {
            return None;
        }
        Some(self.scenario.toggle_removed(id))
    }

    /// Drop all scenario edits.
    pub fn reset_scenario(&mut self) {
        self.scenario.clear_added();
        self.scenario.clear_removed();
    }
}
