//! What-if scenario edits layered over the backend POI inventory.

use crate::models::category::Category;
use crate::models::poi::{PoiId, UserPoi};
use serde::{Deserialize, Serialize};

/// Interaction mode for scenario editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioMode {
    /// Scenario editing disabled; map clicks do nothing.
    #[default]
    Off,
    /// Map clicks place a new POI of the chosen category.
    Adding,
    /// Clicking a listed POI toggles its removal.
    Removing,
}

/// Hypothetical POI additions and removals.
///
/// Removals reference backend POIs by id; additions are user POIs with a
/// private `user_<n>` id namespace. Sequence numbers are never reused, so
/// an id stays unique across the life of the scenario even after the POI
/// it named is deleted again.
///
/// Leaving scenario mode keeps the accumulated edits; they persist until
/// cleared explicitly, except that a region change invalidates the removed
/// ids (they only name POIs of the region they were picked from) while the
/// added POIs, being user content independent of any region, survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioState {
    mode: ScenarioMode,
    user_pois: Vec<UserPoi>,
    removed_poi_ids: Vec<PoiId>,
    next_sequence: u64,
}

impl ScenarioState {
    pub fn new() -> Self {
        ScenarioState::default()
    }

    pub fn mode(&self) -> ScenarioMode {
        self.mode
    }

    /// Switch the interaction mode. Accumulated edits are kept.
    pub fn set_mode(&mut self, mode: ScenarioMode) {
        self.mode = mode;
    }

    /// Place a new user POI and return it.
    ///
    /// A no-op (`None`) unless the mode is [`ScenarioMode::Adding`] and the
    /// coordinates are finite.
    pub fn add_poi(&mut self, lat: f64, lon: f64, category: Category) -> Option<&UserPoi> {
        if self.mode != ScenarioMode::Adding || !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        let poi = UserPoi::new(self.next_sequence, lat, lon, category);
        self.next_sequence += 1;
        self.user_pois.push(poi);
        self.user_pois.last()
    }

    /// Delete a user POI by its `user_<n>` id. Returns whether it existed.
    pub fn remove_user_poi(&mut self, id: &str) -> bool {
        let before = self.user_pois.len();
        self.user_pois.retain(|p| p.id != id);
        self.user_pois.len() != before
    }

    /// Toggle the removal mark on a backend POI.
    ///
    /// Returns `true` when the POI is marked removed afterwards. Toggling
    /// twice restores the original set.
    pub fn toggle_removed(&mut self, id: PoiId) -> bool {
        if let Some(pos) = self.removed_poi_ids.iter().position(|r| *r == id) {
            self.removed_poi_ids.remove(pos);
            false
        } else {
            self.removed_poi_ids.push(id);
            true
        }
    }

    pub fn is_removed(&self, id: PoiId) -> bool {
        self.removed_poi_ids.contains(&id)
    }

    pub fn user_pois(&self) -> &[UserPoi] {
        &self.user_pois
    }

    pub fn removed_poi_ids(&self) -> &[PoiId] {
        &self.removed_poi_ids
    }

    /// Removed ids in ascending order, for deterministic request bodies.
    pub fn sorted_removed_ids(&self) -> Vec<PoiId> {
        let mut ids = self.removed_poi_ids.clone();
        ids.sort();
        ids
    }

    /// Whether the scenario deviates from the baseline inventory.
    pub fn has_changes(&self) -> bool {
        !self.user_pois.is_empty() || !self.removed_poi_ids.is_empty()
    }

    pub fn clear_added(&mut self) {
        self.user_pois.clear();
    }

    pub fn clear_removed(&mut self) {
        self.removed_poi_ids.clear();
    }

    /// Region change hook: removed ids are scoped to the region they were
    /// selected from and are dropped; added POIs survive.
    pub fn on_region_change(&mut self) {
        self.removed_poi_ids.clear();
    }
}
