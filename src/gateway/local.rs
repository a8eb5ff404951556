//! In-memory gateway for unit testing and local development.
//!
//! Travel times come from a straight-line model: haversine distance at a
//! fixed speed per transport mode. That makes the gateway a deterministic
//! stand-in collaborator, not a routing engine; it exists so sessions and
//! the aggregation engine can be exercised without a backend.

use async_trait::async_trait;
use std::sync::Mutex;

use super::error::{GatewayError, GatewayResult};
use super::wire::{ComputationRequest, IsochroneRequest, PoiLookupRequest};
use super::CityGateway;
use crate::models::{
    Category, DistrictKey, Feature, FeatureCollection, FeatureProperties, Poi, TransportMode,
};

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_DEG_LAT: f64 = 110.574;

/// Straight-line speeds per mode, in km/h.
fn mode_speed_kmh(mode: TransportMode) -> f64 {
    match mode {
        TransportMode::Walk => 5.0,
        TransportMode::Bike => 16.0,
    }
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// One synthetic grid cell of the local dataset.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub lat: f64,
    pub lon: f64,
    pub pop: f64,
    pub district: Option<String>,
}

#[derive(Default)]
struct ScriptedState {
    fail_compute: Option<GatewayError>,
    fail_poi_lookup: Option<GatewayError>,
    fail_districts: Option<GatewayError>,
    fail_isochrone: Option<GatewayError>,
    compute_calls: usize,
    poi_lookup_calls: usize,
    districts_calls: usize,
    isochrone_calls: usize,
}

/// In-memory implementation of [`CityGateway`].
///
/// Holds a configurable POI table and population grid. Failure injection
/// (`fail_next_*`) and call counters make the orchestrator's error and
/// stale-response paths testable.
pub struct LocalGateway {
    cells: Vec<GridCell>,
    pois: Vec<Poi>,
    districts: FeatureCollection,
    cell_size_deg: f64,
    scripted: Mutex<ScriptedState>,
}

impl Default for LocalGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalGateway {
    pub fn new() -> Self {
        LocalGateway {
            cells: Vec::new(),
            pois: Vec::new(),
            districts: FeatureCollection::empty(),
            cell_size_deg: 0.01,
            scripted: Mutex::new(ScriptedState::default()),
        }
    }

    pub fn with_cells(mut self, cells: Vec<GridCell>) -> Self {
        self.cells = cells;
        self
    }

    pub fn with_pois(mut self, pois: Vec<Poi>) -> Self {
        self.pois = pois;
        self
    }

    pub fn with_districts(mut self, districts: FeatureCollection) -> Self {
        self.districts = districts;
        self
    }

    /// Fail the next `compute` call with the given error.
    pub fn fail_next_compute(&self, error: GatewayError) {
        self.lock_scripted().fail_compute = Some(error);
    }

    /// Fail the next `list_pois` call with the given error.
    pub fn fail_next_poi_lookup(&self, error: GatewayError) {
        self.lock_scripted().fail_poi_lookup = Some(error);
    }

    /// Fail the next `districts` call with the given error.
    pub fn fail_next_districts(&self, error: GatewayError) {
        self.lock_scripted().fail_districts = Some(error);
    }

    /// Fail the next `isochrone` call with the given error.
    pub fn fail_next_isochrone(&self, error: GatewayError) {
        self.lock_scripted().fail_isochrone = Some(error);
    }

    pub fn compute_calls(&self) -> usize {
        self.lock_scripted().compute_calls
    }

    pub fn poi_lookup_calls(&self) -> usize {
        self.lock_scripted().poi_lookup_calls
    }

    pub fn districts_calls(&self) -> usize {
        self.lock_scripted().districts_calls
    }

    pub fn isochrone_calls(&self) -> usize {
        self.lock_scripted().isochrone_calls
    }

    fn lock_scripted(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        // Lock poisoning cannot outlive a test run; recover the guard.
        match self.scripted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Minutes to the closest effective facility of a category.
    ///
    /// The effective set is the POI table minus removals plus the user
    /// POIs of the request. `None` when no facility of that category
    /// exists at all.
    fn best_time(
        &self,
        cell: &GridCell,
        category: Category,
        request: &ComputationRequest,
    ) -> Option<f64> {
        let speed = mode_speed_kmh(request.mode);
        let mut best: Option<f64> = None;

        let table = self
            .pois
            .iter()
            .filter(|poi| poi.known_category() == Some(category))
            .filter(|poi| !request.removed_poi_ids.contains(&poi.id))
            .map(|poi| (poi.lat, poi.lon));
        let added = request
            .user_pois
            .iter()
            .filter(|poi| poi.category == category)
            .map(|poi| (poi.lat, poi.lon));

        for (lat, lon) in table.chain(added) {
            let minutes = haversine_km(cell.lat, cell.lon, lat, lon) / speed * 60.0;
            best = Some(match best {
                Some(b) if b <= minutes => b,
                _ => minutes,
            });
        }
        best
    }

    fn cell_geometry(&self, cell: &GridCell) -> serde_json::Value {
        let h = self.cell_size_deg / 2.0;
        serde_json::json!({
            "type": "Polygon",
            "coordinates": [[
                [cell.lon - h, cell.lat - h],
                [cell.lon + h, cell.lat - h],
                [cell.lon + h, cell.lat + h],
                [cell.lon - h, cell.lat + h],
                [cell.lon - h, cell.lat - h]
            ]]
        })
    }
}

#[async_trait]
impl CityGateway for LocalGateway {
    async fn compute(&self, request: &ComputationRequest) -> GatewayResult<FeatureCollection> {
        {
            let mut scripted = self.lock_scripted();
            scripted.compute_calls += 1;
            if let Some(error) = scripted.fail_compute.take() {
                return Err(error);
            }
        }

        let mut features = Vec::new();
        for cell in &self.cells {
            if let Some(region) = &request.bbox {
                if !region.contains(cell.lat, cell.lon) {
                    continue;
                }
            }

            let mut properties = FeatureProperties {
                pop: Some(cell.pop),
                district_id: cell.district.clone().map(DistrictKey::Name),
                ..FeatureProperties::default()
            };
            for category in request.categories.iter() {
                if let Some(minutes) = self.best_time(cell, category, request) {
                    properties
                        .extra
                        .insert(category.travel_time_key().to_string(), minutes.into());
                }
            }

            features.push(Feature {
                feature_type: "Feature".to_string(),
                geometry: self.cell_geometry(cell),
                properties,
            });
        }

        Ok(FeatureCollection {
            collection_type: "FeatureCollection".to_string(),
            features,
        })
    }

    async fn list_pois(&self, request: &PoiLookupRequest) -> GatewayResult<Vec<Poi>> {
        {
            let mut scripted = self.lock_scripted();
            scripted.poi_lookup_calls += 1;
            if let Some(error) = scripted.fail_poi_lookup.take() {
                return Err(error);
            }
        }

        Ok(self
            .pois
            .iter()
            .filter(|poi| request.bbox.contains(poi.lat, poi.lon))
            .filter(|poi| {
                poi.known_category()
                    .map_or(false, |category| request.categories.contains(category))
            })
            .cloned()
            .collect())
    }

    async fn districts(&self) -> GatewayResult<FeatureCollection> {
        {
            let mut scripted = self.lock_scripted();
            scripted.districts_calls += 1;
            if let Some(error) = scripted.fail_districts.take() {
                return Err(error);
            }
        }
        Ok(self.districts.clone())
    }

    async fn isochrone(&self, request: &IsochroneRequest) -> GatewayResult<serde_json::Value> {
        {
            let mut scripted = self.lock_scripted();
            scripted.isochrone_calls += 1;
            if let Some(error) = scripted.fail_isochrone.take() {
                return Err(error);
            }
        }

        // Under the straight-line model an isochrone is a circle; emit it
        // as a closed 32-gon ring.
        let radius_km = mode_speed_kmh(request.mode) * request.threshold as f64 / 60.0;
        let km_per_deg_lon = 111.320 * request.lat.to_radians().cos();
        let segments = 32;
        let mut ring = Vec::with_capacity(segments + 1);
        for step in 0..=segments {
            let angle = std::f64::consts::TAU * step as f64 / segments as f64;
            let lat = request.lat + radius_km * angle.sin() / KM_PER_DEG_LAT;
            let lon = request.lon + radius_km * angle.cos() / km_per_deg_lon;
            ring.push(serde_json::json!([lon, lat]));
        }

        Ok(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [ring] },
            "properties": { "mode": request.mode, "threshold": request.threshold }
        }))
    }
}
