//! Request and response bodies for the computation backend.

use crate::models::{CategorySet, Poi, PoiId, Region, TransportMode, UserPoi};
use serde::{Deserialize, Serialize};

/// Body of `POST /computation`.
///
/// A serialized request is the full snapshot of one computation trigger;
/// nothing about it is re-read from live state after the call starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationRequest {
    pub mode: TransportMode,
    pub categories: CategorySet,
    /// Backend-ordered bounds, or null for the server's default region.
    pub bbox: Option<Region>,
    #[serde(rename = "currentMinutes")]
    pub current_minutes: u32,
    pub removed_poi_ids: Vec<PoiId>,
    pub user_pois: Vec<UserPoiPayload>,
}

/// User-placed POI as the backend expects it: position and category only,
/// the local `user_<n>` id never leaves the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPoiPayload {
    pub lat: f64,
    pub lon: f64,
    pub category: crate::models::Category,
    pub name: Option<String>,
}

impl From<&UserPoi> for UserPoiPayload {
    fn from(poi: &UserPoi) -> Self {
        UserPoiPayload {
            lat: poi.lat,
            lon: poi.lon,
            category: poi.category,
            name: poi.name.clone(),
        }
    }
}

/// Body of `POST /poi-lookup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiLookupRequest {
    pub bbox: Region,
    pub categories: CategorySet,
}

/// Response of `POST /poi-lookup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiLookupResponse {
    pub pois: Vec<Poi>,
}

/// Body of `POST /isochrone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneRequest {
    pub lat: f64,
    pub lon: f64,
    pub mode: TransportMode,
    pub threshold: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;

    #[test]
    fn test_computation_request_wire_shape() {
        let region = Region::from_drawn(11.36, 48.06, 11.72, 48.25).unwrap();
        let request = ComputationRequest {
            mode: TransportMode::Bike,
            categories: CategorySet::normalize(["park", "education"]),
            bbox: Some(region),
            current_minutes: 15,
            removed_poi_ids: vec![PoiId::new(12), PoiId::new(99)],
            user_pois: vec![UserPoiPayload {
                lat: 48.1,
                lon: 11.5,
                category: Category::Park,
                name: None,
            }],
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "mode": "bike",
                "categories": ["park", "education"],
                "bbox": [48.06, 11.36, 48.25, 11.72],
                "currentMinutes": 15,
                "removed_poi_ids": [12, 99],
                "user_pois": [{"lat": 48.1, "lon": 11.5, "category": "park", "name": null}]
            })
        );
    }

    #[test]
    fn test_computation_request_without_region_sends_null_bbox() {
        let request = ComputationRequest {
            mode: TransportMode::Walk,
            categories: CategorySet::normalize(["park"]),
            bbox: None,
            current_minutes: 10,
            removed_poi_ids: vec![],
            user_pois: vec![],
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["bbox"], json!(null));
        assert_eq!(body["removed_poi_ids"], json!([]));
        assert_eq!(body["user_pois"], json!([]));
    }

    #[test]
    fn test_user_poi_payload_drops_local_id() {
        let user_poi = UserPoi::new(4, 48.2, 11.6, Category::Healthcare).with_name("Praxis");
        let payload = UserPoiPayload::from(&user_poi);
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            body,
            json!({"lat": 48.2, "lon": 11.6, "category": "healthcare", "name": "Praxis"})
        );
    }

    #[test]
    fn test_poi_lookup_round_trip() {
        let request = PoiLookupRequest {
            bbox: Region::from_drawn(11.36, 48.06, 11.72, 48.25).unwrap(),
            categories: CategorySet::normalize(["supermarket"]),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["bbox"], json!([48.06, 11.36, 48.25, 11.72]));

        let response: PoiLookupResponse = serde_json::from_value(json!({
            "pois": [
                {"id": 1, "lat": 48.1, "lon": 11.4, "category": "supermarket", "name": "Markt"},
                {"id": 2, "lat": 48.2, "lon": 11.5, "category": "supermarket"}
            ]
        }))
        .unwrap();
        assert_eq!(response.pois.len(), 2);
        assert_eq!(response.pois[1].name, None);
    }

    #[test]
    fn test_isochrone_request_shape() {
        let request = IsochroneRequest {
            lat: 48.15,
            lon: 11.55,
            mode: TransportMode::Walk,
            threshold: 15,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"lat": 48.15, "lon": 11.55, "mode": "walk", "threshold": 15})
        );
    }
}
