//! Points of interest, both backend-listed and user-added.

use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a backend-listed POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoiId(pub i64);

impl PoiId {
    pub fn new(id: i64) -> Self {
        PoiId(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A POI as listed by the backend for the current region.
///
/// The category is kept as the raw backend string; listings may carry
/// categories this build does not know and those must survive a round
/// trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Poi {
    /// The category parsed against the built-in table, if it is known.
    pub fn known_category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// Display name, falling back to the category label.
    pub fn display_name(&self) -> String {
        match (&self.name, self.known_category()) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(cat)) => cat.label().to_string(),
            _ => self.category.clone(),
        }
    }
}

/// A POI placed by the user in an additive what-if scenario.
///
/// User POIs never come from the backend, so their identifiers live in a
/// separate `user_<n>` namespace and can never collide with [`PoiId`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPoi {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserPoi {
    pub fn new(sequence: u64, lat: f64, lon: f64, category: Category) -> Self {
        UserPoi {
            id: format!("user_{sequence}"),
            lat,
            lon,
            category,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poi_id_serializes_as_bare_number() {
        let id = PoiId::new(9042);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9042");
        assert_eq!(id.to_string(), "9042");

        let back: PoiId = serde_json::from_str("9042").unwrap();
        assert_eq!(back.value(), 9042);
    }

    #[test]
    fn test_poi_deserialize_without_name() {
        let poi: Poi = serde_json::from_value(json!({
            "id": 7,
            "lat": 48.1,
            "lon": 11.5,
            "category": "park"
        }))
        .unwrap();
        assert_eq!(poi.id, PoiId(7));
        assert_eq!(poi.name, None);
        assert_eq!(poi.known_category(), Some(Category::Park));
    }

    #[test]
    fn test_unknown_category_survives_round_trip() {
        let poi: Poi = serde_json::from_value(json!({
            "id": 1,
            "lat": 48.0,
            "lon": 11.0,
            "category": "marina"
        }))
        .unwrap();
        assert_eq!(poi.known_category(), None);
        assert_eq!(poi.display_name(), "marina");

        let back = serde_json::to_value(&poi).unwrap();
        assert_eq!(back["category"], json!("marina"));
    }

    #[test]
    fn test_display_name_prefers_name_then_label() {
        let named: Poi = serde_json::from_value(json!({
            "id": 2, "lat": 48.0, "lon": 11.0, "category": "park", "name": "Westpark"
        }))
        .unwrap();
        assert_eq!(named.display_name(), "Westpark");

        let unnamed: Poi = serde_json::from_value(json!({
            "id": 3, "lat": 48.0, "lon": 11.0, "category": "healthcare"
        }))
        .unwrap();
        assert_eq!(unnamed.display_name(), "Gesundheit");
    }

    #[test]
    fn test_user_poi_id_namespace() {
        let poi = UserPoi::new(3, 48.1, 11.5, Category::Supermarket);
        assert_eq!(poi.id, "user_3");
        assert_eq!(poi.name, None);

        let named = poi.with_name("Neuer Markt");
        assert_eq!(named.name.as_deref(), Some("Neuer Markt"));
    }
}
