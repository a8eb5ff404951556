//! Grid geodata returned by a travel-time computation.
//!
//! The payload is a GeoJSON feature collection of grid cells or district
//! polygons. Geometry is treated as an opaque value and passed through
//! untouched for rendering; only the properties carry data the aggregation
//! engine reads: resident population, a district key, and one
//! `tt_<category>` travel-time entry per requested category.

use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// District identifier as delivered by the backend. Some datasets key
/// districts by number, others by name, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistrictKey {
    Number(i64),
    Name(String),
}

impl fmt::Display for DistrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistrictKey::Number(n) => write!(f, "{n}"),
            DistrictKey::Name(s) => f.write_str(s),
        }
    }
}

/// Properties of a single feature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Resident population. Absent or null counts as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop: Option<f64>,
    /// District the feature belongs to, if the dataset assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<DistrictKey>,
    /// Human-readable name, present on district polygons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining properties, including the `tt_<category>` travel times.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FeatureProperties {
    /// Population with absent values coerced to zero.
    pub fn population(&self) -> f64 {
        self.pop.unwrap_or(0.0)
    }

    /// Travel time for a category, in minutes.
    ///
    /// Only a finite, non-negative number counts; null, absent and
    /// malformed entries all read as `None`, meaning the facility is
    /// unreachable from this feature. Missing data is never imputed as
    /// zero minutes.
    pub fn travel_time(&self, category: Category) -> Option<f64> {
        self.extra
            .get(category.travel_time_key())
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    /// District key rendered as a statistics grouping label.
    pub fn district_label(&self) -> Option<String> {
        self.district_id.as_ref().map(|d| d.to_string())
    }
}

/// One feature: opaque geometry plus typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    /// Polygon geometry, passed through verbatim for rendering.
    pub geometry: serde_json::Value,
    pub properties: FeatureProperties,
}

/// The full payload of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// An empty collection, used when a computation returns no cells.
    pub fn empty() -> Self {
        FeatureCollection {
            collection_type: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
