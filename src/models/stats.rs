//! Analysis settings and derived statistics.

use crate::models::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How travel times were measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Walk,
    Bike,
}

impl TransportMode {
    pub fn id(&self) -> &'static str {
        match self {
            TransportMode::Walk => "walk",
            TransportMode::Bike => "bike",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Walk => "Zu Fuß",
            TransportMode::Bike => "Fahrrad",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which aggregation the engine derives from stored geodata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisLevel {
    #[default]
    Grid,
    District,
}

/// Grid-level aggregation result.
///
/// Produced only when the input had positive total population and at
/// least one usable travel-time sample, so the fields are never the
/// artifacts of a division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    /// Share of the population reaching every selected category within
    /// the threshold. Always within `[0, 1]`.
    pub coverage: f64,
    /// Population-weighted median of the per-feature worst travel time.
    pub median_time: f64,
    pub total_pop: f64,
    pub covered_pop: f64,
}

impl GridStats {
    /// Coverage as a percentage, for display.
    pub fn coverage_percent(&self) -> f64 {
        self.coverage * 100.0
    }
}

/// District-level aggregation result for one district.
///
/// A category missing from `means` had no contributing population, which
/// signals "not computable" as opposed to a mean of zero minutes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistrictStats {
    pub total_pop: f64,
    pub means: BTreeMap<Category, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_wire_ids() {
        assert_eq!(serde_json::to_string(&TransportMode::Walk).unwrap(), r#""walk""#);
        assert_eq!(serde_json::to_string(&TransportMode::Bike).unwrap(), r#""bike""#);
        assert_eq!(TransportMode::Bike.to_string(), "bike");

        let back: TransportMode = serde_json::from_str(r#""bike""#).unwrap();
        assert_eq!(back, TransportMode::Bike);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TransportMode::default(), TransportMode::Walk);
        assert_eq!(AnalysisLevel::default(), AnalysisLevel::Grid);
    }

    #[test]
    fn test_coverage_percent() {
        let stats = GridStats {
            coverage: 0.425,
            median_time: 12.0,
            total_pop: 1000.0,
            covered_pop: 425.0,
        };
        assert!((stats.coverage_percent() - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_district_stats_serialize_with_category_keys() {
        let mut stats = DistrictStats::default();
        stats.total_pop = 300.0;
        stats.means.insert(Category::Park, 8.5);
        stats.means.insert(Category::Education, 12.0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_pop"], 300.0);
        assert_eq!(json["means"]["park"], 8.5);
        assert_eq!(json["means"]["education"], 12.0);
    }
}
