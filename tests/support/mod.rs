#![allow(dead_code)] // each suite uses its own subset of these helpers

use std::collections::HashSet;
use std::sync::Mutex;

use reachscope::gateway::{GridCell, LocalGateway};
use reachscope::models::{Feature, FeatureCollection, Poi, PoiId, Region};

static ENV_LOCK: Mutex<()> = Mutex::new(());
static TRACING: std::sync::Once = std::sync::Once::new();

/// Install a per-test tracing subscriber honoring `RUST_LOG`, once.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Grid cell feature with a population and `tt_<category>` entries.
pub fn cell(pop: f64, times: &[(&str, f64)]) -> Feature {
    let mut props = serde_json::Map::new();
    props.insert("pop".to_string(), serde_json::json!(pop));
    for (key, time) in times {
        props.insert(key.to_string(), serde_json::json!(time));
    }
    Feature {
        feature_type: "Feature".to_string(),
        geometry: serde_json::Value::Null,
        properties: serde_json::from_value(serde_json::Value::Object(props))
            .expect("feature properties"),
    }
}

/// Like [`cell`] but assigned to a district.
pub fn district_cell(district: &str, pop: f64, times: &[(&str, f64)]) -> Feature {
    let mut feature = cell(pop, times);
    feature.properties.district_id =
        Some(reachscope::models::DistrictKey::Name(district.to_string()));
    feature
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        collection_type: "FeatureCollection".to_string(),
        features,
    }
}

pub fn poi(id: i64, lat: f64, lon: f64, category: &str) -> Poi {
    Poi {
        id: PoiId::new(id),
        lat,
        lon,
        category: category.to_string(),
        name: None,
    }
}

/// A bounding box over central Munich, in drawn order.
pub fn munich_region() -> Region {
    Region::from_drawn(11.36, 48.06, 11.72, 48.25).expect("valid region")
}

/// Local gateway seeded with a small city: three populated cells in two
/// districts and a handful of POIs near the first cell.
pub fn seeded_gateway() -> LocalGateway {
    LocalGateway::new()
        .with_cells(vec![
            GridCell {
                lat: 48.13,
                lon: 11.56,
                pop: 1000.0,
                district: Some("Mitte".to_string()),
            },
            GridCell {
                lat: 48.15,
                lon: 11.58,
                pop: 500.0,
                district: Some("Nord".to_string()),
            },
            GridCell {
                lat: 48.10,
                lon: 11.50,
                pop: 250.0,
                district: Some("Mitte".to_string()),
            },
        ])
        .with_pois(vec![
            poi(1, 48.131, 11.561, "supermarket"),
            poi(2, 48.132, 11.562, "park"),
            poi(3, 48.151, 11.581, "supermarket"),
            poi(4, 48.152, 11.582, "healthcare"),
        ])
}
