//! Single-origin reachability: one isochrone and the POIs inside it.

use geo::{BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::gateway::{CityGateway, IsochroneRequest, PoiLookupRequest};
use crate::models::{CategorySet, Poi, Region, TransportMode};

use super::DEFAULT_THRESHOLD_MINUTES;

/// Orchestrator of the single-origin screen.
///
/// A map click sets the origin; the session fetches the isochrone for the
/// current mode and threshold, looks up the POIs inside the isochrone's
/// bounding box and keeps only those strictly inside the polygon. Unlike
/// the scenario screen, failures here clear the display without an error
/// banner; the next click simply tries again.
pub struct ReachSession {
    origin: Option<(f64, f64)>,
    mode: TransportMode,
    threshold_minutes: u32,
    categories: CategorySet,
    isochrone: Option<serde_json::Value>,
    pois: Vec<Poi>,
}

impl Default for ReachSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReachSession {
    pub fn new() -> Self {
        ReachSession {
            origin: None,
            mode: TransportMode::Walk,
            threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
            categories: CategorySet::all(),
            isochrone: None,
            pois: Vec::new(),
        }
    }

    pub fn origin(&self) -> Option<(f64, f64)> {
        self.origin
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn threshold_minutes(&self) -> u32 {
        self.threshold_minutes
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// The raw isochrone geometry of the last successful fetch, for
    /// rendering.
    pub fn isochrone(&self) -> Option<&serde_json::Value> {
        self.isochrone.as_ref()
    }

    /// POIs inside the isochrone, already category-filtered.
    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn set_mode(&mut self, mode: TransportMode) {
        self.mode = mode;
    }

    pub fn set_threshold(&mut self, minutes: u32) {
        self.threshold_minutes = minutes;
    }

    pub fn set_categories(&mut self, categories: CategorySet) {
        self.categories = categories;
    }

    /// Drop the origin and everything derived from it.
    pub fn clear(&mut self) {
        self.origin = None;
        self.isochrone = None;
        self.pois.clear();
    }

    /// Place the origin at a map click and refresh the display.
    ///
    /// Returns whether the refresh produced an isochrone. Non-finite
    /// coordinates are a silent guard.
    pub async fn show_origin(
        &mut self,
        gateway: &dyn CityGateway,
        lat: f64,
        lon: f64,
    ) -> bool {
        if !lat.is_finite() || !lon.is_finite() {
            tracing::debug!("origin click with non-finite coordinates ignored");
            return false;
        }
        self.origin = Some((lat, lon));
        self.refresh(gateway).await
    }

    /// Re-fetch the isochrone and its POIs for the current inputs.
    ///
    /// The session holds `&mut self` across both awaits, so refreshes
    /// cannot overlap; no token is needed here. Either call failing
    /// clears the display sets and logs a warning only.
    pub async fn refresh(&mut self, gateway: &dyn CityGateway) -> bool {
        let Some((lat, lon)) = self.origin else {
            return false;
        };

        let request = IsochroneRequest {
            lat,
            lon,
            mode: self.mode,
            threshold: self.threshold_minutes,
        };
        let geometry = match gateway.isochrone(&request).await {
            Ok(geometry) => geometry,
            Err(error) => {
                tracing::warn!(error = %error, "isochrone fetch failed, display cleared");
                self.isochrone = None;
                self.pois.clear();
                return false;
            }
        };

        let polygon = parse_multi_polygon(&geometry);
        self.isochrone = Some(geometry);
        self.pois.clear();

        let Some(polygon) = polygon else {
            tracing::warn!("isochrone response carried no usable polygon");
            return true;
        };
        let Some(bbox) = polygon_region(&polygon) else {
            return true;
        };

        let lookup = PoiLookupRequest {
            bbox,
            categories: self.categories.clone(),
        };
        match gateway.list_pois(&lookup).await {
            Ok(pois) => {
                self.pois = pois
                    .into_iter()
                    .filter(|poi| poi.lat.is_finite() && poi.lon.is_finite())
                    .filter(|poi| polygon.contains(&Point::new(poi.lon, poi.lat)))
                    .filter(|poi| {
                        poi.known_category()
                            .map_or(false, |category| self.categories.contains(category))
                    })
                    .collect();
                tracing::debug!(count = self.pois.len(), "reachable POIs refreshed");
            }
            Err(error) => {
                tracing::warn!(error = %error, "POI lookup failed, reachable set cleared");
            }
        }
        true
    }
}

/// Extract a polygon from a GeoJSON Feature or bare Geometry value.
///
/// Coordinates are `[lon, lat]` pairs per GeoJSON; a `Polygon` becomes a
/// single-member multi-polygon. Anything unparseable yields `None`.
fn parse_multi_polygon(value: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let geometry = if value["type"].as_str() == Some("Feature") {
        &value["geometry"]
    } else {
        value
    };

    let coordinates = geometry.get("coordinates")?;
    match geometry["type"].as_str()? {
        "Polygon" => parse_polygon(coordinates).map(|p| MultiPolygon(vec![p])),
        "MultiPolygon" => {
            let polygons: Vec<Polygon<f64>> = coordinates
                .as_array()?
                .iter()
                .filter_map(parse_polygon)
                .collect();
            if polygons.is_empty() {
                None
            } else {
                Some(MultiPolygon(polygons))
            }
        }
        _ => None,
    }
}

fn parse_polygon(rings: &serde_json::Value) -> Option<Polygon<f64>> {
    let rings = rings.as_array()?;
    let mut parsed = rings.iter().map(parse_ring);
    let exterior = parsed.next()??;
    let interiors: Vec<LineString<f64>> = parsed.flatten().collect();
    Some(Polygon::new(exterior, interiors))
}

fn parse_ring(ring: &serde_json::Value) -> Option<LineString<f64>> {
    let coords: Option<Vec<Coord<f64>>> = ring
        .as_array()?
        .iter()
        .map(|pair| {
            let x = pair.get(0)?.as_f64()?;
            let y = pair.get(1)?.as_f64()?;
            (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
        })
        .collect();
    let coords = coords?;
    if coords.len() < 4 {
        return None;
    }
    Some(LineString::new(coords))
}

/// Axis-aligned bounds of the polygon as a [`Region`], for POI lookup.
fn polygon_region(polygon: &MultiPolygon<f64>) -> Option<Region> {
    let rect = polygon.bounding_rect()?;
    Region::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square_feature() -> serde_json::Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [11.0, 48.0], [11.2, 48.0], [11.2, 48.2], [11.0, 48.2], [11.0, 48.0]
                ]]
            },
            "properties": {}
        })
    }

    #[test]
    fn test_parse_polygon_from_feature() {
        let polygon = parse_multi_polygon(&square_feature()).unwrap();
        assert!(polygon.contains(&Point::new(11.1, 48.1)));
        assert!(!polygon.contains(&Point::new(11.3, 48.1)));
    }

    #[test]
    fn test_parse_bare_geometry_and_multi_polygon() {
        let bare = json!({
            "type": "Polygon",
            "coordinates": [[
                [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]
            ]]
        });
        assert!(parse_multi_polygon(&bare).is_some());

        let multi = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]
            ]
        });
        let polygon = parse_multi_polygon(&multi).unwrap();
        assert_eq!(polygon.0.len(), 2);
        assert!(polygon.contains(&Point::new(5.6, 5.4)));
    }

    #[test]
    fn test_parse_rejects_degenerate_input() {
        assert!(parse_multi_polygon(&json!({ "type": "Point", "coordinates": [1.0, 2.0] }))
            .is_none());
        assert!(parse_multi_polygon(&json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 1.0]]]
        }))
        .is_none());
        assert!(parse_multi_polygon(&json!({ "type": "Polygon" })).is_none());
    }

    #[test]
    fn test_polygon_region_covers_exterior() {
        let polygon = parse_multi_polygon(&square_feature()).unwrap();
        let region = polygon_region(&polygon).unwrap();
        assert_eq!(region.to_backend_order(), [48.0, 11.0, 48.2, 11.2]);
    }
}
