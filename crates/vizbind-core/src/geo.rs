// File: crates/vizbind-core/src/geo.rs
// Summary: GeoJSON feature loading, key join against tabular data, and Mercator projection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use crate::error::{ChartError, Result};
use crate::record::Dataset;
use crate::types::Point;

/// Polygon rings in (longitude, latitude) degrees; the first ring is the outer boundary.
pub type Polygon = Vec<Vec<(f64, f64)>>;

#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
    pub id: String,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
}

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    geometry: Option<GeometryDoc>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryDoc {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

fn to_rings(rings: Vec<Vec<Vec<f64>>>) -> Polygon {
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect()
        })
        .collect()
}

/// Parse a GeoJSON `FeatureCollection`. Features without an id are dropped.
pub fn parse_features(json: &str) -> Result<Vec<GeoFeature>> {
    let doc: FeatureCollectionDoc = serde_json::from_str(json)?;
    let mut out = Vec::with_capacity(doc.features.len());
    for f in doc.features {
        let id = match f.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                log::warn!("skipping feature without id");
                continue;
            }
        };
        let name = f
            .properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let polygons = match f.geometry {
            Some(GeometryDoc::Polygon { coordinates }) => vec![to_rings(coordinates)],
            Some(GeometryDoc::MultiPolygon { coordinates }) => {
                coordinates.into_iter().map(to_rings).collect()
            }
            Some(GeometryDoc::Unsupported) | None => Vec::new(),
        };
        out.push(GeoFeature { id, name, polygons });
    }
    Ok(out)
}

pub fn load_features(path: impl AsRef<Path>) -> Result<Vec<GeoFeature>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ChartError::Fetch {
        resource: path.display().to_string(),
        message: e.to_string(),
    })?;
    let features = parse_features(&text)?;
    log::info!("loaded {} features from {}", features.len(), path.display());
    Ok(features)
}

/// A feature with the index of its matching record, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub feature: GeoFeature,
    pub record: Option<usize>,
}

/// Join features to records where `key_field` equals the feature id.
pub fn join_regions(features: &[GeoFeature], dataset: &Dataset, key_field: &str) -> Result<Vec<Region>> {
    let key = dataset.field(key_field)?;
    let by_key: HashMap<String, usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.get(key).map(|v| (v.to_string(), i)))
        .collect();
    Ok(features
        .iter()
        .map(|f| Region { feature: f.clone(), record: by_key.get(&f.id).copied() })
        .collect())
}

/// Spherical Mercator: `scale` pixels per radian, `center` in degrees mapped to `translate`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    pub scale: f64,
    pub center: (f64, f64),
    pub translate: (f64, f64),
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self { scale: 150.0, center: (0.0, 0.0), translate: (480.0, 250.0) }
    }
}

const MAX_LATITUDE: f64 = 85.0;

impl MercatorProjection {
    fn raw(lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        (lon.to_radians(), (FRAC_PI_4 + phi / 2.0).tan().ln())
    }

    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let (x, y) = Self::raw(lon, lat);
        let (cx, cy) = Self::raw(self.center.0, self.center.1);
        Point::new(
            (self.translate.0 + (x - cx) * self.scale) as f32,
            (self.translate.1 - (y - cy) * self.scale) as f32,
        )
    }

    pub fn project_polygon(&self, polygon: &Polygon) -> Vec<Vec<Point>> {
        polygon
            .iter()
            .map(|ring| ring.iter().map(|&(lon, lat)| self.project(lon, lat)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_center_maps_to_translate() {
        let p = MercatorProjection { scale: 100.0, center: (10.0, 20.0), translate: (300.0, 200.0) };
        let c = p.project(10.0, 20.0);
        assert!((c.x - 300.0).abs() < 1e-3 && (c.y - 200.0).abs() < 1e-3);
        // north is up
        assert!(p.project(10.0, 40.0).y < c.y);
    }

    #[test]
    fn numeric_ids_and_unsupported_geometry() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":4,"properties":{"name":"A"},"geometry":{"type":"Point","coordinates":[0,0]}},
            {"type":"Feature","properties":{},"geometry":null}
        ]}"#;
        let f = parse_features(json).unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].id, "4");
        assert_eq!(f[0].name.as_deref(), Some("A"));
        assert!(f[0].polygons.is_empty());
    }
}
