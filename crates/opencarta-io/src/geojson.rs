//! GeoJSON ingestion.
//!
//! Reads a FeatureCollection and turns its Polygon and MultiPolygon
//! features into scene shapes. Ring nesting and hole orientation are
//! handled by shape construction; this module only walks the document.
//! Features carrying other geometry types are skipped, a malformed
//! coordinate structure fails the import with the feature's index.

use std::io::{self, Read};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use opencarta_core::scene::Scene;
use opencarta_core::shape::{Shape, ShapeId};
use opencarta_core::MapError;

#[derive(Error, Debug)]
pub enum GeoJsonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a FeatureCollection, got '{0}'")]
    NotAFeatureCollection(String),

    #[error("Feature {index}: {source}")]
    Feature { index: usize, source: MapError },

    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    features: Vec<Value>,
}

/// Streaming GeoJSON reader over any byte source.
pub struct GeoJsonReader<R: Read> {
    reader: R,
}

impl<R: Read> GeoJsonReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read a FeatureCollection and add its polygon features to `layer`.
    /// Returns the created shape ids in feature order.
    pub fn read_into(
        &mut self,
        scene: &mut Scene,
        layer: &str,
    ) -> Result<Vec<ShapeId>, GeoJsonError> {
        let mut text = String::new();
        self.reader.read_to_string(&mut text)?;
        import_geojson_str(scene, &text, layer)
    }
}

/// Import a GeoJSON FeatureCollection document into one scene layer.
pub fn import_geojson_str(
    scene: &mut Scene,
    json: &str,
    layer: &str,
) -> Result<Vec<ShapeId>, GeoJsonError> {
    scene.layer(layer)?;

    let collection: FeatureCollection = serde_json::from_str(json)?;
    if collection.kind != "FeatureCollection" {
        return Err(GeoJsonError::NotAFeatureCollection(collection.kind));
    }

    let mut ids = Vec::new();
    let mut skipped = 0usize;
    for (index, feature) in collection.features.iter().enumerate() {
        let geometry = match feature.get("geometry") {
            Some(g) if !g.is_null() => g,
            _ => {
                skipped += 1;
                log::debug!("feature {}: no geometry, skipped", index);
                continue;
            }
        };
        match geometry.get("type").and_then(Value::as_str).unwrap_or("") {
            "Polygon" | "MultiPolygon" => {
                let coords = geometry.get("coordinates").unwrap_or(&Value::Null);
                let shape = Shape::from_value(coords)
                    .map_err(|source| GeoJsonError::Feature { index, source })?;
                ids.push(scene.insert_shape(layer, shape)?);
            }
            other => {
                skipped += 1;
                log::debug!("feature {}: geometry type '{}' not supported, skipped", index, other);
            }
        }
    }

    log::info!(
        "Imported {} shapes into layer '{}' ({} features skipped)",
        ids.len(),
        layer,
        skipped
    );
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencarta_core::scene::DEFAULT_LAYER;
    use serde_json::json;
    use std::io::Cursor;

    fn polygon_feature(origin: i64) -> Value {
        json!({
            "type": "Feature",
            "properties": {"name": "cell"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [origin, origin],
                    [origin, origin + 10],
                    [origin + 10, origin + 10],
                    [origin + 10, origin],
                ]],
            },
        })
    }

    #[test]
    fn test_import_polygon_features() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [polygon_feature(0), polygon_feature(100)],
        })
        .to_string();

        let mut scene = Scene::new(800.0, 600.0);
        let ids = import_geojson_str(&mut scene, &doc, DEFAULT_LAYER).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(scene.layer(DEFAULT_LAYER).unwrap().shape_count(), 2);
        assert!(scene.shape(ids[1]).is_some());
    }

    #[test]
    fn test_import_multi_polygon_feature() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0], [0, 10], [10, 10], [10, 0]]],
                        [[[50, 50], [50, 60], [60, 60], [60, 50]]],
                    ],
                },
            }],
        })
        .to_string();

        let mut scene = Scene::new(800.0, 600.0);
        let ids = import_geojson_str(&mut scene, &doc, DEFAULT_LAYER).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(scene.shape(ids[0]).unwrap().rings().len(), 2);
    }

    #[test]
    fn test_unsupported_and_null_geometries_skipped() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "geometry": null},
                {"type": "Feature"},
                polygon_feature(0),
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
            ],
        })
        .to_string();

        let mut scene = Scene::new(800.0, 600.0);
        let ids = import_geojson_str(&mut scene, &doc, DEFAULT_LAYER).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(scene.layer(DEFAULT_LAYER).unwrap().shape_count(), 1);
    }

    #[test]
    fn test_malformed_coordinates_fail_with_feature_index() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                polygon_feature(0),
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[1, 2], [3, "x"], [5, 6]]]}},
            ],
        })
        .to_string();

        let mut scene = Scene::new(800.0, 600.0);
        let err = import_geojson_str(&mut scene, &doc, DEFAULT_LAYER).unwrap_err();
        assert!(matches!(
            err,
            GeoJsonError::Feature {
                index: 1,
                source: MapError::InvalidGeometry(_),
            }
        ));
        // Features before the bad one were already added.
        assert_eq!(scene.layer(DEFAULT_LAYER).unwrap().shape_count(), 1);
    }

    #[test]
    fn test_rejects_other_document_types() {
        let doc = json!({"type": "Feature", "geometry": null}).to_string();
        let mut scene = Scene::new(800.0, 600.0);
        let err = import_geojson_str(&mut scene, &doc, DEFAULT_LAYER).unwrap_err();
        assert!(matches!(err, GeoJsonError::NotAFeatureCollection(kind) if kind == "Feature"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let mut scene = Scene::new(800.0, 600.0);
        let err = import_geojson_str(&mut scene, "{\"type\": ", DEFAULT_LAYER).unwrap_err();
        assert!(matches!(err, GeoJsonError::Json(_)));
    }

    #[test]
    fn test_unknown_layer_checked_first() {
        let mut scene = Scene::new(800.0, 600.0);
        let err = import_geojson_str(&mut scene, "not json at all", "missing").unwrap_err();
        assert!(matches!(err, GeoJsonError::Map(MapError::UnknownLayer(_))));
    }

    #[test]
    fn test_reader_consumes_byte_stream() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [polygon_feature(0)],
        })
        .to_string();

        let mut scene = Scene::new(800.0, 600.0);
        scene.create_layer("imported");
        let mut reader = GeoJsonReader::new(Cursor::new(doc.into_bytes()));
        let ids = reader.read_into(&mut scene, "imported").unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(scene.layer("imported").unwrap().shape_count(), 1);
        assert_eq!(scene.layer(DEFAULT_LAYER).unwrap().shape_count(), 0);
    }
}
