//! # OpenCarta I/O
//!
//! File ingestion for OpenCarta scenes. Currently GeoJSON
//! FeatureCollections; polygonal features become shapes on a layer of the
//! caller's choosing.

pub mod geojson;

pub use geojson::{import_geojson_str, GeoJsonError, GeoJsonReader};
