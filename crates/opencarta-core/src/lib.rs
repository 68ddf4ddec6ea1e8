//! # OpenCarta Core
//!
//! Interactive 2D vector-map engine: polygon rings with winding-based
//! hole classification, layered shapes, ray-cast hit testing, pan/zoom
//! viewport math, and the pointer state machine that drives fills.
//!
//! This crate is the heart of OpenCarta; rendering and file ingestion
//! live in their own crates on top of it.

pub mod error;
pub mod geometry;
pub mod layer;
pub mod ring;
pub mod scene;
pub mod shape;
pub mod style;
pub mod viewport;

pub use error::MapError;
pub use geometry::{BBox, Orientation, Point};
pub use layer::MapLayer;
pub use ring::PolygonRing;
pub use scene::{PointerResponse, Scene, DEFAULT_LAYER};
pub use shape::{Shape, ShapeId};
pub use style::{Color, FillPalette, FillState};
pub use viewport::{Viewport, ZoomBounds};
