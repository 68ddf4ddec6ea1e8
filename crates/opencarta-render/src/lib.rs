//! # OpenCarta Render
//!
//! Turns a scene into serializable draw frames for the embedding surface:
//! path commands per shape, dirty-tracked so quiet frames stay empty and
//! pan/zoom repaints everything.

pub mod frame;

pub use frame::{build_frame, PathCommand, RenderFrame, RenderLayer, RenderShape};
