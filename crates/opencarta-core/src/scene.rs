use serde::Serialize;
use serde_json::Value;

use crate::error::MapError;
use crate::geometry::{BBox, Point};
use crate::layer::MapLayer;
use crate::shape::{Shape, ShapeId};
use crate::viewport::Viewport;

/// Name of the layer every scene starts with.
pub const DEFAULT_LAYER: &str = "default";

/// Outcome of a pointer hit test: the topmost matched shape, if any, and
/// whether the surface needs redrawing afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerResponse {
    pub shape: Option<ShapeId>,
    pub redraw: bool,
}

/// The whole interactive map: ordered layers, the viewport, and the
/// bookkeeping that tells the embedder when to redraw.
///
/// Pointer positions come in as raw surface pixels; the scene converts
/// them before dispatching hit tests, so embedders never touch the
/// coordinate math.
#[derive(Debug, Clone)]
pub struct Scene {
    layers: Vec<MapLayer>,
    viewport: Viewport,
    force_redraw: bool,
    pan_anchor: Option<Point>,
    pan_moved: bool,
}

impl Scene {
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        Self::with_viewport(Viewport::new(surface_width, surface_height))
    }

    /// Build a scene around a preconfigured viewport. Starts with the
    /// default layer and a pending full redraw.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            layers: vec![MapLayer::new(DEFAULT_LAYER)],
            viewport,
            force_redraw: true,
            pan_anchor: None,
            pan_moved: false,
        }
    }

    // ── Layers ──────────────────────────────────────────────────────────

    /// Register a new layer at the top of the draw order. Re-using a name
    /// replaces that layer's contents but keeps its position.
    pub fn create_layer(&mut self, name: &str) {
        if let Some(existing) = self.layers.iter_mut().find(|l| l.name() == name) {
            log::warn!("layer '{}' already exists, replacing it", name);
            *existing = MapLayer::new(name);
            self.force_redraw = true;
            return;
        }
        log::debug!("created layer '{}'", name);
        self.layers.push(MapLayer::new(name));
    }

    pub fn remove_layer(&mut self, name: &str) -> Result<MapLayer, MapError> {
        let idx = self
            .layers
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| MapError::UnknownLayer(name.to_string()))?;
        log::debug!("removed layer '{}'", name);
        self.force_redraw = true;
        Ok(self.layers.remove(idx))
    }

    pub fn layer(&self, name: &str) -> Result<&MapLayer, MapError> {
        self.layers
            .iter()
            .find(|l| l.name() == name)
            .ok_or_else(|| MapError::UnknownLayer(name.to_string()))
    }

    pub fn layer_mut(&mut self, name: &str) -> Result<&mut MapLayer, MapError> {
        self.layers
            .iter_mut()
            .find(|l| l.name() == name)
            .ok_or_else(|| MapError::UnknownLayer(name.to_string()))
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [MapLayer] {
        &mut self.layers
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(MapLayer::name).collect()
    }

    pub fn set_layer_hidden(&mut self, name: &str, hidden: bool) -> Result<(), MapError> {
        let layer = self.layer_mut(name)?;
        if layer.is_hidden() != hidden {
            layer.set_hidden(hidden);
            self.force_redraw = true;
        }
        Ok(())
    }

    pub fn toggle_layer(&mut self, name: &str) -> Result<(), MapError> {
        let hidden = self.layer(name)?.is_hidden();
        self.set_layer_hidden(name, !hidden)
    }

    pub fn set_all_layers_hidden(&mut self, hidden: bool) {
        for layer in &mut self.layers {
            layer.set_hidden(hidden);
        }
        self.force_redraw = true;
    }

    // ── Shapes ──────────────────────────────────────────────────────────

    /// Parse a nested-array coordinate structure and add the resulting
    /// shape to the default layer.
    pub fn add_shape(&mut self, geometry: &Value) -> Result<ShapeId, MapError> {
        self.add_shape_to(DEFAULT_LAYER, geometry)
    }

    pub fn add_shape_to(&mut self, layer: &str, geometry: &Value) -> Result<ShapeId, MapError> {
        let shape = Shape::from_value(geometry)?;
        self.insert_shape(layer, shape)
    }

    pub fn insert_shape(&mut self, layer: &str, shape: Shape) -> Result<ShapeId, MapError> {
        Ok(self.layer_mut(layer)?.add_shape(shape))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.layers.iter().find_map(|l| l.shape(id))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.layers.iter_mut().find_map(|l| l.shape_mut(id))
    }

    pub fn clear_layer(&mut self, name: &str) -> Result<(), MapError> {
        let layer = self.layer_mut(name)?;
        if layer.shape_count() > 0 {
            layer.clear();
            self.force_redraw = true;
        }
        Ok(())
    }

    // ── Viewport ────────────────────────────────────────────────────────

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize_surface(&mut self, width: f64, height: f64) {
        self.viewport.set_surface_size(width, height);
        self.force_redraw = true;
    }

    pub fn fit_to_bbox(&mut self, bbox: &BBox) {
        self.viewport.fit_bbox(bbox);
        self.force_redraw = true;
    }

    /// Center and zoom onto a layer's extent. Empty layers are left alone.
    pub fn fit_to_layer(&mut self, name: &str) -> Result<(), MapError> {
        if let Some(bbox) = self.layer(name)?.bounding_box() {
            self.fit_to_bbox(&bbox);
        }
        Ok(())
    }

    // ── Pointer events ──────────────────────────────────────────────────

    /// Click hit test at a surface position. Suppressed while a pan
    /// gesture is active and for the click that ends a moved gesture.
    pub fn pointer_click(&mut self, screen: Point) -> PointerResponse {
        if self.pan_anchor.is_some() {
            return self.no_hit();
        }
        if self.pan_moved {
            self.pan_moved = false;
            return self.no_hit();
        }
        self.dispatch(screen, MapLayer::click)
    }

    /// Hover hit test at a surface position. Suppressed while a pan
    /// gesture is active.
    pub fn pointer_hover(&mut self, screen: Point) -> PointerResponse {
        if self.pan_anchor.is_some() {
            return self.no_hit();
        }
        self.dispatch(screen, MapLayer::hover)
    }

    fn dispatch<F>(&mut self, screen: Point, query: F) -> PointerResponse
    where
        F: Fn(&mut MapLayer, &Point, &Point) -> Option<ShapeId>,
    {
        let point = self.viewport.screen_to_panned(&screen);
        let pan = self.viewport.pan_offset();
        let mut hit = None;
        for layer in &mut self.layers {
            if layer.is_hidden() {
                continue;
            }
            if let Some(id) = query(layer, &point, &pan) {
                hit = Some(id);
            }
        }
        PointerResponse {
            shape: hit,
            redraw: self.needs_redraw(),
        }
    }

    fn no_hit(&self) -> PointerResponse {
        PointerResponse {
            shape: None,
            redraw: self.needs_redraw(),
        }
    }

    /// Start a pan gesture at a surface position.
    pub fn pan_begin(&mut self, screen: Point) {
        self.pan_anchor = Some(screen);
        self.pan_moved = false;
    }

    /// Continue a pan gesture. Returns true when the viewport moved, which
    /// always demands a redraw.
    pub fn pan_move(&mut self, screen: Point) -> bool {
        let Some(last) = self.pan_anchor else {
            return false;
        };
        self.viewport.pan_by(screen.x - last.x, screen.y - last.y);
        self.pan_anchor = Some(screen);
        self.pan_moved = true;
        self.force_redraw = true;
        true
    }

    pub fn pan_end(&mut self) {
        self.pan_anchor = None;
    }

    /// Wheel zoom anchored at a surface position; `direction` is +1 in,
    /// -1 out. Returns whether a redraw is required, which is false when
    /// the zoom is pinned at its bounds.
    pub fn zoom(&mut self, anchor: Point, direction: f64) -> bool {
        let before = self.viewport;
        self.viewport.zoom_at(anchor, direction);
        if before.zoom_scale() != self.viewport.zoom_scale()
            || before.pan_offset() != self.viewport.pan_offset()
        {
            self.force_redraw = true;
        }
        self.needs_redraw()
    }

    // ── Redraw bookkeeping ──────────────────────────────────────────────

    /// True when the next frame has work: a full redraw is pending or some
    /// shape on a visible layer changed.
    pub fn needs_redraw(&self) -> bool {
        self.force_redraw
            || self
                .layers
                .iter()
                .filter(|l| !l.is_hidden())
                .any(|l| l.shapes().iter().any(Shape::is_dirty))
    }

    /// Whether the next frame must repaint everything, pan/zoom changes
    /// included.
    pub fn force_redraw(&self) -> bool {
        self.force_redraw
    }

    /// Acknowledge a completed full redraw pass. Called by the frame
    /// builder, not by embedders.
    pub fn finish_redraw(&mut self) {
        self.force_redraw = false;
    }
}
