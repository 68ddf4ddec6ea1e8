use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Point};

/// Per-axis clamp range for the zoom scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: Point,
    pub max: Point,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: Point::new(0.1, 0.1),
            max: Point::new(100.0, 100.0),
        }
    }
}

/// Pan/zoom state of the map drawing surface.
///
/// A map point lands on screen at `(map + pan_offset) * zoom_scale *
/// world_scale`, per axis. The pan offset is stored in map units so its
/// screen effect grows with the zoom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    zoom_scale: Point,
    pan_offset: Point,
    zoom_bounds: ZoomBounds,
    zoom_intensity: f64,
    world_scale: f64,
    surface_width: f64,
    surface_height: f64,
}

impl Viewport {
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        Self {
            zoom_scale: Point::new(1.0, 1.0),
            pan_offset: Point::new(0.0, 0.0),
            zoom_bounds: ZoomBounds::default(),
            zoom_intensity: 0.2,
            world_scale: 1.0,
            surface_width,
            surface_height,
        }
    }

    /// Set the fixed map-unit-to-pixel scale. Ignored unless positive.
    pub fn with_world_scale(mut self, scale: f64) -> Self {
        if scale > 0.0 {
            self.world_scale = scale;
        }
        self
    }

    pub fn with_zoom_bounds(mut self, bounds: ZoomBounds) -> Self {
        self.zoom_bounds = bounds;
        self
    }

    pub fn with_zoom_intensity(mut self, intensity: f64) -> Self {
        if intensity > 0.0 {
            self.zoom_intensity = intensity;
        }
        self
    }

    pub fn zoom_scale(&self) -> Point {
        self.zoom_scale
    }

    pub fn pan_offset(&self) -> Point {
        self.pan_offset
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.zoom_bounds
    }

    pub fn zoom_intensity(&self) -> f64 {
        self.zoom_intensity
    }

    pub fn world_scale(&self) -> f64 {
        self.world_scale
    }

    pub fn surface_width(&self) -> f64 {
        self.surface_width
    }

    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }

    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface_width = width;
        self.surface_height = height;
    }

    /// Pan by a screen-pixel delta. The delta is divided by the effective
    /// scale so the map tracks the pointer exactly at any zoom.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_offset.x += dx / (self.zoom_scale.x * self.world_scale);
        self.pan_offset.y += dy / (self.zoom_scale.y * self.world_scale);
    }

    /// Multiplicative zoom step anchored at a screen position: `direction`
    /// is +1 to zoom in, -1 to zoom out. The map point under the anchor
    /// stays put; when both axes are pinned at their bounds the whole step
    /// is a no-op.
    pub fn zoom_at(&mut self, anchor: Point, direction: f64) {
        let factor = (direction * self.zoom_intensity).exp();
        let old = self.zoom_scale;
        self.zoom_scale.x =
            (old.x * factor).clamp(self.zoom_bounds.min.x, self.zoom_bounds.max.x);
        self.zoom_scale.y =
            (old.y * factor).clamp(self.zoom_bounds.min.y, self.zoom_bounds.max.y);
        self.pan_offset.x += anchor.x / (self.zoom_scale.x * self.world_scale)
            - anchor.x / (old.x * self.world_scale);
        self.pan_offset.y += anchor.y / (self.zoom_scale.y * self.world_scale)
            - anchor.y / (old.y * self.world_scale);
    }

    pub fn world_to_screen(&self, point: &Point) -> Point {
        Point::new(
            (point.x + self.pan_offset.x) * self.zoom_scale.x * self.world_scale,
            (point.y + self.pan_offset.y) * self.zoom_scale.y * self.world_scale,
        )
    }

    pub fn screen_to_world(&self, point: &Point) -> Point {
        Point::new(
            point.x / (self.zoom_scale.x * self.world_scale) - self.pan_offset.x,
            point.y / (self.zoom_scale.y * self.world_scale) - self.pan_offset.y,
        )
    }

    /// Remove zoom and world scaling from a screen position, leaving a
    /// point in pan-shifted map coordinates. Hit tests compare this
    /// against stored vertices with the pan offset added back.
    pub fn screen_to_panned(&self, point: &Point) -> Point {
        Point::new(
            point.x / (self.zoom_scale.x * self.world_scale),
            point.y / (self.zoom_scale.y * self.world_scale),
        )
    }

    /// The drawing surface outline as a closed ring in screen coordinates.
    pub fn surface_ring(&self) -> [Point; 5] {
        [
            Point::new(0.0, 0.0),
            Point::new(0.0, self.surface_height),
            Point::new(self.surface_width, self.surface_height),
            Point::new(self.surface_width, 0.0),
            Point::new(0.0, 0.0),
        ]
    }

    /// Zoom and pan so `bbox` fills the surface with a 10% margin,
    /// centered. Degenerate boxes are ignored.
    pub fn fit_bbox(&mut self, bbox: &BBox) {
        let width = bbox.width();
        let height = bbox.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let zoom = (self.surface_width / width).min(self.surface_height / height) * 0.9
            / self.world_scale;
        self.zoom_scale.x = zoom.clamp(self.zoom_bounds.min.x, self.zoom_bounds.max.x);
        self.zoom_scale.y = zoom.clamp(self.zoom_bounds.min.y, self.zoom_bounds.max.y);
        let center = bbox.center();
        self.pan_offset.x =
            self.surface_width / (2.0 * self.zoom_scale.x * self.world_scale) - center.x;
        self.pan_offset.y =
            self.surface_height / (2.0 * self.zoom_scale.y * self.world_scale) - center.y;
    }
}
