use crate::geometry::{BBox, Point};
use crate::shape::{Shape, ShapeId};

/// A named, ordered collection of shapes. Shapes are queried and drawn in
/// insertion order, so later shapes sit on top of earlier ones.
#[derive(Debug, Clone)]
pub struct MapLayer {
    name: String,
    shapes: Vec<Shape>,
    hidden: bool,
}

impl MapLayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shapes: Vec::new(),
            hidden: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Union bounding box over all shapes, or `None` for an empty layer.
    pub fn bounding_box(&self) -> Option<BBox> {
        self.shapes
            .iter()
            .map(|s| s.bbox())
            .reduce(|a, b| a.union(&b))
    }

    /// Click hit test over every shape: matches enter the clicked state,
    /// everything else falls back to idle. Returns the last match, the one
    /// drawn on top.
    pub fn click(&mut self, point: &Point, pan: &Point) -> Option<ShapeId> {
        let mut hit = None;
        for shape in &mut self.shapes {
            if shape.contains(point, pan) {
                shape.click();
                hit = Some(shape.id());
            } else {
                shape.idle();
            }
        }
        hit
    }

    /// Hover hit test with the same walk and reset rules as
    /// [`click`](Self::click); matches that are currently clicked keep
    /// their clicked fill.
    pub fn hover(&mut self, point: &Point, pan: &Point) -> Option<ShapeId> {
        let mut hit = None;
        for shape in &mut self.shapes {
            if shape.contains(point, pan) {
                shape.hover();
                hit = Some(shape.id());
            } else {
                shape.idle();
            }
        }
        hit
    }
}
