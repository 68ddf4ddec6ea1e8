use serde_json::Value;
use uuid::Uuid;

use crate::error::MapError;
use crate::geometry::{point_in_ring, BBox, Point};
use crate::ring::PolygonRing;
use crate::style::{Color, FillPalette, FillState};
use crate::viewport::Viewport;

/// A unique shape identifier.
pub type ShapeId = Uuid;

/// A filled map feature: one or more outer rings with optional holes,
/// a cached bounding box, and the interaction state that drives its fill.
///
/// The vertex data is immutable after construction; only the interaction
/// and visibility caches change.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    rings: Vec<PolygonRing>,
    bbox: BBox,
    fill_state: FillState,
    palette: FillPalette,
    dirty: bool,
    visible: bool,
}

impl Shape {
    /// Build a shape from a nested-array coordinate structure: a bare ring
    /// (`[[x, y], ...]`), a polygon (`[ring, ...]` with holes after the
    /// first ring), or a multi-polygon (`[polygon, ...]`). Coordinate
    /// entries past the first two (GeoJSON altitude) are ignored.
    pub fn from_value(value: &Value) -> Result<Self, MapError> {
        if let Some(points) = as_ring(value) {
            return Self::from_polygon(vec![points]);
        }
        if let Some(rings) = as_polygon(value) {
            return Self::from_polygon(rings);
        }
        if let Some(polygons) = as_multi_polygon(value) {
            return Self::from_multi_polygon(polygons);
        }
        Err(MapError::InvalidGeometry(
            "coordinates are not a ring, polygon, or multi-polygon of numeric pairs".into(),
        ))
    }

    pub fn from_polygon(rings: Vec<Vec<Point>>) -> Result<Self, MapError> {
        Self::from_multi_polygon(vec![rings])
    }

    pub fn from_multi_polygon(polygons: Vec<Vec<Vec<Point>>>) -> Result<Self, MapError> {
        if polygons.is_empty() {
            return Err(MapError::InvalidGeometry("shape has no polygons".into()));
        }
        let mut rings = Vec::new();
        for polygon in polygons {
            classify_rings(polygon, &mut rings)?;
        }
        let bbox = BBox::from_points(rings.iter().flat_map(PolygonRing::all_points))
            .ok_or_else(|| MapError::InvalidGeometry("shape has no vertices".into()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            rings,
            bbox,
            fill_state: FillState::Idle,
            palette: FillPalette::default(),
            dirty: true,
            visible: false,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// The outer rings; holes hang off their owning ring.
    pub fn rings(&self) -> &[PolygonRing] {
        &self.rings
    }

    /// Bounding box over every vertex, holes included.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn fill_state(&self) -> FillState {
        self.fill_state
    }

    pub fn fill_color(&self) -> Color {
        self.palette.color_for(self.fill_state)
    }

    pub fn palette(&self) -> &FillPalette {
        &self.palette
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Last computed viewport visibility; stale until the next
    /// [`update_visibility`](Self::update_visibility).
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True when `point` (in pan-shifted map coordinates) falls inside any
    /// outer ring and outside that ring's holes.
    pub fn contains(&self, point: &Point, pan: &Point) -> bool {
        self.rings.iter().any(|ring| ring.contains(point, pan))
    }

    /// Recompute whether any bounding-box corner lands on the drawing
    /// surface under the current viewport. A visibility flip marks the
    /// shape dirty.
    ///
    /// Known approximation: a shape straddling the surface with all four
    /// corners offscreen is reported not visible.
    pub fn update_visibility(&mut self, viewport: &Viewport) -> bool {
        let surface = viewport.surface_ring();
        let seen = self
            .bbox
            .corners()
            .iter()
            .any(|corner| point_in_ring(&viewport.world_to_screen(corner), &surface));
        if self.visible != seen {
            self.visible = seen;
            self.dirty = true;
        }
        seen
    }

    /// Enter the hovered state unless a click is holding the shape.
    pub fn hover(&mut self) {
        if self.fill_state == FillState::Clicked {
            return;
        }
        self.set_state(FillState::Hovered);
    }

    /// Enter the clicked state. Sticks until the shape is reset.
    pub fn click(&mut self) {
        self.set_state(FillState::Clicked);
    }

    /// Return to the idle state.
    pub fn idle(&mut self) {
        self.set_state(FillState::Idle);
    }

    fn set_state(&mut self, next: FillState) {
        if self.fill_state != next {
            self.fill_state = next;
            self.dirty = true;
        }
    }
}

/// Winding-based outer/hole split for one polygon's ring list. The first
/// ring's winding decides which polarity counts as "outer"; rings wound
/// the other way attach as holes to the most recent outer ring.
fn classify_rings(rings: Vec<Vec<Point>>, out: &mut Vec<PolygonRing>) -> Result<(), MapError> {
    if rings.is_empty() {
        return Err(MapError::InvalidGeometry("polygon has no rings".into()));
    }
    let mut outer_polarity = None;
    for points in rings {
        let ring = PolygonRing::new(points)?;
        let polarity = *outer_polarity.get_or_insert(ring.orientation());
        if ring.orientation() == polarity {
            out.push(ring);
        } else if let Some(owner) = out.last_mut() {
            owner.add_hole(ring);
        }
    }
    Ok(())
}

fn as_coord_pair(value: &Value) -> Option<Point> {
    let arr = value.as_array()?;
    if arr.len() < 2 || !arr.iter().all(Value::is_number) {
        return None;
    }
    Some(Point::new(arr[0].as_f64()?, arr[1].as_f64()?))
}

fn as_ring(value: &Value) -> Option<Vec<Point>> {
    value.as_array()?.iter().map(as_coord_pair).collect()
}

fn as_polygon(value: &Value) -> Option<Vec<Vec<Point>>> {
    value.as_array()?.iter().map(as_ring).collect()
}

fn as_multi_polygon(value: &Value) -> Option<Vec<Vec<Vec<Point>>>> {
    value.as_array()?.iter().map(as_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NO_PAN: Point = Point { x: 0.0, y: 0.0 };

    fn square(origin: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(origin, origin),
            Point::new(origin, origin + size),
            Point::new(origin + size, origin + size),
            Point::new(origin + size, origin),
        ]
    }

    fn reversed(mut points: Vec<Point>) -> Vec<Point> {
        points.reverse();
        points
    }

    #[test]
    fn test_bare_ring_value() {
        let shape =
            Shape::from_value(&json!([[0, 0], [0, 10], [10, 10], [10, 0]])).unwrap();
        assert_eq!(shape.rings().len(), 1);
        assert!(shape.contains(&Point::new(5.0, 5.0), &NO_PAN));
        assert!(!shape.contains(&Point::new(15.0, 15.0), &NO_PAN));
    }

    #[test]
    fn test_polygon_value_with_hole() {
        let shape = Shape::from_value(&json!([
            [[0, 0], [0, 10], [10, 10], [10, 0]],
            [[3, 3], [7, 3], [7, 7], [3, 7]],
        ]))
        .unwrap();
        assert_eq!(shape.rings().len(), 1);
        assert_eq!(shape.rings()[0].holes().len(), 1);
        assert!(!shape.contains(&Point::new(5.0, 5.0), &NO_PAN));
        assert!(shape.contains(&Point::new(1.0, 1.0), &NO_PAN));
    }

    #[test]
    fn test_multi_polygon_value() {
        let shape = Shape::from_value(&json!([
            [[[0, 0], [0, 10], [10, 10], [10, 0]]],
            [[[100, 100], [100, 110], [110, 110], [110, 100]]],
        ]))
        .unwrap();
        assert_eq!(shape.rings().len(), 2);
        assert!(shape.contains(&Point::new(5.0, 5.0), &NO_PAN));
        assert!(shape.contains(&Point::new(105.0, 105.0), &NO_PAN));
        assert!(!shape.contains(&Point::new(50.0, 50.0), &NO_PAN));
    }

    #[test]
    fn test_altitude_entries_ignored() {
        let shape =
            Shape::from_value(&json!([[0, 0, 7.5], [0, 10, 7.5], [10, 10, 7.5], [10, 0, 7.5]]))
                .unwrap();
        assert!(shape.contains(&Point::new(5.0, 5.0), &NO_PAN));
    }

    #[test]
    fn test_non_numeric_leaf_rejected() {
        let err = Shape::from_value(&json!([[1, 2], [3, "x"], [5, 6]])).unwrap_err();
        assert!(matches!(err, MapError::InvalidGeometry(_)));
    }

    #[test]
    fn test_malformed_nesting_rejected() {
        assert!(Shape::from_value(&json!(42)).is_err());
        assert!(Shape::from_value(&json!([])).is_err());
        assert!(Shape::from_value(&json!([[0, 0], [10, 10]])).is_err());
        assert!(Shape::from_value(&json!([[[[[0, 0]]]]])).is_err());
    }

    #[test]
    fn test_first_ring_sets_outer_polarity() {
        // Same two windings in the opposite order: the hole/outer roles swap.
        let outer = square(0.0, 10.0);
        let inner = reversed(square(3.0, 4.0));
        let shape = Shape::from_polygon(vec![outer.clone(), inner.clone()]).unwrap();
        assert_eq!(shape.rings().len(), 1);
        assert_eq!(shape.rings()[0].holes().len(), 1);

        let swapped = Shape::from_polygon(vec![inner, outer]).unwrap();
        assert_eq!(swapped.rings().len(), 1);
        assert_eq!(swapped.rings()[0].holes().len(), 1);
        // Now the small square is the outer ring and the big one its hole,
        // which swallows it entirely: no point is inside.
        assert!(!swapped.contains(&Point::new(1.0, 1.0), &NO_PAN));
        assert!(!swapped.contains(&Point::new(5.0, 5.0), &NO_PAN));
    }

    #[test]
    fn test_holes_attach_to_most_recent_outer() {
        let shape = Shape::from_polygon(vec![
            square(0.0, 10.0),
            square(20.0, 10.0),
            reversed(square(22.0, 2.0)),
            reversed(square(26.0, 2.0)),
        ])
        .unwrap();
        assert_eq!(shape.rings().len(), 2);
        assert!(shape.rings()[0].holes().is_empty());
        assert_eq!(shape.rings()[1].holes().len(), 2);
    }

    #[test]
    fn test_polarity_resets_per_polygon() {
        // First polygon leads clockwise, second counter-clockwise; each
        // still contributes an outer ring.
        let shape = Shape::from_multi_polygon(vec![
            vec![reversed(square(0.0, 10.0))],
            vec![square(100.0, 10.0)],
        ])
        .unwrap();
        assert_eq!(shape.rings().len(), 2);
        assert!(shape.contains(&Point::new(5.0, 5.0), &NO_PAN));
        assert!(shape.contains(&Point::new(105.0, 105.0), &NO_PAN));
    }

    #[test]
    fn test_bbox_spans_all_rings_and_holes() {
        let shape = Shape::from_polygon(vec![square(0.0, 10.0), reversed(square(20.0, 10.0))])
            .unwrap();
        let bbox = shape.bbox();
        assert!((bbox.min.x - 0.0).abs() < 1e-10);
        assert!((bbox.max.x - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_new_shape_starts_dirty_and_idle() {
        let shape = Shape::from_polygon(vec![square(0.0, 10.0)]).unwrap();
        assert!(shape.is_dirty());
        assert!(!shape.is_visible());
        assert_eq!(shape.fill_state(), FillState::Idle);
    }

    #[test]
    fn test_click_sticks_through_hover() {
        let mut shape = Shape::from_polygon(vec![square(0.0, 10.0)]).unwrap();
        shape.click();
        shape.hover();
        assert_eq!(shape.fill_state(), FillState::Clicked);
        shape.idle();
        shape.hover();
        assert_eq!(shape.fill_state(), FillState::Hovered);
    }

    #[test]
    fn test_repeated_transition_does_not_redirty() {
        let mut shape = Shape::from_polygon(vec![square(0.0, 10.0)]).unwrap();
        shape.clear_dirty();
        shape.click();
        assert!(shape.is_dirty());
        shape.clear_dirty();
        shape.click();
        assert!(!shape.is_dirty());
    }

    #[test]
    fn test_visibility_flip_marks_dirty() {
        let mut shape = Shape::from_polygon(vec![square(0.0, 10.0)]).unwrap();
        let mut vp = Viewport::new(100.0, 100.0);
        assert!(shape.update_visibility(&vp));
        shape.clear_dirty();
        assert!(shape.update_visibility(&vp));
        assert!(!shape.is_dirty());

        vp.pan_by(-1000.0, 0.0);
        assert!(!shape.update_visibility(&vp));
        assert!(shape.is_dirty());
    }

    #[test]
    fn test_fill_color_follows_state() {
        let mut shape = Shape::from_polygon(vec![square(0.0, 10.0)]).unwrap();
        assert_eq!(shape.fill_color(), Color::rgb(0xd3, 0xd3, 0xd3));
        shape.hover();
        assert_eq!(shape.fill_color(), Color::rgb(0x37, 0x50, 0xb7));
        shape.click();
        assert_eq!(shape.fill_color(), Color::rgb(0xaa, 0x07, 0x07));
    }
}
