use crate::error::MapError;
use crate::geometry::{winding_of, Orientation, Point};

/// A closed polygon ring: at least three vertices, implicitly closed from
/// the last vertex back to the first, plus the holes cut out of it.
///
/// Vertices are stored in map coordinates; the viewport pan offset is
/// applied at query time, not baked into the points.
#[derive(Debug, Clone)]
pub struct PolygonRing {
    points: Vec<Point>,
    orientation: Orientation,
    holes: Vec<PolygonRing>,
}

impl PolygonRing {
    pub fn new(points: Vec<Point>) -> Result<Self, MapError> {
        if points.len() < 3 {
            return Err(MapError::InvalidGeometry(format!(
                "ring has {} points, need at least 3",
                points.len()
            )));
        }
        let orientation = winding_of(&points);
        Ok(Self {
            points,
            orientation,
            holes: Vec::new(),
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn holes(&self) -> &[PolygonRing] {
        &self.holes
    }

    pub(crate) fn add_hole(&mut self, hole: PolygonRing) {
        self.holes.push(hole);
    }

    /// Reverse the vertex order in place, flipping the cached orientation.
    /// Holes keep their own winding.
    pub fn reverse(&mut self) {
        self.points.reverse();
        self.orientation = self.orientation.opposite();
    }

    /// Every vertex of this ring and its holes, in storage order.
    pub fn all_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points
            .iter()
            .copied()
            .chain(self.holes.iter().flat_map(|h| h.points.iter().copied()))
    }

    /// Ray-casting containment test with the pan offset applied to each
    /// stored vertex. Returns true when `point` falls inside this ring and
    /// outside all of its holes.
    pub fn contains(&self, point: &Point, pan: &Point) -> bool {
        if !self.crossing_test(point, pan) {
            return false;
        }
        !self.holes.iter().any(|hole| hole.contains(point, pan))
    }

    /// The raw crossing test: a horizontal +x ray from `point` toggles on
    /// every panned edge it crosses.
    fn crossing_test(&self, point: &Point, pan: &Point) -> bool {
        let (x, y) = (point.x, point.y);
        let vs = &self.points;
        let mut inside = false;
        let mut j = vs.len() - 1;
        for i in 0..vs.len() {
            let (xi, yi) = (vs[i].x + pan.x, vs[i].y + pan.y);
            let (xj, yj) = (vs[j].x + pan.x, vs[j].y + pan.y);
            let crosses = ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi);
            if crosses {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
