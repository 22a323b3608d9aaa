//! Vertex and polygon model.
//!
//! A polygon is an ordered ring of vertices in image space. It is either
//! empty, open (a chain whose last vertex has no successor) or closed (the
//! last vertex's successor is the first one). The ring is stored as a `Vec`
//! plus a `closed` flag; [`Polygon::next`] exposes the successor relation.

#[cfg(test)]
#[path = "polygon_test.rs"]
mod polygon_test;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::HANDLE_WIDTH_PX;
use crate::hit::Bounds;

/// Minimum number of vertices a polygon needs before it can be closed.
pub const MIN_CLOSED_LEN: usize = 3;

/// A polygon corner in image space with a fixed-size canvas handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point,
    /// Side of the square hit box in canvas pixels. Independent of zoom.
    pub handle_width: f64,
}

impl Vertex {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), handle_width: HANDLE_WIDTH_PX }
    }

    /// Exact image-space equality.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn equals(&self, other: &Vertex) -> bool {
        self.position.x == other.position.x && self.position.y == other.position.y
    }

    /// Move by an image-space delta.
    pub fn translate(&mut self, delta: Point) {
        self.position.x += delta.x;
        self.position.y += delta.y;
    }
}

impl From<Point> for Vertex {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl Bounds for Vertex {
    fn is_within_bounds(&self, pt: Point, camera: &Camera, viewport: Viewport) -> bool {
        let c = camera.image_to_canvas(self.position, viewport);
        let half = self.handle_width / 2.0;
        pt.x >= c.x - half && pt.x <= c.x + half && pt.y >= c.y - half && pt.y <= c.y + half
    }
}

/// An ordered vertex ring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    closed: bool,
}

impl Polygon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a polygon from image-space points. `closed` is ignored when
    /// there are fewer than [`MIN_CLOSED_LEN`] points.
    #[must_use]
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        Self {
            vertices: points.iter().copied().map(Vertex::from).collect(),
            closed: closed && points.len() >= MIN_CLOSED_LEN,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Vertices in ring order, starting at the initial vertex.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn vertex_mut(&mut self, index: usize) -> Option<&mut Vertex> {
        self.vertices.get_mut(index)
    }

    #[must_use]
    pub fn last_vertex(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    /// Index of the successor of `index` in the ring.
    #[must_use]
    pub fn next(&self, index: usize) -> Option<usize> {
        let len = self.vertices.len();
        if index + 1 < len {
            Some(index + 1)
        } else if index + 1 == len && self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// Append a vertex to an open polygon. Returns false if closed.
    pub fn push(&mut self, vertex: Vertex) -> bool {
        if self.closed {
            return false;
        }
        self.vertices.push(vertex);
        true
    }

    /// Link the last vertex back to the first. Returns false when already
    /// closed or too short.
    pub fn close(&mut self) -> bool {
        if self.closed || self.vertices.len() < MIN_CLOSED_LEN {
            return false;
        }
        self.closed = true;
        true
    }

    /// Image-space positions in ring order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Edges as `(from, to)` index pairs, following [`Polygon::next`].
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.vertices.len()).filter_map(|i| self.next(i).map(|j| (i, j)))
    }
}

impl Bounds for Polygon {
    /// Open polygons are hit along their outline (within half a handle).
    /// Closed polygons are also hit anywhere inside.
    fn is_within_bounds(&self, pt: Point, camera: &Camera, viewport: Viewport) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        let canvas: Vec<Point> = self.points().map(|p| camera.image_to_canvas(p, viewport)).collect();
        let slop = HANDLE_WIDTH_PX / 2.0;

        if canvas.len() == 1 {
            return distance(pt, canvas[0]) <= slop;
        }
        let on_outline = self
            .edges()
            .any(|(a, b)| distance_to_segment(pt, canvas[a], canvas[b]) <= slop);
        on_outline || (self.closed && contains_point(&canvas, pt))
    }
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Even-odd ray cast.
fn contains_point(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
