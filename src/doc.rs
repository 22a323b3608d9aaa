//! Scene document: the solution polygon, the annotation list, and the answer.
//!
//! This module also owns the import/export schema shared with the host. A
//! polygon travels as an ordered array of `{x, y}` records; a closed ring
//! repeats its first vertex as the last record. Annotations wrap such an
//! array together with a color:
//!
//! ```json
//! [{ "polygon": [{"x": 1, "y": 2}, {"x": 5, "y": 2}, {"x": 3, "y": 6}, {"x": 1, "y": 2}],
//!    "color": "#8dd3c7" }]
//! ```

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::ANNOTATION_COLORS;
use crate::polygon::{MIN_CLOSED_LEN, Polygon, Vertex};

/// Addresses one of the document's polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonRef {
    Solution,
    Annotation(usize),
}

/// Addresses one vertex of one of the document's polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    pub polygon: PolygonRef,
    pub index: usize,
}

/// A colored annotation polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub polygon: Polygon,
    /// CSS color string.
    pub color: String,
}

/// Wire form of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub polygon: Vec<Point>,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    ANNOTATION_COLORS[0].to_string()
}

/// Decode a polygon record. A trailing copy of the first vertex closes the ring.
#[must_use]
pub fn polygon_from_record(points: &[Point]) -> Polygon {
    let closes = points.len() > MIN_CLOSED_LEN && points.first() == points.last();
    if closes {
        Polygon::from_points(&points[..points.len() - 1], true)
    } else {
        Polygon::from_points(points, false)
    }
}

/// Encode a polygon record. Inverse of [`polygon_from_record`].
#[must_use]
pub fn polygon_to_record(polygon: &Polygon) -> Vec<Point> {
    let mut points: Vec<Point> = polygon.points().collect();
    if polygon.is_closed() {
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    }
    points
}

/// All editable and displayable overlay data.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub solution: Option<Polygon>,
    annotations: Vec<Annotation>,
    /// Opaque host data, stored verbatim.
    pub answer: Option<serde_json::Value>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the solution with an imported record.
    pub fn import_solution(&mut self, record: &[Point]) {
        self.solution = Some(polygon_from_record(record));
    }

    /// Replace all annotations with imported records.
    pub fn import_annotations(&mut self, records: &[AnnotationRecord]) {
        self.annotations = records
            .iter()
            .map(|r| Annotation { polygon: polygon_from_record(&r.polygon), color: r.color.clone() })
            .collect();
    }

    /// Export the solution, if any.
    #[must_use]
    pub fn export_solution(&self) -> Option<Vec<Point>> {
        self.solution.as_ref().map(polygon_to_record)
    }

    /// Export every annotation, in order.
    #[must_use]
    pub fn export_annotations(&self) -> Vec<AnnotationRecord> {
        self.annotations
            .iter()
            .map(|a| AnnotationRecord { polygon: polygon_to_record(&a.polygon), color: a.color.clone() })
            .collect()
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Start a new, empty annotation and return its address.
    pub fn push_annotation(&mut self, color: &str) -> PolygonRef {
        self.annotations.push(Annotation { polygon: Polygon::new(), color: color.to_string() });
        PolygonRef::Annotation(self.annotations.len() - 1)
    }

    /// Start a new, empty solution, replacing any existing one.
    pub fn reset_solution(&mut self) -> PolygonRef {
        self.solution = Some(Polygon::new());
        PolygonRef::Solution
    }

    /// Recolor an annotation. Returns false for a solution or unknown index.
    pub fn set_color(&mut self, target: PolygonRef, color: &str) -> bool {
        let PolygonRef::Annotation(index) = target else {
            return false;
        };
        let Some(annotation) = self.annotations.get_mut(index) else {
            return false;
        };
        annotation.color = color.to_string();
        true
    }

    #[must_use]
    pub fn polygon(&self, target: PolygonRef) -> Option<&Polygon> {
        match target {
            PolygonRef::Solution => self.solution.as_ref(),
            PolygonRef::Annotation(index) => self.annotations.get(index).map(|a| &a.polygon),
        }
    }

    pub fn polygon_mut(&mut self, target: PolygonRef) -> Option<&mut Polygon> {
        match target {
            PolygonRef::Solution => self.solution.as_mut(),
            PolygonRef::Annotation(index) => self.annotations.get_mut(index).map(|a| &mut a.polygon),
        }
    }

    #[must_use]
    pub fn vertex(&self, target: VertexRef) -> Option<&Vertex> {
        self.polygon(target.polygon).and_then(|p| p.vertex(target.index))
    }

    pub fn vertex_mut(&mut self, target: VertexRef) -> Option<&mut Vertex> {
        self.polygon_mut(target.polygon).and_then(|p| p.vertex_mut(target.index))
    }

    /// Polygons in hit-test order: annotations first, then the solution.
    #[must_use]
    pub fn hit_order(&self) -> Vec<PolygonRef> {
        let mut refs: Vec<PolygonRef> = (0..self.annotations.len()).map(PolygonRef::Annotation).collect();
        if self.solution.is_some() {
            refs.push(PolygonRef::Solution);
        }
        refs
    }
}
