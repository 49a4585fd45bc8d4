/// Edge primitives for wireframe rendering
use nalgebra::{Matrix4, Point3};

/// A drawable segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Edge {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// Ordered, append-only list of edges
///
/// Insertion order is preserved. The only in-place change allowed is a bulk
/// transform that moves both endpoints of every edge by the same matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn add_edge(&mut self, start: Point3<f64>, end: Point3<f64>) {
        self.edges.push(Edge::new(start, end));
    }

    /// Connect consecutive points into an open polyline
    pub fn add_polyline(&mut self, points: &[Point3<f64>]) {
        for pair in points.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
    }

    /// Connect consecutive points and close the loop back to the first.
    ///
    /// A two point loop only gets one edge; closing it would retrace it.
    pub fn add_loop(&mut self, points: &[Point3<f64>]) {
        self.add_polyline(points);
        if points.len() > 2 {
            self.add_edge(points[points.len() - 1], points[0]);
        }
    }

    /// Replace every stored point `p` with `m * p`
    pub fn apply_transform(&mut self, m: &Matrix4<f64>) {
        for edge in &mut self.edges {
            edge.start = m.transform_point(&edge.start);
            edge.end = m.transform_point(&edge.end);
        }
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    #[test]
    fn test_add_edge_preserves_order() {
        let mut edges = EdgeList::new();
        edges.add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
        edges.add_edge(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges.edges()[1].start, Point3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_loop_closes() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let mut edges = EdgeList::new();
        edges.add_loop(&points);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges.edges()[2].end, points[0]);

        let mut pair = EdgeList::new();
        pair.add_loop(&points[..2]);
        assert_eq!(pair.len(), 1);
    }

    #[test]
    fn test_translate_round_trip() {
        let mut edges = EdgeList::new();
        edges.add_edge(Point3::new(1.5, -2.0, 3.25), Point3::new(-4.0, 0.5, 9.0));
        edges.add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(7.0, 7.0, -7.0));
        let original = edges.clone();

        edges.apply_transform(&Transform::translation_matrix(10.0, -3.0, 0.5));
        assert!((edges.edges()[0].start.x - 11.5).abs() < 1e-9);
        edges.apply_transform(&Transform::translation_matrix(-10.0, 3.0, -0.5));

        for (after, before) in edges.iter().zip(original.iter()) {
            assert!((after.start - before.start).norm() < 1e-9);
            assert!((after.end - before.end).norm() < 1e-9);
        }
    }

    #[test]
    fn test_clear_empties_list() {
        let mut edges = EdgeList::new();
        edges.add_edge(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        edges.clear();
        assert!(edges.is_empty());
    }
}
