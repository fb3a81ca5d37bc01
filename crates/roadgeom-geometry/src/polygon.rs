//! Polygons and their validity checks (spec.md §3 invariant 7).

use cgmath::{InnerSpace, Point3, Vector3};
use roadgeom_base::span_dimension;
use thiserror::Error;

/// Why a candidate polygon/polyhedron outline was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolygonError {
    /// fewer than 3 vertices
    #[error("polygon has fewer than 3 vertices")]
    TooFewVertices,
    /// two consecutive vertices coincide within tolerance
    #[error("consecutive duplicate vertex at index {index}")]
    ConsecutiveDuplicate {
        /// the index of the duplicate
        index: usize,
    },
    /// all vertices are collinear (span dimension < 2)
    #[error("vertices are collinear (span dimension < 2)")]
    Collinear,
    /// vertices are not coplanar within tolerance
    #[error("vertices are not coplanar within tolerance")]
    NotCoplanar,
}

/// A validated planar polygon in 3-D.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon3D {
    vertices: Vec<Point3<f64>>,
}

impl Polygon3D {
    /// Validates `vertices` against spec.md §3 invariant 7: no consecutive
    /// duplicate vertices within `tol`, not all collinear, and all
    /// coplanar within `tol`.
    pub fn try_new(vertices: Vec<Point3<f64>>, tol: f64) -> Result<Self, PolygonError> {
        if vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices);
        }
        let n = vertices.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if (vertices[i] - vertices[j]).magnitude() <= tol {
                return Err(PolygonError::ConsecutiveDuplicate { index: i });
            }
        }
        let dim = span_dimension(&vertices, tol);
        if dim < 2 {
            return Err(PolygonError::Collinear);
        }
        if dim > 2 {
            return Err(PolygonError::NotCoplanar);
        }
        Ok(Polygon3D { vertices })
    }

    /// Builds a polygon without validation; used internally by the
    /// discretiser for quads it has already constructed from curve samples
    /// (which are coplanar by construction when the two boundary polylines
    /// are themselves planar-consistent, but may legitimately be non-planar
    /// for warped surfaces — callers that need the invariant enforced use
    /// `try_new`).
    pub fn new_unchecked(vertices: Vec<Point3<f64>>) -> Self { Polygon3D { vertices } }

    /// The polygon's vertices, in traversal order.
    pub fn vertices(&self) -> &[Point3<f64>] { &self.vertices }

    /// The outward normal under right-hand (counterclockwise as seen from
    /// the normal side) traversal, via Newell's method.
    pub fn normal(&self) -> Vector3<f64> {
        let mut n = Vector3::new(0.0, 0.0, 0.0);
        let verts = &self.vertices;
        for i in 0..verts.len() {
            let a = verts[i];
            let b = verts[(i + 1) % verts.len()];
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        if n.magnitude() > 0.0 { n.normalize() } else { n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_few_vertices() {
        let v = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(Polygon3D::try_new(v, 1e-7), Err(PolygonError::TooFewVertices));
    }

    #[test]
    fn rejects_collinear() {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(Polygon3D::try_new(v, 1e-7), Err(PolygonError::Collinear));
    }

    #[test]
    fn rejects_consecutive_duplicate() {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(matches!(Polygon3D::try_new(v, 1e-7), Err(PolygonError::ConsecutiveDuplicate { .. })));
    }

    #[test]
    fn accepts_planar_quad_and_orients_normal_up() {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let poly = Polygon3D::try_new(v, 1e-7).unwrap();
        let n = poly.normal();
        assert!((n.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_coplanar() {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(Polygon3D::try_new(v, 1e-7), Err(PolygonError::NotCoplanar));
    }
}
