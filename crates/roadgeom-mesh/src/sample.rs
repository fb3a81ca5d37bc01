//! Fault-tolerant curve/surface sampling (spec.md §4.5 "Surface sampling",
//! §4.2 "failures at individual sample points are collected and surfaced
//! as warnings; the sampling continues with the remaining points").

use crate::mesh::{Polyline3D, PolygonMesh};
use cgmath::Point3;
use roadgeom_diagnostics::{Issue, IssueList};
use roadgeom_geotrait::Curve3D;

/// Samples `curve` at `step` into a polyline, skipping (and warning on)
/// any sample whose evaluation fails.
pub fn sample_curve(curve: &dyn Curve3D, step: f64, location: &str, issues: &mut IssueList) -> Polyline3D {
    let tol = curve.tolerance();
    let samples = curve.domain().arrange(step, true, tol);
    let mut points = Vec::with_capacity(samples.len());
    for s in samples {
        match curve.pose_local(s) {
            Ok(pose) => points.push(pose.point),
            Err(e) => issues.push(Issue::dropped(
                "curve-sample-failed",
                location,
                format!("sample at s={s} failed: {e}"),
            )),
        }
    }
    Polyline3D { points }
}

/// Samples the surface bounded by `inner`/`outer` (sharing a common
/// domain) at `step` into a quad mesh (spec.md §4.5 steps 1-3). Any sample
/// whose inner or outer evaluation fails drops that one quad with a
/// warning rather than aborting the whole surface (step 4).
pub fn sample_bounded_surface(
    inner: &dyn Curve3D,
    outer: &dyn Curve3D,
    step: f64,
    location: &str,
    issues: &mut IssueList,
) -> PolygonMesh {
    let tol = inner.tolerance();
    let samples = inner.domain().arrange(step, true, tol);
    let mut polygons = Vec::with_capacity(samples.len().saturating_sub(1));
    for window in samples.windows(2) {
        let (s0, s1) = (window[0], window[1]);
        let quad = (|| -> Result<[Point3<f64>; 4], String> {
            let i0 = inner.pose_local(s0).map_err(|e| e.to_string())?.point;
            let i1 = inner.pose_local(s1).map_err(|e| e.to_string())?.point;
            let o0 = outer.pose_local(s0).map_err(|e| e.to_string())?.point;
            let o1 = outer.pose_local(s1).map_err(|e| e.to_string())?.point;
            Ok([i0, o0, o1, i1])
        })();
        match quad {
            Ok(vertices) => polygons.push(vertices.to_vec()),
            Err(reason) => issues.push(Issue::dropped(
                "surface-sample-failed",
                location,
                format!("quad at s=[{s0},{s1}] skipped: {reason}"),
            )),
        }
    }
    PolygonMesh::from_unchecked_polygons(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgeom_base::{Function, Range};
    use roadgeom_geometry::curve2d::Line;
    use roadgeom_geometry::curve_adaptors::LaterallyTranslatedCurve;
    use roadgeom_geometry::{Curve2DKind, LiftedCurve};

    fn flat_line(length: f64) -> LiftedCurve {
        let planar = Curve2DKind::Line(Line::try_new(length, true, 1e-7).unwrap());
        LiftedCurve::try_new(planar, Function::zero(Range::closed(0.0, length))).unwrap()
    }

    #[test]
    fn sample_curve_produces_arrange_count_points() {
        let curve = flat_line(10.0);
        let mut issues = IssueList::new();
        let polyline = sample_curve(&curve, 1.0, "road[0]/referenceLine", &mut issues);
        assert_eq!(polyline.points.len(), 11);
        assert!(issues.issues().is_empty());
    }

    #[test]
    fn sample_bounded_surface_builds_one_quad_per_step() {
        let reference = flat_line(10.0);
        let planar = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let offset = Function::Constant { domain: Range::closed(0.0, 10.0), value: -3.5 };
        let outer_planar = Curve2DKind::LaterallyTranslated(Box::new(
            LaterallyTranslatedCurve::try_new(planar, offset).unwrap(),
        ));
        let outer = LiftedCurve::try_new(outer_planar, Function::zero(Range::closed(0.0, 10.0))).unwrap();
        let mut issues = IssueList::new();
        let mesh = sample_bounded_surface(&reference, &outer, 1.0, "road[0]/laneSection[0]/lane[-1]", &mut issues);
        assert_eq!(mesh.polygons.len(), 10);
        assert!(issues.issues().is_empty());
    }
}
