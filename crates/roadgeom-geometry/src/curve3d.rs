//! A 3-D curve: a 2-D planar curve lifted by an elevation function
//! (spec.md §3: "A 3-D curve wraps a 2-D planar curve plus an elevation
//! function h(s); pose heading becomes (heading(s), pitch = atan(h'(s)), 0)").

use crate::curve2d::Curve2DKind;
use cgmath::Point3;
use roadgeom_base::{Function, Range};
use roadgeom_geotrait::{Curve2D, Curve3D, CurveError, LocalPose3};

/// A planar curve plus an elevation profile.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftedCurve {
    /// the planar (x, y) curve
    pub planar: Curve2DKind,
    /// the elevation function `h(s)`, over the same domain as `planar`
    pub elevation: Function,
}

impl LiftedCurve {
    /// Builds a lifted curve; `elevation`'s domain must fuzzily enclose
    /// `planar`'s.
    pub fn try_new(planar: Curve2DKind, elevation: Function) -> Result<Self, CurveError> {
        let tol = planar.tolerance();
        if !elevation.domain().fuzzy_encloses(&planar.domain(), tol) {
            return Err(CurveError::GeometryDegenerate {
                reason: "elevation function domain does not enclose the planar curve's domain".into(),
            });
        }
        Ok(LiftedCurve { planar, elevation })
    }
}

impl Curve3D for LiftedCurve {
    fn domain(&self) -> Range<f64> { self.planar.domain() }
    fn tolerance(&self) -> f64 { self.planar.tolerance() }
    fn pose_local(&self, s: f64) -> Result<LocalPose3, CurveError> {
        let plane_pose = self.planar.pose_local(s)?;
        let tol = self.tolerance();
        let h = self
            .elevation
            .value_fuzzy(s, tol)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let dh = self
            .elevation
            .slope(s)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        Ok(LocalPose3 {
            point: Point3::new(plane_pose.point.x, plane_pose.point.y, h),
            heading: plane_pose.heading,
            pitch: dh.atan(),
            roll: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve2d::Line;
    use roadgeom_base::fuzzy_equals;

    #[test]
    fn flat_elevation_keeps_zero_height_and_pitch() {
        let planar = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let elevation = Function::zero(Range::closed(0.0, 10.0));
        let lifted = LiftedCurve::try_new(planar, elevation).unwrap();
        let pose = lifted.pose_local(5.0).unwrap();
        assert!(fuzzy_equals(pose.point.z, 0.0, 1e-12));
        assert!(fuzzy_equals(pose.pitch, 0.0, 1e-12));
        assert_eq!(pose.roll, 0.0);
    }

    #[test]
    fn sloped_elevation_produces_matching_pitch() {
        let planar = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let elevation = Function::Linear { domain: Range::closed(0.0, 10.0), slope: 0.5, intercept: 0.0 };
        let lifted = LiftedCurve::try_new(planar, elevation).unwrap();
        let pose = lifted.pose_local(4.0).unwrap();
        assert!(fuzzy_equals(pose.point.z, 2.0, 1e-9));
        assert!(fuzzy_equals(pose.pitch.tan(), 0.5, 1e-9));
    }
}
