//! Curve adaptors: lateral offset, reparameterised sub-sections, and
//! ordered composites of heterogeneous segments (spec.md §3 "Curves", §4.2
//! "Composite-curve dispatch", §9 "Composite, lateral-translated and
//! sectioned are adaptors that contain a base curve").

use crate::curve2d::{check_domain, Curve2DKind};
use cgmath::Vector2;
use roadgeom_base::{Affine2D, Function, Range};
use roadgeom_geotrait::{Curve2D, CurveError, LocalPose2};
use std::cmp::Ordering;

/// A base curve displaced perpendicular to its own tangent by an
/// s-varying lateral offset (spec.md §3: "point at s is the base pose at s
/// translated perpendicularly by f(s); heading combines the base tangent
/// with atan(f'(s))").
#[derive(Debug, Clone, PartialEq)]
pub struct LaterallyTranslatedCurve {
    /// the curve being offset
    pub base: Box<Curve2DKind>,
    /// the lateral offset, positive to the left of travel
    pub offset: Function,
}

impl LaterallyTranslatedCurve {
    /// Builds a laterally translated curve; the offset function's domain
    /// must fuzzily enclose the base curve's own domain.
    pub fn try_new(base: Curve2DKind, offset: Function) -> Result<Self, CurveError> {
        let tol = base.tolerance();
        if !offset.domain().fuzzy_encloses(&base.domain(), tol) {
            return Err(CurveError::GeometryDegenerate {
                reason: "lateral offset function domain does not enclose the base curve's domain".into(),
            });
        }
        Ok(LaterallyTranslatedCurve { base: Box::new(base), offset })
    }
}

impl Curve2D for LaterallyTranslatedCurve {
    fn domain(&self) -> Range<f64> { self.base.domain() }
    fn tolerance(&self) -> f64 { self.base.tolerance() }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        let base_pose = self.base.pose_local(s)?;
        let tol = self.tolerance();
        let f = self
            .offset
            .value_fuzzy(s, tol)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let df = self
            .offset
            .slope(s)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let (sin_h, cos_h) = base_pose.heading.sin_cos();
        // left-normal of the base tangent
        let normal = Vector2::new(-sin_h, cos_h);
        let point = base_pose.point + normal * f;
        let heading = base_pose.heading + df.atan();
        Ok(LocalPose2 { point, heading })
    }
}

/// A sub-interval `[start, start + length]` of a base curve, reparameterised
/// to begin at `0` (backs lane sections and lateral fillers that only span
/// part of a road's reference curve).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionedCurve {
    /// the curve being sectioned
    pub base: Box<Curve2DKind>,
    /// the sub-interval's start, in the base curve's own parameter
    pub start: f64,
    /// the sub-interval's length
    pub length: f64,
    /// whether the upper end is closed
    pub end_closed: bool,
}

impl SectionedCurve {
    /// Builds a sectioned curve; `[start, start+length]` must be fuzzily
    /// enclosed by the base curve's own domain.
    pub fn try_new(base: Curve2DKind, start: f64, length: f64, end_closed: bool) -> Result<Self, CurveError> {
        let tol = base.tolerance();
        if !length.is_finite() || length <= tol {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("sectioned length {length} is not > tolerance {tol}"),
            });
        }
        let sub = if end_closed { Range::closed(start, start + length) } else { Range::half_open(start, start + length) };
        if !base.domain().fuzzy_encloses(&sub, tol) {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("sectioned sub-range [{start}, {}] is not enclosed by the base curve's domain", start + length),
            });
        }
        Ok(SectionedCurve { base: Box::new(base), start, length, end_closed })
    }

    fn own_domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }
}

impl Curve2D for SectionedCurve {
    fn domain(&self) -> Range<f64> { self.own_domain() }
    fn tolerance(&self) -> f64 { self.base.tolerance() }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.own_domain(), self.base.tolerance(), s)?;
        self.base.pose_local(self.start + s)
    }
}

/// One segment of a [`CompositeCurve`], placed by its own affine (spec.md
/// §4.2: "each entry is converted into its local segment ... wrapped in an
/// affine taking (0,0) to (x,y) with rotation heading").
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMember {
    /// the segment's own local-frame curve
    pub curve: Curve2DKind,
    /// the segment's absolute start in the composite's parameter
    pub absolute_start: f64,
    /// the transform from the segment's local frame into the composite's
    pub affine: Affine2D,
}

/// An ordered concatenation of heterogeneous segments over one absolute
/// arc-length parameter (spec.md §3 "Composite curve").
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCurve {
    members: Vec<CurveMember>,
    tolerance: f64,
}

impl CompositeCurve {
    /// Builds a composite curve from `(segment, absolute_start, affine)`
    /// entries, in order. Adjacent entries must be fuzzily contiguous
    /// (spec.md invariant 2); a seam overlap strictly between `tolerance`
    /// and `2*tolerance` is healed by shrinking the earlier member and
    /// reported as a warning string (spec.md §9 open question), a larger
    /// overlap or a gap beyond `tolerance` is rejected.
    pub fn try_new(
        entries: Vec<(Curve2DKind, f64, Affine2D)>,
        tolerance: f64,
    ) -> Result<(CompositeCurve, Vec<String>), CurveError> {
        if entries.is_empty() {
            return Err(CurveError::GeometryDegenerate { reason: "composite curve requires at least one member".into() });
        }
        let mut warnings = Vec::new();
        let mut members: Vec<CurveMember> = Vec::with_capacity(entries.len());
        for (idx, (curve, absolute_start, affine)) in entries.into_iter().enumerate() {
            if let Some(prev) = members.last_mut() {
                let prev_end = prev.absolute_start + prev.curve.length();
                let gap = absolute_start - prev_end;
                if gap < -2.0 * tolerance {
                    return Err(CurveError::GeometryDegenerate {
                        reason: format!("member {idx} overlaps its predecessor by {:.6} (exceeds 2*tolerance)", -gap),
                    });
                } else if gap < -tolerance {
                    let healed_length = prev.curve.length() + gap;
                    warnings.push(format!(
                        "member {idx} overlaps its predecessor by {:.3e}; shrinking predecessor to length {healed_length:.6}"
                    ));
                    prev.curve = prev.curve.with_length(healed_length)?;
                } else if gap.abs() > tolerance {
                    return Err(CurveError::GeometryDegenerate {
                        reason: format!("member {idx} is not contiguous with its predecessor (gap {gap:.6})"),
                    });
                }
            }
            members.push(CurveMember { curve, absolute_start, affine });
        }
        Ok((CompositeCurve { members, tolerance }, warnings))
    }

    /// The composite's members, in order.
    pub fn members(&self) -> &[CurveMember] { &self.members }

    fn select(&self, s: f64) -> Result<(&CurveMember, f64), CurveError> {
        let tol = self.tolerance;
        let idx = self.members.binary_search_by(|m| {
            let start = m.absolute_start;
            let end = start + m.curve.length();
            if s < start - tol {
                Ordering::Greater
            } else if s > end + tol {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        });
        match idx {
            Ok(i) => {
                let member = &self.members[i];
                Ok((member, s - member.absolute_start))
            }
            Err(_) => Err(CurveError::OutOfDomain { s, length: self.length() }),
        }
    }
}

impl Curve2D for CompositeCurve {
    fn domain(&self) -> Range<f64> {
        let last = self.members.last().expect("composite curve always has at least one member");
        Range::closed(0.0, last.absolute_start + last.curve.length())
    }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        let (member, local_s) = self.select(s)?;
        let pose = member
            .curve
            .pose_local(local_s)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let point = member.affine.transform_point(pose.point);
        let heading = pose.heading + member.affine.rotation_angle();
        Ok(LocalPose2 { point, heading })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve2d::{Arc, Line};
    use cgmath::Point2;
    use roadgeom_base::fuzzy_equals;

    #[test]
    fn lateral_translation_offsets_perpendicular() {
        let base = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let offset = Function::Constant { domain: Range::closed(0.0, 10.0), value: 2.0 };
        let lt = LaterallyTranslatedCurve::try_new(base, offset).unwrap();
        let pose = lt.pose_local(5.0).unwrap();
        assert!(fuzzy_equals(pose.point.x, 5.0, 1e-9));
        assert!(fuzzy_equals(pose.point.y, 2.0, 1e-9));
    }

    #[test]
    fn sectioned_curve_reparameterises_from_zero() {
        let base = Curve2DKind::Line(Line::try_new(20.0, true, 1e-7).unwrap());
        let sec = SectionedCurve::try_new(base, 5.0, 10.0, true).unwrap();
        let pose = sec.pose_local(0.0).unwrap();
        assert!(fuzzy_equals(pose.point.x, 5.0, 1e-9));
        let pose_end = sec.pose_local(10.0).unwrap();
        assert!(fuzzy_equals(pose_end.point.x, 15.0, 1e-9));
    }

    #[test]
    fn sectioned_curve_rejects_range_outside_base() {
        let base = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        assert!(SectionedCurve::try_new(base, 5.0, 10.0, true).is_err());
    }

    #[test]
    fn composite_stitches_line_then_arc() {
        // spec.md S4: line (length 5) then arc (curvature 0.2, length 5)
        let line = Curve2DKind::Line(Line::try_new(5.0, false, 1e-7).unwrap());
        let arc = Curve2DKind::Arc(Arc::try_new(0.2, 5.0, true, 1e-7).unwrap());
        let (composite, warnings) = CompositeCurve::try_new(
            vec![
                (line, 0.0, Affine2D::identity()),
                (arc, 5.0, Affine2D::from_pose(Point2::new(5.0, 0.0), 0.0)),
            ],
            1e-7,
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert!(fuzzy_equals(composite.length(), 10.0, 1e-9));

        let at_line_end = composite.pose_local(5.0 - 1e-9).unwrap();
        let at_arc_start = composite.pose_local(5.0).unwrap();
        assert!(fuzzy_equals(at_line_end.point.x, at_arc_start.point.x, 1e-6));
        assert!(fuzzy_equals(at_line_end.point.y, at_arc_start.point.y, 1e-6));
        assert!(fuzzy_equals(at_line_end.heading, at_arc_start.heading, 1e-6));
    }

    #[test]
    fn composite_heals_small_seam_overlap() {
        let line = Curve2DKind::Line(Line::try_new(5.0, false, 1e-7).unwrap());
        let arc = Curve2DKind::Arc(Arc::try_new(0.2, 5.0, true, 1e-7).unwrap());
        let overlap = 1.5e-7; // strictly between tolerance and 2*tolerance
        let (composite, warnings) = CompositeCurve::try_new(
            vec![
                (line, 0.0, Affine2D::identity()),
                (arc, 5.0 - overlap, Affine2D::identity()),
            ],
            1e-7,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(fuzzy_equals(composite.members()[0].curve.length(), 5.0 - overlap, 1e-12));
    }

    #[test]
    fn composite_rejects_large_gap() {
        let line = Curve2DKind::Line(Line::try_new(5.0, false, 1e-7).unwrap());
        let arc = Curve2DKind::Arc(Arc::try_new(0.2, 5.0, true, 1e-7).unwrap());
        let result = CompositeCurve::try_new(
            vec![
                (line, 0.0, Affine2D::identity()),
                (arc, 6.0, Affine2D::identity()),
            ],
            1e-7,
        );
        assert!(result.is_err());
    }
}
