//! Concrete 2-D curve segments (spec.md §3 "Curves", §4.2). All segments
//! start at the origin with tangent along +x; placement is the caller's
//! (composite curve's) job via an [`roadgeom_base::Affine2D`].

use crate::fresnel::unit_spiral_pose;
use cgmath::{InnerSpace, Point2, Vector2};
use roadgeom_base::{Function, Range};
use roadgeom_geotrait::{Curve2D, CurveError, LocalPose2};

pub(crate) fn check_domain(domain: Range<f64>, tol: f64, s: f64) -> Result<(), CurveError> {
    if domain.fuzzy_contains(s, tol) {
        Ok(())
    } else {
        Err(CurveError::OutOfDomain { s, length: domain.length() })
    }
}

/// A straight segment of the given `length`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// the segment length
    pub length: f64,
    /// whether the upper end is closed (last segment of a composite) or
    /// open (interior segment, so the next segment owns the boundary point)
    pub end_closed: bool,
    /// the tolerance this segment was built with
    pub tolerance: f64,
}

impl Line {
    /// Builds a line, rejecting sub-tolerance lengths (spec.md invariant 1).
    pub fn try_new(length: f64, end_closed: bool, tolerance: f64) -> Result<Self, CurveError> {
        if !length.is_finite() || length <= tolerance {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("line length {length} is not > tolerance {tolerance}"),
            });
        }
        Ok(Line { length, end_closed, tolerance })
    }

    fn domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }
}

impl Curve2D for Line {
    fn domain(&self) -> Range<f64> { Line::domain(self) }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.domain(), self.tolerance, s)?;
        Ok(LocalPose2 { point: Point2::new(s, 0.0), heading: 0.0 })
    }
}

/// A constant-curvature arc (spec.md §4.2 "Arc evaluation").
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// signed curvature, never zero
    pub curvature: f64,
    /// the segment length
    pub length: f64,
    /// whether the upper end is closed
    pub end_closed: bool,
    /// the tolerance this segment was built with
    pub tolerance: f64,
}

impl Arc {
    /// Builds an arc, rejecting zero curvature or sub-tolerance length.
    pub fn try_new(curvature: f64, length: f64, end_closed: bool, tolerance: f64) -> Result<Self, CurveError> {
        if curvature == 0.0 || !curvature.is_finite() {
            return Err(CurveError::GeometryDegenerate { reason: "arc curvature must be nonzero and finite".into() });
        }
        if !length.is_finite() || length <= tolerance {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("arc length {length} is not > tolerance {tolerance}"),
            });
        }
        Ok(Arc { curvature, length, end_closed, tolerance })
    }

    fn domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }
}

impl Curve2D for Arc {
    fn domain(&self) -> Range<f64> { Arc::domain(self) }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.domain(), self.tolerance, s)?;
        let r = 1.0 / self.curvature.abs();
        let sign = self.curvature.signum();
        let center = Point2::new(0.0, sign * r);
        let start_angle = -sign * std::f64::consts::FRAC_PI_2;
        let phi = self.curvature * s;
        let angle = start_angle + phi;
        let point = center + Vector2::new(r * angle.cos(), r * angle.sin());
        Ok(LocalPose2 { point, heading: phi })
    }
}

/// A Euler-spiral (clothoid) segment whose curvature is linear in `s`
/// (spec.md §3 "Spiral", §4.2 "Spiral evaluation").
#[derive(Debug, Clone, PartialEq)]
pub struct Spiral {
    /// `curvature(s) = curvature_start + curvature_rate * s`
    pub curvature_start: f64,
    /// `d(curvature)/ds`, must be nonzero
    pub curvature_rate: f64,
    /// the segment length
    pub length: f64,
    /// whether the upper end is closed
    pub end_closed: bool,
    /// the tolerance this segment was built with
    pub tolerance: f64,
}

impl Spiral {
    /// Builds a spiral segment.
    pub fn try_new(
        curvature_start: f64,
        curvature_rate: f64,
        length: f64,
        end_closed: bool,
        tolerance: f64,
    ) -> Result<Self, CurveError> {
        if curvature_rate == 0.0 || !curvature_rate.is_finite() {
            return Err(CurveError::GeometryDegenerate {
                reason: "spiral curvature rate must be nonzero and finite".into(),
            });
        }
        if !length.is_finite() || length <= tolerance {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("spiral length {length} is not > tolerance {tolerance}"),
            });
        }
        Ok(Spiral { curvature_start, curvature_rate, length, end_closed, tolerance })
    }

    /// The curvature function, expressed as a [`Function::Linear`] whose
    /// lower domain is 0, per spec.md §4.2.
    pub fn curvature_function(&self) -> Function {
        Function::Linear {
            domain: Range::closed(0.0, self.length),
            slope: self.curvature_rate,
            intercept: self.curvature_start,
        }
    }

    fn domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }

    fn sigma0(&self) -> f64 { self.curvature_start / self.curvature_rate }
}

impl Curve2D for Spiral {
    fn domain(&self) -> Range<f64> { Spiral::domain(self) }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.domain(), self.tolerance, s)?;
        // Our Fresnel helper integrates cos/sin(t^2/2) directly (no pi
        // factor pulled out, unlike the classical C(t)/S(t) convention), so
        // the rescaling from the unit spiral is 1/sqrt(|c'|) rather than
        // sqrt(pi/|c'|).
        let scale = 1.0 / self.curvature_rate.abs().sqrt();
        let sign = self.curvature_rate.signum();
        let sigma0 = self.sigma0();
        // l0 is the unit-spiral parameter at which curvature matches this
        // segment's start curvature; l1 advances it by s*sqrt(|c'|).
        let l0 = sigma0 * (self.curvature_rate.abs()).sqrt();
        let l1 = l0 + s * (self.curvature_rate.abs()).sqrt();
        let (p0, h0) = unit_spiral_pose(l0);
        let (p1, h1) = unit_spiral_pose(l1);
        // re-base: translate p0 to origin, rotate by -h0 (un-rotate), then
        // apply the sign/scale to recover the general spiral's geometry.
        let rel = p1 - p0;
        let cos_h0 = h0.cos();
        let sin_h0 = h0.sin();
        let local_x = rel.x * cos_h0 + rel.y * sin_h0;
        let local_y = -rel.x * sin_h0 + rel.y * cos_h0;
        let point = Point2::new(scale * local_x, sign * scale * local_y);
        let heading = sign * (h1 - h0);
        Ok(LocalPose2 { point, heading })
    }
}

/// An explicit cubic `y(x) = a + b*x + c*x^2 + d*x^3`, parameterised
/// directly by `s = x` (the common OpenDRIVE `poly3` simplification).
#[derive(Debug, Clone, PartialEq)]
pub struct Cubic {
    /// constant coefficient
    pub a: f64,
    /// linear coefficient
    pub b: f64,
    /// quadratic coefficient
    pub c: f64,
    /// cubic coefficient
    pub d: f64,
    /// the segment length (in `x`/`s`)
    pub length: f64,
    /// whether the upper end is closed
    pub end_closed: bool,
    /// the tolerance this segment was built with
    pub tolerance: f64,
}

impl Cubic {
    /// Builds a cubic segment, rejecting non-finite coefficients or
    /// sub-tolerance length.
    pub fn try_new(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        length: f64,
        end_closed: bool,
        tolerance: f64,
    ) -> Result<Self, CurveError> {
        if ![a, b, c, d].iter().all(|v| v.is_finite()) {
            return Err(CurveError::GeometryDegenerate { reason: "cubic coefficients must be finite".into() });
        }
        if !length.is_finite() || length <= tolerance {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("cubic length {length} is not > tolerance {tolerance}"),
            });
        }
        Ok(Cubic { a, b, c, d, length, end_closed, tolerance })
    }

    fn domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }

    fn y(&self, x: f64) -> f64 { self.a + x * (self.b + x * (self.c + x * self.d)) }
    fn dy(&self, x: f64) -> f64 { self.b + x * (2.0 * self.c + x * 3.0 * self.d) }
}

impl Curve2D for Cubic {
    fn domain(&self) -> Range<f64> { Cubic::domain(self) }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.domain(), self.tolerance, s)?;
        Ok(LocalPose2 { point: Point2::new(s, self.y(s)), heading: self.dy(s).atan() })
    }
}

/// How a [`ParametricCubic`]'s own parameter `p` relates to arc length `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// `p` ranges over `[0, length]`, same units as `s`
    ArcLength,
    /// `p` ranges over `[0, 1]`, scaled to `s` by `length`
    Normalized,
}

/// A parametric cubic `u(p), v(p)` (spec.md `parampoly3`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricCubic {
    /// u(p) coefficients
    pub u: [f64; 4],
    /// v(p) coefficients
    pub v: [f64; 4],
    /// the parameter range convention
    pub p_range: ParamRange,
    /// the segment length, in `s`
    pub length: f64,
    /// whether the upper end is closed
    pub end_closed: bool,
    /// the tolerance this segment was built with
    pub tolerance: f64,
}

impl ParametricCubic {
    /// Builds a parametric cubic segment.
    pub fn try_new(
        u: [f64; 4],
        v: [f64; 4],
        p_range: ParamRange,
        length: f64,
        end_closed: bool,
        tolerance: f64,
    ) -> Result<Self, CurveError> {
        if !u.iter().chain(v.iter()).all(|x| x.is_finite()) {
            return Err(CurveError::GeometryDegenerate {
                reason: "parametric cubic coefficients must be finite".into(),
            });
        }
        if !length.is_finite() || length <= tolerance {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("parametric cubic length {length} is not > tolerance {tolerance}"),
            });
        }
        Ok(ParametricCubic { u, v, p_range, length, end_closed, tolerance })
    }

    fn domain(&self) -> Range<f64> {
        if self.end_closed { Range::closed(0.0, self.length) } else { Range::half_open(0.0, self.length) }
    }

    fn p_of(&self, s: f64) -> f64 {
        match self.p_range {
            ParamRange::ArcLength => s,
            ParamRange::Normalized => {
                if self.length > 0.0 { s / self.length } else { 0.0 }
            }
        }
    }

    fn eval(coeffs: &[f64; 4], p: f64) -> f64 {
        coeffs[0] + p * (coeffs[1] + p * (coeffs[2] + p * coeffs[3]))
    }
    fn deriv(coeffs: &[f64; 4], p: f64) -> f64 { coeffs[1] + p * (2.0 * coeffs[2] + p * 3.0 * coeffs[3]) }
}

impl Curve2D for ParametricCubic {
    fn domain(&self) -> Range<f64> { ParametricCubic::domain(self) }
    fn tolerance(&self) -> f64 { self.tolerance }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        check_domain(self.domain(), self.tolerance, s)?;
        let p = self.p_of(s);
        let x = Self::eval(&self.u, p);
        let y = Self::eval(&self.v, p);
        let dx = Self::deriv(&self.u, p);
        let dy = Self::deriv(&self.v, p);
        Ok(LocalPose2 { point: Point2::new(x, y), heading: dy.atan2(dx) })
    }
}

/// A tagged sum over all 2-D curve variants, base segments and adaptors
/// alike (spec.md §9: "use a tagged sum type with a single evaluator trait,
/// not deep inheritance").
#[derive(Debug, Clone, PartialEq)]
pub enum Curve2DKind {
    /// a straight segment
    Line(Line),
    /// a constant-curvature arc
    Arc(Arc),
    /// a clothoid segment
    Spiral(Spiral),
    /// an explicit cubic
    Cubic(Cubic),
    /// a parametric cubic
    ParametricCubic(ParametricCubic),
    /// a base curve displaced by an s-varying lateral offset
    LaterallyTranslated(Box<crate::curve_adaptors::LaterallyTranslatedCurve>),
    /// a reparameterised sub-interval of a base curve
    Sectioned(Box<crate::curve_adaptors::SectionedCurve>),
    /// an ordered concatenation of heterogeneous segments
    Composite(Box<crate::curve_adaptors::CompositeCurve>),
}

impl Curve2DKind {
    /// Shrinks the segment's length, used to heal a seam overlap between
    /// `tolerance` and `2*tolerance` (spec.md §9 open question). Only
    /// meaningful for base segments and the adaptors that wrap exactly one
    /// of them; shrinking a composite member is not supported.
    pub fn with_length(&self, new_length: f64) -> Result<Curve2DKind, CurveError> {
        if new_length <= 0.0 {
            return Err(CurveError::GeometryDegenerate {
                reason: format!("cannot shrink curve to non-positive length {new_length}"),
            });
        }
        Ok(match self {
            Curve2DKind::Line(l) => Curve2DKind::Line(Line { length: new_length, ..*l }),
            Curve2DKind::Arc(a) => Curve2DKind::Arc(Arc { length: new_length, ..*a }),
            Curve2DKind::Spiral(sp) => Curve2DKind::Spiral(Spiral { length: new_length, ..*sp }),
            Curve2DKind::Cubic(c) => Curve2DKind::Cubic(Cubic { length: new_length, ..*c }),
            Curve2DKind::ParametricCubic(pc) => {
                Curve2DKind::ParametricCubic(ParametricCubic { length: new_length, ..pc.clone() })
            }
            Curve2DKind::LaterallyTranslated(lt) => {
                let shrunk = lt.base.with_length(new_length)?;
                Curve2DKind::LaterallyTranslated(Box::new(crate::curve_adaptors::LaterallyTranslatedCurve {
                    base: Box::new(shrunk),
                    offset: lt.offset.clone(),
                }))
            }
            Curve2DKind::Sectioned(sec) => {
                Curve2DKind::Sectioned(Box::new(crate::curve_adaptors::SectionedCurve {
                    base: sec.base.clone(),
                    start: sec.start,
                    length: new_length,
                    end_closed: sec.end_closed,
                }))
            }
            Curve2DKind::Composite(_) => {
                return Err(CurveError::GeometryDegenerate {
                    reason: "cannot shrink a composite curve during seam healing".into(),
                })
            }
        })
    }
}

impl Curve2D for Curve2DKind {
    fn domain(&self) -> Range<f64> {
        match self {
            Curve2DKind::Line(c) => c.domain(),
            Curve2DKind::Arc(c) => c.domain(),
            Curve2DKind::Spiral(c) => c.domain(),
            Curve2DKind::Cubic(c) => c.domain(),
            Curve2DKind::ParametricCubic(c) => c.domain(),
            Curve2DKind::LaterallyTranslated(c) => c.domain(),
            Curve2DKind::Sectioned(c) => c.domain(),
            Curve2DKind::Composite(c) => c.domain(),
        }
    }
    fn tolerance(&self) -> f64 {
        match self {
            Curve2DKind::Line(c) => c.tolerance,
            Curve2DKind::Arc(c) => c.tolerance,
            Curve2DKind::Spiral(c) => c.tolerance,
            Curve2DKind::Cubic(c) => c.tolerance,
            Curve2DKind::ParametricCubic(c) => c.tolerance,
            Curve2DKind::LaterallyTranslated(c) => c.tolerance(),
            Curve2DKind::Sectioned(c) => c.tolerance(),
            Curve2DKind::Composite(c) => c.tolerance(),
        }
    }
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError> {
        match self {
            Curve2DKind::Line(c) => c.pose_local(s),
            Curve2DKind::Arc(c) => c.pose_local(s),
            Curve2DKind::Spiral(c) => c.pose_local(s),
            Curve2DKind::Cubic(c) => c.pose_local(s),
            Curve2DKind::ParametricCubic(c) => c.pose_local(s),
            Curve2DKind::LaterallyTranslated(c) => c.pose_local(s),
            Curve2DKind::Sectioned(c) => c.pose_local(s),
            Curve2DKind::Composite(c) => c.pose_local(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgeom_base::fuzzy_equals;

    #[test]
    fn line_is_straight_and_flat_heading() {
        let l = Line::try_new(10.0, true, 1e-7).unwrap();
        let pose = l.pose_local(5.0).unwrap();
        assert!(fuzzy_equals(pose.point.x, 5.0, 1e-9));
        assert!(fuzzy_equals(pose.point.y, 0.0, 1e-9));
        assert_eq!(pose.heading, 0.0);
    }

    #[test]
    fn line_rejects_sub_tolerance_length() {
        assert!(Line::try_new(1e-9, true, 1e-7).is_err());
    }

    #[test]
    fn arc_quarter_turn_ends_at_expected_point() {
        // S2: curvature 1/10, length 10*pi/2 -> endpoint (10, 10), heading pi/2
        let length = 10.0 * std::f64::consts::FRAC_PI_2;
        let a = Arc::try_new(0.1, length, true, 1e-7).unwrap();
        let pose = a.pose_local(length).unwrap();
        assert!(fuzzy_equals(pose.point.x, 10.0, 1e-6));
        assert!(fuzzy_equals(pose.point.y, 10.0, 1e-6));
        assert!(fuzzy_equals(pose.heading, std::f64::consts::FRAC_PI_2, 1e-6));
    }

    #[test]
    fn arc_rejects_zero_curvature() {
        assert!(Arc::try_new(0.0, 10.0, true, 1e-7).is_err());
    }

    #[test]
    fn spiral_matches_heading_formula() {
        // S3: curvature 0 -> 0.01 over length 100 => end heading 0.5
        let sp = Spiral::try_new(0.0, 0.0001, 100.0, true, 1e-7).unwrap();
        let pose = sp.pose_local(100.0).unwrap();
        assert!(fuzzy_equals(pose.heading, 0.5, 1e-6));
    }

    #[test]
    fn spiral_starts_at_origin_with_zero_heading() {
        let sp = Spiral::try_new(0.0, 0.0001, 100.0, true, 1e-7).unwrap();
        let pose = sp.pose_local(0.0).unwrap();
        assert!(fuzzy_equals(pose.point.x, 0.0, 1e-9));
        assert!(fuzzy_equals(pose.point.y, 0.0, 1e-9));
        assert!(fuzzy_equals(pose.heading, 0.0, 1e-9));
    }

    #[test]
    fn cubic_matches_polynomial_and_slope() {
        let c = Cubic::try_new(1.0, 0.1, 0.0, 0.0, 10.0, true, 1e-7).unwrap();
        let pose = c.pose_local(4.0).unwrap();
        assert!(fuzzy_equals(pose.point.y, 1.4, 1e-9));
        assert!(fuzzy_equals(pose.heading.tan(), 0.1, 1e-9));
    }

    #[test]
    fn out_of_domain_is_rejected() {
        let l = Line::try_new(10.0, true, 1e-7).unwrap();
        assert!(l.pose_local(11.0).is_err());
    }
}
