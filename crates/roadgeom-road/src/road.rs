//! The road-space builder (spec.md §4.3 C5): assembles a road's reference
//! curve, lane-reference curve, and per-lane-section geometry from
//! C9-healed plan-view/elevation/lane-section inputs.

use crate::error::RoadBuildError;
use crate::lane_section::{build_lane_section_geometry, LaneSection, LaneSectionGeometry};
use roadgeom_base::{Affine2D, Function, LaneSectionId, Range, RoadId};
use roadgeom_diagnostics::{Issue, IssueList};
use roadgeom_geometry::curve2d::{Arc, Cubic, Line, ParamRange, ParametricCubic, Spiral};
use roadgeom_geometry::curve_adaptors::LaterallyTranslatedCurve;
use roadgeom_geometry::{CompositeCurve, Curve2DKind, LiftedCurve};
use roadgeom_geotrait::Curve2D;
use cgmath::Point2;

/// One plan-view entry: a healed geometry record anchored at absolute `s`
/// (spec.md §4.3 "Inputs": "planar geometry list, each item: absolute
/// start `s`, `(x,y,heading)` anchor, length, shape").
#[derive(Debug, Clone, PartialEq)]
pub struct PlanViewEntry {
    /// absolute start along the road
    pub start: f64,
    /// anchor x
    pub x: f64,
    /// anchor y
    pub y: f64,
    /// anchor heading, radians
    pub heading: f64,
    /// the segment's own length
    pub length: f64,
    /// the segment's shape
    pub shape: GeometryShape,
}

/// The shape of one [`PlanViewEntry`], mirroring OpenDRIVE's plan-view
/// geometry union (spec.md §4.3: "shape = one of line/spiral/arc/poly3/
/// parampoly3").
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryShape {
    /// a straight line
    Line,
    /// a constant-curvature arc
    Arc {
        /// signed curvature
        curvature: f64,
    },
    /// a Euler spiral, curvature linear in `s`
    Spiral {
        /// curvature at the segment's start
        curvature_start: f64,
        /// curvature at the segment's end
        curvature_end: f64,
    },
    /// an explicit cubic `y(x) = a+bx+cx^2+dx^3`
    Poly3 {
        /// constant coefficient
        a: f64,
        /// linear coefficient
        b: f64,
        /// quadratic coefficient
        c: f64,
        /// cubic coefficient
        d: f64,
    },
    /// a parametric cubic `u(p), v(p)`
    ParamPoly3 {
        /// u(p) coefficients
        u: [f64; 4],
        /// v(p) coefficients
        v: [f64; 4],
        /// how `p` relates to arc length
        p_range: ParamRange,
    },
}

/// A healed piecewise-cubic profile entry local to its own `[0, length]`
/// (elevation, super-elevation, width, border, height-offset lists all
/// share this shape, spec.md §4.3 "Inputs").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEntry {
    /// where this entry starts, relative to whatever the caller's absolute
    /// origin is (road `s` for elevation/super-elevation, section-relative
    /// `s'` for lane width/border/height-offset)
    pub start: f64,
    /// this entry's own extent; the last entry in a list is extended to
    /// cover the remainder (spec.md §4.3 step 2)
    pub length: f64,
    /// constant coefficient
    pub a: f64,
    /// linear coefficient
    pub b: f64,
    /// quadratic coefficient
    pub c: f64,
    /// cubic coefficient
    pub d: f64,
}

/// Builds a [`Function::Piecewise`] from sorted, contiguous [`CubicEntry`]
/// records, each reparameterised via [`Function::Sectioned`] so its own
/// polynomial is evaluated relative to its own start (spec.md §4.3 step
/// 2). The final entry's domain is stretched to `total_length` so the
/// profile covers the whole curve it annotates.
pub fn build_piecewise_cubic(entries: &[CubicEntry], total_length: f64) -> Function {
    if entries.is_empty() {
        return Function::zero(Range::closed(0.0, total_length));
    }
    let n = entries.len();
    let pieces = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let upper = if i + 1 == n { total_length } else { e.start + e.length };
            let domain = if i + 1 == n { Range::closed(0.0, upper - e.start) } else { Range::half_open(0.0, upper - e.start) };
            let poly = Function::Polynomial { domain, a: e.a, b: e.b, c: e.c, d: e.d };
            Function::Sectioned { inner: Box::new(poly), offset: e.start }
        })
        .collect();
    Function::Piecewise { pieces }
}

fn local_segment(entry: &PlanViewEntry, end_closed: bool, tolerance: f64) -> Result<Curve2DKind, RoadBuildError> {
    let kind = match &entry.shape {
        GeometryShape::Line => Curve2DKind::Line(Line::try_new(entry.length, end_closed, tolerance)?),
        GeometryShape::Arc { curvature } => {
            Curve2DKind::Arc(Arc::try_new(*curvature, entry.length, end_closed, tolerance)?)
        }
        GeometryShape::Spiral { curvature_start, curvature_end } => {
            let rate = (curvature_end - curvature_start) / entry.length;
            Curve2DKind::Spiral(Spiral::try_new(*curvature_start, rate, entry.length, end_closed, tolerance)?)
        }
        GeometryShape::Poly3 { a, b, c, d } => {
            Curve2DKind::Cubic(Cubic::try_new(*a, *b, *c, *d, entry.length, end_closed, tolerance)?)
        }
        GeometryShape::ParamPoly3 { u, v, p_range } => Curve2DKind::ParametricCubic(ParametricCubic::try_new(
            *u,
            *v,
            *p_range,
            entry.length,
            end_closed,
            tolerance,
        )?),
    };
    Ok(kind)
}

/// Builds the planar reference composite curve from a road's plan-view
/// list (spec.md §4.3 step 1). Sub-tolerance entries are dropped with a
/// warning rather than rejecting the whole road.
pub fn build_reference_plan_view(
    entries: &[PlanViewEntry],
    tolerance: f64,
    location: &str,
    issues: &mut IssueList,
) -> Result<CompositeCurve, RoadBuildError> {
    let usable: Vec<&PlanViewEntry> = entries
        .iter()
        .filter(|e| {
            if e.length.is_finite() && e.length > tolerance {
                true
            } else {
                issues.push(Issue::dropped(
                    "plan-view-sub-tolerance",
                    location,
                    format!("plan-view entry at s={} has length {} <= tolerance, dropped", e.start, e.length),
                ));
                false
            }
        })
        .collect();
    if usable.is_empty() {
        return Err(RoadBuildError::EmptyPlanView);
    }
    let last = usable.len() - 1;
    let composite_entries = usable
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let segment = local_segment(e, i == last, tolerance)?;
            let affine = Affine2D::from_pose(Point2::new(e.x, e.y), e.heading);
            Ok((segment, e.start, affine))
        })
        .collect::<Result<Vec<_>, RoadBuildError>>()?;
    let (composite, warnings) = CompositeCurve::try_new(composite_entries, tolerance)?;
    for w in warnings {
        issues.push(Issue::healed("plan-view-seam-healed", location, w));
    }
    Ok(composite)
}

/// A fully built road: its 3-D reference line, lane-offset function, and
/// ordered lane sections with their derived geometry (spec.md §3 "Road
/// model").
#[derive(Debug)]
pub struct Road {
    /// this road's identifier
    pub id: RoadId,
    /// the 3-D reference curve (planar composite + elevation)
    pub reference_line: LiftedCurve,
    /// the lane-reference curve: the planar reference laterally translated
    /// by `lane_offset`, lifted with the same elevation
    pub lane_reference_line: LiftedCurve,
    /// lateral offset of the lane-reference line vs the road-reference
    /// line, as a function of absolute `s`
    pub lane_offset: Function,
    /// this road's lane sections, ascending by absolute start
    pub lane_sections: Vec<LaneSection>,
    /// per-section derived boundary/surface geometry, index-aligned with
    /// `lane_sections`
    pub section_geometry: Vec<LaneSectionGeometry>,
}

/// Assembles a [`Road`] from its C9-healed plan-view, elevation, lane
/// offset and lane-section inputs (spec.md §4.3 steps 1-5).
pub struct RoadReferenceBuilder {
    /// the road's identifier
    pub id: RoadId,
    /// the road's plan-view entries, absolute-start sorted
    pub plan_view: Vec<PlanViewEntry>,
    /// elevation profile entries, absolute-start sorted
    pub elevation: Vec<CubicEntry>,
    /// lane-offset profile entries, absolute-start sorted (may be empty,
    /// meaning a zero lane offset)
    pub lane_offset: Vec<CubicEntry>,
    /// lane sections, absolute-start sorted
    pub lane_sections: Vec<LaneSection>,
    /// the tolerance this road is built with
    pub tolerance: f64,
    /// sampling step used when bounding lane surfaces
    pub discretization_step: f64,
}

impl RoadReferenceBuilder {
    /// Runs all five steps of spec.md §4.3 and returns the built road plus
    /// any non-fatal diagnostics raised along the way.
    pub fn build(self) -> Result<(Road, IssueList), RoadBuildError> {
        let mut issues = IssueList::new();
        let location = format!("road[{}]", self.id.0);

        // Step 1: reference 2-D curve.
        let planar_composite = build_reference_plan_view(&self.plan_view, self.tolerance, &location, &mut issues)?;
        let road_length = planar_composite.length();

        // Step 2: elevation function.
        let elevation_fn = build_piecewise_cubic(&self.elevation, road_length);

        // Step 3: 3-D reference curve.
        let reference_planar = Curve2DKind::Composite(Box::new(planar_composite));
        let reference_line = LiftedCurve::try_new(reference_planar.clone(), elevation_fn.clone())?;

        // Step 4: lane-reference curve.
        let lane_offset_fn = build_piecewise_cubic(&self.lane_offset, road_length);
        let lane_ref_planar = Curve2DKind::LaterallyTranslated(Box::new(LaterallyTranslatedCurve::try_new(
            reference_planar,
            lane_offset_fn.clone(),
        )?));
        let lane_reference_line = LiftedCurve::try_new(lane_ref_planar.clone(), elevation_fn.clone())?;

        if self.lane_sections.is_empty() {
            return Err(RoadBuildError::EmptyLaneSections);
        }

        // Step 5: per-section geometry.
        let mut section_geometry = Vec::with_capacity(self.lane_sections.len());
        for section in &self.lane_sections {
            use roadgeom_geometry::curve_adaptors::SectionedCurve;
            let end_closed = section.start + section.length >= road_length - self.tolerance;
            let sectioned = Curve2DKind::Sectioned(Box::new(SectionedCurve::try_new(
                lane_ref_planar.clone(),
                section.start,
                section.length,
                end_closed,
            )?));
            let section_elevation = Function::Sectioned { inner: Box::new(elevation_fn.clone()), offset: section.start };
            section_geometry.push(build_lane_section_geometry(section, sectioned, section_elevation)?);
        }

        let road = Road {
            id: self.id,
            reference_line,
            lane_reference_line,
            lane_offset: lane_offset_fn,
            lane_sections: self.lane_sections,
            section_geometry,
        };
        Ok((road, issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::{Lane, LaneType};

    fn straight_plan_view() -> Vec<PlanViewEntry> {
        vec![PlanViewEntry { start: 0.0, x: 0.0, y: 0.0, heading: 0.0, length: 10.0, shape: GeometryShape::Line }]
    }

    fn one_right_lane(width: f64, domain: Range<f64>) -> Lane {
        Lane {
            signed_id: -1,
            width: Function::Constant { domain, value: width },
            border: None,
            inner_height_offset: Function::zero(domain),
            outer_height_offset: Function::zero(domain),
            lane_type: LaneType::Driving,
            road_marks: Vec::new(),
            material: Vec::new(),
            speed: Vec::new(),
            access: Vec::new(),
        }
    }

    #[test]
    fn builds_straight_road_with_one_lane_section() {
        // spec.md S1: a single line plan-view, one right lane, width 3.5
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: one_right_lane(0.0, domain),
            left: Vec::new(),
            right: vec![one_right_lane(3.5, domain)],
        };
        let builder = RoadReferenceBuilder {
            id: RoadId(1),
            plan_view: straight_plan_view(),
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![section],
            tolerance: 1e-7,
            discretization_step: 1.0,
        };
        let (road, issues) = builder.build().unwrap();
        assert!(!issues.is_fatal());
        assert_eq!(road.section_geometry.len(), 1);
        let lane = &road.section_geometry[0].lanes[0];
        let outer = lane
            .outer_boundary(&road.section_geometry[0].sectioned_reference, &road.section_geometry[0].section_elevation)
            .unwrap();
        use roadgeom_geotrait::Curve3D;
        let pose = outer.pose_local(5.0).unwrap();
        assert!((pose.point.y + 3.5).abs() < 1e-6);
        assert!((pose.point.z).abs() < 1e-9);
    }

    #[test]
    fn drops_sub_tolerance_plan_view_entry_with_warning() {
        let mut entries = straight_plan_view();
        entries.push(PlanViewEntry { start: 10.0, x: 10.0, y: 0.0, heading: 0.0, length: 1e-9, shape: GeometryShape::Line });
        let mut issues = IssueList::new();
        let composite = build_reference_plan_view(&entries, 1e-7, "road[1]", &mut issues).unwrap();
        assert_eq!(issues.issues().len(), 1);
        assert!((composite.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_lane_sections_is_rejected() {
        let builder = RoadReferenceBuilder {
            id: RoadId(1),
            plan_view: straight_plan_view(),
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: Vec::new(),
            tolerance: 1e-7,
            discretization_step: 1.0,
        };
        assert!(matches!(builder.build(), Err(RoadBuildError::EmptyLaneSections)));
    }
}
