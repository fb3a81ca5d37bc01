//! Lane sections and the per-lane offset/boundary/surface geometry derived
//! from them (spec.md §4.3 step 5).

use crate::error::RoadBuildError;
use crate::lane::Lane;
use roadgeom_base::{Function, Range, StackCombinator};
use roadgeom_base::LaneSectionId;
use roadgeom_geometry::{curve_adaptors::LaterallyTranslatedCurve, Curve2DKind, LiftedCurve};
use roadgeom_geometry::surface::ParametricBoundedSurface;
use roadgeom_geotrait::Curve3D;

/// One lane section: a sub-interval `[start, start+length)` of a road,
/// owning a center lane and ordered left/right lanes (spec.md §3 "Road
/// model").
#[derive(Debug, Clone)]
pub struct LaneSection {
    /// this section's identifier
    pub id: LaneSectionId,
    /// absolute start along the road's reference line
    pub start: f64,
    /// section length
    pub length: f64,
    /// the zero-width center lane
    pub center: Lane,
    /// left lanes, ascending by signed id (1, 2, 3, ...)
    pub left: Vec<Lane>,
    /// right lanes, ascending by `|signed id|` (-1, -2, -3, ...)
    pub right: Vec<Lane>,
}

impl LaneSection {
    /// True iff `left`/`right`'s signed ids, together with the center
    /// lane's `0`, form a contiguous integer range with no gaps (spec.md
    /// invariant 5).
    pub fn has_contiguous_lane_ids(&self) -> bool {
        self.left.iter().map(|l| l.signed_id).eq(1..=self.left.len() as i32)
            && self.right.iter().map(|l| l.signed_id).eq((1..=self.right.len() as i32).map(|i| -i))
    }

    fn own_domain(&self) -> Range<f64> { Range::half_open(0.0, self.length) }
}

/// Per-lane lateral offset functions plus the height offsets carried
/// straight from the [`Lane`] (spec.md §4.3: `innerOffset`/`outerOffset`).
#[derive(Debug, Clone)]
pub struct LaneBoundaryGeometry {
    /// the lane's signed id
    pub signed_id: i32,
    /// lateral offset, section-relative `s'`, of the inner boundary
    pub inner_offset: Function,
    /// lateral offset of the outer boundary
    pub outer_offset: Function,
    /// vertical offset of the inner boundary
    pub inner_height_offset: Function,
    /// vertical offset of the outer boundary
    pub outer_height_offset: Function,
}

impl LaneBoundaryGeometry {
    /// The 3-D inner boundary curve: the section's lane-reference curve
    /// laterally translated by `inner_offset`, lifted by the section
    /// elevation plus `inner_height_offset`.
    pub fn inner_boundary(
        &self,
        sectioned_reference: &Curve2DKind,
        section_elevation: &Function,
    ) -> Result<LiftedCurve, RoadBuildError> {
        boundary_curve(sectioned_reference, section_elevation, &self.inner_offset, &self.inner_height_offset)
    }

    /// The 3-D outer boundary curve, analogous to [`Self::inner_boundary`].
    pub fn outer_boundary(
        &self,
        sectioned_reference: &Curve2DKind,
        section_elevation: &Function,
    ) -> Result<LiftedCurve, RoadBuildError> {
        boundary_curve(sectioned_reference, section_elevation, &self.outer_offset, &self.outer_height_offset)
    }

    /// The lane surface bounded by inner/outer boundaries, sampled at
    /// `step` (spec.md §4.3: "surface(s', t') ... linearly interpolate
    /// between inner and outer boundary").
    pub fn surface(
        &self,
        sectioned_reference: &Curve2DKind,
        section_elevation: &Function,
        step: f64,
    ) -> Result<ParametricBoundedSurface, RoadBuildError> {
        let inner: Box<dyn Curve3D> = Box::new(self.inner_boundary(sectioned_reference, section_elevation)?);
        let outer: Box<dyn Curve3D> = Box::new(self.outer_boundary(sectioned_reference, section_elevation)?);
        Ok(ParametricBoundedSurface { inner, outer, step })
    }
}

fn boundary_curve(
    sectioned_reference: &Curve2DKind,
    section_elevation: &Function,
    lateral_offset: &Function,
    height_offset: &Function,
) -> Result<LiftedCurve, RoadBuildError> {
    let planar = Curve2DKind::LaterallyTranslated(Box::new(LaterallyTranslatedCurve::try_new(
        sectioned_reference.clone(),
        lateral_offset.clone(),
    )?));
    let elevation = Function::Stacked {
        combinator: StackCombinator::Sum,
        operands: vec![section_elevation.clone(), height_offset.clone()],
        weights: vec![],
    };
    Ok(LiftedCurve::try_new(planar, elevation)?)
}

/// The full per-lane-section geometry: the sectioned lane-reference curve,
/// its elevation, and every non-center lane's boundary geometry (spec.md
/// §4.3 step 5).
#[derive(Debug, Clone)]
pub struct LaneSectionGeometry {
    /// the owning section's identifier
    pub section_id: LaneSectionId,
    /// the lane-reference curve, reparameterised to start at 0 over this
    /// section's length
    pub sectioned_reference: Curve2DKind,
    /// the lane-reference elevation, reparameterised the same way
    pub section_elevation: Function,
    /// boundary geometry for every non-center lane, in the section's own
    /// left/right order
    pub lanes: Vec<LaneBoundaryGeometry>,
}

/// Builds the per-lane offset/boundary geometry for one lane section
/// (spec.md §4.3 step 5): `innerOffset(s') = sign(i) · Σ_{|j|<|i|}
/// width_j(s')` (or `border(s')` for the innermost lane when present),
/// `outerOffset(s') = innerOffset(s') + sign(i) · width_i(s')`.
pub fn build_lane_section_geometry(
    section: &LaneSection,
    sectioned_reference: Curve2DKind,
    section_elevation: Function,
) -> Result<LaneSectionGeometry, RoadBuildError> {
    if !section.has_contiguous_lane_ids() {
        return Err(RoadBuildError::NonContiguousLaneIds { index: section.id.index });
    }
    let domain = section.own_domain();
    let mut lanes = Vec::with_capacity(section.left.len() + section.right.len());
    lanes.extend(side_boundaries(&section.left, 1.0, domain));
    lanes.extend(side_boundaries(&section.right, -1.0, domain));
    Ok(LaneSectionGeometry { section_id: section.id.clone(), sectioned_reference, section_elevation, lanes })
}

fn side_boundaries(side: &[Lane], sign: f64, domain: Range<f64>) -> Vec<LaneBoundaryGeometry> {
    let mut cumulative_width = Function::zero(domain);
    let mut out = Vec::with_capacity(side.len());
    for lane in side {
        let inner_offset = match &lane.border {
            Some(border) => border.clone(),
            None => scale(&cumulative_width, sign),
        };
        let outer_offset = sum(&inner_offset, &scale(&lane.width, sign));
        out.push(LaneBoundaryGeometry {
            signed_id: lane.signed_id,
            inner_offset,
            outer_offset,
            inner_height_offset: lane.inner_height_offset.clone(),
            outer_height_offset: lane.outer_height_offset.clone(),
        });
        cumulative_width = sum(&cumulative_width, &lane.width);
    }
    out
}

fn scale(f: &Function, factor: f64) -> Function {
    Function::Stacked { combinator: StackCombinator::WeightedSum, operands: vec![f.clone()], weights: vec![factor] }
}

fn sum(a: &Function, b: &Function) -> Function {
    Function::Stacked { combinator: StackCombinator::Sum, operands: vec![a.clone(), b.clone()], weights: vec![] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::LaneType;
    use roadgeom_base::fuzzy_less_or_equal;
    use roadgeom_geometry::curve2d::Line;

    fn constant_lane(signed_id: i32, width: f64, domain: Range<f64>) -> Lane {
        Lane {
            signed_id,
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
    fn offsets_are_monotone_for_positive_ids() {
        // spec.md §8 property 5
        let domain = Range::half_open(0.0, 10.0);
        let left = vec![constant_lane(1, 3.5, domain), constant_lane(2, 2.0, domain)];
        let section = LaneSection {
            id: LaneSectionId::new(roadgeom_base::RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: constant_lane(0, 0.0, domain),
            left,
            right: Vec::new(),
        };
        let sectioned_reference = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let elevation = Function::zero(Range::closed(0.0, 10.0));
        let geom = build_lane_section_geometry(&section, sectioned_reference, elevation).unwrap();
        for lane in &geom.lanes {
            for s in [0.0, 5.0, 9.99] {
                let inner = lane.inner_offset.value(s).unwrap();
                let outer = lane.outer_offset.value(s).unwrap();
                assert!(fuzzy_less_or_equal(0.0, inner, 1e-9));
                assert!(fuzzy_less_or_equal(inner, outer, 1e-9));
            }
        }
        // lane 2 (outermost) inner offset equals lane 1's width
        assert!((geom.lanes[1].inner_offset.value(0.0).unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn non_contiguous_ids_are_rejected() {
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(roadgeom_base::RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: constant_lane(0, 0.0, domain),
            left: vec![constant_lane(2, 3.0, domain)], // missing id 1
            right: Vec::new(),
        };
        let sectioned_reference = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let elevation = Function::zero(Range::closed(0.0, 10.0));
        assert!(build_lane_section_geometry(&section, sectioned_reference, elevation).is_err());
    }

    #[test]
    fn surface_builds_from_inner_outer_boundaries() {
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(roadgeom_base::RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: constant_lane(0, 0.0, domain),
            left: Vec::new(),
            right: vec![constant_lane(-1, 3.5, domain)],
        };
        let sectioned_reference = Curve2DKind::Line(Line::try_new(10.0, true, 1e-7).unwrap());
        let elevation = Function::zero(Range::closed(0.0, 10.0));
        let geom = build_lane_section_geometry(&section, sectioned_reference, elevation).unwrap();
        let lane = &geom.lanes[0];
        let surface = lane.surface(&geom.sectioned_reference, &geom.section_elevation, 1.0).unwrap();
        use roadgeom_geotrait::SurfaceLocal;
        let polys = surface.calculate_polygons_local().unwrap();
        assert_eq!(polys.len(), 10);
        for p in &polys {
            assert_eq!(p.len(), 4);
        }
    }
}
