//! Road-object placement (spec.md §4.4 C6): curve-relative anchor pose,
//! geometry-descriptor classification, and `repeat` sweep expansion.

use crate::error::RoadBuildError;
use cgmath::{Point3, Vector3};
use roadgeom_base::{Affine3D, AffineSequence, Function, Range};
use roadgeom_geometry::surface::ParametricSweep;
use roadgeom_geometry::{Polygon3D, Rotation3D};
use roadgeom_geotrait::{Curve3D, CurveError, SurfaceLocal};

/// Curve-relative anchor shared by [`RoadObject`] and [`RoadSignal`]
/// (spec.md §4.4: "curve-relative anchor `(s, t, zOffset)`, local rotation
/// `(hdg, pitch, roll)`").
pub trait PlacementAnchor {
    /// arc-length position along the reference curve the object follows
    fn s(&self) -> f64;
    /// lateral offset from the reference curve
    fn t(&self) -> f64;
    /// vertical offset above the reference curve
    fn z_offset(&self) -> f64;
    /// local yaw, ignored when [`Self::perpendicular_to_road`] is set
    /// (SPEC_FULL §D open question 1)
    fn hdg(&self) -> f64;
    /// local pitch
    fn pitch(&self) -> f64;
    /// local roll
    fn roll(&self) -> f64;
    /// when true, the object's yaw is pinned to perpendicular-to-road
    /// (`pi/2`) and `hdg` is ignored
    fn perpendicular_to_road(&self) -> bool;
}

/// Evaluates `path` at `anchor.s()` and composes `P ∘ T ∘ R` (spec.md
/// §4.4 "Placement procedure") into one global affine: `P` is the
/// reference pose, `T` the local `(0, t, zOffset)` translation, `R` the
/// local `(hdg, pitch, roll)` rotation.
pub fn placement_transform(path: &dyn Curve3D, anchor: &impl PlacementAnchor) -> Result<Affine3D, CurveError> {
    let pose = path.pose_local(anchor.s())?;
    let reference_rotation = Rotation3D::new(pose.heading, pose.pitch, pose.roll);
    let p = Affine3D::from_parts(
        Vector3::new(pose.point.x, pose.point.y, pose.point.z),
        reference_rotation.matrix(),
        Vector3::new(1.0, 1.0, 1.0),
    );
    let t = Affine3D::from_translation(Vector3::new(0.0, anchor.t(), anchor.z_offset()));
    let effective_hdg = if anchor.perpendicular_to_road() { std::f64::consts::FRAC_PI_2 } else { anchor.hdg() };
    let r = Affine3D::from_rotation(Rotation3D::new(effective_hdg, anchor.pitch(), anchor.roll()).matrix());
    Ok(AffineSequence::from_vec(vec![p, t, r]).resolve())
}

/// A road object's geometry, classified from whichever of
/// length/width/height/radius/outline the raw model provided (spec.md
/// §4.4 "Geometry classification rules").
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    /// an axis-aligned box, base centered at the local origin
    Cuboid {
        /// extent along local x
        length: f64,
        /// extent along local y
        width: f64,
        /// extent along local z
        height: f64,
    },
    /// a flat rectangle in the local XY plane
    Rectangle {
        /// extent along local x
        length: f64,
        /// extent along local y
        width: f64,
    },
    /// a circular cylinder, axis along local z
    Cylinder {
        /// base radius
        radius: f64,
        /// extrusion height
        height: f64,
    },
    /// a flat circle in the local XY plane
    Circle {
        /// radius
        radius: f64,
    },
    /// an explicit polyhedron/ring outline, already in local corner
    /// coordinates (validated against spec.md invariant 7)
    Outline {
        /// the outline's vertices, in traversal order
        local_corners: Vec<Point3<f64>>,
    },
}

/// Classifies a geometry descriptor from whichever raw attributes are
/// present, in the order spec.md §4.4 mandates: "length+width+height →
/// cuboid; length+width, no height → rectangle; radius+height → cylinder;
/// radius only → circle; else outline."
pub fn classify_geometry(
    id: &str,
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    radius: Option<f64>,
    outline: Option<Vec<Point3<f64>>>,
) -> Result<GeometryDescriptor, RoadBuildError> {
    match (length, width, height, radius) {
        (Some(length), Some(width), Some(height), _) => return Ok(GeometryDescriptor::Cuboid { length, width, height }),
        (Some(length), Some(width), None, _) => return Ok(GeometryDescriptor::Rectangle { length, width }),
        (_, _, Some(height), Some(radius)) => return Ok(GeometryDescriptor::Cylinder { radius, height }),
        (_, _, None, Some(radius)) => return Ok(GeometryDescriptor::Circle { radius }),
        _ => {}
    }
    match outline {
        Some(local_corners) => Ok(GeometryDescriptor::Outline { local_corners }),
        None => Err(RoadBuildError::InvalidObjectGeometry {
            id: id.to_string(),
            reason: "no length/width/height/radius/outline combination matched".into(),
        }),
    }
}

impl GeometryDescriptor {
    /// Tessellates this descriptor into local-frame polygons, validating
    /// the outline variant against spec.md invariant 7.
    pub fn calculate_polygons_local(&self, circle_slices: usize, tolerance: f64) -> Result<Vec<Vec<Point3<f64>>>, RoadBuildError> {
        use roadgeom_geometry::surface::{Circle, Cylinder, Rectangle};
        let polys = match self {
            GeometryDescriptor::Rectangle { length, width } => {
                Rectangle::try_new(*length, *width)?.calculate_polygons_local()?
            }
            GeometryDescriptor::Circle { radius } => Circle::try_new(*radius, circle_slices)?.calculate_polygons_local()?,
            GeometryDescriptor::Cylinder { radius, height } => {
                Cylinder::try_new(*radius, *height, circle_slices)?.calculate_polygons_local()?
            }
            GeometryDescriptor::Cuboid { length, width, height } => cuboid_polygons(*length, *width, *height)?,
            GeometryDescriptor::Outline { local_corners } => {
                let poly = Polygon3D::try_new(local_corners.clone(), tolerance).map_err(|e| {
                    RoadBuildError::InvalidObjectGeometry { id: "<outline>".into(), reason: e.to_string() }
                })?;
                vec![poly.vertices().to_vec()]
            }
        };
        Ok(polys)
    }
}

fn cuboid_polygons(length: f64, width: f64, height: f64) -> Result<Vec<Vec<Point3<f64>>>, RoadBuildError> {
    if !(length.is_finite() && length > 0.0 && width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(RoadBuildError::InvalidObjectGeometry {
            id: "<cuboid>".into(),
            reason: format!("cuboid extents must be positive and finite (length={length}, width={width}, height={height})"),
        });
    }
    let (hl, hw) = (length / 2.0, width / 2.0);
    let bottom = vec![
        Point3::new(-hl, -hw, 0.0),
        Point3::new(hl, -hw, 0.0),
        Point3::new(hl, hw, 0.0),
        Point3::new(-hl, hw, 0.0),
    ];
    let top: Vec<Point3<f64>> = bottom.iter().map(|p| Point3::new(p.x, p.y, height)).collect();
    let mut polys = Vec::with_capacity(6);
    polys.push(bottom.iter().rev().cloned().collect());
    polys.push(top.clone());
    for i in 0..4 {
        let j = (i + 1) % 4;
        polys.push(vec![bottom[i], bottom[j], top[j], top[i]]);
    }
    Ok(polys)
}

/// A discrete road object: a pole, barrier, vegetation, building, parking
/// marker, etc. (spec.md §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct RoadObject {
    /// the object's identifier, as carried in the outbound artefact
    pub id: String,
    /// arc-length anchor along the road reference line
    pub s: f64,
    /// lateral anchor offset
    pub t: f64,
    /// vertical anchor offset
    pub z_offset: f64,
    /// local yaw
    pub hdg: f64,
    /// local pitch
    pub pitch: f64,
    /// local roll
    pub roll: f64,
    /// whether the object's yaw is pinned perpendicular to the road
    pub perpendicular_to_road: bool,
    /// the object's shape
    pub geometry: GeometryDescriptor,
    /// an optional repeat sweep turning this single placement into a
    /// continuous or discretely repeated run
    pub repeat: Option<RepeatSweep>,
}

impl PlacementAnchor for RoadObject {
    fn s(&self) -> f64 { self.s }
    fn t(&self) -> f64 { self.t }
    fn z_offset(&self) -> f64 { self.z_offset }
    fn hdg(&self) -> f64 { self.hdg }
    fn pitch(&self) -> f64 { self.pitch }
    fn roll(&self) -> f64 { self.roll }
    fn perpendicular_to_road(&self) -> bool { self.perpendicular_to_road }
}

/// A road-signal's sign-posted value/unit/dynamic-state, carried
/// alongside the same placement anchor as a [`RoadObject`] (SPEC_FULL §C,
/// grounded on the OpenDRIVE `signal` element).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOrientation {
    /// valid only for traffic travelling in the direction of increasing `s`
    Positive,
    /// valid only for traffic travelling in the direction of decreasing `s`
    Negative,
    /// valid for both directions
    Both,
}

/// A road signal, lowered into the same placement pipeline as
/// [`RoadObject`] but carrying its own value/unit/dynamic attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSignal {
    /// the signal's identifier
    pub id: String,
    /// arc-length anchor
    pub s: f64,
    /// lateral anchor offset
    pub t: f64,
    /// vertical anchor offset
    pub z_offset: f64,
    /// local yaw
    pub hdg: f64,
    /// local pitch
    pub pitch: f64,
    /// local roll
    pub roll: f64,
    /// direction of validity
    pub orientation: SignalOrientation,
    /// the signal's posted value, e.g. a speed limit number
    pub value: Option<f64>,
    /// the value's unit
    pub unit: Option<String>,
    /// true for variable-message / electronically controlled signals
    pub dynamic: bool,
    /// the signal's physical shape
    pub geometry: GeometryDescriptor,
}

impl PlacementAnchor for RoadSignal {
    fn s(&self) -> f64 { self.s }
    fn t(&self) -> f64 { self.t }
    fn z_offset(&self) -> f64 { self.z_offset }
    fn hdg(&self) -> f64 { self.hdg }
    fn pitch(&self) -> f64 { self.pitch }
    fn roll(&self) -> f64 { self.roll }
    fn perpendicular_to_road(&self) -> bool { false }
}

/// A `repeat` element turning a single road-object placement into a
/// continuous sweep (`step == 0`) or a discretely repeated run (`step >
/// 0`) along `[start, start+length]`, with linearly interpolated
/// width/height/lateral/vertical offsets (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatSweep {
    /// absolute start of the repeat run
    pub start: f64,
    /// the run's length; `<= tolerance` drops the object entirely
    /// (SPEC_FULL §D open question 3)
    pub length: f64,
    /// sampling step for discrete repetition; `0` means continuous
    pub step: f64,
    /// lateral offset at the run's start
    pub t_start: f64,
    /// lateral offset at the run's end
    pub t_end: f64,
    /// vertical offset at the run's start
    pub z_offset_start: f64,
    /// vertical offset at the run's end
    pub z_offset_end: f64,
    /// cross-section width at the run's start
    pub width_start: f64,
    /// cross-section width at the run's end
    pub width_end: f64,
    /// cross-section height at the run's start
    pub height_start: f64,
    /// cross-section height at the run's end
    pub height_end: f64,
}

/// One discretely repeated placement: the `s` it was sampled at, plus the
/// resolved global placement transform.
#[derive(Debug, Clone, Copy)]
pub struct RepeatedPlacement {
    /// the sample's absolute `s`
    pub s: f64,
    /// the resolved global transform at this sample
    pub transform: Affine3D,
}

/// The result of expanding a [`RepeatSweep`]: a continuous swept surface,
/// or a list of discrete placements.
pub enum RepeatExpansion {
    /// `step == 0`: a continuous cross-section swept along the path
    Continuous(ParametricSweep),
    /// `step > 0`: discretely sampled placements along the path
    Discrete(Vec<RepeatedPlacement>),
}

/// Expands `repeat` along `path` (spec.md §4.4). Returns `Ok(None)` when
/// the run's length is at or below tolerance, per SPEC_FULL §D open
/// question 3: the caller should record a `WARNING` and drop the object.
pub fn expand_repeat(
    path: Box<dyn Curve3D>,
    repeat: &RepeatSweep,
    tolerance: f64,
    sweep_discretization_step: f64,
) -> Result<Option<RepeatExpansion>, CurveError> {
    if repeat.length <= tolerance {
        return Ok(None);
    }
    let width_fn = Function::of_inclusive_intercept_and_point(repeat.width_start, repeat.length, repeat.width_end);
    let height_fn = Function::of_inclusive_intercept_and_point(repeat.height_start, repeat.length, repeat.height_end);
    if repeat.step <= 0.0 {
        return Ok(Some(RepeatExpansion::Continuous(ParametricSweep {
            path,
            width: width_fn,
            height: height_fn,
            step: sweep_discretization_step,
        })));
    }
    let t_fn = Function::of_inclusive_intercept_and_point(repeat.t_start, repeat.length, repeat.t_end);
    let z_fn = Function::of_inclusive_intercept_and_point(repeat.z_offset_start, repeat.length, repeat.z_offset_end);
    let samples = Range::closed(0.0, repeat.length).arrange(repeat.step, true, tolerance);
    let mut placements = Vec::with_capacity(samples.len());
    for local_s in samples {
        let t = t_fn
            .value_fuzzy(local_s, tolerance)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let z_offset = z_fn
            .value_fuzzy(local_s, tolerance)
            .map_err(|e| CurveError::UpstreamEvaluationFailed { reason: e.to_string() })?;
        let anchor = RepeatSample { s: repeat.start + local_s, t, z_offset };
        let transform = placement_transform(path.as_ref(), &anchor)?;
        placements.push(RepeatedPlacement { s: anchor.s, transform });
    }
    Ok(Some(RepeatExpansion::Discrete(placements)))
}

struct RepeatSample {
    s: f64,
    t: f64,
    z_offset: f64,
}

impl PlacementAnchor for RepeatSample {
    fn s(&self) -> f64 { self.s }
    fn t(&self) -> f64 { self.t }
    fn z_offset(&self) -> f64 { self.z_offset }
    fn hdg(&self) -> f64 { 0.0 }
    fn pitch(&self) -> f64 { 0.0 }
    fn roll(&self) -> f64 { 0.0 }
    fn perpendicular_to_road(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgeom_geometry::curve2d::Line;
    use roadgeom_geometry::{Curve2DKind, LiftedCurve};
    use roadgeom_base::Range;

    fn flat_path() -> LiftedCurve {
        let planar = Curve2DKind::Line(Line::try_new(20.0, true, 1e-7).unwrap());
        LiftedCurve::try_new(planar, Function::zero(Range::closed(0.0, 20.0))).unwrap()
    }

    #[test]
    fn classification_prefers_cuboid_over_rectangle() {
        let g = classify_geometry("obj-1", Some(2.0), Some(1.0), Some(1.5), None, None).unwrap();
        assert_eq!(g, GeometryDescriptor::Cuboid { length: 2.0, width: 1.0, height: 1.5 });
    }

    #[test]
    fn classification_falls_back_to_outline() {
        let corners = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let g = classify_geometry("obj-2", None, None, None, None, Some(corners)).unwrap();
        assert!(matches!(g, GeometryDescriptor::Outline { .. }));
    }

    #[test]
    fn classification_without_any_attribute_fails() {
        assert!(classify_geometry("obj-3", None, None, None, None, None).is_err());
    }

    #[test]
    fn placement_transform_lands_on_reference_pose_at_zero_offset() {
        let path = flat_path();
        let object = RoadObject {
            id: "obj-1".into(),
            s: 5.0,
            t: 0.0,
            z_offset: 0.0,
            hdg: 0.0,
            pitch: 0.0,
            roll: 0.0,
            perpendicular_to_road: false,
            geometry: GeometryDescriptor::Circle { radius: 0.3 },
            repeat: None,
        };
        let transform = placement_transform(&path, &object).unwrap();
        let origin = transform.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((origin.x - 5.0).abs() < 1e-9);
        assert!(origin.y.abs() < 1e-9);
    }

    #[test]
    fn zero_length_repeat_is_dropped() {
        let path: Box<dyn Curve3D> = Box::new(flat_path());
        let repeat = RepeatSweep {
            start: 0.0,
            length: 0.0,
            step: 1.0,
            t_start: 0.0,
            t_end: 0.0,
            z_offset_start: 0.0,
            z_offset_end: 0.0,
            width_start: 1.0,
            width_end: 1.0,
            height_start: 1.0,
            height_end: 1.0,
        };
        assert!(expand_repeat(path, &repeat, 1e-7, 0.3).unwrap().is_none());
    }

    #[test]
    fn discrete_repeat_samples_along_run() {
        let path: Box<dyn Curve3D> = Box::new(flat_path());
        let repeat = RepeatSweep {
            start: 0.0,
            length: 10.0,
            step: 2.0,
            t_start: -3.5,
            t_end: -3.5,
            z_offset_start: 0.0,
            z_offset_end: 0.0,
            width_start: 0.5,
            width_end: 0.5,
            height_start: 1.0,
            height_end: 1.0,
        };
        match expand_repeat(path, &repeat, 1e-7, 0.3).unwrap() {
            Some(RepeatExpansion::Discrete(placements)) => assert_eq!(placements.len(), 6),
            _ => panic!("expected a discrete expansion"),
        }
    }
}
