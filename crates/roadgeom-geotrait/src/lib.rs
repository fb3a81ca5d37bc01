//! # Overview
//! `roadgeom_geotrait` defines the minimal evaluator contracts that every
//! curve and surface variant in `roadgeom-geometry` implements. Per
//! spec.md §9 "Design notes": polymorphism over curve variants uses a
//! tagged sum type with a single evaluator trait, not deep inheritance; the
//! only required capabilities are `domain`, `tolerance`, `pose_local`.
//!
//! This crate is deliberately tiny and has no dependency on
//! `roadgeom-geometry`, so both that crate and its consumers can share one
//! evaluator vocabulary without a cycle.

#![warn(missing_debug_implementations)]

use cgmath::{Point2, Point3};
use roadgeom_base::Range;
use thiserror::Error;

/// The evaluated local-frame pose of a 2-D curve at a parameter `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPose2 {
    /// the point on the curve
    pub point: Point2<f64>,
    /// the tangent heading, radians, 0 along +x
    pub heading: f64,
}

/// The evaluated local-frame pose of a 3-D curve at a parameter `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPose3 {
    /// the point on the curve
    pub point: Point3<f64>,
    /// heading (yaw), radians
    pub heading: f64,
    /// pitch, radians
    pub pitch: f64,
    /// roll, radians
    pub roll: f64,
}

/// Curve evaluation failure modes (spec.md §4.2: "No exception is ever
/// thrown from the kernel").
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// `s` was not (fuzzily) within the curve's domain
    #[error("s={s} out of domain (length={length})")]
    OutOfDomain {
        /// the queried parameter
        s: f64,
        /// the curve's length, for diagnostics
        length: f64,
    },
    /// the curve's own geometry is degenerate (sub-tolerance length,
    /// non-finite coefficient, zero curvature slope, ...)
    #[error("geometry degenerate: {reason}")]
    GeometryDegenerate {
        /// human-readable reason
        reason: String,
    },
    /// a wrapped/base curve's evaluation failed and the failure is being
    /// propagated by an adaptor (composite, lateral-translated, sectioned)
    #[error("upstream evaluation failed: {reason}")]
    UpstreamEvaluationFailed {
        /// human-readable reason, usually the wrapped error's Display
        reason: String,
    },
}

/// The evaluator contract for a 2-D planar curve (spec.md §3 "Curves").
pub trait Curve2D: std::fmt::Debug {
    /// the curve's arc-length domain
    fn domain(&self) -> Range<f64>;
    /// the tolerance this curve (and its road) was built with
    fn tolerance(&self) -> f64;
    /// `|domain|`
    fn length(&self) -> f64 { self.domain().length() }
    /// the curve's pose at `s`, in its own local frame (before any
    /// affine sequence is applied)
    fn pose_local(&self, s: f64) -> Result<LocalPose2, CurveError>;
}

/// The evaluator contract for a 3-D curve (planar reference + elevation,
/// spec.md §3 "A 3-D curve wraps a 2-D planar curve plus an elevation
/// function").
pub trait Curve3D: std::fmt::Debug {
    /// the curve's arc-length domain
    fn domain(&self) -> Range<f64>;
    /// the tolerance this curve (and its road) was built with
    fn tolerance(&self) -> f64;
    /// `|domain|`
    fn length(&self) -> f64 { self.domain().length() }
    /// the curve's pose at `s`, in its own local frame
    fn pose_local(&self, s: f64) -> Result<LocalPose3, CurveError>;
}

/// The evaluator contract for a surface that can be tessellated into
/// polygons in its own local frame (spec.md §3 "Surfaces").
pub trait SurfaceLocal: std::fmt::Debug {
    /// the polygons making up the surface, in the surface's own local frame
    fn calculate_polygons_local(&self) -> Result<Vec<Vec<Point3<f64>>>, CurveError>;
}
