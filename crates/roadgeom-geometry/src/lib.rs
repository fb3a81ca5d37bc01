//! # Overview
//! `roadgeom_geometry` is the Euclidean geometry and curve kernel crate
//! (spec.md C3 "Euclidean geometry", C4 "Curve kernel"): rotations and
//! poses, validated planar polygons, the Fresnel-integral Euler spiral, the
//! concrete curve segments (line/arc/spiral/cubic/parametric-cubic) and
//! their adaptors (laterally-translated, sectioned, composite), the 3-D
//! lifted curve, and the concrete surfaces (rectangle, circle, cylinder,
//! parametric-bounded surface, parametric sweep).
//!
//! Everything here implements the evaluator contracts in
//! `roadgeom_geotrait`; nothing here knows about roads, lanes, or topology.

#![warn(missing_debug_implementations)]

pub mod rotation;
pub use rotation::*;

pub mod polygon;
pub use polygon::*;

pub mod fresnel;

pub mod curve2d;
pub use curve2d::*;

pub mod curve_adaptors;
pub use curve_adaptors::*;

pub mod curve3d;
pub use curve3d::*;

pub mod surface;
pub use surface::*;
