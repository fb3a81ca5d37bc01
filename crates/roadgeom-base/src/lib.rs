//! # Overview
//! `roadgeom_base` is the foundation crate of the roadgeom workspace: the
//! tolerance discipline every fuzzy comparison in the pipeline goes through,
//! closed/open/unbounded ranges and range sets, univariate functions, and the
//! affine algebra (2-D/3-D transforms, transform sequences, a small SVD) used
//! to compose local-to-global coordinate frames.
//!
//! Nothing in this crate touches curves or roads; it is pure numerics.

#![warn(missing_debug_implementations, unused_qualifications)]

/// re-exports of the linear-algebra types the rest of the workspace builds on
pub mod cgmath64 {
    pub use cgmath::{
        Basis3, Deg, InnerSpace, Matrix2, Matrix3, Matrix4, Point2, Point3, Rad, Rotation,
        Rotation3, Transform, Vector2, Vector3, Vector4, Zero,
    };
}
pub use cgmath64::*;

pub mod tolerance;
pub use tolerance::*;

pub mod range;
pub use range::*;

pub mod function;
pub use function::*;

pub mod affine;
pub use affine::*;

pub mod svd;
pub use svd::*;

pub mod error;
pub use error::*;

pub mod ids;
pub use ids::*;
