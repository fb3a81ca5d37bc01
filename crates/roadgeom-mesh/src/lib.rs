//! # Overview
//! `roadgeom_mesh` is the discretiser / filler-surface engine (spec.md C7):
//! fault-tolerant curve and bounded-surface sampling into polygon meshes
//! and polylines, plus lateral (within-section) and longitudinal
//! (cross-section, cross-junction) filler-surface synthesis driven by
//! `roadgeom-topology`'s successor/predecessor queries.

#![warn(missing_debug_implementations)]

pub mod error;
pub use error::*;

pub mod mesh;
pub use mesh::*;

pub mod sample;
pub use sample::*;

pub mod filler;
pub use filler::*;
