//! # Overview
//! `roadgeom_road` is the road-space builder and road-object placement
//! crate (spec.md C5 "Road-space builder", C6 "Road-object placement"):
//! lanes and lane sections, the reference/lane-reference curve assembly
//! pipeline, per-lane boundary/surface geometry, and the placement of
//! discrete and swept road objects and signals over the resulting curves.

#![warn(missing_debug_implementations)]

pub mod error;
pub use error::*;

pub mod lane;
pub use lane::*;

pub mod lane_section;
pub use lane_section::*;

pub mod road;
pub use road::*;

pub mod object;
pub use object::*;
