//! # Overview
//! `roadgeom_diagnostics` is the structured-issue and raw-model-healing
//! crate (spec.md C9 "Diagnostics/healing"): severities, the per-road issue
//! list, and the generic normalisation primitives every healing pass in
//! `roadgeom-road`/`roadgeom-core` is built from.

#![warn(missing_debug_implementations)]

pub mod issue;
pub use issue::*;

pub mod heal;
pub use heal::*;
