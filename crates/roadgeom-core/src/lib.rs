//! # Overview
//! `roadgeom_core` is the pipeline's entry point (spec.md §2 "Pipeline
//! stages"): it owns the raw inbound model, the healing pass that turns it
//! into the inputs `roadgeom-road` expects, pipeline-wide configuration,
//! the dataset-wide orchestration that ties together road building,
//! topology, and discretisation, and the outbound artefact model.

#![warn(missing_debug_implementations)]

pub mod config;
pub use config::*;

pub mod error;
pub use error::*;

pub mod raw;
pub use raw::*;

pub mod heal;

pub mod output;
pub use output::*;

pub mod pipeline;
pub use pipeline::*;
