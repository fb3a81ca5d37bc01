//! Structural discretiser failures. Per-sample evaluation failures are
//! never errors here (spec.md §4.2: "failures at individual sample points
//! are collected and surfaced as warnings; sampling continues") — they
//! become `Issue`s on the caller's `IssueList` instead.

use roadgeom_base::LaneId;
use thiserror::Error;

/// Failures raised by the discretiser/filler engine itself, as opposed to
/// per-sample evaluation failures (which are recorded as warnings).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// a configured sampling step was not strictly positive
    #[error("sampling step must be positive, got {0}")]
    NonPositiveStep(f64),
    /// a lane referenced by the topology graph has no corresponding
    /// built geometry (the road it belongs to was not supplied, or
    /// failed to build)
    #[error("lane {lane:?} has no built geometry")]
    UnknownLane {
        /// the missing lane
        lane: LaneId,
    },
}
