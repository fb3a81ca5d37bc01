//! Road-build failures (spec.md §7 "InvalidInput: malformed raw model
//! structure — abort that road").

use roadgeom_geotrait::CurveError;
use thiserror::Error;

/// Failures raised while assembling a [`crate::road::Road`] from its
/// C9-healed inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoadBuildError {
    /// the plan-view list is empty, or every entry was dropped as
    /// sub-tolerance
    #[error("road has no usable plan-view geometry")]
    EmptyPlanView,
    /// a road has no lane sections (spec.md invariant 4)
    #[error("road has no lane sections")]
    EmptyLaneSections,
    /// a lane section's signed-id set is not a contiguous range including 0
    /// (spec.md invariant 5)
    #[error("lane section {index} has a non-contiguous lane id set")]
    NonContiguousLaneIds {
        /// the offending section's index
        index: usize,
    },
    /// the curve kernel rejected a segment or adaptor built from healed
    /// inputs
    #[error("curve construction failed: {0}")]
    Curve(#[from] CurveError),
    /// a road-object's geometry descriptor could not be classified or
    /// validated
    #[error("road object {id} geometry invalid: {reason}")]
    InvalidObjectGeometry {
        /// the object's identifier
        id: String,
        /// human-readable reason
        reason: String,
    },
}
