//! Pipeline-level failure kinds (spec.md §7 "Error handling design": the
//! five top-level kinds `InvalidInput`, `GeometryDegenerate`,
//! `TopologyInconsistent`, `NumericFailure`, `ConfigurationInvalid`).
//!
//! The lower crates' own error enums already carry the first three kinds'
//! detail; this enum just wraps them and adds the orchestration-level
//! `ConfigurationInvalid` that has no home further down the stack.

use roadgeom_base::NumericError;
use roadgeom_geotrait::CurveError;
use roadgeom_mesh::MeshError;
use roadgeom_road::RoadBuildError;
use roadgeom_topology::TopologyError;
use thiserror::Error;

/// A failure that aborts either one road or the whole run, depending on
/// variant (spec.md §7).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// the raw model itself is malformed beyond what healing can fix
    /// (spec.md §7 "InvalidInput: abort that road")
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// human-readable reason
        reason: String,
    },
    /// road-space assembly failed (spec.md §7 "GeometryDegenerate: abort
    /// that road")
    #[error("road build failed: {0}")]
    RoadBuild(#[from] RoadBuildError),
    /// a curve evaluation failed outside any per-sample fault-tolerant path
    #[error("curve evaluation failed: {0}")]
    Curve(#[from] CurveError),
    /// a function evaluation failed outside any per-sample fault-tolerant
    /// path (spec.md §7 "NumericFailure")
    #[error("numeric evaluation failed: {0}")]
    Numeric(#[from] NumericError),
    /// the discretiser/filler engine raised a structural failure
    #[error("mesh build failed: {0}")]
    Mesh(#[from] MeshError),
    /// the topology graph rejected an edge (spec.md §7
    /// "TopologyInconsistent: drop that edge, warning" — reaching this
    /// variant means the caller chose not to downgrade it to a warning)
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),
    /// the supplied [`crate::config::Config`] cannot drive any evaluation
    /// (spec.md §7 "ConfigurationInvalid: abort the whole run, exit code 2")
    #[error("invalid configuration: {reason}")]
    ConfigurationInvalid {
        /// human-readable reason
        reason: String,
    },
}
