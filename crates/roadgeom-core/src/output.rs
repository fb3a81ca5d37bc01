//! The outbound discretised-artefact model (spec.md §6 "Outbound —
//! discretised artefacts"): what a caller gets back from
//! [`crate::pipeline::run`].

use roadgeom_base::RoadId;
use roadgeom_diagnostics::IssueList;
use roadgeom_mesh::{Artefact, ObjectGeometry, PolygonMesh, Polyline3D};

/// Everything discretised from one road.
#[derive(Debug, Clone, Default)]
pub struct RoadArtefacts {
    /// the road this batch belongs to
    pub road_id: Option<RoadId>,
    /// one polygon mesh per lane surface
    pub lane_surfaces: Vec<Artefact<PolygonMesh>>,
    /// one polyline per lane boundary (left, right, centre) plus the
    /// reference line itself
    pub boundaries: Vec<Artefact<Polyline3D>>,
    /// lateral (within-section) filler surfaces
    pub lateral_fillers: Vec<Artefact<PolygonMesh>>,
    /// longitudinal (cross-section, cross-junction) filler surfaces
    pub longitudinal_fillers: Vec<Artefact<PolygonMesh>>,
    /// discretised road-object geometry
    pub objects: Vec<Artefact<ObjectGeometry>>,
    /// discretised road-signal geometry
    pub signals: Vec<Artefact<ObjectGeometry>>,
}

/// The whole run's output: every road's artefacts plus the merged
/// diagnostic list (spec.md §5 "The diagnostic list is per-road, merged at
/// the end by single-producer append").
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// artefacts, one entry per road that built at all (even a road that
    /// failed fatally contributes an empty entry so its issues surface)
    pub roads: Vec<RoadArtefacts>,
    /// every issue raised across every road, in road-then-raised order
    pub issues: IssueList,
}

/// Exit-code mapping (spec.md §6 "Exit codes (orchestration)"): `0` on a
/// clean run, `1` if any road's issues are fatal, `2` is reserved for
/// [`crate::error::PipelineError::ConfigurationInvalid`] and is never
/// produced here (a caller that gets that error never reaches this
/// function at all).
pub fn exit_code(output: &PipelineOutput) -> i32 {
    if output.issues.is_fatal() {
        1
    } else {
        0
    }
}
