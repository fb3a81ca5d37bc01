//! Lateral and longitudinal filler-surface construction (spec.md §4.5
//! "Lateral filler surfaces", "Longitudinal filler surfaces").

use crate::error::MeshError;
use crate::mesh::{Artefact, PolygonMesh};
use crate::sample::sample_bounded_surface;
use roadgeom_base::{fuzzy_equals, LaneId, RoadId};
use roadgeom_diagnostics::{Issue, IssueList};
use roadgeom_geotrait::{Curve2D, Curve3D};
use roadgeom_road::{LaneSectionGeometry, Road};
use roadgeom_topology::TopologyGraph;
use rustc_hash::FxHashMap;

fn section_length(section: &LaneSectionGeometry) -> f64 {
    section.sectioned_reference.domain().upper.value().unwrap_or(0.0)
}

/// Which end of a junction's connecting road a connection touches
/// (spec.md §6 "contactPoint ∈ {start, end}").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPoint {
    /// the connecting road's own `s = 0` end touches the junction
    Start,
    /// the connecting road's own `s = length` end touches the junction
    End,
}

/// The per-edge contact-point annotation for cross-road topology edges
/// (spec.md §4.5: "if the `contactPoint` is 'end' on the successor, the
/// successor's `start` is used; if 'start', its end is used"). Not needed
/// for edges within the same road, where sections are always adjacent.
#[derive(Debug, Clone, Default)]
pub struct JunctionContacts {
    contacts: FxHashMap<(LaneId, LaneId), ContactPoint>,
}

impl JunctionContacts {
    /// An empty contact-point table.
    pub fn new() -> Self { JunctionContacts::default() }

    /// Records the contact point for the edge `from -> to`.
    pub fn insert(&mut self, from: LaneId, to: LaneId, contact_point: ContactPoint) {
        self.contacts.insert((from, to), contact_point);
    }

    /// The recorded contact point for `from -> to`, if any.
    pub fn get(&self, from: &LaneId, to: &LaneId) -> Option<ContactPoint> {
        self.contacts.get(&(from.clone(), to.clone())).copied()
    }
}

/// A read-only index from `LaneId` to the section geometry and per-lane
/// boundary geometry that built it, spanning every road handed to
/// [`LaneIndex::build`]. Backs longitudinal filler construction, which
/// must follow successor edges across road boundaries.
#[derive(Debug)]
pub struct LaneIndex<'a> {
    entries: FxHashMap<LaneId, (&'a LaneSectionGeometry, usize)>,
}

impl<'a> LaneIndex<'a> {
    /// Indexes every non-center lane of every section of every road in
    /// `roads`.
    pub fn build(roads: impl IntoIterator<Item = &'a Road>) -> Self {
        let mut entries = FxHashMap::default();
        for road in roads {
            for section_geometry in &road.section_geometry {
                for (i, lane) in section_geometry.lanes.iter().enumerate() {
                    let lane_id = LaneId::new(section_geometry.section_id.clone(), lane.signed_id);
                    entries.insert(lane_id, (section_geometry, i));
                }
            }
        }
        LaneIndex { entries }
    }

    fn get(&self, lane_id: &LaneId) -> Option<(&'a LaneSectionGeometry, usize)> {
        self.entries.get(lane_id).copied()
    }
}

/// Builds one filler artefact per pair of laterally adjacent same-side
/// lanes in `section` whose shared edge has mismatched height offsets
/// (spec.md §4.5 "Lateral filler surfaces", S5).
pub fn lateral_fillers(
    road_id: RoadId,
    section: &LaneSectionGeometry,
    step: f64,
    tolerance: f64,
    issues: &mut IssueList,
) -> Vec<Artefact<PolygonMesh>> {
    let mut left: Vec<&_> = section.lanes.iter().filter(|l| l.signed_id > 0).collect();
    left.sort_by_key(|l| l.signed_id);
    let mut right: Vec<&_> = section.lanes.iter().filter(|l| l.signed_id < 0).collect();
    right.sort_by_key(|l| -l.signed_id);

    let mut fillers = Vec::new();
    for side in [&left, &right] {
        for pair in side.windows(2) {
            let (inner_lane, outer_lane) = (pair[0], pair[1]);
            let location = format!(
                "road[{}]/laneSection[{}]/lateralFiller[{}:{}]",
                road_id.0, section.section_id.index, inner_lane.signed_id, outer_lane.signed_id
            );
            let edge_inner = match inner_lane.outer_boundary(&section.sectioned_reference, &section.section_elevation) {
                Ok(c) => c,
                Err(e) => {
                    issues.push(Issue::dropped("lateral-filler-boundary-failed", &location, e.to_string()));
                    continue;
                }
            };
            let edge_outer = match outer_lane.inner_boundary(&section.sectioned_reference, &section.section_elevation) {
                Ok(c) => c,
                Err(e) => {
                    issues.push(Issue::dropped("lateral-filler-boundary-failed", &location, e.to_string()));
                    continue;
                }
            };
            let length = section_length(section);
            let heights_differ = [0.0, length / 2.0, length]
                .into_iter()
                .filter_map(|s| {
                    let a = edge_inner.pose_local(s).ok()?.point;
                    let b = edge_outer.pose_local(s).ok()?.point;
                    Some(!fuzzy_equals(a.z, b.z, tolerance))
                })
                .any(|differs| differs);
            if !heights_differ {
                continue;
            }
            let mesh = sample_bounded_surface(&edge_inner, &edge_outer, step, &location, issues);
            if !mesh.is_empty() {
                fillers.push(Artefact::new(location, mesh));
            }
        }
    }
    fillers
}

/// Builds one filler artefact per successor of `lane_id` (spec.md §4.5
/// "Longitudinal filler surfaces"): same-road successors are joined at
/// the next section's start; cross-road (junction) successors are joined
/// at whichever end `contacts` designates, defaulting to `Start` with an
/// informational issue when unrecorded.
pub fn longitudinal_fillers(
    graph: &TopologyGraph,
    index: &LaneIndex,
    contacts: &JunctionContacts,
    lane_id: &LaneId,
    step: f64,
    issues: &mut IssueList,
) -> Result<Vec<Artefact<PolygonMesh>>, MeshError> {
    let (from_section, from_idx) = index.get(lane_id).ok_or_else(|| MeshError::UnknownLane { lane: lane_id.clone() })?;
    let from_lane = &from_section.lanes[from_idx];
    let from_end = section_length(from_section);

    let mut fillers = Vec::new();
    for successor in graph.successors(lane_id) {
        let location = format!("longitudinalFiller[{lane_id:?}->{successor:?}]");
        let Some((to_section, to_idx)) = index.get(successor) else {
            issues.push(Issue::dropped(
                "topology-inconsistent",
                &location,
                format!("successor {successor:?} has no built geometry"),
            ));
            continue;
        };
        let to_lane = &to_section.lanes[to_idx];
        let same_road = lane_id.section.road == successor.section.road;
        let to_s = if same_road {
            0.0
        } else {
            match contacts.get(lane_id, successor) {
                Some(ContactPoint::Start) => 0.0,
                Some(ContactPoint::End) => section_length(to_section),
                None => {
                    issues.push(Issue::info(
                        "junction-contact-point-assumed",
                        &location,
                        "no contact point recorded for this junction edge, assuming start",
                    ));
                    0.0
                }
            }
        };

        let from_inner = from_lane.inner_boundary(&from_section.sectioned_reference, &from_section.section_elevation);
        let from_outer = from_lane.outer_boundary(&from_section.sectioned_reference, &from_section.section_elevation);
        let to_inner = to_lane.inner_boundary(&to_section.sectioned_reference, &to_section.section_elevation);
        let to_outer = to_lane.outer_boundary(&to_section.sectioned_reference, &to_section.section_elevation);
        let (from_inner, from_outer, to_inner, to_outer) = match (from_inner, from_outer, to_inner, to_outer) {
            (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
            _ => {
                issues.push(Issue::dropped("longitudinal-filler-boundary-failed", &location, "a boundary curve failed to build"));
                continue;
            }
        };

        let corners = (|| -> Result<[cgmath::Point3<f64>; 4], roadgeom_geotrait::CurveError> {
            Ok([
                from_inner.pose_local(from_end)?.point,
                from_outer.pose_local(from_end)?.point,
                to_outer.pose_local(to_s)?.point,
                to_inner.pose_local(to_s)?.point,
            ])
        })();
        match corners {
            Ok(vertices) => {
                let mesh = PolygonMesh::from_unchecked_polygons(vec![vertices.to_vec()]);
                fillers.push(Artefact::new(location, mesh));
            }
            Err(e) => issues.push(Issue::dropped("longitudinal-filler-sample-failed", &location, e.to_string())),
        }
    }
    Ok(fillers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgeom_base::{Function, LaneSectionId, Range};
    use roadgeom_road::{GeometryShape, Lane, LaneType, PlanViewEntry, RoadReferenceBuilder};
    use roadgeom_road::LaneSection;

    fn right_lane(signed_id: i32, width: f64, inner_height: f64, outer_height: f64, domain: Range<f64>) -> Lane {
        Lane {
            signed_id,
            width: Function::Constant { domain, value: width },
            border: None,
            inner_height_offset: Function::Constant { domain, value: inner_height },
            outer_height_offset: Function::Constant { domain, value: outer_height },
            lane_type: LaneType::Driving,
            road_marks: Vec::new(),
            material: Vec::new(),
            speed: Vec::new(),
            access: Vec::new(),
        }
    }

    fn straight_road(id: i64, width: f64) -> Road {
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(RoadId(id), 0),
            start: 0.0,
            length: 10.0,
            center: right_lane(0, 0.0, 0.0, 0.0, domain),
            left: Vec::new(),
            right: vec![right_lane(-1, width, 0.0, 0.0, domain)],
        };
        let builder = RoadReferenceBuilder {
            id: RoadId(id),
            plan_view: vec![PlanViewEntry { start: 0.0, x: 0.0, y: 0.0, heading: 0.0, length: 10.0, shape: GeometryShape::Line }],
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![section],
            tolerance: 1e-7,
            discretization_step: 1.0,
        };
        builder.build().unwrap().0
    }

    #[test]
    fn lateral_filler_emitted_for_mismatched_heights() {
        // spec.md S5
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: right_lane(0, 0.0, 0.0, 0.0, domain),
            left: Vec::new(),
            right: vec![
                right_lane(-1, 3.5, 0.0, 0.0, domain),
                right_lane(-2, 3.0, 0.15, 0.15, domain),
            ],
        };
        let builder = RoadReferenceBuilder {
            id: RoadId(1),
            plan_view: vec![PlanViewEntry { start: 0.0, x: 0.0, y: 0.0, heading: 0.0, length: 10.0, shape: GeometryShape::Line }],
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![section],
            tolerance: 1e-7,
            discretization_step: 1.0,
        };
        let (road, _) = builder.build().unwrap();
        let mut issues = IssueList::new();
        let fillers = lateral_fillers(road.id, &road.section_geometry[0], 1.0, 1e-7, &mut issues);
        assert_eq!(fillers.len(), 1);
        assert_eq!(fillers[0].geometry.polygons.len(), 10);
    }

    #[test]
    fn no_lateral_filler_when_heights_match() {
        let domain = Range::half_open(0.0, 10.0);
        let section = LaneSection {
            id: LaneSectionId::new(RoadId(1), 0),
            start: 0.0,
            length: 10.0,
            center: right_lane(0, 0.0, 0.0, 0.0, domain),
            left: Vec::new(),
            right: vec![
                right_lane(-1, 3.5, 0.0, 0.0, domain),
                right_lane(-2, 3.0, 0.0, 0.0, domain),
            ],
        };
        let builder = RoadReferenceBuilder {
            id: RoadId(1),
            plan_view: vec![PlanViewEntry { start: 0.0, x: 0.0, y: 0.0, heading: 0.0, length: 10.0, shape: GeometryShape::Line }],
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![section],
            tolerance: 1e-7,
            discretization_step: 1.0,
        };
        let (road, _) = builder.build().unwrap();
        let mut issues = IssueList::new();
        let fillers = lateral_fillers(road.id, &road.section_geometry[0], 1.0, 1e-7, &mut issues);
        assert!(fillers.is_empty());
    }

    #[test]
    fn longitudinal_filler_joins_junction_lanes_at_contact_point() {
        // spec.md S6
        let road_a = straight_road(1, 3.5);
        let road_b = straight_road(2, 3.5);
        let roads = vec![road_a, road_b];
        let index = LaneIndex::build(&roads);

        let lane_a = LaneId::new(LaneSectionId::new(RoadId(1), 0), -1);
        let lane_b = LaneId::new(LaneSectionId::new(RoadId(2), 0), -1);
        let mut graph = TopologyGraph::new([lane_a.clone(), lane_b.clone()]);
        graph.add_edge(lane_a.clone(), lane_b.clone()).unwrap();
        let mut contacts = JunctionContacts::new();
        contacts.insert(lane_a.clone(), lane_b.clone(), ContactPoint::Start);

        let mut issues = IssueList::new();
        let fillers = longitudinal_fillers(&graph, &index, &contacts, &lane_a, 1.0, &mut issues).unwrap();
        assert_eq!(fillers.len(), 1);
        assert_eq!(fillers[0].geometry.polygons.len(), 1);
        assert_eq!(fillers[0].geometry.polygons[0].vertices().len(), 4);
    }
}
