//! Orchestration (spec.md §4.7→§4.3→§4.4→§4.6→§4.5 data flow, §5
//! "Concurrency model"): heal → build road-space → attach objects → compute
//! topology → discretise surfaces and synthesise fillers.

use crate::config::Config;
use crate::error::PipelineError;
use crate::heal;
use crate::output::{PipelineOutput, RoadArtefacts};
use crate::raw::{RawContactPoint, RawDataset, RawRoad};
use rayon::prelude::*;
use roadgeom_base::{Affine3D, LaneId, LaneSectionId, RoadId};
use roadgeom_diagnostics::{Issue, IssueList};
use roadgeom_geometry::Rotation3D;
use roadgeom_geotrait::{Curve3D, SurfaceLocal};
use roadgeom_mesh::filler::{ContactPoint, JunctionContacts, LaneIndex};
use roadgeom_mesh::{filler, sample, Artefact, ObjectGeometry, PolygonMesh};
use roadgeom_road::lane::Lane;
use roadgeom_road::object::{placement_transform, RepeatExpansion, RoadObject, RoadSignal};
use roadgeom_road::road::{Road, RoadReferenceBuilder};
use roadgeom_topology::TopologyGraph;

/// A road that built far enough to participate in topology/discretisation,
/// plus the objects/signals attached to it and every issue raised while
/// healing and building it.
struct BuiltRoad {
    road_id: RoadId,
    road: Option<Road>,
    objects: Vec<RoadObject>,
    signals: Vec<RoadSignal>,
    junction_id: Option<i64>,
    issues: IssueList,
}

fn heal_and_build_road(raw: &RawRoad, config: &Config) -> BuiltRoad {
    let road_id = RoadId(raw.id);
    let location = format!("road[{}]", raw.id);
    log::info!("building {location}");
    let mut issues = IssueList::new();
    let tolerance = config.tolerance;

    let plan_view = heal::heal_plan_view(&raw.plan_view, &location, &mut issues);
    let elevation = heal::heal_cubic_entries(&raw.elevation, "elevation", &location, &mut issues);
    let lane_offset = heal::heal_cubic_entries(&raw.lane_offset, "lane-offset", &location, &mut issues);
    let lane_sections = heal::heal_lane_sections(road_id.clone(), &raw.lane_sections, raw.length, &location, &mut issues);

    let builder = RoadReferenceBuilder {
        id: road_id.clone(),
        plan_view,
        elevation,
        lane_offset,
        lane_sections,
        tolerance,
        discretization_step: config.discretization_step,
    };

    let (road, objects, signals) = match builder.build() {
        Ok((road, build_issues)) => {
            issues.extend(build_issues);
            let objects = raw
                .objects
                .iter()
                .filter_map(|o| {
                    let obj_location = format!("{location}/object[{}]", o.id);
                    match heal::heal_object(o, &obj_location, tolerance, &mut issues) {
                        Ok(object) => Some(object),
                        Err(reason) => {
                            issues.push(Issue::dropped("object-invalid-geometry", &obj_location, reason));
                            None
                        }
                    }
                })
                .collect();
            let signals = raw.signals.iter().map(heal::heal_signal).collect();
            (Some(road), objects, signals)
        }
        Err(e) => {
            log::warn!("{location} failed to build: {e}");
            issues.push(Issue::fatal("road-build-failed", &location, e.to_string()));
            (None, Vec::new(), Vec::new())
        }
    };

    BuiltRoad { road_id, road, objects, signals, junction_id: raw.junction_id, issues }
}

fn dataset_offset(config: &Config) -> Affine3D {
    let rotation = Rotation3D::new(config.offset_hdg, 0.0, 0.0).matrix();
    Affine3D::from_parts(
        cgmath::Vector3::new(config.offset_x, config.offset_y, config.offset_z),
        rotation,
        cgmath::Vector3::new(1.0, 1.0, 1.0),
    )
}

fn resolve_junction_contacts(dataset: &RawDataset) -> (TopologyGraph, JunctionContacts, Vec<LaneId>) {
    let mut known_lanes = Vec::new();
    for road in &dataset.roads {
        for (section_index, section) in road.lane_sections.iter().enumerate() {
            let section_id = LaneSectionId::new(RoadId(road.id), section_index);
            for lane in section.left.iter().chain(section.right.iter()) {
                known_lanes.push(LaneId::new(section_id.clone(), lane.signed_id));
            }
        }
    }
    let mut graph = TopologyGraph::new(known_lanes.clone());
    let mut contacts = JunctionContacts::new();

    // intra-road successor links declared directly on each lane
    for road in &dataset.roads {
        for (section_index, section) in road.lane_sections.iter().enumerate() {
            let from_section = LaneSectionId::new(RoadId(road.id), section_index);
            for lane in section.left.iter().chain(section.right.iter()) {
                if let Some((succ_road, succ_section, succ_signed_id)) = lane.successor {
                    let from = LaneId::new(from_section.clone(), lane.signed_id);
                    let to = LaneId::new(LaneSectionId::new(RoadId(succ_road), succ_section), succ_signed_id);
                    let _ = graph.add_edge(from, to);
                }
            }
        }
    }

    // junction connections: each laneLink joins the incoming road's last/
    // first section to the connecting road's first/last section, the end
    // picked by the connection's contactPoint (spec.md §6).
    for junction in &dataset.junctions {
        for connection in &junction.connections {
            let Some(incoming_road) = dataset.roads.iter().find(|r| r.id == connection.incoming_road_id) else {
                continue;
            };
            let Some(connecting_road) = dataset.roads.iter().find(|r| r.id == connection.connecting_road_id) else {
                continue;
            };
            if incoming_road.lane_sections.is_empty() || connecting_road.lane_sections.is_empty() {
                continue;
            }
            let incoming_section_index = incoming_road.lane_sections.len() - 1;
            let connecting_section_index = match connection.contact_point {
                RawContactPoint::Start => 0,
                RawContactPoint::End => connecting_road.lane_sections.len() - 1,
            };
            let incoming_section = LaneSectionId::new(RoadId(incoming_road.id), incoming_section_index);
            let connecting_section = LaneSectionId::new(RoadId(connecting_road.id), connecting_section_index);
            for &(from_signed, to_signed) in &connection.lane_links {
                let from = LaneId::new(incoming_section.clone(), from_signed);
                let to = LaneId::new(connecting_section.clone(), to_signed);
                if graph.add_edge(from.clone(), to.clone()).is_ok() {
                    let contact_point = match connection.contact_point {
                        RawContactPoint::Start => ContactPoint::Start,
                        RawContactPoint::End => ContactPoint::End,
                    };
                    contacts.insert(from, to, contact_point);
                }
            }
        }
    }

    (graph, contacts, known_lanes)
}

/// Stringifies a [`Lane`]'s road-mark/material/speed/access/type records
/// into the flat key/value attribute list carried by the lane-surface
/// artefact (spec.md §6 "outbound artefact's attribute list").
fn lane_attributes(lane: &Lane) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    attributes.push(("laneType".to_string(), format!("{:?}", lane.lane_type)));
    for mark in &lane.road_marks {
        attributes.push((
            format!("roadMark@{}", mark.start),
            format!("{:?} width={} color={}", mark.kind, mark.width, mark.color),
        ));
    }
    for material in &lane.material {
        attributes.push((
            format!("material@{}", material.start),
            format!("surface={} friction={} roughness={}", material.surface, material.friction, material.roughness),
        ));
    }
    for speed in &lane.speed {
        attributes.push((format!("speed@{}", speed.start), format!("max={} unit={}", speed.max, speed.unit)));
    }
    for access in &lane.access {
        attributes.push((format!("access@{}", access.start), access.restriction.clone()));
    }
    attributes
}

fn discretise_road(built: &BuiltRoad, config: &Config, graph: &TopologyGraph, contacts: &JunctionContacts, index: &LaneIndex) -> (RoadArtefacts, IssueList) {
    let mut issues = IssueList::new();
    let mut artefacts = RoadArtefacts { road_id: Some(built.road_id.clone()), ..Default::default() };

    let Some(road) = &built.road else {
        return (artefacts, issues);
    };
    let location = format!("road[{}]", built.road_id.0);
    log::info!("discretising {location}");
    let step = config.discretization_step;

    artefacts.boundaries.push(Artefact::new(
        format!("{location}/referenceLine"),
        sample::sample_curve(&road.reference_line, step, &format!("{location}/referenceLine"), &mut issues),
    ));

    for section in &road.section_geometry {
        let section_location = format!("{location}/laneSection[{}]", section.section_id.index);
        let source_section = &road.lane_sections[section.section_id.index];
        for lane in &section.lanes {
            let lane_location = format!("{section_location}/lane[{}]", lane.signed_id);
            let (inner, outer) = match (
                lane.inner_boundary(&section.sectioned_reference, &section.section_elevation),
                lane.outer_boundary(&section.sectioned_reference, &section.section_elevation),
            ) {
                (Ok(i), Ok(o)) => (i, o),
                _ => {
                    issues.push(Issue::dropped("lane-boundary-failed", &lane_location, "inner/outer boundary curve failed to build"));
                    continue;
                }
            };
            artefacts.boundaries.push(Artefact::new(
                format!("{lane_location}/inner"),
                sample::sample_curve(&inner, step, &lane_location, &mut issues),
            ));
            artefacts.boundaries.push(Artefact::new(
                format!("{lane_location}/outer"),
                sample::sample_curve(&outer, step, &lane_location, &mut issues),
            ));
            let mesh = sample::sample_bounded_surface(&inner, &outer, step, &lane_location, &mut issues);
            if !mesh.is_empty() {
                let attributes = source_section
                    .left
                    .iter()
                    .chain(source_section.right.iter())
                    .find(|l| l.signed_id == lane.signed_id)
                    .map(lane_attributes)
                    .unwrap_or_default();
                artefacts.lane_surfaces.push(Artefact::with_attributes(lane_location, attributes, mesh));
            }
        }
        artefacts
            .lateral_fillers
            .extend(filler::lateral_fillers(built.road_id.clone(), section, step, config.tolerance, &mut issues));

        for lane in &section.lanes {
            let lane_id = LaneId::new(section.section_id.clone(), lane.signed_id);
            match filler::longitudinal_fillers(graph, index, contacts, &lane_id, step, &mut issues) {
                Ok(found) => artefacts.longitudinal_fillers.extend(found),
                Err(e) => issues.push(Issue::dropped("longitudinal-filler-failed", &section_location, e.to_string())),
            }
        }
    }

    for object in &built.objects {
        if let Some(artefact) = place_object(road, object, config, &location, &mut issues) {
            artefacts.objects.push(artefact);
        }
    }
    for signal in &built.signals {
        if let Some(artefact) = place_signal(road, signal, config, &location, &mut issues) {
            artefacts.signals.push(artefact);
        }
    }

    (artefacts, issues)
}

fn place_object(road: &Road, object: &RoadObject, config: &Config, road_location: &str, issues: &mut IssueList) -> Option<Artefact<ObjectGeometry>> {
    let location = format!("{road_location}/object[{}]", object.id);
    let path: &dyn Curve3D = &road.reference_line;

    if let Some(repeat) = &object.repeat {
        let expansion = roadgeom_road::object::expand_repeat(
            Box::new(road.reference_line.clone()),
            repeat,
            config.tolerance,
            config.sweep_discretization_step,
        );
        return match expansion {
            Ok(None) => {
                issues.push(Issue::dropped("repeat-length-zero", &location, "repeat.length <= tolerance, object dropped"));
                None
            }
            Ok(Some(RepeatExpansion::Continuous(sweep))) => match sweep.calculate_polygons_local() {
                Ok(polys) => Some(Artefact::new(location, ObjectGeometry::Mesh(PolygonMesh::from_unchecked_polygons(polys)))),
                Err(e) => {
                    issues.push(Issue::dropped("repeat-sweep-failed", &location, e.to_string()));
                    None
                }
            },
            Ok(Some(RepeatExpansion::Discrete(placements))) => {
                let mut polygons = Vec::new();
                for placement in &placements {
                    match object.geometry.calculate_polygons_local(config.circle_slices, config.tolerance) {
                        Ok(local_polys) => {
                            for poly in local_polys {
                                polygons.push(placement.transform.transform_polygon(&poly));
                            }
                        }
                        Err(e) => {
                            issues.push(Issue::dropped("repeat-placement-geometry-failed", &location, e.to_string()));
                        }
                    }
                }
                if polygons.is_empty() {
                    None
                } else {
                    Some(Artefact::new(location, ObjectGeometry::Mesh(PolygonMesh::from_unchecked_polygons(polygons))))
                }
            }
            Err(e) => {
                issues.push(Issue::dropped("repeat-placement-transform-failed", &location, e.to_string()));
                None
            }
        };
    }

    let affine = match placement_transform(path, object) {
        Ok(a) => a,
        Err(e) => {
            issues.push(Issue::dropped("object-placement-failed", &location, e.to_string()));
            return None;
        }
    };
    let local_polys = match object.geometry.calculate_polygons_local(config.circle_slices, config.tolerance) {
        Ok(p) => p,
        Err(e) => {
            issues.push(Issue::dropped("object-geometry-invalid", &location, e.to_string()));
            return None;
        }
    };
    let polygons: Vec<_> = local_polys.iter().map(|p| affine.transform_polygon(p)).collect();
    Some(Artefact::new(location, ObjectGeometry::Mesh(PolygonMesh::from_unchecked_polygons(polygons))))
}

fn place_signal(road: &Road, signal: &RoadSignal, config: &Config, road_location: &str, issues: &mut IssueList) -> Option<Artefact<ObjectGeometry>> {
    let location = format!("{road_location}/signal[{}]", signal.id);
    let path: &dyn Curve3D = &road.reference_line;
    let affine = match placement_transform(path, signal) {
        Ok(a) => a,
        Err(e) => {
            issues.push(Issue::dropped("signal-placement-failed", &location, e.to_string()));
            return None;
        }
    };
    let local_polys = match signal.geometry.calculate_polygons_local(config.circle_slices, config.tolerance) {
        Ok(p) => p,
        Err(e) => {
            issues.push(Issue::dropped("signal-geometry-invalid", &location, e.to_string()));
            return None;
        }
    };
    let polygons: Vec<_> = local_polys.iter().map(|p| affine.transform_polygon(p)).collect();
    Some(Artefact::new(location, ObjectGeometry::Mesh(PolygonMesh::from_unchecked_polygons(polygons))))
}

fn transform_mesh(mesh: &mut PolygonMesh, offset: &Affine3D) {
    for polygon in &mut mesh.polygons {
        let transformed = offset.transform_polygon(polygon.vertices());
        *polygon = roadgeom_geometry::Polygon3D::new_unchecked(transformed);
    }
}

fn transform_geometry(geometry: &mut ObjectGeometry, offset: &Affine3D) {
    match geometry {
        ObjectGeometry::Mesh(mesh) => transform_mesh(mesh, offset),
        ObjectGeometry::Polyline(polyline) => {
            for point in &mut polyline.points {
                *point = offset.transform_point(*point);
            }
        }
    }
}

/// Applies the dataset-wide `(x, y, z, heading)` pre-transform to every
/// point of every artefact (spec.md §6 "offset applied before any
/// evaluation" — applied here, post-sampling, rather than to the curves
/// themselves, since it is a rigid transform and commutes with sampling).
fn apply_dataset_offset(artefacts: &mut RoadArtefacts, offset: &Affine3D) {
    for boundary in &mut artefacts.boundaries {
        for point in &mut boundary.geometry.points {
            *point = offset.transform_point(*point);
        }
    }
    for mesh in artefacts
        .lane_surfaces
        .iter_mut()
        .map(|a| &mut a.geometry)
        .chain(artefacts.lateral_fillers.iter_mut().map(|a| &mut a.geometry))
        .chain(artefacts.longitudinal_fillers.iter_mut().map(|a| &mut a.geometry))
    {
        transform_mesh(mesh, offset);
    }
    for artefact in artefacts.objects.iter_mut().chain(artefacts.signals.iter_mut()) {
        transform_geometry(&mut artefact.geometry, offset);
    }
}

/// Runs the whole pipeline over `dataset` (spec.md §5 "parallel-across-
/// roads, sequential-within-a-road"): heals and builds every road on
/// `config.worker_count` rayon workers, then computes the dataset-wide
/// topology graph and discretises every road's surfaces and fillers.
pub fn run(dataset: &RawDataset, config: &Config) -> Result<PipelineOutput, PipelineError> {
    config.validate()?;
    let offset = dataset_offset(config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_count)
        .build()
        .map_err(|e| PipelineError::ConfigurationInvalid { reason: e.to_string() })?;

    let built_roads: Vec<BuiltRoad> = pool.install(|| dataset.roads.par_iter().map(|raw| heal_and_build_road(raw, config)).collect());

    let (graph, contacts, _known_lanes) = resolve_junction_contacts(dataset);
    let index = LaneIndex::build(built_roads.iter().filter_map(|b| b.road.as_ref()));

    let mut output = PipelineOutput::default();
    let discretised: Vec<(RoadArtefacts, IssueList)> =
        pool.install(|| built_roads.par_iter().map(|built| discretise_road(built, config, &graph, &contacts, &index)).collect());

    for (built, (mut artefacts, mesh_issues)) in built_roads.into_iter().zip(discretised) {
        apply_dataset_offset(&mut artefacts, &offset);
        output.issues.extend(built.issues);
        output.issues.extend(mesh_issues);
        output.roads.push(artefacts);
        let _ = built.junction_id;
    }

    for issue in output.issues.at_least(roadgeom_diagnostics::Severity::Warning) {
        log::warn!("[{}] {}: {}", issue.code, issue.location, issue.message);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawGeometryShape, RawLane, RawLaneSection, RawPlanViewEntry};

    fn straight_road(id: i64) -> RawRoad {
        RawRoad {
            id,
            junction_id: None,
            length: 10.0,
            plan_view: vec![RawPlanViewEntry { s: 0.0, x: 0.0, y: 0.0, heading: 0.0, length: 10.0, shape: RawGeometryShape::Line }],
            elevation: Vec::new(),
            super_elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![RawLaneSection {
                s: 0.0,
                left: Vec::new(),
                right: vec![RawLane {
                    signed_id: -1,
                    width: vec![crate::raw::RawCubicEntry { s: 0.0, a: 3.5, b: 0.0, c: 0.0, d: 0.0 }],
                    lane_type: "driving".into(),
                    ..Default::default()
                }],
            }],
            objects: Vec::new(),
            signals: Vec::new(),
        }
    }

    #[test]
    fn run_produces_one_road_worth_of_artefacts() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dataset = RawDataset { header: Default::default(), roads: vec![straight_road(1)], junctions: Vec::new() };
        let config = Config::default();
        let output = run(&dataset, &config).unwrap();
        assert_eq!(output.roads.len(), 1);
        assert!(!output.issues.is_fatal());
        let road = &output.roads[0];
        assert!(!road.boundaries.is_empty());
        assert!(!road.lane_surfaces.is_empty());
    }

    #[test]
    fn invalid_configuration_aborts_before_any_road_builds() {
        let dataset = RawDataset { header: Default::default(), roads: vec![straight_road(1)], junctions: Vec::new() };
        let config = Config { worker_count: 0, ..Config::default() };
        assert!(matches!(run(&dataset, &config), Err(PipelineError::ConfigurationInvalid { .. })));
    }

    #[test]
    fn junction_successor_links_produce_a_longitudinal_filler() {
        let road_a = straight_road(1);
        let road_b = straight_road(2);
        let dataset = RawDataset {
            header: Default::default(),
            roads: vec![road_a, road_b],
            junctions: vec![crate::raw::RawJunction {
                id: 100,
                connections: vec![crate::raw::RawConnection {
                    incoming_road_id: 1,
                    connecting_road_id: 2,
                    contact_point: RawContactPoint::Start,
                    lane_links: vec![(-1, -1)],
                }],
            }],
        };
        let config = Config::default();
        let output = run(&dataset, &config).unwrap();
        let road_a_artefacts = output.roads.iter().find(|r| r.road_id == Some(RoadId(1))).unwrap();
        assert!(!road_a_artefacts.longitudinal_fillers.is_empty());
    }
}
