//! Converts [`crate::raw`] records into the healed inputs
//! `roadgeom-road`'s builders expect (spec.md §4.7 "Diagnostics / healing",
//! run once per road before C5 ever sees the data).

use crate::raw::{
    RawAccess, RawCubicEntry, RawLane, RawLaneSection, RawMaterial, RawObject, RawPlanViewEntry, RawRepeat,
    RawRoadMark, RawSignal, RawSpeed,
};
use roadgeom_base::{Function, LaneSectionId, Range, RoadId};
use roadgeom_diagnostics::heal::{heal_blank_string, heal_non_finite, heal_sub_tolerance_positive, sort_dedup_by_key};
use roadgeom_diagnostics::IssueList;
use roadgeom_geometry::curve2d::ParamRange;
use roadgeom_road::lane::{Access, Lane, LaneType, Material, RoadMark, RoadMarkType, Speed};
use roadgeom_road::lane_section::LaneSection;
use roadgeom_road::object::{GeometryDescriptor, RepeatSweep, RoadObject, RoadSignal, SignalOrientation, classify_geometry};
use roadgeom_road::road::{CubicEntry, GeometryShape, PlanViewEntry};

/// Heals one road's plan-view list: drops sub-tolerance entries' absolute
/// finiteness, stably sorts/dedups by `s`, and snaps non-finite fields to
/// `0.0` (spec.md §4.7).
pub fn heal_plan_view(entries: &[RawPlanViewEntry], location: &str, issues: &mut IssueList) -> Vec<PlanViewEntry> {
    let (sorted, sort_issues) = sort_dedup_by_key(entries.to_vec(), |e| e.s, "plan-view-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .into_iter()
        .map(|e| {
            let (x, x_issue) = heal_non_finite(e.x, "plan-view-x-non-finite", location);
            let (y, y_issue) = heal_non_finite(e.y, "plan-view-y-non-finite", location);
            let (heading, h_issue) = heal_non_finite(e.heading, "plan-view-heading-non-finite", location);
            let (length, l_issue) = heal_non_finite(e.length, "plan-view-length-non-finite", location);
            for issue in [x_issue, y_issue, h_issue, l_issue].into_iter().flatten() {
                issues.push(issue);
            }
            let shape = match e.shape {
                crate::raw::RawGeometryShape::Line => GeometryShape::Line,
                crate::raw::RawGeometryShape::Arc { curvature } => GeometryShape::Arc { curvature },
                crate::raw::RawGeometryShape::Spiral { curvature_start, curvature_end } => {
                    GeometryShape::Spiral { curvature_start, curvature_end }
                }
                crate::raw::RawGeometryShape::Poly3 { a, b, c, d } => GeometryShape::Poly3 { a, b, c, d },
                crate::raw::RawGeometryShape::ParamPoly3 { u, v } => {
                    GeometryShape::ParamPoly3 { u, v, p_range: ParamRange::Normalized }
                }
            };
            PlanViewEntry { start: e.s, x, y, heading, length, shape }
        })
        .collect()
}

/// Heals a list of cubic profile entries shared by elevation,
/// super-elevation, and lane width/border (spec.md §4.7).
pub fn heal_cubic_entries(entries: &[RawCubicEntry], code_prefix: &str, location: &str, issues: &mut IssueList) -> Vec<CubicEntry> {
    let (sorted, sort_issues) =
        sort_dedup_by_key(entries.to_vec(), |e| e.s, &format!("{code_prefix}-unsorted"), location);
    issues.extend(sort_issues);
    let mut out = Vec::with_capacity(sorted.len());
    for (i, e) in sorted.iter().enumerate() {
        let length = match sorted.get(i + 1) {
            Some(next) => next.s - e.s,
            None => 0.0, // stretched to the covering curve's length by build_piecewise_cubic
        };
        let (a, a_issue) = heal_non_finite(e.a, &format!("{code_prefix}-a-non-finite"), location);
        let (b, b_issue) = heal_non_finite(e.b, &format!("{code_prefix}-b-non-finite"), location);
        let (c, c_issue) = heal_non_finite(e.c, &format!("{code_prefix}-c-non-finite"), location);
        let (d, d_issue) = heal_non_finite(e.d, &format!("{code_prefix}-d-non-finite"), location);
        for issue in [a_issue, b_issue, c_issue, d_issue].into_iter().flatten() {
            issues.push(issue);
        }
        out.push(CubicEntry { start: e.s, length, a, b, c, d });
    }
    out
}

fn heal_width_function(entries: &[RawCubicEntry], domain_length: f64, location: &str, issues: &mut IssueList) -> Function {
    heal_cubic_function(entries, "lane-width", domain_length, location, issues)
}

fn heal_cubic_function(
    entries: &[RawCubicEntry],
    code_prefix: &str,
    domain_length: f64,
    location: &str,
    issues: &mut IssueList,
) -> Function {
    let healed = heal_cubic_entries(entries, code_prefix, location, issues);
    roadgeom_road::road::build_piecewise_cubic(&healed, domain_length)
}

fn parse_road_mark_type(raw: &str, location: &str, issues: &mut IssueList) -> RoadMarkType {
    let (healed, issue) = heal_blank_string(raw, "none", "road-mark-type-blank", location);
    if let Some(issue) = issue {
        issues.push(issue);
    }
    match healed.as_str() {
        "solid" => RoadMarkType::Solid,
        "broken" => RoadMarkType::Broken,
        "solid solid" => RoadMarkType::SolidSolid,
        "solid broken" => RoadMarkType::SolidBroken,
        "broken solid" => RoadMarkType::BrokenSolid,
        "broken broken" => RoadMarkType::BrokenBroken,
        "botts dots" => RoadMarkType::BottsDots,
        "grass" => RoadMarkType::Grass,
        "curb" => RoadMarkType::Curb,
        _ => RoadMarkType::None,
    }
}

fn heal_road_marks(raw: &[RawRoadMark], location: &str, issues: &mut IssueList) -> Vec<RoadMark> {
    let (sorted, sort_issues) = sort_dedup_by_key(raw.to_vec(), |r| r.start, "road-mark-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .into_iter()
        .map(|r| {
            let (start, start_issue) = heal_non_finite(r.start, "road-mark-start-non-finite", location);
            let (width, width_issue) = heal_non_finite(r.width, "road-mark-width-non-finite", location);
            for issue in [start_issue, width_issue].into_iter().flatten() {
                issues.push(issue);
            }
            let (color, color_issue) = heal_blank_string(&r.color, "standard", "road-mark-color-blank", location);
            if let Some(issue) = color_issue {
                issues.push(issue);
            }
            RoadMark { start, kind: parse_road_mark_type(&r.kind, location, issues), width, color }
        })
        .collect()
}

fn heal_material(raw: &[RawMaterial], location: &str, issues: &mut IssueList) -> Vec<Material> {
    let (sorted, sort_issues) = sort_dedup_by_key(raw.to_vec(), |m| m.start, "material-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .into_iter()
        .map(|m| {
            let (start, start_issue) = heal_non_finite(m.start, "material-start-non-finite", location);
            let (friction, friction_issue) = heal_non_finite(m.friction, "material-friction-non-finite", location);
            let (roughness, roughness_issue) = heal_non_finite(m.roughness, "material-roughness-non-finite", location);
            for issue in [start_issue, friction_issue, roughness_issue].into_iter().flatten() {
                issues.push(issue);
            }
            let (surface, surface_issue) = heal_blank_string(&m.surface, "asphalt", "material-surface-blank", location);
            if let Some(issue) = surface_issue {
                issues.push(issue);
            }
            Material { start, surface, friction, roughness }
        })
        .collect()
}

fn heal_speed(raw: &[RawSpeed], location: &str, issues: &mut IssueList) -> Vec<Speed> {
    let (sorted, sort_issues) = sort_dedup_by_key(raw.to_vec(), |s| s.start, "speed-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .into_iter()
        .map(|s| {
            let (start, start_issue) = heal_non_finite(s.start, "speed-start-non-finite", location);
            let (max, max_issue) = heal_non_finite(s.max, "speed-max-non-finite", location);
            for issue in [start_issue, max_issue].into_iter().flatten() {
                issues.push(issue);
            }
            let (unit, unit_issue) = heal_blank_string(&s.unit, "m/s", "speed-unit-blank", location);
            if let Some(issue) = unit_issue {
                issues.push(issue);
            }
            Speed { start, max, unit }
        })
        .collect()
}

fn heal_access(raw: &[RawAccess], location: &str, issues: &mut IssueList) -> Vec<Access> {
    let (sorted, sort_issues) = sort_dedup_by_key(raw.to_vec(), |a| a.start, "access-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .into_iter()
        .map(|a| {
            let (start, start_issue) = heal_non_finite(a.start, "access-start-non-finite", location);
            if let Some(issue) = start_issue {
                issues.push(issue);
            }
            let (restriction, restriction_issue) =
                heal_blank_string(&a.restriction, "no", "access-restriction-blank", location);
            if let Some(issue) = restriction_issue {
                issues.push(issue);
            }
            Access { start, restriction }
        })
        .collect()
}

fn parse_lane_type(raw: &str, location: &str, issues: &mut IssueList) -> LaneType {
    let (healed, issue) = heal_blank_string(raw, "driving", "lane-type-blank", location);
    if let Some(issue) = issue {
        issues.push(issue);
    }
    match healed.as_str() {
        "driving" => LaneType::Driving,
        "shoulder" => LaneType::Shoulder,
        "sidewalk" => LaneType::Sidewalk,
        "biking" => LaneType::Biking,
        "border" => LaneType::Border,
        "none" | "center" => LaneType::Center,
        other => LaneType::Other(other.to_string()),
    }
}

fn heal_lane(raw: &RawLane, section_domain: Range<f64>, location: &str, issues: &mut IssueList) -> Lane {
    let lane_location = format!("{location}/lane[{}]", raw.signed_id);
    let domain_length = section_domain.length();
    let width = if raw.width.is_empty() {
        Function::zero(section_domain)
    } else {
        heal_width_function(&raw.width, domain_length, &lane_location, issues)
    };
    let border = if raw.border.is_empty() {
        None
    } else {
        Some(heal_width_function(&raw.border, domain_length, &lane_location, issues))
    };
    let inner_height_offset = if raw.inner_height_offset.is_empty() {
        Function::zero(section_domain)
    } else {
        heal_cubic_function(&raw.inner_height_offset, "lane-inner-height-offset", domain_length, &lane_location, issues)
    };
    let outer_height_offset = if raw.outer_height_offset.is_empty() {
        Function::zero(section_domain)
    } else {
        heal_cubic_function(&raw.outer_height_offset, "lane-outer-height-offset", domain_length, &lane_location, issues)
    };
    Lane {
        signed_id: raw.signed_id,
        width,
        border,
        inner_height_offset,
        outer_height_offset,
        lane_type: parse_lane_type(&raw.lane_type, &lane_location, issues),
        road_marks: heal_road_marks(&raw.road_marks, &lane_location, issues),
        material: heal_material(&raw.material, &lane_location, issues),
        speed: heal_speed(&raw.speed, &lane_location, issues),
        access: heal_access(&raw.access, &lane_location, issues),
    }
}

/// Heals a road's lane-section list: sorts/dedups by `s`, derives each
/// section's length from the next section's start (or the road's total
/// length for the last one), and heals every lane within (spec.md §4.3
/// step 5, §4.7).
pub fn heal_lane_sections(
    road_id: RoadId,
    sections: &[RawLaneSection],
    road_length: f64,
    location: &str,
    issues: &mut IssueList,
) -> Vec<LaneSection> {
    let (sorted, sort_issues) = sort_dedup_by_key(sections.to_vec(), |s| s.s, "lane-section-unsorted", location);
    issues.extend(sort_issues);
    sorted
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let length = match sorted.get(i + 1) {
                Some(next) => next.s - raw.s,
                None => road_length - raw.s,
            }
            .max(0.0);
            let domain = Range::half_open(0.0, length);
            let section_location = format!("{location}/laneSection[{i}]");
            let center =
                heal_lane(&RawLane { signed_id: 0, ..Default::default() }, domain, &section_location, issues);
            let left = raw.left.iter().map(|l| heal_lane(l, domain, &section_location, issues)).collect();
            let right = raw.right.iter().map(|l| heal_lane(l, domain, &section_location, issues)).collect();
            LaneSection { id: LaneSectionId::new(road_id.clone(), i), start: raw.s, length, center, left, right }
        })
        .collect()
}

/// Classifies and heals one road object's geometry and placement (spec.md
/// §4.4, §4.7).
pub fn heal_object(raw: &RawObject, location: &str, tolerance: f64, issues: &mut IssueList) -> Result<RoadObject, String> {
    let (s, s_issue) = heal_non_finite(raw.s, "object-s-non-finite", location);
    let (t, t_issue) = heal_non_finite(raw.t, "object-t-non-finite", location);
    let (z_offset, z_issue) = heal_non_finite(raw.z_offset, "object-z-offset-non-finite", location);
    for issue in [s_issue, t_issue, z_issue].into_iter().flatten() {
        issues.push(issue);
    }
    let geometry = classify_geometry(&raw.id, raw.length, raw.width, raw.height, raw.radius, raw.outline.clone())
        .map_err(|e| e.to_string())?;
    let repeat = raw.repeat.map(|r| heal_repeat(&r, tolerance, location, issues));
    Ok(RoadObject {
        id: raw.id.clone(),
        s,
        t,
        z_offset,
        hdg: raw.hdg,
        pitch: raw.pitch,
        roll: raw.roll,
        perpendicular_to_road: raw.orientation_perpendicular,
        geometry,
        repeat,
    })
}

fn heal_repeat(raw: &RawRepeat, tolerance: f64, location: &str, issues: &mut IssueList) -> RepeatSweep {
    let (length, issue) = heal_sub_tolerance_positive(raw.length, tolerance, "repeat-length-sub-tolerance", location);
    if let Some(issue) = issue {
        issues.push(issue);
    }
    RepeatSweep {
        start: raw.s,
        length,
        step: raw.distance,
        t_start: raw.t_start,
        t_end: raw.t_end,
        z_offset_start: raw.z_offset_start,
        z_offset_end: raw.z_offset_end,
        width_start: raw.width_start,
        width_end: raw.width_end,
        height_start: raw.height_start,
        height_end: raw.height_end,
    }
}

/// Heals one road signal (spec.md §4.4, §4.7).
pub fn heal_signal(raw: &RawSignal) -> RoadSignal {
    let orientation = match raw.orientation.as_str() {
        "+" => SignalOrientation::Positive,
        "-" => SignalOrientation::Negative,
        _ => SignalOrientation::Both,
    };
    let geometry = match (raw.width, raw.height) {
        (Some(width), Some(height)) => GeometryDescriptor::Rectangle { length: width.max(1e-3), width: height },
        (Some(width), None) => GeometryDescriptor::Rectangle { length: width, width },
        _ => GeometryDescriptor::Circle { radius: 0.15 },
    };
    RoadSignal {
        id: raw.id.clone(),
        s: raw.s,
        t: raw.t,
        z_offset: raw.z_offset,
        hdg: raw.hdg,
        pitch: raw.pitch,
        roll: raw.roll,
        orientation,
        value: raw.value,
        unit: raw.unit.clone(),
        dynamic: raw.dynamic,
        geometry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawAccess, RawMaterial, RawRoadMark, RawSpeed};

    #[test]
    fn heal_lane_threads_height_offsets_and_attributes() {
        let raw = RawLane {
            signed_id: -1,
            width: vec![RawCubicEntry { s: 0.0, a: 3.5, b: 0.0, c: 0.0, d: 0.0 }],
            inner_height_offset: vec![RawCubicEntry { s: 0.0, a: 0.1, b: 0.0, c: 0.0, d: 0.0 }],
            outer_height_offset: vec![RawCubicEntry { s: 0.0, a: 0.2, b: 0.0, c: 0.0, d: 0.0 }],
            lane_type: "driving".into(),
            road_marks: vec![RawRoadMark { start: 0.0, kind: "solid".into(), width: 0.12, color: "standard".into() }],
            material: vec![RawMaterial { start: 0.0, surface: "asphalt".into(), friction: 0.8, roughness: 0.1 }],
            speed: vec![RawSpeed { start: 0.0, max: 27.7, unit: "m/s".into() }],
            access: vec![RawAccess { start: 0.0, restriction: "no".into() }],
            ..Default::default()
        };
        let mut issues = IssueList::new();
        let domain = Range::half_open(0.0, 10.0);
        let lane = heal_lane(&raw, domain, "road[0]/laneSection[0]", &mut issues);
        assert!((lane.inner_height_offset.value(0.0).unwrap() - 0.1).abs() < 1e-9);
        assert!((lane.outer_height_offset.value(0.0).unwrap() - 0.2).abs() < 1e-9);
        assert_eq!(lane.road_marks.len(), 1);
        assert_eq!(lane.road_marks[0].kind, RoadMarkType::Solid);
        assert_eq!(lane.material.len(), 1);
        assert_eq!(lane.speed.len(), 1);
        assert_eq!(lane.access.len(), 1);
    }
}
