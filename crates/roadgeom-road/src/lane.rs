//! The lane model (spec.md §3 "Road model": "Each `Lane` carries piecewise
//! `width(s')` ... `type` ... road-mark entries, material/speed/access
//! attributes"), plus the road-mark/material/speed/access vocabulary
//! supplemented from the OpenDRIVE-shaped reference material.

use roadgeom_base::Function;
use serde::{Deserialize, Serialize};

/// What kind of lane this is (OpenDRIVE `laneType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneType {
    /// the zero-width center lane
    Center,
    /// an ordinary traffic lane
    Driving,
    /// paved shoulder, not for through traffic
    Shoulder,
    /// raised pedestrian path
    Sidewalk,
    /// cycle lane
    Biking,
    /// verge/border strip
    Border,
    /// any type not otherwise enumerated, carried through by name
    Other(String),
}

/// A road-mark line painted on a lane boundary (spec.md §3 "road-mark
/// entries"), grounded on ASAM OpenDRIVE's `roadMark` enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadMark {
    /// where along the lane (relative to section start) this mark applies
    pub start: f64,
    /// the painted pattern
    pub kind: RoadMarkType,
    /// the mark's painted width
    pub width: f64,
    /// the mark's colour, as an OpenDRIVE-style token (`"standard"`,
    /// `"yellow"`, ...)
    pub color: String,
}

/// The painted pattern of a [`RoadMark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadMarkType {
    /// no paint
    None,
    /// a single continuous line
    Solid,
    /// a single dashed line
    Broken,
    /// two continuous lines
    SolidSolid,
    /// continuous outer, dashed inner
    SolidBroken,
    /// dashed outer, continuous inner
    BrokenSolid,
    /// two dashed lines
    BrokenBroken,
    /// raised reflective studs
    BottsDots,
    /// grass verge in place of paint
    Grass,
    /// a physical curb
    Curb,
}

/// The lane surface's physical material, as a small value struct rather
/// than an opaque string (SPEC_FULL §C), grounded on the reference
/// material's commented-out `Material` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// start of validity, relative to section start
    pub start: f64,
    /// surface material token (`"asphalt"`, `"concrete"`, ...)
    pub surface: String,
    /// surface friction coefficient
    pub friction: f64,
    /// surface roughness
    pub roughness: f64,
}

/// A posted speed limit valid from `start` (relative to section start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    /// start of validity, relative to section start
    pub start: f64,
    /// the limit's numeric value
    pub max: f64,
    /// the limit's unit (`"m/s"`, `"km/h"`, `"mph"`)
    pub unit: String,
}

/// A lane access restriction valid from `start` (relative to section
/// start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    /// start of validity, relative to section start
    pub start: f64,
    /// the restriction token (`"no"`, `"car"`, `"bus"`, ...)
    pub restriction: String,
}

/// A single lane within a [`crate::lane_section::LaneSection`]. All
/// functions are relative to the owning section's start (spec.md §3:
/// "`width(s')` relative to section start").
#[derive(Debug, Clone)]
pub struct Lane {
    /// the lane's signed id within its section; 0 is the center lane
    pub signed_id: i32,
    /// lane width as a function of section-relative `s'`
    pub width: Function,
    /// an alternative absolute-offset description of the inner boundary,
    /// used in place of the summed-width computation when present
    pub border: Option<Function>,
    /// vertical offset of the inner boundary relative to the lane
    /// reference line's elevation
    pub inner_height_offset: Function,
    /// vertical offset of the outer boundary
    pub outer_height_offset: Function,
    /// the lane's kind
    pub lane_type: LaneType,
    /// road-mark entries along this lane, sorted by `start`
    pub road_marks: Vec<RoadMark>,
    /// material records, sorted by `start`
    pub material: Vec<Material>,
    /// speed-limit records, sorted by `start`
    pub speed: Vec<Speed>,
    /// access-restriction records, sorted by `start`
    pub access: Vec<Access>,
}

impl Lane {
    /// True for the zero-width center lane.
    pub fn is_center(&self) -> bool { self.signed_id == 0 }
}
