//! The inbound raw model (spec.md §6 "Inbound — raw model"): the unhealed,
//! loosely-typed shape a caller hands the pipeline, mirroring an
//! OpenDRIVE-style document before any of C9's healing has run.

use cgmath::Point3;

/// The whole dataset: a header plus every road and junction it declares.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    /// dataset-level metadata
    pub header: RawHeader,
    /// every road in the dataset, in no particular order
    pub roads: Vec<RawRoad>,
    /// every junction in the dataset, in no particular order
    pub junctions: Vec<RawJunction>,
}

/// Dataset-wide metadata (spec.md §6: "header with CRS string ... plus
/// optional `(x,y,z,heading)` offset applied before any evaluation").
#[derive(Debug, Clone, Default)]
pub struct RawHeader {
    /// the dataset's coordinate reference system, e.g. an EPSG designator
    /// string; may be blank, in which case healing supplies a default
    pub crs: String,
    /// dataset-wide offset applied before any curve evaluation
    pub offset: Option<RawOffset>,
}

/// A `(x, y, z, heading)` dataset-wide pre-transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawOffset {
    /// x translation
    pub x: f64,
    /// y translation
    pub y: f64,
    /// z translation
    pub z: f64,
    /// heading rotation, radians
    pub hdg: f64,
}

/// One road, unhealed.
#[derive(Debug, Clone, Default)]
pub struct RawRoad {
    /// the road's numeric identifier
    pub id: i64,
    /// the junction this road belongs to, if it is a connecting road
    pub junction_id: Option<i64>,
    /// the road's declared total length; healed against the summed
    /// plan-view length if inconsistent
    pub length: f64,
    /// the plan-view geometry list, absolute-`s` sorted
    pub plan_view: Vec<RawPlanViewEntry>,
    /// the elevation profile, absolute-`s` sorted; empty means flat
    pub elevation: Vec<RawCubicEntry>,
    /// the super-elevation profile, absolute-`s` sorted; empty means none
    pub super_elevation: Vec<RawCubicEntry>,
    /// the lane-offset profile, absolute-`s` sorted; empty means zero offset
    pub lane_offset: Vec<RawCubicEntry>,
    /// lane sections, absolute-`s` sorted
    pub lane_sections: Vec<RawLaneSection>,
    /// road objects
    pub objects: Vec<RawObject>,
    /// road signals
    pub signals: Vec<RawSignal>,
}

/// One plan-view entry (spec.md §6 "planar geometry list, each item:
/// absolute start `s`, `(x,y,heading)` anchor, length, shape").
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlanViewEntry {
    /// absolute start along the road
    pub s: f64,
    /// anchor x
    pub x: f64,
    /// anchor y
    pub y: f64,
    /// anchor heading, radians
    pub heading: f64,
    /// the segment's own length
    pub length: f64,
    /// the segment's shape
    pub shape: RawGeometryShape,
}

/// The raw union of plan-view shapes (spec.md §6 "shape = one of
/// line/spiral/arc/poly3/parampoly3").
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometryShape {
    /// a straight line
    Line,
    /// a constant-curvature arc
    Arc {
        /// signed curvature
        curvature: f64,
    },
    /// a Euler spiral, curvature linear in `s`
    Spiral {
        /// curvature at the segment's start
        curvature_start: f64,
        /// curvature at the segment's end
        curvature_end: f64,
    },
    /// an explicit cubic `y(x) = a+bx+cx^2+dx^3`
    Poly3 {
        /// constant coefficient
        a: f64,
        /// linear coefficient
        b: f64,
        /// quadratic coefficient
        c: f64,
        /// cubic coefficient
        d: f64,
    },
    /// a parametric cubic `u(p), v(p)`, `p` normalised to `[0,1]`
    ParamPoly3 {
        /// u(p) coefficients
        u: [f64; 4],
        /// v(p) coefficients
        v: [f64; 4],
    },
}

/// A raw piecewise-cubic profile entry (spec.md §6: elevation,
/// super-elevation, lane width/border/height-offset all share this shape).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCubicEntry {
    /// where this entry starts
    pub s: f64,
    /// constant coefficient
    pub a: f64,
    /// linear coefficient
    pub b: f64,
    /// quadratic coefficient
    pub c: f64,
    /// cubic coefficient
    pub d: f64,
}

/// One lane section, unhealed.
#[derive(Debug, Clone, Default)]
pub struct RawLaneSection {
    /// absolute start along the road
    pub s: f64,
    /// left lanes, any order; healing sorts by signed id
    pub left: Vec<RawLane>,
    /// right lanes, any order
    pub right: Vec<RawLane>,
}

/// One lane, unhealed.
#[derive(Debug, Clone)]
pub struct RawLane {
    /// the lane's signed id within its section
    pub signed_id: i32,
    /// width profile, section-relative `s'`, absolute-`s'`-sorted
    pub width: Vec<RawCubicEntry>,
    /// an optional absolute-offset `border` profile, used instead of
    /// summed width when present
    pub border: Vec<RawCubicEntry>,
    /// vertical offset profile of the inner boundary, section-relative
    /// `s'`; empty means zero (spec.md §3 "Lane model")
    pub inner_height_offset: Vec<RawCubicEntry>,
    /// vertical offset profile of the outer boundary; empty means zero
    pub outer_height_offset: Vec<RawCubicEntry>,
    /// lane type token, e.g. `"driving"`, `"shoulder"`, or blank
    pub lane_type: String,
    /// road-mark entries, any order; healing sorts by `start`
    pub road_marks: Vec<RawRoadMark>,
    /// material records, any order; healing sorts by `start`
    pub material: Vec<RawMaterial>,
    /// speed-limit records, any order; healing sorts by `start`
    pub speed: Vec<RawSpeed>,
    /// access-restriction records, any order; healing sorts by `start`
    pub access: Vec<RawAccess>,
    /// the lane's `link.successor`, as `(road, section index, signed id)`
    /// of the successor lane, when known at ingestion time (same-road
    /// links only; cross-road/junction links are resolved from
    /// [`RawJunction`] instead)
    pub successor: Option<(i64, usize, i32)>,
}

impl Default for RawLane {
    fn default() -> Self {
        RawLane {
            signed_id: 0,
            width: Vec::new(),
            border: Vec::new(),
            inner_height_offset: Vec::new(),
            outer_height_offset: Vec::new(),
            lane_type: String::new(),
            road_marks: Vec::new(),
            material: Vec::new(),
            speed: Vec::new(),
            access: Vec::new(),
            successor: None,
        }
    }
}

/// A raw road-mark entry (spec.md §3 "road-mark entries"; SPEC_FULL §C).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoadMark {
    /// where along the lane (section-relative) this mark starts applying
    pub start: f64,
    /// the painted pattern token, e.g. `"solid"`, `"broken"`, or blank
    pub kind: String,
    /// the mark's painted width
    pub width: f64,
    /// the mark's colour token, e.g. `"standard"`, `"yellow"`, or blank
    pub color: String,
}

/// A raw material record (SPEC_FULL §C).
#[derive(Debug, Clone, PartialEq)]
pub struct RawMaterial {
    /// start of validity, section-relative
    pub start: f64,
    /// surface material token, e.g. `"asphalt"`, or blank
    pub surface: String,
    /// surface friction coefficient
    pub friction: f64,
    /// surface roughness
    pub roughness: f64,
}

/// A raw posted speed-limit record (SPEC_FULL §C).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpeed {
    /// start of validity, section-relative
    pub start: f64,
    /// the limit's numeric value
    pub max: f64,
    /// the limit's unit token, e.g. `"km/h"`, or blank
    pub unit: String,
}

/// A raw lane access-restriction record (SPEC_FULL §C).
#[derive(Debug, Clone, PartialEq)]
pub struct RawAccess {
    /// start of validity, section-relative
    pub start: f64,
    /// the restriction token, e.g. `"no"`, `"car"`, or blank
    pub restriction: String,
}

/// A road object or signal placement (spec.md §6, §4.4).
#[derive(Debug, Clone, Default)]
pub struct RawObject {
    /// the object's identifier
    pub id: String,
    /// curve-relative `s`
    pub s: f64,
    /// curve-relative `t`
    pub t: f64,
    /// vertical offset above the reference surface
    pub z_offset: f64,
    /// heading relative to the road tangent, radians
    pub hdg: f64,
    /// pitch, radians
    pub pitch: f64,
    /// roll, radians
    pub roll: f64,
    /// if true, `hdg` is ignored and the object is oriented perpendicular
    /// to the road (spec.md §9 Open Question 1)
    pub orientation_perpendicular: bool,
    /// bounding length, if declared
    pub length: Option<f64>,
    /// bounding width, if declared
    pub width: Option<f64>,
    /// bounding height, if declared
    pub height: Option<f64>,
    /// bounding radius, if declared
    pub radius: Option<f64>,
    /// an explicit local-frame outline, if declared
    pub outline: Option<Vec<Point3<f64>>>,
    /// an optional longitudinal sweep
    pub repeat: Option<RawRepeat>,
}

/// A raw `repeat` sweep record (spec.md §6, §4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRepeat {
    /// sweep start, absolute `s`
    pub s: f64,
    /// sweep length along the road
    pub length: f64,
    /// sample spacing; `<= 0` means a continuous swept surface rather than
    /// discrete placements (spec.md §9 Open Question 3 governs `length==0`)
    pub distance: f64,
    /// `t` at the sweep's start
    pub t_start: f64,
    /// `t` at the sweep's end
    pub t_end: f64,
    /// vertical offset at the sweep's start
    pub z_offset_start: f64,
    /// vertical offset at the sweep's end
    pub z_offset_end: f64,
    /// object width at the sweep's start
    pub width_start: f64,
    /// object width at the sweep's end
    pub width_end: f64,
    /// object height at the sweep's start
    pub height_start: f64,
    /// object height at the sweep's end
    pub height_end: f64,
}

/// A raw road signal (spec.md §6, §4.4).
#[derive(Debug, Clone, Default)]
pub struct RawSignal {
    /// the signal's identifier
    pub id: String,
    /// curve-relative `s`
    pub s: f64,
    /// curve-relative `t`
    pub t: f64,
    /// vertical offset above the reference surface
    pub z_offset: f64,
    /// heading relative to the road tangent, radians
    pub hdg: f64,
    /// pitch, radians
    pub pitch: f64,
    /// roll, radians
    pub roll: f64,
    /// which direction(s) of travel the signal governs: `"+"`, `"-"`, or
    /// `"none"`/blank for both
    pub orientation: String,
    /// the signal's posted value, if any (e.g. a speed limit)
    pub value: Option<f64>,
    /// the unit of `value`
    pub unit: Option<String>,
    /// true for a dynamic (electronically controlled) signal
    pub dynamic: bool,
    /// bounding width
    pub width: Option<f64>,
    /// bounding height
    pub height: Option<f64>,
}

/// A junction: a set of road-to-road connections through a shared node
/// (spec.md §6 "junctions collection with connections").
#[derive(Debug, Clone, Default)]
pub struct RawJunction {
    /// the junction's identifier
    pub id: i64,
    /// the connections through this junction
    pub connections: Vec<RawConnection>,
}

/// One junction connection (spec.md §6: "`(incomingRoadId,
/// connectingRoadId, contactPoint, laneLinks)`").
#[derive(Debug, Clone, Default)]
pub struct RawConnection {
    /// the road entering the junction
    pub incoming_road_id: i64,
    /// the road carrying traffic through the junction
    pub connecting_road_id: i64,
    /// which end of the connecting road touches the incoming road
    pub contact_point: RawContactPoint,
    /// `(incoming lane signed id, connecting lane signed id)` pairs
    pub lane_links: Vec<(i32, i32)>,
}

/// Which end of a connecting road a junction connection attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawContactPoint {
    /// the connecting road's `s=0` end
    #[default]
    Start,
    /// the connecting road's `s=length` end
    End,
}
