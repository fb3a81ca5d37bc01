//! Hierarchical value-object identifiers (spec.md §3 "Identifiers"):
//! `RoadId -> LaneSectionId(index, RoadId) -> LaneId(signedInt, LaneSectionId)`.
//! Equality is by value; `Hash` follows automatically from the derived
//! structural equality, giving the "stable hash key derived by
//! concatenation" the spec calls for.

use serde::{Deserialize, Serialize};

/// A road's own identifier, opaque outside equality/hashing/display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadId(pub i64);

/// A lane section's identifier: its index within a road plus the road.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneSectionId {
    /// the road this section belongs to
    pub road: RoadId,
    /// the section's zero-based index within the road, in `s`-order
    pub index: usize,
}

impl LaneSectionId {
    /// Builds a lane-section id.
    pub fn new(road: RoadId, index: usize) -> Self { LaneSectionId { road, index } }
}

/// A lane's identifier: its signed id within a lane section. `0` is the
/// zero-width center lane; positive ids are left of the reference line,
/// negative are right (spec.md §3 "Identifiers").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneId {
    /// the lane section this lane belongs to
    pub section: LaneSectionId,
    /// the signed lane number; 0 is the center lane
    pub signed_id: i32,
}

impl LaneId {
    /// Builds a lane id.
    pub fn new(section: LaneSectionId, signed_id: i32) -> Self { LaneId { section, signed_id } }

    /// True for the zero-width center lane.
    pub fn is_center(&self) -> bool { self.signed_id == 0 }

    /// True for a lane left of the reference line (positive id).
    pub fn is_left(&self) -> bool { self.signed_id > 0 }

    /// True for a lane right of the reference line (negative id).
    pub fn is_right(&self) -> bool { self.signed_id < 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let r = RoadId(1);
        let sec_a = LaneSectionId::new(r.clone(), 0);
        let sec_b = LaneSectionId::new(RoadId(1), 0);
        assert_eq!(sec_a, sec_b);
        let lane_a = LaneId::new(sec_a, -1);
        let lane_b = LaneId::new(sec_b, -1);
        assert_eq!(lane_a, lane_b);
        assert!(lane_a.is_right());
    }

    #[test]
    fn center_lane_is_zero() {
        let id = LaneId::new(LaneSectionId::new(RoadId(0), 0), 0);
        assert!(id.is_center());
        assert!(!id.is_left());
        assert!(!id.is_right());
    }
}
