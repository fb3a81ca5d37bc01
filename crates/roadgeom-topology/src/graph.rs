//! The lane successor/predecessor graph (spec.md §4.6 "Topology resolver").
//!
//! Edges come from two sources, both represented identically here as
//! `(from: LaneId, to: LaneId)` pairs: a lane's own `link.successor`
//! (intra-road, or crossing into another road), and junction `connection`
//! elements' `laneLink` entries, already resolved to concrete `LaneId`s by
//! the caller (which alone knows how a junction's `(road, contactPoint)`
//! maps onto a road's first/last lane section).

use roadgeom_base::LaneId;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// Topology-ingestion failures (spec.md §7: "TopologyInconsistent: link
/// refers to unknown lane id — drop that edge, warning").
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// an edge endpoint is not in the graph's known-lane set
    #[error("edge endpoint {lane:?} is not a known lane")]
    UnknownLaneId {
        /// the offending endpoint
        lane: LaneId,
    },
}

/// A directed multigraph over `LaneId`s whose edges mean "is a successor
/// of" (spec.md §4.6). Built once per road (or per dataset, for junction
/// edges that cross roads), then queried read-only.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    known: FxHashSet<LaneId>,
    successors: FxHashMap<LaneId, FxHashSet<LaneId>>,
    predecessors: FxHashMap<LaneId, FxHashSet<LaneId>>,
}

impl TopologyGraph {
    /// Builds an empty graph whose valid endpoints are exactly
    /// `known_lanes` (every lane id the raw model actually declares).
    pub fn new(known_lanes: impl IntoIterator<Item = LaneId>) -> Self {
        TopologyGraph { known: known_lanes.into_iter().collect(), ..Default::default() }
    }

    /// Adds a directed "is a successor of" edge `from -> to`. Fails if
    /// either endpoint is not in the known-lane set; callers should record
    /// a `TopologyInconsistent` warning and drop the edge rather than
    /// propagate the error (spec.md §7).
    pub fn add_edge(&mut self, from: LaneId, to: LaneId) -> Result<(), TopologyError> {
        if !self.known.contains(&from) {
            return Err(TopologyError::UnknownLaneId { lane: from });
        }
        if !self.known.contains(&to) {
            return Err(TopologyError::UnknownLaneId { lane: to });
        }
        self.successors.entry(from.clone()).or_default().insert(to.clone());
        self.predecessors.entry(to).or_default().insert(from);
        Ok(())
    }

    /// The lanes that are successors of `lane`; empty if none.
    pub fn successors(&self, lane: &LaneId) -> &FxHashSet<LaneId> {
        self.successors.get(lane).unwrap_or(&EMPTY)
    }

    /// The lanes that `lane` is a successor of; empty if none.
    pub fn predecessors(&self, lane: &LaneId) -> &FxHashSet<LaneId> {
        self.predecessors.get(lane).unwrap_or(&EMPTY)
    }

    /// True if `lane` is a known endpoint in this graph.
    pub fn knows(&self, lane: &LaneId) -> bool { self.known.contains(lane) }
}

// a single shared empty set, so `successors`/`predecessors` can return a
// reference without allocating for lanes that have none
static EMPTY: once_empty::Lazy = once_empty::Lazy::new();

mod once_empty {
    use roadgeom_base::LaneId;
    use rustc_hash::FxHashSet;
    use std::sync::OnceLock;

    pub struct Lazy(OnceLock<FxHashSet<LaneId>>);
    impl Lazy {
        pub const fn new() -> Self { Lazy(OnceLock::new()) }
    }
    impl std::ops::Deref for Lazy {
        type Target = FxHashSet<LaneId>;
        fn deref(&self) -> &FxHashSet<LaneId> { self.0.get_or_init(FxHashSet::default) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgeom_base::{LaneSectionId, RoadId};

    fn lane(road: i64, section: usize, signed_id: i32) -> LaneId {
        LaneId::new(LaneSectionId::new(RoadId(road), section), signed_id)
    }

    #[test]
    fn successors_and_predecessors_are_consistent() {
        let a = lane(1, 0, -1);
        let b = lane(1, 1, -1);
        let mut graph = TopologyGraph::new([a.clone(), b.clone()]);
        graph.add_edge(a.clone(), b.clone()).unwrap();
        assert!(graph.successors(&a).contains(&b));
        assert!(graph.predecessors(&b).contains(&a));
        assert!(graph.successors(&b).is_empty());
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let a = lane(1, 0, -1);
        let unknown = lane(99, 0, -1);
        let mut graph = TopologyGraph::new([a.clone()]);
        assert!(graph.add_edge(a, unknown).is_err());
    }

    #[test]
    fn cycles_are_permitted() {
        let a = lane(1, 0, 1);
        let b = lane(2, 0, 1);
        let mut graph = TopologyGraph::new([a.clone(), b.clone()]);
        graph.add_edge(a.clone(), b.clone()).unwrap();
        graph.add_edge(b.clone(), a.clone()).unwrap();
        assert!(graph.successors(&a).contains(&b));
        assert!(graph.successors(&b).contains(&a));
    }
}
