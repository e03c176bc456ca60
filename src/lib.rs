// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Vertex-merged ("joint") road graph index.
//!
//! Roads are stored as ordered point sequences. Points of different roads which
//! coincide (intersections, roads meeting at their ends) are merged into
//! [joints](Joint), which become the vertices of the graph searched by a routing
//! algorithm. The crate keeps two complementary indices:
//! - [RoadIndex] maps every point of every road to its joint (if any),
//! - [JointIndex] maps every joint to the set of road points it consists of,
//!   stored as a compressed adjacency array.
//!
//! [IndexGraph] composes both indices with an external [Geometry] provider and
//! [EdgeEstimator] and exposes the edge enumeration needed by path search.
//! [RoadIndex] additionally resolves the anchors of turn restrictions between
//! adjacent roads ([RestrictionPoint]).
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use jointgraph::{DistanceEstimator, IndexGraph, Joint, Point, RoadGeometry, RoadPoint};
//!
//! let mut roads: HashMap<u32, RoadGeometry> = HashMap::new();
//! roads.insert(0, RoadGeometry::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 0.01)], false));
//! roads.insert(1, RoadGeometry::new(vec![Point::new(0.0, 0.01), Point::new(0.01, 0.01)], true));
//!
//! let mut g = IndexGraph::new(roads, DistanceEstimator);
//! g.import(&[
//!     Joint::from_points(&[RoadPoint::new(0, 0)]),
//!     Joint::from_points(&[RoadPoint::new(0, 1), RoadPoint::new(1, 0)]),
//!     Joint::from_points(&[RoadPoint::new(1, 1)]),
//! ]);
//!
//! let mut edges = Vec::new();
//! g.get_edge_list(1, true, &mut edges).unwrap();
//! assert_eq!(edges.len(), 2);
//! ```

mod distance;
mod error;
mod estimator;
pub mod format;
mod geometry;
mod index_graph;
mod joint_index;
mod road_index;
mod road_joint_ids;
mod serialization;

pub use distance::earth_distance;
pub use error::{DeserializeError, Error};
pub use estimator::{DistanceEstimator, EdgeEstimator};
pub use geometry::{Geometry, Point, RoadGeometry};
pub use index_graph::IndexGraph;
pub use joint_index::{JointIndex, JointPoints};
pub use road_index::{RestrictionPoint, RoadIndex};
pub use road_joint_ids::RoadJointIds;

/// Dense identifier of a [Joint], in range `0..num_joints`.
pub type JointId = u32;

/// Reserved [JointId] marking road points which do not belong to any joint.
///
/// This value is only ever observed in serialized data and in
/// [RoadJointIds::front]/[RoadJointIds::back]; all lookups return [Option] instead.
pub const INVALID_JOINT_ID: JointId = JointId::MAX;

/// Identifies a single point of a single road geometry.
///
/// Ordered by `(feature_id, point_id)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadPoint {
    pub feature_id: u32,
    pub point_id: u32,
}

impl RoadPoint {
    pub const fn new(feature_id: u32, point_id: u32) -> Self {
        Self {
            feature_id,
            point_id,
        }
    }
}

impl std::fmt::Display for RoadPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RoadPoint({}, {})", self.feature_id, self.point_id)
    }
}

/// Set of [RoadPoints](RoadPoint) which coincide at a single graph vertex.
///
/// Used as the input of [RoadIndex::import] (where the position of a joint
/// in the input slice is its [JointId]), and for joints extended after
/// [JointIndex::build].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Joint(Vec<RoadPoint>);

impl Joint {
    pub fn from_points(points: &[RoadPoint]) -> Self {
        Self(points.to_vec())
    }

    pub fn add_point(&mut self, rp: RoadPoint) {
        self.0.push(rp);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[RoadPoint] {
        &self.0
    }
}

/// Represents a connection between two joints along a single road.
///
/// For outgoing edges `target` is the joint reached by the edge, for incoming
/// edges it is the joint the edge leaves from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointEdge {
    pub target: JointId,
    pub weight: f64,
}

impl JointEdge {
    pub const fn new(target: JointId, weight: f64) -> Self {
        Self { target, weight }
    }
}
