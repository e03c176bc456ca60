// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{
    EdgeEstimator, Error, Geometry, Joint, JointEdge, JointId, JointIndex, Point, RoadGeometry,
    RoadIndex, RoadJointIds, RoadPoint,
};

/// Road graph with [joints](Joint) as vertices, as seen by a route search algorithm.
///
/// Edges are not stored; they are discovered on demand by walking along roads
/// from a joint to the nearest joints on the same road, and weighted with the
/// [EdgeEstimator].
///
/// Building and extending the graph requires exclusive access; once built,
/// the graph may be shared between threads for querying (given thread-safe
/// [Geometry] and [EdgeEstimator]).
#[derive(Debug, Clone)]
pub struct IndexGraph<G, E> {
    geometry: G,
    estimator: E,
    road_index: RoadIndex,
    joint_index: JointIndex,
}

impl<G: Geometry, E: EdgeEstimator> IndexGraph<G, E> {
    /// Creates an empty graph over the provided roads.
    pub fn new(geometry: G, estimator: E) -> Self {
        Self {
            geometry,
            estimator,
            road_index: RoadIndex::default(),
            joint_index: JointIndex::default(),
        }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn road_index(&self) -> &RoadIndex {
        &self.road_index
    }

    pub fn joint_index(&self) -> &JointIndex {
        &self.joint_index
    }

    pub fn get_road(&self, feature_id: u32) -> Option<&RoadJointIds> {
        self.road_index.get_road(feature_id)
    }

    /// Returns the number of roads with at least one joint.
    pub fn num_roads(&self) -> u32 {
        self.road_index.len() as u32
    }

    pub fn num_joints(&self) -> u32 {
        self.joint_index.num_joints()
    }

    pub fn num_points(&self) -> u32 {
        self.joint_index.num_points()
    }

    /// Registers all joints (`joints[i]` becoming the joint with id `i`)
    /// and builds the joint index.
    ///
    /// # Panics
    ///
    /// Panics if a road point appears in more than one joint.
    pub fn import(&mut self, joints: &[Joint]) {
        self.road_index.import(joints);
        self.build(joints.len() as u32);
    }

    /// Rebuilds the joint index from the road index. See [JointIndex::build].
    pub fn build(&mut self, num_joints: u32) {
        self.joint_index.build(&self.road_index, num_joints);
    }

    /// Replaces the road index (usually a deserialized one) and builds
    /// the joint index for all joints it references.
    pub fn load_road_index(&mut self, road_index: RoadIndex) {
        let num_joints = road_index.joint_id_bound();
        self.road_index = road_index;
        self.build(num_joints);
    }

    /// Same as [RoadIndex::push_from_serializer]; [IndexGraph::build] must be called
    /// after all points have been pushed.
    pub fn push_from_serializer(&mut self, joint_id: JointId, rp: RoadPoint) {
        self.road_index.push_from_serializer(joint_id, rp);
    }

    /// Returns the joint of a road point, allocating a new single-point joint
    /// if the point isn't a part of any joint yet.
    pub fn insert_joint(&mut self, rp: RoadPoint) -> JointId {
        if let Some(existing) = self.road_index.get_joint_id(rp) {
            return existing;
        }

        let joint_id = self.joint_index.insert_joint(rp);
        self.road_index.add_joint(rp, joint_id);
        log::trace!("allocated joint {joint_id} for {rp}");
        joint_id
    }

    /// Merges a road point into an existing joint.
    ///
    /// # Panics
    ///
    /// Panics if the point already belongs to a joint.
    pub fn append_to_joint(&mut self, joint_id: JointId, rp: RoadPoint) {
        self.road_index.add_joint(rp, joint_id);
        self.joint_index.append_to_joint(joint_id, rp);
    }

    pub fn get_joint_id(&self, rp: RoadPoint) -> Option<JointId> {
        self.road_index.get_joint_id(rp)
    }

    /// Checks if any point of the joint lies on the given feature.
    pub fn joint_lies_on_road(&self, joint_id: JointId, feature_id: u32) -> bool {
        self.joint_index
            .points(joint_id)
            .any(|rp| rp.feature_id == feature_id)
    }

    /// Calls `f` with every indexed road, in ascending feature id order.
    pub fn for_each_road<F: FnMut(u32, &RoadJointIds)>(&self, mut f: F) {
        self.road_index
            .roads()
            .for_each(|(feature_id, road)| f(feature_id, road));
    }

    /// Calls `f` with every point of a joint.
    pub fn for_each_point<F: FnMut(RoadPoint)>(&self, joint_id: JointId, f: F) {
        self.joint_index.points(joint_id).for_each(f);
    }

    /// Returns the position of a road point.
    pub fn get_point(&self, rp: RoadPoint) -> Result<Point, Error> {
        let road = self.road_geometry(rp.feature_id)?;
        road.get_point(rp.point_id).ok_or(Error::PointOutOfRange {
            feature_id: rp.feature_id,
            point_id: rp.point_id,
            point_count: road.point_count(),
        })
    }

    /// Returns the position of a joint, that is, the position of its first point.
    pub fn get_joint_point(&self, joint_id: JointId) -> Result<Point, Error> {
        let rp = self
            .joint_index
            .first_point(joint_id)
            .ok_or(Error::UnknownJoint(joint_id))?;
        self.get_point(rp)
    }

    /// Appends all outgoing (if `is_outgoing` is set) or incoming edges of a joint to `edges`.
    ///
    /// For incoming edges, [JointEdge::target] is the joint the edge starts at.
    pub fn get_edge_list(
        &self,
        joint_id: JointId,
        is_outgoing: bool,
        edges: &mut Vec<JointEdge>,
    ) -> Result<(), Error> {
        for rp in self.joint_index.points(joint_id) {
            self.get_neighboring_edges(rp, is_outgoing, edges)?;
        }
        Ok(())
    }

    /// Appends the outgoing or incoming edges of a single road point to `edges`:
    /// edges to the nearest joints along the road in directions permitted by the road.
    pub fn get_neighboring_edges(
        &self,
        rp: RoadPoint,
        is_outgoing: bool,
        edges: &mut Vec<JointEdge>,
    ) -> Result<(), Error> {
        let road = self.road_geometry(rp.feature_id)?;

        let bidirectional = !road.is_one_way();
        if !is_outgoing || bidirectional {
            self.get_neighboring_edge(road, rp, false, edges)?;
        }
        if is_outgoing || bidirectional {
            self.get_neighboring_edge(road, rp, true, edges)?;
        }
        Ok(())
    }

    /// Appends an edge between two points of the same feature, as long as the road
    /// permits moving between them in the requested direction.
    pub fn get_directed_edge(
        &self,
        feature_id: u32,
        point_from: u32,
        point_to: u32,
        target: JointId,
        forward: bool,
        edges: &mut Vec<JointEdge>,
    ) -> Result<(), Error> {
        let road = self.road_geometry(feature_id)?;

        if road.is_one_way() && forward != (point_from < point_to) {
            return Ok(());
        }

        let weight = self
            .estimator
            .calc_edges_weight(feature_id, road, point_from, point_to);
        edges.push(JointEdge::new(target, weight));
        Ok(())
    }

    fn get_neighboring_edge(
        &self,
        road: &RoadGeometry,
        rp: RoadPoint,
        forward: bool,
        edges: &mut Vec<JointEdge>,
    ) -> Result<(), Error> {
        if let Some((neighbor, neighbor_point)) = self.road_index.find_neighbor(rp, forward)? {
            let weight =
                self.estimator
                    .calc_edges_weight(rp.feature_id, road, rp.point_id, neighbor_point);
            edges.push(JointEdge::new(neighbor, weight));
        }
        Ok(())
    }

    fn road_geometry(&self, feature_id: u32) -> Result<&RoadGeometry, Error> {
        self.geometry
            .get_road(feature_id)
            .ok_or(Error::UnknownRoad(feature_id))
    }
}
