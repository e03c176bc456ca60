// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{Joint, JointId, RoadIndex, RoadPoint};

/// Maps every [JointId] to the [RoadPoints](RoadPoint) the joint consists of.
///
/// Points are kept in a compressed adjacency layout: points of joint `j` occupy
/// `points[offsets[j]..offsets[j + 1]]`. Joints extended after [JointIndex::build]
/// keep their additional points in a separate overlay, as extending the flat
/// array would require shifting all subsequent joints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointIndex {
    /// Begin bounds of every joint, plus the end bound of the last joint.
    /// Invariant: `offsets.len() == num_joints + 1 && offsets.last() == points.len()`.
    offsets: Vec<u32>,
    points: Vec<RoadPoint>,
    dynamic_joints: HashMap<JointId, Joint>,
}

impl Default for JointIndex {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            points: Vec::default(),
            dynamic_joints: HashMap::default(),
        }
    }
}

impl JointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of joints in the compressed array.
    pub fn num_joints(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }

    /// Returns the number of points in the compressed array.
    pub fn num_points(&self) -> u32 {
        self.points.len() as u32
    }

    /// Allocates a new joint, with `rp` as its only point.
    pub fn insert_joint(&mut self, rp: RoadPoint) -> JointId {
        let joint_id = self.num_joints();
        self.points.push(rp);
        self.offsets.push(self.points.len() as u32);
        joint_id
    }

    /// Adds a point to an existing joint. The point is kept in the dynamic overlay,
    /// which is discarded by the next [JointIndex::build].
    pub fn append_to_joint(&mut self, joint_id: JointId, rp: RoadPoint) {
        self.dynamic_joints.entry(joint_id).or_default().add_point(rp);
    }

    /// Rebuilds the compressed array from all joints referenced by the [RoadIndex].
    ///
    /// # Panics
    ///
    /// Panics if the road index references a joint id not less than `num_joints`.
    pub fn build(&mut self, road_index: &RoadIndex, num_joints: u32) {
        self.dynamic_joints.clear();

        // Count points of every joint. The extra trailing element
        // ends up as the end bound of the last joint.
        // Example for num_joints = 6: 2, 5, 3, 4, 2, 3, 0
        self.offsets.clear();
        self.offsets.resize(num_joints as usize + 1, 0);
        for (_, road) in road_index.roads() {
            for (_, joint_id) in road.joints() {
                assert!(
                    joint_id < num_joints,
                    "joint {joint_id} out of range (num_joints = {num_joints})"
                );
                self.offsets[joint_id as usize] += 1;
            }
        }

        // Turn counts into end bounds.
        // Example: 2, 7, 10, 14, 16, 19, 19
        for i in 1..self.offsets.len() {
            self.offsets[i] += self.offsets[i - 1];
        }

        let total = *self.offsets.last().expect("offsets are never empty") as usize;
        self.points.clear();
        self.points.resize(total, RoadPoint::default());

        // Place the points, moving every bound down once per point,
        // which turns end bounds into begin bounds.
        // Example: 0, 2, 7, 10, 14, 16, 19
        for (feature_id, road) in road_index.roads() {
            for (point_id, joint_id) in road.joints() {
                let offset = &mut self.offsets[joint_id as usize];
                *offset -= 1;
                self.points[*offset as usize] = RoadPoint::new(feature_id, point_id);
            }
        }

        assert_eq!(self.offsets[0], 0);
        assert_eq!(
            *self.offsets.last().expect("offsets are never empty") as usize,
            self.points.len()
        );

        log::debug!(
            "built joint index: {} joints, {} points",
            self.num_joints(),
            self.num_points()
        );
    }

    /// Returns an iterator over all points of a joint: first the points from
    /// the compressed array, then the points appended after the last build.
    ///
    /// Unknown joints yield no points.
    pub fn points(&self, joint_id: JointId) -> JointPoints<'_> {
        let idx = joint_id as usize;
        let frozen: &[RoadPoint] = match (self.offsets.get(idx), self.offsets.get(idx + 1)) {
            (Some(&begin), Some(&end)) => &self.points[begin as usize..end as usize],
            _ => &[],
        };
        let dynamic = self
            .dynamic_joints
            .get(&joint_id)
            .map(Joint::points)
            .unwrap_or_default();

        JointPoints {
            frozen: frozen.iter(),
            dynamic: dynamic.iter(),
        }
    }

    /// Returns the first point of a joint, or `None` for unknown joints.
    pub fn first_point(&self, joint_id: JointId) -> Option<RoadPoint> {
        self.points(joint_id).next()
    }

    /// Returns all pairs of points (one from each joint) lying on the same feature.
    /// Used to find roads directly connecting two joints.
    pub fn find_points_with_common_feature(
        &self,
        joint_a: JointId,
        joint_b: JointId,
    ) -> Vec<(RoadPoint, RoadPoint)> {
        self.points(joint_a)
            .flat_map(|a| {
                self.points(joint_b)
                    .filter(move |b| a.feature_id == b.feature_id)
                    .map(move |b| (a, b))
            })
            .collect()
    }
}

/// Iterator over the [RoadPoints](RoadPoint) of a single joint,
/// see [JointIndex::points].
#[derive(Debug, Clone)]
pub struct JointPoints<'a> {
    frozen: std::slice::Iter<'a, RoadPoint>,
    dynamic: std::slice::Iter<'a, RoadPoint>,
}

impl Iterator for JointPoints<'_> {
    type Item = RoadPoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.frozen
            .next()
            .or_else(|| self.dynamic.next())
            .copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.frozen.len() + self.dynamic.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for JointPoints<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INVALID_JOINT_ID;

    fn rp(feature_id: u32, point_id: u32) -> RoadPoint {
        RoadPoint::new(feature_id, point_id)
    }

    fn check_offsets(index: &JointIndex) {
        assert_eq!(index.offsets[0], 0);
        assert!(index.offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*index.offsets.last().unwrap() as usize, index.points.len());
    }

    fn sorted(points: impl Iterator<Item = RoadPoint>) -> Vec<RoadPoint> {
        let mut v: Vec<_> = points.collect();
        v.sort();
        v
    }

    fn sample_road_index() -> RoadIndex {
        let mut road_index = RoadIndex::new();
        road_index.import(&[
            Joint::from_points(&[rp(0, 0)]),
            Joint::from_points(&[rp(0, 2), rp(1, 0), rp(2, 3)]),
            Joint::from_points(&[rp(1, 4), rp(2, 0), rp(3, 0)]),
            Joint::from_points(&[rp(3, 2)]),
            Joint::from_points(&[rp(0, 5), rp(3, 5)]),
        ]);
        road_index
    }

    #[test]
    fn empty() {
        let index = JointIndex::new();
        assert_eq!(index.num_joints(), 0);
        assert_eq!(index.num_points(), 0);
        check_offsets(&index);
    }

    #[test]
    fn build() {
        let road_index = sample_road_index();
        let mut index = JointIndex::new();
        index.build(&road_index, 5);

        check_offsets(&index);
        assert_eq!(index.offsets, vec![0, 1, 4, 7, 8, 10]);
        assert_eq!(index.num_joints(), 5);
        assert_eq!(index.num_points(), 10);

        assert_eq!(sorted(index.points(0)), vec![rp(0, 0)]);
        assert_eq!(sorted(index.points(1)), vec![rp(0, 2), rp(1, 0), rp(2, 3)]);
        assert_eq!(sorted(index.points(2)), vec![rp(1, 4), rp(2, 0), rp(3, 0)]);
        assert_eq!(sorted(index.points(3)), vec![rp(3, 2)]);
        assert_eq!(sorted(index.points(4)), vec![rp(0, 5), rp(3, 5)]);
    }

    #[test]
    fn build_with_unused_joints() {
        let mut road_index = RoadIndex::new();
        road_index.add_joint(rp(0, 0), 3);
        road_index.add_joint(rp(0, 1), 0);
        road_index.add_joint(rp(1, 0), 3);

        let mut index = JointIndex::new();
        index.build(&road_index, 6);

        check_offsets(&index);
        assert_eq!(index.offsets, vec![0, 1, 1, 1, 3, 3, 3]);
        assert_eq!(index.points(1).count(), 0);
        assert_eq!(sorted(index.points(3)), vec![rp(0, 0), rp(1, 0)]);
        assert_eq!(index.points(5).len(), 0);
    }

    #[test]
    #[should_panic]
    fn build_joint_out_of_range() {
        let road_index = sample_road_index();
        JointIndex::new().build(&road_index, 4);
    }

    #[test]
    fn insert_joint() {
        let mut index = JointIndex::new();
        assert_eq!(index.insert_joint(rp(4, 0)), 0);
        assert_eq!(index.insert_joint(rp(4, 7)), 1);
        assert_eq!(index.insert_joint(rp(5, 1)), 2);

        check_offsets(&index);
        assert_eq!(index.num_joints(), 3);
        assert_eq!(index.points(1).collect::<Vec<_>>(), vec![rp(4, 7)]);
        assert_eq!(index.first_point(2), Some(rp(5, 1)));
    }

    #[test]
    fn insert_joint_after_build() {
        let mut index = JointIndex::new();
        index.build(&sample_road_index(), 5);

        assert_eq!(index.insert_joint(rp(9, 9)), 5);
        check_offsets(&index);
        assert_eq!(index.points(5).collect::<Vec<_>>(), vec![rp(9, 9)]);
        assert_eq!(sorted(index.points(4)), vec![rp(0, 5), rp(3, 5)]);
    }

    #[test]
    fn append_to_joint() {
        let mut index = JointIndex::new();
        index.build(&sample_road_index(), 5);

        index.append_to_joint(3, rp(7, 0));
        index.append_to_joint(3, rp(8, 2));

        let points: Vec<_> = index.points(3).collect();
        assert_eq!(points, vec![rp(3, 2), rp(7, 0), rp(8, 2)]);

        // The iterator can be restarted by cloning
        let it = index.points(3);
        assert_eq!(it.clone().count(), 3);
        assert_eq!(it.last(), Some(rp(8, 2)));

        // Other joints are unaffected
        assert_eq!(index.points(0).collect::<Vec<_>>(), vec![rp(0, 0)]);
    }

    #[test]
    fn build_discards_dynamic_joints() {
        let road_index = sample_road_index();
        let mut index = JointIndex::new();
        index.build(&road_index, 5);
        index.append_to_joint(0, rp(7, 0));
        assert_eq!(index.points(0).count(), 2);

        index.build(&road_index, 5);
        assert_eq!(index.points(0).collect::<Vec<_>>(), vec![rp(0, 0)]);
    }

    #[test]
    fn unknown_joint() {
        let index = JointIndex::new();
        assert_eq!(index.first_point(INVALID_JOINT_ID), None);
    }

    #[test]
    fn find_points_with_common_feature() {
        let mut index = JointIndex::new();
        index.build(&sample_road_index(), 5);

        let mut pairs = index.find_points_with_common_feature(1, 2);
        pairs.sort();
        assert_eq!(
            pairs,
            vec![(rp(1, 0), rp(1, 4)), (rp(2, 3), rp(2, 0))]
        );

        assert_eq!(
            index.find_points_with_common_feature(0, 4),
            vec![(rp(0, 0), rp(0, 5))]
        );
        assert!(index.find_points_with_common_feature(0, 3).is_empty());
    }
}
