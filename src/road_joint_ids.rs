// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

use crate::serialization::{capacity_for, read_u32, write_u32};
use crate::{DeserializeError, JointId, INVALID_JOINT_ID};

/// Joints of a single road, indexed by point id.
///
/// Points which are not a part of any joint hold [INVALID_JOINT_ID].
/// The array spans up to the last point which was assigned a joint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoadJointIds(Vec<JointId>);

impl RoadJointIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the joint of a point, or `None` if the point is not a part
    /// of any joint (including points past the end of the array).
    pub fn get_joint_id(&self, point_id: u32) -> Option<JointId> {
        self.0
            .get(point_id as usize)
            .cloned()
            .filter(|&id| id != INVALID_JOINT_ID)
    }

    /// Assigns a point to a joint, growing the array with [INVALID_JOINT_ID]s if needed.
    ///
    /// # Panics
    ///
    /// Panics if the point already belongs to a joint, or if `joint_id`
    /// is [INVALID_JOINT_ID].
    pub fn add_joint(&mut self, point_id: u32, joint_id: JointId) {
        assert_ne!(joint_id, INVALID_JOINT_ID);

        let idx = point_id as usize;
        if idx >= self.0.len() {
            self.0.resize(idx + 1, INVALID_JOINT_ID);
        }

        assert_eq!(
            self.0[idx], INVALID_JOINT_ID,
            "point {point_id} already belongs to joint {}",
            self.0[idx]
        );
        self.0[idx] = joint_id;
    }

    /// Finds the closest point with a joint, strictly after `point_id` if `forward`
    /// is set, or strictly before it otherwise. Returns the joint and the point id.
    ///
    /// This is a linear scan over the road, bounded by its length.
    pub fn find_neighbor(&self, point_id: u32, forward: bool) -> Option<(JointId, u32)> {
        let start = point_id as usize;
        if forward {
            self.0
                .iter()
                .enumerate()
                .skip(start.saturating_add(1))
                .find(|&(_, &id)| id != INVALID_JOINT_ID)
                .map(|(idx, &id)| (id, idx as u32))
        } else {
            self.0[..start.min(self.0.len())]
                .iter()
                .enumerate()
                .rev()
                .find(|&(_, &id)| id != INVALID_JOINT_ID)
                .map(|(idx, &id)| (id, idx as u32))
        }
    }

    /// Returns an iterator over all `(point_id, joint_id)` pairs, skipping
    /// points without joints, in ascending point order.
    pub fn joints(&self) -> impl Iterator<Item = (u32, JointId)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id != INVALID_JOINT_ID)
            .map(|(idx, &id)| (idx as u32, id))
    }

    /// Returns the raw value stored for the first point.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front(&self) -> JointId {
        *self.0.first().expect("front() called on empty RoadJointIds")
    }

    /// Returns the raw value stored for the last point.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back(&self) -> JointId {
        *self.0.last().expect("back() called on empty RoadJointIds")
    }

    /// Returns the length of the array, which is one more than the last point with a joint.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes the array as a `u32` count followed by `count` joint ids.
    pub fn serialize<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        write_u32(sink, self.0.len() as u32)?;
        for &id in &self.0 {
            write_u32(sink, id)?;
        }
        Ok(())
    }

    /// Replaces the contents with an array written by [RoadJointIds::serialize].
    pub fn deserialize<R: io::Read>(&mut self, src: &mut R) -> Result<(), DeserializeError> {
        self.0.clear();

        let count = read_u32(src, "joint count", 1)?;
        self.0.reserve(capacity_for(count));
        for i in 0..count {
            self.0.push(read_u32(src, "joint ids", count - i)?);
        }
        Ok(())
    }
}

impl From<Vec<JointId>> for RoadJointIds {
    fn from(ids: Vec<JointId>) -> Self {
        Self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const J1: JointId = 1;
    const J2: JointId = 2;

    fn sparse_road() -> RoadJointIds {
        let mut road = RoadJointIds::new();
        road.add_joint(1, J1);
        road.add_joint(4, J2);
        road
    }

    #[test]
    fn add_joint_fills_gaps() {
        let road = sparse_road();
        assert_eq!(
            road,
            RoadJointIds::from(vec![INVALID_JOINT_ID, J1, INVALID_JOINT_ID, INVALID_JOINT_ID, J2])
        );
        assert_eq!(road.len(), 5);
        assert_eq!(road.front(), INVALID_JOINT_ID);
        assert_eq!(road.back(), J2);
    }

    #[test]
    fn get_joint_id() {
        let road = sparse_road();
        assert_eq!(road.get_joint_id(0), None);
        assert_eq!(road.get_joint_id(1), Some(J1));
        assert_eq!(road.get_joint_id(3), None);
        assert_eq!(road.get_joint_id(4), Some(J2));
        assert_eq!(road.get_joint_id(5), None);
        assert_eq!(road.get_joint_id(u32::MAX), None);
    }

    #[test]
    #[should_panic]
    fn front_of_empty() {
        RoadJointIds::new().front();
    }

    #[test]
    #[should_panic]
    fn back_of_empty() {
        RoadJointIds::new().back();
    }

    #[test]
    #[should_panic]
    fn add_joint_twice() {
        let mut road = sparse_road();
        road.add_joint(1, 7);
    }

    #[test]
    fn find_neighbor() {
        let road = sparse_road();
        assert_eq!(road.find_neighbor(0, true), Some((J1, 1)));
        assert_eq!(road.find_neighbor(1, true), Some((J2, 4)));
        assert_eq!(road.find_neighbor(2, true), Some((J2, 4)));
        assert_eq!(road.find_neighbor(4, true), None);
        assert_eq!(road.find_neighbor(4, false), Some((J1, 1)));
        assert_eq!(road.find_neighbor(1, false), None);
        assert_eq!(road.find_neighbor(0, false), None);
    }

    #[test]
    fn find_neighbor_past_the_end() {
        let road = sparse_road();
        assert_eq!(road.find_neighbor(10, true), None);
        assert_eq!(road.find_neighbor(10, false), Some((J2, 4)));
        assert_eq!(road.find_neighbor(u32::MAX, true), None);
    }

    #[test]
    fn joints() {
        let road = sparse_road();
        assert_eq!(road.joints().collect::<Vec<_>>(), vec![(1, J1), (4, J2)]);
        assert_eq!(RoadJointIds::new().joints().count(), 0);
    }

    #[test]
    fn serialize() {
        let mut sink = Vec::new();
        RoadJointIds::from(vec![3, INVALID_JOINT_ID])
            .serialize(&mut sink)
            .unwrap();
        assert_eq!(
            sink,
            [2, 0, 0, 0, 3, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn serialize_round_trip() {
        let road = sparse_road();
        let mut sink = Vec::new();
        road.serialize(&mut sink).unwrap();

        let mut loaded = RoadJointIds::from(vec![9, 9, 9]);
        loaded.deserialize(&mut sink.as_slice()).unwrap();

        assert_eq!(loaded, road);
        for point_id in 0..6 {
            assert_eq!(loaded.get_joint_id(point_id), road.get_joint_id(point_id));
        }
    }

    #[test]
    fn deserialize_truncated() {
        let data: &[u8] = &[3, 0, 0, 0, 1, 0, 0, 0];
        let err = RoadJointIds::new()
            .deserialize(&mut &data[..])
            .unwrap_err();
        assert!(matches!(
            err,
            DeserializeError::Truncated {
                what: "joint ids",
                expected: 2
            }
        ));
    }
}
