// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

use crate::serialization::{read_u32, write_u32, MAX_PREALLOCATION};
use crate::{DeserializeError, Error, Joint, JointId, RoadJointIds, RoadPoint, INVALID_JOINT_ID};

/// Number of arena slots a single deserialized road may account for, on top of
/// [MAX_PREALLOCATION]. Keeps the arena proportional to the data actually read.
const MAX_FEATURE_ID_SPREAD: usize = 64;

/// Anchor of a turn restriction between two adjacent roads.
///
/// `from` is the point where the first road is left, `to` is the point where
/// the second road is entered, and both belong to the joint `center_id`.
///
/// Ordered by `(from, to, center_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RestrictionPoint {
    pub from: RoadPoint,
    pub to: RoadPoint,
    pub center_id: JointId,
}

impl RestrictionPoint {
    pub const fn new(from: RoadPoint, to: RoadPoint, center_id: JointId) -> Self {
        Self {
            from,
            to,
            center_id,
        }
    }
}

impl std::fmt::Display for RestrictionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RestrictionPoint {{ from: {}, to: {}, center: {} }}",
            self.from, self.to, self.center_id
        )
    }
}

/// Maps feature ids to the [RoadJointIds] of the feature.
///
/// Roads are kept in an arena indexed directly by the feature id, thus feature ids
/// are expected to be dense. Features without any registered points are absent,
/// which is different from being present with an empty [RoadJointIds].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoadIndex {
    roads: Vec<Option<RoadJointIds>>,
    len: usize,
}

impl RoadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every point of every joint. `joints[i]` is assumed to describe
    /// the joint with id `i`.
    ///
    /// # Panics
    ///
    /// Panics if any point appears in more than one joint.
    pub fn import(&mut self, joints: &[Joint]) {
        assert!(joints.len() < INVALID_JOINT_ID as usize);

        for (joint_id, joint) in joints.iter().enumerate() {
            for &rp in joint.points() {
                self.add_joint(rp, joint_id as JointId);
            }
        }

        log::debug!(
            "imported {} joints over {} roads",
            joints.len(),
            self.len
        );
    }

    /// Registers a single point as a part of a joint.
    ///
    /// # Panics
    ///
    /// Panics if the point already belongs to a joint.
    pub fn add_joint(&mut self, rp: RoadPoint, joint_id: JointId) {
        self.road_entry(rp.feature_id).add_joint(rp.point_id, joint_id);
    }

    /// Same as [RoadIndex::add_joint], with arguments in the order produced
    /// by joint-major readers.
    pub fn push_from_serializer(&mut self, joint_id: JointId, rp: RoadPoint) {
        self.add_joint(rp, joint_id);
    }

    /// Returns the joint of a road point, or `None` if the point is not a part
    /// of any joint or the feature is not indexed.
    pub fn get_joint_id(&self, rp: RoadPoint) -> Option<JointId> {
        self.get_road(rp.feature_id)
            .and_then(|road| road.get_joint_id(rp.point_id))
    }

    pub fn get_road(&self, feature_id: u32) -> Option<&RoadJointIds> {
        self.roads
            .get(feature_id as usize)
            .and_then(|road| road.as_ref())
    }

    /// Finds the nearest point with a joint along the road, see [RoadJointIds::find_neighbor].
    ///
    /// Querying a feature which is not indexed is a logic error and results in
    /// [Error::FeatureNotIndexed].
    pub fn find_neighbor(
        &self,
        rp: RoadPoint,
        forward: bool,
    ) -> Result<Option<(JointId, u32)>, Error> {
        self.get_road(rp.feature_id)
            .map(|road| road.find_neighbor(rp.point_id, forward))
            .ok_or(Error::FeatureNotIndexed(rp.feature_id))
    }

    /// Checks if the two features meet with their ends at a common joint,
    /// and if so, returns the [RestrictionPoint] anchoring a turn from
    /// `feature_from` into `feature_to`.
    ///
    /// As two-way roads may be stored with points in any order, all four pairs
    /// of ends are considered, in order: back-front, front-back, back-back and front-front.
    /// The first matching pair is returned.
    ///
    /// # Notes
    ///
    /// Ends without a joint ([INVALID_JOINT_ID]) never match each other. Two roads
    /// which only share unset ends are thus not adjacent, and the returned
    /// `center_id` is always a valid joint.
    pub fn get_adjacent_ft_points(
        &self,
        feature_from: u32,
        feature_to: u32,
    ) -> Option<RestrictionPoint> {
        let from = self.get_road(feature_from)?;
        let to = self.get_road(feature_to)?;
        if from.is_empty() || to.is_empty() {
            return None; // restrictions make no sense on roads without joints
        }

        let from_last = from.len() as u32 - 1;
        let to_last = to.len() as u32 - 1;
        let candidates = [
            (from.back(), to.front(), from_last, 0),
            (from.front(), to.back(), 0, to_last),
            (from.back(), to.back(), from_last, to_last),
            (from.front(), to.front(), 0, 0),
        ];

        candidates
            .into_iter()
            .find(|&(from_joint, to_joint, _, _)| {
                from_joint == to_joint && from_joint != INVALID_JOINT_ID
            })
            .map(|(center_id, _, from_point, to_point)| {
                RestrictionPoint::new(
                    RoadPoint::new(feature_from, from_point),
                    RoadPoint::new(feature_to, to_point),
                    center_id,
                )
            })
    }

    /// Returns an iterator over all indexed roads, in ascending feature id order.
    pub fn roads(&self) -> impl Iterator<Item = (u32, &RoadJointIds)> + '_ {
        self.roads
            .iter()
            .enumerate()
            .filter_map(|(feature_id, road)| road.as_ref().map(|r| (feature_id as u32, r)))
    }

    /// Returns an iterator over `(point_id, joint_id)` pairs of a single road.
    /// Unknown features yield no items.
    pub fn joints_of(&self, feature_id: u32) -> impl Iterator<Item = (u32, JointId)> + '_ {
        self.get_road(feature_id).into_iter().flat_map(|road| road.joints())
    }

    /// Returns the number of indexed roads.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns one more than the highest joint id referenced by any road,
    /// that is, the smallest `num_joints` accepted by [JointIndex::build](crate::JointIndex::build).
    pub fn joint_id_bound(&self) -> u32 {
        self.roads()
            .flat_map(|(_, road)| road.joints())
            .map(|(_, joint_id)| joint_id + 1)
            .max()
            .unwrap_or(0)
    }

    /// Writes the number of roads, followed by `(feature_id, RoadJointIds)` pairs
    /// in ascending feature id order.
    pub fn serialize<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        write_u32(sink, self.len as u32)?;
        for (feature_id, road) in self.roads() {
            write_u32(sink, feature_id)?;
            road.serialize(sink)?;
        }
        Ok(())
    }

    /// Replaces the contents with roads written by [RoadIndex::serialize].
    /// Roads may appear in any order, but each at most once.
    ///
    /// As roads are kept in a dense arena, a feature id must be less than
    /// 64 Ki plus 64 times the number of roads read before it
    /// (including itself), otherwise [DeserializeError::FeatureIdOutOfRange] is returned.
    pub fn deserialize<R: io::Read>(&mut self, src: &mut R) -> Result<(), DeserializeError> {
        self.roads.clear();
        self.len = 0;

        let count = read_u32(src, "road count", 1)?;
        for i in 0..count {
            let feature_id = read_u32(src, "roads", count - i)?;
            let feature_id_bound = MAX_PREALLOCATION + MAX_FEATURE_ID_SPREAD * (self.len + 1);
            if feature_id as usize >= feature_id_bound {
                return Err(DeserializeError::FeatureIdOutOfRange(feature_id));
            }
            if self.get_road(feature_id).is_some() {
                return Err(DeserializeError::DuplicateFeature(feature_id));
            }

            let mut road = RoadJointIds::new();
            road.deserialize(src)?;
            *self.road_slot(feature_id) = Some(road);
            self.len += 1;
        }
        Ok(())
    }

    fn road_slot(&mut self, feature_id: u32) -> &mut Option<RoadJointIds> {
        let idx = feature_id as usize;
        if idx >= self.roads.len() {
            self.roads.resize(idx + 1, None);
        }
        &mut self.roads[idx]
    }

    fn road_entry(&mut self, feature_id: u32) -> &mut RoadJointIds {
        if self.get_road(feature_id).is_none() {
            self.len += 1;
        }
        self.road_slot(feature_id).get_or_insert_with(RoadJointIds::new)
    }
}
