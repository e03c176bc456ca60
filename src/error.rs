// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

use crate::JointId;

/// Logic errors which may be reported by graph queries.
///
/// None of these happen with well-formed input; they signal a caller querying
/// a road or joint which was never indexed, and should not be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The feature has no entry in the [RoadIndex](crate::RoadIndex).
    #[error("feature {0} is not indexed")]
    FeatureNotIndexed(u32),

    /// The [Geometry](crate::Geometry) provider doesn't know the feature.
    #[error("no geometry for feature {0}")]
    UnknownRoad(u32),

    /// A point id exceeds the number of points of a road.
    #[error("point {point_id} out of range for feature {feature_id} with {point_count} points")]
    PointOutOfRange {
        feature_id: u32,
        point_id: u32,
        point_count: u32,
    },

    /// The joint has no points in the [JointIndex](crate::JointIndex).
    #[error("unknown joint {0}")]
    UnknownJoint(JointId),
}

/// Error which can occur when reading a serialized [RoadIndex](crate::RoadIndex)
/// or [RoadJointIds](crate::RoadJointIds).
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("stream ended while reading {what}: expected {expected} more values")]
    Truncated { what: &'static str, expected: u32 },

    #[error("feature {0} appears more than once")]
    DuplicateFeature(u32),

    /// The feature id is too far apart from the number of roads read so far
    /// to be stored in the dense road arena.
    #[error("feature id {0} out of range")]
    FeatureIdOutOfRange(u32),
}
