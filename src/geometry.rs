// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Position on Earth, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f32,
    pub lon: f32,
}

impl Point {
    pub const fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }
}

/// Shape and traversal attributes of a single road.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadGeometry {
    pub points: Vec<Point>,

    /// If set, the road may only be traversed in the order of increasing point ids.
    pub one_way: bool,

    /// Multiplier applied to the length of the road by the
    /// [DistanceEstimator](crate::DistanceEstimator). Must be normal and not less than one.
    pub penalty: f32,
}

impl RoadGeometry {
    /// Creates a road with a neutral penalty of 1.
    pub fn new(points: Vec<Point>, one_way: bool) -> Self {
        Self {
            points,
            one_way,
            penalty: 1.0,
        }
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn get_point(&self, point_id: u32) -> Option<Point> {
        self.points.get(point_id as usize).copied()
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }
}

/// Source of [RoadGeometries](RoadGeometry) for an [IndexGraph](crate::IndexGraph).
///
/// Decoding and caching of geometry is up to the implementor; [IndexGraph](crate::IndexGraph)
/// only ever asks for a road by its feature id.
pub trait Geometry {
    fn get_road(&self, feature_id: u32) -> Option<&RoadGeometry>;
}

impl Geometry for HashMap<u32, RoadGeometry> {
    fn get_road(&self, feature_id: u32) -> Option<&RoadGeometry> {
        self.get(&feature_id)
    }
}
