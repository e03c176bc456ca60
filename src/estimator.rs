// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, RoadGeometry};

/// Computes the cost of moving along a road between two of its points.
///
/// The returned weight must be deterministic and non-negative,
/// otherwise the results of route searching are undefined.
pub trait EdgeEstimator {
    fn calc_edges_weight(
        &self,
        feature_id: u32,
        road: &RoadGeometry,
        point_from: u32,
        point_to: u32,
    ) -> f64;
}

impl<F> EdgeEstimator for F
where
    F: Fn(u32, &RoadGeometry, u32, u32) -> f64,
{
    fn calc_edges_weight(
        &self,
        feature_id: u32,
        road: &RoadGeometry,
        point_from: u32,
        point_to: u32,
    ) -> f64 {
        self(feature_id, road, point_from, point_to)
    }
}

/// [EdgeEstimator] returning the length of the road stretch between the two points
/// (in kilometers, following [earth_distance]) multiplied by the [road penalty](RoadGeometry::penalty).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DistanceEstimator;

impl EdgeEstimator for DistanceEstimator {
    fn calc_edges_weight(
        &self,
        _feature_id: u32,
        road: &RoadGeometry,
        point_from: u32,
        point_to: u32,
    ) -> f64 {
        debug_assert!(
            point_from.max(point_to) < road.point_count(),
            "point {} out of range for a road with {} points",
            point_from.max(point_to),
            road.point_count()
        );

        let start = point_from.min(point_to) as usize;
        let end = (point_from.max(point_to) as usize).min(road.points.len().saturating_sub(1));
        if start >= end {
            return 0.0;
        }

        let length: f64 = road.points[start..=end]
            .windows(2)
            .map(|pair| earth_distance(pair[0], pair[1]))
            .sum();

        length * road.penalty as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-4),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn sample_road() -> RoadGeometry {
        RoadGeometry::new(
            vec![
                Point::new(52.23024, 21.01062),
                Point::new(52.23852, 21.0446),
                Point::new(52.16125, 21.21147),
            ],
            false,
        )
    }

    #[test]
    fn distance_estimator() {
        let road = sample_road();
        let first = DistanceEstimator.calc_edges_weight(0, &road, 0, 1);
        let second = DistanceEstimator.calc_edges_weight(0, &road, 1, 2);
        let whole = DistanceEstimator.calc_edges_weight(0, &road, 0, 2);

        assert_almost_eq!(first, 2.49049);
        assert_almost_eq!(whole, first + second);
        assert_eq!(DistanceEstimator.calc_edges_weight(0, &road, 2, 0), whole);
        assert_eq!(DistanceEstimator.calc_edges_weight(0, &road, 1, 1), 0.0);
    }

    #[test]
    fn distance_estimator_penalty() {
        let mut road = sample_road();
        let base = DistanceEstimator.calc_edges_weight(0, &road, 0, 1);
        road.penalty = 2.5;
        assert_almost_eq!(DistanceEstimator.calc_edges_weight(0, &road, 0, 1), base * 2.5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn distance_estimator_point_out_of_range() {
        DistanceEstimator.calc_edges_weight(0, &sample_road(), 1, 3);
    }

    #[test]
    fn closure_estimator() {
        let estimator = |feature_id: u32, _: &RoadGeometry, from: u32, to: u32| {
            (feature_id * 100 + from * 10 + to) as f64
        };
        assert_eq!(estimator.calc_edges_weight(3, &sample_road(), 1, 2), 312.0);
    }
}
