// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Point;

/// Mean radius of Earth, in kilometers.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6371.0088;

/// Calculates the great-circle distance between two points
/// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in kilometers.
pub fn earth_distance(a: Point, b: Point) -> f64 {
    let lat1 = (a.lat as f64).to_radians();
    let lon1 = (a.lon as f64).to_radians();
    let lat2 = (b.lat as f64).to_radians();
    let lon2 = (b.lon as f64).to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    2.0 * EARTH_RADIUS * h.sqrt().asin()
}
