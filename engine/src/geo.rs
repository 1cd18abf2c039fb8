//! Great circle geometry on a spherical earth.

use crate::datastr::graph::Node;

/// Mean earth radius in meters.
pub const EARTH_RADIUS: f64 = 6371e3;

/// Great circle distance between two positions in meters.
pub fn haversine(a: &Node, b: &Node) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let delta_phi = phi_b - phi_a;
    let delta_lambda = (b.lon - a.lon).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2) + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}
