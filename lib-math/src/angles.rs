use crate::*;

/// Labels of the eight compass points, starting at north and going clockwise.
/// 
const CARDINALS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Wraps any angle in degrees into the `[0, 360)` range. Non-finite input yields `0.0` since a
/// heading must always be a real bearing.
/// 
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = libm::fmod(degrees, 360.0);
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };

    // Adding 360 to a tiny negative value can round up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Gets the nearest of the eight compass points (N, NE, E, ...) for a heading in degrees.
/// 
pub fn cardinal(degrees: f64) -> &'static str {
    let index = libm::round(normalize_degrees(degrees) / 45.0) as usize % CARDINALS.len();
    CARDINALS[index]
}

/// Computes a compass heading from the horizontal components of a raw magnetometer reading. The
/// device's top edge is the reference direction, so the `atan2` result is rotated by a quarter
/// turn before being wrapped.
/// 
pub fn heading_from_magnetometer(x: f64, y: f64) -> f64 {
    normalize_degrees(libm::atan2(y, x) * RAD_TO_DEG - 90.0)
}
