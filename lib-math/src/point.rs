use core::ops::{Add, AddAssign, Mul};
use crate::*;

/// A position or displacement on the floor plane, in meters. Following compass convention `x`
/// points east and `y` points north.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point
{
    pub x: f64,
    pub y: f64,
}

impl Point
{
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The origin, i.e. where every dead reckoning session starts.
    /// 
    pub const fn zero() -> Self {
        Point { x: 0.0, y: 0.0 }
    }

    /// Builds the displacement of walking `length` meters along a compass bearing. A bearing of
    /// 0° moves along +y (north) and 90° moves along +x (east).
    /// 
    pub fn from_bearing(bearing_degrees: f64, length: f64) -> Self {
        let rad = bearing_degrees * DEG_TO_RAD;
        Point {
            x: length * libm::sin(rad),
            y: length * libm::cos(rad),
        }
    }

    /// Straight line distance from the origin.
    /// 
    pub fn magnitude(&self) -> f64 {
        libm::hypot(self.x, self.y)
    }

    /// Approximate equality check with a given tolerance.
    pub fn approx_eq(&self, other: &Point, tol: f64) -> bool {
        approx_eq(self.x, other.x, tol) && approx_eq(self.y, other.y, tol)
    }
}

impl Add for Point
{
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Point
{
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Mul<f64> for Point
{
    type Output = Self;

    fn mul(self, other: f64) -> Self::Output {
        Point {
            x: self.x * other,
            y: self.y * other,
        }
    }
}
