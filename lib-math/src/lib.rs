#![cfg_attr(not(test), no_std)]

pub mod float_utils;
pub use float_utils::*;

pub mod angles;
pub use angles::*;

pub mod vector;
pub use vector::*;

pub mod point;
pub use point::*;

#[cfg(test)]
mod tests;

pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;

pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;
