#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod types;
pub use types::*;

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod heading_source;
pub use heading_source::*;

pub mod step_detection;
pub use step_detection::*;

pub mod turn_detection;
pub use turn_detection::*;

pub mod position;
pub use position::*;

pub mod alert;
pub use alert::*;

pub mod state;
pub use state::*;

pub mod subscription;
pub use subscription::*;

pub mod navigator;
pub use navigator::*;

#[cfg(feature = "std")]
pub mod shared;
#[cfg(feature = "std")]
pub use shared::*;

#[cfg(test)]
pub mod tests;
