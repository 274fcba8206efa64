use math::*;
use crate::*;

/// Dead reckoning: every confirmed step moves the user a fixed distance along the current
/// compass heading.
///
/// The heading used is whatever the compass reports when the step is processed, not at the
/// exact instant of the footfall. Both streams are sampled every few tens of milliseconds, so the
/// error this introduces is small compared to the fixed step length.
///
#[derive(Debug, Clone, Copy)]
pub struct PositionIntegrator
{
    /// In meters.
    step_length: f64,
}

impl PositionIntegrator
{
    pub const fn new(step_length: f64) -> Self {
        PositionIntegrator { step_length }
    }

    pub fn step_length(&self) -> f64 {
        self.step_length
    }

    /// Displacement of a single step taken at `heading_degrees`.
    ///
    pub fn displacement(&self, heading_degrees: f64) -> Point {
        Point::from_bearing(heading_degrees, self.step_length)
    }

    /// Applies one step to the navigation state and returns the displacement that was added.
    ///
    pub fn apply(&self, state: &mut NavigationState, heading_degrees: f64) -> Point {
        let delta = self.displacement(heading_degrees);
        state.record_step(delta);
        delta
    }
}
