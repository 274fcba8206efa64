use math::*;
use crate::*;

/// Aggregate state of one navigation session. Only the navigator mutates it, the presentation
/// layer works on `Snapshot` copies.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState
{
    step_count: u64,

    /// In meters, relative to where the session started (or was last reset).
    position: Point,

    /// In degrees, always within `[0, 360)`.
    heading_degrees: f64,

    turn_alert: Option<TurnAlert>,
}

impl NavigationState
{
    pub const fn new() -> Self {
        NavigationState {
            step_count: 0,
            position: Point::zero(),
            heading_degrees: 0.0,
            turn_alert: None,
        }
    }

    /// Adds one step worth of displacement.
    ///
    pub fn record_step(&mut self, displacement: Point) {
        self.step_count = self.step_count.saturating_add(1);
        self.position += displacement;
    }

    pub fn set_heading(&mut self, degrees: f64) {
        self.heading_degrees = normalize_degrees(degrees);
        debug_assert!((0.0..360.0).contains(&self.heading_degrees));
    }

    /// Replaces any current alert.
    ///
    pub fn set_turn_alert(&mut self, alert: TurnAlert) {
        self.turn_alert = Some(alert);
    }

    pub fn clear_turn_alert(&mut self) {
        self.turn_alert = None;
    }

    /// Zeroes step count and position. Heading and any active turn alert are left alone.
    ///
    pub fn reset(&mut self) {
        self.step_count = 0;
        self.position = Point::zero();
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading_degrees
    }

    pub fn turn_alert(&self) -> Option<TurnAlert> {
        self.turn_alert
    }

    /// Distance walked along the path, as opposed to the straight line distance of `position`.
    ///
    pub fn distance_meters(&self, step_length: f64) -> f64 {
        self.step_count as f64 * step_length
    }
}

/// Immutable copy of everything the presentation/voice layer needs to render.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot
{
    pub step_count: u64,
    pub position: Point,
    pub heading_degrees: f64,
    pub turn_alert: Option<TurnAlert>,

    /// In meters; steps times step length.
    pub distance_meters: f64,

    /// In degrees; live value of the turn accumulator.
    pub accumulated_turn_degrees: f64,

    pub heading_status: SensorStatus,
    pub accel_status: SensorStatus,
    pub gyro_status: SensorStatus,

    pub running: bool,
}

impl Snapshot
{
    /// The heading is frozen at its default because the compass could not be used.
    ///
    pub fn is_degraded(&self) -> bool {
        self.heading_status.is_degraded()
    }

    /// What to tell the user right now, `Straight` unless a turn alert is active.
    ///
    pub fn direction(&self) -> Direction {
        self.turn_alert
            .map(|alert| alert.direction)
            .unwrap_or(Direction::Straight)
    }

    pub fn cardinal(&self) -> &'static str {
        cardinal(self.heading_degrees)
    }
}
