use math::*;

/// Milliseconds on a monotonic clock. Only differences between timestamps are ever used, so
/// the epoch is whatever the host's sensor layer picks.
/// 
pub type Timestamp = u64;

/// One reading of the platform's compass, degrees clockwise from magnetic north.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample
{
    pub angle_degrees: f64,
}

impl HeadingSample {
    pub const fn new(angle_degrees: f64) -> Self {
        HeadingSample { angle_degrees }
    }
}

/// One accelerometer reading in g. A device at rest measures a magnitude of roughly 1 g.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample
{
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        AccelSample { x, y, z }
    }

    /// Total g-force regardless of how the device is held.
    /// 
    pub fn magnitude(&self) -> f64 {
        Vector::new(self.x, self.y, self.z).magnitude()
    }
}

/// Angular rate around the vertical axis in rad/s. Positive values are counter clockwise, i.e.
/// turning left.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroSample
{
    pub z: f64,
}

impl GyroSample {
    pub const fn new(z: f64) -> Self {
        GyroSample { z }
    }
}

/// A confirmed footfall.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent
{
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction
{
    Left,
    Right,
    Straight,
}

/// A sharp rotation about the vertical axis.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnEvent
{
    pub direction: Direction,

    /// Absolute angle turned when the event fired, always above the turn threshold.
    pub magnitude_degrees: f64,

    pub timestamp: Timestamp,
}

/// Transient "turn left/right" feedback shown until `expires_at`.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnAlert
{
    pub direction: Direction,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind
{
    Heading,
    Accelerometer,
    Gyroscope,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Heading,
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
    ];
}

/// Health of a single sensor stream as seen by the engine.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorStatus
{
    /// Not subscribed, e.g. before `start()` or after `stop()`.
    #[default]
    Inactive,
    Active,
    PermissionDenied,
    Unavailable,
}

impl SensorStatus {
    pub fn is_active(&self) -> bool {
        *self == SensorStatus::Active
    }

    /// The stream was requested but could not be delivered.
    /// 
    pub fn is_degraded(&self) -> bool {
        matches!(self, SensorStatus::PermissionDenied | SensorStatus::Unavailable)
    }
}

/// Discrete events queued for the voice/haptic layer.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationEvent
{
    Step(StepEvent),
    Turn(TurnEvent),
    AlertCleared { timestamp: Timestamp },
}
