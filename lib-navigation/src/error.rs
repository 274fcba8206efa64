use core::{error::Error, fmt};

use crate::SensorStatus;

/// Rejected navigation configuration.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError
{
    AccelThreshold(f64),
    Intervals { min_ms: u64, max_ms: u64 },
    TurnThreshold(f64),
    AlertDuration,
    StepLength(f64),
    SampleInterval,
    GyroGap { max_gap_ms: u64, sample_interval_ms: u64 },
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AccelThreshold(g) => write!(f, "Accelerometer threshold must be a positive number of g, got {}", g),
            Self::Intervals { min_ms, max_ms } => write!(f, "Step interval window is empty: min {}ms, max {}ms", min_ms, max_ms),
            Self::TurnThreshold(deg) => write!(f, "Turn threshold must be a positive angle, got {}°", deg),
            Self::AlertDuration => write!(f, "Turn alert duration must be longer than 0ms"),
            Self::StepLength(m) => write!(f, "Step length must be a positive distance, got {}m", m),
            Self::SampleInterval => write!(f, "Sensor sampling interval must be longer than 0ms"),
            Self::GyroGap { max_gap_ms, sample_interval_ms } => write!(
                f, "Maximum gyroscope gap of {}ms is shorter than the {}ms sampling interval", 
                max_gap_ms, sample_interval_ms
            ),
        }
    }
}

/// Reasons a sensor stream can fail to subscribe. These never cross the engine boundary, they are
/// absorbed into a `SensorStatus`.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError
{
    PermissionDenied,
    Unavailable,
}

impl Error for SensorError {}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Permission to access the sensor was denied"),
            Self::Unavailable => write!(f, "Sensor hardware is not available"),
        }
    }
}

impl From<SensorError> for SensorStatus
{
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::PermissionDenied => SensorStatus::PermissionDenied,
            SensorError::Unavailable => SensorStatus::Unavailable,
        }
    }
}
