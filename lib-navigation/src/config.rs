use math::*;
use crate::*;

/// Peaks closer together than this are faster than anyone walks or runs (~3 steps/sec).
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 350;

/// A longer pause between peaks means the walking rhythm was lost.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 1500;

pub const DEFAULT_TURN_THRESHOLD_DEGREES: f64 = 45.0;

pub const DEFAULT_ALERT_DURATION_MS: u64 = 1500;

/// Average adult step.
pub const DEFAULT_STEP_LENGTH_METERS: f64 = 0.75;

/// 20Hz, a reasonable balance between battery and accuracy.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 50;

/// Gyroscope samples arriving after a longer silence (e.g. the app was suspended) are not
/// integrated.
pub const DEFAULT_MAX_GYRO_GAP_MS: u64 = 500;

/// How the phone is carried, which determines how strongly footfalls show up in the
/// accelerometer.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarryMode
{
    /// Held in the hand while filming, needs to be strict to ignore shaking.
    Handheld,

    /// Strapped to the chest, the body absorbs most of the shock so needs to be sensitive.
    ChestMounted,

    /// The single threshold used by the combined navigation screen.
    Legacy,
}

impl CarryMode {

    /// Step peak threshold in g for this carry mode.
    ///
    pub fn threshold(&self) -> f64 {
        match self {
            Self::Handheld => 1.3,
            Self::ChestMounted => 1.1,
            Self::Legacy => 1.25,
        }
    }
}

/// Every tunable of the engine. There is deliberately no `Default`, the accelerometer threshold
/// depends on how the device is carried and must be picked by the caller.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationConfig
{
    /// In g; magnitude a sample must exceed to count as a step peak.
    pub accel_threshold: f64,

    /// In ms; peaks this close to the previous one (or closer) are ignored.
    pub min_interval_ms: u64,

    /// In ms; peaks further apart than this restart the rhythm check.
    pub max_interval_ms: u64,

    /// In degrees; accumulated rotation that fires a turn alert.
    pub turn_threshold_degrees: f64,

    /// In ms; how long a turn alert stays up.
    pub alert_duration_ms: u64,

    /// In meters; distance covered by every detected step.
    pub step_length_meters: f64,

    /// In ms; sampling interval requested from the accelerometer and gyroscope streams.
    pub sample_interval_ms: u64,

    /// In ms; gyroscope deltas longer than this are discarded instead of integrated.
    pub max_gyro_gap_ms: u64,
}

impl NavigationConfig {

    pub fn new(accel_threshold: f64) -> Self {
        NavigationConfig {
            accel_threshold,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            turn_threshold_degrees: DEFAULT_TURN_THRESHOLD_DEGREES,
            alert_duration_ms: DEFAULT_ALERT_DURATION_MS,
            step_length_meters: DEFAULT_STEP_LENGTH_METERS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            max_gyro_gap_ms: DEFAULT_MAX_GYRO_GAP_MS,
        }
    }

    pub fn for_carry_mode(mode: CarryMode) -> Self {
        Self::new(mode.threshold())
    }

    pub fn with_step_intervals(mut self, min_interval_ms: u64, max_interval_ms: u64) -> Self {
        self.min_interval_ms = min_interval_ms;
        self.max_interval_ms = max_interval_ms;
        self
    }

    pub fn with_turn_threshold(mut self, degrees: f64) -> Self {
        self.turn_threshold_degrees = degrees;
        self
    }

    pub fn with_alert_duration(mut self, duration_ms: u64) -> Self {
        self.alert_duration_ms = duration_ms;
        self
    }

    pub fn with_step_length(mut self, meters: f64) -> Self {
        self.step_length_meters = meters;
        self
    }

    pub fn with_sample_interval(mut self, interval_ms: u64) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    pub fn with_max_gyro_gap(mut self, gap_ms: u64) -> Self {
        self.max_gyro_gap_ms = gap_ms;
        self
    }

    /// Checks every parameter, returning the first problem found.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.accel_threshold) {
            return Err(ConfigError::AccelThreshold(self.accel_threshold));
        }
        if self.min_interval_ms >= self.max_interval_ms {
            return Err(ConfigError::Intervals {
                min_ms: self.min_interval_ms,
                max_ms: self.max_interval_ms,
            });
        }
        if !is_positive(self.turn_threshold_degrees) {
            return Err(ConfigError::TurnThreshold(self.turn_threshold_degrees));
        }
        if self.alert_duration_ms == 0 {
            return Err(ConfigError::AlertDuration);
        }
        if !is_positive(self.step_length_meters) {
            return Err(ConfigError::StepLength(self.step_length_meters));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::SampleInterval);
        }
        if self.max_gyro_gap_ms < self.sample_interval_ms {
            return Err(ConfigError::GyroGap {
                max_gap_ms: self.max_gyro_gap_ms,
                sample_interval_ms: self.sample_interval_ms,
            });
        }
        Ok(())
    }
}
