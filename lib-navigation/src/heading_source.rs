use math::*;
use crate::*;

/// Heading reported while no usable compass stream is available.
pub const DEFAULT_HEADING_DEGREES: f64 = 0.0;

/// Latest compass heading. No smoothing is done, the most recent sample is authoritative.
///
#[derive(Debug, Clone)]
pub struct HeadingSource
{
    heading: f64,
    status: SensorStatus,
}

impl HeadingSource
{
    #[inline]
    pub fn new() -> Self {
        HeadingSource {
            heading: DEFAULT_HEADING_DEGREES,
            status: SensorStatus::Inactive,
        }
    }

    /// The stream was subscribed successfully, samples are accepted from now on.
    ///
    pub fn activate(&mut self) {
        self.status = SensorStatus::Active;
    }

    /// Freezes the heading at the default and flags the source as degraded. It stays that way
    /// until the caller decides to subscribe again, nothing is retried here.
    ///
    pub fn fail(&mut self, err: SensorError) {
        log::warn!("Heading unavailable ({}), using {}° from now on", err, DEFAULT_HEADING_DEGREES);
        self.heading = DEFAULT_HEADING_DEGREES;
        self.status = err.into();
    }

    /// Unsubscribed; the last heading is kept for anyone still looking at it.
    ///
    pub fn deactivate(&mut self) {
        if self.status.is_active() {
            self.status = SensorStatus::Inactive;
        }
    }

    /// Records a new compass reading and returns the normalized heading. Readings are ignored
    /// while the source is not active and when they are not finite numbers.
    ///
    pub fn update(&mut self, sample: &HeadingSample) -> f64 {
        if !self.status.is_active() {
            return self.heading;
        }
        if !sample.angle_degrees.is_finite() {
            log::warn!("Ignoring non-finite heading sample");
            return self.heading;
        }
        self.heading = normalize_degrees(sample.angle_degrees);
        self.heading
    }

    /// Same as `update` but derives the heading from the horizontal components of a raw
    /// magnetometer reading, for platforms without a fused compass stream.
    ///
    pub fn update_from_magnetometer(&mut self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring non-finite magnetometer sample");
            return self.heading;
        }
        self.update(&HeadingSample::new(heading_from_magnetometer(x, y)))
    }

    pub fn current_heading(&self) -> f64 {
        self.heading
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }

    /// Back to the default heading, used when a new session starts.
    ///
    pub fn reset(&mut self) {
        self.heading = DEFAULT_HEADING_DEGREES;
        self.status = SensorStatus::Inactive;
    }
}

impl Default for HeadingSource {
    fn default() -> Self {
        Self::new()
    }
}
