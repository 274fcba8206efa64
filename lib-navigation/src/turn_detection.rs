use math::*;
use crate::*;
use cfg_if::cfg_if;

/// Integrates the gyroscope's vertical rate into an angle and fires once the user rotated past
/// the threshold in either direction. Only meant for immediate "turn left/right" feedback, the
/// heading itself comes from the compass.
///
pub struct TurnDetector
{
    /// In degrees.
    threshold: f64,

    /// In ms; longer gaps between samples are not integrated.
    max_gap_ms: u64,

    /// In degrees; positive is counter clockwise (left).
    accumulated_degrees: f64,

    /// Time of the previous sample, `None` until the first one arrives.
    last_sample_time: Option<Timestamp>,

    /// Samples skipped because of a stale or backwards delta.
    discarded: u64,

    /// Rotation added by the last sample, zero when it was only used as reference or discarded.
    #[cfg(feature = "debug")]
    pub last_delta_degrees: f64,
}

impl TurnDetector
{
    #[inline]
    pub fn new(config: &NavigationConfig) -> Self {
        TurnDetector {
            threshold: config.turn_threshold_degrees,
            max_gap_ms: config.max_gyro_gap_ms,
            accumulated_degrees: 0.0,
            last_sample_time: None,
            discarded: 0,
            #[cfg(feature = "debug")]
            last_delta_degrees: 0.0,
        }
    }

    pub fn reconfigure(&mut self, config: &NavigationConfig) {
        self.threshold = config.turn_threshold_degrees;
        self.max_gap_ms = config.max_gyro_gap_ms;
    }

    /// Integrates one sample, returns a turn if the accumulated angle crossed the threshold.
    ///
    pub fn update(&mut self, time: Timestamp, sample: &GyroSample) -> Option<TurnEvent> {
        cfg_if!{ if #[cfg(feature = "debug")] {
            self.last_delta_degrees = 0.0;
        }}

        // The first sample only gives us a reference time.
        let last = self.last_sample_time.replace(time)?;

        if !sample.z.is_finite() {
            log::warn!("Ignoring non-finite gyroscope sample at {}ms", time);
            self.discarded += 1;
            return None;
        }

        // After a suspension the delta can be seconds long, integrating it would turn a slow
        // drift into a huge fake rotation.
        if time < last || time - last > self.max_gap_ms {
            log::warn!("Discarding gyroscope sample at {}ms, previous one was at {}ms", time, last);
            self.discarded += 1;
            return None;
        }

        let dt = (time - last) as f64 / 1000.0;
        let delta = sample.z * RAD_TO_DEG * dt;
        self.accumulated_degrees += delta;

        cfg_if!{ if #[cfg(feature = "debug")] {
            self.last_delta_degrees = delta;
        }}

        let direction = if self.accumulated_degrees > self.threshold {
            Direction::Left
        } else if self.accumulated_degrees < -self.threshold {
            Direction::Right
        } else {
            return None;
        };

        let event = TurnEvent {
            direction,
            magnitude_degrees: libm::fabs(self.accumulated_degrees),
            timestamp: time,
        };
        log::debug!("Turned {:?} by {:.1}° at {}ms", event.direction, event.magnitude_degrees, time);

        self.accumulated_degrees = 0.0;
        Some(event)
    }

    /// Zeroes the accumulated angle, e.g. when the user re-centers the device.
    ///
    pub fn recenter(&mut self) {
        self.accumulated_degrees = 0.0;
    }

    /// Full reset including the reference time, the next sample only seeds the clock again.
    ///
    pub fn reset(&mut self) {
        self.accumulated_degrees = 0.0;
        self.last_sample_time = None;
    }

    pub fn accumulated_degrees(&self) -> f64 {
        self.accumulated_degrees
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}
