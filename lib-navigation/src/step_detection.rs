use crate::*;
use cfg_if::cfg_if;

/// Peak and rhythm filter turning accelerometer magnitude into steps. A single peak could be a
/// bump or the phone being shaken, only a second peak at a plausible walking cadence confirms
/// the user is actually walking.
///
pub struct StepDetector
{
    /// In g; samples must be strictly above this to count as a peak.
    threshold: f64,

    /// In ms; see `NavigationConfig::min_interval_ms`.
    min_interval_ms: u64,

    /// In ms; see `NavigationConfig::max_interval_ms`.
    max_interval_ms: u64,

    /// Time of the last accepted peak, `None` until the first peak (i.e. infinitely long ago).
    last_peak_time: Option<Timestamp>,

    /// Number of peaks accepted in a row at walking cadence.
    consecutive_count: u32,

    /// Magnitude of the most recently processed sample.
    #[cfg(feature = "debug")]
    pub last_magnitude: f64,
}

impl StepDetector
{
    #[inline]
    pub fn new(config: &NavigationConfig) -> Self {
        StepDetector {
            threshold: config.accel_threshold,
            min_interval_ms: config.min_interval_ms,
            max_interval_ms: config.max_interval_ms,
            last_peak_time: None,
            consecutive_count: 0,
            #[cfg(feature = "debug")]
            last_magnitude: 0.0,
        }
    }

    /// Picks up new thresholds without forgetting the current walking rhythm.
    ///
    pub fn reconfigure(&mut self, config: &NavigationConfig) {
        self.threshold = config.accel_threshold;
        self.min_interval_ms = config.min_interval_ms;
        self.max_interval_ms = config.max_interval_ms;
    }

    pub fn update(&mut self, time: Timestamp, sample: &AccelSample) -> Option<StepEvent> {
        self.update_magnitude(time, sample.magnitude())
    }

    /// Feeds one magnitude sample (in g) through the filter, returns a step if this sample
    /// confirmed one.
    ///
    pub fn update_magnitude(&mut self, time: Timestamp, magnitude: f64) -> Option<StepEvent> {
        cfg_if!{ if #[cfg(feature = "debug")] {
            self.last_magnitude = magnitude;
        }}

        // NaN compares false as well, so garbage samples fall out here.
        if !(magnitude > self.threshold) {
            return None;
        }

        // A clock running backwards gives a gap of zero, which is treated as a duplicate.
        let gap = self.last_peak_time.map(|last| time.saturating_sub(last));

        match gap {
            Some(gap) if gap <= self.min_interval_ms => {
                None
            },
            Some(gap) if gap <= self.max_interval_ms => {
                self.last_peak_time = Some(time);
                self.consecutive_count = self.consecutive_count.saturating_add(1);

                if self.consecutive_count >= 2 {
                    log::debug!("Step at {}ms (gap {}ms, {} in a row)", time, gap, self.consecutive_count);
                    Some(StepEvent { timestamp: time })
                } else {
                    None
                }
            },
            _ => {
                // First peak ever or the rhythm was lost, this peak starts a new sequence.
                self.last_peak_time = Some(time);
                self.consecutive_count = 1;
                None
            },
        }
    }

    /// Forgets the walking rhythm, the next peak starts from scratch.
    ///
    pub fn reset(&mut self) {
        self.last_peak_time = None;
        self.consecutive_count = 0;
    }

    pub fn last_peak_time(&self) -> Option<Timestamp> {
        self.last_peak_time
    }

    pub fn consecutive_count(&self) -> u32 {
        self.consecutive_count
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
