use alloc::{boxed::Box, vec::Vec};
use queue::Queue;
use crate::*;

/// Number of events kept for the voice/haptic layer before the oldest ones are dropped.
pub const EVENT_QUEUE_SIZE: usize = 32;

/// One navigation session: owns the three filters, the aggregate state and the sensor
/// subscriptions. All mutation goes through `&mut self`, hosts delivering sensors on several
/// threads should wrap it in a `SharedNavigator`.
///
pub struct Navigator
{
    config: NavigationConfig,

    /// Liveness flag, every sample and timer callback is dropped while this is `false`.
    running: bool,

    heading: HeadingSource,
    steps: StepDetector,
    turns: TurnDetector,
    integrator: PositionIntegrator,
    state: NavigationState,

    accel_status: SensorStatus,
    gyro_status: SensorStatus,

    alert_timer: AlertTimer,
    scheduler: Option<Box<dyn AlertScheduler>>,

    subscriptions: Vec<Subscription>,
    events: Queue<NavigationEvent, EVENT_QUEUE_SIZE>,
}

impl Navigator
{
    pub fn new(config: NavigationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Navigator {
            config,
            running: false,
            heading: HeadingSource::new(),
            steps: StepDetector::new(&config),
            turns: TurnDetector::new(&config),
            integrator: PositionIntegrator::new(config.step_length_meters),
            state: NavigationState::new(),
            accel_status: SensorStatus::Inactive,
            gyro_status: SensorStatus::Inactive,
            alert_timer: AlertTimer::new(),
            scheduler: None,
            subscriptions: Vec::new(),
            events: Queue::new(),
        })
    }

    /// Lets a platform timer clear turn alerts exactly on time. Without one alerts are cleared
    /// by `tick` or lazily by the next sensor sample.
    ///
    pub fn with_scheduler(mut self, scheduler: Box<dyn AlertScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    // Lifecycle
    // ============================================================================================

    /// Starts a new session: zeroes the state and subscribes to all three sensor streams. Streams
    /// that fail to subscribe are recorded in their status, the rest of the engine keeps going.
    ///
    pub fn start(&mut self, hub: &mut dyn SensorHub) {
        if self.running {
            log::debug!("Navigator already running");
            return;
        }
        log::info!("Starting navigation session");

        self.state = NavigationState::new();
        self.heading.reset();
        self.steps.reset();
        self.turns.reset();
        self.events.clear();
        self.cancel_alert_timer();

        for kind in SensorKind::ALL {
            self.subscribe(hub, kind);
        }
        self.running = true;
    }

    /// Ends the session: unsubscribes every stream and cancels the pending alert expiry. Safe to
    /// call any number of times, nothing delivered afterwards has any effect.
    ///
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("Stopping navigation session after {} steps", self.state.step_count());

        for mut subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }

        // Nothing is left to clear the alert once the timer is gone.
        self.cancel_alert_timer();
        self.state.clear_turn_alert();

        self.heading.deactivate();
        if self.accel_status.is_active() {
            self.accel_status = SensorStatus::Inactive;
        }
        if self.gyro_status.is_active() {
            self.gyro_status = SensorStatus::Inactive;
        }
    }

    /// Zeroes step count and position, keeping the heading and any active turn alert.
    ///
    pub fn reset(&mut self) {
        log::info!("Resetting step count and position");
        self.state.reset();
    }

    /// Asks the hub for a stream again, e.g. after the user granted a permission that was denied
    /// at `start()`. Does nothing if the stream is already active or the session is stopped.
    ///
    pub fn retry_sensor(&mut self, hub: &mut dyn SensorHub, kind: SensorKind) {
        if !self.running || self.status(kind).is_active() {
            return;
        }
        self.subscribe(hub, kind);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // Sensor input
    // ============================================================================================

    pub fn on_heading(&mut self, now: Timestamp, sample: HeadingSample) {
        if !self.accepts(SensorKind::Heading) {
            return;
        }
        self.expire_due(now);
        let heading = self.heading.update(&sample);
        self.state.set_heading(heading);
    }

    /// Raw magnetometer reading, for hosts that have no fused heading stream.
    ///
    pub fn on_magnetometer(&mut self, now: Timestamp, x: f64, y: f64) {
        if !self.accepts(SensorKind::Heading) {
            return;
        }
        self.expire_due(now);
        let heading = self.heading.update_from_magnetometer(x, y);
        self.state.set_heading(heading);
    }

    /// Feeds one accelerometer reading, returns the step it confirmed (if any). Every step moves
    /// the position along the heading known at this moment.
    ///
    pub fn on_accel(&mut self, now: Timestamp, sample: AccelSample) -> Option<StepEvent> {
        if !self.accepts(SensorKind::Accelerometer) {
            return None;
        }
        self.expire_due(now);

        let step = self.steps.update(now, &sample)?;
        self.integrator.apply(&mut self.state, self.heading.current_heading());
        self.events.push(NavigationEvent::Step(step));
        Some(step)
    }

    /// Feeds one gyroscope reading, returns the turn it completed (if any). A turn raises the
    /// transient turn alert, replacing whatever alert was showing.
    ///
    pub fn on_gyro(&mut self, now: Timestamp, sample: GyroSample) -> Option<TurnEvent> {
        if !self.accepts(SensorKind::Gyroscope) {
            return None;
        }
        self.expire_due(now);

        let turn = self.turns.update(now, &sample)?;
        self.raise_turn_alert(now, &turn);
        self.events.push(NavigationEvent::Turn(turn));
        Some(turn)
    }

    // Alert expiry
    // ============================================================================================

    /// Clears the turn alert if it expired by `now`. Hosts without an `AlertScheduler` should call
    /// this periodically so the alert also goes away while no samples arrive.
    ///
    pub fn tick(&mut self, now: Timestamp) {
        if self.running {
            self.expire_due(now);
        }
    }

    /// Timer callback for a scheduled alert expiry. Returns `false` and changes nothing when the
    /// ticket was superseded, cancelled or the session is stopped.
    ///
    pub fn expire_alert(&mut self, ticket: AlertTicket) -> bool {
        if !self.running || !self.alert_timer.fire(ticket) {
            log::debug!("Ignoring stale alert expiry {:?}", ticket);
            return false;
        }
        self.state.clear_turn_alert();
        self.events.push(NavigationEvent::AlertCleared { timestamp: ticket.expires_at });
        true
    }

    // Configuration
    // ============================================================================================

    /// Swaps in a new configuration. Filters keep their running state, so e.g. changing the carry
    /// mode mid walk does not lose the step rhythm.
    ///
    pub fn set_config(&mut self, config: NavigationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.steps.reconfigure(&config);
        self.turns.reconfigure(&config);
        self.integrator = PositionIntegrator::new(config.step_length_meters);
        Ok(())
    }

    pub fn set_carry_mode(&mut self, mode: CarryMode) -> Result<(), ConfigError> {
        log::info!("Switching carry mode to {:?}", mode);
        let mut config = self.config;
        config.accel_threshold = mode.threshold();
        self.set_config(config)
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    // Output
    // ============================================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step_count: self.state.step_count(),
            position: self.state.position(),
            heading_degrees: self.state.heading_degrees(),
            turn_alert: self.state.turn_alert(),
            distance_meters: self.state.distance_meters(self.integrator.step_length()),
            accumulated_turn_degrees: self.turns.accumulated_degrees(),
            heading_status: self.heading.status(),
            accel_status: self.accel_status,
            gyro_status: self.gyro_status,
            running: self.running,
        }
    }

    /// Takes the oldest queued event.
    ///
    pub fn next_event(&mut self) -> Option<NavigationEvent> {
        self.events.next()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Zeroes the turn accumulator, leaving any active alert up.
    ///
    pub fn recenter_turns(&mut self) {
        self.turns.recenter();
    }

    pub fn status(&self, kind: SensorKind) -> SensorStatus {
        match kind {
            SensorKind::Heading => self.heading.status(),
            SensorKind::Accelerometer => self.accel_status,
            SensorKind::Gyroscope => self.gyro_status,
        }
    }

    /// Filter internals for offline analysis of recordings.
    #[cfg(feature = "debug")]
    pub fn step_detector(&self) -> &StepDetector {
        &self.steps
    }

    #[cfg(feature = "debug")]
    pub fn turn_detector(&self) -> &TurnDetector {
        &self.turns
    }

    // Internals
    // ============================================================================================

    fn accepts(&self, kind: SensorKind) -> bool {
        self.running && self.status(kind).is_active()
    }

    fn subscribe(&mut self, hub: &mut dyn SensorHub, kind: SensorKind) {
        let status = match hub.subscribe(kind, self.config.sample_interval_ms) {
            Ok(subscription) => {
                self.subscriptions.push(subscription);
                SensorStatus::Active
            },
            Err(err) => {
                log::warn!("Could not subscribe to {:?}: {}", kind, err);
                SensorStatus::from(err)
            },
        };

        match (kind, status) {
            (SensorKind::Heading, SensorStatus::PermissionDenied) => self.heading.fail(SensorError::PermissionDenied),
            (SensorKind::Heading, SensorStatus::Unavailable) => self.heading.fail(SensorError::Unavailable),
            (SensorKind::Heading, _) => self.heading.activate(),
            (SensorKind::Accelerometer, _) => self.accel_status = status,
            (SensorKind::Gyroscope, _) => self.gyro_status = status,
        }

        if kind == SensorKind::Heading {
            self.state.set_heading(self.heading.current_heading());
        }
    }

    fn raise_turn_alert(&mut self, now: Timestamp, turn: &TurnEvent) {
        if let Some(previous) = self.alert_timer.pending() {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel(previous);
            }
        }

        let ticket = self.alert_timer.schedule(now, self.config.alert_duration_ms);
        self.state.set_turn_alert(TurnAlert {
            direction: turn.direction,
            expires_at: ticket.expires_at,
        });

        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.schedule(ticket);
        }
    }

    fn expire_due(&mut self, now: Timestamp) {
        if let Some(ticket) = self.alert_timer.due(now) {
            self.expire_alert(ticket);
        }
    }

    fn cancel_alert_timer(&mut self) {
        if let Some(ticket) = self.alert_timer.cancel() {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel(ticket);
            }
        }
    }
}
