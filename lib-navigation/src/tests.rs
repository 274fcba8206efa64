use std::sync::{Arc, Mutex, atomic::{AtomicUsize, Ordering}};
use std::thread;
use math::*;
use crate::*;

/// Sensor layer double granting every stream except the ones told to fail.
///
#[derive(Default)]
struct FakeHub
{
    failures: Vec<(SensorKind, SensorError)>,
    subscribed: Vec<(SensorKind, u64)>,
    cancelled: Arc<AtomicUsize>,
}

impl FakeHub {
    fn failing(kind: SensorKind, err: SensorError) -> Self {
        FakeHub { failures: vec![(kind, err)], ..Default::default() }
    }
}

impl SensorHub for FakeHub {
    fn subscribe(&mut self, kind: SensorKind, interval_ms: u64) -> Result<Subscription, SensorError> {
        if let Some((_, err)) = self.failures.iter().find(|(k, _)| *k == kind) {
            return Err(*err);
        }
        self.subscribed.push((kind, interval_ms));
        let cancelled = self.cancelled.clone();
        Ok(Subscription::new(kind, move || {
            cancelled.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerCall
{
    Schedule(AlertTicket),
    Cancel(AlertTicket),
}

/// Platform timer double that just records what it was asked to do.
///
#[derive(Clone, Default)]
struct RecordingScheduler
{
    calls: Arc<Mutex<Vec<TimerCall>>>,
}

impl RecordingScheduler {
    fn calls(&self) -> Vec<TimerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl AlertScheduler for RecordingScheduler {
    fn schedule(&mut self, ticket: AlertTicket) {
        self.calls.lock().unwrap().push(TimerCall::Schedule(ticket));
    }

    fn cancel(&mut self, ticket: AlertTicket) {
        self.calls.lock().unwrap().push(TimerCall::Cancel(ticket));
    }
}

const PEAK: AccelSample = AccelSample::new(0.0, 0.0, 1.5);
const REST: AccelSample = AccelSample::new(0.0, 0.0, 1.0);

fn started(config: NavigationConfig) -> (Navigator, FakeHub) {
    let mut hub = FakeHub::default();
    let mut nav = Navigator::new(config).unwrap();
    nav.start(&mut hub);
    (nav, hub)
}

/// Walks `peaks` footfalls 500ms apart starting at `start`. The first peak after a pause only
/// establishes the rhythm, so this counts `peaks - 1` steps. Returns the time after the walk.
fn walk(nav: &mut Navigator, start: Timestamp, peaks: u64) -> Timestamp {
    for i in 0..peaks {
        let t = start + i * 500;
        nav.on_accel(t, PEAK);
        nav.on_accel(t + 250, REST);
    }
    start + peaks * 500
}

/// Rotates at `z` rad/s for half a second and returns the first turn this produced.
fn turn(nav: &mut Navigator, start: Timestamp, z: f64) -> Option<TurnEvent> {
    (0..10)
        .filter_map(|i| nav.on_gyro(start + i * 50, GyroSample::new(z)))
        .next()
}

#[test]
fn test_walk_along_two_corridors() {
    let (mut nav, _hub) = started(NavigationConfig::for_carry_mode(CarryMode::Legacy));

    nav.on_heading(0, HeadingSample::new(0.0));
    let t = walk(&mut nav, 0, 11);
    assert_eq!(nav.snapshot().step_count, 10);
    assert!(nav.snapshot().position.approx_eq(&Point::new(0.0, 7.5), 1e-6));

    // The rhythm is still going, every peak in the second corridor counts.
    nav.on_heading(t, HeadingSample::new(90.0));
    walk(&mut nav, t, 4);

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.step_count, 14);
    assert!(snapshot.position.approx_eq(&Point::new(3.0, 7.5), 1e-6), "{:?}", snapshot.position);
    assert!(approx_eq(snapshot.distance_meters, 10.5, 1e-9));
    assert_eq!(snapshot.cardinal(), "E");
}

#[test]
fn test_position_matches_closed_form() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    let heading = 33.0;
    nav.on_heading(0, HeadingSample::new(heading));

    walk(&mut nav, 0, 26);

    let n = 25.0;
    let rad = heading * DEG_TO_RAD;
    let expected = Point::new(n * 0.75 * libm::sin(rad), n * 0.75 * libm::cos(rad));
    assert_eq!(nav.snapshot().step_count, 25);
    assert!(nav.snapshot().position.approx_eq(&expected, 1e-6));
}

#[test]
fn test_reset_keeps_heading_and_alert() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    nav.on_heading(0, HeadingSample::new(200.0));
    walk(&mut nav, 0, 5);
    let turn = turn(&mut nav, 3000, 2.0).unwrap();

    nav.reset();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.step_count, 0);
    assert_eq!(snapshot.position, Point::zero());
    assert_eq!(snapshot.heading_degrees, 200.0);
    assert_eq!(snapshot.direction(), turn.direction);
    assert!(snapshot.turn_alert.is_some());
}

#[test]
fn test_alert_expires_on_tick() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    let event = turn(&mut nav, 1000, 2.0).unwrap();
    assert_eq!(event.direction, Direction::Left);
    assert_eq!(event.timestamp, 1400);

    let alert = nav.snapshot().turn_alert.unwrap();
    assert_eq!(alert.expires_at, 1400 + DEFAULT_ALERT_DURATION_MS);

    nav.tick(alert.expires_at - 1);
    assert_eq!(nav.snapshot().direction(), Direction::Left);

    nav.tick(alert.expires_at);
    assert_eq!(nav.snapshot().turn_alert, None);
    assert_eq!(nav.snapshot().direction(), Direction::Straight);
}

#[test]
fn test_alert_expires_on_any_later_sample() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    turn(&mut nav, 1000, -2.0).unwrap();
    assert_eq!(nav.snapshot().direction(), Direction::Right);

    // No more gyro samples, but the accelerometer keeps running.
    nav.on_accel(5000, REST);
    assert_eq!(nav.snapshot().turn_alert, None);
}

#[test]
fn test_scheduler_fires_alert_expiry() {
    let scheduler = RecordingScheduler::default();
    let mut hub = FakeHub::default();
    let mut nav = Navigator::new(NavigationConfig::new(1.2).with_alert_duration(2000))
        .unwrap()
        .with_scheduler(Box::new(scheduler.clone()));
    nav.start(&mut hub);

    turn(&mut nav, 1000, 2.0).unwrap();
    let calls = scheduler.calls();
    let ticket = match calls.as_slice() {
        [TimerCall::Schedule(ticket)] => *ticket,
        other => panic!("unexpected timer calls {:?}", other),
    };
    assert_eq!(ticket.expires_at, 3400);

    assert!(nav.expire_alert(ticket));
    assert_eq!(nav.snapshot().turn_alert, None);

    // Firing twice is harmless.
    assert!(!nav.expire_alert(ticket));
}

#[test]
fn test_newer_turn_replaces_alert_and_timer() {
    let scheduler = RecordingScheduler::default();
    let mut hub = FakeHub::default();
    let mut nav = Navigator::new(NavigationConfig::new(1.2))
        .unwrap()
        .with_scheduler(Box::new(scheduler.clone()));
    nav.start(&mut hub);

    turn(&mut nav, 1000, 2.0).unwrap();
    nav.recenter_turns();
    let second = turn(&mut nav, 1500, -2.0).unwrap();

    let calls = scheduler.calls();
    assert_eq!(calls.len(), 3);
    let (first, replaced) = match calls.as_slice() {
        [TimerCall::Schedule(a), TimerCall::Cancel(b), TimerCall::Schedule(_)] => (*a, *b),
        other => panic!("unexpected timer calls {:?}", other),
    };
    assert_eq!(first, replaced);

    // Exactly one alert, for the newest turn.
    let alert = nav.snapshot().turn_alert.unwrap();
    assert_eq!(alert.direction, Direction::Right);
    assert_eq!(alert.expires_at, second.timestamp + DEFAULT_ALERT_DURATION_MS);

    // The superseded timer firing late must not clear the new alert.
    assert!(!nav.expire_alert(first));
    assert_eq!(nav.snapshot().direction(), Direction::Right);
}

#[test]
fn test_stop_is_idempotent_and_final() {
    let scheduler = RecordingScheduler::default();
    let mut hub = FakeHub::default();
    let mut nav = Navigator::new(NavigationConfig::new(1.2))
        .unwrap()
        .with_scheduler(Box::new(scheduler.clone()));
    nav.start(&mut hub);

    nav.on_heading(0, HeadingSample::new(90.0));
    walk(&mut nav, 0, 3);
    turn(&mut nav, 2000, 2.0).unwrap();
    let ticket = match scheduler.calls()[0] {
        TimerCall::Schedule(ticket) => ticket,
        other => panic!("unexpected timer call {:?}", other),
    };

    nav.stop();
    let after_stop = nav.snapshot();
    nav.stop();

    assert_eq!(hub.cancelled.load(Ordering::SeqCst), 3);
    assert!(!after_stop.running);
    assert_eq!(after_stop.turn_alert, None);
    assert_eq!(scheduler.calls().last(), Some(&TimerCall::Cancel(ticket)));

    // Late deliveries and timer firings change nothing.
    assert_eq!(nav.on_accel(5000, PEAK), None);
    assert_eq!(nav.on_accel(5500, PEAK), None);
    assert_eq!(nav.on_gyro(5600, GyroSample::new(100.0)), None);
    nav.on_heading(5700, HeadingSample::new(10.0));
    assert!(!nav.expire_alert(ticket));
    nav.tick(10_000);

    assert_eq!(nav.snapshot(), after_stop);
    assert_eq!(after_stop.step_count, 2);
}

#[test]
fn test_restart_starts_from_scratch() {
    let (mut nav, mut hub) = started(NavigationConfig::new(1.2));
    nav.on_heading(0, HeadingSample::new(45.0));
    walk(&mut nav, 0, 4);
    nav.stop();

    nav.start(&mut hub);
    let snapshot = nav.snapshot();
    assert!(snapshot.running);
    assert_eq!(snapshot.step_count, 0);
    assert_eq!(snapshot.position, Point::zero());
    assert_eq!(snapshot.heading_degrees, 0.0);
    assert_eq!(nav.pending_events(), 0);
    assert_eq!(hub.subscribed.len(), 6);
}

#[test]
fn test_start_twice_does_not_resubscribe() {
    let (mut nav, mut hub) = started(NavigationConfig::new(1.2));
    nav.start(&mut hub);
    assert_eq!(hub.subscribed.len(), 3);
    assert!(hub.subscribed.iter().all(|(_, interval)| *interval == DEFAULT_SAMPLE_INTERVAL_MS));
}

#[test]
fn test_heading_permission_denied_degrades() {
    let mut hub = FakeHub::failing(SensorKind::Heading, SensorError::PermissionDenied);
    let mut nav = Navigator::new(NavigationConfig::new(1.2)).unwrap();
    nav.start(&mut hub);

    let snapshot = nav.snapshot();
    assert!(snapshot.is_degraded());
    assert_eq!(snapshot.heading_status, SensorStatus::PermissionDenied);
    assert_eq!(snapshot.accel_status, SensorStatus::Active);

    // Samples from the denied stream are ignored, steps keep going north.
    nav.on_heading(0, HeadingSample::new(90.0));
    walk(&mut nav, 0, 5);
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.heading_degrees, DEFAULT_HEADING_DEGREES);
    assert_eq!(snapshot.step_count, 4);
    assert!(snapshot.position.approx_eq(&Point::new(0.0, 3.0), 1e-6));

    // Turns are still tracked as well.
    assert!(turn(&mut nav, 4000, 2.0).is_some());
}

#[test]
fn test_heading_unavailable_degrades() {
    let mut hub = FakeHub::failing(SensorKind::Heading, SensorError::Unavailable);
    let mut nav = Navigator::new(NavigationConfig::new(1.2)).unwrap();
    nav.start(&mut hub);

    let snapshot = nav.snapshot();
    assert!(snapshot.is_degraded());
    assert_eq!(snapshot.heading_status, SensorStatus::Unavailable);
    assert_eq!(snapshot.gyro_status, SensorStatus::Active);

    nav.on_heading(0, HeadingSample::new(180.0));
    nav.on_magnetometer(0, 0.0, 1.0);
    walk(&mut nav, 0, 3);
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.heading_degrees, DEFAULT_HEADING_DEGREES);
    assert_eq!(snapshot.step_count, 2);
    assert!(snapshot.position.approx_eq(&Point::new(0.0, 1.5), 1e-6));
}

#[test]
fn test_retry_after_permission_granted() {
    let mut hub = FakeHub::failing(SensorKind::Heading, SensorError::PermissionDenied);
    let mut nav = Navigator::new(NavigationConfig::new(1.2)).unwrap();
    nav.start(&mut hub);

    hub.failures.clear();
    nav.retry_sensor(&mut hub, SensorKind::Heading);
    assert!(!nav.snapshot().is_degraded());

    nav.on_heading(100, HeadingSample::new(270.0));
    assert_eq!(nav.snapshot().heading_degrees, 270.0);

    // Already active, nothing new is subscribed.
    nav.retry_sensor(&mut hub, SensorKind::Heading);
    assert_eq!(hub.subscribed.iter().filter(|(k, _)| *k == SensorKind::Heading).count(), 1);
}

#[test]
fn test_missing_accelerometer_is_inert() {
    let mut hub = FakeHub::failing(SensorKind::Accelerometer, SensorError::Unavailable);
    let mut nav = Navigator::new(NavigationConfig::new(1.2)).unwrap();
    nav.start(&mut hub);

    walk(&mut nav, 0, 10);
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.accel_status, SensorStatus::Unavailable);
    assert_eq!(snapshot.step_count, 0);
    assert!(!snapshot.is_degraded());

    assert!(turn(&mut nav, 6000, -2.0).is_some());
}

#[test]
fn test_carry_mode_switch_changes_threshold() {
    let (mut nav, _hub) = started(NavigationConfig::for_carry_mode(CarryMode::Handheld));
    let soft = AccelSample::new(0.0, 0.0, 1.2);

    assert_eq!(nav.on_accel(0, soft), None);
    assert_eq!(nav.on_accel(500, soft), None);
    assert_eq!(nav.snapshot().step_count, 0);

    nav.set_carry_mode(CarryMode::ChestMounted).unwrap();
    assert_eq!(nav.config().accel_threshold, 1.1);
    assert_eq!(nav.on_accel(1000, soft), None);
    assert!(nav.on_accel(1500, soft).is_some());
    assert_eq!(nav.snapshot().step_count, 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(Navigator::new(NavigationConfig::new(-1.0)).is_err());

    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    let bad = NavigationConfig::new(1.2).with_step_length(0.0);
    assert_eq!(nav.set_config(bad), Err(ConfigError::StepLength(0.0)));
    assert_eq!(nav.config().step_length_meters, DEFAULT_STEP_LENGTH_METERS);
}

#[test]
fn test_events_are_queued_in_order() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    walk(&mut nav, 0, 3);
    turn(&mut nav, 2000, 2.0).unwrap();
    nav.tick(10_000);

    let events: Vec<NavigationEvent> = std::iter::from_fn(|| nav.next_event()).collect();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], NavigationEvent::Step(StepEvent { timestamp: 500 }));
    assert_eq!(events[1], NavigationEvent::Step(StepEvent { timestamp: 1000 }));
    assert!(matches!(events[2], NavigationEvent::Turn(TurnEvent { direction: Direction::Left, .. })));
    assert!(matches!(events[3], NavigationEvent::AlertCleared { .. }));
}

#[test]
fn test_magnetometer_drives_heading() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    nav.on_magnetometer(0, -1.0, 0.0);
    assert!(approx_eq(nav.snapshot().heading_degrees, 90.0, 1e-9));

    walk(&mut nav, 0, 3);
    assert!(nav.snapshot().position.approx_eq(&Point::new(1.5, 0.0), 1e-6));
}

#[test]
fn test_accumulated_turn_in_snapshot() {
    let (mut nav, _hub) = started(NavigationConfig::new(1.2));
    nav.on_gyro(0, GyroSample::new(1.0));
    nav.on_gyro(50, GyroSample::new(1.0));
    assert!(approx_eq(nav.snapshot().accumulated_turn_degrees, 2.865, 1e-3));

    nav.recenter_turns();
    assert_eq!(nav.snapshot().accumulated_turn_degrees, 0.0);
}

#[test]
fn test_shared_navigator_across_threads() {
    let mut hub = FakeHub::default();
    let shared = SharedNavigator::new(Navigator::new(NavigationConfig::new(1.2)).unwrap());
    shared.start(&mut hub);
    shared.on_heading(0, HeadingSample::new(180.0));

    let accel = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..21u64 {
                shared.on_accel(i * 500, PEAK);
                shared.on_accel(i * 500 + 250, REST);
            }
        })
    };
    let gyro = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..200u64 {
                shared.on_gyro(i * 50, GyroSample::new(0.1));
            }
        })
    };
    accel.join().unwrap();
    gyro.join().unwrap();

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.step_count, 20);
    assert!(snapshot.position.approx_eq(&Point::new(0.0, -15.0), 1e-6));

    shared.stop();
    shared.stop();
    assert_eq!(shared.on_accel(20_000, PEAK), None);
    assert!(!shared.with(|nav| nav.is_running()));
}
