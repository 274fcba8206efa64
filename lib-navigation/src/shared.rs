use std::sync::{Arc, Mutex, MutexGuard};
use crate::*;

/// Cloneable handle serializing all access to one navigator behind a single mutex, for hosts
/// that deliver each sensor stream on its own thread. The filters still run one sample at a
/// time, only the hand-off is shared.
///
#[derive(Clone)]
pub struct SharedNavigator
{
    inner: Arc<Mutex<Navigator>>,
}

impl SharedNavigator
{
    pub fn new(navigator: Navigator) -> Self {
        SharedNavigator { inner: Arc::new(Mutex::new(navigator)) }
    }

    /// Runs `f` with exclusive access to the navigator.
    ///
    pub fn with<R>(&self, f: impl FnOnce(&mut Navigator) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn start(&self, hub: &mut dyn SensorHub) {
        self.lock().start(hub)
    }

    pub fn stop(&self) {
        self.lock().stop()
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn on_heading(&self, now: Timestamp, sample: HeadingSample) {
        self.lock().on_heading(now, sample)
    }

    pub fn on_accel(&self, now: Timestamp, sample: AccelSample) -> Option<StepEvent> {
        self.lock().on_accel(now, sample)
    }

    pub fn on_gyro(&self, now: Timestamp, sample: GyroSample) -> Option<TurnEvent> {
        self.lock().on_gyro(now, sample)
    }

    pub fn tick(&self, now: Timestamp) {
        self.lock().tick(now)
    }

    pub fn expire_alert(&self, ticket: AlertTicket) -> bool {
        self.lock().expire_alert(ticket)
    }

    fn lock(&self) -> MutexGuard<'_, Navigator> {
        // A panicking sensor thread must not take the whole session down with it.
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("Navigator mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
