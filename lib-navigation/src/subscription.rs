use alloc::boxed::Box;
use crate::*;

/// Cancellation handle for one platform sensor subscription. Cancelling is idempotent and also
/// happens when the handle is dropped.
///
pub struct Subscription
{
    kind: SensorKind,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription
{
    pub fn new<F>(kind: SensorKind, cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Subscription { kind, cancel: Some(Box::new(cancel)) }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Unsubscribes from the platform stream. Calling this again does nothing.
    ///
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            log::debug!("Unsubscribing from {:?}", self.kind);
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Subscription [{:?}, active: {}]", self.kind, self.is_active())
    }
}

/// The platform's sensor layer. Samples themselves are pushed into the navigator by the host,
/// this only manages access to the streams.
///
pub trait SensorHub
{
    fn subscribe(&mut self, kind: SensorKind, interval_ms: u64) -> Result<Subscription, SensorError>;
}
