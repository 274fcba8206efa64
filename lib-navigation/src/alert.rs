use crate::*;

/// Handle for one scheduled alert expiry. The generation makes every ticket unique, a ticket is
/// only honoured while it is still the pending one.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertTicket
{
    pub generation: u64,
    pub expires_at: Timestamp,
}

/// Host side timer used to clear turn alerts. The host calls `Navigator::expire_alert` with the
/// ticket once it fires, stale firings are harmless.
///
pub trait AlertScheduler: Send
{
    fn schedule(&mut self, ticket: AlertTicket);

    fn cancel(&mut self, ticket: AlertTicket);
}

/// Keeps track of the single pending alert expiry.
///
#[derive(Debug, Default)]
pub struct AlertTimer
{
    generation: u64,
    pending: Option<AlertTicket>,
}

impl AlertTimer
{
    pub const fn new() -> Self {
        AlertTimer { generation: 0, pending: None }
    }

    /// Schedules a new expiry, superseding any pending one.
    ///
    pub fn schedule(&mut self, now: Timestamp, duration_ms: u64) -> AlertTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = AlertTicket {
            generation: self.generation,
            expires_at: now.saturating_add(duration_ms),
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Invalidates the pending expiry (if any), every ticket handed out so far is now stale.
    ///
    pub fn cancel(&mut self) -> Option<AlertTicket> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take()
    }

    /// Consumes the ticket if it is still the pending one. Returns `false` for stale tickets.
    ///
    pub fn fire(&mut self, ticket: AlertTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// The pending ticket if it has expired by `now`.
    ///
    pub fn due(&self, now: Timestamp) -> Option<AlertTicket> {
        self.pending.filter(|ticket| now >= ticket.expires_at)
    }

    pub fn pending(&self) -> Option<AlertTicket> {
        self.pending
    }
}
