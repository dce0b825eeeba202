//! Roamwise Submission Gate
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! roamwise-internals/submission-gate
//! A latest-wins gate: overlapping async submissions each take a ticket,
//! and only the most recently issued ticket may publish its result.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

/// Custom error for the gate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("ticket {ticket} superseded by ticket {latest}")]
    Superseded { ticket: u64, latest: u64 },
    #[error("ticket {0} was never issued by this gate")]
    UnknownTicket(u64),
}

/// Sequence number handed out when a submission starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Whether the latest issued ticket is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Holds a value that only the latest submission may replace.
///
/// # Examples
///
/// ```ignore
/// let gate = LatestWins::new(String::new());
/// let first = gate.begin().await;
/// let second = gate.begin().await;
/// assert!(gate.settle(first, |v| *v = "stale".into()).await.is_err());
/// gate.settle(second, |v| *v = "fresh".into()).await?;
/// ```
#[derive(Debug)]
pub struct LatestWins<T> {
    // Advanced only while `value` is locked, so settle sees a stable latest.
    issued: AtomicU64,
    settled: AtomicU64,
    value: Mutex<T>,
}

impl<T: Default> Default for LatestWins<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> LatestWins<T> {
    pub fn new(initial: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            settled: AtomicU64::new(0),
            value: Mutex::new(initial),
        }
    }

    /// Issue the next ticket. Every earlier ticket becomes stale.
    pub async fn begin(&self) -> Ticket {
        let _value = self.value.lock().await;
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns true if no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    pub fn phase(&self) -> Phase {
        if self.settled.load(Ordering::SeqCst) < self.issued.load(Ordering::SeqCst) {
            Phase::Submitting
        } else {
            Phase::Idle
        }
    }

    /// Settle `ticket`, applying `publish` to the held value only when the
    /// ticket is still the latest one issued.
    ///
    /// A stale ticket leaves the value untouched and returns
    /// [`GateError::Superseded`]. A failed submission settles with a no-op
    /// closure so the phase returns to idle without publishing anything.
    pub async fn settle<F>(&self, ticket: Ticket, publish: F) -> Result<(), GateError>
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.value.lock().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.0 == 0 || ticket.0 > latest {
            return Err(GateError::UnknownTicket(ticket.0));
        }
        if ticket.0 != latest {
            return Err(GateError::Superseded {
                ticket: ticket.0,
                latest,
            });
        }
        publish(&mut *value);
        self.settled.fetch_max(ticket.0, Ordering::SeqCst);
        Ok(())
    }

    /// Settle `ticket` without publishing, from synchronous code such as a
    /// `Drop` impl. No-op for stale or already settled tickets.
    pub fn abandon(&self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.settled.fetch_max(ticket.0, Ordering::SeqCst);
        }
    }

    /// Clone out the currently published value
    pub async fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.value.lock().await.clone()
    }
}
