//! Request race resolution
//!
//! Evaluation requests can be fired faster than the server answers them
//! (sliders, repeated runs), and answers may arrive in any order. Every
//! request gets a ticket when it is issued; a surface only accepts a result
//! whose ticket is newer than the last one it applied. A slow early answer
//! that arrives after a fast later one is dropped instead of reverting the
//! display.

use super::types::{RequestTicket, Surface};
use std::collections::HashMap;
use std::time::Instant;

/// Monotonic ticket source, strictly increasing even within one microsecond
#[derive(Debug)]
pub struct TicketClock {
    origin: Instant,
    last: u64,
}

impl TicketClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: 0,
        }
    }

    /// Issue a ticket for a request about to leave the client
    pub fn issue(&mut self) -> RequestTicket {
        let now = u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX);
        let issued_at = now.max(self.last + 1);
        self.last = issued_at;
        RequestTicket::at(issued_at)
    }
}

impl Default for TicketClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Last-applied ticket per surface
#[derive(Debug, Default)]
pub struct RaceResolver {
    clock: TicketClock,
    last_applied: HashMap<Surface, u64>,
}

impl RaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a new race-sensitive request
    pub fn issue(&mut self) -> RequestTicket {
        self.clock.issue()
    }

    /// Decide whether a successful result for `surface` may be applied.
    ///
    /// Returns true and advances the surface's last-applied value if the
    /// ticket is strictly newer; returns false for stale results, which the
    /// caller must drop without touching the surface.
    pub fn admit(&mut self, surface: Surface, ticket: RequestTicket) -> bool {
        let last = self.last_applied.entry(surface).or_insert(0);
        if ticket.issued_at() > *last {
            *last = ticket.issued_at();
            true
        } else {
            tracing::debug!(
                "Ignoring stale {} result (ticket={}, last applied={})",
                surface,
                ticket,
                last
            );
            false
        }
    }

    /// Ticket value last applied to `surface`
    pub fn last_applied(&self, surface: Surface) -> Option<u64> {
        self.last_applied.get(&surface).copied()
    }
}
