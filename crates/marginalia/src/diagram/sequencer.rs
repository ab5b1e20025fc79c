//! Latest-request-wins ordering for overlapping renders.
//!
//! Each render request takes a [`Ticket`]. When renders finish out of order,
//! only the completion holding the most recently issued ticket may commit;
//! anything older is stale and is dropped.

use log::debug;

/// Identifies one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RenderSequencer {
    issued: u64,
    committed: Option<Ticket>,
}

impl RenderSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the ticket for a new render request.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns true if `ticket` is the latest issued ticket.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Records the completion of `ticket`, returning whether it may commit.
    pub fn try_commit(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.issued; "Discarding stale render");
            return false;
        }
        self.committed = Some(ticket);
        true
    }

    /// The ticket whose result is currently shown, if any.
    pub fn committed(&self) -> Option<Ticket> {
        self.committed
    }

    /// Returns true if a request was issued after the last commit.
    pub fn is_pending(&self) -> bool {
        self.issued > 0 && self.committed.map(Ticket::sequence) != Some(self.issued)
    }
}
