//! # Request Tickets
//!
//! Backend responses arrive in whatever order the network delivers them.
//! Every request the reducer issues carries a ticket, and the reducer only
//! applies a completion whose ticket is still current.
//!
//! ```text
//! view-bound (create / history / send):
//!     Ticket { id, generation }   applied iff generation == current
//!     new session / load session  → generation += 1, in-flight forgotten
//!
//! sidebar:
//!     RequestId                   applied iff newer than the last applied
//! ```
//!
//! `loading` is simply "some view-bound request of the current generation is
//! still outstanding".

use std::collections::BTreeSet;

/// Monotonic id for every request issued by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A view-bound request: which request, and which view it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: RequestId,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_id: u64,
    generation: u64,
    in_flight: BTreeSet<RequestId>,
    last_sidebar: Option<RequestId>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    /// Issue a ticket for a request that belongs to the current view.
    pub fn begin(&mut self) -> Ticket {
        let id = self.next();
        self.in_flight.insert(id);
        Ticket {
            id,
            generation: self.generation,
        }
    }

    /// The view is switching sessions: everything outstanding is stale.
    pub fn supersede(&mut self) {
        self.generation += 1;
        self.in_flight.clear();
    }

    /// Mark a view-bound request complete. Returns `true` if its result
    /// should be applied.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight.remove(&ticket.id)
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issue an id for a sidebar fetch.
    pub fn begin_sidebar(&mut self) -> RequestId {
        self.next()
    }

    /// Record a successful sidebar response. Returns `false` when a newer
    /// snapshot has already been applied.
    pub fn accept_sidebar(&mut self, id: RequestId) -> bool {
        if self.last_sidebar.is_some_and(|last| last > id) {
            return false;
        }
        self.last_sidebar = Some(id);
        true
    }
}
