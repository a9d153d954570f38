// The repaint scheduling loop, with an owned cancellation token.
//
// Each scheduled repaint is represented by a `FrameTicket` handed to the host.
// The host gives it back when the display refreshes; the ticket is honored only
// if the loop has not been cancelled since it was issued. This is what stops a
// frame requested just before `pause()`/`destroy()` from drawing afterwards.

/// Handle for one requested display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

impl FrameTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    pending: Option<u64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for the next refresh. Returns `None` while one is already
    /// outstanding, so the loop never runs twice in parallel.
    pub fn arm(&mut self) -> Option<FrameTicket> {
        if self.pending.is_some() {
            return None;
        }
        self.pending = Some(self.generation);
        Some(FrameTicket { generation: self.generation })
    }

    /// Invalidate every ticket issued so far.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    /// Consume `ticket` if it is the one currently pending.
    pub fn accept(&mut self, ticket: FrameTicket) -> bool {
        if self.pending == Some(ticket.generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
