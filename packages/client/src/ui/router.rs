//! Panel router shared by the player dashboard and the admin dashboard.
//!
//! Exactly one panel is current. Every `show` hands out a ticket; a load
//! that completes after its panel was left (or re-shown) no longer matches
//! the router and its result is dropped.

/// Identifies one load issued for a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket<P> {
    panel: P,
    generation: u64,
}

impl<P: Copy> LoadTicket<P> {
    pub fn panel(&self) -> P {
        self.panel
    }
}

#[derive(Debug)]
pub struct ViewRouter<P> {
    current: P,
    generation: u64,
}

impl<P: Copy + Eq> ViewRouter<P> {
    pub fn new(initial: P) -> Self {
        Self {
            current: initial,
            generation: 0,
        }
    }

    pub fn current(&self) -> P {
        self.current
    }

    /// Makes `panel` current. The caller performs exactly one load with the
    /// returned ticket.
    pub fn show(&mut self, panel: P) -> LoadTicket<P> {
        self.current = panel;
        self.generation += 1;
        LoadTicket {
            panel,
            generation: self.generation,
        }
    }

    /// Ticket for re-loading the current panel without leaving it (timer
    /// refreshes, reloads after a mutation).
    pub fn refresh(&self) -> LoadTicket<P> {
        LoadTicket {
            panel: self.current,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket<P>) -> bool {
        ticket.generation == self.generation && ticket.panel == self.current
    }
}
