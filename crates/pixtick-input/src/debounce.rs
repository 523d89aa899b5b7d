//! Per-line debounce state machine.
//!
//! A raw line has to be stable for `threshold` consecutive ticks before a
//! change is accepted. Accepted changes pass through a one-tick edge phase
//! (`RisingEdge` / `FallingEdge`); that tick is the edge tick reported to
//! games as "just pressed" / "just released".

/// Lifecycle phase of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    /// Press confirmed this tick.
    RisingEdge,
    Pressed,
    /// Release confirmed this tick.
    FallingEdge,
}

impl Phase {
    /// Whether the key counts as held down in this phase.
    pub fn is_down(self) -> bool {
        matches!(self, Self::RisingEdge | Self::Pressed)
    }
}

/// Edge reported by [`LineState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Press,
    Release,
}

/// Debounce state of one logical line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    phase: Phase,
    counter: u32,
    hold: u32,
}

impl LineState {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            counter: 0,
            hold: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks since the current press began; 1 on the press edge tick, 0
    /// when the key is not down.
    pub fn hold_duration(&self) -> u32 {
        self.hold
    }

    /// Advance one tick with the raw sample `raw`.
    ///
    /// Returns the edge entered on this tick, if any.
    pub fn advance(&mut self, raw: bool, threshold: u32) -> Option<Edge> {
        match self.phase {
            Phase::Idle => {
                if !raw {
                    self.counter = 0;
                    return None;
                }
                self.counter += 1;
                if self.counter >= threshold {
                    self.phase = Phase::RisingEdge;
                    self.counter = 0;
                    self.hold = 1;
                    return Some(Edge::Press);
                }
                None
            }
            Phase::RisingEdge => {
                // The sample on the tick after a confirmed press is ignored.
                self.phase = Phase::Pressed;
                self.hold = self.hold.saturating_add(1);
                None
            }
            Phase::Pressed => {
                if raw {
                    self.counter = 0;
                    self.hold = self.hold.saturating_add(1);
                    return None;
                }
                self.counter += 1;
                if self.counter >= threshold {
                    self.phase = Phase::FallingEdge;
                    self.counter = 0;
                    self.hold = 0;
                    return Some(Edge::Release);
                }
                None
            }
            Phase::FallingEdge => {
                self.phase = Phase::Idle;
                self.counter = 0;
                None
            }
        }
    }
}
