//! Loop state machine.

/// State of the game loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    /// Ready to run, or ticking.
    #[default]
    Running,
    /// Stopped cleanly by the game or the tick limit.
    Terminated,
    /// Stopped by an error.
    Errored,
}

impl LoopState {
    /// Whether the loop has stopped for good.
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Terminated => write!(f, "Terminated"),
            Self::Errored => write!(f, "Errored"),
        }
    }
}
