//! Handle lifecycle states.

use std::fmt;

/// Where a handle is in its lifecycle.
///
/// `New → Opening → Open → Closing → Closed`, and `Closed → Opening` on reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Constructed, no open attempted yet (or the first open failed).
    New,
    /// The engine is opening; operations are queued.
    Opening,
    /// The engine session is installed.
    Open,
    /// The engine is closing.
    Closing,
    /// The engine session has been released.
    Closed,
}

impl Status {
    /// Whether data operations are accepted in this state.
    ///
    /// While `Opening` they are queued and run once the engine is open.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }

    /// Lowercase name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
