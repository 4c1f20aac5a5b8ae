//! Lifecycle states of a single echo round trip.

/// Round-trip state.
///
/// The happy path visits every state in declaration order. The only
/// permitted shortcut is `Connecting -> Closed`, taken when the connection
/// cannot be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundTripState {
    /// Not started.
    #[default]
    Idle,
    /// Connection attempt in progress.
    Connecting,
    /// Session open, reply handler not yet armed.
    Connected,
    /// Reply handler armed; the envelope is sent from this state.
    AwaitingReply,
    /// Close handshake in progress.
    Closing,
    /// Session released.
    Closed,
}

impl RoundTripState {
    /// Check whether `next` is a legal successor of this state.
    #[must_use]
    pub const fn can_transition_to(&self, next: RoundTripState) -> bool {
        use RoundTripState::*;
        matches!(
            (*self, next),
            (Idle, Connecting)
                | (Connecting, Connected)
                | (Connecting, Closed)
                | (Connected, AwaitingReply)
                | (AwaitingReply, Closing)
                | (Closing, Closed)
        )
    }

    /// Check if a session may be open in this state.
    ///
    /// Returns `true` for `Connected`, `AwaitingReply`, or `Closing`.
    #[must_use]
    #[inline]
    pub const fn holds_session(&self) -> bool {
        matches!(
            self,
            RoundTripState::Connected | RoundTripState::AwaitingReply | RoundTripState::Closing
        )
    }

    /// Check if the round trip has finished.
    #[must_use]
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, RoundTripState::Closed)
    }

    /// Human-readable activity for this state, used in timeout errors.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            RoundTripState::Idle => "idle",
            RoundTripState::Connecting => "connecting",
            RoundTripState::Connected => "opening session",
            RoundTripState::AwaitingReply => "awaiting reply",
            RoundTripState::Closing => "closing",
            RoundTripState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for RoundTripState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundTripState::Idle => write!(f, "Idle"),
            RoundTripState::Connecting => write!(f, "Connecting"),
            RoundTripState::Connected => write!(f, "Connected"),
            RoundTripState::AwaitingReply => write!(f, "AwaitingReply"),
            RoundTripState::Closing => write!(f, "Closing"),
            RoundTripState::Closed => write!(f, "Closed"),
        }
    }
}
