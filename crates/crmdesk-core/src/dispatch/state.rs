//! Dispatch state types.
//!
//! A compose session cycles through:
//! - `Idle`: waiting for the user to submit
//! - `Validating`: checking the draft
//! - `Sending`: one campaign in flight
//! - `Succeeded` / `Failed`: reported, then straight back to `Idle`

use super::draft::ValidationError;
use super::transport::{Outbound, TransportError};

/// State of the compose session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// Nothing happening; `submit` is accepted.
    #[default]
    Idle,

    /// The draft is being checked.
    Validating,

    /// A campaign is in flight. Further submits are ignored.
    Sending(Outbound),

    /// The campaign went out to this many recipients.
    Succeeded(u64),

    /// The submit did not go through.
    Failed(DispatchFailure),
}

impl DispatchState {
    /// Returns `true` while a submit is being processed.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::Sending(_))
    }

    /// Returns `true` if `submit` would be accepted.
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        !self.is_in_flight()
    }

    /// Returns the campaign in flight, if any.
    #[must_use]
    pub const fn outbound(&self) -> Option<&Outbound> {
        match self {
            Self::Sending(outbound) => Some(outbound),
            _ => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Sending(_) => "sending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Why a submit failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchFailure {
    /// The draft is incomplete. The draft is kept so the user can fix it.
    #[error("{0}")]
    Validation(ValidationError),

    /// The transport gave up.
    #[error("{0}")]
    Transport(TransportError),

    /// The session was abandoned mid-flight.
    #[error("Send cancelled")]
    Cancelled,
}
