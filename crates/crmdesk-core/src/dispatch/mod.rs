//! Campaign dispatch workflow.
//!
//! The [`DispatchController`] owns the compose session:
//! - **Draft**: subject, content and audience selection
//! - **State machine**: `Idle -> Validating -> Sending -> Succeeded | Failed -> Idle`
//! - **Single flight**: a submit while sending is ignored
//! - **Retry and cancellation**: transient transport errors are retried with
//!   backoff, and a [`CancelToken`] aborts an abandoned send
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crmdesk_core::{AudienceRegistry, CancelToken, DispatchController, SimulatedTransport};
//!
//! let controller = DispatchController::new(
//!     AudienceRegistry::builtin(),
//!     Arc::new(SimulatedTransport::default()),
//! );
//! controller.set_subject("Monthly Product Updates")?;
//! controller.set_content("Here is what shipped this month...")?;
//! controller.select_audience(Some("vip"))?;
//!
//! let outcome = controller.submit(&CancelToken::new()).await;
//! ```

mod cancel;
mod controller;
mod draft;
mod notify;
mod retry;
mod state;
mod transport;

pub use cancel::CancelToken;
pub use controller::{CampaignRecord, DispatchController, SubmitOutcome};
pub use draft::{CampaignDraft, MissingField, ValidationError};
pub use notify::{Notice, NotificationSink, Severity, TracingSink};
pub use retry::RetryPolicy;
pub use state::{DispatchFailure, DispatchState};
pub use transport::{DispatchTransport, Outbound, SimulatedTransport, TransportError};
