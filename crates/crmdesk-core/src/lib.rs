//! # crmdesk-core
//!
//! Core business logic for the `crmdesk` admin panel.
//!
//! This crate provides:
//! - Entity models (contacts and quote requests)
//! - **Search** - Case-insensitive multi-field filtering of entity lists
//! - **Classification** - Mapping of status and priority values to style tokens
//! - **Audiences** - Static registry of newsletter recipient groups
//! - **Dispatch** - Validated, single-in-flight campaign sending

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod audience;
pub mod classify;
pub mod dispatch;
pub mod entity;
mod error;
pub mod search;

pub use audience::{Audience, AudienceRegistry};
pub use classify::{Classification, ClassificationKind, StyleToken, Tone, classify};
pub use dispatch::{
    CampaignDraft, CampaignRecord, CancelToken, DispatchController, DispatchFailure,
    DispatchState, DispatchTransport, MissingField, Notice, NotificationSink, Outbound,
    RetryPolicy, Severity, SimulatedTransport, SubmitOutcome, TracingSink, TransportError,
    ValidationError,
};
pub use entity::{
    Contact, ContactStatus, Entity, EntityKind, EntitySnapshot, Priority, Quote, QuoteStatus,
    SearchField,
};
pub use error::{Error, Result};
pub use search::{ListSummary, SearchQuery, Searchable, filter};
