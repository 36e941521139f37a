//! Quote request model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SearchField;
use crate::search::Searchable;

/// Review status of a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuoteStatus {
    /// Waiting for someone to look at it.
    #[default]
    Pending,
    /// Accepted.
    Approved,
    /// Under review.
    Reviewing,
    /// Declined.
    Rejected,
    /// Unrecognized value from the entity source.
    Other(String),
}

impl QuoteStatus {
    /// Parse from the wire representation. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "reviewing" => Self::Reviewing,
            "rejected" => Self::Rejected,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Convert to the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for QuoteStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<QuoteStatus> for String {
    fn from(status: QuoteStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently a quote request should be handled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Handle first.
    High,
    /// Normal queue.
    #[default]
    Medium,
    /// Whenever there is time.
    Low,
    /// Unrecognized value from the entity source.
    Other(String),
}

impl Priority {
    /// Parse from the wire representation. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Convert to the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's request for a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Request identifier, e.g. `QR-001`.
    pub id: String,
    /// Requesting client.
    pub client: String,
    /// Client contact email.
    #[serde(default)]
    pub email: String,
    /// Requested service.
    pub service: String,
    /// Longer description of the work.
    #[serde(default)]
    pub description: String,
    /// Estimated value as displayed, e.g. `$5,200`.
    #[serde(default)]
    pub value: String,
    /// Review status.
    pub status: QuoteStatus,
    /// Handling priority.
    #[serde(default)]
    pub priority: Priority,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Date the request came in.
    pub date: NaiveDate,
}

impl Quote {
    /// Fields searched by the quote list, in match order.
    pub const SEARCH_FIELDS: &'static [SearchField] =
        &[SearchField::Client, SearchField::Service, SearchField::Id];

    /// Creates a new pending, medium-priority quote request.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        client: impl Into<String>,
        service: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            client: client.into(),
            email: String::new(),
            service: service.into(),
            description: String::new(),
            value: String::new(),
            status: QuoteStatus::Pending,
            priority: Priority::Medium,
            tags: Vec::new(),
            date,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Searchable for Quote {
    fn search_fields(&self) -> &'static [SearchField] {
        Self::SEARCH_FIELDS
    }

    fn field_text(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Client => Some(&self.client),
            SearchField::Service => Some(&self.service),
            SearchField::Id => Some(&self.id),
            SearchField::Name | SearchField::Email | SearchField::Company => None,
        }
    }
}
