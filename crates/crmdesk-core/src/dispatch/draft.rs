//! Campaign draft and its validation.

use super::transport::Outbound;
use crate::audience::AudienceRegistry;

/// The in-progress campaign composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub content: String,
    /// Selected audience id, if any.
    pub audience_id: Option<String>,
}

impl CampaignDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Selects an audience.
    #[must_use]
    pub fn audience(mut self, audience_id: impl Into<String>) -> Self {
        self.audience_id = Some(audience_id.into());
        self
    }

    /// Returns true if nothing has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.content.is_empty() && self.audience_id.is_none()
    }

    /// Checks the draft and captures it for sending.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every missing field, in the
    /// order subject, content, audience.
    pub fn validate(&self, registry: &AudienceRegistry) -> Result<Outbound, ValidationError> {
        let mut missing = Vec::new();

        if self.subject.is_empty() {
            missing.push(MissingField::Subject);
        }
        if self.content.is_empty() {
            missing.push(MissingField::Content);
        }
        let audience = self
            .audience_id
            .as_deref()
            .and_then(|id| registry.resolve(id));
        if audience.is_none() {
            missing.push(MissingField::Audience);
        }

        match audience {
            Some(audience) if missing.is_empty() => Ok(Outbound::new(
                self.subject.clone(),
                self.content.clone(),
                audience.clone(),
            )),
            _ => Err(ValidationError { missing }),
        }
    }
}

/// A draft field that must be filled before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Subject is empty.
    Subject,
    /// Content is empty.
    Content,
    /// No audience selected, or the selection is unknown.
    Audience,
}

impl MissingField {
    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Content => "content",
            Self::Audience => "audience",
        }
    }

    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Subject => "Subject line is required",
            Self::Content => "Newsletter content is required",
            Self::Audience => "Please select a target audience",
        }
    }
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// The draft is not ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Every failing field, in check order. Never empty.
    pub missing: Vec<MissingField>,
}

impl ValidationError {
    /// Returns true if `field` is among the missing ones.
    #[must_use]
    pub fn contains(&self, field: MissingField) -> bool {
        self.missing.contains(&field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.missing.iter().map(MissingField::field).collect();
        write!(f, "Missing required fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}
