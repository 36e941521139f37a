//! Mapping of categorical attributes to presentation style tokens.
//!
//! Every mapping is total: values outside the expected domain land on
//! [`StyleToken::Muted`].

use serde::{Deserialize, Serialize};

use crate::entity::{ContactStatus, Priority, QuoteStatus};

/// Presentation state of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleToken {
    /// Good news (active, approved, low priority).
    Success,
    /// Needs attention soon.
    Warning,
    /// Notable but neutral.
    Accent,
    /// Bad news or urgent.
    Destructive,
    /// Nothing to see; also the fallback for unknown values.
    #[default]
    Muted,
}

impl StyleToken {
    /// Every token, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Warning,
        Self::Accent,
        Self::Destructive,
        Self::Muted,
    ];

    /// Token name as consumed by the render layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Accent => "accent",
            Self::Destructive => "destructive",
            Self::Muted => "muted",
        }
    }
}

impl std::fmt::Display for StyleToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a badge is filled.
///
/// Status badges are solid; priority badges use a tinted background with an
/// outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Filled background.
    #[default]
    Solid,
    /// Tinted background with border.
    Soft,
}

/// Which mapping to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationKind {
    /// Contact relationship status.
    ContactStatus,
    /// Quote review status.
    QuoteStatus,
    /// Quote priority.
    Priority,
}

impl ClassificationKind {
    /// Badge tone used for this kind of attribute.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::ContactStatus | Self::QuoteStatus => Tone::Solid,
            Self::Priority => Tone::Soft,
        }
    }
}

/// A style token together with its tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Color family.
    pub token: StyleToken,
    /// Fill strength.
    pub tone: Tone,
}

impl Classification {
    /// Classifies a raw value and attaches the kind's tone.
    #[must_use]
    pub fn of(kind: ClassificationKind, value: &str) -> Self {
        Self {
            token: classify(kind, value),
            tone: kind.tone(),
        }
    }
}

/// Maps a raw categorical value to its style token. Never fails.
#[must_use]
pub fn classify(kind: ClassificationKind, value: &str) -> StyleToken {
    match kind {
        ClassificationKind::ContactStatus => ContactStatus::parse(value).style_token(),
        ClassificationKind::QuoteStatus => QuoteStatus::parse(value).style_token(),
        ClassificationKind::Priority => Priority::parse(value).style_token(),
    }
}

impl ContactStatus {
    /// Badge token for this status.
    #[must_use]
    pub const fn style_token(&self) -> StyleToken {
        match self {
            Self::Active => StyleToken::Success,
            Self::Prospect => StyleToken::Accent,
            Self::Inactive | Self::Other(_) => StyleToken::Muted,
        }
    }
}

impl QuoteStatus {
    /// Badge token for this status.
    #[must_use]
    pub const fn style_token(&self) -> StyleToken {
        match self {
            Self::Approved => StyleToken::Success,
            Self::Pending => StyleToken::Warning,
            Self::Reviewing => StyleToken::Accent,
            Self::Rejected => StyleToken::Destructive,
            Self::Other(_) => StyleToken::Muted,
        }
    }
}

impl Priority {
    /// Badge token for this priority.
    #[must_use]
    pub const fn style_token(&self) -> StyleToken {
        match self {
            Self::High => StyleToken::Destructive,
            Self::Medium => StyleToken::Warning,
            Self::Low => StyleToken::Success,
            Self::Other(_) => StyleToken::Muted,
        }
    }
}
