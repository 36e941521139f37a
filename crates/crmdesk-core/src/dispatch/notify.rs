//! User-visible notices emitted by the dispatch workflow.

use tokio::sync::mpsc;
use tracing::{info, warn};

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Regular confirmation.
    #[default]
    Info,
    /// Something went wrong.
    Destructive,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short headline.
    pub title: String,
    /// Details.
    pub description: String,
    /// Presentation.
    pub severity: Severity,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    /// Confirmation after a campaign went out.
    #[must_use]
    pub fn sent(recipients: u64) -> Self {
        Self::new(
            "Newsletter Sent Successfully!",
            format!("Your email has been sent to {recipients} recipients."),
            Severity::Info,
        )
    }

    /// The draft is incomplete.
    #[must_use]
    pub fn missing_information() -> Self {
        Self::new(
            "Missing Information",
            "Please fill in all required fields.",
            Severity::Destructive,
        )
    }

    /// The send itself failed.
    #[must_use]
    pub fn send_failed(reason: &str) -> Self {
        Self::new("Newsletter Not Sent", reason, Severity::Destructive)
    }
}

/// Receives notices for display.
///
/// Called while the controller holds its session lock: implementations must
/// not call back into the controller.
pub trait NotificationSink: Send + Sync {
    /// Shows or queues a notice.
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => info!("{}: {}", notice.title, notice.description),
            Severity::Destructive => warn!("{}: {}", notice.title, notice.description),
        }
    }
}

/// Forwards notices to a channel, e.g. the render loop's toast queue.
impl NotificationSink for mpsc::UnboundedSender<Notice> {
    fn notify(&self, notice: Notice) {
        if self.send(notice).is_err() {
            warn!("Notice dropped: receiver closed");
        }
    }
}
