//! Dispatch transport abstraction.
//!
//! The controller hands a validated [`Outbound`] campaign to a
//! [`DispatchTransport`] and treats the send as an opaque async operation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::audience::Audience;

/// Errors that can occur while handing a campaign to the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the delivery service.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The attempt did not finish in time.
    #[error("Send timed out after {0:?}")]
    Timeout(Duration),

    /// The delivery service refused the campaign.
    #[error("Send rejected: {0}")]
    Rejected(String),
}

impl TransportError {
    /// Returns true if trying again might succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// A validated campaign ready to send.
///
/// Only produced by [`CampaignDraft::validate`](super::CampaignDraft::validate),
/// so subject and content are never blank and the audience is always real.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    subject: String,
    content: String,
    audience: Audience,
}

impl Outbound {
    pub(crate) const fn new(subject: String, content: String, audience: Audience) -> Self {
        Self {
            subject,
            content,
            audience,
        }
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Resolved recipient group.
    #[must_use]
    pub const fn audience(&self) -> &Audience {
        &self.audience
    }
}

/// Delivers a campaign to its audience.
#[async_trait]
pub trait DispatchTransport: Send + Sync {
    /// Sends one campaign. Completes once the service has accepted it.
    async fn dispatch(&self, outbound: &Outbound) -> Result<(), TransportError>;
}

/// Transport that waits a fixed delay and reports success.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    latency: Duration,
}

impl SimulatedTransport {
    /// Default fake latency.
    pub const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

    /// Creates a transport with the given latency.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl DispatchTransport for SimulatedTransport {
    async fn dispatch(&self, outbound: &Outbound) -> Result<(), TransportError> {
        info!(
            "Simulating send of {:?} to {} ({} recipients)",
            outbound.subject(),
            outbound.audience().name,
            outbound.audience().count
        );
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(TransportError::Connection("reset".into()).is_transient());
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(!TransportError::Rejected("spam".into()).is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_transport_waits() {
        let transport = SimulatedTransport::default();
        let outbound = Outbound::new(
            "Update".into(),
            "Body".into(),
            Audience::new("vip", "VIP Clients", 89),
        );

        let started = tokio::time::Instant::now();
        transport.dispatch(&outbound).await.unwrap();
        assert!(started.elapsed() >= SimulatedTransport::DEFAULT_LATENCY);
    }
}
