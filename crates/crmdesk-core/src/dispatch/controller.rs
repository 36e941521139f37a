//! Compose session owner: draft, state machine, and the single in-flight send.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::draft::CampaignDraft;
use super::notify::{Notice, NotificationSink, TracingSink};
use super::retry::RetryPolicy;
use super::state::{DispatchFailure, DispatchState};
use super::transport::{DispatchTransport, Outbound, TransportError};
use crate::audience::{Audience, AudienceRegistry};
use crate::{Error, Result};

const EVENT_CAPACITY: usize = 32;

/// A campaign that went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRecord {
    /// Subject line.
    pub subject: String,
    /// Audience id.
    pub audience_id: String,
    /// Audience display name.
    pub audience_name: String,
    /// Number of recipients.
    pub recipients: u64,
    /// When the transport accepted it.
    pub sent_at: DateTime<Utc>,
}

impl CampaignRecord {
    fn from_outbound(outbound: &Outbound, sent_at: DateTime<Utc>) -> Self {
        Self {
            subject: outbound.subject().to_string(),
            audience_id: outbound.audience().id.clone(),
            audience_name: outbound.audience().name.clone(),
            recipients: outbound.audience().count,
            sent_at,
        }
    }
}

/// What a call to [`DispatchController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submit was already in flight; nothing happened.
    Ignored,
    /// Sent to this many recipients. The draft has been cleared.
    Delivered(u64),
    /// Validation, transport, or cancellation failure. The draft is kept.
    Failed(DispatchFailure),
}

#[derive(Debug, Default)]
struct Session {
    draft: CampaignDraft,
    state: DispatchState,
    history: Vec<CampaignRecord>,
}

/// Owns the campaign draft and runs at most one dispatch at a time.
///
/// All methods take `&self`; share the controller with an `Arc` between the
/// form handlers and the task awaiting [`submit`](Self::submit).
pub struct DispatchController {
    registry: AudienceRegistry,
    transport: Arc<dyn DispatchTransport>,
    notifier: Arc<dyn NotificationSink>,
    policy: RetryPolicy,
    session: Mutex<Session>,
    events: broadcast::Sender<DispatchState>,
}

impl std::fmt::Debug for DispatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchController")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl DispatchController {
    /// Creates a controller that logs notices and uses the default retry policy.
    #[must_use]
    pub fn new(registry: AudienceRegistry, transport: Arc<dyn DispatchTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            registry,
            transport,
            notifier: Arc::new(TracingSink),
            policy: RetryPolicy::default(),
            session: Mutex::new(Session::default()),
            events,
        }
    }

    /// Sends notices to `notifier` instead of the log.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The audience registry drafts are resolved against.
    #[must_use]
    pub const fn registry(&self) -> &AudienceRegistry {
        &self.registry
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DispatchState {
        self.session().state.clone()
    }

    /// Returns true while a submit is being processed.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.session().state.is_in_flight()
    }

    /// Copy of the current draft.
    #[must_use]
    pub fn draft(&self) -> CampaignDraft {
        self.session().draft.clone()
    }

    /// The audience the draft currently points at, for the reach preview.
    #[must_use]
    pub fn selected_audience(&self) -> Option<Audience> {
        let session = self.session();
        session
            .draft
            .audience_id
            .as_deref()
            .and_then(|id| self.registry.resolve(id))
            .cloned()
    }

    /// Sent campaigns, newest first.
    #[must_use]
    pub fn recent_campaigns(&self) -> Vec<CampaignRecord> {
        self.session().history.iter().rev().cloned().collect()
    }

    /// Receives every state transition from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DispatchState> {
        self.events.subscribe()
    }

    /// Edits the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a dispatch is in flight.
    pub fn update_draft(&self, edit: impl FnOnce(&mut CampaignDraft)) -> Result<()> {
        let mut session = self.session();
        if session.state.is_in_flight() {
            return Err(Error::Busy);
        }
        edit(&mut session.draft);
        Ok(())
    }

    /// Sets the subject line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a dispatch is in flight.
    pub fn set_subject(&self, subject: impl Into<String>) -> Result<()> {
        let subject = subject.into();
        self.update_draft(|draft| draft.subject = subject)
    }

    /// Sets the message body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a dispatch is in flight.
    pub fn set_content(&self, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        self.update_draft(|draft| draft.content = content)
    }

    /// Selects an audience, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a dispatch is in flight.
    pub fn select_audience(&self, audience_id: Option<&str>) -> Result<()> {
        let audience_id = audience_id.map(ToString::to_string);
        self.update_draft(|draft| draft.audience_id = audience_id)
    }

    /// Validates the draft and, if it is complete, sends it.
    ///
    /// Ignored while another submit is in flight. Transient transport errors
    /// are retried per the [`RetryPolicy`]; `cancel` aborts the send at any
    /// point. Dropping the returned future mid-send counts as cancellation.
    pub async fn submit(&self, cancel: &CancelToken) -> SubmitOutcome {
        let outbound = match self.begin() {
            Ok(outbound) => outbound,
            Err(outcome) => return outcome,
        };

        let mut guard = InFlight {
            controller: self,
            armed: true,
        };
        let result = self.deliver(&outbound, cancel).await;
        guard.armed = false;

        self.finish(&outbound, result)
    }

    /// `Idle -> Validating -> Sending`, or back to `Idle` on a bad draft.
    fn begin(&self) -> std::result::Result<Outbound, SubmitOutcome> {
        let mut session = self.session();
        if !session.state.accepts_submit() {
            debug!("Submit ignored: dispatch already in flight");
            return Err(SubmitOutcome::Ignored);
        }

        self.transition(&mut session, DispatchState::Validating);
        match session.draft.validate(&self.registry) {
            Ok(outbound) => {
                info!(
                    "Sending {:?} to {} ({} recipients)",
                    outbound.subject(),
                    outbound.audience().id,
                    outbound.audience().count
                );
                self.transition(&mut session, DispatchState::Sending(outbound.clone()));
                Ok(outbound)
            }
            Err(error) => {
                let failure = DispatchFailure::Validation(error);
                self.transition(&mut session, DispatchState::Failed(failure.clone()));
                self.notifier.notify(Notice::missing_information());
                self.transition(&mut session, DispatchState::Idle);
                Err(SubmitOutcome::Failed(failure))
            }
        }
    }

    async fn deliver(
        &self,
        outbound: &Outbound,
        cancel: &CancelToken,
    ) -> std::result::Result<(), DispatchFailure> {
        let mut attempt = 1;
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(DispatchFailure::Cancelled),
                result = self.attempt(outbound) => result,
            };

            match result {
                Ok(()) => return Ok(()),
                Err(error) if error.is_transient() && attempt < self.policy.max_attempts() => {
                    let delay = self.policy.backoff(attempt);
                    warn!("Send attempt {attempt} failed: {error}; retrying in {delay:?}");
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(DispatchFailure::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(error) => {
                    warn!("Send failed after {attempt} attempt(s): {error}");
                    return Err(DispatchFailure::Transport(error));
                }
            }
        }
    }

    async fn attempt(&self, outbound: &Outbound) -> std::result::Result<(), TransportError> {
        match self.policy.attempt_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.transport.dispatch(outbound))
                .await
                .unwrap_or(Err(TransportError::Timeout(limit))),
            None => self.transport.dispatch(outbound).await,
        }
    }

    /// `Sending -> Succeeded | Failed -> Idle`.
    fn finish(
        &self,
        outbound: &Outbound,
        result: std::result::Result<(), DispatchFailure>,
    ) -> SubmitOutcome {
        let mut session = self.session();
        match result {
            Ok(()) => {
                let delivered = outbound.audience().count;
                self.transition(&mut session, DispatchState::Succeeded(delivered));
                self.notifier.notify(Notice::sent(delivered));
                session.draft = CampaignDraft::default();
                session
                    .history
                    .push(CampaignRecord::from_outbound(outbound, Utc::now()));
                self.transition(&mut session, DispatchState::Idle);
                SubmitOutcome::Delivered(delivered)
            }
            Err(failure) => {
                self.fail(&mut session, &failure);
                SubmitOutcome::Failed(failure)
            }
        }
    }

    fn fail(&self, session: &mut Session, failure: &DispatchFailure) {
        self.transition(session, DispatchState::Failed(failure.clone()));
        self.notifier.notify(Notice::send_failed(&failure.to_string()));
        self.transition(session, DispatchState::Idle);
    }

    fn transition(&self, session: &mut Session, next: DispatchState) {
        debug!("Dispatch state: {} -> {}", session.state.name(), next.name());
        session.state = next.clone();
        // No subscribers is fine.
        let _ = self.events.send(next);
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets the session if a `submit` future is dropped while sending.
struct InFlight<'a> {
    controller: &'a DispatchController,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Dispatch abandoned mid-flight");
            let mut session = self.controller.session();
            self.controller.fail(&mut session, &DispatchFailure::Cancelled);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{Notify, mpsc};

    use super::*;
    use crate::dispatch::{MissingField, Severity, SimulatedTransport, ValidationError};

    /// Transport that replays scripted results and can be held open.
    #[derive(Default)]
    struct ScriptedTransport {
        calls: AtomicUsize,
        script: Mutex<VecDeque<std::result::Result<(), TransportError>>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransport {
        fn with_script(results: Vec<std::result::Result<(), TransportError>>) -> Self {
            Self {
                script: Mutex::new(results.into()),
                ..Self::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DispatchTransport for ScriptedTransport {
        async fn dispatch(&self, _outbound: &Outbound) -> std::result::Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or(Ok(()))
        }
    }

    fn controller(
        transport: Arc<dyn DispatchTransport>,
    ) -> (DispatchController, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = DispatchController::new(AudienceRegistry::builtin(), transport)
            .with_notifier(Arc::new(tx));
        (controller, rx)
    }

    fn fill(controller: &DispatchController, subject: &str, content: &str, audience: &str) {
        controller.set_subject(subject).unwrap();
        controller.set_content(content).unwrap();
        controller.select_audience(Some(audience)).unwrap();
    }

    fn drain(rx: &mut broadcast::Receiver<DispatchState>) -> Vec<DispatchState> {
        let mut states = Vec::new();
        while let Ok(state) = rx.try_recv() {
            states.push(state);
        }
        states
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_send() {
        let transport = Arc::new(SimulatedTransport::default());
        let (controller, mut notices) = controller(transport);
        fill(&controller, "Update", "Body", "vip");
        let mut events = controller.subscribe();

        assert_eq!(controller.state(), DispatchState::Idle);
        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(outcome, SubmitOutcome::Delivered(89));

        let states = drain(&mut events);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0], DispatchState::Validating);
        let outbound = states[1].outbound().expect("sending state");
        assert_eq!(outbound.subject(), "Update");
        assert_eq!(outbound.audience().id, "vip");
        assert_eq!(states[2], DispatchState::Succeeded(89));
        assert_eq!(states[3], DispatchState::Idle);

        assert_eq!(controller.draft(), CampaignDraft::default());
        assert_eq!(controller.state(), DispatchState::Idle);

        let notice = notices.try_recv().unwrap();
        assert_eq!(
            notice.description,
            "Your email has been sent to 89 recipients."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_subject_is_sent() {
        let (controller, _notices) = controller(Arc::new(SimulatedTransport::default()));
        fill(&controller, "   ", "Body", "vip");

        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(outcome, SubmitOutcome::Delivered(89));
        assert_eq!(controller.recent_campaigns()[0].subject, "   ");
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_draft() {
        let transport = Arc::new(ScriptedTransport::default());
        let (controller, mut notices) = controller(transport.clone());
        fill(&controller, "", "body", "vip");
        let before = controller.draft();
        let mut events = controller.subscribe();

        let outcome = controller.submit(&CancelToken::new()).await;
        let expected = DispatchFailure::Validation(ValidationError {
            missing: vec![MissingField::Subject],
        });
        assert_eq!(outcome, SubmitOutcome::Failed(expected.clone()));

        assert_eq!(
            drain(&mut events),
            vec![
                DispatchState::Validating,
                DispatchState::Failed(expected),
                DispatchState::Idle,
            ]
        );
        assert_eq!(controller.draft(), before);
        assert_eq!(transport.calls(), 0);

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.title, "Missing Information");
        assert_eq!(notice.severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn test_unknown_audience() {
        let (controller, _notices) = controller(Arc::new(ScriptedTransport::default()));
        fill(&controller, "X", "Y", "nonexistent");

        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(DispatchFailure::Validation(ValidationError {
                missing: vec![MissingField::Audience],
            }))
        );
        assert!(controller.selected_audience().is_none());
    }

    #[tokio::test]
    async fn test_submit_while_sending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(ScriptedTransport::gated(gate.clone()));
        let (controller, _notices) = controller(transport.clone());
        let controller = Arc::new(controller);
        fill(&controller, "Update", "Body", "vip");
        let mut events = controller.subscribe();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(&CancelToken::new()).await })
        };

        // Wait until the first submit is in flight.
        loop {
            if let DispatchState::Sending(_) = events.recv().await.unwrap() {
                break;
            }
        }
        let draft = controller.draft();

        let second = controller.submit(&CancelToken::new()).await;
        assert_eq!(second, SubmitOutcome::Ignored);
        assert!(controller.state().outbound().is_some());
        assert_eq!(controller.draft(), draft);
        assert!(matches!(controller.set_subject("changed"), Err(Error::Busy)));

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Delivered(89));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_retried() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            Err(TransportError::Connection("reset".into())),
            Ok(()),
        ]));
        let (controller, _notices) = controller(transport.clone());
        fill(&controller, "Update", "Body", "prospects");

        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(outcome, SubmitOutcome::Delivered(542));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![
            Err(TransportError::Connection("down".into())),
            Err(TransportError::Connection("down".into())),
            Err(TransportError::Connection("down".into())),
            Ok(()),
        ]));
        let (controller, _notices) = controller(transport.clone());
        fill(&controller, "Update", "Body", "vip");

        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(DispatchFailure::Transport(TransportError::Connection(
                "down".into()
            )))
        );
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_keeps_draft() {
        let transport = Arc::new(ScriptedTransport::with_script(vec![Err(
            TransportError::Rejected("content flagged".into()),
        )]));
        let (controller, mut notices) = controller(transport.clone());
        fill(&controller, "Update", "Body", "all");
        let before = controller.draft();

        let outcome = controller.submit(&CancelToken::new()).await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(DispatchFailure::Transport(TransportError::Rejected(_)))
        ));
        assert_eq!(transport.calls(), 1);
        assert_eq!(controller.draft(), before);
        assert_eq!(controller.state(), DispatchState::Idle);
        assert!(controller.recent_campaigns().is_empty());
        assert_eq!(notices.try_recv().unwrap().title, "Newsletter Not Sent");
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(ScriptedTransport::gated(gate));
        let policy = RetryPolicy::new(
            2,
            Duration::from_millis(100),
            Duration::from_secs(1),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let (controller, _notices) = controller(transport.clone());
        let controller = controller.with_retry_policy(policy);
        fill(&controller, "Update", "Body", "vip");

        let outcome = controller.submit(&CancelToken::new()).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(DispatchFailure::Transport(TransportError::Timeout(
                Duration::from_secs(5)
            )))
        );
        assert_eq!(transport.calls(), 2);
        assert_eq!(controller.state(), DispatchState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_while_sending() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(ScriptedTransport::gated(gate));
        let (controller, _notices) = controller(transport);
        let controller = Arc::new(controller);
        fill(&controller, "Update", "Body", "vip");
        let mut events = controller.subscribe();
        let cancel = CancelToken::new();

        let handle = {
            let controller = controller.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { controller.submit(&cancel).await })
        };
        loop {
            if let DispatchState::Sending(_) = events.recv().await.unwrap() {
                break;
            }
        }

        cancel.cancel();
        assert_eq!(
            handle.await.unwrap(),
            SubmitOutcome::Failed(DispatchFailure::Cancelled)
        );
        assert_eq!(controller.state(), DispatchState::Idle);
        assert_eq!(controller.draft().subject, "Update");
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(ScriptedTransport::gated(gate));
        let (controller, _notices) = controller(transport);
        let controller = Arc::new(controller);
        fill(&controller, "Update", "Body", "vip");
        let mut events = controller.subscribe();

        let handle = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(&CancelToken::new()).await })
        };
        loop {
            if let DispatchState::Sending(_) = events.recv().await.unwrap() {
                break;
            }
        }

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        assert_eq!(
            events.recv().await.unwrap(),
            DispatchState::Failed(DispatchFailure::Cancelled)
        );
        assert_eq!(controller.state(), DispatchState::Idle);
        assert!(!controller.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_newest_first() {
        let (controller, _notices) = controller(Arc::new(SimulatedTransport::default()));

        fill(&controller, "Monthly Product Updates", "Body", "all");
        controller.submit(&CancelToken::new()).await;
        fill(&controller, "Special Holiday Offers", "Body", "active");
        controller.submit(&CancelToken::new()).await;

        let history = controller.recent_campaigns();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].subject, "Special Holiday Offers");
        assert_eq!(history[0].recipients, 1843);
        assert_eq!(history[1].audience_name, "All Contacts");
    }

    #[test]
    fn test_selected_audience_preview() {
        let (controller, _notices) = controller(Arc::new(SimulatedTransport::default()));
        assert!(controller.selected_audience().is_none());

        controller.select_audience(Some("prospects")).unwrap();
        assert_eq!(controller.selected_audience().unwrap().count, 542);

        controller.select_audience(None).unwrap();
        assert!(controller.selected_audience().is_none());
    }
}
