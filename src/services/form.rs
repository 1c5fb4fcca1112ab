use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{AppResult, SubmitError, VALIDATION_MESSAGE};
use crate::models::{DraftEvent, Field};
use crate::services::api::EventTransport;
use crate::services::credentials::CredentialStore;

pub const SUCCESS_MESSAGE: &str = "Event created successfully!";
pub const DEFAULT_CREATED_DELAY: Duration = Duration::from_millis(1500);

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Snapshot of everything the creation screen renders.
///
/// Transitions build a new value and replace the published one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub draft: DraftEvent,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl FormState {
    fn edited(self, draft: DraftEvent) -> Self {
        Self {
            draft,
            error: None,
            success: None,
            ..self
        }
    }

    fn submitting(self) -> Self {
        Self {
            loading: true,
            error: None,
            success: None,
            ..self
        }
    }

    fn failed(self, message: String) -> Self {
        Self {
            loading: false,
            error: Some(message),
            success: None,
            ..self
        }
    }

    fn succeeded(self) -> Self {
        Self {
            draft: DraftEvent::default(),
            loading: false,
            error: None,
            success: Some(SUCCESS_MESSAGE.to_string()),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Creating Event..."
        } else {
            "Create Event"
        }
    }

    /// Both buttons are disabled while a request is in flight.
    pub fn controls_enabled(&self) -> bool {
        !self.loading
    }
}

/// Terminal result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    Ignored,
    Created,
    Rejected(SubmitError),
}

/// Puts `loading` back to false if `submit` is dropped before it finishes.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<FormState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!("Submission abandoned while in flight");
        self.state.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            *state = FormState {
                loading: false,
                ..state.clone()
            };
            true
        });
    }
}

enum Start {
    Busy,
    Invalid(Vec<Field>),
    Ready(DraftEvent),
}

/// Delayed `created` callback that can be cancelled before it fires.
struct ScheduledCallback {
    shutdown: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl ScheduledCallback {
    fn spawn(delay: Duration, callback: Callback) -> Self {
        let (shutdown, mut shutdown_rx) = broadcast::channel::<()>(1);
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Pending event-created callback cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    callback();
                }
            }
        });

        Self { shutdown, handle }
    }

    fn cancel(self) {
        let _ = self.shutdown.send(());
    }

    async fn join(self) {
        let ScheduledCallback { shutdown, handle } = self;
        if let Err(e) = handle.await {
            tracing::warn!("Event-created callback task failed: {}", e);
        }
        drop(shutdown);
    }
}

/// Controller behind the "Create New Event" screen.
pub struct CreateEventForm {
    state: watch::Sender<FormState>,
    credentials: Arc<dyn CredentialStore>,
    transport: Arc<dyn EventTransport>,
    created_delay: Duration,
    on_back: Option<Callback>,
    on_event_created: Option<Callback>,
    pending: Mutex<Option<ScheduledCallback>>,
}

impl CreateEventForm {
    pub fn new(credentials: Arc<dyn CredentialStore>, transport: Arc<dyn EventTransport>) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            state,
            credentials,
            transport,
            created_delay: DEFAULT_CREATED_DELAY,
            on_back: None,
            on_event_created: None,
            pending: Mutex::new(None),
        }
    }

    pub fn from_config(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn EventTransport>,
    ) -> Self {
        Self::new(credentials, transport).with_created_delay(config.form.created_delay())
    }

    pub fn with_created_delay(mut self, delay: Duration) -> Self {
        self.created_delay = delay;
        self
    }

    pub fn on_back(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_back = Some(Arc::new(callback));
        self
    }

    pub fn on_event_created(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_event_created = Some(Arc::new(callback));
        self
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Replace one field and clear any previous outcome message.
    ///
    /// An invalid status value is rejected and leaves the state untouched.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> AppResult<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            match state.draft.with_field(field, value) {
                Ok(draft) => {
                    *state = state.clone().edited(draft);
                    true
                }
                Err(e) => {
                    result = Err(e);
                    false
                }
            }
        });
        result
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let mut start = Start::Busy;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }

            let missing = state.draft.missing_required();
            if missing.is_empty() {
                start = Start::Ready(state.draft.clone());
                *state = state.clone().submitting();
            } else {
                start = Start::Invalid(missing);
                *state = state.clone().failed(VALIDATION_MESSAGE.to_string());
            }
            true
        });

        let draft = match start {
            Start::Busy => {
                tracing::debug!("Submit ignored: a request is already in flight");
                return SubmitOutcome::Ignored;
            }
            Start::Invalid(missing) => {
                tracing::debug!("Submit rejected locally, missing fields: {:?}", missing);
                return SubmitOutcome::Rejected(SubmitError::Validation { missing });
            }
            Start::Ready(draft) => draft,
        };
        let guard = LoadingGuard::new(&self.state);

        let Some(token) = self.credentials.token() else {
            guard.disarm();
            return self.reject(SubmitError::AuthenticationMissing);
        };

        let request = draft.to_request();
        let result = self.transport.create_event(&token, &request).await;
        guard.disarm();

        match result {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    "Event {:?} created (status {})",
                    request.title,
                    response.status
                );
                self.state.send_modify(|state| *state = state.clone().succeeded());
                self.schedule_created();
                SubmitOutcome::Created
            }
            Ok(response) => {
                let message = response.rejection_message();
                tracing::warn!(
                    "Event creation rejected (status {}): {}",
                    response.status,
                    message
                );
                self.reject(SubmitError::RemoteRejection {
                    status: response.status,
                    message,
                })
            }
            Err(e) => {
                tracing::error!("Error creating event: {}", e);
                self.reject(e.into())
            }
        }
    }

    /// Invoke the `back` callback unless a submission is in flight.
    pub fn back(&self) -> bool {
        if self.state.borrow().loading {
            return false;
        }
        match &self.on_back {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Whether a `created` callback is scheduled and has not fired yet.
    pub fn has_pending_callback(&self) -> bool {
        self.pending
            .lock()
            .map(|pending| {
                pending
                    .as_ref()
                    .is_some_and(|scheduled| !scheduled.handle.is_finished())
            })
            .unwrap_or(false)
    }

    /// Wait until a scheduled `created` callback has fired or been cancelled.
    pub async fn settle(&self) {
        let scheduled = self.pending.lock().ok().and_then(|mut pending| pending.take());
        if let Some(scheduled) = scheduled {
            scheduled.join().await;
        }
    }

    /// Cancel a pending `created` callback. Called on drop as well.
    pub fn teardown(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(scheduled) = pending.take() {
                scheduled.cancel();
            }
        }
    }

    fn reject(&self, error: SubmitError) -> SubmitOutcome {
        let message = error.to_string();
        self.state.send_modify(|state| *state = state.clone().failed(message));
        SubmitOutcome::Rejected(error)
    }

    fn schedule_created(&self) {
        let Some(callback) = self.on_event_created.clone() else {
            return;
        };

        let scheduled = ScheduledCallback::spawn(self.created_delay, callback);
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(scheduled) {
                previous.cancel();
            }
        }
    }
}

impl Drop for CreateEventForm {
    fn drop(&mut self) {
        self.teardown();
    }
}
