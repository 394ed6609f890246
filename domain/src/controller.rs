use std::collections::BTreeMap;
use std::sync::Arc;

use auth_adapter::{AuthGateway, GatewayError};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::avatar::{AvatarFile, AvatarPreview, PreviewStore};
use crate::form::{FormFields, FormKind, FormPhase, FormStateMachine, StateError, Submission, UiFlags};
use crate::login::LoginInput;
use crate::redirect::{Navigator, PendingRedirect, RedirectScheduler};
use crate::signup::SignupInput;
use crate::validation::FieldError;


pub type LoginController<G, N> = FormController<LoginInput, G, N>;
pub type SignupController<G, N> = FormController<SignupInput, G, N>;

/// Result of a submit event that was allowed in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed and the errors are on display
    Invalid,
    /// The gateway call is in flight
    Submitting,
}

/// Point-in-time view of a form, ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub kind: FormKind,
    pub phase: FormPhase,
    pub ui: UiFlags,
    pub errors: BTreeMap<String, String>,
    pub values: BTreeMap<String, String>,
    pub avatar_preview_url: Option<String>,
    pub redirect_pending: bool,
}

struct ControllerState<I: FormFields> {
    machine: FormStateMachine<I>,
    preview: Option<AvatarPreview>,
    submission: Option<JoinHandle<()>>,
    redirect: Option<PendingRedirect>,
    phase_tx: watch::Sender<FormPhase>,
}

impl<I: FormFields> ControllerState<I> {
    fn publish(&self) {
        self.phase_tx.send_replace(self.machine.phase());
    }

    fn complete<N: Navigator>(
        &mut self,
        outcome: Result<(), GatewayError>,
        redirects: &RedirectScheduler<N>,
    ) {
        if let Err(error) = &outcome {
            warn!("{} submission failed: {error}", I::KIND);
        }
        let phase = self.machine.finish_submit(outcome);
        self.publish();
        if phase == FormPhase::Success {
            info!("{} submission succeeded", I::KIND);
            self.redirect = Some(redirects.schedule(I::KIND.redirect_target()));
        }
    }
}

impl<I: FormFields> Drop for ControllerState<I> {
    fn drop(&mut self) {
        if let Some(task) = self.submission.take() {
            task.abort();
        }
    }
}

/// Owner of one mounted form: its state machine, the in-flight gateway call,
/// the pending redirect and (on signup) the avatar preview.
///
/// Dropping the controller, or calling [`FormController::unmount`], cancels
/// both timers and releases the preview.
pub struct FormController<I: FormFields, G: AuthGateway, N: Navigator> {
    state: Arc<Mutex<ControllerState<I>>>,
    gateway: Arc<G>,
    redirects: RedirectScheduler<N>,
    phase_rx: watch::Receiver<FormPhase>,
}

impl<I: FormFields, G: AuthGateway, N: Navigator> FormController<I, G, N> {
    pub fn new(gateway: Arc<G>, redirects: RedirectScheduler<N>) -> Self {
        let (phase_tx, phase_rx) = watch::channel(FormPhase::Editing);
        let state = ControllerState {
            machine: FormStateMachine::new(),
            preview: None,
            submission: None,
            redirect: None,
            phase_tx,
        };
        debug!("Mounted {} form", I::KIND);

        Self {
            state: Arc::new(Mutex::new(state)),
            gateway,
            redirects,
            phase_rx,
        }
    }

    pub fn kind(&self) -> FormKind {
        I::KIND
    }

    pub async fn edit(&self, edit: I::Edit) -> Result<I::Field, StateError> {
        self.state.lock().await.machine.edit(edit)
    }

    pub async fn blur(&self, field: I::Field) {
        self.state.lock().await.machine.blur(field);
    }

    pub async fn toggle_password(&self) -> bool {
        self.state.lock().await.machine.toggle_password()
    }

    /// Validates the whole form and, when it passes, hands a snapshot of the
    /// input to the gateway in the background
    pub async fn submit(&self) -> Result<SubmitOutcome, StateError> {
        let mut state = self.state.lock().await;
        let snapshot = match state.machine.begin_submit()? {
            Submission::Invalid => return Ok(SubmitOutcome::Invalid),
            Submission::Started(snapshot) => snapshot,
        };
        state.publish();
        info!("{} form submitting", I::KIND);

        let shared = Arc::downgrade(&self.state);
        let gateway = Arc::clone(&self.gateway);
        let redirects = self.redirects.clone();
        state.submission = Some(tokio::spawn(async move {
            let outcome = snapshot.dispatch(gateway).await;
            // the view may have been torn down while the call was in flight
            let Some(shared) = shared.upgrade() else {
                return;
            };
            shared.lock().await.complete(outcome, &redirects);
        }));

        Ok(SubmitOutcome::Submitting)
    }

    pub fn phase(&self) -> FormPhase {
        *self.phase_rx.borrow()
    }

    /// Waits until no submission is in flight and returns the phase reached
    pub async fn settled(&self) -> FormPhase {
        let mut updates = self.phase_rx.clone();
        let settled = updates
            .wait_for(|phase| *phase != FormPhase::Submitting)
            .await
            .map(|phase| *phase);
        settled.unwrap_or_else(|_| *updates.borrow())
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        let machine = &state.machine;
        FormSnapshot {
            kind: I::KIND,
            phase: machine.phase(),
            ui: machine.ui(),
            errors: machine.errors().messages(),
            values: machine
                .input()
                .echo()
                .into_iter()
                .map(|(field, value)| (field.to_string(), value))
                .collect(),
            avatar_preview_url: state.preview.as_ref().map(AvatarPreview::url),
            redirect_pending: state
                .redirect
                .as_ref()
                .is_some_and(|redirect| !redirect.has_fired()),
        }
    }

    /// Tears the form down: cancels the gateway call and the redirect, and
    /// releases the avatar preview
    pub async fn unmount(self) {
        let mut state = self.state.lock().await;
        if let Some(redirect) = state.redirect.take() {
            redirect.cancel();
        }
        if let Some(task) = state.submission.take() {
            task.abort();
        }
        state.preview = None;
        info!("Unmounted {} form", I::KIND);
    }
}

impl<G: AuthGateway, N: Navigator> FormController<SignupInput, G, N> {
    /// Handles a file picked for the avatar. An accepted file replaces the
    /// preview; the previous preview is released.
    pub async fn select_avatar(
        &self,
        file: AvatarFile,
        previews: &PreviewStore,
    ) -> Result<(), FieldError> {
        let mut state = self.state.lock().await;
        if state.machine.phase() == FormPhase::Success {
            warn!("Ignoring avatar picked after signup completed");
            return Ok(());
        }
        if let Err(error) = state.machine.attach_avatar(file) {
            warn!("Rejected avatar: {error}");
            return Err(error);
        }
        state.preview = state
            .machine
            .input()
            .avatar
            .as_ref()
            .map(|file| previews.create(file));
        Ok(())
    }
}
