use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::Arc;

use auth_adapter::{AuthGateway, GatewayError};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::validation::FieldError;

/// Which page a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Signup,
}

impl FormKind {
    /// Route requested once the form has been submitted successfully
    pub fn redirect_target(self) -> &'static str {
        match self {
            FormKind::Login => "/dashboard",
            FormKind::Signup => "/login",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Login => "login",
            FormKind::Signup => "signup",
        }
    }
}

impl Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Success,
}

impl FormPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FormPhase::Editing => "editing",
            FormPhase::Submitting => "submitting",
            FormPhase::Success => "success",
        }
    }
}

/// Transitions that are not allowed from the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    SubmissionInFlight,
    AlreadySubmitted,
}

impl Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::SubmissionInFlight => write!(f, "A submission is already in progress"),
            StateError::AlreadySubmitted => write!(f, "The form has already been submitted"),
        }
    }
}

impl std::error::Error for StateError {}

/// Input model of one form page.
///
/// Implementors describe their field set, how an edit event lands on the
/// input, which fields validate on blur, and how a validated snapshot is
/// handed to the authentication gateway.
pub trait FormFields: Default + Clone + Send + Sync + 'static {
    type Field: Copy + Ord + Debug + Display + DeserializeOwned + Send + Sync + 'static;
    type Edit: Debug + DeserializeOwned + Send + 'static;

    const KIND: FormKind;

    /// Applies an edit and reports which field it touched
    fn apply(&mut self, edit: Self::Edit) -> Self::Field;

    /// Runs every validator of the form
    fn validate(&self) -> Vec<(Self::Field, FieldError)>;

    /// `None` when the field has no blur validation, otherwise the
    /// validator's verdict
    fn validate_on_blur(&self, field: Self::Field) -> Option<Option<FieldError>>;

    /// Non-secret field values, for echoing back into a re-rendered form
    fn echo(&self) -> Vec<(Self::Field, String)>;

    fn dispatch<G: AuthGateway>(
        self,
        gateway: Arc<G>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send + 'static;
}

/// Key of the whole-form error in [`FormErrors::messages`]
pub const SUBMIT_ERROR_KEY: &str = "submit";

/// Per-field errors plus the reserved whole-form `submit` slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors<F: Ord> {
    fields: BTreeMap<F, FieldError>,
    submit: Option<String>,
}

impl<F: Ord> Default for FormErrors<F> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            submit: None,
        }
    }
}

impl<F: Ord + Copy + Display> FormErrors<F> {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.submit.is_none()
    }

    pub fn get(&self, field: F) -> Option<&FieldError> {
        self.fields.get(&field)
    }

    pub fn submit(&self) -> Option<&str> {
        self.submit.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (F, &FieldError)> {
        self.fields.iter().map(|(field, error)| (*field, error))
    }

    /// Sets or clears a single field's entry
    pub fn record(&mut self, field: F, verdict: Option<FieldError>) {
        match verdict {
            Some(error) => {
                self.fields.insert(field, error);
            }
            None => {
                self.fields.remove(&field);
            }
        }
    }

    pub fn clear_field(&mut self, field: F) {
        self.fields.remove(&field);
    }

    pub fn set_submit(&mut self, message: String) {
        self.submit = Some(message);
    }

    pub fn clear_submit(&mut self) {
        self.submit = None;
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.submit = None;
    }

    /// Wire form: field keys and `submit` mapped to their messages
    pub fn messages(&self) -> BTreeMap<String, String> {
        let mut messages: BTreeMap<String, String> = self
            .fields
            .iter()
            .map(|(field, error)| (field.to_string(), error.to_string()))
            .collect();
        if let Some(submit) = &self.submit {
            messages.insert(SUBMIT_ERROR_KEY.to_string(), submit.clone());
        }
        messages
    }
}

/// What a submit attempt led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<I> {
    /// Validation failed; errors have been recorded
    Invalid,
    /// Validation passed; the snapshot must be sent to the gateway
    Started(I),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiFlags {
    pub loading: bool,
    pub success: bool,
    pub show_password: bool,
}

#[derive(Debug, Clone)]
pub struct FormStateMachine<I: FormFields> {
    input: I,
    errors: FormErrors<I::Field>,
    phase: FormPhase,
    show_password: bool,
}

impl<I: FormFields> Default for FormStateMachine<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: FormFields> FormStateMachine<I> {
    pub fn new() -> Self {
        Self {
            input: I::default(),
            errors: FormErrors::default(),
            phase: FormPhase::Editing,
            show_password: false,
        }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub(crate) fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn errors(&self) -> &FormErrors<I::Field> {
        &self.errors
    }

    pub(crate) fn errors_mut(&mut self) -> &mut FormErrors<I::Field> {
        &mut self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn ui(&self) -> UiFlags {
        UiFlags {
            loading: self.phase == FormPhase::Submitting,
            success: self.phase == FormPhase::Success,
            show_password: self.show_password,
        }
    }

    /// Updates a field and clears its error and the submit error without
    /// re-validating
    pub fn edit(&mut self, edit: I::Edit) -> Result<I::Field, StateError> {
        if self.phase == FormPhase::Success {
            return Err(StateError::AlreadySubmitted);
        }
        let field = self.input.apply(edit);
        self.errors.clear_field(field);
        self.errors.clear_submit();
        debug!("{} form: edited {field}", I::KIND);
        Ok(field)
    }

    /// Re-validates fields that opt into blur validation; no-op otherwise
    pub fn blur(&mut self, field: I::Field) {
        if self.phase == FormPhase::Success {
            return;
        }
        if let Some(verdict) = self.input.validate_on_blur(field) {
            self.errors.record(field, verdict);
        }
    }

    pub fn toggle_password(&mut self) -> bool {
        self.show_password = !self.show_password;
        self.show_password
    }

    pub fn begin_submit(&mut self) -> Result<Submission<I>, StateError> {
        match self.phase {
            FormPhase::Submitting => return Err(StateError::SubmissionInFlight),
            FormPhase::Success => return Err(StateError::AlreadySubmitted),
            FormPhase::Editing => {}
        }

        let failures = self.input.validate();
        self.errors.clear();
        if !failures.is_empty() {
            for (field, error) in failures {
                self.errors.record(field, Some(error));
            }
            debug!(
                "{} form: submit blocked by {} invalid field(s)",
                I::KIND,
                self.errors.fields.len()
            );
            return Ok(Submission::Invalid);
        }

        self.phase = FormPhase::Submitting;
        Ok(Submission::Started(self.input.clone()))
    }

    /// Applies the gateway's answer to an in-flight submission
    pub fn finish_submit(&mut self, outcome: Result<(), GatewayError>) -> FormPhase {
        if self.phase != FormPhase::Submitting {
            return self.phase;
        }
        self.phase = match outcome {
            Ok(()) => FormPhase::Success,
            Err(error) => {
                self.errors.set_submit(error.to_string());
                FormPhase::Editing
            }
        };
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::{LoginEdit, LoginField, LoginInput};

    fn filled() -> FormStateMachine<LoginInput> {
        let mut machine = FormStateMachine::<LoginInput>::new();
        machine
            .edit(LoginEdit::Email("user@test.com".to_string()))
            .unwrap();
        machine
            .edit(LoginEdit::Password("secret".to_string()))
            .unwrap();
        machine
    }

    #[test]
    fn starts_editing_with_no_errors() {
        let machine = FormStateMachine::<LoginInput>::new();
        assert_eq!(machine.phase(), FormPhase::Editing);
        assert!(machine.errors().is_empty());
        assert_eq!(
            machine.ui(),
            UiFlags {
                loading: false,
                success: false,
                show_password: false
            }
        );
    }

    #[test]
    fn invalid_submit_records_exactly_the_failing_fields() {
        let mut machine = FormStateMachine::<LoginInput>::new();
        machine
            .edit(LoginEdit::Email("user@test.com".to_string()))
            .unwrap();

        let outcome = machine.begin_submit().unwrap();

        assert_eq!(outcome, Submission::Invalid);
        assert_eq!(machine.phase(), FormPhase::Editing);
        assert_eq!(machine.errors().get(LoginField::Email), None);
        assert_eq!(
            machine.errors().get(LoginField::Password),
            Some(&FieldError::PasswordRequired)
        );
        assert_eq!(machine.errors().fields().count(), 1);
    }

    #[test]
    fn edit_clears_field_and_submit_errors_without_revalidating() {
        let mut machine = FormStateMachine::<LoginInput>::new();
        machine.begin_submit().unwrap();
        machine.errors_mut().set_submit("boom".to_string());

        machine
            .edit(LoginEdit::Email("still not an email".to_string()))
            .unwrap();

        assert_eq!(machine.errors().get(LoginField::Email), None);
        assert_eq!(machine.errors().submit(), None);
        assert!(machine.errors().get(LoginField::Password).is_some());
    }

    #[test]
    fn blur_validates_email_and_password_only() {
        let mut machine = FormStateMachine::<LoginInput>::new();
        machine
            .edit(LoginEdit::Email("bad".to_string()))
            .unwrap();

        machine.blur(LoginField::Email);
        machine.blur(LoginField::RememberMe);

        assert_eq!(
            machine.errors().get(LoginField::Email),
            Some(&FieldError::EmailInvalid)
        );
        assert_eq!(machine.errors().get(LoginField::RememberMe), None);

        machine
            .edit(LoginEdit::Email("good@mail.com".to_string()))
            .unwrap();
        machine.blur(LoginField::Email);
        assert_eq!(machine.errors().get(LoginField::Email), None);
    }

    #[test]
    fn valid_submit_moves_to_submitting_with_a_snapshot() {
        let mut machine = filled();

        let Submission::Started(snapshot) = machine.begin_submit().unwrap() else {
            panic!("valid form should start submitting");
        };

        assert_eq!(snapshot.email, "user@test.com");
        assert_eq!(machine.phase(), FormPhase::Submitting);
        assert!(machine.ui().loading);
        assert!(!machine.ui().success);
        assert!(machine.errors().is_empty());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut machine = filled();
        machine.begin_submit().unwrap();
        assert_eq!(
            machine.begin_submit(),
            Err(StateError::SubmissionInFlight)
        );
    }

    #[test]
    fn success_is_terminal() {
        let mut machine = filled();
        machine.begin_submit().unwrap();

        assert_eq!(machine.finish_submit(Ok(())), FormPhase::Success);
        assert!(machine.ui().success);
        assert!(!machine.ui().loading);
        assert_eq!(machine.begin_submit(), Err(StateError::AlreadySubmitted));
        assert_eq!(
            machine.edit(LoginEdit::RememberMe(true)),
            Err(StateError::AlreadySubmitted)
        );
    }

    #[test]
    fn gateway_error_returns_to_editing_with_submit_message() {
        let mut machine = filled();
        machine.begin_submit().unwrap();

        let phase = machine.finish_submit(Err(GatewayError::Rejected(
            "Invalid email or password.".to_string(),
        )));

        assert_eq!(phase, FormPhase::Editing);
        assert_eq!(machine.errors().submit(), Some("Invalid email or password."));
        assert!(!machine.ui().loading);

        machine.edit(LoginEdit::RememberMe(true)).unwrap();
        assert_eq!(machine.errors().submit(), None);
    }

    #[test]
    fn finish_without_submission_changes_nothing() {
        let mut machine = FormStateMachine::<LoginInput>::new();
        assert_eq!(machine.finish_submit(Ok(())), FormPhase::Editing);
    }

    #[test]
    fn messages_include_the_submit_slot() {
        let mut errors = FormErrors::<LoginField>::default();
        errors.record(LoginField::Email, Some(FieldError::EmailRequired));
        errors.set_submit("Try again later.".to_string());

        let messages = errors.messages();

        assert_eq!(messages.get("email").map(String::as_str), Some("Email address is required."));
        assert_eq!(messages.get("submit").map(String::as_str), Some("Try again later."));
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn toggling_password_visibility_flips_the_flag() {
        let mut machine = FormStateMachine::<LoginInput>::new();
        assert!(machine.toggle_password());
        assert!(machine.ui().show_password);
        assert!(!machine.toggle_password());
    }
}
