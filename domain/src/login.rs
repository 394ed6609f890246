use std::future::Future;
use std::sync::Arc;

use auth_adapter::{AuthGateway, GatewayError, LoginPayload};
use serde::Deserialize;

use crate::form::{FormFields, FormKind};
use crate::validation::{FieldError, LOGIN_PASSWORD_MIN_LEN, validate_email, validate_password};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginField {
    Email,
    Password,
    RememberMe,
}

impl std::fmt::Display for LoginField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
            LoginField::RememberMe => "rememberMe",
        };
        f.write_str(key)
    }
}

/// A change event coming from one login input, e.g.
/// `{"field": "email", "value": "user@test.com"}`
#[derive(Clone, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LoginEdit {
    Email(String),
    Password(String),
    RememberMe(bool),
}

impl std::fmt::Debug for LoginEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginEdit::Email(email) => f.debug_tuple("Email").field(email).finish(),
            LoginEdit::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
            LoginEdit::RememberMe(flag) => f.debug_tuple("RememberMe").field(flag).finish(),
        }
    }
}

impl From<LoginInput> for LoginPayload {
    fn from(input: LoginInput) -> Self {
        LoginPayload {
            email: input.email,
            password: input.password,
            remember_me: input.remember_me,
        }
    }
}

impl FormFields for LoginInput {
    type Field = LoginField;
    type Edit = LoginEdit;

    const KIND: FormKind = FormKind::Login;

    fn apply(&mut self, edit: LoginEdit) -> LoginField {
        match edit {
            LoginEdit::Email(email) => {
                self.email = email;
                LoginField::Email
            }
            LoginEdit::Password(password) => {
                self.password = password;
                LoginField::Password
            }
            LoginEdit::RememberMe(remember_me) => {
                self.remember_me = remember_me;
                LoginField::RememberMe
            }
        }
    }

    fn validate(&self) -> Vec<(LoginField, FieldError)> {
        [
            (LoginField::Email, validate_email(&self.email)),
            (
                LoginField::Password,
                validate_password(&self.password, LOGIN_PASSWORD_MIN_LEN),
            ),
        ]
        .into_iter()
        .filter_map(|(field, verdict)| verdict.map(|error| (field, error)))
        .collect()
    }

    fn validate_on_blur(&self, field: LoginField) -> Option<Option<FieldError>> {
        match field {
            LoginField::Email => Some(validate_email(&self.email)),
            LoginField::Password => Some(validate_password(&self.password, LOGIN_PASSWORD_MIN_LEN)),
            LoginField::RememberMe => None,
        }
    }

    fn echo(&self) -> Vec<(LoginField, String)> {
        vec![
            (LoginField::Email, self.email.clone()),
            (LoginField::RememberMe, self.remember_me.to_string()),
        ]
    }

    fn dispatch<G: AuthGateway>(
        self,
        gateway: Arc<G>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send + 'static {
        let payload = LoginPayload::from(self);
        async move { gateway.login(payload).await }
    }
}
