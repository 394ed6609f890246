use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use auth_adapter::{AuthGateway, AvatarPayload, GatewayError, SignupPayload};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::avatar::AvatarFile;
use crate::form::{FormFields, FormKind, FormPhase, FormStateMachine};
use crate::validation::{
    FieldError, SIGNUP_PASSWORD_MIN_LEN, validate_avatar_size, validate_email,
    validate_full_name, validate_password, validate_role,
};

/// Account type picked on the signup page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::JobSeeker, Role::Employer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::JobSeeker => "jobseeker",
            Role::Employer => "employer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Employer => "Employer",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Role::JobSeeker => "Looking for opportunities",
            Role::Employer => "Hiring talent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl std::fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobseeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub avatar: Option<AvatarFile>,
}

impl std::fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupInput")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("avatar", &self.avatar)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignupField {
    FullName,
    Email,
    Password,
    Role,
    Avatar,
}

impl std::fmt::Display for SignupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            SignupField::FullName => "fullName",
            SignupField::Email => "email",
            SignupField::Password => "password",
            SignupField::Role => "role",
            SignupField::Avatar => "avatar",
        };
        f.write_str(key)
    }
}

/// A change event coming from one signup input. The avatar is not an edit:
/// it goes through [`FormStateMachine::attach_avatar`].
#[derive(Clone, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SignupEdit {
    FullName(String),
    Email(String),
    Password(String),
    Role(Role),
}

impl std::fmt::Debug for SignupEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupEdit::FullName(name) => f.debug_tuple("FullName").field(name).finish(),
            SignupEdit::Email(email) => f.debug_tuple("Email").field(email).finish(),
            SignupEdit::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
            SignupEdit::Role(role) => f.debug_tuple("Role").field(role).finish(),
        }
    }
}

impl From<SignupInput> for SignupPayload {
    fn from(input: SignupInput) -> Self {
        SignupPayload {
            full_name: input.full_name,
            email: input.email,
            password: input.password,
            role: input.role.map(Role::as_str).unwrap_or_default().to_string(),
            avatar: input.avatar.map(|file| AvatarPayload {
                file_name: file.name,
                content_type: file.content_type,
                bytes: file.bytes,
            }),
        }
    }
}

impl FormFields for SignupInput {
    type Field = SignupField;
    type Edit = SignupEdit;

    const KIND: FormKind = FormKind::Signup;

    fn apply(&mut self, edit: SignupEdit) -> SignupField {
        match edit {
            SignupEdit::FullName(full_name) => {
                self.full_name = full_name;
                SignupField::FullName
            }
            SignupEdit::Email(email) => {
                self.email = email;
                SignupField::Email
            }
            SignupEdit::Password(password) => {
                self.password = password;
                SignupField::Password
            }
            SignupEdit::Role(role) => {
                self.role = Some(role);
                SignupField::Role
            }
        }
    }

    fn validate(&self) -> Vec<(SignupField, FieldError)> {
        [
            (SignupField::FullName, validate_full_name(&self.full_name)),
            (SignupField::Email, validate_email(&self.email)),
            (
                SignupField::Password,
                validate_password(&self.password, SIGNUP_PASSWORD_MIN_LEN),
            ),
            (SignupField::Role, validate_role(self.role)),
            (
                SignupField::Avatar,
                validate_avatar_size(self.avatar.as_ref().map(AvatarFile::size)),
            ),
        ]
        .into_iter()
        .filter_map(|(field, verdict)| verdict.map(|error| (field, error)))
        .collect()
    }

    fn validate_on_blur(&self, field: SignupField) -> Option<Option<FieldError>> {
        match field {
            SignupField::Email => Some(validate_email(&self.email)),
            SignupField::Password => {
                Some(validate_password(&self.password, SIGNUP_PASSWORD_MIN_LEN))
            }
            SignupField::FullName | SignupField::Role | SignupField::Avatar => None,
        }
    }

    fn echo(&self) -> Vec<(SignupField, String)> {
        vec![
            (SignupField::FullName, self.full_name.clone()),
            (SignupField::Email, self.email.clone()),
            (
                SignupField::Role,
                self.role.map(Role::as_str).unwrap_or_default().to_string(),
            ),
            (
                SignupField::Avatar,
                self.avatar
                    .as_ref()
                    .map(|file| file.name.clone())
                    .unwrap_or_default(),
            ),
        ]
    }

    fn dispatch<G: AuthGateway>(
        self,
        gateway: Arc<G>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send + 'static {
        let payload = SignupPayload::from(self);
        async move { gateway.register(payload).await }
    }
}

impl FormStateMachine<SignupInput> {
    /// Stores a picked avatar once it passes the size check. A rejected file
    /// is dropped and the previously stored avatar, if any, stays.
    pub fn attach_avatar(&mut self, file: AvatarFile) -> Result<(), FieldError> {
        if self.phase() == FormPhase::Success {
            return Ok(());
        }
        if let Some(error) = validate_avatar_size(Some(file.size())) {
            self.errors_mut()
                .record(SignupField::Avatar, Some(error.clone()));
            return Err(error);
        }
        self.input_mut().avatar = Some(file);
        self.errors_mut().clear_field(SignupField::Avatar);
        Ok(())
    }
}
