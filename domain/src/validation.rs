use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateLength;

use crate::signup::Role;

pub const LOGIN_PASSWORD_MIN_LEN: u64 = 6;
pub const SIGNUP_PASSWORD_MIN_LEN: u64 = 8;
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

// Something, an @, something, a dot, something. Deliberately loose.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Field validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    PasswordTooShort { min_len: u64 },
    FullNameRequired,
    RoleMissing,
    AvatarTooLarge { max_bytes: u64 },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::EmailRequired => write!(f, "Email address is required."),
            FieldError::EmailInvalid => write!(f, "Email address is invalid."),
            FieldError::PasswordRequired => write!(f, "Password is required."),
            FieldError::PasswordTooShort { min_len } => {
                write!(f, "Password must be at least {min_len} characters long.")
            }
            FieldError::FullNameRequired => write!(f, "Full name is required."),
            FieldError::RoleMissing => write!(f, "Please select a role."),
            FieldError::AvatarTooLarge { max_bytes } => {
                write!(f, "File size must be less than {}MB.", max_bytes / (1024 * 1024))
            }
        }
    }
}

impl std::error::Error for FieldError {}

pub fn validate_email(email: &str) -> Option<FieldError> {
    if email.is_empty() {
        return Some(FieldError::EmailRequired);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Some(FieldError::EmailInvalid);
    }
    None
}

/// Checks presence and minimum length, counted in characters
pub fn validate_password(password: &str, min_len: u64) -> Option<FieldError> {
    if password.is_empty() {
        return Some(FieldError::PasswordRequired);
    }
    if !password.validate_length(Some(min_len), None, None) {
        return Some(FieldError::PasswordTooShort { min_len });
    }
    None
}

pub fn validate_full_name(full_name: &str) -> Option<FieldError> {
    full_name.is_empty().then_some(FieldError::FullNameRequired)
}

pub fn validate_role(role: Option<Role>) -> Option<FieldError> {
    role.is_none().then_some(FieldError::RoleMissing)
}

/// An absent avatar is fine; a present one must fit the upload limit
pub fn validate_avatar_size(size: Option<u64>) -> Option<FieldError> {
    match size {
        Some(size) if size > MAX_AVATAR_BYTES => Some(FieldError::AvatarTooLarge {
            max_bytes: MAX_AVATAR_BYTES,
        }),
        _ => None,
    }
}
