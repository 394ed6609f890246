use std::collections::BTreeMap;

use askama::Template;
use domain::controller::FormSnapshot;
use domain::landing::LandingPage;
use domain::signup::Role;
use uuid::Uuid;

/// Seconds between reloads of a page whose submission is in flight
pub const SUBMITTING_REFRESH_SECS: u64 = 1;

/// What the form templates read: echoed values, messages and UI flags
pub struct FormPage {
    pub session_id: String,
    pub values: BTreeMap<String, String>,
    pub errors: BTreeMap<String, String>,
    pub show_password: bool,
    pub loading: bool,
    pub avatar_preview_url: Option<String>,
    /// Page that picks the session up again, polled while loading
    pub refresh_url: String,
    pub refresh_secs: u64,
}

impl FormPage {
    pub fn new(session_id: Uuid, snapshot: FormSnapshot) -> Self {
        Self {
            session_id: session_id.to_string(),
            values: snapshot.values,
            errors: snapshot.errors,
            show_password: snapshot.ui.show_password,
            loading: snapshot.ui.loading,
            avatar_preview_url: snapshot.avatar_preview_url,
            refresh_url: format!("/{}?session={session_id}", snapshot.kind.as_str()),
            refresh_secs: SUBMITTING_REFRESH_SECS,
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn error(&self, key: &str) -> &str {
        self.errors.get(key).map_or("", String::as_str)
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.value(key) == "true"
    }

    pub fn password_type(&self) -> &'static str {
        if self.show_password { "text" } else { "password" }
    }

    pub fn password_toggle_label(&self) -> &'static str {
        if self.show_password { "Hide" } else { "Show" }
    }
}

pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub tagline: &'static str,
    pub selected: bool,
}

impl RoleOption {
    pub fn all(selected: &str) -> Vec<RoleOption> {
        Role::ALL
            .into_iter()
            .map(|role| RoleOption {
                value: role.as_str(),
                label: role.label(),
                tagline: role.tagline(),
                selected: role.as_str() == selected,
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub page: LandingPage,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub form: FormPage,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub form: FormPage,
    pub roles: Vec<RoleOption>,
}

#[derive(Template)]
#[template(path = "auth_success.html")]
pub struct AuthSuccessTemplate {
    pub heading: &'static str,
    pub message: &'static str,
    pub redirect_note: &'static str,
    pub target: &'static str,
    pub refresh_secs: u64,
}
