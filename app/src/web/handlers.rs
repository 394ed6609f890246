use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Form, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use domain::avatar::AvatarFile;
use domain::controller::FormSnapshot;
use domain::form::{FormKind, FormPhase};
use domain::landing::Viewer;
use domain::login::LoginEdit;
use domain::signup::{Role, SignupEdit};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::services::{FormEventError, FormSession, MountedForm, read_avatar};
use crate::web::{
    AppState,
    templates::{
        AuthSuccessTemplate, FormPage, LandingTemplate, LoginTemplate, RoleOption, SignupTemplate,
    },
};

const TOGGLE_PASSWORD_ACTION: &str = "toggle-password";

#[derive(Debug, Default, Deserialize)]
pub struct LoginSubmission {
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: present ("on") when ticked
    #[serde(rename = "rememberMe")]
    pub remember_me: Option<String>,
    pub action: Option<String>,
}

/// `?session=` on a form page, set by the reload while a submission runs
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub session: Option<String>,
}

/// Fields of the signup multipart body
#[derive(Debug, Default)]
pub struct SignupSubmission {
    pub session: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub avatar: Option<AvatarFile>,
    pub action: Option<String>,
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template rendering failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// Handler functions
pub async fn landing(State(state): State<AppState>) -> Response {
    render(LandingTemplate {
        page: state.portal().landing(Viewer::Anonymous),
    })
}

pub async fn login_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    form_page(&state, query, FormKind::Login).await
}

pub async fn signup_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    form_page(&state, query, FormKind::Signup).await
}

async fn form_page(state: &AppState, query: PageQuery, kind: FormKind) -> Response {
    let form = match query.session {
        Some(session) => resume(state, &session, kind).await,
        None => state.mount(kind).await,
    };
    show(state, form).await
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(submission): Form<LoginSubmission>,
) -> Response {
    let form = resume(&state, &submission.session, FormKind::Login).await;
    info!("Login form posted for session {}", form.id);

    if let FormSession::Login(controller) = &form.session {
        let mut edits = vec![
            LoginEdit::Email(submission.email),
            LoginEdit::RememberMe(submission.remember_me.is_some()),
        ];
        // the page never echoes the password back, so a blank field keeps the stored one
        if !submission.password.is_empty() {
            edits.push(LoginEdit::Password(submission.password));
        }
        for edit in edits {
            if let Err(e) = controller.edit(edit).await {
                debug!("Edit ignored: {e}");
            }
        }
    }

    act(&state, form, submission.action.as_deref()).await
}

pub async fn signup_submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    let submission = match read_signup(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Unreadable signup body: {e}");
            return (StatusCode::BAD_REQUEST, e).into_response();
        }
    };
    let form = resume(&state, &submission.session, FormKind::Signup).await;
    info!("Signup form posted for session {}", form.id);

    if let FormSession::Signup(controller) = &form.session {
        let mut edits = vec![
            SignupEdit::FullName(submission.full_name),
            SignupEdit::Email(submission.email),
        ];
        if !submission.password.is_empty() {
            edits.push(SignupEdit::Password(submission.password));
        }
        match Role::from_str(&submission.role) {
            Ok(role) => edits.push(SignupEdit::Role(role)),
            Err(e) if !submission.role.is_empty() => warn!("{e}"),
            Err(_) => {}
        }
        for edit in edits {
            if let Err(e) = controller.edit(edit).await {
                debug!("Edit ignored: {e}");
            }
        }
    }

    if let Some(file) = submission.avatar {
        match form.session.select_avatar(file, state.portal()).await {
            Ok(()) => {}
            // a rejected file stops the post here so the user sees why
            Err(FormEventError::InvalidFile(_)) => return render_form(&form).await,
            Err(e) => warn!("Avatar ignored: {e}"),
        }
    }

    act(&state, form, submission.action.as_deref()).await
}

pub async fn avatar_preview(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.portal().previews().get(&id) {
        Some(blob) => (
            [(header::CONTENT_TYPE, blob.content_type)],
            blob.bytes.to_vec(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn read_signup(mut multipart: Multipart) -> Result<SignupSubmission, String> {
    let mut submission = SignupSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "avatar" {
            submission.avatar = read_avatar(field).await.map_err(|e| e.body_text())?;
            continue;
        }
        let text = field.text().await.map_err(|e| e.body_text())?;
        match name.as_str() {
            "session" => submission.session = text,
            "fullName" => submission.full_name = text,
            "email" => submission.email = text,
            "password" => submission.password = text,
            "role" => submission.role = text,
            "action" => submission.action = Some(text),
            other => debug!("Ignoring signup field {other}"),
        }
    }
    Ok(submission)
}

/// The posted session when it is still alive and of the right kind, a fresh one otherwise
async fn resume(state: &AppState, session: &str, kind: FormKind) -> Arc<MountedForm> {
    let live = match Uuid::parse_str(session) {
        Ok(id) => state.sessions().get(&id).await,
        Err(_) => None,
    };
    if let Some(form) = live.filter(|form| form.session.kind() == kind) {
        return form;
    }
    debug!("No live {kind} session for {session:?}, mounting a new one");
    state.mount(kind).await
}

async fn act(state: &AppState, form: Arc<MountedForm>, action: Option<&str>) -> Response {
    if action == Some(TOGGLE_PASSWORD_ACTION) {
        form.session.toggle_password().await;
        return render_form(&form).await;
    }

    match form.session.submit().await {
        Ok(outcome) => debug!("Submit for session {}: {outcome:?}", form.id),
        Err(e) => warn!("Submit refused for session {}: {e}", form.id),
    }
    show(state, form).await
}

/// Renders the form as it stands; while submitting the page reloads itself
/// until the submission settles
async fn show(state: &AppState, form: Arc<MountedForm>) -> Response {
    let snapshot = form.session.snapshot().await;
    if snapshot.phase != FormPhase::Success {
        return render_snapshot(&form, snapshot);
    }

    let kind = snapshot.kind;
    let id = form.id;
    drop(form);
    // the browser follows the meta refresh; the server-side session is done
    state.sessions().remove(&id).await;
    render(success_template(kind, state.portal().redirect_delay().as_millis()))
}

fn success_template(kind: FormKind, redirect_delay_ms: u128) -> AuthSuccessTemplate {
    let refresh_secs = u64::try_from(redirect_delay_ms.div_ceil(1000)).unwrap_or(u64::MAX);
    match kind {
        FormKind::Login => AuthSuccessTemplate {
            heading: "Welcome Back!",
            message: "You have been successfully logged in.",
            redirect_note: "Redirecting to your dashboard...",
            target: kind.redirect_target(),
            refresh_secs,
        },
        FormKind::Signup => AuthSuccessTemplate {
            heading: "Account Created!",
            message: "You can now sign in with your new account.",
            redirect_note: "Redirecting to login page...",
            target: kind.redirect_target(),
            refresh_secs,
        },
    }
}

async fn render_form(form: &MountedForm) -> Response {
    render_snapshot(form, form.session.snapshot().await)
}

fn render_snapshot(form: &MountedForm, snapshot: FormSnapshot) -> Response {
    let page = FormPage::new(form.id, snapshot);
    match form.session.kind() {
        FormKind::Login => render(LoginTemplate { form: page }),
        FormKind::Signup => {
            let roles = RoleOption::all(page.value("role"));
            render(SignupTemplate { form: page, roles })
        }
    }
}
