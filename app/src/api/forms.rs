use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use domain::controller::SubmitOutcome;
use domain::form::FormKind;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use super::error::ErrorBody;
use super::{ApiError, AppState};
use crate::services::{FormEventError, MountedForm, SessionId, read_avatar};


/// What a client needs to render a form
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FormView {
    pub id: Uuid,
    /// `login` or `signup`
    pub kind: String,
    /// `editing`, `submitting` or `success`
    pub phase: String,
    pub loading: bool,
    pub success: bool,
    pub show_password: bool,
    /// Field key (or `submit`) to message
    pub errors: BTreeMap<String, String>,
    /// Echo of the non-secret inputs
    pub values: BTreeMap<String, String>,
    pub avatar_preview_url: Option<String>,
    pub redirect_pending: bool,
    /// Set once the redirect has fired
    pub redirect_to: Option<String>,
}

impl FormView {
    pub async fn of(form: &MountedForm) -> Self {
        let snapshot = form.session.snapshot().await;
        FormView {
            id: form.id,
            kind: snapshot.kind.as_str().to_string(),
            phase: snapshot.phase.as_str().to_string(),
            loading: snapshot.ui.loading,
            success: snapshot.ui.success,
            show_password: snapshot.ui.show_password,
            errors: snapshot.errors,
            values: snapshot.values,
            avatar_preview_url: snapshot.avatar_preview_url,
            redirect_pending: snapshot.redirect_pending,
            redirect_to: form.navigator.requested_route(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubmitResponse {
    /// False when validation failed and the errors are in `form`
    pub accepted: bool,
    pub form: FormView,
}

/// A change of one input
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EditEvent {
    /// Field key, e.g. `email`, `rememberMe`, `fullName`, `role`
    pub field: String,
    /// String for text inputs, boolean for `rememberMe`
    #[schema(value_type = Value)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BlurEvent {
    pub field: String,
}

pub fn router(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .with_state(state)
        .routes(routes!(mount_login))
        .routes(routes!(mount_signup))
        .routes(routes!(get_form, delete_form))
        .routes(routes!(edit_form))
        .routes(routes!(blur_form))
        .routes(routes!(toggle_password))
        .routes(routes!(upload_avatar))
        .routes(routes!(submit_form))
}

async fn find(state: &AppState, id: SessionId) -> Result<Arc<MountedForm>, ApiError> {
    state
        .sessions()
        .get(&id)
        .await
        .ok_or(ApiError::SessionNotFound(id))
}

async fn mount(state: &AppState, kind: FormKind) -> (StatusCode, Json<FormView>) {
    let form = state.mount(kind).await;
    (StatusCode::CREATED, Json(FormView::of(&form).await))
}

/// Mount a login form
#[utoipa::path(
    post,
    path = "/login",
    responses(
        (status = 201, description = "Login form mounted", body = FormView)
    ),
    tag = super::FORMS_TAG
)]
async fn mount_login(State(state): State<AppState>) -> (StatusCode, Json<FormView>) {
    mount(&state, FormKind::Login).await
}

/// Mount a signup form
#[utoipa::path(
    post,
    path = "/signup",
    responses(
        (status = 201, description = "Signup form mounted", body = FormView)
    ),
    tag = super::FORMS_TAG
)]
async fn mount_signup(State(state): State<AppState>) -> (StatusCode, Json<FormView>) {
    mount(&state, FormKind::Signup).await
}

/// Current state of a form
#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    responses(
        (status = 200, description = "Form state", body = FormView),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let form = find(&state, id).await?;
    Ok(Json(FormView::of(&form).await))
}

/// Unmount a form
///
/// Cancels a pending submission or redirect and releases the avatar preview.
#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    responses(
        (status = 204, description = "Form unmounted"),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions().remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Change one input
#[utoipa::path(
    post,
    path = "/{id}/edit",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    request_body = EditEvent,
    responses(
        (status = 200, description = "Edit applied", body = FormView),
        (status = 400, description = "Unknown field or wrong value type", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody),
        (status = 409, description = "Form already submitted", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<serde_json::Value>,
) -> Result<Json<FormView>, ApiError> {
    let form = find(&state, id).await?;
    form.session.edit(event).await?;
    Ok(Json(FormView::of(&form).await))
}

/// Leave an input, validating it when it is the email or password
#[utoipa::path(
    post,
    path = "/{id}/blur",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    request_body = BlurEvent,
    responses(
        (status = 200, description = "Blur applied", body = FormView),
        (status = 400, description = "Unknown field", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn blur_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<serde_json::Value>,
) -> Result<Json<FormView>, ApiError> {
    let form = find(&state, id).await?;
    form.session.blur(event).await?;
    Ok(Json(FormView::of(&form).await))
}

/// Show or hide the password
#[utoipa::path(
    post,
    path = "/{id}/toggle-password",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    responses(
        (status = 200, description = "Visibility flipped", body = FormView),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn toggle_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let form = find(&state, id).await?;
    form.session.toggle_password().await;
    Ok(Json(FormView::of(&form).await))
}

/// Pick an avatar (signup only)
///
/// Multipart body with an `avatar` file part. Files over 5MB are rejected and
/// reported in `errors.avatar`; the previously accepted avatar is kept.
#[utoipa::path(
    post,
    path = "/{id}/avatar",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    responses(
        (status = 200, description = "File processed, see errors.avatar", body = FormView),
        (status = 400, description = "Missing file or not a signup form", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<FormView>, ApiError> {
    let form = find(&state, id).await?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadEvent(e.body_text()))?
    {
        if field.name() == Some("avatar") {
            file = read_avatar(field)
                .await
                .map_err(|e| ApiError::BadEvent(e.body_text()))?;
        }
    }
    let file = file.ok_or_else(|| ApiError::BadEvent("Missing avatar file".to_string()))?;

    info!("Avatar {} ({} bytes) for session {id}", file.name, file.size());
    match form.session.select_avatar(file, state.portal()).await {
        // size errors are form errors, shown like any other
        Ok(()) | Err(FormEventError::InvalidFile(_)) => {}
        Err(other) => return Err(other.into()),
    }
    Ok(Json(FormView::of(&form).await))
}

/// Submit the form
///
/// Validates every field. When valid, the simulated call starts and the form
/// reports `loading` until it settles.
#[utoipa::path(
    post,
    path = "/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Form session id")
    ),
    responses(
        (status = 200, description = "Submission started or validation failed", body = SubmitResponse),
        (status = 404, description = "Unknown session", body = ErrorBody),
        (status = 409, description = "Already submitting or submitted", body = ErrorBody)
    ),
    tag = super::FORMS_TAG
)]
async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let form = find(&state, id).await?;
    let outcome = form.session.submit().await?;
    Ok(Json(SubmitResponse {
        accepted: outcome == SubmitOutcome::Submitting,
        form: FormView::of(&form).await,
    }))
}
