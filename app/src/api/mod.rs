use axum::{Router, extract::DefaultBodyLimit};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::services::{FORM_BODY_LIMIT, PortalHandle};

mod error;
mod forms;
mod landing;

pub use error::ApiError;

const CONTENT_TAG: &str = "content";
const FORMS_TAG: &str = "forms";

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
    ),
    components(
        schemas(
            forms::FormView,
            forms::SubmitResponse,
            forms::EditEvent,
            forms::BlurEvent,
            error::ErrorBody,
        )
    ),
    tags(
        (name = CONTENT_TAG, description = "Landing page and catalog content"),
        (name = FORMS_TAG, description = "Login and signup form sessions")
    )
)]
struct ApiDoc;

/// Get health of the API.
#[utoipa::path(
    method(get, head),
    path = "/api/health",
    responses(
        (status = OK, description = "Success", body = str, content_type = "text/plain")
    )
)]
async fn health() -> &'static str {
    "ok"
}

pub type AppState = PortalHandle;

pub fn create_api(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health))
        .nest("/api", landing::router(state.clone()))
        .nest("/api/forms", forms::router(state.clone()))
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/apidoc/openapi.json", api))
        .layer(DefaultBodyLimit::max(FORM_BODY_LIMIT))
        .with_state(state)
}
