pub mod handlers;
pub mod templates;

#[cfg(test)]
mod tests;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use domain::avatar::PREVIEW_ROUTE_PREFIX;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::services::{FORM_BODY_LIMIT, PortalHandle};
use handlers::{avatar_preview, landing, login_page, login_submit, signup_page, signup_submit};

// App state type
pub type AppState = PortalHandle;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Static file serving
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        // Pages
        .route("/", get(landing))
        .route("/login", get(login_page).post(login_submit))
        .route("/signup", get(signup_page).post(signup_submit))
        .route(&format!("{PREVIEW_ROUTE_PREFIX}/{{id}}"), get(avatar_preview))
        .layer(DefaultBodyLimit::max(FORM_BODY_LIMIT))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add state
        .with_state(state)
}
