use axum::{Json, extract::Query, extract::State};
use domain::catalog::{Catalog, catalog};
use domain::landing::{LandingPage, Viewer};
use domain::signup::Role;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ViewerQuery {
    /// Role of the signed-in viewer, if any
    pub role: Option<Role>,
}

impl From<ViewerQuery> for Viewer {
    fn from(query: ViewerQuery) -> Self {
        query.role.map_or(Viewer::Anonymous, Viewer::Authenticated)
    }
}

pub fn router(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .with_state(state)
        .routes(routes!(get_landing))
        .routes(routes!(get_catalog))
}

/// Landing page content
///
/// Hero, analytics, features and footer. The "Post a Job" route depends on the viewer.
#[utoipa::path(
    get,
    path = "/landing",
    params(ViewerQuery),
    responses(
        (status = 200, description = "Landing page content", body = LandingPage)
    ),
    tag = super::CONTENT_TAG
)]
async fn get_landing(
    State(state): State<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Json<LandingPage> {
    Json(state.portal().landing(query.into()))
}

/// Job categories, job types, salary ranges and the employer menu
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Catalog", body = Catalog)
    ),
    tag = super::CONTENT_TAG
)]
async fn get_catalog() -> Json<Catalog> {
    Json(catalog())
}
