use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::LinkpageError;
use crate::db::models::DbLink;
use crate::middleware::{ApiJson, ApiPath, RequireAccount, SessionGate};
use crate::router::LinkpageState;
use crate::types::views::{HomeView, NewLinkRequest};

/// GET / -> the link editor, or the logged-out actions.
///
/// Account, profile and links are loaded one after another.
pub async fn home_view(
    State(state): State<LinkpageState>,
    gate: SessionGate,
) -> Result<Json<HomeView>, LinkpageError> {
    let SessionGate::Active { account, .. } = gate else {
        return Ok(Json(HomeView::logged_out()));
    };
    let profile = state.profiles.profile_of(&account.id).await?;
    let links = state.links.list(&account.id).await?;
    Ok(Json(HomeView::logged_in(account, profile, links)))
}

/// GET /links
pub async fn list_links(
    State(state): State<LinkpageState>,
    RequireAccount(account): RequireAccount,
) -> Result<Json<Vec<DbLink>>, LinkpageError> {
    Ok(Json(state.links.list(&account.id).await?))
}

/// POST /links
pub async fn add_link(
    State(state): State<LinkpageState>,
    RequireAccount(account): RequireAccount,
    ApiJson(body): ApiJson<NewLinkRequest>,
) -> Result<(StatusCode, Json<DbLink>), LinkpageError> {
    let link = state.links.add(&account.id, &body.title, &body.url).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /links/{id}, POST /links/{id}/delete
pub async fn remove_link(
    State(state): State<LinkpageState>,
    RequireAccount(account): RequireAccount,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, LinkpageError> {
    state.links.remove(&account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
