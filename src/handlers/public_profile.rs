use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::router::LinkpageState;
use crate::types::views::{NotFoundView, PublicProfileView};

/// GET /{username} -> read-only link listing. Ignores the caller's session.
///
/// Any failure renders the not-found view.
pub async fn public_profile_view(
    State(state): State<LinkpageState>,
    Path(username): Path<String>,
) -> Response {
    match state.profiles.public_profile(&username).await {
        Ok((profile, links)) => Json(PublicProfileView::new(profile, links)).into_response(),
        Err(e) => {
            debug!(%username, error = %e, "public profile unavailable");
            (StatusCode::NOT_FOUND, Json(NotFoundView::profile(&username))).into_response()
        }
    }
}
