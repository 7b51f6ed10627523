use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::LinkpageError;
use crate::middleware::{ApiJson, RequireAccount, SessionGate};
use crate::router::LinkpageState;
use crate::types::views::{
    LOGIN_URL, ProfileSaved, SettingsView, UpdateProfileRequest, public_path,
};

/// GET /settings -> current username for the editor; signed-out visitors go to `/login`.
pub async fn settings_view(
    State(state): State<LinkpageState>,
    gate: SessionGate,
) -> Result<Response, LinkpageError> {
    let Some(account) = gate.account() else {
        return Ok(Redirect::to(LOGIN_URL).into_response());
    };
    let profile = state.profiles.profile_of(&account.id).await?;
    Ok(Json(SettingsView::new(profile)).into_response())
}

/// POST /settings
pub async fn update_profile(
    State(state): State<LinkpageState>,
    RequireAccount(account): RequireAccount,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileSaved>, LinkpageError> {
    let username = state
        .profiles
        .update_username(&account.id, &body.username)
        .await?;
    Ok(Json(ProfileSaved {
        message: "Profile updated successfully!".to_string(),
        public_url: public_path(&username),
        username,
    }))
}
