use crate::middleware::ApiJson;
use crate::middleware::session::{SessionGate, clear_session_cookie, session_cookie};
use crate::router::LinkpageState;
use crate::types::views::{
    AuthFormView, CredentialsRequest, HOME_URL, HomeView, LOGIN_URL, SIGNUP_URL, SignedInView,
};
use crate::LinkpageError;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::info;

/// GET /login
pub async fn login_form(gate: SessionGate) -> Json<AuthFormView> {
    Json(AuthFormView::new(
        "login",
        gate.account().is_some(),
        SIGNUP_URL,
    ))
}

/// GET /signup
pub async fn signup_form(gate: SessionGate) -> Json<AuthFormView> {
    Json(AuthFormView::new(
        "signup",
        gate.account().is_some(),
        LOGIN_URL,
    ))
}

/// POST /signup -> creates the account and signs it in.
pub async fn signup(
    State(state): State<LinkpageState>,
    jar: PrivateCookieJar,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> Result<Response, LinkpageError> {
    let (account, session) = state.accounts.sign_up(&body.email, &body.password).await?;
    let jar = jar.add(session_cookie(
        session.token,
        state.session_ttl_hours,
        state.insecure_cookie,
    ));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SignedInView {
            user: account,
            redirect_to: HOME_URL.to_string(),
        }),
    )
        .into_response())
}

/// POST /login
pub async fn login(
    State(state): State<LinkpageState>,
    jar: PrivateCookieJar,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> Result<Response, LinkpageError> {
    let (account, session) = state.accounts.sign_in(&body.email, &body.password).await?;
    let jar = jar.add(session_cookie(
        session.token,
        state.session_ttl_hours,
        state.insecure_cookie,
    ));
    Ok((
        jar,
        Json(SignedInView {
            user: account,
            redirect_to: HOME_URL.to_string(),
        }),
    )
        .into_response())
}

/// POST /logout -> drops the session row and the cookie; safe to call signed out.
pub async fn logout(
    State(state): State<LinkpageState>,
    gate: SessionGate,
    jar: PrivateCookieJar,
) -> Result<Response, LinkpageError> {
    if let SessionGate::Active { session, account } = &gate {
        state.accounts.sign_out(&session.token).await?;
        info!(account_id = %account.id, "signed out");
    }
    let jar = jar.remove(clear_session_cookie());
    Ok((jar, Json(HomeView::logged_out())).into_response())
}
