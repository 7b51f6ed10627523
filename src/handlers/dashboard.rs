use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

use crate::LinkpageError;
use crate::middleware::SessionGate;
use crate::types::views::{AuthErrorView, DashboardDebug, DashboardView, LOGIN_URL};

/// GET /dashboard -> diagnostic dump of the current session and account.
///
/// No cookie redirects to `/login`. A rejected cookie, or a failure while
/// resolving it, is reported verbatim with a manual way back instead of redirecting.
pub async fn dashboard_view(gate: Result<SessionGate, LinkpageError>) -> Response {
    let gate = match gate {
        Ok(gate) => gate,
        Err(e) => {
            error!(error = %e, "dashboard session lookup failed");
            return auth_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };
    match gate {
        SessionGate::Anonymous => {
            debug!("no session found, redirecting to login");
            Redirect::to(LOGIN_URL).into_response()
        }
        SessionGate::Invalid(reason) => {
            debug!(%reason, "dashboard auth error");
            auth_error(StatusCode::UNAUTHORIZED, reason)
        }
        SessionGate::Active { session, account } => {
            debug!(account_id = %account.id, expires_at = %session.expires_at, "current session");
            Json(DashboardView {
                welcome: account.email.clone(),
                debug: DashboardDebug {
                    user: account,
                    session,
                },
            })
            .into_response()
        }
    }
}

fn auth_error(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(AuthErrorView {
            error,
            login_url: LOGIN_URL.to_string(),
        }),
    )
        .into_response()
}
