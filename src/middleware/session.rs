use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::db::models::{DbAccount, DbSession};
use crate::error::LinkpageError;
use crate::router::LinkpageState;
use crate::service::SessionLookup;

pub const SESSION_COOKIE: &str = "linkpage_session";

/// What the visitor's session cookie resolves to.
///
/// A cookie that fails to decrypt is treated as absent.
#[derive(Debug, Clone)]
pub enum SessionGate {
    Anonymous,
    Invalid(String),
    Active {
        session: DbSession,
        account: DbAccount,
    },
}

impl SessionGate {
    pub fn account(&self) -> Option<&DbAccount> {
        match self {
            SessionGate::Active { account, .. } => Some(account),
            _ => None,
        }
    }
}

impl FromRequestParts<LinkpageState> for SessionGate {
    type Rejection = LinkpageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &LinkpageState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
            return Ok(SessionGate::Anonymous);
        };
        Ok(match state.accounts.resolve(&token).await? {
            SessionLookup::Active { session, account } => SessionGate::Active { session, account },
            SessionLookup::Invalid(reason) => SessionGate::Invalid(reason),
        })
    }
}

/// Extractor for endpoints that only make sense with a signed-in account.
#[derive(Debug, Clone)]
pub struct RequireAccount(pub DbAccount);

impl FromRequestParts<LinkpageState> for RequireAccount {
    type Rejection = LinkpageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &LinkpageState,
    ) -> Result<Self, Self::Rejection> {
        match SessionGate::from_request_parts(parts, state).await? {
            SessionGate::Active { account, .. } => Ok(Self(account)),
            SessionGate::Invalid(reason) => Err(LinkpageError::AuthFailure(reason)),
            SessionGate::Anonymous => Err(LinkpageError::Unauthenticated),
        }
    }
}

pub fn session_cookie(token: String, ttl_hours: i64, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(ttl_hours))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
