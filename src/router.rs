use axum::{
    Json, Router,
    extract::FromRef,
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::Key;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::config::Config;
use crate::db::LinkStorage;
use crate::error::LinkpageError;
use crate::handlers::{auth, dashboard, home, public_profile, settings};
use crate::service::{AccountService, LinkService, ProfileService};

/// Application state injected into every handler. Built once in `main`.
#[derive(Clone)]
pub struct LinkpageState {
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub links: LinkService,
    pub cookie_key: Key,
    pub insecure_cookie: bool,
    pub session_ttl_hours: i64,
}

impl LinkpageState {
    pub fn new(storage: LinkStorage, cfg: &Config, cookie_key: Key) -> Self {
        Self {
            accounts: AccountService::new(storage.clone(), &cfg.auth),
            profiles: ProfileService::new(storage.clone()),
            links: LinkService::new(storage),
            cookie_key,
            insecure_cookie: cfg.basic.insecure_cookie,
            session_ttl_hours: cfg.auth.session_ttl_hours,
        }
    }
}

impl FromRef<LinkpageState> for Key {
    fn from_ref(state: &LinkpageState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the cookie key from `basic.cookie_secret`, or a random one when unset.
pub fn cookie_key(cfg: &Config) -> Result<Key, LinkpageError> {
    match cfg.basic.cookie_secret.as_deref() {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| {
            LinkpageError::Config(format!("basic.cookie_secret: {e} (need at least 64 bytes)"))
        }),
        None => {
            warn!("basic.cookie_secret not set; sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

pub fn linkpage_router(state: LinkpageState) -> Router {
    Router::new()
        .route("/", get(home::home_view))
        .route("/health", get(health))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::dashboard_view))
        .route(
            "/settings",
            get(settings::settings_view).post(settings::update_profile),
        )
        .route("/links", get(home::list_links).post(home::add_link))
        .route("/links/{id}", delete(home::remove_link))
        .route("/links/{id}/delete", post(home::remove_link))
        .route("/{username}", get(public_profile::public_profile_view))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
