//! JSON view models, one per page.

use serde::{Deserialize, Serialize};

use crate::db::models::{DbAccount, DbLink, DbProfile, DbSession};
use crate::service::validation::USERNAME_HINT;

pub const LOGIN_URL: &str = "/login";
pub const SIGNUP_URL: &str = "/signup";
pub const SETTINGS_URL: &str = "/settings";
pub const HOME_URL: &str = "/";

pub fn public_path(username: &str) -> String {
    format!("/{username}")
}

// ---- public profile ----

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicLink {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub target: String,
    pub rel: String,
}

impl From<DbLink> for PublicLink {
    fn from(link: DbLink) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            target: "_blank".to_string(),
            rel: "noopener noreferrer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicProfileView {
    pub username: String,
    pub links: Vec<PublicLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl PublicProfileView {
    pub fn new(profile: DbProfile, links: Vec<DbLink>) -> Self {
        let empty_message = links
            .is_empty()
            .then(|| "No links shared yet.".to_string());
        Self {
            username: profile.username,
            links: links.into_iter().map(PublicLink::from).collect(),
            empty_message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotFoundView {
    pub error: String,
    pub message: String,
    pub home_url: String,
}

impl NotFoundView {
    pub fn profile(username: &str) -> Self {
        Self {
            error: "Profile Not Found".to_string(),
            message: format!("Sorry, we couldn't find a profile for @{username}"),
            home_url: HOME_URL.to_string(),
        }
    }
}

// ---- dashboard ----

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub welcome: String,
    pub debug: DashboardDebug,
}

#[derive(Debug, Serialize)]
pub struct DashboardDebug {
    pub user: DbAccount,
    pub session: DbSession,
}

#[derive(Debug, Serialize)]
pub struct AuthErrorView {
    pub error: String,
    pub login_url: String,
}

// ---- home ----

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HomeView {
    LoggedOut {
        login_url: String,
        signup_url: String,
    },
    LoggedIn {
        welcome: String,
        email: String,
        username: Option<String>,
        public_url: Option<String>,
        username_warning: Option<String>,
        settings_url: String,
        links: Vec<DbLink>,
    },
}

impl HomeView {
    pub fn logged_out() -> Self {
        HomeView::LoggedOut {
            login_url: LOGIN_URL.to_string(),
            signup_url: SIGNUP_URL.to_string(),
        }
    }

    pub fn logged_in(account: DbAccount, profile: Option<DbProfile>, links: Vec<DbLink>) -> Self {
        let username = profile.map(|p| p.username);
        HomeView::LoggedIn {
            welcome: username.clone().unwrap_or_else(|| account.email.clone()),
            email: account.email,
            public_url: username.as_deref().map(public_path),
            username_warning: username.is_none().then(|| "No username set".to_string()),
            username,
            settings_url: SETTINGS_URL.to_string(),
            links,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewLinkRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

// ---- settings ----

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub username: String,
    pub pattern: String,
    pub hint: String,
    pub home_url: String,
}

impl SettingsView {
    pub fn new(profile: Option<DbProfile>) -> Self {
        Self {
            username: profile.map(|p| p.username).unwrap_or_default(),
            pattern: "^[a-zA-Z0-9_]{3,15}$".to_string(),
            hint: USERNAME_HINT.to_string(),
            home_url: HOME_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileSaved {
    pub message: String,
    pub username: String,
    pub public_url: String,
}

// ---- login / signup ----

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthFormView {
    pub view: String,
    pub authenticated: bool,
    pub fields: Vec<String>,
    pub alternate_url: String,
}

impl AuthFormView {
    pub fn new(view: &str, authenticated: bool, alternate_url: &str) -> Self {
        Self {
            view: view.to_string(),
            authenticated,
            fields: vec!["email".to_string(), "password".to_string()],
            alternate_url: alternate_url.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedInView {
    pub user: DbAccount,
    pub redirect_to: String,
}
