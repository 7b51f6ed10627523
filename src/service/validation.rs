use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::error::LinkpageError;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]{3,15}$").expect("username pattern is a valid regex")
});

pub const USERNAME_HINT: &str = "3-15 characters, letters, numbers, and underscores only";

/// Path segments served by fixed routes; a profile under one of these names
/// could never be reached at `/{username}`.
pub const RESERVED_USERNAMES: &[&str] = &[
    "login",
    "signup",
    "logout",
    "settings",
    "dashboard",
    "links",
    "health",
];

pub const MIN_PASSWORD_LEN: usize = 6;

/// Check the username format and return it case-folded.
pub fn normalize_username(raw: &str) -> Result<String, LinkpageError> {
    if !USERNAME_RE.is_match(raw) {
        return Err(LinkpageError::InvalidInput(format!(
            "Username must be {USERNAME_HINT}"
        )));
    }
    let username = raw.to_lowercase();
    if RESERVED_USERNAMES.contains(&username.as_str()) {
        return Err(LinkpageError::InvalidInput(format!(
            "Username '{username}' is reserved"
        )));
    }
    Ok(username)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
}

/// Require a non-blank title and an absolute http(s) URL.
pub fn validate_link(title: &str, url: &str) -> Result<LinkInput, LinkpageError> {
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() {
        return Err(LinkpageError::InvalidInput("Title is required".to_string()));
    }
    if url.is_empty() {
        return Err(LinkpageError::InvalidInput("URL is required".to_string()));
    }
    let parsed = Url::parse(url)
        .map_err(|e| LinkpageError::InvalidInput(format!("Invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LinkpageError::InvalidInput(
            "URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(LinkInput {
        title: title.to_string(),
        url: url.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up rules: one `@` with text on both sides, password of at least six characters.
pub fn validate_signup(email: &str, password: &str) -> Result<Credentials, LinkpageError> {
    let email = normalize_email(email);
    let well_formed = matches!(
        email.split_once('@'),
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    );
    if !well_formed {
        return Err(LinkpageError::InvalidInput(
            "Unable to validate email address: invalid format".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LinkpageError::InvalidInput(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(Credentials {
        email,
        password: password.to_string(),
    })
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
