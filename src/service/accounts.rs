use crate::config::AuthConfig;
use crate::db::models::{DbAccount, DbSession};
use crate::db::sqlite::LinkStorage;
use crate::error::LinkpageError;
use crate::service::validation::{normalize_email, validate_signup};
use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of resolving a session token presented by a visitor.
#[derive(Debug, Clone)]
pub enum SessionLookup {
    Active {
        session: DbSession,
        account: DbAccount,
    },
    /// A token was presented but does not grant access; carries the reason.
    Invalid(String),
}

/// Sign-up, sign-in, sign-out and session resolution.
#[derive(Clone)]
pub struct AccountService {
    storage: LinkStorage,
    session_ttl: Duration,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl AccountService {
    pub fn new(storage: LinkStorage, cfg: &AuthConfig) -> Self {
        Self {
            storage,
            session_ttl: Duration::hours(cfg.session_ttl_hours),
            bcrypt_cost: cfg.bcrypt_cost,
            dummy_hash: dummy_hash(cfg.bcrypt_cost),
        }
    }

    /// Register a new account and open its first session.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(DbAccount, DbSession), LinkpageError> {
        let creds = validate_signup(email, password)?;
        if self
            .storage
            .get_account_by_email(&creds.email)
            .await?
            .is_some()
        {
            return Err(LinkpageError::EmailTaken);
        }

        let password_hash = hash_password(creds.password, self.bcrypt_cost).await?;
        let now = Utc::now();
        let account = DbAccount {
            id: Uuid::new_v4().to_string(),
            email: creds.email,
            password_hash,
            created_at: now,
            last_sign_in_at: Some(now),
        };
        self.storage
            .insert_account(&account)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    LinkpageError::EmailTaken
                } else {
                    e
                }
            })?;
        info!(account_id = %account.id, "account created");

        let session = self.open_session(&account.id).await?;
        Ok((account, session))
    }

    /// Verify email and password. Unknown email and wrong password fail the same way.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(DbAccount, DbSession), LinkpageError> {
        let email = normalize_email(email);
        let Some(mut account) = self.storage.get_account_by_email(&email).await? else {
            debug!("sign-in for unknown email");
            // Unknown emails pay the same bcrypt cost as known ones.
            verify_password(password.to_string(), self.dummy_hash.clone()).await?;
            return Err(LinkpageError::InvalidCredentials);
        };

        if !verify_password(password.to_string(), account.password_hash.clone()).await? {
            debug!(account_id = %account.id, "sign-in with wrong password");
            return Err(LinkpageError::InvalidCredentials);
        }

        let now = Utc::now();
        self.storage.set_last_sign_in(&account.id, now).await?;
        account.last_sign_in_at = Some(now);

        let session = self.open_session(&account.id).await?;
        info!(account_id = %account.id, "signed in");
        Ok((account, session))
    }

    /// Invalidate the session behind `token`. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<(), LinkpageError> {
        self.storage.delete_session(token).await
    }

    /// Resolve a presented token to its session and account.
    pub async fn resolve(&self, token: &str) -> Result<SessionLookup, LinkpageError> {
        let Some(session) = self.storage.get_session(token).await? else {
            return Ok(SessionLookup::Invalid("Invalid session".to_string()));
        };
        if session.is_expired(Utc::now()) {
            self.storage.delete_session(token).await?;
            return Ok(SessionLookup::Invalid("Session expired".to_string()));
        }
        let Some(account) = self.storage.get_account(&session.account_id).await? else {
            return Ok(SessionLookup::Invalid("User not found".to_string()));
        };
        Ok(SessionLookup::Active { session, account })
    }

    pub async fn purge_expired(&self) -> Result<u64, LinkpageError> {
        self.storage.purge_expired_sessions(Utc::now()).await
    }

    async fn open_session(&self, account_id: &str) -> Result<DbSession, LinkpageError> {
        let now = Utc::now();
        let session = DbSession {
            token: generate_session_token(),
            account_id: account_id.to_string(),
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.storage.insert_session(&session).await?;
        Ok(session)
    }
}

/// A well-formed bcrypt hash at `cost` that no password is expected to match.
fn dummy_hash(cost: u32) -> String {
    format!("$2b${cost:02}$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW")
}

fn generate_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

async fn hash_password(password: String, cost: u32) -> Result<String, LinkpageError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, LinkpageError> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(ok)
}
