use crate::db::models::{DbLink, DbProfile};
use crate::db::sqlite::LinkStorage;
use crate::error::LinkpageError;
use crate::service::validation::normalize_username;
use tracing::{info, warn};

/// Public profile lookup and the username editor.
#[derive(Clone)]
pub struct ProfileService {
    storage: LinkStorage,
}

impl ProfileService {
    pub fn new(storage: LinkStorage) -> Self {
        Self { storage }
    }

    /// Resolve `username` case-insensitively, then load that profile's links oldest first.
    ///
    /// Store failures during the lookup are reported as a missing profile.
    pub async fn public_profile(
        &self,
        username: &str,
    ) -> Result<(DbProfile, Vec<DbLink>), LinkpageError> {
        let username = username.to_lowercase();
        let profile = match self.storage.get_profile_by_username(&username).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(LinkpageError::ProfileNotFound),
            Err(e) => {
                warn!(%username, error = %e, "profile lookup failed");
                return Err(LinkpageError::ProfileNotFound);
            }
        };
        let links = self.storage.list_links(&profile.id).await?;
        Ok((profile, links))
    }

    pub async fn profile_of(&self, account_id: &str) -> Result<Option<DbProfile>, LinkpageError> {
        self.storage.get_profile(account_id).await
    }

    /// Validate, check that no other account holds the name, then upsert.
    /// Returns the stored (lowercase) username.
    pub async fn update_username(
        &self,
        account_id: &str,
        raw: &str,
    ) -> Result<String, LinkpageError> {
        let username = normalize_username(raw)?;

        if let Some(owner) = self
            .storage
            .find_username_owner(&username, account_id)
            .await?
        {
            info!(%username, %owner, "username already held by another account");
            return Err(LinkpageError::UsernameTaken);
        }

        self.storage
            .upsert_profile(account_id, &username)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    LinkpageError::UsernameTaken
                } else {
                    e
                }
            })?;
        info!(%account_id, %username, "profile username saved");
        Ok(username)
    }
}
