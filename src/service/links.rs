use crate::db::models::DbLink;
use crate::db::sqlite::LinkStorage;
use crate::error::LinkpageError;
use crate::service::validation::validate_link;
use chrono::Utc;
use tracing::{debug, info};

/// The owner's link collection. Every operation is scoped to `owner_id`.
#[derive(Clone)]
pub struct LinkService {
    storage: LinkStorage,
}

impl LinkService {
    pub fn new(storage: LinkStorage) -> Self {
        Self { storage }
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<DbLink>, LinkpageError> {
        self.storage.list_links(owner_id).await
    }

    /// Validate before touching the store. No deduplication.
    pub async fn add(
        &self,
        owner_id: &str,
        title: &str,
        url: &str,
    ) -> Result<DbLink, LinkpageError> {
        let input = validate_link(title, url)?;
        let link = self
            .storage
            .insert_link(owner_id, &input.title, &input.url, Utc::now())
            .await?;
        info!(%owner_id, link_id = link.id, "link added");
        Ok(link)
    }

    /// Delete `link_id` if and only if `owner_id` owns it.
    pub async fn remove(&self, owner_id: &str, link_id: i64) -> Result<(), LinkpageError> {
        let removed = self.storage.delete_link(link_id, owner_id).await?;
        if removed == 0 {
            debug!(%owner_id, link_id, "delete matched no owned link");
            return Err(LinkpageError::LinkNotFound);
        }
        info!(%owner_id, link_id, "link removed");
        Ok(())
    }
}
