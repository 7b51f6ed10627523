use crate::db::models::{DbAccount, DbLink, DbProfile, DbSession};
use crate::db::schema::SQLITE_INIT;
use crate::error::LinkpageError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database behind `database_url` and apply the schema.
pub async fn connect(database_url: &str) -> Result<LinkStorage, LinkpageError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every pooled connection to `:memory:` would get its own empty database.
    let pool_opts = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    let pool = pool_opts.connect_with(connect_opts).await?;
    let storage = LinkStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

#[derive(Clone)]
pub struct LinkStorage {
    pool: SqlitePool,
}

impl LinkStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), LinkpageError> {
        // execute multiple statements one by one (sqlx::query runs a single statement)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() || s.lines().all(|l| l.trim_start().starts_with("--")) {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ---- accounts ----

    pub async fn insert_account(&self, account: &DbAccount) -> Result<(), LinkpageError> {
        sqlx::query(
            r#"INSERT INTO accounts (id, email, password_hash, created_at, last_sign_in_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.last_sign_in_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_account(&self, id: &str) -> Result<Option<DbAccount>, LinkpageError> {
        let account = sqlx::query_as::<_, DbAccount>(
            r#"SELECT id, email, password_hash, created_at, last_sign_in_at
               FROM accounts WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn get_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DbAccount>, LinkpageError> {
        let account = sqlx::query_as::<_, DbAccount>(
            r#"SELECT id, email, password_hash, created_at, last_sign_in_at
               FROM accounts WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn set_last_sign_in(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), LinkpageError> {
        sqlx::query("UPDATE accounts SET last_sign_in_at = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ---- sessions ----

    pub async fn insert_session(&self, session: &DbSession) -> Result<(), LinkpageError> {
        sqlx::query(
            r#"INSERT INTO sessions (token, account_id, created_at, expires_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&session.token)
        .bind(&session.account_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_session(&self, token: &str) -> Result<Option<DbSession>, LinkpageError> {
        let session = sqlx::query_as::<_, DbSession>(
            r#"SELECT token, account_id, created_at, expires_at
               FROM sessions WHERE token = ?"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), LinkpageError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove every session whose expiry is at or before `now`. Returns the number removed.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, LinkpageError> {
        let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    // ---- profiles ----

    pub async fn get_profile(&self, id: &str) -> Result<Option<DbProfile>, LinkpageError> {
        let profile =
            sqlx::query_as::<_, DbProfile>("SELECT id, username FROM profiles WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    pub async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DbProfile>, LinkpageError> {
        let profile =
            sqlx::query_as::<_, DbProfile>("SELECT id, username FROM profiles WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    /// Id of a profile other than `exclude_id` already holding `username`, if any.
    pub async fn find_username_owner(
        &self,
        username: &str,
        exclude_id: &str,
    ) -> Result<Option<String>, LinkpageError> {
        let rec: Option<(String,)> =
            sqlx::query_as("SELECT id FROM profiles WHERE username = ? AND id <> ?")
                .bind(username)
                .bind(exclude_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(rec.map(|r| r.0))
    }

    /// Upsert by primary key `id`.
    /// Uses SQLite `INSERT ... ON CONFLICT(id) DO UPDATE`.
    pub async fn upsert_profile(&self, id: &str, username: &str) -> Result<(), LinkpageError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, username) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET username = excluded.username
            "#,
        )
        .bind(id)
        .bind(username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ---- links ----

    /// All links owned by `user_id`, oldest first.
    pub async fn list_links(&self, user_id: &str) -> Result<Vec<DbLink>, LinkpageError> {
        let links = sqlx::query_as::<_, DbLink>(
            r#"SELECT id, user_id, title, url, created_at
               FROM links WHERE user_id = ?
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    /// Insert a link and return the stored row.
    pub async fn insert_link(
        &self,
        user_id: &str,
        title: &str,
        url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<DbLink, LinkpageError> {
        let link = sqlx::query_as::<_, DbLink>(
            r#"INSERT INTO links (user_id, title, url, created_at)
               VALUES (?, ?, ?, ?)
               RETURNING id, user_id, title, url, created_at"#,
        )
        .bind(user_id)
        .bind(title)
        .bind(url)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(link)
    }

    /// Delete link `id` only if it belongs to `user_id`. Returns rows removed (0 or 1).
    pub async fn delete_link(&self, id: i64, user_id: &str) -> Result<u64, LinkpageError> {
        let res = sqlx::query("DELETE FROM links WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
