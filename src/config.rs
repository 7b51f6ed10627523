//! Runtime configuration.
//!
//! Sources, lowest priority first:
//! - built-in defaults
//! - `config.toml` in the working directory (optional)
//! - `LINKPAGE_*` environment variables, nested keys split on `__`
//!   (e.g. `LINKPAGE_BASIC__DATABASE_URL`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::LinkpageError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Master key for the private session cookie; at least 64 bytes.
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` cookie attribute (plain-HTTP local development).
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:linkpage.db".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24 * 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, LinkpageError> {
        Self::figment()
            .extract()
            .map_err(|e| LinkpageError::Config(e.to_string()))
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("LINKPAGE_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = Config::default();
        assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
        assert_eq!(cfg.auth.session_ttl_hours, 168);
        assert!(!cfg.basic.insecure_cookie);
        assert!(cfg.basic.cookie_secret.is_none());
    }

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LINKPAGE_BASIC__DATABASE_URL", "sqlite::memory:");
            jail.set_env("LINKPAGE_AUTH__BCRYPT_COST", "4");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.basic.database_url, "sqlite::memory:");
            assert_eq!(cfg.auth.bcrypt_cost, 4);
            assert_eq!(cfg.basic.loglevel, "info");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_merged_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [basic]
                listen_addr = "127.0.0.1:9000"
                insecure_cookie = true
                "#,
            )?;
            jail.set_env("LINKPAGE_BASIC__LISTEN_ADDR", "127.0.0.1:9100");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.basic.listen_addr, "127.0.0.1:9100");
            assert!(cfg.basic.insecure_cookie);
            Ok(())
        });
    }
}
