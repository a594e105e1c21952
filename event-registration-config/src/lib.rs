use core::fmt::{Debug, Display};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "events.toml";
pub const ENV_PREFIX: &str = "EVENTS_";

const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_SECRET_KEY: &str = "event-registration-development-secret";

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub database_url: String,
    /// Shared password that grants the admin role on login.
    pub admin_password: String,
    /// Master secret the session cookie key is derived from.
    pub secret_key: String,
    /// Only send the session cookie over https.
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000)),
            database_url: "events.db".to_owned(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_owned(),
            secret_key: DEFAULT_SECRET_KEY.to_owned(),
            secure_cookies: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_address", &self.listen_address)
            .field("database_url", &self.database_url)
            .field("admin_password", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl Config {
    /// Names of the settings that still carry their built-in development value.
    #[must_use]
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut insecure = Vec::new();
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            insecure.push("admin_password");
        }
        if self.secret_key == DEFAULT_SECRET_KEY {
            insecure.push("secret_key");
        }
        insecure
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?)
}
