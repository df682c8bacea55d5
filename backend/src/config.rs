//! Service configuration loaded via OrthoConfig.
//!
//! Every field can be set as a CLI flag, a `FANCLUB_*` environment variable
//! or a configuration file key. Unset fields fall back to the defaults below.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::SessionToggles;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Invalid configuration values detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_host must be an IP address, got {value}")]
    InvalidBindHost { value: String },
    #[error("db_max_connections must be at least 1")]
    NoConnections,
}

/// Runtime settings for the fan-club service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FANCLUB")]
pub struct AppSettings {
    /// Interface to listen on.
    pub bind_host: Option<String>,
    /// TCP port to listen on.
    pub bind_port: Option<u16>,
    /// PostgreSQL URL. Without it the service keeps state in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure` (`true`/`false`, `yes`/`no`, `1`/`0`).
    ///
    /// Kept as text so an absent CLI flag stays unset instead of reading as
    /// `false` over the environment and file layers.
    pub session_cookie_secure: Option<String>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Allow a generated key when the key file is missing. Parsed like
    /// `session_cookie_secure`.
    pub session_allow_ephemeral: Option<String>,
}

impl AppSettings {
    /// Socket address assembled from `bind_host` and `bind_port`.
    ///
    /// # Examples
    /// ```
    /// use fanclub::config::AppSettings;
    ///
    /// let settings = AppSettings {
    ///     bind_host: Some("127.0.0.1".into()),
    ///     ..AppSettings::default()
    /// };
    /// assert_eq!(settings.bind_addr().map(|addr| addr.port()), Ok(8080));
    /// ```
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST);
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidBindHost {
                value: host.to_owned(),
            })?;
        Ok(SocketAddr::new(
            ip,
            self.bind_port.unwrap_or(DEFAULT_BIND_PORT),
        ))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::NoConnections),
            max => Ok(max),
        }
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Session toggles handed to
    /// [`session_settings`](crate::inbound::http::session_config::session_settings).
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}
