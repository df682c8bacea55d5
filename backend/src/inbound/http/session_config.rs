//! Cookie-session settings derived from [`crate::config::AppSettings`].

use actix_web::cookie::{Key, SameSite};
use std::path::{Path, PathBuf};
use tracing::warn;
use zeroize::Zeroize;

/// Key file length required outside debug builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this length.
const KEY_DERIVE_MIN_LEN: usize = 32;
const COOKIE_SECURE_SETTING: &str = "session_cookie_secure";
const SAME_SITE_SETTING: &str = "session_same_site";
const ALLOW_EPHEMERAL_SETTING: &str = "session_allow_ephemeral";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Strictness applied to the toggles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles fall back to defaults with a warning.
    Debug,
    /// Every toggle must be set and valid.
    Release,
}

impl BuildMode {
    /// `Debug` when compiled with debug assertions.
    ///
    /// ```rust
    /// use fanclub::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

/// Session toggles exactly as configured, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: PathBuf,
    pub cookie_secure: Option<String>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<String>,
}

/// Validated inputs for `SessionMiddleware`.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set in release builds")]
    MissingSetting { name: &'static str },
    #[error("{name}={value:?} is invalid; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} holds {length} bytes; at least {min_len} required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
    #[error("session_allow_ephemeral is not permitted in release builds")]
    EphemeralNotAllowed,
}

/// Turn raw toggles into cookie settings.
///
/// Release builds need every toggle set explicitly and a key file of at least
/// [`SESSION_KEY_MIN_LEN`] bytes. Debug builds fill gaps with warnings and
/// fall back to a generated key.
///
/// # Examples
///
/// ```rust
/// use fanclub::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("fanclub_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: key_path.clone(),
///     cookie_secure: Some("true".to_owned()),
///     same_site: Some("Strict".to_owned()),
///     allow_ephemeral: Some("false".to_owned()),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = match toggles.cookie_secure.as_deref() {
        Some(raw) => parse_flag(mode, COOKIE_SECURE_SETTING, raw, true)?,
        None => required(mode, COOKIE_SECURE_SETTING, None, true)?,
    };

    let requested = match toggles.same_site.as_deref() {
        Some(raw) => parse_same_site(mode, raw)?,
        None => required(mode, SAME_SITE_SETTING, None, SameSite::Lax)?,
    };
    let same_site = check_same_site_none(mode, requested, cookie_secure)?;

    let allow_ephemeral = match toggles.allow_ephemeral.as_deref() {
        Some(raw) => parse_flag(mode, ALLOW_EPHEMERAL_SETTING, raw, false)?,
        None => false,
    };
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = load_key(&toggles.key_file, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// `value`, or `debug_default` with a warning in debug builds.
fn required<T>(
    mode: BuildMode,
    name: &'static str,
    value: Option<T>,
    debug_default: T,
) -> Result<T, SessionConfigError> {
    match value {
        Some(value) => Ok(value),
        None if mode.is_debug() => {
            warn!(setting = name, "session setting missing; using debug default");
            Ok(debug_default)
        }
        None => Err(SessionConfigError::MissingSetting { name }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_flag(
    mode: BuildMode,
    name: &'static str,
    raw: &str,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    match parse_bool(raw) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(setting = name, value = raw, "unrecognised flag; using debug default");
            Ok(debug_default)
        }
        None => Err(SessionConfigError::InvalidSetting {
            name,
            value: raw.to_owned(),
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_same_site(mode: BuildMode, raw: &str) -> Result<SameSite, SessionConfigError> {
    let parsed = match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    };
    match parsed {
        Some(same_site) => Ok(same_site),
        None if mode.is_debug() => {
            warn!(value = raw, "unrecognised session_same_site; using Lax");
            Ok(SameSite::Lax)
        }
        None => Err(SessionConfigError::InvalidSetting {
            name: SAME_SITE_SETTING,
            value: raw.to_owned(),
            expected: SAME_SITE_EXPECTED,
        }),
    }
}

/// Browsers drop `SameSite=None` cookies that are not `Secure`.
fn check_same_site_none(
    mode: BuildMode,
    same_site: SameSite,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    if same_site != SameSite::None || cookie_secure {
        return Ok(same_site);
    }
    if mode.is_debug() {
        warn!("session_same_site=None without Secure cookies will be dropped by browsers");
        Ok(same_site)
    } else {
        Err(SessionConfigError::InsecureSameSiteNone)
    }
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    let mut bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "session key unreadable; generating an ephemeral key");
            return Ok(Key::generate());
        }
        Err(source) => {
            return Err(SessionConfigError::KeyRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let min_len = if mode.is_debug() {
        KEY_DERIVE_MIN_LEN
    } else {
        SESSION_KEY_MIN_LEN
    };
    let length = bytes.len();
    let key = (length >= min_len).then(|| Key::derive_from(&bytes));
    bytes.zeroize();
    key.ok_or_else(|| SessionConfigError::KeyTooShort {
        path: path.to_path_buf(),
        length,
        min_len,
    })
}
