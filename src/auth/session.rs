//! Session management for authentication

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::types::AdminUser;
use crate::error::Error;

/// Cookie carrying the bearer token for route guards
pub const TOKEN_COOKIE: &str = "adminToken";

/// Cookie carrying the encoded user record
pub const USER_COOKIE: &str = "adminUser";

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token
    pub token: String,

    /// The signed in user
    pub user: AdminUser,

    /// When the session was established
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    pub fn new(token: impl Into<String>, user: AdminUser) -> Self {
        Self {
            token: token.into(),
            user,
            created_at: Utc::now(),
        }
    }

    /// Name shown in the admin chrome
    pub fn display_name(&self) -> &str {
        self.user
            .username
            .as_deref()
            .or(self.user.name.as_deref())
            .unwrap_or(&self.user.email)
    }
}

/// Storage backend for the current session.
///
/// Implementations are internally synchronized so one store can be shared by
/// every client built from the same entry point.
pub trait SessionStore: Send + Sync {
    /// Read the current session, if any
    fn load(&self) -> Option<Session>;

    /// Replace the current session
    fn save(&self, session: &Session) -> Result<(), Error>;

    /// Forget the current session
    fn clear(&self) -> Result<(), Error>;

    /// The bearer token of the current session
    fn token(&self) -> Option<String> {
        self.load().map(|session| session.token)
    }

    /// Whether a session is present
    fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }
}

/// Shared handle to a session store
pub type SharedSessionStore = Arc<dyn SessionStore>;

/// Session store kept in process memory
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, session: &Session) -> Result<(), Error> {
        let mut current = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut current = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = None;
        Ok(())
    }
}

/// Session store persisted as a JSON file, surviving restarts
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cached: Mutex<Option<Session>>,
}

impl FileSessionStore {
    /// Open the store at `path`, reading any session already persisted there.
    ///
    /// An unreadable or corrupt file is treated as "no session".
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Session>(&contents) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            cached: Mutex::new(cached),
        }
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, session: &Session) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(session)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(Error::storage)?;
            }
        }
        fs::write(&self.path, json).map_err(Error::storage)?;

        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = Some(session.clone());
        debug!("Persisted session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = None;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(e)),
        }
    }
}

/// One cookie of the short-lived auth mirror consumed by route guards
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCookie {
    /// Cookie name
    pub name: String,

    /// Cookie value, empty when clearing
    pub value: String,

    /// Lifetime; `None` marks an expired (clearing) cookie
    pub max_age: Option<Duration>,

    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

impl AuthCookie {
    /// Cookies mirroring `session`, valid for `max_age`
    pub fn for_session(session: &Session, max_age: Duration) -> Result<Vec<AuthCookie>, Error> {
        let expires_at = Utc::now()
            + ChronoDuration::from_std(max_age).map_err(Error::invalid_input)?;
        let user_json = serde_json::to_vec(&session.user)?;

        Ok(vec![
            AuthCookie {
                name: TOKEN_COOKIE.to_string(),
                value: session.token.clone(),
                max_age: Some(max_age),
                expires_at,
            },
            AuthCookie {
                name: USER_COOKIE.to_string(),
                value: URL_SAFE_NO_PAD.encode(user_json),
                max_age: Some(max_age),
                expires_at,
            },
        ])
    }

    /// Cookies that overwrite and expire the auth mirror
    pub fn cleared() -> Vec<AuthCookie> {
        [TOKEN_COOKIE, USER_COOKIE]
            .iter()
            .map(|name| AuthCookie {
                name: name.to_string(),
                value: String::new(),
                max_age: None,
                expires_at: DateTime::<Utc>::MIN_UTC,
            })
            .collect()
    }

    /// Whether the cookie is still live at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && now < self.expires_at
    }

    /// Render as a `Set-Cookie` header value
    pub fn to_header_value(&self) -> String {
        match self.max_age {
            Some(max_age) => format!(
                "{}={}; path=/; max-age={}",
                self.name,
                self.value,
                max_age.as_secs()
            ),
            None => format!(
                "{}=; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT",
                self.name
            ),
        }
    }

    /// Decode the user record carried by an `adminUser` cookie value
    pub fn decode_user(value: &str) -> Result<AdminUser, Error> {
        let bytes = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| Error::invalid_input(format!("malformed user cookie: {}", e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Find a cookie by name in a `Cookie` request header
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
