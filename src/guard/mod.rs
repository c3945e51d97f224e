//! Route gating for the admin area
//!
//! The guard only decides where a caller should go. The API enforces
//! authorization on its own, so a bypassed guard exposes screens, not data.

use log::{debug, info};
use reqwest::header::{HeaderMap, AUTHORIZATION, COOKIE};

use crate::auth::{cookie_value, AuthCookie, SharedSessionStore, TOKEN_COOKIE};
use crate::error::Error;

/// Where unauthenticated admin visits are sent
pub const LOGIN_PATH: &str = "/login";

/// Where signed in visits to the login page are sent
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Prefix of every protected path
pub const ADMIN_PREFIX: &str = "/admin";

/// Decision for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render the requested path
    Allow,
    /// Go to this path instead
    Redirect(String),
}

impl Navigation {
    fn redirect(path: &str) -> Self {
        Navigation::Redirect(path.to_string())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Navigation::Allow)
    }
}

/// Result of signing out through the guard
#[derive(Debug, Clone)]
pub struct LogoutOutcome {
    /// Cookies that expire the auth mirror
    pub cookies: Vec<AuthCookie>,

    /// Always a redirect to the login page
    pub navigation: Navigation,
}

/// Whether `path` is inside the admin area
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .map(|rest| rest.starts_with('/') || rest.starts_with('?'))
            .unwrap_or(false)
}

fn route(path: &str, authenticated: bool) -> Navigation {
    if is_admin_path(path) && !authenticated {
        return Navigation::redirect(LOGIN_PATH);
    }
    if path == LOGIN_PATH && authenticated {
        return Navigation::redirect(DASHBOARD_PATH);
    }
    Navigation::Allow
}

/// Gate for admin screens backed by the session store
#[derive(Clone)]
pub struct SessionGuard {
    store: SharedSessionStore,
}

impl SessionGuard {
    pub fn new(store: SharedSessionStore) -> Self {
        Self { store }
    }

    /// Decide a client-side navigation to `path` from the stored session
    pub fn enter(&self, path: &str) -> Navigation {
        let navigation = route(path, self.store.is_authenticated());
        if let Navigation::Redirect(target) = &navigation {
            debug!("Redirecting {} to {}", path, target);
        }
        navigation
    }

    /// Decide an incoming request to `path` from its cookie or bearer token.
    ///
    /// Server component requests (`RSC: 1`) always pass.
    pub fn check_request(path: &str, headers: &HeaderMap) -> Navigation {
        if headers
            .get("rsc")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "1")
            .unwrap_or(false)
        {
            return Navigation::Allow;
        }

        let from_cookie = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|header| cookie_value(header, TOKEN_COOKIE).is_some());
        let from_header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split_whitespace().nth(1))
            .is_some();

        route(path, from_cookie || from_header)
    }

    /// Clear the session and expire the cookie mirror, then send the user to login
    pub fn logout(&self) -> Result<LogoutOutcome, Error> {
        if let Some(session) = self.store.load() {
            info!("Signing out {}", session.display_name());
        }
        self.store.clear()?;
        Ok(LogoutOutcome {
            cookies: AuthCookie::cleared(),
            navigation: Navigation::redirect(LOGIN_PATH),
        })
    }
}
