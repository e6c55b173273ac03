//! Session configuration and the load state machine.
//!
//! A session moves `Loading → { Unauthorized, Failed, Ready }` exactly once. Both
//! failure states are terminal and `Ready` never goes back to `Loading`; everything
//! after that is local selection work on the [`GridSet`].

use std::fmt;
use std::sync::Arc;

use api::SessionHeaders;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::grid::GridSet;

/// Why a session did not reach `Ready`. Decided once, at the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("credential missing or rejected")]
    Unauthorized,
    #[error("{0}")]
    Failed(String),
}

/// Validated inputs of a session. Never compiled in; always supplied by the host.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub token: String,
    pub city_id: String,
    pub category_id: String,
    pub documents_url: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("token", &"<redacted>")
            .field("city_id", &self.city_id)
            .field("category_id", &self.category_id)
            .field("documents_url", &self.documents_url)
            .finish()
    }
}

impl SessionConfig {
    /// A missing credential is an authorization failure; any other missing value is a
    /// plain failure.
    pub fn from_headers(headers: SessionHeaders) -> Result<Self, LoadError> {
        let token = headers
            .authorization
            .as_deref()
            .and_then(bearer_token)
            .ok_or(LoadError::Unauthorized)?;

        Ok(Self {
            token,
            city_id: required(headers.city_id, "city id")?,
            category_id: required(headers.category_id, "category id")?,
            documents_url: required(headers.documents_url, "documents url")?
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Strip an optional `Bearer ` scheme; blank values count as missing.
fn bearer_token(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };
    (!token.is_empty()).then(|| token.to_string())
}

fn required(value: Option<String>, what: &str) -> Result<String, LoadError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LoadError::Failed(format!("missing {what}")))
}

/// Environment variables read by native builds.
pub const TOKEN_ENV: &str = "DRAWGRID_TOKEN";
pub const CITY_ENV: &str = "DRAWGRID_CITY_ID";
pub const CATEGORY_ENV: &str = "DRAWGRID_CATEGORY_ID";

#[cfg(not(target_arch = "wasm32"))]
fn host_headers_from_env() -> SessionHeaders {
    let var = |name: &str| std::env::var(name).ok();
    SessionHeaders {
        authorization: var(TOKEN_ENV),
        city_id: var(CITY_ENV),
        category_id: var(CATEGORY_ENV),
        documents_url: var(api::DOCUMENTS_URL_ENV),
    }
}

/// Resolve the session inputs from the host: request headers on the web, the
/// process environment on native targets.
pub async fn resolve_config() -> Result<SessionConfig, LoadError> {
    #[cfg(target_arch = "wasm32")]
    let headers = api::session_headers()
        .await
        .map_err(|err| LoadError::Failed(format!("session headers unavailable: {err}")))?;

    #[cfg(not(target_arch = "wasm32"))]
    let headers = host_headers_from_env();

    SessionConfig::from_headers(headers)
}

/// The instant a session is anchored to. Captured once; axes never move after that.
pub fn session_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Unauthorized,
    Failed(String),
    Ready(Arc<GridSet>),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Loading)
    }

    /// Apply the single load outcome. Ignored (returns `false`) once resolved.
    pub fn resolve(&mut self, outcome: Result<GridSet, LoadError>) -> bool {
        if self.is_terminal() {
            warn!("session already resolved; ignoring late load outcome");
            return false;
        }

        *self = match outcome {
            Ok(grids) => {
                info!(heads = grids.categories().len(), "session ready");
                SessionState::Ready(Arc::new(grids))
            }
            Err(LoadError::Unauthorized) => {
                warn!("session unauthorized");
                SessionState::Unauthorized
            }
            Err(LoadError::Failed(reason)) => {
                warn!(%reason, "session failed");
                SessionState::Failed(reason)
            }
        };
        true
    }
}
