//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every domain base address is resolved exactly once, here, and handed to
//! the domain clients at construction. A shared `BOOKVAULT_API_URL` gateway
//! address supplies the default for every domain; each domain can be pointed
//! elsewhere with its own `BOOKVAULT_<DOMAIN>_URL` variable, which replaces
//! the whole base address including the versioned prefix.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const TOKEN_DIR_NAME: &str = "bookvault";
const TOKEN_FILE_NAME: &str = "token";

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL in {var}: {value}")]
    InvalidUrl { var: String, value: String },

    #[error("invalid number in {var}: {value}")]
    InvalidNumber { var: String, value: String },

    #[error("invalid boolean in {var}: {value}")]
    InvalidBool { var: String, value: String },
}

// =============================================================================
// DOMAINS
// =============================================================================

/// An independently addressed backend service area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Identity,
    Catalog,
    Borrowing,
    Search,
    Admin,
    Notification,
    Media,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Identity,
        Domain::Catalog,
        Domain::Borrowing,
        Domain::Search,
        Domain::Admin,
        Domain::Notification,
        Domain::Media,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Domain::Identity => "identity",
            Domain::Catalog => "catalog",
            Domain::Borrowing => "borrowing",
            Domain::Search => "search",
            Domain::Admin => "admin",
            Domain::Notification => "notification",
            Domain::Media => "media",
        }
    }

    /// Versioned path prefix under the gateway address.
    #[must_use]
    pub fn path_prefix(self) -> &'static str {
        match self {
            Domain::Identity => "/api/iam/v1",
            Domain::Catalog => "/api/catalog/v1",
            Domain::Borrowing => "/api/borrowing/v1",
            Domain::Search => "/api/search/v1",
            Domain::Admin => "/api/admin/v1",
            Domain::Notification => "/api/notification/v1",
            Domain::Media => "/api/media/v1",
        }
    }

    /// Environment variable that overrides this domain's full base address.
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Domain::Identity => "BOOKVAULT_IAM_URL",
            Domain::Catalog => "BOOKVAULT_CATALOG_URL",
            Domain::Borrowing => "BOOKVAULT_BORROWING_URL",
            Domain::Search => "BOOKVAULT_SEARCH_URL",
            Domain::Admin => "BOOKVAULT_ADMIN_URL",
            Domain::Notification => "BOOKVAULT_NOTIFICATION_URL",
            Domain::Media => "BOOKVAULT_MEDIA_URL",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A domain bound to its resolved base address. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEndpoint {
    pub domain: Domain,
    pub base_url: String,
}

impl DomainEndpoint {
    /// Join a domain-relative path onto the base address.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Resolved base addresses for every domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEndpoints {
    endpoints: Vec<DomainEndpoint>,
}

impl DomainEndpoints {
    /// Derive every domain address from a single gateway address.
    #[must_use]
    pub fn from_gateway(gateway: &str) -> Self {
        let gateway = gateway.trim_end_matches('/');
        let endpoints = Domain::ALL
            .iter()
            .map(|&domain| DomainEndpoint { domain, base_url: format!("{gateway}{}", domain.path_prefix()) })
            .collect();
        Self { endpoints }
    }

    #[must_use]
    pub fn get(&self, domain: Domain) -> &DomainEndpoint {
        // `from_gateway` populates every domain in `Domain::ALL` order.
        &self.endpoints[domain as usize]
    }

    fn set(&mut self, domain: Domain, base_url: String) {
        self.endpoints[domain as usize].base_url = base_url;
    }
}

// =============================================================================
// CLIENT CONFIG
// =============================================================================

/// What a 401 from any domain does to the local session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailurePolicy {
    /// Clear the stored token; the credential was rejected as stale or invalid.
    ForceLogout,
    /// Only surface the error to the caller.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoints: DomainEndpoints,
    pub token_path: PathBuf,
    pub auth_failure: AuthFailurePolicy,
    /// Per-request timeout. `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BOOKVAULT_API_URL`: gateway address, default `http://localhost:8080`
    /// - `BOOKVAULT_<DOMAIN>_URL`: full base address for one domain
    /// - `BOOKVAULT_TOKEN_PATH`: token file, default `<data dir>/bookvault/token`
    /// - `BOOKVAULT_LOGOUT_ON_UNAUTHORIZED`: default `true`
    /// - `BOOKVAULT_REQUEST_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any present value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway = lookup("BOOKVAULT_API_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let gateway = parse_url("BOOKVAULT_API_URL", &gateway)?;
        let mut endpoints = DomainEndpoints::from_gateway(&gateway);

        for domain in Domain::ALL {
            if let Some(raw) = lookup(domain.env_var()) {
                endpoints.set(domain, parse_url(domain.env_var(), &raw)?);
            }
        }

        let token_path = lookup("BOOKVAULT_TOKEN_PATH").map_or_else(default_token_path, PathBuf::from);

        let auth_failure = match lookup("BOOKVAULT_LOGOUT_ON_UNAUTHORIZED") {
            None => AuthFailurePolicy::ForceLogout,
            Some(raw) => match parse_bool(&raw) {
                Some(true) => AuthFailurePolicy::ForceLogout,
                Some(false) => AuthFailurePolicy::Surface,
                None => {
                    return Err(ConfigError::InvalidBool { var: "BOOKVAULT_LOGOUT_ON_UNAUTHORIZED".into(), value: raw });
                }
            },
        };

        let request_timeout = match lookup("BOOKVAULT_REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    var: "BOOKVAULT_REQUEST_TIMEOUT_SECS".into(),
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self { endpoints, token_path, auth_failure, request_timeout })
    }

    /// Config pointing every domain at one gateway, with defaults elsewhere.
    #[must_use]
    pub fn for_gateway(gateway: &str) -> Self {
        Self {
            endpoints: DomainEndpoints::from_gateway(gateway),
            token_path: default_token_path(),
            auth_failure: AuthFailurePolicy::ForceLogout,
            request_timeout: None,
        }
    }
}

fn parse_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidUrl { var: var.to_owned(), value: raw.to_owned() }),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `<data dir>/bookvault/token`, or `.bookvault-token` in the working
/// directory when the platform has no data directory.
#[must_use]
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .map_or_else(
            || PathBuf::from(".bookvault-token"),
            |mut dir| {
                dir.push(TOKEN_DIR_NAME);
                dir.push(TOKEN_FILE_NAME);
                dir
            },
        )
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
