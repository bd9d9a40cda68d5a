//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RECIPES_*` environment variables, an optional
//! configuration file and command-line flags. Every field is optional; the
//! accessors apply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, PageSizePolicy, PaginationError};
use serde::Deserialize;

use crate::inbound::http::session_config::SessionToggles;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Invalid server settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind_addr '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The page size pair is inconsistent.
    #[error(transparent)]
    PageSizes(#[from] PaginationError),
}

/// Configuration for the HTTP server process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Page size used when a listing has no `limit`.
    pub default_page_size: Option<u32>,
    /// Upper bound for `limit`.
    pub max_page_size: Option<u32>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
}

impl ServerSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Database URL, treating a blank value as unset.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Page size policy for listings.
    ///
    /// # Errors
    /// Returns [`SettingsError::PageSizes`] when the default is zero or
    /// exceeds the maximum.
    pub fn page_sizes(&self) -> Result<PageSizePolicy, SettingsError> {
        Ok(PageSizePolicy::new(
            self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE),
        )?)
    }

    /// Session toggles for [`crate::inbound::http::session_config::session_settings`].
    #[must_use]
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            cookie_secure: self.session_cookie_secure,
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "RECIPES_BIND_ADDR",
        "RECIPES_DATABASE_URL",
        "RECIPES_DEFAULT_PAGE_SIZE",
        "RECIPES_MAX_PAGE_SIZE",
        "RECIPES_SESSION_KEY_FILE",
        "RECIPES_SESSION_COOKIE_SECURE",
        "RECIPES_SESSION_SAME_SITE",
        "RECIPES_SESSION_ALLOW_EPHEMERAL",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("recipes-backend")])
            .expect("config should load")
    }

    fn unset() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            default_page_size: None,
            max_page_size: None,
            session_key_file: None,
            session_cookie_secure: None,
            session_same_site: None,
            session_allow_ephemeral: None,
        }
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.database_url(), None);
        let policy = settings.page_sizes().expect("default policy");
        assert_eq!((policy.default_size(), policy.max_size()), (6, 100));
        let toggles = settings.session_toggles();
        assert_eq!(toggles.key_file, PathBuf::from(DEFAULT_SESSION_KEY_FILE));
        assert_eq!(toggles.cookie_secure, None);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("RECIPES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://localhost/recipes".to_owned()),
            ),
            ("RECIPES_DEFAULT_PAGE_SIZE", Some("10".to_owned())),
            ("RECIPES_MAX_PAGE_SIZE", Some("50".to_owned())),
            ("RECIPES_SESSION_COOKIE_SECURE", Some("false".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/recipes"));
        let policy = settings.page_sizes().expect("policy");
        assert_eq!((policy.default_size(), policy.max_size()), (10, 50));
        assert_eq!(settings.session_toggles().cookie_secure, Some(false));
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some("postgres://db/recipes"), Some("postgres://db/recipes"))]
    fn blank_database_url_means_memory_store(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = ServerSettings {
            database_url: raw.map(str::to_owned),
            ..unset()
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    fn inconsistent_page_sizes_are_rejected() {
        let settings = ServerSettings {
            default_page_size: Some(20),
            max_page_size: Some(10),
            ..unset()
        };
        assert!(matches!(
            settings.page_sizes(),
            Err(SettingsError::PageSizes(PaginationError::InvalidPolicy { .. }))
        ));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let settings = ServerSettings {
            bind_addr: Some("localhost".to_owned()),
            ..unset()
        };
        let err = settings.bind_addr().expect_err("rejected");
        assert!(err.to_string().contains("localhost"), "{err}");
    }
}
