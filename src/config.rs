// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::path::PathBuf;

use crate::theme::Theme;

/// Which store backs the journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Firestore,
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub store_backend: StoreBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// File the theme is persisted to; `None` keeps it in memory
    pub theme_path: Option<PathBuf>,
    /// Theme used when nothing has been persisted yet
    pub system_theme: Option<Theme>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            None => 8080,
        };

        let store_backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("firestore") => StoreBackend::Firestore,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        let system_theme = match lookup("SYSTEM_THEME") {
            Some(v) => Some(
                v.parse::<Theme>()
                    .map_err(|_| ConfigError::Invalid("SYSTEM_THEME", v))?,
            ),
            None => None,
        };

        let jwt_signing_key = lookup("JWT_SIGNING_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();

        Ok(Self {
            port,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            jwt_signing_key,
            store_backend,
            gcp_project_id: lookup("GCP_PROJECT_ID").unwrap_or_else(|| "local-dev".to_string()),
            theme_path: lookup("THEME_PATH").map(PathBuf::from),
            system_theme,
        })
    }

    /// Config for tests: memory store, nothing persisted.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            theme_path: None,
            system_theme: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
