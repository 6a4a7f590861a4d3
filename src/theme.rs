// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide color theme.
//!
//! The theme is resolved once at startup (persisted file, then the system
//! preference, then light) and changed only through [`ThemeState::set`],
//! which writes the file before updating the in-memory value.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(AppError::BadRequest(format!("Unknown theme: {}", other))),
        }
    }
}

/// Current theme plus the file it is persisted to, if any.
pub struct ThemeState {
    current: RwLock<Theme>,
    path: Option<PathBuf>,
}

impl ThemeState {
    /// Resolve the starting theme: persisted value, then `system`, then light.
    ///
    /// An unreadable or garbled theme file is logged and ignored.
    pub async fn initialize(path: Option<PathBuf>, system: Option<Theme>) -> Self {
        let persisted = match &path {
            Some(p) => read_theme_file(p).await,
            None => None,
        };
        let theme = persisted.or(system).unwrap_or_default();

        tracing::debug!(
            theme = %theme,
            from_file = persisted.is_some(),
            "Theme initialized"
        );

        Self {
            current: RwLock::new(theme),
            path,
        }
    }

    /// In-memory state only; nothing is read or written.
    pub fn fixed(theme: Theme) -> Self {
        Self {
            current: RwLock::new(theme),
            path: None,
        }
    }

    pub async fn current(&self) -> Theme {
        *self.current.read().await
    }

    /// Persist `theme` and make it current.
    ///
    /// The write lock is held across the file write so concurrent calls
    /// leave the file and the in-memory value in agreement.
    pub async fn set(&self, theme: Theme) -> Result<Theme> {
        let mut current = self.current.write().await;

        if let Some(path) = &self.path {
            tokio::fs::write(path, theme.as_str()).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Failed to persist theme to {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        *current = theme;
        tracing::info!(theme = %theme, "Theme changed");
        Ok(theme)
    }
}

async fn read_theme_file(path: &Path) -> Option<Theme> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => match contents.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring theme file");
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Theme file unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fit-journal-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light\n".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[tokio::test]
    async fn test_falls_back_to_system_then_light() {
        let missing = temp_path("missing");
        let state = ThemeState::initialize(Some(missing), Some(Theme::Dark)).await;
        assert_eq!(state.current().await, Theme::Dark);

        let state = ThemeState::initialize(None, None).await;
        assert_eq!(state.current().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_set_persists() {
        let path = temp_path("persist");
        let state = ThemeState::initialize(Some(path.clone()), None).await;
        state.set(Theme::Dark).await.unwrap();
        assert_eq!(state.current().await, Theme::Dark);

        // A fresh start prefers the file over the system preference
        let reloaded = ThemeState::initialize(Some(path.clone()), Some(Theme::Light)).await;
        assert_eq!(reloaded.current().await, Theme::Dark);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_garbled_file_is_ignored() {
        let path = temp_path("garbled");
        tokio::fs::write(&path, "purple").await.unwrap();
        let state = ThemeState::initialize(Some(path.clone()), Some(Theme::Dark)).await;
        assert_eq!(state.current().await, Theme::Dark);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
