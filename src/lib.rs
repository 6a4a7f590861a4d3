// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fit-Journal: a personal daily fitness journal
//!
//! This crate provides the backend API for recording daily metrics,
//! workouts and events, and for summarizing them by week or date range.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod theme;
pub mod time_utils;
pub mod units;

use config::Config;
use db::JournalDb;
use theme::ThemeState;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: JournalDb,
    pub theme: ThemeState,
}
