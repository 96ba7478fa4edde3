//! Guichet Queue Management System
//!
//! A Rust implementation of the Guichet queue-management server, providing a
//! REST JSON API for virtual tickets at walk-in institutions: citizens take a
//! ticket, operators call and process the queue, administrators watch the
//! aggregate numbers.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
