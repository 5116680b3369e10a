//! WebOS backend library
//!
//! Three independent HTTP services share this crate: the caption upload form,
//! the database-backed desktop shell and the lite desktop shell. Each has its
//! own state type and router builder in [`app`].

pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::{Repository, SqliteRepository};
pub use error::{AppError, Result};

use std::sync::Arc;

use auth::{CredentialStore, StaticCredentials};
use constants::NOTIFICATION_CHANNEL_CAPACITY;
use realtime::NotificationHub;

/// State of the caption upload service
#[derive(Clone)]
pub struct CaptionState {
    pub config: Config,
}

impl CaptionState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// State of the desktop shell
#[derive(Clone)]
pub struct DesktopState {
    pub repo: Arc<dyn Repository>,
    pub config: Config,
    /// Token signing key, always present
    pub secret_key: Arc<str>,
    pub hub: NotificationHub,
}

impl DesktopState {
    /// Create the desktop state; fails when no signing key is configured
    pub fn new(repo: Arc<dyn Repository>, config: Config) -> std::result::Result<Self, String> {
        let secret_key: Arc<str> = config
            .secret_key
            .as_deref()
            .ok_or("SECRET_KEY must be set for the desktop service")?
            .into();

        Ok(Self {
            repo,
            config,
            secret_key,
            hub: NotificationHub::new(NOTIFICATION_CHANNEL_CAPACITY),
        })
    }
}

/// State of the lite desktop shell
#[derive(Clone)]
pub struct LiteState {
    pub credentials: Arc<dyn CredentialStore>,
    pub config: Config,
}

impl LiteState {
    pub fn new(credentials: Arc<dyn CredentialStore>, config: Config) -> Self {
        Self {
            credentials,
            config,
        }
    }

    /// State whose credential table comes from `LITE_USERS`
    pub fn from_config(config: Config) -> Self {
        let credentials = StaticCredentials::new(config.lite_users.clone());
        Self::new(Arc::new(credentials), config)
    }
}
