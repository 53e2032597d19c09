use crate::config::Config;
use crate::helper::chat_helpers::{ChatClient, ChatError};
use crate::models::db_operations::{BackendError, SupabaseClient};
use thiserror::Error;

/// Shared, read-only handles every request works from.
#[derive(Clone)]
pub struct AppState {
    /// `None` in mock-data mode.
    pub backend: Option<SupabaseClient>,
    pub chat: ChatClient,
    pub blog_author: String,
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("chat client: {0}")]
    Chat(#[from] ChatError),
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let backend = match &config.backend {
            Some(creds) => Some(SupabaseClient::new(creds, config.http_timeout_secs)?),
            None => {
                log::warn!("No backend credentials resolved. Running on mock data; admin writes are disabled.");
                None
            }
        };
        Ok(AppState {
            backend,
            chat: ChatClient::new(&config.chat, config.http_timeout_secs)?,
            blog_author: config.blog_author.clone(),
        })
    }

    pub fn backend(&self) -> Option<&SupabaseClient> {
        self.backend.as_ref()
    }

    pub fn is_mock_mode(&self) -> bool {
        self.backend.is_none()
    }
}

pub mod config;
pub mod helper;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod setup;
