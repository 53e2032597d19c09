//! Bindings to the hosted backend: a PostgREST table for posts and the
//! matching auth service. Each call is a single request; nothing is retried.

use crate::config::BackendCredentials;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub mod auth_db_operations;
pub mod posts_db_operations;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Backend is not configured")]
    NotConfigured,
}

impl BackendError {
    /// Message suitable for a flash notification.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Status { message, .. } => message.clone(),
            BackendError::NotConfigured => "Chưa cấu hình máy chủ dữ liệu (đang dùng dữ liệu mẫu).".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Parses a service base URL so relative paths join beneath it. A project
/// behind a proxy prefix (`https://host/supabase`) keeps that prefix.
pub fn base_url_for_join(raw: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(raw.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(creds: &BackendCredentials, timeout_secs: u64) -> Result<Self, BackendError> {
        let base = base_url_for_join(&creds.url)?;
        let http = Client::builder()
            .user_agent(concat!("blogshare/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(SupabaseClient { http, base, anon_key: creds.anon_key.clone() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base.join(path)?)
    }

    /// Every call carries the project key; `bearer` is the signed-in user's
    /// access token for writes, or the anon key for public reads.
    pub(crate) fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
    }

    /// Turns a non-2xx response into `BackendError::Status`, preferring the
    /// service's own error text over the raw body.
    pub(crate) async fn check(resp: Response) -> Result<Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message.or(b.msg).or(b.error_description).or(b.error))
            .unwrap_or(text);
        Err(BackendError::Status { status: status.as_u16(), message })
    }
}
