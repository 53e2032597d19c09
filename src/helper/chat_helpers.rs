//! Client for the hosted generative-AI endpoint behind the chat widget.

use crate::config::ChatConfig;
use crate::models::db_operations::base_url_for_join;
use crate::models::{ChatMessage, ChatRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const GREETING: &str =
    "Chào bạn! Mình là AI Assistant của Blog Thắng Phạm. Bạn muốn tìm hiểu gì về WordPress hay dịch vụ của mình?";
pub const EMPTY_REPLY_FALLBACK: &str =
    "Xin lỗi, mình gặp một chút sự cố kỹ thuật. Bạn hãy thử lại sau nhé!";
pub const BUSY_FALLBACK: &str =
    "Rất tiếc, hiện tại hệ thống AI đang bận. Bạn có thể liên hệ trực tiếp qua mục Liên hệ nhé!";
pub const PERSONA: &str = "Bạn là một trợ lý ảo trên blog của Thắng Phạm (Phạm Văn Thắng). Thắng Phạm là một chuyên gia WordPress, thiết kế web và marketing tại Việt Nam. Blog chuyên chia sẻ về thủ thuật WordPress, code theme và kinh nghiệm MMO. Hãy trả lời một cách thân thiện, chuyên nghiệp bằng tiếng Việt.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,
    #[error("no API key configured for the chat model")]
    MissingKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("model endpoint responded with {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    http: Client,
    api_base: Url,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(config: &ChatConfig, timeout_secs: u64) -> Result<Self, ChatError> {
        let http = Client::builder()
            .user_agent(concat!("blogshare/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(ChatClient {
            http,
            api_base: base_url_for_join(&config.api_base)?,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> Result<Url, ChatError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        Ok(self.api_base.join(&path)?)
    }

    /// One completion request: persona as the system instruction, the
    /// visitor's text as the only turn.
    pub async fn ask(&self, user_text: &str) -> Result<String, ChatError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingKey)?;

        let body = GenerateRequest {
            system_instruction: Content { role: None, parts: vec![Part { text: PERSONA }] },
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: user_text }] }],
        };

        let resp = self
            .http
            .post(self.endpoint()?)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Status { status: status.as_u16(), body });
        }
        let parsed: GenerateResponse = resp.json().await?;
        Ok(parsed.text())
    }

    /// What the widget shows. Every failure becomes one of the canned replies;
    /// only blank input is reported back to the caller.
    pub async fn reply_for(&self, user_text: &str) -> Result<ChatMessage, ChatError> {
        let text = match self.ask(user_text).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => EMPTY_REPLY_FALLBACK.to_string(),
            Err(ChatError::EmptyInput) => return Err(ChatError::EmptyInput),
            Err(e) => {
                log::error!("Chat completion failed: {}", e);
                BUSY_FALLBACK.to_string()
            }
        };
        Ok(ChatMessage { role: ChatRole::Ai, text })
    }
}

pub fn greeting() -> ChatMessage {
    ChatMessage { role: ChatRole::Ai, text: GREETING.to_string() }
}
