use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Categories offered by the editor form.
pub const CATEGORIES: &[&str] = &["My Blog", "WordPress", "Share code", "Marketing", "Kinh nghiệm"];
pub const DEFAULT_CATEGORY: &str = "My Blog";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostType {
    #[default]
    #[serde(rename = "blog")]
    Blog,
    #[serde(rename = "share-code")]
    ShareCode,
    #[serde(rename = "video")]
    Video,
}

impl PostType {
    pub const ALL: [PostType; 3] = [PostType::Blog, PostType::ShareCode, PostType::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Blog => "blog",
            PostType::ShareCode => "share-code",
            PostType::Video => "video",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        PostType::ALL.into_iter().find(|t| t.as_str() == tag.trim())
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostType::Blog => "Bài viết (Blog)",
            PostType::ShareCode => "Chia sẻ code",
            PostType::Video => "Video",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as the views see it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    pub views: i64,
    /// Display date, e.g. `24/08/2023`. Not parsed.
    pub date: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Number(n) => Ok(n.to_string()),
    }
}

fn deserialize_post_type<'de, D>(deserializer: D) -> Result<PostType, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(PostType::parse).unwrap_or_default())
}

/// Row of the managed `posts` table, snake_case as stored. Nullable columns
/// come back as `null` for rows written by hand in the dashboard.
#[derive(Debug, Deserialize, Clone)]
pub struct PostRow {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub views: Option<i64>,
    pub date: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "deserialize_post_type")]
    pub post_type: PostType,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            excerpt: row.excerpt.unwrap_or_default(),
            author: row.author.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            views: row.views.unwrap_or(0),
            date: row.date.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            post_type: row.post_type,
        }
    }
}

/// Insert payload. The table assigns the id.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NewPostRow {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub author: String,
    pub views: i64,
    pub date: String,
}

/// Update payload. Author, views and date are left as stored.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostChangesRow {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
}

/// What the editor form submits.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub post_type: String,
}

impl Default for PostDraft {
    fn default() -> Self {
        PostDraft {
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            image_url: String::new(),
            post_type: PostType::Blog.as_str().to_string(),
        }
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        PostDraft {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            image_url: post.image_url.clone(),
            post_type: post.post_type.as_str().to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Tiêu đề bài viết không được để trống.")]
    EmptyTitle,
    #[error("Nội dung bài viết không được để trống.")]
    EmptyContent,
    #[error("Loại nội dung không hợp lệ: '{0}'.")]
    UnknownType(String),
}

impl PostDraft {
    /// Checks what the form's `required` attributes promise and returns the
    /// parsed content type.
    pub fn validate(&self) -> Result<PostType, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::EmptyContent);
        }
        PostType::parse(&self.post_type).ok_or_else(|| DraftError::UnknownType(self.post_type.clone()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub message: String,
    pub r#type: String, // 'success' or 'error'
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Ai,
    User,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub message: String,
}

pub mod db_operations;
pub mod mock_data;
