use crate::helper::sanitization_helpers::strip_all_html;
use crate::models::db_operations::{auth_db_operations, posts_db_operations, BackendError, SupabaseClient};
use crate::models::{DraftError, NewPostRow, Post, PostChangesRow, PostDraft, CATEGORIES};
use chrono::{Local, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminHelperError {
    #[error("{0}")]
    Invalid(#[from] DraftError),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AdminHelperError {
    pub fn user_message(&self) -> String {
        match self {
            AdminHelperError::Invalid(e) => e.to_string(),
            AdminHelperError::Backend(e) => format!("Lỗi: {}", e.user_message()),
        }
    }
}

fn require_backend(backend: Option<&SupabaseClient>) -> Result<&SupabaseClient, BackendError> {
    backend.ok_or(BackendError::NotConfigured)
}

/// The display date stored with new posts, e.g. `05/06/2023`.
pub fn display_date(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Options for the category select. A stored category outside the usual list
/// is kept as the last option so saving the form does not overwrite it.
pub fn category_choices(current: &str) -> Vec<String> {
    let mut choices: Vec<String> = CATEGORIES.iter().map(|c| c.to_string()).collect();
    let current = current.trim();
    if !current.is_empty() && !CATEGORIES.contains(&current) {
        choices.push(current.to_string());
    }
    choices
}

pub fn build_new_post(draft: &PostDraft, author: &str, today: NaiveDate) -> Result<NewPostRow, AdminHelperError> {
    let post_type = draft.validate()?;
    Ok(NewPostRow {
        title: strip_all_html(draft.title.trim()),
        excerpt: strip_all_html(draft.excerpt.trim()),
        content: draft.content.clone(),
        category: draft.category.clone(),
        image_url: draft.image_url.trim().to_string(),
        post_type,
        author: author.to_string(),
        views: 0,
        date: display_date(today),
    })
}

pub fn build_post_changes(draft: &PostDraft) -> Result<PostChangesRow, AdminHelperError> {
    let post_type = draft.validate()?;
    Ok(PostChangesRow {
        title: strip_all_html(draft.title.trim()),
        excerpt: strip_all_html(draft.excerpt.trim()),
        content: draft.content.clone(),
        category: draft.category.clone(),
        image_url: draft.image_url.trim().to_string(),
        post_type,
    })
}

/// The table as it is. Unlike the public feed there is no fallback list here:
/// an empty table stays empty and a failed read is reported.
pub async fn load_table(backend: Option<&SupabaseClient>) -> Result<Vec<Post>, AdminHelperError> {
    let client = require_backend(backend)?;
    let rows = posts_db_operations::fetch_posts(client).await?;
    Ok(rows.into_iter().map(Post::from).collect())
}

pub async fn create_post(
    backend: Option<&SupabaseClient>,
    access_token: &str,
    draft: &PostDraft,
    author: &str,
) -> Result<(), AdminHelperError> {
    let row = build_new_post(draft, author, Local::now().date_naive())?;
    let client = require_backend(backend)?;
    posts_db_operations::insert_post(client, access_token, &row).await?;
    Ok(())
}

pub async fn update_post(
    backend: Option<&SupabaseClient>,
    access_token: &str,
    post_id: &str,
    draft: &PostDraft,
) -> Result<(), AdminHelperError> {
    let changes = build_post_changes(draft)?;
    let client = require_backend(backend)?;
    posts_db_operations::update_post(client, access_token, post_id, &changes).await?;
    Ok(())
}

pub async fn delete_post(
    backend: Option<&SupabaseClient>,
    access_token: &str,
    post_id: &str,
) -> Result<(), AdminHelperError> {
    let client = require_backend(backend)?;
    posts_db_operations::delete_post(client, access_token, post_id).await?;
    Ok(())
}

pub async fn sign_in(
    backend: Option<&SupabaseClient>,
    email: &str,
    password: &str,
) -> Result<auth_db_operations::AuthSession, BackendError> {
    let client = require_backend(backend)?;
    auth_db_operations::sign_in(client, email, password).await
}

pub async fn sign_up(backend: Option<&SupabaseClient>, email: &str, password: &str) -> Result<(), BackendError> {
    let client = require_backend(backend)?;
    auth_db_operations::sign_up(client, email, password).await
}

/// Best effort: the local session is dropped regardless of the outcome.
pub async fn sign_out(backend: Option<&SupabaseClient>, access_token: &str) {
    if let Some(client) = backend {
        if let Err(e) = auth_db_operations::sign_out(client, access_token).await {
            log::warn!("Remote sign-out failed: {}", e);
        }
    }
}
