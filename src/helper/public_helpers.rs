use crate::helper::sanitization_helpers;
use crate::models::db_operations::{posts_db_operations, SupabaseClient};
use crate::models::{mock_data, Post, PostType};
use serde::Serialize;

/// Cards after the featured one on the home feed.
pub const FEED_LIST_LEN: usize = 9;
const TEASER_CHARS: usize = 160;

/// Fetches the post list once and maps it into view records. Mock mode, a
/// failed request and an empty table all yield the fallback list.
pub async fn load_posts(backend: Option<&SupabaseClient>) -> Vec<Post> {
    let Some(client) = backend else {
        log::debug!("No backend configured; serving fallback posts.");
        return mock_data::fallback_posts();
    };

    match posts_db_operations::fetch_posts(client).await {
        Ok(rows) if !rows.is_empty() => rows.into_iter().map(Post::from).collect(),
        Ok(_) => {
            log::warn!("Posts table is empty; serving fallback posts.");
            mock_data::fallback_posts()
        }
        Err(e) => {
            log::error!("Failed to fetch posts: {}", e);
            mock_data::fallback_posts()
        }
    }
}

/// Case-insensitive substring match on title or category. A blank query keeps
/// every post. Order is preserved.
pub fn filter_posts(posts: Vec<Post>, query: &str) -> Vec<Post> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return posts;
    }
    posts
        .into_iter()
        .filter(|p| p.title.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle))
        .collect()
}

pub fn find_post<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.id == id)
}

#[derive(Serialize, Debug, Clone)]
pub struct PostCard {
    #[serde(flatten)]
    pub post: Post,
    pub teaser: String,
}

impl From<Post> for PostCard {
    fn from(post: Post) -> Self {
        let teaser = if post.excerpt.trim().is_empty() {
            sanitization_helpers::plain_text_teaser(&post.content, TEASER_CHARS)
        } else {
            post.excerpt.clone()
        };
        PostCard { post, teaser }
    }
}

/// The home feed layout: one featured card, a short list, and the share-code
/// strip drawn from the whole (filtered) list.
#[derive(Serialize, Debug, Default)]
pub struct FeedView {
    pub featured: Option<PostCard>,
    pub list: Vec<PostCard>,
    pub share_code: Vec<PostCard>,
    pub total: usize,
}

impl FeedView {
    pub fn compose(posts: &[Post]) -> Self {
        FeedView {
            featured: posts.first().cloned().map(PostCard::from),
            list: posts.iter().skip(1).take(FEED_LIST_LEN).cloned().map(PostCard::from).collect(),
            share_code: posts
                .iter()
                .filter(|p| p.post_type == PostType::ShareCode)
                .cloned()
                .map(PostCard::from)
                .collect(),
            total: posts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Body HTML for the detail page; an empty body shows the excerpt instead.
pub fn render_detail_body(post: &Post) -> String {
    let source = if post.content.trim().is_empty() { &post.excerpt } else { &post.content };
    sanitization_helpers::render_post_body(source)
}
