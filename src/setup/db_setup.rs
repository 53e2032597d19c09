use crate::models::db_operations::{auth_db_operations, posts_db_operations, BackendError, SupabaseClient};
use crate::models::{mock_data, NewPostRow};

/// DDL for the managed `posts` table and its row-level security, to paste
/// into the hosted project's SQL editor.
pub const POSTS_SCHEMA_SQL: &str = r#"create table if not exists public.posts (
    id          bigint generated by default as identity primary key,
    title       text   not null,
    content     text   not null,
    excerpt     text   default '',
    author      text   default '',
    category    text   default 'My Blog',
    views       bigint default 0,
    date        text   default '',
    image_url   text   default '',
    type        text   default 'blog' check (type in ('blog', 'share-code', 'video')),
    created_at  timestamptz default now()
);

alter table public.posts enable row level security;

create policy "posts are readable by everyone"
    on public.posts for select using (true);

create policy "authenticated users can insert posts"
    on public.posts for insert to authenticated with check (true);

create policy "authenticated users can update posts"
    on public.posts for update to authenticated using (true);

create policy "authenticated users can delete posts"
    on public.posts for delete to authenticated using (true);
"#;

#[derive(Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Rows came back from the table.
    Live(usize),
    /// No credentials or an empty table: the feed serves this many fallback posts.
    Fallback(usize),
}

/// One read against the table, reported the same way the front end would
/// experience it. A failed read is returned as the error rather than hidden
/// behind the fallback list.
pub async fn check_connection(client: Option<&SupabaseClient>) -> Result<CheckOutcome, BackendError> {
    let fallback = || CheckOutcome::Fallback(mock_data::fallback_posts().len());
    let Some(client) = client else {
        return Ok(fallback());
    };
    let rows = posts_db_operations::fetch_posts(client).await?;
    if rows.is_empty() {
        Ok(fallback())
    } else {
        Ok(CheckOutcome::Live(rows.len()))
    }
}

/// Copies the fallback list into the table. Ids are left to the table.
pub async fn seed_posts(
    client: &SupabaseClient,
    email: &str,
    password: &str,
) -> Result<usize, BackendError> {
    let session = auth_db_operations::sign_in(client, email, password).await?;
    let seeds: Vec<NewPostRow> = mock_data::fallback_posts()
        .into_iter()
        .map(|p| NewPostRow {
            title: p.title,
            excerpt: p.excerpt,
            content: p.content,
            category: p.category,
            image_url: p.image_url,
            post_type: p.post_type,
            author: p.author,
            views: p.views,
            date: p.date,
        })
        .collect();

    for row in &seeds {
        posts_db_operations::insert_post(client, &session.access_token, row).await?;
    }
    Ok(seeds.len())
}
