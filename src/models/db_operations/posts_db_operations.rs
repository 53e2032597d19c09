use crate::models::db_operations::{BackendError, SupabaseClient};
use crate::models::{NewPostRow, PostChangesRow, PostRow};
use reqwest::Method;

pub const POSTS_TABLE: &str = "rest/v1/posts";

fn filter_by_id(client: &SupabaseClient, id: &str) -> Result<url::Url, BackendError> {
    let mut url = client.url(POSTS_TABLE)?;
    url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
    Ok(url)
}

/// Reads every row, newest display date first.
pub async fn fetch_posts(client: &SupabaseClient) -> Result<Vec<PostRow>, BackendError> {
    let mut url = client.url(POSTS_TABLE)?;
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "date.desc");

    let resp = client.request(Method::GET, url, None).send().await?;
    let resp = SupabaseClient::check(resp).await?;
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

pub async fn insert_post(client: &SupabaseClient, access_token: &str, row: &NewPostRow) -> Result<(), BackendError> {
    let url = client.url(POSTS_TABLE)?;
    let resp = client
        .request(Method::POST, url, Some(access_token))
        .header("Prefer", "return=minimal")
        .json(&[row])
        .send()
        .await?;
    SupabaseClient::check(resp).await?;
    Ok(())
}

pub async fn update_post(
    client: &SupabaseClient,
    access_token: &str,
    post_id: &str,
    changes: &PostChangesRow,
) -> Result<(), BackendError> {
    let url = filter_by_id(client, post_id)?;
    let resp = client
        .request(Method::PATCH, url, Some(access_token))
        .header("Prefer", "return=minimal")
        .json(changes)
        .send()
        .await?;
    SupabaseClient::check(resp).await?;
    Ok(())
}

pub async fn delete_post(client: &SupabaseClient, access_token: &str, post_id: &str) -> Result<(), BackendError> {
    let url = filter_by_id(client, post_id)?;
    let resp = client.request(Method::DELETE, url, Some(access_token)).send().await?;
    SupabaseClient::check(resp).await?;
    Ok(())
}
