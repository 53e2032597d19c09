use crate::models::db_operations::{BackendError, SupabaseClient};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

pub async fn sign_in(client: &SupabaseClient, email: &str, password: &str) -> Result<AuthSession, BackendError> {
    let mut url = client.url("auth/v1/token")?;
    url.query_pairs_mut().append_pair("grant_type", "password");

    let resp = client
        .request(Method::POST, url, None)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    let resp = SupabaseClient::check(resp).await?;
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Registers an account. The service sends a confirmation mail; no session
/// is returned until the address is confirmed.
pub async fn sign_up(client: &SupabaseClient, email: &str, password: &str) -> Result<(), BackendError> {
    let url = client.url("auth/v1/signup")?;
    let resp = client
        .request(Method::POST, url, None)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    SupabaseClient::check(resp).await?;
    Ok(())
}

pub async fn sign_out(client: &SupabaseClient, access_token: &str) -> Result<(), BackendError> {
    let url = client.url("auth/v1/logout")?;
    let resp = client.request(Method::POST, url, Some(access_token)).send().await?;
    SupabaseClient::check(resp).await?;
    Ok(())
}
