#![allow(dead_code)]

use blogshare::config::{Config, EnvSource, WebConfig};
use blogshare::AppState;
use std::collections::HashMap;
use tera::Tera;

pub const ANON_KEY: &str = "anon-test-key";
pub const CHAT_KEY: &str = "chat-test-key";

/// Configuration as the server would build it, with the backend and the chat
/// model optionally pointed at local mock servers.
pub fn config(backend_url: Option<&str>, chat_base: Option<&str>) -> Config {
    let mut values: HashMap<String, String> = HashMap::new();
    values.insert("SESSION_SECRET_KEY".into(), "ab".repeat(64));
    if let Some(url) = backend_url {
        values.insert("SUPABASE_URL".into(), url.to_string());
        values.insert("SUPABASE_ANON_KEY".into(), ANON_KEY.to_string());
    }
    if let Some(base) = chat_base {
        values.insert("CHAT_API_BASE".into(), base.to_string());
        values.insert("GEMINI_API_KEY".into(), CHAT_KEY.to_string());
    }
    values.insert("HTTP_TIMEOUT_SECS".into(), "5".into());
    Config::from_sources(&[EnvSource::new("test", values)], WebConfig::default()).expect("test config")
}

pub fn state(backend_url: Option<&str>, chat_base: Option<&str>) -> AppState {
    AppState::from_config(&config(backend_url, chat_base)).expect("app state")
}

pub fn tera() -> Tera {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")).expect("templates")
}

/// Builds the full application the way `main` does, minus CORS and the
/// static file service.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_session::SessionMiddleware::new(
                    actix_session::storage::CookieSessionStore::default(),
                    actix_web::cookie::Key::generate(),
                ))
                .app_data(actix_web::web::Data::new(common::tera()))
                .app_data(actix_web::web::Data::new($state))
                .configure(blogshare::routes::configure),
        )
        .await
    };
}

pub async fn body_text<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Cookies a browser would carry between requests: the session cookie and
/// the CSRF cookie. Removal cookies (empty value) drop the entry.
#[derive(Default)]
pub struct CookieJar {
    cookies: HashMap<String, actix_web::cookie::Cookie<'static>>,
}

impl CookieJar {
    pub fn absorb<B>(&mut self, resp: &actix_web::dev::ServiceResponse<B>) {
        for cookie in resp.response().cookies() {
            if cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies.insert(cookie.name().to_string(), cookie.into_owned());
            }
        }
    }

    pub fn attach(&self, req: actix_web::test::TestRequest) -> actix_web::test::TestRequest {
        self.cookies.values().fold(req, |req, cookie| req.cookie(cookie.clone()))
    }
}

/// What a test needs from one response.
pub struct Page {
    pub status: actix_web::http::StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    /// Value of the first hidden `csrf_token` input on the page.
    pub fn csrf_token(&self) -> String {
        let marker = r#"name="csrf_token" value=""#;
        let start = self.body.find(marker).expect("csrf_token input") + marker.len();
        let end = self.body[start..].find('"').expect("closing quote") + start;
        self.body[start..end].to_string()
    }
}

/// Sends `$req` with the jar's cookies, stores the cookies the response sets
/// and returns a `Page`.
#[macro_export]
macro_rules! send {
    ($app:expr, $jar:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $jar.attach($req).to_request()).await;
        $jar.absorb(&resp);
        let status = resp.status();
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = common::body_text(resp).await;
        common::Page { status, location, body }
    }};
}
