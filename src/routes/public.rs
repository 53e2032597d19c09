use crate::helper::chat_helpers::{self, ChatError};
use crate::helper::public_helpers::{self, FeedView};
use crate::models::ChatRequest;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tera::{Context, Tera};

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

impl SearchQuery {
    fn text(&self) -> &str {
        self.q.as_deref().unwrap_or("").trim()
    }
}

pub fn config_pages(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(show_feed))
        .route("/posts/{id}", web::get().to(show_post));
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(is_server_active))
            .route("/posts", web::get().to(get_posts))
            .route("/posts/{id}", web::get().to(get_post_by_id))
            .route("/chat", web::post().to(post_chat_message))
            .route("/chat/greeting", web::get().to(get_chat_greeting)),
    );
}

pub(crate) fn render(tera: &Tera, template: &str, ctx: &Context, status: StatusCode) -> HttpResponse {
    match tera.render(template, ctx) {
        Ok(rendered) => HttpResponse::build(status).content_type("text/html; charset=utf-8").body(rendered),
        Err(err) => {
            log::error!("Template rendering error in '{}': {:?}", template, err);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

fn base_context(state: &AppState, query: &str) -> Context {
    let mut ctx = Context::new();
    ctx.insert("q", query);
    ctx.insert("mock_mode", &state.is_mock_mode());
    ctx.insert("chat_greeting", &chat_helpers::greeting());
    ctx
}

async fn show_feed(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let posts = public_helpers::load_posts(state.backend()).await;
    let filtered = public_helpers::filter_posts(posts, query.text());
    let feed = FeedView::compose(&filtered);

    let mut ctx = base_context(&state, query.text());
    ctx.insert("feed", &feed);
    ctx.insert("is_empty", &feed.is_empty());
    render(&tera, "index.html", &ctx, StatusCode::OK)
}

async fn show_post(
    id: web::Path<String>,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let posts = public_helpers::load_posts(state.backend()).await;
    let mut ctx = base_context(&state, "");

    match public_helpers::find_post(&posts, &id) {
        Some(post) => {
            ctx.insert("post", post);
            ctx.insert("body_html", &public_helpers::render_detail_body(post));
            render(&tera, "post.html", &ctx, StatusCode::OK)
        }
        None => {
            ctx.insert("missing_id", id.as_str());
            render(&tera, "not_found.html", &ctx, StatusCode::NOT_FOUND)
        }
    }
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

async fn get_posts(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> impl Responder {
    let posts = public_helpers::load_posts(state.backend()).await;
    HttpResponse::Ok().json(public_helpers::filter_posts(posts, query.text()))
}

async fn get_post_by_id(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let posts = public_helpers::load_posts(state.backend()).await;
    match public_helpers::find_post(&posts, &id) {
        Some(post) => HttpResponse::Ok().json(post),
        None => HttpResponse::NotFound().body("Post not found"),
    }
}

async fn get_chat_greeting() -> impl Responder {
    HttpResponse::Ok().json(chat_helpers::greeting())
}

async fn post_chat_message(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    match state.chat.reply_for(&body.message).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(ChatError::EmptyInput) => {
            HttpResponse::BadRequest().json(json!({ "error": "A non-empty 'message' is required." }))
        }
        Err(e) => {
            // reply_for maps everything else to a canned answer already.
            log::error!("Unexpected chat failure: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
