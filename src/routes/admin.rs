use crate::helper::{admin_helpers, public_helpers};
use crate::middleware::{admin_guard, AuthenticatedAdmin, ADMIN_ROLE, SESSION_EMAIL, SESSION_ROLE, SESSION_TOKEN};
use crate::models::{Notification, Post, PostDraft, PostType};
use crate::routes::public::render;
use crate::AppState;
use actix_csrf::extractor::{Csrf, CsrfGuarded, CsrfToken};
use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

pub const MANAGEMENT_PREFIX: &str = "/management";
const LOGIN_URL: &str = "/management/login";
const DASHBOARD_URL: &str = "/management/dashboard";

#[derive(Deserialize)]
struct CredentialsForm {
    csrf_token: CsrfToken,
    email: String,
    password: String,
}

impl CsrfGuarded for CredentialsForm {
    fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }
}

#[derive(Deserialize)]
struct EditorForm {
    csrf_token: CsrfToken,
    title: String,
    #[serde(default)]
    excerpt: String,
    content: String,
    category: String,
    #[serde(default)]
    image_url: String,
    #[serde(rename = "type")]
    post_type: String,
}

impl CsrfGuarded for EditorForm {
    fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }
}

impl EditorForm {
    fn into_draft(self) -> PostDraft {
        PostDraft {
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            image_url: self.image_url,
            post_type: self.post_type,
        }
    }
}

/// Forms that carry nothing but the token: delete and logout.
#[derive(Deserialize)]
struct TokenForm {
    csrf_token: CsrfToken,
}

impl CsrfGuarded for TokenForm {
    fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }
}

#[derive(Serialize)]
struct TypeOption {
    value: &'static str,
    label: &'static str,
}

fn type_options() -> Vec<TypeOption> {
    PostType::ALL.iter().map(|t| TypeOption { value: t.as_str(), label: t.label() }).collect()
}

/// Paths whose GET (and, for the editor, POST) responses carry a fresh CSRF
/// cookie.
pub fn csrf_cookie_paths() -> Vec<(actix_web::http::Method, String)> {
    use actix_web::http::Method;
    vec![
        (Method::GET, format!("{}/login", MANAGEMENT_PREFIX)),
        (Method::GET, format!("{}/signup", MANAGEMENT_PREFIX)),
        (Method::GET, format!("{}/dashboard", MANAGEMENT_PREFIX)),
        (Method::GET, format!("{}/posts/new", MANAGEMENT_PREFIX)),
        (Method::GET, format!("{}/posts/{{post_id}}/edit", MANAGEMENT_PREFIX)),
        (Method::POST, format!("{}/posts", MANAGEMENT_PREFIX)),
        (Method::POST, format!("{}/posts/{{post_id}}", MANAGEMENT_PREFIX)),
    ]
}

pub fn config_login(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(show_login_form))
        .route("/login", web::post().to(handle_login))
        .route("/signup", web::get().to(show_signup_form))
        .route("/signup", web::post().to(handle_signup))
        .route("/logout", web::post().to(handle_logout));
}

pub fn config_dashboard(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(show_dashboard))
        .route("/posts/new", web::get().to(show_new_post_form))
        .route("/posts", web::post().to(create_post_action))
        .route("/posts/{post_id}/edit", web::get().to(show_edit_post_form))
        .route("/posts/{post_id}", web::post().to(update_post_action))
        .route("/posts/{post_id}/delete", web::post().to(delete_post_action));
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found().append_header(("location", location)).finish()
}

pub async fn to_login() -> HttpResponse {
    redirect(LOGIN_URL)
}

fn flash(session: &Session, key: &str, message: &str) {
    if let Err(e) = session.insert(key, message) {
        log::error!("Failed to store '{}' in session: {}", key, e);
    }
}

fn set_notification(session: &Session, message: &str, r#type: &str) {
    let notification = Notification { message: message.to_string(), r#type: r#type.to_string() };
    if let Err(e) = session.insert("notification", &notification) {
        log::error!("Failed to store notification in session: {}", e);
    }
}

fn take_flash(session: &Session, key: &str) -> Option<String> {
    let value = session.get::<String>(key).unwrap_or(None);
    if value.is_some() {
        session.remove(key);
    }
    value
}

fn auth_page(
    session: &Session,
    state: &AppState,
    tera: &Tera,
    token: &CsrfToken,
    signup: bool,
) -> HttpResponse {
    if admin_guard(session) {
        return redirect(DASHBOARD_URL);
    }

    let mut ctx = Context::new();
    ctx.insert("csrf_token", token.get());
    ctx.insert("is_signup", &signup);
    ctx.insert("mock_mode", &state.is_mock_mode());
    if let Some(error) = take_flash(session, "error") {
        ctx.insert("error", &error);
    }
    if let Some(message) = take_flash(session, "message") {
        ctx.insert("message", &message);
    }
    render(tera, "admin/login.html", &ctx, StatusCode::OK)
}

async fn show_login_form(
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
) -> impl Responder {
    auth_page(&session, &state, &tera, &token, false)
}

async fn show_signup_form(
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
) -> impl Responder {
    auth_page(&session, &state, &tera, &token, true)
}

async fn handle_login(
    session: Session,
    state: web::Data<AppState>,
    form: Csrf<web::Form<CredentialsForm>>,
) -> impl Responder {
    let login = form.into_inner().into_inner();
    let email = login.email.trim().to_string();

    match admin_helpers::sign_in(state.backend(), &email, &login.password).await {
        Ok(auth) => {
            session.renew();
            let stored = session
                .insert(SESSION_EMAIL, auth.user.email.unwrap_or(email))
                .and_then(|_| session.insert(SESSION_TOKEN, auth.access_token))
                .and_then(|_| session.insert(SESSION_ROLE, ADMIN_ROLE));
            if let Err(e) = stored {
                log::error!("Failed to persist admin session: {}", e);
                session.purge();
                flash(&session, "error", "Không thể lưu phiên đăng nhập.");
                return redirect(LOGIN_URL);
            }
            log::info!("Admin '{}' signed in.", auth.user.id);
            redirect(DASHBOARD_URL)
        }
        Err(e) => {
            log::warn!("Sign-in failed for '{}': {}", email, e);
            flash(&session, "error", &e.user_message());
            redirect(LOGIN_URL)
        }
    }
}

async fn handle_signup(
    session: Session,
    state: web::Data<AppState>,
    form: Csrf<web::Form<CredentialsForm>>,
) -> impl Responder {
    let signup = form.into_inner().into_inner();
    let email = signup.email.trim().to_string();

    match admin_helpers::sign_up(state.backend(), &email, &signup.password).await {
        Ok(()) => {
            flash(&session, "message", "Đăng ký thành công! Vui lòng kiểm tra email để xác nhận.");
            redirect(LOGIN_URL)
        }
        Err(e) => {
            log::warn!("Sign-up failed for '{}': {}", email, e);
            flash(&session, "error", &e.user_message());
            redirect(&format!("{}/signup", MANAGEMENT_PREFIX))
        }
    }
}

async fn handle_logout(
    session: Session,
    state: web::Data<AppState>,
    _form: Csrf<web::Form<TokenForm>>,
) -> impl Responder {
    if let Ok(Some(token)) = session.get::<String>(SESSION_TOKEN) {
        admin_helpers::sign_out(state.backend(), &token).await;
    }
    session.purge();
    redirect("/")
}

/// Context every signed-in page starts from: the nav needs `user` and a
/// token for the logout form, the layout needs `mock_mode`.
fn admin_context(admin: &AuthenticatedAdmin, state: &AppState, token: &CsrfToken) -> Context {
    let mut ctx = Context::new();
    ctx.insert("user", admin);
    ctx.insert("csrf_token", token.get());
    ctx.insert("mock_mode", &state.is_mock_mode());
    ctx
}

async fn show_dashboard(
    admin: AuthenticatedAdmin,
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
) -> impl Responder {
    let mut ctx = admin_context(&admin, &state, &token);

    if let Ok(Some(notification)) = session.get::<Notification>("notification") {
        ctx.insert("notification", &notification);
        session.remove("notification");
    }

    match admin_helpers::load_table(state.backend()).await {
        Ok(posts) => ctx.insert("posts", &posts),
        Err(e) => {
            log::error!("Failed to load posts for the dashboard: {}", e);
            ctx.insert("posts", &Vec::<Post>::new());
            ctx.insert("load_error", &e.user_message());
        }
    }
    render(&tera, "admin/dashboard.html", &ctx, StatusCode::OK)
}

fn editor_page(
    tera: &Tera,
    mut ctx: Context,
    draft: &PostDraft,
    post_id: Option<&str>,
    error: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    ctx.insert("draft", draft);
    ctx.insert("categories", &admin_helpers::category_choices(&draft.category));
    ctx.insert("types", &type_options());
    match post_id {
        Some(id) => {
            ctx.insert("post_id", id);
            ctx.insert("form_action", &format!("{}/posts/{}", MANAGEMENT_PREFIX, id));
        }
        None => ctx.insert("form_action", &format!("{}/posts", MANAGEMENT_PREFIX)),
    }
    if let Some(error) = error {
        ctx.insert("error", error);
    }
    render(tera, "admin/editor.html", &ctx, status)
}

async fn show_new_post_form(
    admin: AuthenticatedAdmin,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
) -> impl Responder {
    let ctx = admin_context(&admin, &state, &token);
    editor_page(&tera, ctx, &PostDraft::default(), None, None, StatusCode::OK)
}

async fn show_edit_post_form(
    admin: AuthenticatedAdmin,
    post_id: web::Path<String>,
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
) -> impl Responder {
    let posts = match admin_helpers::load_table(state.backend()).await {
        Ok(posts) => posts,
        Err(e) => {
            log::error!("Failed to load post '{}' for editing: {}", post_id, e);
            set_notification(&session, &e.user_message(), "error");
            return redirect(DASHBOARD_URL);
        }
    };
    match public_helpers::find_post(&posts, &post_id) {
        Some(post) => {
            let ctx = admin_context(&admin, &state, &token);
            editor_page(&tera, ctx, &PostDraft::from(post), Some(post_id.as_str()), None, StatusCode::OK)
        }
        None => {
            set_notification(&session, "Không tìm thấy bài viết.", "error");
            redirect(DASHBOARD_URL)
        }
    }
}

async fn create_post_action(
    admin: AuthenticatedAdmin,
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
    form: Csrf<web::Form<EditorForm>>,
) -> impl Responder {
    let draft = form.into_inner().into_inner().into_draft();

    match admin_helpers::create_post(state.backend(), &admin.access_token, &draft, &state.blog_author).await {
        Ok(()) => {
            set_notification(&session, "Đăng bài viết thành công!", "success");
            redirect(DASHBOARD_URL)
        }
        Err(e) => {
            log::error!("Failed to create post '{}': {}", draft.title, e);
            let ctx = admin_context(&admin, &state, &token);
            editor_page(&tera, ctx, &draft, None, Some(&e.user_message()), StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

async fn update_post_action(
    admin: AuthenticatedAdmin,
    post_id: web::Path<String>,
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
    form: Csrf<web::Form<EditorForm>>,
) -> impl Responder {
    let draft = form.into_inner().into_inner().into_draft();

    match admin_helpers::update_post(state.backend(), &admin.access_token, &post_id, &draft).await {
        Ok(()) => {
            set_notification(&session, "Cập nhật bài viết thành công!", "success");
            redirect(DASHBOARD_URL)
        }
        Err(e) => {
            log::error!("Failed to update post '{}': {}", post_id, e);
            let ctx = admin_context(&admin, &state, &token);
            editor_page(&tera, ctx, &draft, Some(post_id.as_str()), Some(&e.user_message()), StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

async fn delete_post_action(
    admin: AuthenticatedAdmin,
    post_id: web::Path<String>,
    session: Session,
    state: web::Data<AppState>,
    _form: Csrf<web::Form<TokenForm>>,
) -> impl Responder {
    match admin_helpers::delete_post(state.backend(), &admin.access_token, &post_id).await {
        Ok(()) => set_notification(&session, "Đã xóa bài viết.", "success"),
        Err(e) => {
            log::error!("Failed to delete post '{}': {}", post_id, e);
            set_notification(&session, &e.user_message(), "error");
        }
    }
    redirect(DASHBOARD_URL)
}
