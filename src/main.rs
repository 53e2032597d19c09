use actix_cors::Cors;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware::{DefaultHeaders, Logger}, web, App, HttpServer};
use blogshare::{config::Config, routes, AppState};
use clap::Parser;
use std::convert::TryFrom;
use std::path::PathBuf;
use tera::Tera;

#[derive(Parser, Debug)]
#[command(name = "blogshare_server", author, version, about = "Starts the BlogShare web front end.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn startup_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

/// The server's own origin is always allowed; browsers send `Origin` on
/// same-site form posts too.
fn build_cors(allowed_origins: &str, own_origin: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && *s != own_origin)
            .fold(Cors::default().allowed_origin(own_origin), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![actix_web::http::header::ACCEPT, actix_web::http::header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let config = Config::from_env(&cli.env_file)
        .map_err(|e| startup_error(format!("Failed to load configuration: {}", e)))?;

    // Initialize logger using the value from config
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = Tera::new("templates/**/*.html")
        .map_err(|e| startup_error(format!("Tera initialization failed: {}", e)))?;

    let app_state = web::Data::new(
        AppState::from_config(&config).map_err(|e| startup_error(format!("Failed to build clients: {}", e)))?,
    );

    let session_key_bytes = hex::decode(&config.session_secret_key)
        .map_err(|_| startup_error("SESSION_SECRET_KEY in .env is not a valid hex string.".to_string()))?;
    let session_key = Key::try_from(session_key_bytes.as_slice())
        .map_err(|_| startup_error("The decoded SESSION_SECRET_KEY is too short (64 bytes required).".to_string()))?;

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    let own_origin = format!("http://{}", server_address);
    log::info!(
        "Server starting at http://{} ({} data)",
        server_address,
        if config.is_mock_mode() { "mock" } else { "live" }
    );

    let tera = web::Data::new(tera);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
            .cookie_secure(config.use_secure_cookies)
            .cookie_http_only(true)
            .cookie_same_site(actix_web::cookie::SameSite::Lax)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(build_cors(&config.allowed_origins, &own_origin))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .app_data(tera.clone())
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(16 * 1024))
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
