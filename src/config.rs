use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use config; // Explicitly import the config crate

/// Values the client bootstrap ships with when nothing else is configured.
/// They are never treated as real credentials.
pub const PLACEHOLDER_URL: &str = "https://placeholder-url.supabase.co";
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

pub const BACKEND_URL_KEYS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
pub const BACKEND_KEY_KEYS: &[&str] = &["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];
pub const CHAT_KEY_KEYS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_CHAT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_AUTHOR: &str = "Thắng Phạm";

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BackendCredentials {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub log_level: String,
    pub session_secret_key: String,
    pub allowed_origins: String,
    pub use_secure_cookies: bool,
    pub blog_author: String,
    pub http_timeout_secs: u64,
    /// `None` means mock-data mode.
    pub backend: Option<BackendCredentials>,
    pub chat: ChatConfig,
}

/// One place a setting may come from. Sources are consulted in order.
#[derive(Debug, Default, Clone)]
pub struct EnvSource {
    pub name: &'static str,
    pub values: HashMap<String, String>,
}

impl EnvSource {
    pub fn new(name: &'static str, values: HashMap<String, String>) -> Self {
        EnvSource { name, values }
    }

    pub fn process() -> Self {
        EnvSource::new("process environment", env::vars().collect())
    }

    /// Reads a `.env` file without touching the process environment.
    pub fn dotenv_file(path: &Path) -> Result<Self, config::ConfigError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| config::ConfigError::Message(format!(
            "FATAL: Failed to load .env file from '{}'. Error: {}", path.display(), e
        )))?;
        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| config::ConfigError::Message(format!(
                "FATAL: Malformed line in .env file '{}'. Error: {}", path.display(), e
            )))?;
            values.insert(key, value);
        }
        Ok(EnvSource::new(".env file", values))
    }

    /// Flattens the `[backend]` and `[chat]` tables of the TOML defaults into
    /// the same upper-case keys the environment uses.
    pub fn toml_defaults(file: &config::Config) -> Self {
        let mut values = HashMap::new();
        let lookups = [
            ("backend.url", "SUPABASE_URL"),
            ("backend.anon_key", "SUPABASE_ANON_KEY"),
            ("chat.api_key", "GEMINI_API_KEY"),
        ];
        for (path, key) in lookups {
            if let Ok(value) = file.get_string(path) {
                values.insert(key.to_string(), value);
            }
        }
        EnvSource::new("config/default.toml", values)
    }
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == PLACEHOLDER_URL || value == PLACEHOLDER_KEY
}

/// Walks the sources in priority order and returns the first usable value for
/// any of `keys`. Within one source the aliases are tried in order.
pub fn resolve_setting(sources: &[EnvSource], keys: &[&str]) -> Option<String> {
    for source in sources {
        for key in keys {
            if let Some(value) = source.values.get(*key) {
                if !is_placeholder(value) {
                    log::debug!("Resolved {} from {}", key, source.name);
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

/// Both halves must resolve; a URL without a key (or the reverse) is as good
/// as nothing and drops the application into mock-data mode.
pub fn resolve_backend_credentials(sources: &[EnvSource]) -> Option<BackendCredentials> {
    let url = resolve_setting(sources, BACKEND_URL_KEYS);
    let anon_key = resolve_setting(sources, BACKEND_KEY_KEYS);
    match (url, anon_key) {
        (Some(url), Some(anon_key)) => Some(BackendCredentials { url, anon_key }),
        (Some(_), None) => {
            log::warn!("Backend URL is set but no anon key was found. Serving mock data.");
            None
        }
        (None, Some(_)) => {
            log::warn!("Backend anon key is set but no URL was found. Serving mock data.");
            None
        }
        (None, None) => None,
    }
}

fn setting_or(sources: &[EnvSource], key: &str, default: &str) -> String {
    resolve_setting(sources, &[key]).unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        let dotenv = EnvSource::dotenv_file(env_path)?;

        let file = config::Config::builder()
            // Load base settings from the TOML file (e.g., for web host/port).
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml).required(false))
            .build()?;

        let sources = vec![EnvSource::process(), dotenv, EnvSource::toml_defaults(&file)];
        let web = file.get::<WebConfig>("web").unwrap_or_default();
        Self::from_sources(&sources, web)
    }

    pub fn from_sources(sources: &[EnvSource], web: WebConfig) -> Result<Self, config::ConfigError> {
        let session_secret_key = resolve_setting(sources, &["SESSION_SECRET_KEY"])
            .ok_or_else(|| config::ConfigError::Message(
                "FATAL: Environment variable 'SESSION_SECRET_KEY' is not set in your .env file.".to_string()
            ))?;

        // 128 hex characters decode to the 64 bytes the cookie key needs.
        if session_secret_key.len() != 128 || !session_secret_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(config::ConfigError::Message(
                "FATAL: 'SESSION_SECRET_KEY' must be 128 hexadecimal characters long (64 bytes).".to_string()
            ));
        }

        let http_timeout_secs = setting_or(sources, "HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|_| config::ConfigError::Message(
                "FATAL: 'HTTP_TIMEOUT_SECS' must be a whole number of seconds.".to_string()
            ))?;

        let use_secure_cookies = setting_or(sources, "USE_SECURE_COOKIES", "false")
            .parse::<bool>()
            .unwrap_or(false);

        let backend = resolve_backend_credentials(sources);
        if let Some(creds) = &backend {
            url::Url::parse(&creds.url).map_err(|e| config::ConfigError::Message(format!(
                "FATAL: Backend URL '{}' is not a valid URL: {}", creds.url, e
            )))?;
        }

        let chat = ChatConfig {
            api_key: resolve_setting(sources, CHAT_KEY_KEYS),
            model: setting_or(sources, "CHAT_MODEL", DEFAULT_CHAT_MODEL),
            api_base: setting_or(sources, "CHAT_API_BASE", DEFAULT_CHAT_API_BASE),
        };

        Ok(Config {
            web,
            log_level: setting_or(sources, "LOG_LEVEL", "info"),
            session_secret_key,
            allowed_origins: setting_or(sources, "ALLOWED_ORIGINS", ""),
            use_secure_cookies,
            blog_author: setting_or(sources, "BLOG_AUTHOR", DEFAULT_AUTHOR),
            http_timeout_secs,
            backend,
            chat,
        })
    }

    pub fn is_mock_mode(&self) -> bool {
        self.backend.is_none()
    }
}
