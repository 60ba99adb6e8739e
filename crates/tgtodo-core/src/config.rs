//! Shared configuration for tg-todo.
//!
//! # Storage Structure
//!
//! All local data is stored under `~/.tg-todo/`:
//!
//! ```text
//! ~/.tg-todo/
//! ├── config/       # .env.local with overrides
//! └── state/        # storage.json (cached init data, debug override)
//! ```
//!
//! # Environment Variables
//!
//! - `TGTODO_STATE_DIR`: Override the base state directory
//! - `TGTODO_CONFIG_DIR`: Override the config directory
//! - `TGTODO_API_BASE_URL`: Backend base URL (`/api` is appended when missing)

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TGTODO_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "TGTODO_CONFIG_DIR";

/// Environment variable for the backend base URL.
pub const API_BASE_URL_ENV: &str = "TGTODO_API_BASE_URL";

/// Backend used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Timeout applied to every backend request.
pub const API_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_STATE_DIR: &str = ".tg-todo";

const CONFIG_SUBDIR: &str = "config";
const STATE_SUBDIR: &str = "state";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the tg-todo state directory.
///
/// The state directory is determined by:
/// 1. `TGTODO_STATE_DIR` environment variable if set
/// 2. `~/.tg-todo` if home directory is available
/// 3. `.tg-todo` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the user config directory.
///
/// Defaults to `~/.tg-todo/config/` or `TGTODO_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the runtime state directory.
pub fn runtime_state_dir() -> PathBuf {
    state_dir().join(STATE_SUBDIR)
}

/// Get the durable key-value storage file.
///
/// Plays the role browser local storage plays for the web client.
pub fn storage_file() -> PathBuf {
    runtime_state_dir().join("storage.json")
}

/// Get the .env.local file path.
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Load environment overrides.
///
/// The config directory's `.env.local` wins, then a local `.env.local` or
/// `.env`. Missing files are ignored.
pub fn load_env() {
    let env_path = env_file();
    if env_path.exists() {
        if let Err(e) = dotenvy::from_path(&env_path) {
            debug!(path = %env_path.display(), error = %e, "Failed to load env file");
        }
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}

/// Get the backend base URL, normalized.
pub fn api_base_url() -> String {
    let raw = std::env::var(API_BASE_URL_ENV).unwrap_or_default();
    normalize_base_url(&raw)
}

/// Normalize a backend base URL.
///
/// Strips trailing slashes and appends `/api` when missing. An empty value
/// yields [`DEFAULT_API_BASE_URL`].
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_BASE_URL.to_string();
    }
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

/// Ensure the state directory and all subdirectories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(config_dir())?;
    std::fs::create_dir_all(runtime_state_dir())?;
    Ok(())
}
