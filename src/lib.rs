pub mod error;
pub mod handlers;
pub mod signature;
pub mod sync;

use axum::{Router, routing};
use error::HookError;
use handlers::handle_hook;
use std::path::PathBuf;
use std::sync::Arc;
use sync::Synchronizer;
use tokio::sync::Mutex;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Immutable process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct HookConfig {
    /// Shared webhook secret. Never logged or echoed in responses.
    pub secret: String,
    /// Path to the working copy that gets pulled.
    pub repo_dir: PathBuf,
    pub listen_addr: String,
}

impl HookConfig {
    /// Builds the configuration from environment variables.
    /// `GITHUB_SECRET` and `REPO_DIR` are required and must be non-empty;
    /// `LISTEN_ADDR` defaults to [`DEFAULT_LISTEN_ADDR`].
    pub fn from_env() -> Result<Self, HookError> {
        let secret = std::env::var("GITHUB_SECRET").unwrap_or_default();
        let repo_dir = std::env::var("REPO_DIR").unwrap_or_default();
        if secret.is_empty() || repo_dir.is_empty() {
            return Err(HookError::Config(
                "GITHUB_SECRET and REPO_DIR environment variables must be set".to_string(),
            ));
        }

        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        Ok(Self {
            secret,
            repo_dir: PathBuf::from(repo_dir),
            listen_addr,
        })
    }
}

pub struct AppState {
    /// Single-flight guard: at most one sync invocation runs at a time.
    pub sync_lock: Mutex<()>,
    pub config: HookConfig,
    pub synchronizer: Arc<dyn Synchronizer>,
}

pub type SharedState = Arc<AppState>;

/// Builds the application router: the single trigger endpoint. Other
/// methods on the route are answered 405 by axum's method routing.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/hook", routing::post(handle_hook))
        .with_state(state)
}
