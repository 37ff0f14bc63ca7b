use reposync::sync::{GitSynchronizer, Synchronizer};
use reposync::{AppState, HookConfig, router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match HookConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let synchronizer = Arc::new(GitSynchronizer);

    // Fail fast with a clear message instead of failing on the first request
    if let Err(e) = synchronizer.check_working_tree(&config.repo_dir).await {
        eprintln!(
            "REPO_DIR {} is not a valid git repository: {}",
            config.repo_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState {
        sync_lock: Mutex::new(()),
        config,
        synchronizer,
    });

    let app = router(state);
    info!("Listening on {}", listen_addr);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
