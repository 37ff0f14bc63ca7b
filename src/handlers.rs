use crate::SharedState;
use crate::signature::verify_signature;
use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, info};

/// Handles the webhook POST request: validates content type and signature
/// header, verifies the HMAC over the raw body, then pulls the working copy.
///
/// Checks short-circuit in order; no synchronization runs for a rejected
/// request. The body is consumed exactly once, by the `Bytes` extractor
/// (an unreadable body is rejected 400 before this handler runs).
pub async fn handle_hook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if content_type != Some("application/json") {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, "invalid content type");
    }

    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        return (StatusCode::BAD_REQUEST, "missing signature");
    }

    if !verify_signature(&state.config.secret, &body, signature) {
        error!("Signature verification failed");
        return (StatusCode::UNAUTHORIZED, "invalid signature");
    }

    // Serialize pulls against the shared working copy. An overlapping
    // delivery waits for the in-flight pull, then runs its own.
    let _guard = state.sync_lock.lock().await;

    match state.synchronizer.pull(&state.config.repo_dir).await {
        Ok(_) => {
            info!(
                "successfully pulled latest changes in {}",
                state.config.repo_dir.display()
            );
            (StatusCode::OK, "OK")
        }
        Err(e) => {
            // The error carries the captured command output
            error!("git pull failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "deploy failed")
        }
    }
}
