/// Custom error type for reposync operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {operation}\n{message}")]
    GitOperationFailed { operation: String, message: String },
}

/// Helper type for Results that use HookError
pub type Result<T> = std::result::Result<T, HookError>;
