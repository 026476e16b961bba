//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Raised by the storage dispatcher when it first touches the active backend.
///
/// Resolution never produces these; they surface at point of use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("unknown storage backend '{0}' (expected one of: local, qiniu, s3, oss, tencentcloud)")]
    UnknownBackend(String),

    #[error("no download url configured for storage backend '{backend}'")]
    MissingDownloadUrl { backend: &'static str },
}

/// Terminal error handed back to the cache-store client when it must stop
/// reconnecting. Pending commands are flushed with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReconnectError {
    #[error("the server refused the connection")]
    ConnectionRefused,

    #[error("retry time exhausted")]
    RetryTimeExhausted,
}
