use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to resolve main module: {0}")]
    ModuleResolveFailed(String),

    #[error("Failed to query file version: {0}")]
    VersionQueryFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Failed to write process memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u64, message: String },

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Failed to register hotkey: {0}")]
    HotkeyRegistrationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
