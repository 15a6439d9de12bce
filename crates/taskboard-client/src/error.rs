/*
[INPUT]:  Adapter errors, settings errors, storage errors
[OUTPUT]: Unified error type for client construction and wiring
[POS]:    Error handling layer - failures that escape component boundaries
[UPDATE]: When adding new fallible construction paths
*/

use taskboard_adapter::ApiError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while building or wiring client components.
///
/// Component operations (session, tasks) never return these; they report
/// through published state and notifications instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client could not be built
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Settings could not be read or merged
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    /// Settings were read but are not usable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A probe worker is already running for this probe
    #[error("Connectivity probe already running")]
    ProbeAlreadyRunning,
}

pub type Result<T> = std::result::Result<T, ClientError>;
