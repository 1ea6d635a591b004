//! Server startup errors.

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("failed to open database {path}: {source}")]
    Database {
        path: String,
        #[source]
        source: RepositoryError,
    },
}
