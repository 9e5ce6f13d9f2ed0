use thiserror::Error;

use super::api::ApiError;
use super::store::StoreError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to write snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
