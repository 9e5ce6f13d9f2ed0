use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("could not determine a data directory")]
    NoDataDir,
}
