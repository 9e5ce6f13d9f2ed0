use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("push channel could not be opened: {0}")]
    Http(String),
}
