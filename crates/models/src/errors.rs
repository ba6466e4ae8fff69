use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("product fields must be a JSON object, got {0}")]
    NotAnObject(String),
    #[error("invalid product id: {0}")]
    InvalidId(String),
    #[error("no product id left after {0}")]
    IdSpaceExhausted(u64),
}
