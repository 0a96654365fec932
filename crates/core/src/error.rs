#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid spam filter configuration: {0}")]
    SpamConfig(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
