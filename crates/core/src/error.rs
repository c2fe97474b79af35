/// Errors produced by pure core logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed a validation rule.
    #[error("Validation failed: {0}")]
    Validation(String),
}
