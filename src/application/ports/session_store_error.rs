#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}
