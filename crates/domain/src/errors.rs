use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// レコードの所有者以外による変更・削除
    #[error("Not authorized to modify this {entity}")]
    NotOwned { entity: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("Invalid identifier: {0}")]
    MalformedIdentifier(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
