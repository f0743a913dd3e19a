use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// The message without the variant prefix, suitable for API clients.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidReference(m) | Self::NotFound(m) | Self::Storage(m) => m.clone(),
            Self::Model(e) => e.message().to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Storage(e.to_string()) }
}
