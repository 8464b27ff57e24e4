use crate::gateways::GatewayError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Gateway(GatewayError),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(message) => SessionError::NotFound(message),
            other => SessionError::Gateway(other),
        }
    }
}

impl SessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Validation(_) => "VALIDATION",
            SessionError::Gateway(_) => "GATEWAY",
            SessionError::NotFound(_) => "NOT_FOUND",
            SessionError::Internal(_) => "INTERNAL",
        }
    }
}
