use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChooseeError>;

#[derive(Debug, Error)]
pub enum ChooseeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status { status: StatusCode, url: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid phone number")]
    InvalidPhoneNumber,

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChooseeError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}
