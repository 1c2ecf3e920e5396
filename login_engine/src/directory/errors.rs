use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Could not initialize the directory client: {0}")]
    Initialization(String),
    #[error("{0} is not a valid customer directory URL")]
    InvalidUrl(String),
    #[error("Could not reach the customer directory: {0}")]
    Transport(String),
    #[error("The customer directory rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("The customer directory did not return a Location for the new {0}")]
    MissingLocation(String),
    #[error("Could not deserialize the directory response: {0}")]
    Json(String),
}

impl DirectoryError {
    /// True if the request never produced an HTTP response (connection refused, timeout, etc.)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
