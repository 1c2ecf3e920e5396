use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use login_engine::{CredentialStoreError, IdentityError, RegistrationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    CouldNotDeserializePayload(String),
    #[error("Registration failed. {0}")]
    RegistrationFailed(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The customer directory could not be queried.")]
    DirectoryUnavailable,
    #[error("Could not serialize the response. {0}")]
    CouldNotSerializeResponse(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload(_) => StatusCode::BAD_REQUEST,
            Self::RegistrationFailed(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::DirectoryUnavailable => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotSerializeResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The reason for an authentication failure stays in the logs
        let message = match self {
            Self::AuthenticationError(_) => "Unauthorized".to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No Authorization header present.")]
    MissingCredentials,
    #[error("Authorization header is not valid Basic Auth. {0}")]
    PoorlyFormattedCredentials(String),
    #[error("User {0} not authorized.")]
    InvalidCredentials(String),
    #[error("No customer found for {0}.")]
    CustomerNotFound(String),
}

impl From<IdentityError> for ServerError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NoSuchCustomer(username) => Self::AuthenticationError(AuthError::CustomerNotFound(username)),
            IdentityError::MalformedLink(_) | IdentityError::Directory(_) => {
                // The downstream detail may include the directory's raw response, so it only goes to the logs
                warn!("Customer lookup failed. {e}");
                Self::DirectoryUnavailable
            },
        }
    }
}

impl From<RegistrationError> for ServerError {
    fn from(e: RegistrationError) -> Self {
        Self::RegistrationFailed(format!("Could not create {}.", e.step))
    }
}

impl From<CredentialStoreError> for ServerError {
    fn from(e: CredentialStoreError) -> Self {
        Self::InitializeError(e.to_string())
    }
}
