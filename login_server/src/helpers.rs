use actix_web::{http::header::AUTHORIZATION, HttpRequest};
use log::trace;
use login_common::Secret;

use crate::errors::AuthError;

#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Extracts the username and password from an `Authorization: Basic <base64(username:password)>` header.
///
/// The scheme is matched case-insensitively. The password is everything after the first `:`, so it may itself
/// contain colons.
pub fn basic_auth(req: &HttpRequest) -> Result<BasicCredentials, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingCredentials)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedCredentials(e.to_string()))?;
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::PoorlyFormattedCredentials("Missing credentials".to_string()))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::PoorlyFormattedCredentials(format!("Unsupported scheme: {scheme}")));
    }
    trace!("Decoding Basic Auth credentials");
    let decoded =
        base64::decode(encoded.trim()).map_err(|e| AuthError::PoorlyFormattedCredentials(e.to_string()))?;
    let decoded = String::from_utf8(decoded).map_err(|e| AuthError::PoorlyFormattedCredentials(e.to_string()))?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::PoorlyFormattedCredentials("Missing ':' separator".to_string()))?;
    Ok(BasicCredentials { username: username.to_string(), password: Secret::new(password.to_string()) })
}
