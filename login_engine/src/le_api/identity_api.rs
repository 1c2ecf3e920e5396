//! Resolves usernames into canonical customer identities.

use std::fmt::Debug;

use log::*;
use url::Url;

use crate::{
    directory::CustomerDirectory,
    directory_types::{CustomerDirectoryEntry, LoginResponse},
    le_api::errors::IdentityError,
};

/// The `IdentityApi` looks users up in the customer directory.
pub struct IdentityApi<B> {
    directory: B,
}

impl<B: Debug> Debug for IdentityApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityApi ({:?})", self.directory)
    }
}

impl<B> IdentityApi<B>
where B: CustomerDirectory
{
    pub fn new(directory: B) -> Self {
        Self { directory }
    }

    /// Finds the directory entry for `username`.
    ///
    /// If the directory returns more than one match, the first one wins. The directory does not guarantee uniqueness
    /// of usernames, and no attempt is made to pick a "better" match.
    pub async fn resolve(&self, username: &str) -> Result<CustomerDirectoryEntry, IdentityError> {
        let entries = self.directory.find_customers_by_username(username).await?;
        if entries.len() > 1 {
            warn!("The directory returned {} customers for {username}. Using the first one.", entries.len());
        }
        entries.into_iter().next().ok_or_else(|| IdentityError::NoSuchCustomer(username.to_string()))
    }

    /// Resolves `username` and assembles the response returned to a client that has just logged in.
    pub async fn login_response(&self, username: &str) -> Result<LoginResponse, IdentityError> {
        let entry = self.resolve(username).await?;
        let id = customer_id_from_link(&entry.customer_link)?;
        debug!("Customer id: {id}");
        Ok(LoginResponse { username: entry.username, customer: entry.customer_link, id })
    }
}

/// Extracts the customer id from a customer link, i.e. the final segment of its path.
///
/// `http://accounts/customers/42` → `42`
pub fn customer_id_from_link(link: &str) -> Result<String, IdentityError> {
    let malformed = || IdentityError::MalformedLink(link.to_string());
    let url = Url::parse(link).map_err(|_| malformed())?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(malformed)
}
