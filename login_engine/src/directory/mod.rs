//! # Customer directory
//!
//! The accounts service owns customers, addresses and cards. The gateway only ever needs four things from it, and
//! those are captured by the [`CustomerDirectory`] trait. Any backend that implements this trait can be plugged into
//! [`crate::IdentityApi`] and [`crate::RegistrationApi`].
mod config;
mod errors;
mod http;

pub use config::DirectoryConfig;
pub use errors::DirectoryError;
pub use http::HttpCustomerDirectory;

use crate::directory_types::{Address, Card, CustomerDirectoryEntry, CustomerProfile};

/// The remote capabilities of the accounts service.
///
/// Every method is a single best-effort call. Implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait CustomerDirectory {
    /// Searches for customers with the given username. The entries are returned in the order the directory lists
    /// them. An empty list is not an error.
    async fn find_customers_by_username(&self, username: &str) -> Result<Vec<CustomerDirectoryEntry>, DirectoryError>;

    /// Creates an address resource and returns its link.
    async fn create_address(&self, address: &Address) -> Result<String, DirectoryError>;

    /// Creates a card resource and returns its link.
    async fn create_card(&self, card: &Card) -> Result<String, DirectoryError>;

    /// Creates a customer resource. The link to the new customer is returned if the directory supplied one.
    async fn create_customer(&self, customer: &CustomerProfile) -> Result<Option<String>, DirectoryError>;
}
