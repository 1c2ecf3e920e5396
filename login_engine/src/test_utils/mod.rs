//! Test helpers for crates that build on the engine. Enable the `test_utils` feature to use them outside this crate.
use mockall::mock;

use crate::{
    directory::{CustomerDirectory, DirectoryError},
    directory_types::{Address, Card, CustomerDirectoryEntry, CustomerProfile},
};

mock! {
    pub Directory {}
    impl CustomerDirectory for Directory {
        async fn find_customers_by_username(&self, username: &str) -> Result<Vec<CustomerDirectoryEntry>, DirectoryError>;
        async fn create_address(&self, address: &Address) -> Result<String, DirectoryError>;
        async fn create_card(&self, card: &Card) -> Result<String, DirectoryError>;
        async fn create_customer(&self, customer: &CustomerProfile) -> Result<Option<String>, DirectoryError>;
    }
}
