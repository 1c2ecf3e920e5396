//! Login Engine
//!
//! This library contains the core logic for the login gateway. It is transport-agnostic: nothing in here knows about
//! the HTTP server that fronts it.
//!
//! The library is divided into the following sections:
//! 1. The credential store ([`mod@credentials`]). An in-memory list of usernames and passwords, loaded once at startup
//!    and appended to when a new user registers.
//! 2. The customer directory ([`mod@directory`]). The [`CustomerDirectory`] trait describes the remote capabilities
//!    the gateway relies on (searching for customers, and creating addresses, cards and customers).
//!    [`HttpCustomerDirectory`] is the production implementation that talks to the accounts service over HTTP.
//! 3. The public API ([`mod@le_api`]). [`IdentityApi`] resolves a username into a canonical customer identity, and
//!    [`RegistrationApi`] orchestrates the multi-step creation of a new customer.
//!
//! The data contracts shared by all of the above live in [`mod@directory_types`].
pub mod credentials;
pub mod directory;
pub mod directory_types;
pub mod le_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use credentials::{Credential, CredentialStore, CredentialStoreError};
pub use directory::{CustomerDirectory, DirectoryConfig, DirectoryError, HttpCustomerDirectory};
pub use le_api::{
    errors::{IdentityError, RegistrationError, RegistrationProgress, RegistrationStep},
    identity_api::IdentityApi,
    registration_api::RegistrationApi,
};
