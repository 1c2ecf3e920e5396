//! # Login engine public API
//!
//! * [`identity_api`] turns a username into a canonical customer identity by searching the customer directory.
//! * [`registration_api`] performs the ordered address → card → customer creation flow for new users.
//!
//! Both APIs are created by supplying a backend that implements [`crate::CustomerDirectory`]:
//!
//! ```rust,ignore
//! use login_engine::{DirectoryConfig, HttpCustomerDirectory, IdentityApi};
//! let directory = HttpCustomerDirectory::new(DirectoryConfig::default())?;
//! let api = IdentityApi::new(directory);
//! let login = api.login_response("alice").await?;
//! ```
pub mod errors;
pub mod identity_api;
pub mod registration_api;
