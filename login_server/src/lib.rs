//! # Login server
//! This crate hosts the HTTP front end of the login gateway. It is responsible for:
//! Authenticating users with HTTP Basic Auth against the credential store.
//! Resolving authenticated users to their customer record in the accounts service.
//! Registering new users, which creates an address, a card and a customer in the accounts service.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/login`: Basic Auth login. Returns `{username, customer, id}` for the authenticated user.
//! * `/register`: Creates a new customer and adds them to the credential store.

pub mod cli;
pub mod config;
pub mod errors;

pub mod helpers;
pub mod routes;
pub mod server;
