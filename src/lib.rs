//! Retell inbound-call personalization server.
//!
//! Loads contacts from a delimited file into an in-memory index keyed by the
//! last 10 digits of each phone number, then answers Retell's inbound
//! webhook (`POST /retell-webhook`) with the caller's name and account
//! reference as dynamic variables. `GET /health` reports the index size.

pub mod config;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod phone;
pub mod protocol;
pub mod server;
pub mod store;

pub mod schema;
