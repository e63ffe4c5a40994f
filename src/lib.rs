/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # HTTP Client Utils
//!
//! Builds authenticated HTTP clients from declarative settings and exposes a
//! uniform request surface, including a page-number pagination protocol that
//! flattens multi-page list responses into one lazy sequence.
//!
//! Two client families share the same semantics:
//! - [`Client`](application::client::Client) blocks the calling thread
//! - [`AsyncClient`](application::async_client::AsyncClient) suspends on I/O
//!
//! ## Authentication
//!
//! | mode | effect |
//! |---|---|
//! | `NONE` | nothing injected |
//! | `TOKEN` | `Authorization: Bearer <token>` |
//! | `CUSTOM_TOKEN_HEADER` | `<header>: <token>` |
//! | `BASIC` | HTTP Basic on every request |
//! | `SESSION` | login request, cookies attached to the client |
//!
//! ## Example
//!
//! ```ignore
//! use http_client_utils::prelude::*;
//!
//! let client = ClientBuilder::new()
//!     .set_base_url("https://api.example.com")
//!     .set_auth_type(AuthType::Session)
//!     .set_login_url("https://api.example.com/login")
//!     .set_basic_auth("user", "pass")
//!     .set_login_status(&[201])?
//!     .set_data_key("results")
//!     .async_build()
//!     .await?;
//!
//! let mut response = client.get("/items", GetOptions::new().paginate_with("page", 50)).await?;
//! while let Some(item) = response.next_item().await {
//!     println!("{}", item?);
//! }
//! ```

/// Clients, builder, settings and auth resolution
pub mod application;
/// Crate wide constants
pub mod constants;
/// Error type
pub mod error;
/// Transport, pagination and response models
pub mod model;
/// Commonly used re-exports
pub mod prelude;
/// Environment and logging helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
