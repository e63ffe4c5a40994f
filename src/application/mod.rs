/// Async client
pub mod async_client;
/// Auth mode resolution into transport handles
pub mod auth;
/// Client builder
pub mod builder;
/// Blocking client
pub mod client;
/// Settings and auth modes
pub mod config;
