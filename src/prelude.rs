/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! # Prelude
//!
//! ```rust
//! use http_client_utils::prelude::*;
//!
//! let builder = ClientBuilder::new()
//!     .set_base_url("https://api.example.com")
//!     .set_auth_type(AuthType::Token)
//!     .set_token("secret");
//! assert_eq!(builder.settings().auth_type, AuthType::Token);
//! ```

// ============================================================================
// CONFIGURATION AND CONSTRUCTION
// ============================================================================

pub use crate::application::builder::ClientBuilder;
pub use crate::application::config::{AuthType, LoginEncoding, Settings};
pub use crate::{VERSION, version};

// ============================================================================
// CLIENTS
// ============================================================================

pub use crate::application::async_client::AsyncClient;
pub use crate::application::auth::{AuthStrategy, Resolved};
pub use crate::application::client::Client;

// ============================================================================
// REQUESTS AND RESPONSES
// ============================================================================

pub use crate::model::http::{AsyncTransport, BlockingTransport, Query, RawResponse, join_url};
pub use crate::model::pagination::{PageCursor, Pagination, Paginator};
pub use crate::model::requests::GetOptions;
pub use crate::model::response::{AsyncClientResponse, ClientResponse, Items};

// ============================================================================
// ERRORS, CONSTANTS, UTILITIES
// ============================================================================

pub use crate::constants::*;
pub use crate::error::{AppError, AppResult};
pub use crate::utils::logger::setup_logger;

// ============================================================================
// RE-EXPORTS FROM EXTERNAL CRATES
// ============================================================================

pub use futures::StreamExt;
pub use reqwest::Method;
pub use serde_json::{Value, json};
pub use tracing::{debug, error, info, warn};
