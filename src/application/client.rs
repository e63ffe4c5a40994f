/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Blocking client
//!
//! # Example
//! ```ignore
//! use http_client_utils::prelude::*;
//!
//! let client = ClientBuilder::new()
//!     .set_base_url("https://api.example.com")
//!     .set_auth_type(AuthType::Token)
//!     .set_token("secret")
//!     .build()?;
//!
//! let mut users = client.get("/users", GetOptions::new().paginate())?;
//! for user in users.data() {
//!     println!("{}", user?);
//! }
//! ```

use crate::application::auth::resolve_blocking;
use crate::application::config::Settings;
use crate::error::AppError;
use crate::model::http::{BlockingTransport, Query, RawResponse, join_url, merge_headers};
use crate::model::pagination::{PageCursor, Paginator};
use crate::model::requests::GetOptions;
use crate::model::response::ClientResponse;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolved blocking client
///
/// Owns one transport handle and the settings it was resolved from. Both are
/// read-only, so clones share them freely.
#[derive(Debug, Clone)]
pub struct Client {
    settings: Arc<Settings>,
    transport: BlockingTransport,
}

impl Client {
    /// Resolves `settings` into a client, logging in first for session auth
    ///
    /// # Errors
    /// `MissingSettings` when no base URL is configured, otherwise any error of
    /// [`resolve_blocking`].
    pub fn create(settings: Settings) -> Result<Self, AppError> {
        if settings.base_url.is_empty() {
            return Err(AppError::MissingSettings);
        }
        let resolved = resolve_blocking(&settings)?;
        Ok(Self {
            settings: Arc::new(resolved.settings),
            transport: resolved.transport,
        })
    }

    /// Resolved settings, including injected auth headers
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Underlying transport handle
    #[must_use]
    pub fn transport(&self) -> &BlockingTransport {
        &self.transport
    }

    /// Sends one request relative to the base URL
    ///
    /// Non-2xx statuses are returned, not turned into errors.
    pub fn request(
        &self,
        method: Method,
        ext: &str,
        params: Option<&Query>,
        body: Option<&Value>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<RawResponse, AppError> {
        let url = join_url(&self.settings.base_url, ext);
        let headers = merge_headers(&self.settings.headers, custom_headers);
        let response = self.transport.send(method, &url, &headers, params, body)?;
        if !response.is_success() {
            warn!("{} returned status {}", url, response.status);
        }
        Ok(response)
    }

    /// Makes a GET request, paginating when the options ask for it
    ///
    /// The data key of the options wins over the configured one. With
    /// pagination the first page is fetched now and later pages on demand.
    pub fn get(&self, ext: &str, options: GetOptions) -> Result<ClientResponse, AppError> {
        let GetOptions {
            params,
            custom_headers,
            custom_data_key,
            pagination,
        } = options;
        let data_key = custom_data_key.or_else(|| self.settings.data_key.clone());

        match pagination {
            Some(pagination) => {
                let url = join_url(&self.settings.base_url, ext);
                let headers = merge_headers(&self.settings.headers, custom_headers.as_ref());
                let cursor = PageCursor::new(params, &pagination, data_key)?;
                debug!(
                    "Paginating {} by {} with limit {}",
                    url, pagination.page_key, pagination.limit
                );
                let (first, paginator) =
                    Paginator::start(self.transport.clone(), url, headers, cursor)?;
                Ok(ClientResponse::from_paginated(first, paginator))
            }
            None => {
                let response = self.request(
                    Method::GET,
                    ext,
                    params.as_ref(),
                    None,
                    custom_headers.as_ref(),
                )?;
                ClientResponse::from_raw(response, data_key.as_deref())
            }
        }
    }

    /// Makes a POST request with an optional JSON body
    pub fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        ext: &str,
        body: Option<&B>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::POST, ext, None, body.as_ref(), custom_headers)?
            .deserialize()
    }

    /// Makes a PUT request with an optional JSON body
    pub fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        ext: &str,
        body: Option<&B>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PUT, ext, None, body.as_ref(), custom_headers)?
            .deserialize()
    }

    /// Makes a DELETE request
    pub fn delete<T: DeserializeOwned>(
        &self,
        ext: &str,
        params: Option<&Query>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        self.request(Method::DELETE, ext, params, None, custom_headers)?
            .deserialize()
    }
}
