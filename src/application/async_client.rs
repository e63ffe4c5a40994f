/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Async client
//!
//! Same surface and semantics as the blocking [`Client`](crate::application::client::Client);
//! every transport call suspends instead of blocking the thread.

use crate::application::auth::resolve;
use crate::application::config::Settings;
use crate::error::AppError;
use crate::model::http::{AsyncTransport, Query, RawResponse, join_url, merge_headers};
use crate::model::pagination::{PageCursor, page_stream};
use crate::model::requests::GetOptions;
use crate::model::response::AsyncClientResponse;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolved async client
#[derive(Debug, Clone)]
pub struct AsyncClient {
    settings: Arc<Settings>,
    transport: AsyncTransport,
}

impl AsyncClient {
    /// Resolves `settings` into a client, logging in first for session auth
    ///
    /// # Errors
    /// `MissingSettings` when no base URL is configured, otherwise any error of
    /// [`resolve`].
    pub async fn create(settings: Settings) -> Result<Self, AppError> {
        if settings.base_url.is_empty() {
            return Err(AppError::MissingSettings);
        }
        let resolved = resolve(&settings).await?;
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
    pub fn transport(&self) -> &AsyncTransport {
        &self.transport
    }

    /// Sends one request relative to the base URL
    pub async fn request(
        &self,
        method: Method,
        ext: &str,
        params: Option<&Query>,
        body: Option<&Value>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<RawResponse, AppError> {
        let url = join_url(&self.settings.base_url, ext);
        let headers = merge_headers(&self.settings.headers, custom_headers);
        let response = self
            .transport
            .send(method, &url, &headers, params, body)
            .await?;
        if !response.is_success() {
            warn!("{} returned status {}", url, response.status);
        }
        Ok(response)
    }

    /// Makes a GET request, paginating when the options ask for it
    pub async fn get(
        &self,
        ext: &str,
        options: GetOptions,
    ) -> Result<AsyncClientResponse, AppError> {
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
                let (first, items) =
                    page_stream(self.transport.clone(), url, headers, cursor).await?;
                Ok(AsyncClientResponse::from_paginated(first, items))
            }
            None => {
                let response = self
                    .request(
                        Method::GET,
                        ext,
                        params.as_ref(),
                        None,
                        custom_headers.as_ref(),
                    )
                    .await?;
                AsyncClientResponse::from_raw(response, data_key.as_deref())
            }
        }
    }

    /// Makes a POST request with an optional JSON body
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        ext: &str,
        body: Option<&B>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::POST, ext, None, body.as_ref(), custom_headers)
            .await?
            .deserialize()
    }

    /// Makes a PUT request with an optional JSON body
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        ext: &str,
        body: Option<&B>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PUT, ext, None, body.as_ref(), custom_headers)
            .await?
            .deserialize()
    }

    /// Makes a DELETE request
    pub async fn delete<T: DeserializeOwned>(
        &self,
        ext: &str,
        params: Option<&Query>,
        custom_headers: Option<&HashMap<String, String>>,
    ) -> Result<T, AppError> {
        self.request(Method::DELETE, ext, params, None, custom_headers)
            .await?
            .deserialize()
    }
}
