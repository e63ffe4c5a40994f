/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Response wrappers returned by `get`
//!
//! Both wrappers expose the status and headers of the first (or only) page and
//! a single-pass sequence of payload items. Draining the sequence a second
//! time yields nothing.

use crate::error::AppError;
use crate::model::http::RawResponse;
use crate::model::pagination::{Paginator, extract_payload};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use std::collections::HashMap;

/// Items of a blocking response
pub enum Items {
    /// The single, already resolved item of a non-paginated call
    Single(Option<Result<Value, AppError>>),
    /// Lazy items of a paginated call
    Paged(Paginator),
}

impl Iterator for Items {
    type Item = Result<Value, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Items::Single(item) => item.take(),
            Items::Paged(paginator) => paginator.next(),
        }
    }
}

impl std::iter::FusedIterator for Items {}

/// Response of a blocking `get`
pub struct ClientResponse {
    /// HTTP status of the first page
    pub status_code: u16,
    /// Headers of the first page
    pub headers: HashMap<String, String>,
    data: Items,
}

impl std::fmt::Debug for ClientResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientResponse")
            .field("status_code", &self.status_code)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl ClientResponse {
    /// Wraps a non-paginated response
    ///
    /// The body is parsed and unwrapped now; a missing data key becomes the
    /// single `Err` item.
    pub fn from_raw(response: RawResponse, data_key: Option<&str>) -> Result<Self, AppError> {
        let item = extract_payload(response.json()?, data_key);
        Ok(Self {
            status_code: response.status,
            headers: response.headers,
            data: Items::Single(Some(item)),
        })
    }

    /// Wraps the first page response and the paginator that continues it
    #[must_use]
    pub fn from_paginated(first: RawResponse, paginator: Paginator) -> Self {
        Self {
            status_code: first.status,
            headers: first.headers,
            data: Items::Paged(paginator),
        }
    }

    /// The single-pass item sequence
    pub fn data(&mut self) -> &mut Items {
        &mut self.data
    }

    /// Takes the item sequence, dropping status and headers
    #[must_use]
    pub fn into_data(self) -> Items {
        self.data
    }

    /// Drains the remaining items, stopping at the first error
    pub fn collect_items(&mut self) -> Result<Vec<Value>, AppError> {
        self.data.by_ref().collect()
    }
}

/// Response of an async `get`
pub struct AsyncClientResponse {
    /// HTTP status of the first page
    pub status_code: u16,
    /// Headers of the first page
    pub headers: HashMap<String, String>,
    data: BoxStream<'static, Result<Value, AppError>>,
}

impl std::fmt::Debug for AsyncClientResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncClientResponse")
            .field("status_code", &self.status_code)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl AsyncClientResponse {
    /// Wraps a non-paginated response
    pub fn from_raw(response: RawResponse, data_key: Option<&str>) -> Result<Self, AppError> {
        let item = extract_payload(response.json()?, data_key);
        Ok(Self {
            status_code: response.status,
            headers: response.headers,
            data: stream::iter(std::iter::once(item)).fuse().boxed(),
        })
    }

    /// Wraps the first page response and the stream that continues it
    #[must_use]
    pub fn from_paginated(
        first: RawResponse,
        items: BoxStream<'static, Result<Value, AppError>>,
    ) -> Self {
        Self {
            status_code: first.status,
            headers: first.headers,
            data: items,
        }
    }

    /// The single-pass item stream
    pub fn data(&mut self) -> &mut BoxStream<'static, Result<Value, AppError>> {
        &mut self.data
    }

    /// Takes the item stream, dropping status and headers
    #[must_use]
    pub fn into_data(self) -> BoxStream<'static, Result<Value, AppError>> {
        self.data
    }

    /// Next item, fetching the next page when the current one is drained
    pub async fn next_item(&mut self) -> Option<Result<Value, AppError>> {
        self.data.next().await
    }

    /// Drains the remaining items, stopping at the first error
    pub async fn collect_items(&mut self) -> Result<Vec<Value>, AppError> {
        let mut items = Vec::new();
        while let Some(item) = self.data.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}
