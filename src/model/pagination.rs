/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Page-number pagination
//!
//! [`PageCursor`] holds the state machine shared by both client families: it
//! builds the query for the next page and absorbs each page body, returning
//! the items to yield and deciding whether another page is needed. The
//! blocking [`Paginator`] and the async [`page_stream`] only add the I/O.
//!
//! A page is "short" when it yields fewer items than the current limit, which
//! ends the sequence. A server reporting `per_page` in its body replaces the
//! limit before the page that carried it is evaluated. When the final page is
//! exactly full one extra, empty page is fetched. A page with an empty (or
//! `null`) body yields nothing and also ends the sequence.

use crate::constants::{DEFAULT_PAGE_KEY, DEFAULT_PAGE_LIMIT, LIMIT_PARAM, PER_PAGE_KEY};
use crate::error::AppError;
use crate::model::http::{AsyncTransport, BlockingTransport, Query, RawResponse};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Caller facing pagination options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Query parameter carrying the page number
    pub page_key: String,
    /// Requested page size, must be positive
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_key: DEFAULT_PAGE_KEY.to_string(),
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Options with a custom page key and limit
    #[must_use]
    pub fn new(page_key: impl Into<String>, limit: u64) -> Self {
        Self {
            page_key: page_key.into(),
            limit,
        }
    }
}

/// Extracts the payload of a body, unwrapping `data_key` when set
pub fn extract_payload(body: Value, data_key: Option<&str>) -> Result<Value, AppError> {
    match data_key {
        None => Ok(body),
        Some(key) => match body {
            Value::Object(mut map) => map
                .remove(key)
                .ok_or_else(|| AppError::DataKeyNotFound(key.to_string())),
            _ => Err(AppError::DataKeyNotFound(key.to_string())),
        },
    }
}

/// Flattens a payload into the items it yields
fn flatten(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Pagination state of one paginated call
#[derive(Debug, Clone)]
pub struct PageCursor {
    page_key: String,
    page_number: u64,
    requested_limit: u64,
    limit: u64,
    data_key: Option<String>,
    params: Query,
    exhausted: bool,
}

impl PageCursor {
    /// Starts a cursor on page 1
    ///
    /// # Errors
    /// `InvalidInput` when `limit` is zero or the page key is empty.
    pub fn new(
        params: Option<Query>,
        pagination: &Pagination,
        data_key: Option<String>,
    ) -> Result<Self, AppError> {
        if pagination.limit == 0 {
            return Err(AppError::InvalidInput(
                "pagination limit must be positive".to_string(),
            ));
        }
        if pagination.page_key.is_empty() {
            return Err(AppError::InvalidInput(
                "pagination page key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            page_key: pagination.page_key.clone(),
            page_number: 1,
            requested_limit: pagination.limit,
            limit: pagination.limit,
            data_key,
            params: params.unwrap_or_default(),
            exhausted: false,
        })
    }

    /// Current page number, starting at 1
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Current limit, possibly replaced by a server reported `per_page`
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether the last absorbed page was short
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Query for the current page
    ///
    /// The `limit` parameter always carries the requested limit, even after a
    /// `per_page` override.
    #[must_use]
    pub fn query(&self) -> Query {
        let mut query = self.params.clone();
        query.insert(self.page_key.clone(), self.page_number.to_string());
        query.insert(LIMIT_PARAM.to_string(), self.requested_limit.to_string());
        query
    }

    /// Absorbs the body of the current page
    ///
    /// Applies `per_page`, extracts and flattens the payload, then either marks
    /// the cursor exhausted or advances it to the next page.
    ///
    /// # Errors
    /// `DataKeyNotFound` when the data key is missing. The cursor is then
    /// exhausted.
    pub fn absorb(&mut self, body: Value) -> Result<Vec<Value>, AppError> {
        if body.is_null() {
            debug!("Page {} has an empty body", self.page_number);
            self.exhausted = true;
            return Ok(Vec::new());
        }
        self.apply_per_page(&body);

        let payload = match extract_payload(body, self.data_key.as_deref()) {
            Ok(payload) => payload,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };
        let items = flatten(payload);

        debug!(
            "Page {} yielded {} item(s), limit {}",
            self.page_number,
            items.len(),
            self.limit
        );

        if (items.len() as u64) < self.limit {
            self.exhausted = true;
        } else {
            self.page_number += 1;
        }
        Ok(items)
    }

    /// Stops the cursor after a failed fetch
    pub fn abort(&mut self) {
        self.exhausted = true;
    }

    fn apply_per_page(&mut self, body: &Value) {
        let Some(per_page) = body.as_object().and_then(|map| map.get(PER_PAGE_KEY)) else {
            return;
        };
        match per_page.as_u64() {
            Some(n) if n > 0 => {
                if n != self.limit {
                    debug!("Server reported per_page {}, replacing limit {}", n, self.limit);
                }
                self.limit = n;
            }
            _ => warn!("Ignoring non positive per_page value: {}", per_page),
        }
    }
}

fn warn_on_status(response: &RawResponse, page: u64, url: &str) {
    if !response.is_success() {
        warn!("Page {} of {} returned status {}", page, url, response.status);
    }
}

/// Lazy blocking iterator over every item of every page
///
/// Page N+1 is only requested once page N's items have all been returned.
/// A failed fetch is returned as one `Err` item, after which the iterator is
/// finished.
pub struct Paginator {
    transport: BlockingTransport,
    url: String,
    headers: HashMap<String, String>,
    cursor: PageCursor,
    pending: Option<Value>,
    buffer: VecDeque<Value>,
    done: bool,
}

impl Paginator {
    /// Fetches page 1 and returns its response alongside the paginator
    ///
    /// The first body is held unparsed until the consumer asks for an item.
    pub fn start(
        transport: BlockingTransport,
        url: String,
        headers: HashMap<String, String>,
        cursor: PageCursor,
    ) -> Result<(RawResponse, Self), AppError> {
        let query = cursor.query();
        let first = transport.send(Method::GET, &url, &headers, Some(&query), None)?;
        warn_on_status(&first, cursor.page_number(), &url);
        let body = first.json()?;
        let paginator = Self {
            transport,
            url,
            headers,
            cursor,
            pending: Some(body),
            buffer: VecDeque::new(),
            done: false,
        };
        Ok((first, paginator))
    }

    /// State of the underlying cursor
    #[must_use]
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    fn fetch_next(&mut self) -> Result<Value, AppError> {
        let query = self.cursor.query();
        let response =
            self.transport
                .send(Method::GET, &self.url, &self.headers, Some(&query), None)?;
        warn_on_status(&response, self.cursor.page_number(), &self.url);
        response.json()
    }
}

impl Iterator for Paginator {
    type Item = Result<Value, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            let body = match self.pending.take() {
                Some(body) => body,
                None if self.cursor.is_exhausted() => {
                    self.done = true;
                    return None;
                }
                None => match self.fetch_next() {
                    Ok(body) => body,
                    Err(e) => {
                        self.cursor.abort();
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            };
            match self.cursor.absorb(body) {
                Ok(items) => self.buffer.extend(items),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Paginator {}

struct StreamState {
    transport: AsyncTransport,
    url: String,
    headers: HashMap<String, String>,
    cursor: PageCursor,
    pending: Option<Value>,
    buffer: VecDeque<Value>,
    done: bool,
}

impl StreamState {
    async fn fetch_next(&self) -> Result<Value, AppError> {
        let query = self.cursor.query();
        let response = self
            .transport
            .send(Method::GET, &self.url, &self.headers, Some(&query), None)
            .await?;
        warn_on_status(&response, self.cursor.page_number(), &self.url);
        response.json()
    }

    async fn next_item(mut self) -> Option<(Result<Value, AppError>, Self)> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some((Ok(item), self));
            }
            if self.done {
                return None;
            }
            let body = match self.pending.take() {
                Some(body) => body,
                None if self.cursor.is_exhausted() => return None,
                None => match self.fetch_next().await {
                    Ok(body) => body,
                    Err(e) => {
                        self.cursor.abort();
                        self.done = true;
                        return Some((Err(e), self));
                    }
                },
            };
            match self.cursor.absorb(body) {
                Ok(items) => self.buffer.extend(items),
                Err(e) => {
                    self.done = true;
                    return Some((Err(e), self));
                }
            }
        }
    }
}

/// Fetches page 1 and returns its response plus a lazy stream of every item
///
/// The only suspension points of the stream are the page fetches. The stream
/// is fused, so polling it after the end keeps returning `None`.
pub async fn page_stream(
    transport: AsyncTransport,
    url: String,
    headers: HashMap<String, String>,
    cursor: PageCursor,
) -> Result<(RawResponse, BoxStream<'static, Result<Value, AppError>>), AppError> {
    let query = cursor.query();
    let first = transport
        .send(Method::GET, &url, &headers, Some(&query), None)
        .await?;
    warn_on_status(&first, cursor.page_number(), &url);
    let body = first.json()?;
    let state = StreamState {
        transport,
        url,
        headers,
        cursor,
        pending: Some(body),
        buffer: VecDeque::new(),
        done: false,
    };
    let items = stream::unfold(state, StreamState::next_item).fuse().boxed();
    Ok((first, items))
}
