/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::model::http::Query;
use crate::model::pagination::Pagination;
use std::collections::HashMap;

/// Per-call options of `get`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Query parameters
    pub params: Option<Query>,
    /// Headers overriding the client defaults for this call
    pub custom_headers: Option<HashMap<String, String>>,
    /// Data key overriding `Settings::data_key` for this call
    pub custom_data_key: Option<String>,
    /// Pagination; `None` issues a single request
    pub pagination: Option<Pagination>,
}

impl GetOptions {
    /// Options for a plain single request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params
            .get_or_insert_with(Query::new)
            .insert(key.into(), value.to_string());
        self
    }

    /// Replaces the query parameters
    #[must_use]
    pub fn params(mut self, params: Query) -> Self {
        self.params = Some(params);
        self
    }

    /// Adds a header for this call only
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Unwraps the payload with `data_key` instead of the configured one
    #[must_use]
    pub fn data_key(mut self, data_key: impl Into<String>) -> Self {
        self.custom_data_key = Some(data_key.into());
        self
    }

    /// Paginates with the default page key and limit
    #[must_use]
    pub fn paginate(mut self) -> Self {
        self.pagination = Some(Pagination::default());
        self
    }

    /// Paginates with a custom page key and limit
    #[must_use]
    pub fn paginate_with(mut self, page_key: impl Into<String>, limit: u64) -> Self {
        self.pagination = Some(Pagination::new(page_key, limit));
        self
    }
}
