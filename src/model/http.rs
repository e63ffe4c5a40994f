/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Transport handles over `reqwest`
//!
//! A transport owns one HTTP client plus whatever auth state the resolver
//! attached to it (cookie jar, basic credentials). It knows nothing about
//! settings, base URLs or pagination; it only sends a fully described request
//! and hands back status, headers and raw body bytes.

use crate::constants::USER_AGENT;
use crate::error::AppError;
use reqwest::Method;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Query parameters sent with a request
pub type Query = BTreeMap<String, String>;

/// HTTP Basic credentials attached to every request of a transport
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Username
    pub username: String,
    /// Password, omitted from the header when empty
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl BasicCredentials {
    fn password(&self) -> Option<&str> {
        (!self.password.is_empty()).then_some(self.password.as_str())
    }
}

/// Status, headers and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers; repeated headers are joined with `", "`
    pub headers: HashMap<String, String>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Whether the status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON; an empty body parses to `null`
    pub fn json(&self) -> Result<Value, AppError> {
        self.deserialize()
    }

    /// Deserializes the body into `T`; an empty body is treated as `null`
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Joins a request path onto a base URL
///
/// At most one leading `/` is removed from `ext` and at most one trailing `/`
/// from `base_url`, then both are joined with a single `/`.
///
/// ```
/// use http_client_utils::model::http::join_url;
///
/// assert_eq!(join_url("http://h/", "/p"), "http://h/p");
/// assert_eq!(join_url("http://h", "p"), "http://h/p");
/// ```
#[must_use]
pub fn join_url(base_url: &str, ext: &str) -> String {
    let ext = ext.strip_prefix('/').unwrap_or(ext);
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base_url}/{ext}")
}

/// Overlays per-call headers on top of the default ones; the call wins,
/// whatever the case of the header name
#[must_use]
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    custom: Option<&HashMap<String, String>>,
) -> HashMap<String, String> {
    let mut headers = defaults.clone();
    if let Some(custom) = custom {
        // header names are case-insensitive
        headers.retain(|name, _| !custom.keys().any(|k| k.eq_ignore_ascii_case(name)));
        headers.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    headers
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn from_header_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::with_capacity(headers.len());
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            warn!("Skipping non UTF-8 response header {}", name);
            continue;
        };
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    out
}

/// Collects the `Set-Cookie` values of a response into a jar scoped to `url`
pub(crate) fn cookie_jar_from(url: &str, headers: &HeaderMap) -> Result<Arc<Jar>, AppError> {
    let url = reqwest::Url::parse(url)?;
    let jar = Jar::default();
    let mut count = 0usize;
    for value in headers.get_all(reqwest::header::SET_COOKIE) {
        if let Ok(cookie) = value.to_str() {
            jar.add_cookie_str(cookie, &url);
            count += 1;
        }
    }
    debug!("Captured {} session cookie(s) from {}", count, url);
    Ok(Arc::new(jar))
}

/// Blocking transport handle
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
    basic: Option<BasicCredentials>,
    verify_tls: bool,
}

impl BlockingTransport {
    /// Creates a transport without any attached auth state
    pub fn new(verify_tls: bool) -> Result<Self, AppError> {
        Self::with_auth(verify_tls, None, None)
    }

    /// Creates a transport carrying a cookie jar and/or basic credentials
    pub fn with_auth(
        verify_tls: bool,
        cookies: Option<Arc<Jar>>,
        basic: Option<BasicCredentials>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!verify_tls);
        if let Some(jar) = cookies {
            builder = builder.cookie_provider(jar);
        }
        Ok(Self {
            client: builder.build()?,
            basic,
            verify_tls,
        })
    }

    /// Whether TLS certificates are verified
    #[must_use]
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Basic credentials attached to every request, if any
    #[must_use]
    pub fn basic_credentials(&self) -> Option<&BasicCredentials> {
        self.basic.as_ref()
    }

    /// Sends one request and reads the whole body
    pub fn send(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        query: Option<&Query>,
        body: Option<&Value>,
    ) -> Result<RawResponse, AppError> {
        debug!("{} {}", method, url);
        let mut request = self
            .client
            .request(method, url)
            .headers(to_header_map(headers)?);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(basic) = &self.basic {
            request = request.basic_auth(&basic.username, basic.password());
        }

        let response = request.send()?;
        let status = response.status();
        debug!("Response status: {}", status);
        let headers = from_header_map(response.headers());
        let body = response.bytes()?.to_vec();
        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }

    /// Client for a session login request
    ///
    /// Redirects are not followed, so the cookies and status of the login
    /// response itself are observed.
    pub(crate) fn login_client(verify_tls: bool) -> Result<reqwest::blocking::Client, AppError> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!verify_tls)
            .redirect(reqwest::redirect::Policy::none())
            .build()?)
    }
}

/// Async transport handle
#[derive(Debug, Clone)]
pub struct AsyncTransport {
    client: reqwest::Client,
    basic: Option<BasicCredentials>,
    verify_tls: bool,
}

impl AsyncTransport {
    /// Creates a transport without any attached auth state
    pub fn new(verify_tls: bool) -> Result<Self, AppError> {
        Self::with_auth(verify_tls, None, None)
    }

    /// Creates a transport carrying a cookie jar and/or basic credentials
    pub fn with_auth(
        verify_tls: bool,
        cookies: Option<Arc<Jar>>,
        basic: Option<BasicCredentials>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!verify_tls);
        if let Some(jar) = cookies {
            builder = builder.cookie_provider(jar);
        }
        Ok(Self {
            client: builder.build()?,
            basic,
            verify_tls,
        })
    }

    /// Whether TLS certificates are verified
    #[must_use]
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Basic credentials attached to every request, if any
    #[must_use]
    pub fn basic_credentials(&self) -> Option<&BasicCredentials> {
        self.basic.as_ref()
    }

    /// Sends one request and reads the whole body
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        query: Option<&Query>,
        body: Option<&Value>,
    ) -> Result<RawResponse, AppError> {
        debug!("{} {}", method, url);
        let mut request = self
            .client
            .request(method, url)
            .headers(to_header_map(headers)?);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(basic) = &self.basic {
            request = request.basic_auth(&basic.username, basic.password());
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);
        let headers = from_header_map(response.headers());
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }

    /// Client for a session login request
    ///
    /// Redirects are not followed, so the cookies and status of the login
    /// response itself are observed.
    pub(crate) fn login_client(verify_tls: bool) -> Result<reqwest::Client, AppError> {
        Ok(reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!verify_tls)
            .redirect(reqwest::redirect::Policy::none())
            .build()?)
    }
}
