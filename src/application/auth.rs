/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Authentication resolution
//!
//! Turns [`Settings`] into a ready transport handle. Each auth mode maps to one
//! [`AuthStrategy`] arm, and each arm produces a complete [`Resolved`] value:
//! - `Session` performs the login handshake and attaches its cookies
//! - `Basic` attaches credentials to the transport, without network calls
//! - `Token` and `CustomTokenHeader` add a header to the resolved headers
//! - `None` leaves the transport untouched
//!
//! The caller's settings are never mutated; the resolved copy is returned.

use crate::application::config::{AuthType, LoginEncoding, Settings, normalize_login_status};
use crate::error::AppError;
use crate::model::http::{AsyncTransport, BasicCredentials, BlockingTransport, cookie_jar_from};
use reqwest::header::HeaderMap;
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// Login request data for session auth
#[derive(Clone, PartialEq, Eq)]
pub struct SessionLogin {
    /// Login endpoint
    pub login_url: String,
    /// Username sent as `username`
    pub username: String,
    /// Password sent as `password`
    pub password: String,
    /// Statuses treated as success
    pub accepted: BTreeSet<u16>,
    /// Explicit body encoding, `None` keeps the family default
    pub encoding: Option<LoginEncoding>,
}

impl std::fmt::Debug for SessionLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLogin")
            .field("login_url", &self.login_url)
            .field("username", &self.username)
            .field("accepted", &self.accepted)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl SessionLogin {
    fn form(&self) -> [(&'static str, &str); 2] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }

    fn json(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
    }

    fn check_status(&self, status: u16) -> Result<(), AppError> {
        if self.accepted.contains(&status) {
            Ok(())
        } else {
            error!(
                "Login to {} failed with status {}, accepted: {:?}",
                self.login_url, status, self.accepted
            );
            Err(AppError::SessionLoginFailed(status))
        }
    }
}

/// One arm per auth mode, validated against the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// No injected auth
    None,
    /// Bearer token
    Token(String),
    /// HTTP Basic credentials
    Basic(BasicCredentials),
    /// Cookie session from a login endpoint
    Session(SessionLogin),
    /// Token under a custom header name
    CustomTokenHeader {
        /// Header name
        header: String,
        /// Header value
        token: String,
    },
}

impl AuthStrategy {
    /// Selects and validates the strategy for `settings`
    ///
    /// # Errors
    /// `MissingCredentials` when the selected mode lacks a required field,
    /// `InvalidStatusCode` when a session login status is out of range.
    /// These checks happen before any network call.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        match settings.auth_type {
            AuthType::None => Ok(AuthStrategy::None),
            AuthType::Token => Ok(AuthStrategy::Token(settings.token.clone())),
            AuthType::Basic => {
                if settings.username.is_empty() {
                    return Err(AppError::MissingCredentials(
                        "basic auth requires a username".to_string(),
                    ));
                }
                Ok(AuthStrategy::Basic(BasicCredentials {
                    username: settings.username.clone(),
                    password: settings.password.clone(),
                }))
            }
            AuthType::Session => {
                let missing: Vec<&str> = [
                    ("login_url", settings.login_url.is_empty()),
                    ("username", settings.username.is_empty()),
                    ("password", settings.password.is_empty()),
                ]
                .into_iter()
                .filter_map(|(name, empty)| empty.then_some(name))
                .collect();
                if !missing.is_empty() {
                    return Err(AppError::MissingCredentials(format!(
                        "session auth requires {}",
                        missing.join(", ")
                    )));
                }
                // settings built without the builder are not validated yet
                let codes: Vec<u16> = settings.login_status_codes.iter().copied().collect();
                Ok(AuthStrategy::Session(SessionLogin {
                    login_url: settings.login_url.clone(),
                    username: settings.username.clone(),
                    password: settings.password.clone(),
                    accepted: normalize_login_status(&codes)?,
                    encoding: settings.login_encoding,
                }))
            }
            AuthType::CustomTokenHeader => {
                if settings.custom_token_header.is_empty() {
                    return Err(AppError::MissingCredentials(
                        "custom token header name is empty".to_string(),
                    ));
                }
                Ok(AuthStrategy::CustomTokenHeader {
                    header: settings.custom_token_header.clone(),
                    token: settings.token.clone(),
                })
            }
        }
    }

    fn inject_header(&self, settings: &mut Settings) {
        match self {
            AuthStrategy::Token(token) => {
                replace_header(settings, "Authorization", format!("Bearer {token}"));
            }
            AuthStrategy::CustomTokenHeader { header, token } => {
                replace_header(settings, header, token.clone());
            }
            AuthStrategy::None | AuthStrategy::Basic(_) | AuthStrategy::Session(_) => {}
        }
    }
}

/// Inserts `name`, dropping any default header of the same name in another case
fn replace_header(settings: &mut Settings, name: &str, value: String) {
    settings
        .headers
        .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    settings.headers.insert(name.to_string(), value);
}

/// Settings plus the transport handle resolved from them
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// Settings with any auth header already injected
    pub settings: Settings,
    /// Transport handle carrying the auth state
    pub transport: T,
}

/// Resolves settings into a blocking transport
///
/// # Errors
/// `MissingCredentials`, `SessionLoginFailed`, or a transport error from the
/// login request.
pub fn resolve_blocking(settings: &Settings) -> Result<Resolved<BlockingTransport>, AppError> {
    let strategy = AuthStrategy::from_settings(settings)?;
    let mut resolved = settings.clone();
    let verify = settings.verify_tls;

    let transport = match &strategy {
        AuthStrategy::Session(login) => {
            let encoding = login.encoding.unwrap_or(LoginEncoding::Form);
            let jar = {
                let client = BlockingTransport::login_client(verify)?;
                debug!("Sending {} login request to {}", encoding, login.login_url);
                let request = client.post(&login.login_url);
                let request = match encoding {
                    LoginEncoding::Form => request.form(&login.form()),
                    LoginEncoding::Json => request.json(&login.json()),
                };
                let response = request.send()?;
                login.check_status(response.status().as_u16())?;
                cookies_of(&login.login_url, response.headers())?
            };
            BlockingTransport::with_auth(verify, Some(jar), None)?
        }
        AuthStrategy::Basic(creds) => {
            BlockingTransport::with_auth(verify, None, Some(creds.clone()))?
        }
        AuthStrategy::Token(_) | AuthStrategy::CustomTokenHeader { .. } => {
            strategy.inject_header(&mut resolved);
            BlockingTransport::new(verify)?
        }
        AuthStrategy::None => BlockingTransport::new(verify)?,
    };

    info!("Resolved {} client for {}", settings.auth_type, settings.base_url);
    Ok(Resolved {
        settings: resolved,
        transport,
    })
}

/// Resolves settings into an async transport
///
/// Suspends only on the login request of session auth.
///
/// # Errors
/// Same as [`resolve_blocking`].
pub async fn resolve(settings: &Settings) -> Result<Resolved<AsyncTransport>, AppError> {
    let strategy = AuthStrategy::from_settings(settings)?;
    let mut resolved = settings.clone();
    let verify = settings.verify_tls;

    let transport = match &strategy {
        AuthStrategy::Session(login) => {
            let encoding = login.encoding.unwrap_or(LoginEncoding::Json);
            let jar = {
                let client = AsyncTransport::login_client(verify)?;
                debug!("Sending {} login request to {}", encoding, login.login_url);
                let request = client.post(&login.login_url);
                let request = match encoding {
                    LoginEncoding::Form => request.form(&login.form()),
                    LoginEncoding::Json => request.json(&login.json()),
                };
                let response = request.send().await?;
                login.check_status(response.status().as_u16())?;
                cookies_of(&login.login_url, response.headers())?
            };
            AsyncTransport::with_auth(verify, Some(jar), None)?
        }
        AuthStrategy::Basic(creds) => {
            AsyncTransport::with_auth(verify, None, Some(creds.clone()))?
        }
        AuthStrategy::Token(_) | AuthStrategy::CustomTokenHeader { .. } => {
            strategy.inject_header(&mut resolved);
            AsyncTransport::new(verify)?
        }
        AuthStrategy::None => AsyncTransport::new(verify)?,
    };

    info!("Resolved {} client for {}", settings.auth_type, settings.base_url);
    Ok(Resolved {
        settings: resolved,
        transport,
    })
}

fn cookies_of(
    login_url: &str,
    headers: &HeaderMap,
) -> Result<std::sync::Arc<reqwest::cookie::Jar>, AppError> {
    let jar = cookie_jar_from(login_url, headers)?;
    info!("Session login to {} succeeded", login_url);
    Ok(jar)
}
