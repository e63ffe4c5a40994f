/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Fluent construction of clients
//!
//! [`ClientBuilder`] owns its [`Settings`] until `build` or `async_build`
//! hands them to the auth resolver. Setters consume and return the builder, so
//! a builder is never shared after construction.

use crate::application::async_client::AsyncClient;
use crate::application::client::Client;
use crate::application::config::{AuthType, LoginEncoding, Settings, normalize_login_status};
use crate::error::AppError;
use std::collections::HashMap;

/// Builder for [`Client`] and [`AsyncClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    settings: Settings,
}

impl ClientBuilder {
    /// Starts from default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing settings, e.g. [`Settings::from_env`]
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Settings assembled so far
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sets the base URL
    #[must_use]
    pub fn set_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    /// Replaces the default headers
    #[must_use]
    pub fn set_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.settings.headers = headers;
        self
    }

    /// Sets the auth mode
    #[must_use]
    pub fn set_auth_type(mut self, auth_type: AuthType) -> Self {
        self.settings.auth_type = auth_type;
        self
    }

    /// Sets the token used by bearer and custom header auth
    #[must_use]
    pub fn set_token(mut self, token: impl Into<String>) -> Self {
        self.settings.token = token.into();
        self
    }

    /// Sets the username and password used by basic and session auth
    #[must_use]
    pub fn set_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.settings.username = username.into();
        self.settings.password = password.into();
        self
    }

    /// Sets the header name and token of custom header auth
    #[must_use]
    pub fn set_custom_token_header(
        mut self,
        custom_token_header: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.settings.custom_token_header = custom_token_header.into();
        self.settings.token = token.into();
        self
    }

    /// Sets the session login endpoint
    #[must_use]
    pub fn set_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.settings.login_url = login_url.into();
        self
    }

    /// Enables or disables TLS certificate verification
    #[must_use]
    pub fn set_verify(mut self, verify: bool) -> Self {
        self.settings.verify_tls = verify;
        self
    }

    /// Sets the data key used to unwrap response payloads
    #[must_use]
    pub fn set_data_key(mut self, data_key: impl Into<String>) -> Self {
        self.settings.data_key = Some(data_key.into());
        self
    }

    /// Forces the session login body encoding for both client families
    #[must_use]
    pub fn set_login_encoding(mut self, encoding: LoginEncoding) -> Self {
        self.settings.login_encoding = Some(encoding);
        self
    }

    /// Sets the statuses accepted as a successful login
    ///
    /// 200 is always added and duplicates are removed.
    ///
    /// # Errors
    /// `InvalidStatusCode` if any code is outside of `200..=599`; the builder is
    /// consumed in that case.
    pub fn set_login_status(mut self, status_codes: &[u16]) -> Result<Self, AppError> {
        self.settings.login_status_codes = normalize_login_status(status_codes)?;
        Ok(self)
    }

    /// Resolves a blocking client; the only blocking I/O of the builder
    pub fn build(self) -> Result<Client, AppError> {
        Client::create(self.settings)
    }

    /// Resolves an async client; the only suspending I/O of the builder
    pub async fn async_build(self) -> Result<AsyncClient, AppError> {
        AsyncClient::create(self.settings).await
    }
}
