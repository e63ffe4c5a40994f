/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::constants::{DEFAULT_LOGIN_STATUS, MAX_LOGIN_STATUS, MIN_LOGIN_STATUS};
use crate::error::AppError;
use crate::utils::config::{get_env_list, get_env_or_default, get_env_or_none, prefixed};
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Strategy used to authenticate outgoing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Token,
    /// HTTP Basic credentials on every request
    Basic,
    /// Cookie session obtained from a login endpoint
    Session,
    /// Token sent under a caller chosen header name
    CustomTokenHeader,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthType::None => "NONE",
            AuthType::Token => "TOKEN",
            AuthType::Basic => "BASIC",
            AuthType::Session => "SESSION",
            AuthType::CustomTokenHeader => "CUSTOM_TOKEN_HEADER",
        };
        write!(f, "{name}")
    }
}

impl FromStr for AuthType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "" | "NONE" => Ok(AuthType::None),
            "TOKEN" | "BEARER" => Ok(AuthType::Token),
            "BASIC" => Ok(AuthType::Basic),
            "SESSION" => Ok(AuthType::Session),
            "CUSTOM_TOKEN_HEADER" => Ok(AuthType::CustomTokenHeader),
            other => Err(AppError::InvalidInput(format!("unknown auth type: {other}"))),
        }
    }
}

/// Body encoding of the session login request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginEncoding {
    /// `application/x-www-form-urlencoded`, the blocking client's default
    Form,
    /// `application/json`, the async client's default
    Json,
}

impl fmt::Display for LoginEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginEncoding::Form => write!(f, "form"),
            LoginEncoding::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LoginEncoding {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "form" => Ok(LoginEncoding::Form),
            "json" => Ok(LoginEncoding::Json),
            other => Err(AppError::InvalidInput(format!(
                "unknown login encoding: {other}"
            ))),
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Declarative description of a client
///
/// Settings are assembled by [`ClientBuilder`](crate::application::builder::ClientBuilder)
/// and become read-only once a client has been resolved from them.
/// Secrets are never serialized, so the pretty `Debug` output is safe to log.
pub struct Settings {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Headers sent with every request
    pub headers: HashMap<String, String>,
    /// Authentication strategy
    pub auth_type: AuthType,
    /// Token for `TOKEN` and `CUSTOM_TOKEN_HEADER` modes
    #[serde(skip_serializing, default)]
    pub token: String,
    /// Username for `BASIC` and `SESSION` modes
    pub username: String,
    /// Password for `BASIC` and `SESSION` modes
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Header name used by `CUSTOM_TOKEN_HEADER` mode
    pub custom_token_header: String,
    /// Login endpoint used by `SESSION` mode
    pub login_url: String,
    /// Whether TLS certificates are verified
    pub verify_tls: bool,
    /// Status codes treated as a successful login, always containing 200
    #[serde(deserialize_with = "deserialize_login_status")]
    pub login_status_codes: BTreeSet<u16>,
    /// Key used to unwrap the payload from a JSON envelope
    pub data_key: Option<String>,
    /// Login body encoding; `None` keeps the client family default
    pub login_encoding: Option<LoginEncoding>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: HashMap::new(),
            auth_type: AuthType::None,
            token: String::new(),
            username: String::new(),
            password: String::new(),
            custom_token_header: String::new(),
            login_url: String::new(),
            verify_tls: true,
            login_status_codes: BTreeSet::from([DEFAULT_LOGIN_STATUS]),
            data_key: None,
            login_encoding: None,
        }
    }
}

impl Settings {
    /// Creates settings with every field at its default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from the environment
    ///
    /// A `.env` file is read first if present. Every variable is prefixed with
    /// `HTTP_CLIENT_`; missing or unparsable values fall back to the defaults.
    /// Login status codes are a comma separated list, invalid entries are
    /// logged and dropped.
    pub fn from_env() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let var = prefixed;

        let auth_type = get_env_or_none::<String>(&var("AUTH_TYPE"))
            .map(|raw| {
                raw.parse::<AuthType>().unwrap_or_else(|e| {
                    warn!("{e}, falling back to NONE");
                    AuthType::None
                })
            })
            .unwrap_or_default();

        let login_status_codes = get_env_list::<u16>(&var("LOGIN_STATUS_CODES"))
            .map(|codes| accepted_statuses(&codes))
            .unwrap_or_else(|| BTreeSet::from([DEFAULT_LOGIN_STATUS]));

        Settings {
            base_url: get_env_or_default(&var("BASE_URL"), String::new()),
            headers: HashMap::new(),
            auth_type,
            token: get_env_or_default(&var("TOKEN"), String::new()),
            username: get_env_or_default(&var("USERNAME"), String::new()),
            password: get_env_or_default(&var("PASSWORD"), String::new()),
            custom_token_header: get_env_or_default(&var("CUSTOM_TOKEN_HEADER"), String::new()),
            login_url: get_env_or_default(&var("LOGIN_URL"), String::new()),
            verify_tls: get_env_or_default(&var("VERIFY_TLS"), true),
            login_status_codes,
            data_key: get_env_or_none(&var("DATA_KEY")),
            login_encoding: get_env_or_none(&var("LOGIN_ENCODING")),
        }
    }
}

/// Validates login status codes and normalizes them into a set containing 200
///
/// # Errors
/// `InvalidStatusCode` for the first code outside of `200..=599`.
pub fn normalize_login_status(codes: &[u16]) -> Result<BTreeSet<u16>, AppError> {
    if let Some(&bad) = codes
        .iter()
        .find(|&&code| !(MIN_LOGIN_STATUS..=MAX_LOGIN_STATUS).contains(&code))
    {
        return Err(AppError::InvalidStatusCode(bad));
    }
    let mut set: BTreeSet<u16> = codes.iter().copied().collect();
    set.insert(DEFAULT_LOGIN_STATUS);
    Ok(set)
}

fn deserialize_login_status<'de, D>(deserializer: D) -> Result<BTreeSet<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let codes = Vec::<u16>::deserialize(deserializer)?;
    normalize_login_status(&codes).map_err(de::Error::custom)
}

fn accepted_statuses(codes: &[u16]) -> BTreeSet<u16> {
    let in_range: Vec<u16> = codes
        .iter()
        .copied()
        .filter(|code| {
            let ok = (MIN_LOGIN_STATUS..=MAX_LOGIN_STATUS).contains(code);
            if !ok {
                warn!("Ignoring invalid login status code: {code}");
            }
            ok
        })
        .collect();
    // every remaining code is in range
    normalize_login_status(&in_range).unwrap_or_else(|_| BTreeSet::from([DEFAULT_LOGIN_STATUS]))
}
