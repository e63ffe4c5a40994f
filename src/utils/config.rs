/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Environment lookups behind
//! [`Settings::from_env`](crate::application::config::Settings::from_env)
//!
//! Unparsable values never fail a lookup; they are logged at `warn` and
//! treated as absent.

use crate::constants::ENV_PREFIX;
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::warn;

/// Full name of a crate variable, e.g. `BASE_URL` becomes `HTTP_CLIENT_BASE_URL`
#[must_use]
pub fn prefixed(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn parse_logged<T: FromStr>(env_var: &str, raw: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    match raw.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring {}={:?}: {:?}", env_var, raw, e);
            None
        }
    }
}

/// Reads and parses `env_var`, falling back to `default` when unset or invalid
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    get_env_or_none(env_var).unwrap_or(default)
}

/// Reads and parses `env_var`; unset, blank and invalid values are all `None`
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    let raw = env::var(env_var).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    parse_logged(env_var, &raw)
}

/// Reads a comma separated list, dropping blank and invalid entries
///
/// `None` when the variable is unset or blank.
pub fn get_env_list<T: FromStr>(env_var: &str) -> Option<Vec<T>>
where
    <T as FromStr>::Err: Debug,
{
    let raw = env::var(env_var).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(
        raw.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .filter_map(|entry| parse_logged(env_var, entry))
            .collect(),
    )
}
