//! Tool handlers.
//!
//! Each handler decodes its JSON argument map, calls the Google clients and
//! renders a text result. Handlers return typed errors; stringification for
//! the wire happens in the stdio loop, not here.

pub mod calendar;
pub mod gmail;

use serde_json::{Map, Value};

use gsuite_mcp_providers::google::{Authenticator, CalendarClient, GmailClient};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state handed to every tool handler.
#[derive(Debug)]
pub struct ToolContext {
    authenticator: Authenticator,
    config: ServerConfig,
}

impl ToolContext {
    /// Builds the context from the server configuration.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let authenticator = Authenticator::new(config.google_config()?)?;
        Ok(Self {
            authenticator,
            config,
        })
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the Google authenticator.
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Returns a calendar client carrying a fresh access token.
    ///
    /// Built per call: the token may have been refreshed since the last one.
    pub async fn calendar(&self) -> ServerResult<CalendarClient> {
        let token = self.authenticator.access_token().await?;
        Ok(CalendarClient::new(token, self.config.timeout())?)
    }

    /// Returns a Gmail client carrying a fresh access token.
    pub async fn gmail(&self) -> ServerResult<GmailClient> {
        let token = self.authenticator.access_token().await?;
        Ok(GmailClient::new(token, self.config.timeout())?)
    }
}

/// Returns a required string argument.
pub(crate) fn require_str<'a>(args: &'a Map<String, Value>, key: &str) -> ServerResult<&'a str> {
    optional_str(args, key)?
        .ok_or_else(|| ServerError::invalid_arguments(format!("'{}' is required", key)))
}

/// Returns an optional string argument.
pub(crate) fn optional_str<'a>(
    args: &'a Map<String, Value>,
    key: &str,
) -> ServerResult<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ServerError::invalid_arguments(format!(
            "'{}' must be a string",
            key
        ))),
    }
}

/// Returns an optional integer argument.
pub(crate) fn optional_i64(args: &Map<String, Value>, key: &str) -> ServerResult<Option<i64>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            ServerError::invalid_arguments(format!("'{}' must be an integer", key))
        }).map(Some),
        Some(_) => Err(ServerError::invalid_arguments(format!(
            "'{}' must be an integer",
            key
        ))),
    }
}

/// Returns an optional boolean argument.
pub(crate) fn optional_bool(args: &Map<String, Value>, key: &str) -> ServerResult<Option<bool>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ServerError::invalid_arguments(format!(
            "'{}' must be a boolean",
            key
        ))),
    }
}

/// Returns an optional array-of-strings argument.
pub(crate) fn optional_str_array(
    args: &Map<String, Value>,
    key: &str,
) -> ServerResult<Vec<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(String::from).ok_or_else(|| {
                    ServerError::invalid_arguments(format!(
                        "'{}' must be an array of strings",
                        key
                    ))
                })
            })
            .collect(),
        Some(_) => Err(ServerError::invalid_arguments(format!(
            "'{}' must be an array of strings",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn string_arguments() {
        let map = args(json!({"name": "standup", "count": 3}));
        assert_eq!(require_str(&map, "name").unwrap(), "standup");
        assert!(require_str(&map, "missing").is_err());
        assert!(require_str(&map, "count").is_err());
        assert_eq!(optional_str(&map, "missing").unwrap(), None);
    }

    #[test]
    fn integer_arguments() {
        let map = args(json!({"count": 3, "frac": 1.5, "name": "x"}));
        assert_eq!(optional_i64(&map, "count").unwrap(), Some(3));
        assert_eq!(optional_i64(&map, "missing").unwrap(), None);
        assert!(optional_i64(&map, "frac").is_err());
        assert!(optional_i64(&map, "name").is_err());
    }

    #[test]
    fn bool_arguments() {
        let map = args(json!({"flag": false, "name": "x"}));
        assert_eq!(optional_bool(&map, "flag").unwrap(), Some(false));
        assert_eq!(optional_bool(&map, "missing").unwrap(), None);
        assert!(optional_bool(&map, "name").is_err());
    }

    #[test]
    fn string_array_arguments() {
        let map = args(json!({"labels": ["STARRED", "UNREAD"], "bad": [1]}));
        assert_eq!(
            optional_str_array(&map, "labels").unwrap(),
            vec!["STARRED".to_string(), "UNREAD".to_string()]
        );
        assert!(optional_str_array(&map, "missing").unwrap().is_empty());
        assert!(optional_str_array(&map, "bad").is_err());
    }

    #[test]
    fn null_counts_as_absent() {
        let map = args(json!({"name": null}));
        assert_eq!(optional_str(&map, "name").unwrap(), None);
        assert!(require_str(&map, "name").is_err());
    }
}
