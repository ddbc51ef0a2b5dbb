// Reads the dispatcher configuration from the environment.
//
// Variables
// - NOTIFICATIONS_LISTEN_TO: connection target to monitor and subscribe through (required).
// - NOTIFICATIONS_SCHEMA: namespace, the channel becomes "<schema>.events" (required).
// - NOTIFICATIONS_ON_MALFORMED: "fail" (default) or "skip".
//
// A .env file in the working directory is loaded first when present.

use crate::modules::event_notifications::use_cases::dispatch_event_ranges::config::{
    DispatcherConfig, MalformedPayloadPolicy, UnknownPolicy,
};
use std::io;
use thiserror::Error;

pub const LISTEN_TO_VAR: &str = "NOTIFICATIONS_LISTEN_TO";
pub const SCHEMA_VAR: &str = "NOTIFICATIONS_SCHEMA";
pub const ON_MALFORMED_VAR: &str = "NOTIFICATIONS_ON_MALFORMED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error(transparent)]
    InvalidPolicy(#[from] UnknownPolicy),

    #[error("failed to load .env: {0}")]
    DotEnv(String),
}

pub fn load_config() -> Result<DispatcherConfig, ConfigError> {
    check_dotenv(dotenvy::dotenv().map(|_| ()))?;
    config_from(|name| std::env::var(name).ok())
}

/// A missing .env file is fine, the variables may come from the real environment.
/// An unreadable or malformed one is not.
fn check_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ConfigError::DotEnv(err.to_string())),
    }
}

pub fn config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DispatcherConfig, ConfigError> {
    let required = |name: &'static str| {
        lookup(name)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(name))
    };
    let listen_to = required(LISTEN_TO_VAR)?;
    let schema = required(SCHEMA_VAR)?;
    let on_malformed = match lookup(ON_MALFORMED_VAR) {
        Some(value) => value.parse()?,
        None => MalformedPayloadPolicy::default(),
    };

    Ok(DispatcherConfig::new(listen_to, schema).with_on_malformed(on_malformed))
}
