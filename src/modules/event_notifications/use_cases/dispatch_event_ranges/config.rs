use crate::modules::event_notifications::core::state::channel_name;
use std::str::FromStr;
use thiserror::Error;

/// What the dispatcher does with a payload it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPayloadPolicy {
    /// Stop the dispatcher with a decode error.
    #[default]
    Fail,
    /// Log the payload and drop it.
    Skip,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown malformed payload policy {0:?}, expected \"fail\" or \"skip\"")]
pub struct UnknownPolicy(pub String);

impl FromStr for MalformedPayloadPolicy {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            _ => Err(UnknownPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Connection target to monitor and subscribe through.
    pub listen_to: String,
    /// Namespace the notification channel name is derived from.
    pub schema: String,
    pub on_malformed: MalformedPayloadPolicy,
}

impl DispatcherConfig {
    pub fn new(listen_to: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            listen_to: listen_to.into(),
            schema: schema.into(),
            on_malformed: MalformedPayloadPolicy::default(),
        }
    }

    pub fn with_on_malformed(mut self, policy: MalformedPayloadPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn channel(&self) -> String {
        channel_name(&self.schema)
    }
}
