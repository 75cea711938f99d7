use jetstream_channel_core::DurationParseError;
use thiserror::Error;

use crate::message_dispatcher::DispatchExecutionInfo;

pub type Result<T> = std::result::Result<T, ConsumerError>;

/// Errors surfaced by a [`Consumer`](crate::Consumer).
///
/// Per-message errors never leave the message handler; only
/// `ConsumerClosed` and `Drain` reach the caller of `close`.
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("dispatcher consumer closed")]
    ConsumerClosed,

    #[error("received a message with unknown encoding")]
    UnknownEncoding,

    #[error("failed to dispatch message: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("failed to ack message: {0}")]
    Ack(#[source] BrokerError),

    #[error("failed to drain subscription: {0}")]
    Drain(#[source] BrokerError),
}

/// Failures reported by the broker client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("request timed out")]
    Timeout,

    #[error("invalid subscription")]
    InvalidSubscription,

    #[error("broker error: {0}")]
    Other(String),
}

/// A delivery that did not succeed after the dispatcher exhausted its retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct DispatchError {
    pub reason: String,
    /// Execution details of the last attempt, when one was made.
    pub info: Option<DispatchExecutionInfo>,
}

impl DispatchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            info: None,
        }
    }

    pub fn with_info(reason: impl Into<String>, info: DispatchExecutionInfo) -> Self {
        Self {
            reason: reason.into(),
            info: Some(info),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read the configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse the configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid {field} for subscriber {uid}: {source}")]
    InvalidDuration {
        uid: String,
        field: &'static str,
        #[source]
        source: DurationParseError,
    },

    #[error("channel {0} is declared more than once")]
    DuplicateChannel(String),
}
