//! Contracts of the broker client consumed by the dispatcher.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::BrokerError;

/// Header carrying the broker's unique message id.
pub const MSG_ID_HEADER: &str = "Nats-Msg-Id";

/// Message headers, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeaders {
    entries: Vec<(String, String)>,
}

impl MessageHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MessageHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = MessageHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A message pushed by the broker to a durable consumer.
#[async_trait]
pub trait BrokerMessage: Send + Sync {
    fn subject(&self) -> &str;
    fn headers(&self) -> &MessageHeaders;
    fn payload(&self) -> &Bytes;

    /// Acknowledges the message so the broker stops redelivering it.
    async fn ack(&self) -> Result<(), BrokerError>;
}

/// The broker subscription a [`Consumer`](crate::Consumer) owns.
#[async_trait]
pub trait SubscriptionHandle: Send + Sync {
    /// Unsubscribes gracefully, letting in-flight deliveries complete.
    async fn drain(&self) -> Result<(), BrokerError>;
}
