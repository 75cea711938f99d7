use jetstream_channel_core::{
    channel_spec::{self, DeliverySpec, SubscriberSpec},
    parse_duration,
};
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use crate::errors::ConfigError;

/// An addressable endpoint the dispatcher delivers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub uri: String,
}

impl Destination {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackoffPolicy {
    Linear,
    #[default]
    Exponential,
}

impl From<channel_spec::BackoffPolicy> for BackoffPolicy {
    fn from(policy: channel_spec::BackoffPolicy) -> Self {
        match policy {
            channel_spec::BackoffPolicy::Linear => BackoffPolicy::Linear,
            channel_spec::BackoffPolicy::Exponential => BackoffPolicy::Exponential,
        }
    }
}

/// Retry settings handed to the message dispatcher, which owns the actual
/// retry loop and backoff timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub retry_max: u32,
    pub backoff_policy: BackoffPolicy,
    pub backoff_delay: Option<Duration>,
    /// Per-attempt request timeout.
    pub timeout: Option<Duration>,
}

impl RetryConfig {
    fn from_delivery(uid: &str, delivery: &DeliverySpec) -> Result<Option<Self>, ConfigError> {
        let parse = |field: &'static str, value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(parse_duration)
                .transpose()
                .map_err(|source| ConfigError::InvalidDuration {
                    uid: uid.to_string(),
                    field,
                    source,
                })
        };

        let backoff_delay = parse("backoffDelay", &delivery.backoff_delay)?;
        let timeout = parse("timeout", &delivery.timeout)?;

        if delivery.retry.is_none() && timeout.is_none() {
            return Ok(None);
        }

        Ok(Some(RetryConfig {
            retry_max: delivery.retry.unwrap_or(0),
            backoff_policy: delivery.backoff_policy.map(Into::into).unwrap_or_default(),
            backoff_delay,
            timeout,
        }))
    }
}

/// Delivery targets of one channel subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub uid: String,
    pub subscriber: Option<Destination>,
    pub reply: Option<Destination>,
    pub dead_letter: Option<Destination>,
    pub retry_config: Option<RetryConfig>,
}

impl Subscription {
    /// Resolves a subscriber, falling back to the channel-wide delivery spec
    /// when the subscriber has none.
    pub fn from_spec(
        spec: &SubscriberSpec,
        channel_delivery: Option<&DeliverySpec>,
    ) -> Result<Self, ConfigError> {
        let delivery = spec.delivery.as_ref().or(channel_delivery);

        let retry_config = match delivery {
            Some(delivery) => RetryConfig::from_delivery(&spec.uid, delivery)?,
            None => None,
        };

        Ok(Subscription {
            uid: spec.uid.clone(),
            subscriber: non_empty_destination(spec.subscriber_uri.as_deref()),
            reply: non_empty_destination(spec.reply_uri.as_deref()),
            dead_letter: delivery
                .and_then(|d| non_empty_destination(d.dead_letter_sink.as_deref())),
            retry_config,
        })
    }
}

fn non_empty_destination(uri: Option<&str>) -> Option<Destination> {
    uri.filter(|u| !u.is_empty()).map(Destination::new)
}
