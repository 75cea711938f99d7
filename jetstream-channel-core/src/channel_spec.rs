//! Declarative channel specification, as written in the channel resource.
//!
//! Policy enums are held as `Option`, `None` being "unset" so the topology
//! builder can substitute its own default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::duration::deserialize_opt_duration;

/// Treats a missing field, `null` and `""` alike as unset.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeEmpty<T> {
        Value(T),
        Raw(String),
    }

    match Option::<MaybeEmpty<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MaybeEmpty::Value(value)) => Ok(Some(value)),
        Some(MaybeEmpty::Raw(raw)) if raw.is_empty() => Ok(None),
        Some(MaybeEmpty::Raw(raw)) => Err(serde::de::Error::custom(format!(
            "unknown policy value {raw:?}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RetentionPolicy {
    Limits,
    Interest,
    Work,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DiscardPolicy {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Storage {
    File,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DeliverPolicy {
    All,
    Last,
    New,
    ByStartSequence,
    ByStartTime,
    LastPerSubject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ReplayPolicy {
    Instant,
    Original,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementSpec {
    pub cluster: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamSourceSpec {
    pub name: String,
    pub opt_start_seq: u64,
    pub opt_start_time: Option<DateTime<Utc>>,
    pub filter_subject: String,
}

/// Stream settings of a channel. Numeric zero means "broker default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamPolicy {
    #[serde(deserialize_with = "empty_as_none")]
    pub retention: Option<RetentionPolicy>,
    pub max_consumers: i64,
    pub max_msgs: i64,
    pub max_bytes: i64,
    #[serde(deserialize_with = "empty_as_none")]
    pub discard: Option<DiscardPolicy>,
    #[serde(deserialize_with = "deserialize_opt_duration")]
    pub max_age: Option<Duration>,
    pub max_msg_size: i32,
    #[serde(deserialize_with = "empty_as_none")]
    pub storage: Option<Storage>,
    pub replicas: i64,
    pub no_ack: bool,
    #[serde(deserialize_with = "deserialize_opt_duration")]
    pub duplicate_window: Option<Duration>,
    pub placement: Option<PlacementSpec>,
    pub mirror: Option<StreamSourceSpec>,
    pub sources: Vec<StreamSourceSpec>,
    pub additional_subjects: Vec<String>,
}

/// Consumer settings applied to every subscriber of a channel.
///
/// There is no ack policy here: consumers always use explicit acks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsumerPolicyTemplate {
    #[serde(deserialize_with = "empty_as_none")]
    pub deliver_policy: Option<DeliverPolicy>,
    pub opt_start_seq: u64,
    pub opt_start_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_opt_duration")]
    pub ack_wait: Option<Duration>,
    pub max_deliver: i64,
    pub filter_subject: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub replay_policy: Option<ReplayPolicy>,
    #[serde(rename = "rateLimitBPS")]
    pub rate_limit_bps: u64,
    pub sample_frequency: String,
    pub max_ack_pending: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamSpec {
    /// Replaces the generated stream name.
    pub override_name: Option<String>,
    pub config: Option<StreamPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    Linear,
    Exponential,
}

/// Delivery options of a subscriber (or channel-wide defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliverySpec {
    pub dead_letter_sink: Option<String>,
    pub retry: Option<u32>,
    #[serde(deserialize_with = "empty_as_none")]
    pub backoff_policy: Option<BackoffPolicy>,
    pub backoff_delay: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriberSpec {
    pub uid: String,
    pub subscriber_uri: Option<String>,
    pub reply_uri: Option<String>,
    pub delivery: Option<DeliverySpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSpec {
    pub stream: Option<StreamSpec>,
    pub consumer_config_template: Option<ConsumerPolicyTemplate>,
    pub subscribers: Vec<SubscriberSpec>,
    /// Channel-wide delivery defaults for subscribers without their own.
    pub delivery: Option<DeliverySpec>,
}

impl ChannelSpec {
    pub fn stream_policy(&self) -> Option<&StreamPolicy> {
        self.stream.as_ref().and_then(|s| s.config.as_ref())
    }

    pub fn stream_override_name(&self) -> Option<&str> {
        self.stream
            .as_ref()
            .and_then(|s| s.override_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}
