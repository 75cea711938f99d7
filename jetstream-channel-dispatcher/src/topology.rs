//! Builds the JetStream stream and consumer configuration of a channel.
//!
//! The builders are total: invalid combinations (e.g. a filter subject
//! outside the stream's subjects) are left for the broker to reject when
//! the configuration is applied.

use jetstream_channel_core::{
    channel_spec::{ChannelSpec, ConsumerPolicyTemplate, StreamPolicy},
    jetstream::{
        AckPolicy, ConsumerTopology, DeliverPolicy, DiscardPolicy, ReplayPolicy,
        RetentionPolicy, StorageType, StreamTopology,
    },
    policy::{
        convert_deliver_policy, convert_discard_policy, convert_placement,
        convert_replay_policy, convert_retention_policy, convert_storage,
        convert_stream_source, convert_stream_sources,
    },
};
use serde::Serialize;

use crate::naming;

const DEFAULT_RETENTION: RetentionPolicy = RetentionPolicy::Limits;
const DEFAULT_DISCARD: DiscardPolicy = DiscardPolicy::Old;
const DEFAULT_STORAGE: StorageType = StorageType::File;
const DEFAULT_DELIVER_POLICY: DeliverPolicy = DeliverPolicy::All;
const DEFAULT_REPLAY_POLICY: ReplayPolicy = ReplayPolicy::Instant;

/// Stream configuration for `stream_name`.
///
/// `subject` always comes first in the subject list, followed by the
/// policy's additional subjects in their declared order. Without a policy
/// only the name and subject are set.
pub fn build_stream_topology(
    stream_name: &str,
    subject: &str,
    policy: Option<&StreamPolicy>,
) -> StreamTopology {
    let Some(policy) = policy else {
        return StreamTopology {
            name: stream_name.to_string(),
            subjects: vec![subject.to_string()],
            ..Default::default()
        };
    };

    let mut subjects = Vec::with_capacity(policy.additional_subjects.len() + 1);
    subjects.push(subject.to_string());
    subjects.extend(policy.additional_subjects.iter().cloned());

    StreamTopology {
        name: stream_name.to_string(),
        subjects,
        retention: convert_retention_policy(policy.retention, DEFAULT_RETENTION),
        max_consumers: policy.max_consumers,
        max_msgs: policy.max_msgs,
        max_bytes: policy.max_bytes,
        discard: convert_discard_policy(policy.discard, DEFAULT_DISCARD),
        max_age: policy.max_age.unwrap_or_default(),
        max_msg_size: policy.max_msg_size,
        storage: convert_storage(policy.storage, DEFAULT_STORAGE),
        num_replicas: policy.replicas,
        no_ack: policy.no_ack,
        duplicate_window: policy.duplicate_window.unwrap_or_default(),
        placement: convert_placement(policy.placement.as_ref()),
        mirror: convert_stream_source(policy.mirror.as_ref()),
        sources: convert_stream_sources(&policy.sources),
    }
}

/// Durable consumer configuration for `consumer_name`.
///
/// The durable name doubles as the delivery group so every replica of the
/// dispatcher shares the load, and acks are always explicit.
pub fn build_consumer_topology(
    consumer_name: &str,
    deliver_subject: &str,
    template: Option<&ConsumerPolicyTemplate>,
) -> ConsumerTopology {
    let mut consumer = ConsumerTopology {
        durable: consumer_name.to_string(),
        deliver_group: consumer_name.to_string(),
        deliver_subject: deliver_subject.to_string(),
        ack_policy: AckPolicy::Explicit,
        ..Default::default()
    };

    if let Some(template) = template {
        consumer.deliver_policy =
            convert_deliver_policy(template.deliver_policy, DEFAULT_DELIVER_POLICY);
        consumer.opt_start_seq = template.opt_start_seq;
        consumer.ack_wait = template.ack_wait.unwrap_or_default();
        consumer.max_deliver = template.max_deliver;
        consumer.filter_subject = template.filter_subject.clone();
        consumer.replay_policy =
            convert_replay_policy(template.replay_policy, DEFAULT_REPLAY_POLICY);
        consumer.rate_limit = template.rate_limit_bps;
        consumer.sample_frequency = template.sample_frequency.clone();
        consumer.max_ack_pending = template.max_ack_pending;

        // never substitute a zero time: the broker reads it as "start at the epoch"
        consumer.opt_start_time = template.opt_start_time;
    }

    consumer
}

/// Consumer configuration of one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberTopology {
    pub uid: String,
    pub consumer: ConsumerTopology,
}

/// Everything a reconciler has to apply for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelTopology {
    pub namespace: String,
    pub name: String,
    pub stream: StreamTopology,
    pub consumers: Vec<SubscriberTopology>,
}

pub fn build_channel_topology(namespace: &str, name: &str, spec: &ChannelSpec) -> ChannelTopology {
    let stream_name = spec
        .stream_override_name()
        .map(str::to_string)
        .unwrap_or_else(|| naming::stream_name(namespace, name));
    let subject = naming::publish_subject_name(namespace, name);
    let stream = build_stream_topology(&stream_name, &subject, spec.stream_policy());

    let consumers = spec
        .subscribers
        .iter()
        .map(|subscriber| SubscriberTopology {
            uid: subscriber.uid.clone(),
            consumer: build_consumer_topology(
                &naming::consumer_name(&subscriber.uid),
                &naming::consumer_subject_name(namespace, name, &subscriber.uid),
                spec.consumer_config_template.as_ref(),
            ),
        })
        .collect();

    ChannelTopology {
        namespace: namespace.to_string(),
        name: name.to_string(),
        stream,
        consumers,
    }
}
