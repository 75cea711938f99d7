//! Conversions from channel-level policies to JetStream-native values.
//!
//! Every enum converter returns `fallback` when the channel leaves the
//! policy unset. None of them can fail.

use crate::channel_spec::{self as spec, PlacementSpec, StreamSourceSpec};
use crate::jetstream::{
    DeliverPolicy, DiscardPolicy, Placement, ReplayPolicy, RetentionPolicy, StorageType,
    StreamSource,
};

pub fn convert_retention_policy(
    value: Option<spec::RetentionPolicy>,
    fallback: RetentionPolicy,
) -> RetentionPolicy {
    match value {
        Some(spec::RetentionPolicy::Limits) => RetentionPolicy::Limits,
        Some(spec::RetentionPolicy::Interest) => RetentionPolicy::Interest,
        Some(spec::RetentionPolicy::Work) => RetentionPolicy::WorkQueue,
        None => fallback,
    }
}

pub fn convert_discard_policy(
    value: Option<spec::DiscardPolicy>,
    fallback: DiscardPolicy,
) -> DiscardPolicy {
    match value {
        Some(spec::DiscardPolicy::Old) => DiscardPolicy::Old,
        Some(spec::DiscardPolicy::New) => DiscardPolicy::New,
        None => fallback,
    }
}

pub fn convert_storage(value: Option<spec::Storage>, fallback: StorageType) -> StorageType {
    match value {
        Some(spec::Storage::File) => StorageType::File,
        Some(spec::Storage::Memory) => StorageType::Memory,
        None => fallback,
    }
}

pub fn convert_deliver_policy(
    value: Option<spec::DeliverPolicy>,
    fallback: DeliverPolicy,
) -> DeliverPolicy {
    match value {
        Some(spec::DeliverPolicy::All) => DeliverPolicy::All,
        Some(spec::DeliverPolicy::Last) => DeliverPolicy::Last,
        Some(spec::DeliverPolicy::New) => DeliverPolicy::New,
        Some(spec::DeliverPolicy::ByStartSequence) => DeliverPolicy::ByStartSequence,
        Some(spec::DeliverPolicy::ByStartTime) => DeliverPolicy::ByStartTime,
        Some(spec::DeliverPolicy::LastPerSubject) => DeliverPolicy::LastPerSubject,
        None => fallback,
    }
}

pub fn convert_replay_policy(
    value: Option<spec::ReplayPolicy>,
    fallback: ReplayPolicy,
) -> ReplayPolicy {
    match value {
        Some(spec::ReplayPolicy::Instant) => ReplayPolicy::Instant,
        Some(spec::ReplayPolicy::Original) => ReplayPolicy::Original,
        None => fallback,
    }
}

pub fn convert_placement(value: Option<&PlacementSpec>) -> Option<Placement> {
    value.map(|p| Placement {
        cluster: p.cluster.clone(),
        tags: p.tags.clone(),
    })
}

pub fn convert_stream_source(value: Option<&StreamSourceSpec>) -> Option<StreamSource> {
    value.map(|s| StreamSource {
        name: s.name.clone(),
        opt_start_seq: s.opt_start_seq,
        opt_start_time: s.opt_start_time,
        filter_subject: s.filter_subject.clone(),
    })
}

pub fn convert_stream_sources(values: &[StreamSourceSpec]) -> Vec<StreamSource> {
    values
        .iter()
        .filter_map(|s| convert_stream_source(Some(s)))
        .collect()
}
