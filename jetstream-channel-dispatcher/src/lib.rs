//! JetStream channel dispatcher
//!
//! Delivers the messages of a JetStream-backed channel to its subscribers,
//! and computes the stream and durable consumer configuration each channel
//! needs on the broker.

pub mod broker;
pub use broker::{BrokerMessage, MessageHeaders, SubscriptionHandle, MSG_ID_HEADER};

mod consumer;
pub use consumer::{Consumer, ConsumerState};

mod dispatcher_metrics;
pub use dispatcher_metrics::describe_metrics;

pub mod errors;
pub use errors::{BrokerError, ConfigError, ConsumerError, DispatchError};

mod event_message;
pub use event_message::{Encoding, EventMessage};

mod message_dispatcher;
pub use message_dispatcher::{DispatchExecutionInfo, DispatchResult, MessageDispatcher};

pub mod naming;

pub mod service_configuration;

mod stats;
pub use stats::{MetricsStatsReporter, ReportArgs, StatsReporter};

mod subscription;
pub use subscription::{BackoffPolicy, Destination, RetryConfig, Subscription};

pub mod topology;
