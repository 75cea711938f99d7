use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::{
    errors::DispatchError,
    event_message::EventMessage,
    subscription::{Destination, RetryConfig},
};

/// What happened on the last delivery attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchExecutionInfo {
    pub time: Duration,
    /// `None` when no response was received (e.g. a network failure).
    pub response_code: Option<u16>,
    pub response_body: Bytes,
}

pub type DispatchResult = std::result::Result<DispatchExecutionInfo, DispatchError>;

/// Delivers an event to a subscriber, retrying according to `retry`.
///
/// Implementations own all HTTP, retry and backoff behavior and must be
/// safe to call from many message handlers at once.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn dispatch_with_retries(
        &self,
        message: &EventMessage,
        destination: Option<&Destination>,
        subscriber: Option<&Destination>,
        reply: Option<&Destination>,
        dead_letter: Option<&Destination>,
        retry: Option<&RetryConfig>,
    ) -> DispatchResult;
}
