#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use jetstream_channel_dispatcher::{
    BrokerError, BrokerMessage, Consumer, Destination, DispatchError, DispatchExecutionInfo,
    DispatchResult, EventMessage, MessageDispatcher, MessageHeaders, ReportArgs, RetryConfig,
    StatsReporter, Subscription, SubscriptionHandle,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

pub struct TestMessage {
    headers: MessageHeaders,
    payload: Bytes,
    ack_error: Option<BrokerError>,
    pub acks: AtomicUsize,
}

impl TestMessage {
    /// A binary-mode CloudEvent.
    pub fn binary(msg_id: &str, event_type: &str) -> Self {
        Self::with_headers(&[
            ("Nats-Msg-Id", msg_id),
            ("ce-specversion", "1.0"),
            ("ce-id", msg_id),
            ("ce-source", "/orders"),
            ("ce-type", event_type),
        ])
    }

    /// A message that is not a CloudEvent at all.
    pub fn plain(msg_id: &str) -> Self {
        Self::with_headers(&[("Nats-Msg-Id", msg_id), ("content-type", "text/plain")])
    }

    pub fn with_headers(headers: &[(&str, &str)]) -> Self {
        TestMessage {
            headers: headers.iter().copied().collect(),
            payload: Bytes::from_static(b"{\"order\":1}"),
            ack_error: None,
            acks: AtomicUsize::new(0),
        }
    }

    pub fn failing_ack(mut self, err: BrokerError) -> Self {
        self.ack_error = Some(err);
        self
    }

    pub fn ack_count(&self) -> usize {
        self.acks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerMessage for TestMessage {
    fn subject(&self) -> &str {
        "default.orders.sub-1._knative_consumer"
    }

    fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    fn payload(&self) -> &Bytes {
        &self.payload
    }

    async fn ack(&self) -> Result<(), BrokerError> {
        self.acks.fetch_add(1, Ordering::SeqCst);
        match &self.ack_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct TestSubscription {
    pub drains: Arc<AtomicUsize>,
    drain_error: Option<BrokerError>,
    drain_delay: Option<Duration>,
}

impl TestSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: BrokerError) -> Self {
        TestSubscription {
            drain_error: Some(err),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        TestSubscription {
            drain_delay: Some(delay),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SubscriptionHandle for TestSubscription {
    async fn drain(&self) -> Result<(), BrokerError> {
        self.drains.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.drain_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.drain_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Arguments the dispatcher was called with.
#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub msg_id: Option<String>,
    pub destination: Option<Destination>,
    pub subscriber: Option<Destination>,
    pub reply: Option<Destination>,
    pub dead_letter: Option<Destination>,
    pub retry: Option<RetryConfig>,
}

pub struct TestDispatcher {
    pub calls: Mutex<Vec<DispatchCall>>,
    result: DispatchResult,
    barrier: Option<Arc<Barrier>>,
}

impl TestDispatcher {
    pub fn succeeding() -> Self {
        Self::returning(Ok(DispatchExecutionInfo {
            time: Duration::from_millis(5),
            response_code: Some(202),
            response_body: Bytes::new(),
        }))
    }

    pub fn failing() -> Self {
        Self::returning(Err(DispatchError::with_info(
            "subscriber responded with 503",
            DispatchExecutionInfo {
                time: Duration::from_millis(20),
                response_code: Some(503),
                response_body: Bytes::from_static(b"unavailable"),
            },
        )))
    }

    pub fn returning(result: DispatchResult) -> Self {
        TestDispatcher {
            calls: Mutex::new(Vec::new()),
            result,
            barrier: None,
        }
    }

    /// Every dispatch waits until `barrier` is reached by all parties.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageDispatcher for TestDispatcher {
    async fn dispatch_with_retries(
        &self,
        message: &EventMessage,
        destination: Option<&Destination>,
        subscriber: Option<&Destination>,
        reply: Option<&Destination>,
        dead_letter: Option<&Destination>,
        retry: Option<&RetryConfig>,
    ) -> DispatchResult {
        self.calls.lock().unwrap().push(DispatchCall {
            msg_id: message.msg_id().map(str::to_string),
            destination: destination.cloned(),
            subscriber: subscriber.cloned(),
            reply: reply.cloned(),
            dead_letter: dead_letter.cloned(),
            retry: retry.cloned(),
        });
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.result.clone()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub success: bool,
    pub response_code: Option<u16>,
    pub args: ReportArgs,
}

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl StatsReporter for RecordingReporter {
    fn report(&self, result: &DispatchResult, args: &ReportArgs) {
        let response_code = match result {
            Ok(info) => info.response_code,
            Err(err) => err.info.as_ref().and_then(|info| info.response_code),
        };
        self.reports.lock().unwrap().push(Report {
            success: result.is_ok(),
            response_code,
            args: args.clone(),
        });
    }
}

pub fn test_subscription() -> Subscription {
    Subscription {
        uid: "sub-1".to_string(),
        subscriber: Some(Destination::new("http://billing.default.svc")),
        reply: Some(Destination::new("http://reply.default.svc")),
        dead_letter: Some(Destination::new("http://dls.default.svc")),
        retry_config: Some(RetryConfig {
            retry_max: 3,
            backoff_policy: Default::default(),
            backoff_delay: Some(Duration::from_millis(200)),
            timeout: None,
        }),
    }
}

pub fn new_consumer(
    dispatcher: Arc<TestDispatcher>,
    reporter: Arc<RecordingReporter>,
    subscription: TestSubscription,
) -> Consumer {
    Consumer::new(
        test_subscription(),
        dispatcher,
        reporter,
        "default",
        Box::new(subscription),
    )
}
