//! Close semantics of the JetStream consumer

extern crate jetstream_channel_dispatcher;

use futures::future::join_all;
use jetstream_channel_dispatcher::{BrokerError, ConsumerError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{new_consumer, RecordingReporter, TestDispatcher, TestSubscription};

#[tokio::test]
async fn close_twice_drains_once() {
    let subscription = TestSubscription::new();
    let drains = subscription.drains.clone();
    let consumer = new_consumer(
        Arc::new(TestDispatcher::succeeding()),
        Arc::new(RecordingReporter::default()),
        subscription,
    );

    assert!(!consumer.is_closed());
    consumer.close().await.unwrap();
    assert!(consumer.is_closed());

    let second = consumer.close().await;
    assert!(matches!(second, Err(ConsumerError::ConsumerClosed)));
    assert_eq!(drains.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn drain_error_is_returned_once_and_not_retried() {
    let subscription = TestSubscription::failing(BrokerError::ConnectionClosed);
    let drains = subscription.drains.clone();
    let consumer = new_consumer(
        Arc::new(TestDispatcher::succeeding()),
        Arc::new(RecordingReporter::default()),
        subscription,
    );

    let first = consumer.close().await;
    assert!(matches!(
        first,
        Err(ConsumerError::Drain(BrokerError::ConnectionClosed))
    ));
    assert!(consumer.is_closed());

    let second = consumer.close().await;
    assert!(matches!(second, Err(ConsumerError::ConsumerClosed)));
    assert_eq!(drains.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_close_drains_exactly_once() {
    let subscription = TestSubscription::slow(Duration::from_millis(50));
    let drains = subscription.drains.clone();
    let consumer = Arc::new(new_consumer(
        Arc::new(TestDispatcher::succeeding()),
        Arc::new(RecordingReporter::default()),
        subscription,
    ));

    let closers = (0..8).map(|_| {
        let consumer = Arc::clone(&consumer);
        tokio::spawn(async move { consumer.close().await })
    });
    let results: Vec<_> = join_all(closers)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(ConsumerError::ConsumerClosed)))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(rejected, 7);
    assert_eq!(drains.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn consumer_reports_closed_while_draining() {
    let subscription = TestSubscription::slow(Duration::from_millis(200));
    let consumer = Arc::new(new_consumer(
        Arc::new(TestDispatcher::succeeding()),
        Arc::new(RecordingReporter::default()),
        subscription,
    ));

    let closing = {
        let consumer = Arc::clone(&consumer);
        tokio::spawn(async move { consumer.close().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(consumer.is_closed());

    closing.await.unwrap().unwrap();
    assert!(consumer.is_closed());
}
