use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::{
    broker::{BrokerMessage, SubscriptionHandle},
    errors::{ConsumerError, Result},
    event_message::{Encoding, EventMessage},
    message_dispatcher::MessageDispatcher,
    stats::{ReportArgs, StatsReporter},
    subscription::Subscription,
};

/// Lifecycle of a [`Consumer`]. Only `Open` accepts a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Open,
    /// The subscription drain is in progress.
    Closing,
    Closed,
}

/// Forwards the messages of one durable JetStream subscription to a
/// channel subscriber.
///
/// Messages are handled independently and possibly concurrently. A message
/// is acked only after a successful dispatch; anything else leaves it to the
/// broker's ack-wait and max-deliver settings for redelivery.
pub struct Consumer {
    subscription: Subscription,
    dispatcher: Arc<dyn MessageDispatcher>,
    reporter: Arc<dyn StatsReporter>,
    channel_namespace: String,
    // exclusively owned; never shared between consumers
    handle: Box<dyn SubscriptionHandle>,
    state: Mutex<ConsumerState>,
}

impl Consumer {
    pub fn new(
        subscription: Subscription,
        dispatcher: Arc<dyn MessageDispatcher>,
        reporter: Arc<dyn StatsReporter>,
        channel_namespace: impl Into<String>,
        handle: Box<dyn SubscriptionHandle>,
    ) -> Self {
        Consumer {
            subscription,
            dispatcher,
            reporter,
            channel_namespace: channel_namespace.into(),
            handle,
            state: Mutex::new(ConsumerState::Open),
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// True once a close request has been accepted.
    pub fn is_closed(&self) -> bool {
        // the lock is only ever held by a close that has accepted the request
        match self.state.try_lock() {
            Ok(state) => *state != ConsumerState::Open,
            Err(_) => true,
        }
    }

    /// Drains the subscription. Only the first call reaches the broker;
    /// later calls return [`ConsumerError::ConsumerClosed`].
    ///
    /// Handlers already running are not awaited.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if *state != ConsumerState::Open {
            return Err(ConsumerError::ConsumerClosed);
        }

        *state = ConsumerState::Closing;
        let drained = self.handle.drain().await;
        *state = ConsumerState::Closed;

        debug!(
            subscription = %self.subscription.uid,
            "drained JetStream subscription"
        );
        drained.map_err(ConsumerError::Drain)
    }

    /// Handles one message delivered by the broker.
    pub async fn handle_message(&self, msg: &dyn BrokerMessage) {
        if let Err(err) = self.do_handle(msg).await {
            error!(
                subscription = %self.subscription.uid,
                error = %err,
                "failed to handle message"
            );
            return;
        }

        if let Err(err) = msg.ack().await.map_err(ConsumerError::Ack) {
            error!(
                subscription = %self.subscription.uid,
                error = %err,
                "failed to ack message after successful delivery to subscriber"
            );
        }
    }

    /// Handles `msg` on its own task.
    pub fn spawn_handler(self: &Arc<Self>, msg: Arc<dyn BrokerMessage>) -> JoinHandle<()> {
        let consumer = Arc::clone(self);
        tokio::spawn(async move { consumer.handle_message(msg.as_ref()).await })
    }

    async fn do_handle(&self, msg: &dyn BrokerMessage) -> Result<()> {
        let message = EventMessage::new(msg);
        let msg_id = message.msg_id().unwrap_or_default().to_string();
        debug!(
            msg_id = %msg_id,
            subscription = %self.subscription.uid,
            "received message from JetStream consumer"
        );

        if message.read_encoding() == Encoding::Unknown {
            return Err(ConsumerError::UnknownEncoding);
        }

        let event_type = message.event_type().unwrap_or_default();

        let result = self
            .dispatcher
            .dispatch_with_retries(
                &message,
                None,
                self.subscription.subscriber.as_ref(),
                self.subscription.reply.as_ref(),
                self.subscription.dead_letter.as_ref(),
                self.subscription.retry_config.as_ref(),
            )
            .await;

        let args = ReportArgs {
            ns: self.channel_namespace.clone(),
            event_type,
        };
        self.reporter.report(&result, &args);

        debug!(
            msg_id = %msg_id,
            subscription = %self.subscription.uid,
            "message forwarded to downstream subscriber"
        );
        result.map(|_| ()).map_err(ConsumerError::from)
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("subscription", &self.subscription.uid)
            .field("channel_namespace", &self.channel_namespace)
            .field("closed", &self.is_closed())
            .finish()
    }
}
