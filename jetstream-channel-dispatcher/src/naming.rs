//! Deterministic JetStream identifiers for channels and their subscribers.

/// Stream backing the channel `namespace/name`.
pub fn stream_name(namespace: &str, name: &str) -> String {
    format!("KN_{}__{}", namespace, name).to_uppercase()
}

/// Subject the channel's ingress publishes to.
pub fn publish_subject_name(namespace: &str, name: &str) -> String {
    format!("{}.{}._knative", namespace, name)
}

/// Durable consumer (and delivery group) of a subscriber.
pub fn consumer_name(subscriber_uid: &str) -> String {
    format!("KN_SUB_{}", subscriber_uid.replace('-', "_"))
}

/// Subject the broker pushes a subscriber's messages to.
pub fn consumer_subject_name(namespace: &str, name: &str, subscriber_uid: &str) -> String {
    format!("{}.{}.{}._knative_consumer", namespace, name, subscriber_uid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deterministic() {
        assert_eq!(stream_name("default", "orders"), "KN_DEFAULT__ORDERS");
        assert_eq!(publish_subject_name("default", "orders"), "default.orders._knative");
        assert_eq!(
            consumer_name("7c5b6f2e-1d44-4c1e"),
            "KN_SUB_7c5b6f2e_1d44_4c1e"
        );
        assert_eq!(
            consumer_subject_name("default", "orders", "abc"),
            "default.orders.abc._knative_consumer"
        );
    }
}
