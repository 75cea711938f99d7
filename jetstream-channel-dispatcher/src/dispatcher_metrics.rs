pub(crate) struct Metric {
    pub name: &'static str,
    description: &'static str,
}

pub(crate) const COUNTERS: [Metric; 1] = [EVENT_COUNT_TOTAL];
pub(crate) const HISTOGRAMS: [Metric; 1] = [EVENT_DISPATCH_LATENCIES_MS];

// DISPATCH Metrics --------------------------

pub(crate) const EVENT_COUNT_TOTAL: Metric = Metric {
    name: "jetstream_channel_event_count_total",
    description: "Number of events dispatched to subscribers, by response code",
};

pub(crate) const EVENT_DISPATCH_LATENCIES_MS: Metric = Metric {
    name: "jetstream_channel_event_dispatch_latencies_ms",
    description: "Time spent dispatching an event to a subscriber, in milliseconds",
};

/// Registers descriptions for every dispatcher metric with the installed recorder.
pub fn describe_metrics() {
    for metric in COUNTERS {
        metrics::describe_counter!(metric.name, metric.description);
    }

    for metric in HISTOGRAMS {
        metrics::describe_histogram!(metric.name, metrics::Unit::Milliseconds, metric.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_unique() {
        let mut names: Vec<_> = COUNTERS
            .iter()
            .chain(HISTOGRAMS.iter())
            .map(|m| m.name)
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COUNTERS.len() + HISTOGRAMS.len());
    }

    #[test]
    fn describing_without_recorder_is_a_noop() {
        describe_metrics();
    }
}
