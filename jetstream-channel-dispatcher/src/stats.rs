use metrics::{counter, histogram};

use crate::dispatcher_metrics::{EVENT_COUNT_TOTAL, EVENT_DISPATCH_LATENCIES_MS};
use crate::message_dispatcher::{DispatchExecutionInfo, DispatchResult};

/// Response code recorded for a failed dispatch that got no response.
const FAILED_DISPATCH_CODE: u16 = 500;
const ACCEPTED_DISPATCH_CODE: u16 = 200;

/// Labels attached to a dispatch report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArgs {
    pub ns: String,
    pub event_type: String,
}

/// Receives the outcome of every dispatch. Reporting is best-effort and
/// must never fail the caller.
pub trait StatsReporter: Send + Sync {
    fn report(&self, result: &DispatchResult, args: &ReportArgs);
}

/// Response code used for reporting, substituting a fixed code when the
/// dispatcher got no response.
pub(crate) fn reported_code(result: &DispatchResult) -> u16 {
    match result {
        Ok(info) => info.response_code.unwrap_or(ACCEPTED_DISPATCH_CODE),
        Err(err) => err
            .info
            .as_ref()
            .and_then(|info| info.response_code)
            .unwrap_or(FAILED_DISPATCH_CODE),
    }
}

fn response_code_class(code: u16) -> String {
    format!("{}xx", code / 100)
}

/// StatsReporter backed by the `metrics` facade.
#[derive(Debug, Clone, Default)]
pub struct MetricsStatsReporter;

impl MetricsStatsReporter {
    pub fn new() -> Self {
        MetricsStatsReporter
    }
}

impl StatsReporter for MetricsStatsReporter {
    fn report(&self, result: &DispatchResult, args: &ReportArgs) {
        let code = reported_code(result);
        let labels = [
            ("namespace_name", args.ns.clone()),
            ("event_type", args.event_type.clone()),
            ("response_code", code.to_string()),
            ("response_code_class", response_code_class(code)),
        ];

        let info: Option<&DispatchExecutionInfo> = match result {
            Ok(info) => Some(info),
            Err(err) => err.info.as_ref(),
        };
        if let Some(info) = info.filter(|info| !info.time.is_zero()) {
            histogram!(EVENT_DISPATCH_LATENCIES_MS.name, &labels)
                .record(info.time.as_secs_f64() * 1_000.0);
        }

        counter!(EVENT_COUNT_TOTAL.name, &labels).increment(1);
    }
}
