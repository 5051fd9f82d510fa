//! Request-log aggregation for `qdash history`.
//!
//! Reads the JSONL request log and provides per-endpoint summaries
//! (request count, failures, success rate, average latency) plus the raw
//! recent entries.

use std::collections::HashMap;

use crate::analytics::logger::{self, RequestLogEntry};

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Per-endpoint aggregated statistics.
#[derive(Debug, Clone)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub requests: usize,
    pub failures: usize,
    pub success_pct: f64,
    pub avg_latency_ms: u64,
}

/// History report: per-endpoint aggregates plus the most recent entries.
#[derive(Debug)]
pub struct History {
    pub summaries: Vec<EndpointSummary>,
    pub recent: Vec<RequestLogEntry>,
}

/// Number of raw entries included in a history report.
const RECENT_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute the history report, optionally windowed to the last `days` days.
pub fn compute_history(days: Option<u32>) -> History {
    let entries = logger::read_entries_since_days(days);
    build_history(&entries)
}

fn build_history(entries: &[RequestLogEntry]) -> History {
    let summaries = summarize_endpoints(entries);

    // Entries are appended chronologically; the tail is the most recent.
    let recent: Vec<RequestLogEntry> = entries
        .iter()
        .rev()
        .take(RECENT_LIMIT)
        .cloned()
        .collect();

    History { summaries, recent }
}

/// Group entries by endpoint and compute per-endpoint stats, sorted by
/// request count (descending).
fn summarize_endpoints(entries: &[RequestLogEntry]) -> Vec<EndpointSummary> {
    let mut groups: HashMap<&str, Vec<&RequestLogEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.endpoint.as_str()).or_default().push(entry);
    }

    let mut summaries: Vec<EndpointSummary> = groups
        .into_iter()
        .map(|(endpoint, group)| {
            let requests = group.len();
            let failures = group.iter().filter(|e| !e.success).count();
            let success_pct = if requests == 0 {
                0.0
            } else {
                ((requests - failures) as f64 / requests as f64) * 100.0
            };
            let total_latency: u64 = group.iter().map(|e| e.latency_ms).sum();
            let avg_latency_ms = total_latency / requests as u64;

            EndpointSummary {
                endpoint: endpoint.to_string(),
                requests,
                failures,
                success_pct,
                avg_latency_ms,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.requests.cmp(&a.requests).then(a.endpoint.cmp(&b.endpoint)));
    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(endpoint: &str, success: bool, latency_ms: u64) -> RequestLogEntry {
        RequestLogEntry {
            timestamp: "2026-08-07T12:00:00+00:00".to_string(),
            endpoint: endpoint.to_string(),
            success,
            latency_ms,
            error: if success {
                None
            } else {
                Some("boom".to_string())
            },
        }
    }

    #[test]
    fn empty_log_yields_empty_history() {
        let history = build_history(&[]);
        assert!(history.summaries.is_empty());
        assert!(history.recent.is_empty());
    }

    #[test]
    fn summaries_aggregate_per_endpoint() {
        let entries = vec![
            entry("/estado", true, 10),
            entry("/estado", true, 30),
            entry("/estado", false, 200),
            entry("/analisis", true, 20),
        ];
        let history = build_history(&entries);

        assert_eq!(history.summaries.len(), 2);
        let estado = &history.summaries[0]; // most requests first
        assert_eq!(estado.endpoint, "/estado");
        assert_eq!(estado.requests, 3);
        assert_eq!(estado.failures, 1);
        assert!((estado.success_pct - 66.666).abs() < 0.1);
        assert_eq!(estado.avg_latency_ms, 80);
    }

    #[test]
    fn recent_entries_are_newest_first() {
        let mut entries = Vec::new();
        for i in 0..30 {
            entries.push(entry(if i % 2 == 0 { "/estado" } else { "/analisis" }, true, i));
        }
        let history = build_history(&entries);

        assert_eq!(history.recent.len(), 20);
        assert_eq!(history.recent[0].latency_ms, 29); // last appended comes first
    }

    #[test]
    fn tied_request_counts_sort_by_endpoint_name() {
        let entries = vec![entry("/ia-status", true, 5), entry("/analisis", true, 5)];
        let history = build_history(&entries);
        assert_eq!(history.summaries[0].endpoint, "/analisis");
        assert_eq!(history.summaries[1].endpoint, "/ia-status");
    }
}
