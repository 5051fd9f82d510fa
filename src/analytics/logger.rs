use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// A single entry in the structured request log (`~/.qdash/request-log.jsonl`).
///
/// Each entry records one backend request: which endpoint, whether it
/// succeeded, and how long it took. Used by the reporter for `qdash history`
/// and by `qdash health` for a quick liveness summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    /// Endpoint path, e.g. `"/estado"`.
    pub endpoint: String,
    #[serde(default = "default_true")]
    pub success: bool,
    pub latency_ms: u64,
    /// Failure description, set only for failed requests.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Record a completed backend request. Best-effort: logging never fails the
/// caller.
pub fn log_request(endpoint: &str, success: bool, latency_ms: u64, error: Option<&str>) {
    let entry = RequestLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        endpoint: endpoint.to_string(),
        success,
        latency_ms,
        error: error.map(str::to_string),
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all request log entries from `~/.qdash/request-log.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries() -> Vec<RequestLogEntry> {
    let Some(path) = request_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
        .collect()
}

/// Read log entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<RequestLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &RequestLogEntry) -> Result<()> {
    let Some(path) = request_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the request log file.
pub fn request_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qdash").join("request-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = RequestLogEntry {
            timestamp: "2026-08-07T12:00:00+00:00".to_string(),
            endpoint: "/estado".to_string(),
            success: true,
            latency_ms: 42,
            error: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"error\"")); // skipped when None

        let back: RequestLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.endpoint, "/estado");
        assert!(back.success);
        assert_eq!(back.latency_ms, 42);
    }

    #[test]
    fn failed_entry_keeps_its_error() {
        let entry = RequestLogEntry {
            timestamp: "2026-08-07T12:00:00+00:00".to_string(),
            endpoint: "/ia-optimize".to_string(),
            success: false,
            latency_ms: 10_003,
            error: Some("request timed out".to_string()),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: RequestLogEntry = serde_json::from_str(&json).unwrap();
        assert!(!back.success);
        assert_eq!(back.error.as_deref(), Some("request timed out"));
    }

    #[test]
    fn success_defaults_to_true_for_old_entries() {
        let json = r#"{"timestamp":"t","endpoint":"/estado","latency_ms":5}"#;
        let entry: RequestLogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.success);
    }
}
