//! Synchronous HTTP client for the monitoring backend.
//!
//! Talks to the four JSON endpoints over plain GET using `ureq`. Each
//! request applies the configured timeout, propagates failures as
//! `anyhow::Result` with context, and records its outcome (endpoint,
//! latency, success) in the request log.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::analytics::logger;
use crate::api::Backend;
use crate::api::types::{AnalysisReport, StatusReport};
use crate::config::BackendConfig;

/// Blocking client for the monitoring backend.
///
/// Created from the resolved config and reused for the lifetime of a single
/// command invocation (or one viewer request).
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client from the resolved backend config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// The normalized base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the backend is reachable and serving status.
    ///
    /// Uses a short timeout (5 s) so `qdash health` doesn't stall when the
    /// backend is down. Does not touch the request log.
    pub fn is_healthy(&self) -> bool {
        let url = format!("{}/estado", self.base_url);
        ureq::get(&url)
            .timeout(Duration::from_secs(5))
            .call()
            .is_ok()
    }

    /// `GET /estado` decoded as a raw JSON value, for verbatim dumps
    /// (`qdash status --format json`).
    pub fn fetch_status_raw(&self) -> Result<Value> {
        self.get_json("/estado")
    }

    /// Issue a GET, decode the JSON body, and record the outcome.
    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let outcome = ureq::get(&url)
            .timeout(self.timeout)
            .call()
            .with_context(|| format!("request to {url} failed"))
            .and_then(|resp| {
                resp.into_json::<T>()
                    .with_context(|| format!("failed to parse JSON from {url}"))
            });

        let latency_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => logger::log_request(path, true, latency_ms, None),
            Err(e) => logger::log_request(path, false, latency_ms, Some(&format!("{e:#}"))),
        }

        outcome
    }
}

impl Backend for HttpClient {
    /// `GET /estado` — current operational counters.
    fn fetch_status(&self) -> Result<StatusReport> {
        self.get_json("/estado")
    }

    /// `GET /analisis` — alerts and optional recommendations.
    fn fetch_analysis(&self) -> Result<AnalysisReport> {
        self.get_json("/analisis")
    }

    /// `GET /ia-status` — arbitrary AI status object, rendered verbatim.
    fn fetch_ai_status(&self) -> Result<Value> {
        self.get_json("/ia-status")
    }

    /// `GET /ia-optimize` — trigger the optimize action; arbitrary result
    /// object, rendered verbatim.
    fn request_optimization(&self) -> Result<Value> {
        self.get_json("/ia-optimize")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
