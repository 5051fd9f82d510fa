//! Backend API surface: wire types, the `Backend` trait, and the HTTP
//! client that implements it.

pub mod client;
pub mod types;

use anyhow::Result;
use serde_json::Value;

pub use client::HttpClient;
pub use types::{AnalysisReport, StatusReport};

/// The four backend operations the dashboard consumes.
///
/// The HTTP client is the production implementation; tests drive the
/// dashboard controller through a stub.
pub trait Backend {
    fn fetch_status(&self) -> Result<StatusReport>;
    fn fetch_analysis(&self) -> Result<AnalysisReport>;
    fn fetch_ai_status(&self) -> Result<Value>;
    fn request_optimization(&self) -> Result<Value>;
}
