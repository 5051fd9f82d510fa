//! CLI command implementations for qdash.
//!
//! Provides subcommand handlers for:
//! - `qdash dashboard` — full load chain, rendered for the terminal or as HTML
//! - `qdash status` — one-shot status check (formatted or raw JSON)
//! - `qdash optimize` — trigger the optimize action and reload
//! - `qdash health` — backend reachability, config, request log
//! - `qdash history` — request-log summaries and recent entries
//! - `qdash config show|init|set|reset` — configuration management
//!
//! The terminal views apply the same degradation rules as the HTML
//! renderers: missing text fields print `N/A`, missing counters print `0`.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use serde_json::Value;

use crate::analytics::logger;
use crate::analytics::reporter::{self, History};
use crate::api::types::{AnalysisReport, StatusReport};
use crate::api::{Backend, HttpClient};
use crate::config;
use crate::dashboard::Dashboard;
use crate::render::{self, page};
use crate::web;

/// Output format for the history command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Output format for the dashboard and status commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFormat {
    Text,
    Html,
    Json,
}

impl ViewFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("html") => Self::Html,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// qdash dashboard
// ---------------------------------------------------------------------------

/// Run the full load chain once and print the dashboard.
///
/// `--format html` prints the assembled page markup (the same document the
/// viewer server returns); the default prints a colored terminal view with
/// identical chain semantics: status first, then analysis and AI status as
/// follow-ups only when status succeeds.
pub fn run_dashboard(format: ViewFormat) -> Result<()> {
    let cfg = config::load();
    let client = HttpClient::from_config(&cfg.backend);

    if format == ViewFormat::Html {
        let mut dash = Dashboard::new(client, Duration::ZERO);
        dash.refresh();
        let view = dash.into_view();
        println!(
            "{}",
            page::render_page(&cfg.dashboard.title, view.panel(), view.ia_panel())
        );
        return Ok(());
    }

    println!("{}", cfg.dashboard.title.bold().cyan());
    println!("{}", "=".repeat(60));

    match client.fetch_status() {
        Ok(status) => {
            print_status_text(&status);

            println!();
            match client.fetch_analysis() {
                Ok(report) => print_analysis_text(&report),
                Err(e) => print_fetch_error("Analysis request", &e),
            }

            println!();
            match client.fetch_ai_status() {
                Ok(value) => print_ai_status_text(&value),
                Err(e) => print_fetch_error("AI status request", &e),
            }
        }
        Err(e) => print_fetch_error("Status request", &e),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// qdash status
// ---------------------------------------------------------------------------

/// One-shot status check.
///
/// The default prints the formatted summary; `--format json` dumps the raw
/// response verbatim.
pub fn run_status(format: ViewFormat) -> Result<()> {
    let cfg = config::load();
    let client = HttpClient::from_config(&cfg.backend);

    if format == ViewFormat::Json {
        let raw = client.fetch_status_raw()?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let status = client.fetch_status()?;
    print_status_text(&status);
    Ok(())
}

// ---------------------------------------------------------------------------
// qdash optimize
// ---------------------------------------------------------------------------

/// Trigger the optimize action from the terminal.
///
/// Prints the working notice immediately, then the verbatim result (or the
/// error), then reloads the status view after the configured delay.
pub fn run_optimize() -> Result<()> {
    let cfg = config::load();
    let client = HttpClient::from_config(&cfg.backend);

    println!("{}", "Running AI optimization…".yellow());

    match client.request_optimization() {
        Ok(result) => {
            println!("{} Optimization complete:", "✓".green().bold());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => print_fetch_error("Optimization request", &e),
    }

    let delay = cfg.dashboard.reload_delay_ms;
    println!();
    println!("{}", format!("Reloading status in {delay} ms…").dimmed());
    thread::sleep(Duration::from_millis(delay));

    match client.fetch_status() {
        Ok(status) => print_status_text(&status),
        Err(e) => print_fetch_error("Status request", &e),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// qdash serve
// ---------------------------------------------------------------------------

/// Start the local viewer server.
pub fn run_serve(addr_override: Option<String>) -> Result<()> {
    let cfg = config::load();
    let addr = addr_override.unwrap_or_else(|| cfg.serve.addr.clone());
    web::serve(&addr, &cfg)
}

// ---------------------------------------------------------------------------
// qdash health
// ---------------------------------------------------------------------------

/// Check system health: backend reachability, config files, request log.
pub fn run_health() -> Result<()> {
    println!("{}", "qdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let cfg = config::load();

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.qdash/config.toml found"
        } else {
            "not found (run `qdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".qdash.toml found"
        } else {
            "none (optional)"
        },
    );

    // 1. Backend reachability
    let client = HttpClient::from_config(&cfg.backend);
    let backend_ok = client.is_healthy();
    let backend_detail = if backend_ok {
        format!("reachable at {}", client.base_url())
    } else {
        format!("not reachable at {} — is the backend running?", client.base_url())
    };
    print_health_item("Backend", backend_ok, &backend_detail);

    // 2. Request log
    let log_exists = logger::request_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_entries = if log_exists {
        logger::read_all_entries().len()
    } else {
        0
    };
    print_health_item(
        "Request log",
        log_exists,
        &if log_exists {
            format!("{} entries", log_entries)
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// qdash history
// ---------------------------------------------------------------------------

/// Show request-log history: per-endpoint summaries plus recent entries.
pub fn run_history(format: OutputFormat, days: Option<u32>, endpoint: Option<&str>) -> Result<()> {
    let mut history = reporter::compute_history(days);

    if let Some(pattern) = endpoint {
        let re = Regex::new(pattern).context("invalid endpoint pattern")?;
        history.summaries.retain(|s| re.is_match(&s.endpoint));
        history.recent.retain(|e| re.is_match(&e.endpoint));
    }

    if history.summaries.is_empty() {
        println!(
            "{}",
            "No request history yet. Run `qdash dashboard` to poll the backend.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_history_json(&history)?,
        OutputFormat::Csv => print_history_csv(&history),
        OutputFormat::Table => print_history_table(&history),
    }

    Ok(())
}

fn print_history_table(history: &History) {
    println!("{}", "qdash Request History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    let total: usize = history.summaries.iter().map(|s| s.requests).sum();
    println!("  {} {}", "Total requests:".bold(), format_number(total));
    println!();

    println!("{}", "Per Endpoint".bold().cyan());
    println!(
        "  {:<14} {:>8} {:>9} {:>9} {:>10}",
        "Endpoint", "Requests", "Failures", "Success", "Avg ms"
    );
    println!("  {}", "-".repeat(56));
    for s in &history.summaries {
        println!(
            "  {:<14} {:>8} {:>9} {:>8.1}% {:>10}",
            s.endpoint, s.requests, s.failures, s.success_pct, s.avg_latency_ms,
        );
    }

    if !history.recent.is_empty() {
        println!();
        println!("{}", "Recent Requests".bold().cyan());
        for (i, entry) in history.recent.iter().enumerate() {
            let mark = if entry.success {
                "✓".green()
            } else {
                "✗".red()
            };
            let line = format!(
                "  {} {:<22} {:<12} {:>6}ms {}",
                mark,
                truncate(&entry.timestamp, 22),
                entry.endpoint,
                entry.latency_ms,
                entry.error.as_deref().map(|e| truncate(e, 40)).unwrap_or_default(),
            );
            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_history_json(history: &History) -> Result<()> {
    let value = serde_json::json!({
        "summaries": history.summaries.iter().map(|s| serde_json::json!({
            "endpoint": s.endpoint,
            "requests": s.requests,
            "failures": s.failures,
            "success_pct": s.success_pct,
            "avg_latency_ms": s.avg_latency_ms,
        })).collect::<Vec<_>>(),
        "recent": history.recent.iter().map(|e| serde_json::json!({
            "timestamp": e.timestamp,
            "endpoint": e.endpoint,
            "success": e.success,
            "latency_ms": e.latency_ms,
            "error": e.error,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_history_csv(history: &History) {
    println!("endpoint,requests,failures,success_pct,avg_latency_ms");
    for s in &history.summaries {
        println!(
            "{},{},{},{:.1},{}",
            s.endpoint, s.requests, s.failures, s.success_pct, s.avg_latency_ms,
        );
    }
}

// ---------------------------------------------------------------------------
// qdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective qdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.qdash/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.qdash/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".qdash.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".qdash.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "QDASH_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.qdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point qdash at your backend.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal views
// ---------------------------------------------------------------------------

/// Formatted status summary, same degradation rules as the HTML renderer.
fn print_status_text(status: &StatusReport) {
    println!("{}", "=".repeat(60));
    println!(
        "{} {}",
        "DATA CENTER:".bold(),
        status
            .data_center
            .as_deref()
            .unwrap_or(render::NOT_AVAILABLE)
    );
    println!("{}", "=".repeat(60));

    println!(
        "  {} {}",
        "Crystals:      ".bold(),
        status.crystal_count.unwrap_or(0)
    );

    let server = status.network_server.clone().unwrap_or_default();
    let state = if server.active {
        "ACTIVE".green().bold()
    } else {
        "INACTIVE".red().bold()
    };
    let port = server
        .port
        .map(|p| p.to_string())
        .unwrap_or_else(|| render::NOT_AVAILABLE.to_string());
    println!(
        "  {} {}  port {}  {} connections",
        "Network server:".bold(),
        state,
        port,
        server.connections
    );

    if let Some(ref ai) = status.quantum_ai {
        println!();
        println!("  {}", "Quantum AI".bold().cyan());
        println!("    Errors detected:      {}", ai.errors_detected);
        println!("    Errors corrected:     {}", ai.errors_corrected);
        println!(
            "    Success rate:         {}",
            render::scalar_text(&ai.success_rate)
        );
        println!("    Operations optimized: {}", ai.operations_optimized);
    }

    if !status.crystal_detail.is_empty() {
        println!();
        println!("  {}", "Crystals".bold().cyan());
        for (name, detail) in &status.crystal_detail {
            let occupancy = detail
                .occupancy
                .as_deref()
                .unwrap_or(render::NOT_AVAILABLE);
            println!(
                "    • {}  dims {}  occupancy {}  capacity {}/{}  energy {:.4}",
                name.bold(),
                render::scalar_text(&detail.dimensions),
                occupancy,
                detail.capacity_used.unwrap_or(0),
                detail.capacity_total.unwrap_or(0),
                detail.energy_total.unwrap_or(0.0),
            );
        }
    }
}

/// Formatted analysis block: red alerts, yellow recommendations, green
/// all-clear.
fn print_analysis_text(report: &AnalysisReport) {
    println!("{}", "Intelligent Analysis".bold().cyan());

    if report.is_all_clear() {
        println!("  {}", render::ALL_CLEAR_MESSAGE.green());
        return;
    }

    for alert in &report.alerts {
        println!("  {} {}", "•".red().bold(), alert.red());
    }
    for rec in &report.recommendations {
        println!("  {} {}", "•".yellow().bold(), rec.yellow());
    }
}

/// Verbatim AI status dump.
fn print_ai_status_text(value: &Value) {
    println!("{}", "Quantum AI Status".bold().cyan());
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    for line in pretty.lines() {
        println!("  {line}");
    }
}

/// Uniform inline error line for failed fetches.
fn print_fetch_error(what: &str, err: &anyhow::Error) {
    println!("  {} {} failed: {:#}", "✗".red().bold(), what.bold(), err);
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn test_view_format_parsing() {
        assert_eq!(ViewFormat::from_str_opt(None), ViewFormat::Text);
        assert_eq!(ViewFormat::from_str_opt(Some("html")), ViewFormat::Html);
        assert_eq!(ViewFormat::from_str_opt(Some("json")), ViewFormat::Json);
        assert_eq!(ViewFormat::from_str_opt(Some("text")), ViewFormat::Text);
    }
}
