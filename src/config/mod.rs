//! Configuration system for qdash.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults** — hardcoded in [`QdashConfig::default()`]
//! 2. **User global config** — `~/.qdash/config.toml`
//! 3. **Project local config** — `.qdash.toml` in the current working directory
//! 4. **Environment variables** — `QDASH_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. Missing sections in a TOML file fall
//! back to the previous layer's values.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default backend base URL (the monitoring backend listens on 8080).
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default per-request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default delay before the post-optimize status reload, in milliseconds.
const DEFAULT_RELOAD_DELAY_MS: u64 = 2_000;

/// Default listen address for `qdash serve`.
const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:9810";

/// Default page title.
const DEFAULT_TITLE: &str = "Quantum Datacenter Dashboard";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Fully resolved qdash configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdashConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
    pub serve: ServeConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the monitoring backend.
    pub url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Dashboard behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Delay between a completed optimize request and the full status
    /// reload, in milliseconds.
    pub reload_delay_ms: u64,
    /// Page title used by the HTML renderer.
    pub title: String,
}

/// Local viewer server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Listen address for `qdash serve`.
    pub addr: String,
}

impl Default for QdashConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            dashboard: DashboardConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            reload_delay_ms: DEFAULT_RELOAD_DELAY_MS,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_SERVE_ADDR.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved qdash configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> QdashConfig {
    let mut config = QdashConfig::default();

    // Layer 2: user global config (~/.qdash/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.qdash.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. Malformed files are silently ignored so a bad
/// config never takes the dashboard down.
fn load_toml_file(path: Option<PathBuf>) -> Option<QdashConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.qdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qdash").join("config.toml"))
}

/// Path to the project local config: `.qdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".qdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `QDASH_URL` — backend base URL
/// - `QDASH_TIMEOUT_MS` — per-request timeout
/// - `QDASH_RELOAD_DELAY_MS` — post-optimize reload delay
/// - `QDASH_SERVE_ADDR` — viewer server listen address
fn apply_env_overrides(config: &mut QdashConfig) {
    if let Ok(val) = std::env::var("QDASH_URL")
        && !val.is_empty()
    {
        config.backend.url = val;
    }
    if let Ok(val) = std::env::var("QDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("QDASH_RELOAD_DELAY_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.dashboard.reload_delay_ms = ms;
    }
    if let Ok(val) = std::env::var("QDASH_SERVE_ADDR")
        && !val.is_empty()
    {
        config.serve.addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset / show
// ---------------------------------------------------------------------------

/// Write the default config to `~/.qdash/config.toml`.
///
/// Creates the `~/.qdash/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.qdash/ directory")?;
    }

    let toml_str =
        toml::to_string_pretty(&QdashConfig::default()).context("failed to serialize defaults")?;
    fs::write(&path, toml_str).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `backend.url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&QdashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;

    set_toml_value(&mut value_table, key, value)?;

    let output = toml::to_string_pretty(&value_table).context("failed to serialize config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    // Determine the type of the existing value to parse correctly
    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = QdashConfig::default();
        assert_eq!(config.backend.url, "http://localhost:8080");
        assert_eq!(config.backend.timeout_ms, 10_000);
        assert_eq!(config.dashboard.reload_delay_ms, 2_000);
        assert_eq!(config.serve.addr, "127.0.0.1:9810");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let toml_str = r#"
[backend]
url = "http://monitor:9000"
"#;
        let config: QdashConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.url, "http://monitor:9000");
        assert_eq!(config.backend.timeout_ms, 10_000); // unchanged
        assert_eq!(config.dashboard.reload_delay_ms, 2_000); // unchanged
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[backend]
url = "http://localhost:8080"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "backend.url", "http://monitor:9000").unwrap();

        let table = root.as_table().unwrap();
        let backend = table["backend"].as_table().unwrap();
        assert_eq!(backend["url"].as_str(), Some("http://monitor:9000"));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[dashboard]
reload_delay_ms = 2000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "dashboard.reload_delay_ms", "500").unwrap();

        let table = root.as_table().unwrap();
        let dashboard = table["dashboard"].as_table().unwrap();
        assert_eq!(dashboard["reload_delay_ms"].as_integer(), Some(500));
    }

    #[test]
    fn set_toml_value_rejects_invalid_key() {
        let toml_str = r#"
[backend]
url = "http://localhost:8080"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        let result = set_toml_value(&mut root, "nonexistent.key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn effective_config_round_trips() {
        let toml_str = show_effective_config().unwrap();
        let _: QdashConfig = toml::from_str(&toml_str).unwrap();
    }
}
