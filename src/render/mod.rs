//! Pure render functions mapping decoded backend data to HTML markup.
//!
//! Every function here is a pure `data → markup` mapping with no I/O, so
//! the dashboard's output can be asserted on directly in tests. All
//! interpolated text is escaped; verbatim JSON blocks are display text, not
//! markup, and are escaped too.
//!
//! Degradation rules (the decode contract's display side): a missing
//! data-center name or port renders the literal `N/A`, a missing crystal
//! count renders `0`, and the AI-metrics and crystal-detail blocks are
//! omitted entirely when absent.

pub mod page;

use serde_json::Value;

use crate::api::types::{AnalysisReport, StatusReport};

/// The all-clear line shown when an analysis has neither alerts nor
/// recommendations.
pub const ALL_CLEAR_MESSAGE: &str = "All clear. No critical alerts.";

/// Placeholder for absent text fields.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Escaping and scalar display
// ---------------------------------------------------------------------------

/// Escape text for safe interpolation into HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Display an untyped JSON scalar: strings render bare (no quotes), null
/// renders the `N/A` placeholder, everything else renders as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pretty-print an arbitrary JSON value for a verbatim `<pre>` block.
fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Render the status summary for the primary panel.
pub fn render_status(status: &StatusReport) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"card status\">\n<h2>Data Center Status</h2>\n");

    let name = status
        .data_center
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    html.push_str(&format!(
        "<p class=\"field\"><span class=\"label\">Data center:</span> {name}</p>\n"
    ));

    let crystals = status.crystal_count.unwrap_or(0);
    html.push_str(&format!(
        "<p class=\"field\"><span class=\"label\">Crystals:</span> {crystals}</p>\n"
    ));

    html.push_str(&render_network_server(status));

    if let Some(ref ai) = status.quantum_ai {
        html.push_str("<h3>Quantum AI</h3>\n<ul class=\"metrics\">\n");
        html.push_str(&format!(
            "<li>Errors detected: {}</li>\n",
            ai.errors_detected
        ));
        html.push_str(&format!(
            "<li>Errors corrected: {}</li>\n",
            ai.errors_corrected
        ));
        html.push_str(&format!(
            "<li>Success rate: {}</li>\n",
            escape(&scalar_text(&ai.success_rate))
        ));
        html.push_str(&format!(
            "<li>Operations optimized: {}</li>\n",
            ai.operations_optimized
        ));
        html.push_str("</ul>\n");
    }

    if !status.crystal_detail.is_empty() {
        html.push_str("<h3>Crystals</h3>\n<ul class=\"crystals\">\n");
        for (name, detail) in &status.crystal_detail {
            let occupancy = detail
                .occupancy
                .as_deref()
                .map(escape)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let used = detail.capacity_used.unwrap_or(0);
            let total = detail.capacity_total.unwrap_or(0);
            let energy = detail.energy_total.unwrap_or(0.0);
            html.push_str(&format!(
                "<li><strong>{}</strong> dims {} occupancy {} capacity {}/{} energy {:.4}</li>\n",
                escape(name),
                escape(&scalar_text(&detail.dimensions)),
                occupancy,
                used,
                total,
                energy,
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");
    html
}

/// The network-server availability line with the ACTIVE/INACTIVE badge.
fn render_network_server(status: &StatusReport) -> String {
    let server = status.network_server.clone().unwrap_or_default();
    let badge = if server.active {
        "<span class=\"badge ok\">ACTIVE</span>"
    } else {
        "<span class=\"badge err\">INACTIVE</span>"
    };
    let port = server
        .port
        .map(|p| p.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "<p class=\"field\"><span class=\"label\">Network server:</span> {badge} port {port}, {} connections</p>\n",
        server.connections
    )
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Render the analysis block appended to the primary panel.
///
/// Alerts go into a red-flagged list, recommendations into a distinct
/// amber-flagged list; when both are empty, exactly one green all-clear
/// line is rendered instead.
pub fn render_analysis(report: &AnalysisReport) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"card analysis\">\n<h2>Intelligent Analysis</h2>\n");

    if report.is_all_clear() {
        html.push_str(&format!(
            "<p class=\"all-clear\">{ALL_CLEAR_MESSAGE}</p>\n"
        ));
        html.push_str("</section>\n");
        return html;
    }

    if !report.alerts.is_empty() {
        html.push_str("<ul class=\"alerts\">\n");
        for alert in &report.alerts {
            html.push_str(&format!("<li>{}</li>\n", escape(alert)));
        }
        html.push_str("</ul>\n");
    }

    if !report.recommendations.is_empty() {
        html.push_str("<ul class=\"recommendations\">\n");
        for rec in &report.recommendations {
            html.push_str(&format!("<li>{}</li>\n", escape(rec)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");
    html
}

// ---------------------------------------------------------------------------
// AI status / optimize
// ---------------------------------------------------------------------------

/// Render the AI-status panel: the verbatim report plus the optimize
/// control.
pub fn render_ai_status(report: &Value) -> String {
    format!(
        "<section class=\"card ai-status\">\n<h2>Quantum AI Status</h2>\n\
         <pre>{}</pre>\n\
         <form method=\"post\" action=\"/optimize\">\
         <button class=\"optimize\" type=\"submit\">Run AI optimization</button>\
         </form>\n</section>\n",
        escape(&pretty_json(report))
    )
}

/// Transient notice appended before the optimize request is issued.
pub fn render_working() -> String {
    "<p class=\"working\">Running AI optimization…</p>\n".to_string()
}

/// Render the verbatim optimize result.
pub fn render_optimize_result(result: &Value) -> String {
    format!(
        "<section class=\"card optimize-result\">\n<h3>Optimization result</h3>\n<pre>{}</pre>\n</section>\n",
        escape(&pretty_json(result))
    )
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Uniform inline error block: every failed fetch renders through this,
/// whichever panel owns it.
pub fn render_error(what: &str, err: &anyhow::Error) -> String {
    format!(
        "<div class=\"card error\"><strong>{} failed</strong><p>{}</p></div>\n",
        escape(what),
        escape(&format!("{err:#}"))
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn status_from(json: &str) -> StatusReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert!(!escape(r#"<script>"x"</script>"#).contains('<'));
    }

    #[test]
    fn scalar_text_renders_strings_bare() {
        assert_eq!(scalar_text(&Value::String("83.33%".into())), "83.33%");
        assert_eq!(scalar_text(&Value::Null), "N/A");
        assert_eq!(scalar_text(&serde_json::json!(0.83)), "0.83");
    }

    #[test]
    fn status_substitutes_present_values() {
        let status = status_from(r#"{ "centro_datos": "Alpha", "cristales": 5 }"#);
        let html = render_status(&status);
        assert!(html.contains("Alpha"));
        assert!(html.contains("Crystals:</span> 5"));
        assert!(!html.contains("Data center:</span> N/A"));
    }

    #[test]
    fn status_missing_crystal_count_renders_zero() {
        let status = status_from(r#"{ "centro_datos": "Alpha" }"#);
        let html = render_status(&status);
        assert!(html.contains("Crystals:</span> 0"));
    }

    #[test]
    fn status_missing_name_renders_placeholder() {
        let status = status_from("{}");
        let html = render_status(&status);
        assert!(html.contains("Data center:</span> N/A"));
    }

    #[test]
    fn inactive_server_renders_inactive_badge() {
        let status = status_from(r#"{ "servidor_red": { "activo": false, "puerto": 5555 } }"#);
        let html = render_status(&status);
        assert!(html.contains("badge err\">INACTIVE"));
        assert!(!html.contains("badge ok\">ACTIVE"));
        assert!(html.contains("port 5555"));
    }

    #[test]
    fn absent_server_block_degrades_to_inactive_na() {
        let html = render_status(&status_from("{}"));
        assert!(html.contains("badge err\">INACTIVE"));
        assert!(html.contains("port N/A"));
    }

    #[test]
    fn ai_metrics_block_only_when_present() {
        let without = render_status(&status_from("{}"));
        assert!(!without.contains("Quantum AI"));

        let with = render_status(&status_from(
            r#"{ "ia_cuantica": { "errores_detectados": 3, "tasa_exito": "75.00%" } }"#,
        ));
        assert!(with.contains("Quantum AI"));
        assert!(with.contains("Errors detected: 3"));
        assert!(with.contains("Success rate: 75.00%"));
        assert!(with.contains("Errors corrected: 0")); // declared default
    }

    #[test]
    fn crystal_detail_block_lists_each_crystal() {
        let status = status_from(
            r#"{ "cristales_detalle": {
                "Cristal_A": { "ocupacion": "45.00%", "capacidad_usada": 29,
                               "capacidad_total": 64, "energia_total": 12.5 }
            } }"#,
        );
        let html = render_status(&status);
        assert!(html.contains("Cristal_A"));
        assert!(html.contains("dims N/A")); // dimensiones absent
        assert!(html.contains("occupancy 45.00%"));
        assert!(html.contains("capacity 29/64"));
        assert!(html.contains("energy 12.5000"));
    }

    #[test]
    fn empty_analysis_renders_exactly_all_clear() {
        let report: AnalysisReport = serde_json::from_str(r#"{ "alertas": [] }"#).unwrap();
        let html = render_analysis(&report);
        assert!(html.contains(ALL_CLEAR_MESSAGE));
        assert!(!html.contains("class=\"alerts\""));
        assert!(!html.contains("class=\"recommendations\""));
    }

    #[test]
    fn alerts_render_in_flagged_list() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{ "alertas": ["X"] }"#).unwrap();
        let html = render_analysis(&report);
        assert!(html.contains("class=\"alerts\""));
        assert!(html.contains("<li>X</li>"));
        assert!(!html.contains(ALL_CLEAR_MESSAGE));
    }

    #[test]
    fn recommendations_render_in_distinct_list() {
        let report: AnalysisReport = serde_json::from_str(
            r#"{ "alertas": [], "recomendaciones_ia": ["Redistribute load"] }"#,
        )
        .unwrap();
        let html = render_analysis(&report);
        assert!(html.contains("class=\"recommendations\""));
        assert!(html.contains("Redistribute load"));
        assert!(!html.contains("class=\"alerts\""));
        assert!(!html.contains(ALL_CLEAR_MESSAGE));
    }

    #[test]
    fn alert_text_is_escaped() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{ "alertas": ["<b>hot</b>"] }"#).unwrap();
        let html = render_analysis(&report);
        assert!(html.contains("&lt;b&gt;hot&lt;/b&gt;"));
        assert!(!html.contains("<b>hot</b>"));
    }

    #[test]
    fn ai_status_renders_verbatim_json_and_control() {
        let value = serde_json::json!({ "modo": "activo", "patrones": 4 });
        let html = render_ai_status(&value);
        assert!(html.contains("&quot;modo&quot;"));
        assert!(html.contains("action=\"/optimize\""));
        assert!(html.contains("Run AI optimization"));
    }

    #[test]
    fn optimize_result_renders_verbatim_json() {
        let value = serde_json::json!({ "errores_corregidos": 2 });
        let html = render_optimize_result(&value);
        assert!(html.contains("&quot;errores_corregidos&quot;: 2"));
    }

    #[test]
    fn error_block_names_the_operation() {
        let err = anyhow::anyhow!("connection refused");
        let html = render_error("Status request", &err);
        assert!(html.contains("class=\"card error\""));
        assert!(html.contains("Status request failed"));
        assert!(html.contains("connection refused"));
    }
}
