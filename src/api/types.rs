//! Wire types for the monitoring backend's JSON endpoints.
//!
//! The backend speaks Spanish on the wire (`centro_datos`, `cristales`, …);
//! field names are preserved via `#[serde(rename)]` and mapped to English on
//! the Rust side. Every optional field has a declared default so a sparse
//! response degrades to placeholder values instead of failing; the decode
//! contract is written here rather than inferred from template expressions.
//!
//! `/ia-status` and `/ia-optimize` return arbitrary JSON and are handled as
//! raw [`serde_json::Value`]s by the caller.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// /estado
// ---------------------------------------------------------------------------

/// Response shape of `GET /estado`.
///
/// Everything is optional; the renderers substitute `"N/A"` / `0` for
/// missing fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReport {
    /// Data-center identifier.
    #[serde(default, rename = "centro_datos")]
    pub data_center: Option<String>,
    /// Total crystal count.
    #[serde(default, rename = "cristales")]
    pub crystal_count: Option<u64>,
    /// Network server availability block.
    #[serde(default, rename = "servidor_red")]
    pub network_server: Option<NetworkServer>,
    /// Quantum-AI metrics block; rendered only when present.
    #[serde(default, rename = "ia_cuantica")]
    pub quantum_ai: Option<QuantumAiMetrics>,
    /// Per-crystal detail, keyed by crystal name. BTreeMap keeps render
    /// order stable across polls.
    #[serde(default, rename = "cristales_detalle")]
    pub crystal_detail: BTreeMap<String, CrystalDetail>,
}

/// Network server availability as reported by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkServer {
    /// Whether the backend's network server is accepting connections.
    #[serde(default, rename = "activo")]
    pub active: bool,
    /// Listen port.
    #[serde(default, rename = "puerto")]
    pub port: Option<u64>,
    /// Current connection count.
    #[serde(default, rename = "conexiones")]
    pub connections: u64,
}

/// The quantum-AI metrics block inside a status report.
///
/// `tasa_exito` has no fixed type (backends send either a pre-formatted
/// percentage string or a number), so it decodes as a raw JSON value and is
/// rendered verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantumAiMetrics {
    #[serde(default, rename = "errores_detectados")]
    pub errors_detected: u64,
    #[serde(default, rename = "errores_corregidos")]
    pub errors_corrected: u64,
    #[serde(default, rename = "tasa_exito")]
    pub success_rate: Value,
    #[serde(default, rename = "operaciones_optimizadas")]
    pub operations_optimized: u64,
}

/// Per-crystal detail entry.
///
/// Occupancy arrives pre-formatted (`"45.00%"`); capacities and energy are
/// numeric. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrystalDetail {
    #[serde(default, rename = "dimensiones")]
    pub dimensions: Value,
    #[serde(default, rename = "ocupacion")]
    pub occupancy: Option<String>,
    #[serde(default, rename = "capacidad_usada")]
    pub capacity_used: Option<u64>,
    #[serde(default, rename = "capacidad_total")]
    pub capacity_total: Option<u64>,
    #[serde(default, rename = "energia_total")]
    pub energy_total: Option<f64>,
}

// ---------------------------------------------------------------------------
// /analisis
// ---------------------------------------------------------------------------

/// Response shape of `GET /analisis`.
///
/// `alertas` is required: a response without it is a decode error, surfaced
/// through the dashboard's uniform error policy. Recommendations are
/// optional and default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "alertas")]
    pub alerts: Vec<String>,
    #[serde(default, rename = "recomendaciones_ia")]
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    /// True when there is nothing to flag: neither alerts nor
    /// recommendations.
    pub fn is_all_clear(&self) -> bool {
        self.alerts.is_empty() && self.recommendations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_full_payload() {
        let json = r#"{
            "centro_datos": "Centro Alpha",
            "cristales": 3,
            "servidor_red": { "activo": true, "puerto": 5555, "conexiones": 2 },
            "ia_cuantica": {
                "errores_detectados": 12,
                "errores_corregidos": 10,
                "tasa_exito": "83.33%",
                "operaciones_optimizadas": 7
            },
            "cristales_detalle": {
                "Cristal_A": {
                    "dimensiones": [4, 4, 4],
                    "ocupacion": "45.00%",
                    "capacidad_usada": 29,
                    "capacidad_total": 64,
                    "energia_total": 12.5
                }
            }
        }"#;
        let status: StatusReport = serde_json::from_str(json).unwrap();
        assert_eq!(status.data_center.as_deref(), Some("Centro Alpha"));
        assert_eq!(status.crystal_count, Some(3));

        let server = status.network_server.unwrap();
        assert!(server.active);
        assert_eq!(server.port, Some(5555));
        assert_eq!(server.connections, 2);

        let ai = status.quantum_ai.unwrap();
        assert_eq!(ai.errors_detected, 12);
        assert_eq!(ai.success_rate, Value::String("83.33%".to_string()));

        let detail = &status.crystal_detail["Cristal_A"];
        assert_eq!(detail.occupancy.as_deref(), Some("45.00%"));
        assert_eq!(detail.capacity_total, Some(64));
    }

    #[test]
    fn status_decodes_empty_object() {
        let status: StatusReport = serde_json::from_str("{}").unwrap();
        assert!(status.data_center.is_none());
        assert!(status.crystal_count.is_none());
        assert!(status.network_server.is_none());
        assert!(status.quantum_ai.is_none());
        assert!(status.crystal_detail.is_empty());
    }

    #[test]
    fn status_ignores_unknown_fields() {
        let json = r#"{ "centro_datos": "X", "campo_nuevo": { "a": 1 } }"#;
        let status: StatusReport = serde_json::from_str(json).unwrap();
        assert_eq!(status.data_center.as_deref(), Some("X"));
    }

    #[test]
    fn network_server_defaults_to_inactive() {
        let json = r#"{ "servidor_red": {} }"#;
        let status: StatusReport = serde_json::from_str(json).unwrap();
        let server = status.network_server.unwrap();
        assert!(!server.active);
        assert!(server.port.is_none());
        assert_eq!(server.connections, 0);
    }

    #[test]
    fn ai_metrics_accept_numeric_success_rate() {
        // The field's type is undocumented; a numeric rate must decode too.
        let json = r#"{ "ia_cuantica": { "tasa_exito": 0.83 } }"#;
        let status: StatusReport = serde_json::from_str(json).unwrap();
        let ai = status.quantum_ai.unwrap();
        assert_eq!(ai.errors_detected, 0);
        assert!(ai.success_rate.is_number());
    }

    #[test]
    fn analysis_requires_alerts() {
        let result: Result<AnalysisReport, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn analysis_recommendations_default_empty() {
        let report: AnalysisReport = serde_json::from_str(r#"{ "alertas": [] }"#).unwrap();
        assert!(report.alerts.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.is_all_clear());
    }

    #[test]
    fn analysis_with_alerts_is_not_all_clear() {
        let json = r#"{
            "alertas": ["Cristal 'A' con ocupación crítica: 95.0%"],
            "recomendaciones_ia": ["Redistribuir carga"]
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.recommendations.len(), 1);
        assert!(!report.is_all_clear());
    }
}
