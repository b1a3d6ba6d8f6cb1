//! Shared domain types.
//!
//! Two families live here:
//!
//! - the **payload** returned by the lookup service (`LookupResponse` and its
//!   parts), where almost everything is optional
//! - the **display model** produced by the normalizer (`DisplayModel`), where
//!   nothing is optional and every slot is ready to draw

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::loose;

/// The six tariff time-bands, in display order.
pub const PERIOD_KEYS: [&str; 6] = [
    "periodo_1",
    "periodo_2",
    "periodo_3",
    "periodo_4",
    "periodo_5",
    "periodo_6",
];

/// Technical attributes worth showing, with their labels, in display order.
pub const TECHNICAL_LABELS: [(&str, &str); 6] = [
    ("tension_suministro", "Tensión"),
    ("modo_control_potencia", "Control Potencia"),
    ("telegestionado", "Telegestión"),
    ("tipo_punto_medida", "Punto Medida"),
    ("derechos_acceso_kW", "Derechos Acceso"),
    ("derechos_extension_kW", "Derechos Extensión"),
];

/// Placeholder for any display slot without data.
pub const NO_DATA: &str = "-";

/// Success payload of the lookup service.
///
/// Unknown fields are ignored; see [`crate::domain::loose`] for how odd values
/// are decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default, deserialize_with = "loose::text")]
    pub cups: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub municipio: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub provincia: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub codigo_postal: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub tarifa: Option<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub distribuidor: Option<String>,
    #[serde(default, deserialize_with = "loose::contract")]
    pub contrato: Contract,
    #[serde(default, deserialize_with = "loose::number_map")]
    pub potencias_contratadas: BTreeMap<String, Option<f64>>,
    #[serde(default, deserialize_with = "loose::value_map")]
    pub datos_tecnicos: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "loose::number")]
    pub consumo_anual_total: Option<f64>,
    #[serde(default, deserialize_with = "loose::totals")]
    pub total_consumos: TotalConsumption,
    #[serde(default, deserialize_with = "loose::number_map")]
    pub consumos_anuales_periodo: BTreeMap<String, Option<f64>>,
    #[serde(default, deserialize_with = "loose::records")]
    pub consumos: Vec<ConsumptionRecord>,
}

/// Contract flags, each `"S"`, `"N"` or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contract {
    pub es_baja: Option<String>,
    pub es_contratable: Option<String>,
}

/// Aggregate totals computed by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalConsumption {
    pub consumo_anual_kwh: Option<f64>,
}

/// A single dated consumption reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionRecord {
    pub fecha: Option<String>,
    pub consumo: Option<f64>,
}

impl ConsumptionRecord {
    pub fn new(fecha: impl Into<String>, consumo: Option<f64>) -> Self {
        Self {
            fecha: Some(fecha.into()),
            consumo,
        }
    }
}

/// Contract status derived from the contract flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractStatus {
    #[serde(rename = "BAJA")]
    Baja,
    #[serde(rename = "CONTRATABLE")]
    Contratable,
    #[serde(rename = "NO CONTRATABLE")]
    NoContratable,
    #[serde(rename = "Desconocido")]
    Unknown,
}

impl ContractStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            ContractStatus::Baja => "BAJA",
            ContractStatus::Contratable => "CONTRATABLE",
            ContractStatus::NoContratable => "NO CONTRATABLE",
            ContractStatus::Unknown => "Desconocido",
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One cell of the contracted-power row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCell {
    pub period: &'static str,
    pub kw: Option<f64>,
    /// `"<kw> kW"` or the placeholder.
    pub display: String,
}

/// A technical attribute that had a truthy value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalAttribute {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// One slice of the annual per-period breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSlice {
    pub key: String,
    /// `periodo_3` -> `P3`.
    pub label: String,
    pub kwh: f64,
    /// Fraction of the breakdown total in `[0, 1]`; 0 when the total is 0.
    pub share: f64,
}

/// Time-ordered consumption series for the trend view.
///
/// `labels` and `values` are parallel and always the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsumptionSeries {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl ConsumptionSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(index, value)` pairs for the points that have a value.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect()
    }
}

/// Fully-normalized lookup result. No slot is optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub cups: String,
    pub address: String,
    /// `municipio / provincia`, skipping whichever is missing.
    pub location: String,
    pub postal_code: String,
    pub tariff: String,
    pub distributor: String,
    pub status: ContractStatus,
    pub power_table: [PowerCell; 6],
    pub technical_attributes: Vec<TechnicalAttribute>,
    pub total_consumption_kwh: f64,
    pub period_breakdown: Vec<PeriodSlice>,
    pub consumption: ConsumptionSeries,
}
