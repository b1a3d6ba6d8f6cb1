//! Payload → display model.
//!
//! All fallback policy for the lookup payload lives here, so the rendering
//! code never has to branch on a missing field.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::loose::text_of;
use crate::domain::{
    Contract, ContractStatus, DisplayModel, LookupResponse, NO_DATA, PERIOD_KEYS, PeriodSlice,
    PowerCell, TECHNICAL_LABELS, TechnicalAttribute,
};
use crate::normalize::series::build_consumption_series;

/// Resolve every display slot of a lookup response.
pub fn normalize_response(response: LookupResponse) -> DisplayModel {
    let model = DisplayModel {
        cups: text_slot(response.cups.as_deref()),
        address: text_slot(response.direccion.as_deref()),
        location: location(response.municipio.as_deref(), response.provincia.as_deref()),
        postal_code: text_slot(response.codigo_postal.as_deref()),
        tariff: text_slot(response.tarifa.as_deref()),
        distributor: text_slot(response.distribuidor.as_deref()),
        status: contract_status(&response.contrato),
        power_table: power_table(&response.potencias_contratadas),
        technical_attributes: technical_attributes(&response.datos_tecnicos),
        total_consumption_kwh: total_consumption(&response),
        period_breakdown: period_breakdown(&response.consumos_anuales_periodo),
        consumption: build_consumption_series(&response.consumos),
    };

    tracing::debug!(
        cups = %model.cups,
        status = %model.status,
        readings = model.consumption.len(),
        periods = model.period_breakdown.len(),
        "normalized lookup response"
    );
    model
}

/// `es_baja` takes precedence over `es_contratable`.
pub fn contract_status(contract: &Contract) -> ContractStatus {
    if contract.es_baja.as_deref() == Some("S") {
        ContractStatus::Baja
    } else {
        match contract.es_contratable.as_deref() {
            Some("S") => ContractStatus::Contratable,
            Some("N") => ContractStatus::NoContratable,
            _ => ContractStatus::Unknown,
        }
    }
}

/// Annual total: the service's own total, then the aggregate block, then 0.
pub fn total_consumption(response: &LookupResponse) -> f64 {
    response
        .consumo_anual_total
        .or(response.total_consumos.consumo_anual_kwh)
        .unwrap_or(0.0)
}

/// Always six cells, in period order.
pub fn power_table(powers: &BTreeMap<String, Option<f64>>) -> [PowerCell; 6] {
    PERIOD_KEYS.map(|period| {
        let kw = powers.get(period).copied().flatten();
        let display = match kw {
            Some(v) => format!("{v} kW"),
            None => NO_DATA.to_string(),
        };
        PowerCell { period, kw, display }
    })
}

/// Labelled attributes with a truthy value, in label-dictionary order.
pub fn technical_attributes(data: &BTreeMap<String, Value>) -> Vec<TechnicalAttribute> {
    TECHNICAL_LABELS
        .iter()
        .filter_map(|&(key, label)| {
            let value = data.get(key).filter(|v| is_truthy(v))?;
            Some(TechnicalAttribute {
                key,
                label,
                value: text_of(value)?,
            })
        })
        .collect()
}

/// Per-period annual consumption with shares of the total.
///
/// Known periods come first in P1..P6 order; unexpected keys follow in lexical
/// order. Keys without a numeric value are skipped.
pub fn period_breakdown(periods: &BTreeMap<String, Option<f64>>) -> Vec<PeriodSlice> {
    let mut entries: Vec<(&String, f64)> = periods
        .iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();
    entries.sort_by_key(|(k, _)| {
        PERIOD_KEYS
            .iter()
            .position(|p| *p == k.as_str())
            .unwrap_or(PERIOD_KEYS.len())
    });

    let total: f64 = entries.iter().map(|(_, v)| v).sum();
    entries
        .into_iter()
        .map(|(key, kwh)| PeriodSlice {
            key: key.clone(),
            label: key.replace("periodo_", "P").to_uppercase(),
            kwh,
            share: if total > 0.0 { kwh / total } else { 0.0 },
        })
        .collect()
}

fn text_slot(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NO_DATA.to_string(),
    }
}

fn location(municipio: Option<&str>, provincia: Option<&str>) -> String {
    let parts: Vec<&str> = [municipio, provincia]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        NO_DATA.to_string()
    } else {
        parts.join(" / ")
    }
}

/// Scalar truthiness: non-empty text, non-zero number, `true`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::Bool(b) => *b,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}
