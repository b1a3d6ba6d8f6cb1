//! Lenient decoding helpers for the lookup payload.
//!
//! The service forwards upstream data mostly as-is, so a field that is usually
//! a number can arrive as `"3,464"` or `null`, and a record list can contain
//! junk. These helpers never fail on a single odd value: they degrade it to
//! "absent" and let the normalizer apply its fallback policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::types::{ConsumptionRecord, Contract, TotalConsumption};

/// Numeric value of a JSON scalar: numbers as-is, numeric strings with either
/// decimal separator. Non-finite results count as absent.
pub fn number_of(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Text value of a JSON scalar. Floats drop a zero fraction (`5.0` -> `5`),
/// matching how power cells print their kW value.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_of))
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// Period-keyed numeric mapping. A non-object decodes as an empty mapping.
pub fn number_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map.iter().map(|(k, v)| (k.clone(), number_of(v))).collect())
}

/// Arbitrary attribute mapping. A non-object decodes as an empty mapping.
pub fn value_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map.into_iter().collect())
}

pub fn contract<'de, D>(deserializer: D) -> Result<Contract, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(Contract::default());
    };
    Ok(Contract {
        es_baja: map.get("es_baja").and_then(text_of),
        es_contratable: map.get("es_contratable").and_then(text_of),
    })
}

pub fn totals<'de, D>(deserializer: D) -> Result<TotalConsumption, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(TotalConsumption::default());
    };
    Ok(TotalConsumption {
        consumo_anual_kwh: map.get("consumo_anual_kWh").and_then(number_of),
    })
}

/// Consumption records. Every array element yields one record (non-object
/// elements become an empty record) so the series keeps the input length.
pub fn records<'de, D>(deserializer: D) -> Result<Vec<ConsumptionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .map(|item| ConsumptionRecord {
            fecha: item.get("fecha").and_then(text_of),
            consumo: item.get("consumo").and_then(number_of),
        })
        .collect())
}
