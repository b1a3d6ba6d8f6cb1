//! Read a saved lookup-service response from disk.

use std::fs;
use std::path::Path;

use crate::domain::LookupResponse;
use crate::error::AppError;

/// Load a `LookupResponse` from a JSON file.
///
/// The file holds exactly what the service returned on success. An
/// `{"error": "..."}` body is reported as that error.
pub fn read_response_json(path: &Path) -> Result<LookupResponse, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(4, format!("Failed to read '{}': {e}", path.display())))?;
    parse_response_json(&text).map_err(|msg| {
        AppError::new(2, format!("Invalid response file '{}': {msg}", path.display()))
    })
}

fn parse_response_json(text: &str) -> Result<LookupResponse, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
        return Err(format!("service error: {err}"));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
