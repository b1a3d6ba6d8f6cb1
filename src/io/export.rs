//! Export a normalized lookup to JSON.
//!
//! The JSON is the serialized `DisplayModel`: every slot present, `-` for
//! missing text, and the consumption series already sorted.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::DisplayModel;
use crate::error::AppError;

/// Pretty-printed JSON for a display model.
pub fn model_to_json(model: &DisplayModel) -> Result<String, AppError> {
    serde_json::to_string_pretty(model)
        .map_err(|e| AppError::new(4, format!("Failed to serialize lookup result: {e}")))
}

/// Write a display model to a JSON file.
pub fn write_model_json(path: &Path, model: &DisplayModel) -> Result<(), AppError> {
    let json = model_to_json(model)?;
    let mut file = File::create(path).map_err(|e| {
        AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display()))
    })?;
    writeln!(file, "{json}").map_err(|e| {
        AppError::new(4, format!("Failed to write export JSON '{}': {e}", path.display()))
    })?;
    tracing::info!(path = %path.display(), "exported lookup result");
    Ok(())
}
