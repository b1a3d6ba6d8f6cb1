//! Terminal formatting for a `DisplayModel`.
//!
//! Numbers follow es-ES conventions, labels are in Spanish. The normalizer
//! never formats numbers; the TUI reuses `format_kwh` and `format_share`.

use crate::domain::{DisplayModel, NO_DATA};

/// Format a number the way es-ES does: `,` decimals (at most two), `.` thousands
/// separators, and no grouping for four-digit integers (`1234`, `12.345`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NO_DATA.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    if int_part == "0" && frac_part.is_empty() {
        return "0".to_string();
    }

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// `1234.5` → `1234,5 kWh`.
pub fn format_kwh(value: f64) -> String {
    format!("{} kWh", format_number(value))
}

/// `0.3204` → `32,04 %`.
pub fn format_share(share: f64) -> String {
    format!("{} %", format_number(share * 100.0))
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Full text report, one section per display slot.
pub fn format_report(model: &DisplayModel) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== sips - CUPS {} ===\n", model.cups));
    out.push_str(&format!("Dirección:      {}\n", model.address));
    out.push_str(&format!("Municipio:      {}\n", model.location));
    out.push_str(&format!("Código postal:  {}\n", model.postal_code));
    out.push_str(&format!("Tarifa:         {}\n", model.tariff));
    out.push_str(&format!("Estado:         {}\n", model.status));
    out.push_str(&format!("Distribuidora:  {}\n", model.distributor));

    out.push_str("\nPotencias contratadas:\n");
    let header: Vec<String> = (1..=model.power_table.len())
        .map(|i| format!("{:<10}", format!("P{i}")))
        .collect();
    let cells: Vec<String> = model
        .power_table
        .iter()
        .map(|c| format!("{:<10}", c.display))
        .collect();
    out.push_str(&format!("  {}\n", header.concat().trim_end()));
    out.push_str(&format!("  {}\n", cells.concat().trim_end()));

    out.push_str("\nDatos técnicos:\n");
    if model.technical_attributes.is_empty() {
        out.push_str("  (sin datos)\n");
    }
    for attr in &model.technical_attributes {
        out.push_str(&format!("  {:<20} {}\n", format!("{}:", attr.label), attr.value));
    }

    out.push_str(&format!(
        "\nConsumo anual total: {}\n",
        format_kwh(model.total_consumption_kwh)
    ));

    out.push_str("\nConsumo por periodo:\n");
    if model.period_breakdown.is_empty() {
        out.push_str("  (sin datos)\n");
    }
    for slice in &model.period_breakdown {
        out.push_str(&format!(
            "  {:<6} {:>16}  {:>9}\n",
            slice.label,
            format_kwh(slice.kwh),
            format_share(slice.share)
        ));
    }

    out.push_str("\nHistórico de consumo:\n");
    if model.consumption.is_empty() {
        out.push_str("  (sin datos)\n");
    }
    for (label, value) in model.consumption.labels.iter().zip(&model.consumption.values) {
        let shown = value.map(format_kwh).unwrap_or_else(|| NO_DATA.to_string());
        out.push_str(&format!("  {label:<12} {shown:>16}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LookupResponse;
    use crate::normalize::normalize_response;
    use serde_json::json;

    #[test]
    fn numbers_follow_spanish_conventions() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(3120.4), "3120,4");
        assert_eq!(format_number(12345.678), "12.345,68");
        assert_eq!(format_number(1234567.0), "1.234.567");
        assert_eq!(format_number(-1500.5), "-1500,5");
        assert_eq!(format_number(-98765.0), "-98.765");
        assert_eq!(format_number(0.004), "0");
        assert_eq!(format_number(2.10), "2,1");
        assert_eq!(format_number(f64::NAN), NO_DATA);
    }

    #[test]
    fn shares_and_energy_have_units() {
        assert_eq!(format_kwh(500.0), "500 kWh");
        assert_eq!(format_share(0.3204), "32,04 %");
    }

    #[test]
    fn report_contains_every_section() {
        let response: LookupResponse = serde_json::from_value(json!({
            "cups": "ES0021000000123456XY01",
            "municipio": "Getafe",
            "contrato": {"es_baja": "S"},
            "potencias_contratadas": {"periodo_2": 4.6},
            "datos_tecnicos": {"tension_suministro": "230 V"},
            "total_consumos": {"consumo_anual_kWh": 12500},
            "consumos_anuales_periodo": {"periodo_1": 10000, "periodo_2": 2500},
            "consumos": [{"fecha": "not-a-date"}, {"fecha": "2024-01-15", "consumo": 900.5}]
        }))
        .unwrap();
        let report = format_report(&normalize_response(response));

        assert!(report.contains("=== sips - CUPS ES0021000000123456XY01 ==="));
        assert!(report.contains("Dirección:      -"));
        assert!(report.contains("Municipio:      Getafe"));
        assert!(report.contains("Estado:         BAJA"));
        assert!(report.contains("4.6 kW"));
        assert!(report.contains("Tensión:"));
        assert!(report.contains("Consumo anual total: 12.500 kWh"));
        assert!(report.contains("80 %"));
        assert!(report.contains("ene. 24"));
        assert!(report.contains("900,5 kWh"));

        let history = report.split("Histórico de consumo:").nth(1).unwrap();
        let jan = history.find("ene. 24").unwrap();
        let raw = history.find("not-a-date").unwrap();
        assert!(jan < raw);
    }
}
