//! Consumption series for the trend chart.

use crate::domain::{ConsumptionRecord, ConsumptionSeries};
use crate::normalize::dates::{NormalizedDate, chronological, normalize_date};

/// Sort readings by date and produce parallel label/value vectors.
///
/// Placement: parsed dates ascending, unparseable dates after all parsed ones.
/// The sort is stable, so ties (same date, or two unparseable dates) keep
/// their input order. Missing consumption values stay `None`.
pub fn build_consumption_series(records: &[ConsumptionRecord]) -> ConsumptionSeries {
    let mut keyed: Vec<(NormalizedDate, Option<f64>)> = records
        .iter()
        .map(|r| (normalize_date(r.fecha.as_deref().unwrap_or("")), r.consumo))
        .collect();
    keyed.sort_by(|a, b| chronological(&a.0, &b.0));

    let unparseable = keyed.iter().filter(|(d, _)| d.date().is_none()).count();
    if unparseable > 0 {
        tracing::debug!(unparseable, total = keyed.len(), "consumption dates kept as raw labels");
    }

    let (labels, values): (Vec<String>, Vec<Option<f64>>) =
        keyed.into_iter().map(|(d, v)| (d.label(), v)).unzip();
    ConsumptionSeries { labels, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fecha: &str, consumo: f64) -> ConsumptionRecord {
        ConsumptionRecord::new(fecha, Some(consumo))
    }

    #[test]
    fn mixed_formats_sort_chronologically() {
        let series = build_consumption_series(&[rec("2023-03-01", 120.0), rec("01/01/2023", 80.0)]);
        assert_eq!(series.labels, vec!["ene. 23", "mar. 23"]);
        assert_eq!(series.values, vec![Some(80.0), Some(120.0)]);
    }

    #[test]
    fn written_out_months_sort_with_numeric_dates() {
        let series = build_consumption_series(&[
            rec("March 1, 2023", 3.0),
            rec("2023-04-01", 4.0),
            rec("1 Feb 2023", 2.0),
            rec("01/01/2023", 1.0),
        ]);
        assert_eq!(series.labels, vec!["ene. 23", "feb. 23", "mar. 23", "abr. 23"]);
        assert_eq!(series.values, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn unparseable_dates_go_last_in_input_order() {
        let series = build_consumption_series(&[
            rec("not-a-date", 1.0),
            rec("2023-05-01", 2.0),
            rec("???", 3.0),
            rec("01/02/2023", 4.0),
        ]);
        assert_eq!(series.labels, vec!["feb. 23", "may. 23", "not-a-date", "???"]);
        assert_eq!(series.values, vec![Some(4.0), Some(2.0), Some(1.0), Some(3.0)]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let series = build_consumption_series(&[
            rec("2023-01-31", 1.0),
            rec("31/01/2023", 2.0),
            rec("2022-12-01", 3.0),
        ]);
        assert_eq!(series.values, vec![Some(3.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn missing_values_and_dates_pass_through() {
        let series = build_consumption_series(&[
            ConsumptionRecord { fecha: None, consumo: Some(5.0) },
            ConsumptionRecord::new("2023-06-01", None),
        ]);
        assert_eq!(series.labels, vec!["jun. 23", ""]);
        assert_eq!(series.values, vec![None, Some(5.0)]);
        assert_eq!(series.points(), vec![(1.0, 5.0)]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = build_consumption_series(&[]);
        assert!(series.is_empty());
        assert!(series.values.is_empty());
    }
}
