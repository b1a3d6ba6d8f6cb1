//! Chart data owned by the coordinator.
//!
//! A chart "handle" here is the fully prepared, render-only data for one chart
//! widget. Handles are built from a `DisplayModel` and replaced wholesale on
//! every successful lookup; nothing mutates them in place.

use crate::domain::DisplayModel;

/// Proportional (per-period) view of annual consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownChart {
    /// `(label, kwh, share)` per slice, in display order.
    pub slices: Vec<(String, f64, f64)>,
    pub total_kwh: f64,
}

impl BreakdownChart {
    pub fn from_model(model: &DisplayModel) -> Self {
        let slices: Vec<(String, f64, f64)> = model
            .period_breakdown
            .iter()
            .map(|s| (s.label.clone(), s.kwh, s.share))
            .collect();
        let total_kwh: f64 = slices.iter().map(|(_, kwh, _)| kwh).sum();
        Self { slices, total_kwh }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Time-ordered consumption trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    /// `(x, kwh)` where `x` is the index into `labels`; missing values are skipped.
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<String>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl TrendChart {
    pub fn from_model(model: &DisplayModel) -> Self {
        let points = model.consumption.points();
        let labels = model.consumption.labels.clone();

        let x_max = (labels.len().max(2) - 1) as f64;
        let x_bounds = [0.0, x_max];

        // y starts at zero unless a reading is negative.
        let y_max = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
        let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
        let y_min = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::min);

        Self {
            points,
            labels,
            x_bounds,
            y_bounds: [y_min, y_top],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One handle per chart widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub breakdown: BreakdownChart,
    pub trend: TrendChart,
}

impl ChartSet {
    pub fn from_model(model: &DisplayModel) -> Self {
        Self {
            breakdown: BreakdownChart::from_model(model),
            trend: TrendChart::from_model(model),
        }
    }
}

impl Drop for ChartSet {
    fn drop(&mut self) {
        tracing::trace!(
            slices = self.breakdown.slices.len(),
            points = self.trend.points.len(),
            "chart handles torn down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LookupResponse;
    use crate::normalize::normalize_response;
    use serde_json::json;

    fn model(value: serde_json::Value) -> DisplayModel {
        let response: LookupResponse = serde_json::from_value(value).unwrap();
        normalize_response(response)
    }

    #[test]
    fn trend_skips_missing_values_and_pads_bounds() {
        let m = model(json!({
            "consumos": [
                {"fecha": "2023-01-01", "consumo": 100},
                {"fecha": "2023-02-01"},
                {"fecha": "2023-03-01", "consumo": 50}
            ]
        }));
        let trend = TrendChart::from_model(&m);
        assert_eq!(trend.points, vec![(0.0, 100.0), (2.0, 50.0)]);
        assert_eq!(trend.labels.len(), 3);
        assert_eq!(trend.x_bounds, [0.0, 2.0]);
        assert_eq!(trend.y_bounds[0], 0.0);
        assert!((trend.y_bounds[1] - 110.0).abs() < 1e-9);
    }

    #[test]
    fn empty_model_gives_drawable_bounds() {
        let charts = ChartSet::from_model(&model(json!({})));
        assert!(charts.breakdown.is_empty());
        assert!(charts.trend.is_empty());
        assert_eq!(charts.trend.x_bounds, [0.0, 1.0]);
        assert_eq!(charts.trend.y_bounds, [0.0, 1.0]);
    }

    #[test]
    fn breakdown_total_matches_slices() {
        let m = model(json!({"consumos_anuales_periodo": {"periodo_1": 30, "periodo_2": 10}}));
        let chart = BreakdownChart::from_model(&m);
        assert_eq!(chart.total_kwh, 40.0);
        assert_eq!(chart.slices[0], ("P1".to_string(), 30.0, 0.75));
    }
}
