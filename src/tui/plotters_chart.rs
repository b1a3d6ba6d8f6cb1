//! Plotters-powered consumption trend widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::app::charts::TrendChart;

/// Render-only view over a [`TrendChart`] handle.
///
/// All series and bounds are computed when the handle is built; `render()`
/// only draws.
pub struct TrendPlottersChart<'a> {
    pub chart: &'a TrendChart,
    pub y_label: &'a str,
}

impl<'a> Widget for TrendPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.chart.x_bounds;
        let [y0, y1] = self.chart.y_bounds;
        let finite = x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite();
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let points = &self.chart.points;
        let labels = &self.chart.labels;
        // Label every point when they fit, otherwise let Plotters thin them out.
        let x_ticks = labels.len().clamp(2, 12);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(x_ticks)
                .y_labels(5)
                .x_label_formatter(&|v| label_at(labels, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(WHITE)
                .bold_line_style(WHITE)
                .draw()?;

            let line_color = RGBColor(0, 113, 227);

            chart.draw_series(LineSeries::new(points.iter().copied(), &line_color))?;
            chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Axis label for a fractional x position: the nearest point's label, blank
/// between points.
fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_show_on_whole_positions() {
        let labels = vec!["ene. 23".to_string(), "feb. 23".to_string()];
        assert_eq!(label_at(&labels, 0.0), "ene. 23");
        assert_eq!(label_at(&labels, 1.0), "feb. 23");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 5.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }
}
