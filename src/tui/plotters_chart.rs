//! Plotters-powered forecast chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer line rendering at terminal resolution
//! - the dashed forecast series comes for free
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Axis ticks and the legend are drawn by the
//! caller in plain terminal cells, where they stay crisp.

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct ForecastChart<'a> {
    /// Historical close prices as (trading-day index, price).
    pub history: &'a [(f64, f64)],
    /// Forecast line, anchored at the last historical point.
    pub forecast: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for ForecastChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Series styling: keep the palette high-contrast for terminal
            // readability. Solid history, dashed forecast.
            let history_color = RGBColor(0, 255, 255); // cyan
            let forecast_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(
                self.history.iter().copied(),
                &history_color,
            ))?;
            chart.draw_series(DashedLineSeries::new(
                self.forecast.iter().copied(),
                3,
                2,
                forecast_color.into(),
            ))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
