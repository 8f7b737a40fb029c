//! Plotters-powered price curve chart widget for Ratatui.
//!
//! Plotters gives us axis + mesh rendering and tick labels without manual layout
//! work. Output is drawn into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct CurveChart<'a> {
    /// Line series for the fitted price curve.
    pub curve: &'a [(f64, f64)],
    /// Boundary conditions the curve was fitted through.
    pub marks: &'a [(f64, f64)],
    /// X bounds (supply, base units).
    pub x_bounds: [f64; 2],
    /// Y bounds (price).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Legend entry for the curve (the formula with solved parameters).
    pub legend: String,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for CurveChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
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

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Scientific tick labels are wider than tenor labels.
                .set_label_area_size(LabelAreaPosition::Left, 9)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Grid on: the price axis spans an order of magnitude and the mesh
            // makes it readable at terminal resolution.
            chart
                .configure_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&RGBColor(90, 90, 90))
                .light_line_style(&RGBColor(40, 40, 40))
                .draw()?;

            let curve_color = RGBColor(0, 255, 255); // cyan
            let mark_color = RGBColor(255, 255, 0); // yellow

            chart
                .draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?
                .label(self.legend.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 2, y)], &curve_color));

            // `Circle` radii are mis-scaled by the ratatui backend; a `Pixel`
            // renders as a clean dot.
            chart.draw_series(self.marks.iter().map(|&(x, y)| Pixel::new((x, y), mark_color)))?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(("sans-serif", 10).into_font().color(&WHITE))
                .border_style(&WHITE)
                .draw()?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
