//! Deterministic figure rendering.
//!
//! Figures render to an SVG document which is embedded in the cell output as
//! a base64 `data:` URI. Identical figure content always yields identical
//! bytes; every additional series on a figure takes the next colour of the
//! cycle, so redrawing the same data on a live figure changes the output.

use std::fmt::Write;

use base64::Engine;

use super::registry::{FigureHandle, FigureId, Series};

/// Line colours, assigned by series index.
pub const COLOR_CYCLE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Margin around the plotting area in pixels.
const MARGIN: f64 = 40.0;

/// Render a figure to an SVG document.
pub fn render_svg(figure: &FigureHandle, width: u32, height: u32) -> String {
    let (w, h) = (f64::from(width), f64::from(height));
    let plot_w = (w - 2.0 * MARGIN).max(1.0);
    let plot_h = (h - 2.0 * MARGIN).max(1.0);
    let bounds = Bounds::of(figure.series());

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<rect x="{MARGIN:.2}" y="{MARGIN:.2}" width="{plot_w:.2}" height="{plot_h:.2}" fill="white" stroke="black"/>"#
    );

    for (index, series) in figure.series().iter().enumerate() {
        let color = COLOR_CYCLE[index % COLOR_CYCLE.len()];
        let mut points = String::new();
        for (x, y) in series.xs.iter().zip(&series.ys) {
            let px = MARGIN + (x - bounds.x_min) / bounds.x_span() * plot_w;
            let py = MARGIN + (bounds.y_max - y) / bounds.y_span() * plot_h;
            if !points.is_empty() {
                points.push(' ');
            }
            let _ = write!(points, "{px:.2},{py:.2}");
        }
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}"/>"#
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Encode an SVG document as a base64 `data:` URI.
pub fn data_uri(svg: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:image/svg+xml;base64,{encoded}")
}

/// Name under which a figure is bound in the live registry.
pub fn binding_name(id: FigureId) -> String {
    format!("figure_{}", id.number())
}

/// Static HTML block for a rendered figure.
pub fn html_block(uri: &str) -> String {
    format!("<div><img src=\"{uri}\"/></div>")
}

/// Live-bound HTML block for a rendered figure.
///
/// The `src` attribute carries the published value so the block displays
/// even before the frontend resolves the binding.
pub fn angular_block(id: FigureId, uri: &str) -> String {
    let name = binding_name(id);
    format!("<div id=\"figure-{id}\"><img ng-src=\"{{{{{name}}}}}\" src=\"{uri}\"/></div>")
}

/// Data extent across all series of a figure.
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of(series: &[Series]) -> Self {
        let mut bounds = Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for s in series {
            for (&x, &y) in s.xs.iter().zip(&s.ys) {
                bounds.x_min = bounds.x_min.min(x);
                bounds.x_max = bounds.x_max.max(x);
                bounds.y_min = bounds.y_min.min(y);
                bounds.y_max = bounds.y_max.max(y);
            }
        }
        if bounds.x_min > bounds.x_max {
            // No points at all.
            return Self {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            };
        }
        bounds
    }

    fn x_span(&self) -> f64 {
        span(self.x_min, self.x_max)
    }

    fn y_span(&self) -> f64 {
        span(self.y_min, self.y_max)
    }
}

/// Flat extents are widened so single points land mid-axis.
fn span(min: f64, max: f64) -> f64 {
    if max > min { max - min } else { 1.0 }
}
