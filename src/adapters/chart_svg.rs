//! SVG rendering of the combined close/volume chart.
//!
//! Dates form the category axis. Close is drawn as a line against the left
//! axis, volume as bars against an independent right axis. Points are drawn
//! in the order given; NaN values are skipped.

use crate::domain::client_config::ChartSize;
use crate::domain::view::ChartPoint;
use std::fmt::Write;

const LINE_COLOR: &str = "#8884d8";
const BAR_COLOR: &str = "#413ea0";
const PAD_LEFT: f64 = 60.0;
const PAD_RIGHT: f64 = 60.0;
const PAD_TOP: f64 = 40.0;
const PAD_BOTTOM: f64 = 50.0;
const MAX_BAR_WIDTH: f64 = 20.0;
const MAX_X_LABELS: usize = 10;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub fn render_chart_svg(series: &[ChartPoint], trade_code: &str, size: ChartSize) -> String {
    let width = f64::from(size.width);
    let height = f64::from(size.height);
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let title = if trade_code.is_empty() {
        "Stocks Chart".to_string()
    } else {
        format!("Stocks Chart: {}", escape(trade_code))
    };
    let _ = writeln!(
        svg,
        r##"<text x="{:.1}" y="24" text-anchor="middle" font-size="16" fill="#4A90E2">{}</text>"##,
        width / 2.0,
        title
    );

    if series.is_empty() {
        let message = if trade_code.is_empty() {
            "Select a trade code".to_string()
        } else {
            format!("No data for {}", escape(trade_code))
        };
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14" fill="gray">{}</text>"#,
            width / 2.0,
            height / 2.0,
            message
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let plot_w = (width - PAD_LEFT - PAD_RIGHT).max(1.0);
    let plot_h = (height - PAD_TOP - PAD_BOTTOM).max(1.0);
    let baseline = PAD_TOP + plot_h;
    let band = plot_w / series.len() as f64;
    let x_at = |i: usize| PAD_LEFT + band * (i as f64 + 0.5);

    // Axes and grid.
    let _ = writeln!(
        svg,
        r##"<g stroke="#ccc" stroke-dasharray="3 3"><line x1="{l:.1}" y1="{t:.1}" x2="{r:.1}" y2="{t:.1}"/><line x1="{l:.1}" y1="{m:.1}" x2="{r:.1}" y2="{m:.1}"/></g>"##,
        l = PAD_LEFT,
        r = PAD_LEFT + plot_w,
        t = PAD_TOP,
        m = PAD_TOP + plot_h / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<g stroke="black"><line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}"/><line x1="{r:.1}" y1="{t:.1}" x2="{r:.1}" y2="{b:.1}"/><line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}"/></g>"#,
        l = PAD_LEFT,
        r = PAD_LEFT + plot_w,
        t = PAD_TOP,
        b = baseline
    );

    // Volume bars, right axis from zero.
    let max_volume = finite_range(series.iter().map(|p| p.volume))
        .map(|(_, hi)| hi.max(0.0))
        .unwrap_or(0.0);
    let bar_w = (band * 0.8).min(MAX_BAR_WIDTH);
    let _ = writeln!(svg, r#"<g class="volume" fill="{BAR_COLOR}">"#);
    for (i, point) in series.iter().enumerate() {
        if !point.volume.is_finite() || max_volume <= 0.0 {
            continue;
        }
        let h = point.volume.max(0.0) / max_volume * plot_h;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/>"#,
            x_at(i) - bar_w / 2.0,
            baseline - h,
            bar_w,
            h
        );
    }
    svg.push_str("</g>\n");

    // Close line, left axis.
    let close_range = finite_range(series.iter().map(|p| p.close));
    if let Some((lo, hi)) = close_range {
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };
        let y_at = |v: f64| baseline - (v - lo) / (hi - lo) * plot_h;
        let points: Vec<String> = series
            .iter()
            .enumerate()
            .filter(|(_, p)| p.close.is_finite())
            .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.close)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline class="close" fill="none" stroke="{LINE_COLOR}" stroke-width="2" points="{}"/>"#,
            points.join(" ")
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            PAD_LEFT - 6.0,
            PAD_TOP + 4.0,
            format_tick(hi)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            PAD_LEFT - 6.0,
            baseline,
            format_tick(lo)
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text>"#,
        PAD_LEFT + plot_w + 6.0,
        PAD_TOP + 4.0,
        format_tick(max_volume)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11">0</text>"#,
        PAD_LEFT + plot_w + 6.0,
        baseline
    );

    // Category labels, thinned so at most MAX_X_LABELS are drawn.
    let step = series.len().div_ceil(MAX_X_LABELS).max(1);
    for (i, point) in series.iter().enumerate().step_by(step) {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10">{}</text>"#,
            x_at(i),
            baseline + 16.0,
            escape(&point.date)
        );
    }

    // Legend.
    let legend_y = height - 10.0;
    let _ = writeln!(
        svg,
        r#"<g font-size="12"><line x1="{x0:.1}" y1="{ly:.1}" x2="{x1:.1}" y2="{ly:.1}" stroke="{LINE_COLOR}" stroke-width="2"/><text x="{tx0:.1}" y="{ty:.1}">close</text><rect x="{x2:.1}" y="{ry:.1}" width="10" height="10" fill="{BAR_COLOR}"/><text x="{tx1:.1}" y="{ty:.1}">volume</text></g>"#,
        x0 = width / 2.0 - 80.0,
        x1 = width / 2.0 - 62.0,
        ly = legend_y - 4.0,
        tx0 = width / 2.0 - 58.0,
        x2 = width / 2.0 + 10.0,
        ry = legend_y - 9.0,
        tx1 = width / 2.0 + 24.0,
        ty = legend_y
    );

    svg.push_str("</svg>\n");
    svg
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
