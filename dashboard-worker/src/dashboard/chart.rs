//! Equity curve as an inline SVG area chart
//!
//! Points are placed on a time axis when every timestamp parses, otherwise
//! evenly spaced in order.

use crate::analytics::EquityPoint;
use crate::types::{format_timestamp, parse_timestamp};

use super::format::{escape, usd};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 280.0;
const PAD_LEFT: f64 = 90.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 20.0;
const PAD_BOTTOM: f64 = 36.0;

/// Render the chart; empty string when there is nothing to plot
pub fn equity_chart(points: &[EquityPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let coords = plot(points);
    let baseline = HEIGHT - PAD_BOTTOM;

    let line: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    let line = line.join(" L");

    let (first_x, _) = coords[0];
    let (last_x, _) = coords[coords.len() - 1];
    let area = format!("M{first_x:.1},{baseline:.1} L{line} L{last_x:.1},{baseline:.1} Z");

    let (min, max) = value_range(points);
    let markers: String = if coords.len() == 1 {
        let (x, y) = coords[0];
        format!(r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" class="chart-dot"/>"#)
    } else {
        String::new()
    };

    let first_label = escape(&format_timestamp(&points[0].timestamp, "%Y-%m-%d %H:%M"));
    let last_label = escape(&format_timestamp(&points[points.len() - 1].timestamp, "%Y-%m-%d %H:%M"));

    format!(
        r#"<svg class="equity-chart" viewBox="0 0 {WIDTH} {HEIGHT}" preserveAspectRatio="none" role="img" aria-label="Equity curve">
    <line x1="{PAD_LEFT}" y1="{baseline}" x2="{right}" y2="{baseline}" class="chart-axis"/>
    <path d="{area}" class="chart-area"/>
    <path d="M{line}" class="chart-line"/>
    {markers}
    <text x="{label_x}" y="{top_label_y}" class="chart-label" text-anchor="end">{max_label}</text>
    <text x="{label_x}" y="{baseline}" class="chart-label" text-anchor="end">{min_label}</text>
    <text x="{PAD_LEFT}" y="{date_y}" class="chart-label">{first_label}</text>
    <text x="{right}" y="{date_y}" class="chart-label" text-anchor="end">{last_label}</text>
</svg>"#,
        right = WIDTH - PAD_RIGHT,
        label_x = PAD_LEFT - 8.0,
        top_label_y = PAD_TOP + 4.0,
        date_y = HEIGHT - 10.0,
        max_label = usd(max),
        min_label = usd(min),
    )
}

fn value_range(points: &[EquityPoint]) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.total_value), hi.max(p.total_value))
    })
}

/// Map points into SVG coordinates
fn plot(points: &[EquityPoint]) -> Vec<(f64, f64)> {
    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;

    let (min, max) = value_range(points);
    let span = if (max - min).abs() < f64::EPSILON { 1.0 } else { max - min };
    // A flat curve sits in the middle of the plot
    let flat = (max - min).abs() < f64::EPSILON;

    let times: Option<Vec<i64>> = points
        .iter()
        .map(|p| parse_timestamp(&p.timestamp).map(|t| t.and_utc().timestamp()))
        .collect();
    let positions: Vec<f64> = match times {
        Some(times) if times.len() > 1 && times[times.len() - 1] > times[0] => {
            let start = times[0] as f64;
            let range = (times[times.len() - 1] - times[0]) as f64;
            times.iter().map(|t| (*t as f64 - start) / range).collect()
        }
        _ if points.len() > 1 => {
            let last = (points.len() - 1) as f64;
            (0..points.len()).map(|i| i as f64 / last).collect()
        }
        _ => vec![0.5],
    };

    points
        .iter()
        .zip(positions)
        .map(|(p, pos)| {
            let x = PAD_LEFT + pos * plot_width;
            let ratio = if flat { 0.5 } else { (p.total_value - min) / span };
            let y = PAD_TOP + (1.0 - ratio) * plot_height;
            (x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(timestamp: &str, total_value: f64) -> EquityPoint {
        EquityPoint {
            timestamp: timestamp.to_string(),
            total_value,
        }
    }

    #[test]
    fn test_empty_chart() {
        assert!(equity_chart(&[]).is_empty());
    }

    #[test]
    fn test_plot_uses_time_axis() {
        let coords = plot(&[
            point("2026-01-01T00:00:00", 100.0),
            point("2026-01-01T01:00:00", 200.0),
            point("2026-01-01T04:00:00", 150.0),
        ]);
        let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
        assert!((coords[0].0 - PAD_LEFT).abs() < 1e-9);
        assert!((coords[1].0 - (PAD_LEFT + plot_width * 0.25)).abs() < 1e-9);
        assert!((coords[2].0 - (WIDTH - PAD_RIGHT)).abs() < 1e-9);
        // Highest value at the top, lowest at the bottom
        assert!((coords[1].1 - PAD_TOP).abs() < 1e-9);
        assert!((coords[0].1 - (HEIGHT - PAD_BOTTOM)).abs() < 1e-9);
    }

    #[test]
    fn test_plot_falls_back_to_index_spacing() {
        let coords = plot(&[point("a", 1.0), point("b", 1.0), point("c", 1.0)]);
        let mid = PAD_LEFT + (WIDTH - PAD_LEFT - PAD_RIGHT) / 2.0;
        assert!((coords[1].0 - mid).abs() < 1e-9);
        // Flat curve
        assert!((coords[0].1 - coords[2].1).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_gets_a_marker() {
        let svg = equity_chart(&[point("2026-01-01T00:00:00", 1_000.0)]);
        assert!(svg.contains("<circle"));
        assert!(svg.contains("$1,000.00"));
    }

    #[test]
    fn test_chart_labels() {
        let svg = equity_chart(&[
            point("2026-01-01T00:00:00", 1_000.0),
            point("2026-01-02T00:00:00", 1_500.0),
        ]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("chart-area"));
        assert!(svg.contains("$1,500.00"));
        assert!(svg.contains("2026-01-01 00:00"));
        assert!(svg.contains("2026-01-02 00:00"));
        assert!(!svg.contains("<circle"));
    }
}
