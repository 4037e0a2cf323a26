//! Radar-chart geometry for the life balance areas.
//!
//! The chart lives in a 200x200 box. Area `i` of `n` sits on the spoke at
//! angle `2πi/n - π/2`, so the first area points straight up, and a score
//! of 10 reaches the full radius.

use super::preferences::LifeBalanceArea;
use std::f64::consts::PI;
use std::fmt::Write;

pub const CENTER: f64 = 100.0;
pub const RADIUS: f64 = 90.0;
pub const MAX_VALUE: f64 = 10.0;
const LABEL_VALUE: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn point(index: usize, value: f64, total: usize) -> Point {
    let angle = (2.0 * PI * index as f64) / total as f64 - PI / 2.0;
    let radius = value / MAX_VALUE * RADIUS;
    Point {
        x: CENTER + angle.cos() * radius,
        y: CENTER + angle.sin() * radius,
    }
}

pub fn polygon(areas: &[LifeBalanceArea]) -> Vec<Point> {
    areas
        .iter()
        .enumerate()
        .map(|(i, area)| point(i, f64::from(area.value), areas.len()))
        .collect()
}

pub fn axis_ends(total: usize) -> Vec<Point> {
    (0..total).map(|i| point(i, MAX_VALUE, total)).collect()
}

pub fn label_positions(total: usize) -> Vec<Point> {
    (0..total).map(|i| point(i, LABEL_VALUE, total)).collect()
}

/// SVG `text-anchor` keeping a label clear of the chart.
pub fn text_anchor(point: &Point) -> &'static str {
    let dx = point.x - CENTER;
    if dx.abs() < 1e-6 {
        "middle"
    } else if dx > 0.0 {
        "start"
    } else {
        "end"
    }
}

/// Space separated `x,y` pairs for an SVG `points` attribute.
pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Standalone SVG document of the chart.
pub fn render_svg(areas: &[LifeBalanceArea]) -> String {
    let total = areas.len();
    let mut svg = String::new();
    let _ = writeln!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-40 -20 280 240">"#);

    for ring in (2..=10).step_by(2) {
        let ring: Vec<Point> = (0..total).map(|i| point(i, f64::from(ring), total)).collect();
        let _ = writeln!(
            svg,
            r##"  <polygon points="{}" fill="none" stroke="#e5e7eb" stroke-width="0.5"/>"##,
            svg_points(&ring)
        );
    }

    for end in axis_ends(total) {
        let _ = writeln!(
            svg,
            r##"  <line x1="{c}" y1="{c}" x2="{:.2}" y2="{:.2}" stroke="#e5e7eb" stroke-width="0.5"/>"##,
            end.x,
            end.y,
            c = CENTER
        );
    }

    let _ = writeln!(
        svg,
        r##"  <polygon points="{}" fill="#8b5cf6" fill-opacity="0.3" stroke="#8b5cf6" stroke-width="1.5"/>"##,
        svg_points(&polygon(areas))
    );

    for ((area, vertex), label) in areas.iter().zip(polygon(areas)).zip(label_positions(total)) {
        let _ = writeln!(
            svg,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="3" fill="{}"/>"#,
            vertex.x, vertex.y, area.color
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="{}" dominant-baseline="middle" font-size="8">{}</text>"#,
            label.x,
            label.y,
            text_anchor(&label),
            escape(&area.name)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
