//! Typst chart markup for the NAV curve.

use crate::domain::engine::Snapshot;

pub fn format_nav_chart(history: &[Snapshot]) -> String {
    if history.is_empty() {
        return "_No NAV data available._".to_string();
    }

    let min_nav = history.iter().map(|s| s.nav).fold(f64::INFINITY, f64::min);
    let max_nav = history
        .iter()
        .map(|s| s.nav)
        .fold(f64::NEG_INFINITY, f64::max);

    let width = 500.0;
    let height = 200.0;
    let padding = 40.0;

    let plot_width = width - 2.0 * padding;
    let plot_height = height - 2.0 * padding;

    let range = max_nav - min_nav;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if history.len() > 1 {
        plot_width / (history.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<String> = history
        .iter()
        .enumerate()
        .map(|(i, snapshot)| {
            let x = padding + i as f64 * scale_x;
            let y = height - padding - (snapshot.nav - min_nav) * scale_y;
            format!("({:.1}pt, {:.1}pt)", x, y)
        })
        .collect();

    format!(
        r#"#figure(
  box(
    width: {:.0}pt,
    height: {:.0}pt,
    fill: white,
    {{
      place(line(start: ({:.0}pt, {:.0}pt), end: ({:.0}pt, {:.0}pt)))
      place(line(start: ({:.0}pt, {:.0}pt), end: ({:.0}pt, {:.0}pt)))
      place(path(
        fill: none,
        stroke: blue + 1pt,
        {}
      ))
    }}
  ),
  caption: [Net Asset Value],
)
"#,
        width,
        height,
        padding,
        padding,
        padding,
        height - padding,
        padding,
        height - padding,
        width - padding,
        height - padding,
        points.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn snapshot(day: u32, nav: f64) -> Snapshot {
        Snapshot {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            nav,
            cash: nav,
            positions: HashMap::new(),
        }
    }

    #[test]
    fn empty_history() {
        assert_eq!(format_nav_chart(&[]), "_No NAV data available._");
    }

    #[test]
    fn single_point_renders_figure() {
        let out = format_nav_chart(&[snapshot(1, 100_000.0)]);
        assert!(out.contains("#figure"));
        assert!(out.contains("Net Asset Value"));
    }

    #[test]
    fn multiple_points_render_a_path() {
        let history = vec![
            snapshot(1, 100_000.0),
            snapshot(2, 105_000.0),
            snapshot(3, 102_000.0),
        ];
        let out = format_nav_chart(&history);
        assert!(out.contains("path"));
        assert!(out.contains("width: 500pt"));
        assert!(out.contains("height: 200pt"));
    }

    #[test]
    fn flat_series_stays_in_bounds() {
        let history = vec![snapshot(1, 100.0), snapshot(2, 100.0)];
        let out = format_nav_chart(&history);
        // Degenerate range must not divide by zero.
        assert!(!out.contains("NaN"));
        assert!(!out.contains("inf"));
    }
}
