//! CSV and SVG export of the history series

use log::info;
use mechanics::{HistoryBuffers, Series};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// CSV with a header row and one `x,y` row per point, oldest first
pub fn series_csv(series: Series, points: &[(f64, f64)]) -> String {
    let (x_label, y_label) = series.axis_labels();
    let mut csv = String::new();
    csv.push_str(x_label);
    csv.push(',');
    csv.push_str(y_label);
    csv.push('\n');
    for (x, y) in points {
        csv.push_str(&format_number(*x));
        csv.push(',');
        csv.push_str(&format_number(*y));
        csv.push('\n');
    }
    csv
}

fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Write `<name>.csv` and `<name>.svg` for every series into `dir`.
pub fn export_all(history: &HistoryBuffers, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for series in Series::ALL {
        let points = history.series(series).to_pairs();

        let csv_path = dir.join(format!("{}.csv", series.name()));
        fs::write(&csv_path, series_csv(series, &points))?;
        written.push(csv_path);

        if points.is_empty() {
            continue;
        }
        let svg_path = dir.join(format!("{}.svg", series.name()));
        draw_series(&svg_path, series, &points).map_err(|e| AppError::Plot(e.to_string()))?;
        written.push(svg_path);
    }

    info!("exported {} files to {}", written.len(), dir.display());
    Ok(written)
}

fn draw_series(
    path: &Path,
    series: Series,
    points: &[(f64, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));
    let (x_label, y_label) = series.axis_labels();

    let mut chart = ChartBuilder::on(&root)
        .caption(series.name(), ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_label).y_desc(y_label).draw()?;
    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;

    root.present()?;
    Ok(())
}

/// Min and max of `values`, widened so the range is never empty
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < 1e-12 {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}
