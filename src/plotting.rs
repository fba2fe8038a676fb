use chrono::{Datelike, NaiveDate};
use egui_plot::{Line, LineStyle, PlotPoints};

/// Points for a calories-per-day series, with the date mapped to days from
/// the common era on the x-axis.
pub fn calories_per_day_points(daily: &[(NaiveDate, f64)]) -> Vec<[f64; 2]> {
    daily
        .iter()
        .map(|(date, kcal)| [date.num_days_from_ce() as f64, *kcal])
        .collect()
}

pub fn calories_per_day_line(daily: &[(NaiveDate, f64)]) -> Line {
    Line::new(PlotPoints::from(calories_per_day_points(daily))).name("Calories")
}

pub fn weight_points(series: &[(NaiveDate, f64)]) -> Vec<[f64; 2]> {
    series
        .iter()
        .map(|(date, kg)| [date.num_days_from_ce() as f64, *kg])
        .collect()
}

pub fn weight_line(series: &[(NaiveDate, f64)]) -> Line {
    Line::new(PlotPoints::from(weight_points(series))).name("Weight")
}

/// Dashed horizontal marker at the target weight, spanning the weigh-in
/// series. `None` when there is nothing to span.
pub fn target_weight_line(target_kg: f64, series: &[(NaiveDate, f64)]) -> Option<Line> {
    let first = series.first()?.0.num_days_from_ce() as f64;
    let last = series.last()?.0.num_days_from_ce() as f64;
    let points = vec![[first, target_kg], [last, target_kg]];
    Some(
        Line::new(PlotPoints::from(points))
            .name("Target")
            .style(LineStyle::dashed_dense()),
    )
}

/// Calculate a simple moving average of the y-values in `points`.
pub fn moving_average_points(points: &[[f64; 2]], window: usize) -> Vec<[f64; 2]> {
    if window == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len());
    let mut sum = 0.0;
    for i in 0..points.len() {
        sum += points[i][1];
        if i >= window {
            sum -= points[i - window][1];
        }
        let count = window.min(i + 1) as f64;
        out.push([points[i][0], sum / count]);
    }
    out
}

/// Smoothed companion line for a weight series, or `None` when the window
/// or the series is too small to smooth.
pub fn weight_trend_line(series: &[(NaiveDate, f64)], window: usize) -> Option<Line> {
    if window <= 1 || series.len() <= 1 {
        return None;
    }
    let points = moving_average_points(&weight_points(series), window);
    Some(Line::new(PlotPoints::from(points)).name("Weight MA"))
}

/// Normalized heights for painting a sparkline into a rect, one value per
/// sample in `0..=1` with 0 at the series minimum.
///
/// The range falls back to 1 when all samples are equal, so a constant
/// series draws as a flat line along the bottom.
pub fn normalized_heights(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let mut min = first;
    let mut max = first;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let mut range = max - min;
    if range == 0.0 {
        range = 1.0;
    }
    values.iter().map(|v| (v - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_plot::{PlotGeometry, PlotItem};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_daily() -> Vec<(NaiveDate, f64)> {
        vec![
            (date(2026, 8, 2), 300.0),
            (date(2026, 8, 5), 400.0),
            (date(2026, 8, 9), 250.0),
        ]
    }

    fn line_points(line: Line) -> Vec<[f64; 2]> {
        if let PlotGeometry::Points(points) = line.geometry() {
            points.iter().map(|p| [p.x, p.y]).collect()
        } else {
            panic!("expected points")
        }
    }

    #[test]
    fn test_calories_points_use_day_numbers() {
        let points = calories_per_day_points(&sample_daily());
        let expected = vec![
            [date(2026, 8, 2).num_days_from_ce() as f64, 300.0],
            [date(2026, 8, 5).num_days_from_ce() as f64, 400.0],
            [date(2026, 8, 9).num_days_from_ce() as f64, 250.0],
        ];
        assert_eq!(points, expected);
        assert_eq!(line_points(calories_per_day_line(&sample_daily())), expected);
    }

    #[test]
    fn test_target_line_spans_the_series() {
        let series = vec![(date(2026, 8, 1), 80.0), (date(2026, 8, 20), 78.0)];
        let line = target_weight_line(70.0, &series).unwrap();
        let expected = vec![
            [date(2026, 8, 1).num_days_from_ce() as f64, 70.0],
            [date(2026, 8, 20).num_days_from_ce() as f64, 70.0],
        ];
        assert_eq!(line_points(line), expected);
        assert!(target_weight_line(70.0, &[]).is_none());
    }

    #[test]
    fn test_moving_average_points() {
        let points = vec![[0.0, 2.0], [1.0, 4.0], [2.0, 6.0], [3.0, 8.0]];
        let ma = moving_average_points(&points, 2);
        let expected = vec![[0.0, 2.0], [1.0, 3.0], [2.0, 5.0], [3.0, 7.0]];
        assert_eq!(ma, expected);
    }

    #[test]
    fn test_weight_trend_needs_window_and_points() {
        let series = vec![(date(2026, 8, 1), 80.0), (date(2026, 8, 2), 78.0)];
        assert!(weight_trend_line(&series, 1).is_none());
        assert!(weight_trend_line(&series[..1], 3).is_none());
        let trend = weight_trend_line(&series, 2).unwrap();
        assert_eq!(line_points(trend)[1][1], 79.0);
    }

    #[test]
    fn test_normalized_heights() {
        assert_eq!(normalized_heights(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
        // Constant series falls back to a range of 1 and hugs the bottom.
        assert_eq!(normalized_heights(&[5.0, 5.0, 5.0]), vec![0.0, 0.0, 0.0]);
        assert!(normalized_heights(&[]).is_empty());
        assert_eq!(normalized_heights(&[3.0]), vec![0.0]);
    }
}
