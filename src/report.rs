use std::path::Path;

use chrono::NaiveDate;
use maud::{Markup, html};
use plotters::prelude::*;

use crate::format;
use crate::logbook::{ActivityEntry, UserProfile, UserStats};
use crate::math;

pub fn export_html_report<P: AsRef<Path>>(
    path: P,
    user: &UserProfile,
    stats: &UserStats,
    activities: &[&ActivityEntry],
    daily: &[(NaiveDate, f64)],
    weights: &[(NaiveDate, f64)],
    today: NaiveDate,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let chart_path = path.with_extension("png");
    let chart_file = match generate_calories_chart(daily, &chart_path) {
        Ok(_) => chart_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("")),
        Err(e) => {
            eprintln!("Failed to generate chart: {}", e);
            std::ffi::OsStr::new("")
        }
    };
    let markup = build_html(user, stats, activities, weights, today, chart_file);
    std::fs::write(path, markup.into_string())
}

fn generate_calories_chart(
    daily: &[(NaiveDate, f64)],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;
    if daily.is_empty() {
        root.present()?;
        return Ok(());
    }
    let max = daily.iter().map(|(_, kcal)| *kcal).fold(0.0_f64, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .caption("Calories per Day", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..daily.len(), 0f64..max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Day")
        .y_desc("kcal")
        .draw()?;
    chart.draw_series(LineSeries::new(
        daily.iter().enumerate().map(|(i, (_, kcal))| (i, *kcal)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}

fn build_html(
    user: &UserProfile,
    stats: &UserStats,
    activities: &[&ActivityEntry],
    weights: &[(NaiveDate, f64)],
    today: NaiveDate,
    chart_file: &std::ffi::OsStr,
) -> Markup {
    let bmi = math::bmi(user.weight_kg, user.height_cm);
    let category = math::bmi_category(bmi);
    html! {
        html {
            head { meta charset="utf-8"; title { "Fit Log Report" } }
            body {
                h1 { "Progress Report" }
                p { (user.name) ", generated on " (format::long_date(today)) }
                table border="1" {
                    tr { th { "Height" } td { (format!("{:.0} cm", user.height_cm)) } }
                    tr { th { "Current Weight" } td { (format!("{:.1} kg", user.weight_kg)) } }
                    tr { th { "Target Weight" } td { (format!("{:.1} kg", user.target_weight_kg)) } }
                    tr { th { "BMI" } td { (format!("{bmi:.1} ({})", category.label())) } }
                    tr { th { "Activities" } td { (stats.total_activities) } }
                    tr { th { "Total Calories" } td { (format::thousands(stats.total_calories.round() as i64)) } }
                    tr { th { "Avg Calories" } td { (format!("{:.1}", stats.avg_calories)) } }
                    tr { th { "Progress" } td { (format!("{:.1}%", stats.weight_progress_pct)) } }
                    tr { th { "Status" } td { (stats.weight_status.to_string()) } }
                }
                h1 { "Weight History" }
                table border="1" {
                    tr { th { "Date" } th { "Weight (kg)" } }
                    @for (date, kg) in weights {
                        tr { td { (date.to_string()) } td { (format!("{kg:.1}")) } }
                    }
                }
                h1 { "Activities" }
                table border="1" {
                    tr { th { "Date" } th { "Activity" } th { "Duration (min)" } th { "Calories" } th { "Notes" } }
                    @for entry in activities {
                        tr {
                            td { (entry.date.to_string()) }
                            td { (entry.activity) }
                            td { (entry.duration_min) }
                            td { (entry.calories) }
                            td { (if entry.notes.is_empty() { "-" } else { entry.notes.as_str() }) }
                        }
                    }
                }
                h1 { "Calories per Day" }
                @if chart_file.is_empty() {
                    p { "Chart unavailable" }
                } @else {
                    img src=(chart_file.to_string_lossy());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::WeightStatus;
    use std::ffi::OsStr;

    fn sample_user() -> UserProfile {
        UserProfile {
            id: 1,
            name: "Arin".to_owned(),
            height_cm: 175.0,
            weight_kg: 70.0,
            age: 30,
            target_weight_kg: 68.0,
            created_on: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            last_updated: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
        }
    }

    fn sample_stats() -> UserStats {
        UserStats {
            total_activities: 2,
            total_calories: 12450.0,
            avg_calories: 415.3,
            weight_progress_pct: 50.0,
            weight_status: WeightStatus::Losing {
                done_kg: 1.0,
                goal_kg: 2.0,
            },
        }
    }

    #[test]
    fn build_html_renders_summary_and_rows() {
        let user = sample_user();
        let stats = sample_stats();
        let entry = ActivityEntry {
            id: 1,
            user_id: 1,
            activity: "Jogging".to_owned(),
            duration_min: 60.0,
            calories: 490.0,
            date: NaiveDate::from_ymd_opt(2026, 8, 2).unwrap(),
            notes: String::new(),
        };
        let weights = vec![(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), 71.0)];
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();

        let output = build_html(
            &user,
            &stats,
            &[&entry],
            &weights,
            today,
            OsStr::new("report.png"),
        )
        .into_string();

        assert!(output.contains("Arin"));
        assert!(output.contains("generated on 23 August 2026"));
        assert!(output.contains("22.9 (Normal weight)"));
        assert!(output.contains("12,450"));
        assert!(output.contains("Losing weight (1.0/2.0 kg)"));
        assert!(output.contains("Jogging"));
        assert!(output.contains("<td>-</td>"));
        assert!(output.contains("report.png"));
    }

    #[test]
    fn build_html_handles_empty_chart_file() {
        let user = sample_user();
        let stats = sample_stats();
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();

        let output = build_html(&user, &stats, &[], &[], today, OsStr::new("")).into_string();

        assert!(output.contains("Chart unavailable"));
        assert!(!output.contains("<img"));
    }
}
