use std::path::Path;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::logbook::{ActivityEntry, WeightRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Text(String),
    Number(f64),
}

/// One export row: named values in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRecord {
    pub fields: Vec<(String, ExportValue)>,
}

impl ExportRecord {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .push((name.to_owned(), ExportValue::Text(value.into())));
        self
    }

    pub fn number(mut self, name: &str, value: f64) -> Self {
        self.fields
            .push((name.to_owned(), ExportValue::Number(value)));
        self
    }

    fn field(&self, name: &str) -> Option<&ExportValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl Serialize for ExportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportValue::Text(s) => serializer.serialize_str(s),
            // Whole numbers serialize without a decimal point.
            ExportValue::Number(n) if n.fract() == 0.0 && n.abs() < 9e15 => {
                serializer.serialize_i64(*n as i64)
            }
            ExportValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl Serialize for ExportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows in the export CSV dialect: the header row comes from the first
/// record, text cells are wrapped in double quotes, and embedded quotes or
/// commas are written through untouched. Columns missing from a record
/// become empty cells; columns the first record does not have are dropped.
pub fn csv_string(records: &[ExportRecord]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.fields.iter().map(|(n, _)| n.as_str()).collect();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.join(","));
    for record in records {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| match record.field(header) {
                Some(ExportValue::Text(s)) => format!("\"{s}\""),
                Some(ExportValue::Number(n)) => format!("{n}"),
                None => String::new(),
            })
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn write_csv<P: AsRef<Path>>(path: P, records: &[ExportRecord]) -> std::io::Result<()> {
    std::fs::write(path, csv_string(records))
}

pub fn write_json<P: AsRef<Path>>(path: P, records: &[ExportRecord]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)
}

pub fn write_export<P: AsRef<Path>>(
    path: P,
    format: ExportFormat,
    records: &[ExportRecord],
) -> std::io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(path, records),
        ExportFormat::Json => write_json(path, records),
    }
}

pub fn suggested_filename(format: ExportFormat, today: NaiveDate) -> String {
    format!("fitlog_export_{today}.{}", format.extension())
}

pub fn activity_records<'a>(entries: impl Iterator<Item = &'a ActivityEntry>) -> Vec<ExportRecord> {
    entries
        .map(|e| {
            ExportRecord::default()
                .text("date", e.date.to_string())
                .text("activity", &e.activity)
                .number("duration_min", e.duration_min)
                .number("calories", e.calories)
                .text("notes", &e.notes)
        })
        .collect()
}

pub fn weight_records<'a>(entries: impl Iterator<Item = &'a WeightRecord>) -> Vec<ExportRecord> {
    entries
        .map(|w| {
            ExportRecord::default()
                .text("date", w.date.to_string())
                .number("weight_kg", w.weight_kg)
                .text("notes", &w.notes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ExportRecord> {
        vec![
            ExportRecord::default()
                .text("date", "2026-08-02")
                .text("activity", "Jogging")
                .number("calories", 490.0),
            ExportRecord::default()
                .text("date", "2026-08-03")
                .text("activity", "Swimming")
                .number("calories", 300.5),
        ]
    }

    #[test]
    fn csv_headers_come_from_the_first_record() {
        let csv = csv_string(&sample_records());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,activity,calories"));
        assert_eq!(lines.next(), Some("\"2026-08-02\",\"Jogging\",490"));
        assert_eq!(lines.next(), Some("\"2026-08-03\",\"Swimming\",300.5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_text_is_quoted_but_never_escaped() {
        let records = vec![
            ExportRecord::default()
                .text("notes", "easy run")
                .number("calories", 100.0),
            ExportRecord::default()
                .text("notes", "said \"go\", then stopped")
                .number("calories", 200.0),
        ];
        let csv = csv_string(&records);
        // The embedded quote and comma pass straight through.
        assert!(csv.contains("\"said \"go\", then stopped\""));
    }

    #[test]
    fn csv_missing_columns_become_empty_cells() {
        let records = vec![
            ExportRecord::default()
                .text("a", "x")
                .text("b", "y")
                .number("c", 1.0),
            ExportRecord::default().text("a", "z"),
        ];
        let csv = csv_string(&records);
        assert_eq!(csv.lines().last(), Some("\"z\",,"));
    }

    #[test]
    fn csv_drops_columns_the_first_record_lacks() {
        let records = vec![
            ExportRecord::default().text("a", "x"),
            ExportRecord::default().text("a", "y").text("extra", "gone"),
        ];
        let csv = csv_string(&records);
        assert!(!csv.contains("extra"));
        assert!(!csv.contains("gone"));
    }

    #[test]
    fn csv_of_nothing_is_empty() {
        assert_eq!(csv_string(&[]), "");
    }

    #[test]
    fn json_keeps_column_order_and_whole_numbers() {
        let records = vec![
            ExportRecord::default()
                .text("date", "2026-08-02")
                .number("calories", 490.0),
        ];
        let json = serde_json::to_string_pretty(&records).unwrap();
        let expected = "[\n  {\n    \"date\": \"2026-08-02\",\n    \"calories\": 490\n  }\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn json_keeps_fractions() {
        let records = vec![ExportRecord::default().number("weight_kg", 72.5)];
        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(json, "[{\"weight_kg\":72.5}]");
    }

    #[test]
    fn export_files_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("out.csv");
        let json_path = dir.path().join("out.json");
        let records = sample_records();

        write_export(&csv_path, ExportFormat::Csv, &records).unwrap();
        write_export(&json_path, ExportFormat::Json, &records).unwrap();

        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv.starts_with("date,activity,calories\n"));
        let json = std::fs::read_to_string(json_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["activity"], "Jogging");
        assert_eq!(parsed[1]["calories"], 300.5);
    }

    #[test]
    fn suggested_filenames_carry_the_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(
            suggested_filename(ExportFormat::Csv, today),
            "fitlog_export_2026-08-23.csv"
        );
        assert_eq!(
            suggested_filename(ExportFormat::Json, today),
            "fitlog_export_2026-08-23.json"
        );
    }

    #[test]
    fn activity_rows_use_table_column_order() {
        let entry = ActivityEntry {
            id: 1,
            user_id: 1,
            activity: "Jogging".to_owned(),
            duration_min: 60.0,
            calories: 490.0,
            date: NaiveDate::from_ymd_opt(2026, 8, 2).unwrap(),
            notes: "morning".to_owned(),
        };
        let records = activity_records([&entry].into_iter());
        let csv = csv_string(&records);
        assert_eq!(
            csv,
            "date,activity,duration_min,calories,notes\n\"2026-08-02\",\"Jogging\",60,490,\"morning\""
        );
    }
}
