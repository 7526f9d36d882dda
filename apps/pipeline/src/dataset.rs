//! Tabular dataset I/O.
//!
//! CSV in, CSV out. All input columns pass through untouched; the two
//! extracted columns are appended at the end. Filenames carry the run date,
//! so each day's crawl lands in its own pair of files.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{MergedRecord, SourceRecord};

/// Column that carries each posting's apply link — the pipeline key.
pub const KEY_COLUMN: &str = "apply_link";
/// Output columns appended by the pipeline.
pub const QUALIFICATIONS_COLUMN: &str = "qualifications";
pub const PREFERRED_COLUMN: &str = "preferred";

/// Input rows plus their header, as read from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<SourceRecord>,
}

/// Input file for the extraction stage: the apply-link-augmented listing.
pub fn input_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("list_with_apply_link_{date}.csv"))
}

/// Output file for the extraction stage.
pub fn output_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("ai_jobs_final_results_{date}.csv"))
}

/// Input file for the listing stage: raw captured card markup, one snippet
/// per row, no header.
pub fn captured_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("ai_jobs_captured_raw_{date}.csv"))
}

/// Output file for the listing stage.
pub fn listing_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("ai_jobs_captured_list_{date}.csv"))
}

pub fn read_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::Dataset(format!("cannot open input dataset {}: {e}", path.display()))
    })?;
    parse_dataset(file)
}

/// Parses a headered CSV into records keyed by the apply-link column.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset, AppError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let key_index = headers
        .iter()
        .position(|h| h == KEY_COLUMN)
        .ok_or_else(|| {
            AppError::Dataset(format!(
                "input dataset has no '{KEY_COLUMN}' column (found: {})",
                headers.join(", ")
            ))
        })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: Vec<String> = row.iter().map(str::to_string).collect();
        records.push(SourceRecord {
            key: fields[key_index].clone(),
            fields,
        });
    }

    Ok(Dataset { headers, records })
}

pub fn write_results(
    path: &Path,
    headers: &[String],
    rows: &[MergedRecord],
) -> Result<(), AppError> {
    let file = File::create(path)?;
    render_results(file, headers, rows)
}

/// Writes the merged rows: original columns in original order, then the two
/// extracted columns. Deterministic for a given input.
pub fn render_results<W: Write>(
    writer: W,
    headers: &[String],
    rows: &[MergedRecord],
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.push(QUALIFICATIONS_COLUMN);
    header_row.push(PREFERRED_COLUMN);
    writer.write_record(&header_row)?;

    for row in rows {
        let mut cells: Vec<&str> = row.fields.iter().map(String::as_str).collect();
        cells.push(&row.qualifications);
        cells.push(&row.preferred);
        writer.write_record(&cells)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
company,title,apply_link
Acme,Backend Engineer,https://jobs.example/acme
Globex,ML Engineer,https://jobs.example/globex
";

    #[test]
    fn test_parse_keys_records_by_apply_link() {
        let dataset = parse_dataset(INPUT.as_bytes()).unwrap();
        assert_eq!(
            dataset.headers,
            vec!["company", "title", "apply_link"]
        );
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[0].key, "https://jobs.example/acme");
        assert_eq!(
            dataset.records[1].fields,
            vec!["Globex", "ML Engineer", "https://jobs.example/globex"]
        );
    }

    #[test]
    fn test_missing_key_column_is_a_setup_error() {
        let result = parse_dataset("company,title\nAcme,Engineer\n".as_bytes());
        let err = result.err().unwrap();
        assert!(matches!(err, AppError::Dataset(_)));
        assert!(err.to_string().contains(KEY_COLUMN));
    }

    #[test]
    fn test_render_appends_the_two_columns() {
        let dataset = parse_dataset(INPUT.as_bytes()).unwrap();
        let rows: Vec<MergedRecord> = dataset
            .records
            .iter()
            .map(|record| MergedRecord {
                fields: record.fields.clone(),
                qualifications: "Rust\nSQL".to_string(),
                preferred: String::new(),
            })
            .collect();

        let mut out = Vec::new();
        render_results(&mut out, &dataset.headers, &rows).unwrap();
        let written = String::from_utf8(out).unwrap();

        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "company,title,apply_link,qualifications,preferred"
        );
        // multi-line cell gets quoted by the writer
        assert!(written.contains("\"Rust\nSQL\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        let dataset = parse_dataset(INPUT.as_bytes()).unwrap();
        let rows: Vec<MergedRecord> = dataset
            .records
            .iter()
            .map(|record| MergedRecord {
                fields: record.fields.clone(),
                qualifications: "q".to_string(),
                preferred: "p".to_string(),
            })
            .collect();

        let mut first = Vec::new();
        let mut second = Vec::new();
        render_results(&mut first, &dataset.headers, &rows).unwrap();
        render_results(&mut second, &dataset.headers, &rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dated_paths() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 26).unwrap();
        let dir = Path::new("sheets");
        assert_eq!(
            input_path(dir, date),
            Path::new("sheets/list_with_apply_link_2025-08-26.csv")
        );
        assert_eq!(
            output_path(dir, date),
            Path::new("sheets/ai_jobs_final_results_2025-08-26.csv")
        );
    }
}
