//! CSV in and out of a [`Dataset`].
//!
//! A column loads as numeric when every non-empty cell parses as `f64`;
//! otherwise it stays text. Empty cells are missing values either way.

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::{Column, Dataset};

/// Load a headed CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    read_records(rdr)
}

/// Read headed CSV from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    read_records(rdr)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (i, col) in cells.iter_mut().enumerate() {
            let cell = record.get(i).filter(|c| !c.is_empty()).map(str::to_string);
            col.push(cell);
        }
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (name, raw) in headers.into_iter().zip(cells) {
        columns.push(infer_column(name, raw));
    }
    let data = Dataset::from_columns(columns)?;
    debug!(
        "loaded {} rows, numeric columns: {:?}",
        data.row_count(),
        data.numeric_column_names()
    );
    Ok(data)
}

fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    match parsed {
        // an all-empty column carries no evidence of being numeric
        Some(values) if values.iter().any(Option::is_some) => Column::numeric(name, values),
        _ => Column::text(name, raw),
    }
}

/// Save a dataset as CSV with header; missing values become empty cells.
pub fn save_csv<P: AsRef<Path>>(data: &Dataset, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(data.column_names())?;
    for row in 0..data.row_count() {
        let record: Vec<String> = data
            .columns()
            .iter()
            .map(|c| c.label_at(row).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn infers_numeric_and_text_columns() {
        let csv = "region,sales,note\nnorth,120,a\nsouth,,b\neast,95.5,\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.row_count(), 3);
        assert_eq!(
            data.numeric("sales").unwrap(),
            &[Some(120.0), None, Some(95.5)]
        );
        assert!(!data.column("region").unwrap().is_numeric());
        assert_eq!(data.column("note").unwrap().label_at(2), None);
    }

    #[test]
    fn write_then_load_csv() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("x.csv");
        let data = Dataset::new()
            .with_text("k", &["a", "b"])
            .unwrap()
            .with_numeric("v", &[1.0, 2.5])
            .unwrap();
        save_csv(&data, &p).unwrap();
        let back = load_csv(&p).unwrap();
        assert_eq!(back.numeric("v").unwrap(), &[Some(1.0), Some(2.5)]);
        assert_eq!(back.column_names(), vec!["k", "v"]);
    }
}
