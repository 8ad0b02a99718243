use crate::data::column::ColumnSpec;
use crate::data::record::{CellValue, Record};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Rows of the CSV are sampled for type inference; columns beyond the sample
/// keep whatever kind the sample settled on.
const TYPE_SAMPLE_ROWS: usize = 100;

/// A loaded collection plus the column specs derived from it.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub name: String,
    pub records: Vec<Record>,
    pub columns: Vec<ColumnSpec>,
}

impl RecordSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Load a record collection from a file, dispatching on extension.
/// Supports `.json`, `.csv`, and `.tsv`.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_json(path),
        "csv" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        other => Err(anyhow!(
            "Unsupported file type '{}' (expected .json, .csv, or .tsv): {}",
            other,
            path.display()
        )),
    }
}

/// Load a JSON file holding an array of objects, or an envelope object whose
/// first array-valued field is the collection (the usual REST list shape).
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let json: JsonValue = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;

    let (records, columns) = records_from_json(&json)?;
    debug!(
        records = records.len(),
        columns = columns.len(),
        "loaded JSON collection from {}",
        path.display()
    );

    Ok(RecordSet {
        name: stem_name(path),
        records,
        columns,
    })
}

/// Convert a parsed JSON value into records and derived columns.
pub fn records_from_json(json: &JsonValue) -> Result<(Vec<Record>, Vec<ColumnSpec>)> {
    let items = match json {
        JsonValue::Array(items) => items.as_slice(),
        JsonValue::Object(obj) => obj
            .values()
            .find_map(|v| v.as_array())
            .map(|a| a.as_slice())
            .ok_or_else(|| anyhow!("JSON object contains no array of records"))?,
        _ => return Err(anyhow!("JSON root must be an array of objects")),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut keys: Vec<String> = Vec::new();
    for item in items {
        if let Some(obj) = item.as_object() {
            for key in obj.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.clone());
                }
            }
        }
        records.push(Record::from_json(item));
    }
    if keys.is_empty() && !records.is_empty() {
        keys.push("value".to_string());
    }

    let columns = keys.into_iter().map(ColumnSpec::from_key).collect();
    Ok((records, columns))
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<RecordSet> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut string_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let row = result.context("Failed to read row")?;
        string_rows.push(row.iter().map(|s| s.to_string()).collect());
    }

    // Settle a kind per column from a sample, then convert every field with
    // it so a column sorts consistently.
    let mut kinds = vec![ColumnKind::Null; headers.len()];
    for row in string_rows.iter().take(TYPE_SAMPLE_ROWS) {
        for (idx, raw) in row.iter().enumerate().take(headers.len()) {
            if !raw.is_empty() {
                kinds[idx] = kinds[idx].merge(ColumnKind::infer(raw));
            }
        }
    }

    let mut records = Vec::with_capacity(string_rows.len());
    for row in &string_rows {
        let mut record = Record::new();
        for (idx, key) in headers.iter().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            record.set(key.clone(), kinds[idx].parse(raw));
        }
        records.push(record);
    }

    debug!(
        records = records.len(),
        columns = headers.len(),
        "loaded delimited collection from {}",
        path.display()
    );

    Ok(RecordSet {
        name: stem_name(path),
        records,
        columns: headers.into_iter().map(ColumnSpec::from_key).collect(),
    })
}

fn stem_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records")
        .to_string()
}

/// The kind a delimited-text column settles on after sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Null,
    Boolean,
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn infer(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
            return ColumnKind::Boolean;
        }
        if raw.parse::<i64>().is_ok() {
            return ColumnKind::Integer;
        }
        if raw.parse::<f64>().is_ok() {
            return ColumnKind::Float;
        }
        ColumnKind::Text
    }

    fn merge(self, other: ColumnKind) -> ColumnKind {
        if self == other {
            return self;
        }
        match (self, other) {
            (ColumnKind::Null, k) | (k, ColumnKind::Null) => k,
            (ColumnKind::Integer, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Integer) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        }
    }

    fn parse(self, raw: &str) -> CellValue {
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return CellValue::Null;
        }
        match self {
            ColumnKind::Boolean => {
                let lower = raw.to_lowercase();
                CellValue::Boolean(lower == "true" || lower == "1" || lower == "yes")
            }
            ColumnKind::Integer => raw
                .parse::<i64>()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::String(raw.to_string())),
            ColumnKind::Float => raw
                .parse::<f64>()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::String(raw.to_string())),
            ColumnKind::Null | ColumnKind::Text => CellValue::String(raw.to_string()),
        }
    }
}
