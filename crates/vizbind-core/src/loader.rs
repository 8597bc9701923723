// File: crates/vizbind-core/src/loader.rs
// Summary: Dataset loading from delimited text with declared or inferred column types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ChartError, Result};
use crate::record::{Dataset, Field, FieldKind, FieldValue, Record, Schema};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal { format: String },
}

/// Declares one column to keep. Undeclared columns are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header name in the source file.
    pub name: String,
    pub kind: ColumnKind,
    /// Field name in the loaded dataset; defaults to `name`.
    #[serde(default)]
    pub rename: Option<String>,
    /// Multiplier applied to numeric cells (e.g. 100 for fractions shown as percent).
    #[serde(default)]
    pub scale: Option<f64>,
}

impl ColumnSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Numeric, rename: None, scale: None }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ColumnKind::Categorical, rename: None, scale: None }
    }

    pub fn temporal(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Temporal { format: format.into() },
            rename: None,
            scale: None,
        }
    }

    pub fn renamed(mut self, to: impl Into<String>) -> Self {
        self.rename = Some(to.into());
        self
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale = Some(factor);
        self
    }

    fn field_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    fn field_kind(&self) -> FieldKind {
        match self.kind {
            ColumnKind::Numeric => FieldKind::Numeric,
            ColumnKind::Categorical => FieldKind::Categorical,
            ColumnKind::Temporal { .. } => FieldKind::Temporal,
        }
    }
}

/// What to do with a cell that does not parse as its declared kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// First bad cell fails the whole load.
    #[default]
    Abort,
    /// Bad rows are dropped (and logged).
    SkipRow,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Empty means infer: numeric when every non-empty cell parses, else categorical.
    pub columns: Vec<ColumnSpec>,
    pub policy: ParsePolicy,
    /// Sort ascending by this field after loading.
    pub sort_by: Option<String>,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { columns: Vec::new(), policy: ParsePolicy::Abort, sort_by: None, delimiter: b',' }
    }
}

impl CsvOptions {
    pub fn with_columns(columns: Vec<ColumnSpec>) -> Self {
        Self { columns, ..Self::default() }
    }

    pub fn sorted_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Parse delimited text into a dataset.
///
/// Rows with the wrong number of fields, or that the reader cannot decode, are subject to
/// `opts.policy` like unparseable cells. Row numbers count data rows from 1.
pub fn parse_csv<R: Read>(reader: R, opts: &CsvOptions) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(opts.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut skipped = 0usize;
    let mut reject = |line: usize, field: &str, message: String| match opts.policy {
        ParsePolicy::Abort => Err(ChartError::parse(line, field, message)),
        ParsePolicy::SkipRow => {
            log::warn!("skipping row {line}: {message}");
            skipped += 1;
            Ok(())
        }
    };

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 1;
        match result {
            Ok(row) if row.len() == headers.len() => rows.push((line, row)),
            Ok(row) => reject(line, "", format!("expected {} fields, found {}", headers.len(), row.len()))?,
            // the reader cannot continue past an I/O failure
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => reject(line, "", e.to_string())?,
        }
    }

    let columns = if opts.columns.is_empty() {
        infer_columns(&headers, &rows)
    } else {
        opts.columns.clone()
    };

    let mut positions = Vec::with_capacity(columns.len());
    for col in &columns {
        let pos = headers
            .iter()
            .position(|h| h == &col.name)
            .ok_or_else(|| ChartError::parse(0, &col.name, "column not found in header"))?;
        positions.push(pos);
    }

    let mut records = Vec::with_capacity(rows.len());
    'rows: for (line, row) in &rows {
        let mut values = Vec::with_capacity(columns.len());
        for (col, &pos) in columns.iter().zip(&positions) {
            let raw = row.get(pos).unwrap_or("");
            match parse_cell(raw, col) {
                Ok(v) => values.push(v),
                Err(message) => {
                    reject(*line, &col.name, format!("field '{}': {message}", col.name))?;
                    continue 'rows;
                }
            }
        }
        records.push(Record::new(values));
    }

    let schema = Schema::new(
        columns.iter().map(|c| Field::new(c.field_name(), c.field_kind())).collect(),
    );
    let mut dataset = Dataset::new(schema, records)?;
    if let Some(key) = &opts.sort_by {
        dataset.sort_by(key)?;
    }
    log::debug!("parsed {} records ({} skipped)", dataset.len(), skipped);
    Ok(dataset)
}

/// Read and parse a CSV file. I/O failures surface as `Fetch`.
pub fn load_csv(path: impl AsRef<Path>, opts: &CsvOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ChartError::Fetch {
        resource: path.display().to_string(),
        message: e.to_string(),
    })?;
    let dataset = parse_csv(std::io::BufReader::new(file), opts)?;
    log::info!("loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn parse_cell(raw: &str, col: &ColumnSpec) -> std::result::Result<FieldValue, String> {
    match &col.kind {
        ColumnKind::Categorical => Ok(FieldValue::Text(raw.to_string())),
        ColumnKind::Numeric => {
            if raw.is_empty() {
                return Err("missing numeric value".to_string());
            }
            let v: f64 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
            Ok(FieldValue::Number(v * col.scale.unwrap_or(1.0)))
        }
        ColumnKind::Temporal { format } => parse_temporal(raw, format)
            .map(FieldValue::Time)
            .ok_or_else(|| format!("'{raw}' does not match '{format}'")),
    }
}

/// Parse a timestamp with a strftime format. Year-only formats resolve to January 1st.
pub fn parse_temporal(raw: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
        return d.and_hms_opt(0, 0, 0);
    }
    if format == "%Y" {
        return raw
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

fn infer_columns(headers: &[String], rows: &[(usize, csv::StringRecord)]) -> Vec<ColumnSpec> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let numeric = rows.iter().all(|(_, r)| {
                let cell = r.get(i).unwrap_or("");
                cell.is_empty() || cell.parse::<f64>().is_ok()
            });
            if numeric && !rows.is_empty() {
                ColumnSpec::numeric(h.clone())
            } else {
                ColumnSpec::categorical(h.clone())
            }
        })
        .collect()
}

/// Turn wide tables (one row per key, one column per category) into long records.
///
/// For the row whose `key_field` equals `selected` in every table, emits one record per
/// non-key column: `{ category_field, <table name>... }`. Tables must share columns.
pub fn pivot_row(
    tables: &[(String, Dataset)],
    key_field: &str,
    selected: &str,
    category_field: &str,
) -> Result<Dataset> {
    let Some((_, first)) = tables.first() else {
        return Err(ChartError::InvalidConfig("pivot needs at least one table".into()));
    };
    let mut rows: Vec<&Record> = Vec::with_capacity(tables.len());
    for (name, table) in tables {
        let key = table.field(key_field)?;
        let (_, row) = table.find(key, selected).ok_or_else(|| {
            ChartError::parse(0, key_field, format!("table '{name}' has no row with {key_field} = {selected}"))
        })?;
        rows.push(row);
    }

    let key_idx = first.field(key_field)?;
    let mut fields = vec![Field::categorical(category_field)];
    fields.extend(tables.iter().map(|(name, _)| Field::numeric(name.clone())));

    let mut out = Vec::new();
    for (col, field) in first.schema().fields().iter().enumerate() {
        if col == key_idx {
            continue;
        }
        let mut values = vec![FieldValue::Text(field.name.clone())];
        for ((name, table), row) in tables.iter().zip(&rows) {
            let idx = table.field(&field.name)?;
            let v = row
                .number(idx)
                .ok_or_else(|| ChartError::parse(0, &field.name, format!("non-numeric in '{name}'")))?;
            values.push(FieldValue::Number(v));
        }
        out.push(values);
    }
    Dataset::from_rows(fields, out)
}

/// Source of a dataset for one engine instance.
pub trait DatasetLoader {
    fn load(&self) -> Result<Dataset>;
}

/// CSV file on disk with fixed options.
#[derive(Clone, Debug)]
pub struct CsvFile {
    pub path: PathBuf,
    pub options: CsvOptions,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self { path: path.into(), options }
    }
}

impl DatasetLoader for CsvFile {
    fn load(&self) -> Result<Dataset> {
        load_csv(&self.path, &self.options)
    }
}

impl<F> DatasetLoader for F
where
    F: Fn() -> Result<Dataset>,
{
    fn load(&self) -> Result<Dataset> {
        self()
    }
}
