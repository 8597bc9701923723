// File: crates/vizbind-core/src/record.rs
// Summary: Record/Dataset model with typed fields and stable element keys.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{ChartError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical,
    Temporal,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Time(NaiveDateTime),
    Missing,
}

impl FieldValue {
    /// Numeric view used for continuous scales. Temporal values map to epoch seconds.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if v.is_finite() => Some(*v),
            FieldValue::Time(t) => Some(t.and_utc().timestamp() as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Key derived from this value. Integral numbers (years) become `Int`.
    pub fn to_key(&self) -> ElementKey {
        match self {
            FieldValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => ElementKey::Int(*v as i64),
            FieldValue::Time(t) => ElementKey::Int(t.and_utc().timestamp()),
            FieldValue::Text(s) => ElementKey::Text(s.clone()),
            other => ElementKey::Text(other.to_string()),
        }
    }

    fn cmp_for_sort(&self, other: &FieldValue) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Time(t) => write!(f, "{}", t.format("%Y-%m-%d")),
            FieldValue::Missing => Ok(()),
        }
    }
}

/// Identity of a visual element. Elements are matched by key across passes, never by position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Index(usize),
    Int(i64),
    Text(String),
    /// One item of one series in a multi-series layer.
    Series { series: String, item: Box<ElementKey> },
}

impl ElementKey {
    pub fn text(s: impl Into<String>) -> Self {
        ElementKey::Text(s.into())
    }

    pub fn series(series: impl Into<String>, item: ElementKey) -> Self {
        ElementKey::Series { series: series.into(), item: Box::new(item) }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Index(i) => write!(f, "#{i}"),
            ElementKey::Int(v) => write!(f, "{v}"),
            ElementKey::Text(s) => f.write_str(s),
            ElementKey::Series { series, item } => write!(f, "{series}/{item}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind }
    }
    pub fn numeric(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Numeric) }
    pub fn categorical(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Categorical) }
    pub fn temporal(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Temporal) }
}

/// Ordered field list shared by every record of a dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Index of `name`, or `UnknownField`.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| ChartError::UnknownField(name.to_string()))
    }
}

/// One observation: values in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, field: usize) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn number(&self, field: usize) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }
}

/// Ordered records, immutable for one render cycle and replaced wholesale on reload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self> {
        for (row, r) in records.iter().enumerate() {
            if r.values.len() != schema.len() {
                return Err(ChartError::parse(
                    row + 1,
                    "",
                    format!("expected {} fields, found {}", schema.len(), r.values.len()),
                ));
            }
        }
        Ok(Self { schema: Arc::new(schema), records })
    }

    /// Convenience constructor from raw rows.
    pub fn from_rows(fields: Vec<Field>, rows: Vec<Vec<FieldValue>>) -> Result<Self> {
        Self::new(Schema::new(fields), rows.into_iter().map(Record::new).collect())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn field(&self, name: &str) -> Result<usize> {
        self.schema.require(name)
    }

    /// Numeric values of `field`, skipping missing cells.
    pub fn numbers(&self, field: usize) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(move |r| r.number(field))
    }

    /// Stable ascending sort by `name`; used at the load boundary only.
    pub fn sort_by(&mut self, name: &str) -> Result<()> {
        let idx = self.field(name)?;
        self.records.sort_by(|a, b| match (a.get(idx), b.get(idx)) {
            (Some(x), Some(y)) => x.cmp_for_sort(y),
            _ => Ordering::Equal,
        });
        Ok(())
    }

    /// Fails with `UnsortedDataset` at the first record that breaks ascending order of `name`.
    pub fn check_sorted(&self, name: &str) -> Result<()> {
        let idx = self.field(name)?;
        for i in 1..self.records.len() {
            let prev = self.records[i - 1].number(idx);
            let cur = self.records[i].number(idx);
            match (prev, cur) {
                (Some(a), Some(b)) if a <= b => {}
                _ => {
                    return Err(ChartError::UnsortedDataset { field: name.to_string(), index: i });
                }
            }
        }
        Ok(())
    }

    /// New dataset with the records matching `keep`, same schema.
    pub fn filter<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(usize, &Record) -> bool,
    {
        let records = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, r)| keep(*i, r))
            .map(|(_, r)| r.clone())
            .collect();
        Dataset { schema: Arc::clone(&self.schema), records }
    }

    /// First record whose `field` renders as `value`.
    pub fn find(&self, field: usize, value: &str) -> Option<(usize, &Record)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.get(field).map(|v| v.to_string() == value).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(vals: &[f64]) -> Dataset {
        Dataset::from_rows(
            vec![Field::numeric("Years")],
            vals.iter().map(|v| vec![FieldValue::Number(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn integral_numbers_key_as_int() {
        assert_eq!(FieldValue::Number(2020.0).to_key(), ElementKey::Int(2020));
        assert_eq!(FieldValue::Number(0.5).to_key(), ElementKey::text("0.5"));
    }

    #[test]
    fn sort_and_check() {
        let mut ds = years(&[2010.0, 2000.0, 2005.0]);
        assert!(matches!(
            ds.check_sorted("Years"),
            Err(ChartError::UnsortedDataset { index: 1, .. })
        ));
        ds.sort_by("Years").unwrap();
        ds.check_sorted("Years").unwrap();
        assert_eq!(ds.numbers(0).collect::<Vec<_>>(), vec![2000.0, 2005.0, 2010.0]);
    }

    #[test]
    fn arity_mismatch_is_parse_error() {
        let err = Dataset::from_rows(vec![Field::numeric("a")], vec![vec![]]).unwrap_err();
        assert!(matches!(err, ChartError::Parse { row: 1, .. }));
    }
}
