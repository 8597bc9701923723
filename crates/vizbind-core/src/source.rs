// File: crates/vizbind-core/src/source.rs
// Summary: Chart inputs (table, wide tables, map) and the loaders that produce them.

use std::path::PathBuf;

use crate::error::{ChartError, Result};
use crate::geo::{load_features, GeoFeature};
use crate::loader::{CsvFile, DatasetLoader};
use crate::record::Dataset;

/// Everything one load produces for a chart instance.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartData {
    Table(Dataset),
    /// Named wide tables sharing a key column (one row per key, one column per category).
    Tables(Vec<(String, Dataset)>),
    Map { features: Vec<GeoFeature>, table: Dataset },
}

impl ChartData {
    pub fn record_count(&self) -> usize {
        match self {
            ChartData::Table(d) => d.len(),
            ChartData::Tables(t) => t.iter().map(|(_, d)| d.len()).sum(),
            ChartData::Map { table, .. } => table.len(),
        }
    }

    pub fn table(&self) -> Option<&Dataset> {
        match self {
            ChartData::Table(d) => Some(d),
            ChartData::Map { table, .. } => Some(table),
            ChartData::Tables(_) => None,
        }
    }

    /// Sort every table ascending by `field` (load boundary only).
    pub fn sort_by(&mut self, field: &str) -> Result<()> {
        match self {
            ChartData::Table(d) | ChartData::Map { table: d, .. } => d.sort_by(field),
            ChartData::Tables(tables) => tables.iter_mut().try_for_each(|(_, d)| d.sort_by(field)),
        }
    }
}

/// Produces chart data on demand; called once per (re)load.
pub trait DataLoader {
    fn load(&self) -> Result<ChartData>;
}

impl<F> DataLoader for F
where
    F: Fn() -> Result<ChartData>,
{
    fn load(&self) -> Result<ChartData> {
        self()
    }
}

/// Single table from any dataset loader.
#[derive(Clone, Debug)]
pub struct TableSource<L>(pub L);

impl<L: DatasetLoader> DataLoader for TableSource<L> {
    fn load(&self) -> Result<ChartData> {
        self.0.load().map(ChartData::Table)
    }
}

/// Several named CSV files loaded together; any failure fails the whole load.
#[derive(Clone, Debug, Default)]
pub struct TablesSource {
    pub tables: Vec<(String, CsvFile)>,
}

impl TablesSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>, file: CsvFile) -> Self {
        self.tables.push((name.into(), file));
        self
    }
}

impl DataLoader for TablesSource {
    fn load(&self) -> Result<ChartData> {
        if self.tables.is_empty() {
            return Err(ChartError::InvalidConfig("no tables to load".into()));
        }
        let mut out = Vec::with_capacity(self.tables.len());
        for (name, file) in &self.tables {
            out.push((name.clone(), file.load()?));
        }
        Ok(ChartData::Tables(out))
    }
}

/// GeoJSON features plus the per-region table joined to them.
#[derive(Clone, Debug)]
pub struct MapSource {
    pub features: PathBuf,
    pub table: CsvFile,
}

impl DataLoader for MapSource {
    fn load(&self) -> Result<ChartData> {
        let features = load_features(&self.features)?;
        let table = self.table.load()?;
        Ok(ChartData::Map { features, table })
    }
}
