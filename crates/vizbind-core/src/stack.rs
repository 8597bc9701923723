// File: crates/vizbind-core/src/stack.rs
// Summary: Multi-series stacking into [lower, upper] bands with a chosen offset.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Dataset;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOffset {
    /// Cumulative from a zero baseline.
    #[default]
    Zero,
    /// Centered on zero: each column is shifted down by half its total.
    Silhouette,
    /// Normalized so each column spans [0, 1].
    Expand,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackBand {
    pub lower: f64,
    pub upper: f64,
}

/// One series' bands, indexed like the source records.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedSeries {
    pub key: String,
    pub bands: Vec<StackBand>,
}

/// Stack `columns[s][j]` (series `s`, position `j`) in the given series order.
/// Missing or non-finite values count as zero.
pub fn stack_columns(keys: &[String], columns: &[Vec<f64>], offset: StackOffset) -> Vec<StackedSeries> {
    let n = columns.iter().map(Vec::len).max().unwrap_or(0);
    let value = |s: usize, j: usize| columns.get(s).and_then(|c| c.get(j)).copied().filter(|v| v.is_finite()).unwrap_or(0.0);

    let mut out: Vec<StackedSeries> = keys
        .iter()
        .map(|k| StackedSeries { key: k.clone(), bands: Vec::with_capacity(n) })
        .collect();

    for j in 0..n {
        let total: f64 = (0..keys.len()).map(|s| value(s, j)).sum();
        let (mut base, scale) = match offset {
            StackOffset::Zero => (0.0, 1.0),
            StackOffset::Silhouette => (-total / 2.0, 1.0),
            StackOffset::Expand if total != 0.0 => (0.0, 1.0 / total),
            StackOffset::Expand => (0.0, 0.0),
        };
        for (s, series) in out.iter_mut().enumerate() {
            let top = base + value(s, j) * scale;
            series.bands.push(StackBand { lower: base, upper: top });
            base = top;
        }
    }
    out
}

/// Stack the named numeric fields of `dataset`. Recompute whenever the dataset or the
/// series order changes.
pub fn stack(dataset: &Dataset, series: &[String], offset: StackOffset) -> Result<Vec<StackedSeries>> {
    let mut columns = Vec::with_capacity(series.len());
    for name in series {
        let idx = dataset.field(name)?;
        columns.push(
            dataset
                .records()
                .iter()
                .map(|r| r.number(idx).unwrap_or(0.0))
                .collect::<Vec<_>>(),
        );
    }
    Ok(stack_columns(series, &columns, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_accumulates() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let s = stack_columns(&keys, &[vec![1.0, 2.0], vec![3.0, 4.0]], StackOffset::Zero);
        assert_eq!(s[1].bands[1], StackBand { lower: 2.0, upper: 6.0 });
    }

    #[test]
    fn expand_normalizes_and_tolerates_zero_columns() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let s = stack_columns(&keys, &[vec![1.0, 0.0], vec![3.0, 0.0]], StackOffset::Expand);
        assert_eq!(s[0].bands[0], StackBand { lower: 0.0, upper: 0.25 });
        assert_eq!(s[1].bands[0].upper, 1.0);
        assert_eq!(s[1].bands[1], StackBand { lower: 0.0, upper: 0.0 });
    }
}
