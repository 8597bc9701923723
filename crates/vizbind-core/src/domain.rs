// File: crates/vizbind-core/src/domain.rs
// Summary: Scale builder: derives scale domains from dataset fields under an explicit policy.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::record::Dataset;
use crate::scale::{BandScale, ColorScale, LinearScale};
use crate::types::Rgba;

/// How a continuous domain is chosen. Every chart states this per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DomainPolicy {
    /// `[min, max]` over the data.
    Extent,
    /// `[0, max]` over the data.
    ZeroToMax,
    /// Fixed bounds regardless of data; values outside are clamped.
    Fixed { min: f64, max: f64 },
}

/// `(min, max)` of the values, or `None` when there are none.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Build a linear scale from raw values. `label` names the domain in errors.
pub fn linear_from_values<I>(label: &str, values: I, policy: DomainPolicy, range: (f32, f32)) -> Result<LinearScale>
where
    I: IntoIterator<Item = f64>,
{
    let ext = extent(values).ok_or_else(|| ChartError::empty_domain(label))?;
    let domain = match policy {
        DomainPolicy::Extent => ext,
        DomainPolicy::ZeroToMax => (0.0, ext.1.max(0.0)),
        DomainPolicy::Fixed { min, max } => {
            if !(min < max) {
                return Err(ChartError::InvalidConfig(format!(
                    "fixed domain for '{label}' needs min < max (got {min}..{max})"
                )));
            }
            return Ok(LinearScale::new((min, max), range).clamped(true));
        }
    };
    Ok(LinearScale::new(domain, range))
}

/// Continuous scale over one or more numeric fields.
///
/// Empty datasets fail with `EmptyDomain` so callers skip rendering instead of drawing
/// into a zero-width scale.
pub fn continuous(dataset: &Dataset, fields: &[&str], policy: DomainPolicy, range: (f32, f32)) -> Result<LinearScale> {
    let label = fields.join(",");
    if dataset.is_empty() {
        return Err(ChartError::empty_domain(label));
    }
    let mut idxs = Vec::with_capacity(fields.len());
    for f in fields {
        idxs.push(dataset.field(f)?);
    }
    let values = idxs.iter().flat_map(|&i| dataset.numbers(i));
    linear_from_values(&label, values, policy, range)
}

/// Band scale over the distinct values of `field`, in first-seen order.
pub fn band(dataset: &Dataset, field: &str, range: (f32, f32), padding: f32) -> Result<BandScale> {
    if dataset.is_empty() {
        return Err(ChartError::empty_domain(field));
    }
    let idx = dataset.field(field)?;
    let categories = dataset
        .records()
        .iter()
        .filter_map(|r| r.get(idx))
        .filter(|v| !v.is_missing())
        .map(|v| v.to_string());
    Ok(BandScale::new(categories, range, padding))
}

/// Sequential color over `[0, max(field)]`, with the upper bound rounded up.
pub fn sequential_color(dataset: &Dataset, field: &str, colors: (Rgba, Rgba)) -> Result<ColorScale> {
    let idx = dataset.field(field)?;
    let (_, max) = extent(dataset.numbers(idx)).ok_or_else(|| ChartError::empty_domain(field))?;
    let (_, nice_max) = LinearScale::new((0.0, max.max(0.0)), (0.0, 1.0)).nice(10).domain();
    if nice_max <= 0.0 {
        // all-zero column: any positive bound keeps the scale valid
        return ColorScale::sequential(1.0, colors);
    }
    ColorScale::sequential(nice_max, colors)
}
