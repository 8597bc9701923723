// File: crates/vizbind-core/src/axis.rs
// Summary: Axis guides (tick positions and labels) derived from built scales.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::format::ValueFormat;
use crate::record::FieldValue;
use crate::scale::{BandScale, LinearScale, ScaleTransform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Bottom,
    Left,
}

/// Axis title and tick label format, per chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSpec {
    pub label: String,
    pub format: ValueFormat,
    /// Approximate tick count for continuous axes.
    pub ticks: Option<usize>,
    /// Draw grid lines across the plot at each tick.
    pub grid: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel coordinate along the axis.
    pub position: f32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisGuide {
    pub orientation: Orientation,
    pub label: String,
    /// Pixel coordinate of the axis line (y for bottom axes, x for left axes).
    pub offset: f32,
    pub ticks: Vec<Tick>,
    pub grid: bool,
}

const DEFAULT_TICKS: usize = 10;

impl AxisGuide {
    pub fn linear(orientation: Orientation, offset: f32, scale: &LinearScale, spec: &AxisSpec) -> Self {
        let ticks = scale
            .ticks(spec.ticks.unwrap_or(DEFAULT_TICKS))
            .into_iter()
            .map(|v| Tick { position: scale.map(v), label: spec.format.number(v) })
            .collect();
        Self { orientation, label: spec.label.clone(), offset, ticks, grid: spec.grid }
    }

    /// Ticks on January 1st of round years for a scale over epoch seconds.
    pub fn temporal(orientation: Orientation, offset: f32, scale: &LinearScale, spec: &AxisSpec) -> Self {
        let (d0, d1) = scale.domain();
        let (lo, hi) = (year_of(d0.min(d1)), year_of(d0.max(d1)));
        let years = LinearScale::new((lo as f64, hi as f64), (0.0, 1.0));
        let ticks = years
            .ticks(spec.ticks.unwrap_or(DEFAULT_TICKS))
            .into_iter()
            .filter(|y| y.fract() == 0.0)
            .filter_map(|y| NaiveDate::from_ymd_opt(y as i32, 1, 1))
            .filter_map(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| {
                let secs = t.and_utc().timestamp() as f64;
                Tick { position: scale.map(secs), label: spec.format.apply(&FieldValue::Time(t)) }
            })
            .filter(|t| {
                let (r0, r1) = scale.range();
                t.position >= r0.min(r1) - 0.5 && t.position <= r0.max(r1) + 0.5
            })
            .collect();
        Self { orientation, label: spec.label.clone(), offset, ticks, grid: spec.grid }
    }

    /// One tick per band center, thinned so at most `spec.ticks` labels remain.
    pub fn band(orientation: Orientation, offset: f32, scale: &BandScale, spec: &AxisSpec) -> Self {
        let n = scale.domain().len();
        let max = spec.ticks.unwrap_or(n).max(1);
        let every = n.div_ceil(max).max(1);
        let half = scale.bandwidth() / 2.0;
        let ticks = scale
            .domain()
            .iter()
            .enumerate()
            .filter(|(i, _)| i % every == 0)
            .filter_map(|(_, c)| scale.position(c).map(|p| Tick { position: p + half, label: c.clone() }))
            .collect();
        Self { orientation, label: spec.label.clone(), offset, ticks, grid: spec.grid }
    }
}

fn year_of(epoch_secs: f64) -> i32 {
    DateTime::from_timestamp(epoch_secs as i64, 0)
        .map(|t| t.year())
        .unwrap_or(1970)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_axis_labels() {
        let y = LinearScale::new((-0.15, 0.2), (500.0, 0.0));
        let spec = AxisSpec { format: ValueFormat::PercentWhole, ..AxisSpec::default() };
        let axis = AxisGuide::linear(Orientation::Left, 0.0, &y, &spec);
        assert_eq!(axis.ticks.first().map(|t| t.label.as_str()), Some("-15%"));
        assert_eq!(axis.ticks.last().map(|t| t.label.as_str()), Some("20%"));
    }

    #[test]
    fn band_ticks_are_thinned() {
        let x = BandScale::new((0..40).map(|i| (1900 + i).to_string()), (0.0, 400.0), 0.2);
        let spec = AxisSpec { ticks: Some(4), ..AxisSpec::default() };
        let axis = AxisGuide::band(Orientation::Bottom, 0.0, &x, &spec);
        let labels: Vec<_> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1900", "1910", "1920", "1930"]);
    }

    #[test]
    fn year_ticks_on_temporal_axis() {
        let t = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp() as f64;
        let x = LinearScale::new((t(2000), t(2020)), (0.0, 200.0));
        let spec = AxisSpec { format: ValueFormat::Year, ticks: Some(4), ..AxisSpec::default() };
        let axis = AxisGuide::temporal(Orientation::Bottom, 0.0, &x, &spec);
        let labels: Vec<_> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2000", "2005", "2010", "2015", "2020"]);
        assert_eq!(axis.ticks[0].position, 0.0);
    }
}
