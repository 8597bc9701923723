// File: crates/vizbind-core/src/scale.rs
// Summary: Linear, band and color scales mapping domain values to pixels or colors.

use std::collections::HashMap;

use crate::error::{ChartError, Result};
use crate::types::Rgba;

/// Domain value (number, epoch seconds, ...).
pub type Value = f64;

/// Continuous scale transform operations.
pub trait ScaleTransform {
    fn map(&self, v: Value) -> f32;
    fn invert(&self, px: f32) -> Value;
}

/// Continuous linear mapping from `domain` onto the pixel interval `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (Value, Value),
    range: (f32, f32),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (Value, Value), range: (f32, f32)) -> Self {
        Self { domain, range, clamp: false }
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain(&self) -> (Value, Value) { self.domain }
    pub fn range(&self) -> (f32, f32) { self.range }

    /// Extend the domain to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut d0, mut d1) = self.domain;
        let reversed = d1 < d0;
        if reversed {
            std::mem::swap(&mut d0, &mut d1);
        }
        let mut prev = 0.0;
        for _ in 0..10 {
            let step = tick_step(d0, d1, count);
            if step == prev || step <= 0.0 || !step.is_finite() {
                break;
            }
            d0 = (d0 / step).floor() * step;
            d1 = (d1 / step).ceil() * step;
            prev = step;
        }
        self.domain = if reversed { (d1, d0) } else { (d0, d1) };
        self
    }

    /// Roughly `count` round values covering the domain (1, 2 or 5 × 10^k apart).
    pub fn ticks(&self, count: usize) -> Vec<Value> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let Some((i1, i2, inc, inverted)) = tick_spec(lo, hi, count) else {
            return Vec::new();
        };
        (i1..=i2)
            .map(|i| if inverted { i as f64 / inc } else { i as f64 * inc })
            .collect()
    }

    fn normalize(&self, v: Value) -> f64 {
        let span = self.domain.1 - self.domain.0;
        // degenerate domain: everything maps to the middle of the range
        let t = if span.abs() < 1e-12 { 0.5 } else { (v - self.domain.0) / span };
        if self.clamp { t.clamp(0.0, 1.0) } else { t }
    }
}

impl ScaleTransform for LinearScale {
    #[inline]
    fn map(&self, v: Value) -> f32 {
        let t = self.normalize(v);
        let (r0, r1) = (self.range.0 as f64, self.range.1 as f64);
        (r0 * (1.0 - t) + r1 * t) as f32
    }

    #[inline]
    fn invert(&self, px: f32) -> Value {
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < 1e-6 {
            return self.domain.0;
        }
        let mut t = ((px - r0) / span) as f64;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.domain.0 * (1.0 - t) + self.domain.1 * t
    }
}

fn step_factor(lo: f64, hi: f64, count: usize) -> Option<(f64, f64)> {
    if count == 0 || !(hi > lo) || !(hi - lo).is_finite() {
        return None;
    }
    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    Some((power, factor))
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    step_factor(lo, hi, count)
        .map(|(power, factor)| factor * 10f64.powf(power))
        .unwrap_or(0.0)
}

/// Integer tick bounds plus the increment. Sub-unit steps are kept as an inverse
/// (ticks are `i / inc`) so values like -0.15 come out exact.
fn tick_spec(lo: f64, hi: f64, count: usize) -> Option<(i64, i64, f64, bool)> {
    let (power, factor) = step_factor(lo, hi, count)?;
    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (lo * inc).round();
        let mut i2 = (hi * inc).round();
        if i1 / inc < lo { i1 += 1.0; }
        if i2 / inc > hi { i2 -= 1.0; }
        Some((i1 as i64, i2 as i64, inc, true))
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo { i1 += 1.0; }
        if i2 * inc > hi { i2 -= 1.0; }
        Some((i1 as i64, i2 as i64, inc, false))
    }
}

/// Evenly spaced bands for categorical values, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f32, f32),
    padding: f32,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    /// `padding` is the gap between bands (and at both ends) as a fraction of the step.
    pub fn new<I, S>(categories: I, range: (f32, f32), padding: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for c in categories {
            let c = c.into();
            if !index.contains_key(&c) {
                index.insert(c.clone(), domain.len());
                domain.push(c);
            }
        }
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f32;
        let (lo, hi) = if range.0 <= range.1 { range } else { (range.1, range.0) };
        let step = (hi - lo) / (n - padding + padding * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);
        Self { domain, index, range, padding, start, step, bandwidth }
    }

    pub fn domain(&self) -> &[String] { &self.domain }
    pub fn range(&self) -> (f32, f32) { self.range }
    pub fn padding(&self) -> f32 { self.padding }
    pub fn step(&self) -> f32 { self.step }
    pub fn bandwidth(&self) -> f32 { self.bandwidth }

    /// Left edge of the band for `category`.
    pub fn position(&self, category: &str) -> Option<f32> {
        let i = *self.index.get(category)?;
        let i = if self.range.1 < self.range.0 { self.domain.len() - 1 - i } else { i };
        Some(self.start + self.step * i as f32)
    }
}

/// Piecewise-linear color interpolation between ascending stops. Values outside clamp.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    stops: Vec<(Value, Rgba)>,
}

impl ColorScale {
    /// Pairs domain and colors up to the shorter of the two.
    pub fn piecewise(domain: &[Value], colors: &[Rgba]) -> Result<Self> {
        let stops: Vec<(Value, Rgba)> = domain.iter().copied().zip(colors.iter().copied()).collect();
        if stops.len() < 2 {
            return Err(ChartError::InvalidConfig("color scale needs at least two stops".into()));
        }
        if stops.windows(2).any(|w| !(w[0].0 < w[1].0)) {
            return Err(ChartError::InvalidConfig("color stops must be strictly ascending".into()));
        }
        Ok(Self { stops })
    }

    /// Negative / zero / positive three-point scale.
    pub fn diverging(domain: [Value; 3], colors: [Rgba; 3]) -> Result<Self> {
        Self::piecewise(&domain, &colors)
    }

    /// Two-color scale over `[0, max]`.
    pub fn sequential(max: Value, colors: (Rgba, Rgba)) -> Result<Self> {
        Self::piecewise(&[0.0, max], &[colors.0, colors.1])
    }

    pub fn stops(&self) -> &[(Value, Rgba)] {
        &self.stops
    }

    pub fn map(&self, v: Value) -> Rgba {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if !v.is_finite() || v <= first.0 {
            return first.1;
        }
        if v >= last.0 {
            return last.1;
        }
        let i = self.stops.partition_point(|s| s.0 <= v).max(1);
        let (d0, c0) = self.stops[i - 1];
        let (d1, c1) = self.stops[i];
        c0.lerp(c1, ((v - d0) / (d1 - d0)) as f32)
    }
}
