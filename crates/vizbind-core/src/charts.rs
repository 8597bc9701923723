// File: crates/vizbind-core/src/charts.rs
// Summary: Mark layouts for each chart variant, the per-pass layout driver, and tooltip content.

use std::collections::HashSet;
use std::time::Duration;

use crate::axis::{AxisGuide, Orientation};
use crate::config::{BarSeries, ChartConfig, ChartKind, SeriesStyle, TooltipSource};
use crate::domain::{self, DomainPolicy};
use crate::error::{ChartError, Result};
use crate::geo::{join_regions, GeoFeature, MercatorProjection, Region};
use crate::interaction::{Hover, SortedKeys};
use crate::loader::pivot_row;
use crate::mark::{Attributes, Shape};
use crate::overlay::{GuideLine, OverlayFrame, Tooltip, TooltipLine};
use crate::reconcile::{KeySelector, MarkLayout, ReconcileReport, Reconciler};
use crate::record::{Dataset, ElementKey, FieldKind, FieldValue, Record};
use crate::scale::{BandScale, ColorScale, LinearScale, ScaleTransform};
use crate::source::ChartData;
use crate::stack::{stack, StackedSeries, StackOffset};
use crate::transition::TransitionSpec;
use crate::types::{PlotRect, Point, Rgba};
use crate::zoom::ZoomTransform;

/// Bars in a band slot, from the zero baseline to the value.
#[derive(Clone, Debug)]
pub struct BarLayout {
    pub x: BandScale,
    pub y: LinearScale,
    pub key: KeySelector,
    pub category: usize,
    pub value: usize,
    pub value_name: String,
    pub color: ColorScale,
    /// Offset and width inside the band, as fractions of the bandwidth.
    pub slot: (f32, f32),
}

impl BarLayout {
    fn baseline(&self) -> f32 {
        self.y.map(0.0)
    }
}

impl MarkLayout<Record> for BarLayout {
    fn key(&self, index: usize, item: &Record) -> ElementKey {
        self.key.key(index, item)
    }

    fn place(&self, index: usize, item: &Record) -> Result<Attributes> {
        let category = item.get(self.category).map(|v| v.to_string()).unwrap_or_default();
        let left = self.x.position(&category).ok_or_else(|| {
            ChartError::parse(index + 1, &self.value_name, format!("category '{category}' outside the band domain"))
        })?;
        let v = item
            .number(self.value)
            .ok_or_else(|| ChartError::parse(index + 1, &self.value_name, "missing value"))?;
        let base = self.baseline();
        let top = self.y.map(v);
        let bw = self.x.bandwidth();
        let shape = Shape::Rect {
            x: left + bw * self.slot.0,
            y: top.min(base),
            width: bw * self.slot.1,
            height: (top - base).abs(),
        };
        Ok(Attributes::new(shape).fill(self.color.map(v)))
    }

    /// Bars grow out of the baseline.
    fn enter_from(&self, target: &Attributes) -> Option<Attributes> {
        match target.shape {
            Shape::Rect { x, width, .. } => Some(Attributes {
                shape: Shape::Rect { x, y: self.baseline(), width, height: 0.0 },
                ..target.clone()
            }),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointLayout {
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_field: usize,
    pub y_field: usize,
    pub key: KeySelector,
    /// Prefix keys with a series name when several point layers share record keys.
    pub series: Option<String>,
    pub radius: f32,
    pub fill: Rgba,
    pub stroke: Option<Rgba>,
}

impl MarkLayout<Record> for PointLayout {
    fn key(&self, index: usize, item: &Record) -> ElementKey {
        let key = self.key.key(index, item);
        match &self.series {
            Some(s) => ElementKey::series(s.clone(), key),
            None => key,
        }
    }

    fn place(&self, index: usize, item: &Record) -> Result<Attributes> {
        let (Some(xv), Some(yv)) = (item.number(self.x_field), item.number(self.y_field)) else {
            return Err(ChartError::parse(index + 1, self.series.as_deref().unwrap_or(""), "missing coordinate"));
        };
        let mut attrs = Attributes::new(Shape::Circle { cx: self.x.map(xv), cy: self.y.map(yv), r: self.radius })
            .fill(self.fill);
        if let Some(stroke) = self.stroke {
            attrs = attrs.stroke(stroke, 1.0);
        }
        Ok(attrs)
    }

    fn enter_from(&self, target: &Attributes) -> Option<Attributes> {
        match target.shape {
            Shape::Circle { cx, cy, .. } => Some(Attributes { shape: Shape::Circle { cx, cy, r: 0.0 }, ..target.clone() }),
            _ => None,
        }
    }
}

/// One polyline per series over the records of `dataset`.
#[derive(Clone, Debug)]
pub struct LineLayout<'a> {
    pub dataset: &'a Dataset,
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_field: usize,
}

impl MarkLayout<SeriesStyle> for LineLayout<'_> {
    fn key(&self, _index: usize, item: &SeriesStyle) -> ElementKey {
        ElementKey::text(&item.field)
    }

    fn place(&self, _index: usize, item: &SeriesStyle) -> Result<Attributes> {
        let yi = self.dataset.field(&item.field)?;
        let points = self
            .dataset
            .records()
            .iter()
            .filter_map(|r| Some(Point::new(self.x.map(r.number(self.x_field)?), self.y.map(r.number(yi)?))))
            .collect();
        Ok(Attributes::new(Shape::Line { points }).stroke(item.color, item.stroke_width))
    }
}

/// Stacked bands as closed areas; `xs` holds the x value of each band position.
#[derive(Clone, Debug)]
pub struct AreaLayout<'a> {
    pub xs: &'a [f64],
    pub x: LinearScale,
    pub y: LinearScale,
    pub palette: &'a [Rgba],
}

impl MarkLayout<StackedSeries> for AreaLayout<'_> {
    fn key(&self, _index: usize, item: &StackedSeries) -> ElementKey {
        ElementKey::text(&item.key)
    }

    fn place(&self, index: usize, item: &StackedSeries) -> Result<Attributes> {
        if self.palette.is_empty() {
            return Err(ChartError::InvalidConfig("empty palette".into()));
        }
        let at = |v: f64, b: f64| Point::new(self.x.map(v), self.y.map(b));
        let upper = self.xs.iter().zip(&item.bands).map(|(v, b)| at(*v, b.upper)).collect();
        let lower = self.xs.iter().zip(&item.bands).map(|(v, b)| at(*v, b.lower)).collect();
        Ok(Attributes::new(Shape::Area { upper, lower }).fill(self.palette[index % self.palette.len()]))
    }
}

/// Projected feature outlines colored by the joined value (missing counts as zero).
#[derive(Clone, Debug)]
pub struct RegionLayout<'a> {
    pub table: &'a Dataset,
    pub value: usize,
    pub color: ColorScale,
    pub projection: MercatorProjection,
}

impl MarkLayout<Region> for RegionLayout<'_> {
    fn key(&self, _index: usize, item: &Region) -> ElementKey {
        ElementKey::text(&item.feature.id)
    }

    fn place(&self, _index: usize, item: &Region) -> Result<Attributes> {
        let rings = item
            .feature
            .polygons
            .iter()
            .flat_map(|p| self.projection.project_polygon(p))
            .collect();
        let v = item
            .record
            .and_then(|i| self.table.get(i))
            .and_then(|r| r.number(self.value))
            .unwrap_or(0.0);
        Ok(Attributes::new(Shape::Region { rings }).fill(self.color.map(v)))
    }
}

/// How the items of one layer map back to records.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerBinding {
    /// Item `i` is record `rows[i]`.
    Records { rows: Vec<usize>, series: Option<String> },
    /// Item `i` is the series `names[i]`; the record comes from nearest-x resolution.
    Series(Vec<String>),
    /// Item `i` is a map region with its joined record and display name.
    Regions(Vec<(Option<usize>, Option<String>)>),
    /// Not bound to records (e.g. whole-series paths).
    Decoration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bound<'a> {
    pub record: Option<usize>,
    pub series: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl LayerBinding {
    fn all_records(n: usize, series: Option<String>) -> Self {
        LayerBinding::Records { rows: (0..n).collect(), series }
    }

    pub fn resolve(&self, item: usize) -> Bound<'_> {
        match self {
            LayerBinding::Records { rows, series } => Bound {
                record: rows.get(item).copied(),
                series: series.as_deref(),
                name: None,
            },
            LayerBinding::Series(names) => Bound {
                series: names.get(item).map(String::as_str),
                ..Bound::default()
            },
            LayerBinding::Regions(regions) => match regions.get(item) {
                Some((record, name)) => Bound { record: *record, series: None, name: name.as_deref() },
                None => Bound::default(),
            },
            LayerBinding::Decoration => Bound::default(),
        }
    }
}

/// Everything one layout pass produced besides the element sets themselves.
#[derive(Clone, Debug)]
pub struct View {
    /// Records tooltips read from (after pivoting or filtering).
    pub records: Dataset,
    pub bindings: Vec<LayerBinding>,
    pub axes: Vec<AxisGuide>,
    /// X scale used for nearest-x resolution.
    pub x: Option<LinearScale>,
    pub keys: Option<SortedKeys>,
    pub reports: Vec<ReconcileReport>,
}

/// Control state that shapes a pass.
#[derive(Clone, Copy, Debug)]
pub struct PassInputs<'a> {
    pub plot: PlotRect,
    pub selected: Option<&'a str>,
    pub show_overlay: bool,
    /// Value-axis zoom; only zoomable variants read it.
    pub zoom: ZoomTransform,
    /// Skip transitions for this pass (zoom and pan follow the pointer directly).
    pub instant: bool,
    pub at: Duration,
}

fn ensure_layers(layers: &mut Vec<Reconciler>, n: usize, spec: TransitionSpec) {
    layers.resize_with(n, || Reconciler::new(spec));
}

fn single_table<'a>(kind: &ChartKind, data: &'a ChartData) -> Result<&'a Dataset> {
    match data {
        ChartData::Table(d) => Ok(d),
        _ => Err(ChartError::InvalidConfig(format!("{} charts need a single table", kind.name()))),
    }
}

fn is_temporal(ds: &Dataset, field: usize) -> bool {
    ds.schema().fields().get(field).map(|f| f.kind == FieldKind::Temporal).unwrap_or(false)
}

fn x_axis(cfg: &ChartConfig, ds: &Dataset, field: usize, plot: &PlotRect, x: &LinearScale) -> AxisGuide {
    if is_temporal(ds, field) {
        AxisGuide::temporal(Orientation::Bottom, plot.bottom, x, &cfg.x_axis)
    } else {
        AxisGuide::linear(Orientation::Bottom, plot.bottom, x, &cfg.x_axis)
    }
}

/// Lay out one pass: build scales, reconcile every layer, and collect guides.
///
/// `layers` is resized to the variant's layer count. On error it may be partially
/// updated, so callers pass a copy and commit it only on success.
pub fn layout(cfg: &ChartConfig, data: &ChartData, inputs: &PassInputs<'_>, layers: &mut Vec<Reconciler>) -> Result<View> {
    let spec = cfg.transition();
    match &cfg.kind {
        ChartKind::DivergingBars { x, y, y_domain, padding, color_domain, colors } => {
            let ds = single_table(&cfg.kind, data)?;
            let plot = &inputs.plot;
            let xs = domain::band(ds, x, plot.x_range(), *padding)?;
            let ys = domain::continuous(ds, &[y.as_str()], *y_domain, plot.y_range())?;
            let xi = ds.field(x)?;
            let bars = BarLayout {
                x: xs.clone(),
                y: ys,
                key: KeySelector::Field(xi),
                category: xi,
                value: ds.field(y)?,
                value_name: y.clone(),
                color: ColorScale::diverging(*color_domain, *colors)?,
                slot: (0.0, 1.0),
            };
            ensure_layers(layers, 1, spec);
            let report = layers[0].reconcile(ds.records(), &bars, inputs.at)?;
            Ok(View {
                records: ds.clone(),
                bindings: vec![LayerBinding::all_records(ds.len(), None)],
                axes: vec![
                    AxisGuide::band(Orientation::Bottom, plot.bottom, &xs, &cfg.x_axis),
                    AxisGuide::linear(Orientation::Left, plot.left, &ys, &cfg.y_axis),
                ],
                x: None,
                keys: None,
                reports: vec![report],
            })
        }
        ChartKind::GroupedBars { key, category, padding, series } => {
            let ChartData::Tables(tables) = data else {
                return Err(ChartError::InvalidConfig("grouped bars need named tables".into()));
            };
            grouped_bars(cfg, tables, key, category, *padding, series, inputs, layers)
        }
        ChartKind::Lines { x, series, overlay, x_domain, y_domain, changes_only, point_radius } => {
            let ds = single_table(&cfg.kind, data)?;
            let plot = &inputs.plot;
            let mut visible: Vec<SeriesStyle> = series.clone();
            if inputs.show_overlay {
                visible.extend(overlay.iter().cloned());
            }
            let xi = ds.field(x)?;
            let xs = domain::continuous(ds, &[x.as_str()], *x_domain, plot.x_range())?;
            let fields: Vec<&str> = visible.iter().map(|s| s.field.as_str()).collect();
            let ys = domain::continuous(ds, &fields, *y_domain, plot.y_range())?;

            // paths, then one point layer per series; the overlay's layer stays allocated
            ensure_layers(layers, 1 + series.len() + usize::from(overlay.is_some()), spec);
            let lines = LineLayout { dataset: ds, x: xs, y: ys, x_field: xi };
            let mut reports = vec![layers[0].reconcile(&visible, &lines, inputs.at)?];
            let mut bindings = vec![LayerBinding::Decoration];

            for (i, s) in series.iter().chain(overlay.iter()).enumerate() {
                let shown = i < series.len() || inputs.show_overlay;
                let yi = ds.field(&s.field)?;
                let rows = if shown { point_rows(ds, xi, yi, *changes_only) } else { Vec::new() };
                let items: Vec<Record> = rows.iter().filter_map(|&r| ds.get(r).cloned()).collect();
                let points = PointLayout {
                    x: xs,
                    y: ys,
                    x_field: xi,
                    y_field: yi,
                    key: KeySelector::Field(xi),
                    series: Some(s.field.clone()),
                    radius: *point_radius,
                    fill: s.color,
                    stroke: Some(Rgba::WHITE),
                };
                reports.push(layers[1 + i].reconcile(&items, &points, inputs.at)?);
                bindings.push(LayerBinding::Records { rows, series: Some(s.field.clone()) });
            }

            let keys = if cfg.hover.uses_keys() { Some(SortedKeys::from_dataset(ds, x)?) } else { None };
            Ok(View {
                records: ds.clone(),
                bindings,
                axes: vec![
                    x_axis(cfg, ds, xi, plot, &xs),
                    AxisGuide::linear(Orientation::Left, plot.left, &ys, &cfg.y_axis),
                ],
                x: Some(xs),
                keys,
                reports,
            })
        }
        ChartKind::Scatter { key, x, y, x_domain, y_domain, radius, color } => {
            let ds = single_table(&cfg.kind, data)?;
            let plot = &inputs.plot;
            let (ki, xi, yi) = (ds.field(key)?, ds.field(x)?, ds.field(y)?);
            let xs = domain::continuous(ds, &[x.as_str()], *x_domain, plot.x_range())?;
            let ys = domain::continuous(ds, &[y.as_str()], *y_domain, plot.y_range())?;
            let rows = point_rows(ds, xi, yi, false);
            let items: Vec<Record> = rows.iter().filter_map(|&r| ds.get(r).cloned()).collect();
            let points = PointLayout {
                x: xs,
                y: ys,
                x_field: xi,
                y_field: yi,
                key: KeySelector::Field(ki),
                series: None,
                radius: *radius,
                fill: *color,
                stroke: None,
            };
            ensure_layers(layers, 1, spec);
            let report = layers[0].reconcile(&items, &points, inputs.at)?;
            Ok(View {
                records: ds.clone(),
                bindings: vec![LayerBinding::Records { rows, series: None }],
                axes: vec![
                    AxisGuide::linear(Orientation::Bottom, plot.bottom, &xs, &cfg.x_axis),
                    AxisGuide::linear(Orientation::Left, plot.left, &ys, &cfg.y_axis),
                ],
                x: Some(xs),
                keys: None,
                reports: vec![report],
            })
        }
        ChartKind::Streamgraph { x, series, offset, y_domain, palette } => {
            let ds = single_table(&cfg.kind, data)?;
            streamgraph(cfg, ds, x, series, *offset, *y_domain, palette, inputs, layers)
        }
        ChartKind::Choropleth { key, value, stops, colors, projection } => {
            let ChartData::Map { features, table } = data else {
                return Err(ChartError::InvalidConfig("choropleth needs features and a table".into()));
            };
            if table.is_empty() {
                return Err(ChartError::empty_domain(value.as_str()));
            }
            let features = unique_features(features);
            if features.is_empty() {
                return Err(ChartError::empty_domain("features"));
            }
            let regions = join_regions(&features, table, key)?;
            let fill = RegionLayout {
                table,
                value: table.field(value)?,
                color: ColorScale::piecewise(stops, colors)?,
                projection: *projection,
            };
            ensure_layers(layers, 1, spec);
            let report = layers[0].reconcile(&regions, &fill, inputs.at)?;
            let bound = regions.iter().map(|r| (r.record, r.feature.name.clone())).collect();
            Ok(View {
                records: table.clone(),
                bindings: vec![LayerBinding::Regions(bound)],
                axes: Vec::new(),
                x: None,
                keys: None,
                reports: vec![report],
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn grouped_bars(
    cfg: &ChartConfig,
    tables: &[(String, Dataset)],
    key: &str,
    category: &str,
    padding: f32,
    series: &[BarSeries],
    inputs: &PassInputs<'_>,
    layers: &mut Vec<Reconciler>,
) -> Result<View> {
    let plot = &inputs.plot;
    let selected = match inputs.selected {
        Some(s) => s.to_string(),
        None => first_key(tables, key)?,
    };
    let mut named = Vec::with_capacity(series.len());
    for s in series {
        let table = tables
            .iter()
            .find(|(name, _)| *name == s.table)
            .ok_or_else(|| ChartError::InvalidConfig(format!("no table named '{}'", s.table)))?;
        named.push(table.clone());
    }
    let pivot = pivot_row(&named, key, &selected, category)?;
    let xs = domain::band(&pivot, category, plot.x_range(), padding)?;
    let names: Vec<&str> = series.iter().map(|s| s.table.as_str()).collect();
    let ys = domain::continuous(&pivot, &names, DomainPolicy::ZeroToMax, plot.y_range())?;
    let cat = pivot.field(category)?;

    ensure_layers(layers, series.len(), cfg.transition());
    let n = series.len() as f32;
    let mut reports = Vec::with_capacity(series.len());
    let mut bindings = Vec::with_capacity(series.len());
    for (i, s) in series.iter().enumerate() {
        let bars = BarLayout {
            x: xs.clone(),
            y: ys,
            key: KeySelector::Field(cat),
            category: cat,
            value: pivot.field(&s.table)?,
            value_name: s.table.clone(),
            color: domain::sequential_color(&pivot, &s.table, s.colors)?,
            slot: (i as f32 / n, 1.0 / n),
        };
        reports.push(layers[i].reconcile(pivot.records(), &bars, inputs.at)?);
        bindings.push(LayerBinding::all_records(pivot.len(), Some(s.table.clone())));
    }
    log::debug!("grouped bars: {} categories for {key} = {selected}", pivot.len());
    Ok(View {
        axes: vec![
            AxisGuide::band(Orientation::Bottom, plot.bottom, &xs, &cfg.x_axis),
            AxisGuide::linear(Orientation::Left, plot.left, &ys, &cfg.y_axis),
        ],
        records: pivot,
        bindings,
        x: None,
        keys: None,
        reports,
    })
}

#[allow(clippy::too_many_arguments)]
fn streamgraph(
    cfg: &ChartConfig,
    ds: &Dataset,
    x: &str,
    series: &[String],
    offset: StackOffset,
    y_domain: DomainPolicy,
    palette: &[Rgba],
    inputs: &PassInputs<'_>,
    layers: &mut Vec<Reconciler>,
) -> Result<View> {
    let plot = &inputs.plot;
    let xi = ds.field(x)?;
    let xs = domain::continuous(ds, &[x], DomainPolicy::Extent, plot.x_range())?;
    let stacked = stack(ds, series, offset)?;
    let bounds = stacked.iter().flat_map(|s| s.bands.iter().flat_map(|b| [b.lower, b.upper]));
    let ys = domain::linear_from_values("stack", bounds, y_domain, plot.y_range())?;
    let ys = if cfg.zoom.is_some() { inputs.zoom.rescale_y(&ys) } else { ys };
    let xv = ds
        .records()
        .iter()
        .enumerate()
        .map(|(i, r)| r.number(xi).ok_or_else(|| ChartError::parse(i + 1, x, "missing x value")))
        .collect::<Result<Vec<f64>>>()?;

    let areas = AreaLayout { xs: &xv, x: xs, y: ys, palette };
    ensure_layers(layers, 1, cfg.transition());
    let report = if inputs.instant {
        layers[0].reconcile_with(&stacked, &areas, inputs.at, TransitionSpec::NONE)?
    } else {
        layers[0].reconcile(&stacked, &areas, inputs.at)?
    };
    let keys = SortedKeys::new(xv, x)?;
    Ok(View {
        records: ds.clone(),
        bindings: vec![LayerBinding::Series(series.to_vec())],
        axes: vec![
            x_axis(cfg, ds, xi, plot, &xs),
            AxisGuide::linear(Orientation::Left, plot.left, &ys, &cfg.y_axis),
        ],
        x: Some(xs),
        keys: Some(keys),
        reports: vec![report],
    })
}

/// Rows with both coordinates; with `changes_only`, the ends plus rows whose value changed.
fn point_rows(ds: &Dataset, xi: usize, yi: usize, changes_only: bool) -> Vec<usize> {
    let present: Vec<(usize, f64)> = ds
        .records()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.number(xi).and(r.number(yi)).map(|v| (i, v)))
        .collect();
    if !changes_only {
        return present.into_iter().map(|(i, _)| i).collect();
    }
    let last = present.len().saturating_sub(1);
    present
        .iter()
        .enumerate()
        .filter(|(n, (_, v))| *n == 0 || *n == last || present[n - 1].1 != *v)
        .map(|(_, (i, _))| *i)
        .collect()
}

fn first_key(tables: &[(String, Dataset)], key: &str) -> Result<String> {
    let (_, first) = tables.first().ok_or_else(|| ChartError::empty_domain(key))?;
    let idx = first.field(key)?;
    first
        .records()
        .first()
        .and_then(|r| r.get(idx))
        .map(|v| v.to_string())
        .ok_or_else(|| ChartError::empty_domain(key))
}

fn unique_features(features: &[GeoFeature]) -> Vec<GeoFeature> {
    let mut seen = HashSet::with_capacity(features.len());
    features
        .iter()
        .filter(|f| {
            let fresh = seen.insert(f.id.as_str());
            if !fresh {
                log::warn!("duplicate feature id '{}' skipped", f.id);
            }
            fresh
        })
        .cloned()
        .collect()
}

/// Key values a subset can be selected by (grouped bars only), in table order.
pub fn subset_options(kind: &ChartKind, data: &ChartData) -> Vec<String> {
    let (ChartKind::GroupedBars { key, .. }, ChartData::Tables(tables)) = (kind, data) else {
        return Vec::new();
    };
    let Some((_, first)) = tables.first() else {
        return Vec::new();
    };
    let Ok(idx) = first.field(key) else {
        return Vec::new();
    };
    first
        .records()
        .iter()
        .filter_map(|r| r.get(idx))
        .map(|v| v.to_string())
        .collect()
}

fn field_value<'a>(records: &'a Dataset, record: &'a Record, field: &str) -> Option<&'a FieldValue> {
    records.field(field).ok().and_then(|i| record.get(i))
}

/// Tooltip content for a resolved hover, formatted per the chart's tooltip fields.
pub fn tooltip(cfg: &ChartConfig, view: &View, hover: &Hover, anchor: Point) -> Option<Tooltip> {
    let bound = hover
        .element
        .as_ref()
        .and_then(|el| view.bindings.get(el.layer).map(|b| b.resolve(el.item)))
        .unwrap_or_default();
    let Some(record) = bound.record.or(hover.nearest).and_then(|i| view.records.get(i)) else {
        // region without data: name only
        return bound.name.map(|n| Tooltip { anchor, title: Some(n.to_string()), lines: Vec::new() });
    };

    let title = cfg
        .tooltip
        .title
        .as_deref()
        .and_then(|f| field_value(&view.records, record, f))
        .map(|v| v.to_string());
    let mut lines = Vec::with_capacity(cfg.tooltip.fields.len());
    for f in &cfg.tooltip.fields {
        match &f.source {
            TooltipSource::Field { field } => {
                if let Some(v) = field_value(&view.records, record, field) {
                    lines.push(TooltipLine::new(&f.label, f.format.apply(v)));
                }
            }
            TooltipSource::HoveredSeries => {
                let Some(series) = bound.series else { continue };
                if let Some(v) = field_value(&view.records, record, series) {
                    let label = if f.label.is_empty() { series.to_string() } else { f.label.clone() };
                    lines.push(TooltipLine::new(label, f.format.apply(v)));
                }
            }
            TooltipSource::AbsDifference { a, b } => {
                let num = |field: &str| field_value(&view.records, record, field).and_then(FieldValue::as_f64);
                if let (Some(a), Some(b)) = (num(a.as_str()), num(b.as_str())) {
                    lines.push(TooltipLine::new(&f.label, f.format.number((a - b).abs())));
                }
            }
        }
    }
    if title.is_none() && lines.is_empty() {
        return None;
    }
    Some(Tooltip { anchor, title, lines })
}

/// Overlay for a hover at `pointer`; `None` when there is nothing to show.
pub fn overlay(cfg: &ChartConfig, view: &View, plot: &PlotRect, hover: &Hover, pointer: Point) -> Option<OverlayFrame> {
    let tooltip = tooltip(cfg, view, hover, pointer);
    let guide = hover.domain.map(|_| GuideLine { x: pointer.x, top: plot.top, bottom: plot.bottom });
    let highlight = if cfg.highlight.is_empty() {
        None
    } else {
        hover.element.as_ref().map(|e| (e.layer, e.key.clone()))
    };
    let dim_others = highlight.as_ref().and(cfg.highlight.dim_others);
    if tooltip.is_none() && guide.is_none() && highlight.is_none() {
        return None;
    }
    Some(OverlayFrame { tooltip, guide, highlight, dim_others })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn wage() -> Dataset {
        let rows = [(2000.0, 5.15), (2001.0, 5.15), (2002.0, 5.15), (2003.0, 7.25), (2004.0, 7.25)];
        Dataset::from_rows(
            vec![Field::numeric("Years"), Field::numeric("Wage")],
            rows.iter().map(|(y, w)| vec![FieldValue::Number(*y), FieldValue::Number(*w)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn changes_only_keeps_ends_and_steps() {
        assert_eq!(point_rows(&wage(), 0, 1, true), vec![0, 3, 4]);
        assert_eq!(point_rows(&wage(), 0, 1, false).len(), 5);
    }

    #[test]
    fn bars_enter_from_baseline() {
        let ds = wage();
        let bars = BarLayout {
            x: domain::band(&ds, "Years", (0.0, 100.0), 0.0).unwrap(),
            y: LinearScale::new((0.0, 10.0), (100.0, 0.0)),
            key: KeySelector::Field(0),
            category: 0,
            value: 1,
            value_name: "Wage".into(),
            color: ColorScale::sequential(10.0, (Rgba::WHITE, Rgba::rgb(0, 0, 0))).unwrap(),
            slot: (0.0, 1.0),
        };
        let target = bars.place(3, &ds.records()[3]).unwrap();
        assert_eq!(target.shape, Shape::Rect { x: 60.0, y: 27.5, width: 20.0, height: 72.5 });
        let from = bars.enter_from(&target).unwrap();
        assert_eq!(from.shape, Shape::Rect { x: 60.0, y: 100.0, width: 20.0, height: 0.0 });
        assert_eq!(from.fill, target.fill);
    }

    #[test]
    fn series_binding_has_no_record() {
        let b = LayerBinding::Series(vec!["Goods".into()]);
        assert_eq!(b.resolve(0), Bound { record: None, series: Some("Goods"), name: None });
        assert_eq!(LayerBinding::Decoration.resolve(3), Bound::default());
    }
}
