// File: crates/vizbind-core/src/config.rs
// Summary: Per-instance chart configuration (surface, margins, variant, tooltip, highlight) and presets.

use serde::{Deserialize, Serialize};

use crate::axis::AxisSpec;
use crate::domain::DomainPolicy;
use crate::error::{ChartError, Result};
use crate::format::ValueFormat;
use crate::geo::MercatorProjection;
use crate::interaction::HoverStrategy;
use crate::loader::ParsePolicy;
use crate::palette;
use crate::stack::StackOffset;
use crate::transition::TransitionSpec;
use crate::types::{Insets, Rgba, HEIGHT, WIDTH};
use crate::zoom::ZoomExtent;

/// A named value column with its mark color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub field: String,
    pub color: Rgba,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

impl SeriesStyle {
    pub fn new(field: impl Into<String>, color: Rgba) -> Self {
        Self { field: field.into(), color, stroke_width: default_stroke_width() }
    }
}

/// One bar per category from the table named `table`, colored by a sequential scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub table: String,
    pub colors: (Rgba, Rgba),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Band x over `x`, bars from zero to `y`, colored around zero.
    DivergingBars {
        x: String,
        y: String,
        y_domain: DomainPolicy,
        #[serde(default = "default_padding")]
        padding: f32,
        color_domain: [f64; 3],
        colors: [Rgba; 3],
    },
    /// Side-by-side bars per category for one selected key row of several wide tables.
    GroupedBars {
        key: String,
        #[serde(default = "default_category")]
        category: String,
        #[serde(default = "default_padding")]
        padding: f32,
        series: Vec<BarSeries>,
    },
    /// One path per series plus one point per record and series.
    Lines {
        x: String,
        series: Vec<SeriesStyle>,
        /// Extra series hidden until toggled on.
        #[serde(default)]
        overlay: Option<SeriesStyle>,
        x_domain: DomainPolicy,
        y_domain: DomainPolicy,
        /// Only draw points where the value changes (plus both ends).
        #[serde(default)]
        changes_only: bool,
        #[serde(default = "default_radius")]
        point_radius: f32,
    },
    Scatter {
        key: String,
        x: String,
        y: String,
        x_domain: DomainPolicy,
        y_domain: DomainPolicy,
        #[serde(default = "default_radius")]
        radius: f32,
        color: Rgba,
    },
    /// Stacked areas over a temporal x.
    Streamgraph {
        x: String,
        series: Vec<String>,
        #[serde(default)]
        offset: StackOffset,
        y_domain: DomainPolicy,
        palette: Vec<Rgba>,
    },
    /// Projected regions joined to tabular values by key.
    Choropleth {
        key: String,
        value: String,
        stops: Vec<f64>,
        colors: Vec<Rgba>,
        #[serde(default)]
        projection: MercatorProjection,
    },
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::DivergingBars { .. } => "diverging_bars",
            ChartKind::GroupedBars { .. } => "grouped_bars",
            ChartKind::Lines { .. } => "lines",
            ChartKind::Scatter { .. } => "scatter",
            ChartKind::Streamgraph { .. } => "streamgraph",
            ChartKind::Choropleth { .. } => "choropleth",
        }
    }

    /// Field the records are sorted by at load time, for variants over a continuous x.
    pub fn sort_key(&self) -> Option<&str> {
        match self {
            ChartKind::Lines { x, .. } | ChartKind::Streamgraph { x, .. } => Some(x),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TooltipSource {
    Field { field: String },
    /// Value of the hovered series at the resolved record; labelled with the series name.
    HoveredSeries,
    /// `|a - b|` of two numeric fields.
    AbsDifference { a: String, b: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TooltipField {
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub source: TooltipSource,
    #[serde(default)]
    pub format: ValueFormat,
}

impl TooltipField {
    pub fn field(label: impl Into<String>, field: impl Into<String>, format: ValueFormat) -> Self {
        Self { label: label.into(), source: TooltipSource::Field { field: field.into() }, format }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSpec {
    /// Field shown as the tooltip heading.
    pub title: Option<String>,
    pub fields: Vec<TooltipField>,
}

/// Style overrides for the hovered element and its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub dim_others: Option<f32>,
    pub radius: Option<f32>,
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
}

impl HighlightStyle {
    pub fn is_empty(&self) -> bool {
        *self == HighlightStyle::default()
    }
}

fn default_width() -> u32 { WIDTH }
fn default_height() -> u32 { HEIGHT }
fn default_transition_ms() -> u64 { 1000 }
fn default_padding() -> f32 { 0.2 }
fn default_radius() -> f32 { 5.0 }
fn default_stroke_width() -> f32 { 2.0 }
fn default_category() -> String { "type".to_string() }

/// Everything one chart instance needs; owned by its engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margin: Insets,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default)]
    pub parse_policy: ParsePolicy,
    #[serde(default)]
    pub hover: HoverStrategy,
    #[serde(default)]
    pub tooltip: TooltipSpec,
    #[serde(default)]
    pub highlight: HighlightStyle,
    #[serde(default)]
    pub x_axis: AxisSpec,
    #[serde(default)]
    pub y_axis: AxisSpec,
    /// Vertical zoom and pan of the value axis (streamgraph only).
    #[serde(default)]
    pub zoom: Option<ZoomExtent>,
    pub kind: ChartKind,
}

impl ChartConfig {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            transition_ms: default_transition_ms(),
            parse_policy: ParsePolicy::default(),
            hover: HoverStrategy::default(),
            tooltip: TooltipSpec::default(),
            highlight: HighlightStyle::default(),
            x_axis: AxisSpec::default(),
            y_axis: AxisSpec::default(),
            zoom: None,
            kind,
        }
    }

    pub fn transition(&self) -> TransitionSpec {
        if self.transition_ms == 0 {
            TransitionSpec::NONE
        } else {
            TransitionSpec::millis(self.transition_ms)
        }
    }

    /// Reject configurations that cannot produce a plot area or valid scales.
    pub fn validate(&self) -> Result<()> {
        if self.margin.hsum() >= self.width || self.margin.vsum() >= self.height {
            return Err(ChartError::InvalidConfig(format!(
                "margins {:?} leave no plot area on a {}x{} surface",
                self.margin, self.width, self.height
            )));
        }
        if let Some(zoom) = &self.zoom {
            if !matches!(self.kind, ChartKind::Streamgraph { .. }) {
                return Err(ChartError::InvalidConfig(format!("{} charts do not zoom", self.kind.name())));
            }
            zoom.validate()?;
        }
        match &self.kind {
            ChartKind::GroupedBars { series, .. } if series.is_empty() => {
                Err(ChartError::InvalidConfig("grouped bars need at least one table".into()))
            }
            ChartKind::Lines { series, .. } if series.is_empty() => {
                Err(ChartError::InvalidConfig("lines need at least one series".into()))
            }
            ChartKind::Streamgraph { series, palette, .. } if series.is_empty() || palette.is_empty() => {
                Err(ChartError::InvalidConfig("streamgraph needs series and a palette".into()))
            }
            ChartKind::Choropleth { stops, colors, .. } if stops.len().min(colors.len()) < 2 => {
                Err(ChartError::InvalidConfig("choropleth needs at least two color stops".into()))
            }
            _ => Ok(()),
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["bar-div", "bar-seq", "line", "multiline", "scatterplot", "streamgraph", "world-map"]
    }

    /// Built-in configuration for one of the bundled visualizations.
    pub fn preset(name: &str) -> Option<Self> {
        let cfg = match name {
            "bar-div" => Self::inflation_bars(),
            "bar-seq" => Self::trade_by_good(),
            "line" => Self::minimum_wage(),
            "multiline" => Self::trade_balance(),
            "scatterplot" => Self::unemployment_vs_inflation(),
            "streamgraph" => Self::gdp_components(),
            "world-map" => Self::gdp_per_capita(),
            _ => return None,
        };
        Some(cfg)
    }

    fn inflation_bars() -> Self {
        let rate = "Average inflation rate (%)";
        let mut c = Self::new(ChartKind::DivergingBars {
            x: "Years".into(),
            y: rate.into(),
            y_domain: DomainPolicy::Fixed { min: -0.15, max: 0.2 },
            padding: 0.2,
            color_domain: [-0.15, 0.0, 0.2],
            colors: [palette::RDYLGN_9[0], palette::RDYLGN_9[4], palette::RDYLGN_9[8]],
        });
        c.width = 1000;
        c.margin = Insets::new(100, 50, 50, 75);
        c.tooltip.fields = vec![
            TooltipField::field("Year", "Years", ValueFormat::Plain),
            TooltipField::field("Inflation Rate", rate, ValueFormat::Percent),
        ];
        c.x_axis = AxisSpec { ticks: Some(6), ..AxisSpec::default() };
        c.y_axis = AxisSpec { format: ValueFormat::PercentWhole, grid: true, ..AxisSpec::default() };
        c
    }

    fn trade_by_good() -> Self {
        let mut c = Self::new(ChartKind::GroupedBars {
            key: "Years".into(),
            category: default_category(),
            padding: 0.25,
            series: vec![
                BarSeries { table: "import".into(), colors: (palette::PUBU_9[3], palette::PUBU_9[7]) },
                BarSeries { table: "export".into(), colors: (palette::ORRD_9[3], palette::ORRD_9[7]) },
            ],
        });
        c.width = 1500;
        c.height = 800;
        c.margin = Insets::new(250, 500, 100, 250);
        c.tooltip = TooltipSpec {
            title: Some(default_category()),
            fields: vec![
                TooltipField::field("Import", "import", ValueFormat::Dollars),
                TooltipField::field("Export", "export", ValueFormat::Dollars),
                TooltipField {
                    label: "Difference".into(),
                    source: TooltipSource::AbsDifference { a: "import".into(), b: "export".into() },
                    format: ValueFormat::Dollars,
                },
            ],
        };
        c.x_axis.label = "Type of Good".into();
        c.y_axis.label = "Value (USD)".into();
        c
    }

    fn minimum_wage() -> Self {
        let wage = "Federal minimum wage ($)";
        let mut c = Self::new(ChartKind::Lines {
            x: "Years".into(),
            series: vec![SeriesStyle::new(wage, palette::ACCENT)],
            overlay: None,
            x_domain: DomainPolicy::Extent,
            y_domain: DomainPolicy::ZeroToMax,
            changes_only: true,
            point_radius: 5.0,
        });
        c.margin = Insets::new(100, 50, 50, 100);
        c.tooltip.fields = vec![
            TooltipField::field("Year", "Years", ValueFormat::Year),
            TooltipField::field("Minimum Wage", wage, ValueFormat::Dollars),
        ];
        c.x_axis = AxisSpec { label: "Year".into(), format: ValueFormat::Year, ..AxisSpec::default() };
        c.y_axis.label = "Amount ($)".into();
        c
    }

    fn trade_balance() -> Self {
        let mut c = Self::new(ChartKind::Lines {
            x: "Years".into(),
            series: vec![
                SeriesStyle::new("Imports", palette::PUBU_9[5]),
                SeriesStyle::new("Exports", palette::ORRD_9[5]),
            ],
            overlay: None,
            x_domain: DomainPolicy::Extent,
            y_domain: DomainPolicy::ZeroToMax,
            changes_only: false,
            point_radius: 5.0,
        });
        c.margin = Insets::new(175, 50, 50, 100);
        c.tooltip.fields = vec![
            TooltipField::field("Year", "Years", ValueFormat::Year),
            TooltipField::field("Imports", "Imports", ValueFormat::DollarsSi),
            TooltipField::field("Exports", "Exports", ValueFormat::DollarsSi),
            TooltipField {
                label: "Trade Balance".into(),
                source: TooltipSource::AbsDifference { a: "Exports".into(), b: "Imports".into() },
                format: ValueFormat::DollarsSi,
            },
        ];
        c.x_axis.format = ValueFormat::Year;
        c.y_axis.format = ValueFormat::DollarsSiShort;
        c
    }

    fn unemployment_vs_inflation() -> Self {
        let (u, i) = ("Unemployment rate (%)", "Average inflation rate (%)");
        let mut c = Self::new(ChartKind::Scatter {
            key: "Years".into(),
            x: u.into(),
            y: i.into(),
            x_domain: DomainPolicy::Fixed { min: 0.0, max: 15.0 },
            y_domain: DomainPolicy::Fixed { min: -5.0, max: 20.0 },
            radius: 5.0,
            color: palette::ACCENT,
        });
        c.width = 1000;
        c.height = 1000;
        c.margin = Insets::new(100, 100, 100, 170);
        c.tooltip.fields = vec![
            TooltipField::field("Year", "Years", ValueFormat::Year),
            TooltipField::field("Unemployment Rate", u, ValueFormat::PercentValue),
            TooltipField::field("Inflation Rate", i, ValueFormat::PercentValue),
        ];
        c.highlight = HighlightStyle {
            radius: Some(10.0),
            fill: Some(Rgba::rgb(0, 128, 0)),
            ..HighlightStyle::default()
        };
        c.x_axis.label = "Unemployment Rate (%)".into();
        c.y_axis.label = "Average Inflation Rate (%)".into();
        c
    }

    fn gdp_components() -> Self {
        let series = ["Goods", "Services", "Investments", "Federal Government", "State and Local Government"];
        let mut c = Self::new(ChartKind::Streamgraph {
            x: "Years".into(),
            series: series.iter().map(|s| s.to_string()).collect(),
            offset: StackOffset::Silhouette,
            y_domain: DomainPolicy::Fixed { min: -15e12, max: 15e12 },
            palette: palette::SET2_5.to_vec(),
        });
        c.width = 1000;
        c.margin = Insets::new(150, 30, 70, 157);
        c.hover = HoverStrategy::NearestXOverMark;
        c.zoom = Some(ZoomExtent { min: 0.5, max: 15.0 });
        c.tooltip.fields = vec![
            TooltipField { label: String::new(), source: TooltipSource::HoveredSeries, format: ValueFormat::DollarsSi },
            TooltipField::field("", "Years", ValueFormat::Year),
        ];
        c.highlight = HighlightStyle {
            dim_others: Some(0.2),
            stroke: Some(Rgba::WHITE),
            ..HighlightStyle::default()
        };
        c.x_axis = AxisSpec { format: ValueFormat::Year, grid: true, ..AxisSpec::default() };
        c.y_axis = AxisSpec {
            label: "Relative GDP ($)".into(),
            format: ValueFormat::SiShort,
            ticks: Some(7),
            grid: true,
        };
        c
    }

    fn gdp_per_capita() -> Self {
        let mut c = Self::new(ChartKind::Choropleth {
            key: "code".into(),
            value: "gdp".into(),
            stops: vec![0.0, 10_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0],
            colors: palette::GREENS_5.to_vec(),
            projection: MercatorProjection { scale: 150.0, center: (0.0, 0.0), translate: (480.0, 500.0) },
        });
        c.width = 960;
        c.height = 600;
        c.margin = Insets::new(0, 0, 0, 0);
        c.tooltip = TooltipSpec {
            title: None,
            fields: vec![
                TooltipField::field("Country", "name", ValueFormat::Plain),
                TooltipField::field("GDP per capita", "gdp", ValueFormat::Dollars),
                TooltipField::field("Population", "pop", ValueFormat::Grouped),
            ],
        };
        c.highlight.dim_others = Some(0.3);
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for name in ChartConfig::preset_names() {
            let cfg = ChartConfig::preset(name).unwrap();
            cfg.validate().unwrap();
        }
        assert!(ChartConfig::preset("pie").is_none());
    }

    #[test]
    fn kind_round_trips_through_json() {
        let cfg = ChartConfig::preset("bar-div").unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ChartConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: ChartConfig = serde_json::from_str(
            r##"{"kind":{"type":"scatter","key":"Years","x":"a","y":"b",
                "x_domain":{"policy":"extent"},"y_domain":{"policy":"fixed","min":0,"max":1},
                "color":"#8cff79"}}"##,
        )
        .unwrap();
        assert_eq!((cfg.width, cfg.height), (WIDTH, HEIGHT));
        assert_eq!(cfg.transition(), TransitionSpec::millis(1000));
        assert!(matches!(cfg.kind, ChartKind::Scatter { radius, .. } if radius == 5.0));
    }

    #[test]
    fn zoom_only_on_streamgraph() {
        let mut cfg = ChartConfig::preset("line").unwrap();
        cfg.zoom = Some(ZoomExtent::default());
        assert!(matches!(cfg.validate(), Err(ChartError::InvalidConfig(_))));
        let cfg = ChartConfig::preset("streamgraph").unwrap();
        assert_eq!(cfg.zoom, Some(ZoomExtent { min: 0.5, max: 15.0 }));
    }

    #[test]
    fn zero_area_rejected() {
        let mut cfg = ChartConfig::preset("line").unwrap();
        cfg.margin = Insets::new(400, 400, 0, 0);
        assert!(matches!(cfg.validate(), Err(ChartError::InvalidConfig(_))));
    }

    #[test]
    fn overflowing_margins_rejected() {
        let mut cfg = ChartConfig::preset("line").unwrap();
        cfg.margin = Insets::new(u32::MAX, 1, u32::MAX, 1);
        assert!(matches!(cfg.validate(), Err(ChartError::InvalidConfig(_))));
    }
}
