// File: crates/vizbind-core/src/lib.rs
// Summary: Core library entry point; exports the data-to-visual binding API.

pub mod error;
pub mod types;
pub mod record;
pub mod loader;
pub mod geo;
pub mod scale;
pub mod domain;
pub mod palette;
pub mod mark;
pub mod transition;
pub mod reconcile;
pub mod interaction;
pub mod stack;
pub mod format;
pub mod overlay;
pub mod axis;
pub mod config;
pub mod source;
pub mod charts;
pub mod engine;
pub mod zoom;

pub use error::{ChartError, Result};
pub use types::{Insets, PlotRect, Point, Rgba};
pub use record::{Dataset, ElementKey, Field, FieldKind, FieldValue, Record};
pub use loader::{parse_csv, load_csv, ColumnSpec, CsvFile, CsvOptions, DatasetLoader, ParsePolicy};
pub use geo::{GeoFeature, MercatorProjection, Region};
pub use scale::{BandScale, ColorScale, LinearScale, ScaleTransform};
pub use domain::DomainPolicy;
pub use mark::{Attributes, Shape, ShapeKind};
pub use transition::TransitionSpec;
pub use reconcile::{Change, KeySelector, MarkLayout, ReconcileReport, Reconciler, RenderCommand, VisualElement};
pub use interaction::{Hover, HoverStrategy, InteractionResolver, PointerEvent, SortedKeys};
pub use stack::{stack, StackOffset, StackedSeries};
pub use format::ValueFormat;
pub use overlay::{OverlayFrame, OverlayRenderer, OverlayUpdate, Tooltip};
pub use axis::{AxisGuide, AxisSpec, Orientation};
pub use config::{ChartConfig, ChartKind};
pub use source::{ChartData, DataLoader, MapSource, TableSource, TablesSource};
pub use engine::{ChartEngine, ControlEvent, Frame, LoadOutcome, LoadTicket, Mark, RenderTarget};
pub use zoom::{ZoomExtent, ZoomTransform};
