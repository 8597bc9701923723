// File: crates/vizbind-core/src/engine.rs
// Summary: One chart instance: owns data, element layers and hover state; sequences loads and events.

use std::time::Duration;

use crate::axis::AxisGuide;
use crate::charts::{self, PassInputs, View};
use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::interaction::{InteractionResolver, PointerEvent};
use crate::mark::{Attributes, Shape};
use crate::overlay::{OverlayFrame, OverlayUpdate};
use crate::reconcile::{Change, Reconciler, RenderCommand};
use crate::record::ElementKey;
use crate::source::{ChartData, DataLoader};
use crate::types::PlotRect;
use crate::zoom::ZoomTransform;

/// Identifies one requested load. Only the most recent ticket may commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { entered: usize, updated: usize, exited: usize },
    /// A newer load was requested first; the result was dropped.
    Superseded,
}

/// Discrete UI controls besides the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// Pick the key row shown by a subset chart (e.g. a year from a dropdown).
    SelectSubset(String),
    /// Show or hide the optional overlay series.
    ToggleOverlay,
    /// Load the data again and rebuild the chart.
    Reload,
    /// Multiply the value-axis zoom by `factor`, keeping pixel row `focus` in place.
    ZoomY { factor: f64, focus: f32 },
    /// Move the value axis content down by `dy` pixels.
    PanY(f32),
    ResetZoom,
}

/// One element as displayed at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub layer: usize,
    pub key: ElementKey,
    pub attributes: Attributes,
}

/// Everything a render target needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub plot: PlotRect,
    pub marks: Vec<Mark>,
    pub axes: Vec<AxisGuide>,
    pub overlay: Option<OverlayFrame>,
    /// Marks must be clipped to this rect (set while the value axis can zoom).
    pub clip: Option<PlotRect>,
}

/// Materializes frames; knows nothing about records.
pub trait RenderTarget {
    type Error;
    fn render(&mut self, frame: &Frame) -> std::result::Result<(), Self::Error>;
}

pub struct ChartEngine {
    config: ChartConfig,
    loader: Option<Box<dyn DataLoader>>,
    generation: u64,
    data: Option<ChartData>,
    layers: Vec<Reconciler>,
    view: Option<View>,
    resolver: InteractionResolver,
    overlay: Option<OverlayFrame>,
    selected: Option<String>,
    show_overlay: bool,
    zoom: ZoomTransform,
}

impl ChartEngine {
    pub fn new(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let resolver = InteractionResolver::new(config.hover);
        Ok(Self {
            config,
            loader: None,
            generation: 0,
            data: None,
            layers: Vec::new(),
            view: None,
            resolver,
            overlay: None,
            selected: None,
            show_overlay: false,
            zoom: ZoomTransform::IDENTITY,
        })
    }

    /// Engine that can reload itself from `loader`.
    pub fn with_loader(config: ChartConfig, loader: impl DataLoader + 'static) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.loader = Some(Box::new(loader));
        Ok(engine)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn data(&self) -> Option<&ChartData> {
        self.data.as_ref()
    }

    pub fn layers(&self) -> &[Reconciler] {
        &self.layers
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn plot(&self) -> PlotRect {
        PlotRect::from_surface(self.config.width, self.config.height, &self.config.margin)
    }

    /// Number of visual elements across all layers.
    pub fn element_count(&self) -> usize {
        self.layers.iter().map(Reconciler::len).sum()
    }

    /// Render commands from the last successful pass, layer by layer.
    pub fn commands(&self) -> impl Iterator<Item = &RenderCommand> {
        self.view.iter().flat_map(|v| v.reports.iter().flat_map(|r| r.commands.iter()))
    }

    pub fn overlay(&self) -> Option<&OverlayFrame> {
        self.overlay.as_ref()
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    fn clip(&self) -> Option<PlotRect> {
        self.config.zoom.map(|_| self.plot())
    }

    /// Start a load; any earlier ticket still outstanding becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Finish the load for `ticket`.
    ///
    /// Stale tickets are dropped, whatever their result. A failed load or pass returns the
    /// error and leaves the last valid state in place.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<ChartData>, at: Duration) -> Result<LoadOutcome> {
        if ticket.0 != self.generation {
            log::warn!("dropping load #{} (superseded by #{})", ticket.0, self.generation);
            return Ok(LoadOutcome::Superseded);
        }
        let mut data = result.map_err(|e| {
            log::warn!("load #{} failed: {e}", ticket.0);
            e
        })?;
        if let Some(key) = self.config.kind.sort_key() {
            data.sort_by(key)?;
        }
        let options = charts::subset_options(&self.config.kind, &data);
        let selected = self.selected.clone().filter(|s| options.contains(s));
        let outcome = self.run_pass(&data, selected.as_deref(), false, at)?;
        log::info!("load #{} applied: {} records, {:?}", ticket.0, data.record_count(), outcome);
        self.selected = selected;
        self.data = Some(data);
        self.clear_hover();
        Ok(outcome)
    }

    /// Load synchronously through `loader`.
    pub fn load_with(&mut self, loader: &dyn DataLoader, at: Duration) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = loader.load();
        self.complete_load(ticket, result, at)
    }

    /// Reload through the engine's own loader.
    pub fn reload(&mut self, at: Duration) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = match &self.loader {
            Some(loader) => loader.load(),
            None => Err(ChartError::InvalidConfig("engine has no loader to reload from".into())),
        };
        self.complete_load(ticket, result, at)
    }

    /// Re-run layout on the current data (after a control change or resize).
    pub fn refresh(&mut self, at: Duration) -> Result<LoadOutcome> {
        self.refresh_with(at, false)
    }

    fn refresh_with(&mut self, at: Duration, instant: bool) -> Result<LoadOutcome> {
        let Some(data) = self.data.take() else {
            return Err(ChartError::InvalidConfig("no data loaded yet".into()));
        };
        let selected = self.selected.clone();
        let outcome = self.run_pass(&data, selected.as_deref(), instant, at);
        self.data = Some(data);
        outcome
    }

    fn run_pass(&mut self, data: &ChartData, selected: Option<&str>, instant: bool, at: Duration) -> Result<LoadOutcome> {
        let inputs = PassInputs {
            plot: self.plot(),
            selected,
            show_overlay: self.show_overlay,
            zoom: self.zoom,
            instant,
            at,
        };
        let mut layers = self.layers.clone();
        let view = charts::layout(&self.config, data, &inputs, &mut layers).map_err(|e| {
            log::warn!("{} pass skipped: {e}", self.config.kind.name());
            e
        })?;
        let count = |c: Change| view.reports.iter().map(|r| r.count(c)).sum::<usize>();
        let outcome = LoadOutcome::Applied {
            entered: count(Change::Enter),
            updated: count(Change::Update),
            exited: count(Change::Exit),
        };
        self.resolver.set_keys(view.keys.clone());
        self.layers = layers;
        self.view = Some(view);
        Ok(outcome)
    }

    /// Key values `SelectSubset` accepts, in data order.
    pub fn subset_options(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map(|d| charts::subset_options(&self.config.kind, d))
            .unwrap_or_default()
    }

    pub fn selected_subset(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn overlay_visible(&self) -> bool {
        self.show_overlay
    }

    pub fn handle_control(&mut self, event: ControlEvent, at: Duration) -> Result<LoadOutcome> {
        match event {
            ControlEvent::SelectSubset(value) => {
                if !self.subset_options().contains(&value) {
                    return Err(ChartError::InvalidConfig(format!("'{value}' is not a selectable subset")));
                }
                let previous = self.selected.replace(value);
                let outcome = self.refresh(at);
                if outcome.is_err() {
                    self.selected = previous;
                }
                self.clear_hover();
                outcome
            }
            ControlEvent::ToggleOverlay => {
                self.show_overlay = !self.show_overlay;
                let outcome = self.refresh(at);
                if outcome.is_err() {
                    self.show_overlay = !self.show_overlay;
                }
                outcome
            }
            ControlEvent::Reload => self.reload(at),
            ControlEvent::ZoomY { factor, focus } => {
                let extent = self.config.zoom.ok_or_else(|| self.no_zoom())?;
                self.set_zoom(self.zoom.scale_by(factor, focus, extent), at)
            }
            ControlEvent::PanY(dy) => {
                if self.config.zoom.is_none() {
                    return Err(self.no_zoom());
                }
                self.set_zoom(self.zoom.pan_by(dy), at)
            }
            ControlEvent::ResetZoom => {
                if self.config.zoom.is_none() {
                    return Err(self.no_zoom());
                }
                self.set_zoom(ZoomTransform::IDENTITY, at)
            }
        }
    }

    fn no_zoom(&self) -> ChartError {
        ChartError::InvalidConfig(format!("{} chart has no zoom configured", self.config.kind.name()))
    }

    /// Apply a new value-axis transform immediately; a failed pass restores the old one.
    fn set_zoom(&mut self, zoom: ZoomTransform, at: Duration) -> Result<LoadOutcome> {
        let previous = std::mem::replace(&mut self.zoom, zoom);
        if self.data.is_none() {
            return Ok(LoadOutcome::Applied { entered: 0, updated: 0, exited: 0 });
        }
        let outcome = self.refresh_with(at, true);
        if outcome.is_err() {
            self.zoom = previous;
        }
        self.clear_hover();
        outcome
    }

    /// Apply one pointer event, in arrival order, and report how the overlay changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> OverlayUpdate {
        let plot = self.plot();
        let inside = matches!(event, PointerEvent::Enter(p) | PointerEvent::Move(p) if plot.contains(p));
        let next = match &self.view {
            Some(view) => {
                let x = if inside { view.x.as_ref() } else { None };
                // clipped marks cannot be hit outside the plot
                let layers: &[Reconciler] = if inside || self.clip().is_none() { &self.layers } else { &[] };
                let hover = self.resolver.handle(event, layers, x).cloned();
                let pointer = self.resolver.state().pointer;
                match (hover, pointer) {
                    (Some(h), Some(p)) => charts::overlay(&self.config, view, &plot, &h, p),
                    _ => None,
                }
            }
            None => None,
        };
        if next == self.overlay {
            return OverlayUpdate::Unchanged;
        }
        self.overlay = next.clone();
        match next {
            Some(frame) => OverlayUpdate::Show(frame),
            None => OverlayUpdate::Hide,
        }
    }

    fn clear_hover(&mut self) {
        self.resolver.clear();
        self.overlay = None;
    }

    pub fn is_animating(&self, at: Duration) -> bool {
        self.layers.iter().any(|l| l.elements().any(|e| e.is_animating(at)))
    }

    /// Elements as displayed at `at`, with hover highlighting applied.
    pub fn frame(&self, at: Duration) -> Frame {
        let highlight = self.overlay.as_ref().and_then(|o| o.highlight.as_ref());
        let style = self.config.highlight;
        let mut marks = Vec::with_capacity(self.element_count());
        for (li, layer) in self.layers.iter().enumerate() {
            for el in layer.elements() {
                let mut attributes = el.current(at);
                match highlight {
                    Some((hl, key)) if *hl == li && *key == el.key => {
                        if let (Some(r), Shape::Circle { r: radius, .. }) = (style.radius, &mut attributes.shape) {
                            *radius = r;
                        }
                        if let Some(fill) = style.fill {
                            attributes.fill = Some(fill);
                        }
                        if let Some(stroke) = style.stroke {
                            let width = attributes.stroke_width.max(1.0);
                            attributes = attributes.stroke(stroke, width);
                        }
                    }
                    Some((hl, _)) if *hl == li => {
                        if let Some(dim) = style.dim_others {
                            attributes.opacity *= dim;
                        }
                    }
                    _ => {}
                }
                marks.push(Mark { layer: li, key: el.key.clone(), attributes });
            }
        }
        Frame {
            width: self.config.width,
            height: self.config.height,
            plot: self.plot(),
            marks,
            axes: self.view.as_ref().map(|v| v.axes.clone()).unwrap_or_default(),
            overlay: self.overlay.clone(),
            clip: self.clip(),
        }
    }

    pub fn render_to<T: RenderTarget>(&self, target: &mut T, at: Duration) -> std::result::Result<(), T::Error> {
        target.render(&self.frame(at))
    }
}
