// File: crates/vizbind-core/src/overlay.rs
// Summary: Transient hover overlay (tooltip, guide line, highlight) and the renderer hook that shows it.

use crate::record::ElementKey;
use crate::types::Point;

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
}

impl TooltipLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    /// Pointer position the box is drawn next to.
    pub anchor: Point,
    pub title: Option<String>,
    pub lines: Vec<TooltipLine>,
}

impl Tooltip {
    /// Plain-text form, one `label: value` per line.
    pub fn text(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        if let Some(t) = &self.title {
            out.push(t.clone());
        }
        for l in &self.lines {
            if l.label.is_empty() {
                out.push(l.value.clone());
            } else {
                out.push(format!("{}: {}", l.label, l.value));
            }
        }
        out.join("\n")
    }
}

/// Vertical dashed guide at a pixel x, spanning `[top, bottom]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideLine {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Everything the overlay shows for one resolved hover.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayFrame {
    pub tooltip: Option<Tooltip>,
    pub guide: Option<GuideLine>,
    /// Layer and key of the hovered element.
    pub highlight: Option<(usize, ElementKey)>,
    /// Opacity applied to every other element while something is highlighted.
    pub dim_others: Option<f32>,
}

/// Result of one pointer event, for renderers that react to changes only.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayUpdate {
    Show(OverlayFrame),
    Hide,
    Unchanged,
}

impl OverlayUpdate {
    pub fn apply_to(&self, renderer: &mut dyn OverlayRenderer) {
        match self {
            OverlayUpdate::Show(frame) => renderer.show(frame),
            OverlayUpdate::Hide => renderer.hide(),
            OverlayUpdate::Unchanged => {}
        }
    }
}

/// Receives overlay changes; knows nothing about records.
pub trait OverlayRenderer {
    fn id(&self) -> &'static str;
    fn show(&mut self, frame: &OverlayFrame);
    fn hide(&mut self);
}

/// Keeps the last shown overlay; useful for headless drivers and tests.
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    pub current: Option<OverlayFrame>,
    pub shows: usize,
    pub hides: usize,
}

impl OverlayRenderer for RecordingOverlay {
    fn id(&self) -> &'static str { "recording" }

    fn show(&mut self, frame: &OverlayFrame) {
        self.current = Some(frame.clone());
        self.shows += 1;
    }

    fn hide(&mut self) {
        self.current = None;
        self.hides += 1;
    }
}
