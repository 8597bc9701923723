// File: crates/vizbind-demo/src/console.rs
// Summary: Overlay renderer that prints tooltips to the log instead of drawing them.

use vizbind_core::{OverlayFrame, OverlayRenderer};

#[derive(Debug, Default)]
pub struct ConsoleOverlay {
    visible: bool,
}

impl OverlayRenderer for ConsoleOverlay {
    fn id(&self) -> &'static str {
        "console"
    }

    fn show(&mut self, frame: &OverlayFrame) {
        self.visible = true;
        if let Some(tip) = &frame.tooltip {
            log::info!("tooltip at ({:.0}, {:.0}):\n{}", tip.anchor.x, tip.anchor.y, tip.text());
        }
        if let Some(guide) = &frame.guide {
            log::info!("guide line at x = {:.1}", guide.x);
        }
        if let Some((layer, key)) = &frame.highlight {
            log::info!("highlight {key} in layer {layer}");
        }
    }

    fn hide(&mut self) {
        if self.visible {
            log::info!("tooltip hidden");
        }
        self.visible = false;
    }
}
