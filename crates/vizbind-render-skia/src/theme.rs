// File: crates/vizbind-render-skia/src/theme.rs
// Summary: Light/Dark theming for chrome around the marks (background, axes, guide, tooltip).

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub tick: skia::Color,
    /// Vertical hover guide.
    pub guide: skia::Color,
    pub tooltip_fill: skia::Color,
    pub tooltip_border: skia::Color,
    pub tooltip_text: skia::Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_rgb(255, 255, 255),
            grid: skia::Color::from_rgb(230, 230, 235),
            axis_line: skia::Color::from_rgb(60, 60, 70),
            axis_label: skia::Color::from_rgb(20, 20, 30),
            tick: skia::Color::from_rgb(100, 100, 110),
            guide: skia::Color::from_rgb(80, 80, 80),
            tooltip_fill: skia::Color::from_argb(235, 255, 255, 255),
            tooltip_border: skia::Color::from_rgb(60, 60, 70),
            tooltip_text: skia::Color::from_rgb(20, 20, 30),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_rgb(18, 18, 20),
            grid: skia::Color::from_rgb(40, 40, 45),
            axis_line: skia::Color::from_rgb(180, 180, 190),
            axis_label: skia::Color::from_rgb(235, 235, 245),
            tick: skia::Color::from_rgb(150, 150, 160),
            guide: skia::Color::from_rgb(255, 230, 70),
            tooltip_fill: skia::Color::from_argb(235, 30, 30, 34),
            tooltip_border: skia::Color::from_rgb(150, 150, 160),
            tooltip_text: skia::Color::from_rgb(235, 235, 245),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}
