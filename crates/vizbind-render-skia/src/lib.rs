// File: crates/vizbind-render-skia/src/lib.rs
// Summary: Headless Skia render target: draws engine frames into CPU raster surfaces.

pub mod text;
pub mod theme;

use anyhow::Result;
use skia_safe as skia;

use vizbind_core::axis::{AxisGuide, Orientation};
use vizbind_core::overlay::{OverlayFrame, Tooltip};
use vizbind_core::{Frame, Point, RenderTarget, Rgba, Shape};

pub use text::{Align, TextShaper};
pub use theme::Theme;

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub theme: Theme,
    /// Axis titles, tick labels and tooltip text. Off for pixel-exact comparisons.
    pub draw_labels: bool,
    pub font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { theme: Theme::light(), draw_labels: true, font_size: 12.0 }
    }
}

/// Render `frame` and encode it as PNG.
pub fn render_png_bytes(frame: &Frame, opts: &RenderOptions) -> Result<Vec<u8>> {
    let mut surface = paint(frame, opts)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Render `frame` to a PNG file, creating parent directories.
pub fn render_png(frame: &Frame, opts: &RenderOptions, path: impl AsRef<std::path::Path>) -> Result<()> {
    let bytes = render_png_bytes(frame, opts)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path.as_ref(), bytes)?;
    log::debug!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Render `frame` to unpremultiplied RGBA8: `(pixels, width, height, row_bytes)`.
pub fn render_rgba8(frame: &Frame, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
    let mut surface = paint(frame, opts)?;
    let (w, h) = (frame.width, frame.height);
    let info = skia::ImageInfo::new((w as i32, h as i32), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let stride = w as usize * 4;
    let mut px = vec![0u8; stride * h as usize];
    if !surface.read_pixels(&info, &mut px, stride, (0, 0)) {
        anyhow::bail!("reading surface pixels failed");
    }
    Ok((px, w, h, stride))
}

/// Render target that keeps the last frame as PNG bytes.
#[derive(Default)]
pub struct SkiaTarget {
    pub options: RenderOptions,
    png: Vec<u8>,
    frames: usize,
}

impl SkiaTarget {
    pub fn new(options: RenderOptions) -> Self {
        Self { options, png: Vec::new(), frames: 0 }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        if self.png.is_empty() {
            anyhow::bail!("nothing rendered yet");
        }
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

impl RenderTarget for SkiaTarget {
    type Error = anyhow::Error;

    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.png = render_png_bytes(frame, &self.options)?;
        self.frames += 1;
        Ok(())
    }
}

fn paint(frame: &Frame, opts: &RenderOptions) -> Result<skia::Surface> {
    if frame.width == 0 || frame.height == 0 {
        anyhow::bail!("empty frame {}x{}", frame.width, frame.height);
    }
    let mut surface = skia::surfaces::raster_n32_premul((frame.width as i32, frame.height as i32))
        .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
    let shaper = opts.draw_labels.then(TextShaper::new);
    let canvas = surface.canvas();
    canvas.clear(opts.theme.background);

    for axis in &frame.axes {
        draw_grid(canvas, frame, axis, &opts.theme);
    }
    canvas.save();
    if let Some(clip) = &frame.clip {
        canvas.clip_rect(skia::Rect::new(clip.left, clip.top, clip.right, clip.bottom), None, Some(true));
    }
    for mark in &frame.marks {
        draw_shape(canvas, &mark.attributes.shape, mark.attributes.fill, mark.attributes.stroke, mark.attributes.stroke_width, mark.attributes.opacity);
    }
    canvas.restore();
    for axis in &frame.axes {
        draw_axis(canvas, frame, axis, opts, shaper.as_ref());
    }
    if let Some(overlay) = &frame.overlay {
        draw_overlay(canvas, overlay, frame, opts, shaper.as_ref());
    }
    Ok(surface)
}

fn color(c: Rgba, opacity: f32) -> skia::Color {
    let a = (c.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(a, c.r, c.g, c.b)
}

fn polyline(path: &mut skia::Path, points: &[Point]) {
    let mut it = points.iter();
    if let Some(p) = it.next() {
        path.move_to((p.x, p.y));
        for p in it {
            path.line_to((p.x, p.y));
        }
    }
}

fn draw_shape(canvas: &skia::Canvas, shape: &Shape, fill: Option<Rgba>, stroke: Option<Rgba>, stroke_width: f32, opacity: f32) {
    let fill_paint = fill.map(|c| {
        let mut p = skia::Paint::default();
        p.set_anti_alias(true);
        p.set_style(skia::paint::Style::Fill);
        p.set_color(color(c, opacity));
        p
    });
    let stroke_paint = stroke.map(|c| {
        let mut p = skia::Paint::default();
        p.set_anti_alias(true);
        p.set_style(skia::paint::Style::Stroke);
        p.set_stroke_width(stroke_width);
        p.set_color(color(c, opacity));
        p
    });

    match shape {
        Shape::Rect { x, y, width, height } => {
            let rect = skia::Rect::from_xywh(*x, *y, *width, *height).sorted();
            for paint in fill_paint.iter().chain(stroke_paint.iter()) {
                canvas.draw_rect(rect, paint);
            }
        }
        Shape::Circle { cx, cy, r } => {
            for paint in fill_paint.iter().chain(stroke_paint.iter()) {
                canvas.draw_circle((*cx, *cy), *r, paint);
            }
        }
        Shape::Line { points } => {
            if points.len() < 2 {
                return;
            }
            let mut path = skia::Path::new();
            polyline(&mut path, points);
            // open paths are stroked only
            if let Some(paint) = &stroke_paint {
                canvas.draw_path(&path, paint);
            }
        }
        Shape::Area { upper, lower } => {
            if upper.is_empty() {
                return;
            }
            let mut path = skia::Path::new();
            polyline(&mut path, upper);
            for p in lower.iter().rev() {
                path.line_to((p.x, p.y));
            }
            path.close();
            for paint in fill_paint.iter().chain(stroke_paint.iter()) {
                canvas.draw_path(&path, paint);
            }
        }
        Shape::Region { rings } => {
            let mut path = skia::Path::new();
            path.set_fill_type(skia::PathFillType::EvenOdd);
            for ring in rings.iter().filter(|r| r.len() >= 3) {
                polyline(&mut path, ring);
                path.close();
            }
            for paint in fill_paint.iter().chain(stroke_paint.iter()) {
                canvas.draw_path(&path, paint);
            }
        }
    }
}

fn draw_grid(canvas: &skia::Canvas, frame: &Frame, axis: &AxisGuide, theme: &Theme) {
    if !axis.grid {
        return;
    }
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);
    let plot = &frame.plot;
    for tick in &axis.ticks {
        match axis.orientation {
            Orientation::Bottom => canvas.draw_line((tick.position, plot.top), (tick.position, plot.bottom), &paint),
            Orientation::Left => canvas.draw_line((plot.left, tick.position), (plot.right, tick.position), &paint),
        };
    }
}

const TICK_LEN: f32 = 6.0;

fn draw_axis(canvas: &skia::Canvas, frame: &Frame, axis: &AxisGuide, opts: &RenderOptions, shaper: Option<&TextShaper>) {
    let theme = &opts.theme;
    let mut line = skia::Paint::default();
    line.set_color(theme.axis_line);
    line.set_anti_alias(true);
    line.set_stroke_width(1.0);
    let mut tick_paint = line.clone();
    tick_paint.set_color(theme.tick);

    let plot = &frame.plot;
    let size = opts.font_size;
    match axis.orientation {
        Orientation::Bottom => {
            let y = axis.offset;
            canvas.draw_line((plot.left, y), (plot.right, y), &line);
            for tick in &axis.ticks {
                canvas.draw_line((tick.position, y), (tick.position, y + TICK_LEN), &tick_paint);
                if let Some(s) = shaper {
                    s.draw(canvas, &tick.label, tick.position, y + TICK_LEN + size + 2.0, size, theme.axis_label, Align::Center);
                }
            }
            if let Some(s) = shaper.filter(|_| !axis.label.is_empty()) {
                let cx = (plot.left + plot.right) / 2.0;
                s.draw(canvas, &axis.label, cx, y + TICK_LEN + size * 3.5, size * 1.2, theme.axis_label, Align::Center);
            }
        }
        Orientation::Left => {
            let x = axis.offset;
            canvas.draw_line((x, plot.top), (x, plot.bottom), &line);
            for tick in &axis.ticks {
                canvas.draw_line((x - TICK_LEN, tick.position), (x, tick.position), &tick_paint);
                if let Some(s) = shaper {
                    s.draw(canvas, &tick.label, x - TICK_LEN - 3.0, tick.position + size * 0.35, size, theme.axis_label, Align::Right);
                }
            }
            if let Some(s) = shaper.filter(|_| !axis.label.is_empty()) {
                s.draw(canvas, &axis.label, x, plot.top - size, size * 1.2, theme.axis_label, Align::Center);
            }
        }
    }
}

fn draw_overlay(canvas: &skia::Canvas, overlay: &OverlayFrame, frame: &Frame, opts: &RenderOptions, shaper: Option<&TextShaper>) {
    if let Some(guide) = &overlay.guide {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Stroke);
        paint.set_stroke_width(1.0);
        paint.set_color(opts.theme.guide);
        paint.set_path_effect(skia::PathEffect::dash(&[4.0, 4.0], 0.0));
        canvas.draw_line((guide.x, guide.top), (guide.x, guide.bottom), &paint);
    }
    if let (Some(tip), Some(shaper)) = (&overlay.tooltip, shaper) {
        draw_tooltip(canvas, tip, frame, opts, shaper);
    }
}

fn draw_tooltip(canvas: &skia::Canvas, tip: &Tooltip, frame: &Frame, opts: &RenderOptions, shaper: &TextShaper) {
    let size = opts.font_size;
    let line_h = size * 1.4;
    let pad = 6.0;
    let text = tip.text();
    let rows: Vec<&str> = text.lines().collect();
    if rows.is_empty() {
        return;
    }
    let width = rows.iter().map(|r| shaper.measure_width(r, size)).fold(0.0f32, f32::max) + pad * 2.0;
    let height = rows.len() as f32 * line_h + pad * 2.0;

    // keep the box on the surface, flipping to the left of the pointer near the right edge
    let mut left = tip.anchor.x + 12.0;
    if left + width > frame.width as f32 {
        left = tip.anchor.x - 12.0 - width;
    }
    let top = (tip.anchor.y - height / 2.0).clamp(0.0, (frame.height as f32 - height).max(0.0));
    let rect = skia::Rect::from_xywh(left.max(0.0), top, width, height);

    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_color(opts.theme.tooltip_fill);
    canvas.draw_round_rect(rect, 4.0, 4.0, &fill);
    let mut border = fill.clone();
    border.set_style(skia::paint::Style::Stroke);
    border.set_stroke_width(1.0);
    border.set_color(opts.theme.tooltip_border);
    canvas.draw_round_rect(rect, 4.0, 4.0, &border);

    for (i, row) in rows.iter().enumerate() {
        let y = rect.top + pad + line_h * (i as f32 + 0.75);
        shaper.draw(canvas, row, rect.left + pad, y, size, opts.theme.tooltip_text, Align::Left);
    }
}
