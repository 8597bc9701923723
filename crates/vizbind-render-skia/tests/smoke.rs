// File: crates/vizbind-render-skia/tests/smoke.rs
// Purpose: Engine frames render to PNG and RGBA through the Skia target.

use std::time::Duration;

use vizbind_core::mark::Attributes;
use vizbind_core::{
    ChartConfig, ChartData, ChartEngine, ChartKind, Dataset, DomainPolicy, ElementKey, Field, FieldValue, Frame, Insets,
    Mark, PlotRect, PointerEvent, Point, Rgba, Shape,
};
use vizbind_render_skia::{render_png_bytes, render_rgba8, RenderOptions, SkiaTarget};

fn engine() -> ChartEngine {
    let cfg = ChartConfig::new(ChartKind::Scatter {
        key: "Years".into(),
        x: "Years".into(),
        y: "Rate".into(),
        x_domain: DomainPolicy::Fixed { min: 2000.0, max: 2004.0 },
        y_domain: DomainPolicy::Fixed { min: 0.0, max: 10.0 },
        radius: 6.0,
        color: Rgba::rgb(0, 128, 0),
    });
    let mut engine = ChartEngine::new(cfg).unwrap();
    let load = || -> vizbind_core::Result<ChartData> {
        let rows = [(2000.0, 3.0), (2001.0, 5.0), (2002.0, 4.0), (2003.0, 8.0), (2004.0, 6.5)];
        let ds = Dataset::from_rows(
            vec![Field::numeric("Years"), Field::numeric("Rate")],
            rows.iter().map(|(y, r)| vec![FieldValue::Number(*y), FieldValue::Number(*r)]).collect(),
        )?;
        Ok(ChartData::Table(ds))
    };
    engine.load_with(&load, Duration::ZERO).unwrap();
    engine
}

#[test]
fn render_smoke_png() {
    let mut engine = engine();
    engine.handle_pointer(PointerEvent::Move(Point::new(100.0, 365.0)));
    let mut target = SkiaTarget::new(RenderOptions::default());
    engine.render_to(&mut target, Duration::from_secs(2)).expect("render should succeed");
    assert!(target.png().starts_with(&[137, 80, 78, 71]), "should be PNG header");
    assert_eq!(target.frames(), 1);

    let out = std::path::PathBuf::from("target/test_out/scatter.png");
    target.save(&out).expect("save png");
    assert!(std::fs::metadata(&out).expect("output exists").len() > 0);
}

#[test]
fn render_rgba8_pixels() {
    let plot = PlotRect::from_surface(40, 40, &Insets::new(0, 0, 0, 0));
    let red = Rgba::rgb(255, 0, 0);
    let frame = Frame {
        width: 40,
        height: 40,
        plot,
        marks: vec![Mark {
            layer: 0,
            key: ElementKey::Int(1),
            attributes: Attributes::new(Shape::Rect { x: 10.0, y: 10.0, width: 20.0, height: 20.0 }).fill(red),
        }],
        axes: Vec::new(),
        overlay: None,
        clip: None,
    };
    let opts = RenderOptions { draw_labels: false, ..RenderOptions::default() };
    let (px, w, h, stride) = render_rgba8(&frame, &opts).expect("rgba render");
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, w as usize * 4);

    let at = |x: usize, y: usize| &px[y * stride + x * 4..y * stride + x * 4 + 4];
    assert_eq!(at(2, 2), &[255, 255, 255, 255]);
    assert_eq!(at(20, 20), &[255, 0, 0, 255]);
}

#[test]
fn marks_are_clipped_to_the_plot() {
    let plot = PlotRect::from_surface(40, 40, &Insets::new(10, 10, 10, 10));
    let red = Rgba::rgb(255, 0, 0);
    let frame = Frame {
        width: 40,
        height: 40,
        plot,
        marks: vec![Mark {
            layer: 0,
            key: ElementKey::Int(1),
            attributes: Attributes::new(Shape::Rect { x: 0.0, y: 0.0, width: 40.0, height: 40.0 }).fill(red),
        }],
        axes: Vec::new(),
        overlay: None,
        clip: Some(plot),
    };
    let opts = RenderOptions { draw_labels: false, ..RenderOptions::default() };
    let (px, _, _, stride) = render_rgba8(&frame, &opts).expect("rgba render");
    let at = |x: usize, y: usize| &px[y * stride + x * 4..y * stride + x * 4 + 4];
    assert_eq!(at(2, 2), &[255, 255, 255, 255]);
    assert_eq!(at(20, 20), &[255, 0, 0, 255]);
    assert_eq!(at(35, 20), &[255, 255, 255, 255]);
}

#[test]
fn empty_frame_is_an_error() {
    let frame = Frame {
        width: 0,
        height: 10,
        plot: PlotRect::from_surface(0, 10, &Insets::new(0, 0, 0, 0)),
        marks: Vec::new(),
        axes: Vec::new(),
        overlay: None,
        clip: None,
    };
    assert!(render_png_bytes(&frame, &RenderOptions::default()).is_err());
}
