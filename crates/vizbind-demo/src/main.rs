// File: crates/vizbind-demo/src/main.rs
// Summary: Drives each bundled chart through load, hover, control events and reload, writing PNGs per step.

mod console;
mod sources;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use vizbind_core::{
    ChartConfig, ChartEngine, ChartKind, ControlEvent, DataLoader, LoadOutcome, Point, PointerEvent, Shape,
};
use vizbind_render_skia::{RenderOptions, SkiaTarget};

use console::ConsoleOverlay;

struct Args {
    variants: Vec<String>,
    data: PathBuf,
    config: Option<PathBuf>,
    out: PathBuf,
    dump_config: bool,
    theme: String,
}

const USAGE: &str = "usage: vizbind-demo [VARIANT|all] [--data DIR] [--config FILE.toml] [--out DIR] [--theme light|dark] [--dump-config]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;

    for variant in &args.variants {
        let cfg = chart_config(variant, args.config.as_deref())?;
        if args.dump_config {
            println!("# {variant}\n{}", toml::to_string_pretty(&cfg)?);
            continue;
        }
        run_variant(variant, cfg, &args).with_context(|| format!("variant '{variant}' failed"))?;
    }
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        variants: Vec::new(),
        data: Path::new(env!("CARGO_MANIFEST_DIR")).join("data"),
        config: None,
        out: PathBuf::from("target/out"),
        dump_config: false,
        theme: "light".to_string(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().with_context(|| format!("{flag} needs a value\n{USAGE}"));
        match arg.as_str() {
            "--data" => args.data = PathBuf::from(value("--data")?),
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--out" => args.out = PathBuf::from(value("--out")?),
            "--theme" => args.theme = value("--theme")?,
            "--dump-config" => args.dump_config = true,
            "-h" | "--help" => {
                println!("{USAGE}\nvariants: {}", ChartConfig::preset_names().join(", "));
                std::process::exit(0);
            }
            "all" => args.variants.extend(ChartConfig::preset_names().iter().map(|s| s.to_string())),
            other if other.starts_with("--") => anyhow::bail!("unknown flag {other}\n{USAGE}"),
            other => args.variants.push(other.to_string()),
        }
    }
    if args.config.is_some() && args.variants.len() != 1 {
        anyhow::bail!("--config applies to one chart; name exactly one variant\n{USAGE}");
    }
    if args.variants.is_empty() {
        args.variants.extend(ChartConfig::preset_names().iter().map(|s| s.to_string()));
    }
    Ok(args)
}

/// Built-in preset, or the TOML file when one is given. The file must describe the
/// same kind of chart as the preset, since the variant still picks the sample data.
fn chart_config(variant: &str, file: Option<&Path>) -> Result<ChartConfig> {
    let preset = ChartConfig::preset(variant)
        .with_context(|| format!("unknown variant '{variant}'; expected one of {:?}", ChartConfig::preset_names()))?;
    let Some(path) = file else {
        return Ok(preset);
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read config '{}'", path.display()))?;
    let cfg: ChartConfig =
        toml::from_str(&text).with_context(|| format!("failed to parse config '{}'", path.display()))?;
    if cfg.kind.name() != preset.kind.name() {
        anyhow::bail!(
            "config '{}' describes a {} chart but '{variant}' is a {} chart",
            path.display(),
            cfg.kind.name(),
            preset.kind.name()
        );
    }
    Ok(cfg)
}

fn run_variant(variant: &str, cfg: ChartConfig, args: &Args) -> Result<()> {
    println!("== {variant} ({})", cfg.kind.name());
    let loader = sources::loader_for(variant, &args.data, cfg.parse_policy)
        .with_context(|| format!("no sample data for '{variant}'"))?;
    let settle = Duration::from_millis(cfg.transition_ms);
    let mut engine = ChartEngine::with_loader(cfg, move || loader.load())?;
    let mut target = SkiaTarget::new(RenderOptions {
        theme: vizbind_render_skia::theme::find(&args.theme),
        ..RenderOptions::default()
    });
    let mut overlay = ConsoleOverlay::default();

    // clock advances one transition per step so every frame is settled
    let mut now = Duration::ZERO;
    report(engine.reload(now).context("initial load")?);
    println!("  {} elements in {} layers", engine.element_count(), engine.layers().len());
    now += settle;
    write(&engine, &mut target, now, &args.out, variant, None)?;

    if let Some(p) = hover_target(&engine) {
        engine.handle_pointer(PointerEvent::Enter(p)).apply_to(&mut overlay);
        write(&engine, &mut target, now, &args.out, variant, Some("hover"))?;
        engine.handle_pointer(PointerEvent::Leave).apply_to(&mut overlay);
    }

    match &engine.config().kind {
        ChartKind::GroupedBars { .. } => {
            if let Some(last) = engine.subset_options().last().cloned() {
                println!("  selecting {last}");
                report(engine.handle_control(ControlEvent::SelectSubset(last), now)?);
                now += settle;
                write(&engine, &mut target, now, &args.out, variant, Some("selected"))?;
            }
        }
        ChartKind::Lines { overlay: Some(_), .. } => {
            report(engine.handle_control(ControlEvent::ToggleOverlay, now)?);
            now += settle;
            write(&engine, &mut target, now, &args.out, variant, Some("overlay"))?;
        }
        ChartKind::Streamgraph { .. } if engine.config().zoom.is_some() => {
            let plot = engine.plot();
            let focus = (plot.top + plot.bottom) / 2.0;
            report(engine.handle_control(ControlEvent::ZoomY { factor: 2.0, focus }, now)?);
            write(&engine, &mut target, now, &args.out, variant, Some("zoomed"))?;
            report(engine.handle_control(ControlEvent::ResetZoom, now)?);
        }
        _ => {}
    }

    report(engine.handle_control(ControlEvent::Reload, now)?);
    Ok(())
}

fn report(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Applied { entered, updated, exited } => {
            println!("  pass: {entered} entered, {updated} updated, {exited} exited");
        }
        LoadOutcome::Superseded => println!("  pass superseded"),
    }
}

fn write(engine: &ChartEngine, target: &mut SkiaTarget, at: Duration, out: &Path, variant: &str, suffix: Option<&str>) -> Result<()> {
    engine.render_to(target, at)?;
    let name = match suffix {
        Some(s) => format!("{variant}_{s}.png"),
        None => format!("{variant}.png"),
    };
    let path = out.join(name);
    target.save(&path).with_context(|| format!("failed to write '{}'", path.display()))?;
    println!("  wrote {}", path.display());
    Ok(())
}

/// A point inside the first hoverable mark, for the simulated pointer.
fn hover_target(engine: &ChartEngine) -> Option<Point> {
    engine.commands().find_map(|cmd| match &cmd.attributes.shape {
        Shape::Rect { x, y, width, height } if *width > 0.0 && *height > 0.0 => {
            Some(Point::new(x + width / 2.0, y + height / 2.0))
        }
        Shape::Circle { cx, cy, .. } => Some(Point::new(*cx, *cy)),
        Shape::Area { upper, lower } if !upper.is_empty() && upper.len() == lower.len() => {
            let mid = upper.len() / 2;
            Some(upper[mid].lerp(lower[mid], 0.5))
        }
        Shape::Region { rings } => {
            let ring = rings.first()?;
            let n = ring.len().max(1) as f32;
            let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            Some(Point::new(sx / n, sy / n))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, cfg: &ChartConfig) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vizbind-demo-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, toml::to_string_pretty(cfg).unwrap()).unwrap();
        path
    }

    #[test]
    fn config_file_applies_to_its_own_chart_kind() {
        let mut line = ChartConfig::preset("line").unwrap();
        line.transition_ms = 0;
        let path = write_config("line", &line);

        let cfg = chart_config("line", Some(&path)).unwrap();
        assert_eq!(cfg.transition_ms, 0);
        let err = chart_config("bar-div", Some(&path)).unwrap_err();
        assert!(err.to_string().contains("is a"), "{err}");
        assert!(chart_config("no-such-chart", None).is_err());
        std::fs::remove_file(path).ok();
    }
}
