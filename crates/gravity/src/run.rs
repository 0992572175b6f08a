use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use renderer::{
    using, AssetDir, AssetSource, FrameOutcome, FrameSurface, SceneAssets, SceneRenderer,
};
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;
use crate::stats::FrameStats;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Directory holding the bundled shaders, textures and optional config.
pub fn asset_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

pub fn run() -> Result<()> {
    let dir = AssetDir::new(asset_root());
    let config = DemoConfig::load_from_dir(dir.root()).with_context(|| {
        format!("failed to load configuration from {}", dir.root().display())
    })?;
    tracing::debug!(?config, "configuration resolved");

    let assets: Rc<dyn AssetSource> = Rc::new(dir);
    let names = config.scene_assets();
    let mut surface = FrameSurface::new(config.surface());

    let stats = using(&mut surface, |surface| render_scene(surface, assets, &names))
        .context("gravity demo failed")?;

    tracing::info!(
        frames = stats.drawn(),
        skipped = stats.skipped(),
        seconds = format_args!("{:.1}", stats.total().as_secs_f64()),
        fps = format_args!("{:.1}", stats.average_fps()),
        "window closed"
    );
    Ok(())
}

fn render_scene(
    surface: &mut FrameSurface,
    assets: Rc<dyn AssetSource>,
    names: &SceneAssets,
) -> Result<FrameStats> {
    let gl = surface.gl()?;
    tracing::debug!(window = ?surface.config(), "surface ready");
    let mut renderer = SceneRenderer::new(gl, assets, names);

    using(&mut renderer, |renderer| {
        let mut stats = FrameStats::new();
        while !surface.should_close() {
            let frame_start = Instant::now();
            surface.begin_frame();
            let outcome = renderer
                .render(surface.width(), surface.height())
                .context("failed to render frame")?;
            surface.end_frame().context("failed to present frame")?;

            if let Some(report) = stats.record(outcome == FrameOutcome::Drawn, frame_start.elapsed())
            {
                let frame_ms = if report.fps > 0.0 { 1_000.0 / report.fps } else { 0.0 };
                tracing::debug!(
                    frames = report.frames,
                    fps = format_args!("{:.1}", report.fps),
                    frame_ms = format_args!("{frame_ms:.2}"),
                    slowest_ms = format_args!("{:.2}", report.slowest.as_secs_f64() * 1_000.0),
                    "frame summary"
                );
            }
        }
        Ok(stats)
    })
}
