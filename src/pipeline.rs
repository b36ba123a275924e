use std::sync::Arc;

use crate::{
    composite::layers::{OverlayLayer, composite_layers},
    config::BuildConfig,
    encode::animation::Animation,
    foundation::core::Bounds,
    foundation::error::{RadarError, RadarResult},
    frames::builder::PalettedFrameBuilder,
    frames::palette::Palette,
    raster::{PixelGrid, RgbaCanvas, decode::decode_raster, encode::encode_png},
    select::sweeps::select_sweeps,
    source::AssetSource,
    source::staging::{StagingSink, stage_best_effort},
};

/// Label under which the composited base canvas is staged.
pub const BASE_IMAGE_LABEL: &str = "base_image.png";
/// Label under which the finished animation is staged.
pub const LOOP_GIF_LABEL: &str = "radar_loop.gif";

/// Result of one build.
#[derive(Clone, Debug)]
pub struct BuildOutput {
    /// Complete animated GIF.
    pub gif: Vec<u8>,
    /// Frame bounds shared by every layer, sweep, and frame.
    pub bounds: Bounds,
    /// Sweep file names used, oldest first (one per frame).
    pub sweeps: Vec<String>,
}

macro_rules! diag {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Build one radar loop animation.
///
/// 1. Fetch and decode every overlay layer in configured order, then composite them into the
///    base canvas.
/// 2. List the sweep directory and select the most recent `frame_count` sweeps.
/// 3. For each sweep in time order: fetch, decode, and stamp it over the base into an indexed
///    frame on the shared web-safe palette.
/// 4. Encode the frames as a GIF.
///
/// Any failure aborts the build. Staging (when enabled) is best-effort.
#[tracing::instrument(
    skip(cfg, source, staging),
    fields(overlay = %cfg.overlay_product, sweep = %cfg.sweep_product)
)]
pub fn build_animation(
    cfg: &BuildConfig,
    source: &mut dyn AssetSource,
    staging: &mut dyn StagingSink,
) -> RadarResult<BuildOutput> {
    cfg.validate()?;

    let base = build_base_canvas(cfg, source, staging)?;
    let bounds = base.bounds();
    tracing::info!(%bounds, layers = cfg.layers.len(), "composited base canvas");

    let names = source
        .list_names(&cfg.sweep_dir)
        .map_err(|e| e.for_asset(&cfg.sweep_dir))?;
    diag!(cfg.verbose, dir = %cfg.sweep_dir, names = ?names, "listed sweep directory");

    let sweeps = select_sweeps(&names, &cfg.sweep_product, cfg.frame_count);
    if sweeps.is_empty() {
        return Err(RadarError::selection(format!(
            "no sweeps matching '{}' in '{}'",
            cfg.sweep_product, cfg.sweep_dir
        )));
    }
    diag!(cfg.verbose, selected = ?sweeps, "selected sweeps");

    let builder = PalettedFrameBuilder::new(Arc::new(Palette::web_safe()));
    let mut animation = Animation::new(cfg.loop_count);
    for name in &sweeps {
        let bytes = source
            .fetch_bytes(&cfg.sweep_dir, name)
            .map_err(|e| e.for_asset(name))?;
        diag!(cfg.verbose, sweep = %name, bytes = bytes.len(), "fetched sweep");

        let grid = decode_raster(&bytes).map_err(|e| e.for_asset(name))?;
        let frame = builder
            .build_frame(&base, &grid)
            .map_err(|e| e.for_asset(name))?;
        animation.push(frame, cfg.frame_delay_cs);
    }

    let gif = animation.encode_gif()?;
    tracing::info!(
        frames = animation.len(),
        bytes = gif.len(),
        "encoded radar loop"
    );

    if cfg.stage_intermediates {
        stage_best_effort(staging, LOOP_GIF_LABEL, &gif);
    }

    Ok(BuildOutput {
        gif,
        bounds,
        sweeps,
    })
}

/// Fetch, decode, and composite the configured overlay layers.
pub fn build_base_canvas(
    cfg: &BuildConfig,
    source: &mut dyn AssetSource,
    staging: &mut dyn StagingSink,
) -> RadarResult<RgbaCanvas> {
    let mut layers = Vec::with_capacity(cfg.layers.len());
    for layer in &cfg.layers {
        let file_name = cfg.overlay_file_name(layer);
        let bytes = source
            .fetch_bytes(&cfg.overlay_dir, &file_name)
            .map_err(|e| e.for_asset(&file_name))?;
        diag!(cfg.verbose, layer = %layer, bytes = bytes.len(), "fetched overlay");

        let grid = decode_raster(&bytes).map_err(|e| e.for_asset(&file_name))?;
        if cfg.stage_intermediates {
            stage_png(staging, &format!("{layer}_image.png"), &grid);
        }
        layers.push(OverlayLayer::new(layer.clone(), grid));
    }

    let base = composite_layers(&layers)?;
    if cfg.stage_intermediates {
        stage_png(staging, BASE_IMAGE_LABEL, &base.to_grid());
    }
    Ok(base)
}

fn stage_png(staging: &mut dyn StagingSink, label: &str, grid: &PixelGrid) {
    match encode_png(grid) {
        Ok(png) => stage_best_effort(staging, label, &png),
        Err(e) => tracing::warn!(label, error = %e, "failed to encode intermediate png"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
