//! radarloop turns a series of weather-radar sweeps into one looping animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Composite**: fetch the static map overlays (background, boundaries, waterways, place
//!    names) and stack them into one true-color base canvas ([`composite_layers`]).
//! 2. **Select**: pick the most recent sweeps from a directory listing, ordered by the numeric
//!    token embedded in each file name ([`select_sweeps`]).
//! 3. **Build frames**: stamp each sweep over the base onto an indexed canvas bound to the
//!    shared web-safe palette ([`PalettedFrameBuilder`]).
//! 4. **Encode**: serialize the frames, their delays, and the loop count as a GIF
//!    ([`Animation::encode_gif`]).
//!
//! [`build_animation`] runs all four steps for one [`BuildConfig`]. Fetching bytes and writing
//! diagnostics go through the [`AssetSource`] and [`StagingSink`] traits; the core does no IO
//! of its own.
//!
//! [`serve()`] exposes the same build over HTTP: every `GET /` runs one fresh build and answers
//! with the GIF.
//!
//! Pixels are premultiplied RGBA8 end-to-end until quantization.
#![forbid(unsafe_code)]

mod composite;
mod config;
mod encode;
mod foundation;
mod frames;
mod pipeline;
mod raster;
mod select;
mod serve;
mod source;

pub use composite::blend::{over, over_in_place, src_in_place};
pub use composite::layers::{OverlayLayer, composite_layers};
pub use config::{BuildConfig, DEFAULT_OVERLAY_DIR, DEFAULT_SWEEP_DIR};
pub use encode::animation::{Animation, DEFAULT_FRAME_DELAY_CS, Frame, LoopCount};
pub use foundation::core::{Bounds, Rgba8Premul};
pub use foundation::error::{RadarError, RadarResult};
pub use frames::builder::PalettedFrameBuilder;
pub use frames::indexed::IndexedCanvas;
pub use frames::palette::{MAX_PALETTE_LEN, Palette};
pub use pipeline::{
    BASE_IMAGE_LABEL, BuildOutput, LOOP_GIF_LABEL, build_animation, build_base_canvas,
};
pub use raster::decode::decode_raster;
pub use raster::encode::encode_png;
pub use raster::{PixelGrid, RgbaCanvas};
pub use select::sweeps::{DEFAULT_FRAME_COUNT, NAME_DELIMITER, select_sweeps, sweep_sort_key};
pub use serve::{
    DEFAULT_SERVE_ADDR, SHUTDOWN_GRACE, ServeConfig, router, serve, shutdown_signal,
};
pub use source::AssetSource;
pub use source::dir::{DirSource, normalize_rel_path};
pub use source::memory::InMemorySource;
pub use source::staging::{DirStagingSink, NullStaging, StagingSink};
