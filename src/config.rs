use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{
    encode::animation::{DEFAULT_FRAME_DELAY_CS, LoopCount},
    foundation::error::{RadarError, RadarResult},
    select::sweeps::DEFAULT_FRAME_COUNT,
};

/// Remote directory holding the static map overlays.
pub const DEFAULT_OVERLAY_DIR: &str = "anon/gen/radar_transparencies";
/// Remote directory holding the timestamped radar sweeps.
pub const DEFAULT_SWEEP_DIR: &str = "anon/gen/radar";

/// Everything one animation build needs to know.
///
/// Each build gets its own config; nothing here is shared process state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildConfig {
    /// Product id selecting the overlay family (e.g. `IDR713`).
    pub overlay_product: String,
    /// Product id selecting the sweep family (e.g. `IDR71B`).
    pub sweep_product: String,
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: String,
    #[serde(default = "default_sweep_dir")]
    pub sweep_dir: String,
    /// Overlay layers, bottom first. The first layer is the opaque background.
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,
    /// How many of the most recent sweeps become frames.
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    /// Per-frame display time in hundredths of a second.
    #[serde(default = "default_frame_delay_cs")]
    pub frame_delay_cs: u16,
    /// `0` loops forever.
    #[serde(default)]
    pub loop_count: LoopCount,
    /// Log listings, selections, and byte counts at `info` instead of `debug`.
    #[serde(default)]
    pub verbose: bool,
    /// Write overlays, the base canvas, and the GIF to the staging sink.
    #[serde(default)]
    pub stage_intermediates: bool,
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

fn default_overlay_dir() -> String {
    DEFAULT_OVERLAY_DIR.to_string()
}

fn default_sweep_dir() -> String {
    DEFAULT_SWEEP_DIR.to_string()
}

fn default_layers() -> Vec<String> {
    ["background", "catchments", "waterways", "locations"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_frame_count() -> usize {
    DEFAULT_FRAME_COUNT
}

fn default_frame_delay_cs() -> u16 {
    DEFAULT_FRAME_DELAY_CS
}

impl BuildConfig {
    /// Config with default directories, layers, and timing for the two product ids.
    pub fn new(overlay_product: impl Into<String>, sweep_product: impl Into<String>) -> Self {
        Self {
            overlay_product: overlay_product.into(),
            sweep_product: sweep_product.into(),
            overlay_dir: default_overlay_dir(),
            sweep_dir: default_sweep_dir(),
            layers: default_layers(),
            frame_count: default_frame_count(),
            frame_delay_cs: default_frame_delay_cs(),
            loop_count: LoopCount::default(),
            verbose: false,
            stage_intermediates: false,
            staging_dir: None,
        }
    }

    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RadarResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RadarError::validation(format!("parse build config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RadarResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RadarError::validation(format!("open build config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> RadarResult<()> {
        if self.overlay_product.trim().is_empty() {
            return Err(RadarError::validation("overlay_product must be non-empty"));
        }
        if self.sweep_product.trim().is_empty() {
            return Err(RadarError::validation("sweep_product must be non-empty"));
        }
        if self.layers.is_empty() {
            return Err(RadarError::validation(
                "layers must name at least the background layer",
            ));
        }
        if let Some(bad) = self.layers.iter().find(|l| l.trim().is_empty()) {
            return Err(RadarError::validation(format!(
                "layer names must be non-empty, got '{bad}'"
            )));
        }
        if self.frame_count == 0 {
            return Err(RadarError::validation("frame_count must be > 0"));
        }
        if self.stage_intermediates && self.staging_dir.is_none() {
            return Err(RadarError::validation(
                "stage_intermediates requires staging_dir",
            ));
        }
        Ok(())
    }

    /// File name of one overlay layer: `{overlay_product}.{layer}.png`.
    pub fn overlay_file_name(&self, layer: &str) -> String {
        format!("{}.{layer}.png", self.overlay_product)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
