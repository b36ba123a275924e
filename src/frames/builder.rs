use std::sync::Arc;

use crate::{
    foundation::error::RadarResult,
    frames::indexed::IndexedCanvas,
    frames::palette::{Palette, Quantizer},
    raster::{PixelGrid, RgbaCanvas},
};

/// Turns one decoded radar sweep into one palette-bound animation frame.
///
/// The builder only holds the shared, read-only palette. Every call gets its own indexed
/// canvas and its own quantization memo, so frames can be built independently.
#[derive(Clone, Debug)]
pub struct PalettedFrameBuilder {
    palette: Arc<Palette>,
}

impl Default for PalettedFrameBuilder {
    fn default() -> Self {
        Self::new(Arc::new(Palette::web_safe()))
    }
}

impl PalettedFrameBuilder {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    /// Draw `base` (replace) then `sweep` (over) onto a fresh indexed canvas.
    pub fn build_frame(&self, base: &RgbaCanvas, sweep: &PixelGrid) -> RadarResult<IndexedCanvas> {
        base.bounds().ensure_same(sweep.bounds(), "sweep")?;

        let mut quantizer = Quantizer::new(&self.palette);
        let mut canvas = IndexedCanvas::new(base.bounds(), Arc::clone(&self.palette));
        canvas.draw_src(base, &mut quantizer)?;
        canvas.draw_over(sweep, &mut quantizer)?;
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/builder.rs"]
mod tests;
