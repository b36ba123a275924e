use std::sync::Arc;

use crate::{
    composite::blend::over,
    foundation::core::{Bounds, Rgba8Premul},
    foundation::error::RadarResult,
    frames::palette::{Palette, Quantizer},
    raster::{PixelGrid, RgbaCanvas},
};

/// Palette-bound canvas: one palette index per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedCanvas {
    bounds: Bounds,
    palette: Arc<Palette>,
    /// Row-major palette indices.
    indices: Vec<u8>,
}

impl IndexedCanvas {
    /// Canvas filled with the palette's transparent entry (or entry 0 without one).
    pub fn new(bounds: Bounds, palette: Arc<Palette>) -> Self {
        let fill = palette.transparent_index().unwrap_or(0);
        Self {
            bounds,
            indices: vec![fill; bounds.pixel_count()],
            palette,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Palette index at `(x, y)`, or `None` outside the canvas.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        self.indices
            .get((y as usize) * (self.bounds.width as usize) + (x as usize))
            .copied()
    }

    /// Resolved color at `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        self.index_at(x, y).and_then(|i| self.palette.color(i))
    }

    /// Replace every pixel with the nearest palette entry of `src`.
    pub(crate) fn draw_src(&mut self, src: &RgbaCanvas, q: &mut Quantizer<'_>) -> RadarResult<()> {
        self.bounds.ensure_same(src.bounds(), "base canvas")?;
        for (dst, px) in self
            .indices
            .iter_mut()
            .zip(src.as_rgba8_premul().chunks_exact(4))
        {
            *dst = q.index_of(Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]));
        }
        Ok(())
    }

    /// Composite `src` over the current palette colors, re-quantizing each touched pixel.
    ///
    /// Pixels where `src` is fully transparent keep their index untouched.
    pub(crate) fn draw_over(&mut self, src: &PixelGrid, q: &mut Quantizer<'_>) -> RadarResult<()> {
        self.bounds.ensure_same(src.bounds(), "sweep")?;
        for (dst, px) in self
            .indices
            .iter_mut()
            .zip(src.as_rgba8_premul().chunks_exact(4))
        {
            if px[3] == 0 {
                continue;
            }
            let under = self
                .palette
                .color(*dst)
                .unwrap_or_else(Rgba8Premul::transparent)
                .to_array();
            let blended = over(under, [px[0], px[1], px[2], px[3]]);
            *dst = q.index_of(Rgba8Premul::from_array(blended));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/indexed.rs"]
mod tests;
