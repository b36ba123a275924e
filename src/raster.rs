use crate::foundation::core::{Bounds, Rgba8Premul};
use crate::foundation::error::{RadarError, RadarResult};

pub(crate) mod decode;
pub(crate) mod encode;

/// Decoded true-color raster in premultiplied RGBA8.
///
/// Produced once per decode and never mutated afterwards. Alpha is carried through untouched;
/// radar sweeps and map overlays give it different meaning, the grid does not care.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    bounds: Bounds,
    /// Row-major, tightly packed.
    rgba8_premul: Vec<u8>,
}

impl PixelGrid {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_rgba8_premul(bounds: Bounds, rgba8_premul: Vec<u8>) -> RadarResult<Self> {
        if rgba8_premul.len() != bounds.pixel_count() * 4 {
            return Err(RadarError::dimension_mismatch(format!(
                "pixel buffer holds {} bytes, {bounds} rgba8 needs {}",
                rgba8_premul.len(),
                bounds.pixel_count() * 4
            )));
        }
        Ok(Self {
            bounds,
            rgba8_premul,
        })
    }

    /// Build a grid where every pixel has the same color.
    pub fn filled(bounds: Bounds, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut rgba8_premul = Vec::with_capacity(bounds.pixel_count() * 4);
        for _ in 0..bounds.pixel_count() {
            rgba8_premul.extend_from_slice(&px);
        }
        Self {
            bounds,
            rgba8_premul,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn as_rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Pixel at `(x, y)`, or `None` outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        pixel_at(self.bounds, &self.rgba8_premul, x, y)
    }
}

/// Mutable true-color compositing target.
///
/// Once the overlay stack has been composited the canvas is only read, once per animation
/// frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaCanvas {
    bounds: Bounds,
    rgba8_premul: Vec<u8>,
}

impl RgbaCanvas {
    /// Fully transparent canvas.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            rgba8_premul: vec![0u8; bounds.pixel_count() * 4],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn as_rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        pixel_at(self.bounds, &self.rgba8_premul, x, y)
    }

    pub(crate) fn as_rgba8_premul_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8_premul
    }

    /// Copy the canvas out as an immutable grid, e.g. for staging.
    pub fn to_grid(&self) -> PixelGrid {
        PixelGrid {
            bounds: self.bounds,
            rgba8_premul: self.rgba8_premul.clone(),
        }
    }
}

fn pixel_at(bounds: Bounds, data: &[u8], x: u32, y: u32) -> Option<Rgba8Premul> {
    if x >= bounds.width || y >= bounds.height {
        return None;
    }
    let i = ((y as usize) * (bounds.width as usize) + (x as usize)) * 4;
    Some(Rgba8Premul::from_array([
        data[i],
        data[i + 1],
        data[i + 2],
        data[i + 3],
    ]))
}

#[cfg(test)]
#[path = "../tests/unit/raster/grid.rs"]
mod tests;
