use crate::{
    composite::blend::{over_in_place, src_in_place},
    foundation::error::{RadarError, RadarResult},
    raster::{PixelGrid, RgbaCanvas},
};

/// One decoded static overlay, named after the layer it came from.
#[derive(Clone, Debug)]
pub struct OverlayLayer {
    /// Layer name (e.g. `background`, `waterways`).
    pub name: String,
    /// Decoded pixels.
    pub grid: PixelGrid,
}

impl OverlayLayer {
    pub fn new(name: impl Into<String>, grid: PixelGrid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }
}

impl RgbaCanvas {
    /// Replace the canvas contents with `src`.
    pub fn draw_src(&mut self, src: &PixelGrid) -> RadarResult<()> {
        self.bounds().ensure_same(src.bounds(), "source grid")?;
        src_in_place(self.as_rgba8_premul_mut(), src.as_rgba8_premul())
    }

    /// Alpha-composite `src` over the canvas.
    pub fn draw_over(&mut self, src: &PixelGrid) -> RadarResult<()> {
        self.bounds().ensure_same(src.bounds(), "source grid")?;
        over_in_place(self.as_rgba8_premul_mut(), src.as_rgba8_premul())
    }
}

/// Composite an ordered overlay stack into one true-color base canvas.
///
/// The first layer replaces the (transparent) canvas outright; every later layer is drawn
/// "over" the accumulated result, in the order supplied. All layers must share the first
/// layer's bounds.
pub fn composite_layers(layers: &[OverlayLayer]) -> RadarResult<RgbaCanvas> {
    let (first, rest) = layers
        .split_first()
        .ok_or_else(|| RadarError::validation("at least one overlay layer is required"))?;

    let mut canvas = RgbaCanvas::new(first.grid.bounds());
    canvas.draw_src(&first.grid)?;

    for layer in rest {
        canvas
            .bounds()
            .ensure_same(layer.grid.bounds(), &format!("layer '{}'", layer.name))?;
        canvas.draw_over(&layer.grid)?;
    }

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/layers.rs"]
mod tests;
