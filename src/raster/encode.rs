use std::io::Cursor;

use crate::{
    foundation::core::Rgba8Premul,
    foundation::error::{RadarError, RadarResult},
    raster::PixelGrid,
};

/// Encode a grid as a straight-alpha RGBA PNG.
pub fn encode_png(grid: &PixelGrid) -> RadarResult<Vec<u8>> {
    let bounds = grid.bounds();
    let mut straight = Vec::with_capacity(grid.as_rgba8_premul().len());
    for px in grid.as_rgba8_premul().chunks_exact(4) {
        let c = Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]);
        straight.extend_from_slice(&c.to_straight_rgba());
    }

    let img = image::RgbaImage::from_raw(bounds.width, bounds.height, straight)
        .ok_or_else(|| RadarError::encode(format!("pixel buffer does not match {bounds}")))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| RadarError::encode(format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/encode.rs"]
mod tests;
