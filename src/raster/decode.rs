use crate::{
    foundation::core::{Bounds, premul},
    foundation::error::{RadarError, RadarResult},
    raster::PixelGrid,
};

/// Decode encoded raster bytes (PNG, GIF, ...) into premultiplied RGBA8.
///
/// Unrecognized, truncated, or empty images fail with [`RadarError::Decode`].
pub fn decode_raster(bytes: &[u8]) -> RadarResult<PixelGrid> {
    if bytes.is_empty() {
        return Err(RadarError::decode("no bytes to decode"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RadarError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let bounds = Bounds::new(width, height);
    if bounds.is_empty() {
        return Err(RadarError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PixelGrid::from_rgba8_premul(bounds, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = premul(px[0], a);
        px[1] = premul(px[1], a);
        px[2] = premul(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
