use crate::foundation::error::{RadarError, RadarResult};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "over" on premultiplied pixels: `out = src + dst * (1 - src_a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = src[i].saturating_add(dc);
    }
    out
}

/// Replace every destination pixel with the source ("source" operator).
pub fn src_in_place(dst: &mut [u8], src: &[u8]) -> RadarResult<()> {
    check_buffers(dst, src, "src_in_place")?;
    dst.copy_from_slice(src);
    Ok(())
}

/// Alpha-composite `src` onto `dst`, pixel by pixel.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> RadarResult<()> {
    check_buffers(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn check_buffers(dst: &[u8], src: &[u8], op: &str) -> RadarResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RadarError::dimension_mismatch(format!(
            "{op} expects equal-length rgba8 buffers, got {} and {} bytes",
            dst.len(),
            src.len()
        )));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
