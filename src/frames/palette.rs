use std::collections::HashMap;

use crate::{
    foundation::core::Rgba8Premul,
    foundation::error::{RadarError, RadarResult},
};

/// Largest palette an indexed frame can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// Channel step of the web-safe color cube.
const WEB_SAFE_STEP: u8 = 0x33;

/// Fixed, ordered color table shared by every frame of one animation.
///
/// Holds up to 256 entries, at most one of which is fully transparent. Entries are stored
/// premultiplied, so the transparent entry is always `(0, 0, 0, 0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8Premul>,
    transparent: Option<u8>,
}

impl Palette {
    /// Build a palette from opaque colors, optionally appending one transparent entry.
    pub fn new(opaque: &[[u8; 3]], with_transparent: bool) -> RadarResult<Self> {
        let len = opaque.len() + usize::from(with_transparent);
        if opaque.is_empty() {
            return Err(RadarError::validation("palette needs at least one color"));
        }
        if len > MAX_PALETTE_LEN {
            return Err(RadarError::validation(format!(
                "palette has {len} entries, at most {MAX_PALETTE_LEN} are allowed"
            )));
        }

        let mut colors: Vec<Rgba8Premul> = opaque
            .iter()
            .map(|&[r, g, b]| Rgba8Premul::opaque(r, g, b))
            .collect();
        let transparent = if with_transparent {
            colors.push(Rgba8Premul::transparent());
            Some((colors.len() - 1) as u8)
        } else {
            None
        };

        Ok(Self {
            colors,
            transparent,
        })
    }

    /// The 216-color web-safe cube plus one transparent entry (index 216).
    ///
    /// Cube entries are ordered red-major: `index = r * 36 + g * 6 + b` for channel levels
    /// `0..6` in steps of `0x33`.
    pub fn web_safe() -> Self {
        let mut colors = Vec::with_capacity(6 * 6 * 6 + 1);
        for r in 0..6u8 {
            for g in 0..6u8 {
                for b in 0..6u8 {
                    colors.push(Rgba8Premul::opaque(
                        r * WEB_SAFE_STEP,
                        g * WEB_SAFE_STEP,
                        b * WEB_SAFE_STEP,
                    ));
                }
            }
        }
        colors.push(Rgba8Premul::transparent());
        let transparent = Some((colors.len() - 1) as u8);
        Self {
            colors,
            transparent,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba8Premul] {
        &self.colors
    }

    /// Index of the fully transparent entry, if the palette has one.
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent
    }

    pub fn color(&self, index: u8) -> Option<Rgba8Premul> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Nearest entry by squared distance over premultiplied RGBA.
    ///
    /// Ties go to the lowest index. Fully transparent pixels map straight to the transparent
    /// entry when there is one; any pixel with coverage only ever maps to an opaque entry.
    pub fn nearest(&self, px: Rgba8Premul) -> u8 {
        if px.a == 0
            && let Some(t) = self.transparent
        {
            return t;
        }

        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            if self.transparent == Some(i as u8) {
                continue;
            }
            let dist = sq_dist(px, *c);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    /// Flat `r, g, b` triples in straight alpha, as a GIF color table expects.
    pub fn to_rgb_table(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            let [r, g, b, _] = c.to_straight_rgba();
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }
}

fn sq_dist(a: Rgba8Premul, b: Rgba8Premul) -> u32 {
    let d = |x: u8, y: u8| {
        let v = i32::from(x) - i32::from(y);
        (v * v) as u32
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b) + d(a.a, b.a)
}

/// Memoizing nearest-color lookup for a single frame build.
pub(crate) struct Quantizer<'a> {
    palette: &'a Palette,
    memo: HashMap<Rgba8Premul, u8>,
}

impl<'a> Quantizer<'a> {
    pub(crate) fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            memo: HashMap::new(),
        }
    }

    pub(crate) fn index_of(&mut self, px: Rgba8Premul) -> u8 {
        let palette = self.palette;
        *self.memo.entry(px).or_insert_with(|| palette.nearest(px))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/palette.rs"]
mod tests;
