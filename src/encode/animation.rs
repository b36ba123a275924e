use std::borrow::Cow;

use crate::{
    foundation::core::Bounds,
    foundation::error::{RadarError, RadarResult},
    frames::indexed::IndexedCanvas,
};

/// Default per-frame display time, in hundredths of a second.
pub const DEFAULT_FRAME_DELAY_CS: u16 = 50;

/// How many times the animation repeats.
///
/// Serialized as the GIF application-extension loop field: `0` loops forever, `n` asks the
/// viewer to repeat `n` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum LoopCount {
    /// Loop forever.
    Infinite,
    /// Repeat a fixed number of times.
    Finite(u16),
}

impl Default for LoopCount {
    fn default() -> Self {
        Self::Finite(7)
    }
}

impl From<u16> for LoopCount {
    fn from(n: u16) -> Self {
        if n == 0 { Self::Infinite } else { Self::Finite(n) }
    }
}

impl From<LoopCount> for u16 {
    fn from(l: LoopCount) -> Self {
        match l {
            LoopCount::Infinite => 0,
            LoopCount::Finite(n) => n,
        }
    }
}

impl From<LoopCount> for gif::Repeat {
    fn from(l: LoopCount) -> Self {
        match l {
            LoopCount::Infinite => gif::Repeat::Infinite,
            LoopCount::Finite(n) => gif::Repeat::Finite(n),
        }
    }
}

/// One animation frame: an indexed canvas plus how long to show it.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Frame pixels.
    pub canvas: IndexedCanvas,
    /// Display time in hundredths of a second.
    pub delay_cs: u16,
}

/// Ordered frames plus loop metadata, ready to serialize.
///
/// Frame order is display order; it encodes the temporal order of the radar sweeps and is
/// never changed.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: Vec<Frame>,
    loop_count: LoopCount,
}

impl Animation {
    pub fn new(loop_count: LoopCount) -> Self {
        Self {
            frames: Vec::new(),
            loop_count,
        }
    }

    /// Append a frame at the end of the sequence.
    pub fn push(&mut self, canvas: IndexedCanvas, delay_cs: u16) {
        self.frames.push(Frame { canvas, delay_cs });
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    pub fn delays_cs(&self) -> Vec<u16> {
        self.frames.iter().map(|f| f.delay_cs).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check the invariants the GIF container relies on: at least one frame, and every frame
    /// sharing the first frame's bounds and palette.
    pub fn validate(&self) -> RadarResult<Bounds> {
        let first = self
            .frames
            .first()
            .ok_or_else(|| RadarError::encode("animation has no frames"))?;
        let bounds = first.canvas.bounds();
        if bounds.is_empty() {
            return Err(RadarError::encode("animation frames have zero area"));
        }
        if bounds.width > u32::from(u16::MAX) || bounds.height > u32::from(u16::MAX) {
            return Err(RadarError::encode(format!(
                "{bounds} exceeds the 65535x65535 gif limit"
            )));
        }

        for (i, f) in self.frames.iter().enumerate().skip(1) {
            if f.canvas.bounds() != bounds {
                return Err(RadarError::encode(format!(
                    "frame {i} is {}, expected {bounds}",
                    f.canvas.bounds()
                )));
            }
            if f.canvas.palette() != first.canvas.palette() {
                return Err(RadarError::encode(format!(
                    "frame {i} uses a different palette than frame 0"
                )));
            }
        }
        Ok(bounds)
    }

    /// Serialize as a self-contained animated GIF with one global color table.
    pub fn encode_gif(&self) -> RadarResult<Vec<u8>> {
        let bounds = self.validate()?;
        let palette = self.frames[0].canvas.palette();
        let width = bounds.width as u16;
        let height = bounds.height as u16;

        let mut buf = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut buf, width, height, &palette.to_rgb_table())
                .map_err(|e| RadarError::encode(format!("write gif header: {e}")))?;
            encoder
                .set_repeat(self.loop_count.into())
                .map_err(|e| RadarError::encode(format!("write gif loop extension: {e}")))?;

            for (i, f) in self.frames.iter().enumerate() {
                let frame = gif::Frame {
                    width,
                    height,
                    delay: f.delay_cs,
                    transparent: palette.transparent_index(),
                    dispose: gif::DisposalMethod::Background,
                    buffer: Cow::Borrowed(f.canvas.indices()),
                    ..gif::Frame::default()
                };
                encoder
                    .write_frame(&frame)
                    .map_err(|e| RadarError::encode(format!("write gif frame {i}: {e}")))?;
            }
        }
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/animation.rs"]
mod tests;
