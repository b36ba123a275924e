use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::frames::builder::PalettedFrameBuilder;
use crate::frames::palette::Palette;
use crate::raster::{PixelGrid, RgbaCanvas};

fn frame_with(bounds: Bounds, palette: &Arc<Palette>, c: Rgba8Premul) -> IndexedCanvas {
    let mut base = RgbaCanvas::new(bounds);
    base.draw_src(&PixelGrid::filled(bounds, c)).unwrap();
    PalettedFrameBuilder::new(Arc::clone(palette))
        .build_frame(&base, &PixelGrid::filled(bounds, Rgba8Premul::transparent()))
        .unwrap()
}

fn loop_field(bytes: &[u8]) -> Option<u16> {
    let tag = b"NETSCAPE2.0";
    let at = bytes.windows(tag.len()).position(|w| w == tag)? + tag.len();
    // sub-block: len=3, id=1, loop count (little endian)
    let block = bytes.get(at..at + 4)?;
    assert_eq!(&block[..2], &[3, 1]);
    Some(u16::from_le_bytes([block[2], block[3]]))
}

fn decode_frames(bytes: &[u8]) -> (u16, u16, Vec<(u16, Vec<u8>, Option<u8>)>) {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts.read_info(Cursor::new(bytes)).unwrap();
    let (w, h) = (decoder.width(), decoder.height());
    let mut out = Vec::new();
    while let Some(f) = decoder.read_next_frame().unwrap() {
        out.push((f.delay, f.buffer.to_vec(), f.transparent));
    }
    (w, h, out)
}

#[test]
fn frame_count_order_and_delays_survive_encoding() {
    let bounds = Bounds::new(5, 3);
    let palette = Arc::new(Palette::web_safe());
    let colors = [
        Rgba8Premul::opaque(255, 0, 0),
        Rgba8Premul::opaque(0, 255, 0),
        Rgba8Premul::opaque(0, 0, 255),
    ];

    let mut anim = Animation::new(LoopCount::Finite(7));
    for (i, c) in colors.iter().enumerate() {
        anim.push(frame_with(bounds, &palette, *c), 10 + i as u16);
    }
    assert_eq!(anim.len(), 3);
    assert_eq!(anim.delays_cs(), vec![10, 11, 12]);

    let bytes = anim.encode_gif().unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(loop_field(&bytes), Some(7));

    let (w, h, frames) = decode_frames(&bytes);
    assert_eq!((w, h), (5, 3));
    assert_eq!(frames.len(), 3);
    for (i, (delay, buf, transparent)) in frames.iter().enumerate() {
        assert_eq!(*delay, 10 + i as u16);
        assert_eq!(*transparent, Some(216));
        let expected = palette.nearest(colors[i]);
        assert!(buf.iter().all(|&px| px == expected));
    }
}

#[test]
fn infinite_loop_writes_zero() {
    let bounds = Bounds::new(2, 2);
    let palette = Arc::new(Palette::web_safe());
    let mut anim = Animation::new(LoopCount::Infinite);
    anim.push(frame_with(bounds, &palette, Rgba8Premul::opaque(0, 0, 0)), 50);
    assert_eq!(loop_field(&anim.encode_gif().unwrap()), Some(0));
}

#[test]
fn loop_count_from_u16() {
    assert_eq!(LoopCount::from(0), LoopCount::Infinite);
    assert_eq!(LoopCount::from(3), LoopCount::Finite(3));
    assert_eq!(u16::from(LoopCount::Infinite), 0);
    assert_eq!(LoopCount::default(), LoopCount::Finite(7));

    let parsed: LoopCount = serde_json::from_str("0").unwrap();
    assert_eq!(parsed, LoopCount::Infinite);
    assert_eq!(serde_json::to_string(&LoopCount::Finite(4)).unwrap(), "4");
}

#[test]
fn empty_animation_is_an_encode_error() {
    let anim = Animation::new(LoopCount::Infinite);
    assert!(anim.is_empty());
    assert!(matches!(anim.encode_gif(), Err(RadarError::Encode(_))));
}

#[test]
fn mismatched_bounds_are_rejected() {
    let palette = Arc::new(Palette::web_safe());
    let mut anim = Animation::new(LoopCount::Infinite);
    anim.push(
        frame_with(Bounds::new(2, 2), &palette, Rgba8Premul::opaque(0, 0, 0)),
        50,
    );
    anim.push(
        frame_with(Bounds::new(3, 2), &palette, Rgba8Premul::opaque(0, 0, 0)),
        50,
    );
    let err = anim.encode_gif().unwrap_err();
    assert!(matches!(err, RadarError::Encode(_)));
    assert!(err.to_string().contains("frame 1"));
}

#[test]
fn mismatched_palettes_are_rejected() {
    let bounds = Bounds::new(2, 2);
    let a = Arc::new(Palette::web_safe());
    let b = Arc::new(Palette::new(&[[0, 0, 0], [255, 255, 255]], true).unwrap());
    let mut anim = Animation::new(LoopCount::Infinite);
    anim.push(frame_with(bounds, &a, Rgba8Premul::opaque(0, 0, 0)), 50);
    anim.push(frame_with(bounds, &b, Rgba8Premul::opaque(0, 0, 0)), 50);
    assert!(matches!(anim.encode_gif(), Err(RadarError::Encode(_))));
}

#[test]
fn equal_but_distinct_palettes_are_accepted() {
    let bounds = Bounds::new(2, 2);
    let a = Arc::new(Palette::web_safe());
    let b = Arc::new(Palette::web_safe());
    let mut anim = Animation::new(LoopCount::Finite(1));
    anim.push(frame_with(bounds, &a, Rgba8Premul::opaque(0, 0, 0)), 50);
    anim.push(frame_with(bounds, &b, Rgba8Premul::opaque(0, 0, 0)), 50);
    anim.encode_gif().unwrap();
}
