use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_blends_channels() {
    // 50% premultiplied white over opaque black.
    let dst = [0, 0, 0, 255];
    let src = [128, 128, 128, 128];
    assert_eq!(over(dst, src), [128, 128, 128, 255]);

    // 50% premultiplied red over opaque blue.
    let dst = [0, 0, 255, 255];
    let src = [128, 0, 0, 128];
    assert_eq!(over(dst, src), [128, 0, 127, 255]);
}

#[test]
fn in_place_ops_reject_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(matches!(
        over_in_place(&mut dst, &[0u8; 4]),
        Err(RadarError::DimensionMismatch(_))
    ));
    assert!(src_in_place(&mut dst, &[0u8; 7]).is_err());
}

#[test]
fn src_in_place_copies_alpha_too() {
    let mut dst = vec![1, 2, 3, 255];
    src_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![0, 0, 0, 0]);
}
