use super::*;

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn transparent_source_or_zero_opacity_is_identity() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], -2.0), dst);
}

#[test]
fn half_opacity_white_over_black_is_mid_grey() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
}

#[test]
fn over_in_place_skips_empty_layer_pixels() {
    let mut dst = vec![1, 2, 3, 255, 4, 5, 6, 255];
    let src = vec![0, 0, 0, 0, 255, 0, 0, 255];
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255, 255, 0, 0, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let err = over_in_place(&mut dst, &[0u8; 4], 1.0).unwrap_err();
    assert!(matches!(err, WatermarkError::Validation(_)));
    assert!(over_in_place(&mut [0u8; 3], &[0u8; 3], 1.0).is_err());
}
