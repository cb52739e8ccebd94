use std::io::Cursor;

use super::*;

fn encode_png(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let prepared = decode_image(&encode_png(img)).unwrap();
    assert_eq!(prepared.width(), 1);
    assert_eq!(prepared.height(), 1);
    assert_eq!(
        prepared.premul_bytes(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_reports_source_format() {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
    let (raster, format) = decode_image_with_format(&encode_png(img)).unwrap();
    assert_eq!(format, ImageFormat::Png);
    assert_eq!(raster.geometry().unwrap(), CanvasGeometry::new(3, 2).unwrap());
}

#[test]
fn decode_garbage_is_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, WatermarkError::Decode(_)));
}

#[test]
fn opaque_pixels_survive_premul_roundtrip() {
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([12, 200, 77, 255]));
    let raster = RasterImage::from_rgba8(img.clone());
    assert_eq!(raster.to_rgba8(), img);
}

#[test]
fn premul_parts_length_is_checked() {
    assert!(RasterImage::from_premul_parts(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul_parts(2, 2, vec![0; 16]).is_ok());
}
