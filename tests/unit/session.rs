use std::io::Cursor;

use super::*;
use crate::config::model::WatermarkKind;
use crate::placement::Position;

fn encoded(w: u32, h: u32, px: [u8; 4], format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, image::Rgba(px));
    let img = if format_has_alpha(format) {
        DynamicImage::ImageRgba8(img)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8())
    };
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("photomark-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn download_name_prefixes_file_name() {
    assert_eq!(download_name("beach.jpg"), "watermarked-beach.jpg");
    assert_eq!(download_name("/tmp/x/photo.png"), "watermarked-photo.png");
}

#[test]
fn undecodable_upload_is_a_decode_error() {
    let err = render_watermarked(
        b"not an image",
        &WatermarkSettings::default(),
        Path::new("."),
        &mut FontBook::new(),
    )
    .unwrap_err();
    assert!(matches!(err, WatermarkError::Decode(_)));
}

#[test]
fn unknown_kind_renders_base_unchanged_in_same_format() {
    let base = encoded(12, 8, [40, 80, 120, 255], ImageFormat::Png);
    let settings = WatermarkSettings {
        kind: WatermarkKind::Unknown,
        ..WatermarkSettings::default()
    };
    let out = render_watermarked(&base, &settings, Path::new("."), &mut FontBook::new()).unwrap();
    assert_eq!(out.format, ImageFormat::Png);
    assert_eq!(out.mime_type(), "image/png");
    assert!(out.image.pixels().all(|p| p.0 == [40, 80, 120, 255]));

    let reencoded = image::load_from_memory(&out.encode().unwrap()).unwrap().to_rgba8();
    assert_eq!(reencoded, out.image);
}

#[test]
fn image_watermark_is_loaded_relative_to_assets_root() {
    let dir = scratch_dir("session-image");
    std::fs::write(dir.join("mark.png"), encoded(4, 4, [255, 255, 255, 255], ImageFormat::Png))
        .unwrap();

    let base = encoded(20, 20, [0, 0, 0, 255], ImageFormat::Png);
    let settings = WatermarkSettings {
        kind: WatermarkKind::Image,
        position: Position::Center,
        ..WatermarkSettings::default()
    }
    .reduce(crate::config::settings::SettingsAction::SetImage(
        crate::config::settings::ImageField::Source(Some("mark.png".into())),
    ))
    .reduce(crate::config::settings::SettingsAction::SetOpacity(1.0));

    let out = render_watermarked(&base, &settings, &dir, &mut FontBook::new()).unwrap();
    let mid = out.image.get_pixel(10, 10).0;
    assert!(mid[0] > 240, "{mid:?}");
    assert_eq!(out.image.get_pixel(0, 0).0, [0, 0, 0, 255]);

    let missing = settings.reduce(crate::config::settings::SettingsAction::SetImage(
        crate::config::settings::ImageField::Source(Some("absent.png".into())),
    ));
    let err = render_watermarked(&base, &missing, &dir, &mut FontBook::new()).unwrap_err();
    assert!(matches!(err, WatermarkError::Decode(_)));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn jpeg_export_drops_alpha() {
    let base = encoded(8, 8, [200, 10, 10, 255], ImageFormat::Jpeg);
    let settings = WatermarkSettings {
        kind: WatermarkKind::Unknown,
        ..WatermarkSettings::default()
    };
    let out = render_watermarked(&base, &settings, Path::new("."), &mut FontBook::new()).unwrap();
    assert_eq!(out.format, ImageFormat::Jpeg);
    let bytes = out.encode().unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}
