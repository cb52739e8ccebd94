use super::*;
use crate::config::model::WatermarkKind;

fn fixed(reply: &'static str) -> impl Fn(&[u8], &str) -> anyhow::Result<String> {
    move |_, _| Ok(reply.to_string())
}

#[test]
fn suggestion_is_trimmed_and_unquoted() {
    assert_eq!(
        suggest_caption(&fixed("  \"Urban Architecture\"\n"), b"", "image/png"),
        "Urban Architecture"
    );
}

#[test]
fn failure_or_blank_reply_falls_back() {
    let failing = |_: &[u8], _: &str| -> anyhow::Result<String> { anyhow::bail!("offline") };
    assert_eq!(suggest_caption(&failing, b"", "image/png"), FALLBACK_CAPTION);
    assert_eq!(suggest_caption(&fixed("   "), b"", "image/png"), FALLBACK_CAPTION);
    assert_eq!(suggest_caption(&fixed("\"\""), b"", "image/png"), FALLBACK_CAPTION);
}

#[test]
fn mime_is_forwarded() {
    let echo = |_: &[u8], mime: &str| -> anyhow::Result<String> { Ok(mime.to_string()) };
    assert_eq!(suggest_caption(&echo, b"", "image/jpeg"), "image/jpeg");
}

#[test]
fn applied_suggestion_lands_in_text_content_only_for_text_kind() {
    let settings = apply_suggestion(
        WatermarkSettings::default(),
        &fixed("Sunset Photography"),
        b"",
        "image/png",
    );
    assert_eq!(settings.text.content, "Sunset Photography");

    let image_mode = WatermarkSettings {
        kind: WatermarkKind::Image,
        ..WatermarkSettings::default()
    };
    let after = apply_suggestion(image_mode.clone(), &fixed("Ignored"), b"", "image/png");
    assert_eq!(after, image_mode);
}
