//! Caption suggestions for the text payload.
//!
//! The crate ships no network client. Callers plug a [`CaptionSuggester`] in (a vision model, a
//! filename heuristic, ...) and [`suggest_caption`] makes sure whatever comes back is usable.

use crate::config::settings::{SettingsAction, TextField, WatermarkSettings};

/// Caption used whenever a suggester fails or returns nothing.
pub const FALLBACK_CAPTION: &str = "Copyright 2024";

/// Instruction handed to model-backed suggesters along with the image.
pub const SUGGESTION_PROMPT: &str = "Analyze this image and generate a short, professional \
watermark text that describes the vibe or content. For example 'Sunset Photography', 'Urban \
Architecture', 'Candid Moments'. Keep it under 4 words. Do not add quotes.";

/// Something that proposes a short caption for an image.
pub trait CaptionSuggester {
    /// `mime` is the type of `image_bytes`, e.g. `image/png`.
    fn suggest(&self, image_bytes: &[u8], mime: &str) -> anyhow::Result<String>;
}

impl<F> CaptionSuggester for F
where
    F: Fn(&[u8], &str) -> anyhow::Result<String>,
{
    fn suggest(&self, image_bytes: &[u8], mime: &str) -> anyhow::Result<String> {
        self(image_bytes, mime)
    }
}

/// Ask `suggester` for a caption. Never fails.
pub fn suggest_caption<S>(suggester: &S, image_bytes: &[u8], mime: &str) -> String
where
    S: CaptionSuggester + ?Sized,
{
    match suggester.suggest(image_bytes, mime) {
        Ok(raw) => {
            let caption = clean_caption(&raw);
            if caption.is_empty() {
                tracing::debug!("empty caption suggestion, using fallback");
                FALLBACK_CAPTION.to_string()
            } else {
                caption
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "caption suggestion failed, using fallback");
            FALLBACK_CAPTION.to_string()
        }
    }
}

/// Fetch a caption and store it as the text content.
pub fn apply_suggestion<S>(
    settings: WatermarkSettings,
    suggester: &S,
    image_bytes: &[u8],
    mime: &str,
) -> WatermarkSettings
where
    S: CaptionSuggester + ?Sized,
{
    let caption = suggest_caption(suggester, image_bytes, mime);
    settings.reduce(SettingsAction::SetText(TextField::Content(caption)))
}

fn clean_caption(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}'))
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "../tests/unit/suggest.rs"]
mod tests;
