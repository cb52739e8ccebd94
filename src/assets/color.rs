use vello_cpu::peniko::color::{self, Srgb};

use crate::foundation::core::Rgba8;

/// Colour used when a fill string cannot be parsed; matches a fresh canvas fill style.
pub const DEFAULT_FILL: Rgba8 = Rgba8::BLACK;

/// Resolve a text fill colour, falling back to [`DEFAULT_FILL`] for unparseable input.
pub fn fill_color(value: &str) -> Rgba8 {
    match parse_css_color(value) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(color = value, %err, "unparseable fill colour, using black");
            DEFAULT_FILL
        }
    }
}

/// Parse any CSS Color 4 string (hex, functional notations, named colours) into sRGB RGBA8.
pub fn parse_css_color(value: &str) -> Result<Rgba8, color::ParseError> {
    let parsed = color::parse_color(&value.trim().to_ascii_lowercase())?;
    let c = parsed.to_alpha_color::<Srgb>().to_rgba8();
    Ok(Rgba8::new(c.r, c.g, c.b, c.a))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
