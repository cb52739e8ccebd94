use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::compile::plan::TextStyle;
use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Font families offered by the settings editor.
pub const FONTS: &[&str] = &[
    "Arial",
    "Verdana",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Palatino",
    "Garamond",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

const MAX_SCAN_DEPTH: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush colour carried through Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Index of a registered font face inside a [`FontBook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(pub usize);

/// Weight at or above which a face counts as bold.
const BOLD_WEIGHT: f32 = 600.0;
const REGULAR_WEIGHT: f32 = 400.0;

#[derive(Clone, Debug)]
struct FontFace {
    family: String,
    weight: f32,
    /// Width ratio, 1.0 is normal.
    width: f32,
    italic: bool,
    bytes: Arc<Vec<u8>>,
}

impl FontFace {
    fn is_bold(&self) -> bool {
        self.weight >= BOLD_WEIGHT
    }
}

/// A laid-out single line of text plus the face that was requested for it.
///
/// Glyph runs carry the font parley actually shaped them with; draw with that, not `face`.
pub struct ShapedText {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub face: FaceId,
    pub width: f64,
    pub height: f64,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("face", &self.face)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Registry of font faces and the Parley contexts used to shape watermark text.
///
/// Parley is built without system font discovery, so every face is registered explicitly from
/// bytes. Faces keep the weight and style fontique reads from the font tables; a style request
/// picks the closest face and shaping asks parley for exactly that weight and style.
pub struct FontBook {
    faces: Vec<FontFace>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.len())
            .field("families", &self.families())
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            faces: Vec::new(),
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Scan the usual platform font directories.
    ///
    /// Unreadable directories and files that are not fonts are skipped; the book may be empty.
    pub fn system() -> Self {
        let mut book = Self::new();
        for dir in SYSTEM_FONT_DIRS {
            let dir = Path::new(dir);
            if dir.is_dir() {
                book.scan_dir(dir, MAX_SCAN_DEPTH);
            }
        }
        tracing::debug!(faces = book.faces.len(), "scanned system fonts");
        book
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Distinct family names in registration order.
    pub fn families(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for face in &self.faces {
            if !out.iter().any(|f| f.eq_ignore_ascii_case(&face.family)) {
                out.push(face.family.as_str());
            }
        }
        out
    }

    /// Register a font file. Returns the family name reported by the font.
    pub fn register_file(&mut self, path: &Path) -> WatermarkResult<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.register_bytes(bytes, &stem)
    }

    /// Register every font file directly inside `dir`. Returns the number of faces added.
    pub fn register_dir(&mut self, dir: &Path) -> WatermarkResult<usize> {
        if !dir.is_dir() {
            return Err(WatermarkError::font(format!(
                "font directory '{}' does not exist",
                dir.display()
            )));
        }
        Ok(self.scan_dir(dir, 0))
    }

    /// Register raw font bytes.
    ///
    /// Weight and style come from the font itself. `style_hint` (usually the file stem, e.g.
    /// `DejaVuSans-BoldOblique`) is only consulted when the font reports no face info.
    pub fn register_bytes(&mut self, bytes: Vec<u8>, style_hint: &str) -> WatermarkResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let (family_id, infos) = families.first().ok_or_else(|| {
            WatermarkError::font("no font families registered from font bytes")
        })?;
        let family_id = *family_id;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WatermarkError::font("registered font family has no name"))?
            .to_string();

        let (weight, width, italic) = match infos.first() {
            Some(info) => (
                info.weight().value(),
                info.width().ratio(),
                !matches!(info.style(), parley::fontique::FontStyle::Normal),
            ),
            None => {
                let hint = style_hint.to_ascii_lowercase();
                let weight = if hint.contains("bold") { 700.0 } else { REGULAR_WEIGHT };
                let width = if hint.contains("condensed") { 0.875 } else { 1.0 };
                (weight, width, hint.contains("italic") || hint.contains("oblique"))
            }
        };

        tracing::debug!(family = %family, weight, width, italic, "registered font face");
        self.faces.push(FontFace {
            family: family.clone(),
            weight,
            width,
            italic,
            bytes: Arc::new(bytes),
        });
        Ok(family)
    }

    /// Raw bytes of a registered face.
    pub fn face_bytes(&self, id: FaceId) -> Option<Arc<Vec<u8>>> {
        self.faces.get(id.0).map(|f| f.bytes.clone())
    }

    /// Pick the face for a family and style.
    ///
    /// Family names compare case-insensitively. An unknown family falls back to the first
    /// registered family. Within a family the italic flag must match if any face allows it, then
    /// the weight closest to 700 (bold) or 400 (regular) wins, then the width closest to normal.
    pub fn resolve_face(&self, family: &str, bold: bool, italic: bool) -> Option<FaceId> {
        let first = self.faces.first()?;
        let family = if self
            .faces
            .iter()
            .any(|f| f.family.eq_ignore_ascii_case(family))
        {
            family
        } else {
            tracing::warn!(
                requested = family,
                fallback = %first.family,
                "font family not registered"
            );
            first.family.as_str()
        };

        let candidates = || {
            self.faces
                .iter()
                .enumerate()
                .filter(move |(_, f)| f.family.eq_ignore_ascii_case(family))
        };

        let target = if bold { 700.0 } else { REGULAR_WEIGHT };
        let distance = |f: &FontFace| ((f.weight - target).abs(), (f.width - 1.0).abs());
        let closest = |want_italic: Option<bool>| {
            candidates()
                .filter(|(_, f)| want_italic.is_none_or(|it| f.italic == it))
                .min_by(|(_, a), (_, b)| {
                    let (aw, ax) = distance(a);
                    let (bw, bx) = distance(b);
                    aw.total_cmp(&bw).then(ax.total_cmp(&bx))
                })
                .map(|(i, _)| FaceId(i))
        };
        closest(Some(italic)).or_else(|| closest(None))
    }

    /// Shape `content` as a single unwrapped line in the given style.
    pub fn shape(&mut self, style: &TextStyle, content: &str) -> WatermarkResult<ShapedText> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(WatermarkError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let face_id = self
            .resolve_face(&style.family, style.bold, style.italic)
            .ok_or_else(|| WatermarkError::font("no fonts registered for text watermark"))?;
        let face = self.faces[face_id.0].clone();
        if face.is_bold() != style.bold || face.italic != style.italic {
            tracing::debug!(
                family = %face.family,
                bold = style.bold,
                italic = style.italic,
                "no exact style face, using closest"
            );
        }

        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, content, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(face.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontWidth(
            parley::style::FontWidth::from_ratio(face.width),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(if face.italic {
            parley::style::FontStyle::Italic
        } else {
            parley::style::FontStyle::Normal
        }));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(content);
        layout.break_all_lines(None);

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        Ok(ShapedText {
            layout,
            face: face_id,
            width,
            height,
        })
    }

    fn scan_dir(&mut self, dir: &Path, depth: usize) -> usize {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            if path.is_dir() {
                if depth > 0 {
                    added += self.scan_dir(&path, depth - 1);
                }
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            match self.register_file(&path) {
                Ok(_) => added += 1,
                Err(err) => tracing::debug!(path = %path.display(), %err, "skipping font file"),
            }
        }
        added
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
