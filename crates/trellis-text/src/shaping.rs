//! Text shaping
//!
//! [`Shaper`] is what line breaking and bounds need: advances and vertical
//! metrics. [`FontShaper`] shapes with rustybuzz over registered fonts;
//! [`MonospaceShaper`] needs no font data at all.

use rustybuzz::{Face, UnicodeBuffer, shape};

use crate::font::FontRegistry;
use crate::{Result, TextError};

/// Vertical font metrics in pixels (descender is negative, below the baseline)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontMetrics {
    pub ascender: f32,
    pub descender: f32,
    pub line_height: f32,
}

/// Measurement interface of a text shaping engine
pub trait Shaper {
    /// Advance width of `text` on one line, in pixels
    fn advance(&self, font: &str, size: f32, text: &str) -> f32;

    fn metrics(&self, font: &str, size: f32) -> FontMetrics;
}

/// Fixed advance per character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceShaper {
    /// Advance as a fraction of the font size
    pub advance_ratio: f32,
    pub ascender_ratio: f32,
    pub descender_ratio: f32,
}

impl MonospaceShaper {
    pub fn new(advance_ratio: f32) -> Self {
        Self {
            advance_ratio,
            ..Self::default()
        }
    }
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            ascender_ratio: 0.8,
            descender_ratio: -0.2,
        }
    }
}

impl Shaper for MonospaceShaper {
    fn advance(&self, _font: &str, size: f32, text: &str) -> f32 {
        let chars = text.chars().filter(|c| !matches!(c, '\n' | '\r')).count();
        chars as f32 * size * self.advance_ratio
    }

    fn metrics(&self, _font: &str, size: f32) -> FontMetrics {
        let ascender = size * self.ascender_ratio;
        let descender = size * self.descender_ratio;
        FontMetrics {
            ascender,
            descender,
            line_height: ascender - descender,
        }
    }
}

/// Shaped glyph, positions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    /// Byte offset of the source cluster
    pub cluster: u32,
    pub x_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// Result of shaping one line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<ShapedGlyph>,
    /// Font units to pixels
    pub scale: f32,
    pub width: f32,
}

/// Shaper backed by real font data
#[derive(Debug, Default)]
pub struct FontShaper {
    fonts: FontRegistry,
}

impl FontShaper {
    pub fn new(fonts: FontRegistry) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    /// Shape one line of text
    pub fn shape(&self, font: &str, size: f32, text: &str) -> Result<ShapedRun> {
        self.fonts
            .with_face_data(font, |data, index| shape_with_data(data, index, text, size))
            .ok_or_else(|| TextError::FontNotFound(font.to_string()))?
    }
}

/// Shape text with raw font data
fn shape_with_data(data: &[u8], index: u32, text: &str, size: f32) -> Result<ShapedRun> {
    let face = Face::from_slice(data, index)
        .ok_or_else(|| TextError::FontParsing("Failed to parse font".into()))?;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();

    let output = shape(&face, &[], buffer);
    let scale = size / face.units_per_em() as f32;

    let glyphs: Vec<ShapedGlyph> = output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id as u16,
            cluster: info.cluster,
            x_advance: pos.x_advance as f32 * scale,
            x_offset: pos.x_offset as f32 * scale,
            y_offset: pos.y_offset as f32 * scale,
        })
        .collect();
    let width = glyphs.iter().map(|g| g.x_advance).sum();

    Ok(ShapedRun { glyphs, scale, width })
}

impl Shaper for FontShaper {
    fn advance(&self, font: &str, size: f32, text: &str) -> f32 {
        let line: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        self.shape(font, size, &line).map(|run| run.width).unwrap_or(0.0)
    }

    fn metrics(&self, font: &str, size: f32) -> FontMetrics {
        self.fonts
            .with_face_data(font, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let scale = size / face.units_per_em() as f32;
                let ascender = face.ascender() as f32 * scale;
                let descender = face.descender() as f32 * scale;
                Some(FontMetrics {
                    ascender,
                    descender,
                    line_height: ascender - descender + face.line_gap() as f32 * scale,
                })
            })
            .flatten()
            .unwrap_or_else(|| MonospaceShaper::default().metrics(font, size))
    }
}
