//! Trellis Text - Text Shaping Engine
//!
//! This crate provides the text services the render utilities consume:
//! - Font registry with a default font name (fontdb)
//! - Text shaping (rustybuzz - HarfBuzz port) and a monospace fallback
//! - Line breaking into rows that fit a width
//! - Aligned text bounds

pub mod font;
pub mod shaping;
pub mod layout;

pub use font::{FontRegistry, DEFAULT_FONT};
pub use shaping::{Shaper, FontShaper, MonospaceShaper, FontMetrics, ShapedGlyph, ShapedRun};
pub use layout::{TextAlign, TextRow, BreakOpportunity, break_opportunities, break_lines, text_bounds};

/// Text errors
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
