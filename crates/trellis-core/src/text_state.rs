//! Text state - how a widget wants its label drawn

use crate::{Color, Padding};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlign {
    /// Alignment factor: LEFT=0, CENTER=1, RIGHT=2
    pub const fn index(self) -> u8 {
        match self {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Center => 1,
            HorizontalAlign::Right => 2,
        }
    }
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
    Baseline,
}

impl VerticalAlign {
    /// Alignment factor: TOP=0, MIDDLE=1, BOTTOM=2, BASELINE=3
    pub const fn index(self) -> u8 {
        match self {
            VerticalAlign::Top => 0,
            VerticalAlign::Middle => 1,
            VerticalAlign::Bottom => 2,
            VerticalAlign::Baseline => 3,
        }
    }
}

/// Label description owned by a widget
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Registered font name, `None` selects the default font
    pub font: Option<String>,
    pub font_size: f32,
    pub text_color: Color,
    pub padding: Padding,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub text: String,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 16.0,
            text_color: Color::BLACK,
            padding: Padding::uniform(1.0),
            horizontal_align: HorizontalAlign::default(),
            vertical_align: VerticalAlign::default(),
            text: String::new(),
        }
    }
}

impl TextState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_align(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }
}
