//! Display list backend
//!
//! Records every fill, stroke and text draw together with the scissor in
//! force at the time. Nothing is rasterized; text is measured with a
//! [`Shaper`] so breaking and bounds behave like a real backend.

use trellis_core::{Bounds, Color};
use trellis_text::{MonospaceShaper, Shaper, TextAlign, TextRow};

use crate::context::{DrawContext, Paint, Winding};
use crate::state::{DrawState, SubPath};

/// Recorded draw operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        path: Vec<SubPath>,
        paint: Paint,
        scissor: Option<Bounds>,
    },
    Stroke {
        path: Vec<SubPath>,
        color: Color,
        width: f32,
        scissor: Option<Bounds>,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font: String,
        size: f32,
        align: TextAlign,
        color: Color,
        scissor: Option<Bounds>,
    },
}

impl DrawCommand {
    pub fn scissor(&self) -> Option<Bounds> {
        match self {
            DrawCommand::Fill { scissor, .. }
            | DrawCommand::Stroke { scissor, .. }
            | DrawCommand::Text { scissor, .. } => *scissor,
        }
    }
}

/// Recording [`DrawContext`]
#[derive(Debug, Default)]
pub struct DisplayList<S = MonospaceShaper> {
    shaper: S,
    state: DrawState,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Shaper> DisplayList<S> {
    /// Record with a specific text shaper
    pub fn with_shaper(shaper: S) -> Self {
        Self {
            shaper,
            state: DrawState::default(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, keeping the drawing state
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Active scissor, if any
    pub fn current_scissor(&self) -> Option<Bounds> {
        self.state.scissor
    }

    /// Recorded text strings, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl<S: Shaper> DrawContext for DisplayList<S> {
    fn begin_path(&mut self) {
        self.state.begin_path();
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.push(SubPath::Rect {
            bounds: Bounds::new(x, y, w, h),
            winding: Winding::Solid,
        });
    }

    fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.state.push(SubPath::RoundedRect {
            bounds: Bounds::new(x, y, w, h),
            radius,
            winding: Winding::Solid,
        });
    }

    fn path_winding(&mut self, winding: Winding) {
        self.state.set_winding(winding);
    }

    fn fill_color(&mut self, color: Color) {
        self.state.fill = Paint::Color(color);
    }

    fn fill_paint(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill {
            path: self.state.path.clone(),
            paint: self.state.fill,
            scissor: self.state.scissor,
        });
    }

    fn stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    fn stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            path: self.state.path.clone(),
            color: self.state.stroke_color,
            width: self.state.stroke_width,
            scissor: self.state.scissor,
        });
    }

    fn font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    fn font_face(&mut self, name: &str) {
        self.state.font_face = name.to_string();
    }

    fn text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font: self.state.font_face.clone(),
            size: self.state.font_size,
            align: self.state.text_align,
            color: self.state.fill.base_color(),
            scissor: self.state.scissor,
        });
    }

    fn text_break_lines(&mut self, text: &str, width: f32, max_rows: usize) -> Vec<TextRow> {
        trellis_text::break_lines(
            &self.shaper,
            &self.state.font_face,
            self.state.font_size,
            text,
            width,
            max_rows,
        )
    }

    fn text_bounds(&mut self, x: f32, y: f32, text: &str) -> [f32; 4] {
        trellis_text::text_bounds(
            &self.shaper,
            &self.state.font_face,
            self.state.font_size,
            self.state.text_align,
            x,
            y,
            text,
        )
    }

    fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.set_scissor(Bounds::new(x, y, w, h));
    }

    fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.state.intersect_scissor(Bounds::new(x, y, w, h));
    }

    fn reset_scissor(&mut self) {
        self.state.reset_scissor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_fill_with_scissor() {
        let mut list = DisplayList::new();
        list.scissor(0.0, 0.0, 50.0, 50.0);
        list.begin_path();
        list.rect(1.0, 2.0, 3.0, 4.0);
        list.fill_color(Color::RED);
        list.fill();

        assert_eq!(
            list.commands(),
            &[DrawCommand::Fill {
                path: vec![SubPath::Rect { bounds: Bounds::new(1.0, 2.0, 3.0, 4.0), winding: Winding::Solid }],
                paint: Paint::Color(Color::RED),
                scissor: Some(Bounds::new(0.0, 0.0, 50.0, 50.0)),
            }]
        );
    }

    #[test]
    fn test_text_uses_current_font_state() {
        let mut list = DisplayList::new();
        list.font_size(12.0);
        list.font_face("mono");
        list.fill_color(Color::BLUE);
        list.text(5.0, 6.0, "hi");

        match &list.commands()[0] {
            DrawCommand::Text { font, size, color, text, .. } => {
                assert_eq!(font, "mono");
                assert_eq!(*size, 12.0);
                assert_eq!(*color, Color::BLUE);
                assert_eq!(text, "hi");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_break_lines_uses_shaper() {
        let mut list = DisplayList::with_shaper(MonospaceShaper::new(1.0));
        list.font_size(10.0);
        let rows = list.text_break_lines("abc def", 30.0, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].end, 3);
    }

    #[test]
    fn test_take_commands_keeps_state() {
        let mut list = DisplayList::new();
        list.scissor(0.0, 0.0, 10.0, 10.0);
        list.begin_path();
        list.stroke();
        assert_eq!(list.take_commands().len(), 1);
        assert!(list.is_empty());
        assert!(list.current_scissor().is_some());
    }
}
