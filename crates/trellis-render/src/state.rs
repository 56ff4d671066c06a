//! Drawing state shared by the backends

use trellis_core::{Bounds, Color};
use trellis_text::{TextAlign, DEFAULT_FONT};

use crate::context::{Paint, Winding};

/// One sub-path of the current path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubPath {
    Rect { bounds: Bounds, winding: Winding },
    RoundedRect { bounds: Bounds, radius: f32, winding: Winding },
}

impl SubPath {
    pub fn bounds(&self) -> Bounds {
        match self {
            SubPath::Rect { bounds, .. } | SubPath::RoundedRect { bounds, .. } => *bounds,
        }
    }

    pub fn winding(&self) -> Winding {
        match self {
            SubPath::Rect { winding, .. } | SubPath::RoundedRect { winding, .. } => *winding,
        }
    }

    fn set_winding(&mut self, value: Winding) {
        match self {
            SubPath::Rect { winding, .. } | SubPath::RoundedRect { winding, .. } => *winding = value,
        }
    }
}

/// Current path, paints, font selection and scissor
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub path: Vec<SubPath>,
    pub fill: Paint,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_face: String,
    pub text_align: TextAlign,
    pub scissor: Option<Bounds>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            fill: Paint::default(),
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            font_size: 16.0,
            font_face: DEFAULT_FONT.to_string(),
            text_align: TextAlign::default(),
            scissor: None,
        }
    }
}

impl DrawState {
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn push(&mut self, subpath: SubPath) {
        self.path.push(subpath);
    }

    pub fn set_winding(&mut self, winding: Winding) {
        if let Some(last) = self.path.last_mut() {
            last.set_winding(winding);
        }
    }

    /// Whether any sub-path is a hole
    pub fn has_holes(&self) -> bool {
        self.path.iter().any(|p| p.winding() == Winding::Hole)
    }

    pub fn set_scissor(&mut self, bounds: Bounds) {
        self.scissor = Some(Bounds::new(bounds.x, bounds.y, bounds.width.max(0.0), bounds.height.max(0.0)));
    }

    pub fn intersect_scissor(&mut self, bounds: Bounds) {
        match self.scissor {
            Some(current) => self.scissor = Some(current.intersect(&bounds)),
            None => self.set_scissor(bounds),
        }
    }

    pub fn reset_scissor(&mut self) {
        self.scissor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_applies_to_last_subpath() {
        let mut state = DrawState::default();
        state.push(SubPath::Rect { bounds: Bounds::new(0.0, 0.0, 10.0, 10.0), winding: Winding::Solid });
        state.push(SubPath::Rect { bounds: Bounds::new(2.0, 2.0, 4.0, 4.0), winding: Winding::Solid });
        state.set_winding(Winding::Hole);

        assert_eq!(state.path[0].winding(), Winding::Solid);
        assert_eq!(state.path[1].winding(), Winding::Hole);
        assert!(state.has_holes());

        state.begin_path();
        assert!(state.path.is_empty());
        // No sub-path to apply to
        state.set_winding(Winding::Hole);
    }

    #[test]
    fn test_scissor_intersection() {
        let mut state = DrawState::default();
        state.intersect_scissor(Bounds::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(state.scissor, Some(Bounds::new(0.0, 0.0, 100.0, 100.0)));

        state.intersect_scissor(Bounds::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(state.scissor, Some(Bounds::new(50.0, 50.0, 50.0, 50.0)));

        state.intersect_scissor(Bounds::new(200.0, 200.0, 10.0, 10.0));
        assert!(state.scissor.is_some_and(|s| s.is_empty()));

        state.reset_scissor();
        assert_eq!(state.scissor, None);
    }
}
