//! Trellis Render - Immediate-Mode Render Utilities
//!
//! Drawing helpers for widget renderers, written against the [`DrawContext`]
//! trait so they work with any backend:
//! - Bounded single-line text with alignment and overflow hiding
//! - Text bounds calculation
//! - Rectangles, rounded strokes, drop shadows
//! - Scissor (clip) management derived from the component hierarchy
//! - Ancestor visibility culling
//!
//! Backends:
//! - [`DisplayList`]: records draw commands (headless, tests)
//! - [`SkiaCanvas`]: rasterizes with tiny-skia

mod context;
mod state;
pub mod display_list;
pub mod skia;
pub mod text;
pub mod shapes;
pub mod scissor;

pub use context::{DrawContext, Winding, Paint, BoxGradient};
pub use state::{DrawState, SubPath};
pub use display_list::{DisplayList, DrawCommand};
pub use skia::SkiaCanvas;
pub use text::{
    LineStyle, TextBounds, render_text_line_to_bounds, render_text_line_to_bounds_default,
    render_text_state_line_to_bounds, render_text_state_line_to_bounds_default,
    calculate_text_bounds_rect, create_bounds, create_bounds_from_ink, align_text_in_box,
};
pub use shapes::{
    draw_rectangle, draw_rectangle_bounds, draw_rectangle_at, draw_rect_stroke,
    draw_rect_stroke_bounds, draw_rect_stroke_at, drop_shadow,
};
pub use scissor::{
    ScissorGuard, scissor_for, create_scissor, create_scissor_by_parent, create_scissor_bounds,
    intersect_scissor, reset_scissor, scissor_scope, draw_in_scissor, visible_in_parents,
};

pub use trellis_text::{TextAlign, TextRow};

/// Render errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
