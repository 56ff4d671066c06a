//! Trellis Core - Component Model
//!
//! Shared data model for the event and render layers:
//! - Geometry (positions, sizes, bounds, padding)
//! - RGBA colors
//! - Arena-based component tree with per-component listener maps
//! - Events and event kinds
//! - Text state bundles and alignment

mod geometry;
mod color;
mod component;
mod listener;
mod event;
mod text_state;

pub use geometry::{Vec2, Bounds, Padding};
pub use color::Color;
pub use component::{Component, ComponentTree, Hierarchy, Ancestors};
pub use listener::{EventListener, ListenerError, ListenerId, ListenerList, ListenerMap};
pub use event::{
    Event, EventKind, EventPayload, EventContext, WindowHandle,
    MouseButton, ClickAction, KeyAction, Modifiers,
};
pub use text_state::{TextState, HorizontalAlign, VerticalAlign};

/// Component identifier (index into the component arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    /// Arena index of this component
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Component tree errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Unknown component: {0:?}")]
    UnknownComponent(ComponentId),

    #[error("Cannot attach {child:?} below its own descendant {parent:?}")]
    Cycle { parent: ComponentId, child: ComponentId },
}

pub type Result<T> = std::result::Result<T, TreeError>;
