//! Events
//!
//! An event is created by input translation, queued once and consumed once.
//! It never changes after construction.

use crate::{ComponentId, Vec2};

/// Native window handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Rendering/input context an event was produced in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventContext {
    pub window: WindowHandle,
    /// Log events pushed from this context
    pub debug: bool,
}

impl EventContext {
    pub fn new(window: WindowHandle) -> Self {
        Self { window, debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Concrete event kind, used as the listener lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CursorEnter,
    MouseClick,
    MouseDrag,
    Scroll,
    Key,
    Char,
    Focus,
    WindowSize,
    WindowPos,
    WindowFocus,
    WindowIconify,
    WindowRefresh,
    WindowClose,
    AddChild,
    RemoveChild,
}

impl EventKind {
    /// Window-lifecycle kinds
    pub fn is_window_event(&self) -> bool {
        matches!(
            self,
            EventKind::WindowSize
                | EventKind::WindowPos
                | EventKind::WindowFocus
                | EventKind::WindowIconify
                | EventKind::WindowRefresh
                | EventKind::WindowClose
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Press,
    Release,
    /// Press and release on the same component
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// Keyboard modifiers held during an input event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub super_key: bool,
}

/// Event data
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    CursorEnter { entered: bool, cursor: Vec2 },
    MouseClick {
        button: MouseButton,
        action: ClickAction,
        /// Cursor position relative to the target
        position: Vec2,
        absolute: Vec2,
        mods: Modifiers,
    },
    MouseDrag { delta: Vec2 },
    Scroll { x_offset: f64, y_offset: f64 },
    Key { key: i32, scancode: i32, action: KeyAction, mods: Modifiers },
    Char { codepoint: char },
    Focus { gained: bool, next_focus: Option<ComponentId> },
    WindowSize { width: u32, height: u32 },
    WindowPos { x: i32, y: i32 },
    WindowFocus { focused: bool },
    WindowIconify { iconified: bool },
    WindowRefresh,
    WindowClose,
    AddChild { child: ComponentId },
    RemoveChild { child: ComponentId },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::CursorEnter { .. } => EventKind::CursorEnter,
            EventPayload::MouseClick { .. } => EventKind::MouseClick,
            EventPayload::MouseDrag { .. } => EventKind::MouseDrag,
            EventPayload::Scroll { .. } => EventKind::Scroll,
            EventPayload::Key { .. } => EventKind::Key,
            EventPayload::Char { .. } => EventKind::Char,
            EventPayload::Focus { .. } => EventKind::Focus,
            EventPayload::WindowSize { .. } => EventKind::WindowSize,
            EventPayload::WindowPos { .. } => EventKind::WindowPos,
            EventPayload::WindowFocus { .. } => EventKind::WindowFocus,
            EventPayload::WindowIconify { .. } => EventKind::WindowIconify,
            EventPayload::WindowRefresh => EventKind::WindowRefresh,
            EventPayload::WindowClose => EventKind::WindowClose,
            EventPayload::AddChild { .. } => EventKind::AddChild,
            EventPayload::RemoveChild { .. } => EventKind::RemoveChild,
        }
    }
}

/// A single occurrence addressed to a component
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    target: Option<ComponentId>,
    context: EventContext,
    payload: EventPayload,
}

impl Event {
    /// Create an event. A missing target is accepted here; dispatch decides
    /// what to do with it.
    pub fn new(target: Option<ComponentId>, context: EventContext, payload: EventPayload) -> Self {
        Self { target, context, payload }
    }

    /// Create an event addressed to `target`
    pub fn targeted(target: ComponentId, context: EventContext, payload: EventPayload) -> Self {
        Self::new(Some(target), context, payload)
    }

    pub fn target(&self) -> Option<ComponentId> {
        self.target
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}
