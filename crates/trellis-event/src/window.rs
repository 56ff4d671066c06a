//! Window lookup used for close-event fallback routing

use std::collections::HashMap;
use std::rc::Rc;

use trellis_core::{Event, EventListener, ListenerError, ListenerId, ListenerList, WindowHandle};

/// Window lookup service injected into the event pump
pub trait WindowSystem {
    /// Whether the windowing layer is up; close fallback is skipped otherwise
    fn is_initialized(&self) -> bool;

    fn window(&self, handle: WindowHandle) -> Option<&Window>;
}

/// A native window known to the toolkit
#[derive(Debug)]
pub struct Window {
    handle: WindowHandle,
    pub title: String,
    close_listeners: ListenerList,
}

impl Window {
    pub fn new(handle: WindowHandle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
            close_listeners: ListenerList::new(),
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    /// Register a window-level close listener
    pub fn add_close_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Event) -> Result<(), ListenerError> + 'static,
    {
        self.close_listeners.add(listener)
    }

    pub fn add_shared_close_listener(&mut self, listener: Rc<dyn EventListener>) -> ListenerId {
        self.close_listeners.add_listener(listener)
    }

    pub fn remove_close_listener(&mut self, id: ListenerId) -> bool {
        self.close_listeners.remove(id)
    }

    pub fn close_listeners(&self) -> &ListenerList {
        &self.close_listeners
    }
}

/// Handle-to-window map with an explicit lifecycle
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowHandle, Window>,
    initialized: bool,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the windowing layer as initialized
    pub fn initialize(&mut self) {
        self.initialized = true;
    }

    /// Mark the windowing layer as torn down and forget all windows
    pub fn terminate(&mut self) {
        self.initialized = false;
        self.windows.clear();
    }

    /// Register a window, returning the one it replaced
    pub fn register(&mut self, window: Window) -> Option<Window> {
        self.windows.insert(window.handle(), window)
    }

    pub fn remove(&mut self, handle: WindowHandle) -> Option<Window> {
        self.windows.remove(&handle)
    }

    pub fn window_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.windows.get_mut(&handle)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl WindowSystem for WindowRegistry {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn window(&self, handle: WindowHandle) -> Option<&Window> {
        self.windows.get(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = WindowRegistry::new();
        assert!(!registry.is_initialized());

        registry.initialize();
        registry.register(Window::new(WindowHandle(1), "main"));
        assert!(registry.is_initialized());
        assert_eq!(registry.window(WindowHandle(1)).map(|w| w.title.as_str()), Some("main"));
        assert!(registry.window(WindowHandle(2)).is_none());

        registry.terminate();
        assert!(!registry.is_initialized());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_listener_removal() {
        let mut window = Window::new(WindowHandle(1), "main");
        let id = window.add_close_listener(|_: &Event| Ok(()));
        window.add_close_listener(|_: &Event| Ok(()));

        assert!(window.remove_close_listener(id));
        assert_eq!(window.close_listeners().len(), 1);
    }
}
