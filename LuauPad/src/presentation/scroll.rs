//! Scroll mirroring between the text surface and the line-number gutter
//!
//! The gutter follows the surface, never the other way round. A mounted
//! [`ScrollMirror`] owns exactly one listener on its surface and removes it on
//! unmount or drop. The listener only holds a weak reference to the gutter, so
//! an event arriving after the gutter is gone is ignored.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

/// Handle for a registered scroll listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ScrollListener = Box<dyn FnMut(f64)>;

/// A scrollable display element that reports its vertical offset
pub trait ScrollSurface {
    fn scroll_top(&self) -> f64;

    fn subscribe(&mut self, listener: ScrollListener) -> ListenerId;

    /// Returns whether a listener was removed
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// Something that can be scrolled to follow a surface
pub trait Gutter {
    fn set_scroll_top(&mut self, offset: f64);
}

/// Keeps a gutter's offset equal to a surface's offset
pub struct ScrollMirror<S: ScrollSurface> {
    surface: Rc<RefCell<S>>,
    gutter: Weak<RefCell<dyn Gutter>>,
    listener: Option<ListenerId>,
}

impl<S: ScrollSurface> ScrollMirror<S> {
    /// Subscribe `gutter` to `surface` and bring it in line with the current offset
    pub fn mount<G: Gutter + 'static>(surface: Rc<RefCell<S>>, gutter: &Rc<RefCell<G>>) -> Self {
        let gutter: Rc<RefCell<dyn Gutter>> = gutter.clone();
        let mut mirror = Self {
            surface,
            gutter: Rc::downgrade(&gutter),
            listener: None,
        };
        mirror.attach();
        mirror
    }

    fn attach(&mut self) {
        let weak = self.gutter.clone();
        let mut surface = self.surface.borrow_mut();
        if let Some(gutter) = weak.upgrade() {
            gutter.borrow_mut().set_scroll_top(surface.scroll_top());
        }
        let id = surface.subscribe(Box::new(move |offset| {
            if let Some(gutter) = weak.upgrade() {
                gutter.borrow_mut().set_scroll_top(offset);
            }
        }));
        trace!(?id, "scroll mirror mounted");
        self.listener = Some(id);
    }

    /// Move the subscription to a replacement surface element
    pub fn remount(&mut self, surface: Rc<RefCell<S>>) {
        self.unmount();
        self.surface = surface;
        self.attach();
    }

    /// Remove the listener. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(id) = self.listener.take() {
            if let Ok(mut surface) = self.surface.try_borrow_mut() {
                surface.unsubscribe(id);
                trace!(?id, "scroll mirror unmounted");
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }
}

impl<S: ScrollSurface> Drop for ScrollMirror<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// In-memory scroll surface
#[derive(Default)]
pub struct Viewport {
    scroll_top: f64,
    listeners: Vec<(ListenerId, ScrollListener)>,
    next_id: u64,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll to `offset` (clamped at zero) and notify listeners
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll_top = offset.max(0.0);
        for (_, listener) in &mut self.listeners {
            listener(self.scroll_top);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ScrollSurface for Viewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn subscribe(&mut self, listener: ScrollListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

/// In-memory line-number gutter
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineGutter {
    pub scroll_top: f64,
    pub labels: Vec<String>,
}

impl LineGutter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_line_count(&mut self, line_count: usize) {
        self.labels = super::gutter_labels(line_count);
    }
}

impl Gutter for LineGutter {
    fn set_scroll_top(&mut self, offset: f64) {
        self.scroll_top = offset;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn setup() -> (Rc<RefCell<Viewport>>, Rc<RefCell<LineGutter>>) {
        (
            Rc::new(RefCell::new(Viewport::new())),
            Rc::new(RefCell::new(LineGutter::new())),
        )
    }

    #[test]
    fn test_gutter_follows_surface() {
        let (surface, gutter) = setup();
        surface.borrow_mut().scroll_to(40.0);

        let _mirror = ScrollMirror::mount(surface.clone(), &gutter);
        assert_eq!(gutter.borrow().scroll_top, 40.0);

        surface.borrow_mut().scroll_to(120.5);
        assert_eq!(gutter.borrow().scroll_top, 120.5);

        surface.borrow_mut().scroll_to(-3.0);
        assert_eq!(gutter.borrow().scroll_top, 0.0);
    }

    #[test]
    fn test_gutter_does_not_drive_surface() {
        let (surface, gutter) = setup();
        let _mirror = ScrollMirror::mount(surface.clone(), &gutter);

        gutter.borrow_mut().set_scroll_top(99.0);
        assert_eq!(surface.borrow().scroll_top(), 0.0);
    }

    #[test]
    fn test_one_listener_per_mount_released_on_drop() {
        let (surface, gutter) = setup();
        {
            let mut mirror = ScrollMirror::mount(surface.clone(), &gutter);
            assert_eq!(surface.borrow().listener_count(), 1);
            mirror.unmount();
            mirror.unmount();
            assert!(!mirror.is_mounted());
            assert_eq!(surface.borrow().listener_count(), 0);
        }
        {
            let _mirror = ScrollMirror::mount(surface.clone(), &gutter);
            assert_eq!(surface.borrow().listener_count(), 1);
        }
        assert_eq!(surface.borrow().listener_count(), 0);
    }

    #[test]
    fn test_remount_moves_to_new_surface() {
        let (old_surface, gutter) = setup();
        let new_surface = Rc::new(RefCell::new(Viewport::new()));
        new_surface.borrow_mut().scroll_to(15.0);

        let mut mirror = ScrollMirror::mount(old_surface.clone(), &gutter);
        mirror.remount(new_surface.clone());

        assert_eq!(old_surface.borrow().listener_count(), 0);
        assert_eq!(new_surface.borrow().listener_count(), 1);
        assert_eq!(gutter.borrow().scroll_top, 15.0);

        old_surface.borrow_mut().scroll_to(500.0);
        assert_eq!(gutter.borrow().scroll_top, 15.0);
    }

    #[test]
    fn test_destroyed_gutter_is_never_written() {
        let (surface, gutter) = setup();
        let _mirror = ScrollMirror::mount(surface.clone(), &gutter);
        drop(gutter);

        // Late event after the gutter is gone
        surface.borrow_mut().scroll_to(10.0);
        assert_eq!(surface.borrow().scroll_top(), 10.0);
    }

    #[test]
    fn test_line_gutter_labels() {
        let mut gutter = LineGutter::new();
        gutter.set_line_count(2);
        assert_eq!(gutter.labels, vec!["1".to_string(), "2".to_string()]);
    }
}
