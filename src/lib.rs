//! Per-window state for a manual tiling window manager on Windows.
//!
//! Each managed top-level window is tracked by a [`ManagedWindow`]: which
//! presentation attributes are forced on or off, which auxiliary windows the
//! owning application has hung off it, and where the window sat before the
//! manager last hid it. All OS access goes through the
//! [`sys::window_server::WindowServer`] boundary, so the state machine itself
//! is host-neutral and fully testable off a real desktop.

pub mod common;
pub mod model;
pub mod sys;

pub use model::owned_windows::{OwnedWindowPredicate, OwnedWindows};
pub use model::window::{
    HiddenWindowShownAction, ManagedWindow, Visibility, WindowDescriptor, WindowIdentity,
    WindowRule,
};
pub use sys::window_server::{MenuRef, WindowRef, WindowServer};
