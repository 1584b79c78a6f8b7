//! The boundary between window state tracking and the OS window server.
//!
//! Everything the entity layer needs from the OS is behind [`WindowServer`];
//! the real implementation lives in [`crate::sys::win32`]. Calls that the OS
//! applies asynchronously (frame writes, placement writes, shows) return as
//! soon as the request is queued; their `bool` result only says whether the
//! request was accepted.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Placement, Rect, ShowCommand};
use crate::sys::styles::{ExtendedStyle, WindowStyle};

/// An opaque native window reference. Unique per live window; the numeric
/// value is never reused while an entity holding it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowRef(pub isize);

/// An opaque native menu reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuRef(pub isize);

bitflags! {
    /// Suppression flags for positioned writes (SetWindowPos).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SetPosFlags: u32 {
        const NO_MOVE = 0x0002;
        const NO_ZORDER = 0x0004;
        const NO_ACTIVATE = 0x0010;
        const FRAME_CHANGED = 0x0020;
        const NO_COPY_BITS = 0x0100;
        const NO_OWNER_ZORDER = 0x0200;
        const ASYNC_WINDOW_POS = 0x4000;
    }
}

bitflags! {
    /// Invalidation flags for redraw requests (RedrawWindow).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RedrawFlags: u32 {
        const INVALIDATE = 0x0001;
        const ERASE = 0x0004;
        const ALL_CHILDREN = 0x0080;
    }
}

/// Synthetic shell-hook events announced to the taskbar when a window's
/// taskbar presence is toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    WindowCreated,
    WindowDestroyed,
}

impl ShellEvent {
    /// The HSHELL_* code carried in the shell-hook message.
    pub fn code(self) -> u32 {
        match self {
            ShellEvent::WindowCreated => 1,
            ShellEvent::WindowDestroyed => 2,
        }
    }
}

/// OS windowing primitives needed by the entity layer.
///
/// Failures degrade: reads that can fail return `Option`, writes report a
/// `bool` the callers are free to ignore. Nothing here retries or panics.
pub trait WindowServer {
    fn style(&self, window: WindowRef) -> WindowStyle;
    fn set_style(&self, window: WindowRef, style: WindowStyle) -> bool;
    fn ex_style(&self, window: WindowRef) -> ExtendedStyle;
    fn set_ex_style(&self, window: WindowRef, style: ExtendedStyle) -> bool;

    fn placement(&self, window: WindowRef) -> Option<Placement>;
    fn set_placement(&self, window: WindowRef, placement: &Placement) -> bool;

    fn frame(&self, window: WindowRef) -> Option<Rect>;
    /// Positioned write; `flags` select which aspects the OS may change and
    /// whether the write is applied asynchronously.
    fn set_frame(&self, window: WindowRef, frame: Rect, flags: SetPosFlags) -> bool;
    fn redraw(&self, window: WindowRef, flags: RedrawFlags) -> bool;

    /// Non-blocking show/hide honoring `command`'s activation semantics.
    fn show_async(&self, window: WindowRef, command: ShowCommand) -> bool;

    fn is_visible(&self, window: WindowRef) -> bool;
    /// Whether the window object still exists at all, visible or not.
    fn is_live(&self, window: WindowRef) -> bool;

    /// Associate `menu` with the window, or detach any menu when `None`.
    fn set_menu(&self, window: WindowRef, menu: Option<MenuRef>) -> bool;

    /// The window's immediate owner, if it has one.
    fn owner(&self, window: WindowRef) -> Option<WindowRef>;

    /// Fire-and-forget announcement to the taskbar's shell-hook channel.
    fn announce_to_shell(&self, window: WindowRef, event: ShellEvent);
}

/// Walk the owner relation up from `window` until it runs out.
pub fn root_owner(server: &dyn WindowServer, window: WindowRef) -> WindowRef {
    let mut root = window;
    while let Some(owner) = server.owner(root) {
        if owner == root {
            break;
        }
        root = owner;
    }
    root
}
