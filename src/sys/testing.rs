//! Scripted in-memory window server for unit tests.
//!
//! State per window is whatever the test seeds; every accepted write is
//! recorded in an ordered op log so tests can assert exactly which OS calls a
//! code path produced (and, for idempotency, that a repeat produced none).

use std::cell::RefCell;

use crate::common::collections::HashMap;
use crate::sys::geometry::{Placement, Rect, ShowCommand};
use crate::sys::styles::{ExtendedStyle, WindowStyle};
use crate::sys::window_server::{
    MenuRef, RedrawFlags, SetPosFlags, ShellEvent, WindowRef, WindowServer,
};

/// One accepted OS write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetStyle(WindowRef, WindowStyle),
    SetExStyle(WindowRef, ExtendedStyle),
    SetPlacement(WindowRef, Placement),
    SetFrame(WindowRef, Rect, SetPosFlags),
    Redraw(WindowRef, RedrawFlags),
    ShowAsync(WindowRef, ShowCommand),
    SetMenu(WindowRef, Option<MenuRef>),
    Shell(WindowRef, ShellEvent),
}

#[derive(Debug, Clone, Default)]
struct FakeWindow {
    style: WindowStyle,
    ex_style: ExtendedStyle,
    placement: Placement,
    frame: Rect,
    visible: bool,
    live: bool,
    owner: Option<WindowRef>,
    menu: Option<MenuRef>,
}

#[derive(Default)]
pub struct FakeWindowServer {
    windows: RefCell<HashMap<WindowRef, FakeWindow>>,
    ops: RefCell<Vec<Op>>,
}

impl FakeWindowServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a live, visible window with default state.
    pub fn add(&self, window: WindowRef) {
        self.windows.borrow_mut().insert(
            window,
            FakeWindow {
                visible: true,
                live: true,
                frame: Rect::new(100, 100, 500, 400),
                ..FakeWindow::default()
            },
        );
    }

    pub fn put_style(&self, window: WindowRef, style: WindowStyle) {
        self.with(window, |w| w.style = style);
    }

    pub fn put_ex_style(&self, window: WindowRef, ex_style: ExtendedStyle) {
        self.with(window, |w| w.ex_style = ex_style);
    }

    pub fn put_placement(&self, window: WindowRef, placement: Placement) {
        self.with(window, |w| w.placement = placement);
    }

    pub fn put_frame(&self, window: WindowRef, frame: Rect) {
        self.with(window, |w| w.frame = frame);
    }

    pub fn set_owner(&self, window: WindowRef, owner: WindowRef) {
        self.with(window, |w| w.owner = Some(owner));
    }

    pub fn hide(&self, window: WindowRef) {
        self.with(window, |w| w.visible = false);
    }

    pub fn destroy(&self, window: WindowRef) {
        self.with(window, |w| {
            w.live = false;
            w.visible = false;
        });
    }

    pub fn style_of(&self, window: WindowRef) -> WindowStyle {
        self.windows.borrow().get(&window).map(|w| w.style).unwrap_or_default()
    }

    pub fn ex_style_of(&self, window: WindowRef) -> ExtendedStyle {
        self.windows.borrow().get(&window).map(|w| w.ex_style).unwrap_or_default()
    }

    pub fn menu_of(&self, window: WindowRef) -> Option<MenuRef> {
        self.windows.borrow().get(&window).and_then(|w| w.menu)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    fn with(&self, window: WindowRef, update: impl FnOnce(&mut FakeWindow)) {
        let mut windows = self.windows.borrow_mut();
        update(windows.entry(window).or_default());
    }

    fn record(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }

    fn live(&self, window: WindowRef) -> bool {
        self.windows.borrow().get(&window).is_some_and(|w| w.live)
    }
}

impl WindowServer for FakeWindowServer {
    fn style(&self, window: WindowRef) -> WindowStyle {
        self.windows.borrow().get(&window).map(|w| w.style).unwrap_or_default()
    }

    fn set_style(&self, window: WindowRef, style: WindowStyle) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.style = style);
        self.record(Op::SetStyle(window, style));
        true
    }

    fn ex_style(&self, window: WindowRef) -> ExtendedStyle {
        self.windows.borrow().get(&window).map(|w| w.ex_style).unwrap_or_default()
    }

    fn set_ex_style(&self, window: WindowRef, style: ExtendedStyle) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.ex_style = style);
        self.record(Op::SetExStyle(window, style));
        true
    }

    fn placement(&self, window: WindowRef) -> Option<Placement> {
        let windows = self.windows.borrow();
        windows.get(&window).filter(|w| w.live).map(|w| w.placement)
    }

    fn set_placement(&self, window: WindowRef, placement: &Placement) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.placement = *placement);
        self.record(Op::SetPlacement(window, *placement));
        true
    }

    fn frame(&self, window: WindowRef) -> Option<Rect> {
        let windows = self.windows.borrow();
        windows.get(&window).filter(|w| w.live).map(|w| w.frame)
    }

    fn set_frame(&self, window: WindowRef, frame: Rect, flags: SetPosFlags) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.frame = frame);
        self.record(Op::SetFrame(window, frame, flags));
        true
    }

    fn redraw(&self, window: WindowRef, flags: RedrawFlags) -> bool {
        if !self.live(window) {
            return false;
        }
        self.record(Op::Redraw(window, flags));
        true
    }

    fn show_async(&self, window: WindowRef, command: ShowCommand) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.visible = command != ShowCommand::Hide);
        self.record(Op::ShowAsync(window, command));
        true
    }

    fn is_visible(&self, window: WindowRef) -> bool {
        self.windows.borrow().get(&window).is_some_and(|w| w.live && w.visible)
    }

    fn is_live(&self, window: WindowRef) -> bool {
        self.live(window)
    }

    fn set_menu(&self, window: WindowRef, menu: Option<MenuRef>) -> bool {
        if !self.live(window) {
            return false;
        }
        self.with(window, |w| w.menu = menu);
        self.record(Op::SetMenu(window, menu));
        true
    }

    fn owner(&self, window: WindowRef) -> Option<WindowRef> {
        self.windows.borrow().get(&window).and_then(|w| w.owner)
    }

    fn announce_to_shell(&self, window: WindowRef, event: ShellEvent) {
        // Posting to the shell channel is advisory; it has no failure path.
        self.record(Op::Shell(window, event));
    }
}
