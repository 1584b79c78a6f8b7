//! Win32 implementation of [`WindowServer`].
//!
//! Thin, stateless conversions around user32. Failures are swallowed into
//! the trait's `Option`/`bool` results; the entity layer treats them as
//! "window is gone" and prunes or skips accordingly.

use windows::Win32::Foundation::{HWND, LPARAM, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{REDRAW_WINDOW_FLAGS, RedrawWindow};
use windows::Win32::UI::WindowsAndMessaging::{
    GW_OWNER, GWL_EXSTYLE, GWL_STYLE, GetWindow, GetWindowLongPtrW, GetWindowPlacement,
    GetWindowRect, HMENU, IsWindow, IsWindowVisible, PostMessageW, RegisterWindowMessageW,
    SET_WINDOW_POS_FLAGS, SHOW_WINDOW_CMD, SetMenu, SetWindowLongPtrW, SetWindowPlacement,
    SetWindowPos, ShowWindowAsync, WINDOWPLACEMENT, WINDOWPLACEMENT_FLAGS,
};
use windows::core::w;

use crate::sys::geometry::{Placement, PlacementFlags, Point, Rect, ShowCommand};
use crate::sys::styles::{ExtendedStyle, WindowStyle};
use crate::sys::window_server::{
    MenuRef, RedrawFlags, SetPosFlags, ShellEvent, WindowRef, WindowServer,
};

pub struct Win32WindowServer {
    /// The shell window owning the taskbar buttons. Process-wide state,
    /// resolved once at manager startup and injected here.
    taskbar_buttons: WindowRef,
    shell_hook_message: u32,
}

impl Win32WindowServer {
    pub fn new(taskbar_buttons: WindowRef) -> Self {
        let shell_hook_message = unsafe { RegisterWindowMessageW(w!("SHELLHOOK")) };
        Win32WindowServer { taskbar_buttons, shell_hook_message }
    }
}

fn hwnd(window: WindowRef) -> HWND {
    HWND(window.0 as *mut core::ffi::c_void)
}

fn to_native_placement(placement: &Placement) -> WINDOWPLACEMENT {
    WINDOWPLACEMENT {
        length: size_of::<WINDOWPLACEMENT>() as u32,
        flags: WINDOWPLACEMENT_FLAGS(placement.flags.bits()),
        showCmd: SHOW_WINDOW_CMD(placement.show.as_u32() as i32),
        ptMinPosition: POINT { x: placement.min_position.x, y: placement.min_position.y },
        ptMaxPosition: POINT { x: placement.max_position.x, y: placement.max_position.y },
        rcNormalPosition: RECT {
            left: placement.normal_frame.left,
            top: placement.normal_frame.top,
            right: placement.normal_frame.right,
            bottom: placement.normal_frame.bottom,
        },
    }
}

impl WindowServer for Win32WindowServer {
    fn style(&self, window: WindowRef) -> WindowStyle {
        let bits = unsafe { GetWindowLongPtrW(hwnd(window), GWL_STYLE) };
        WindowStyle::from_bits_retain(bits as u32)
    }

    fn set_style(&self, window: WindowRef, style: WindowStyle) -> bool {
        unsafe { SetWindowLongPtrW(hwnd(window), GWL_STYLE, style.bits() as isize) != 0 }
    }

    fn ex_style(&self, window: WindowRef) -> ExtendedStyle {
        let bits = unsafe { GetWindowLongPtrW(hwnd(window), GWL_EXSTYLE) };
        ExtendedStyle::from_bits_retain(bits as u32)
    }

    fn set_ex_style(&self, window: WindowRef, style: ExtendedStyle) -> bool {
        unsafe { SetWindowLongPtrW(hwnd(window), GWL_EXSTYLE, style.bits() as isize) != 0 }
    }

    fn placement(&self, window: WindowRef) -> Option<Placement> {
        let mut native = WINDOWPLACEMENT {
            length: size_of::<WINDOWPLACEMENT>() as u32,
            ..WINDOWPLACEMENT::default()
        };
        unsafe { GetWindowPlacement(hwnd(window), &mut native) }.ok()?;
        Some(Placement {
            flags: PlacementFlags::from_bits_retain(native.flags.0),
            show: ShowCommand::from_u32(native.showCmd.0 as u32)?,
            min_position: Point::new(native.ptMinPosition.x, native.ptMinPosition.y),
            max_position: Point::new(native.ptMaxPosition.x, native.ptMaxPosition.y),
            normal_frame: Rect::new(
                native.rcNormalPosition.left,
                native.rcNormalPosition.top,
                native.rcNormalPosition.right,
                native.rcNormalPosition.bottom,
            ),
        })
    }

    fn set_placement(&self, window: WindowRef, placement: &Placement) -> bool {
        let native = to_native_placement(placement);
        unsafe { SetWindowPlacement(hwnd(window), &native) }.is_ok()
    }

    fn frame(&self, window: WindowRef) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect) }.ok()?;
        Some(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn set_frame(&self, window: WindowRef, frame: Rect, flags: SetPosFlags) -> bool {
        unsafe {
            SetWindowPos(
                hwnd(window),
                None,
                frame.left,
                frame.top,
                frame.width(),
                frame.height(),
                SET_WINDOW_POS_FLAGS(flags.bits()),
            )
        }
        .is_ok()
    }

    fn redraw(&self, window: WindowRef, flags: RedrawFlags) -> bool {
        unsafe {
            RedrawWindow(
                Some(hwnd(window)),
                None,
                None,
                REDRAW_WINDOW_FLAGS(flags.bits()),
            )
        }
        .as_bool()
    }

    fn show_async(&self, window: WindowRef, command: ShowCommand) -> bool {
        unsafe { ShowWindowAsync(hwnd(window), SHOW_WINDOW_CMD(command.as_u32() as i32)) }
            .as_bool()
    }

    fn is_visible(&self, window: WindowRef) -> bool {
        unsafe { IsWindowVisible(hwnd(window)) }.as_bool()
    }

    fn is_live(&self, window: WindowRef) -> bool {
        unsafe { IsWindow(Some(hwnd(window))) }.as_bool()
    }

    fn set_menu(&self, window: WindowRef, menu: Option<MenuRef>) -> bool {
        let native = menu.map(|m| HMENU(m.0 as *mut core::ffi::c_void));
        unsafe { SetMenu(hwnd(window), native) }.is_ok()
    }

    fn owner(&self, window: WindowRef) -> Option<WindowRef> {
        let owner = unsafe { GetWindow(hwnd(window), GW_OWNER) }.ok()?;
        if owner.is_invalid() {
            return None;
        }
        Some(WindowRef(owner.0 as isize))
    }

    fn announce_to_shell(&self, window: WindowRef, event: ShellEvent) {
        // The taskbar only reliably picks up presence changes from the shell
        // hook channel; the style bits alone are not enough on every shell.
        let _ = unsafe {
            PostMessageW(
                Some(hwnd(self.taskbar_buttons)),
                self.shell_hook_message,
                WPARAM(event.code() as usize),
                LPARAM(window.0),
            )
        };
    }
}
