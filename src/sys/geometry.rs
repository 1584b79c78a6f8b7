//! Window geometry and placement as the OS tracks them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Edge-based rectangle in screen coordinates, matching the native layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Show commands understood by the OS, in ABI order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowCommand {
    Hide,
    ShowNormal,
    ShowMinimized,
    ShowMaximized,
    ShowNoActivate,
    Show,
    Minimize,
    ShowMinNoActive,
    ShowNa,
    Restore,
    ShowDefault,
    ForceMinimize,
}

impl Default for ShowCommand {
    fn default() -> Self {
        ShowCommand::ShowNormal
    }
}

impl ShowCommand {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        use ShowCommand::*;
        Some(match value {
            0 => Hide,
            1 => ShowNormal,
            2 => ShowMinimized,
            3 => ShowMaximized,
            4 => ShowNoActivate,
            5 => Show,
            6 => Minimize,
            7 => ShowMinNoActive,
            8 => ShowNa,
            9 => Restore,
            10 => ShowDefault,
            11 => ForceMinimize,
            _ => return None,
        })
    }

    /// The non-activating equivalent used when a placement is re-applied, so
    /// restoring a window never steals input focus. Commands outside the
    /// substitution table pass through unchanged.
    pub fn without_activation(self) -> Self {
        match self {
            ShowCommand::ShowNormal => ShowCommand::ShowNoActivate,
            ShowCommand::Show => ShowCommand::ShowNa,
            ShowCommand::ShowMinimized => ShowCommand::ShowMinNoActive,
            other => other,
        }
    }
}

bitflags! {
    /// WINDOWPLACEMENT flag bits.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct PlacementFlags: u32 {
        const SET_MIN_POSITION = 0x0001;
        const RESTORE_TO_MAXIMIZED = 0x0002;
        const ASYNC_WINDOW_PLACEMENT = 0x0004;
    }
}

/// A window's position, size and show state as tracked by the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub flags: PlacementFlags,
    pub show: ShowCommand,
    pub min_position: Point,
    pub max_position: Point,
    pub normal_frame: Rect,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn show_command_round_trips_through_abi_values() {
        for value in 0..12 {
            let command = ShowCommand::from_u32(value).expect("in-range show command");
            assert_eq!(command.as_u32(), value);
        }
        assert_eq!(ShowCommand::from_u32(12), None);
    }

    #[test]
    fn without_activation_substitutes_only_activating_commands() {
        assert_eq!(
            ShowCommand::ShowNormal.without_activation(),
            ShowCommand::ShowNoActivate
        );
        assert_eq!(ShowCommand::Show.without_activation(), ShowCommand::ShowNa);
        assert_eq!(
            ShowCommand::ShowMinimized.without_activation(),
            ShowCommand::ShowMinNoActive
        );
        assert_eq!(ShowCommand::Hide.without_activation(), ShowCommand::Hide);
        assert_eq!(
            ShowCommand::ShowMaximized.without_activation(),
            ShowCommand::ShowMaximized
        );
    }

    #[test]
    fn rect_extents() {
        let rect = Rect::new(10, 20, 110, 70);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
    }
}
