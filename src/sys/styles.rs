//! Window style and extended-style bitmasks.
//!
//! Values mirror the native ABI so a mask captured from a live window can be
//! replayed verbatim. Bits the crate never touches still round-trip: masks
//! are built with `from_bits_retain` and mutated only through
//! `insert`/`remove`, which preserve unnamed bits.

use bitflags::bitflags;

bitflags! {
    /// The window style mask (GWL_STYLE).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WindowStyle: u32 {
        const MAXIMIZE_BOX = 0x0001_0000;
        const MINIMIZE_BOX = 0x0002_0000;
        /// The resize border, also known as the thick frame.
        const SIZE_BOX = 0x0004_0000;
        const SYS_MENU = 0x0008_0000;
        const H_SCROLL = 0x0010_0000;
        const V_SCROLL = 0x0020_0000;
        const DLG_FRAME = 0x0040_0000;
        const BORDER = 0x0080_0000;
        const CAPTION = Self::BORDER.bits() | Self::DLG_FRAME.bits();
        const MAXIMIZE = 0x0100_0000;
        const CLIP_CHILDREN = 0x0200_0000;
        const CLIP_SIBLINGS = 0x0400_0000;
        const DISABLED = 0x0800_0000;
        const VISIBLE = 0x1000_0000;
        const MINIMIZE = 0x2000_0000;
        const CHILD = 0x4000_0000;
        const POPUP = 0x8000_0000;
        /// The standard overlapped-window group: caption, system menu,
        /// resize border and the minimize/maximize boxes. This is the bit
        /// group a titlebar toggle adds or strips.
        const OVERLAPPED_WINDOW = Self::CAPTION.bits()
            | Self::SYS_MENU.bits()
            | Self::SIZE_BOX.bits()
            | Self::MINIMIZE_BOX.bits()
            | Self::MAXIMIZE_BOX.bits();
    }
}

bitflags! {
    /// The extended window style mask (GWL_EXSTYLE).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ExtendedStyle: u32 {
        const DLG_MODAL_FRAME = 0x0000_0001;
        const TOP_MOST = 0x0000_0008;
        /// Tool windows are excluded from alt-tab and the taskbar.
        const TOOL_WINDOW = 0x0000_0080;
        const WINDOW_EDGE = 0x0000_0100;
        const CLIENT_EDGE = 0x0000_0200;
        const STATIC_EDGE = 0x0002_0000;
        /// Forces a top-level window onto the taskbar when visible.
        const APP_WINDOW = 0x0004_0000;
        const LAYERED = 0x0008_0000;
        const NO_ACTIVATE = 0x0800_0000;
        const OVERLAPPED_WINDOW = Self::WINDOW_EDGE.bits() | Self::CLIENT_EDGE.bits();
        /// Every edge/frame bit a border toggle adds or strips.
        const FRAME_EDGES = Self::OVERLAPPED_WINDOW.bits()
            | Self::DLG_MODAL_FRAME.bits()
            | Self::STATIC_EDGE.bits();
    }
}
