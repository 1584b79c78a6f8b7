//! A top-level window under management.
//!
//! [`ManagedWindow`] carries the configuration a window was matched with,
//! the presentation flags the user can toggle at runtime, the placement used
//! to park and restore it across workspace switches, and the registry of
//! windows the same application owns. Style changes are expressed against
//! the style mask captured at discovery, so toggling an attribute off and on
//! reproduces the window's own look rather than imposing a stock one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::model::owned_windows::{OwnedWindowPredicate, OwnedWindows};
use crate::sys::geometry::{Placement, PlacementFlags, ShowCommand};
use crate::sys::styles::{ExtendedStyle, WindowStyle};
use crate::sys::window_server::{
    MenuRef, RedrawFlags, SetPosFlags, ShellEvent, WindowRef, WindowServer, root_owner,
};

/// Height delta used by the repaint nudge. One pixel is enough to force a
/// frame recalculation; the exact value is a workaround knob, not a contract.
const FRAME_NUDGE_PX: i32 = 1;

/// Three-state setting for a managed presentation attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    Shown,
    Hidden,
    /// Not managed: leave whatever the OS currently reports untouched.
    AsIs,
}

impl Visibility {
    /// The two-valued flip used by the toggle commands. An unmanaged
    /// attribute becomes managed-hidden on its first toggle.
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Shown => Visibility::Hidden,
            Visibility::Hidden => Visibility::Shown,
            Visibility::AsIs => Visibility::Hidden,
        }
    }
}

/// What the manager should do when a window it hid announces itself again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HiddenWindowShownAction {
    SwitchToWorkspace,
    MoveToCurrentWorkspace,
    TemporarilyShow,
    HideWindow,
}

impl Default for HiddenWindowShownAction {
    fn default() -> Self {
        HiddenWindowShownAction::SwitchToWorkspace
    }
}

/// A native window's identity: its own handle and the top of its owner
/// chain. The root owner is resolved once at construction and frozen.
#[derive(Debug, Clone, Copy)]
pub struct WindowIdentity {
    handle: WindowRef,
    root_owner: WindowRef,
}

impl WindowIdentity {
    pub fn new(server: &dyn WindowServer, handle: WindowRef) -> Self {
        WindowIdentity { handle, root_owner: root_owner(server, handle) }
    }

    pub fn handle(&self) -> WindowRef {
        self.handle
    }

    pub fn root_owner(&self) -> WindowRef {
        self.root_owner
    }
}

// Identity is the handle alone; the resolved owner never participates, so a
// re-resolved identity compares equal to the original.
impl PartialEq for WindowIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for WindowIdentity {}

impl Hash for WindowIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

/// Immutable per-window configuration decided by rule matching.
#[derive(Clone)]
pub struct WindowRule {
    pub is_floating: bool,
    pub titlebar: Visibility,
    pub alt_tab_taskbar: Visibility,
    pub borders: Visibility,
    pub redraw_on_show: bool,
    pub hide_from_alt_tab_when_inactive: bool,
    pub show_menu: bool,
    pub update_icon: bool,
    pub hidden_shown_action: HiddenWindowShownAction,
    /// Ownership test for auxiliary windows. `None` selects the default:
    /// a candidate is owned if its root owner is this window.
    pub owned_predicate: Option<OwnedWindowPredicate>,
}

impl Default for WindowRule {
    fn default() -> Self {
        WindowRule {
            is_floating: false,
            titlebar: Visibility::AsIs,
            alt_tab_taskbar: Visibility::AsIs,
            borders: Visibility::AsIs,
            redraw_on_show: false,
            hide_from_alt_tab_when_inactive: false,
            show_menu: true,
            update_icon: false,
            hidden_shown_action: HiddenWindowShownAction::default(),
            owned_predicate: None,
        }
    }
}

impl fmt::Debug for WindowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRule")
            .field("is_floating", &self.is_floating)
            .field("titlebar", &self.titlebar)
            .field("alt_tab_taskbar", &self.alt_tab_taskbar)
            .field("borders", &self.borders)
            .field("redraw_on_show", &self.redraw_on_show)
            .field(
                "hide_from_alt_tab_when_inactive",
                &self.hide_from_alt_tab_when_inactive,
            )
            .field("show_menu", &self.show_menu)
            .field("update_icon", &self.update_icon)
            .field("hidden_shown_action", &self.hidden_shown_action)
            .field("owned_predicate", &self.owned_predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Facts captured from the OS and process inspection at discovery time.
#[derive(Debug, Clone)]
pub struct WindowDescriptor {
    pub class_name: String,
    pub display_name: String,
    pub process_name: String,
    pub workspaces_count: usize,
    pub is_64_bit: bool,
    pub original_style: WindowStyle,
    pub original_ex_style: ExtendedStyle,
    pub menu: Option<MenuRef>,
}

/// A top-level window under management.
pub struct ManagedWindow {
    identity: WindowIdentity,

    // Presentation flags toggled at runtime.
    titlebar: Visibility,
    alt_tab_taskbar: Visibility,
    borders: Visibility,
    menu_visible: bool,

    // Mutable bookkeeping owned by the embedding manager.
    pub is_floating: bool,
    pub display_name: String,
    /// Number of workspaces sharing this window; above one it is rendered
    /// on several workspaces at once.
    pub workspaces_count: usize,

    // Immutable configuration and discovery-time facts.
    class_name: String,
    process_name: String,
    is_64_bit: bool,
    redraw_on_show: bool,
    update_icon: bool,
    hide_from_alt_tab_when_inactive: bool,
    hidden_shown_action: HiddenWindowShownAction,
    menu: Option<MenuRef>,
    original_style: WindowStyle,
    original_ex_style: ExtendedStyle,

    placement: Placement,
    original_placement: Placement,

    owned: OwnedWindows,
}

impl ManagedWindow {
    pub fn new(
        server: &dyn WindowServer,
        handle: WindowRef,
        descriptor: WindowDescriptor,
        rule: WindowRule,
    ) -> Self {
        let identity = WindowIdentity::new(server, handle);
        let matches = rule.owned_predicate.clone().unwrap_or_else(|| {
            let own = handle;
            Rc::new(move |server: &dyn WindowServer, candidate: WindowRef| {
                root_owner(server, candidate) == own
            })
        });
        let placement = server.placement(handle).unwrap_or_default();

        ManagedWindow {
            identity,
            titlebar: rule.titlebar,
            alt_tab_taskbar: rule.alt_tab_taskbar,
            borders: rule.borders,
            menu_visible: rule.show_menu,
            is_floating: rule.is_floating,
            display_name: descriptor.display_name,
            workspaces_count: descriptor.workspaces_count,
            class_name: descriptor.class_name,
            process_name: descriptor.process_name,
            is_64_bit: descriptor.is_64_bit,
            redraw_on_show: rule.redraw_on_show,
            update_icon: rule.update_icon,
            hide_from_alt_tab_when_inactive: rule.hide_from_alt_tab_when_inactive,
            hidden_shown_action: rule.hidden_shown_action,
            menu: descriptor.menu,
            original_style: descriptor.original_style,
            original_ex_style: descriptor.original_ex_style,
            placement,
            original_placement: placement,
            owned: OwnedWindows::new(handle, matches),
        }
    }

    pub fn handle(&self) -> WindowRef {
        self.identity.handle()
    }

    pub fn root_owner(&self) -> WindowRef {
        self.identity.root_owner()
    }

    pub fn identity(&self) -> WindowIdentity {
        self.identity
    }

    pub fn titlebar(&self) -> Visibility {
        self.titlebar
    }

    pub fn borders(&self) -> Visibility {
        self.borders
    }

    pub fn alt_tab_taskbar(&self) -> Visibility {
        self.alt_tab_taskbar
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn is_64_bit(&self) -> bool {
        self.is_64_bit
    }

    pub fn redraw_on_show(&self) -> bool {
        self.redraw_on_show
    }

    pub fn update_icon(&self) -> bool {
        self.update_icon
    }

    pub fn hide_from_alt_tab_when_inactive(&self) -> bool {
        self.hide_from_alt_tab_when_inactive
    }

    pub fn hidden_shown_action(&self) -> HiddenWindowShownAction {
        self.hidden_shown_action
    }

    pub fn menu(&self) -> Option<MenuRef> {
        self.menu
    }

    pub fn original_style(&self) -> WindowStyle {
        self.original_style
    }

    pub fn original_ex_style(&self) -> ExtendedStyle {
        self.original_ex_style
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn original_placement(&self) -> Placement {
        self.original_placement
    }

    /// Push the three visibility flags down into the OS style masks.
    /// Idempotent: a second call with no external change writes nothing.
    pub fn apply(&mut self, server: &dyn WindowServer) {
        let handle = self.handle();
        let mut style = server.style(handle);
        let mut ex_style = server.ex_style(handle);
        let prev_style = style;
        let mut prev_ex_style = ex_style;

        // Template bits come from the mask captured at discovery, so a
        // toggle restores what this window had, not a stock frame.
        let titlebar_bits = self.original_style & WindowStyle::OVERLAPPED_WINDOW;
        let border_bits = self.original_style & WindowStyle::SIZE_BOX;
        let border_edge_bits = self.original_ex_style & ExtendedStyle::FRAME_EDGES;

        if self.alt_tab_taskbar != Visibility::AsIs {
            self.set_alt_tab_taskbar_visibility(
                server,
                self.alt_tab_taskbar == Visibility::Shown,
            );
            // The primitive writes the alt-tab bits itself; rebase the
            // working copy so the border masking below cannot undo them.
            ex_style = server.ex_style(handle);
            prev_ex_style = ex_style;
        }

        match self.titlebar {
            Visibility::Shown => style.insert(titlebar_bits),
            Visibility::Hidden => style.remove(titlebar_bits),
            Visibility::AsIs => {}
        }
        match self.borders {
            Visibility::Shown => {
                style.insert(border_bits);
                ex_style.insert(border_edge_bits);
            }
            Visibility::Hidden => {
                style.remove(border_bits);
                ex_style.remove(border_edge_bits);
            }
            Visibility::AsIs => {}
        }

        // Redundant writes provoke repaint and notification storms on some
        // window classes; only touch what actually changed.
        if style != prev_style {
            debug!(window = ?handle, ?style, "writing window style");
            server.set_style(handle, style);
        }
        if ex_style != prev_ex_style {
            debug!(window = ?handle, ?ex_style, "writing extended window style");
            server.set_ex_style(handle, ex_style);
        }
        if style != prev_style || ex_style != prev_ex_style {
            self.redraw(server);
        }
    }

    /// Put the window into or take it out of alt-tab and the taskbar.
    ///
    /// Two independent signals: the tool-window/app-window style bits, and a
    /// synthetic shell event for the taskbar buttons. Neither alone is
    /// honored by every shell, so both are sent; the shell post has no
    /// result to wait on.
    pub fn set_alt_tab_taskbar_visibility(&self, server: &dyn WindowServer, show: bool) {
        let handle = self.handle();
        let ex_style = server.ex_style(handle);
        let mut wanted = ex_style;
        if show {
            wanted.insert(ExtendedStyle::APP_WINDOW);
            wanted.remove(ExtendedStyle::TOOL_WINDOW);
        } else {
            wanted.remove(ExtendedStyle::APP_WINDOW);
            wanted.insert(ExtendedStyle::TOOL_WINDOW);
        }
        if wanted != ex_style {
            server.set_ex_style(handle, wanted);
        }

        let event =
            if show { ShellEvent::WindowCreated } else { ShellEvent::WindowDestroyed };
        trace!(window = ?handle, ?event, "announcing taskbar presence");
        server.announce_to_shell(handle, event);
    }

    pub fn toggle_titlebar(&mut self, server: &dyn WindowServer) {
        self.titlebar = self.titlebar.toggled();
        debug!(window = ?self.handle(), titlebar = %self.titlebar, "toggled titlebar");
        self.apply(server);
    }

    pub fn toggle_borders(&mut self, server: &dyn WindowServer) {
        self.borders = self.borders.toggled();
        debug!(window = ?self.handle(), borders = %self.borders, "toggled borders");
        self.apply(server);
    }

    pub fn toggle_alt_tab_taskbar(&mut self, server: &dyn WindowServer) {
        self.alt_tab_taskbar = self.alt_tab_taskbar.toggled();
        self.set_alt_tab_taskbar_visibility(
            server,
            self.alt_tab_taskbar == Visibility::Shown,
        );
    }

    /// Flip system-menu visibility. Returns whether the OS accepted the new
    /// association; a window without a captured menu is a no-op `false`.
    pub fn toggle_system_menu(&mut self, server: &dyn WindowServer) -> bool {
        self.menu_visible = !self.menu_visible;
        self.apply_system_menu(server)
    }

    fn apply_system_menu(&self, server: &dyn WindowServer) -> bool {
        let Some(menu) = self.menu else {
            return false;
        };
        let accepted = server.set_menu(self.handle(), self.menu_visible.then_some(menu));
        if !accepted {
            warn!(window = ?self.handle(), "menu association rejected");
        }
        accepted
    }

    /// Force a frame repaint without moving, resizing or activating.
    ///
    /// A pure style-bit write leaves stale frames on many window classes;
    /// shrinking the window by a pixel and putting it back is the only
    /// approach that has proven to repaint reliably.
    pub fn redraw(&self, server: &dyn WindowServer) {
        let handle = self.handle();
        let Some(frame) = server.frame(handle) else {
            return;
        };
        let flags = SetPosFlags::ASYNC_WINDOW_POS
            | SetPosFlags::FRAME_CHANGED
            | SetPosFlags::NO_MOVE
            | SetPosFlags::NO_ZORDER
            | SetPosFlags::NO_ACTIVATE
            | SetPosFlags::NO_OWNER_ZORDER
            | SetPosFlags::NO_COPY_BITS;
        let mut nudged = frame;
        nudged.bottom -= FRAME_NUDGE_PX;
        server.set_frame(handle, nudged, flags);
        server.set_frame(handle, frame, flags);
        server.redraw(
            handle,
            RedrawFlags::INVALIDATE | RedrawFlags::ERASE | RedrawFlags::ALL_CHILDREN,
        );
    }

    /// Record the window's current placement, so the geometry it had before
    /// being hidden can be restored later.
    pub fn snapshot(&mut self, server: &dyn WindowServer) {
        if let Some(placement) = server.placement(self.handle()) {
            self.placement = placement;
        }
    }

    /// Re-apply the recorded placement asynchronously and without stealing
    /// focus. With `suppress_show` the window is written back hidden; the
    /// recorded show command survives for later calls.
    pub fn restore(&mut self, server: &dyn WindowServer, suppress_show: bool) {
        let saved_show = self.placement.show;
        if suppress_show {
            self.placement.show = ShowCommand::Hide;
        } else {
            self.placement.show = self.placement.show.without_activation();
        }
        self.placement.flags.insert(PlacementFlags::ASYNC_WINDOW_PLACEMENT);

        debug!(window = ?self.handle(), show = ?self.placement.show, "restoring placement");
        if !server.set_placement(self.handle(), &self.placement) {
            warn!(window = ?self.handle(), "placement restore rejected");
        }

        if suppress_show {
            self.placement.show = saved_show;
        }
    }

    /// Show this window and every live owned window, asynchronously and
    /// without activation. Walking the owned set prunes dead entries as a
    /// byproduct.
    pub fn show_async(&mut self, server: &dyn WindowServer) {
        if self.redraw_on_show {
            self.redraw(server);
        }
        for window in self.owned.enumerate(server) {
            server.show_async(window, ShowCommand::ShowNa);
        }
    }

    /// Offer a candidate to the owned-window registry.
    pub fn register_owned(&mut self, server: &dyn WindowServer, candidate: WindowRef) -> bool {
        self.owned.register(server, candidate)
    }

    /// The live owned set, own handle first. Consuming the iterator prunes
    /// entries the OS no longer reports.
    pub fn owned_windows<'a>(
        &'a mut self,
        server: &'a dyn WindowServer,
    ) -> impl Iterator<Item = WindowRef> + 'a {
        self.owned.enumerate(server)
    }

    /// Put the window back the way it was found: all managed attributes
    /// shown, menu restored, placement as captured at discovery. Used when
    /// management ends so the window survives the manager unchanged.
    pub fn revert_to_initial_values(&mut self, server: &dyn WindowServer) {
        self.titlebar = Visibility::Shown;
        self.alt_tab_taskbar = Visibility::Shown;
        self.borders = Visibility::Shown;
        self.apply(server);

        if !self.menu_visible {
            self.toggle_system_menu(server);
        }

        self.placement = self.original_placement;
        self.restore(server, false);
        self.show_async(server);
    }
}

impl fmt::Debug for ManagedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedWindow")
            .field("identity", &self.identity)
            .field("display_name", &self.display_name)
            .field("class_name", &self.class_name)
            .field("process_name", &self.process_name)
            .field("titlebar", &self.titlebar)
            .field("borders", &self.borders)
            .field("alt_tab_taskbar", &self.alt_tab_taskbar)
            .field("owned", &self.owned)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ManagedWindow {
    fn eq(&self, other: &Self) -> bool {
        self.handle() == other.handle()
    }
}

impl Eq for ManagedWindow {}

impl Hash for ManagedWindow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle().hash(state);
    }
}
