//! The set of auxiliary windows owned by a managed top-level window.
//!
//! The OS is inconsistent about delivering hide/destroy notifications for
//! owned windows: duplicates, gaps and reordering are all observed in the
//! wild. So the registry never trusts a single notification. Registration
//! tolerates re-announcement of the whole owned set, and every walk of the
//! list re-checks liveness and prunes what the OS no longer reports, which
//! makes repeated enumeration converge on the true live set.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::common::collections::HashSet;
use crate::sys::window_server::{WindowRef, WindowServer};

/// Decides whether a candidate window belongs to a given top-level window.
/// Supplied by configuration; must be pure per candidate and safe to call
/// redundantly.
pub type OwnedWindowPredicate = Rc<dyn Fn(&dyn WindowServer, WindowRef) -> bool>;

/// Ordered, duplicate-free list of owned windows. The first element is
/// always the owning window's own handle and is never removed.
pub struct OwnedWindows {
    windows: Vec<WindowRef>,
    // Membership index; rebuilt whenever pruning shrinks the list.
    members: HashSet<WindowRef>,
    matches: OwnedWindowPredicate,
}

impl OwnedWindows {
    pub fn new(own: WindowRef, matches: OwnedWindowPredicate) -> Self {
        let mut members = HashSet::default();
        members.insert(own);
        OwnedWindows { windows: vec![own], members, matches }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Always false: the owner's own handle is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Offer a candidate to the registry. Returns whether the ownership
    /// predicate accepted it, whether or not it was newly added.
    ///
    /// Some applications re-announce every owned window each time their main
    /// window is shown (media players with dozens of tool popups are the
    /// worst case), so membership is checked against the whole list rather
    /// than appending blindly.
    pub fn register(&mut self, server: &dyn WindowServer, candidate: WindowRef) -> bool {
        if !(self.matches)(server, candidate) {
            return false;
        }
        if self.members.insert(candidate) {
            trace!(window = ?candidate, "registered owned window");
            self.windows.push(candidate);
        }
        true
    }

    /// Walk the owned set, dropping entries the OS no longer reports as
    /// live. The first element is the owner itself and is yielded without
    /// any check; pruning of the rest is permanent.
    ///
    /// While the owner is visible its owned windows are expected to be
    /// visible too, so visibility is the pruning test. A hidden owner hides
    /// its owned windows with it; existence is the only usable signal then.
    pub fn enumerate<'a>(
        &'a mut self,
        server: &'a dyn WindowServer,
    ) -> impl Iterator<Item = WindowRef> + 'a {
        if self.windows.len() > 1 {
            self.prune(server);
        }
        self.windows.iter().copied()
    }

    fn prune(&mut self, server: &dyn WindowServer) {
        let own = self.windows[0];
        let check_visibility = server.is_visible(own);
        let before = self.windows.len();
        self.windows.retain(|&window| {
            window == own
                || if check_visibility {
                    server.is_visible(window)
                } else {
                    server.is_live(window)
                }
        });
        if self.windows.len() != before {
            trace!(
                owner = ?own,
                dropped = before - self.windows.len(),
                "pruned dead owned windows"
            );
            self.members = self.windows.iter().copied().collect();
        }
    }
}

impl fmt::Debug for OwnedWindows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedWindows").field("windows", &self.windows).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::{OwnedWindowPredicate, OwnedWindows};
    use crate::sys::testing::FakeWindowServer;
    use crate::sys::window_server::{WindowRef, WindowServer};

    const OWN: WindowRef = WindowRef(1);
    const A: WindowRef = WindowRef(2);
    const B: WindowRef = WindowRef(3);

    fn accept_all() -> OwnedWindowPredicate {
        Rc::new(|_: &dyn WindowServer, _: WindowRef| true)
    }

    fn reject_all() -> OwnedWindowPredicate {
        Rc::new(|_: &dyn WindowServer, _: WindowRef| false)
    }

    fn collect(owned: &mut OwnedWindows, server: &FakeWindowServer) -> Vec<WindowRef> {
        owned.enumerate(server).collect()
    }

    fn server_with(windows: &[WindowRef]) -> FakeWindowServer {
        let server = FakeWindowServer::new();
        for &window in windows {
            server.add(window);
        }
        server
    }

    #[test]
    fn registration_is_idempotent() {
        let server = server_with(&[OWN, A, B]);
        let mut owned = OwnedWindows::new(OWN, accept_all());

        assert!(owned.register(&server, A));
        assert!(owned.register(&server, B));
        assert!(owned.register(&server, A));

        assert_eq!(collect(&mut owned, &server), vec![OWN, A, B]);
    }

    #[test]
    fn rejected_candidates_are_not_added() {
        let server = server_with(&[OWN, A]);
        let mut owned = OwnedWindows::new(OWN, reject_all());

        assert!(!owned.register(&server, A));
        assert_eq!(collect(&mut owned, &server), vec![OWN]);
    }

    #[test]
    fn single_entry_fast_path_skips_liveness_checks() {
        let server = server_with(&[OWN]);
        server.destroy(OWN);
        let mut owned = OwnedWindows::new(OWN, accept_all());

        // A dead own handle is still yielded: nothing is checked on the
        // fast path.
        assert_eq!(collect(&mut owned, &server), vec![OWN]);
    }

    #[test]
    fn own_handle_is_yielded_first_even_when_everything_else_is_pruned() {
        let server = server_with(&[OWN, A, B]);
        let mut owned = OwnedWindows::new(OWN, accept_all());
        owned.register(&server, A);
        owned.register(&server, B);

        server.destroy(A);
        server.destroy(B);

        assert_eq!(collect(&mut owned, &server), vec![OWN]);
        assert_eq!(collect(&mut owned, &server), vec![OWN]);
    }

    #[test_log::test]
    fn visible_owner_prunes_by_visibility() {
        let server = server_with(&[OWN, A, B]);
        let mut owned = OwnedWindows::new(OWN, accept_all());
        owned.register(&server, A);
        owned.register(&server, B);

        server.hide(A);

        assert_eq!(collect(&mut owned, &server), vec![OWN, B]);
        assert_eq!(owned.len(), 2);
    }

    #[test_log::test]
    fn hidden_owner_falls_back_to_existence_test() {
        let server = server_with(&[OWN, A, B]);
        let mut owned = OwnedWindows::new(OWN, accept_all());
        owned.register(&server, A);
        owned.register(&server, B);

        server.hide(OWN);
        server.hide(A);
        server.destroy(B);

        // A is hidden but still exists, so it survives; B is gone.
        assert_eq!(collect(&mut owned, &server), vec![OWN, A]);
    }

    #[test]
    fn pruning_is_permanent() {
        let server = server_with(&[OWN, A]);
        let mut owned = OwnedWindows::new(OWN, accept_all());
        owned.register(&server, A);

        server.hide(A);
        assert_eq!(collect(&mut owned, &server), vec![OWN]);

        // The OS showing the window again does not resurrect the entry.
        server.add(A);
        assert_eq!(collect(&mut owned, &server), vec![OWN]);
    }

    #[test]
    fn pruned_windows_may_be_registered_again() {
        let server = server_with(&[OWN, A]);
        let mut owned = OwnedWindows::new(OWN, accept_all());
        owned.register(&server, A);

        server.destroy(A);
        assert_eq!(collect(&mut owned, &server), vec![OWN]);

        server.add(A);
        assert!(owned.register(&server, A));
        assert_eq!(collect(&mut owned, &server), vec![OWN, A]);
    }
}
