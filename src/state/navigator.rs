/// Flat-list navigator for keyboard traversal
///
/// Maintains the linear sharp-then-blurry order over the current view
/// and a focus position into it. Two states: idle (nothing focused)
/// and focused (valid index). Advance/retreat wrap circularly and are
/// silent no-ops while the list is empty.

use super::data::Partition;

#[derive(Debug, Default)]
pub struct Navigator {
    /// Source references in traversal order
    flat: Vec<String>,
    /// None = idle; Some(i) is always a valid index into `flat`
    active: Option<usize>,
}

impl Navigator {
    /// Rebuild the flat list from a freshly derived view.
    ///
    /// Focus reconciliation: if the previously focused record is still
    /// present it keeps focus at its new position; if it vanished the
    /// old index is clamped into the new bounds; an empty list drops
    /// back to idle. The index is never left out of range.
    pub fn rebuild(&mut self, view: &Partition) {
        let previous = self.active_src().map(str::to_owned);

        self.flat = view.iter_all().map(|img| img.src.clone()).collect();

        self.active = if view.is_empty() {
            None
        } else {
            match previous.and_then(|src| self.flat.iter().position(|s| *s == src)) {
                Some(index) => Some(index),
                None => self.active.map(|index| index.min(self.flat.len() - 1)),
            }
        };
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    /// Source reference of the focused record, if any.
    pub fn active_src(&self) -> Option<&str> {
        self.active.map(|index| self.flat[index].as_str())
    }

    /// Advance focus circularly. Entering from idle focuses index 0.
    pub fn next(&mut self) -> Option<&str> {
        if self.flat.is_empty() {
            return None;
        }
        let index = match self.active {
            Some(i) => (i + 1) % self.flat.len(),
            None => 0,
        };
        self.active = Some(index);
        self.active_src()
    }

    /// Retreat focus circularly. Entering from idle focuses the tail.
    pub fn prev(&mut self) -> Option<&str> {
        if self.flat.is_empty() {
            return None;
        }
        let len = self.flat.len();
        let index = match self.active {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.active = Some(index);
        self.active_src()
    }

    /// Drop focus entirely (e.g. when the lightbox closes).
    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ImageRecord;

    fn view(srcs: &[&str]) -> Partition {
        Partition {
            sharp: srcs.iter().map(|s| ImageRecord::new(*s, *s, 90)).collect(),
            blurry: vec![],
        }
    }

    #[test]
    fn test_navigation_on_empty_list_is_a_noop() {
        let mut nav = Navigator::default();
        assert_eq!(nav.next(), None);
        assert_eq!(nav.prev(), None);
        assert_eq!(nav.active_src(), None);
    }

    #[test]
    fn test_next_wraps_circularly() {
        let mut nav = Navigator::default();
        nav.rebuild(&view(&["a", "b", "c"]));

        assert_eq!(nav.next(), Some("a"));
        assert_eq!(nav.next(), Some("b"));
        assert_eq!(nav.next(), Some("c"));
        assert_eq!(nav.next(), Some("a"));
    }

    #[test]
    fn test_prev_from_idle_focuses_tail_and_wraps() {
        let mut nav = Navigator::default();
        nav.rebuild(&view(&["a", "b", "c"]));

        assert_eq!(nav.prev(), Some("c"));
        assert_eq!(nav.prev(), Some("b"));
        assert_eq!(nav.prev(), Some("a"));
        assert_eq!(nav.prev(), Some("c"));
    }

    #[test]
    fn test_rebuild_follows_surviving_record() {
        let mut nav = Navigator::default();
        nav.rebuild(&view(&["a", "b", "c"]));
        nav.next();
        nav.next(); // focused on "b"

        // "b" moves to the front after a re-derivation
        nav.rebuild(&view(&["b", "c", "a"]));
        assert_eq!(nav.active_src(), Some("b"));
    }

    #[test]
    fn test_rebuild_clamps_index_when_record_vanished() {
        let mut nav = Navigator::default();
        nav.rebuild(&view(&["a", "b", "c"]));
        nav.prev(); // focused on "c", index 2

        // "c" filtered out; list shrank under the focus position
        nav.rebuild(&view(&["a", "b"]));
        assert_eq!(nav.active_src(), Some("b"));

        nav.rebuild(&view(&["a"]));
        assert_eq!(nav.active_src(), Some("a"));
    }

    #[test]
    fn test_rebuild_to_empty_resets_to_idle() {
        let mut nav = Navigator::default();
        nav.rebuild(&view(&["a"]));
        nav.next();

        nav.rebuild(&Partition::default());
        assert_eq!(nav.active_src(), None);
        assert!(nav.is_empty());

        // And growing again does not resurrect stale focus
        nav.rebuild(&view(&["x", "y"]));
        assert_eq!(nav.active_src(), None);
        assert_eq!(nav.next(), Some("x"));
    }
}
