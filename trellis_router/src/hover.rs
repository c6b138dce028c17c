// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: enter/leave transitions between successive hover paths.
//!
//! The router keeps one [`HoverState`] per pointer. Each hover hit test yields a
//! root→target path; diffing it against the previous path gives the views the
//! pointer left and entered.
//!
//! ```
//! use trellis_router::hover::{HoverEvent, HoverState};
//!
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! assert_eq!(h.clear(), vec![HoverEvent::Leave(3), HoverEvent::Leave(1)]);
//! ```

use alloc::vec::Vec;

/// The hovered root→target path of one pointer.
///
/// Leaves are reported inner-most first, then enters outer-most first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered this view (reported outer→inner).
    Enter(K),
    /// The pointer left this view (reported inner→outer).
    Leave(K),
}

impl<K: Copy + Eq> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create a state with nothing hovered.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The hovered root→target path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The innermost hovered view.
    pub fn target(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// Forget the hovered path, leaving every view on it.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.current.drain(..).rev().map(HoverEvent::Leave).collect()
    }

    /// Replace the hovered path with `new_path`, returning the transitions.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<HoverEvent<K>> = self.current[shared..]
            .iter()
            .rev()
            .map(|&k| HoverEvent::Leave(k))
            .collect();
        out.extend(new_path[shared..].iter().map(|&k| HoverEvent::Enter(k)));

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }

    /// Cut the path at the first entry rejected by `keep`, without reporting leaves.
    ///
    /// Used when views disappear from the tree: they cannot be told they were left,
    /// and their descendants are gone with them.
    pub fn truncate_where(&mut self, mut keep: impl FnMut(K) -> bool) {
        if let Some(cut) = self.current.iter().position(|&k| !keep(k)) {
            self.current.truncate(cut);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn first_path_enters_outer_to_inner() {
        let mut h: HoverState<u32> = HoverState::new();
        assert_eq!(
            h.update_path(&[1, 2, 3]),
            vec![HoverEvent::Enter(1), HoverEvent::Enter(2), HoverEvent::Enter(3)]
        );
        assert_eq!(h.target(), Some(3));
    }

    #[test]
    fn moving_to_a_sibling_only_touches_the_branch() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2, 3]);
        assert_eq!(h.update_path(&[1, 2, 4]), vec![HoverEvent::Leave(3), HoverEvent::Enter(4)]);
        assert_eq!(h.update_path(&[1]), vec![HoverEvent::Leave(4), HoverEvent::Leave(2)]);
        assert_eq!(h.current_path(), &[1]);
    }

    #[test]
    fn empty_path_leaves_everything() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[5, 6]);
        assert_eq!(h.update_path(&[]), vec![HoverEvent::Leave(6), HoverEvent::Leave(5)]);
        assert_eq!(h.target(), None);
        assert!(h.clear().is_empty());
    }

    #[test]
    fn unchanged_path_is_quiet() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[7, 8]);
        assert!(h.update_path(&[7, 8]).is_empty());
    }

    #[test]
    fn truncate_drops_removed_views_silently() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2, 3, 4]);
        h.truncate_where(|k| k != 3);
        assert_eq!(h.current_path(), &[1, 2]);
        // Re-entering the same spot only enters the new tail.
        assert_eq!(h.update_path(&[1, 2, 9]), vec![HoverEvent::Enter(9)]);
    }
}
