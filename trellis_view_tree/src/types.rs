// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: node identifiers, flags, and per-view geometry.

use kurbo::{Affine, Point, Rect, Vec2};

/// Identifier for a view in a [`ViewTree`](crate::ViewTree).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale ids never alias a different live view because the generation must match.
/// Use [`ViewTree::is_alive`](crate::ViewTree::is_alive) to check liveness, and
/// [`ViewTree::is_attached`](crate::ViewTree::is_attached) to check that the view
/// is also reachable from the surface root.
///
/// The `Ord` implementation is arbitrary but total; it exists so ids can key ordered maps.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// View flags controlling visibility, interaction, and clipping.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// View is hidden. A hidden view and its entire subtree are never hit.
        const HIDDEN           = 0b0000_0001;
        /// View accepts user interaction. Without it, the view and its subtree are skipped.
        const INTERACTIVE      = 0b0000_0010;
        /// Descendants are only hit inside this view's bounds.
        const CLIPS_TO_BOUNDS  = 0b0000_0100;
        /// View is transparent to hit testing itself, but its children may still be hit.
        const PASS_THROUGH     = 0b0000_1000;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}

/// Geometry and flags for a single view.
///
/// The view's local space has its bounds at `(0, 0, width, height)`.
/// Children are positioned at `child.frame.origin + bounds_origin` in that space,
/// so changing `bounds_origin` moves the whole subtree without touching any child.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    /// Rectangle in the parent's local space (position + size).
    ///
    /// For the root view this is in native surface space.
    pub frame: Rect,
    /// Offset applied to the children's coordinate space (scroll offset).
    pub bounds_origin: Vec2,
    /// Optional transform applied around the view's bounds center.
    ///
    /// Must be invertible; conversions through a degenerate transform fail with
    /// [`Error::DegenerateTransform`](crate::Error::DegenerateTransform).
    pub transform: Option<Affine>,
    /// Visibility, interaction, and clipping flags.
    pub flags: ViewFlags,
}

impl Default for View {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            bounds_origin: Vec2::ZERO,
            transform: None,
            flags: ViewFlags::default(),
        }
    }
}

impl View {
    /// A default view occupying `frame` in its parent's space.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            ..Default::default()
        }
    }

    /// Replace the bounds origin.
    #[must_use]
    pub fn with_bounds_origin(mut self, origin: Vec2) -> Self {
        self.bounds_origin = origin;
        self
    }

    /// Replace the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Replace all flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ViewFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set or clear a single flag.
    #[must_use]
    pub fn with_flag(mut self, flag: ViewFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }

    /// The view's bounds in its own local space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame.size())
    }

    /// Center of the bounds in local space; transforms pivot around it.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Whether this view (and therefore its subtree) takes part in hit testing.
    pub fn is_hit_testable(&self) -> bool {
        !self.flags.contains(ViewFlags::HIDDEN) && self.flags.contains(ViewFlags::INTERACTIVE)
    }

    /// Whether the transform, if any, differs from identity.
    pub(crate) fn has_transform(&self) -> bool {
        self.transform.is_some_and(|t| t != Affine::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_start_at_zero() {
        let v = View::new(Rect::new(30.0, 40.0, 130.0, 90.0));
        assert_eq!(v.bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(v.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn default_flags_are_interactive_only() {
        let v = View::default();
        assert!(v.is_hit_testable());
        assert!(!v.flags.contains(ViewFlags::CLIPS_TO_BOUNDS));
        assert!(!v.flags.contains(ViewFlags::PASS_THROUGH));
    }

    #[test]
    fn hidden_or_disabled_is_not_hit_testable() {
        let hidden = View::default().with_flag(ViewFlags::HIDDEN, true);
        assert!(!hidden.is_hit_testable());
        let disabled = View::default().with_flag(ViewFlags::INTERACTIVE, false);
        assert!(!disabled.is_hit_testable());
    }

    #[test]
    fn identity_transform_is_not_a_transform() {
        let v = View::default().with_transform(Affine::IDENTITY);
        assert!(!v.has_transform());
        let v = v.with_transform(Affine::scale(2.0));
        assert!(v.has_transform());
    }
}
