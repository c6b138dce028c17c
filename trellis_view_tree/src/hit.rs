// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing: resolve a native surface point to the frontmost eligible view.
//!
//! ## Algorithm
//!
//! Depth-first from the root, frontmost first:
//!
//! - Views rejected by the [`QueryFilter`] are skipped with their whole subtree
//!   (by default: hidden or non-interactive views).
//! - A view with [`ViewFlags::CLIPS_TO_BOUNDS`] whose bounds do not contain the
//!   point is skipped with its subtree.
//! - Children are visited in reverse paint order, so the last-added sibling wins
//!   where siblings overlap.
//! - If no child is hit and the view's bounds contain the point, the view itself
//!   is the hit, unless it is [`ViewFlags::PASS_THROUGH`].
//!
//! Each query costs O(depth × fan-out) and keeps no state between calls.

use alloc::vec::Vec;
use kurbo::Point;

use crate::error::Error;
use crate::tree::ViewTree;
use crate::types::{NodeId, View, ViewFlags};

/// Result of a hit test.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    /// The matched view.
    pub node: NodeId,
    /// Path from the root to the view (inclusive).
    pub path: Vec<NodeId>,
    /// The query point in the view's local space.
    pub local_point: Point,
}

/// Filters applied during hit testing.
///
/// The [`Default`] filter admits every view. Event routing uses
/// [`QueryFilter::HIT_TEST`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// If true, skip views marked [`ViewFlags::HIDDEN`] and their subtrees.
    pub visible_only: bool,
    /// If true, skip views without [`ViewFlags::INTERACTIVE`] and their subtrees.
    pub interactive_only: bool,
}

impl QueryFilter {
    /// Visible and interactive views only.
    pub const HIT_TEST: Self = Self {
        visible_only: true,
        interactive_only: true,
    };

    fn admits(self, view: &View) -> bool {
        if self.visible_only && view.flags.contains(ViewFlags::HIDDEN) {
            return false;
        }
        if self.interactive_only && !view.flags.contains(ViewFlags::INTERACTIVE) {
            return false;
        }
        true
    }
}

impl ViewTree {
    /// Find the view that should receive an event at `point` (native surface space).
    ///
    /// Returns `Ok(None)` when nothing is hit, meaning the event belongs to the host.
    /// Fails if a transform on the way down is degenerate.
    pub fn resolve(&self, point: Point) -> Result<Option<Hit>, Error> {
        self.resolve_with(point, QueryFilter::HIT_TEST)
    }

    /// Like [`ViewTree::resolve`], with an explicit filter.
    ///
    /// Useful for tooling that wants to find disabled or hidden views.
    pub fn resolve_with(&self, point: Point, filter: QueryFilter) -> Result<Option<Hit>, Error> {
        let mut path = Vec::new();
        self.hit_recursive(self.root(), point, filter, &mut path)
    }

    fn hit_recursive(
        &self,
        id: NodeId,
        parent_point: Point,
        filter: QueryFilter,
        path: &mut Vec<NodeId>,
    ) -> Result<Option<Hit>, Error> {
        let Some(node) = self.node_opt(id) else {
            return Ok(None);
        };
        if !filter.admits(&node.view) {
            return Ok(None);
        }
        let point = self.parent_to_local(id, node)? * parent_point;
        let inside = node.view.bounds().contains(point);
        if node.view.flags.contains(ViewFlags::CLIPS_TO_BOUNDS) && !inside {
            return Ok(None);
        }

        path.push(id);
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_recursive(child, point, filter, path)? {
                return Ok(Some(hit));
            }
        }
        if inside && !node.view.flags.contains(ViewFlags::PASS_THROUGH) {
            return Ok(Some(Hit {
                node: id,
                path: path.clone(),
                local_point: point,
            }));
        }
        path.pop();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::f64::consts::FRAC_PI_4;
    use kurbo::{Affine, Rect, Vec2};

    fn surface() -> ViewTree {
        ViewTree::new(View::new(Rect::new(0.0, 0.0, 400.0, 400.0)))
    }

    fn hit_node(tree: &ViewTree, x: f64, y: f64) -> Option<NodeId> {
        tree.resolve(Point::new(x, y)).unwrap().map(|h| h.node)
    }

    #[test]
    fn topmost_sibling_wins() {
        let mut tree = surface();
        let root = tree.root();
        let a = tree.insert(root, View::new(Rect::new(50.0, 50.0, 150.0, 150.0)));
        let b = tree.insert(root, View::new(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert_eq!(hit_node(&tree, 120.0, 120.0), Some(b), "later sibling is on top");
        assert_eq!(hit_node(&tree, 60.0, 60.0), Some(a));
        assert_eq!(hit_node(&tree, 300.0, 300.0), Some(root));

        tree.bring_to_front(a);
        assert_eq!(hit_node(&tree, 120.0, 120.0), Some(a));
    }

    #[test]
    fn topmost_sibling_subtree_beats_older_sibling() {
        let mut tree = surface();
        let root = tree.root();
        let a = tree.insert(root, View::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
        let _a_child = tree.insert(a, View::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
        let b = tree.insert(root, View::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let b_child = tree.insert(b, View::new(Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert_eq!(hit_node(&tree, 15.0, 15.0), Some(b_child));
        assert_eq!(hit_node(&tree, 50.0, 50.0), Some(b));
    }

    #[test]
    fn hit_carries_path_and_local_point() {
        let mut tree = surface();
        let root = tree.root();
        let a = tree.insert(root, View::new(Rect::new(100.0, 100.0, 300.0, 300.0)));
        let b = tree.insert(a, View::new(Rect::new(10.0, 20.0, 60.0, 70.0)));
        let hit = tree.resolve(Point::new(115.0, 125.0)).unwrap().unwrap();
        assert_eq!(hit.node, b);
        assert_eq!(hit.path, vec![root, a, b]);
        assert_eq!(hit.local_point, Point::new(5.0, 5.0));
    }

    #[test]
    fn hidden_subtree_is_never_hit() {
        let mut tree = surface();
        let root = tree.root();
        let hidden = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_flag(ViewFlags::HIDDEN, true),
        );
        let child = tree.insert(hidden, View::new(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(hit_node(&tree, 10.0, 10.0), Some(root));
        assert_eq!(hit_node(&tree, 70.0, 70.0), Some(root));

        // Tooling can still see it.
        let any = tree.resolve_with(Point::new(10.0, 10.0), QueryFilter::default()).unwrap();
        assert_eq!(any.map(|h| h.node), Some(child));

        tree.set_flag(hidden, ViewFlags::HIDDEN, false);
        assert_eq!(hit_node(&tree, 10.0, 10.0), Some(child));
    }

    #[test]
    fn disabled_subtree_is_skipped() {
        let mut tree = surface();
        let root = tree.root();
        let behind = tree.insert(root, View::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let disabled = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_flag(ViewFlags::INTERACTIVE, false),
        );
        let _child = tree.insert(disabled, View::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(hit_node(&tree, 50.0, 50.0), Some(behind));
    }

    #[test]
    fn clipping_truncates_descendants() {
        let mut tree = surface();
        let root = tree.root();
        let clip = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_flag(ViewFlags::CLIPS_TO_BOUNDS, true),
        );
        let child = tree.insert(clip, View::new(Rect::new(50.0, 50.0, 250.0, 250.0)));
        assert_eq!(hit_node(&tree, 75.0, 75.0), Some(child));
        assert_eq!(hit_node(&tree, 150.0, 150.0), Some(root), "clipped region falls through");

        tree.set_flag(clip, ViewFlags::CLIPS_TO_BOUNDS, false);
        assert_eq!(hit_node(&tree, 150.0, 150.0), Some(child), "unclipped overflow is hit");
    }

    #[test]
    fn clipping_is_recursive() {
        let mut tree = surface();
        let root = tree.root();
        let outer = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_flag(ViewFlags::CLIPS_TO_BOUNDS, true),
        );
        let middle = tree.insert(outer, View::new(Rect::new(0.0, 0.0, 300.0, 300.0)));
        let leaf = tree.insert(middle, View::new(Rect::new(80.0, 80.0, 280.0, 280.0)));
        assert_eq!(hit_node(&tree, 90.0, 90.0), Some(leaf));
        assert_eq!(hit_node(&tree, 200.0, 200.0), Some(root));
    }

    #[test]
    fn pass_through_container_only_hits_children() {
        let mut tree = surface();
        let root = tree.root();
        let behind = tree.insert(root, View::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
        let overlay = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 200.0, 200.0)).with_flag(ViewFlags::PASS_THROUGH, true),
        );
        let button = tree.insert(overlay, View::new(Rect::new(10.0, 10.0, 40.0, 40.0)));
        assert_eq!(hit_node(&tree, 20.0, 20.0), Some(button));
        assert_eq!(hit_node(&tree, 100.0, 100.0), Some(behind), "overlay itself is transparent");
    }

    #[test]
    fn pass_through_root_yields_no_hit() {
        let mut tree = ViewTree::new(
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_flag(ViewFlags::PASS_THROUGH, true),
        );
        let child = tree.insert(tree.root(), View::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(hit_node(&tree, 5.0, 5.0), Some(child));
        assert_eq!(hit_node(&tree, 50.0, 50.0), None);
    }

    #[test]
    fn outside_root_is_no_hit() {
        let mut tree = surface();
        assert_eq!(hit_node(&tree, -1.0, 10.0), None);
        assert_eq!(hit_node(&tree, 400.0, 10.0), None, "bounds are half-open");
        tree.set_flag(tree.root(), ViewFlags::HIDDEN, true);
        assert_eq!(hit_node(&tree, 10.0, 10.0), None);
    }

    #[test]
    fn scroll_offset_shifts_children() {
        let mut tree = surface();
        let root = tree.root();
        let scroller = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 200.0, 200.0))
                .with_bounds_origin(Vec2::new(0.0, 50.0))
                .with_flag(ViewFlags::CLIPS_TO_BOUNDS, true),
        );
        let child = tree.insert(scroller, View::new(Rect::new(10.0, 10.0, 30.0, 30.0)));
        let hit = tree.resolve(Point::new(15.0, 65.0)).unwrap().unwrap();
        assert_eq!(hit.node, child);
        assert_eq!(hit.local_point, Point::new(5.0, 5.0));
        // The child's frame position without the offset is now empty scroller space.
        assert_eq!(hit_node(&tree, 15.0, 15.0), Some(scroller));
    }

    #[test]
    fn transformed_child_is_hit_in_its_rotated_footprint() {
        let mut tree = surface();
        let root = tree.root();
        let diamond = tree.insert(
            root,
            View::new(Rect::new(100.0, 100.0, 200.0, 200.0))
                .with_transform(Affine::rotate(FRAC_PI_4)),
        );
        // The unrotated corner is outside the diamond.
        assert_eq!(hit_node(&tree, 102.0, 102.0), Some(root));
        // The rotated tip pokes above the original frame.
        assert_eq!(hit_node(&tree, 150.0, 90.0), Some(diamond));
        assert_eq!(hit_node(&tree, 150.0, 150.0), Some(diamond));
    }

    #[test]
    fn degenerate_transform_is_an_error() {
        let mut tree = surface();
        let root = tree.root();
        let flat = tree.insert(
            root,
            View::new(Rect::new(0.0, 0.0, 50.0, 50.0)).with_transform(Affine::scale(0.0)),
        );
        assert_eq!(
            tree.resolve(Point::new(10.0, 10.0)),
            Err(Error::DegenerateTransform { node: flat })
        );
        // Skipped views are never inverted.
        tree.set_flag(flat, ViewFlags::HIDDEN, true);
        assert_eq!(hit_node(&tree, 10.0, 10.0), Some(root));
    }

    #[test]
    fn detached_views_are_not_hit() {
        let mut tree = surface();
        let root = tree.root();
        let a = tree.insert(root, View::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        tree.detach(a);
        assert_eq!(hit_node(&tree, 10.0, 10.0), Some(root));
        tree.attach(a, root);
        assert_eq!(hit_node(&tree, 10.0, 10.0), Some(a));
    }
}
