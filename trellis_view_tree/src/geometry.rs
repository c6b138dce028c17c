// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate conversion between views and the native surface.
//!
//! ## Spaces
//!
//! Every view has a local space in which its bounds are `(0, 0, width, height)`.
//! Mapping a local point of view `N` (parent `P`) into `P`'s local space:
//!
//! 1. apply `N.transform` around `N`'s bounds center,
//! 2. offset by `N.frame.origin`,
//! 3. offset by `P.bounds_origin` (the scroll offset of `P`'s children).
//!
//! The root has no parent view; its parent space is the native surface, so only
//! steps 1 and 2 apply.
//!
//! Going the other way inverts each step, which needs an invertible transform.
//! A transform whose determinant is zero yields [`Error::DegenerateTransform`].
//!
//! Rectangles are converted by mapping all four corners and taking their
//! axis-aligned bounding box.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect, Vec2};

use crate::error::Error;
use crate::tree::{Node, ViewTree};
use crate::types::NodeId;

impl ViewTree {
    /// Affine transform from `id`'s local space to its parent's local space.
    ///
    /// For the root, or a detached subtree top, the result maps into the space the
    /// frame is expressed in (the native surface for the root).
    pub fn parent_from_local(&self, id: NodeId) -> Result<Affine, Error> {
        let node = self.live(id)?;
        Ok(self.local_to_parent(node))
    }

    /// Affine transform from `id`'s parent space into its local space.
    pub fn local_from_parent(&self, id: NodeId) -> Result<Affine, Error> {
        let node = self.live(id)?;
        self.parent_to_local(id, node)
    }

    /// Convert a point in `id`'s local space to its parent's local space.
    pub fn to_parent_space(&self, point: Point, id: NodeId) -> Result<Point, Error> {
        let node = self.live(id)?;
        if !node.view.has_transform() && self.placement(node) == Vec2::ZERO {
            return Ok(point);
        }
        Ok(self.local_to_parent(node) * point)
    }

    /// Convert a point in `id`'s parent space to `id`'s local space.
    ///
    /// Exact inverse of [`ViewTree::to_parent_space`].
    pub fn to_local_space(&self, point: Point, id: NodeId) -> Result<Point, Error> {
        let node = self.live(id)?;
        if !node.view.has_transform() && self.placement(node) == Vec2::ZERO {
            return Ok(point);
        }
        Ok(self.parent_to_local(id, node)? * point)
    }

    /// Composite transform from `from`'s local space to `to`'s local space.
    ///
    /// Walks up from `from` to the nearest common ancestor, then down to `to`.
    /// Fails with [`Error::DisconnectedNode`] if the views share no ancestor (or one
    /// is stale), and with [`Error::DegenerateTransform`] if a view on the way down
    /// cannot be inverted.
    pub fn transform_between(&self, from: NodeId, to: NodeId) -> Result<Affine, Error> {
        let disconnected = Error::DisconnectedNode { from, to };
        let (Some(mut depth_a), Some(mut depth_b)) = (self.depth(from), self.depth(to)) else {
            return Err(disconnected);
        };
        if from == to {
            return Ok(Affine::IDENTITY);
        }

        let mut a = from;
        let mut b = to;
        let mut up = Affine::IDENTITY;
        let mut down: Vec<NodeId> = Vec::new();

        while depth_a > depth_b {
            let node = self.node(a);
            up = self.local_to_parent(node) * up;
            a = node.parent.ok_or(disconnected)?;
            depth_a -= 1;
        }
        while depth_b > depth_a {
            down.push(b);
            b = self.node(b).parent.ok_or(disconnected)?;
            depth_b -= 1;
        }
        while a != b {
            let node_a = self.node(a);
            let (Some(pa), Some(pb)) = (node_a.parent, self.node(b).parent) else {
                return Err(disconnected);
            };
            up = self.local_to_parent(node_a) * up;
            down.push(b);
            a = pa;
            b = pb;
        }

        let mut xf = up;
        for &id in down.iter().rev() {
            xf = self.parent_to_local(id, self.node(id))? * xf;
        }
        Ok(xf)
    }

    /// Convert a point from `from`'s local space to `to`'s local space.
    pub fn convert_point(&self, point: Point, from: NodeId, to: NodeId) -> Result<Point, Error> {
        if from == to && self.is_alive(from) {
            return Ok(point);
        }
        Ok(self.transform_between(from, to)? * point)
    }

    /// Convert a rectangle from `from`'s local space to `to`'s local space.
    ///
    /// Returns the axis-aligned bounding box of the four converted corners.
    pub fn convert_rect(&self, rect: Rect, from: NodeId, to: NodeId) -> Result<Rect, Error> {
        if from == to && self.is_alive(from) {
            return Ok(rect);
        }
        Ok(self.transform_between(from, to)?.transform_rect_bbox(rect))
    }

    /// Composite transform from `id`'s local space to native surface space.
    ///
    /// Fails with [`Error::DisconnectedNode`] unless `id` is attached to the root.
    pub fn surface_from_local(&self, id: NodeId) -> Result<Affine, Error> {
        let root = self.root();
        let to_root = self.transform_between(id, root)?;
        Ok(self.local_to_parent(self.node(root)) * to_root)
    }

    /// Composite transform from native surface space to `id`'s local space.
    pub fn local_from_surface(&self, id: NodeId) -> Result<Affine, Error> {
        let root = self.root();
        let from_root = self.transform_between(root, id)?;
        Ok(from_root * self.parent_to_local(root, self.node(root))?)
    }

    /// Convert a native surface point into `id`'s local space.
    pub fn surface_to_local(&self, point: Point, id: NodeId) -> Result<Point, Error> {
        Ok(self.local_from_surface(id)? * point)
    }

    /// Convert a point in `id`'s local space into native surface space.
    pub fn local_to_surface(&self, point: Point, id: NodeId) -> Result<Point, Error> {
        Ok(self.surface_from_local(id)? * point)
    }

    /// Convert a native surface rectangle into `id`'s local space (bounding box).
    pub fn surface_rect_to_local(&self, rect: Rect, id: NodeId) -> Result<Rect, Error> {
        Ok(self.local_from_surface(id)?.transform_rect_bbox(rect))
    }

    /// Convert a rectangle in `id`'s local space into native surface space (bounding box).
    pub fn local_rect_to_surface(&self, rect: Rect, id: NodeId) -> Result<Rect, Error> {
        Ok(self.surface_from_local(id)?.transform_rect_bbox(rect))
    }

    // --- internals ---

    fn live(&self, id: NodeId) -> Result<&Node, Error> {
        self.node_opt(id).ok_or(Error::DisconnectedNode {
            from: id,
            to: id,
        })
    }

    /// Translation placing `node`'s local origin in its parent's space.
    fn placement(&self, node: &Node) -> Vec2 {
        let scroll = node
            .parent
            .map(|p| self.node(p).view.bounds_origin)
            .unwrap_or(Vec2::ZERO);
        node.view.frame.origin().to_vec2() + scroll
    }

    pub(crate) fn local_to_parent(&self, node: &Node) -> Affine {
        let placement = Affine::translate(self.placement(node));
        match node.view.transform {
            Some(tf) if node.view.has_transform() => {
                let c = node.view.center().to_vec2();
                placement * Affine::translate(c) * tf * Affine::translate(-c)
            }
            _ => placement,
        }
    }

    pub(crate) fn parent_to_local(&self, id: NodeId, node: &Node) -> Result<Affine, Error> {
        let unplace = Affine::translate(-self.placement(node));
        match node.view.transform {
            Some(tf) if node.view.has_transform() => {
                let det = tf.determinant();
                if det == 0.0 || !det.is_finite() {
                    return Err(Error::DegenerateTransform { node: id });
                }
                let c = node.view.center().to_vec2();
                Ok(Affine::translate(c) * tf.inverse() * Affine::translate(-c) * unplace)
            }
            _ => Ok(unplace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::View;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < EPS
    }

    fn near(a: f64, b: f64) -> bool {
        a - b < EPS && b - a < EPS
    }

    fn surface() -> ViewTree {
        ViewTree::new(View::new(Rect::new(0.0, 0.0, 800.0, 600.0)))
    }

    #[test]
    fn root_space_is_surface_space() {
        let tree = surface();
        let p = Point::new(123.0, 45.5);
        assert_eq!(tree.surface_to_local(p, tree.root()).unwrap(), p);
        assert_eq!(tree.local_to_surface(p, tree.root()).unwrap(), p);
    }

    #[test]
    fn nested_frames_accumulate_offsets() {
        let mut tree = surface();
        let a = tree.insert(tree.root(), View::new(Rect::new(10.0, 20.0, 210.0, 220.0)));
        let b = tree.insert(a, View::new(Rect::new(5.0, 5.0, 55.0, 55.0)));
        let local = tree.surface_to_local(Point::new(16.0, 26.0), b).unwrap();
        assert!(close(local, Point::new(1.0, 1.0)), "got {local:?}");
        let back = tree.local_to_surface(local, b).unwrap();
        assert!(close(back, Point::new(16.0, 26.0)));
    }

    #[test]
    fn transform_pivots_around_center() {
        let mut tree = surface();
        let v = tree.insert(
            tree.root(),
            View::new(Rect::new(0.0, 0.0, 100.0, 50.0)).with_transform(Affine::rotate(FRAC_PI_2)),
        );
        // The center is fixed by a rotation around it.
        let c = tree.to_parent_space(Point::new(50.0, 25.0), v).unwrap();
        assert!(close(c, Point::new(50.0, 25.0)), "got {c:?}");
        // The top-left corner swings around the center.
        let corner = tree.to_parent_space(Point::ZERO, v).unwrap();
        assert!(close(corner, Point::new(75.0, -25.0)), "got {corner:?}");
    }

    #[test]
    fn round_trip_through_parent_space() {
        let transforms = [
            Affine::IDENTITY,
            Affine::rotate(0.7),
            Affine::scale_non_uniform(2.0, 0.5),
            Affine::skew(0.3, -0.2),
            Affine::rotate(-1.3) * Affine::scale(3.0),
            Affine::translate((7.0, -4.0)),
        ];
        let points = [
            Point::ZERO,
            Point::new(12.5, -3.0),
            Point::new(1e3, 7e2),
            Point::new(-40.0, 88.8),
        ];
        for tf in transforms {
            let mut tree = surface();
            let scroller = tree.insert(
                tree.root(),
                View::new(Rect::new(30.0, 40.0, 330.0, 240.0))
                    .with_bounds_origin(Vec2::new(-5.0, 17.0)),
            );
            let n = tree.insert(
                scroller,
                View::new(Rect::new(11.0, 13.0, 71.0, 53.0)).with_transform(tf),
            );
            for p in points {
                let parent = tree.to_parent_space(p, n).unwrap();
                let back = tree.to_local_space(parent, n).unwrap();
                assert!(close(back, p), "round trip failed for {tf:?}: {p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn bounds_origin_is_subtracted_going_down() {
        let mut tree = surface();
        let scroller = tree.insert(
            tree.root(),
            View::new(Rect::new(0.0, 0.0, 200.0, 100.0)).with_bounds_origin(Vec2::new(0.0, 50.0)),
        );
        let child = tree.insert(scroller, View::new(Rect::new(10.0, 10.0, 30.0, 30.0)));
        let local = tree.to_local_space(Point::new(10.0, 60.0), child).unwrap();
        assert!(close(local, Point::ZERO), "got {local:?}");
        let up = tree.convert_point(Point::new(5.0, 5.0), child, scroller).unwrap();
        assert!(close(up, Point::new(15.0, 65.0)), "got {up:?}");
    }

    #[test]
    fn bounds_origin_does_not_move_the_view_itself() {
        let mut tree = surface();
        let scroller = tree.insert(
            tree.root(),
            View::new(Rect::new(20.0, 20.0, 220.0, 120.0)).with_bounds_origin(Vec2::new(0.0, 50.0)),
        );
        let local = tree.surface_to_local(Point::new(20.0, 20.0), scroller).unwrap();
        assert!(close(local, Point::ZERO), "got {local:?}");
    }

    #[test]
    fn degenerate_transform_fails_only_going_down() {
        let mut tree = surface();
        let flat = tree.insert(
            tree.root(),
            View::new(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_transform(Affine::scale_non_uniform(1.0, 0.0)),
        );
        assert!(tree.to_parent_space(Point::new(1.0, 1.0), flat).is_ok());
        assert_eq!(
            tree.to_local_space(Point::new(1.0, 1.0), flat),
            Err(Error::DegenerateTransform { node: flat })
        );
        assert_eq!(
            tree.surface_to_local(Point::new(1.0, 1.0), flat),
            Err(Error::DegenerateTransform { node: flat })
        );
        assert!(tree.local_to_surface(Point::new(1.0, 1.0), flat).is_ok());
    }

    #[test]
    fn convert_between_cousins() {
        let mut tree = surface();
        let root = tree.root();
        let left = tree.insert(root, View::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let right = tree.insert(root, View::new(Rect::new(300.0, 0.0, 400.0, 100.0)));
        let a = tree.insert(left, View::new(Rect::new(10.0, 10.0, 20.0, 20.0)));
        let b = tree.insert(right, View::new(Rect::new(50.0, 50.0, 60.0, 60.0)));
        let p = tree.convert_point(Point::new(1.0, 2.0), a, b).unwrap();
        // a local (1,2) is surface (11,12); b's origin is at surface (350,50).
        assert!(close(p, Point::new(-339.0, -38.0)), "got {p:?}");
        let q = tree.convert_point(p, b, a).unwrap();
        assert!(close(q, Point::new(1.0, 2.0)));
    }

    #[test]
    fn convert_to_descendant_and_ancestor() {
        let mut tree = surface();
        let a = tree.insert(tree.root(), View::new(Rect::new(100.0, 0.0, 300.0, 200.0)));
        let b = tree.insert(
            a,
            View::new(Rect::new(0.0, 0.0, 20.0, 20.0)).with_transform(Affine::scale(2.0)),
        );
        // Scaling by 2 around (10,10): local (0,0) lands at (-10,-10) in a.
        let up = tree.convert_point(Point::ZERO, b, a).unwrap();
        assert!(close(up, Point::new(-10.0, -10.0)), "got {up:?}");
        let down = tree.convert_point(Point::new(-10.0, -10.0), a, b).unwrap();
        assert!(close(down, Point::ZERO), "got {down:?}");
    }

    #[test]
    fn disconnected_views_fail() {
        let mut tree = surface();
        let attached = tree.insert(tree.root(), View::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let loose = tree.create_detached(View::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(
            tree.convert_point(Point::ZERO, loose, attached),
            Err(Error::DisconnectedNode {
                from: loose,
                to: attached
            })
        );
        assert!(tree.surface_to_local(Point::ZERO, loose).is_err());
        assert!(tree.local_to_surface(Point::ZERO, loose).is_err());

        tree.remove(attached);
        assert!(matches!(
            tree.convert_point(Point::ZERO, attached, tree.root()),
            Err(Error::DisconnectedNode { .. })
        ));
        assert!(tree.convert_point(Point::ZERO, attached, attached).is_err());
    }

    #[test]
    fn rect_conversion_is_bounding_box() {
        let mut tree = surface();
        let v = tree.insert(
            tree.root(),
            View::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_transform(Affine::rotate(FRAC_PI_4)),
        );
        let r = tree.local_rect_to_surface(Rect::new(0.0, 0.0, 10.0, 10.0), v).unwrap();
        let half_diag = 5.0 * SQRT_2;
        assert!(near(r.width(), 2.0 * half_diag), "got {r:?}");
        assert!(near(r.height(), 2.0 * half_diag), "got {r:?}");
        assert!(close(r.center(), Point::new(5.0, 5.0)));

        let plain = tree.insert(tree.root(), View::new(Rect::new(40.0, 50.0, 60.0, 70.0)));
        let local = tree
            .surface_rect_to_local(Rect::new(40.0, 50.0, 45.0, 55.0), plain)
            .unwrap();
        assert_eq!(local, Rect::new(0.0, 0.0, 5.0, 5.0));
        let same = tree.convert_rect(local, plain, plain).unwrap();
        assert_eq!(same, local);
        let other = tree.convert_rect(local, plain, tree.root()).unwrap();
        assert_eq!(other, Rect::new(40.0, 50.0, 45.0, 55.0));
    }

    #[test]
    fn transformed_root_moves_surface_mapping() {
        let tree = ViewTree::new(
            View::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_transform(Affine::scale(0.5)),
        );
        let root = tree.root();
        // Scaling by 0.5 around (50,50): local (0,0) shows at surface (25,25).
        let s = tree.local_to_surface(Point::ZERO, root).unwrap();
        assert!(close(s, Point::new(25.0, 25.0)), "got {s:?}");
        let l = tree.surface_to_local(Point::new(25.0, 25.0), root).unwrap();
        assert!(close(l, Point::ZERO), "got {l:?}");
    }
}
