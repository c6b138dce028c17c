// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis View Tree: a Kurbo-native view hierarchy overlaid on one native surface.
//!
//! The host toolkit supplies a single native surface per window. Everything above it
//! lives here: the tree of views, their frames, scroll offsets and transforms, the
//! conversion of points and rectangles between any two views, and the hit testing
//! that decides which view sits under a surface point.
//!
//! - Represents a hierarchy of views with frames, bounds origins (scroll offsets),
//!   optional transforms around the view center, and flags.
//! - Converts points and rectangles between views and the native surface.
//! - Resolves surface points to the frontmost hit-testable view, honoring
//!   hidden/disabled/pass-through views and clipping.
//!
//! ## Not a renderer, not a layout engine
//!
//! This crate neither draws nor measures. Upstream code decides frames; a separate
//! compositor draws layers. The tree only answers *which view* and *which local point*.
//!
//! ## API overview
//!
//! - [`ViewTree`]: arena of views with a single root bound to the native surface.
//! - [`View`]: per-view geometry (`frame`, `bounds_origin`, `transform`) and [`ViewFlags`].
//! - [`NodeId`]: generational handle of a view.
//! - [`Hit`] and [`QueryFilter`]: hit test result and filters.
//! - [`Error`]: degenerate transforms and disconnected views.
//!
//! Key operations:
//! - [`ViewTree::insert`], [`ViewTree::detach`], [`ViewTree::attach`], [`ViewTree::remove`]
//! - [`ViewTree::to_parent_space`] / [`ViewTree::to_local_space`]
//! - [`ViewTree::convert_point`] / [`ViewTree::convert_rect`]
//! - [`ViewTree::surface_to_local`] / [`ViewTree::local_to_surface`]
//! - [`ViewTree::resolve`]
//!
//! ## Ordering
//!
//! A view's children are kept in paint order, back to front. Hit testing walks them
//! front to back, so where siblings overlap the later one wins.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use trellis_view_tree::{View, ViewFlags, ViewTree};
//!
//! let mut tree = ViewTree::new(View::new(Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let root = tree.root();
//!
//! // A clipped list scrolled by 50 units, holding one row.
//! let list = tree.insert(
//!     root,
//!     View::new(Rect::new(0.0, 0.0, 200.0, 400.0))
//!         .with_bounds_origin(Vec2::new(0.0, 50.0))
//!         .with_flag(ViewFlags::CLIPS_TO_BOUNDS, true),
//! );
//! let row = tree.insert(list, View::new(Rect::new(0.0, 10.0, 200.0, 40.0)));
//!
//! let hit = tree.resolve(Point::new(20.0, 65.0)).unwrap().unwrap();
//! assert_eq!(hit.node, row);
//! assert_eq!(hit.local_point, Point::new(20.0, 5.0));
//!
//! // The same conversion, done explicitly.
//! let local = tree.surface_to_local(Point::new(20.0, 65.0), row).unwrap();
//! assert_eq!(local, hit.local_point);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod hit;
mod tree;
mod types;

pub use error::Error;
pub use hit::{Hit, QueryFilter};
pub use tree::ViewTree;
pub use types::{NodeId, View, ViewFlags};
