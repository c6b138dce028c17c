// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Router: pointer and key routing over a [`trellis_view_tree::ViewTree`].
//!
//! ## Overview
//!
//! The host owns the event loop. For each native event it hands the router the
//! event, the view tree, and the handler registry. The router picks exactly one
//! target view, converts the event's location into that view's local space, and
//! calls the view's [`ViewHandler`](crate::handler::ViewHandler).
//!
//! ## Capture
//!
//! A press captures its pointer for the pressed view. Until the press ends or is
//! cancelled, every move goes to that view in its local coordinates, even when the
//! pointer leaves the view or the window. Each pointer has its own capture.
//!
//! ## Hover and focus
//!
//! Unpressed pointers are hit-tested on every move. [`hover`](crate::hover) diffs the
//! hovered paths to report enter and leave transitions. Keys go to the focused view,
//! which handlers set through [`EventCx`](crate::handler::EventCx).
//!
//! ## Mutation during dispatch
//!
//! Handlers receive mutable access to the tree. They may remove themselves or any
//! other view. A capture whose view is gone is dropped on the next input without
//! calling anything.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use trellis_router::handler::{EventCx, Handlers, ViewHandler};
//! use trellis_router::router::EventRouter;
//! use trellis_router::types::{Delivery, Input, PointerEvent, PointerId};
//! use trellis_view_tree::{View, ViewTree};
//!
//! struct Slider {
//!     value: f64,
//! }
//!
//! impl ViewHandler for Slider {
//!     fn on_move(&mut self, _cx: &mut EventCx<'_>, event: &PointerEvent) {
//!         self.value = (event.local_point.x / 100.0).clamp(0.0, 1.0);
//!     }
//! }
//!
//! let mut tree = ViewTree::new(View::new(Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let slider = tree.insert(tree.root(), View::new(Rect::new(100.0, 100.0, 200.0, 120.0)));
//! let mut handlers = Handlers::new();
//! handlers.insert(slider, Slider { value: 0.0 });
//!
//! let mut router = EventRouter::new();
//! let p = PointerId::PRIMARY;
//! let press = Input::PressBegin { pointer: p };
//! router.dispatch(&mut tree, &mut handlers, press, Point::new(110.0, 110.0));
//!
//! // The pointer has left the slider, but the drag still goes to it.
//! let drag = Input::Move { pointer: p };
//! let d = router.dispatch(&mut tree, &mut handlers, drag, Point::new(400.0, 300.0));
//! assert_eq!(
//!     d,
//!     Delivery::Delivered { node: slider, local_point: Some(Point::new(300.0, 200.0)) }
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod bridge;
pub mod error;
pub mod handler;
pub mod hover;
pub mod router;
pub mod types;

pub use error::RouteError;
pub use router::EventRouter;
