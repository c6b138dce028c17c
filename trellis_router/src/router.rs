// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Routes each [`Input`] to one view and localizes its coordinates.
//!
//! ## Target selection
//!
//! - `PressBegin` always hit-tests. A hit captures the pointer for that view.
//! - `Move`, `PressEnd`, and `Cancel` go to the pointer's captured view without
//!   hit testing, even when the pointer is far outside it. `PressEnd` and `Cancel`
//!   end the capture after delivery.
//! - `Hover` and `Scroll` hit-test every time, unless the pointer is captured.
//! - `Key` goes to the focused view.
//!
//! ## Failures
//!
//! Geometry errors drop the input and are reported to [`Diagnostics`]. A capture
//! whose view left the tree is cleared and the input dropped quietly. Neither stops
//! the router.
//!
//! ## See Also
//!
//! [`hover`](crate::hover) for the enter/leave bookkeeping.

use alloc::collections::BTreeMap;
use kurbo::{Point, Vec2};
use trellis_view_tree::{NodeId, ViewTree};

use crate::bridge::{Diagnostics, HostBridge, LogDiagnostics};
use crate::error::RouteError;
use crate::handler::{EventCx, Handlers, Requests, ViewHandler};
use crate::hover::{HoverEvent, HoverState};
use crate::types::{Delivery, Input, KeyEvent, PointerEvent, PointerId, ScrollEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Gesture {
    Move,
    End,
    Cancel,
}

/// Input router for one native surface.
///
/// ## Usage
///
/// - Create one router per surface with [`EventRouter::new`], or
///   [`EventRouter::with_diagnostics`] to receive dropped-event reports.
/// - For each native event, call [`EventRouter::handle_native`] with the host
///   bridge, or [`EventRouter::dispatch`] with an already translated input.
/// - Use [`EventRouter::set_focus`] and the capture methods for state owned by
///   the host or the application.
pub struct EventRouter<D: Diagnostics = LogDiagnostics> {
    captures: BTreeMap<PointerId, NodeId>,
    hover: BTreeMap<PointerId, HoverState<NodeId>>,
    focus: Option<NodeId>,
    diagnostics: D,
}

impl<D: Diagnostics> core::fmt::Debug for EventRouter<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventRouter")
            .field("captures", &self.captures)
            .field("hover", &self.hover)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRouter {
    /// Create a router reporting dropped inputs through `log`.
    pub fn new() -> Self {
        Self::with_diagnostics(LogDiagnostics)
    }
}

impl<D: Diagnostics> EventRouter<D> {
    /// Create a router with a custom diagnostics collaborator.
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self {
            captures: BTreeMap::new(),
            hover: BTreeMap::new(),
            focus: None,
            diagnostics,
        }
    }

    /// The diagnostics collaborator.
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// The diagnostics collaborator, mutably.
    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    /// The focused view, if any.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Set or clear keyboard focus.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.focus = node;
    }

    /// The view capturing `pointer`, if any.
    pub fn captured(&self, pointer: PointerId) -> Option<NodeId> {
        self.captures.get(&pointer).copied()
    }

    /// Pointers that currently capture a view, with their views.
    pub fn active_pointers(&self) -> impl Iterator<Item = (PointerId, NodeId)> + '_ {
        self.captures.iter().map(|(&p, &n)| (p, n))
    }

    /// Make `node` capture `pointer`, replacing any existing capture.
    pub fn set_capture(&mut self, pointer: PointerId, node: NodeId) {
        self.captures.insert(pointer, node);
    }

    /// Clear the capture of `pointer`, returning the view it held.
    ///
    /// The pointer's next `PressBegin` starts fresh. No handler is notified.
    pub fn release_capture(&mut self, pointer: PointerId) -> Option<NodeId> {
        let released = self.captures.remove(&pointer);
        if let Some(node) = released {
            log::debug!("{pointer:?} released from {node:?}");
        }
        released
    }

    /// Clear every capture.
    pub fn release_all(&mut self) {
        self.captures.clear();
    }

    /// Drop captures, hover paths, and focus that refer to views no longer
    /// attached to `tree`.
    pub fn forget_detached(&mut self, tree: &ViewTree) {
        self.captures.retain(|pointer, node| {
            let keep = tree.is_attached(*node);
            if !keep {
                log::debug!("{pointer:?} capture of detached {node:?} cleared");
            }
            keep
        });
        for state in self.hover.values_mut() {
            state.truncate_where(|n| tree.is_attached(n));
        }
        if self.focus.is_some_and(|n| !tree.is_attached(n)) {
            self.focus = None;
        }
    }

    /// Translate a native event through `bridge` and route it.
    ///
    /// Events the bridge does not translate are [`Delivery::Unhandled`].
    pub fn handle_native<B: HostBridge>(
        &mut self,
        bridge: &B,
        event: &B::NativeEvent,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
    ) -> Delivery {
        let Some(input) = bridge.translate(event) else {
            return Delivery::Unhandled;
        };
        let point = if input.is_positional() {
            bridge.current_surface_point(event)
        } else {
            Point::ZERO
        };
        self.dispatch(tree, handlers, input, point)
    }

    /// Route `input`, located at `surface_point` in native surface space.
    ///
    /// `surface_point` is ignored for inputs without a location (keys, exits).
    pub fn dispatch(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        input: Input,
        surface_point: Point,
    ) -> Delivery {
        let routed = match input {
            Input::PressBegin { pointer } => {
                self.press_begin(tree, handlers, pointer, surface_point)
            }
            Input::Move { pointer } => {
                self.captured_gesture(tree, handlers, pointer, surface_point, Gesture::Move)
            }
            Input::PressEnd { pointer } => {
                self.captured_gesture(tree, handlers, pointer, surface_point, Gesture::End)
            }
            Input::Cancel { pointer } => {
                self.captured_gesture(tree, handlers, pointer, surface_point, Gesture::Cancel)
            }
            Input::Hover { pointer } => self.hover(tree, handlers, pointer, surface_point),
            Input::Exit { pointer } => Ok(self.exit(tree, handlers, pointer)),
            Input::Scroll { pointer, delta } => {
                self.scroll(tree, handlers, pointer, surface_point, delta)
            }
            Input::Key(key) => Ok(self.key(tree, handlers, &key)),
        };
        match routed {
            Ok(delivery) => delivery,
            Err(err) => {
                if let RouteError::StaleCapture { pointer, node } = err {
                    log::debug!("{pointer:?} capture of detached {node:?} cleared");
                } else {
                    self.diagnostics.event_dropped(&input, &err);
                }
                Delivery::Dropped(err)
            }
        }
    }

    // --- internals ---

    fn press_begin(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
        point: Point,
    ) -> Result<Delivery, RouteError> {
        if let Some(old) = self.captures.remove(&pointer) {
            // The previous gesture never saw its press-end.
            match tree.surface_to_local(point, old) {
                Ok(local_point) if tree.is_attached(old) => {
                    let event = PointerEvent {
                        pointer,
                        surface_point: point,
                        local_point,
                    };
                    self.deliver(tree, handlers, old, Some(pointer), |h, cx| {
                        h.on_cancel(cx, &event);
                    });
                }
                _ => log::debug!("{pointer:?} dropped unfinished capture of {old:?}"),
            }
        }

        let Some(hit) = tree.resolve(point)? else {
            return Ok(Delivery::Unhandled);
        };
        let node = hit.node;
        self.captures.insert(pointer, node);
        log::debug!("{pointer:?} captured by {node:?}");

        let event = PointerEvent {
            pointer,
            surface_point: point,
            local_point: hit.local_point,
        };
        self.deliver(tree, handlers, node, Some(pointer), |h, cx| {
            h.on_press_begin(cx, &event);
        });
        Ok(Delivery::Delivered {
            node,
            local_point: Some(hit.local_point),
        })
    }

    fn captured_gesture(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
        point: Point,
        gesture: Gesture,
    ) -> Result<Delivery, RouteError> {
        let Some(node) = self.live_capture(tree, pointer)? else {
            return Ok(Delivery::Unhandled);
        };
        let ends = gesture != Gesture::Move;
        let local_point = match tree.surface_to_local(point, node) {
            Ok(p) => p,
            Err(err) => {
                if ends {
                    self.captures.remove(&pointer);
                }
                return Err(err.into());
            }
        };

        let event = PointerEvent {
            pointer,
            surface_point: point,
            local_point,
        };
        self.deliver(tree, handlers, node, Some(pointer), |h, cx| match gesture {
            Gesture::Move => h.on_move(cx, &event),
            Gesture::End => h.on_press_end(cx, &event),
            Gesture::Cancel => h.on_cancel(cx, &event),
        });
        if ends && self.captures.get(&pointer) == Some(&node) {
            self.captures.remove(&pointer);
            log::debug!("{pointer:?} released from {node:?}");
        }
        Ok(Delivery::Delivered {
            node,
            local_point: Some(local_point),
        })
    }

    fn hover(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
        point: Point,
    ) -> Result<Delivery, RouteError> {
        if let Some(node) = self.live_capture(tree, pointer)? {
            let local_point = tree.surface_to_local(point, node)?;
            let event = PointerEvent {
                pointer,
                surface_point: point,
                local_point,
            };
            self.deliver(tree, handlers, node, Some(pointer), |h, cx| {
                h.on_hover(cx, &event);
            });
            return Ok(Delivery::Delivered {
                node,
                local_point: Some(local_point),
            });
        }

        let hit = tree.resolve(point)?;
        let path = hit.as_ref().map(|h| h.path.as_slice()).unwrap_or(&[]);
        let state = self.hover.entry(pointer).or_default();
        state.truncate_where(|n| tree.is_attached(n));
        let transitions = state.update_path(path);
        self.deliver_transitions(tree, handlers, pointer, &transitions);

        let Some(hit) = hit else {
            return Ok(Delivery::Unhandled);
        };
        // Enter and leave handlers may have taken the target out of the tree.
        if !tree.is_attached(hit.node) {
            return Ok(Delivery::Unhandled);
        }
        let event = PointerEvent {
            pointer,
            surface_point: point,
            local_point: hit.local_point,
        };
        self.deliver(tree, handlers, hit.node, Some(pointer), |h, cx| {
            h.on_hover(cx, &event);
        });
        Ok(Delivery::Delivered {
            node: hit.node,
            local_point: Some(hit.local_point),
        })
    }

    fn exit(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
    ) -> Delivery {
        let Some(mut state) = self.hover.remove(&pointer) else {
            return Delivery::Unhandled;
        };
        state.truncate_where(|n| tree.is_attached(n));
        let target = state.target();
        let transitions = state.clear();
        self.deliver_transitions(tree, handlers, pointer, &transitions);
        match target {
            Some(node) => Delivery::Delivered {
                node,
                local_point: None,
            },
            None => Delivery::Unhandled,
        }
    }

    fn scroll(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
        point: Point,
        delta: Vec2,
    ) -> Result<Delivery, RouteError> {
        let (node, local_point) = match self.live_capture(tree, pointer)? {
            Some(node) => (node, tree.surface_to_local(point, node)?),
            None => match tree.resolve(point)? {
                Some(hit) => (hit.node, hit.local_point),
                None => return Ok(Delivery::Unhandled),
            },
        };
        let event = ScrollEvent {
            pointer,
            surface_point: point,
            local_point,
            delta,
        };
        self.deliver(tree, handlers, node, Some(pointer), |h, cx| {
            h.on_scroll(cx, &event);
        });
        Ok(Delivery::Delivered {
            node,
            local_point: Some(local_point),
        })
    }

    fn key(&mut self, tree: &mut ViewTree, handlers: &mut Handlers, key: &KeyEvent) -> Delivery {
        let Some(node) = self.focus else {
            return Delivery::Unhandled;
        };
        if !tree.is_attached(node) {
            log::debug!("focus on detached {node:?} cleared");
            self.focus = None;
            return Delivery::Unhandled;
        }
        self.deliver(tree, handlers, node, None, |h, cx| h.on_key(cx, key));
        Delivery::Delivered {
            node,
            local_point: None,
        }
    }

    /// The pointer's captured view, clearing the capture if the view left the tree.
    fn live_capture(
        &mut self,
        tree: &ViewTree,
        pointer: PointerId,
    ) -> Result<Option<NodeId>, RouteError> {
        let Some(&node) = self.captures.get(&pointer) else {
            return Ok(None);
        };
        if !tree.is_attached(node) {
            self.captures.remove(&pointer);
            return Err(RouteError::StaleCapture { pointer, node });
        }
        Ok(Some(node))
    }

    fn deliver_transitions(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        pointer: PointerId,
        transitions: &[HoverEvent<NodeId>],
    ) {
        for &t in transitions {
            match t {
                HoverEvent::Leave(node) => {
                    self.deliver(tree, handlers, node, Some(pointer), |h, cx| {
                        h.on_hover_leave(cx, pointer);
                    });
                }
                HoverEvent::Enter(node) => {
                    self.deliver(tree, handlers, node, Some(pointer), |h, cx| {
                        h.on_hover_enter(cx, pointer);
                    });
                }
            }
        }
    }

    fn deliver(
        &mut self,
        tree: &mut ViewTree,
        handlers: &mut Handlers,
        node: NodeId,
        pointer: Option<PointerId>,
        f: impl FnOnce(&mut dyn ViewHandler, &mut EventCx<'_>),
    ) {
        if let Some(requests) = handlers.call(tree, node, pointer, f) {
            self.apply(requests, node, pointer);
        }
    }

    fn apply(&mut self, requests: Requests, node: NodeId, pointer: Option<PointerId>) {
        if let Some(focus) = requests.focus {
            self.focus = focus;
        }
        if requests.release_capture
            && let Some(pointer) = pointer
            && self.captures.get(&pointer) == Some(&node)
        {
            self.captures.remove(&pointer);
            log::debug!("{pointer:?} released by {node:?}");
        }
    }
}
