// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view event handlers and the context they run in.
//!
//! A view type reacts to input by implementing [`ViewHandler`] and registering an
//! instance for its [`NodeId`] in [`Handlers`]. Every method has an empty default, so
//! a handler only overrides what it cares about.
//!
//! While a handler runs it is taken out of the registry and receives an [`EventCx`]
//! with mutable access to the [`ViewTree`]. It may add, remove, or reorder views,
//! including itself. Once the call returns, the handler goes back into the registry
//! only if its view is still alive.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use trellis_view_tree::{NodeId, ViewTree};

use crate::types::{KeyEvent, PointerEvent, PointerId, ScrollEvent};

/// Capability interface for views that receive input.
pub trait ViewHandler {
    /// A pointer went down on this view; the view now captures the pointer.
    fn on_press_begin(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {}

    /// The captured pointer moved, possibly outside this view's bounds.
    fn on_move(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {}

    /// The captured pointer went up.
    fn on_press_end(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {}

    /// The gesture on this view was aborted.
    fn on_cancel(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {}

    /// An unpressed pointer moved over this view.
    fn on_hover(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {}

    /// A hovering pointer entered this view or one of its descendants.
    fn on_hover_enter(&mut self, _cx: &mut EventCx<'_>, _pointer: PointerId) {}

    /// A hovering pointer left this view and all of its descendants.
    fn on_hover_leave(&mut self, _cx: &mut EventCx<'_>, _pointer: PointerId) {}

    /// A scroll happened over this view.
    fn on_scroll(&mut self, _cx: &mut EventCx<'_>, _event: &ScrollEvent) {}

    /// A key event arrived while this view had focus.
    fn on_key(&mut self, _cx: &mut EventCx<'_>, _event: &KeyEvent) {}
}

/// Context handed to a [`ViewHandler`] for one call.
#[derive(Debug)]
pub struct EventCx<'a> {
    tree: &'a mut ViewTree,
    node: NodeId,
    pointer: Option<PointerId>,
    requests: Requests,
}

/// Router state changes asked for by a handler, applied after it returns.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Requests {
    pub(crate) focus: Option<Option<NodeId>>,
    pub(crate) release_capture: bool,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree, node: NodeId, pointer: Option<PointerId>) -> Self {
        Self {
            tree,
            node,
            pointer,
            requests: Requests::default(),
        }
    }

    pub(crate) fn finish(self) -> Requests {
        self.requests
    }

    /// The view receiving the event.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The pointer behind the event, if it is a pointer event.
    pub fn pointer(&self) -> Option<PointerId> {
        self.pointer
    }

    /// The view tree.
    pub fn tree(&self) -> &ViewTree {
        &*self.tree
    }

    /// The view tree, for edits made in response to the event.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut *self.tree
    }

    /// Give keyboard focus to the receiving view.
    pub fn request_focus(&mut self) {
        self.requests.focus = Some(Some(self.node));
    }

    /// Clear keyboard focus.
    pub fn resign_focus(&mut self) {
        self.requests.focus = Some(None);
    }

    /// Stop capturing the event's pointer. No effect for non-pointer events.
    pub fn release_capture(&mut self) {
        self.requests.release_capture = true;
    }
}

/// Registry of handlers keyed by view.
#[derive(Default)]
pub struct Handlers {
    map: BTreeMap<NodeId, Box<dyn ViewHandler>>,
}

impl core::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handlers")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl Handlers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `node`, returning the handler it replaces.
    pub fn insert(
        &mut self,
        node: NodeId,
        handler: impl ViewHandler + 'static,
    ) -> Option<Box<dyn ViewHandler>> {
        self.map.insert(node, Box::new(handler))
    }

    /// Unregister and return the handler for `node`.
    pub fn remove(&mut self, node: NodeId) -> Option<Box<dyn ViewHandler>> {
        self.map.remove(&node)
    }

    /// Whether `node` has a handler.
    pub fn contains(&self, node: NodeId) -> bool {
        self.map.contains_key(&node)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop handlers whose views have been removed from `tree`.
    pub fn prune(&mut self, tree: &ViewTree) {
        self.map.retain(|node, _| tree.is_alive(*node));
    }

    /// Run `f` on the handler of `node` with a fresh [`EventCx`].
    ///
    /// Returns the handler's requests, or `None` if the view is stale or has no handler.
    pub(crate) fn call(
        &mut self,
        tree: &mut ViewTree,
        node: NodeId,
        pointer: Option<PointerId>,
        f: impl FnOnce(&mut dyn ViewHandler, &mut EventCx<'_>),
    ) -> Option<Requests> {
        if !tree.is_alive(node) {
            return None;
        }
        let mut handler = self.map.remove(&node)?;
        let mut cx = EventCx::new(tree, node, pointer);
        f(handler.as_mut(), &mut cx);
        let requests = cx.finish();
        // A handler registered during the call for the same view takes precedence.
        if tree.is_alive(node) && !self.map.contains_key(&node) {
            self.map.insert(node, handler);
        }
        Some(requests)
    }
}
