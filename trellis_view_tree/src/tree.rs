// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, and structural queries.

use alloc::vec::Vec;
use kurbo::{Affine, Rect, Vec2};

use crate::types::{NodeId, View, ViewFlags};

/// Tree of views overlaid on one native surface.
///
/// The tree always has exactly one root, created with the tree. The root's parent
/// space is the native surface. Further views are either attached somewhere under
/// the root or detached (alive, but unreachable from the root).
pub struct ViewTree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
}

impl core::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("ViewTree")
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) view: View,
}

impl Node {
    fn new(generation: u32, view: View) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            view,
        }
    }
}

impl ViewTree {
    /// Create a tree whose root view is `root`.
    ///
    /// The root's frame is expressed in native surface space; a root at the surface
    /// origin without a transform makes root space and surface space identical.
    pub fn new(root: View) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
        };
        tree.root = tree.alloc(root);
        tree
    }

    /// The surface root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live views, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Always false: the root lives as long as the tree.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Insert a new view as the frontmost child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn insert(&mut self, parent: NodeId, view: View) -> NodeId {
        assert!(self.is_alive(parent), "insert under stale parent {parent:?}");
        let id = self.alloc(view);
        self.link_parent(id, parent, None);
        id
    }

    /// Insert a new view into `parent`'s children at `index` (clamped to the child count).
    ///
    /// Index `0` is the backmost position.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, view: View) -> NodeId {
        assert!(self.is_alive(parent), "insert under stale parent {parent:?}");
        let id = self.alloc(view);
        self.link_parent(id, parent, Some(index));
        id
    }

    /// Create a view that is not attached anywhere.
    ///
    /// It can be attached later with [`ViewTree::attach`].
    pub fn create_detached(&mut self, view: View) -> NodeId {
        self.alloc(view)
    }

    /// Attach `id` (with its subtree) as the frontmost child of `parent`, detaching it
    /// from its current parent first.
    ///
    /// Returns `false` and leaves the tree unchanged if either id is stale, if `id`
    /// is the root, or if `parent` lies inside `id`'s subtree.
    pub fn attach(&mut self, id: NodeId, parent: NodeId) -> bool {
        if !self.is_alive(id) || !self.is_alive(parent) || id == self.root {
            return false;
        }
        if self.is_ancestor_or_self(id, parent) {
            return false;
        }
        self.detach(id);
        self.link_parent(id, parent, None);
        true
    }

    /// Unlink `id` from its parent. The view and its subtree stay alive but are no
    /// longer reachable from the root. The root itself cannot be detached.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
    }

    /// Remove a view and its subtree, invalidating their ids.
    ///
    /// Removing the root is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Move `id` to the front of its siblings (last in paint order, first in hit order).
    pub fn bring_to_front(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.node_mut(parent).children;
        siblings.retain(|c| *c != id);
        siblings.push(id);
    }

    /// Move `id` to the back of its siblings.
    pub fn send_to_back(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.node_mut(parent).children;
        siblings.retain(|c| *c != id);
        siblings.insert(0, id);
    }

    /// Update the frame.
    pub fn set_frame(&mut self, id: NodeId, frame: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.view.frame = frame;
        }
    }

    /// Update the bounds origin (scroll offset of the children).
    pub fn set_bounds_origin(&mut self, id: NodeId, origin: Vec2) {
        if let Some(n) = self.node_opt_mut(id) {
            n.view.bounds_origin = origin;
        }
    }

    /// Update the transform.
    pub fn set_transform(&mut self, id: NodeId, transform: Option<Affine>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.view.transform = transform;
        }
    }

    /// Replace all flags.
    pub fn set_flags(&mut self, id: NodeId, flags: ViewFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.view.flags = flags;
        }
    }

    /// Set or clear a single flag.
    pub fn set_flag(&mut self, id: NodeId, flag: ViewFlags, on: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.view.flags.set(flag, on);
        }
    }

    /// Returns true if `id` refers to a live view.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns true if `id` is live and reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.top_of(id) == self.root
    }

    /// The view record, if the id is live.
    pub fn view(&self, id: NodeId) -> Option<&View> {
        self.node_opt(id).map(|n| &n.view)
    }

    /// Bounds of a view in its own local space.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.view(id).map(View::bounds)
    }

    /// Parent of a view, or `None` for the root, detached views, and stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children in paint order (back to front). Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of ancestors above `id` (0 for the root or a detached subtree top).
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        if !self.is_alive(id) {
            return None;
        }
        let mut depth = 0;
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            depth += 1;
            cur = p;
        }
        Some(depth)
    }

    /// Path from the top of `id`'s tree down to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = id;
        loop {
            out.push(cur);
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    // --- internals ---

    /// Access a live node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, view: View) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, view));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, view)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, index: Option<usize>) {
        let siblings = &mut self.node_mut(parent).children;
        match index {
            Some(i) => siblings.insert(i.min(siblings.len()), id),
            None => siblings.push(id),
        }
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    /// Topmost ancestor of a live id.
    fn top_of(&self, mut id: NodeId) -> NodeId {
        while let Some(p) = self.node(id).parent {
            id = p;
        }
        id
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.node(c).parent;
        }
        false
    }
}
