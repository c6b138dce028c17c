// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the router: pointers, inputs, localized events, and delivery outcomes.
//!
//! ## Overview
//!
//! A [`HostBridge`](crate::bridge::HostBridge) turns native events into [`Input`]s.
//! The [`EventRouter`](crate::router::EventRouter) routes each input and hands the
//! target's [`ViewHandler`](crate::handler::ViewHandler) a localized [`PointerEvent`],
//! [`ScrollEvent`], or [`KeyEvent`], reporting what happened as a [`Delivery`].

use kurbo::{Point, Vec2};
use trellis_view_tree::NodeId;

use crate::error::RouteError;

/// Identifier of a pointer: a mouse, a finger, or a pen.
///
/// Hosts choose the values; the router only compares them. Each pointer owns its
/// own capture and hover state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PointerId(pub u64);

impl PointerId {
    /// Conventional id for the single mouse pointer of desktop hosts.
    pub const PRIMARY: Self = Self(0);
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Command / Super / Windows.
        const META    = 0b0000_1000;
    }
}

/// A key press or release, routed to the focused view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host key code; opaque to the router.
    pub code: u32,
    /// True for a press, false for a release.
    pub pressed: bool,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
}

/// One routed input, as translated from a native event by the host bridge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Input {
    /// A pointer went down. Always hit-tested; a hit captures the pointer.
    PressBegin {
        /// Pointer that went down.
        pointer: PointerId,
    },
    /// A captured pointer moved.
    Move {
        /// Pointer that moved.
        pointer: PointerId,
    },
    /// A captured pointer went up. Ends the capture.
    PressEnd {
        /// Pointer that went up.
        pointer: PointerId,
    },
    /// The host aborted the gesture. Ends the capture.
    Cancel {
        /// Pointer whose gesture was aborted.
        pointer: PointerId,
    },
    /// A pointer moved without being pressed.
    Hover {
        /// Hovering pointer.
        pointer: PointerId,
    },
    /// A pointer left the native surface.
    Exit {
        /// Pointer that left.
        pointer: PointerId,
    },
    /// Wheel or trackpad scroll at the pointer location.
    Scroll {
        /// Pointer at whose location the scroll happens.
        pointer: PointerId,
        /// Scroll amount in surface units.
        delta: Vec2,
    },
    /// Keyboard input; not geometry-routed.
    Key(KeyEvent),
}

impl Input {
    /// The pointer this input belongs to, if any.
    pub fn pointer(&self) -> Option<PointerId> {
        match *self {
            Self::PressBegin { pointer }
            | Self::Move { pointer }
            | Self::PressEnd { pointer }
            | Self::Cancel { pointer }
            | Self::Hover { pointer }
            | Self::Exit { pointer }
            | Self::Scroll { pointer, .. } => Some(pointer),
            Self::Key(_) => None,
        }
    }

    /// Whether the router needs a surface location for this input.
    pub fn is_positional(&self) -> bool {
        !matches!(self, Self::Key(_) | Self::Exit { .. })
    }
}

/// A pointer event as seen by its target view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Location in native surface space.
    pub surface_point: Point,
    /// Location in the target view's local space. Not clamped to its bounds.
    pub local_point: Point,
}

/// A scroll event as seen by its target view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    /// Pointer at whose location the scroll happened.
    pub pointer: PointerId,
    /// Location in native surface space.
    pub surface_point: Point,
    /// Location in the target view's local space.
    pub local_point: Point,
    /// Scroll amount in surface units.
    pub delta: Vec2,
}

/// What the router did with an input.
#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    /// The input reached `node`.
    Delivered {
        /// Receiving view.
        node: NodeId,
        /// Location in the view's local space, for positional inputs.
        local_point: Option<Point>,
    },
    /// No view wants the input; the host may apply its default handling.
    Unhandled,
    /// The input could not be routed and was dropped.
    Dropped(RouteError),
}

impl Delivery {
    /// The receiving view, if the input was delivered.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Delivered { node, .. } => Some(*node),
            _ => None,
        }
    }
}
