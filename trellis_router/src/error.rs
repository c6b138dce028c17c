// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons an input is dropped.

use trellis_view_tree::NodeId;

use crate::types::PointerId;

/// Why the router dropped an input.
///
/// None of these stop the router; the next input is routed normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Hit testing or coordinate conversion failed.
    #[error(transparent)]
    Geometry(#[from] trellis_view_tree::Error),
    /// The captured view was detached or removed before the input arrived.
    ///
    /// The capture is cleared when this is reported.
    #[error("view {node:?} captured by {pointer:?} is no longer attached")]
    StaleCapture {
        /// Pointer whose capture went stale.
        pointer: PointerId,
        /// The formerly captured view.
        node: NodeId,
    },
}
