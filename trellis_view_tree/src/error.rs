// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by coordinate conversion and hit testing.

use crate::types::NodeId;

/// Failure of a geometric query.
///
/// Neither variant is fatal: callers such as an event router drop the affected
/// event and carry on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A view's transform has a zero (or non-finite) determinant, so its local
    /// space cannot be entered from its parent's.
    #[error("transform of view {node:?} is not invertible")]
    DegenerateTransform {
        /// View carrying the degenerate transform.
        node: NodeId,
    },
    /// The two views have no common ancestor, or one of them is stale.
    ///
    /// Surface conversions report `to` as the surface root.
    #[error("views {from:?} and {to:?} share no common ancestor")]
    DisconnectedNode {
        /// Source view of the conversion.
        from: NodeId,
        /// Destination view of the conversion.
        to: NodeId,
    },
}
