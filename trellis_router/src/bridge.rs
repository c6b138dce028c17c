// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators at the router's edges: the host bridge and diagnostics.
//!
//! The host owns the event pump. For each native event it calls
//! [`EventRouter::handle_native`](crate::router::EventRouter::handle_native), which
//! asks the [`HostBridge`] what the event means and where it happened. The router
//! never pulls events on its own.

use kurbo::Point;

use crate::error::RouteError;
use crate::types::Input;

/// Translation of native events into routed inputs.
pub trait HostBridge {
    /// The host toolkit's event type.
    type NativeEvent;

    /// Location of `event` in native surface space.
    ///
    /// Only consulted for positional inputs (see [`Input::is_positional`]).
    fn current_surface_point(&self, event: &Self::NativeEvent) -> Point;

    /// What `event` means to the router, or `None` for events it does not route.
    fn translate(&self, event: &Self::NativeEvent) -> Option<Input>;
}

/// Receives reports about inputs dropped because of geometry errors.
///
/// Stale captures are not reported; they are cleared silently.
pub trait Diagnostics {
    /// `input` was dropped because of `error`.
    fn event_dropped(&mut self, input: &Input, error: &RouteError);
}

/// Default diagnostics: report through the `log` facade at `warn` level.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn event_dropped(&mut self, input: &Input, error: &RouteError) {
        log::warn!("dropping {input:?}: {error}");
    }
}
