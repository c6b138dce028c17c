// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driving the router from a host event pump.
//!
//! A pretend windowing toolkit delivers its own event type. The host implements
//! `HostBridge` to translate those events, then hands each one to the router.
//! Hover transitions, focus, keys, and a rotated button are all exercised.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example host_bridge`

use kurbo::{Affine, Point, Rect, Vec2};
use trellis_router::bridge::{Diagnostics, HostBridge};
use trellis_router::handler::{EventCx, Handlers, ViewHandler};
use trellis_router::router::EventRouter;
use trellis_router::types::{Input, KeyEvent, Modifiers, PointerEvent, PointerId};
use trellis_router::RouteError;
use trellis_view_tree::{View, ViewTree};

/// Events as the toolkit reports them: window coordinates first.
#[derive(Debug)]
enum ToolkitEvent {
    /// Position and pressed-button mask.
    MouseMoved(f64, f64, u8),
    MouseDown(f64, f64),
    MouseUp(f64, f64),
    MouseLeftWindow,
    /// Position and vertical wheel delta.
    Wheel(f64, f64, f64),
    /// Key code and whether shift is held.
    KeyDown(u32, bool),
    Focused,
}

struct Bridge;

impl HostBridge for Bridge {
    type NativeEvent = ToolkitEvent;

    fn current_surface_point(&self, event: &ToolkitEvent) -> Point {
        match *event {
            ToolkitEvent::MouseMoved(x, y, _)
            | ToolkitEvent::MouseDown(x, y)
            | ToolkitEvent::MouseUp(x, y)
            | ToolkitEvent::Wheel(x, y, _) => Point::new(x, y),
            _ => Point::ZERO,
        }
    }

    fn translate(&self, event: &ToolkitEvent) -> Option<Input> {
        let pointer = PointerId::PRIMARY;
        Some(match *event {
            ToolkitEvent::MouseMoved(_, _, 0) => Input::Hover { pointer },
            ToolkitEvent::MouseMoved(..) => Input::Move { pointer },
            ToolkitEvent::MouseDown(..) => Input::PressBegin { pointer },
            ToolkitEvent::MouseUp(..) => Input::PressEnd { pointer },
            ToolkitEvent::MouseLeftWindow => Input::Exit { pointer },
            ToolkitEvent::Wheel(_, _, dy) => Input::Scroll {
                pointer,
                delta: Vec2::new(0.0, dy),
            },
            ToolkitEvent::KeyDown(code, shift) => Input::Key(KeyEvent {
                code,
                pressed: true,
                modifiers: if shift {
                    Modifiers::SHIFT
                } else {
                    Modifiers::empty()
                },
            }),
            ToolkitEvent::Focused => return None,
        })
    }
}

/// Counts dropped inputs in addition to logging them.
#[derive(Debug, Default)]
struct CountingDiagnostics(usize);

impl Diagnostics for CountingDiagnostics {
    fn event_dropped(&mut self, input: &Input, error: &RouteError) {
        self.0 += 1;
        log::warn!("dropped {input:?}: {error}");
    }
}

struct Named(&'static str);

impl ViewHandler for Named {
    fn on_press_begin(&mut self, cx: &mut EventCx<'_>, event: &PointerEvent) {
        println!("  {} pressed at local {:?}", self.0, event.local_point);
        cx.request_focus();
    }

    fn on_press_end(&mut self, _cx: &mut EventCx<'_>, event: &PointerEvent) {
        println!("  {} released at local {:?}", self.0, event.local_point);
    }

    fn on_hover_enter(&mut self, _cx: &mut EventCx<'_>, _pointer: PointerId) {
        println!("  enter {}", self.0);
    }

    fn on_hover_leave(&mut self, _cx: &mut EventCx<'_>, _pointer: PointerId) {
        println!("  leave {}", self.0);
    }

    fn on_key(&mut self, _cx: &mut EventCx<'_>, event: &KeyEvent) {
        println!("  {} got key {} {:?}", self.0, event.code, event.modifiers);
    }
}

fn main() {
    env_logger::init();

    let mut tree = ViewTree::new(View::new(Rect::new(0.0, 0.0, 640.0, 480.0)));
    let root = tree.root();
    let mut handlers = Handlers::new();
    handlers.insert(root, Named("window"));

    let toolbar = tree.insert(root, View::new(Rect::new(0.0, 0.0, 640.0, 40.0)));
    handlers.insert(toolbar, Named("toolbar"));
    let button = tree.insert(toolbar, View::new(Rect::new(10.0, 5.0, 90.0, 35.0)));
    handlers.insert(button, Named("button"));
    let dial = tree.insert(
        root,
        View::new(Rect::new(300.0, 200.0, 400.0, 300.0))
            .with_transform(Affine::rotate(std::f64::consts::FRAC_PI_4)),
    );
    handlers.insert(dial, Named("dial"));

    let mut router = EventRouter::with_diagnostics(CountingDiagnostics::default());
    let pump = [
        ToolkitEvent::Focused,
        ToolkitEvent::MouseMoved(20.0, 20.0, 0),
        ToolkitEvent::MouseMoved(200.0, 20.0, 0),
        ToolkitEvent::MouseDown(30.0, 20.0),
        ToolkitEvent::MouseMoved(600.0, 400.0, 1),
        ToolkitEvent::MouseUp(600.0, 400.0),
        ToolkitEvent::KeyDown(13, false),
        // Corner of the dial's frame, outside the rotated square.
        ToolkitEvent::MouseDown(303.0, 203.0),
        ToolkitEvent::MouseUp(303.0, 203.0),
        ToolkitEvent::MouseDown(350.0, 210.0),
        ToolkitEvent::MouseUp(350.0, 210.0),
        ToolkitEvent::KeyDown(65, true),
        ToolkitEvent::Wheel(350.0, 250.0, 3.0),
        ToolkitEvent::MouseLeftWindow,
    ];

    for event in &pump {
        println!("{event:?}");
        let delivery = router.handle_native(&Bridge, event, &mut tree, &mut handlers);
        println!("  -> {delivery:?}");
    }

    // A view collapsed to zero scale cannot localize points; those inputs are dropped.
    tree.set_transform(dial, Some(Affine::scale(0.0)));
    let delivery = router.handle_native(
        &Bridge,
        &ToolkitEvent::MouseDown(350.0, 250.0),
        &mut tree,
        &mut handlers,
    );
    println!("after collapsing the dial -> {delivery:?}");
    println!("dropped inputs: {}", router.diagnostics().0);
}
