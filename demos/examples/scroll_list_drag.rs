// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrolled list with a draggable scrollbar thumb.
//!
//! Shows how `bounds_origin` shifts what a point hits, and how capture keeps a drag
//! on the thumb after the pointer leaves it.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example scroll_list_drag`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use trellis_router::handler::{EventCx, Handlers, ViewHandler};
use trellis_router::router::EventRouter;
use trellis_router::types::{Input, PointerEvent, PointerId, ScrollEvent};
use trellis_view_tree::{NodeId, View, ViewFlags, ViewTree};

const ROW_HEIGHT: f64 = 30.0;

/// Scrolls its own view by the wheel delta.
struct ListScroller;

impl ViewHandler for ListScroller {
    fn on_scroll(&mut self, cx: &mut EventCx<'_>, event: &ScrollEvent) {
        let node = cx.node();
        let Some(view) = cx.tree().view(node) else {
            return;
        };
        let origin = view.bounds_origin + event.delta;
        cx.tree_mut().set_bounds_origin(node, origin);
        println!("  list scrolled, bounds_origin = {origin:?}");
    }
}

/// Tracks where in its track the thumb was grabbed and moves it vertically.
struct Thumb {
    grab_y: Rc<Cell<Option<f64>>>,
}

impl ViewHandler for Thumb {
    fn on_press_begin(&mut self, _cx: &mut EventCx<'_>, event: &PointerEvent) {
        self.grab_y.set(Some(event.local_point.y));
    }

    fn on_move(&mut self, cx: &mut EventCx<'_>, event: &PointerEvent) {
        let Some(grab) = self.grab_y.get() else {
            return;
        };
        let node = cx.node();
        let Some(frame) = cx.tree().view(node).map(|v| v.frame) else {
            return;
        };
        let dy = event.local_point.y - grab;
        let top = (frame.y0 + dy).clamp(0.0, 300.0 - frame.height());
        cx.tree_mut()
            .set_frame(node, frame.with_origin(Point::new(frame.x0, top)));
        println!(
            "  thumb local y {:.1} (outside: {}), new top {top:.1}",
            event.local_point.y,
            !Rect::from_origin_size(Point::ZERO, frame.size()).contains(event.local_point)
        );
    }

    fn on_press_end(&mut self, _cx: &mut EventCx<'_>, _event: &PointerEvent) {
        self.grab_y.set(None);
    }
}

struct Row(usize);

impl ViewHandler for Row {
    fn on_press_begin(&mut self, _cx: &mut EventCx<'_>, event: &PointerEvent) {
        println!("  row {} pressed at local {:?}", self.0, event.local_point);
    }
}

fn build(tree: &mut ViewTree, handlers: &mut Handlers) -> (NodeId, NodeId) {
    let root = tree.root();
    let list = tree.insert(
        root,
        View::new(Rect::new(0.0, 0.0, 200.0, 300.0)).with_flag(ViewFlags::CLIPS_TO_BOUNDS, true),
    );
    handlers.insert(list, ListScroller);
    for i in 0..20 {
        let y = i as f64 * ROW_HEIGHT;
        let row = tree.insert(list, View::new(Rect::new(0.0, y, 200.0, y + ROW_HEIGHT)));
        handlers.insert(row, Row(i));
    }

    let track = tree.insert(root, View::new(Rect::new(200.0, 0.0, 212.0, 300.0)));
    let thumb = tree.insert(track, View::new(Rect::new(0.0, 0.0, 12.0, 60.0)));
    handlers.insert(
        thumb,
        Thumb {
            grab_y: Rc::default(),
        },
    );
    (list, thumb)
}

fn main() {
    env_logger::init();

    let mut tree = ViewTree::new(View::new(Rect::new(0.0, 0.0, 400.0, 300.0)));
    let mut handlers = Handlers::new();
    let (list, thumb) = build(&mut tree, &mut handlers);
    let mut router = EventRouter::new();
    let p = PointerId::PRIMARY;

    let script = [
        ("press row", Input::PressBegin { pointer: p }, Point::new(20.0, 45.0)),
        ("release", Input::PressEnd { pointer: p }, Point::new(20.0, 45.0)),
        (
            "scroll",
            Input::Scroll {
                pointer: p,
                delta: Vec2::new(0.0, 60.0),
            },
            Point::new(20.0, 45.0),
        ),
        ("press same spot", Input::PressBegin { pointer: p }, Point::new(20.0, 45.0)),
        ("release", Input::PressEnd { pointer: p }, Point::new(20.0, 45.0)),
        ("grab thumb", Input::PressBegin { pointer: p }, Point::new(205.0, 10.0)),
        ("drag", Input::Move { pointer: p }, Point::new(205.0, 50.0)),
        ("drag far away", Input::Move { pointer: p }, Point::new(390.0, 180.0)),
        ("drop", Input::PressEnd { pointer: p }, Point::new(390.0, 180.0)),
    ];

    for (label, input, point) in script {
        println!("{label} at {point:?}");
        let delivery = router.dispatch(&mut tree, &mut handlers, input, point);
        println!("  -> {delivery:?}");
    }

    let thumb_frame = tree.view(thumb).map(|v| v.frame);
    let list_origin = tree.view(list).map(|v| v.bounds_origin);
    println!("final thumb frame {thumb_frame:?}, list bounds_origin {list_origin:?}");
}
