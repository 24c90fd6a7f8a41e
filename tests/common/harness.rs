//! Test harness for a canvas wired to a mock store.
//!
//! Mirrors how a host sets up the controller: seed from the store listing,
//! register every host callback with tracking, then feed pointer and key
//! events through the public API.

#![allow(dead_code)]

use super::{init_logging, CallbackTracker, MockStore};
use slint::platform::PointerEventButton;
use slint_plan_canvas::{
    CanvasConfig, CanvasController, EdgeData, EdgeId, NodeData, NodeFields, NodeId, Point,
    RemoteStore,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

pub fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

pub struct CanvasHarness {
    pub ctrl: CanvasController,
    pub store: Rc<RefCell<MockStore>>,
    pub tracker: CallbackTracker,
}

impl CanvasHarness {
    /// Nodes with the given ids at the given canvas positions, no links.
    pub fn new(nodes: &[(&str, f32, f32)]) -> Self {
        Self::with_edges(nodes, &[])
    }

    pub fn with_edges(nodes: &[(&str, f32, f32)], edges: &[(&str, &str)]) -> Self {
        Self::with_config(CanvasConfig::default(), nodes, edges)
    }

    pub fn with_config(
        config: CanvasConfig,
        nodes: &[(&str, f32, f32)],
        edges: &[(&str, &str)],
    ) -> Self {
        init_logging();
        let store = MockStore::shared();
        {
            let mut s = store.borrow_mut();
            s.nodes = nodes
                .iter()
                .map(|(n, x, y)| NodeData::new(*n, p(*x, *y), NodeFields::titled(*n)))
                .collect();
            s.edges = edges
                .iter()
                .enumerate()
                .map(|(i, (a, b))| EdgeData {
                    id: EdgeId(format!("seed-{i}")),
                    from: id(a),
                    to: id(b),
                })
                .collect();
        }

        let ctrl = CanvasController::with_config(config);
        let tracker = CallbackTracker::new();

        ctrl.on_node_activated({
            let tracker = tracker.clone();
            move |node| tracker.node_activated.borrow_mut().push(node.id)
        });
        ctrl.on_node_activated_secondary({
            let tracker = tracker.clone();
            move |node| tracker.node_activated_secondary.borrow_mut().push(node.id)
        });
        ctrl.on_selection_changed({
            let tracker = tracker.clone();
            move |ids| tracker.selection_changed.borrow_mut().push(ids.to_vec())
        });
        ctrl.on_model_changed({
            let tracker = tracker.clone();
            move |nodes| tracker.model_changed.borrow_mut().push(nodes.len())
        });
        ctrl.on_notice({
            let tracker = tracker.clone();
            move |notice| tracker.notices.borrow_mut().push(notice.clone())
        });

        let (listed_nodes, listed_edges) = {
            let mut s = store.borrow_mut();
            let project = ctrl.config().project_id;
            (
                s.list_nodes(&project).unwrap(),
                s.list_edges(&project).unwrap(),
            )
        };
        ctrl.load(listed_nodes, listed_edges);
        tracker.clear();

        Self {
            ctrl,
            store,
            tracker,
        }
    }

    // === Pointer helpers (screen coordinates) ===

    pub fn click(&self, x: f32, y: f32) {
        self.ctrl.pointer_down(p(x, y), PointerEventButton::Left, false);
        self.ctrl.pointer_up(p(x, y));
    }

    pub fn modifier_click(&self, x: f32, y: f32) {
        self.ctrl.pointer_down(p(x, y), PointerEventButton::Left, true);
        self.ctrl.pointer_up(p(x, y));
    }

    /// Press at `from`, move to `to` (one animation frame), release.
    pub fn drag(&self, from: Point, to: Point) {
        self.ctrl.pointer_down(from, PointerEventButton::Left, false);
        self.ctrl.pointer_move(to);
        self.ctrl.frame();
        self.ctrl.pointer_up(to);
    }

    pub fn pan(&self, from: Point, to: Point) {
        self.ctrl.pointer_down(from, PointerEventButton::Right, false);
        self.ctrl.pointer_move(to);
        self.ctrl.pointer_up(to);
    }

    // === Persistence helpers ===

    /// Run queued requests as if `after` had elapsed since now.
    pub fn pump_after(&self, after: Duration) {
        let mut store = self.store.borrow_mut();
        self.ctrl.pump(&mut *store, Instant::now() + after);
    }

    /// Run everything, debounced position syncs included.
    pub fn settle(&self) {
        self.pump_after(Duration::from_secs(1));
    }

    pub fn position(&self, node: &str) -> Point {
        self.ctrl.position(&id(node)).unwrap()
    }
}
