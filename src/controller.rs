//! Composition root: one canvas, its model, and its input routing.
//!
//! The [`CanvasController`] owns the viewport, the local graph, selection,
//! drag and link-mode state and the persistence bridge. Pointer, wheel and
//! keyboard events go in; screen-space models and host callbacks come out.
//!
//! # Example
//!
//! ```ignore
//! use slint_plan_canvas::{CanvasConfig, CanvasController, CanvasDriver};
//!
//! let ctrl = CanvasController::with_config(CanvasConfig::from_json_str(&settings)?);
//! ctrl.load(store.list_nodes(&project)?, store.list_edges(&project)?);
//!
//! window.on_key_pressed(ctrl.key_pressed_callback());
//! window.on_wheel(ctrl.wheel_callback());
//! window.on_link_clicked(ctrl.begin_link_callback());
//! ctrl.on_node_activated(move |node| open_details(node));
//!
//! // Drag frames + persistence on a ~16ms slint timer
//! let _driver = CanvasDriver::with_store(ctrl.clone(), Rc::new(RefCell::new(store)));
//! ```
//!
//! Host callbacks always run after the controller has released its
//! internal borrows, so they may call straight back into the controller.

use crate::config::CanvasConfig;
use crate::connection::{ConnectionController, ConnectionEvent};
use crate::drag::{DragController, DragOutcome};
use crate::error::{GraphError, RemoteError};
use crate::geometry::{Point, Rect, Size};
use crate::graph::{CanvasGraph, EdgeData, EdgeToggle, NodeData, NodeFields, NodeId, NodePatch};
use crate::hit_test::{boxed, find_node_at};
use crate::persistence::{
    BridgeEvent, Notice, PendingRequest, PersistenceBridge, RemoteResponse, RemoteStore, Ticket,
};
use crate::render::{EdgeView, NodeView, RenderFrame, RenderModels};
use crate::selection::{SelectionModel, SelectionRectangle};
use crate::viewport::ViewportTransform;
use slint::platform::{Key, PointerEventButton};
use slint::{ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// What the primary pointer is currently doing.
#[derive(Clone, Debug, Default, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    /// Pressed on a node; the drag controller decides click vs. drag.
    Node,
    Selecting(SelectionRectangle),
    Panning {
        last: Point,
    },
}

/// Notifications gathered while the state is borrowed, delivered after.
#[derive(Default)]
struct HostOutbox {
    activated: Vec<NodeData>,
    activated_secondary: Vec<NodeData>,
    selection_changed: bool,
    model_changed: bool,
    notices: Vec<Notice>,
}

#[derive(Clone, Default)]
struct HostCallbacks {
    node_activated: Option<Rc<dyn Fn(NodeData)>>,
    node_activated_secondary: Option<Rc<dyn Fn(NodeData)>>,
    selection_changed: Option<Rc<dyn Fn(&[NodeId])>>,
    model_changed: Option<Rc<dyn Fn(&[NodeData])>>,
    notice: Option<Rc<dyn Fn(&Notice)>>,
}

struct CanvasState {
    config: CanvasConfig,
    viewport: ViewportTransform,
    graph: CanvasGraph,
    selection: SelectionModel,
    drag: DragController,
    connection: ConnectionController,
    bridge: PersistenceBridge,
    gesture: Gesture,
    /// A plain press (no modifier) activates the node on release.
    activate_on_click: bool,
    needs_render: bool,
}

impl CanvasState {
    fn new(config: CanvasConfig) -> Self {
        Self {
            viewport: ViewportTransform::from_config(&config),
            graph: CanvasGraph::new(),
            selection: SelectionModel::new(),
            drag: DragController::new(config.drag_threshold),
            connection: ConnectionController::new(),
            bridge: Self::bridge_for(&config),
            gesture: Gesture::Idle,
            activate_on_click: false,
            needs_render: true,
            config,
        }
    }

    fn bridge_for(config: &CanvasConfig) -> PersistenceBridge {
        PersistenceBridge::new(
            config.project_id.clone(),
            config.position_debounce(),
            config.position_retry_limit,
        )
    }

    fn node_at(&self, canvas: Point) -> Option<NodeId> {
        find_node_at(canvas, boxed(self.graph.nodes(), self.config.node_size))
    }

    fn node_data(&self, id: &NodeId) -> Option<NodeData> {
        self.graph.node(id).map(|n| n.to_data())
    }

    fn band(&self) -> Option<&SelectionRectangle> {
        match &self.gesture {
            Gesture::Selecting(band) => Some(band),
            _ => None,
        }
    }

    fn render(&self) -> RenderFrame {
        RenderFrame::build(
            &self.graph,
            &self.viewport,
            &self.selection,
            &self.connection,
            self.band(),
            self.config.node_size,
            self.config.edge_curve_offset,
        )
    }

    fn take_render(&mut self) -> Option<RenderFrame> {
        if !std::mem::take(&mut self.needs_render) {
            return None;
        }
        Some(self.render())
    }

    fn model_changed(&mut self, out: &mut HostOutbox) {
        out.model_changed = true;
        self.needs_render = true;
    }

    // === Pointer ===

    fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerEventButton,
        modifier: bool,
        out: &mut HostOutbox,
    ) {
        match button {
            PointerEventButton::Left => self.primary_down(screen, modifier, out),
            PointerEventButton::Right | PointerEventButton::Middle => {
                self.gesture = Gesture::Panning { last: screen };
            }
            _ => {}
        }
    }

    fn primary_down(&mut self, screen: Point, modifier: bool, out: &mut HostOutbox) {
        let canvas = self.viewport.to_canvas(screen);
        let hit = self.node_at(canvas);
        self.gesture = Gesture::Idle;

        match hit {
            Some(id) if self.connection.is_active() => {
                if let ConnectionEvent::Toggle { from, to } = self.connection.click_node(&id) {
                    if let Err(error) = self.toggle_edge(&from, &to, out) {
                        log::warn!("link toggle {from} -> {to} rejected: {error}");
                    }
                }
                self.needs_render = true;
            }
            Some(id) => {
                if self.selection.handle_click(&id, modifier) {
                    out.selection_changed = true;
                    self.needs_render = true;
                }
                self.activate_on_click = !modifier;
                self.drag.pointer_down(id, screen);
                self.gesture = Gesture::Node;
            }
            None if self.connection.is_active() => {
                self.connection.cancel();
                self.needs_render = true;
            }
            None => {
                if self.selection.clear() {
                    out.selection_changed = true;
                }
                self.gesture = Gesture::Selecting(SelectionRectangle::new(canvas));
                self.needs_render = true;
            }
        }
    }

    fn pointer_move(&mut self, screen: Point, out: &mut HostOutbox) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan_by(delta);
                self.needs_render = true;
            }
            Gesture::Selecting(band) => {
                band.current = self.viewport.to_canvas(screen);
                let rect = band.rect();
                let nodes = boxed(self.graph.nodes(), self.config.node_size);
                if self.selection.set_from_rectangle(&rect, nodes) {
                    out.selection_changed = true;
                }
                self.needs_render = true;
            }
            Gesture::Node => {
                self.drag
                    .pointer_move(screen, &self.viewport, &self.graph, &self.selection);
            }
        }
    }

    fn pointer_up(&mut self, screen: Point, now: Instant, out: &mut HostOutbox) {
        self.pointer_move(screen, out);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::Selecting(_) => self.needs_render = true,
            Gesture::Node => match self.drag.pointer_up() {
                DragOutcome::None => {}
                DragOutcome::Click(id) => {
                    if self.activate_on_click {
                        out.activated.extend(self.node_data(&id));
                    }
                }
                DragOutcome::Dropped(moves) => {
                    for (id, position) in moves {
                        match self.graph.set_position(&id, position) {
                            Ok(()) => self.bridge.schedule_position(&id, position, now),
                            Err(error) => log::debug!("dropped node vanished: {error}"),
                        }
                    }
                    self.model_changed(out);
                }
            },
        }
    }

    fn frame(&mut self) -> bool {
        let Some(moves) = self.drag.take_frame() else {
            return false;
        };
        for (id, position) in moves {
            if let Err(error) = self.graph.set_position(&id, position) {
                log::debug!("drag frame skipped: {error}");
            }
        }
        self.needs_render = true;
        true
    }

    // === Keyboard ===

    fn key_pressed(&mut self, text: &str, out: &mut HostOutbox) -> bool {
        let Some(c) = text.chars().next() else {
            return false;
        };
        if c == char::from(Key::Delete) || c == char::from(Key::Backspace) {
            if self.drag.is_pressed() || matches!(self.gesture, Gesture::Selecting(_)) {
                return false;
            }
            self.delete_selection(out);
            true
        } else if c == char::from(Key::Escape) {
            self.connection.cancel();
            if matches!(self.gesture, Gesture::Selecting(_)) {
                self.gesture = Gesture::Idle;
            }
            self.needs_render = true;
            true
        } else if c == '+' || c == '=' {
            self.needs_render |= self.viewport.zoom_in();
            true
        } else if c == '-' {
            self.needs_render |= self.viewport.zoom_out();
            true
        } else {
            false
        }
    }

    // === Model mutations ===

    fn toggle_edge(
        &mut self,
        a: &NodeId,
        b: &NodeId,
        out: &mut HostOutbox,
    ) -> Result<EdgeToggle, GraphError> {
        let toggle = self.bridge.toggle_edge(&mut self.graph, a, b)?;
        self.model_changed(out);
        Ok(toggle)
    }

    fn forget_node(&mut self, id: &NodeId, out: &mut HostOutbox) {
        if self.selection.remove(id) {
            out.selection_changed = true;
        }
        self.drag.forget(id);
        self.connection.forget(id);
        if self.gesture == Gesture::Node && !self.drag.is_pressed() {
            self.gesture = Gesture::Idle;
        }
    }

    fn delete_node(&mut self, id: &NodeId, out: &mut HostOutbox) -> Result<(), GraphError> {
        self.bridge.delete_node(&mut self.graph, id)?;
        self.forget_node(id, out);
        self.model_changed(out);
        Ok(())
    }

    fn delete_selection(&mut self, out: &mut HostOutbox) -> usize {
        let mut deleted = 0;
        for id in self.selection.ids() {
            match self.delete_node(&id, out) {
                Ok(()) => deleted += 1,
                Err(error) => log::warn!("could not delete {id}: {error}"),
            }
        }
        deleted
    }

    fn apply_bridge_events(&mut self, events: Vec<BridgeEvent>, out: &mut HostOutbox) {
        for event in events {
            if event.changes_model() {
                self.model_changed(out);
            }
            match event {
                BridgeEvent::Renamed { old, new } => {
                    if self.selection.contains(&old) {
                        out.selection_changed = true;
                    }
                    self.selection.rename(&old, &new);
                    self.drag.rename(&old, &new);
                    self.connection.rename(&old, &new);
                }
                BridgeEvent::NodeDiscarded(id) => self.forget_node(&id, out),
                BridgeEvent::NodeRestored(_) | BridgeEvent::EdgeReverted(_) => {}
                BridgeEvent::Notice(notice) => out.notices.push(notice),
            }
        }
    }
}

/// Controller for one planning canvas.
///
/// Clone this controller to share it across callbacks; clones refer to the
/// same canvas.
#[derive(Clone)]
pub struct CanvasController {
    state: Rc<RefCell<CanvasState>>,
    callbacks: Rc<RefCell<HostCallbacks>>,
    models: RenderModels,
    selection_model: Rc<VecModel<SharedString>>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// Create a controller with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        let ctrl = Self {
            state: Rc::new(RefCell::new(CanvasState::new(config))),
            callbacks: Rc::new(RefCell::new(HostCallbacks::default())),
            models: RenderModels::new(),
            selection_model: Rc::new(VecModel::default()),
        };
        ctrl.with(|_, _| ());
        ctrl
    }

    /// Run `f` against the state, then sync models and notify the host once
    /// the borrow is released.
    fn with<R>(&self, f: impl FnOnce(&mut CanvasState, &mut HostOutbox) -> R) -> R {
        let mut out = HostOutbox::default();
        let (result, frame) = {
            let mut guard = self.state.borrow_mut();
            let st = &mut *guard;
            let result = f(st, &mut out);
            if out.selection_changed {
                st.selection.sync_to_model(&self.selection_model);
            }
            (result, st.take_render())
        };
        if let Some(frame) = frame {
            self.models.sync(&frame);
        }
        self.notify(out);
        result
    }

    fn notify(&self, out: HostOutbox) {
        let (selected, nodes) = {
            let st = self.state.borrow();
            (
                out.selection_changed.then(|| st.selection.ids()),
                out.model_changed.then(|| st.graph.snapshot()),
            )
        };
        let callbacks = self.callbacks.borrow().clone();

        if let (Some(ids), Some(cb)) = (selected, &callbacks.selection_changed) {
            cb(&ids);
        }
        if let Some(cb) = &callbacks.node_activated {
            for node in out.activated {
                cb(node);
            }
        }
        if let Some(cb) = &callbacks.node_activated_secondary {
            for node in out.activated_secondary {
                cb(node);
            }
        }
        if let (Some(nodes), Some(cb)) = (nodes, &callbacks.model_changed) {
            cb(&nodes);
        }
        if let Some(cb) = &callbacks.notice {
            for notice in &out.notices {
                cb(notice);
            }
        }
    }

    // === Host callbacks ===

    /// Single click on a node (open details).
    pub fn on_node_activated(&self, f: impl Fn(NodeData) + 'static) {
        self.callbacks.borrow_mut().node_activated = Some(Rc::new(f));
    }

    /// Double click on a node (alternate view).
    pub fn on_node_activated_secondary(&self, f: impl Fn(NodeData) + 'static) {
        self.callbacks.borrow_mut().node_activated_secondary = Some(Rc::new(f));
    }

    pub fn on_selection_changed(&self, f: impl Fn(&[NodeId]) + 'static) {
        self.callbacks.borrow_mut().selection_changed = Some(Rc::new(f));
    }

    /// Any committed change to nodes or edges, local or from reconciliation.
    pub fn on_model_changed(&self, f: impl Fn(&[NodeData]) + 'static) {
        self.callbacks.borrow_mut().model_changed = Some(Rc::new(f));
    }

    /// Non-blocking failure notices (rollbacks, reverted links).
    pub fn on_notice(&self, f: impl Fn(&Notice) + 'static) {
        self.callbacks.borrow_mut().notice = Some(Rc::new(f));
    }

    // === Settings ===

    pub fn config(&self) -> CanvasConfig {
        self.state.borrow().config.clone()
    }

    /// Set the click/drag threshold in screen pixels (default: 5.0).
    pub fn set_drag_threshold(&self, threshold: f32) {
        self.with(|st, _| {
            st.config.drag_threshold = threshold;
            st.drag.set_threshold(threshold);
        });
    }

    /// Set the fixed node box used for hit testing and rendering (default: 240×120).
    pub fn set_node_size(&self, size: Size) {
        self.with(|st, _| {
            st.config.node_size = size;
            st.needs_render = true;
        });
    }

    /// Set the minimum edge curve control offset (default: 50.0).
    pub fn set_edge_curve_offset(&self, offset: f32) {
        self.with(|st, _| {
            st.config.edge_curve_offset = offset;
            st.needs_render = true;
        });
    }

    /// Set the position sync debounce window (default: 200ms).
    pub fn set_position_debounce(&self, debounce: Duration) {
        self.with(|st, _| {
            st.config.position_debounce_ms =
                u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
            st.bridge.set_debounce(debounce);
        });
    }

    pub fn set_project_id(&self, project_id: &str) {
        self.with(|st, _| {
            st.config.project_id = project_id.to_owned();
            st.bridge.set_project_id(project_id);
        });
    }

    // === Viewport ===

    pub fn zoom(&self) -> f32 {
        self.state.borrow().viewport.zoom()
    }

    pub fn pan(&self) -> Point {
        self.state.borrow().viewport.pan()
    }

    /// Set zoom, clamped to the configured bounds.
    pub fn set_zoom(&self, zoom: f32) -> bool {
        self.with(|st, _| {
            let changed = st.viewport.set_zoom(zoom);
            st.needs_render |= changed;
            changed
        })
    }

    pub fn set_pan(&self, pan: Point) {
        self.with(|st, _| {
            st.viewport.set_pan(pan);
            st.needs_render = true;
        });
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        self.state.borrow().viewport.to_canvas(screen)
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        self.state.borrow().viewport.to_screen(canvas)
    }

    // === Input ===

    pub fn pointer_down(&self, screen: Point, button: PointerEventButton, modifier: bool) {
        self.with(|st, out| st.pointer_down(screen, button, modifier, out));
    }

    pub fn pointer_move(&self, screen: Point) {
        self.with(|st, out| st.pointer_move(screen, out));
    }

    pub fn pointer_up(&self, screen: Point) {
        let now = Instant::now();
        self.with(|st, out| st.pointer_up(screen, now, out));
    }

    pub fn double_click(&self, screen: Point) {
        self.with(|st, out| {
            let canvas = st.viewport.to_canvas(screen);
            if let Some(id) = st.node_at(canvas) {
                out.activated_secondary.extend(st.node_data(&id));
            }
        });
    }

    /// One wheel notch; negative `delta` zooms in. Returns whether zoom changed.
    pub fn wheel(&self, delta: f32) -> bool {
        self.with(|st, _| {
            let changed = st.viewport.apply_wheel(delta);
            st.needs_render |= changed;
            changed
        })
    }

    /// Keyboard shortcut, given the key event text. Returns whether it was
    /// handled.
    ///
    /// - Delete / Backspace: delete the selection
    /// - Escape: leave link mode, drop the rubber band
    /// - `+` / `=` / `-`: zoom one step
    pub fn key_pressed(&self, text: &str) -> bool {
        self.with(|st, out| st.key_pressed(text, out))
    }

    /// Apply at most one pending drag update. Call once per animation frame.
    pub fn frame(&self) -> bool {
        self.with(|st, _| st.frame())
    }

    /// The link control on `id` was pressed.
    pub fn begin_link(&self, id: &NodeId) -> ConnectionEvent {
        self.with(|st, _| {
            if !st.graph.contains(id) {
                return ConnectionEvent::Ignored;
            }
            st.needs_render = true;
            st.connection.begin(id.clone())
        })
    }

    pub fn cancel_link(&self) {
        self.with(|st, _| {
            st.connection.cancel();
            st.needs_render = true;
        });
    }

    // === Callback factories ===

    /// Returns a callback for a `key-pressed(text) -> bool` handler.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool {
        let ctrl = self.clone();
        move |text| ctrl.key_pressed(text.as_str())
    }

    /// Returns a callback for a `wheel(delta-y)` handler.
    pub fn wheel_callback(&self) -> impl Fn(f32) {
        let ctrl = self.clone();
        move |delta| {
            ctrl.wheel(delta);
        }
    }

    /// Returns a callback for a `link-clicked(node-id)` handler.
    pub fn begin_link_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |id| {
            ctrl.begin_link(&NodeId::from(id.as_str()));
        }
    }

    /// Returns a callback for a `double-clicked(x, y)` handler.
    pub fn double_click_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.double_click(Point::new(x, y))
    }

    // === Model ===

    /// Replace the local model with a remote listing. Issues no requests.
    pub fn load(&self, nodes: Vec<NodeData>, edges: Vec<EdgeData>) {
        self.with(|st, out| {
            st.graph.load(nodes, edges);
            if st.selection.clear() {
                out.selection_changed = true;
            }
            st.drag.cancel();
            st.connection.cancel();
            st.gesture = Gesture::Idle;
            st.bridge = CanvasState::bridge_for(&st.config);
            st.model_changed(out);
        });
    }

    /// Add a node under a temporary id; the remote id replaces it once the
    /// create succeeds.
    pub fn create_node(&self, position: Point, fields: NodeFields) -> Result<NodeId, GraphError> {
        self.with(|st, out| {
            let id = st.bridge.create_node(&mut st.graph, position, fields)?;
            st.model_changed(out);
            Ok(id)
        })
    }

    /// Edit a node's fields. The edit is kept even if the remote update fails.
    pub fn update_node(&self, id: &NodeId, patch: NodePatch) -> Result<(), GraphError> {
        self.with(|st, out| {
            st.bridge.update_node(&mut st.graph, id, patch)?;
            st.model_changed(out);
            Ok(())
        })
    }

    /// Move a node programmatically; the position sync is debounced.
    pub fn move_node(&self, id: &NodeId, position: Point) -> Result<(), GraphError> {
        let now = Instant::now();
        self.with(|st, out| {
            st.bridge.move_node(&mut st.graph, id, position, now)?;
            st.model_changed(out);
            Ok(())
        })
    }

    pub fn delete_node(&self, id: &NodeId) -> Result<(), GraphError> {
        self.with(|st, out| st.delete_node(id, out))
    }

    /// Delete every selected node. Returns how many were deleted.
    pub fn delete_selection(&self) -> usize {
        self.with(|st, out| st.delete_selection(out))
    }

    /// Toggle the link between two nodes, whichever orientation it has.
    pub fn toggle_edge(&self, a: &NodeId, b: &NodeId) -> Result<EdgeToggle, GraphError> {
        self.with(|st, out| st.toggle_edge(a, b, out))
    }

    // === Persistence ===

    /// Release due position syncs into the outbox.
    pub fn poll(&self, now: Instant) {
        self.with(|st, _| st.bridge.poll(now));
    }

    /// Drain queued requests for a host that runs them itself.
    pub fn take_requests(&self) -> Vec<PendingRequest> {
        self.with(|st, _| st.bridge.take_requests())
    }

    /// Report the result of a request taken with [`take_requests`](Self::take_requests).
    pub fn complete(&self, ticket: Ticket, result: Result<RemoteResponse, RemoteError>) {
        self.with(|st, out| {
            let events = st.bridge.complete(&mut st.graph, ticket, result);
            st.apply_bridge_events(events, out);
        });
    }

    /// Poll, then run every queued request against `store`.
    pub fn pump<S: RemoteStore + ?Sized>(&self, store: &mut S, now: Instant) {
        self.with(|st, out| {
            st.bridge.poll(now);
            let events = st.bridge.dispatch(&mut st.graph, store);
            st.apply_bridge_events(events, out);
        });
    }

    /// Earliest pending position-sync deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.borrow().bridge.next_deadline()
    }

    /// No persistence work queued, waiting or in flight.
    pub fn is_idle(&self) -> bool {
        self.state.borrow().bridge.is_idle()
    }

    // === Queries ===

    pub fn nodes(&self) -> Vec<NodeData> {
        self.state.borrow().graph.snapshot()
    }

    pub fn node(&self, id: &NodeId) -> Option<NodeData> {
        self.state.borrow().node_data(id)
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.state.borrow().graph.position(id)
    }

    /// Ids linked to `id`.
    pub fn connections(&self, id: &NodeId) -> Vec<NodeId> {
        self.state
            .borrow()
            .graph
            .node(id)
            .map(|n| n.connections().iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.state.borrow().graph.has_edge(a, b)
    }

    pub fn edge_count(&self) -> usize {
        self.state.borrow().graph.edge_count()
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.state.borrow().selection.ids()
    }

    pub fn set_selection(&self, ids: &[NodeId]) {
        self.with(|st, out| {
            let before = st.selection.ids();
            st.selection.clear();
            for id in ids.iter().filter(|id| st.graph.contains(id)) {
                if !st.selection.contains(id) {
                    st.selection.toggle(id);
                }
            }
            if st.selection.ids() != before {
                out.selection_changed = true;
                st.needs_render = true;
            }
        });
    }

    pub fn link_source(&self) -> Option<NodeId> {
        self.state.borrow().connection.pending_source().cloned()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.is_dragging()
    }

    /// Rubber band in canvas coordinates, while one is being drawn.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.state.borrow().band().map(|b| b.rect())
    }

    /// Build a frame from the current state.
    pub fn render(&self) -> RenderFrame {
        self.state.borrow().render()
    }

    pub fn node_model(&self) -> ModelRc<NodeView> {
        self.models.nodes()
    }

    pub fn edge_model(&self) -> ModelRc<EdgeView> {
        self.models.edges()
    }

    /// Selected ids, mirrored for a `.slint` binding.
    pub fn selection_model(&self) -> ModelRc<SharedString> {
        ModelRc::from(self.selection_model.clone())
    }
}
