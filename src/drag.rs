//! Pointer → node position changes.
//!
//! A press on a node does not start a drag right away. Only once the pointer
//! has travelled more than the drag threshold (screen pixels) does the press
//! become a drag; releasing before that is a click.
//!
//! Drag sessions are viewport-locked: the pan/zoom in effect when the drag
//! starts is captured once and used until release, even if the live viewport
//! changes in between (e.g. a keyboard zoom shortcut mid-drag). The node
//! therefore keeps following the pointer under the *old* mapping; the new
//! zoom applies from the next drag on.
//!
//! Pointer moves only record the latest pointer position. Positions are
//! computed in [`DragController::take_frame`], which the host calls once per
//! animation frame, so a burst of moves between two frames costs one update.

use crate::geometry::Point;
use crate::graph::{CanvasGraph, NodeId};
use crate::selection::SelectionModel;
use crate::viewport::{ViewportSnapshot, ViewportTransform};

/// State of an active drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub node_id: NodeId,
    /// Canvas offset from the dragged node's origin to the press point.
    pub pointer_to_node_offset: Point,
    /// Pan/zoom captured when the drag started.
    pub viewport: ViewportSnapshot,
    /// Every node that moves with this drag and where it started.
    /// The dragged node is always first.
    pub members: Vec<(NodeId, Point)>,
    /// Canvas translation applied so far.
    pub live_delta: Point,
    last_pointer: Point,
    frame_pending: bool,
}

impl DragSession {
    pub fn is_group(&self) -> bool {
        self.members.len() > 1
    }

    fn origin(&self) -> Point {
        self.members[0].1
    }

    fn compute(&mut self) -> Vec<(NodeId, Point)> {
        let new_position =
            self.viewport.to_canvas(self.last_pointer) - self.pointer_to_node_offset;
        self.live_delta = new_position - self.origin();
        let delta = self.live_delta;
        self.members
            .iter()
            .map(|(id, start)| (id.clone(), *start + delta))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Pressed {
        node_id: NodeId,
        start: Point,
    },
    Dragging(DragSession),
}

/// What a pointer move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragProgress {
    /// No press in progress.
    Ignored,
    /// Pressed but still inside the threshold.
    Pending,
    /// The press just turned into a drag.
    Started,
    /// A drag is in progress; a frame update is pending.
    Moved,
}

/// How a press ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    None,
    /// Released before the threshold: treat as a click on the node.
    Click(NodeId),
    /// Final positions of every moved node.
    Dropped(Vec<(NodeId, Point)>),
}

#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    threshold: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl DragController {
    pub fn new(threshold: f32) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
        }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Primary button went down on `node_id`.
    pub fn pointer_down(&mut self, node_id: NodeId, screen: Point) {
        self.state = DragState::Pressed {
            node_id,
            start: screen,
        };
    }

    pub fn pointer_move(
        &mut self,
        screen: Point,
        viewport: &ViewportTransform,
        graph: &CanvasGraph,
        selection: &SelectionModel,
    ) -> DragProgress {
        match &mut self.state {
            DragState::Idle => DragProgress::Ignored,
            DragState::Dragging(session) => {
                session.last_pointer = screen;
                session.frame_pending = true;
                DragProgress::Moved
            }
            DragState::Pressed { node_id, start } => {
                if start.distance_to(screen) <= self.threshold {
                    return DragProgress::Pending;
                }
                let (node_id, start) = (node_id.clone(), *start);
                let Some(origin) = graph.position(&node_id) else {
                    // Node vanished under the pointer (deleted remotely or by
                    // a rollback); nothing to drag.
                    self.state = DragState::Idle;
                    return DragProgress::Ignored;
                };
                let snapshot = viewport.snapshot();
                let pointer_to_node_offset = snapshot.to_canvas(start) - origin;

                let mut members = vec![(node_id.clone(), origin)];
                if selection.contains(&node_id) && selection.len() > 1 {
                    members.extend(
                        selection
                            .iter()
                            .filter(|id| **id != node_id)
                            .filter_map(|id| graph.position(id).map(|p| (id.clone(), p))),
                    );
                }

                self.state = DragState::Dragging(DragSession {
                    node_id,
                    pointer_to_node_offset,
                    viewport: snapshot,
                    members,
                    live_delta: Point::ZERO,
                    last_pointer: screen,
                    frame_pending: true,
                });
                DragProgress::Started
            }
        }
    }

    /// Positions for this frame, if the pointer moved since the last one.
    pub fn take_frame(&mut self) -> Option<Vec<(NodeId, Point)>> {
        match &mut self.state {
            DragState::Dragging(session) if session.frame_pending => {
                session.frame_pending = false;
                Some(session.compute())
            }
            _ => None,
        }
    }

    /// Primary button released.
    pub fn pointer_up(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::None,
            DragState::Pressed { node_id, .. } => DragOutcome::Click(node_id),
            DragState::Dragging(mut session) => DragOutcome::Dropped(session.compute()),
        }
    }

    /// Abort without committing. Returns the start positions of the moved
    /// nodes so the caller can put them back.
    pub fn cancel(&mut self) -> Vec<(NodeId, Point)> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => session.members,
            _ => Vec::new(),
        }
    }

    /// Follow an id swap for a node that is part of the current press.
    pub fn rename(&mut self, old: &NodeId, new: &NodeId) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Pressed { node_id, .. } => {
                if node_id == old {
                    *node_id = new.clone();
                }
            }
            DragState::Dragging(session) => {
                if &session.node_id == old {
                    session.node_id = new.clone();
                }
                for (id, _) in &mut session.members {
                    if id == old {
                        *id = new.clone();
                    }
                }
            }
        }
    }

    /// Forget a node that no longer exists. Cancels the press if it was
    /// the one being dragged.
    pub fn forget(&mut self, removed: &NodeId) {
        let drop_all = match &mut self.state {
            DragState::Idle => false,
            DragState::Pressed { node_id, .. } => node_id == removed,
            DragState::Dragging(session) => {
                session.members.retain(|(id, _)| id != removed);
                &session.node_id == removed
            }
        };
        if drop_all {
            self.state = DragState::Idle;
        }
    }
}
