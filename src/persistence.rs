//! Optimistic local mutations, eventually persisted to a remote store.
//!
//! The bridge never talks to the network itself. Every mutation is applied
//! to the [`CanvasGraph`] immediately and turns into a [`PendingRequest`] in
//! an outbox. The host drains the outbox ([`PersistenceBridge::take_requests`]),
//! runs the requests however it likes (async task, worker thread, or
//! synchronously through [`PersistenceBridge::dispatch`]) and reports each
//! result back with [`PersistenceBridge::complete`]. Reconciliation (id
//! swaps, rollbacks) happens there, through the same graph the input handlers
//! use.
//!
//! Failure policy:
//!
//! | request        | network error          | validation / ambiguous |
//! |----------------|------------------------|------------------------|
//! | position sync  | retried, then dropped  | dropped                |
//! | create node    | node discarded         | node discarded         |
//! | update node    | kept, logged           | kept, logged           |
//! | delete node    | node + edges restored  | deletion kept          |
//! | create edge    | edge removed           | edge removed           |
//! | delete edge    | edge restored          | edge restored          |
//!
//! Ordering:
//!
//! - Position syncs are debounced per node; a newer position replaces the
//!   pending one, and a node never has two position writes in flight.
//! - Nothing addressed to a temporary id is sent before its create has
//!   resolved. Such requests wait and are released with the real id.

use crate::error::{GraphError, RemoteError};
use crate::geometry::Point;
use crate::graph::{
    CanvasGraph, EdgeData, EdgeId, EdgeKey, EdgeRecord, EdgeToggle, NodeData, NodeFields, NodeId,
    NodePatch, RemovedNode,
};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

/// The remote side, as seen by the canvas.
///
/// Methods are called from [`PersistenceBridge::dispatch`]. Hosts with an
/// async client run the requests from [`PersistenceBridge::take_requests`]
/// themselves instead and never need to implement this.
pub trait RemoteStore {
    fn create_node(&mut self, project_id: &str, node: &NodeData) -> Result<NodeData, RemoteError>;
    fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> Result<(), RemoteError>;
    fn delete_node(&mut self, project_id: &str, id: &NodeId) -> Result<(), RemoteError>;
    fn create_edge(
        &mut self,
        project_id: &str,
        from: &NodeId,
        to: &NodeId,
    ) -> Result<EdgeData, RemoteError>;
    fn delete_edge(&mut self, project_id: &str, edge_id: &EdgeId) -> Result<(), RemoteError>;
    fn list_nodes(&mut self, project_id: &str) -> Result<Vec<NodeData>, RemoteError>;
    fn list_edges(&mut self, project_id: &str) -> Result<Vec<EdgeData>, RemoteError>;
}

/// Handle pairing a request with its completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum RemoteRequest {
    /// `node.id` is the temporary id.
    CreateNode { node: NodeData },
    UpdateNode { id: NodeId, patch: NodePatch },
    DeleteNode { id: NodeId },
    CreateEdge { from: NodeId, to: NodeId },
    DeleteEdge { edge_id: EdgeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub project_id: String,
    pub request: RemoteRequest,
}

/// Successful result of a request.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteResponse {
    Done,
    NodeCreated(NodeData),
    EdgeCreated(EdgeData),
}

/// Non-blocking failure notice for the host to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// The create failed; the optimistic node is gone.
    CreateRolledBack { id: NodeId, error: RemoteError },
    /// The delete failed in transit; the node is back.
    DeleteRestored { id: NodeId, error: RemoteError },
    /// The delete answer was inconclusive; the node stays deleted locally.
    DeleteKept { id: NodeId, error: RemoteError },
    /// A link change failed and was undone.
    EdgeReverted { key: EdgeKey, error: RemoteError },
}

/// Something reconciliation did to the local model.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEvent {
    Renamed { old: NodeId, new: NodeId },
    NodeDiscarded(NodeId),
    NodeRestored(NodeId),
    EdgeReverted(EdgeKey),
    Notice(Notice),
}

impl BridgeEvent {
    /// Whether the local model changed.
    pub fn changes_model(&self) -> bool {
        !matches!(self, BridgeEvent::Notice(_))
    }
}

#[derive(Clone, Debug)]
enum InFlight {
    Create { temp_id: NodeId },
    Update { id: NodeId },
    Position { id: NodeId, position: Point, attempt: u32 },
    Delete { removed: RemovedNode },
    EdgeCreate { key: EdgeKey },
    EdgeDelete { record: EdgeRecord },
}

/// A request held back until a node's create resolves.
#[derive(Clone, Debug)]
enum Deferred {
    Update { id: NodeId, patch: NodePatch },
    Delete { removed: RemovedNode },
    EdgeCreate { from: NodeId, to: NodeId },
}

impl Deferred {
    fn mentions(&self, id: &NodeId) -> bool {
        match self {
            Deferred::Update { id: target, .. } => target == id,
            Deferred::Delete { removed } => &removed.node.id == id,
            Deferred::EdgeCreate { from, to } => from == id || to == id,
        }
    }

    fn rename(&mut self, old: &NodeId, new: &NodeId) {
        let swap = |slot: &mut NodeId| {
            if slot == old {
                *slot = new.clone();
            }
        };
        match self {
            Deferred::Update { id, .. } => swap(id),
            Deferred::Delete { removed } => {
                swap(&mut removed.node.id);
                for edge in &mut removed.edges {
                    swap(&mut edge.from);
                    swap(&mut edge.to);
                }
            }
            Deferred::EdgeCreate { from, to } => {
                swap(from);
                swap(to);
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingPosition {
    due: Instant,
    position: Point,
    attempt: u32,
}

pub struct PersistenceBridge {
    project_id: String,
    debounce: Duration,
    retry_limit: u32,
    next_ticket: u64,
    last_poll: Option<Instant>,
    outbox: VecDeque<PendingRequest>,
    in_flight: HashMap<Ticket, InFlight>,
    /// Debounce timers, one per node.
    pending_positions: BTreeMap<NodeId, PendingPosition>,
    positions_in_flight: HashSet<NodeId>,
    /// Temporary ids whose create has not resolved yet.
    creating: HashSet<NodeId>,
    deferred: Vec<Deferred>,
    edge_creates_in_flight: HashSet<EdgeKey>,
    /// Links toggled off while their create was still in flight.
    cancelled_edge_creates: HashSet<EdgeKey>,
    /// Links taken out by node deletes that have not resolved yet.
    detached_edges: BTreeMap<EdgeKey, EdgeRecord>,
}

impl PersistenceBridge {
    pub fn new(project_id: impl Into<String>, debounce: Duration, retry_limit: u32) -> Self {
        Self {
            project_id: project_id.into(),
            debounce,
            retry_limit,
            next_ticket: 1,
            last_poll: None,
            outbox: VecDeque::new(),
            in_flight: HashMap::new(),
            pending_positions: BTreeMap::new(),
            positions_in_flight: HashSet::new(),
            creating: HashSet::new(),
            deferred: Vec::new(),
            edge_creates_in_flight: HashSet::new(),
            cancelled_edge_creates: HashSet::new(),
            detached_edges: BTreeMap::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn set_project_id(&mut self, project_id: impl Into<String>) {
        self.project_id = project_id.into();
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Nothing queued, waiting or in flight.
    pub fn is_idle(&self) -> bool {
        self.outbox.is_empty()
            && self.in_flight.is_empty()
            && self.pending_positions.is_empty()
            && self.deferred.is_empty()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether `id` is a temporary id still waiting for its create.
    pub fn is_creating(&self, id: &NodeId) -> bool {
        self.creating.contains(id)
    }

    /// Earliest debounce deadline, for hosts that arm a one-shot timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_positions.values().map(|p| p.due).min()
    }

    // === Mutations ===

    /// Debounce a position sync for a node the caller already moved locally.
    pub fn schedule_position(&mut self, id: &NodeId, position: Point, now: Instant) {
        self.pending_positions.insert(
            id.clone(),
            PendingPosition {
                due: now + self.debounce,
                position,
                attempt: 0,
            },
        );
    }

    /// Programmatic move: apply locally, then debounce the sync.
    pub fn move_node(
        &mut self,
        graph: &mut CanvasGraph,
        id: &NodeId,
        position: Point,
        now: Instant,
    ) -> Result<(), GraphError> {
        graph.set_position(id, position)?;
        self.schedule_position(id, position, now);
        Ok(())
    }

    /// Add a node under a temporary id and send the create.
    pub fn create_node(
        &mut self,
        graph: &mut CanvasGraph,
        position: Point,
        fields: NodeFields,
    ) -> Result<NodeId, GraphError> {
        let data = NodeData::new(NodeId::temporary(), position, fields);
        let temp_id = data.id.clone();
        graph.insert_node(data.clone())?;
        self.creating.insert(temp_id.clone());
        self.enqueue(
            RemoteRequest::CreateNode { node: data },
            InFlight::Create {
                temp_id: temp_id.clone(),
            },
        );
        Ok(temp_id)
    }

    /// Apply an edit locally and send it. Failures are not rolled back.
    ///
    /// A position in the patch replaces any debounced one and goes out on
    /// the next poll, after a position write already in flight.
    pub fn update_node(
        &mut self,
        graph: &mut CanvasGraph,
        id: &NodeId,
        mut patch: NodePatch,
    ) -> Result<(), GraphError> {
        graph.apply_patch(id, &patch)?;
        if let Some(position) = patch.position.take() {
            let now = Instant::now();
            self.pending_positions.insert(
                id.clone(),
                PendingPosition {
                    due: self.last_poll.map_or(now, |polled| polled.min(now)),
                    position,
                    attempt: 0,
                },
            );
        }
        if patch.is_empty() {
            return Ok(());
        }
        if self.creating.contains(id) {
            self.deferred.push(Deferred::Update {
                id: id.clone(),
                patch,
            });
        } else {
            self.send_update(id.clone(), patch);
        }
        Ok(())
    }

    /// Remove a node (and its links) locally and send the delete.
    pub fn delete_node(
        &mut self,
        graph: &mut CanvasGraph,
        id: &NodeId,
    ) -> Result<RemovedNode, GraphError> {
        let removed = graph.remove_node(id)?;
        self.pending_positions.remove(id);
        for edge in &removed.edges {
            let key = edge.key();
            if self.edge_creates_in_flight.contains(&key) {
                self.cancelled_edge_creates.insert(key.clone());
            }
            self.detached_edges.insert(key, edge.clone());
        }
        self.deferred
            .retain(|d| !matches!(d, Deferred::EdgeCreate { .. }) || !d.mentions(id));

        if self.creating.contains(id) {
            self.deferred.push(Deferred::Delete {
                removed: removed.clone(),
            });
        } else {
            self.send_delete(removed.clone());
        }
        Ok(removed)
    }

    /// Toggle the link between two nodes locally and send the change.
    pub fn toggle_edge(
        &mut self,
        graph: &mut CanvasGraph,
        a: &NodeId,
        b: &NodeId,
    ) -> Result<EdgeToggle, GraphError> {
        let toggle = graph.toggle_edge(a, b)?;
        match &toggle {
            EdgeToggle::Connected(key) => {
                // A create still in flight covers the link again.
                let revived = self.cancelled_edge_creates.remove(key);
                if !revived {
                    self.request_edge_create(a.clone(), b.clone());
                }
            }
            EdgeToggle::Disconnected(record) => {
                let key = record.key();
                if let Some(edge_id) = &record.remote_id {
                    self.enqueue(
                        RemoteRequest::DeleteEdge {
                            edge_id: edge_id.clone(),
                        },
                        InFlight::EdgeDelete {
                            record: record.clone(),
                        },
                    );
                } else if let Some(pos) = self.deferred.iter().position(
                    |d| matches!(d, Deferred::EdgeCreate { from, to } if EdgeKey::new(from.clone(), to.clone()) == key),
                ) {
                    self.deferred.remove(pos);
                } else if self.edge_creates_in_flight.contains(&key) {
                    self.cancelled_edge_creates.insert(key);
                } else {
                    log::debug!("link {key} had no remote id; nothing to delete remotely");
                }
            }
        }
        Ok(toggle)
    }

    // === Outbox ===

    /// Release every debounced position sync that is due at `now`.
    pub fn poll(&mut self, now: Instant) {
        self.last_poll = Some(now);
        let due: Vec<NodeId> = self
            .pending_positions
            .iter()
            .filter(|(id, p)| {
                p.due <= now && !self.positions_in_flight.contains(*id) && !self.creating.contains(*id)
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in due {
            if let Some(pending) = self.pending_positions.remove(&id) {
                self.send_position(id, pending.position, pending.attempt);
            }
        }
    }

    /// Make every pending position sync due immediately.
    pub fn flush_positions(&mut self, now: Instant) {
        for pending in self.pending_positions.values_mut() {
            pending.due = now;
        }
        self.poll(now);
    }

    /// Hand the queued requests to the host.
    pub fn take_requests(&mut self) -> Vec<PendingRequest> {
        self.outbox.drain(..).collect()
    }

    /// Run every queued request against `store`, completing each in turn,
    /// until the outbox is empty.
    pub fn dispatch<S: RemoteStore + ?Sized>(
        &mut self,
        graph: &mut CanvasGraph,
        store: &mut S,
    ) -> Vec<BridgeEvent> {
        let mut events = Vec::new();
        while let Some(pending) = self.outbox.pop_front() {
            let result = run_request(store, &pending);
            events.extend(self.complete(graph, pending.ticket, result));
        }
        events
    }

    /// Reconcile the local model with the result of a request.
    pub fn complete(
        &mut self,
        graph: &mut CanvasGraph,
        ticket: Ticket,
        result: Result<RemoteResponse, RemoteError>,
    ) -> Vec<BridgeEvent> {
        let Some(flight) = self.in_flight.remove(&ticket) else {
            log::warn!("completion for unknown request {ticket:?}");
            return Vec::new();
        };
        match flight {
            InFlight::Create { temp_id } => self.complete_create(graph, temp_id, result),
            InFlight::Update { id } => {
                if let Err(error) = result {
                    log::error!("update of node {id} failed, keeping local edit: {error}");
                }
                Vec::new()
            }
            InFlight::Position {
                id,
                position,
                attempt,
            } => {
                self.complete_position(graph, id, position, attempt, result);
                Vec::new()
            }
            InFlight::Delete { removed } => self.complete_delete(graph, removed, result),
            InFlight::EdgeCreate { key } => self.complete_edge_create(graph, key, result),
            InFlight::EdgeDelete { record } => self.complete_edge_delete(graph, record, result),
        }
    }

    fn complete_create(
        &mut self,
        graph: &mut CanvasGraph,
        temp_id: NodeId,
        result: Result<RemoteResponse, RemoteError>,
    ) -> Vec<BridgeEvent> {
        self.creating.remove(&temp_id);
        let created = match result {
            Ok(RemoteResponse::NodeCreated(data)) => Ok(data),
            Ok(other) => Err(unexpected(&other)),
            Err(error) => Err(error),
        };
        match created {
            Ok(data) => {
                let real_id = data.id;
                match graph.rename_node(&temp_id, real_id.clone()) {
                    Ok(()) => {}
                    Err(GraphError::DuplicateNode(_)) => {
                        let error =
                            RemoteError::Ambiguous(format!("remote id {real_id} is already in use"));
                        return self.discard_created(graph, temp_id, error);
                    }
                    // Deleted locally while the create was in flight
                    Err(error) => log::debug!("created node {temp_id} not renamed locally: {error}"),
                }
                if let Some(pending) = self.pending_positions.remove(&temp_id) {
                    self.pending_positions.insert(real_id.clone(), pending);
                }
                let moved: Vec<EdgeKey> = self
                    .detached_edges
                    .keys()
                    .filter(|k| k.contains(&temp_id))
                    .cloned()
                    .collect();
                for key in moved {
                    if let Some(mut record) = self.detached_edges.remove(&key) {
                        for end in [&mut record.from, &mut record.to] {
                            if *end == temp_id {
                                *end = real_id.clone();
                            }
                        }
                        self.detached_edges.insert(record.key(), record);
                    }
                }
                for deferred in &mut self.deferred {
                    deferred.rename(&temp_id, &real_id);
                }
                self.release_deferred();
                vec![BridgeEvent::Renamed {
                    old: temp_id,
                    new: real_id,
                }]
            }
            Err(error) => self.discard_created(graph, temp_id, error),
        }
    }

    fn discard_created(
        &mut self,
        graph: &mut CanvasGraph,
        temp_id: NodeId,
        error: RemoteError,
    ) -> Vec<BridgeEvent> {
        log::error!("create of node {temp_id} failed, discarding it: {error}");
        let _ = graph.remove_node(&temp_id);
        self.pending_positions.remove(&temp_id);
        self.detached_edges.retain(|key, _| !key.contains(&temp_id));
        let before = self.deferred.len();
        self.deferred.retain(|d| !d.mentions(&temp_id));
        if before != self.deferred.len() {
            log::debug!("dropped {} requests queued behind {temp_id}", before - self.deferred.len());
        }
        vec![
            BridgeEvent::NodeDiscarded(temp_id.clone()),
            BridgeEvent::Notice(Notice::CreateRolledBack { id: temp_id, error }),
        ]
    }

    fn complete_position(
        &mut self,
        graph: &CanvasGraph,
        id: NodeId,
        position: Point,
        attempt: u32,
        result: Result<RemoteResponse, RemoteError>,
    ) {
        self.positions_in_flight.remove(&id);
        let Err(error) = result else {
            return;
        };
        let retry = matches!(error, RemoteError::Network(_))
            && attempt < self.retry_limit
            && !self.pending_positions.contains_key(&id)
            && graph.contains(&id);
        if retry {
            log::debug!("retrying position sync of {id} (attempt {})", attempt + 1);
            let now = self.last_poll.unwrap_or_else(Instant::now);
            self.pending_positions.insert(
                id,
                PendingPosition {
                    due: now + self.debounce,
                    position,
                    attempt: attempt + 1,
                },
            );
        } else {
            log::warn!("position sync of {id} failed: {error}");
        }
    }

    fn complete_delete(
        &mut self,
        graph: &mut CanvasGraph,
        removed: RemovedNode,
        result: Result<RemoteResponse, RemoteError>,
    ) -> Vec<BridgeEvent> {
        let id = removed.node.id.clone();
        let error = match result {
            Err(error) if error.restores_deleted_node() => error,
            other => {
                // Gone for good: its links cannot come back with either end.
                self.detached_edges.retain(|key, _| !key.contains(&id));
                let Err(error) = other else {
                    return Vec::new();
                };
                log::warn!("delete of node {id} returned {error}; treating it as deleted");
                return vec![BridgeEvent::Notice(Notice::DeleteKept { id, error })];
            }
        };

        log::error!("delete of node {id} failed, restoring it: {error}");
        // Links come back from `detached_edges`, which also holds those whose
        // other end was deleted in the same batch.
        let node_only = RemovedNode {
            edges: Vec::new(),
            ..removed
        };
        if let Err(restore_error) = graph.restore_node(node_only) {
            log::error!("could not restore node {id}: {restore_error}");
            self.detached_edges.retain(|key, _| !key.contains(&id));
            return vec![BridgeEvent::Notice(Notice::DeleteKept { id, error })];
        }
        self.reattach_edges(graph, &id);
        vec![
            BridgeEvent::NodeRestored(id.clone()),
            BridgeEvent::Notice(Notice::DeleteRestored { id, error }),
        ]
    }

    /// Put back detached links of `id` whose other end is on the board again.
    fn reattach_edges(&mut self, graph: &mut CanvasGraph, id: &NodeId) {
        let ready: Vec<EdgeKey> = self
            .detached_edges
            .keys()
            .filter(|key| matches!(key.other(id), Some(other) if graph.contains(other)))
            .cloned()
            .collect();
        for key in ready {
            let Some(record) = self.detached_edges.remove(&key) else {
                continue;
            };
            let (from, to) = (record.from.clone(), record.to.clone());
            let unsaved = record.remote_id.is_none();
            if !graph.insert_edge(record) || !unsaved {
                continue;
            }
            // A cancelled create still in flight will assign the id itself.
            if !self.cancelled_edge_creates.remove(&key) && !self.edge_creates_in_flight.contains(&key) {
                self.request_edge_create(from, to);
            }
        }
    }

    fn complete_edge_create(
        &mut self,
        graph: &mut CanvasGraph,
        key: EdgeKey,
        result: Result<RemoteResponse, RemoteError>,
    ) -> Vec<BridgeEvent> {
        self.edge_creates_in_flight.remove(&key);
        let cancelled = self.cancelled_edge_creates.remove(&key);
        let created = match result {
            Ok(RemoteResponse::EdgeCreated(edge)) => Ok(edge),
            Ok(other) => Err(unexpected(&other)),
            Err(error) => Err(error),
        };
        match created {
            Ok(edge) if cancelled => {
                // Toggled off while in flight: remove what the server just made,
                // unless an endpoint's delete already cascades to it.
                if !graph.contains(&edge.from) || !graph.contains(&edge.to) {
                    // Kept so a restored endpoint brings the link back with its id.
                    if let Some(record) = self.detached_edges.get_mut(&key) {
                        record.remote_id = Some(edge.id);
                    }
                    return Vec::new();
                }
                let record = EdgeRecord {
                    from: edge.from,
                    to: edge.to,
                    remote_id: Some(edge.id.clone()),
                };
                self.enqueue(
                    RemoteRequest::DeleteEdge { edge_id: edge.id },
                    InFlight::EdgeDelete { record },
                );
                Vec::new()
            }
            Ok(edge) => {
                if !graph.assign_edge_id(&key, edge.id) {
                    log::debug!("link {key} vanished before its id arrived");
                }
                Vec::new()
            }
            Err(error) if cancelled => {
                log::debug!("create of cancelled link {key} failed: {error}");
                Vec::new()
            }
            Err(error) => {
                log::error!("create of link {key} failed, removing it: {error}");
                let mut events = Vec::new();
                if graph.remove_edge(&key).is_some() {
                    events.push(BridgeEvent::EdgeReverted(key.clone()));
                }
                events.push(BridgeEvent::Notice(Notice::EdgeReverted { key, error }));
                events
            }
        }
    }

    fn complete_edge_delete(
        &mut self,
        graph: &mut CanvasGraph,
        record: EdgeRecord,
        result: Result<RemoteResponse, RemoteError>,
    ) -> Vec<BridgeEvent> {
        let Err(error) = result else {
            return Vec::new();
        };
        let key = record.key();
        log::error!("delete of link {key} failed, restoring it: {error}");
        let mut events = Vec::new();
        if graph.insert_edge(record) {
            events.push(BridgeEvent::EdgeReverted(key.clone()));
        }
        events.push(BridgeEvent::Notice(Notice::EdgeReverted { key, error }));
        events
    }

    /// Send every deferred request that no longer waits on a create.
    fn release_deferred(&mut self) {
        let (ready, waiting): (Vec<Deferred>, Vec<Deferred>) =
            std::mem::take(&mut self.deferred).into_iter().partition(|d| {
                !self.creating.iter().any(|id| d.mentions(id))
            });
        self.deferred = waiting;
        if !ready.is_empty() {
            log::debug!("releasing {} requests held for a create", ready.len());
        }
        for deferred in ready {
            match deferred {
                Deferred::Update { id, patch } => self.send_update(id, patch),
                Deferred::Delete { removed } => self.send_delete(removed),
                Deferred::EdgeCreate { from, to } => self.send_edge_create(from, to),
            }
        }
    }

    fn send_update(&mut self, id: NodeId, patch: NodePatch) {
        self.enqueue(
            RemoteRequest::UpdateNode {
                id: id.clone(),
                patch,
            },
            InFlight::Update { id },
        );
    }

    fn send_position(&mut self, id: NodeId, position: Point, attempt: u32) {
        self.positions_in_flight.insert(id.clone());
        self.enqueue(
            RemoteRequest::UpdateNode {
                id: id.clone(),
                patch: NodePatch::position(position),
            },
            InFlight::Position {
                id,
                position,
                attempt,
            },
        );
    }

    fn send_delete(&mut self, removed: RemovedNode) {
        self.enqueue(
            RemoteRequest::DeleteNode {
                id: removed.node.id.clone(),
            },
            InFlight::Delete { removed },
        );
    }

    /// Send a link create, or hold it while an endpoint is still being created.
    fn request_edge_create(&mut self, from: NodeId, to: NodeId) {
        if self.creating.contains(&from) || self.creating.contains(&to) {
            self.deferred.push(Deferred::EdgeCreate { from, to });
        } else {
            self.send_edge_create(from, to);
        }
    }

    fn send_edge_create(&mut self, from: NodeId, to: NodeId) {
        let key = EdgeKey::new(from.clone(), to.clone());
        self.edge_creates_in_flight.insert(key.clone());
        self.enqueue(RemoteRequest::CreateEdge { from, to }, InFlight::EdgeCreate { key });
    }

    fn enqueue(&mut self, request: RemoteRequest, flight: InFlight) {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket, flight);
        self.outbox.push_back(PendingRequest {
            ticket,
            project_id: self.project_id.clone(),
            request,
        });
    }
}

fn unexpected(response: &RemoteResponse) -> RemoteError {
    RemoteError::Ambiguous(format!("unexpected response {response:?}"))
}

/// Execute one request against a store.
pub fn run_request<S: RemoteStore + ?Sized>(
    store: &mut S,
    pending: &PendingRequest,
) -> Result<RemoteResponse, RemoteError> {
    let project = pending.project_id.as_str();
    match &pending.request {
        RemoteRequest::CreateNode { node } => {
            store.create_node(project, node).map(RemoteResponse::NodeCreated)
        }
        RemoteRequest::UpdateNode { id, patch } => {
            store.update_node(id, patch).map(|_| RemoteResponse::Done)
        }
        RemoteRequest::DeleteNode { id } => {
            store.delete_node(project, id).map(|_| RemoteResponse::Done)
        }
        RemoteRequest::CreateEdge { from, to } => {
            store.create_edge(project, from, to).map(RemoteResponse::EdgeCreated)
        }
        RemoteRequest::DeleteEdge { edge_id } => {
            store.delete_edge(project, edge_id).map(|_| RemoteResponse::Done)
        }
    }
}
