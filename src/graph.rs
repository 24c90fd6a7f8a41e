//! Local node/edge model.
//!
//! Edge records keyed by an unordered [`EdgeKey`] are the canonical truth
//! about connections. Each [`Node`] also carries a `connections` set, but
//! that set is a cache maintained by [`CanvasGraph`] whenever the edge table
//! changes; there is no public way to write it directly. This keeps the
//! symmetry invariant (`b ∈ a.connections ⇔ a ∈ b.connections`) true by
//! construction.

use crate::error::GraphError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

const TEMP_PREFIX: &str = "tmp-";

/// Opaque node identifier.
///
/// Remote ids are whatever the store hands out. Ids created locally before
/// the store has answered are temporary and carry a `tmp-` prefix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh temporary id for an optimistic create.
    pub fn temporary() -> Self {
        Self(format!("{TEMP_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Remote identifier of an edge record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Idea,
    Draft,
    Scheduled,
    Published,
}

/// Editable content of a planning node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeFields {
    pub title: String,
    pub content: String,
    pub status: NodeStatus,
    /// ISO-8601 date/time the content is scheduled for.
    pub scheduled_at: Option<String>,
    pub image_url: Option<String>,
}

impl NodeFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a node. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<NodeStatus>,
    pub scheduled_at: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl NodePatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Whether the patch only carries a position.
    pub fn is_position_only(&self) -> bool {
        self.position.is_some()
            && NodePatch {
                position: None,
                ..self.clone()
            }
            .is_empty()
    }

    pub fn is_empty(&self) -> bool {
        *self == NodePatch::default()
    }

    pub fn apply_to(&self, fields: &mut NodeFields) {
        if let Some(title) = &self.title {
            fields.title = title.clone();
        }
        if let Some(content) = &self.content {
            fields.content = content.clone();
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(scheduled_at) = &self.scheduled_at {
            fields.scheduled_at = scheduled_at.clone();
        }
        if let Some(image_url) = &self.image_url {
            fields.image_url = image_url.clone();
        }
    }
}

/// Node as exchanged with the remote store: no adjacency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    pub position: Point,
    #[serde(flatten)]
    pub fields: NodeFields,
}

impl NodeData {
    pub fn new(id: impl Into<NodeId>, position: Point, fields: NodeFields) -> Self {
        Self {
            id: id.into(),
            position,
            fields,
        }
    }
}

/// Edge as exchanged with the remote store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

/// A node in the local model.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    pub position: Point,
    pub fields: NodeFields,
    connections: BTreeSet<NodeId>,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Derived adjacency: every node this one is linked to.
    pub fn connections(&self) -> &BTreeSet<NodeId> {
        &self.connections
    }

    pub fn to_data(&self) -> NodeData {
        NodeData {
            id: self.id.clone(),
            position: self.position,
            fields: self.fields.clone(),
        }
    }
}

impl From<NodeData> for Node {
    fn from(data: NodeData) -> Self {
        Self {
            id: data.id,
            position: data.position,
            fields: data.fields,
            connections: BTreeSet::new(),
        }
    }
}

/// Orientation-insensitive identity of a link between two nodes.
///
/// `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        &self.low == id || &self.high == id
    }

    /// The endpoint that is not `id`.
    pub fn other(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.low == id {
            Some(&self.high)
        } else if &self.high == id {
            Some(&self.low)
        } else {
            None
        }
    }

    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.low, &self.high)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.low, self.high)
    }
}

/// One logical link. `from`/`to` keep the orientation it was created with,
/// which is what the remote store saw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub remote_id: Option<EdgeId>,
}

impl EdgeRecord {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from.clone(), self.to.clone())
    }
}

/// Outcome of [`CanvasGraph::toggle_edge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeToggle {
    /// No link existed; one was created.
    Connected(EdgeKey),
    /// A link existed in either orientation and was removed.
    Disconnected(EdgeRecord),
}

/// Everything needed to put a deleted node back.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedNode {
    pub node: NodeData,
    /// Index in render order before removal.
    pub index: usize,
    pub edges: Vec<EdgeRecord>,
}

/// The local view model: nodes in render order plus the edge identity table.
#[derive(Clone, Debug, Default)]
pub struct CanvasGraph {
    nodes: Vec<Node>,
    /// Slot of each node in `nodes`.
    index: HashMap<NodeId, usize>,
    edges: BTreeMap<EdgeKey, EdgeRecord>,
}

impl CanvasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole model with a remote listing.
    ///
    /// Edges whose endpoints are missing or identical are skipped, and
    /// duplicate orientations collapse onto one record.
    pub fn load(&mut self, nodes: Vec<NodeData>, edges: Vec<EdgeData>) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        for data in nodes {
            if self.contains(&data.id) {
                log::warn!("duplicate node {} in listing, keeping first", data.id);
                continue;
            }
            self.push_node(data);
        }
        for edge in edges {
            if edge.from == edge.to || !self.contains(&edge.from) || !self.contains(&edge.to) {
                log::warn!("skipping dangling edge {} ({} -> {})", edge.id, edge.from, edge.to);
                continue;
            }
            let record = EdgeRecord {
                from: edge.from,
                to: edge.to,
                remote_id: Some(edge.id),
            };
            self.insert_edge(record);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Nodes in render order (last is topmost).
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, GraphError> {
        match self.index_of(id) {
            Some(i) => Ok(&mut self.nodes[i]),
            None => Err(GraphError::NodeNotFound(id.clone())),
        }
    }

    fn push_node(&mut self, data: NodeData) {
        self.index.insert(data.id.clone(), self.nodes.len());
        self.nodes.push(Node::from(data));
    }

    /// Refresh index slots from `start` on, after an insert or removal shifted them.
    fn reindex_from(&mut self, start: usize) {
        for (i, node) in self.nodes.iter().enumerate().skip(start) {
            self.index.insert(node.id.clone(), i);
        }
    }

    pub fn insert_node(&mut self, data: NodeData) -> Result<(), GraphError> {
        if self.contains(&data.id) {
            return Err(GraphError::DuplicateNode(data.id));
        }
        self.push_node(data);
        Ok(())
    }

    pub fn set_position(&mut self, id: &NodeId, position: Point) -> Result<(), GraphError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Apply a partial update, position included.
    pub fn apply_patch(&mut self, id: &NodeId, patch: &NodePatch) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        if let Some(position) = patch.position {
            node.position = position;
        }
        patch.apply_to(&mut node.fields);
        Ok(())
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<RemovedNode, GraphError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let keys: Vec<EdgeKey> = self.nodes[index]
            .connections
            .iter()
            .map(|other| EdgeKey::new(id.clone(), other.clone()))
            .collect();
        let edges = keys
            .iter()
            .filter_map(|k| self.remove_edge(k))
            .collect();
        let node = self.nodes.remove(index);
        self.index.remove(id);
        self.reindex_from(index);
        Ok(RemovedNode {
            node: node.to_data(),
            index,
            edges,
        })
    }

    /// Put a removed node back at its old render position, with those of its
    /// edges whose other endpoint still exists.
    pub fn restore_node(&mut self, removed: RemovedNode) -> Result<(), GraphError> {
        if self.contains(&removed.node.id) {
            return Err(GraphError::DuplicateNode(removed.node.id));
        }
        let index = removed.index.min(self.nodes.len());
        self.nodes.insert(index, Node::from(removed.node));
        self.reindex_from(index);
        for edge in removed.edges {
            if self.contains(&edge.from) && self.contains(&edge.to) {
                self.insert_edge(edge);
            }
        }
        Ok(())
    }

    /// Swap a node's id everywhere it appears, edges and adjacency included.
    pub fn rename_node(&mut self, old: &NodeId, new: NodeId) -> Result<(), GraphError> {
        if old == &new {
            return Ok(());
        }
        if self.contains(&new) {
            return Err(GraphError::DuplicateNode(new));
        }
        let slot = self
            .index
            .remove(old)
            .ok_or_else(|| GraphError::NodeNotFound(old.clone()))?;
        self.index.insert(new.clone(), slot);
        self.nodes[slot].id = new.clone();

        let neighbors: Vec<NodeId> = self.nodes[slot].connections.iter().cloned().collect();
        for other in &neighbors {
            let key = EdgeKey::new(old.clone(), other.clone());
            if let Some(mut record) = self.edges.remove(&key) {
                if &record.from == old {
                    record.from = new.clone();
                }
                if &record.to == old {
                    record.to = new.clone();
                }
                self.edges.insert(record.key(), record);
            }
        }
        for other in &neighbors {
            if let Ok(node) = self.node_mut(other) {
                node.connections.remove(old);
                node.connections.insert(new.clone());
            }
        }
        Ok(())
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&EdgeRecord> {
        self.edges.get(key)
    }

    pub fn has_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.edges.contains_key(&EdgeKey::new(a.clone(), b.clone()))
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn find_edge_by_remote_id(&self, id: &EdgeId) -> Option<&EdgeRecord> {
        self.edges.values().find(|e| e.remote_id.as_ref() == Some(id))
    }

    /// Toggle the link between `a` and `b`, whichever orientation it was
    /// created in.
    pub fn toggle_edge(&mut self, a: &NodeId, b: &NodeId) -> Result<EdgeToggle, GraphError> {
        if a == b {
            return Err(GraphError::SelfLink(a.clone()));
        }
        for id in [a, b] {
            if !self.contains(id) {
                return Err(GraphError::NodeNotFound(id.clone()));
            }
        }
        let key = EdgeKey::new(a.clone(), b.clone());
        if let Some(record) = self.remove_edge(&key) {
            return Ok(EdgeToggle::Disconnected(record));
        }
        self.insert_edge(EdgeRecord {
            from: a.clone(),
            to: b.clone(),
            remote_id: None,
        });
        Ok(EdgeToggle::Connected(key))
    }

    /// Insert a record and its adjacency entries. Returns `false` if a link
    /// with the same identity already exists or an endpoint is missing.
    pub fn insert_edge(&mut self, record: EdgeRecord) -> bool {
        let key = record.key();
        if self.edges.contains_key(&key)
            || record.from == record.to
            || !self.contains(&record.from)
            || !self.contains(&record.to)
        {
            return false;
        }
        let (from, to) = (record.from.clone(), record.to.clone());
        self.edges.insert(key, record);
        for (id, other) in [(&from, &to), (&to, &from)] {
            if let Ok(node) = self.node_mut(id) {
                node.connections.insert(other.clone());
            }
        }
        true
    }

    /// Remove a record and both adjacency entries.
    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<EdgeRecord> {
        let record = self.edges.remove(key)?;
        let (a, b) = key.endpoints();
        let (a, b) = (a.clone(), b.clone());
        for (id, other) in [(&a, &b), (&b, &a)] {
            if let Ok(node) = self.node_mut(id) {
                node.connections.remove(other);
            }
        }
        Some(record)
    }

    /// Record the id the remote store gave a link.
    pub fn assign_edge_id(&mut self, key: &EdgeKey, id: EdgeId) -> bool {
        match self.edges.get_mut(key) {
            Some(record) => {
                record.remote_id = Some(id);
                true
            }
            None => false,
        }
    }

    /// Snapshot of every node, for host-side display or persistence.
    pub fn snapshot(&self) -> Vec<NodeData> {
        self.nodes.iter().map(Node::to_data).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn graph_with(ids: &[&str]) -> CanvasGraph {
        let mut g = CanvasGraph::new();
        for (i, n) in ids.iter().enumerate() {
            g.insert_node(NodeData::new(*n, Point::new(i as f32 * 300.0, 0.0), NodeFields::titled(*n)))
                .unwrap();
        }
        g
    }

    #[test]
    fn test_edge_key_is_orientation_insensitive() {
        assert_eq!(EdgeKey::new(id("a"), id("b")), EdgeKey::new(id("b"), id("a")));
        let key = EdgeKey::new(id("b"), id("a"));
        assert_eq!(key.other(&id("a")), Some(&id("b")));
        assert_eq!(key.other(&id("z")), None);
    }

    #[test]
    fn test_temporary_ids() {
        let tmp = NodeId::temporary();
        assert!(tmp.is_temporary());
        assert!(!id("n-1").is_temporary());
        assert_ne!(tmp, NodeId::temporary());
    }

    #[test]
    fn test_toggle_creates_symmetric_adjacency() {
        let mut g = graph_with(&["a", "b"]);
        let out = g.toggle_edge(&id("a"), &id("b")).unwrap();
        assert_eq!(out, EdgeToggle::Connected(EdgeKey::new(id("a"), id("b"))));
        assert_eq!(g.edge_count(), 1);
        assert!(g.node(&id("a")).unwrap().connections().contains(&id("b")));
        assert!(g.node(&id("b")).unwrap().connections().contains(&id("a")));
    }

    #[test]
    fn test_toggle_reverse_orientation_removes() {
        let mut g = graph_with(&["a", "b"]);
        g.toggle_edge(&id("a"), &id("b")).unwrap();
        let out = g.toggle_edge(&id("b"), &id("a")).unwrap();
        assert!(matches!(out, EdgeToggle::Disconnected(ref r) if r.from == id("a")));
        assert_eq!(g.edge_count(), 0);
        assert!(g.node(&id("a")).unwrap().connections().is_empty());
        assert!(g.node(&id("b")).unwrap().connections().is_empty());
    }

    #[test]
    fn test_toggle_rejects_self_and_unknown() {
        let mut g = graph_with(&["a"]);
        assert_eq!(g.toggle_edge(&id("a"), &id("a")), Err(GraphError::SelfLink(id("a"))));
        assert_eq!(
            g.toggle_edge(&id("a"), &id("x")),
            Err(GraphError::NodeNotFound(id("x")))
        );
    }

    #[test]
    fn test_load_dedupes_both_orientations() {
        let mut g = CanvasGraph::new();
        g.load(
            vec![
                NodeData::new("a", Point::ZERO, NodeFields::default()),
                NodeData::new("b", Point::ZERO, NodeFields::default()),
            ],
            vec![
                EdgeData { id: "e1".into(), from: id("a"), to: id("b") },
                EdgeData { id: "e2".into(), from: id("b"), to: id("a") },
                EdgeData { id: "e3".into(), from: id("a"), to: id("ghost") },
            ],
        );
        assert_eq!(g.edge_count(), 1);
        let record = g.edge(&EdgeKey::new(id("b"), id("a"))).unwrap();
        assert_eq!(record.remote_id, Some(EdgeId::from("e1")));
        assert!(g.find_edge_by_remote_id(&"e1".into()).is_some());
        assert!(g.find_edge_by_remote_id(&"e2".into()).is_none());
    }

    #[test]
    fn test_remove_node_scrubs_connections() {
        let mut g = graph_with(&["a", "b", "c"]);
        g.toggle_edge(&id("a"), &id("b")).unwrap();
        g.toggle_edge(&id("c"), &id("b")).unwrap();

        let removed = g.remove_node(&id("b")).unwrap();
        assert_eq!(removed.index, 1);
        assert_eq!(removed.edges.len(), 2);
        assert_eq!(g.edge_count(), 0);
        assert!(g.node(&id("a")).unwrap().connections().is_empty());
        assert!(g.node(&id("c")).unwrap().connections().is_empty());
    }

    #[test]
    fn test_restore_node_brings_back_edges() {
        let mut g = graph_with(&["a", "b", "c"]);
        g.toggle_edge(&id("a"), &id("b")).unwrap();
        g.assign_edge_id(&EdgeKey::new(id("a"), id("b")), "e1".into());

        let removed = g.remove_node(&id("b")).unwrap();
        g.restore_node(removed).unwrap();

        let order: Vec<&str> = g.nodes().map(|n| n.id().as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(g.node(&id("a")).unwrap().connections().contains(&id("b")));
        assert_eq!(
            g.edge(&EdgeKey::new(id("a"), id("b"))).unwrap().remote_id,
            Some(EdgeId::from("e1"))
        );
    }

    #[test]
    fn test_restore_skips_edges_to_vanished_nodes() {
        let mut g = graph_with(&["a", "b"]);
        g.toggle_edge(&id("a"), &id("b")).unwrap();
        let removed_b = g.remove_node(&id("b")).unwrap();
        g.remove_node(&id("a")).unwrap();
        g.restore_node(removed_b).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(g.node(&id("b")).unwrap().connections().is_empty());
    }

    #[test]
    fn test_lookups_follow_shifted_slots() {
        let mut g = graph_with(&["a", "b", "c", "d"]);
        let removed = g.remove_node(&id("b")).unwrap();
        assert_eq!(g.position(&id("c")), Some(Point::new(600.0, 0.0)));
        assert_eq!(g.position(&id("d")), Some(Point::new(900.0, 0.0)));
        assert!(g.node(&id("b")).is_none());

        g.set_position(&id("d"), Point::new(1.0, 1.0)).unwrap();
        g.restore_node(removed).unwrap();
        g.rename_node(&id("c"), id("c2")).unwrap();

        let positions: Vec<(&str, Point)> = g.nodes().map(|n| (n.id().as_str(), n.position)).collect();
        assert_eq!(
            positions,
            vec![
                ("a", Point::new(0.0, 0.0)),
                ("b", Point::new(300.0, 0.0)),
                ("c2", Point::new(600.0, 0.0)),
                ("d", Point::new(1.0, 1.0)),
            ]
        );
        for n in ["a", "b", "c2", "d"] {
            assert_eq!(g.node(&id(n)).unwrap().id(), &id(n));
        }
        assert!(!g.contains(&id("c")));
    }

    #[test]
    fn test_rename_rewrites_edges_and_adjacency() {
        let mut g = graph_with(&["tmp-1", "b"]);
        g.toggle_edge(&id("tmp-1"), &id("b")).unwrap();
        g.rename_node(&id("tmp-1"), id("n-9")).unwrap();

        assert!(g.contains(&id("n-9")));
        assert!(!g.contains(&id("tmp-1")));
        assert!(g.has_edge(&id("b"), &id("n-9")));
        assert!(g.node(&id("b")).unwrap().connections().contains(&id("n-9")));
        let record = g.edge(&EdgeKey::new(id("n-9"), id("b"))).unwrap();
        assert_eq!(record.from, id("n-9"));
    }

    #[test]
    fn test_rename_to_existing_id_fails() {
        let mut g = graph_with(&["a", "b"]);
        assert_eq!(g.rename_node(&id("a"), id("b")), Err(GraphError::DuplicateNode(id("b"))));
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut g = graph_with(&["a"]);
        let patch = NodePatch {
            status: Some(NodeStatus::Scheduled),
            scheduled_at: Some(Some("2026-11-02T09:00:00Z".into())),
            ..NodePatch::default()
        };
        g.apply_patch(&id("a"), &patch).unwrap();
        let fields = &g.node(&id("a")).unwrap().fields;
        assert_eq!(fields.title, "a");
        assert_eq!(fields.status, NodeStatus::Scheduled);
        assert_eq!(fields.scheduled_at.as_deref(), Some("2026-11-02T09:00:00Z"));
        assert_eq!(g.position(&id("a")), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_position_patch() {
        let mut g = graph_with(&["a"]);
        let patch = NodePatch::position(Point::new(5.0, 6.0));
        assert!(patch.is_position_only());
        assert!(!NodePatch::default().is_position_only());
        g.apply_patch(&id("a"), &patch).unwrap();
        assert_eq!(g.position(&id("a")), Some(Point::new(5.0, 6.0)));
        assert_eq!(g.node(&id("a")).unwrap().fields.title, "a");
    }

    #[test]
    fn test_node_data_json_shape() {
        let data = NodeData::new("n1", Point::new(1.0, 2.0), NodeFields::titled("Launch"));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["id"], "n1");
        assert_eq!(json["title"], "Launch");
        assert_eq!(json["status"], "idea");
        assert_eq!(json["position"]["x"], 1.0);
    }
}
