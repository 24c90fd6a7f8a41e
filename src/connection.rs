//! Link mode: pick a source node, then click a target to toggle the link.
//!
//! ```text
//! Idle --begin(N)--> PendingSource(N)
//! PendingSource(N) --click M (M != N)--> Idle   emits Toggle(N, M)
//! PendingSource(N) --click empty / begin(N) / click N--> Idle   cancelled
//! PendingSource(N) --begin(M)--> PendingSource(M)
//! ```
//!
//! The controller only decides *what* to toggle. Applying the toggle to the
//! graph and persisting it is the caller's job.

use crate::graph::NodeId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkMode {
    #[default]
    Idle,
    PendingSource(NodeId),
}

/// Result of feeding an event to the [`ConnectionController`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Link mode entered with this source.
    Armed(NodeId),
    /// Toggle the link between the two nodes.
    Toggle { from: NodeId, to: NodeId },
    /// Link mode left without changing anything.
    Cancelled,
    /// Not in link mode; the event is not ours.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectionController {
    mode: LinkMode,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &LinkMode {
        &self.mode
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, LinkMode::PendingSource(_))
    }

    pub fn pending_source(&self) -> Option<&NodeId> {
        match &self.mode {
            LinkMode::PendingSource(id) => Some(id),
            LinkMode::Idle => None,
        }
    }

    /// The link control on `node` was pressed.
    ///
    /// Pressing it again on the pending source cancels; pressing it on a
    /// different node re-arms with that node as source.
    pub fn begin(&mut self, node: NodeId) -> ConnectionEvent {
        if self.pending_source() == Some(&node) {
            self.mode = LinkMode::Idle;
            return ConnectionEvent::Cancelled;
        }
        self.mode = LinkMode::PendingSource(node.clone());
        ConnectionEvent::Armed(node)
    }

    /// A node body was clicked.
    pub fn click_node(&mut self, target: &NodeId) -> ConnectionEvent {
        match std::mem::take(&mut self.mode) {
            LinkMode::Idle => ConnectionEvent::Ignored,
            LinkMode::PendingSource(source) if &source == target => ConnectionEvent::Cancelled,
            LinkMode::PendingSource(source) => ConnectionEvent::Toggle {
                from: source,
                to: target.clone(),
            },
        }
    }

    /// Empty canvas was clicked (or Escape pressed).
    pub fn cancel(&mut self) -> ConnectionEvent {
        match std::mem::take(&mut self.mode) {
            LinkMode::Idle => ConnectionEvent::Ignored,
            LinkMode::PendingSource(_) => ConnectionEvent::Cancelled,
        }
    }

    /// The pending source was deleted or renamed.
    pub fn forget(&mut self, id: &NodeId) {
        if self.pending_source() == Some(id) {
            self.mode = LinkMode::Idle;
        }
    }

    pub fn rename(&mut self, old: &NodeId, new: &NodeId) {
        if let LinkMode::PendingSource(source) = &mut self.mode {
            if source == old {
                *source = new.clone();
            }
        }
    }
}
