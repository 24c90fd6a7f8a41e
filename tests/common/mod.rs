//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_plan_canvas::{
    EdgeData, EdgeId, NodeData, NodeId, NodePatch, Notice, RemoteError, RemoteStore,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Initialize the testing backend for this thread.
/// With init_no_event_loop(), each test thread can have its own backend instance.
pub fn init_testing_backend() {
    use std::cell::Cell;
    thread_local! {
        static INITIALIZED: Cell<bool> = const { Cell::new(false) };
    }

    INITIALIZED.with(|init| {
        if !init.get() {
            i_slint_backend_testing::init_no_event_loop();
            init.set(true);
        }
    });
}

/// Tracks host callback invocations for testing.
///
/// Each field records calls to the corresponding callback with their arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    pub node_activated: Rc<RefCell<Vec<NodeId>>>,
    pub node_activated_secondary: Rc<RefCell<Vec<NodeId>>>,
    /// Selection after each change
    pub selection_changed: Rc<RefCell<Vec<Vec<NodeId>>>>,
    /// Node count after each change
    pub model_changed: Rc<RefCell<Vec<usize>>>,
    pub notices: Rc<RefCell<Vec<Notice>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.node_activated.borrow_mut().clear();
        self.node_activated_secondary.borrow_mut().clear();
        self.selection_changed.borrow_mut().clear();
        self.model_changed.borrow_mut().clear();
        self.notices.borrow_mut().clear();
    }

    pub fn last_selection(&self) -> Option<Vec<NodeId>> {
        self.selection_changed.borrow().last().cloned()
    }
}

/// Which store method a scripted failure applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    CreateNode,
    UpdateNode,
    DeleteNode,
    CreateEdge,
    DeleteEdge,
}

/// One recorded store call.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    CreateNode(NodeData),
    UpdateNode(NodeId, NodePatch),
    DeleteNode(NodeId),
    CreateEdge(NodeId, NodeId),
    DeleteEdge(EdgeId),
}

/// In-memory [`RemoteStore`] with scripted failures.
#[derive(Default)]
pub struct MockStore {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeData>,
    pub calls: Vec<StoreCall>,
    failures: VecDeque<(CallKind, RemoteError)>,
    next_id: u32,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Fail the next call of `kind` with `error`.
    pub fn fail_next(&mut self, kind: CallKind, error: RemoteError) {
        self.failures.push_back((kind, error));
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<StoreCall> {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    (kind, c),
                    (CallKind::CreateNode, StoreCall::CreateNode(_))
                        | (CallKind::UpdateNode, StoreCall::UpdateNode(..))
                        | (CallKind::DeleteNode, StoreCall::DeleteNode(_))
                        | (CallKind::CreateEdge, StoreCall::CreateEdge(..))
                        | (CallKind::DeleteEdge, StoreCall::DeleteEdge(_))
                )
            })
            .cloned()
            .collect()
    }

    fn scripted(&mut self, kind: CallKind) -> Result<(), RemoteError> {
        match self.failures.iter().position(|(k, _)| *k == kind) {
            Some(i) => Err(self.failures.remove(i).map(|(_, e)| e).unwrap()),
            None => Ok(()),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

impl RemoteStore for MockStore {
    fn create_node(&mut self, _project_id: &str, node: &NodeData) -> Result<NodeData, RemoteError> {
        self.calls.push(StoreCall::CreateNode(node.clone()));
        self.scripted(CallKind::CreateNode)?;
        let mut created = node.clone();
        created.id = NodeId::new(self.next_id("n"));
        self.nodes.push(created.clone());
        Ok(created)
    }

    fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> Result<(), RemoteError> {
        self.calls.push(StoreCall::UpdateNode(id.clone(), patch.clone()));
        self.scripted(CallKind::UpdateNode)?;
        if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
            if let Some(position) = patch.position {
                node.position = position;
            }
            patch.apply_to(&mut node.fields);
        }
        Ok(())
    }

    fn delete_node(&mut self, _project_id: &str, id: &NodeId) -> Result<(), RemoteError> {
        self.calls.push(StoreCall::DeleteNode(id.clone()));
        self.scripted(CallKind::DeleteNode)?;
        self.nodes.retain(|n| &n.id != id);
        self.edges.retain(|e| &e.from != id && &e.to != id);
        Ok(())
    }

    fn create_edge(
        &mut self,
        _project_id: &str,
        from: &NodeId,
        to: &NodeId,
    ) -> Result<EdgeData, RemoteError> {
        self.calls.push(StoreCall::CreateEdge(from.clone(), to.clone()));
        self.scripted(CallKind::CreateEdge)?;
        let edge = EdgeData {
            id: EdgeId(self.next_id("e")),
            from: from.clone(),
            to: to.clone(),
        };
        self.edges.push(edge.clone());
        Ok(edge)
    }

    fn delete_edge(&mut self, _project_id: &str, edge_id: &EdgeId) -> Result<(), RemoteError> {
        self.calls.push(StoreCall::DeleteEdge(edge_id.clone()));
        self.scripted(CallKind::DeleteEdge)?;
        self.edges.retain(|e| &e.id != edge_id);
        Ok(())
    }

    fn list_nodes(&mut self, _project_id: &str) -> Result<Vec<NodeData>, RemoteError> {
        Ok(self.nodes.clone())
    }

    fn list_edges(&mut self, _project_id: &str) -> Result<Vec<EdgeData>, RemoteError> {
        Ok(self.edges.clone())
    }
}
