//! # Slint Plan Canvas
//!
//! Interactive node-graph canvas engine for a content-planning board, built
//! to sit behind a Slint UI.
//!
//! Users place planning nodes on a zoomable, pannable canvas, drag them
//! alone or as a selected group, rubber-band select, and link them. Every
//! change is applied locally first and persisted to a remote store in the
//! background, with per-kind rollback rules when the store fails.
//!
//! ## Features
//!
//! - **Viewport** - screen ↔ canvas mapping with clamped zoom and panning
//! - **Drag** - click/drag disambiguation, group drags, one update per frame
//! - **Selection** - click, modifier-toggle and live rubber-band selection
//! - **Links** - link mode with orientation-insensitive toggling
//! - **Persistence** - optimistic mutations, debounced position syncs,
//!   temporary-id swaps and rollback through a [`RemoteStore`]
//!
//! ## Core Types
//!
//! - [`CanvasController`] - composition root; routes input and owns the model
//! - [`CanvasDriver`] - slint timer that applies drag frames and pumps persistence
//! - [`PersistenceBridge`] - sans-IO request outbox with reconciliation
//! - [`CanvasGraph`] - local nodes plus the canonical edge table
//! - [`RenderFrame`] - screen-space nodes, edge curves and the rubber band

pub mod config;
pub mod connection;
pub mod controller;
pub mod drag;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod hit_test;
pub mod path;
pub mod persistence;
pub mod render;
pub mod selection;
pub mod viewport;

pub use config::CanvasConfig;
pub use connection::{ConnectionController, ConnectionEvent, LinkMode};
pub use controller::CanvasController;
pub use drag::{DragController, DragOutcome, DragProgress, DragSession};
pub use driver::{CanvasDriver, FRAME_INTERVAL};
pub use error::{ConfigError, GraphError, RemoteError, RemoteErrorKind};
pub use geometry::{Point, Rect, Size};
pub use graph::{
    CanvasGraph, EdgeData, EdgeId, EdgeKey, EdgeRecord, EdgeToggle, Node, NodeData, NodeFields,
    NodeId, NodePatch, NodeStatus, RemovedNode,
};
pub use hit_test::{boxed, find_node_at, nodes_in_selection_box, NodeBox, NodeGeometry};
pub use path::{edge_anchors, edge_path, EdgeCurve};
pub use persistence::{
    run_request, BridgeEvent, Notice, PendingRequest, PersistenceBridge, RemoteRequest,
    RemoteResponse, RemoteStore, Ticket,
};
pub use render::{EdgeView, NodeView, RenderFrame, RenderModels};
pub use selection::{SelectionModel, SelectionRectangle};
pub use viewport::{ViewportSnapshot, ViewportTransform};
