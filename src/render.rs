//! Model → screen.
//!
//! [`RenderFrame::build`] maps the local model through the live viewport into
//! screen-space rows. [`RenderModels`] pushes those rows into `VecModel`s a
//! `.slint` UI can bind, touching only rows that actually changed.

use crate::connection::ConnectionController;
use crate::geometry::{Rect, Size};
use crate::graph::{CanvasGraph, NodeStatus};
use crate::path::edge_path;
use crate::selection::{SelectionModel, SelectionRectangle};
use crate::viewport::ViewportTransform;
use slint::{Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;

/// One node, in screen space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeView {
    pub id: SharedString,
    pub title: SharedString,
    pub status: NodeStatus,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub selected: bool,
    /// This node is the pending source of link mode.
    pub link_source: bool,
}

impl NodeView {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// One edge, as an SVG path in screen space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeView {
    pub from: SharedString,
    pub to: SharedString,
    pub path: SharedString,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFrame {
    /// Render order; last is topmost.
    pub nodes: Vec<NodeView>,
    /// Sorted by edge identity.
    pub edges: Vec<EdgeView>,
    /// Rubber band, in screen space.
    pub selection_rect: Option<Rect>,
}

impl RenderFrame {
    pub fn build(
        graph: &CanvasGraph,
        viewport: &ViewportTransform,
        selection: &SelectionModel,
        connection: &ConnectionController,
        band: Option<&SelectionRectangle>,
        node_size: Size,
        edge_curve_offset: f32,
    ) -> Self {
        let snapshot = viewport.snapshot();
        let pending = connection.pending_source();

        let nodes = graph
            .nodes()
            .map(|node| {
                let rect = snapshot.rect_to_screen(&Rect::from_origin_size(node.position, node_size));
                NodeView {
                    id: node.id().as_str().into(),
                    title: node.fields.title.as_str().into(),
                    status: node.fields.status,
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    selected: selection.contains(node.id()),
                    link_source: pending == Some(node.id()),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .filter_map(|edge| {
                let from = snapshot.rect_to_screen(&Rect::from_origin_size(
                    graph.position(&edge.from)?,
                    node_size,
                ));
                let to = snapshot.rect_to_screen(&Rect::from_origin_size(
                    graph.position(&edge.to)?,
                    node_size,
                ));
                Some(EdgeView {
                    from: edge.from.as_str().into(),
                    to: edge.to.as_str().into(),
                    path: edge_path(&from, &to, snapshot.zoom, edge_curve_offset).into(),
                })
            })
            .collect();

        Self {
            nodes,
            edges,
            selection_rect: band.map(|b| snapshot.rect_to_screen(&b.rect())),
        }
    }
}

/// Bring `model` in line with `rows`, updating in place where possible.
fn sync_rows<T: Clone + PartialEq + 'static>(model: &VecModel<T>, rows: &[T]) {
    for (i, row) in rows.iter().enumerate() {
        if i < model.row_count() {
            if model.row_data(i).as_ref() != Some(row) {
                model.set_row_data(i, row.clone());
            }
        } else {
            model.push(row.clone());
        }
    }
    while model.row_count() > rows.len() {
        model.remove(model.row_count() - 1);
    }
}

/// Slint-side mirror of the last rendered frame.
#[derive(Clone, Default)]
pub struct RenderModels {
    nodes: Rc<VecModel<NodeView>>,
    edges: Rc<VecModel<EdgeView>>,
}

impl RenderModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&self, frame: &RenderFrame) {
        sync_rows(&self.nodes, &frame.nodes);
        sync_rows(&self.edges, &frame.edges);
    }

    pub fn nodes(&self) -> ModelRc<NodeView> {
        ModelRc::from(self.nodes.clone())
    }

    pub fn edges(&self) -> ModelRc<EdgeView> {
        ModelRc::from(self.edges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::graph::{NodeData, NodeFields, NodeId};

    fn sample() -> CanvasGraph {
        let mut g = CanvasGraph::new();
        g.insert_node(NodeData::new("a", Point::new(0.0, 0.0), NodeFields::titled("Teaser"))).unwrap();
        g.insert_node(NodeData::new("b", Point::new(400.0, 0.0), NodeFields::titled("Launch"))).unwrap();
        g.toggle_edge(&NodeId::from("a"), &NodeId::from("b")).unwrap();
        g
    }

    fn build(g: &CanvasGraph, vp: &ViewportTransform, sel: &SelectionModel) -> RenderFrame {
        RenderFrame::build(
            g,
            vp,
            sel,
            &ConnectionController::new(),
            None,
            Size::new(240.0, 120.0),
            50.0,
        )
    }

    #[test]
    fn test_nodes_follow_viewport() {
        let g = sample();
        let mut vp = ViewportTransform::new();
        vp.set_zoom(0.5);
        vp.set_pan(Point::new(10.0, 20.0));
        let frame = build(&g, &vp, &SelectionModel::new());

        assert_eq!(frame.nodes[1].rect(), Rect::new(210.0, 20.0, 120.0, 60.0));
        assert_eq!(frame.nodes[0].title, SharedString::from("Teaser"));
    }

    #[test]
    fn test_edge_path_runs_right_to_left_midpoints() {
        let g = sample();
        let frame = build(&g, &ViewportTransform::new(), &SelectionModel::new());
        assert_eq!(frame.edges.len(), 1);
        assert!(frame.edges[0].path.as_str().starts_with("M 240 60 C"));
        assert!(frame.edges[0].path.as_str().ends_with("400 60"));
    }

    #[test]
    fn test_selected_and_link_source_flags() {
        let g = sample();
        let mut sel = SelectionModel::new();
        sel.toggle(&NodeId::from("b"));
        let mut conn = ConnectionController::new();
        conn.begin(NodeId::from("a"));

        let frame = RenderFrame::build(
            &g,
            &ViewportTransform::new(),
            &sel,
            &conn,
            None,
            Size::new(240.0, 120.0),
            50.0,
        );
        assert!(!frame.nodes[0].selected && frame.nodes[0].link_source);
        assert!(frame.nodes[1].selected && !frame.nodes[1].link_source);
    }

    #[test]
    fn test_selection_rect_in_screen_space() {
        let g = sample();
        let mut vp = ViewportTransform::new();
        vp.set_zoom(1.5);
        let mut band = SelectionRectangle::new(Point::new(100.0, 100.0));
        band.current = Point::new(0.0, 0.0);
        let frame = RenderFrame::build(
            &g,
            &vp,
            &SelectionModel::new(),
            &ConnectionController::new(),
            Some(&band),
            Size::new(240.0, 120.0),
            50.0,
        );
        assert_eq!(frame.selection_rect, Some(Rect::new(0.0, 0.0, 150.0, 150.0)));
    }

    #[test]
    fn test_models_shrink_and_grow() {
        let models = RenderModels::new();
        let mut g = sample();
        let vp = ViewportTransform::new();
        models.sync(&build(&g, &vp, &SelectionModel::new()));
        assert_eq!(models.nodes().row_count(), 2);
        assert_eq!(models.edges().row_count(), 1);

        g.remove_node(&NodeId::from("a")).unwrap();
        models.sync(&build(&g, &vp, &SelectionModel::new()));
        assert_eq!(models.nodes().row_count(), 1);
        assert_eq!(models.edges().row_count(), 0);
        assert_eq!(models.nodes().row_data(0).unwrap().id, SharedString::from("b"));
    }
}
