//! Canvas-space hit testing.
//!
//! All inputs here are canvas coordinates. Callers convert pointer positions
//! with the viewport first; nothing in this module ever sees screen pixels.

use crate::geometry::{Point, Rect, Size};
use crate::graph::{Node, NodeId};

/// Trait for anything with an id and a canvas-space bounding box.
pub trait NodeGeometry {
    fn id(&self) -> &NodeId;
    fn bounds(&self) -> Rect;
}

/// A node paired with the fixed box size used for hit testing.
///
/// Content length never changes the box; every node uses the same size.
#[derive(Debug, Clone, Copy)]
pub struct NodeBox<'a> {
    pub node: &'a Node,
    pub size: Size,
}

impl<'a> NodeBox<'a> {
    pub fn new(node: &'a Node, size: Size) -> Self {
        Self { node, size }
    }
}

impl NodeGeometry for NodeBox<'_> {
    fn id(&self) -> &NodeId {
        self.node.id()
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.node.position, self.size)
    }
}

/// Box every node in `nodes` with `size`.
pub fn boxed<'a, I>(nodes: I, size: Size) -> impl DoubleEndedIterator<Item = NodeBox<'a>>
where
    I: IntoIterator<Item = &'a Node>,
    I::IntoIter: DoubleEndedIterator,
{
    nodes.into_iter().map(move |node| NodeBox::new(node, size))
}

/// Topmost node containing `point`.
///
/// `nodes` is in render order, so the last hit wins.
pub fn find_node_at<N, I>(point: Point, nodes: I) -> Option<NodeId>
where
    N: NodeGeometry,
    I: IntoIterator<Item = N>,
    I::IntoIter: DoubleEndedIterator,
{
    nodes
        .into_iter()
        .rev()
        .find(|n| n.bounds().contains(point))
        .map(|n| n.id().clone())
}

/// All nodes whose box overlaps the selection rectangle.
pub fn nodes_in_selection_box<N, I>(selection: &Rect, nodes: I) -> Vec<NodeId>
where
    N: NodeGeometry,
    I: IntoIterator<Item = N>,
{
    nodes
        .into_iter()
        .filter(|n| n.bounds().intersects(selection))
        .map(|n| n.id().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CanvasGraph, NodeData, NodeFields};

    const SIZE: Size = Size::new(240.0, 120.0);

    fn graph(positions: &[(&str, f32, f32)]) -> CanvasGraph {
        let mut g = CanvasGraph::new();
        for (id, x, y) in positions {
            g.insert_node(NodeData::new(*id, Point::new(*x, *y), NodeFields::default()))
                .unwrap();
        }
        g
    }

    #[test]
    fn test_selection_box_overlap() {
        let g = graph(&[("a", 0.0, 0.0), ("b", 300.0, 300.0)]);
        let rect = Rect::from_corners(Point::new(0.0, 0.0), Point::new(250.0, 150.0));
        let hits = nodes_in_selection_box(&rect, boxed(g.nodes(), SIZE));
        assert_eq!(hits, vec![NodeId::from("a")]);
    }

    #[test]
    fn test_selection_box_partial_overlap_counts() {
        let g = graph(&[("a", 100.0, 100.0)]);
        // Only clips the bottom-right corner of the box
        let rect = Rect::new(330.0, 210.0, 50.0, 50.0);
        assert_eq!(nodes_in_selection_box(&rect, boxed(g.nodes(), SIZE)).len(), 1);
    }

    #[test]
    fn test_selection_box_empty_rect_selects_nothing_outside() {
        let g = graph(&[("a", 0.0, 0.0)]);
        let rect = Rect::new(500.0, 500.0, 0.0, 0.0);
        assert!(nodes_in_selection_box(&rect, boxed(g.nodes(), SIZE)).is_empty());
    }

    #[test]
    fn test_find_node_at_prefers_topmost() {
        let g = graph(&[("below", 0.0, 0.0), ("above", 100.0, 50.0)]);
        let hit = find_node_at(Point::new(150.0, 80.0), boxed(g.nodes(), SIZE));
        assert_eq!(hit, Some(NodeId::from("above")));
        let hit = find_node_at(Point::new(10.0, 10.0), boxed(g.nodes(), SIZE));
        assert_eq!(hit, Some(NodeId::from("below")));
    }

    #[test]
    fn test_find_node_at_miss() {
        let g = graph(&[("a", 0.0, 0.0)]);
        assert_eq!(find_node_at(Point::new(241.0, 0.0), boxed(g.nodes(), SIZE)), None);
    }
}
