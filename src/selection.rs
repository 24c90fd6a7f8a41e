//! Node selection and rubber-band selection.
//!
//! Selection lives on one controller; two canvases never share it.

use crate::geometry::{Point, Rect};
use crate::graph::NodeId;
use crate::hit_test::{nodes_in_selection_box, NodeGeometry};
use slint::{Model, SharedString, VecModel};
use std::collections::BTreeSet;

/// Set of selected node ids.
///
/// Every mutator returns whether the set actually changed, so callers only
/// notify the host when something happened.
#[derive(Default, Debug, Clone)]
pub struct SelectionModel {
    selected: BTreeSet<NodeId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click semantics.
    ///
    /// - With the modifier held, toggle `id` and leave the rest alone.
    /// - Without it, clicking an unselected node selects only that node.
    /// - Without it, clicking a node that is already selected keeps the whole
    ///   selection so the group can be dragged.
    pub fn handle_click(&mut self, id: &NodeId, modifier_held: bool) -> bool {
        if modifier_held {
            self.toggle(id)
        } else if self.selected.contains(id) {
            false
        } else {
            self.set_exclusive(id)
        }
    }

    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        true
    }

    /// Replace the selection with exactly `id`.
    pub fn set_exclusive(&mut self, id: &NodeId) -> bool {
        if self.selected.len() == 1 && self.selected.contains(id) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(id.clone());
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Replace the selection with every node whose box overlaps `rect`.
    pub fn set_from_rectangle<N, I>(&mut self, rect: &Rect, nodes: I) -> bool
    where
        N: NodeGeometry,
        I: IntoIterator<Item = N>,
    {
        let hits: BTreeSet<NodeId> = nodes_in_selection_box(rect, nodes).into_iter().collect();
        if hits == self.selected {
            return false;
        }
        self.selected = hits;
        true
    }

    /// Drop an id that no longer exists (e.g. after a delete).
    pub fn remove(&mut self, id: &NodeId) -> bool {
        self.selected.remove(id)
    }

    /// Follow an id swap (temporary → remote id).
    pub fn rename(&mut self, old: &NodeId, new: &NodeId) {
        if self.selected.remove(old) {
            self.selected.insert(new.clone());
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.selected.iter()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Mirror the selection into a Slint model.
    pub fn sync_to_model(&self, model: &VecModel<SharedString>) {
        let rows: Vec<SharedString> = self
            .selected
            .iter()
            .map(|id| SharedString::from(id.as_str()))
            .collect();
        if model.row_count() == rows.len()
            && rows
                .iter()
                .enumerate()
                .all(|(i, row)| model.row_data(i).as_ref() == Some(row))
        {
            return;
        }
        model.set_vec(rows);
    }
}

/// Rubber-band rectangle, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRectangle {
    pub anchor: Point,
    pub current: Point,
}

impl SelectionRectangle {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            current: anchor,
        }
    }

    /// Normalized rectangle, whatever direction the pointer went.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.anchor, self.current)
    }
}
