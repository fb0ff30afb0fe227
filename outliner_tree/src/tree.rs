// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: a generational arena of tree nodes with an ordered root list.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use kurbo::Point;

use outliner_data::{IdCode, IdRef};

use crate::element::{Element, ElementVariant};
use crate::error::ElementError;
use crate::kind::{ElementKind, KindTag};
use crate::payload::Payload;
use crate::store::StoreIndex;
use crate::types::{ElementFlags, NodeId};

/// Per-build data of one row.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    /// Display name.
    pub name: Cow<'static, str>,
    /// Per-build flags.
    pub flag: ElementFlags,
    /// Index among rows of the same kind for the same data.
    pub index: i32,
    /// Datablock type, for datablock rows.
    pub idcode: Option<IdCode>,
    /// Payload the node was created from.
    pub directdata: Option<Payload>,
    /// Row origin computed by [`set_coordinates`](crate::set_coordinates).
    pub position: Point,
    /// Persisted row of this node.
    pub store: StoreIndex,
    /// Kind of the persisted row.
    pub kind: KindTag,
    pub(crate) element: Option<Element>,
}

impl TreeNode {
    /// Create an unnamed node without element.
    pub fn new(kind: impl Into<KindTag>, store: StoreIndex, index: i32) -> Self {
        Self {
            name: Cow::Borrowed(""),
            flag: ElementFlags::empty(),
            index,
            idcode: None,
            directdata: None,
            position: Point::ZERO,
            store,
            kind: kind.into(),
            element: None,
        }
    }

    /// Concrete element, if the factory produced one.
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node: TreeNode,
}

/// Tree of [`TreeNode`]s.
///
/// Nodes are addressed by generational [`NodeId`]s: once a node is removed,
/// its id goes stale and every accessor treats it as absent, even after the
/// slot is reused.
///
/// ## Example
///
/// ```rust
/// use outliner_tree::{ElementKind, Tree, TreeNode, TreeStore, StoreId};
///
/// let mut store = TreeStore::new();
/// let row = store.ensure(StoreId::Label("Root"), ElementKind::GenericLabel.raw(), 0);
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, TreeNode::new(ElementKind::GenericLabel, row, 0));
/// let child = tree.insert(Some(root), TreeNode::new(ElementKind::GenericLabel, row, 1));
///
/// assert_eq!(tree.roots(), [root]);
/// assert_eq!(tree.parent_of(child), Some(root));
/// tree.remove(root);
/// assert!(!tree.is_alive(child));
/// ```
#[derive(Clone, Default)]
pub struct Tree {
    /// slots
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<NodeId>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_total", &self.slots.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Insert a node as the last child of `parent`, or as the last root if `None`.
    ///
    /// A stale `parent` leaves the node detached: alive but unreachable.
    pub fn insert(&mut self, parent: Option<NodeId>, node: TreeNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot::new(generation, node));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Slot::new(generation, node)));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        self.link(id, parent);
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        self.drop_subtree(id);
    }

    /// Remove a single node. Its children stay alive but are detached.
    ///
    /// This is what a visitor does when it frees the node it was handed:
    /// traversal continues into the children it snapshotted beforehand.
    pub fn free_node(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        let children = self
            .slot_mut(id)
            .map(|slot| core::mem::take(&mut slot.children))
            .unwrap_or_default();
        for child in children {
            if let Some(slot) = self.slot_mut(child) {
                slot.parent = None;
            }
        }
        self.release(id);
    }

    /// Remove every child subtree of `id`.
    pub fn remove_children(&mut self, id: NodeId) {
        let children = self
            .slot_mut(id)
            .map(|slot| core::mem::take(&mut slot.children))
            .unwrap_or_default();
        for child in children {
            if let Some(slot) = self.slot_mut(child) {
                slot.parent = None;
            }
            self.drop_subtree(child);
        }
    }

    /// Move `id` to the end of `new_parent`'s children, or to the end of the
    /// root list if `None`.
    ///
    /// Moving a node below itself is refused.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || p == id || self.is_ancestor(id, p))
        {
            return;
        }
        self.unlink(id);
        self.link(id, new_parent);
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_of(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Remove every node. Ids handed out before stay stale.
    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            if self.slots[idx].take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.roots.clear();
    }

    /// Top-level nodes, in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of `parent`, or the roots for `None`. Empty for a stale id.
    pub fn list(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(p) => self.children_of(p),
            None => &self.roots,
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Node data, if `id` is live.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slot(id).map(|slot| &slot.node)
    }

    /// Mutable node data, if `id` is live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.slot_mut(id).map(|slot| &mut slot.node)
    }

    /// Element of a node, if `id` is live and the node has one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id)?.element.as_ref()
    }

    /// Checked access to the concrete element of a node.
    pub fn element_as<T: ElementVariant>(&self, id: NodeId) -> Result<&T, ElementError> {
        let node = self.get(id).ok_or(ElementError::StaleNode)?;
        let element = node.element.as_ref().ok_or(ElementError::NoElement)?;
        T::from_element(element).ok_or(ElementError::KindMismatch {
            expected: T::KIND,
            found: node.kind,
        })
    }

    /// Returns the parent of a node if live, or `None` for roots, detached
    /// nodes and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[], |slot| &slot.children)
    }

    /// Get the next node in depth-first traversal order, crossing from one
    /// root to the next.
    ///
    /// Returns `None` at the end or if the current node is stale.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        loop {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent_of(node)?;
        }
    }

    /// Get the previous node in depth-first traversal order.
    ///
    /// Returns `None` at the beginning or if the current node is stale.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        match self.prev_sibling(current) {
            Some(prev) => Some(self.last_in_subtree(prev)),
            None => self.parent_of(current),
        }
    }

    /// All reachable nodes in depth-first preorder.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.roots.first().copied(), |&id| self.next_depth_first(id))
    }

    /// First datablock row showing `id`, in preorder.
    pub fn find_id(&self, id: IdRef) -> Option<NodeId> {
        self.iter().find(|&n| {
            self.get(n).is_some_and(|node| {
                node.kind.is(ElementKind::SomeId) && node.directdata == Some(Payload::Id(id))
            })
        })
    }

    /// First node bound to persisted row `store`, in preorder.
    pub fn find_by_store(&self, store: StoreIndex) -> Option<NodeId> {
        self.iter()
            .find(|&n| self.get(n).is_some_and(|node| node.store == store))
    }

    /// Reorder the children of `parent` (or the roots) with `f`.
    ///
    /// `f` must only permute the list.
    pub(crate) fn reorder(&mut self, parent: Option<NodeId>, f: impl FnOnce(&Self, &mut Vec<NodeId>)) {
        let mut list = match parent {
            Some(p) => match self.slot_mut(p) {
                Some(slot) => core::mem::take(&mut slot.children),
                None => return,
            },
            None => core::mem::take(&mut self.roots),
        };
        f(self, &mut list);
        match parent {
            Some(p) => {
                if let Some(slot) = self.slot_mut(p) {
                    slot.children = list;
                }
            }
            None => self.roots = list,
        }
    }

    // --- internals ---

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|slot| slot.generation == id.1)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|slot| slot.generation == id.1)
    }

    fn link(&mut self, id: NodeId, parent: Option<NodeId>) {
        match parent {
            Some(p) => {
                let Some(parent_slot) = self.slot_mut(p) else {
                    return;
                };
                parent_slot.children.push(id);
                if let Some(slot) = self.slot_mut(id) {
                    slot.parent = Some(p);
                }
            }
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        match self.parent_of(id) {
            Some(p) => {
                if let Some(parent_slot) = self.slot_mut(p) {
                    parent_slot.children.retain(|&c| c != id);
                }
                if let Some(slot) = self.slot_mut(id) {
                    slot.parent = None;
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let children = self
            .slot_mut(id)
            .map(|slot| core::mem::take(&mut slot.children))
            .unwrap_or_default();
        for child in children {
            self.drop_subtree(child);
        }
        self.release(id);
    }

    fn release(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.slots[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    fn siblings(&self, node: NodeId) -> &[NodeId] {
        match self.parent_of(node) {
            Some(p) => self.children_of(p),
            None => &self.roots,
        }
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(node);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(node);
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    fn last_in_subtree(&self, mut node: NodeId) -> NodeId {
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        node
    }
}

impl Slot {
    fn new(generation: u32, node: TreeNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, GenericLabelElement, IdElement};
    use crate::store::{StoreId, TreeStore};
    use alloc::vec;

    fn label_tree() -> (Tree, StoreIndex) {
        let mut store = TreeStore::new();
        let row = store.ensure(StoreId::Label("Test"), ElementKind::GenericLabel.raw(), 0);
        (Tree::new(), row)
    }

    fn node(row: StoreIndex) -> TreeNode {
        TreeNode::new(ElementKind::GenericLabel, row, 0)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let (mut tree, row) = label_tree();
        let root = tree.insert(None, node(row));
        let a = tree.insert(Some(root), node(row));
        assert!(tree.is_alive(root) && tree.is_alive(a), "fresh nodes are alive");

        tree.remove(a);
        assert!(!tree.is_alive(a), "removed id is stale");

        let b = tree.insert(Some(root), node(row));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a), "reused slot must not revive the old id");
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn depth_first_traversal_crosses_roots() {
        let (mut tree, row) = label_tree();
        // r1 -> [a -> [c, d], b], r2
        let r1 = tree.insert(None, node(row));
        let a = tree.insert(Some(r1), node(row));
        let b = tree.insert(Some(r1), node(row));
        let c = tree.insert(Some(a), node(row));
        let d = tree.insert(Some(a), node(row));
        let r2 = tree.insert(None, node(row));

        let order: Vec<_> = tree.iter().collect();
        assert_eq!(order, vec![r1, a, c, d, b, r2]);
        assert!(tree.next_depth_first(r2).is_none(), "end of traversal");

        assert_eq!(tree.prev_depth_first(r2), Some(b));
        assert_eq!(tree.prev_depth_first(b), Some(d));
        assert_eq!(tree.prev_depth_first(c), Some(a));
        assert!(tree.prev_depth_first(r1).is_none(), "beginning of traversal");
    }

    #[test]
    fn free_node_detaches_children() {
        let (mut tree, row) = label_tree();
        let root = tree.insert(None, node(row));
        let child = tree.insert(Some(root), node(row));
        let grandchild = tree.insert(Some(child), node(row));

        tree.free_node(child);
        assert!(!tree.is_alive(child));
        assert!(tree.is_alive(grandchild), "children survive a single-node free");
        assert_eq!(tree.parent_of(grandchild), None);
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.roots(), [root], "detached nodes do not become roots");
    }

    #[test]
    fn reparent_appends_and_refuses_cycles() {
        let (mut tree, row) = label_tree();
        let root = tree.insert(None, node(row));
        let a = tree.insert(Some(root), node(row));
        let b = tree.insert(Some(root), node(row));
        let c = tree.insert(Some(a), node(row));

        tree.reparent(a, Some(b));
        assert_eq!(tree.children_of(root), [b]);
        assert_eq!(tree.children_of(b), [a]);

        tree.reparent(b, Some(c));
        assert_eq!(tree.parent_of(b), Some(root), "a node cannot move below itself");

        tree.reparent(c, None);
        assert_eq!(tree.roots(), [root, c]);
        assert!(tree.is_ancestor(root, a));
        assert!(!tree.is_ancestor(a, root));
    }

    #[test]
    fn remove_children_and_clear() {
        let (mut tree, row) = label_tree();
        let root = tree.insert(None, node(row));
        let a = tree.insert(Some(root), node(row));
        let b = tree.insert(Some(a), node(row));
        tree.remove_children(root);
        assert!(!tree.is_alive(a) && !tree.is_alive(b), "whole subtrees go");
        assert!(tree.is_alive(root));
        assert_eq!(tree.len(), 1);

        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.is_alive(root));
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn find_by_id_and_row() {
        let mut store = TreeStore::new();
        let mut main = outliner_data::Main::new();
        let mesh = main.add(outliner_data::Id::new(
            "Mesh",
            outliner_data::IdData::Other(IdCode::Mesh),
        ));
        let label_row = store.ensure(StoreId::Label("Meshes"), ElementKind::GenericLabel.raw(), 0);
        let id_row = store.ensure(StoreId::Id(mesh), ElementKind::SomeId.raw(), 0);

        let mut tree = Tree::new();
        let base = tree.insert(None, TreeNode::new(ElementKind::GenericLabel, label_row, 0));
        let mut id_node = TreeNode::new(ElementKind::SomeId, id_row, 0);
        id_node.directdata = Some(Payload::Id(mesh));
        let leaf = tree.insert(Some(base), id_node);

        assert_eq!(tree.find_id(mesh), Some(leaf));
        assert_eq!(tree.find_by_store(label_row), Some(base));
    }

    #[test]
    fn checked_element_access() {
        let (mut tree, row) = label_tree();
        let mut labelled = node(row);
        labelled.element = Some(Element::GenericLabel(GenericLabelElement::new("Hello", None)));
        let with = tree.insert(None, labelled);
        let without = tree.insert(None, node(row));

        assert!(tree.element_as::<GenericLabelElement>(with).is_ok());
        assert_eq!(
            tree.element_as::<GenericLabelElement>(without),
            Err(ElementError::NoElement)
        );
        assert_eq!(
            tree.element_as::<IdElement>(with),
            Err(ElementError::KindMismatch {
                expected: ElementKind::SomeId,
                found: KindTag::Known(ElementKind::GenericLabel),
            })
        );
        tree.remove(with);
        assert_eq!(
            tree.element_as::<GenericLabelElement>(with),
            Err(ElementError::StaleNode)
        );
    }
}
