// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Preorder visitors that tolerate the visited node being freed.
//!
//! Before a node is visited, its next sibling and its children are
//! snapshotted; the visitor may then free the node (but not its row) and the
//! walk continues with the snapshot. Snapshotted nodes that are no longer
//! alive are skipped.

use alloc::vec::Vec;

use crate::store::TreeStore;
use crate::tree::Tree;
use crate::types::NodeId;

/// Visit every node in preorder.
pub fn all(tree: &mut Tree, mut visit: impl FnMut(&mut Tree, NodeId)) {
    let roots = tree.roots().to_vec();
    visit_list(tree, &roots, &mut |tree, node| {
        visit(tree, node);
        true
    });
}

/// Visit every node in preorder, descending only into open rows.
///
/// Openness is read from the node's row after the visit, so the visitor may
/// open or close the row it is handed.
pub fn all_open(
    tree: &mut Tree,
    store: &mut TreeStore,
    searching: bool,
    mut visit: impl FnMut(&mut Tree, &mut TreeStore, NodeId),
) {
    let roots = tree.roots().to_vec();
    visit_list(tree, &roots, &mut |tree, node| {
        let Some(row) = tree.get(node).map(|n| n.store) else {
            return false;
        };
        visit(tree, store, node);
        store.get(row).is_some_and(|r| r.is_open(searching))
    });
}

/// Visit `list` and, where `visit` returns `true`, the snapshotted children.
fn visit_list(tree: &mut Tree, list: &[NodeId], visit: &mut dyn FnMut(&mut Tree, NodeId) -> bool) {
    for &node in list {
        if !tree.is_alive(node) {
            continue;
        }
        let children: Vec<NodeId> = tree.children_of(node).to_vec();
        if visit(tree, node) {
            visit_list(tree, &children, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::GenericLabelElement;
    use crate::store::StoreId;
    use crate::tree::TreeNode;
    use crate::types::StoreFlags;
    use crate::{ElementKind, StoreIndex};

    fn label(tree: &mut Tree, store: &mut TreeStore, parent: Option<NodeId>, text: &'static str) -> NodeId {
        let row = store.ensure(StoreId::Label(text), ElementKind::GenericLabel.raw(), 0);
        let mut node = TreeNode::new(ElementKind::GenericLabel, row, 0);
        node.name = text.into();
        node.element = Some(crate::element::Element::GenericLabel(GenericLabelElement::new(text, None)));
        tree.insert(parent, node)
    }

    /// a { b { c } }, d
    fn chain() -> (Tree, TreeStore, [NodeId; 4]) {
        let mut tree = Tree::new();
        let mut store = TreeStore::new();
        let a = label(&mut tree, &mut store, None, "a");
        let b = label(&mut tree, &mut store, Some(a), "b");
        let c = label(&mut tree, &mut store, Some(b), "c");
        let d = label(&mut tree, &mut store, None, "d");
        (tree, store, [a, b, c, d])
    }

    fn row(tree: &Tree, node: NodeId) -> StoreIndex {
        tree.get(node).map(|n| n.store).expect("alive")
    }

    #[test]
    fn visitor_may_free_the_node_it_is_handed() {
        let (mut tree, _, nodes) = chain();
        let mut seen = Vec::new();
        all(&mut tree, |tree, node| {
            seen.push(node);
            tree.free_node(node);
        });
        assert_eq!(seen, nodes, "every node is visited once, in preorder");
        assert!(tree.is_empty());
    }

    #[test]
    fn removed_subtrees_are_skipped() {
        let (mut tree, _, [a, b, _, d]) = chain();
        let mut seen = Vec::new();
        all(&mut tree, |tree, node| {
            seen.push(node);
            if node == a {
                tree.remove(b);
            }
        });
        assert_eq!(seen, [a, d]);
    }

    #[test]
    fn closed_rows_are_not_descended() {
        let (mut tree, mut store, [a, b, c, d]) = chain();
        for node in [a, b, c, d] {
            if let Some(r) = store.get_mut(row(&tree, node)) {
                r.flag.remove(StoreFlags::CLOSED);
            }
        }
        if let Some(r) = store.get_mut(row(&tree, b)) {
            r.flag.insert(StoreFlags::CLOSED);
        }
        let mut seen = Vec::new();
        all_open(&mut tree, &mut store, false, |_, _, node| seen.push(node));
        assert_eq!(seen, [a, b, d]);
    }

    #[test]
    fn search_descends_into_closed_rows() {
        let (mut tree, mut store, [a, b, c, d]) = chain();
        for node in [a, b] {
            if let Some(r) = store.get_mut(row(&tree, node)) {
                r.flag.insert(StoreFlags::CLOSED | StoreFlags::CHILDSEARCH);
            }
        }
        let mut seen = Vec::new();
        all_open(&mut tree, &mut store, true, |_, _, node| seen.push(node));
        assert_eq!(seen, [a, b, c, d]);

        let mut seen = Vec::new();
        all_open(&mut tree, &mut store, false, |_, _, node| seen.push(node));
        assert_eq!(seen, [a, d], "flag alone does not open without a search");
    }

    #[test]
    fn visitor_may_open_rows() {
        let (mut tree, mut store, [a, b, c, d]) = chain();
        let mut seen = Vec::new();
        all_open(&mut tree, &mut store, false, |tree, store, node| {
            seen.push(node);
            if let Some(r) = tree.get(node).and_then(|n| store.get_mut(n.store)) {
                r.flag.remove(StoreFlags::CLOSED);
            }
        });
        assert_eq!(seen, [a, b, c, d]);
    }
}
