// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-build ordering of sibling lists.

use alloc::vec::Vec;
use core::cmp::Ordering;

use outliner_data::IdCode;

use crate::kind::ElementKind;
use crate::tree::{Tree, TreeNode};
use crate::types::{ElementFlags, NodeId};

/// Sort every object list, vertex group list and datablock-type grouping
/// alphabetically, recursively.
///
/// Leading rows that are neither datablocks nor vertex groups keep their
/// place. Objects go after other datablocks, and objects listed below a
/// parent they do not share a collection with go after their siblings.
pub fn sort_alpha(tree: &mut Tree) {
    sort_recursive(tree, None, &mut sort_alpha_list);
}

/// Move objects listed below a parent they do not share a collection with
/// after their siblings, recursively. The order is otherwise kept.
pub fn sort_children_not_in_collection(tree: &mut Tree) {
    sort_recursive(tree, None, &mut |tree: &mut Tree, parent: Option<NodeId>| {
        let first = tree.list(parent).first().and_then(|&n| tree.get(n));
        if !first.is_some_and(is_object) {
            return;
        }
        tree.reorder(parent, |tree, list| {
            list.sort_by_key(|&n| not_in_collection(tree, n));
        });
    });
}

fn sort_recursive(tree: &mut Tree, parent: Option<NodeId>, sort: &mut dyn FnMut(&mut Tree, Option<NodeId>)) {
    sort(tree, parent);
    let list = tree.list(parent).to_vec();
    for node in list {
        sort_recursive(tree, Some(node), sort);
    }
}

/// How a row takes part in the alphabetical sort.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SortClass {
    /// Keeps its place at the start of the list.
    Fixed,
    /// Datablock other than an object; kept before objects in build order.
    Id,
    /// Object or vertex group; sorted by name.
    Named,
}

fn is_object(node: &TreeNode) -> bool {
    node.kind.is(ElementKind::SomeId) && node.idcode == Some(IdCode::Object)
}

fn sort_class(node: &TreeNode) -> SortClass {
    if is_object(node) || node.kind.is(ElementKind::DeformGroup) {
        SortClass::Named
    } else if node.kind.is(ElementKind::SomeId) && node.idcode.is_some() {
        SortClass::Id
    } else {
        SortClass::Fixed
    }
}

fn not_in_collection(tree: &Tree, node: NodeId) -> bool {
    tree.get(node)
        .is_some_and(|n| n.flag.contains(ElementFlags::CHILD_NOT_IN_COLLECTION))
}

fn sort_alpha_list(tree: &mut Tree, parent: Option<NodeId>) {
    let list = tree.list(parent);
    if list.len() < 2 {
        return;
    }
    let Some(last) = list.last().and_then(|&n| tree.get(n)) else {
        return;
    };
    if last.kind.is(ElementKind::IdBase) {
        tree.reorder(parent, |tree, list| {
            list.sort_by(|&a, &b| natural_cmp(name(tree, a), name(tree, b)));
        });
    } else if is_object(last) || last.kind.is(ElementKind::DeformGroup) {
        tree.reorder(parent, |tree, list| {
            let skip = list
                .iter()
                .position(|&n| tree.get(n).is_some_and(|n| sort_class(n) != SortClass::Fixed))
                .unwrap_or(list.len());
            list[skip..].sort_by(|&a, &b| compare_ids(tree, a, b));
        });
    }
}

fn name(tree: &Tree, node: NodeId) -> &str {
    tree.get(node).map_or("", |n| n.name.as_ref())
}

fn compare_ids(tree: &Tree, a: NodeId, b: NodeId) -> Ordering {
    let (Some(na), Some(nb)) = (tree.get(a), tree.get(b)) else {
        return Ordering::Equal;
    };
    let named_a = sort_class(na) == SortClass::Named;
    let named_b = sort_class(nb) == SortClass::Named;
    match (named_a, named_b) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
        (true, true) => not_in_collection(tree, a)
            .cmp(&not_in_collection(tree, b))
            .then_with(|| natural_cmp(&na.name, &nb.name)),
    }
}

/// Case-insensitive comparison treating digit runs as numbers, so that
/// `"Cube.2"` sorts before `"Cube.10"`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let da = digit_run(&mut a);
                let db = digit_run(&mut b);
                let ord = da.len().cmp(&db.len()).then_with(|| da.cmp(&db));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

/// Consume a run of digits, without leading zeros.
fn digit_run(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> Vec<char> {
    let mut run = Vec::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        if run.is_empty() && c == '0' {
            continue;
        }
        run.push(c);
    }
    run
}
