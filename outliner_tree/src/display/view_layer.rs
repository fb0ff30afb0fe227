// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use hashbrown::HashMap;
use outliner_data::{IdCode, IdRef, ViewLayer};

use super::TreeDisplay;
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::space::{FilterFlags, RestrictFlags};
use crate::tree::Tree;
use crate::types::{ElementFlags, NodeId};
use crate::util::{index_i32, index_u32};

/// Collections of the active scene, per view layer.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct ViewLayerDisplay;

impl TreeDisplay for ViewLayerDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let Some(scene) = builder.source().scene else {
            return;
        };
        let Some(scene_data) = builder.main().scene(scene) else {
            return;
        };
        let single_layer = builder
            .settings()
            .filter
            .contains(FilterFlags::NO_VIEW_LAYERS);
        for a in 0..scene_data.view_layers.len() {
            let layer = index_u32(a);
            if single_layer {
                if builder.source().view_layer != Some(layer) {
                    continue;
                }
                add_view_layer(builder, None, scene, layer);
            } else {
                let payload = Payload::ViewLayer { scene, layer };
                let Some(node) =
                    builder.add_element(None, Some(payload), ElementKind::ViewLayer, index_i32(a), true)
                else {
                    continue;
                };
                builder.uncollapse_by_default(node);
                add_view_layer(builder, Some(node), scene, layer);
            }
        }
    }

    fn supports_mode_column(&self) -> bool {
        true
    }
}

/// Context shared by the recursive collection walk.
#[derive(Copy, Clone)]
struct LayerWalk<'a> {
    scene: IdRef,
    layer: u32,
    view_layer: &'a ViewLayer,
    show_objects: bool,
    show_excluded: bool,
}

fn add_view_layer(builder: &mut TreeBuilder<'_>, parent: Option<NodeId>, scene: IdRef, layer: u32) {
    let main = builder.main();
    let settings = builder.settings();
    let show_children = !settings.filter.contains(FilterFlags::NO_CHILDREN);

    if settings.filter.contains(FilterFlags::NO_COLLECTION) {
        for object in main.view_layer_objects(scene, layer) {
            builder.add_id(parent, Some(object), 0);
        }
        if show_children {
            builder.make_object_parent_hierarchy(parent);
        }
        return;
    }

    let payload = Payload::ViewLayer { scene, layer };
    let Some(base) =
        builder.add_element(parent, Some(payload), ElementKind::ViewCollectionBase, 0, true)
    else {
        return;
    };
    builder.open(base);

    let Some(view_layer) = main.view_layer(scene, layer) else {
        return;
    };
    // The master collection is represented by the base row itself.
    let Some(master) = view_layer.root.and_then(|r| view_layer.layer_collection(r)) else {
        return;
    };
    let walk = LayerWalk {
        scene,
        layer,
        view_layer,
        show_objects: !settings.filter.contains(FilterFlags::NO_OBJECT),
        show_excluded: settings.show_restrict.contains(RestrictFlags::ENABLE),
    };
    add_layer_collections(builder, base, &master.children, walk);
    if walk.show_objects {
        add_collection_objects(builder, base, master.collection);
    }
    if show_children {
        ObjectChildren::default().build(builder, base);
    }
}

/// Layer collections below `parent`. Excluded ones are skipped unless the
/// exclude column is shown; their children then move up to `parent`.
fn add_layer_collections(
    builder: &mut TreeBuilder<'_>,
    parent: NodeId,
    children: &[u32],
    walk: LayerWalk<'_>,
) {
    let main = builder.main();
    for &index in children {
        let Some(lc) = walk.view_layer.layer_collection(index) else {
            continue;
        };
        let excluded = lc.is_excluded();
        let node = if excluded && !walk.show_excluded {
            parent
        } else {
            let payload = Payload::LayerCollection {
                scene: walk.scene,
                layer: walk.layer,
                index,
                collection: lc.collection,
            };
            let Some(node) = builder.add_element(
                Some(parent),
                Some(payload),
                ElementKind::LayerCollection,
                0,
                true,
            ) else {
                continue;
            };
            // Linked collections can be huge.
            let linked = main
                .get(lc.collection)
                .is_some_and(|c| c.is_linked() || c.override_library.is_some());
            if !linked {
                builder.uncollapse_by_default(node);
            }
            node
        };
        add_layer_collections(builder, node, &lc.children, walk);
        if !excluded && walk.show_objects {
            add_collection_objects(builder, node, lc.collection);
        }
    }
}

fn add_collection_objects(builder: &mut TreeBuilder<'_>, node: NodeId, collection: IdRef) {
    let Some(data) = builder.main().collection(collection) else {
        return;
    };
    for &object in &data.objects {
        builder.add_id(Some(node), Some(object), 0);
    }
}

/// Nests objects below their parent object across collections.
///
/// A child that sits in the same collection as its parent is moved below the
/// parent. A child from another collection is listed below the parent once
/// more, collapsed and flagged [`ElementFlags::CHILD_NOT_IN_COLLECTION`].
#[derive(Default)]
struct ObjectChildren {
    order: Vec<IdRef>,
    rows: HashMap<IdRef, Vec<NodeId>>,
}

impl ObjectChildren {
    fn build(mut self, builder: &mut TreeBuilder<'_>, base: NodeId) {
        self.collect(builder.tree(), base);
        self.nest(builder);
    }

    fn collect(&mut self, tree: &Tree, parent: NodeId) {
        for &child in tree.children_of(parent) {
            let Some(node) = tree.get(child) else {
                continue;
            };
            if node.kind.is(ElementKind::LayerCollection) {
                self.collect(tree, child);
            } else if node.kind.is(ElementKind::SomeId)
                && node.idcode == Some(IdCode::Object)
                && let Some(ob) = node.directdata.and_then(|d| d.id())
            {
                self.rows
                    .entry(ob)
                    .or_insert_with(|| {
                        self.order.push(ob);
                        Vec::new()
                    })
                    .push(child);
            }
        }
    }

    fn nest(mut self, builder: &mut TreeBuilder<'_>) {
        let main = builder.main();
        for i in 0..self.order.len() {
            let child = self.order[i];
            let Some(parent) = main.object(child).and_then(|o| o.parent) else {
                continue;
            };
            let Some(parent_rows) = self.rows.get(&parent).cloned() else {
                continue;
            };
            for parent_row in parent_rows {
                let collection = collection_of(builder.tree(), parent_row);
                let child_rows = self.rows.get(&child).cloned().unwrap_or_default();
                let in_same_collection = child_rows
                    .into_iter()
                    .find(|&c| builder.tree().parent_of(c) == collection);
                if let Some(row) = in_same_collection {
                    builder.tree_mut().reparent(row, Some(parent_row));
                    continue;
                }
                let Some(row) = builder.add_element(
                    Some(parent_row),
                    Some(Payload::Id(child)),
                    ElementKind::SomeId,
                    0,
                    false,
                ) else {
                    continue;
                };
                if let Some(node) = builder.tree_mut().get_mut(row) {
                    node.flag.insert(ElementFlags::CHILD_NOT_IN_COLLECTION);
                }
                self.rows.entry(child).or_default().push(row);
            }
        }
    }
}

/// Closest collection row above `node`.
fn collection_of(tree: &Tree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.parent_of(node);
    while let Some(c) = current {
        let is_collection = tree.get(c).is_some_and(|n| {
            n.kind.is(ElementKind::LayerCollection) || n.kind.is(ElementKind::ViewCollectionBase)
        });
        if is_collection {
            return Some(c);
        }
        current = tree.parent_of(c);
    }
    None
}
