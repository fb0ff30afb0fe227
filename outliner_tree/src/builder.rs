// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree construction: adds nodes, claims their persisted rows and runs expansion.

use alloc::vec::Vec;
use hashbrown::HashMap;

use outliner_data::{IdCode, IdRef, Main};

use crate::element::{AbstractElement, CreateContext, Element, ParentInfo};
use crate::kind::{ElementKind, KindTag};
use crate::payload::Payload;
use crate::space::OutlinerSettings;
use crate::store::{TreeStore, TreeStoreElem};
use crate::tree::{Tree, TreeNode};
use crate::types::{ElementFlags, NodeId, StoreFlags};

/// What a display builds from: the database and the active scene and view layer.
#[derive(Copy, Clone, Debug)]
pub struct TreeSourceData<'a> {
    /// The database.
    pub main: &'a Main,
    /// Active scene.
    pub scene: Option<IdRef>,
    /// Index of the active view layer in the active scene.
    pub view_layer: Option<u32>,
}

impl<'a> TreeSourceData<'a> {
    /// Source with no active scene.
    pub fn new(main: &'a Main) -> Self {
        Self {
            main,
            scene: None,
            view_layer: None,
        }
    }

    /// Set the active scene.
    pub fn with_scene(mut self, scene: IdRef) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Set the active view layer of the active scene.
    pub fn with_view_layer(mut self, view_layer: u32) -> Self {
        self.view_layer = Some(view_layer);
        self
    }
}

/// Builds one tree against a persisted row pool.
///
/// Every added node claims a row keyed by its data, kind and index; rows that
/// did not exist before this build come out closed with `used == false`.
pub struct TreeBuilder<'a> {
    tree: Tree,
    store: &'a mut TreeStore,
    source: TreeSourceData<'a>,
    settings: &'a OutlinerSettings,
    searching: bool,
}

impl core::fmt::Debug for TreeBuilder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("nodes", &self.tree.len())
            .field("rows", &self.store.len())
            .field("scene", &self.source.scene)
            .field("view_layer", &self.source.view_layer)
            .field("searching", &self.searching)
            .finish_non_exhaustive()
    }
}

impl<'a> TreeBuilder<'a> {
    /// Start an empty tree.
    pub fn new(
        store: &'a mut TreeStore,
        source: TreeSourceData<'a>,
        settings: &'a OutlinerSettings,
    ) -> Self {
        Self {
            tree: Tree::new(),
            store,
            source,
            settings,
            searching: settings.is_searching(),
        }
    }

    /// The database.
    pub fn main(&self) -> &'a Main {
        self.source.main
    }

    /// Build inputs.
    pub fn source(&self) -> TreeSourceData<'a> {
        self.source
    }

    /// Settings of the owning outliner.
    pub fn settings(&self) -> &'a OutlinerSettings {
        self.settings
    }

    /// Whether a recursive search is active.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Tree built so far.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable tree built so far.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Persisted rows.
    pub fn store(&self) -> &TreeStore {
        self.store
    }

    /// Row claimed by `node`.
    pub fn row(&self, node: NodeId) -> Option<&TreeStoreElem> {
        self.store.get(self.tree.get(node)?.store)
    }

    /// Mutable row claimed by `node`.
    pub fn row_mut(&mut self, node: NodeId) -> Option<&mut TreeStoreElem> {
        self.store.get_mut(self.tree.get(node)?.store)
    }

    /// Whether `node` shows its children.
    pub fn is_open(&self, node: NodeId) -> bool {
        self.row(node).is_some_and(|row| row.is_open(self.searching))
    }

    /// Open `node` if its row is new in this build.
    pub fn uncollapse_by_default(&mut self, node: NodeId) {
        if let Some(row) = self.row_mut(node)
            && !row.used
        {
            row.flag.remove(StoreFlags::CLOSED);
        }
    }

    /// Open `node` unconditionally.
    pub fn open(&mut self, node: NodeId) {
        if let Some(row) = self.row_mut(node) {
            row.flag.remove(StoreFlags::CLOSED);
        }
    }

    /// Finish building.
    pub fn finish(self) -> Tree {
        self.tree
    }

    /// Add a node for `payload` below `parent` and, if `expand` is set, its children.
    ///
    /// A null payload adds nothing. Deprecated datablock types are refused.
    /// Kinds without an element, or payloads the element rejects, still add an
    /// inert node so its persisted row is kept.
    pub fn add_element(
        &mut self,
        parent: Option<NodeId>,
        payload: Option<Payload>,
        kind: impl Into<KindTag>,
        index: i32,
        expand: bool,
    ) -> Option<NodeId> {
        let payload = payload?;
        let kind = kind.into();
        let main = self.main();
        let is_id = kind.is(ElementKind::SomeId);
        if is_id && payload.is_deprecated_id(main) {
            tracing::warn!(?payload, "refusing a deprecated datablock type");
            return None;
        }

        let row = self.store.ensure(payload.store_id(), kind.raw(), index);
        if self.searching
            && let Some(row) = self.store.get_mut(row)
        {
            row.flag.insert(StoreFlags::CHILDSEARCH);
        }

        let mut node = TreeNode::new(kind, row, index);
        node.directdata = Some(payload);
        if is_id {
            node.idcode = payload.id().and_then(|id| main.get(id)).map(|id| id.code());
        }
        let ctx = CreateContext {
            main,
            parent: parent.and_then(|p| self.tree.get(p)).map(ParentInfo::of),
        };
        let element = Element::create_from_type(kind, &mut node, Some(payload), &ctx);
        if element.is_some_and(|e| !e.warning(main).is_empty()) {
            node.flag.insert(ElementFlags::HAS_WARNING);
        }
        node.element = element;
        let id = self.tree.insert(parent, node);

        if expand
            && let Some(element) = element
            && element.is_expand_valid()
            && element.expand_poll(self, id)
        {
            element.expand(self, id);
        }
        Some(id)
    }

    /// Add a datablock row, expanded.
    pub fn add_id(&mut self, parent: Option<NodeId>, id: Option<IdRef>, index: i32) -> Option<NodeId> {
        self.add_element(parent, id.map(Payload::Id), ElementKind::SomeId, index, true)
    }

    /// Second pass of a flat-then-nest build.
    ///
    /// `nodes` pairs each created node with the index of its data; every node
    /// whose data has a parent among `nodes` is moved to the end of that
    /// parent's children, in `nodes` order.
    pub fn relink_by_parent(
        &mut self,
        nodes: &[(u32, NodeId)],
        parent_of: impl Fn(u32) -> Option<u32>,
    ) {
        let by_data: HashMap<u32, NodeId> = nodes.iter().copied().collect();
        for &(data, node) in nodes {
            if let Some(parent) = parent_of(data).and_then(|p| by_data.get(&p)) {
                self.tree.reparent(node, Some(*parent));
            }
        }
    }

    /// Move objects of the list below `list` under their parent object, when
    /// the parent is listed there too.
    pub fn make_object_parent_hierarchy(&mut self, list: Option<NodeId>) {
        let main = self.main();
        let mut objects: Vec<(IdRef, NodeId)> = Vec::new();
        let mut first: HashMap<IdRef, NodeId> = HashMap::new();
        for &node in self.tree.list(list) {
            let Some(n) = self.tree.get(node) else {
                continue;
            };
            if !n.kind.is(ElementKind::SomeId) || n.idcode != Some(IdCode::Object) {
                continue;
            }
            if let Some(ob) = n.directdata.and_then(|d| d.id()) {
                objects.push((ob, node));
                first.entry(ob).or_insert(node);
            }
        }
        for (ob, node) in objects {
            let parent = main.object(ob).and_then(|o| o.parent);
            if let Some(&parent_node) = parent.and_then(|p| first.get(&p))
                && parent_node != node
            {
                self.tree.reparent(node, Some(parent_node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::DisplayMode;
    use crate::testing;
    use outliner_data::{Id, IdData};

    #[test]
    fn null_payload_adds_nothing() {
        let main = Main::new();
        let mut store = TreeStore::new();
        let settings = OutlinerSettings::new(DisplayMode::Scenes);
        let mut builder = TreeBuilder::new(&mut store, TreeSourceData::new(&main), &settings);
        assert!(builder.add_id(None, None, 0).is_none());
        assert!(builder.finish().is_empty());
        assert!(store.is_empty(), "no row is claimed for nothing");
    }

    #[test]
    fn deprecated_ids_are_refused() {
        let mut main = Main::new();
        let ipo = main.add(Id::new("Curve", IdData::Other(IdCode::Ipo)));
        let mut store = TreeStore::new();
        let settings = OutlinerSettings::new(DisplayMode::Libraries);
        let mut builder = TreeBuilder::new(&mut store, TreeSourceData::new(&main), &settings);
        assert!(builder.add_id(None, Some(ipo), 0).is_none());
    }

    #[test]
    fn unknown_kinds_add_inert_nodes() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut store = TreeStore::new();
        let settings = OutlinerSettings::new(DisplayMode::Scenes);
        let mut builder = TreeBuilder::new(&mut store, TreeSourceData::new(&main), &settings);
        let node = builder
            .add_element(None, Some(Payload::Id(scene)), KindTag::from_raw(4242), 0, true)
            .expect("a node is still added");
        let tree = builder.finish();
        let node = tree.get(node).expect("alive");
        assert!(node.element().is_none());
        assert!(node.name.is_empty(), "inert nodes keep the default name");
        assert!(tree.children_of(tree.roots()[0]).is_empty(), "and never expand");
    }

    #[test]
    fn searching_marks_rows_for_descent() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut store = TreeStore::new();
        let settings = OutlinerSettings::new(DisplayMode::Scenes).with_search("Cube");
        let mut builder = TreeBuilder::new(&mut store, TreeSourceData::new(&main), &settings);
        let node = builder.add_id(None, Some(scene), 0).expect("scene row");
        assert!(builder.is_searching());
        assert!(builder.is_open(node), "closed rows open while a search descends");
    }

    #[test]
    fn relink_moves_children_after_siblings() {
        let mut main = Main::new();
        let labels: Vec<_> = (0..4)
            .map(|i| main.add(Id::new(alloc::format!("L{i}"), IdData::Other(IdCode::Text))))
            .collect();
        let mut store = TreeStore::new();
        let settings = OutlinerSettings::new(DisplayMode::Libraries);
        let mut builder = TreeBuilder::new(&mut store, TreeSourceData::new(&main), &settings);
        let root = builder.add_id(None, Some(labels[0]), 0);
        let created: Vec<_> = labels[1..]
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| Some((crate::util::index_u32(i), builder.add_id(root, Some(l), 0)?)))
            .collect();
        // 0 <- 1, 0 <- 2
        builder.relink_by_parent(&created, |i| (i > 0).then_some(0));
        let tree = builder.finish();
        let root = root.expect("root row");
        assert_eq!(tree.children_of(root), [created[0].1]);
        assert_eq!(tree.children_of(created[0].1), [created[1].1, created[2].1]);
    }
}
