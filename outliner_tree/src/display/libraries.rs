// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use hashbrown::HashMap;
use outliner_data::{IdCode, IdData, IdFlags, IdRef};

use super::{TreeDisplay, id_lists, list_ids};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::{IdBaseKind, Payload};
use crate::types::NodeId;

/// Datablocks of the current file and of every library, grouped by type.
///
/// Libraries linked only through another library are nested below it.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LibrariesDisplay;

impl TreeDisplay for LibrariesDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let main = builder.main();
        if let Some(current) = add_library_contents(builder, None, None) {
            builder.uncollapse_by_default(current);
        }

        let libraries: Vec<IdRef> = list_ids(main, IdCode::Library).collect();
        let mut rows: HashMap<IdRef, NodeId> = HashMap::new();
        let mut top_level = Vec::new();
        for &lib in &libraries {
            if let Some(node) = add_library_contents(builder, None, Some(lib)) {
                rows.insert(lib, node);
                top_level.push((lib, node));
            }
        }

        for (lib, node) in top_level {
            let Some(data) = main.get(lib) else {
                continue;
            };
            let IdData::Library(library) = &data.data else {
                continue;
            };
            let Some(&parent) = library.parent.and_then(|p| rows.get(&p)) else {
                continue;
            };
            if data.flags.contains(IdFlags::INDIRECT) {
                builder.tree_mut().reparent(node, Some(parent));
            } else {
                // Also used directly: stays at the top and is listed again
                // below the library that links it.
                add_library_contents(builder, Some(parent), Some(lib));
            }
        }
    }
}

/// Whether `id` is listed for `lib`.
///
/// With the view filtered to collections, collections that are children of
/// another non-master collection are left to their parent's row.
fn library_id_filter_poll(builder: &TreeBuilder<'_>, lib: Option<IdRef>, id: IdRef) -> bool {
    let main = builder.main();
    if main.get(id).map(|d| d.lib) != Some(lib) {
        return false;
    }
    if builder.settings().id_filter() == Some(IdCode::Collection) {
        return !main.collection_has_non_master_parent(id);
    }
    true
}

/// Row for `lib` (or the current file) with one group per datablock list.
///
/// The row is only created when there is something to list, except for
/// libraries, which always get one so broken libraries stay visible.
fn add_library_contents(
    builder: &mut TreeBuilder<'_>,
    parent: Option<NodeId>,
    lib: Option<IdRef>,
) -> Option<NodeId> {
    let main = builder.main();
    let filtered = builder.settings().id_filter().is_some();
    let mut tenlib = None;
    for (a, code) in id_lists(builder) {
        let ids: Vec<IdRef> = list_ids(main, code).collect();
        if ids.is_empty() {
            continue;
        }
        let has_data = ids
            .iter()
            .any(|&id| main.get(id).is_some_and(|d| d.lib == lib));
        if !has_data && lib.is_none() {
            continue;
        }
        if tenlib.is_none() {
            tenlib = match lib {
                Some(lib) => builder.add_id(parent, Some(lib), 0),
                None => builder.add_element(
                    parent,
                    Some(Payload::IdBase(IdBaseKind::CurrentFile)),
                    ElementKind::IdBase,
                    0,
                    true,
                ),
            };
        }
        let Some(lib_row) = tenlib else {
            return None;
        };
        if !has_data {
            continue;
        }
        let list_row = if filtered {
            lib_row
        } else {
            let payload = Payload::IdBase(IdBaseKind::List { lib, code });
            let Some(row) =
                builder.add_element(Some(lib_row), Some(payload), ElementKind::IdBase, a, true)
            else {
                continue;
            };
            row
        };
        for id in ids {
            if library_id_filter_poll(builder, lib, id) {
                builder.add_id(Some(list_row), Some(id), 0);
            }
        }
    }
    tenlib
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementKind, OutlinerSettings, SpaceOutliner, Tree};
    use alloc::string::String;
    use alloc::vec::Vec;
    use outliner_data::IdCode;

    fn names(tree: &Tree, nodes: &[crate::NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| tree.get(n))
            .map(|n| String::from(n.name.as_ref()))
            .collect()
    }

    #[test]
    fn current_file_comes_first_with_type_groups() {
        let db = testing::library_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Libraries));
        space.rebuild(testing::source(&db.main, None));
        let tree = space.tree();

        assert_eq!(names(tree, tree.roots()), ["Current File", "props.blend"]);
        let current = tree.roots()[0];
        assert!(space.is_open(current));
        assert_eq!(
            names(tree, tree.children_of(current)),
            ["Libraries", "Meshes", "Collections", "Objects", "Scenes"],
            "embedded master collections have no list of their own"
        );
        let lists: Vec<_> = tree
            .children_of(current)
            .iter()
            .filter_map(|&n| tree.get(n).map(|n| n.index))
            .collect();
        assert_eq!(lists, [0, 10, 22, 23, 24], "list rows are numbered by type");
        for &list in tree.children_of(current) {
            for &id in tree.children_of(list) {
                assert!(tree.children_of(id).is_empty(), "datablocks in lists stay collapsed");
            }
        }
    }

    #[test]
    fn indirect_libraries_nest_below_their_parent() {
        let db = testing::library_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Libraries));
        space.rebuild(testing::source(&db.main, None));
        let tree = space.tree();

        let props = tree.roots()[1];
        let nested = tree
            .children_of(props)
            .iter()
            .copied()
            .find(|&n| tree.get(n).is_some_and(|n| n.kind.is(ElementKind::SomeId)))
            .expect("indirect library below its parent");
        assert_eq!(tree.get(nested).map(|n| n.name.as_ref()), Some("textures.blend"));
        assert_eq!(
            space.warning(&db.main, nested),
            "Missing library",
            "the nested library is missing on disk"
        );
        assert_eq!(space.icon(&db.main, nested), Some(crate::Icon::LibraryMissing));
    }

    #[test]
    fn type_filter_drops_list_rows() {
        let db = testing::library_database();
        let settings = OutlinerSettings::new(DisplayMode::Libraries).with_id_filter(IdCode::Object);
        let mut space = SpaceOutliner::new(settings);
        space.rebuild(testing::source(&db.main, None));
        let tree = space.tree();

        let current = tree.roots()[0];
        assert_eq!(names(tree, tree.children_of(current)), ["Cube"]);
        let cube = tree.children_of(current)[0];
        assert!(
            !tree.children_of(cube).is_empty(),
            "filtered datablocks expand in place"
        );
    }
}
