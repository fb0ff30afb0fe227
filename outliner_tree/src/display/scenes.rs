// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use outliner_data::IdCode;

use super::TreeDisplay;
use crate::builder::TreeBuilder;

/// Every scene of the file; the active one opens on first display.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct ScenesDisplay;

impl TreeDisplay for ScenesDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let show_opened = builder.store().is_empty();
        let main = builder.main();
        let active = builder.source().scene;
        for scene in main.ids_of(IdCode::Scene) {
            let Some(node) = builder.add_id(None, Some(scene), 0) else {
                continue;
            };
            let used = builder.row(node).is_some_and(|row| row.used);
            if (Some(scene) == active && show_opened) || !used {
                builder.open(node);
            }
        }
    }

    fn supports_mode_column(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementFlags, OutlinerSettings, SpaceOutliner, Tree};
    use alloc::string::String;
    use alloc::vec::Vec;
    use outliner_data::{IdData, IdRef};

    fn names(tree: &Tree, nodes: &[crate::NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| tree.get(n))
            .map(|n| String::from(n.name.as_ref()))
            .collect()
    }

    fn collection_row(tree: &Tree, collection: IdRef) -> crate::NodeId {
        tree.find_id(collection).expect("collection row")
    }

    #[test]
    fn scene_lists_collection_with_its_objects() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let tree = space.tree();

        assert_eq!(names(tree, tree.roots()), ["Scene"]);
        let scene_row = tree.roots()[0];
        assert!(space.is_open(scene_row), "the active scene opens on first display");
        assert_eq!(
            names(tree, tree.children_of(scene_row)),
            ["View Layers", "Scene Collection", "Objects"]
        );
        let collection = main
            .collection(main.scene(scene).and_then(|s| s.master_collection).expect("master"))
            .map(|c| c.children[0])
            .expect("one collection");
        let row = collection_row(tree, collection);
        assert_eq!(names(tree, tree.children_of(row)), ["Cube", "Lamp"]);

        let objects = tree.children_of(scene_row)[2];
        assert_eq!(
            names(tree, tree.children_of(objects)),
            ["Cube", "Lamp"],
            "every object of the scene is listed once"
        );
    }

    #[test]
    fn parented_objects_nest_below_their_parent() {
        let (mut main, scene, [cube, lamp]) = testing::scene_with_two_objects();
        if let Some(IdData::Object(ob)) = main.get_mut(lamp).map(|d| &mut d.data) {
            ob.parent = Some(cube);
        }
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let tree = space.tree();

        let cube_row = tree.find_id(cube).expect("cube row");
        let parent = tree.parent_of(cube_row).expect("cube is nested");
        assert_eq!(names(tree, tree.children_of(parent)), ["Cube"], "lamp moved away");
        let lamp_row = tree
            .children_of(cube_row)
            .iter()
            .copied()
            .find(|&n| tree.get(n).is_some_and(|n| n.directdata.and_then(|d| d.id()) == Some(lamp)))
            .expect("lamp below cube");
        assert!(
            tree.get(lamp_row)
                .is_some_and(|n| !n.flag.contains(ElementFlags::CHILD_NOT_IN_COLLECTION)),
            "both objects are in the collection"
        );
    }

    #[test]
    fn rebuilding_keeps_user_state() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let root = space.tree().roots()[0];
        space.set_open(root, false);
        space.rebuild(testing::source(&main, Some(scene)));
        let root = space.tree().roots()[0];
        assert!(!space.is_open(root), "closed rows stay closed");
        assert!(
            space
                .tree()
                .iter()
                .all(|n| space.tree().get(n).is_some_and(|n| !n.name.is_empty())),
            "every row is named"
        );
    }

    #[test]
    fn builds_are_deterministic() {
        let (main, scene, _) = testing::rigged_scene(outliner_data::ObjectMode::POSE, false);
        let build = || {
            let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
            testing::open_all(&mut space, &main, Some(scene));
            let tree = space.tree();
            tree.iter()
                .filter_map(|n| tree.get(n))
                .map(|n| (String::from(n.name.as_ref()), n.kind, n.index))
                .collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }
}
