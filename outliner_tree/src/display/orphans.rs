// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use outliner_data::{IdCode, IdRef};

use super::{TreeDisplay, id_lists, list_ids};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::{IdBaseKind, Payload};

/// Datablocks without real users, grouped by type.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct OrphansDisplay;

/// Types that are never considered unused.
fn never_unused(code: IdCode) -> bool {
    matches!(code, IdCode::Library | IdCode::WorkSpace)
}

impl TreeDisplay for OrphansDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let main = builder.main();
        let filtered = builder.settings().id_filter().is_some();
        for (a, code) in id_lists(builder) {
            if never_unused(code) {
                continue;
            }
            let orphans: Vec<IdRef> = list_ids(main, code)
                .filter(|&id| main.real_users(id) == 0)
                .collect();
            if orphans.is_empty() {
                continue;
            }
            let parent = if filtered {
                None
            } else {
                let payload = Payload::IdBase(IdBaseKind::List { lib: None, code });
                builder.add_element(None, Some(payload), ElementKind::IdBase, a, true)
            };
            for id in orphans {
                builder.add_id(parent, Some(id), 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, OutlinerSettings, SpaceOutliner};
    use alloc::vec::Vec;
    use outliner_data::IdCode;

    #[test]
    fn only_unused_datablocks_are_listed() {
        let db = testing::library_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::OrphanData));
        space.rebuild(testing::source(&db.main, None));
        let tree = space.tree();

        let groups: Vec<_> = tree.roots().iter().filter_map(|&n| space.name(n)).collect();
        assert_eq!(groups, ["Meshes"], "libraries are never orphaned");
        let meshes: Vec<_> = tree
            .children_of(tree.roots()[0])
            .iter()
            .filter_map(|&n| space.name(n))
            .collect();
        assert_eq!(meshes, ["Unused"], "fake users do not count as real users");
    }

    #[test]
    fn type_filter_lists_orphans_at_top() {
        let db = testing::library_database();
        let settings = OutlinerSettings::new(DisplayMode::OrphanData).with_id_filter(IdCode::Mesh);
        let mut space = SpaceOutliner::new(settings);
        space.rebuild(testing::source(&db.main, None));
        let roots: Vec<_> = space
            .tree()
            .roots()
            .iter()
            .filter_map(|&n| space.name(n))
            .collect();
        assert_eq!(roots, ["Unused"]);
    }
}
