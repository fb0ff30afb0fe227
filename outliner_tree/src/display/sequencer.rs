// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use outliner_data::{Editing, IdRef, Strip, StripKind};

use super::TreeDisplay;
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::types::NodeId;

/// Top-level strips of the active scene. Strips reading the same file are
/// grouped below one row, placed where the first of them is.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct SequencerDisplay;

/// What to add at the top level for a strip.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum StripAddOp {
    /// The strip itself.
    None,
    /// Nothing; an earlier strip reads the same file and grouped it.
    Noop,
    /// A group for every strip reading the same file.
    Add,
}

/// Row index of a strip: its type code.
fn strip_type_index(strip: &Strip) -> i32 {
    match strip.kind {
        StripKind::Image => 0,
        StripKind::Meta { .. } => 1,
        StripKind::Scene => 2,
        StripKind::Movie => 3,
        StripKind::Sound => 4,
        StripKind::Effect => 8,
    }
}

fn source_filename(editing: &Editing, strip: u32) -> Option<&str> {
    editing
        .strip(strip)
        .and_then(Strip::source_filename)
        .filter(|f| !f.is_empty())
}

fn need_add_strip_dup(editing: &Editing, position: usize) -> StripAddOp {
    let Some(filename) = source_filename(editing, editing.top_level[position]) else {
        return StripAddOp::None;
    };
    let reads_same = |&s: &u32| source_filename(editing, s) == Some(filename);
    if editing.top_level[..position].iter().any(reads_same) {
        StripAddOp::Noop
    } else if editing.top_level[position + 1..].iter().any(reads_same) {
        StripAddOp::Add
    } else {
        StripAddOp::None
    }
}

impl TreeDisplay for SequencerDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let Some(scene) = builder.source().scene else {
            return;
        };
        let Some(editing) = builder.main().scene(scene).and_then(|s| s.editing.as_ref()) else {
            return;
        };
        for (position, &strip) in editing.top_level.iter().enumerate() {
            let index = editing.strip(strip).map_or(0, strip_type_index);
            let payload = Some(Payload::Strip { scene, strip });
            match need_add_strip_dup(editing, position) {
                StripAddOp::None => {
                    builder.add_element(None, payload, ElementKind::Strip, index, true);
                }
                StripAddOp::Add => {
                    let group = builder.add_element(None, payload, ElementKind::StripDup, index, true);
                    add_strip_dup(builder, group, scene, editing, strip);
                }
                StripAddOp::Noop => {}
            }
        }
    }
}

/// Every top-level strip reading the same file as `first`, below `group`.
fn add_strip_dup(
    builder: &mut TreeBuilder<'_>,
    group: Option<NodeId>,
    scene: IdRef,
    editing: &Editing,
    first: u32,
) {
    let filename = source_filename(editing, first);
    for &strip in &editing.top_level {
        if source_filename(editing, strip) == filename {
            let payload = Payload::Strip { scene, strip };
            builder.add_element(group, Some(payload), ElementKind::Strip, 0, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementKind, OutlinerSettings, SpaceOutliner, Tree};
    use alloc::string::String;
    use alloc::vec::Vec;

    fn rows(tree: &Tree, nodes: &[crate::NodeId]) -> Vec<(String, ElementKind, i32)> {
        nodes
            .iter()
            .filter_map(|&n| tree.get(n))
            .filter_map(|n| match n.kind {
                crate::KindTag::Known(kind) => Some((String::from(n.name.as_ref()), kind, n.index)),
                crate::KindTag::Unrecognized(_) => None,
            })
            .collect()
    }

    #[test]
    fn strips_reading_one_file_are_grouped() {
        let (main, scene) = testing::sequencer_scene();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Sequencer));
        space.rebuild(testing::source(&main, Some(scene)));
        let tree = space.tree();

        assert_eq!(
            rows(tree, tree.roots()),
            [
                (String::from("shot.mp4"), ElementKind::StripDup, 3),
                (String::from("Music"), ElementKind::Strip, 4),
                (String::from("Group"), ElementKind::Strip, 1),
            ]
        );
        let dup = tree.roots()[0];
        assert_eq!(
            rows(tree, tree.children_of(dup)),
            [
                (String::from("Shot A"), ElementKind::Strip, 0),
                (String::from("Shot B"), ElementKind::Strip, 0),
            ]
        );
    }

    #[test]
    fn meta_strips_list_children_and_others_their_data() {
        let (main, scene) = testing::sequencer_scene();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Sequencer));
        space.rebuild(testing::source(&main, Some(scene)));
        let tree = space.tree();

        let music = tree.roots()[1];
        assert_eq!(
            rows(tree, tree.children_of(music)),
            [(String::from("//audio/"), ElementKind::StripData, 0)]
        );
        let meta = tree.roots()[2];
        assert_eq!(
            rows(tree, tree.children_of(meta)),
            [(String::from("Title"), ElementKind::Strip, 0)]
        );
        let title = tree.children_of(meta)[0];
        assert_eq!(
            rows(tree, tree.children_of(title)),
            [(String::from("Strip None"), ElementKind::StripData, 0)],
            "source data without a directory"
        );
    }
}
