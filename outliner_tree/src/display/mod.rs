// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display modes: each builds the top levels of the tree for one
//! [`DisplayMode`] and lets the elements expand the rest.

mod data_api;
mod libraries;
mod orphans;
mod override_hierarchies;
mod override_properties;
mod scenes;
mod sequencer;
mod view_layer;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use outliner_data::{IdCode, IdFlags, IdRef, Main};

use crate::builder::TreeBuilder;
use crate::space::{DisplayMode, LibOverrideViewMode};
use crate::util::index_i32;

/// Builds the tree of one display mode.
pub trait TreeDisplay: Debug {
    /// Add the top-level rows, and whatever the elements do not add on their
    /// own, through `builder`.
    fn build_tree(&self, builder: &mut TreeBuilder<'_>);

    /// Whether rows show the interaction-mode column.
    fn supports_mode_column(&self) -> bool {
        false
    }

    /// Whether children are only built below open rows, so that opening a
    /// row requires a rebuild.
    fn is_lazily_built(&self) -> bool {
        false
    }
}

/// Display for `mode`.
pub fn create(mode: DisplayMode, lib_override_view_mode: LibOverrideViewMode) -> Box<dyn TreeDisplay> {
    match mode {
        DisplayMode::Scenes => Box::new(scenes::ScenesDisplay),
        DisplayMode::ViewLayer => Box::new(view_layer::ViewLayerDisplay),
        DisplayMode::Libraries => Box::new(libraries::LibrariesDisplay),
        DisplayMode::Sequencer => Box::new(sequencer::SequencerDisplay),
        DisplayMode::DataApi => Box::new(data_api::DataApiDisplay),
        DisplayMode::OrphanData => Box::new(orphans::OrphansDisplay),
        DisplayMode::LibraryOverrides => match lib_override_view_mode {
            LibOverrideViewMode::Properties => {
                Box::new(override_properties::OverridePropertiesDisplay)
            }
            LibOverrideViewMode::Hierarchies => {
                Box::new(override_hierarchies::OverrideHierarchiesDisplay)
            }
        },
    }
}

/// Datablock lists to show, with their row index: the filtered type only,
/// or every list in database order.
fn id_lists(builder: &TreeBuilder<'_>) -> Vec<(i32, IdCode)> {
    let all = IdCode::ALL.into_iter().enumerate();
    match builder.settings().id_filter() {
        Some(code) => all
            .filter(|&(_, c)| c == code)
            .map(|(a, c)| (index_i32(a), c))
            .collect(),
        None => all.map(|(a, c)| (index_i32(a), c)).collect(),
    }
}

/// Datablocks of one list. Embedded data lives inside its owner and
/// deprecated types are never listed.
fn list_ids(main: &Main, code: IdCode) -> impl Iterator<Item = IdRef> + '_ {
    main.ids_of(code).filter(move |&id| {
        !code.is_deprecated()
            && main
                .get(id)
                .is_some_and(|d| !d.flags.contains(IdFlags::EMBEDDED_DATA))
    })
}
