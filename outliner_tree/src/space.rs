// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outliner settings and the per-editor state that survives rebuilds.

use alloc::boxed::Box;
use alloc::string::String;

use outliner_data::{IdCode, Main};

use crate::builder::{TreeBuilder, TreeSourceData};
use crate::display::{self, TreeDisplay};
use crate::element::AbstractElement;
use crate::kind::ElementKind;
use crate::sort;
use crate::store::TreeStore;
use crate::tree::Tree;
use crate::types::{Icon, NodeId, StoreFlags};

/// What the outliner shows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DisplayMode {
    /// Every scene with its view layers, collections and objects.
    Scenes,
    /// Collections of the active scene as seen by its view layers.
    #[default]
    ViewLayer,
    /// Datablocks of the current file and of each linked library.
    Libraries,
    /// Strips of the active scene's sequencer.
    Sequencer,
    /// Reflected data, starting at the database itself.
    DataApi,
    /// Library overrides of the current file.
    LibraryOverrides,
    /// Datablocks without real users.
    OrphanData,
}

/// How [`DisplayMode::LibraryOverrides`] presents overrides.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LibOverrideViewMode {
    /// Overridden properties of each override.
    #[default]
    Properties,
    /// Override hierarchies, walked along datablock references.
    Hierarchies,
}

bitflags::bitflags! {
    /// Content filters.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FilterFlags: u16 {
        /// Do not nest objects below their parent object.
        const NO_CHILDREN           = 1 << 0;
        /// List the view layer's objects instead of its collections.
        const NO_COLLECTION         = 1 << 1;
        /// Hide objects below collections.
        const NO_OBJECT             = 1 << 2;
        /// Only show the active view layer, without a row for it.
        const NO_VIEW_LAYERS        = 1 << 3;
        /// Only list datablocks of [`OutlinerSettings::filter_id_type`].
        const ID_TYPE               = 1 << 4;
        /// Also list overridden properties generated by the override system.
        const SHOW_SYSTEM_OVERRIDES = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Restriction toggle columns shown next to the rows.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RestrictFlags: u8 {
        /// Exclude checkbox. Excluded collections are only listed while it is shown.
        const ENABLE   = 1 << 0;
        /// Selectability.
        const SELECT   = 1 << 1;
        /// Hide in viewport (per view layer).
        const HIDE     = 1 << 2;
        /// Disable in viewports.
        const VIEWPORT = 1 << 3;
        /// Disable in renders.
        const RENDER   = 1 << 4;
    }
}

impl Default for RestrictFlags {
    fn default() -> Self {
        Self::ENABLE | Self::HIDE | Self::RENDER
    }
}

/// User-facing settings of one outliner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlinerSettings {
    /// Display mode.
    pub display_mode: DisplayMode,
    /// Sub-mode of [`DisplayMode::LibraryOverrides`].
    pub lib_override_view_mode: LibOverrideViewMode,
    /// Content filters.
    pub filter: FilterFlags,
    /// Datablock type shown while [`FilterFlags::ID_TYPE`] is set.
    pub filter_id_type: Option<IdCode>,
    /// Search string; empty when not searching.
    pub search_string: String,
    /// Restriction columns.
    pub show_restrict: RestrictFlags,
    /// Sort objects and datablock lists by name.
    pub sort_alpha: bool,
}

impl OutlinerSettings {
    /// Settings for `display_mode`, everything else default.
    pub fn new(display_mode: DisplayMode) -> Self {
        Self {
            display_mode,
            ..Self::default()
        }
    }

    /// Set the override sub-mode.
    pub fn with_lib_override_view_mode(mut self, mode: LibOverrideViewMode) -> Self {
        self.lib_override_view_mode = mode;
        self
    }

    /// Set the content filters.
    pub fn with_filter(mut self, filter: FilterFlags) -> Self {
        self.filter = filter;
        self
    }

    /// Only list datablocks of type `code`.
    pub fn with_id_filter(mut self, code: IdCode) -> Self {
        self.filter.insert(FilterFlags::ID_TYPE);
        self.filter_id_type = Some(code);
        self
    }

    /// Set the search string.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search_string = search.into();
        self
    }

    /// Set the restriction columns.
    pub fn with_restrict(mut self, restrict: RestrictFlags) -> Self {
        self.show_restrict = restrict;
        self
    }

    /// Enable or disable alphabetical sorting.
    pub fn with_sort_alpha(mut self, sort_alpha: bool) -> Self {
        self.sort_alpha = sort_alpha;
        self
    }

    /// Datablock type the view is filtered to, if any.
    pub fn id_filter(&self) -> Option<IdCode> {
        self.filter_id_type
            .filter(|_| self.filter.contains(FilterFlags::ID_TYPE))
    }

    /// Whether a search descends into closed rows.
    ///
    /// The data browser never searches recursively; its data can be cyclic.
    pub fn is_searching(&self) -> bool {
        !self.search_string.is_empty() && self.display_mode != DisplayMode::DataApi
    }
}

/// One outliner: its settings, persisted rows and the last built tree.
///
/// Rows are keyed by what they show, so open and selected state follows the
/// data across rebuilds, even if the data moved in the tree.
#[derive(Debug)]
pub struct SpaceOutliner {
    settings: OutlinerSettings,
    store: TreeStore,
    tree: Tree,
    display: Box<dyn TreeDisplay>,
}

impl SpaceOutliner {
    /// Create an outliner with an empty tree.
    pub fn new(settings: OutlinerSettings) -> Self {
        let display = display::create(settings.display_mode, settings.lib_override_view_mode);
        Self {
            settings,
            store: TreeStore::new(),
            tree: Tree::new(),
            display,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &OutlinerSettings {
        &self.settings
    }

    /// Replace the settings. Takes effect on the next rebuild.
    pub fn set_settings(&mut self, settings: OutlinerSettings) {
        self.settings = settings;
    }

    /// Last built tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable last built tree.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Persisted rows.
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Mutable persisted rows.
    pub fn store_mut(&mut self) -> &mut TreeStore {
        &mut self.store
    }

    /// Tree and rows together, for walks that update both.
    pub(crate) fn tree_and_store_mut(&mut self) -> (&mut Tree, &mut TreeStore) {
        (&mut self.tree, &mut self.store)
    }

    /// Rebuild the tree from `source`.
    ///
    /// Every row is marked unused first; rows claimed again come out with
    /// `used == true`. Unclaimed rows stay in the pool for later builds.
    pub fn rebuild(&mut self, source: TreeSourceData<'_>) {
        let display = display::create(
            self.settings.display_mode,
            self.settings.lib_override_view_mode,
        );
        self.store.clear_used();
        let mut builder = TreeBuilder::new(&mut self.store, source, &self.settings);
        display.build_tree(&mut builder);
        let mut tree = builder.finish();

        if self.settings.sort_alpha {
            sort::sort_alpha(&mut tree);
        } else if !self.settings.filter.contains(FilterFlags::NO_CHILDREN) {
            sort::sort_children_not_in_collection(&mut tree);
        }
        tracing::debug!(
            mode = ?self.settings.display_mode,
            nodes = tree.len(),
            rows = self.store.len(),
            "rebuilt outliner tree"
        );
        self.tree = tree;
        self.display = display;
    }

    /// Open or close `node`.
    ///
    /// Returns whether the tree must be rebuilt to show the change, which is
    /// the case for displays that only build below open rows.
    pub fn set_open(&mut self, node: NodeId, open: bool) -> bool {
        let Some(row) = self.tree.get(node).and_then(|n| self.store.get_mut(n.store)) else {
            return false;
        };
        let was_closed = row.flag.contains(StoreFlags::CLOSED);
        row.flag.set(StoreFlags::CLOSED, !open);
        was_closed == open && self.needs_rebuild_on_toggle()
    }

    /// Whether `node` shows its children.
    pub fn is_open(&self, node: NodeId) -> bool {
        self.tree
            .get(node)
            .and_then(|n| self.store.get(n.store))
            .is_some_and(|row| row.is_open(self.settings.is_searching()))
    }

    /// Display name of `node`.
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node).map(|n| n.name.as_ref())
    }

    /// Icon of `node`: the element's own, else the datablock type icon.
    pub fn icon(&self, main: &Main, node: NodeId) -> Option<Icon> {
        let n = self.tree.get(node)?;
        if let Some(icon) = n.element().and_then(|e| e.icon(main)) {
            return Some(icon);
        }
        if n.kind.is(ElementKind::SomeId) {
            return n.idcode.map(Icon::Id);
        }
        None
    }

    /// Warning shown next to `node`; empty if none.
    pub fn warning(&self, main: &Main, node: NodeId) -> &'static str {
        self.tree
            .get(node)
            .and_then(|n| n.element())
            .map_or("", |e| e.warning(main))
    }

    /// Whether the current display draws the interaction-mode column.
    pub fn supports_mode_column(&self) -> bool {
        self.display.supports_mode_column()
    }

    /// Whether the current display only builds children of open rows.
    pub fn is_lazily_built(&self) -> bool {
        self.display.is_lazily_built()
    }

    /// Whether toggling a row requires a rebuild.
    pub fn needs_rebuild_on_toggle(&self) -> bool {
        self.is_lazily_built()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn data_browser_never_searches_recursively() {
        let settings = OutlinerSettings::new(DisplayMode::DataApi).with_search("loc");
        assert!(!settings.is_searching());
        let settings = OutlinerSettings::new(DisplayMode::Scenes).with_search("loc");
        assert!(settings.is_searching());
        assert!(!OutlinerSettings::new(DisplayMode::Scenes).is_searching());
    }

    #[test]
    fn id_filter_needs_the_flag() {
        let mut settings = OutlinerSettings::new(DisplayMode::Libraries).with_id_filter(IdCode::Mesh);
        assert_eq!(settings.id_filter(), Some(IdCode::Mesh));
        settings.filter.remove(FilterFlags::ID_TYPE);
        assert_eq!(settings.id_filter(), None, "the type is kept but inactive");
    }

    #[test]
    fn rows_are_kept_across_rebuilds() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let rows = space.store().len();
        assert!(space.store().iter().all(|(_, row)| !row.used), "first build");

        space.rebuild(testing::source(&main, Some(scene)));
        assert_eq!(space.store().len(), rows, "no new rows for the same data");
        assert!(space.store().iter().all(|(_, row)| row.used), "every row claimed again");
    }

    #[test]
    fn toggling_reports_rebuilds_for_lazy_displays() {
        let main = testing::rna_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::DataApi));
        space.rebuild(testing::source(&main, None));
        assert!(space.is_lazily_built());
        let root = space.tree().roots()[0];
        let property = space.tree().children_of(root)[0];
        assert!(!space.is_open(property));
        assert!(space.set_open(property, true), "lazy displays rebuild on open");
        assert!(!space.set_open(property, true), "already open");

        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let root = space.tree().roots()[0];
        assert!(space.supports_mode_column());
        assert!(!space.set_open(root, false), "eager displays already built everything");
    }

    #[test]
    fn datablock_rows_fall_back_to_type_icons() {
        let (main, scene, _) = testing::scene_with_two_objects();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let root = space.tree().roots()[0];
        assert_eq!(space.icon(&main, root), Some(Icon::Id(IdCode::Scene)));
        assert_eq!(space.name(root), Some("Scene"));
        assert_eq!(space.warning(&main, root), "");
    }
}
