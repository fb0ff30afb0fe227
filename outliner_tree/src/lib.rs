// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outliner Tree: builds and walks the tree of rows an outliner editor shows.
//!
//! A [`SpaceOutliner`] turns a datablock database ([`outliner_data::Main`]) into a [`Tree`] of
//! typed rows according to its [`OutlinerSettings`]. Every row is backed by a persisted
//! [`TreeStoreElem`] so that open/closed and selection state survive rebuilds, even when the
//! database changed in between.
//!
//! - The [`DisplayMode`] picks a [`TreeDisplay`] that produces the root rows: view layers,
//!   scenes, libraries, orphaned data, library overrides, the sequencer or the raw data API.
//! - Each row carries an [`Element`], one type per [`ElementKind`], which knows its name and
//!   how to append its children (modifiers, bones, collections, animation data, ...).
//! - Rows below closed rows are only built when searching, or not at all for lazily built
//!   displays, which then mark the row with [`ElementFlags::PRETEND_HAS_CHILDREN`].
//!
//! ## Not a drawing layer
//!
//! This crate does not draw, handle input or edit the database. [`set_coordinates`] assigns
//! each visible row its origin; everything else is up to the editor embedding the tree.
//!
//! ## API overview
//!
//! - [`SpaceOutliner`]: settings, tree and persisted rows of one outliner.
//! - [`Tree`] / [`TreeNode`]: generational arena of rows addressed by [`NodeId`].
//! - [`TreeStore`] / [`TreeStoreElem`]: persisted rows, keyed by [`StoreId`], kind and index.
//! - [`TreeBuilder`]: adds rows during a build; used by displays and elements.
//! - [`Element`] / [`AbstractElement`]: per-kind behavior of a row.
//!
//! Key operations:
//! - [`SpaceOutliner::rebuild`] builds the tree from a [`TreeSourceData`].
//! - [`SpaceOutliner::set_open`] opens or closes a row;
//!   [`SpaceOutliner::needs_rebuild_on_toggle`] tells whether that requires a rebuild.
//! - [`Tree::element_as`] borrows the concrete element of a row, see [`ElementError`].
//! - [`iter::all`] and [`iter::all_open`] visit rows in preorder and tolerate the visitor freeing
//!   the row it is handed.
//! - [`Tree::next_depth_first`] and [`Tree::prev_depth_first`] step through rows one at a time.
//! - [`sort_alpha`] and [`sort_children_not_in_collection`] reorder sibling lists after a build.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod builder;
mod display;
mod element;
mod error;
pub mod iter;
mod kind;
mod layout;
mod payload;
mod sort;
mod space;
mod store;
mod tree;
mod types;
mod util;

#[cfg(test)]
mod testing;

pub use builder::{TreeBuilder, TreeSourceData};
pub use display::{TreeDisplay, create as create_display};
pub use element::{
    AbstractElement, ActionSlotElement, AnimDataElement, BoneElement, ConstraintBaseElement,
    ConstraintElement, CreateContext, DeformGroupBaseElement, DeformGroupElement,
    DriverBaseElement, EditBoneElement, Element, ElementVariant, GenericLabelElement,
    GpLayerElement, GpencilEffectBaseElement, GpencilEffectElement, GreasePencilNodeElement,
    IdBaseElement, IdElement, IdElementKind, LayerCollectionElement, LinkedObjectElement,
    LinkedParticleSystemElement, ModifierBaseElement, ModifierElement, NlaActionElement,
    NlaElement, NlaTrackElement, OverrideOperationElement, OverridePropertyElement,
    OverridesBaseElement, ParentInfo, PoseBaseElement, PoseChannelElement, PoseGroupBaseElement,
    PoseGroupElement, RnaArrayItemElement, RnaPropertyElement, RnaStructElement,
    SceneCollectionBaseElement, SceneObjectsBaseElement, StripDataElement, StripDupElement,
    StripElement, ViewCollectionBaseElement, ViewLayerBaseElement, ViewLayerElement,
};
pub use error::ElementError;
pub use kind::{ElementKind, KindTag};
pub use layout::set_coordinates;
pub use payload::{IdBaseKind, Payload};
pub use sort::{sort_alpha, sort_children_not_in_collection};
pub use space::{
    DisplayMode, FilterFlags, LibOverrideViewMode, OutlinerSettings, RestrictFlags,
    SpaceOutliner,
};
pub use store::{StoreId, StoreIndex, TreeStore, TreeStoreElem};
pub use tree::{Tree, TreeNode};
pub use types::{ElementFlags, Icon, NodeId, StoreFlags};
