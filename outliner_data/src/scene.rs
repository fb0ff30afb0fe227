// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene payload: view layers, layer collections and sequencer strips.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::IdRef;

/// Scene datablock payload.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// View layers.
    pub view_layers: Vec<ViewLayer>,
    /// World.
    pub world: Option<IdRef>,
    /// Embedded master collection.
    pub master_collection: Option<IdRef>,
    /// Sequencer data.
    pub editing: Option<Editing>,
}

bitflags::bitflags! {
    /// Layer collection state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerCollectionFlags: u8 {
        /// Excluded from the view layer.
        const EXCLUDE = 1 << 0;
        /// Hidden in the viewport.
        const HIDE = 1 << 1;
    }
}

/// View layer of a scene.
#[derive(Clone, Debug, Default)]
pub struct ViewLayer {
    /// Layer name.
    pub name: String,
    /// All layer collections of this view layer.
    pub layer_collections: Vec<LayerCollection>,
    /// Layer collection of the master collection.
    pub root: Option<u32>,
}

impl ViewLayer {
    /// Layer collection at `index`.
    pub fn layer_collection(&self, index: u32) -> Option<&LayerCollection> {
        self.layer_collections.get(index as usize)
    }
}

/// A collection as seen by one view layer.
#[derive(Clone, Debug)]
pub struct LayerCollection {
    /// Collection wrapped by this layer collection.
    pub collection: IdRef,
    /// State flags.
    pub flags: LayerCollectionFlags,
    /// Child layer collections.
    pub children: Vec<u32>,
}

impl LayerCollection {
    /// Wrap `collection` with default flags.
    pub fn new(collection: IdRef) -> Self {
        Self {
            collection,
            flags: LayerCollectionFlags::empty(),
            children: Vec::new(),
        }
    }

    /// Whether this collection is excluded from the view layer.
    pub fn is_excluded(&self) -> bool {
        self.flags.contains(LayerCollectionFlags::EXCLUDE)
    }
}

/// Sequencer data of a scene.
#[derive(Clone, Debug, Default)]
pub struct Editing {
    /// All strips, including the ones nested in meta strips.
    pub strips: Vec<Strip>,
    /// Strips of the top-level channel list.
    pub top_level: Vec<u32>,
}

impl Editing {
    /// Strip at `index`.
    pub fn strip(&self, index: u32) -> Option<&Strip> {
        self.strips.get(index as usize)
    }
}

/// Sequencer strip.
#[derive(Clone, Debug)]
pub struct Strip {
    /// Strip name.
    pub name: String,
    /// Strip type.
    pub kind: StripKind,
    /// Source data.
    pub data: Option<StripData>,
}

impl Strip {
    /// File name of the first source element, when there is one.
    pub fn source_filename(&self) -> Option<&str> {
        self.data.as_ref()?.filename.as_deref()
    }
}

/// Strip type.
#[derive(Clone, Debug)]
pub enum StripKind {
    /// Meta strip holding other strips.
    Meta {
        /// Nested strip indices.
        children: Vec<u32>,
    },
    /// Image sequence.
    Image,
    /// Movie.
    Movie,
    /// Sound.
    Sound,
    /// Scene strip.
    Scene,
    /// Effect strip.
    Effect,
}

/// Source data of a strip.
#[derive(Clone, Debug, Default)]
pub struct StripData {
    /// Directory of the source files.
    pub dir: String,
    /// File name of the first source element.
    pub filename: Option<String>,
}
