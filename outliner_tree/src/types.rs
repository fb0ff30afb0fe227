// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the outliner tree: node identifiers, flags and icons.

use outliner_data::IdCode;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-build node flags. They live only as long as the node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u16 {
        /// Drawn as the active row.
        const ACTIVE                  = 1 << 0;
        /// Merged into its parent's icon row while collapsed.
        const ICONROW                 = 1 << 1;
        /// Children exist but were not built; draw a disclosure triangle anyway.
        const PRETEND_HAS_CHILDREN    = 1 << 2;
        /// Object listed under its parent object although it is not in that collection.
        const CHILD_NOT_IN_COLLECTION = 1 << 3;
        /// The element reports a warning.
        const HAS_WARNING             = 1 << 4;
        /// Being dragged.
        const DRAGGING                = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Persisted row flags. They survive rebuilds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StoreFlags: u16 {
        /// Collapsed.
        const CLOSED      = 1 << 0;
        /// Selected.
        const SELECTED    = 1 << 1;
        /// Being renamed.
        const TEXTBUT     = 1 << 2;
        /// Open because a descendant matches the active search.
        const CHILDSEARCH = 1 << 3;
        /// Matches the active search.
        const SEARCHMATCH = 1 << 4;
        /// Highlighted under the cursor.
        const HIGHLIGHTED = 1 << 5;
        /// Drop target: into.
        const DRAG_INTO   = 1 << 6;
        /// Drop target: before.
        const DRAG_BEFORE = 1 << 7;
        /// Drop target: after.
        const DRAG_AFTER  = 1 << 8;
        /// Active row.
        const ACTIVE      = 1 << 9;
        /// Active while walk-navigating.
        const ACTIVE_WALK = 1 << 10;
    }
}

/// Icon requested for a row.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Icon {
    /// Datablock type icon.
    Id(IdCode),
    /// Library whose file is missing.
    LibraryMissing,
    /// Library override data.
    LibraryOverride,
    /// Item added by an override.
    OverrideAdded,
    /// Animation data.
    AnimData,
    /// Drivers.
    Drivers,
    /// NLA tracks.
    Nla,
    /// Bone.
    Bone,
    /// Pose.
    Pose,
    /// Constraint.
    Constraint,
    /// Modifier.
    Modifier,
    /// Vertex group.
    Group,
    /// Particles.
    Particles,
    /// Shader effect.
    ShaderFx,
    /// View layer.
    RenderLayer,
    /// Collection row of a view layer.
    Collection,
    /// Sequencer strip.
    Strip,
    /// Reflected data.
    Rna,
    /// Grease pencil layer.
    GpLayer,
    /// Action slot.
    ActionSlot,
    /// Blank icon.
    Blank,
}
