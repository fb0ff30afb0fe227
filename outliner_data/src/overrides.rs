// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Library override records.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::IdRef;

/// Override of a linked datablock.
#[derive(Clone, Debug, Default)]
pub struct LibraryOverride {
    /// Linked datablock being overridden. Overrides without a reference are
    /// placeholders, not real overrides.
    pub reference: Option<IdRef>,
    /// Root of the override hierarchy this override belongs to.
    pub hierarchy_root: Option<IdRef>,
    /// Overridden properties.
    pub properties: Vec<OverrideProperty>,
}

/// One overridden property.
#[derive(Clone, Debug, Default)]
pub struct OverrideProperty {
    /// Path of the property, relative to the owning datablock.
    pub rna_path: String,
    /// Generated by the override system itself rather than by a user edit.
    pub is_system: bool,
    /// Operations applied to the property.
    pub operations: Vec<OverrideOperation>,
}

/// Operation kind of an override.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum OverrideOpKind {
    /// Value replaced.
    #[default]
    Replace,
    /// Item inserted into a collection after the anchor.
    InsertAfter,
    /// Item inserted into a collection before the anchor.
    InsertBefore,
}

impl OverrideOpKind {
    /// Whether the operation adds an item to a collection.
    pub const fn is_insertion(self) -> bool {
        matches!(self, Self::InsertAfter | Self::InsertBefore)
    }
}

/// Operation applied by an override property.
#[derive(Clone, Debug, Default)]
pub struct OverrideOperation {
    /// What the operation does.
    pub kind: OverrideOpKind,
    /// Local name of the affected collection item.
    pub subitem_name: Option<String>,
    /// Local index of the affected collection item.
    pub subitem_index: Option<i32>,
}
