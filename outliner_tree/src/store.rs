// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted rows: per-row state that survives tree rebuilds.

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use outliner_data::{IdCode, IdRef, RnaStructId};

use crate::kind::{ElementKind, KindTag};
use crate::types::StoreFlags;

/// What a persisted row is attached to.
///
/// Real datablocks are keyed by their handle; everything else is keyed by the
/// identity of the data that produced the row.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StoreId {
    /// Nothing; rows whose identity is fully given by kind and index.
    None,
    /// A datablock, or the datablock owning the row's sub-data.
    Id(IdRef),
    /// The database itself ("Current File").
    Main,
    /// One datablock list of the current file or of a library.
    IdList {
        /// Library owning the list, `None` for the current file.
        lib: Option<IdRef>,
        /// Datablock type of the list.
        code: IdCode,
    },
    /// Reflected struct instance.
    Rna(Option<RnaStructId>),
    /// Sequencer strip.
    Strip {
        /// Scene owning the strip.
        scene: IdRef,
        /// Strip index.
        strip: u32,
    },
    /// A static label.
    Label(&'static str),
}

/// Index of a persisted row; stable for the lifetime of the [`TreeStore`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StoreIndex(u32);

impl StoreIndex {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A persisted row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeStoreElem {
    /// Raw kind value; see [`KindTag`].
    pub kind: u16,
    /// Index disambiguating rows of one kind for the same data.
    pub nr: i32,
    /// Persisted state.
    pub flag: StoreFlags,
    /// Matched by a node during the current build.
    pub used: bool,
    /// Identity of the row's data.
    pub id: StoreId,
}

impl TreeStoreElem {
    /// Decoded kind.
    pub fn kind_tag(&self) -> KindTag {
        KindTag::from_raw(self.kind)
    }

    /// Whether the row is collapsed.
    pub fn is_closed(&self) -> bool {
        self.flag.contains(StoreFlags::CLOSED)
    }

    /// Whether the row shows its children: not collapsed, or forced open
    /// because a descendant matches a recursive search.
    pub fn is_open(&self, searching: bool) -> bool {
        !self.is_closed() || (searching && self.flag.contains(StoreFlags::CHILDSEARCH))
    }
}

type StoreKey = (StoreId, u16, i32);

/// Pool of persisted rows with a lookup by `(id, kind, nr)`.
///
/// Several rows may share a key, e.g. one object linked into two collections.
/// A build claims one row per node; [`TreeStore::clear_used`] releases the
/// claims before the next build. Rows created during a build are claimed but
/// keep `used == false`, which is how builders recognize new rows.
#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    rows: Vec<TreeStoreElem>,
    claimed: Vec<bool>,
    lookup: HashMap<StoreKey, SmallVec<[u32; 1]>>,
}

impl TreeStore {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the pool has no rows. An empty pool means the tree was never built.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`.
    pub fn get(&self, index: StoreIndex) -> Option<&TreeStoreElem> {
        self.rows.get(index.idx())
    }

    /// Mutable row at `index`.
    pub fn get_mut(&mut self, index: StoreIndex) -> Option<&mut TreeStoreElem> {
        self.rows.get_mut(index.idx())
    }

    /// All rows with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (StoreIndex, &TreeStoreElem)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (StoreIndex(to_u32(i)), row))
    }

    /// First row for the key not yet claimed in this build, if any.
    pub fn lookup_unused(&self, id: StoreId, kind: u16, nr: i32) -> Option<StoreIndex> {
        let key = (id, kind, normalize_nr(kind, nr));
        self.lookup
            .get(&key)?
            .iter()
            .copied()
            .find(|&i| !self.claimed[i as usize])
            .map(StoreIndex)
    }

    /// Claim the row for a node.
    ///
    /// An unclaimed row with the key is marked used and returned. Otherwise a
    /// new collapsed row is created and claimed, with `used` left false.
    pub fn ensure(&mut self, id: StoreId, kind: u16, nr: i32) -> StoreIndex {
        if let Some(index) = self.lookup_unused(id, kind, nr) {
            self.rows[index.idx()].used = true;
            self.claimed[index.idx()] = true;
            return index;
        }
        let index = self.push(TreeStoreElem {
            kind,
            nr: normalize_nr(kind, nr),
            flag: StoreFlags::CLOSED,
            used: false,
            id,
        });
        self.claimed[index.idx()] = true;
        index
    }

    /// Add a row restored from saved state. Unknown kinds are kept as is.
    pub fn insert_persisted(&mut self, mut row: TreeStoreElem) -> StoreIndex {
        row.nr = normalize_nr(row.kind, row.nr);
        row.used = false;
        self.push(row)
    }

    /// Release all claims and mark every row unused, ahead of a rebuild.
    pub fn clear_used(&mut self) {
        for row in &mut self.rows {
            row.used = false;
        }
        self.claimed.fill(false);
    }

    fn push(&mut self, row: TreeStoreElem) -> StoreIndex {
        let index = to_u32(self.rows.len());
        self.lookup
            .entry((row.id, row.kind, row.nr))
            .or_default()
            .push(index);
        self.rows.push(row);
        self.claimed.push(false);
        StoreIndex(index)
    }
}

/// Datablock rows are keyed by the datablock alone.
fn normalize_nr(kind: u16, nr: i32) -> i32 {
    if kind == ElementKind::SomeId.raw() {
        0
    } else {
        nr
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Row indices are 32-bit by design."
)]
fn to_u32(i: usize) -> u32 {
    i as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: StoreId = StoreId::Label("Label");

    #[test]
    fn new_rows_start_closed_and_unused() {
        let mut store = TreeStore::new();
        let a = store.ensure(LABEL, ElementKind::GenericLabel.raw(), 0);
        let row = store.get(a).unwrap();
        assert!(row.is_closed());
        assert!(!row.used, "a freshly created row is not used");
        assert!(!row.is_open(true), "no search match means no forced opening");
    }

    #[test]
    fn rows_are_reclaimed_after_clear() {
        let mut store = TreeStore::new();
        let a = store.ensure(LABEL, ElementKind::GenericLabel.raw(), 3);
        store.get_mut(a).unwrap().flag.remove(StoreFlags::CLOSED);
        store.clear_used();
        let again = store.ensure(LABEL, ElementKind::GenericLabel.raw(), 3);
        assert_eq!(a, again);
        assert!(store.get(again).unwrap().used);
        assert!(!store.get(again).unwrap().is_closed(), "open state survives");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shared_keys_get_distinct_rows_within_one_build() {
        let mut store = TreeStore::new();
        let a = store.ensure(LABEL, ElementKind::GenericLabel.raw(), 0);
        let b = store.ensure(LABEL, ElementKind::GenericLabel.raw(), 0);
        assert_ne!(a, b, "a claimed row is not handed out twice");
        assert_eq!(store.len(), 2);
        store.clear_used();
        assert_eq!(store.ensure(LABEL, ElementKind::GenericLabel.raw(), 0), a);
        assert_eq!(store.ensure(LABEL, ElementKind::GenericLabel.raw(), 0), b);
    }

    #[test]
    fn datablock_rows_ignore_index() {
        let mut store = TreeStore::new();
        let a = store.ensure(StoreId::Main, ElementKind::SomeId.raw(), 7);
        assert_eq!(store.get(a).unwrap().nr, 0);
        store.clear_used();
        assert_eq!(store.lookup_unused(StoreId::Main, 0, 2), Some(a));
    }

    #[test]
    fn unknown_kinds_survive() {
        let mut store = TreeStore::new();
        let index = store.insert_persisted(TreeStoreElem {
            kind: 999,
            nr: 1,
            flag: StoreFlags::SELECTED,
            used: true,
            id: StoreId::None,
        });
        let row = store.get(index).unwrap();
        assert_eq!(row.kind_tag(), KindTag::Unrecognized(999));
        assert!(!row.used);
        assert_eq!(store.lookup_unused(StoreId::None, 999, 1), Some(index));
    }
}
