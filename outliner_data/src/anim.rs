// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation data attached to datablocks.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::IdRef;

/// Animation data of a datablock.
#[derive(Clone, Debug, Default)]
pub struct AnimData {
    /// Active action.
    pub action: Option<IdRef>,
    /// Drivers.
    pub drivers: Vec<Driver>,
    /// NLA tracks, bottom to top.
    pub nla_tracks: Vec<NlaTrack>,
}

impl AnimData {
    /// Whether there is anything worth listing.
    pub fn is_populated(&self) -> bool {
        self.action.is_some() || !self.drivers.is_empty() || !self.nla_tracks.is_empty()
    }
}

/// A driver curve with its variable targets.
#[derive(Clone, Debug, Default)]
pub struct Driver {
    /// Path of the driven property.
    pub rna_path: String,
    /// Datablocks read by the driver variables, in variable order.
    pub targets: Vec<Option<IdRef>>,
}

/// NLA track.
#[derive(Clone, Debug, Default)]
pub struct NlaTrack {
    /// Track name.
    pub name: String,
    /// Strips on this track.
    pub strips: Vec<NlaStrip>,
}

/// NLA strip.
#[derive(Clone, Debug, Default)]
pub struct NlaStrip {
    /// Strip name.
    pub name: String,
    /// Action played by the strip.
    pub action: Option<IdRef>,
}

/// Slot of a layered action.
#[derive(Clone, Debug, Default)]
pub struct ActionSlot {
    /// Display name.
    pub name: String,
}
