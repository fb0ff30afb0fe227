// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data handed to the element factory.

use outliner_data::{IdCode, IdRef, Main, RnaPointer};

use crate::store::StoreId;

/// Grouping row variants of [`ElementKind::IdBase`](crate::ElementKind::IdBase).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IdBaseKind {
    /// The current file as a whole.
    CurrentFile,
    /// One datablock list of the current file or of a library.
    List {
        /// Owning library, `None` for the current file.
        lib: Option<IdRef>,
        /// Datablock type of the list.
        code: IdCode,
    },
}

/// What a node represents.
///
/// Sub-data is addressed by its owning datablock plus an index into the
/// owner's list, so payloads stay `Copy` and never borrow the database.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Payload {
    /// A datablock. Also used by list rows that belong to one datablock
    /// (modifier stack, animation data, view layer list, ...).
    Id(IdRef),
    /// NLA track of a datablock's animation data.
    NlaTrack {
        /// Datablock owning the animation data.
        owner: IdRef,
        /// Track index.
        track: u32,
    },
    /// Armature bone.
    Bone {
        /// Armature.
        armature: IdRef,
        /// Bone index.
        bone: u32,
    },
    /// Armature edit bone.
    EditBone {
        /// Armature.
        armature: IdRef,
        /// Edit bone index.
        bone: u32,
    },
    /// Pose channel of an armature object.
    PoseChannel {
        /// Object.
        object: IdRef,
        /// Channel index.
        channel: u32,
    },
    /// Bone group of an armature object.
    PoseGroup {
        /// Object.
        object: IdRef,
        /// Group index.
        group: u32,
    },
    /// Constraint list of an object or of one of its pose channels.
    Constraints {
        /// Object.
        object: IdRef,
        /// Pose channel, `None` for object constraints.
        channel: Option<u32>,
    },
    /// Constraint.
    Constraint {
        /// Object.
        object: IdRef,
        /// Pose channel, `None` for object constraints.
        channel: Option<u32>,
        /// Constraint index.
        constraint: u32,
    },
    /// Vertex group.
    DeformGroup {
        /// Object.
        object: IdRef,
        /// Group index.
        group: u32,
    },
    /// Modifier.
    Modifier {
        /// Object.
        object: IdRef,
        /// Modifier index.
        modifier: u32,
    },
    /// Particle system.
    ParticleSystem {
        /// Object.
        object: IdRef,
        /// System index.
        system: u32,
    },
    /// Grease pencil shader effect.
    ShaderEffect {
        /// Object.
        object: IdRef,
        /// Effect index.
        effect: u32,
    },
    /// Legacy grease pencil layer.
    GpLayer {
        /// Grease pencil datablock.
        gpd: IdRef,
        /// Layer index.
        layer: u32,
    },
    /// Grease pencil layer tree node.
    GreasePencilNode {
        /// Grease pencil datablock.
        grease_pencil: IdRef,
        /// Node index.
        node: u32,
    },
    /// Slot of a layered action.
    ActionSlot {
        /// Action.
        action: IdRef,
        /// Slot index.
        slot: u32,
    },
    /// View layer of a scene.
    ViewLayer {
        /// Scene.
        scene: IdRef,
        /// View layer index.
        layer: u32,
    },
    /// Layer collection of a view layer.
    LayerCollection {
        /// Scene.
        scene: IdRef,
        /// View layer index.
        layer: u32,
        /// Layer collection index.
        index: u32,
        /// Wrapped collection.
        collection: IdRef,
    },
    /// Sequencer strip, its source data, or a group of strips sharing a file.
    Strip {
        /// Scene owning the strip.
        scene: IdRef,
        /// Strip index.
        strip: u32,
    },
    /// Reflected struct.
    Rna(RnaPointer),
    /// Property of a reflected struct.
    RnaProperty {
        /// Struct owning the property.
        ptr: RnaPointer,
        /// Property index.
        prop: u32,
    },
    /// Item of a reflected array property; the item index is the node index.
    RnaArrayElement {
        /// Struct owning the property.
        ptr: RnaPointer,
        /// Property index.
        prop: u32,
    },
    /// Overridden property.
    OverrideProperty {
        /// Override datablock.
        id: IdRef,
        /// Property index.
        prop: u32,
    },
    /// Operation of an overridden property.
    OverrideOperation {
        /// Override datablock.
        id: IdRef,
        /// Property index.
        prop: u32,
        /// Operation index.
        op: u32,
    },
    /// Static text.
    Label(&'static str),
    /// Grouping row.
    IdBase(IdBaseKind),
}

impl Payload {
    /// The datablock, for [`Payload::Id`].
    pub fn id(&self) -> Option<IdRef> {
        match *self {
            Self::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Key of the persisted row for this payload.
    pub fn store_id(&self) -> StoreId {
        match *self {
            Self::Id(id)
            | Self::NlaTrack { owner: id, .. }
            | Self::Bone { armature: id, .. }
            | Self::EditBone { armature: id, .. }
            | Self::PoseChannel { object: id, .. }
            | Self::PoseGroup { object: id, .. }
            | Self::Constraints { object: id, .. }
            | Self::Constraint { object: id, .. }
            | Self::DeformGroup { object: id, .. }
            | Self::Modifier { object: id, .. }
            | Self::ParticleSystem { object: id, .. }
            | Self::ShaderEffect { object: id, .. }
            | Self::GpLayer { gpd: id, .. }
            | Self::GreasePencilNode {
                grease_pencil: id, ..
            }
            | Self::ActionSlot { action: id, .. }
            | Self::ViewLayer { scene: id, .. }
            | Self::LayerCollection { collection: id, .. }
            | Self::OverrideProperty { id, .. }
            | Self::OverrideOperation { id, .. } => StoreId::Id(id),
            Self::Strip { scene, strip } => StoreId::Strip { scene, strip },
            Self::Rna(ptr) | Self::RnaProperty { ptr, .. } | Self::RnaArrayElement { ptr, .. } => {
                StoreId::Rna(ptr.data)
            }
            Self::Label(text) => StoreId::Label(text),
            Self::IdBase(IdBaseKind::CurrentFile) => StoreId::Main,
            Self::IdBase(IdBaseKind::List { lib, code }) => StoreId::IdList { lib, code },
        }
    }

    /// Whether this is a datablock of a type that is no longer created.
    pub(crate) fn is_deprecated_id(&self, main: &Main) -> bool {
        self.id()
            .and_then(|id| main.get(id))
            .is_some_and(|id| id.code().is_deprecated())
    }
}
