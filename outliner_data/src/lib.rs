// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outliner Data: the datablock model browsed by the outliner tree.
//!
//! This crate is a plain in-memory stand-in for an application's scene database. It holds
//! exactly the information [`outliner_tree`](https://docs.rs/outliner_tree) needs to build its
//! trees, and nothing about drawing or editing.
//!
//! - [`Main`]: datablocks addressed by [`IdRef`] handles, iterated per [`IdCode`].
//! - [`Id`] and [`IdData`]: a datablock and its type-specific payload (scenes, objects,
//!   armatures, collections, libraries, ...).
//! - [`LibraryOverride`]: override records with hierarchy roots and overridden properties.
//! - [`RnaRegistry`]: data-driven reflection with typed properties and path resolution.
//!
//! Introspection queries mirror what a tree builder asks of a database:
//! [`Main::ids_of`], [`Main::foreach_id_link`], [`Main::real_users`],
//! [`Main::is_override_real`], [`Main::is_hierarchy_root`], [`Main::scene_objects`] and
//! [`IdCode::plural_name`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod anim;
mod database;
mod id;
mod object;
mod overrides;
mod rna;
mod scene;

pub use anim::{ActionSlot, AnimData, Driver, NlaStrip, NlaTrack};
pub use database::{IdLink, LinkFlags, Main};
pub use id::{
    Action, Armature, Collection, Geometry, GpLegacy, GreasePencil, Id, IdCode, IdData, IdFlags,
    IdRef, Key, Library, LineStyle, Texture,
};
pub use object::{
    Bone, BoneGroup, Constraint, DeformGroup, EditBone, GpLayer, GreasePencilNode,
    GreasePencilNodeKind, Modifier, ModifierKind, Object, ObjectKind, ObjectMode,
    ParticleSystem, Pose, PoseChannel, ShaderEffect,
};
pub use overrides::{LibraryOverride, OverrideOpKind, OverrideOperation, OverrideProperty};
pub use rna::{
    PropertyFlags, PropertySubtype, PropertyType, PropertyValue, RnaPointer, RnaProperty,
    RnaRegistry, RnaStruct, RnaStructId,
};
pub use scene::{
    Editing, LayerCollection, LayerCollectionFlags, Scene, Strip, StripData, StripKind, ViewLayer,
};
