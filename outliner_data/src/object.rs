// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object data and the sub-data lists owned by objects, armatures and grease pencil.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::IdRef;

/// Kind of object, which decides what obdata it carries.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// Empty, no obdata.
    #[default]
    Empty,
    /// Mesh object.
    Mesh,
    /// Curve object.
    Curve,
    /// Metaball object.
    MetaBall,
    /// Lattice object.
    Lattice,
    /// Armature object.
    Armature,
    /// Legacy grease pencil object.
    GpLegacy,
    /// Grease pencil object.
    GreasePencil,
    /// Light object.
    Light,
    /// Camera object.
    Camera,
}

impl ObjectKind {
    /// Whether objects of this kind carry vertex groups.
    pub const fn has_deform_groups(self) -> bool {
        matches!(self, Self::Mesh | Self::GpLegacy | Self::Lattice)
    }
}

bitflags::bitflags! {
    /// Interaction modes an object can be in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectMode: u8 {
        /// Edit mode.
        const EDIT = 1 << 0;
        /// Pose mode.
        const POSE = 1 << 1;
        /// Sculpt mode.
        const SCULPT = 1 << 2;
        /// Weight paint mode.
        const WEIGHT_PAINT = 1 << 3;
    }
}

/// Object datablock payload.
#[derive(Clone, Debug, Default)]
pub struct Object {
    /// Kind of object.
    pub kind: ObjectKind,
    /// Obdata (mesh, armature, ...).
    pub data: Option<IdRef>,
    /// Parent object.
    pub parent: Option<IdRef>,
    /// Object-level material slots.
    pub materials: Vec<Option<IdRef>>,
    /// Modifier stack.
    pub modifiers: Vec<Modifier>,
    /// Object constraints.
    pub constraints: Vec<Constraint>,
    /// Pose of an armature object.
    pub pose: Option<Pose>,
    /// Vertex groups.
    pub deform_groups: Vec<DeformGroup>,
    /// Particle systems.
    pub particle_systems: Vec<ParticleSystem>,
    /// Grease pencil shader effects.
    pub shader_effects: Vec<ShaderEffect>,
    /// Collection instanced by this object.
    pub instance_collection: Option<IdRef>,
    /// Current interaction mode.
    pub mode: ObjectMode,
}

/// Type of a modifier, as far as the outliner cares.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ModifierKind {
    /// Lattice deform.
    Lattice,
    /// Curve deform.
    Curve,
    /// Armature deform.
    Armature,
    /// Hook.
    Hook,
    /// Particle system.
    ParticleSystem,
    /// Anything else.
    #[default]
    Other,
}

/// Entry of an object's modifier stack.
#[derive(Clone, Debug, Default)]
pub struct Modifier {
    /// Modifier name.
    pub name: String,
    /// Modifier type.
    pub kind: ModifierKind,
    /// Object used by deform and hook modifiers.
    pub object: Option<IdRef>,
    /// Index into the owner's particle systems for particle modifiers.
    pub particle_system: Option<u32>,
}

/// Object or bone constraint.
#[derive(Clone, Debug, Default)]
pub struct Constraint {
    /// Constraint name.
    pub name: String,
    /// Target object.
    pub target: Option<IdRef>,
}

/// Pose of an armature object.
#[derive(Clone, Debug, Default)]
pub struct Pose {
    /// Pose channels, one per bone.
    pub channels: Vec<PoseChannel>,
    /// Bone groups.
    pub groups: Vec<BoneGroup>,
}

/// Pose channel.
#[derive(Clone, Debug, Default)]
pub struct PoseChannel {
    /// Channel name.
    pub name: String,
    /// Index of the parent channel.
    pub parent: Option<u32>,
    /// Bone constraints.
    pub constraints: Vec<Constraint>,
}

/// Bone group of a pose.
#[derive(Clone, Debug, Default)]
pub struct BoneGroup {
    /// Group name.
    pub name: String,
}

/// Vertex group.
#[derive(Clone, Debug, Default)]
pub struct DeformGroup {
    /// Group name.
    pub name: String,
}

/// Particle system.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    /// System name.
    pub name: String,
}

/// Grease pencil shader effect.
#[derive(Clone, Debug, Default)]
pub struct ShaderEffect {
    /// Effect name.
    pub name: String,
    /// Object used by the effect, if any.
    pub object: Option<IdRef>,
}

/// Armature bone.
#[derive(Clone, Debug, Default)]
pub struct Bone {
    /// Bone name.
    pub name: String,
    /// Index of the parent bone.
    pub parent: Option<u32>,
}

/// Armature edit bone.
#[derive(Clone, Debug, Default)]
pub struct EditBone {
    /// Bone name.
    pub name: String,
    /// Index of the parent edit bone.
    pub parent: Option<u32>,
}

/// Legacy grease pencil layer.
#[derive(Clone, Debug, Default)]
pub struct GpLayer {
    /// Layer name.
    pub name: String,
}

/// Node of a grease pencil layer tree.
#[derive(Clone, Debug)]
pub struct GreasePencilNode {
    /// Display name.
    pub name: String,
    /// Layer or group.
    pub kind: GreasePencilNodeKind,
}

/// Layer tree node kind.
#[derive(Clone, Debug)]
pub enum GreasePencilNodeKind {
    /// Drawing layer.
    Layer,
    /// Group holding other nodes.
    Group {
        /// Child node indices, in display order.
        children: Vec<u32>,
    },
}
