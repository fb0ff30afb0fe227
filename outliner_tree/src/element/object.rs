// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Objects, armatures, grease pencil and the sub-data lists they own.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use outliner_data::{
    GreasePencilNodeKind, IdCode, IdData, IdRef, Main, ModifierKind, Object, ObjectMode,
};

use super::{AbstractElement, Construct, CreateContext, anim};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};
use crate::util::{index_i32, index_u32};

/// First index of bone constraint rows, keeping them apart from object constraint rows.
const BONE_CONSTRAINT_INDEX: i32 = 1000;

pub(super) fn expand_object(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    let Some(ob) = builder.main().object(id) else {
        return;
    };
    let owner = Some(Payload::Id(id));
    let parent = Some(node);

    anim::expand_animation_data(builder, node, id);
    builder.add_id(parent, ob.data, 0);

    if let Some(pose) = &ob.pose {
        builder.add_element(parent, owner, ElementKind::PoseBase, 0, true);
        if !pose.groups.is_empty() {
            builder.add_element(parent, owner, ElementKind::PoseGroupBase, 0, true);
        }
    }
    for (a, &material) in ob.materials.iter().enumerate() {
        builder.add_id(parent, material, index_i32(a));
    }
    if !ob.constraints.is_empty() {
        let payload = Payload::Constraints {
            object: id,
            channel: None,
        };
        builder.add_element(parent, Some(payload), ElementKind::ConstraintBase, 0, true);
    }
    if !ob.modifiers.is_empty() {
        builder.add_element(parent, owner, ElementKind::ModifierBase, 0, true);
    }
    if !ob.shader_effects.is_empty() {
        builder.add_element(parent, owner, ElementKind::GpencilEffectBase, 0, true);
    }
    if ob.kind.has_deform_groups() && !ob.deform_groups.is_empty() {
        builder.add_element(parent, owner, ElementKind::DeformGroupBase, 0, true);
    }
    builder.add_id(parent, ob.instance_collection, 0);
}

pub(super) fn expand_armature(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    let Some(arm) = builder.main().armature(id) else {
        return;
    };

    if let Some(edit_bones) = &arm.edit_bones {
        let mut created = Vec::with_capacity(edit_bones.len());
        for a in 0..edit_bones.len() {
            let payload = Payload::EditBone {
                armature: id,
                bone: index_u32(a),
            };
            if let Some(child) =
                builder.add_element(Some(node), Some(payload), ElementKind::EditBone, index_i32(a), true)
            {
                created.push((index_u32(a), child));
            }
        }
        builder.relink_by_parent(&created, |bone| edit_bones.get(bone as usize)?.parent);
        return;
    }

    // The pose lists the bones of an armature object in pose mode.
    if parent_object(builder, node).is_some_and(|ob| ob.mode.contains(ObjectMode::POSE)) {
        return;
    }
    let mut a = 0;
    for bone in arm.child_bones(None) {
        add_bone(builder, node, id, bone, &mut a);
    }
}

/// Object whose datablock row is the parent of `node`.
fn parent_object<'a>(builder: &TreeBuilder<'a>, node: NodeId) -> Option<&'a Object> {
    let tree = builder.tree();
    let parent = tree.get(tree.parent_of(node)?)?;
    if !parent.kind.is(ElementKind::SomeId) || parent.idcode != Some(IdCode::Object) {
        return None;
    }
    builder.main().object(parent.directdata?.id()?)
}

/// Add `bone` and its descendants, numbering rows in depth-first order.
fn add_bone(builder: &mut TreeBuilder<'_>, parent: NodeId, armature: IdRef, bone: u32, a: &mut i32) {
    let payload = Payload::Bone { armature, bone };
    let Some(node) = builder.add_element(Some(parent), Some(payload), ElementKind::Bone, *a, true)
    else {
        return;
    };
    *a += 1;
    let Some(arm) = builder.main().armature(armature) else {
        return;
    };
    for child in arm.child_bones(Some(bone)) {
        add_bone(builder, node, armature, child, a);
    }
}

/// Add the layer tree nodes `nodes` below `parent`, topmost first.
pub(super) fn add_grease_pencil_nodes(
    builder: &mut TreeBuilder<'_>,
    parent: NodeId,
    grease_pencil: IdRef,
    nodes: &[u32],
) {
    for &node in nodes.iter().rev() {
        let payload = Payload::GreasePencilNode {
            grease_pencil,
            node,
        };
        builder.add_element(
            Some(parent),
            Some(payload),
            ElementKind::GreasePencilNode,
            index_i32(node as usize),
            true,
        );
    }
}

fn object<'a>(ctx: &CreateContext<'a>, id: IdRef) -> Option<&'a Object> {
    ctx.main.object(id)
}

macro_rules! list_base {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            /// Object owning the list.
            pub object: IdRef,
        }

        impl Construct for $name {
            fn construct(
                node: &mut TreeNode,
                payload: Payload,
                ctx: &CreateContext<'_>,
            ) -> Option<Self> {
                let object = payload.id()?;
                ctx.main.object(object)?;
                node.name = Cow::Borrowed($label);
                Some(Self { object })
            }
        }
    };
}

list_base!(
    /// "Pose" row of an armature object.
    PoseBaseElement,
    "Pose"
);
list_base!(
    /// "Bone Groups" row.
    PoseGroupBaseElement,
    "Bone Groups"
);
list_base!(
    /// "Modifiers" row.
    ModifierBaseElement,
    "Modifiers"
);
list_base!(
    /// "Effects" row of a grease pencil object.
    GpencilEffectBaseElement,
    "Effects"
);
list_base!(
    /// "Vertex Groups" row.
    DeformGroupBaseElement,
    "Vertex Groups"
);

impl AbstractElement for PoseBaseElement {
    /// Channels are undefined while the armature is in edit mode; the row itself stays.
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(ob) = builder.main().object(self.object) else {
            return;
        };
        let Some(pose) = &ob.pose else {
            return;
        };
        let editing = ob
            .data
            .and_then(|arm| builder.main().armature(arm))
            .is_some_and(|arm| arm.edit_bones.is_some());
        if editing || !ob.mode.contains(ObjectMode::POSE) {
            return;
        }

        let mut created = Vec::with_capacity(pose.channels.len());
        let mut const_index = BONE_CONSTRAINT_INDEX;
        for (a, channel) in pose.channels.iter().enumerate() {
            let payload = Payload::PoseChannel {
                object: self.object,
                channel: index_u32(a),
            };
            let Some(child) = builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::PoseChannel,
                index_i32(a),
                true,
            ) else {
                continue;
            };
            created.push((index_u32(a), child));
            if !channel.constraints.is_empty() {
                let payload = Payload::Constraints {
                    object: self.object,
                    channel: Some(index_u32(a)),
                };
                builder.add_element(
                    Some(child),
                    Some(payload),
                    ElementKind::ConstraintBase,
                    const_index,
                    true,
                );
                const_index += 1;
            }
        }
        builder.relink_by_parent(&created, |channel| pose.channels.get(channel as usize)?.parent);
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Pose)
    }
}

impl AbstractElement for PoseGroupBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(pose) = builder.main().object(self.object).and_then(|ob| ob.pose.as_ref()) else {
            return;
        };
        for a in 0..pose.groups.len() {
            let payload = Payload::PoseGroup {
                object: self.object,
                group: index_u32(a),
            };
            builder.add_element(Some(node), Some(payload), ElementKind::PoseGroup, index_i32(a), true);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Group)
    }
}

impl AbstractElement for ModifierBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(ob) = builder.main().object(self.object) else {
            return;
        };
        for a in 0..ob.modifiers.len() {
            let payload = Payload::Modifier {
                object: self.object,
                modifier: index_u32(a),
            };
            builder.add_element(Some(node), Some(payload), ElementKind::Modifier, index_i32(a), true);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Modifier)
    }
}

impl AbstractElement for GpencilEffectBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(ob) = builder.main().object(self.object) else {
            return;
        };
        for a in 0..ob.shader_effects.len() {
            let payload = Payload::ShaderEffect {
                object: self.object,
                effect: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::GpencilEffect,
                index_i32(a),
                true,
            );
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::ShaderFx)
    }
}

impl AbstractElement for DeformGroupBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(ob) = builder.main().object(self.object) else {
            return;
        };
        for a in 0..ob.deform_groups.len() {
            let payload = Payload::DeformGroup {
                object: self.object,
                group: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::DeformGroup,
                index_i32(a),
                true,
            );
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Group)
    }
}

/// "Constraints" row of an object or of one pose channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConstraintBaseElement {
    /// Object owning the constraints.
    pub object: IdRef,
    /// Pose channel for bone constraints.
    pub channel: Option<u32>,
}

impl Construct for ConstraintBaseElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Constraints { object: id, channel } = payload else {
            return None;
        };
        let ob = object(ctx, id)?;
        if let Some(channel) = channel {
            ob.pose.as_ref()?.channels.get(channel as usize)?;
        }
        node.name = Cow::Borrowed("Constraints");
        Some(Self {
            object: id,
            channel,
        })
    }
}

impl AbstractElement for ConstraintBaseElement {
    /// Bone constraints all share the row index of their list.
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(ob) = builder.main().object(self.object) else {
            return;
        };
        let (constraints, shared_index) = match self.channel {
            None => (&ob.constraints, None),
            Some(channel) => {
                let Some(channel) = ob.pose.as_ref().and_then(|p| p.channels.get(channel as usize))
                else {
                    return;
                };
                let index = builder.tree().get(node).map_or(BONE_CONSTRAINT_INDEX, |n| n.index);
                (&channel.constraints, Some(index))
            }
        };
        for a in 0..constraints.len() {
            let payload = Payload::Constraint {
                object: self.object,
                channel: self.channel,
                constraint: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::Constraint,
                shared_index.unwrap_or(index_i32(a)),
                true,
            );
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Constraint)
    }
}

/// One constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConstraintElement {
    /// Object owning the constraint.
    pub object: IdRef,
    /// Pose channel for bone constraints.
    pub channel: Option<u32>,
    /// Index in its constraint list.
    pub constraint: u32,
}

impl Construct for ConstraintElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Constraint {
            object: id,
            channel,
            constraint,
        } = payload
        else {
            return None;
        };
        let ob = object(ctx, id)?;
        let list = match channel {
            None => &ob.constraints,
            Some(c) => &ob.pose.as_ref()?.channels.get(c as usize)?.constraints,
        };
        node.name = Cow::Owned(list.get(constraint as usize)?.name.clone());
        Some(Self {
            object: id,
            channel,
            constraint,
        })
    }
}

impl AbstractElement for ConstraintElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Constraint)
    }
}

/// One modifier; lists the object or particle system it uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModifierElement {
    /// Object owning the modifier.
    pub object: IdRef,
    /// Index in the modifier stack.
    pub modifier: u32,
}

impl Construct for ModifierElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Modifier {
            object: id,
            modifier,
        } = payload
        else {
            return None;
        };
        let md = object(ctx, id)?.modifiers.get(modifier as usize)?;
        node.name = Cow::Owned(md.name.clone());
        Some(Self {
            object: id,
            modifier,
        })
    }
}

impl AbstractElement for ModifierElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(md) = builder
            .main()
            .object(self.object)
            .and_then(|ob| ob.modifiers.get(self.modifier as usize))
        else {
            return;
        };
        match md.kind {
            ModifierKind::Lattice
            | ModifierKind::Curve
            | ModifierKind::Armature
            | ModifierKind::Hook => {
                builder.add_element(
                    Some(node),
                    md.object.map(Payload::Id),
                    ElementKind::LinkedObject,
                    0,
                    true,
                );
            }
            ModifierKind::ParticleSystem => {
                let payload = md.particle_system.map(|system| Payload::ParticleSystem {
                    object: self.object,
                    system,
                });
                builder.add_element(
                    Some(node),
                    payload,
                    ElementKind::LinkedParticleSystem,
                    0,
                    true,
                );
            }
            ModifierKind::Other => {}
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Modifier)
    }
}

/// One shader effect; lists the object it uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GpencilEffectElement {
    /// Object owning the effect.
    pub object: IdRef,
    /// Index in the effect stack.
    pub effect: u32,
}

impl Construct for GpencilEffectElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::ShaderEffect { object: id, effect } = payload else {
            return None;
        };
        let fx = object(ctx, id)?.shader_effects.get(effect as usize)?;
        node.name = Cow::Owned(fx.name.clone());
        Some(Self { object: id, effect })
    }
}

impl AbstractElement for GpencilEffectElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let target = builder
            .main()
            .object(self.object)
            .and_then(|ob| ob.shader_effects.get(self.effect as usize))
            .and_then(|fx| fx.object);
        builder.add_element(
            Some(node),
            target.map(Payload::Id),
            ElementKind::LinkedObject,
            0,
            true,
        );
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::ShaderFx)
    }
}

/// Object referenced by a modifier, effect or driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkedObjectElement {
    /// The referenced datablock.
    pub id: IdRef,
}

impl Construct for LinkedObjectElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let id = payload.id()?;
        let data = ctx.main.get(id)?;
        node.name = Cow::Owned(data.name.clone());
        node.idcode = Some(data.code());
        Some(Self { id })
    }
}

impl AbstractElement for LinkedObjectElement {}

/// Particle system driven by a modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkedParticleSystemElement {
    /// Object owning the system.
    pub object: IdRef,
    /// Index of the particle system.
    pub system: u32,
}

impl Construct for LinkedParticleSystemElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::ParticleSystem { object: id, system } = payload else {
            return None;
        };
        let psys = object(ctx, id)?.particle_systems.get(system as usize)?;
        node.name = Cow::Owned(psys.name.clone());
        Some(Self { object: id, system })
    }
}

impl AbstractElement for LinkedParticleSystemElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Particles)
    }
}

/// Pose channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoseChannelElement {
    /// Armature object.
    pub object: IdRef,
    /// Channel index.
    pub channel: u32,
}

impl Construct for PoseChannelElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::PoseChannel { object: id, channel } = payload else {
            return None;
        };
        let pchan = object(ctx, id)?.pose.as_ref()?.channels.get(channel as usize)?;
        node.name = Cow::Owned(pchan.name.clone());
        Some(Self {
            object: id,
            channel,
        })
    }
}

impl AbstractElement for PoseChannelElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Bone)
    }
}

/// Bone group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoseGroupElement {
    /// Armature object.
    pub object: IdRef,
    /// Group index.
    pub group: u32,
}

impl Construct for PoseGroupElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::PoseGroup { object: id, group } = payload else {
            return None;
        };
        let grp = object(ctx, id)?.pose.as_ref()?.groups.get(group as usize)?;
        node.name = Cow::Owned(grp.name.clone());
        Some(Self { object: id, group })
    }
}

impl AbstractElement for PoseGroupElement {}

/// Vertex group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeformGroupElement {
    /// Object owning the group.
    pub object: IdRef,
    /// Group index.
    pub group: u32,
}

impl Construct for DeformGroupElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::DeformGroup { object: id, group } = payload else {
            return None;
        };
        let dg = object(ctx, id)?.deform_groups.get(group as usize)?;
        node.name = Cow::Owned(dg.name.clone());
        Some(Self { object: id, group })
    }
}

impl AbstractElement for DeformGroupElement {}

/// Armature bone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoneElement {
    /// Armature.
    pub armature: IdRef,
    /// Bone index.
    pub bone: u32,
}

impl Construct for BoneElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Bone { armature, bone } = payload else {
            return None;
        };
        let data = ctx.main.armature(armature)?.bones.get(bone as usize)?;
        node.name = Cow::Owned(data.name.clone());
        Some(Self { armature, bone })
    }
}

impl AbstractElement for BoneElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Bone)
    }
}

/// Armature edit bone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EditBoneElement {
    /// Armature.
    pub armature: IdRef,
    /// Edit bone index.
    pub bone: u32,
}

impl Construct for EditBoneElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::EditBone { armature, bone } = payload else {
            return None;
        };
        let edit_bones = ctx.main.armature(armature)?.edit_bones.as_ref()?;
        node.name = Cow::Owned(edit_bones.get(bone as usize)?.name.clone());
        Some(Self { armature, bone })
    }
}

impl AbstractElement for EditBoneElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Bone)
    }
}

/// Legacy grease pencil layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GpLayerElement {
    /// Grease pencil datablock.
    pub gpd: IdRef,
    /// Layer index.
    pub layer: u32,
}

impl Construct for GpLayerElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::GpLayer { gpd, layer } = payload else {
            return None;
        };
        let IdData::GpLegacy(data) = &ctx.main.get(gpd)?.data else {
            return None;
        };
        node.name = Cow::Owned(data.layers.get(layer as usize)?.name.clone());
        Some(Self { gpd, layer })
    }
}

impl AbstractElement for GpLayerElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::GpLayer)
    }
}

/// Layer or layer group of a grease pencil datablock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GreasePencilNodeElement {
    /// Grease pencil datablock.
    pub grease_pencil: IdRef,
    /// Node index.
    pub node: u32,
    /// Whether the node is a group.
    pub is_group: bool,
}

impl Construct for GreasePencilNodeElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::GreasePencilNode {
            grease_pencil,
            node: index,
        } = payload
        else {
            return None;
        };
        let IdData::GreasePencil(data) = &ctx.main.get(grease_pencil)?.data else {
            return None;
        };
        let gp_node = data.nodes.get(index as usize)?;
        node.name = Cow::Owned(gp_node.name.clone());
        Some(Self {
            grease_pencil,
            node: index,
            is_group: matches!(gp_node.kind, GreasePencilNodeKind::Group { .. }),
        })
    }
}

impl AbstractElement for GreasePencilNodeElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(IdData::GreasePencil(data)) =
            builder.main().get(self.grease_pencil).map(|id| &id.data)
        else {
            return;
        };
        if let Some(GreasePencilNodeKind::Group { children }) =
            data.nodes.get(self.node as usize).map(|n| &n.kind)
        {
            add_grease_pencil_nodes(builder, node, self.grease_pencil, children);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        (!self.is_group).then_some(Icon::GpLayer)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementKind, OutlinerSettings, SpaceOutliner, Tree};
    use alloc::string::String;
    use alloc::vec::Vec;
    use outliner_data::{IdRef, Main, ObjectMode};

    fn children_named(tree: &Tree, node: crate::NodeId) -> Vec<String> {
        tree.children_of(node)
            .iter()
            .filter_map(|&c| tree.get(c))
            .map(|n| String::from(n.name.as_ref()))
            .collect()
    }

    fn build_open(main: &Main, scene: IdRef) -> SpaceOutliner {
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        testing::open_all(&mut space, main, Some(scene));
        space
    }

    fn preorder_indices(tree: &Tree, node: crate::NodeId, out: &mut Vec<i32>) {
        out.extend(tree.get(node).map(|n| n.index));
        for &child in tree.children_of(node) {
            preorder_indices(tree, child, out);
        }
    }

    fn find_kind(tree: &Tree, kind: ElementKind) -> Option<crate::NodeId> {
        tree.iter()
            .find(|&n| tree.get(n).is_some_and(|n| n.kind.is(kind)))
    }

    #[test]
    fn bones_follow_parent_links() {
        let (main, scene, _) = testing::rigged_scene(ObjectMode::empty(), false);
        let space = build_open(&main, scene);
        let tree = space.tree();

        let root_bone = find_kind(tree, ElementKind::Bone).expect("armature lists its bones");
        assert_eq!(tree.get(root_bone).map(|n| n.name.as_ref()), Some("Root"));
        assert_eq!(children_named(tree, root_bone), ["Spine", "Tail"]);
        let spine = tree.children_of(root_bone)[0];
        assert_eq!(children_named(tree, spine), ["Head"]);
        let mut indices = Vec::new();
        preorder_indices(tree, root_bone, &mut indices);
        assert_eq!(indices, [0, 1, 2, 3], "bone rows are numbered depth first");
    }

    #[test]
    fn edit_bones_are_relinked_after_creation() {
        let (main, scene, _) = testing::rigged_scene(ObjectMode::EDIT, true);
        let space = build_open(&main, scene);
        let tree = space.tree();

        assert!(find_kind(tree, ElementKind::Bone).is_none(), "edit bones replace bones");
        let root = find_kind(tree, ElementKind::EditBone).expect("edit bones are listed");
        assert_eq!(children_named(tree, root), ["Spine", "Tail"]);
        let armature_row = tree.parent_of(root).expect("edit bones hang below the armature");
        assert_eq!(tree.children_of(armature_row).len(), 1, "only the root stays at top");
    }

    #[test]
    fn pose_mode_lists_channels_instead_of_bones() {
        let (main, scene, _) = testing::rigged_scene(ObjectMode::POSE, false);
        let space = build_open(&main, scene);
        let tree = space.tree();

        let pose = find_kind(tree, ElementKind::PoseBase).expect("pose row");
        assert_eq!(children_named(tree, pose), ["Root"]);
        let root = tree.children_of(pose)[0];
        assert_eq!(children_named(tree, root), ["Constraints", "Spine", "Tail"]);

        let constraints = find_kind(tree, ElementKind::ConstraintBase).expect("bone constraints");
        assert!(tree.get(constraints).is_some_and(|n| n.index >= 1000));
        for &c in tree.children_of(constraints) {
            assert_eq!(
                tree.get(c).map(|n| n.index),
                tree.get(constraints).map(|n| n.index),
                "bone constraints share their list's row index"
            );
        }

        let armature_rows: Vec<_> = tree
            .iter()
            .filter(|&n| tree.get(n).is_some_and(|n| n.idcode == Some(outliner_data::IdCode::Armature)))
            .collect();
        assert!(!armature_rows.is_empty());
        assert!(
            armature_rows
                .iter()
                .all(|&a| !tree.children_of(a).iter().any(|&c| tree
                    .get(c)
                    .is_some_and(|n| n.kind.is(ElementKind::Bone)))),
            "bones are hidden below an object in pose mode"
        );
    }
}
