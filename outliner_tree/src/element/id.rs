// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;

use outliner_data::{IdData, IdFlags, IdRef, Main};

use super::{AbstractElement, Construct, CreateContext, anim, object, scene};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};
use crate::util::{index_i32, index_u32};

/// Specialization of a datablock row, chosen from the datablock's type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IdElementKind {
    /// Scene.
    Scene,
    /// Object.
    Object,
    /// Mesh.
    Mesh,
    /// Curve.
    Curve,
    /// Metaball.
    MetaBall,
    /// Armature.
    Armature,
    /// Collection.
    Collection,
    /// Action.
    Action,
    /// Library.
    Library,
    /// Texture.
    Texture,
    /// Freestyle line style.
    LineStyle,
    /// Legacy grease pencil.
    GpLegacy,
    /// Grease pencil.
    GreasePencil,
    /// Any other type; lists animation data only.
    Generic,
}

impl IdElementKind {
    fn of(data: &IdData) -> Self {
        match data {
            IdData::Scene(_) => Self::Scene,
            IdData::Object(_) => Self::Object,
            IdData::Mesh(_) => Self::Mesh,
            IdData::Curve(_) => Self::Curve,
            IdData::MetaBall(_) => Self::MetaBall,
            IdData::Armature(_) => Self::Armature,
            IdData::Collection(_) => Self::Collection,
            IdData::Action(_) => Self::Action,
            IdData::Library(_) => Self::Library,
            IdData::Texture(_) => Self::Texture,
            IdData::LineStyle(_) => Self::LineStyle,
            IdData::GpLegacy(_) => Self::GpLegacy,
            IdData::GreasePencil(_) => Self::GreasePencil,
            IdData::Key(_) | IdData::Other(_) => Self::Generic,
        }
    }
}

/// A datablock row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdElement {
    /// The datablock.
    pub id: IdRef,
    /// Specialization.
    pub kind: IdElementKind,
}

impl Construct for IdElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let id = payload.id()?;
        let data = ctx.main.get(id)?;
        if data.code().is_deprecated() {
            return None;
        }
        node.name = match &data.data {
            IdData::Library(lib) => Cow::Owned(lib.filepath.clone()),
            IdData::Collection(c) if c.is_master => Cow::Borrowed("Scene Collection"),
            _ => Cow::Owned(data.name.clone()),
        };
        node.idcode = Some(data.code());
        Some(Self {
            id,
            kind: IdElementKind::of(&data.data),
        })
    }
}

impl AbstractElement for IdElement {
    /// Datablocks listed right below their grouping row stay collapsed to a
    /// single row, unless the view is filtered to one type.
    fn expand_poll(&self, builder: &TreeBuilder<'_>, node: NodeId) -> bool {
        let tree = builder.tree();
        let below_base = tree
            .parent_of(node)
            .and_then(|p| tree.get(p))
            .is_some_and(|p| p.kind.is(ElementKind::IdBase));
        !below_base || builder.settings().id_filter().is_some()
    }

    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let id = self.id;
        match self.kind {
            IdElementKind::Scene => scene::expand_scene(builder, node, id),
            IdElementKind::Object => object::expand_object(builder, node, id),
            IdElementKind::Armature => object::expand_armature(builder, node, id),
            IdElementKind::Collection => scene::expand_collection(builder, node, id),
            IdElementKind::Mesh | IdElementKind::Curve | IdElementKind::MetaBall => {
                expand_geometry(builder, node, id);
            }
            IdElementKind::Action => expand_action(builder, node, id),
            IdElementKind::Texture => expand_texture(builder, node, id),
            IdElementKind::LineStyle => expand_line_style(builder, node, id),
            IdElementKind::GpLegacy => expand_gp_legacy(builder, node, id),
            IdElementKind::GreasePencil => expand_grease_pencil(builder, node, id),
            IdElementKind::Library => {}
            IdElementKind::Generic => anim::expand_animation_data(builder, node, id),
        }
    }

    fn warning(&self, main: &Main) -> &'static str {
        if self.kind != IdElementKind::Library {
            return "";
        }
        let Some(lib) = main.get(self.id) else {
            return "";
        };
        if lib.flags.contains(IdFlags::MISSING) {
            "Missing library"
        } else if lib.flags.contains(IdFlags::LIB_RESYNC_REQUIRED) {
            "Contains linked library overrides that need to be resynced, updating the library is recommended"
        } else {
            ""
        }
    }

    fn icon(&self, main: &Main) -> Option<Icon> {
        let missing = self.kind == IdElementKind::Library
            && main
                .get(self.id)
                .is_some_and(|lib| lib.flags.contains(IdFlags::MISSING));
        missing.then_some(Icon::LibraryMissing)
    }
}

/// Mesh, curve and metaball: animation, shape keys (meshes only), materials.
fn expand_geometry(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    let Some(data) = builder.main().get(id) else {
        return;
    };
    let geometry = match &data.data {
        IdData::Mesh(g) => {
            builder.add_id(Some(node), g.key, 0);
            g
        }
        IdData::Curve(g) | IdData::MetaBall(g) => g,
        _ => return,
    };
    for (a, &material) in geometry.materials.iter().enumerate() {
        builder.add_id(Some(node), material, index_i32(a));
    }
}

fn expand_action(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    let Some(IdData::Action(action)) = builder.main().get(id).map(|d| &d.data) else {
        return;
    };
    for a in 0..action.slots.len() {
        let payload = Payload::ActionSlot {
            action: id,
            slot: index_u32(a),
        };
        builder.add_element(
            Some(node),
            Some(payload),
            ElementKind::ActionSlot,
            index_i32(a),
            true,
        );
    }
}

fn expand_texture(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    if let Some(IdData::Texture(texture)) = builder.main().get(id).map(|d| &d.data) {
        builder.add_id(Some(node), texture.image, 0);
    }
}

fn expand_line_style(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    let Some(IdData::LineStyle(style)) = builder.main().get(id).map(|d| &d.data) else {
        return;
    };
    for (a, &texture) in style.textures.iter().enumerate() {
        builder.add_id(Some(node), texture, index_i32(a));
    }
}

/// Layers are listed top to bottom.
fn expand_gp_legacy(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    let Some(IdData::GpLegacy(gpd)) = builder.main().get(id).map(|d| &d.data) else {
        return;
    };
    for (index, layer) in (0..gpd.layers.len()).rev().enumerate() {
        let payload = Payload::GpLayer {
            gpd: id,
            layer: index_u32(layer),
        };
        builder.add_element(
            Some(node),
            Some(payload),
            ElementKind::GpLayer,
            index_i32(index),
            true,
        );
    }
}

fn expand_grease_pencil(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    anim::expand_animation_data(builder, node, id);
    let Some(IdData::GreasePencil(gp)) = builder.main().get(id).map(|d| &d.data) else {
        return;
    };
    object::add_grease_pencil_nodes(builder, node, id, &gp.root);
}
