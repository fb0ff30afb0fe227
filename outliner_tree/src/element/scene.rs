// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenes, view layers and collections.

use alloc::borrow::Cow;

use outliner_data::{IdCode, IdRef, Main};

use super::{AbstractElement, Construct, CreateContext, anim};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};
use crate::util::{index_i32, index_u32};

pub(super) fn expand_scene(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    let Some(scene) = builder.main().scene(id) else {
        return;
    };
    let this = Some(Payload::Id(id));
    builder.add_element(Some(node), this, ElementKind::ViewLayerBase, 0, true);
    builder.add_id(Some(node), scene.world, 0);
    builder.add_element(Some(node), this, ElementKind::SceneCollectionBase, 0, true);
    builder.add_element(Some(node), this, ElementKind::SceneObjectsBase, 0, true);
    anim::expand_animation_data(builder, node, id);
}

/// Collections instanced by an object are not expanded.
pub(super) fn expand_collection(builder: &mut TreeBuilder<'_>, node: NodeId, id: IdRef) {
    let tree = builder.tree();
    let instanced = tree
        .parent_of(node)
        .and_then(|p| tree.get(p))
        .is_some_and(|p| p.idcode == Some(IdCode::Object));
    if !instanced {
        expand_collection_contents(builder, node, id);
    }
}

/// Child collections, then objects, of `collection` below `node`.
///
/// Objects whose parent is listed next to them are moved below it.
pub(crate) fn expand_collection_contents(
    builder: &mut TreeBuilder<'_>,
    node: NodeId,
    collection: IdRef,
) {
    let Some(data) = builder.main().collection(collection) else {
        return;
    };
    for &child in &data.children {
        builder.add_id(Some(node), Some(child), 0);
    }
    for &object in &data.objects {
        builder.add_id(Some(node), Some(object), 0);
    }
    if !data.objects.is_empty() {
        builder.make_object_parent_hierarchy(Some(node));
    }
}

macro_rules! scene_base {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            /// The scene.
            pub scene: IdRef,
        }

        impl Construct for $name {
            fn construct(
                node: &mut TreeNode,
                payload: Payload,
                ctx: &CreateContext<'_>,
            ) -> Option<Self> {
                let scene = payload.id()?;
                ctx.main.scene(scene)?;
                node.name = Cow::Borrowed($label);
                Some(Self { scene })
            }
        }
    };
}

scene_base!(
    /// "View Layers" row of a scene.
    ViewLayerBaseElement,
    "View Layers"
);
scene_base!(
    /// "Scene Collection" row of a scene, listing the master collection's contents.
    SceneCollectionBaseElement,
    "Scene Collection"
);
scene_base!(
    /// "Objects" row listing every object of a scene.
    SceneObjectsBaseElement,
    "Objects"
);

impl AbstractElement for ViewLayerBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(scene) = builder.main().scene(self.scene) else {
            return;
        };
        for a in 0..scene.view_layers.len() {
            let payload = Payload::ViewLayer {
                scene: self.scene,
                layer: index_u32(a),
            };
            builder.add_element(Some(node), Some(payload), ElementKind::ViewLayer, index_i32(a), true);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::RenderLayer)
    }
}

impl AbstractElement for SceneCollectionBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        if let Some(master) = builder.main().scene(self.scene).and_then(|s| s.master_collection) {
            expand_collection_contents(builder, node, master);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Collection)
    }
}

impl AbstractElement for SceneObjectsBaseElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        for object in builder.main().scene_objects(self.scene) {
            builder.add_id(Some(node), Some(object), 0);
        }
        builder.make_object_parent_hierarchy(Some(node));
    }
}

/// A view layer. Its contents are added by the view layer display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ViewLayerElement {
    /// Scene owning the layer.
    pub scene: IdRef,
    /// Layer index.
    pub layer: u32,
}

impl Construct for ViewLayerElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::ViewLayer { scene, layer } = payload else {
            return None;
        };
        node.name = Cow::Owned(ctx.main.view_layer(scene, layer)?.name.clone());
        Some(Self { scene, layer })
    }
}

impl AbstractElement for ViewLayerElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::RenderLayer)
    }
}

/// "Scene Collection" row of one view layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ViewCollectionBaseElement {
    /// Scene owning the layer.
    pub scene: IdRef,
    /// Layer index.
    pub layer: u32,
}

impl Construct for ViewCollectionBaseElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::ViewLayer { scene, layer } = payload else {
            return None;
        };
        ctx.main.view_layer(scene, layer)?;
        node.name = Cow::Borrowed("Scene Collection");
        Some(Self { scene, layer })
    }
}

impl AbstractElement for ViewCollectionBaseElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Collection)
    }
}

/// A collection as seen by one view layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerCollectionElement {
    /// Scene owning the layer.
    pub scene: IdRef,
    /// Layer index.
    pub layer: u32,
    /// Index of the layer collection.
    pub index: u32,
    /// Wrapped collection.
    pub collection: IdRef,
}

impl Construct for LayerCollectionElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::LayerCollection {
            scene,
            layer,
            index,
            collection,
        } = payload
        else {
            return None;
        };
        let lc = ctx.main.view_layer(scene, layer)?.layer_collection(index)?;
        if lc.collection != collection {
            return None;
        }
        let id = ctx.main.get(collection)?;
        node.name = match ctx.main.collection(collection) {
            Some(c) if c.is_master => Cow::Borrowed("Scene Collection"),
            _ => Cow::Owned(id.name.clone()),
        };
        node.idcode = Some(IdCode::Collection);
        Some(Self {
            scene,
            layer,
            index,
            collection,
        })
    }
}

impl AbstractElement for LayerCollectionElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Collection)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementKind, OutlinerSettings, SpaceOutliner};
    use outliner_data::IdCode;

    #[test]
    fn instanced_collections_stay_collapsed() {
        let (main, scene, instancer, instanced) = testing::instancing_scene();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        let tree = space.tree();

        let below_object: alloc::vec::Vec<_> = tree
            .iter()
            .filter(|&n| {
                tree.get(n)
                    .is_some_and(|n| n.directdata.and_then(|d| d.id()) == Some(instanced))
            })
            .filter(|&n| {
                tree.parent_of(n)
                    .and_then(|p| tree.get(p))
                    .is_some_and(|p| p.directdata.and_then(|d| d.id()) == Some(instancer))
            })
            .collect();
        assert!(!below_object.is_empty(), "instance collection is listed");
        for n in below_object {
            assert!(tree.children_of(n).is_empty(), "but not expanded below its object");
        }

        let elsewhere = tree.iter().find(|&n| {
            tree.get(n).is_some_and(|node| {
                node.kind.is(ElementKind::SomeId)
                    && node.idcode == Some(IdCode::Collection)
                    && node.directdata.and_then(|d| d.id()) == Some(instanced)
                    && !tree.children_of(n).is_empty()
            })
        });
        assert!(elsewhere.is_some(), "the same collection expands inside the scene");
    }
}
