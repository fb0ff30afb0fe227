// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concrete elements: one type per [`ElementKind`], dispatched through [`Element`].
//!
//! Constructors name their node and record what they need for expansion.
//! Expansion only reads the database and appends children through the
//! [`TreeBuilder`].

mod anim;
mod common;
mod id;
mod object;
mod overrides;
mod rna;
mod scene;
mod sequencer;

use outliner_data::{IdCode, Main};

use crate::builder::TreeBuilder;
use crate::kind::{ElementKind, KindTag};
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};

pub use anim::{
    ActionSlotElement, AnimDataElement, DriverBaseElement, NlaActionElement, NlaElement,
    NlaTrackElement,
};
pub use common::{GenericLabelElement, IdBaseElement};
pub use id::{IdElement, IdElementKind};
pub use object::{
    BoneElement, ConstraintBaseElement, ConstraintElement, DeformGroupBaseElement,
    DeformGroupElement, EditBoneElement, GpLayerElement, GpencilEffectBaseElement,
    GpencilEffectElement, GreasePencilNodeElement, LinkedObjectElement,
    LinkedParticleSystemElement, ModifierBaseElement, ModifierElement, PoseBaseElement,
    PoseChannelElement, PoseGroupBaseElement, PoseGroupElement,
};
pub use overrides::{OverrideOperationElement, OverridePropertyElement, OverridesBaseElement};
pub use rna::{RnaArrayItemElement, RnaPropertyElement, RnaStructElement};
pub use scene::{
    LayerCollectionElement, SceneCollectionBaseElement, SceneObjectsBaseElement,
    ViewCollectionBaseElement, ViewLayerBaseElement, ViewLayerElement,
};
pub use sequencer::{StripDataElement, StripDupElement, StripElement};

/// Capabilities every element provides. Defaults describe a leaf.
pub trait AbstractElement {
    /// Whether the element may expand below `node` at all.
    fn expand_poll(&self, _builder: &TreeBuilder<'_>, _node: NodeId) -> bool {
        true
    }

    /// Whether [`AbstractElement::expand`] can run, e.g. the reflected data is valid.
    fn is_expand_valid(&self) -> bool {
        true
    }

    /// Append children of `node`. Called at most once per node and build.
    fn expand(&self, _builder: &mut TreeBuilder<'_>, _node: NodeId) {}

    /// Problem to show next to the row; empty if none.
    fn warning(&self, _main: &Main) -> &'static str {
        ""
    }

    /// Icon overriding the per-datablock-type icon.
    fn icon(&self, _main: &Main) -> Option<Icon> {
        None
    }
}

/// What a constructor may know about the node's future parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParentInfo {
    /// Kind of the parent row.
    pub kind: KindTag,
    /// Datablock type of the parent, for datablock rows.
    pub idcode: Option<IdCode>,
    /// Element of the parent.
    pub element: Option<Element>,
}

impl ParentInfo {
    /// Snapshot of `node`.
    pub fn of(node: &TreeNode) -> Self {
        Self {
            kind: node.kind,
            idcode: node.idcode,
            element: node.element,
        }
    }
}

/// Inputs of the element factory besides the node and its payload.
#[derive(Copy, Clone, Debug)]
pub struct CreateContext<'a> {
    /// Database the payload refers into.
    pub main: &'a Main,
    /// Parent of the node being created, `None` for roots.
    pub parent: Option<ParentInfo>,
}

/// Per-kind constructor used by the factory.
///
/// Returns `None` when the payload does not fit the kind or refers to
/// missing data.
pub(crate) trait Construct: Sized {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self>;
}

/// Element types that can be recovered from an [`Element`] with
/// [`Tree::element_as`](crate::Tree::element_as).
pub trait ElementVariant: Sized {
    /// Kind this type implements.
    const KIND: ElementKind;

    /// Borrow the concrete element if `element` is of this type.
    fn from_element(element: &Element) -> Option<&Self>;
}

macro_rules! elements {
    ($($variant:ident($ty:ident),)*) => {
        /// Concrete element of a node, one variant per [`ElementKind`] of the same name.
        #[derive(Copy, Clone, Debug, PartialEq)]
        #[allow(missing_docs, reason = "Each variant is documented by its element type.")]
        pub enum Element {
            $($variant($ty),)*
        }

        impl Element {
            /// Kind implemented by this element.
            pub fn kind(&self) -> ElementKind {
                match self {
                    $(Self::$variant(_) => ElementKind::$variant,)*
                }
            }

            fn as_abstract(&self) -> &dyn AbstractElement {
                match self {
                    $(Self::$variant(e) => e,)*
                }
            }

            fn construct(
                kind: ElementKind,
                node: &mut TreeNode,
                payload: Payload,
                ctx: &CreateContext<'_>,
            ) -> Option<Self> {
                match kind {
                    $(ElementKind::$variant => {
                        <$ty as Construct>::construct(node, payload, ctx).map(Self::$variant)
                    })*
                }
            }
        }

        $(
            impl ElementVariant for $ty {
                const KIND: ElementKind = ElementKind::$variant;

                fn from_element(element: &Element) -> Option<&Self> {
                    match element {
                        Element::$variant(e) => Some(e),
                        _ => None,
                    }
                }
            }
        )*
    };
}

elements! {
    SomeId(IdElement),
    Nla(NlaElement),
    NlaAction(NlaActionElement),
    DeformGroupBase(DeformGroupBaseElement),
    DeformGroup(DeformGroupElement),
    Bone(BoneElement),
    EditBone(EditBoneElement),
    ConstraintBase(ConstraintBaseElement),
    Constraint(ConstraintElement),
    ModifierBase(ModifierBaseElement),
    Modifier(ModifierElement),
    LinkedObject(LinkedObjectElement),
    PoseBase(PoseBaseElement),
    PoseChannel(PoseChannelElement),
    AnimData(AnimDataElement),
    DriverBase(DriverBaseElement),
    ViewLayerBase(ViewLayerBaseElement),
    ViewLayer(ViewLayerElement),
    PoseGroupBase(PoseGroupBaseElement),
    PoseGroup(PoseGroupElement),
    Strip(StripElement),
    StripData(StripDataElement),
    StripDup(StripDupElement),
    LinkedParticleSystem(LinkedParticleSystemElement),
    RnaStruct(RnaStructElement),
    RnaProperty(RnaPropertyElement),
    RnaArrayElement(RnaArrayItemElement),
    NlaTrack(NlaTrackElement),
    IdBase(IdBaseElement),
    GpLayer(GpLayerElement),
    LayerCollection(LayerCollectionElement),
    SceneCollectionBase(SceneCollectionBaseElement),
    ViewCollectionBase(ViewCollectionBaseElement),
    SceneObjectsBase(SceneObjectsBaseElement),
    GpencilEffectBase(GpencilEffectBaseElement),
    GpencilEffect(GpencilEffectElement),
    LibraryOverrideBase(OverridesBaseElement),
    LibraryOverrideProperty(OverridePropertyElement),
    LibraryOverrideOperation(OverrideOperationElement),
    GenericLabel(GenericLabelElement),
    GreasePencilNode(GreasePencilNodeElement),
    ActionSlot(ActionSlotElement),
}

impl Element {
    /// Build the element for a node of kind `kind`.
    ///
    /// The constructor names `node` as a side effect. Produces nothing for a
    /// null payload, an unrecognized kind, or a payload that does not fit the
    /// kind; the node then stays inert.
    pub fn create_from_type(
        kind: KindTag,
        node: &mut TreeNode,
        payload: Option<Payload>,
        ctx: &CreateContext<'_>,
    ) -> Option<Self> {
        let payload = payload?;
        let KindTag::Known(kind) = kind else {
            tracing::debug!(raw = kind.raw(), "no element for unrecognized kind");
            return None;
        };
        let element = Self::construct(kind, node, payload, ctx);
        if element.is_none() {
            tracing::warn!(?kind, ?payload, "payload rejected by element constructor");
        }
        element
    }
}

impl AbstractElement for Element {
    fn expand_poll(&self, builder: &TreeBuilder<'_>, node: NodeId) -> bool {
        self.as_abstract().expand_poll(builder, node)
    }

    fn is_expand_valid(&self) -> bool {
        self.as_abstract().is_expand_valid()
    }

    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        self.as_abstract().expand(builder, node);
    }

    fn warning(&self, main: &Main) -> &'static str {
        self.as_abstract().warning(main)
    }

    fn icon(&self, main: &Main) -> Option<Icon> {
        self.as_abstract().icon(main)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreId, TreeStore};
    use crate::testing;
    use outliner_data::{Id, IdData, RnaPointer};

    fn blank_node(kind: KindTag) -> TreeNode {
        let mut store = TreeStore::new();
        let row = store.ensure(StoreId::None, kind.raw(), 0);
        TreeNode::new(kind, row, 0)
    }

    #[test]
    fn unrecognized_kinds_produce_nothing() {
        let (main, ..) = testing::scene_with_two_objects();
        let ctx = CreateContext {
            main: &main,
            parent: None,
        };
        let any_id = main.iter().map(|(r, _)| r).next();
        for raw in [12_u16, 17, 49, 777, u16::MAX] {
            let tag = KindTag::from_raw(raw);
            let mut node = blank_node(tag);
            let element = Element::create_from_type(tag, &mut node, any_id.map(Payload::Id), &ctx);
            assert!(element.is_none(), "raw kind {raw} must not construct");
            assert!(node.name.is_empty(), "inert nodes keep the default name");
        }
    }

    #[test]
    fn null_payload_produces_nothing() {
        let main = Main::new();
        let ctx = CreateContext {
            main: &main,
            parent: None,
        };
        for kind in ElementKind::ALL {
            let mut node = blank_node(kind.into());
            assert!(
                Element::create_from_type(kind.into(), &mut node, None, &ctx).is_none(),
                "{kind:?} with a null payload"
            );
        }
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let main = Main::new();
        let ctx = CreateContext {
            main: &main,
            parent: None,
        };
        let mut node = blank_node(ElementKind::Bone.into());
        let payload = Payload::Rna(RnaPointer::NULL);
        assert!(
            Element::create_from_type(ElementKind::Bone.into(), &mut node, Some(payload), &ctx)
                .is_none(),
            "a bone needs a bone payload"
        );
    }

    #[test]
    fn deprecated_ids_are_rejected() {
        let mut main = Main::new();
        let ipo = main.add(Id::new("OldCurve", IdData::Other(IdCode::Ipo)));
        let ctx = CreateContext {
            main: &main,
            parent: None,
        };
        let mut node = blank_node(ElementKind::SomeId.into());
        let element = Element::create_from_type(
            ElementKind::SomeId.into(),
            &mut node,
            Some(Payload::Id(ipo)),
            &ctx,
        );
        assert!(element.is_none(), "deprecated types never get an element");
    }

    #[test]
    fn id_elements_pick_specialization() {
        let (main, scene, [ob_a, _]) = testing::scene_with_two_objects();
        let ctx = CreateContext {
            main: &main,
            parent: None,
        };
        for (id, expected) in [(scene, IdElementKind::Scene), (ob_a, IdElementKind::Object)] {
            let mut node = blank_node(ElementKind::SomeId.into());
            let element = Element::create_from_type(
                ElementKind::SomeId.into(),
                &mut node,
                Some(Payload::Id(id)),
                &ctx,
            );
            let Some(Element::SomeId(element)) = element else {
                panic!("datablock payload should build an id element");
            };
            assert_eq!(element.kind, expected);
            assert_eq!(node.name, main.get(id).map_or("", |d| d.name.as_str()));
        }
    }
}
