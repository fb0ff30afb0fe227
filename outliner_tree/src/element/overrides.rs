// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Library override rows: the overridden properties of a datablock.

use alloc::borrow::Cow;

use outliner_data::{
    IdFlags, IdRef, Main, OverrideOperation, OverrideProperty, PropertyType, RnaPointer,
    RnaProperty,
};

use super::{AbstractElement, Construct, CreateContext};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::space::FilterFlags;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};
use crate::util::index_u32;

/// Overridden property `prop` of `id`.
fn override_property(main: &Main, id: IdRef, prop: u32) -> Option<&OverrideProperty> {
    main.get(id)?
        .override_library
        .as_ref()?
        .properties
        .get(prop as usize)
}

/// Reflected property addressed by an override path, with the struct owning it.
fn resolve<'a>(main: &'a Main, id: IdRef, path: &str) -> Option<(RnaPointer, &'a RnaProperty)> {
    let root = main.get(id)?.rna?;
    let (owner, index) = main.rna().resolve_path(root, path)?;
    let ptr = RnaPointer::new(Some(id), owner);
    Some((ptr, main.rna().property(ptr, index)?))
}

/// Override data of a datablock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverridesBaseElement {
    /// The override.
    pub id: IdRef,
}

impl Construct for OverridesBaseElement {
    /// Named after the datablock unless listed below the datablock's own row.
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let id = payload.id()?;
        let data = ctx.main.get(id)?;
        data.override_library.as_ref()?;
        let below_id = ctx.parent.is_some_and(|p| {
            p.kind.is(ElementKind::SomeId) || p.kind.is(ElementKind::LayerCollection)
        });
        node.name = if below_id {
            Cow::Borrowed("Library Overrides")
        } else {
            Cow::Owned(data.name.clone())
        };
        Some(Self { id })
    }
}

impl AbstractElement for OverridesBaseElement {
    /// Properties generated by the override system are hidden unless asked for.
    /// Properties whose path no longer resolves are always listed.
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let main = builder.main();
        let Some(overrides) = main.get(self.id).and_then(|d| d.override_library.as_ref()) else {
            return;
        };
        let show_system = builder
            .settings()
            .filter
            .contains(FilterFlags::SHOW_SYSTEM_OVERRIDES);
        let mut index = 0;
        for (a, property) in overrides.properties.iter().enumerate() {
            let valid = resolve(main, self.id, &property.rna_path).is_some();
            if valid && property.is_system && !show_system {
                continue;
            }
            let payload = Payload::OverrideProperty {
                id: self.id,
                prop: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::LibraryOverrideProperty,
                index,
                true,
            );
            index += 1;
        }
    }

    fn warning(&self, main: &Main) -> &'static str {
        let Some(data) = main.get(self.id) else {
            return "";
        };
        if data.flags.contains(IdFlags::OVERRIDE_RESYNC_LEFTOVER) {
            "This override data-block is not needed anymore, but was detected as user-edited"
        } else if main.is_override_real(self.id) && main.real_users(self.id) == 0 {
            "This override data-block is unused"
        } else {
            ""
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::LibraryOverride)
    }
}

/// One overridden property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverridePropertyElement {
    /// The override.
    pub id: IdRef,
    /// Index of the overridden property.
    pub prop: u32,
    /// Whether the property path still resolves.
    pub is_path_valid: bool,
}

impl Construct for OverridePropertyElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::OverrideProperty { id, prop } = payload else {
            return None;
        };
        let property = override_property(ctx.main, id, prop)?;
        node.name = Cow::Owned(property.rna_path.clone());
        Some(Self {
            id,
            prop,
            is_path_valid: resolve(ctx.main, id, &property.rna_path).is_some(),
        })
    }
}

impl AbstractElement for OverridePropertyElement {
    /// Insertions into collection properties are listed as operations.
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let main = builder.main();
        let Some(property) = override_property(main, self.id, self.prop) else {
            return;
        };
        let is_collection = resolve(main, self.id, &property.rna_path)
            .is_some_and(|(_, p)| p.kind() == PropertyType::Collection);
        if !is_collection {
            return;
        }
        let mut index = 0;
        for (a, op) in property.operations.iter().enumerate() {
            if !op.kind.is_insertion() {
                continue;
            }
            let payload = Payload::OverrideOperation {
                id: self.id,
                prop: self.prop,
                op: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::LibraryOverrideOperation,
                index,
                true,
            );
            index += 1;
        }
    }

    fn warning(&self, _main: &Main) -> &'static str {
        if self.is_path_valid {
            ""
        } else {
            "This override property does not exist in current data, it will be removed on next .blend file save"
        }
    }
}

/// Item inserted into a collection property by an override.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverrideOperationElement {
    /// The override.
    pub id: IdRef,
    /// Index of the overridden property.
    pub prop: u32,
    /// Index of the operation.
    pub op: u32,
}

impl OverrideOperationElement {
    fn operation<'a>(&self, main: &'a Main) -> Option<(&'a OverrideProperty, &'a OverrideOperation)> {
        let property = override_property(main, self.id, self.prop)?;
        Some((property, property.operations.get(self.op as usize)?))
    }

    /// Collection item the operation inserted.
    fn item(&self, main: &Main) -> Option<RnaPointer> {
        let (property, op) = self.operation(main)?;
        let (_, collection) = resolve(main, self.id, &property.rna_path)?;
        let index = usize::try_from(op.subitem_index?).ok()?;
        collection.collection_items().get(index).copied()
    }
}

impl Construct for OverrideOperationElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::OverrideOperation { id, prop, op } = payload else {
            return None;
        };
        let this = Self { id, prop, op };
        let (_, operation) = this.operation(ctx.main)?;
        node.name = match &operation.subitem_name {
            Some(name) => Cow::Owned(name.clone()),
            None => match this.item(ctx.main).and_then(|ptr| ctx.main.rna().deref(ptr)) {
                Some(item) => Cow::Owned(item.display_name().into()),
                None => Cow::Borrowed("Unknown"),
            },
        };
        Some(this)
    }
}

impl AbstractElement for OverrideOperationElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let item = self.item(builder.main());
        if item.is_some_and(|ptr| ptr.is_valid()) {
            builder.add_element(
                Some(node),
                item.map(Payload::Rna),
                ElementKind::RnaStruct,
                -1,
                true,
            );
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::OverrideAdded)
    }
}
