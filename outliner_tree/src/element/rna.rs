// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reflected data: structs, properties and array items.
//!
//! Children are only built below open rows. Collapsed rows with content get
//! [`ElementFlags::PRETEND_HAS_CHILDREN`] instead, so the browser stays cheap
//! on deep or cyclic data.

use alloc::borrow::Cow;
use alloc::format;

use outliner_data::{Main, PropertyType, RnaPointer};

use super::{AbstractElement, Construct, CreateContext, Element};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{ElementFlags, Icon, NodeId, StoreFlags};
use crate::util::{index_i32, index_u32};

/// Upper bound on the children listed for one reflected row.
const MAX_INDEX: usize = i16::MAX as usize;

/// Rows named "RNA" are not opened by a recursive search.
fn stop_search_descent(builder: &mut TreeBuilder<'_>, node: NodeId) {
    if !builder.is_searching() {
        return;
    }
    let is_rna = builder
        .tree()
        .get(node)
        .is_some_and(|n| n.name.eq_ignore_ascii_case("RNA"));
    if is_rna && let Some(row) = builder.row_mut(node) {
        row.flag.remove(StoreFlags::CHILDSEARCH);
    }
}

/// Add children through `add` when `node` is open; otherwise only flag that there are some.
fn add_children_if_open(
    builder: &mut TreeBuilder<'_>,
    node: NodeId,
    count: usize,
    mut add: impl FnMut(&mut TreeBuilder<'_>, usize),
) {
    let count = count.min(MAX_INDEX);
    if builder.is_open(node) {
        for index in 0..count {
            add(builder, index);
        }
    } else if count > 0
        && let Some(n) = builder.tree_mut().get_mut(node)
    {
        n.flag.insert(ElementFlags::PRETEND_HAS_CHILDREN);
    }
}

/// Reflected struct instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RnaStructElement {
    /// The instance.
    pub ptr: RnaPointer,
}

impl Construct for RnaStructElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Rna(ptr) = payload else {
            return None;
        };
        node.name = match ctx.main.rna().deref(ptr) {
            Some(s) => Cow::Owned(s.display_name().into()),
            None => Cow::Borrowed("(empty)"),
        };
        Some(Self { ptr })
    }
}

impl AbstractElement for RnaStructElement {
    fn is_expand_valid(&self) -> bool {
        self.ptr.is_valid()
    }

    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        stop_search_descent(builder, node);
        let Some(data) = builder.main().rna().deref(self.ptr) else {
            return;
        };

        // Top-level structs and pointer targets open when first shown.
        let tree = builder.tree();
        let parent_property = tree
            .parent_of(node)
            .and_then(|p| tree.element(p))
            .and_then(|e| match e {
                Element::RnaProperty(p) => Some(*p),
                _ => None,
            });
        let auto_open = parent_property.is_none_or(|p| p.kind(builder.main()) == Some(PropertyType::Pointer));
        if auto_open {
            builder.uncollapse_by_default(node);
        }

        let ptr = self.ptr;
        let properties = &data.properties;
        add_children_if_open(builder, node, properties.len(), |builder, index| {
            if !properties[index].is_hidden() {
                let payload = Payload::RnaProperty {
                    ptr,
                    prop: index_u32(index),
                };
                builder.add_element(
                    Some(node),
                    Some(payload),
                    ElementKind::RnaProperty,
                    index_i32(index),
                    true,
                );
            }
        });
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Rna)
    }
}

/// Property of a reflected struct.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RnaPropertyElement {
    /// Struct owning the property.
    pub ptr: RnaPointer,
    /// Property index.
    pub prop: u32,
}

impl RnaPropertyElement {
    /// Type of the property, if it still exists.
    pub fn kind(&self, main: &Main) -> Option<PropertyType> {
        main.rna().property(self.ptr, self.prop).map(|p| p.kind())
    }
}

impl Construct for RnaPropertyElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::RnaProperty { ptr, prop } = payload else {
            return None;
        };
        if !ptr.is_valid() {
            node.name = Cow::Borrowed("(empty)");
            return Some(Self { ptr, prop });
        }
        node.name = Cow::Owned(ctx.main.rna().property(ptr, prop)?.ui_name.clone());
        Some(Self { ptr, prop })
    }
}

impl AbstractElement for RnaPropertyElement {
    fn is_expand_valid(&self) -> bool {
        self.ptr.is_valid()
    }

    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        stop_search_descent(builder, node);
        let Some(property) = builder.main().rna().property(self.ptr, self.prop) else {
            return;
        };
        match property.kind() {
            PropertyType::Pointer => {
                let Some(target) = property.pointer().filter(RnaPointer::is_valid) else {
                    return;
                };
                add_children_if_open(builder, node, 1, |builder, _| {
                    builder.add_element(
                        Some(node),
                        Some(Payload::Rna(target)),
                        ElementKind::RnaStruct,
                        -1,
                        true,
                    );
                });
            }
            PropertyType::Collection => {
                let items = property.collection_items();
                add_children_if_open(builder, node, items.len(), |builder, index| {
                    builder.add_element(
                        Some(node),
                        Some(Payload::Rna(items[index])),
                        ElementKind::RnaStruct,
                        index_i32(index),
                        true,
                    );
                });
            }
            PropertyType::Boolean | PropertyType::Int | PropertyType::Float => {
                let payload = Payload::RnaArrayElement {
                    ptr: self.ptr,
                    prop: self.prop,
                };
                let len = property.array_length() as usize;
                add_children_if_open(builder, node, len, |builder, index| {
                    builder.add_element(
                        Some(node),
                        Some(payload),
                        ElementKind::RnaArrayElement,
                        index_i32(index),
                        true,
                    );
                });
            }
            PropertyType::String | PropertyType::Enum => {}
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Rna)
    }
}

/// One item of an array property; the item index is the node's index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RnaArrayItemElement {
    /// Struct owning the property.
    pub ptr: RnaPointer,
    /// Property index.
    pub prop: u32,
}

impl Construct for RnaArrayItemElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::RnaArrayElement { ptr, prop } = payload else {
            return None;
        };
        let below_property = ctx
            .parent
            .is_some_and(|p| matches!(p.element, Some(Element::RnaProperty(_))));
        debug_assert!(below_property, "array items are created below their property");
        if !below_property {
            return None;
        }
        let property = ctx.main.rna().property(ptr, prop)?;
        let item = u32::try_from(node.index).ok()?;
        node.name = Cow::Owned(match property.array_item_char(item) {
            Some(c) => format!("  {c}"),
            None => format!("  {}", item + 1),
        });
        Some(Self { ptr, prop })
    }
}

impl AbstractElement for RnaArrayItemElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Rna)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementFlags, ElementKind, OutlinerSettings, SpaceOutliner, Tree};
    use alloc::string::String;
    use alloc::vec::Vec;

    fn names(tree: &Tree, kind: ElementKind) -> Vec<String> {
        tree.iter()
            .filter_map(|n| tree.get(n))
            .filter(|n| n.kind.is(kind))
            .map(|n| String::from(n.name.as_ref()))
            .collect()
    }

    #[test]
    fn collapsed_properties_pretend_to_have_children() {
        let main = testing::rna_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::DataApi));
        space.rebuild(testing::source(&main, None));
        let tree = space.tree();

        assert_eq!(tree.roots().len(), 1);
        let root = tree.roots()[0];
        assert_eq!(tree.get(root).map(|n| n.name.as_ref()), Some("Blend Data"));
        assert_eq!(
            names(tree, ElementKind::RnaProperty),
            ["Objects", "Frame"],
            "hidden properties are skipped"
        );
        for &prop in tree.children_of(root) {
            assert!(tree.children_of(prop).is_empty(), "collapsed rows build nothing");
            assert!(
                tree.get(prop)
                    .is_some_and(|n| n.flag.contains(ElementFlags::PRETEND_HAS_CHILDREN)),
                "but still show a disclosure triangle"
            );
        }
    }

    #[test]
    fn opening_builds_one_more_level() {
        let main = testing::rna_database();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::DataApi));
        testing::open_all(&mut space, &main, None);
        let tree = space.tree();

        assert_eq!(names(tree, ElementKind::RnaStruct), ["Blend Data", "Cube", "Lamp"]);
        assert_eq!(
            names(tree, ElementKind::RnaArrayElement),
            ["  X", "  Y", "  Z", "  X", "  Y", "  Z", "  1", "  2"]
        );
    }
}
