// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use outliner_data::{IdCode, IdRef, LinkFlags, Main};

use super::{TreeDisplay, list_ids};
use crate::builder::TreeBuilder;
use crate::element::{Element, GenericLabelElement};
use crate::kind::ElementKind;
use crate::payload::{IdBaseKind, Payload};
use crate::types::{ElementFlags, Icon, NodeId};

/// Override hierarchies of the current file and of each library, walked
/// along datablock references from each hierarchy root.
///
/// Only rows that are open get their children built.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct OverrideHierarchiesDisplay;

const EMPTY_LABEL: &str = "No Library Overrides";

impl TreeDisplay for OverrideHierarchiesDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let main = builder.main();
        let current = builder.add_element(
            None,
            Some(Payload::IdBase(IdBaseKind::CurrentFile)),
            ElementKind::IdBase,
            -1,
            true,
        );
        if let Some(current) = current {
            builder.uncollapse_by_default(current);
            build_hierarchy_for_lib_or_main(builder, current, None);
            if builder.tree().children_of(current).is_empty() {
                add_placeholder(builder, current);
            }
        }

        for lib in list_ids(main, IdCode::Library) {
            if let Some(node) = builder.add_id(None, Some(lib), 0) {
                build_hierarchy_for_lib_or_main(builder, node, Some(lib));
            }
        }

        let empty_libraries: Vec<NodeId> = builder
            .tree()
            .roots()
            .iter()
            .copied()
            .filter(|&root| Some(root) != current && builder.tree().children_of(root).is_empty())
            .collect();
        for root in empty_libraries {
            builder.tree_mut().remove(root);
        }
    }

    fn is_lazily_built(&self) -> bool {
        true
    }
}

fn add_placeholder(builder: &mut TreeBuilder<'_>, parent: NodeId) {
    let node = builder.add_element(
        Some(parent),
        Some(Payload::Label(EMPTY_LABEL)),
        ElementKind::GenericLabel,
        0,
        true,
    );
    if let Some(node) = node.and_then(|n| builder.tree_mut().get_mut(n)) {
        let label = GenericLabelElement::new(EMPTY_LABEL, Some(Icon::LibraryOverride));
        node.element = Some(Element::GenericLabel(label));
    }
}

/// One group per datablock type below `parent`, listing the hierarchy roots
/// owned by `lib`, each with its hierarchy.
fn build_hierarchy_for_lib_or_main(builder: &mut TreeBuilder<'_>, parent: NodeId, lib: Option<IdRef>) {
    let main = builder.main();
    let mut bases: HashMap<IdCode, NodeId> = HashMap::new();
    let mut base_index = 0;
    for code in IdCode::ALL {
        for id in list_ids(main, code) {
            if !main.is_hierarchy_root(id) || main.get(id).map(|d| d.lib) != Some(lib) {
                continue;
            }
            let base = match bases.get(&code) {
                Some(&base) => base,
                None => {
                    let payload = Payload::IdBase(IdBaseKind::List { lib, code });
                    let Some(base) = builder.add_element(
                        Some(parent),
                        Some(payload),
                        ElementKind::IdBase,
                        base_index,
                        true,
                    ) else {
                        continue;
                    };
                    base_index += 1;
                    bases.insert(code, base);
                    base
                }
            };
            let Some(node) =
                builder.add_element(Some(base), Some(Payload::Id(id)), ElementKind::SomeId, 0, false)
            else {
                continue;
            };
            HierarchyWalk::new(id).build(builder, node);
        }
    }
}

/// Walks the datablocks of one override hierarchy.
struct HierarchyWalk {
    root: IdRef,
    /// Datablocks from the root down to the one being expanded.
    ancestors: Vec<IdRef>,
}

impl HierarchyWalk {
    fn new(root: IdRef) -> Self {
        Self {
            root,
            ancestors: Vec::new(),
        }
    }

    fn build(mut self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        self.expand(builder, self.root, node);
    }

    fn expand(&mut self, builder: &mut TreeBuilder<'_>, parent_id: IdRef, node: NodeId) {
        let main = builder.main();
        self.ancestors.push(parent_id);
        let mut siblings = HashSet::new();
        for id in natural_hierarchy_children(main, parent_id) {
            if id == parent_id || !is_in_override_hierarchy(main, id, self.root) {
                continue;
            }
            if self.ancestors.contains(&id) {
                tracing::trace!(?id, ?parent_id, "skipping reference back up the hierarchy");
                continue;
            }
            if siblings.contains(&id) {
                tracing::trace!(?id, ?parent_id, "skipping repeated reference");
                continue;
            }
            if !builder.is_open(node) {
                if let Some(n) = builder.tree_mut().get_mut(node) {
                    n.flag.insert(ElementFlags::PRETEND_HAS_CHILDREN);
                }
                break;
            }
            let Some(child) =
                builder.add_element(Some(node), Some(Payload::Id(id)), ElementKind::SomeId, 0, false)
            else {
                continue;
            };
            siblings.insert(id);
            self.expand(builder, id, child);
        }
        self.ancestors.pop();
    }
}

/// Datablocks referenced by `parent_id`, in reference order, as they should
/// appear below it.
///
/// Objects with a parent are replaced by their parent object. Objects list
/// their child objects after their own references.
fn natural_hierarchy_children(main: &Main, parent_id: IdRef) -> Vec<IdRef> {
    let mut out = Vec::new();
    main.foreach_id_link(parent_id, |link| {
        if link.flags.contains(LinkFlags::LOOPBACK) {
            return;
        }
        let Some(target) = link.target else {
            return;
        };
        match main.object(target).and_then(|ob| ob.parent) {
            Some(parent) => out.push(parent),
            None => out.push(target),
        }
    });
    if main.object(parent_id).is_some() {
        out.extend(
            main.ids_of(IdCode::Object)
                .filter(|&ob| main.object(ob).is_some_and(|o| o.parent == Some(parent_id))),
        );
    }
    out
}

/// Whether `id` belongs to the override hierarchy rooted at `root`.
///
/// Embedded data and shape keys carry no override data of their own; their
/// owner stands in.
fn is_in_override_hierarchy(main: &Main, id: IdRef, root: IdRef) -> bool {
    let Some(real) = main.override_owner(id) else {
        return false;
    };
    main.is_override_real(real) && main.hierarchy_root(real) == Some(root)
}
