// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use outliner_data::{IdRef, Main};

use super::{TreeDisplay, id_lists, list_ids};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::{IdBaseKind, Payload};

/// Overridden properties of every local override, grouped by type.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct OverridePropertiesDisplay;

fn is_local_override(main: &Main, id: IdRef) -> bool {
    main.is_override_real(id) && main.get(id).is_some_and(|d| !d.is_linked())
}

impl TreeDisplay for OverridePropertiesDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let main = builder.main();
        let filtered = builder.settings().id_filter().is_some();
        for (a, code) in id_lists(builder) {
            let overrides: Vec<IdRef> = list_ids(main, code)
                .filter(|&id| is_local_override(main, id))
                .collect();
            if overrides.is_empty() {
                continue;
            }
            let group = if filtered {
                None
            } else {
                let payload = Payload::IdBase(IdBaseKind::List { lib: None, code });
                builder.add_element(None, Some(payload), ElementKind::IdBase, a, true)
            };
            for id in overrides {
                let Some(node) = builder.add_element(
                    group,
                    Some(Payload::Id(id)),
                    ElementKind::LibraryOverrideBase,
                    0,
                    true,
                ) else {
                    continue;
                };
                if builder.tree().children_of(node).is_empty() {
                    builder.tree_mut().remove(node);
                }
            }
            if let Some(group) = group
                && builder.tree().children_of(group).is_empty()
            {
                builder.tree_mut().remove(group);
            }
        }

        let roots: Vec<_> = builder.tree().roots().to_vec();
        for root in roots {
            builder.uncollapse_by_default(root);
        }
    }
}
