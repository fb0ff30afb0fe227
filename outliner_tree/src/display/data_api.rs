// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use outliner_data::RnaPointer;

use super::TreeDisplay;
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;

/// Reflected data browser, rooted at the database.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DataApiDisplay;

impl TreeDisplay for DataApiDisplay {
    fn build_tree(&self, builder: &mut TreeBuilder<'_>) {
        let show_opened = builder.store().is_empty();
        let Some(root) = builder.main().rna_root() else {
            tracing::debug!("database has no reflected root");
            return;
        };
        let ptr = RnaPointer::new(None, root);
        let node = builder.add_element(None, Some(Payload::Rna(ptr)), ElementKind::RnaStruct, -1, true);
        if show_opened && let Some(node) = node {
            builder.open(node);
        }
    }

    fn is_lazily_built(&self) -> bool {
        true
    }
}
