// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::kind::{ElementKind, KindTag};

/// Failure of a checked element access such as [`Tree::element_as`](crate::Tree::element_as).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// The node was removed.
    #[error("node is no longer part of the tree")]
    StaleNode,
    /// The node exists but carries no element, e.g. an unrecognized kind.
    #[error("node has no element")]
    NoElement,
    /// The node's element is of another kind.
    #[error("expected a {expected:?} element, found {found:?}")]
    KindMismatch {
        /// Kind asked for.
        expected: ElementKind,
        /// Kind of the node.
        found: KindTag,
    },
}
