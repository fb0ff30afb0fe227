// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;

use outliner_data::Main;

use super::{AbstractElement, Construct, CreateContext};
use crate::payload::{IdBaseKind, Payload};
use crate::tree::TreeNode;
use crate::types::Icon;

/// Row showing a fixed text, e.g. a placeholder in an empty view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenericLabelElement {
    text: &'static str,
    icon: Option<Icon>,
}

impl GenericLabelElement {
    /// Label showing `text`, optionally with an icon.
    pub const fn new(text: &'static str, icon: Option<Icon>) -> Self {
        Self { text, icon }
    }

    /// Shown text.
    pub const fn text(&self) -> &'static str {
        self.text
    }
}

impl Construct for GenericLabelElement {
    fn construct(node: &mut TreeNode, payload: Payload, _ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Label(text) = payload else {
            return None;
        };
        node.name = Cow::Borrowed(text);
        Some(Self::new(text, None))
    }
}

impl AbstractElement for GenericLabelElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        self.icon
    }
}

/// Grouping row: "Current File" or one datablock list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdBaseElement(pub IdBaseKind);

impl Construct for IdBaseElement {
    fn construct(node: &mut TreeNode, payload: Payload, _ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::IdBase(kind) = payload else {
            return None;
        };
        node.name = match kind {
            IdBaseKind::CurrentFile => Cow::Borrowed("Current File"),
            IdBaseKind::List { code, .. } => Cow::Borrowed(code.plural_name()),
        };
        Some(Self(kind))
    }
}

impl AbstractElement for IdBaseElement {}
