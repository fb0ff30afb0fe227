// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequencer strips.

use alloc::borrow::Cow;

use outliner_data::{IdRef, Main, Strip, StripKind};

use super::{AbstractElement, Construct, CreateContext};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};

fn strip<'a>(main: &'a Main, scene: IdRef, index: u32) -> Option<&'a Strip> {
    main.scene(scene)?.editing.as_ref()?.strip(index)
}

/// A strip; meta strips list their children, others their source data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StripElement {
    /// Scene owning the strip.
    pub scene: IdRef,
    /// Strip index.
    pub strip: u32,
}

impl Construct for StripElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Strip { scene, strip: index } = payload else {
            return None;
        };
        node.name = Cow::Owned(strip(ctx.main, scene, index)?.name.clone());
        Some(Self {
            scene,
            strip: index,
        })
    }
}

impl AbstractElement for StripElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(data) = strip(builder.main(), self.scene, self.strip) else {
            return;
        };
        let payload = |strip| Payload::Strip {
            scene: self.scene,
            strip,
        };
        match &data.kind {
            StripKind::Meta { children } => {
                for &child in children {
                    builder.add_element(Some(node), Some(payload(child)), ElementKind::Strip, 0, true);
                }
            }
            _ => {
                if data.data.is_some() {
                    builder.add_element(
                        Some(node),
                        Some(payload(self.strip)),
                        ElementKind::StripData,
                        0,
                        true,
                    );
                }
            }
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Strip)
    }
}

/// Source data of a strip, named after its directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StripDataElement {
    /// Scene owning the strip.
    pub scene: IdRef,
    /// Strip index.
    pub strip: u32,
}

impl Construct for StripDataElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Strip { scene, strip: index } = payload else {
            return None;
        };
        let data = strip(ctx.main, scene, index)?.data.as_ref()?;
        node.name = if data.dir.is_empty() {
            Cow::Borrowed("Strip None")
        } else {
            Cow::Owned(data.dir.clone())
        };
        Some(Self {
            scene,
            strip: index,
        })
    }
}

impl AbstractElement for StripDataElement {}

/// Group of strips reading the same file, named after the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StripDupElement {
    /// Scene owning the strip.
    pub scene: IdRef,
    /// First strip reading the file.
    pub strip: u32,
}

impl Construct for StripDupElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::Strip { scene, strip: index } = payload else {
            return None;
        };
        let filename = strip(ctx.main, scene, index)?.source_filename()?;
        node.name = Cow::Owned(filename.into());
        Some(Self {
            scene,
            strip: index,
        })
    }
}

impl AbstractElement for StripDupElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Strip)
    }
}
