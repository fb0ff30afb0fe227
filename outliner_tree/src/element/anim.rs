// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation data: action, drivers, NLA tracks and action slots.

use alloc::borrow::Cow;

use outliner_data::{IdData, IdRef, Main};

use super::{AbstractElement, Construct, CreateContext};
use crate::builder::TreeBuilder;
use crate::kind::ElementKind;
use crate::payload::Payload;
use crate::tree::TreeNode;
use crate::types::{Icon, NodeId};
use crate::util::{index_i32, index_u32};

/// Add the animation data row of `owner` below `node`, if there is anything to list.
pub(crate) fn expand_animation_data(builder: &mut TreeBuilder<'_>, node: NodeId, owner: IdRef) {
    if builder.main().get(owner).is_some_and(|id| id.has_anim()) {
        builder.add_element(
            Some(node),
            Some(Payload::Id(owner)),
            ElementKind::AnimData,
            0,
            true,
        );
    }
}

/// "Animation" row of a datablock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnimDataElement {
    /// Datablock owning the animation data.
    pub owner: IdRef,
}

impl Construct for AnimDataElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let owner = payload.id()?;
        ctx.main.get(owner)?.anim.as_ref()?;
        node.name = Cow::Borrowed("Animation");
        Some(Self { owner })
    }
}

impl AbstractElement for AnimDataElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(anim) = builder.main().get(self.owner).and_then(|id| id.anim.as_ref()) else {
            return;
        };
        builder.add_id(Some(node), anim.action, 0);
        let owner = Some(Payload::Id(self.owner));
        if !anim.drivers.is_empty() {
            builder.add_element(Some(node), owner, ElementKind::DriverBase, 0, true);
        }
        if !anim.nla_tracks.is_empty() {
            builder.add_element(Some(node), owner, ElementKind::Nla, 0, true);
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::AnimData)
    }
}

/// "Drivers" row: the datablocks read by driver variables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriverBaseElement {
    /// Datablock owning the drivers.
    pub owner: IdRef,
}

impl Construct for DriverBaseElement {
    fn construct(node: &mut TreeNode, payload: Payload, _ctx: &CreateContext<'_>) -> Option<Self> {
        let owner = payload.id()?;
        node.name = Cow::Borrowed("Drivers");
        Some(Self { owner })
    }
}

impl AbstractElement for DriverBaseElement {
    /// Consecutive variables reading the same datablock are listed once.
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(anim) = builder.main().get(self.owner).and_then(|id| id.anim.as_ref()) else {
            return;
        };
        let mut last_added = None;
        for target in anim.drivers.iter().flat_map(|d| d.targets.iter().copied()) {
            if target != last_added {
                builder.add_element(
                    Some(node),
                    target.map(Payload::Id),
                    ElementKind::LinkedObject,
                    0,
                    true,
                );
                last_added = target;
            }
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Drivers)
    }
}

/// "NLA Tracks" row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NlaElement {
    /// Datablock owning the tracks.
    pub owner: IdRef,
}

impl Construct for NlaElement {
    fn construct(node: &mut TreeNode, payload: Payload, _ctx: &CreateContext<'_>) -> Option<Self> {
        let owner = payload.id()?;
        node.name = Cow::Borrowed("NLA Tracks");
        Some(Self { owner })
    }
}

impl AbstractElement for NlaElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(anim) = builder.main().get(self.owner).and_then(|id| id.anim.as_ref()) else {
            return;
        };
        for a in 0..anim.nla_tracks.len() {
            let payload = Payload::NlaTrack {
                owner: self.owner,
                track: index_u32(a),
            };
            builder.add_element(
                Some(node),
                Some(payload),
                ElementKind::NlaTrack,
                index_i32(a),
                true,
            );
        }
    }

    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::Nla)
    }
}

/// NLA track; lists the actions of its strips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NlaTrackElement {
    /// Datablock owning the track.
    pub owner: IdRef,
    /// Track index.
    pub track: u32,
}

impl Construct for NlaTrackElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::NlaTrack { owner, track } = payload else {
            return None;
        };
        let anim = ctx.main.get(owner)?.anim.as_ref()?;
        node.name = Cow::Owned(anim.nla_tracks.get(track as usize)?.name.clone());
        Some(Self { owner, track })
    }
}

impl AbstractElement for NlaTrackElement {
    fn expand(&self, builder: &mut TreeBuilder<'_>, node: NodeId) {
        let Some(track) = builder
            .main()
            .get(self.owner)
            .and_then(|id| id.anim.as_ref())
            .and_then(|anim| anim.nla_tracks.get(self.track as usize))
        else {
            return;
        };
        for (a, strip) in track.strips.iter().enumerate() {
            builder.add_element(
                Some(node),
                strip.action.map(Payload::Id),
                ElementKind::NlaAction,
                index_i32(a),
                true,
            );
        }
    }
}

/// Action played by an NLA strip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NlaActionElement {
    /// The action.
    pub action: IdRef,
}

impl Construct for NlaActionElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let action = payload.id()?;
        node.name = Cow::Owned(ctx.main.get(action)?.name.clone());
        Some(Self { action })
    }
}

impl AbstractElement for NlaActionElement {}

/// Slot of a layered action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionSlotElement {
    /// The action.
    pub action: IdRef,
    /// Slot index.
    pub slot: u32,
}

impl Construct for ActionSlotElement {
    fn construct(node: &mut TreeNode, payload: Payload, ctx: &CreateContext<'_>) -> Option<Self> {
        let Payload::ActionSlot { action, slot } = payload else {
            return None;
        };
        let IdData::Action(data) = &ctx.main.get(action)?.data else {
            return None;
        };
        node.name = Cow::Owned(data.slots.get(slot as usize)?.name.clone());
        Some(Self { action, slot })
    }
}

impl AbstractElement for ActionSlotElement {
    fn icon(&self, _main: &Main) -> Option<Icon> {
        Some(Icon::ActionSlot)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use crate::{DisplayMode, ElementKind, OutlinerSettings, SpaceOutliner};
    use alloc::vec::Vec;

    #[test]
    fn consecutive_driver_targets_are_listed_once() {
        let (main, scene, [target, other]) = testing::animated_scene();
        let mut space = SpaceOutliner::new(OutlinerSettings::new(DisplayMode::Scenes));
        space.rebuild(testing::source(&main, Some(scene)));
        testing::open_all(&mut space, &main, Some(scene));

        let tree = space.tree();
        let drivers = tree
            .iter()
            .find(|&n| tree.get(n).is_some_and(|n| n.kind.is(ElementKind::DriverBase)))
            .expect("scene animation lists its drivers");
        let targets: Vec<_> = tree
            .children_of(drivers)
            .iter()
            .filter_map(|&n| tree.get(n)?.directdata?.id())
            .collect();
        assert_eq!(targets, [target, other, target]);
    }
}
