// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kind tags.
//!
//! Persisted rows store the raw `u16` value so rows written by a newer build
//! survive a round trip. In memory the value decodes to [`KindTag`], whose
//! [`KindTag::Unrecognized`] case never produces an element.

/// Closed set of element kinds known to this build.
///
/// Discriminants are the persisted values and must never be reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum ElementKind {
    /// A datablock.
    SomeId = 0,
    /// NLA track list.
    Nla = 1,
    /// Action played by an NLA strip.
    NlaAction = 2,
    /// Vertex group list.
    DeformGroupBase = 3,
    /// Vertex group.
    DeformGroup = 4,
    /// Bone.
    Bone = 5,
    /// Edit bone.
    EditBone = 6,
    /// Constraint list.
    ConstraintBase = 7,
    /// Constraint.
    Constraint = 8,
    /// Modifier stack.
    ModifierBase = 9,
    /// Modifier.
    Modifier = 10,
    /// Object used by a modifier or driver.
    LinkedObject = 11,
    /// Pose channel list.
    PoseBase = 13,
    /// Pose channel.
    PoseChannel = 14,
    /// Animation data.
    AnimData = 15,
    /// Driver list.
    DriverBase = 16,
    /// View layer list.
    ViewLayerBase = 19,
    /// View layer.
    ViewLayer = 20,
    /// Bone group list.
    PoseGroupBase = 24,
    /// Bone group.
    PoseGroup = 25,
    /// Sequencer strip.
    Strip = 26,
    /// Strip source data.
    StripData = 27,
    /// Strips sharing one source file.
    StripDup = 28,
    /// Particle system used by a modifier.
    LinkedParticleSystem = 29,
    /// Reflected struct.
    RnaStruct = 30,
    /// Reflected property.
    RnaProperty = 31,
    /// Item of a reflected array property.
    RnaArrayElement = 32,
    /// NLA track.
    NlaTrack = 33,
    /// Grouping row: a datablock list or a file.
    IdBase = 36,
    /// Legacy grease pencil layer.
    GpLayer = 37,
    /// Collection as seen by a view layer.
    LayerCollection = 38,
    /// Scene collection list.
    SceneCollectionBase = 39,
    /// View layer collection list.
    ViewCollectionBase = 40,
    /// Scene object list.
    SceneObjectsBase = 41,
    /// Shader effect list.
    GpencilEffectBase = 42,
    /// Shader effect.
    GpencilEffect = 43,
    /// Override list of a datablock.
    LibraryOverrideBase = 44,
    /// Overridden property.
    LibraryOverrideProperty = 45,
    /// Override operation.
    LibraryOverrideOperation = 46,
    /// Plain text row.
    GenericLabel = 47,
    /// Grease pencil layer tree node.
    GreasePencilNode = 48,
    /// Action slot.
    ActionSlot = 50,
}

impl ElementKind {
    /// Every kind, in persisted-value order.
    pub const ALL: [Self; 42] = [
        Self::SomeId,
        Self::Nla,
        Self::NlaAction,
        Self::DeformGroupBase,
        Self::DeformGroup,
        Self::Bone,
        Self::EditBone,
        Self::ConstraintBase,
        Self::Constraint,
        Self::ModifierBase,
        Self::Modifier,
        Self::LinkedObject,
        Self::PoseBase,
        Self::PoseChannel,
        Self::AnimData,
        Self::DriverBase,
        Self::ViewLayerBase,
        Self::ViewLayer,
        Self::PoseGroupBase,
        Self::PoseGroup,
        Self::Strip,
        Self::StripData,
        Self::StripDup,
        Self::LinkedParticleSystem,
        Self::RnaStruct,
        Self::RnaProperty,
        Self::RnaArrayElement,
        Self::NlaTrack,
        Self::IdBase,
        Self::GpLayer,
        Self::LayerCollection,
        Self::SceneCollectionBase,
        Self::ViewCollectionBase,
        Self::SceneObjectsBase,
        Self::GpencilEffectBase,
        Self::GpencilEffect,
        Self::LibraryOverrideBase,
        Self::LibraryOverrideProperty,
        Self::LibraryOverrideOperation,
        Self::GenericLabel,
        Self::GreasePencilNode,
        Self::ActionSlot,
    ];

    /// Persisted value.
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Decode a persisted value.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.raw() == raw)
    }

    /// Whether rows of this kind are keyed by a real datablock.
    pub const fn is_real_id(self) -> bool {
        matches!(self, Self::SomeId | Self::LayerCollection)
    }

    /// Reflection kinds, built lazily by the data browser.
    pub const fn is_rna(self) -> bool {
        matches!(
            self,
            Self::RnaStruct | Self::RnaProperty | Self::RnaArrayElement
        )
    }
}

/// Kind tag of a row, tolerant of values from newer builds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KindTag {
    /// A kind this build knows.
    Known(ElementKind),
    /// A persisted value this build does not know.
    Unrecognized(u16),
}

impl KindTag {
    /// Decode a persisted value.
    pub fn from_raw(raw: u16) -> Self {
        ElementKind::from_raw(raw).map_or(Self::Unrecognized(raw), Self::Known)
    }

    /// Persisted value.
    pub const fn raw(self) -> u16 {
        match self {
            Self::Known(kind) => kind.raw(),
            Self::Unrecognized(raw) => raw,
        }
    }

    /// The known kind, if any.
    pub const fn known(self) -> Option<ElementKind> {
        match self {
            Self::Known(kind) => Some(kind),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether this is exactly `kind`.
    pub fn is(self, kind: ElementKind) -> bool {
        self == Self::Known(kind)
    }
}

impl From<ElementKind> for KindTag {
    fn from(kind: ElementKind) -> Self {
        Self::Known(kind)
    }
}
