// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datablock identity: handles, type codes, flags and per-type payloads.

use alloc::string::String;
use alloc::vec::Vec;

use crate::anim::{ActionSlot, AnimData};
use crate::object::{Bone, EditBone, GpLayer, GreasePencilNode, Object};
use crate::overrides::LibraryOverride;
use crate::rna::RnaStructId;
use crate::scene::Scene;

/// Handle of a datablock stored in a [`Main`](crate::Main).
///
/// Handles are only meaningful for the database that produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct IdRef(pub(crate) u32);

impl IdRef {
    /// Slot of this datablock in its database.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of a datablock.
///
/// The declaration order is the order in which the database lists are walked.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum IdCode {
    /// Linked library file.
    Library,
    /// Legacy interpolation curves; no longer created.
    Ipo,
    /// Animation action.
    Action,
    /// Shape keys.
    Key,
    /// Legacy grease pencil.
    GpLegacy,
    /// Grease pencil.
    GreasePencil,
    /// Node tree.
    NodeTree,
    /// Image.
    Image,
    /// Texture.
    Texture,
    /// Material.
    Material,
    /// Mesh.
    Mesh,
    /// Curve.
    Curve,
    /// Metaball.
    MetaBall,
    /// Lattice.
    Lattice,
    /// Light.
    Light,
    /// Camera.
    Camera,
    /// Speaker.
    Speaker,
    /// Sound.
    Sound,
    /// Text.
    Text,
    /// Armature.
    Armature,
    /// Freestyle line style.
    LineStyle,
    /// World.
    World,
    /// Collection.
    Collection,
    /// Object.
    Object,
    /// Scene.
    Scene,
    /// Brush.
    Brush,
    /// Palette.
    Palette,
    /// Workspace.
    WorkSpace,
}

impl IdCode {
    /// Every code, in database list order.
    pub const ALL: [Self; 28] = [
        Self::Library,
        Self::Ipo,
        Self::Action,
        Self::Key,
        Self::GpLegacy,
        Self::GreasePencil,
        Self::NodeTree,
        Self::Image,
        Self::Texture,
        Self::Material,
        Self::Mesh,
        Self::Curve,
        Self::MetaBall,
        Self::Lattice,
        Self::Light,
        Self::Camera,
        Self::Speaker,
        Self::Sound,
        Self::Text,
        Self::Armature,
        Self::LineStyle,
        Self::World,
        Self::Collection,
        Self::Object,
        Self::Scene,
        Self::Brush,
        Self::Palette,
        Self::WorkSpace,
    ];

    /// Plural display name, used for the per-type grouping rows.
    pub const fn plural_name(self) -> &'static str {
        match self {
            Self::Library => "Libraries",
            Self::Ipo => "Ipos",
            Self::Action => "Actions",
            Self::Key => "Shape Keys",
            Self::GpLegacy => "Grease Pencil (legacy)",
            Self::GreasePencil => "Grease Pencil",
            Self::NodeTree => "Node Groups",
            Self::Image => "Images",
            Self::Texture => "Textures",
            Self::Material => "Materials",
            Self::Mesh => "Meshes",
            Self::Curve => "Curves",
            Self::MetaBall => "Metaballs",
            Self::Lattice => "Lattices",
            Self::Light => "Lights",
            Self::Camera => "Cameras",
            Self::Speaker => "Speakers",
            Self::Sound => "Sounds",
            Self::Text => "Texts",
            Self::Armature => "Armatures",
            Self::LineStyle => "Line Styles",
            Self::World => "Worlds",
            Self::Collection => "Collections",
            Self::Object => "Objects",
            Self::Scene => "Scenes",
            Self::Brush => "Brushes",
            Self::Palette => "Palettes",
            Self::WorkSpace => "Workspaces",
        }
    }

    /// Types kept only so old files can be read.
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::Ipo)
    }
}

bitflags::bitflags! {
    /// Per-datablock state flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct IdFlags: u16 {
        /// Owned by another datablock (a scene's master collection, for example).
        const EMBEDDED_DATA            = 1 << 0;
        /// Keeps one extra user so the datablock is never considered orphaned.
        const FAKE_USER                = 1 << 1;
        /// Linked data or library whose file could not be found.
        const MISSING                  = 1 << 2;
        /// Linked only through another library.
        const INDIRECT                 = 1 << 3;
        /// Override no longer needed by its hierarchy but edited by the user.
        const OVERRIDE_RESYNC_LEFTOVER = 1 << 4;
        /// Library whose overrides need to be resynced.
        const LIB_RESYNC_REQUIRED      = 1 << 5;
    }
}

/// A named, referenceable datablock.
#[derive(Clone, Debug)]
pub struct Id {
    /// Display name.
    pub name: String,
    /// Library this datablock was linked from, `None` for local data.
    pub lib: Option<IdRef>,
    /// Number of users, including a fake user.
    pub users: u32,
    /// State flags.
    pub flags: IdFlags,
    /// Owner of embedded data.
    pub owner: Option<IdRef>,
    /// Library override data, when this datablock overrides linked data.
    pub override_library: Option<LibraryOverride>,
    /// Animation data.
    pub anim: Option<AnimData>,
    /// Reflection struct describing this datablock.
    pub rna: Option<RnaStructId>,
    /// Type-specific payload.
    pub data: IdData,
}

impl Id {
    /// Create a local datablock with one user.
    pub fn new(name: impl Into<String>, data: IdData) -> Self {
        Self {
            name: name.into(),
            lib: None,
            users: 1,
            flags: IdFlags::empty(),
            owner: None,
            override_library: None,
            anim: None,
            rna: None,
            data,
        }
    }

    /// Set the library this datablock is linked from.
    pub fn with_lib(mut self, lib: IdRef) -> Self {
        self.lib = Some(lib);
        self
    }

    /// Set the user count.
    pub fn with_users(mut self, users: u32) -> Self {
        self.users = users;
        self
    }

    /// Add state flags.
    pub fn with_flags(mut self, flags: IdFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Mark as embedded data owned by `owner`.
    pub fn embedded_in(mut self, owner: IdRef) -> Self {
        self.flags |= IdFlags::EMBEDDED_DATA;
        self.owner = Some(owner);
        self
    }

    /// Attach animation data.
    pub fn with_anim(mut self, anim: AnimData) -> Self {
        self.anim = Some(anim);
        self
    }

    /// Attach library override data.
    pub fn with_override(mut self, override_library: LibraryOverride) -> Self {
        self.override_library = Some(override_library);
        self
    }

    /// Attach the reflection struct.
    pub fn with_rna(mut self, rna: RnaStructId) -> Self {
        self.rna = Some(rna);
        self
    }

    /// Type of this datablock.
    pub fn code(&self) -> IdCode {
        self.data.code()
    }

    /// Whether this datablock was linked from a library.
    pub fn is_linked(&self) -> bool {
        self.lib.is_some()
    }

    /// Whether animation data exists and has something to show.
    pub fn has_anim(&self) -> bool {
        self.anim.as_ref().is_some_and(AnimData::is_populated)
    }
}

/// Type-specific datablock payload.
#[derive(Clone, Debug)]
pub enum IdData {
    /// Scene.
    Scene(Scene),
    /// Object.
    Object(Object),
    /// Mesh.
    Mesh(Geometry),
    /// Curve.
    Curve(Geometry),
    /// Metaball.
    MetaBall(Geometry),
    /// Armature.
    Armature(Armature),
    /// Collection.
    Collection(Collection),
    /// Action.
    Action(Action),
    /// Library.
    Library(Library),
    /// Texture.
    Texture(Texture),
    /// Freestyle line style.
    LineStyle(LineStyle),
    /// Legacy grease pencil.
    GpLegacy(GpLegacy),
    /// Grease pencil.
    GreasePencil(GreasePencil),
    /// Shape keys.
    Key(Key),
    /// Any other type without payload.
    Other(IdCode),
}

impl IdData {
    /// Type code of this payload.
    pub fn code(&self) -> IdCode {
        match self {
            Self::Scene(_) => IdCode::Scene,
            Self::Object(_) => IdCode::Object,
            Self::Mesh(_) => IdCode::Mesh,
            Self::Curve(_) => IdCode::Curve,
            Self::MetaBall(_) => IdCode::MetaBall,
            Self::Armature(_) => IdCode::Armature,
            Self::Collection(_) => IdCode::Collection,
            Self::Action(_) => IdCode::Action,
            Self::Library(_) => IdCode::Library,
            Self::Texture(_) => IdCode::Texture,
            Self::LineStyle(_) => IdCode::LineStyle,
            Self::GpLegacy(_) => IdCode::GpLegacy,
            Self::GreasePencil(_) => IdCode::GreasePencil,
            Self::Key(_) => IdCode::Key,
            Self::Other(code) => *code,
        }
    }
}

/// Mesh-like obdata: optional shape keys and material slots.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Shape keys.
    pub key: Option<IdRef>,
    /// Material slots; empty slots are `None`.
    pub materials: Vec<Option<IdRef>>,
}

/// Armature bones.
#[derive(Clone, Debug, Default)]
pub struct Armature {
    /// Bones in storage order.
    pub bones: Vec<Bone>,
    /// Edit bones, present while the armature is in edit mode.
    pub edit_bones: Option<Vec<EditBone>>,
}

impl Armature {
    /// Indices of bones whose parent is `parent`, in storage order.
    pub fn child_bones(&self, parent: Option<u32>) -> impl Iterator<Item = u32> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent == parent)
            .map(|(i, _)| index_u32(i))
    }
}

/// Collection of objects and child collections.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    /// Child collections.
    pub children: Vec<IdRef>,
    /// Objects linked directly into this collection.
    pub objects: Vec<IdRef>,
    /// Whether this is a scene's master collection.
    pub is_master: bool,
}

/// Action datablock.
#[derive(Clone, Debug, Default)]
pub struct Action {
    /// Slots of a layered action.
    pub slots: Vec<ActionSlot>,
}

/// Library datablock.
#[derive(Clone, Debug, Default)]
pub struct Library {
    /// File path of the library.
    pub filepath: String,
    /// Library that linked this one, for indirect libraries.
    pub parent: Option<IdRef>,
}

/// Texture datablock.
#[derive(Clone, Debug, Default)]
pub struct Texture {
    /// Image used by the texture.
    pub image: Option<IdRef>,
}

/// Freestyle line style.
#[derive(Clone, Debug, Default)]
pub struct LineStyle {
    /// Texture slots.
    pub textures: Vec<Option<IdRef>>,
}

/// Legacy grease pencil datablock.
#[derive(Clone, Debug, Default)]
pub struct GpLegacy {
    /// Layers, bottom to top.
    pub layers: Vec<GpLayer>,
}

/// Grease pencil datablock with a layer tree.
#[derive(Clone, Debug, Default)]
pub struct GreasePencil {
    /// All layer tree nodes.
    pub nodes: Vec<GreasePencilNode>,
    /// Top-level nodes of the layer tree.
    pub root: Vec<u32>,
}

/// Shape keys.
#[derive(Clone, Debug, Default)]
pub struct Key {
    /// Datablock the keys belong to.
    pub owner: Option<IdRef>,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Sub-data lists are addressed with 32-bit indices."
)]
pub(crate) fn index_u32(i: usize) -> u32 {
    i as u32
}
