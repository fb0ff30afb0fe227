// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The datablock database and its introspection queries.

use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::id::{Armature, Collection, Id, IdCode, IdData, IdFlags, IdRef, index_u32};
use crate::object::Object;
use crate::rna::{RnaRegistry, RnaStructId};
use crate::scene::{Scene, ViewLayer};

bitflags::bitflags! {
    /// Properties of one reference reported by [`Main::foreach_id_link`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LinkFlags: u8 {
        /// The target is embedded in the datablock being walked.
        const EMBEDDED = 1 << 0;
        /// The target owns the datablock being walked (back-reference).
        const LOOPBACK = 1 << 1;
        /// Reference from an override to the linked data it overrides.
        const OVERRIDE_REFERENCE = 1 << 2;
    }
}

/// A reference from one datablock to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdLink {
    /// Referenced datablock; `None` for an unset pointer.
    pub target: Option<IdRef>,
    /// How the reference is held.
    pub flags: LinkFlags,
}

impl IdLink {
    fn plain(target: Option<IdRef>) -> Self {
        Self {
            target,
            flags: LinkFlags::empty(),
        }
    }
}

/// In-memory datablock database.
///
/// Datablocks are stored in insertion order and iterated per [`IdCode`], in
/// the order of [`IdCode::ALL`].
///
/// ## Example
///
/// ```rust
/// use outliner_data::{Collection, Id, IdCode, IdData, Main, Object};
///
/// let mut main = Main::new();
/// let ob = main.add(Id::new("Cube", IdData::Object(Object::default())));
/// let coll = main.add(Id::new(
///     "Props",
///     IdData::Collection(Collection { objects: vec![ob], ..Collection::default() }),
/// ));
///
/// assert_eq!(main.ids_of(IdCode::Object).collect::<Vec<_>>(), [ob]);
/// let mut links = Vec::new();
/// main.foreach_id_link(coll, |link| links.push(link.target));
/// assert_eq!(links, [Some(ob)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Main {
    ids: Vec<Id>,
    rna: RnaRegistry,
    rna_root: Option<RnaStructId>,
}

impl Main {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a datablock and return its handle.
    pub fn add(&mut self, id: Id) -> IdRef {
        self.ids.push(id);
        IdRef(index_u32(self.ids.len() - 1))
    }

    /// Datablock for a handle.
    pub fn get(&self, id: IdRef) -> Option<&Id> {
        self.ids.get(id.index())
    }

    /// Mutable datablock for a handle.
    pub fn get_mut(&mut self, id: IdRef) -> Option<&mut Id> {
        self.ids.get_mut(id.index())
    }

    /// All datablocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (IdRef, &Id)> + '_ {
        self.ids
            .iter()
            .enumerate()
            .map(|(i, id)| (IdRef(index_u32(i)), id))
    }

    /// Datablocks of one type, in insertion order.
    pub fn ids_of(&self, code: IdCode) -> impl Iterator<Item = IdRef> + '_ {
        self.iter()
            .filter(move |(_, id)| id.code() == code)
            .map(|(r, _)| r)
    }

    /// Codes that have at least one datablock, in list order.
    pub fn lists(&self) -> impl Iterator<Item = IdCode> + '_ {
        IdCode::ALL
            .into_iter()
            .filter(|&code| self.ids_of(code).next().is_some())
    }

    /// Reflection registry.
    pub fn rna(&self) -> &RnaRegistry {
        &self.rna
    }

    /// Mutable reflection registry.
    pub fn rna_mut(&mut self) -> &mut RnaRegistry {
        &mut self.rna
    }

    /// Struct describing the database itself, the root of the data browser.
    pub fn rna_root(&self) -> Option<RnaStructId> {
        self.rna_root
    }

    /// Set the struct describing the database.
    pub fn set_rna_root(&mut self, root: RnaStructId) {
        self.rna_root = Some(root);
    }

    /// Users that are not fake users.
    pub fn real_users(&self, id: IdRef) -> u32 {
        self.get(id).map_or(0, |id| {
            let fake = u32::from(id.flags.contains(IdFlags::FAKE_USER));
            id.users.saturating_sub(fake)
        })
    }

    /// Whether the datablock is a real library override (not a placeholder).
    pub fn is_override_real(&self, id: IdRef) -> bool {
        self.get(id)
            .and_then(|id| id.override_library.as_ref())
            .is_some_and(|o| o.reference.is_some())
    }

    /// Whether the datablock is a real override and the root of its hierarchy.
    pub fn is_hierarchy_root(&self, id: IdRef) -> bool {
        self.is_override_real(id) && self.hierarchy_root(id) == Some(id)
    }

    /// Hierarchy root of an override.
    pub fn hierarchy_root(&self, id: IdRef) -> Option<IdRef> {
        self.get(id)?.override_library.as_ref()?.hierarchy_root
    }

    /// Datablock that carries the override data for `id`.
    ///
    /// Shape keys and embedded data are overridden through their owner.
    pub fn override_owner(&self, id: IdRef) -> Option<IdRef> {
        let data = self.get(id)?;
        if let IdData::Key(key) = &data.data {
            return key.owner;
        }
        if data.flags.contains(IdFlags::EMBEDDED_DATA) {
            return data.owner;
        }
        Some(id)
    }

    /// Scene payload.
    pub fn scene(&self, id: IdRef) -> Option<&Scene> {
        match &self.get(id)?.data {
            IdData::Scene(s) => Some(s),
            _ => None,
        }
    }

    /// Object payload.
    pub fn object(&self, id: IdRef) -> Option<&Object> {
        match &self.get(id)?.data {
            IdData::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Collection payload.
    pub fn collection(&self, id: IdRef) -> Option<&Collection> {
        match &self.get(id)?.data {
            IdData::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Armature payload.
    pub fn armature(&self, id: IdRef) -> Option<&Armature> {
        match &self.get(id)?.data {
            IdData::Armature(a) => Some(a),
            _ => None,
        }
    }

    /// View layer `index` of a scene.
    pub fn view_layer(&self, scene: IdRef, index: u32) -> Option<&ViewLayer> {
        self.scene(scene)?.view_layers.get(index as usize)
    }

    /// Call `f` for every datablock reference held by `id`.
    ///
    /// References held by embedded datablocks are reported after the
    /// embedding reference itself, as if `id` held them.
    pub fn foreach_id_link(&self, id: IdRef, mut f: impl FnMut(IdLink)) {
        self.foreach_id_link_inner(id, &mut f);
    }

    fn foreach_id_link_inner(&self, id: IdRef, f: &mut dyn FnMut(IdLink)) {
        let Some(data) = self.get(id) else {
            return;
        };
        if let Some(anim) = &data.anim {
            f(IdLink::plain(anim.action));
            for driver in &anim.drivers {
                driver.targets.iter().for_each(|&t| f(IdLink::plain(t)));
            }
            for track in &anim.nla_tracks {
                track.strips.iter().for_each(|s| f(IdLink::plain(s.action)));
            }
        }
        if let Some(o) = &data.override_library {
            f(IdLink {
                target: o.reference,
                flags: LinkFlags::OVERRIDE_REFERENCE,
            });
            f(IdLink {
                target: o.hierarchy_root,
                flags: LinkFlags::LOOPBACK,
            });
        }
        if data.flags.contains(IdFlags::EMBEDDED_DATA) {
            f(IdLink {
                target: data.owner,
                flags: LinkFlags::LOOPBACK,
            });
        }
        match &data.data {
            IdData::Scene(scene) => {
                f(IdLink::plain(scene.world));
                f(IdLink {
                    target: scene.master_collection,
                    flags: LinkFlags::EMBEDDED,
                });
                if let Some(master) = scene.master_collection {
                    self.foreach_embedded_link(master, f);
                }
            }
            IdData::Object(ob) => {
                f(IdLink::plain(ob.data));
                f(IdLink::plain(ob.parent));
                ob.materials.iter().for_each(|&m| f(IdLink::plain(m)));
                ob.modifiers.iter().for_each(|m| f(IdLink::plain(m.object)));
                ob.constraints.iter().for_each(|c| f(IdLink::plain(c.target)));
                if let Some(pose) = &ob.pose {
                    for channel in &pose.channels {
                        channel
                            .constraints
                            .iter()
                            .for_each(|c| f(IdLink::plain(c.target)));
                    }
                }
                ob.shader_effects
                    .iter()
                    .for_each(|e| f(IdLink::plain(e.object)));
                f(IdLink::plain(ob.instance_collection));
            }
            IdData::Mesh(g) | IdData::Curve(g) | IdData::MetaBall(g) => {
                f(IdLink::plain(g.key));
                g.materials.iter().for_each(|&m| f(IdLink::plain(m)));
            }
            IdData::Collection(c) => {
                c.children.iter().for_each(|&c| f(IdLink::plain(Some(c))));
                c.objects.iter().for_each(|&o| f(IdLink::plain(Some(o))));
            }
            IdData::Texture(t) => f(IdLink::plain(t.image)),
            IdData::LineStyle(ls) => ls.textures.iter().for_each(|&t| f(IdLink::plain(t))),
            IdData::Key(key) => f(IdLink {
                target: key.owner,
                flags: LinkFlags::LOOPBACK,
            }),
            IdData::Library(lib) => f(IdLink {
                target: lib.parent,
                flags: LinkFlags::LOOPBACK,
            }),
            IdData::Armature(_)
            | IdData::Action(_)
            | IdData::GpLegacy(_)
            | IdData::GreasePencil(_)
            | IdData::Other(_) => {}
        }
    }

    fn foreach_embedded_link(&self, embedded: IdRef, f: &mut dyn FnMut(IdLink)) {
        self.foreach_id_link_inner(embedded, &mut |link: IdLink| {
            if !link.flags.contains(LinkFlags::LOOPBACK) {
                f(link);
            }
        });
    }

    /// Collections of a scene, master first, in depth-first order without repeats.
    pub fn scene_collections(&self, scene: IdRef) -> Vec<IdRef> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        if let Some(master) = self.scene(scene).and_then(|s| s.master_collection) {
            self.collect_collections(master, &mut out, &mut seen);
        }
        out
    }

    fn collect_collections(&self, coll: IdRef, out: &mut Vec<IdRef>, seen: &mut HashSet<IdRef>) {
        if !seen.insert(coll) {
            return;
        }
        out.push(coll);
        if let Some(c) = self.collection(coll) {
            for &child in &c.children {
                self.collect_collections(child, out, seen);
            }
        }
    }

    /// Objects of a scene, each listed once, in collection order.
    pub fn scene_objects(&self, scene: IdRef) -> Vec<IdRef> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for coll in self.scene_collections(scene) {
            if let Some(c) = self.collection(coll) {
                out.extend(c.objects.iter().copied().filter(|&o| seen.insert(o)));
            }
        }
        out
    }

    /// Objects visible to a view layer: objects of all non-excluded layer
    /// collections, each listed once.
    pub fn view_layer_objects(&self, scene: IdRef, layer: u32) -> Vec<IdRef> {
        let mut out = Vec::new();
        let Some(view_layer) = self.view_layer(scene, layer) else {
            return out;
        };
        let mut seen = HashSet::new();
        let mut stack: Vec<u32> = view_layer.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            let Some(lc) = view_layer.layer_collection(index) else {
                continue;
            };
            if lc.is_excluded() {
                continue;
            }
            if let Some(c) = self.collection(lc.collection) {
                out.extend(c.objects.iter().copied().filter(|&o| seen.insert(o)));
            }
            stack.extend(lc.children.iter().rev().copied());
        }
        out
    }

    /// Whether a collection is a child of any collection other than a scene's
    /// master collection.
    pub fn collection_has_non_master_parent(&self, coll: IdRef) -> bool {
        self.iter().any(|(_, id)| match &id.data {
            IdData::Collection(c) => !c.is_master && c.children.contains(&coll),
            _ => false,
        })
    }
}
