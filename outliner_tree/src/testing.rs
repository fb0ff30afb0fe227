// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small databases shared by the unit tests.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use outliner_data::{
    AnimData, Armature, Bone, Collection, Constraint, Driver, EditBone, Editing, Geometry, Id,
    IdData, IdFlags, IdRef, LayerCollection, LayerCollectionFlags, Library,
    LibraryOverride, Main, Modifier, Object, ObjectKind, ObjectMode, OverrideOpKind,
    OverrideOperation, OverrideProperty, Pose, PoseChannel, PropertySubtype, PropertyValue,
    RnaPointer, RnaProperty, RnaStruct, Scene, Strip, StripData, StripKind, Texture, ViewLayer,
};

use crate::builder::TreeSourceData;
use crate::space::SpaceOutliner;
use crate::types::StoreFlags;

/// A database together with the handles a test needs.
pub(crate) struct Database {
    pub(crate) main: Main,
}

/// Source data for `main`, with the first view layer of `scene` active.
pub(crate) fn source(main: &Main, scene: Option<IdRef>) -> TreeSourceData<'_> {
    let source = TreeSourceData::new(main);
    match scene {
        Some(scene) => source.with_scene(scene).with_view_layer(0),
        None => source,
    }
}

/// Rebuild with every row open, until opening rows adds no new ones.
pub(crate) fn open_all(space: &mut SpaceOutliner, main: &Main, scene: Option<IdRef>) {
    space.rebuild(source(main, scene));
    let mut rows = usize::MAX;
    for _ in 0..32 {
        if space.store().len() == rows {
            return;
        }
        rows = space.store().len();
        let indices: Vec<_> = space.store().iter().map(|(index, _)| index).collect();
        for index in indices {
            if let Some(row) = space.store_mut().get_mut(index) {
                row.flag.remove(StoreFlags::CLOSED);
            }
        }
        space.rebuild(source(main, scene));
    }
    panic!("opening every row never settles");
}

fn object(name: &str, ob: Object) -> Id {
    Id::new(name, IdData::Object(ob))
}

fn collection(name: &str, children: Vec<IdRef>, objects: Vec<IdRef>) -> Id {
    Id::new(
        name,
        IdData::Collection(Collection {
            children,
            objects,
            is_master: false,
        }),
    )
}

fn library(main: &mut Main, filepath: &str) -> IdRef {
    main.add(Id::new(
        filepath,
        IdData::Library(Library {
            filepath: filepath.into(),
            parent: None,
        }),
    ))
}

fn scene_mut(main: &mut Main, scene: IdRef) -> &mut Scene {
    match main.get_mut(scene).map(|d| &mut d.data) {
        Some(IdData::Scene(s)) => s,
        _ => panic!("not a scene"),
    }
}

/// Layer collections mirroring the collection tree below `coll`, depth first.
fn layer_collections(main: &Main, coll: IdRef, out: &mut Vec<LayerCollection>) -> u32 {
    let index = crate::util::index_u32(out.len());
    out.push(LayerCollection::new(coll));
    let children = main.collection(coll).map(|c| c.children.clone()).unwrap_or_default();
    for child in children {
        let child_index = layer_collections(main, child, out);
        out[index as usize].children.push(child_index);
    }
    index
}

/// Scene "Scene" whose master collection holds `children` and `objects`,
/// with one view layer "ViewLayer" over all of them.
fn add_scene(main: &mut Main, children: Vec<IdRef>, objects: Vec<IdRef>) -> IdRef {
    let scene = main.add(Id::new("Scene", IdData::Scene(Scene::default())));
    let master = main.add(
        Id::new(
            "Scene Collection",
            IdData::Collection(Collection {
                children,
                objects,
                is_master: true,
            }),
        )
        .embedded_in(scene),
    );
    let mut lcs = Vec::new();
    let root = layer_collections(main, master, &mut lcs);
    let s = scene_mut(main, scene);
    s.master_collection = Some(master);
    s.view_layers.push(ViewLayer {
        name: "ViewLayer".into(),
        layer_collections: lcs,
        root: Some(root),
    });
    scene
}

/// "Cube" and "Lamp" in a collection "Collection" of scene "Scene".
pub(crate) fn scene_with_two_objects() -> (Main, IdRef, [IdRef; 2]) {
    let mut main = Main::new();
    let cube = main.add(object(
        "Cube",
        Object {
            kind: ObjectKind::Mesh,
            ..Object::default()
        },
    ));
    let lamp = main.add(object(
        "Lamp",
        Object {
            kind: ObjectKind::Light,
            ..Object::default()
        },
    ));
    let coll = main.add(collection("Collection", vec![], vec![cube, lamp]));
    let scene = add_scene(&mut main, vec![coll], vec![]);
    (main, scene, [cube, lamp])
}

/// Scene animation with drivers reading `target`, `target`, `other`,
/// nothing and `target`.
pub(crate) fn animated_scene() -> (Main, IdRef, [IdRef; 2]) {
    let mut main = Main::new();
    let target = main.add(object("Target", Object::default()));
    let other = main.add(object("Other", Object::default()));
    let scene = add_scene(&mut main, vec![], vec![]);
    let anim = AnimData {
        drivers: vec![
            Driver {
                rna_path: "frame_start".into(),
                targets: vec![Some(target), Some(target)],
            },
            Driver {
                rna_path: "frame_end".into(),
                targets: vec![Some(other), None, Some(target)],
            },
        ],
        ..AnimData::default()
    };
    if let Some(id) = main.get_mut(scene) {
        id.anim = Some(anim);
    }
    (main, scene, [target, other])
}

/// Armature object "Rig" in `mode`, with bones Root { Spine { Head }, Tail }.
///
/// The root pose channel carries a constraint. With `editing`, the armature
/// has edit bones mirroring its bones.
pub(crate) fn rigged_scene(mode: ObjectMode, editing: bool) -> (Main, IdRef, IdRef) {
    const BONES: [(&str, Option<u32>); 4] =
        [("Root", None), ("Spine", Some(0)), ("Head", Some(1)), ("Tail", Some(0))];

    let mut main = Main::new();
    let armature = main.add(Id::new(
        "Armature",
        IdData::Armature(Armature {
            bones: BONES
                .iter()
                .map(|&(name, parent)| Bone {
                    name: name.into(),
                    parent,
                })
                .collect(),
            edit_bones: editing.then(|| {
                BONES
                    .iter()
                    .map(|&(name, parent)| EditBone {
                        name: name.into(),
                        parent,
                    })
                    .collect()
            }),
        }),
    ));
    let channels = BONES
        .iter()
        .enumerate()
        .map(|(i, &(name, parent))| PoseChannel {
            name: name.into(),
            parent,
            constraints: if i == 0 {
                vec![Constraint {
                    name: "IK".into(),
                    target: None,
                }]
            } else {
                vec![]
            },
        })
        .collect();
    let rig = main.add(object(
        "Rig",
        Object {
            kind: ObjectKind::Armature,
            data: Some(armature),
            pose: Some(Pose {
                channels,
                groups: vec![],
            }),
            mode,
            ..Object::default()
        },
    ));
    let scene = add_scene(&mut main, vec![], vec![rig]);
    (main, scene, rig)
}

/// Object "Instancer" instancing collection "Props", which holds "Chair".
/// Both "Props" and "Instancer" are in the scene.
pub(crate) fn instancing_scene() -> (Main, IdRef, IdRef, IdRef) {
    let mut main = Main::new();
    let chair = main.add(object("Chair", Object::default()));
    let props = main.add(collection("Props", vec![], vec![chair]));
    let instancer = main.add(object(
        "Instancer",
        Object {
            instance_collection: Some(props),
            ..Object::default()
        },
    ));
    let scene = add_scene(&mut main, vec![props], vec![instancer]);
    (main, scene, instancer, props)
}

/// "ChildOut" sits in collection "Other" while its parent "Parent" and its
/// sibling "ChildIn" sit in "Collection". "Hidden" is excluded and holds
/// "Nested".
pub(crate) fn split_parenting_scene() -> (Main, IdRef) {
    let mut main = Main::new();
    let parent = main.add(object("Parent", Object::default()));
    let child_in = main.add(object(
        "ChildIn",
        Object {
            parent: Some(parent),
            ..Object::default()
        },
    ));
    let child_out = main.add(object(
        "ChildOut",
        Object {
            parent: Some(parent),
            ..Object::default()
        },
    ));
    let other = main.add(collection("Other", vec![], vec![child_out]));
    let coll = main.add(collection("Collection", vec![], vec![parent, child_in]));
    let nested = main.add(collection("Nested", vec![], vec![]));
    let hidden = main.add(collection("Hidden", vec![nested], vec![]));
    let scene = add_scene(&mut main, vec![other, coll, hidden], vec![]);
    for lc in &mut scene_mut(&mut main, scene).view_layers[0].layer_collections {
        if lc.collection == hidden {
            lc.flags.insert(LayerCollectionFlags::EXCLUDE);
        }
    }
    (main, scene)
}

fn strip(name: &str, kind: StripKind, dir: &str, filename: Option<&str>) -> Strip {
    Strip {
        name: name.into(),
        kind,
        data: Some(StripData {
            dir: dir.into(),
            filename: filename.map(String::from),
        }),
    }
}

/// Two movie strips reading "shot.mp4", a sound strip and a meta strip
/// holding an effect strip.
pub(crate) fn sequencer_scene() -> (Main, IdRef) {
    let mut main = Main::new();
    let scene = add_scene(&mut main, vec![], vec![]);
    scene_mut(&mut main, scene).editing = Some(Editing {
        strips: vec![
            strip("Shot A", StripKind::Movie, "//footage/", Some("shot.mp4")),
            strip("Shot B", StripKind::Movie, "//footage/", Some("shot.mp4")),
            strip("Music", StripKind::Sound, "//audio/", Some("music.wav")),
            Strip {
                name: "Group".into(),
                kind: StripKind::Meta { children: vec![4] },
                data: None,
            },
            strip("Title", StripKind::Effect, "", None),
        ],
        top_level: vec![0, 1, 2, 3],
    });
    (main, scene)
}

/// Current file data, a library "props.blend" with an object and an
/// indirectly linked, missing library "textures.blend" with a texture.
///
/// Mesh "Unused" only has a fake user.
pub(crate) fn library_database() -> Database {
    let mut main = Main::new();
    let props = library(&mut main, "props.blend");
    let textures = library(&mut main, "textures.blend");
    if let Some(id) = main.get_mut(textures) {
        id.flags |= IdFlags::INDIRECT | IdFlags::MISSING;
        if let IdData::Library(lib) = &mut id.data {
            lib.parent = Some(props);
        }
    }

    let mesh = main.add(Id::new("Cube", IdData::Mesh(Geometry::default())));
    main.add(Id::new("Unused", IdData::Mesh(Geometry::default())).with_flags(IdFlags::FAKE_USER));
    let cube = main.add(object(
        "Cube",
        Object {
            kind: ObjectKind::Mesh,
            data: Some(mesh),
            ..Object::default()
        },
    ));
    let coll = main.add(collection("Collection", vec![], vec![cube]));
    add_scene(&mut main, vec![coll], vec![]);

    main.add(object("Prop", Object::default()).with_lib(props));
    main.add(Id::new("Wood", IdData::Texture(Texture::default())).with_lib(textures));
    Database { main }
}

/// Local override "Rig" of a linked object, without users.
///
/// Overridden: `location`, the system-generated `parent`, a path that no
/// longer resolves and `modifiers`, with two insertions and a replacement.
pub(crate) fn override_database() -> (Main, IdRef) {
    let mut main = Main::new();
    let lib = library(&mut main, "rig.blend");
    let reference = main.add(object("Rig", Object::default()).with_lib(lib));

    let subdivision = main
        .rna_mut()
        .add(RnaStruct::new("Modifier", "Modifier").with_name("Subdivision"));
    let rig_struct = main.rna_mut().add(
        RnaStruct::new("Object", "Object")
            .with_name("Rig")
            .with_property(
                RnaProperty::new("location", "Location", PropertyValue::Float { array_len: 3 })
                    .with_subtype(PropertySubtype::Vector),
            )
            .with_property(RnaProperty::new(
                "parent",
                "Parent",
                PropertyValue::Pointer(RnaPointer::NULL),
            ))
            .with_property(RnaProperty::new(
                "modifiers",
                "Modifiers",
                PropertyValue::Collection(vec![RnaPointer::new(None, subdivision)]),
            )),
    );

    let property = |path: &str, is_system: bool, operations: Vec<OverrideOperation>| OverrideProperty {
        rna_path: path.into(),
        is_system,
        operations,
    };
    let replace = OverrideOperation::default();
    let rig = main.add(object("Rig", Object::default()).with_users(0).with_rna(rig_struct));
    let overrides = LibraryOverride {
        reference: Some(reference),
        hierarchy_root: Some(rig),
        properties: vec![
            property("location", false, vec![replace.clone()]),
            property("parent", true, vec![replace.clone()]),
            property("missing_path", false, vec![replace.clone()]),
            property(
                "modifiers",
                false,
                vec![
                    OverrideOperation {
                        kind: OverrideOpKind::InsertAfter,
                        subitem_name: Some("Bevel".into()),
                        subitem_index: Some(1),
                    },
                    replace,
                    OverrideOperation {
                        kind: OverrideOpKind::InsertBefore,
                        subitem_name: None,
                        subitem_index: Some(5),
                    },
                ],
            ),
        ],
    };
    if let Some(id) = main.get_mut(rig) {
        id.override_library = Some(overrides);
    }
    (main, rig)
}

fn override_of(reference: IdRef, root: IdRef) -> LibraryOverride {
    LibraryOverride {
        reference: Some(reference),
        hierarchy_root: Some(root),
        properties: vec![],
    }
}

/// Local override hierarchy "Character" { "Body" { "Arm" } } of data from
/// "rig.blend", where "Arm" is parented to "Body" and both reference each
/// other. "rig.blend" holds an override hierarchy "Nested" of its own;
/// "empty.blend" holds nothing.
pub(crate) fn override_hierarchy_database() -> Database {
    let mut main = Main::new();
    let rig_lib = library(&mut main, "rig.blend");
    library(&mut main, "empty.blend");

    let body_lib = main.add(object("BodyLib", Object::default()).with_lib(rig_lib));
    let arm_lib = main.add(object("ArmLib", Object::default()).with_lib(rig_lib));
    let character_lib =
        main.add(collection("CharacterLib", vec![], vec![body_lib, arm_lib]).with_lib(rig_lib));

    let body = main.add(object("Body", Object::default()));
    let arm = main.add(object(
        "Arm",
        Object {
            parent: Some(body),
            constraints: vec![Constraint {
                name: "Follow".into(),
                target: Some(body),
            }],
            ..Object::default()
        },
    ));
    if let Some(IdData::Object(ob)) = main.get_mut(body).map(|d| &mut d.data) {
        ob.modifiers.push(Modifier {
            name: "Hook".into(),
            object: Some(arm),
            ..Modifier::default()
        });
    }
    let character = main.add(collection("Character", vec![], vec![body, arm]));
    for (id, reference) in [(character, character_lib), (body, body_lib), (arm, arm_lib)] {
        if let Some(data) = main.get_mut(id) {
            data.override_library = Some(override_of(reference, character));
        }
    }

    let nested = main.add(collection("Nested", vec![], vec![]).with_lib(rig_lib));
    if let Some(data) = main.get_mut(nested) {
        data.override_library = Some(override_of(character_lib, nested));
    }
    Database { main }
}

/// Data browser root "Blend Data" with a collection "Objects" of two
/// structs carrying a location, a hidden property and an integer pair
/// "Frame".
pub(crate) fn rna_database() -> Main {
    let mut main = Main::new();
    let item = |main: &mut Main, name: &str| {
        main.rna_mut().add(
            RnaStruct::new("Object", "Object").with_name(name).with_property(
                RnaProperty::new("location", "Location", PropertyValue::Float { array_len: 3 })
                    .with_subtype(PropertySubtype::Vector),
            ),
        )
    };
    let cube = item(&mut main, "Cube");
    let lamp = item(&mut main, "Lamp");
    let root = main.rna_mut().add(
        RnaStruct::new("BlendData", "Blend Data")
            .with_property(RnaProperty::new(
                "objects",
                "Objects",
                PropertyValue::Collection(vec![
                    RnaPointer::new(None, cube),
                    RnaPointer::new(None, lamp),
                ]),
            ))
            .with_property(
                RnaProperty::new("rna_type", "RNA", PropertyValue::String(String::new())).hidden(),
            )
            .with_property(RnaProperty::new(
                "frame",
                "Frame",
                PropertyValue::Int { array_len: 2 },
            )),
    );
    main.set_rna_root(root);
    main
}
