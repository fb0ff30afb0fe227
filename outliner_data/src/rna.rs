// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-driven reflection: structs, typed properties and path resolution.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::{IdRef, index_u32};

/// Handle of a reflected struct instance in an [`RnaRegistry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RnaStructId(pub(crate) u32);

/// Pointer to reflected data, with the datablock that owns it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RnaPointer {
    /// Datablock owning the data.
    pub owner: Option<IdRef>,
    /// Pointed-to struct instance, `None` for a null pointer.
    pub data: Option<RnaStructId>,
}

impl RnaPointer {
    /// Null pointer.
    pub const NULL: Self = Self {
        owner: None,
        data: None,
    };

    /// Create a pointer.
    pub const fn new(owner: Option<IdRef>, data: RnaStructId) -> Self {
        Self {
            owner,
            data: Some(data),
        }
    }

    /// Whether the pointer refers to data.
    pub const fn is_valid(&self) -> bool {
        self.data.is_some()
    }
}

bitflags::bitflags! {
    /// Property flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Never shown in user interfaces.
        const HIDDEN   = 1 << 0;
        /// Read-only.
        const READONLY = 1 << 1;
    }
}

/// Property type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropertyType {
    /// Boolean, optionally an array.
    Boolean,
    /// Integer, optionally an array.
    Int,
    /// Float, optionally an array.
    Float,
    /// String.
    String,
    /// Enumeration.
    Enum,
    /// Pointer to another struct.
    Pointer,
    /// Collection of structs.
    Collection,
}

/// Semantic subtype of an array property, used to label its items.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PropertySubtype {
    /// No special meaning.
    #[default]
    None,
    /// Location, direction, euler and other XYZ vectors.
    Vector,
    /// Quaternion or axis-angle.
    Quaternion,
    /// Color.
    Color,
}

/// Value of a reflected property.
#[derive(Clone, Debug)]
pub enum PropertyValue {
    /// Boolean; `array_len` is 0 for a scalar.
    Boolean {
        /// Array length.
        array_len: u32,
    },
    /// Integer; `array_len` is 0 for a scalar.
    Int {
        /// Array length.
        array_len: u32,
    },
    /// Float; `array_len` is 0 for a scalar.
    Float {
        /// Array length.
        array_len: u32,
    },
    /// String.
    String(String),
    /// Enumeration item identifier.
    Enum(String),
    /// Pointer.
    Pointer(RnaPointer),
    /// Collection items.
    Collection(Vec<RnaPointer>),
}

/// Reflected property.
#[derive(Clone, Debug)]
pub struct RnaProperty {
    /// Identifier used in paths.
    pub identifier: String,
    /// Display name.
    pub ui_name: String,
    /// Flags.
    pub flags: PropertyFlags,
    /// Array item subtype.
    pub subtype: PropertySubtype,
    /// Value.
    pub value: PropertyValue,
}

impl RnaProperty {
    /// Create a visible property.
    pub fn new(identifier: impl Into<String>, ui_name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            identifier: identifier.into(),
            ui_name: ui_name.into(),
            flags: PropertyFlags::empty(),
            subtype: PropertySubtype::None,
            value,
        }
    }

    /// Mark the property hidden.
    pub fn hidden(mut self) -> Self {
        self.flags |= PropertyFlags::HIDDEN;
        self
    }

    /// Set the array subtype.
    pub fn with_subtype(mut self, subtype: PropertySubtype) -> Self {
        self.subtype = subtype;
        self
    }

    /// Whether the property is hidden.
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(PropertyFlags::HIDDEN)
    }

    /// Type of the property.
    pub fn kind(&self) -> PropertyType {
        match self.value {
            PropertyValue::Boolean { .. } => PropertyType::Boolean,
            PropertyValue::Int { .. } => PropertyType::Int,
            PropertyValue::Float { .. } => PropertyType::Float,
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Enum(_) => PropertyType::Enum,
            PropertyValue::Pointer(_) => PropertyType::Pointer,
            PropertyValue::Collection(_) => PropertyType::Collection,
        }
    }

    /// Array length of numeric properties, 0 otherwise.
    pub fn array_length(&self) -> u32 {
        match self.value {
            PropertyValue::Boolean { array_len }
            | PropertyValue::Int { array_len }
            | PropertyValue::Float { array_len } => array_len,
            _ => 0,
        }
    }

    /// Label character of an array item, such as `X` or `R`.
    pub fn array_item_char(&self, index: u32) -> Option<char> {
        let items: &[u8; 4] = match self.subtype {
            PropertySubtype::None => return None,
            PropertySubtype::Vector => b"XYZW",
            PropertySubtype::Quaternion => b"WXYZ",
            PropertySubtype::Color => b"RGBA",
        };
        items.get(index as usize).map(|&c| char::from(c))
    }

    /// Pointer value of pointer properties.
    pub fn pointer(&self) -> Option<RnaPointer> {
        match self.value {
            PropertyValue::Pointer(ptr) => Some(ptr),
            _ => None,
        }
    }

    /// Items of collection properties; empty for other types.
    pub fn collection_items(&self) -> &[RnaPointer] {
        match &self.value {
            PropertyValue::Collection(items) => items,
            _ => &[],
        }
    }
}

/// Reflected struct instance.
#[derive(Clone, Debug)]
pub struct RnaStruct {
    /// Type identifier.
    pub identifier: String,
    /// Type display name.
    pub ui_name: String,
    /// Dynamic instance name, if the type has a name property.
    pub name: Option<String>,
    /// Properties, in declaration order.
    pub properties: Vec<RnaProperty>,
}

impl RnaStruct {
    /// Create a struct without properties.
    pub fn new(identifier: impl Into<String>, ui_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ui_name: ui_name.into(),
            name: None,
            properties: Vec::new(),
        }
    }

    /// Set the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a property.
    pub fn with_property(mut self, property: RnaProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Instance name if there is one, otherwise the type name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ui_name)
    }

    /// Property with the given identifier.
    pub fn find_property(&self, identifier: &str) -> Option<&RnaProperty> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }
}

/// Registry of reflected struct instances.
#[derive(Clone, Debug, Default)]
pub struct RnaRegistry {
    structs: Vec<RnaStruct>,
}

impl RnaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct instance.
    pub fn add(&mut self, s: RnaStruct) -> RnaStructId {
        self.structs.push(s);
        RnaStructId(index_u32(self.structs.len() - 1))
    }

    /// Struct instance for `id`.
    pub fn get(&self, id: RnaStructId) -> Option<&RnaStruct> {
        self.structs.get(id.0 as usize)
    }

    /// Mutable struct instance for `id`.
    pub fn get_mut(&mut self, id: RnaStructId) -> Option<&mut RnaStruct> {
        self.structs.get_mut(id.0 as usize)
    }

    /// Struct instance a pointer refers to.
    pub fn deref(&self, ptr: RnaPointer) -> Option<&RnaStruct> {
        self.get(ptr.data?)
    }

    /// Property `index` of the struct `ptr` refers to.
    pub fn property(&self, ptr: RnaPointer, index: u32) -> Option<&RnaProperty> {
        self.deref(ptr)?.properties.get(index as usize)
    }

    /// Resolve a dotted path such as `pose.bones["Arm"].location` from `root`.
    ///
    /// Collection items are addressed by `[index]` or `["name"]`. Returns the
    /// struct owning the final property together with the property index.
    pub fn resolve_path(&self, root: RnaStructId, path: &str) -> Option<(RnaStructId, u32)> {
        let mut current = root;
        let mut segments = PathSegments(path).peekable();
        while let Some(segment) = segments.next() {
            let (identifier, subscript) = split_subscript(segment)?;
            let s = self.get(current)?;
            let index = s.properties.iter().position(|p| p.identifier == identifier)?;
            if segments.peek().is_none() && subscript.is_none() {
                return Some((current, index_u32(index)));
            }
            let property = &s.properties[index];
            let next = match (subscript, &property.value) {
                (None, PropertyValue::Pointer(ptr)) => ptr.data?,
                (Some(sub), PropertyValue::Collection(items)) => self.collection_lookup(items, sub)?,
                (Some(sub), _) if segments.peek().is_none() => {
                    let i: u32 = sub.parse().ok()?;
                    return (i < property.array_length()).then_some((current, index_u32(index)));
                }
                _ => return None,
            };
            if segments.peek().is_none() {
                return Some((current, index_u32(index)));
            }
            current = next;
        }
        None
    }

    fn collection_lookup(&self, items: &[RnaPointer], subscript: &str) -> Option<RnaStructId> {
        if let Some(name) = subscript.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            return items
                .iter()
                .filter_map(|p| p.data)
                .find(|&id| self.get(id).and_then(|s| s.name.as_deref()) == Some(name));
        }
        let i: usize = subscript.parse().ok()?;
        items.get(i)?.data
    }
}

/// Segments of an RNA path, split on `.` outside `[...]` subscripts and
/// quoted names, so `bones["Arm.L"]` stays one segment.
struct PathSegments<'a>(&'a str);

impl<'a> Iterator for PathSegments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.0.is_empty() {
            return None;
        }
        let mut depth = 0_u32;
        let mut quoted = false;
        let mut escaped = false;
        for (i, c) in self.0.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' if quoted => escaped = true,
                '"' => quoted = !quoted,
                '[' if !quoted => depth += 1,
                ']' if !quoted => depth = depth.saturating_sub(1),
                '.' if !quoted && depth == 0 => {
                    let segment = &self.0[..i];
                    self.0 = &self.0[i + 1..];
                    return Some(segment);
                }
                _ => {}
            }
        }
        let segment = self.0;
        self.0 = "";
        Some(segment)
    }
}

fn split_subscript(segment: &str) -> Option<(&str, Option<&str>)> {
    match segment.find('[') {
        None => Some((segment, None)),
        Some(open) => {
            let rest = segment[open + 1..].strip_suffix(']')?;
            Some((&segment[..open], Some(rest)))
        }
    }
}
