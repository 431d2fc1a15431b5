//! Resource lookup and object dereferencing.
//!
//! The interpreter never walks a document's object graph itself. It asks a
//! [`Resources`] implementation for named entries (fonts, graphics states,
//! property lists) and for the targets of indirect references.
//! [`MemoryResources`] is a self-contained implementation over a resource
//! dictionary plus a table of numbered objects.

use std::collections::HashMap;

use pdftext_core::{Dict, Name, ObjRef, Object};

/// Chains of references longer than this are treated as unresolvable.
const MAX_REFERENCE_HOPS: usize = 32;

/// Subdictionaries of a resource dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Font,
    ExtGState,
    Properties,
    ColorSpace,
    XObject,
    Pattern,
    Shading,
}

impl ResourceCategory {
    /// Key of this category in a resource dictionary.
    pub fn key(self) -> &'static str {
        match self {
            ResourceCategory::Font => "Font",
            ResourceCategory::ExtGState => "ExtGState",
            ResourceCategory::Properties => "Properties",
            ResourceCategory::ColorSpace => "ColorSpace",
            ResourceCategory::XObject => "XObject",
            ResourceCategory::Pattern => "Pattern",
            ResourceCategory::Shading => "Shading",
        }
    }
}

/// Lookup capability for the resources in force while interpreting a stream.
pub trait Resources {
    /// The entry `name` of `category`, as stored. May be an
    /// [`Object::Reference`]; callers dereference with [`Resources::deref`].
    fn get(&self, category: ResourceCategory, name: &Name) -> Option<Object>;

    /// Target of an indirect reference, if it exists.
    fn resolve(&self, reference: ObjRef) -> Option<Object>;

    /// Follow references until a direct object is reached.
    fn deref(&self, obj: &Object) -> Option<Object> {
        let mut current = obj.clone();
        for _ in 0..MAX_REFERENCE_HOPS {
            match current {
                Object::Reference(r) => current = self.resolve(r)?,
                direct => return Some(direct),
            }
        }
        None
    }

    /// Entry `name` of `category`, dereferenced and required to be a dictionary.
    fn get_dict(&self, category: ResourceCategory, name: &Name) -> Option<Dict> {
        match self.deref(&self.get(category, name)?)? {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

/// Resources without any entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl Resources for NoResources {
    fn get(&self, _category: ResourceCategory, _name: &Name) -> Option<Object> {
        None
    }

    fn resolve(&self, _reference: ObjRef) -> Option<Object> {
        None
    }
}

/// In-memory resources: a resource dictionary and numbered objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    dict: Dict,
    objects: HashMap<ObjRef, Object>,
}

impl MemoryResources {
    pub fn new(dict: Dict) -> Self {
        Self {
            dict,
            objects: HashMap::new(),
        }
    }

    /// Register the object that `reference` points to.
    pub fn insert_object(&mut self, reference: ObjRef, obj: Object) {
        self.objects.insert(reference, obj);
    }

    /// Builder form of [`MemoryResources::insert_object`].
    pub fn with_object(mut self, reference: ObjRef, obj: Object) -> Self {
        self.insert_object(reference, obj);
        self
    }

    /// Add `name -> value` under `category`, creating the category if needed.
    pub fn insert(&mut self, category: ResourceCategory, name: impl Into<Name>, value: Object) {
        let key = category.key();
        let mut sub = match self.dict.get(key).and_then(|o| self.deref(o)) {
            Some(Object::Dictionary(d)) => d,
            _ => Dict::new(),
        };
        sub.insert(name, value);
        self.dict.insert(key, Object::Dictionary(sub));
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }
}

impl Resources for MemoryResources {
    fn get(&self, category: ResourceCategory, name: &Name) -> Option<Object> {
        let sub = self.deref(self.dict.get(category.key())?)?;
        sub.as_dict()?.get(name.as_bytes()).cloned()
    }

    fn resolve(&self, reference: ObjRef) -> Option<Object> {
        self.objects.get(&reference).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_dict(base: &str) -> Object {
        let mut d = Dict::new();
        d.insert("Type", Object::Name(Name::from("Font")));
        d.insert("BaseFont", Object::Name(Name::from(base)));
        Object::Dictionary(d)
    }

    #[test]
    fn category_keys() {
        assert_eq!(ResourceCategory::Font.key(), "Font");
        assert_eq!(ResourceCategory::ExtGState.key(), "ExtGState");
        assert_eq!(ResourceCategory::Properties.key(), "Properties");
    }

    #[test]
    fn get_direct_entry() {
        let mut res = MemoryResources::default();
        res.insert(ResourceCategory::Font, "F1", font_dict("Helvetica"));
        let got = res.get(ResourceCategory::Font, &Name::from("F1")).unwrap();
        assert_eq!(got, font_dict("Helvetica"));
        assert!(res.get(ResourceCategory::Font, &Name::from("F2")).is_none());
        assert!(res.get(ResourceCategory::ExtGState, &Name::from("F1")).is_none());
    }

    #[test]
    fn get_keeps_references_and_deref_follows_them() {
        let r = ObjRef::new(7, 0);
        let mut res = MemoryResources::default().with_object(r, font_dict("Times-Roman"));
        res.insert(ResourceCategory::Font, "F1", Object::Reference(r));
        let raw = res.get(ResourceCategory::Font, &Name::from("F1")).unwrap();
        assert_eq!(raw, Object::Reference(r));
        assert_eq!(res.deref(&raw), Some(font_dict("Times-Roman")));
        assert!(res.get_dict(ResourceCategory::Font, &Name::from("F1")).is_some());
    }

    #[test]
    fn category_dictionary_may_be_indirect() {
        let sub_ref = ObjRef::new(3, 0);
        let mut sub = Dict::new();
        sub.insert("GS0", Object::Dictionary(Dict::new()));
        let mut top = Dict::new();
        top.insert("ExtGState", Object::Reference(sub_ref));
        let res = MemoryResources::new(top).with_object(sub_ref, Object::Dictionary(sub));
        assert!(res.get_dict(ResourceCategory::ExtGState, &Name::from("GS0")).is_some());
    }

    #[test]
    fn dangling_and_cyclic_references() {
        let a = ObjRef::new(1, 0);
        let b = ObjRef::new(2, 0);
        let res = MemoryResources::default()
            .with_object(a, Object::Reference(b))
            .with_object(b, Object::Reference(a));
        assert_eq!(res.deref(&Object::Reference(a)), None);
        assert_eq!(res.deref(&Object::Reference(ObjRef::new(9, 0))), None);
        assert_eq!(res.deref(&Object::Integer(4)), Some(Object::Integer(4)));
    }

    #[test]
    fn no_resources_is_empty() {
        assert!(NoResources.get(ResourceCategory::Font, &Name::from("F1")).is_none());
    }
}
