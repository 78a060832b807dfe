//! Recursive expansion of data-shape types into [`SchemaNode`] trees.
//!
//! Expansion walks the [`TypeRegistry`] rather than live types. Every composite
//! type is expanded at most once per top-level call: the `visited` set is
//! threaded through the whole recursion and never shrinks, so a type seen a
//! second time (through a cycle or a sibling field) becomes `Object({})`. This
//! bounds recursion depth by the number of distinct reachable types.

use crate::descriptor::TypeRef;
use crate::ordered_map::OrderedMap;
use crate::schema::SchemaNode;
use crate::type_registry::{StructDef, TypeDef, TypeRegistry};
use log::{debug, warn};
use std::collections::HashSet;

/// Marker leaf for collections whose element type is not statically known
pub const UNTYPED_COLLECTION: &str = "collection";

/// Type-graph introspector over a registry
pub struct Introspector<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Introspector<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Expands a type with a fresh `visited` set.
    pub fn expand_root(&self, ty: &TypeRef) -> SchemaNode {
        let mut visited = HashSet::new();
        self.expand(ty, &mut visited)
    }

    /// Expands a type, recording composite types in `visited`.
    pub fn expand(&self, ty: &TypeRef, visited: &mut HashSet<String>) -> SchemaNode {
        match ty {
            TypeRef::Collection(Some(element)) => SchemaNode::array(self.expand(element, visited)),
            TypeRef::Collection(None) => SchemaNode::leaf(UNTYPED_COLLECTION),
            TypeRef::Any => SchemaNode::empty_object(),
            TypeRef::Named(name) => self.expand_named(name, visited),
        }
    }

    fn expand_named(&self, name: &str, visited: &mut HashSet<String>) -> SchemaNode {
        if TypeRegistry::is_primitive(name) {
            return SchemaNode::leaf(name);
        }

        match self.registry.get(name) {
            Some(TypeDef::Enum(_)) => SchemaNode::leaf(name),
            Some(TypeDef::Struct(def)) => {
                if !visited.insert(name.to_string()) {
                    debug!("Type {} already expanded in this pass, using empty object", name);
                    return SchemaNode::empty_object();
                }
                self.expand_struct(name, def, visited)
            }
            None => {
                warn!("Could not resolve type: {}, using empty object", name);
                SchemaNode::empty_object()
            }
        }
    }

    fn expand_struct(&self, name: &str, def: &StructDef, visited: &mut HashSet<String>) -> SchemaNode {
        debug!("Expanding struct {} with {} fields", name, def.fields.len());

        let mut fields = OrderedMap::new();
        for field in def.fields.iter().filter(|f| !f.serde_attrs.skip) {
            let node = self.expand(&field.ty, visited);
            match node {
                SchemaNode::Object(inner) if field.serde_attrs.flatten => fields.extend(inner),
                node => {
                    fields.insert(field.output_name(), node);
                }
            }
        }

        SchemaNode::Object(fields)
    }
}
