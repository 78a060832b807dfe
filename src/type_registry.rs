//! Index of the structs and enums declared in the scanned sources.
//!
//! Field types are read into [`TypeRef`]s so the introspector can expand
//! request and response shapes without compiling the project.

use crate::descriptor::TypeRef;
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;
use syn::meta::ParseNestedMeta;
use syn::visit::{self, Visit};

/// Table of data-shape types, keyed by simple name.
///
/// Built once from the parsed project sources and then handed to the
/// introspector, which walks it instead of relying on runtime reflection.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDef>,
}

/// A registered type definition
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// A struct with its fields in declaration order
    Struct(StructDef),
    /// An enum; always documented as a leaf
    Enum(EnumDef),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructDef {
    pub fields: Vec<FieldDef>,
}

/// Field definition in a struct
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name as declared (tuple fields use their index)
    pub name: String,
    pub ty: TypeRef,
    pub serde_attrs: SerdeAttributes,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            serde_attrs: SerdeAttributes::default(),
        }
    }

    /// The key this field is serialized under
    pub fn output_name(&self) -> &str {
        self.serde_attrs.rename.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDef {
    pub variants: Vec<String>,
}

/// Serde attributes that change the serialized shape of a field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SerdeAttributes {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

/// Wrappers that are transparent in serialized form
const TRANSPARENT_WRAPPERS: &[&str] = &[
    "Option", "Box", "Rc", "Arc", "Cow", "RefCell", "Cell", "Mutex", "RwLock",
];

/// Homogeneous collections documented as arrays
const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
];

/// Types with no statically known fields
const UNIVERSAL_TYPES: &[&str] = &["HashMap", "BTreeMap", "Value", "Any"];

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every struct and enum declared in the given files,
    /// including those nested in inline modules.
    pub fn from_files(parsed_files: &[ParsedFile]) -> Self {
        debug!("Building type registry from {} files", parsed_files.len());

        let mut registry = Self::new();
        for parsed_file in parsed_files {
            let mut visitor = DefinitionVisitor {
                registry: &mut registry,
            };
            visitor.visit_file(&parsed_file.syntax_tree);
        }

        debug!("Registered {} types", registry.len());
        registry
    }

    /// Registers a struct. The first definition of a name wins.
    pub fn register_struct(&mut self, name: impl Into<String>, fields: Vec<FieldDef>) {
        self.register(name.into(), TypeDef::Struct(StructDef { fields }));
    }

    /// Registers an enum. The first definition of a name wins.
    pub fn register_enum(&mut self, name: impl Into<String>, variants: Vec<String>) {
        self.register(name.into(), TypeDef::Enum(EnumDef { variants }));
    }

    fn register(&mut self, name: String, def: TypeDef) {
        if self.types.contains_key(&name) {
            warn!("Type {} is defined more than once; keeping the first definition", name);
            return;
        }
        debug!("Registering type: {}", name);
        self.types.insert(name, def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether a type name is a primitive leaf kind
    pub fn is_primitive(type_name: &str) -> bool {
        matches!(
            type_name,
            "String"
                | "str"
                | "char"
                | "bool"
                | "i8"
                | "i16"
                | "i32"
                | "i64"
                | "i128"
                | "isize"
                | "u8"
                | "u16"
                | "u32"
                | "u64"
                | "u128"
                | "usize"
                | "f32"
                | "f64"
        )
    }

    /// Converts a `syn::Type` into a [`TypeRef`].
    ///
    /// `generic_params` are the type parameters in scope; they carry no static
    /// field information and map to [`TypeRef::Any`].
    pub fn type_ref_from_syn(ty: &syn::Type, generic_params: &[String]) -> TypeRef {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                Self::type_ref_from_path(&type_path.path, generic_params)
            }
            syn::Type::Reference(reference) => {
                Self::type_ref_from_syn(&reference.elem, generic_params)
            }
            syn::Type::Paren(paren) => Self::type_ref_from_syn(&paren.elem, generic_params),
            syn::Type::Group(group) => Self::type_ref_from_syn(&group.elem, generic_params),
            syn::Type::Slice(slice) => {
                TypeRef::collection_of(Self::type_ref_from_syn(&slice.elem, generic_params))
            }
            syn::Type::Array(array) => {
                TypeRef::collection_of(Self::type_ref_from_syn(&array.elem, generic_params))
            }
            _ => TypeRef::Any,
        }
    }

    fn type_ref_from_path(path: &syn::Path, generic_params: &[String]) -> TypeRef {
        let Some(segment) = path.segments.last() else {
            return TypeRef::Any;
        };
        let type_name = segment.ident.to_string();

        if path.segments.len() == 1 && generic_params.contains(&type_name) {
            return TypeRef::Any;
        }

        let first_type_arg = match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
                syn::GenericArgument::Type(inner) => Some(inner),
                _ => None,
            }),
            _ => None,
        };
        let inner = || {
            first_type_arg
                .map(|inner| Self::type_ref_from_syn(inner, generic_params))
                .unwrap_or(TypeRef::Any)
        };

        if TRANSPARENT_WRAPPERS.contains(&type_name.as_str()) {
            inner()
        } else if COLLECTIONS.contains(&type_name.as_str()) {
            TypeRef::collection_of(inner())
        } else if UNIVERSAL_TYPES.contains(&type_name.as_str()) {
            TypeRef::Any
        } else {
            TypeRef::Named(type_name)
        }
    }

    fn register_struct_item(&mut self, item_struct: &syn::ItemStruct) {
        let generic_params: Vec<String> = item_struct
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .collect();

        let fields = item_struct
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let name = field
                    .ident
                    .as_ref()
                    .map(|ident| ident.to_string())
                    .unwrap_or_else(|| index.to_string());
                FieldDef {
                    name,
                    ty: Self::type_ref_from_syn(&field.ty, &generic_params),
                    serde_attrs: parse_serde_attributes(&field.attrs),
                }
            })
            .collect();

        self.register_struct(item_struct.ident.to_string(), fields);
    }

    fn register_enum_item(&mut self, item_enum: &syn::ItemEnum) {
        let variants = item_enum
            .variants
            .iter()
            .map(|variant| variant.ident.to_string())
            .collect();
        self.register_enum(item_enum.ident.to_string(), variants);
    }
}

struct DefinitionVisitor<'r> {
    registry: &'r mut TypeRegistry,
}

impl<'ast> Visit<'ast> for DefinitionVisitor<'_> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.registry.register_struct_item(node);
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.registry.register_enum_item(node);
        visit::visit_item_enum(self, node);
    }
}

/// Parse Serde attributes from field attributes
fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(syn::Token![=]) {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    serde_attrs.rename = Some(value.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            let value: syn::LitStr = inner.value()?.parse()?;
                            serde_attrs.rename = Some(value.value());
                            Ok(())
                        } else {
                            skip_meta(&inner)
                        }
                    })?;
                }
                Ok(())
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde_attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("flatten") {
                serde_attrs.flatten = true;
                Ok(())
            } else {
                skip_meta(&meta)
            }
        });

        if let Err(e) = result {
            debug!("Ignoring unreadable serde attribute: {}", e);
        }
    }

    serde_attrs
}

/// Consumes the value or nested list of a serde key this module does not interpret.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
        Ok(())
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))
    } else {
        Ok(())
    }
}
