//! Reads `#[api_group(...)]` and `#[endpoint(...)]` attributes into handler groups.
//!
//! A handler group is any struct or enum; its handlers are the functions of
//! every `impl <Group>` block in the scanned sources, in source order. Types
//! and impl blocks are matched by module path, so `v1::Users` and
//! `v2::Users` stay separate groups. The
//! attributes are inert markers here: nothing needs to expand them, we only
//! read their tokens.
//!
//! ```ignore
//! #[api_group(group = "items", base_url = "items/", roles("admin"))]
//! pub struct ItemController;
//!
//! impl ItemController {
//!     #[endpoint(method = "POST", url = "/box-items", request_type = BoxOfItems,
//!                status(code = 200, description = "ok"))]
//!     pub fn add_box_items() {}
//! }
//! ```

use crate::collector::{Handler, HandlerGroup};
use crate::descriptor::{EndpointDescriptor, FieldSpec, GroupDescriptor, HttpMethod};
use crate::error::{Error, Result};
use crate::parser::ParsedFile;
use crate::type_registry::TypeRegistry;
use log::{debug, info, warn};
use std::collections::HashMap;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{Attribute, LitInt, LitStr, Meta, Token};

pub const GROUP_ATTRIBUTE: &str = "api_group";
pub const ENDPOINT_ATTRIBUTE: &str = "endpoint";

/// Extracts handler groups from parsed files.
///
/// With an empty `names` list every type carrying `#[api_group]` is returned,
/// in file then declaration order. Otherwise exactly the named groups are
/// returned in the order given; a named type without `#[api_group]` comes
/// back with no group descriptor so the collector can reject it. Names may
/// be bare (`Users`) or module-qualified (`v2::Users`).
///
/// # Errors
///
/// Returns [`Error::UnknownHandlerGroup`] for a name with no struct or enum
/// definition, and [`Error::InvalidDescriptor`] for an unreadable attribute.
pub fn extract_groups(parsed_files: &[ParsedFile], names: &[String]) -> Result<Vec<HandlerGroup>> {
    let mut visitor = GroupVisitor::default();
    for parsed_file in parsed_files {
        debug!("Extracting descriptors from {}", parsed_file.path.display());
        visitor.visit_file(&parsed_file.syntax_tree);
    }

    let selected: Vec<&TypeDecl> = if names.is_empty() {
        visitor
            .types
            .iter()
            .filter(|decl| decl.group_attr.is_some())
            .collect()
    } else {
        names
            .iter()
            .map(|name| visitor.find(name).ok_or_else(|| Error::UnknownHandlerGroup(name.clone())))
            .collect::<Result<_>>()?
    };

    let groups = selected
        .into_iter()
        .map(|decl| visitor.build_group(decl))
        .collect::<Result<Vec<_>>>()?;

    info!("Extracted {} handler groups", groups.len());
    Ok(groups)
}

struct TypeDecl {
    name: String,
    /// Module path within its file plus the type name, e.g. `v1::Users`
    path: String,
    group_attr: Option<Attribute>,
}

#[derive(Default)]
struct GroupVisitor {
    types: Vec<TypeDecl>,
    handlers: HashMap<String, Vec<syn::ImplItemFn>>,
    module_path: Vec<String>,
}

impl GroupVisitor {
    fn record_type(&mut self, ident: &syn::Ident, attrs: &[Attribute]) {
        let name = ident.to_string();
        let path = self.qualify(&name);
        if self.types.iter().any(|decl| decl.path == path) {
            return;
        }
        self.types.push(TypeDecl {
            name,
            path,
            group_attr: find_attribute(attrs, GROUP_ATTRIBUTE).cloned(),
        });
    }

    fn qualify(&self, name: &str) -> String {
        self.module_path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join("::")
    }

    /// Resolves an impl self-type path against the current module.
    fn resolve(&self, path: &syn::Path) -> Option<String> {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let (last, prefix) = segments.split_last()?;

        let mut scope = self.module_path.clone();
        for (index, segment) in prefix.iter().enumerate() {
            match segment.as_str() {
                "crate" if index == 0 => scope.clear(),
                "self" if index == 0 => {}
                "super" => {
                    scope.pop();
                }
                other => scope.push(other.to_string()),
            }
        }
        scope.push(last.clone());
        Some(scope.join("::"))
    }

    /// A qualified name matches the full module path; a bare name matches
    /// the first type declared under it.
    fn find(&self, name: &str) -> Option<&TypeDecl> {
        let name = name.strip_prefix("crate::").unwrap_or(name);
        if name.contains("::") {
            return self.types.iter().find(|decl| decl.path == name);
        }

        let mut matches = self.types.iter().filter(|decl| decl.name == name);
        let first = matches.next()?;
        if let Some(other) = matches.next() {
            warn!("Group name {} is ambiguous, using {} over {}", name, first.path, other.path);
        }
        Some(first)
    }

    fn build_group(&self, decl: &TypeDecl) -> Result<HandlerGroup> {
        let descriptor = decl
            .group_attr
            .as_ref()
            .map(parse_group_attribute)
            .transpose()
            .map_err(|e| invalid(&decl.path, e))?;

        let mut group = HandlerGroup::new(decl.path.clone(), descriptor);
        for function in self.handlers.get(&decl.path).into_iter().flatten() {
            let handler_name = function.sig.ident.to_string();
            let descriptor = find_attribute(&function.attrs, ENDPOINT_ATTRIBUTE)
                .map(parse_endpoint_attribute)
                .transpose()
                .map_err(|e| invalid(&format!("{}::{}", decl.path, handler_name), e))?;
            group.handlers.push(Handler {
                name: handler_name,
                descriptor,
            });
        }

        debug!("Group {} has {} handlers", group.name, group.handlers.len());
        Ok(group)
    }
}

impl<'ast> Visit<'ast> for GroupVisitor {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.module_path.push(node.ident.to_string());
        visit::visit_item_mod(self, node);
        self.module_path.pop();
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.record_type(&node.ident, &node.attrs);
        visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.record_type(&node.ident, &node.attrs);
        visit::visit_item_enum(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        if let syn::Type::Path(type_path) = &*node.self_ty {
            if let Some(key) = self.resolve(&type_path.path) {
                let functions = self.handlers.entry(key).or_default();
                functions.extend(node.items.iter().filter_map(|item| match item {
                    syn::ImplItem::Fn(function) => Some(function.clone()),
                    _ => None,
                }));
            }
        }
        visit::visit_item_impl(self, node);
    }
}

fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}

fn invalid(item: &str, err: syn::Error) -> Error {
    Error::InvalidDescriptor {
        item: item.to_string(),
        message: err.to_string(),
    }
}

fn parse_group_attribute(attr: &Attribute) -> syn::Result<GroupDescriptor> {
    let mut group = GroupDescriptor::default();

    // a bare `#[api_group]` takes every default
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(group);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("group") {
            group.group_name = string_value(&meta)?;
        } else if meta.path.is_ident("base_url") {
            group.base_url = string_value(&meta)?;
        } else if meta.path.is_ident("accept") {
            group.default_accept_type = string_value(&meta)?;
        } else if meta.path.is_ident("content_type") {
            group.default_content_type = string_value(&meta)?;
        } else if meta.path.is_ident("roles") {
            group.default_roles = string_list(&meta)?;
        } else if meta.path.is_ident("description") {
            string_value(&meta)?;
        } else {
            return Err(meta.error(format!("unsupported {} key", GROUP_ATTRIBUTE)));
        }
        Ok(())
    })?;

    Ok(group)
}

fn parse_endpoint_attribute(attr: &Attribute) -> syn::Result<EndpointDescriptor> {
    let mut method: Option<HttpMethod> = None;
    let mut url: Option<String> = None;
    let mut endpoint = EndpointDescriptor::new(HttpMethod::Get, String::new());

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("method") {
            method = Some(method_value(&meta)?);
        } else if meta.path.is_ident("url") {
            url = Some(string_value(&meta)?);
        } else if meta.path.is_ident("group") {
            endpoint.group_override = Some(string_value(&meta)?);
        } else if meta.path.is_ident("accept") {
            endpoint.accept_override = Some(string_value(&meta)?);
        } else if meta.path.is_ident("content_type") {
            endpoint.content_type_override = Some(string_value(&meta)?);
        } else if meta.path.is_ident("description") {
            endpoint.description = Some(string_value(&meta)?);
        } else if meta.path.is_ident("header") {
            endpoint.headers.push(named_pair(&meta, "name", "value")?);
        } else if meta.path.is_ident("request_field") {
            let (name, ty) = named_pair(&meta, "name", "ty")?;
            endpoint
                .request_fields
                .get_or_insert_with(Vec::new)
                .push(FieldSpec::new(name, ty));
        } else if meta.path.is_ident("response_field") {
            let (name, ty) = named_pair(&meta, "name", "ty")?;
            endpoint
                .response_fields
                .get_or_insert_with(Vec::new)
                .push(FieldSpec::new(name, ty));
        } else if meta.path.is_ident("request_type") {
            let ty: syn::Type = meta.value()?.parse()?;
            endpoint.request_type = Some(TypeRegistry::type_ref_from_syn(&ty, &[]));
        } else if meta.path.is_ident("response_type") {
            let ty: syn::Type = meta.value()?.parse()?;
            endpoint.response_type = Some(TypeRegistry::type_ref_from_syn(&ty, &[]));
        } else if meta.path.is_ident("status") {
            endpoint.status_codes.push(status_value(&meta)?);
        } else if meta.path.is_ident("roles") {
            endpoint.roles_override = Some(string_list(&meta)?);
        } else {
            return Err(meta.error(format!("unsupported {} key", ENDPOINT_ATTRIBUTE)));
        }
        Ok(())
    })?;

    endpoint.http_method =
        method.ok_or_else(|| syn::Error::new(attr.span(), "missing required key `method`"))?;
    endpoint.url_suffix =
        url.ok_or_else(|| syn::Error::new(attr.span(), "missing required key `url`"))?;
    Ok(endpoint)
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let value: LitStr = meta.value()?.parse()?;
    Ok(value.value())
}

/// Accepts `method = "POST"` as well as `method = POST`.
fn method_value(meta: &ParseNestedMeta) -> syn::Result<HttpMethod> {
    let input = meta.value()?;
    let (raw, span) = if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        (lit.value(), lit.span())
    } else {
        let ident: syn::Ident = input.parse()?;
        (ident.to_string(), ident.span())
    };
    raw.parse::<HttpMethod>()
        .map_err(|message| syn::Error::new(span, message))
}

/// Reads `key("a", "b", ...)`.
fn string_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().map(|lit| lit.value()).collect())
}

/// Reads `key(first = "..", second = "..")` where both keys are required.
fn named_pair(meta: &ParseNestedMeta, first: &str, second: &str) -> syn::Result<(String, String)> {
    let mut first_value = None;
    let mut second_value = None;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident(first) {
            first_value = Some(string_value(&inner)?);
        } else if inner.path.is_ident(second) {
            second_value = Some(string_value(&inner)?);
        } else {
            return Err(inner.error(format!("expected `{}` or `{}`", first, second)));
        }
        Ok(())
    })?;

    match (first_value, second_value) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(meta.error(format!("both `{}` and `{}` are required", first, second))),
    }
}

fn status_value(meta: &ParseNestedMeta) -> syn::Result<(u16, String)> {
    let mut code = None;
    let mut description = None;

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("code") {
            let lit: LitInt = inner.value()?.parse()?;
            code = Some(lit.base10_parse::<u16>()?);
        } else if inner.path.is_ident("description") {
            description = Some(string_value(&inner)?);
        } else {
            return Err(inner.error("expected `code` or `description`"));
        }
        Ok(())
    })?;

    let code = code.ok_or_else(|| meta.error("status requires a `code`"))?;
    Ok((code, description.unwrap_or_default()))
}
