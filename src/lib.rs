//! apidoc-from-source - Endpoint documentation generated from annotated Rust handlers.
//!
//! Handler groups (controllers) are plain types marked with `#[api_group(...)]`;
//! their handler functions are marked with `#[endpoint(...)]`. This crate reads
//! those attributes straight from source, merges endpoint values over group
//! defaults, expands request and response shape types into nested field maps,
//! and produces a single JSON/YAML document that can be written to disk or
//! served over HTTP with a bundled viewer page.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively collects the `.rs` files of a project
//! 2. [`parser`] - Parses source files into syntax trees
//! 3. [`type_registry`] - Indexes every struct and enum by name
//! 4. [`extractor`] - Reads group and endpoint attributes into [`descriptor`]s
//! 5. [`introspector`] - Expands a shape type into a [`schema::SchemaNode`] tree
//! 6. [`resolver`] - Applies endpoint > group > default precedence
//! 7. [`collector`] - Resolves every documented handler of every group
//! 8. [`document`] / [`validator`] - Assembles and checks the final document
//! 9. [`serializer`] / [`host`] - Writes the document out or serves it
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     collector::EndpointCollector,
//!     document::assemble,
//!     extractor::extract_groups,
//!     parser::SourceParser,
//!     scanner::SourceScanner,
//!     serializer::serialize,
//!     service_info::ServiceInfo,
//!     type_registry::TypeRegistry,
//! };
//! use std::path::PathBuf;
//!
//! let scan = SourceScanner::new(PathBuf::from("./my-service")).scan().unwrap();
//! let parsed = SourceParser::parse_all(&scan.source_files).parsed;
//!
//! let registry = TypeRegistry::from_files(&parsed);
//! let groups = extract_groups(&parsed, &[]).unwrap();
//! let endpoints = EndpointCollector::new(&registry).collect(&groups).unwrap();
//!
//! let doc = assemble(ServiceInfo::new().title("Shop API").version("1"), endpoints);
//! println!("{}", serialize(&doc, true).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod collector;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod extractor;
pub mod host;
pub mod introspector;
pub mod ordered_map;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod serializer;
pub mod service_info;
pub mod type_registry;
pub mod validator;
