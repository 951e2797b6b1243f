//! API Reference Schemas
//!
//! Turns an in-memory API description and the JSON Schemas of its bodies into
//! structured documentation records: one page per resource method, an ordered
//! attribute table per schema, and a standalone page for every object variant
//! of an `anyOf`/`oneOf`/`allOf` union, linked to its nearest visible ancestor.
//!
//! ## Pipeline
//!
//! ```text
//! ApiRoot
//!   └── Resource / Method ──(traits resolved)──> ResourcePage
//!         └── unique body property sets
//!               └── Flattener ──> AttributeRow table
//!                     └── union rows ──> FreeTypePage forest
//!                                         (parent links via PageNameRegistry)
//! ```
//!
//! Rendering, site layouts and client snippets are left to the consumer; every
//! record serializes with `serde`.
//!
//! ## Example
//!
//! ```no_run
//! use apiref_schemas::{ApiRoot, DocConfig, GenerationRun};
//!
//! let api = ApiRoot::from_yaml_str(include_str!("../tests/fixtures/payments.yaml"))?;
//! let docs = GenerationRun::new(DocConfig::load()?).generate(&api);
//! for page in docs.all_free_type_pages() {
//!     println!("{} -> {}", page.full_name, page.parent_link);
//! }
//! # Ok::<(), apiref_schemas::DocError>(())
//! ```

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod pages;
pub mod schema;

pub use api::{resolve_is_parameters, ApiRoot, Method, NamedParameter, Resource, ResourcePage};
pub use config::{DocConfig, DuplicatePagePolicy, TraitMergePolicy};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use error::{DocError, Result};
pub use generator::{GeneratedDocs, GenerationRun};
pub use pages::{FreeTypePage, PageHierarchy, PageNameRegistry};
pub use schema::{flatten, AttributeRow, Flattener, UnionKind};
