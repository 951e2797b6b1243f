//! Free-Type Page Hierarchy
//!
//! Every linkable union variant found while flattening a schema becomes a
//! free-type page. Pages are created depth-first: a page is built from its
//! variant schema, its name is registered, then its own schema is scanned
//! for further variants which become its subpages.
//!
//! ```text
//! Discovered -> Created -> Registered -> Expanded
//! ```

pub mod names;
pub mod parent;
pub mod registry;

pub use names::{slugify, upcase_first, url_safe};
pub use parent::{parse_base, resolve_ancestor, resolve_parent};
pub use registry::PageNameRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{DocConfig, DuplicatePagePolicy};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::error::{DocError, Result};
use crate::schema::{AttributeRow, Flattener, UnionKind};

/// A standalone documentation page for one union variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeTypePage {
    /// Dotted name: `prefix.rowId.variantId`
    pub full_name: String,
    /// Variant id
    pub id: String,
    /// Output file name
    pub name: String,
    pub key: String,
    /// First name segment, capitalized
    pub base_resource: String,
    /// Breadcrumb to the nearest visible ancestor
    pub parent_link: String,
    /// Link to the resource page the hierarchy started from
    pub resource_link: String,
    pub subpage_link_prefix: String,
    /// Attribute table of the variant schema
    pub rows: Vec<AttributeRow>,
    pub subpages: Vec<FreeTypePage>,
}

impl FreeTypePage {
    pub fn first_row(&self) -> Option<&AttributeRow> {
        self.rows.first()
    }

    pub fn remaining_rows(&self) -> &[AttributeRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// This page and all of its descendants, in creation order
    pub fn iter(&self) -> PageIter<'_> {
        PageIter { stack: vec![self] }
    }

    pub fn page_count(&self) -> usize {
        self.iter().count()
    }
}

/// Pre-order walk over a page tree
pub struct PageIter<'a> {
    stack: Vec<&'a FreeTypePage>,
}

impl<'a> Iterator for PageIter<'a> {
    type Item = &'a FreeTypePage;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.stack.pop()?;
        self.stack.extend(page.subpages.iter().rev());
        Some(page)
    }
}

/// Pre-order walk over a forest of pages
pub fn walk_pages(pages: &[FreeTypePage]) -> impl Iterator<Item = &FreeTypePage> {
    pages.iter().flat_map(FreeTypePage::iter)
}

/// Creates free-type pages against one run's registry
pub struct PageHierarchy<'r> {
    registry: &'r mut PageNameRegistry,
    diagnostics: &'r mut Diagnostics,
    config: &'r DocConfig,
    flattener: Flattener,
}

impl<'r> PageHierarchy<'r> {
    pub fn new(
        registry: &'r mut PageNameRegistry,
        diagnostics: &'r mut Diagnostics,
        config: &'r DocConfig,
    ) -> Self {
        Self {
            registry,
            diagnostics,
            config,
            flattener: Flattener::new(config.generation.max_depth),
        }
    }

    /// Flatten `schema` under `root_id` and create a page for every linkable
    /// variant of every union row, appending top-level pages to `out`.
    ///
    /// `name_prefix` starts as the base resource type; subpages use their
    /// parent page's full name.
    pub fn generate_free_type_pages(
        &mut self,
        resource_link: &str,
        name_prefix: &str,
        root_id: &str,
        schema: &Value,
        out: &mut Vec<FreeTypePage>,
    ) -> Result<()> {
        let rows = self.flattener.flatten(schema, root_id)?;
        self.expand_rows(resource_link, name_prefix, &rows, 0, out)
    }

    fn expand_rows(
        &mut self,
        resource_link: &str,
        name_prefix: &str,
        rows: &[AttributeRow],
        depth: usize,
        out: &mut Vec<FreeTypePage>,
    ) -> Result<()> {
        if depth > self.config.generation.max_depth {
            return Err(DocError::DepthLimitExceeded {
                path: name_prefix.to_string(),
                limit: self.config.generation.max_depth,
            });
        }

        for row in rows.iter().filter(|r| r.is_union()) {
            self.note_ambiguous_union(name_prefix, row);

            let page_prefix = format!("{}.{}", name_prefix, row.id);
            for variant in row.linked_variants() {
                if let Some(page) = self.create_page(resource_link, &page_prefix, variant, depth)? {
                    out.push(page);
                }
            }
        }

        Ok(())
    }

    fn create_page(
        &mut self,
        resource_link: &str,
        name_prefix: &str,
        variant: &AttributeRow,
        depth: usize,
    ) -> Result<Option<FreeTypePage>> {
        let full_name = format!("{}.{}", name_prefix, variant.id);

        if self.registry.contains(&full_name) {
            return match self.config.generation.duplicate_pages {
                DuplicatePagePolicy::Skip => {
                    warn!(page = %full_name, "skipping duplicate free-type page");
                    self.diagnostics.report(
                        &full_name,
                        DiagnosticCode::DuplicatePage,
                        "Page name already generated in this run; repeat skipped",
                    );
                    Ok(None)
                }
                DuplicatePagePolicy::Error => Err(DocError::DuplicatePage(full_name)),
            };
        }

        let base_resource = parse_base(&full_name);
        let parent_link = resolve_parent(name_prefix, &base_resource, self.registry);
        let rows = self.flattener.flatten(&variant.raw, "")?;
        let file_stem = url_safe(&full_name);
        let config = self.config;

        self.registry.register(full_name.as_str());
        debug!(page = %full_name, parent = %parent_link, "created free-type page");

        let mut subpages = Vec::new();
        self.expand_rows(resource_link, &full_name, &rows, depth + 1, &mut subpages)?;

        Ok(Some(FreeTypePage {
            id: variant.id.clone(),
            name: format!("{}.html", file_stem),
            key: format!("{}{}-information", config.site.key_prefix, full_name),
            subpage_link_prefix: format!("/{}{}", config.site.url_prefix, file_stem),
            resource_link: resource_link.to_string(),
            full_name,
            base_resource,
            parent_link,
            rows,
            subpages,
        }))
    }

    fn note_ambiguous_union(&mut self, name_prefix: &str, row: &AttributeRow) {
        let Some(fields) = row.raw.as_object() else {
            return;
        };
        let declared = UnionKind::declared_in(fields);
        if declared.len() > 1 {
            let kinds: Vec<&str> = declared.iter().map(UnionKind::keyword).collect();
            let chosen = declared[0].keyword();
            warn!(attribute = %row.id, chosen, "union declares several combinators");
            self.diagnostics
                .ambiguous_union(&format!("{}.{}", name_prefix, row.id), &kinds, chosen);
        }
    }
}
