//! Generation Run
//!
//! Walks every resource method of an API description, builds its resource
//! page, resolves its traits and grows the free-type page forest from the
//! unique property sets of its JSON bodies.
//!
//! A method whose free-type generation fails is abandoned on its own: pages
//! it registered are rolled back, an error diagnostic is recorded and the run
//! moves on to the next method.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{
    method_schemas, resolve_is_parameters, unique_property_sets, ApiRoot, Method, Resource, ResourcePage,
};
use crate::config::DocConfig;
use crate::diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
use crate::error::{DocError, Result};
use crate::pages::names::singular_resource_name;
use crate::pages::{walk_pages, FreeTypePage, PageHierarchy, PageNameRegistry};

/// Everything one run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneratedDocs {
    pub resource_pages: Vec<ResourcePage>,
    /// Top-level free-type pages; subpages hang off each page
    pub free_type_pages: Vec<FreeTypePage>,
    pub diagnostics: Diagnostics,
}

impl GeneratedDocs {
    /// Every free-type page, depth-first
    pub fn all_free_type_pages(&self) -> impl Iterator<Item = &FreeTypePage> {
        walk_pages(&self.free_type_pages)
    }

    pub fn free_type_page(&self, full_name: &str) -> Option<&FreeTypePage> {
        self.all_free_type_pages().find(|p| p.full_name == full_name)
    }

    pub fn resource_page(&self, key: &str) -> Option<&ResourcePage> {
        self.resource_pages.iter().find(|p| p.key == key)
    }

    pub fn free_type_page_count(&self) -> usize {
        self.free_type_pages.iter().map(FreeTypePage::page_count).sum()
    }
}

/// One documentation generation run
pub struct GenerationRun {
    config: DocConfig,
    registry: PageNameRegistry,
    diagnostics: Diagnostics,
}

impl GenerationRun {
    pub fn new(config: DocConfig) -> Self {
        Self {
            config,
            registry: PageNameRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &DocConfig {
        &self.config
    }

    /// Page names registered so far, in creation order
    pub fn registry(&self) -> &PageNameRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Forget every registered page name and pending diagnostic
    pub fn reset(&mut self) {
        self.registry.clear();
        self.diagnostics = Diagnostics::new();
    }

    /// Generate every resource and free-type page of `api`
    pub fn generate(&mut self, api: &ApiRoot) -> GeneratedDocs {
        self.reset();

        let mut docs = GeneratedDocs::default();
        let mut singular_name = String::new();

        for resource in &api.resources {
            if let Some(name) = singular_resource_name(resource.title()) {
                singular_name = name;
            }

            for method in &resource.methods {
                let page = self.generate_method(api, resource, method, &singular_name, &mut docs.free_type_pages);
                docs.resource_pages.push(page);
            }
        }

        docs.diagnostics = std::mem::take(&mut self.diagnostics);
        info!(
            resource_pages = docs.resource_pages.len(),
            free_type_pages = docs.free_type_page_count(),
            warnings = docs.diagnostics.warning_count(),
            errors = docs.diagnostics.error_count(),
            "generation finished"
        );
        docs
    }

    fn generate_method(
        &mut self,
        api: &ApiRoot,
        resource: &Resource,
        method: &Method,
        singular_name: &str,
        out: &mut Vec<FreeTypePage>,
    ) -> ResourcePage {
        let mut method = method.clone();
        let resolution = resolve_is_parameters(api, &mut method, self.config.generation.trait_merge);

        let mut page = ResourcePage::build(resource, &method, singular_name, &self.config.site);
        let location = page.key.clone();

        for name in &resolution.missing {
            self.diagnostics.unresolved_trait(&location, name);
        }
        for resolved in &resolution.resolved {
            self.diagnostics
                .unresolved_placeholders(&location, &resolved.name, &resolved.unresolved);
        }
        page.traits = resolution.resolved;

        let checkpoint = self.registry.len();
        match self.free_type_pages(&page, &method) {
            Ok(pages) => {
                debug!(page = %location, free_type_pages = pages.len(), "generated method pages");
                out.extend(pages);
            }
            Err(err) => {
                self.registry.truncate(checkpoint);
                warn!(page = %location, error = %err, "abandoning free-type pages of method");
                self.record_abort(&location, &err);
            }
        }

        page
    }

    fn free_type_pages(&mut self, page: &ResourcePage, method: &Method) -> Result<Vec<FreeTypePage>> {
        let schemas = method_schemas(method)?;
        let property_sets = unique_property_sets(&schemas, &page.key)?;

        let mut pages = Vec::new();
        let mut hierarchy = PageHierarchy::new(&mut self.registry, &mut self.diagnostics, &self.config);
        for properties in &property_sets {
            for (key, schema) in properties {
                hierarchy.generate_free_type_pages(
                    &page.resource_link,
                    &page.base_resource_type,
                    key,
                    schema,
                    &mut pages,
                )?;
            }
        }

        Ok(pages)
    }

    fn record_abort(&mut self, location: &str, err: &DocError) {
        if let DocError::MissingProperty { property, context } = err {
            self.diagnostics.push(
                DiagnosticItem::new(
                    location,
                    DiagnosticCode::MissingProperty,
                    format!("Body schema has no '{}'", property),
                )
                .with_context(context.clone()),
            );
        }
        self.diagnostics.report(
            location,
            DiagnosticCode::MethodAborted,
            format!("Free-type pages not generated: {}", err),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePagePolicy;
    use serde_json::json;

    fn api(value: serde_json::Value) -> ApiRoot {
        ApiRoot::from_value(value).unwrap()
    }

    fn payment_schema() -> serde_json::Value {
        json!({
            "properties": {
                "id": { "type": "string" },
                "source": {
                    "oneOf": [
                        {
                            "type": "object",
                            "required": ["type"],
                            "properties": {
                                "type": { "enum": ["card"] },
                                "number": { "type": "string" }
                            }
                        },
                        {
                            "type": "object",
                            "required": ["type"],
                            "properties": {
                                "type": { "enum": ["bank"] },
                                "iban": { "type": "string" }
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_generates_resource_and_free_type_pages() {
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": {
                    "get": {
                        "responses": { "200": { "bodies": { "application/json": { "schema": payment_schema() } } } }
                    }
                }
            }]
        }));

        let mut run = GenerationRun::new(DocConfig::default());
        let docs = run.generate(&api);

        assert_eq!(docs.resource_pages.len(), 1);
        assert_eq!(docs.resource_pages[0].base_resource_type, "payment");
        let names: Vec<_> = docs.all_free_type_pages().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["payment.source.card", "payment.source.bank"]);

        let card = docs.free_type_page("payment.source.card").unwrap();
        assert_eq!(card.parent_link, "Payment.source");
        assert_eq!(card.resource_link, "/api/resource-payments.html");
        assert!(docs.diagnostics.is_empty());
        assert_eq!(run.registry().len(), 2);
    }

    #[test]
    fn test_same_property_set_is_generated_once() {
        let body = json!({ "application/json": { "schema": payment_schema() } });
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": {
                    "post": { "bodies": body, "responses": { "201": { "bodies": body } } }
                }
            }]
        }));

        let docs = GenerationRun::new(DocConfig::default()).generate(&api);

        assert_eq!(docs.free_type_page_count(), 2);
        assert!(docs.diagnostics.is_empty());
    }

    #[test]
    fn test_repeat_across_methods_is_skipped() {
        let body = json!({ "application/json": { "schema": payment_schema() } });
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": { "post": { "bodies": body }, "put": { "bodies": body } }
            }]
        }));

        let docs = GenerationRun::new(DocConfig::default()).generate(&api);

        assert_eq!(docs.free_type_page_count(), 2);
        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::DuplicatePage).count(), 2);
    }

    #[test]
    fn test_duplicate_error_policy_aborts_method_only() {
        let body = json!({ "application/json": { "schema": payment_schema() } });
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": { "post": { "bodies": body }, "put": { "bodies": body } }
            }]
        }));
        let mut config = DocConfig::default();
        config.generation.duplicate_pages = DuplicatePagePolicy::Error;

        let mut run = GenerationRun::new(config);
        let docs = run.generate(&api);

        assert_eq!(docs.resource_pages.len(), 2);
        assert_eq!(docs.free_type_page_count(), 2);
        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::MethodAborted).count(), 1);
        assert_eq!(run.registry().len(), 2);
    }

    #[test]
    fn test_missing_properties_aborts_method_and_rolls_back() {
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": {
                    "post": {
                        "bodies": { "application/json": { "schema": payment_schema() } },
                        "responses": { "201": { "bodies": { "application/json": { "schema": { "type": "object" } } } } }
                    },
                    "get": {
                        "responses": { "200": { "bodies": { "application/json": { "schema": payment_schema() } } } }
                    }
                }
            }]
        }));

        let docs = GenerationRun::new(DocConfig::default()).generate(&api);

        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::MissingProperty).count(), 1);
        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::MethodAborted).count(), 1);
        assert!(docs.diagnostics.has_errors());
        // nothing was registered for the aborted method
        assert_eq!(docs.free_type_page_count(), 2);
        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::DuplicatePage).count(), 0);
    }

    #[test]
    fn test_traits_resolved_before_page_is_built() {
        let api = api(json!({
            "traits": [{ "paged": { "queryParameters": { "limit": { "default": "<<maxItems>>" } } } }],
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": { "get": { "is": [{ "paged": { "maxItems": 20 } }, "audited"] } }
            }]
        }));

        let docs = GenerationRun::new(DocConfig::default()).generate(&api);

        let page = &docs.resource_pages[0];
        assert_eq!(page.query_parameters[0].default, Some(json!(20)));
        assert_eq!(page.traits.len(), 1);
        assert_eq!(docs.diagnostics.with_code(DiagnosticCode::UnresolvedTrait).count(), 1);
    }

    #[test]
    fn test_singular_name_carries_over() {
        let api = api(json!({
            "resources": [
                { "displayName": "Users", "relativeUri": "/users", "methods": { "post": {} } },
                { "displayName": "/me", "relativeUri": "/me", "methods": { "put": {} } }
            ]
        }));

        let docs = GenerationRun::new(DocConfig::default()).generate(&api);

        assert_eq!(docs.resource_pages[0].base_resource_type, "user");
        assert_eq!(docs.resource_pages[1].base_resource_type, "user");
    }

    #[test]
    fn test_each_run_starts_empty() {
        let api = api(json!({
            "resources": [{
                "displayName": "Payments",
                "relativeUri": "/payments",
                "methods": { "post": { "bodies": { "application/json": { "schema": payment_schema() } } } }
            }]
        }));

        let mut run = GenerationRun::new(DocConfig::default());
        let first = run.generate(&api);
        let second = run.generate(&api);

        assert_eq!(first.free_type_page_count(), second.free_type_page_count());
        assert!(second.diagnostics.is_empty());

        run.reset();
        assert!(run.registry().is_empty());
    }
}
