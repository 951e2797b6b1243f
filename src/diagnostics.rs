//! Diagnostics
//!
//! Collects degraded-but-valid outcomes of a generation run: things that did
//! not abort the run but that a documentation author should look at.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // === Schemas ===
    /// More than one of anyOf/oneOf/allOf on the same node
    AmbiguousUnion,
    /// A schema lacks a keyword its caller requires
    MissingProperty,

    // === Traits ===
    /// `is` names a trait absent from the global trait table
    UnresolvedTrait,
    /// A `<<param>>` token had no matching argument
    UnresolvedPlaceholder,

    // === Pages ===
    /// A free-type page name was discovered a second time
    DuplicatePage,
    /// Free-type generation for a method was abandoned
    MethodAborted,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmbiguousUnion => "W001",
            Self::UnresolvedTrait => "W002",
            Self::UnresolvedPlaceholder => "W003",
            Self::DuplicatePage => "W004",
            Self::MethodAborted => "E001",
            Self::MissingProperty => "E002",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::MethodAborted | Self::MissingProperty => Severity::Error,

            Self::AmbiguousUnion
            | Self::UnresolvedTrait
            | Self::UnresolvedPlaceholder
            | Self::DuplicatePage => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Where the issue was found (method slug, page name or attribute id)
    pub location: String,
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(location: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.location
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    pub fn report(&mut self, location: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) {
        self.push(DiagnosticItem::new(location, code, message));
    }

    /// Record a union node declaring several combinators
    pub fn ambiguous_union(&mut self, attribute_id: &str, kinds: &[&str], chosen: &str) {
        self.push(
            DiagnosticItem::new(
                attribute_id,
                DiagnosticCode::AmbiguousUnion,
                format!("Union declares {} combinators, using '{}'", kinds.len(), chosen),
            )
            .with_context(format!("Declared: {}", kinds.join(", "))),
        );
    }

    /// Record a trait reference with no global definition
    pub fn unresolved_trait(&mut self, method: &str, trait_name: &str) {
        self.report(
            method,
            DiagnosticCode::UnresolvedTrait,
            format!("Trait '{}' is not defined", trait_name),
        );
    }

    /// Record placeholders that survived substitution
    pub fn unresolved_placeholders(&mut self, method: &str, trait_name: &str, tokens: &[String]) {
        if tokens.is_empty() {
            return;
        }
        self.push(
            DiagnosticItem::new(
                method,
                DiagnosticCode::UnresolvedPlaceholder,
                format!("Trait '{}' left {} placeholder(s) unresolved", trait_name, tokens.len()),
            )
            .with_context(format!("Tokens: {}", tokens.join(", "))),
        );
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Items carrying a given code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.code == code)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if self.has_errors() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                self.error_count(),
                self.warning_count()
            ));
        } else if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
