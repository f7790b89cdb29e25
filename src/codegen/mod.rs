//! Code Generation
//!
//! Generates the TypeScript declaration module from schema descriptors.
//!
//! Architecture:
//! - Collection (`collect`): filters ids and builds one SchemaRecord per
//!   retained schema, with its final declaration name already assigned
//! - CodegenContext: immutable view over the finished record list
//! - Assembly (`interface`, `attributes`, `enums`): one interface body plus
//!   enum blocks per record, resolved against the context
//! - Composition (`compose`): all enums, all bodies, then the fixed helpers
//!
//! The key constraint: no record is assembled before every record has been
//! collected. `assemble` only accepts a `CodegenContext`, and a context can
//! only be built from a finished record list.

pub mod attributes;
pub mod collect;
pub mod compose;
pub mod enums;
pub mod interface;
pub mod names;

use tracing::{debug, info};

use crate::config::PluginConfig;
use crate::schema::{SchemaDescriptor, SchemaInput};

pub use collect::{collect_records, Collected, IgnoreMatcher};
pub use names::{find_component_by_property_name, pascal_case, NameResolver};

// =============================================================================
// Records
// =============================================================================

/// Which registry a schema came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOrigin {
    ContentType,
    Component,
}

/// One retained schema, as seen by the assembler.
///
/// Created by the collector with its final name; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchemaRecord<'a> {
    /// Unique id in the source registry
    pub uid: String,

    /// Name the declaration is derived from (singular name or display name)
    pub schema_name: String,

    /// Declaration name, including the `Component` suffix when applied
    pub canonical_name: String,

    pub origin: SchemaOrigin,

    /// Whether `Component` was appended to disambiguate this component
    pub needs_component_suffix: bool,

    /// Descriptor in the source registry; `None` when the registry entry was empty
    pub schema: Option<&'a SchemaDescriptor>,
}

/// Output of assembling one record
#[derive(Debug, Clone)]
pub struct AssembledSchema {
    pub uid: String,
    pub canonical_name: String,
    pub origin: SchemaOrigin,
    /// The `export interface` block
    pub body: String,
    /// `export enum` blocks produced by the schema's enumeration attributes
    pub enums: Vec<String>,
    /// Declaration names this schema refers to
    pub dependencies: Vec<String>,
}

// =============================================================================
// CodegenContext
// =============================================================================

/// Immutable context shared by every assembly step.
pub struct CodegenContext<'r, 'a> {
    resolver: NameResolver<'r, 'a>,
    matcher: &'r IgnoreMatcher,
}

impl<'r, 'a> CodegenContext<'r, 'a> {
    /// Build from the complete, collected record list
    pub fn new(records: &'r [SchemaRecord<'a>], matcher: &'r IgnoreMatcher) -> Self {
        Self {
            resolver: NameResolver::new(records),
            matcher,
        }
    }

    pub fn resolver(&self) -> &NameResolver<'r, 'a> {
        &self.resolver
    }

    /// Whether a referenced uid was filtered out of the module
    pub fn is_ignored(&self, uid: &str) -> bool {
        self.matcher.should_skip(uid)
    }
}

// =============================================================================
// Converter
// =============================================================================

/// Output from a conversion run
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// The declaration module text
    pub code: String,
    /// Number of content type interfaces emitted
    pub content_type_count: usize,
    /// Number of component interfaces emitted
    pub component_count: usize,
    /// Ids that were filtered out or dropped
    pub skipped: Vec<String>,
}

/// Runs collection, assembly and composition over one input
pub struct Converter<'a> {
    input: &'a SchemaInput,
    config: &'a PluginConfig,
}

impl<'a> Converter<'a> {
    pub fn new(input: &'a SchemaInput, config: &'a PluginConfig) -> Self {
        Self { input, config }
    }

    /// Produce the declaration module
    pub fn convert(&self) -> GeneratedOutput {
        let matcher = IgnoreMatcher::from_config(self.config);

        // Phase 1: every record, with its final name
        let Collected { records, mut skipped } = collect_records(self.input, self.config, &matcher);

        // Phase 2: bodies, resolved against the finished list
        let ctx = CodegenContext::new(&records, &matcher);
        let mut assembled = Vec::with_capacity(records.len());
        for record in &records {
            match interface::assemble(record, &ctx) {
                Some(schema) => assembled.push(schema),
                None => skipped.push(record.uid.clone()),
            }
        }

        let content_type_count = assembled
            .iter()
            .filter(|s| s.origin == SchemaOrigin::ContentType)
            .count();
        let component_count = assembled.len() - content_type_count;

        for schema in &assembled {
            if !schema.dependencies.is_empty() {
                debug!("{} depends on {}", schema.canonical_name, schema.dependencies.join(", "));
            }
        }

        info!(
            "Generated {} content types and {} components ({} skipped)",
            content_type_count,
            component_count,
            skipped.len()
        );

        GeneratedOutput {
            code: compose::compose(&assembled),
            content_type_count,
            component_count,
            skipped,
        }
    }
}

/// Convert an input with the given config in one call
pub fn convert(input: &SchemaInput, config: &PluginConfig) -> GeneratedOutput {
    Converter::new(input, config).convert()
}
