//! Interface Assembly
//!
//! Builds the `export interface` block for one record. Enum blocks are kept
//! apart from the body; the composer places all enums before all interfaces.

use tracing::debug;

use super::attributes::{map_attribute, property_line};
use super::{AssembledSchema, CodegenContext, SchemaOrigin, SchemaRecord};

/// Assemble one record against the finished record list.
///
/// Returns `None` when the record has no schema descriptor.
pub fn assemble(record: &SchemaRecord<'_>, ctx: &CodegenContext<'_, '_>) -> Option<AssembledSchema> {
    let Some(schema) = record.schema else {
        debug!("Schema {} is empty. Skipping conversion.", record.schema_name);
        return None;
    };

    let name = &record.canonical_name;
    let mut body = format!("export interface {}<P extends boolean = true> {{\n", name);
    let mut enums: Vec<String> = Vec::new();
    let mut dependencies: Vec<String> = Vec::new();

    if record.origin == SchemaOrigin::ContentType {
        body.push_str(&property_line("id", true, "number"));
        body.push_str(&property_line("documentId", true, "string"));
    }

    for (attribute_name, attribute) in &schema.attributes {
        let Some(emission) = map_attribute(record, attribute_name, attribute, ctx) else {
            continue;
        };
        body.push_str(&emission.line);

        if let Some(block) = emission.enum_block {
            if !enums.contains(&block) {
                enums.push(block);
            }
        }
        if let Some(dependency) = emission.dependency {
            if !dependencies.contains(&dependency) {
                dependencies.push(dependency);
            }
        }
    }

    if schema.is_localized() {
        body.push_str(&property_line("locale", false, "string"));
        body.push_str(&property_line("localizations", true, &format!("{}[]", name)));
    }

    body.push_str("}\n");

    Some(AssembledSchema {
        uid: record.uid.clone(),
        canonical_name: name.clone(),
        origin: record.origin,
        body,
        enums,
        dependencies,
    })
}
