//! Attribute Type Mapping
//!
//! Maps one schema attribute to one TypeScript property line. Relation and
//! media properties go through the interface's populate switch `P`: populated
//! they are the target type, otherwise bare numeric ids.

use tracing::debug;

use super::collect::MEDIA_NAME;
use super::enums::{enum_type_name, render_enum};
use super::names::{NameResolver, USERS_PERMISSIONS_USER};
use super::{CodegenContext, SchemaOrigin, SchemaRecord};
use crate::schema::{AttributeDescriptor, RelationArity};

const ANY: &str = "any";

/// What one attribute contributes to its interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    /// Property line, indented and terminated with `;\n`
    pub line: String,
    /// Enum declaration produced for an enumeration attribute
    pub enum_block: Option<String>,
    /// Declaration name this property refers to
    pub dependency: Option<String>,
}

impl Emission {
    fn property(name: &str, optional: bool, type_text: &str) -> Self {
        Self {
            line: property_line(name, optional, type_text),
            enum_block: None,
            dependency: None,
        }
    }

    fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }
}

/// `  name?: type;\n`
pub fn property_line(name: &str, optional: bool, type_text: &str) -> String {
    format!("  {}{}: {};\n", name, if optional { "?" } else { "" }, type_text)
}

/// Type text for a populate-switched reference to `type_name`
pub fn populate_switch(type_name: &str, array: bool) -> String {
    if array {
        format!("P extends true ? {}<P>[] : number[]", type_name)
    } else {
        format!("P extends true ? {}<P> | null : number | null", type_name)
    }
}

/// Append `| null` unless the attribute declares a default
fn nullable_unless_default(type_text: &str, attribute: &AttributeDescriptor) -> String {
    if attribute.has_default() {
        type_text.to_string()
    } else {
        format!("{} | null", type_text)
    }
}

/// The fixed shape of the media schema's `formats` attribute
pub const MEDIA_FORMATS_LINE: &str =
    "  formats: { thumbnail: MediaFormat; small: MediaFormat; medium: MediaFormat; large: MediaFormat };\n";

/// Map one attribute of `record`.
///
/// Returns `None` for attributes that emit nothing: passwords, and
/// relation, component and media attributes whose target is missing,
/// ignored or otherwise not declared in the module.
pub fn map_attribute(
    record: &SchemaRecord<'_>,
    name: &str,
    attribute: &AttributeDescriptor,
    ctx: &CodegenContext<'_, '_>,
) -> Option<Emission> {
    if is_media_formats(record, name) {
        return Some(Emission {
            line: MEDIA_FORMATS_LINE.to_string(),
            enum_block: None,
            dependency: None,
        });
    }

    let optional = attribute.is_optional();

    let emission = match attribute {
        AttributeDescriptor::Relation { arity, target, .. } => {
            let Some(target) = target.as_deref() else {
                debug!("{}.{}: relation without target, dropped", record.canonical_name, name);
                return None;
            };
            let type_name = declared_target(record, name, target, ctx, |r| r.relation_type_name(target))?;
            let type_text = populate_switch(&type_name, *arity == RelationArity::ToMany);
            Emission::property(name, optional, &type_text).with_dependency(type_name)
        }

        AttributeDescriptor::Component { component, repeatable, target, .. } => {
            let type_name = if target.as_deref() == Some(USERS_PERMISSIONS_USER) {
                declared_target(record, name, USERS_PERMISSIONS_USER, ctx, |r| {
                    r.relation_type_name(USERS_PERMISSIONS_USER)
                })?
            } else {
                declared_target(record, name, component, ctx, |r| r.component_type_name(component))?
            };
            let type_text = if *repeatable {
                format!("{}[]", type_name)
            } else {
                type_name.clone()
            };
            Emission::property(name, false, &type_text).with_dependency(type_name)
        }

        // Dynamic zones are a union of components; not modelled yet
        AttributeDescriptor::DynamicZone { .. } => Emission::property(name, false, ANY),

        AttributeDescriptor::Media { multiple, .. } => {
            let Some(type_name) = ctx.resolver().media_type_name() else {
                debug!("{}.{}: no media type in the module, dropped", record.canonical_name, name);
                return None;
            };
            let type_text = populate_switch(&type_name, *multiple);
            Emission::property(name, optional, &type_text).with_dependency(type_name)
        }

        AttributeDescriptor::Enumeration { values, .. } => {
            let enum_name = enum_type_name(&record.canonical_name, name);
            let mut emission = Emission::property(name, optional, &enum_name);
            emission.enum_block = Some(render_enum(&enum_name, values));
            emission
        }

        AttributeDescriptor::Password { .. } => return None,

        AttributeDescriptor::Text { .. } => Emission::property(name, optional, "string"),

        AttributeDescriptor::Json { .. } => Emission::property(name, optional, ANY),

        AttributeDescriptor::Number { .. } => {
            Emission::property(name, optional, &nullable_unless_default("number", attribute))
        }

        AttributeDescriptor::Date { .. } => {
            Emission::property(name, optional, &nullable_unless_default("string", attribute))
        }

        AttributeDescriptor::Boolean { .. } => Emission::property(name, optional, "boolean"),

        AttributeDescriptor::Unknown { kind, .. } => {
            debug!("{}.{}: unknown attribute type '{}', emitted as any", record.canonical_name, name, kind);
            Emission::property(name, optional, ANY)
        }
    };

    Some(emission)
}

/// Resolve a referenced uid to a declared type name, logging why it is not
fn declared_target(
    record: &SchemaRecord<'_>,
    name: &str,
    target: &str,
    ctx: &CodegenContext<'_, '_>,
    resolve: impl FnOnce(&NameResolver<'_, '_>) -> Option<String>,
) -> Option<String> {
    if ctx.is_ignored(target) {
        debug!("{}.{}: target {} is ignored, dropped", record.canonical_name, name, target);
        return None;
    }
    let resolved = resolve(ctx.resolver());
    if resolved.is_none() {
        debug!("{}.{}: target {} is not declared, dropped", record.canonical_name, name, target);
    }
    resolved
}

fn is_media_formats(record: &SchemaRecord<'_>, name: &str) -> bool {
    record.origin == SchemaOrigin::ContentType && record.schema_name == MEDIA_NAME && name == "formats"
}
