//! Schema descriptor types
//!
//! These mirror the JSON the CMS keeps in its content-type and component
//! registries. Only the fields the converter reads are modelled; everything
//! else in the host JSON is ignored during deserialization.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ConvertError, Result};

/// Ordered map from unique schema id to its descriptor.
///
/// A `null` descriptor is kept as `None` so the converter can report and
/// skip it instead of failing the whole input.
pub type SchemaMap = IndexMap<String, Option<SchemaDescriptor>>;

/// Both registries handed to the converter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInput {
    #[serde(default)]
    pub content_types: SchemaMap,
    #[serde(default)]
    pub components: SchemaMap,
}

impl SchemaInput {
    /// Parse a registry dump (`{"contentTypes": {...}, "components": {...}}`)
    ///
    /// Registry and attribute order is kept as written.
    pub fn from_json_str(json: &str) -> Result<Self> {
        if !json.trim_start().starts_with('{') {
            return Err(not_an_object());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Build from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(not_an_object());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a registry dump from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn not_an_object() -> ConvertError {
    ConvertError::InvalidInput("expected an object with `contentTypes` and `components`".to_string())
}

/// A single content type or component definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    /// Unique id as reported by the host (usually equal to the map key)
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub info: SchemaInfo,
    /// Attributes in declaration order
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeDescriptor>,
    #[serde(default)]
    pub plugin_options: PluginOptions,
}

impl SchemaDescriptor {
    /// Whether the i18n plugin localizes this schema
    pub fn is_localized(&self) -> bool {
        self.plugin_options
            .i18n
            .as_ref()
            .map(|i18n| i18n.localized)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInfo {
    #[serde(default)]
    pub singular_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub i18n: Option<I18nOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct I18nOptions {
    #[serde(default)]
    pub localized: bool,
}

// =============================================================================
// Attributes
// =============================================================================

/// Arity of a relation attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationArity {
    ToOne,
    ToMany,
}

impl RelationArity {
    /// Classify a host relation string (`oneToOne`, `manyToMany`, `morphToMany`, ...)
    pub fn from_relation(relation: &str) -> Self {
        if relation.ends_with("ToMany") {
            RelationArity::ToMany
        } else {
            RelationArity::ToOne
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    String,
    Text,
    RichText,
    Email,
    Uid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    BigInteger,
    Decimal,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Date,
    DateTime,
    Time,
    Timestamp,
}

/// One attribute of a schema, tagged by the host's `type` field.
///
/// Unrecognized tags land in [`AttributeDescriptor::Unknown`] so newer host
/// versions still convert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAttribute")]
pub enum AttributeDescriptor {
    Relation {
        arity: RelationArity,
        target: Option<String>,
        required: bool,
    },
    Component {
        component: String,
        repeatable: bool,
        required: bool,
        target: Option<String>,
    },
    DynamicZone {
        components: Vec<String>,
        required: bool,
    },
    Media {
        multiple: bool,
        required: bool,
    },
    Enumeration {
        values: Vec<String>,
        required: bool,
        default: Option<Value>,
    },
    Text {
        kind: TextKind,
        required: bool,
    },
    Password {
        required: bool,
    },
    Json {
        required: bool,
    },
    Number {
        kind: NumberKind,
        required: bool,
        default: Option<Value>,
    },
    Date {
        kind: DateKind,
        required: bool,
        default: Option<Value>,
    },
    Boolean {
        required: bool,
        default: Option<Value>,
    },
    Unknown {
        kind: String,
        required: bool,
    },
}

impl AttributeDescriptor {
    /// The `required` flag as declared by the host
    pub fn required(&self) -> bool {
        match self {
            AttributeDescriptor::Relation { required, .. }
            | AttributeDescriptor::Component { required, .. }
            | AttributeDescriptor::DynamicZone { required, .. }
            | AttributeDescriptor::Media { required, .. }
            | AttributeDescriptor::Enumeration { required, .. }
            | AttributeDescriptor::Text { required, .. }
            | AttributeDescriptor::Password { required }
            | AttributeDescriptor::Json { required }
            | AttributeDescriptor::Number { required, .. }
            | AttributeDescriptor::Date { required, .. }
            | AttributeDescriptor::Boolean { required, .. }
            | AttributeDescriptor::Unknown { required, .. } => *required,
        }
    }

    /// To-many relations and repeatable components are always arrays
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            AttributeDescriptor::Relation { arity: RelationArity::ToMany, .. }
                | AttributeDescriptor::Component { repeatable: true, .. }
        )
    }

    /// Whether the emitted property carries the `?` marker.
    ///
    /// Arrays are never optional: an absent array is an empty one.
    pub fn is_optional(&self) -> bool {
        !self.is_array() && !self.required()
    }

    /// Whether a default value was declared (an explicit `null` counts)
    pub fn has_default(&self) -> bool {
        match self {
            AttributeDescriptor::Enumeration { default, .. }
            | AttributeDescriptor::Number { default, .. }
            | AttributeDescriptor::Date { default, .. }
            | AttributeDescriptor::Boolean { default, .. } => default.is_some(),
            _ => false,
        }
    }
}

/// Flat view of the host attribute JSON, before classification
#[derive(Deserialize)]
struct RawAttribute {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    relation: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    repeatable: bool,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "present_value")]
    default: Option<Value>,
    #[serde(default, rename = "enum")]
    values: Vec<String>,
}

/// Keep an explicit `null` as `Some(Value::Null)`; only a missing key is `None`
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<RawAttribute> for AttributeDescriptor {
    fn from(raw: RawAttribute) -> Self {
        let required = raw.required;
        let default = raw.default;
        match raw.kind.as_str() {
            "relation" => AttributeDescriptor::Relation {
                arity: RelationArity::from_relation(raw.relation.as_deref().unwrap_or("")),
                target: raw.target,
                required,
            },
            "component" => AttributeDescriptor::Component {
                component: raw.component.unwrap_or_default(),
                repeatable: raw.repeatable,
                required,
                target: raw.target,
            },
            "dynamiczone" => AttributeDescriptor::DynamicZone {
                components: raw.components,
                required,
            },
            "media" => AttributeDescriptor::Media {
                multiple: raw.multiple,
                required,
            },
            "enumeration" => AttributeDescriptor::Enumeration {
                values: raw.values,
                required,
                default,
            },
            "string" => AttributeDescriptor::Text { kind: TextKind::String, required },
            "text" => AttributeDescriptor::Text { kind: TextKind::Text, required },
            "richtext" => AttributeDescriptor::Text { kind: TextKind::RichText, required },
            "email" => AttributeDescriptor::Text { kind: TextKind::Email, required },
            "uid" => AttributeDescriptor::Text { kind: TextKind::Uid, required },
            "password" => AttributeDescriptor::Password { required },
            "json" => AttributeDescriptor::Json { required },
            "integer" => AttributeDescriptor::Number { kind: NumberKind::Integer, required, default },
            "biginteger" => AttributeDescriptor::Number { kind: NumberKind::BigInteger, required, default },
            "decimal" => AttributeDescriptor::Number { kind: NumberKind::Decimal, required, default },
            "float" => AttributeDescriptor::Number { kind: NumberKind::Float, required, default },
            "date" => AttributeDescriptor::Date { kind: DateKind::Date, required, default },
            "datetime" => AttributeDescriptor::Date { kind: DateKind::DateTime, required, default },
            "time" => AttributeDescriptor::Date { kind: DateKind::Time, required, default },
            "timestamp" => AttributeDescriptor::Date { kind: DateKind::Timestamp, required, default },
            "boolean" => AttributeDescriptor::Boolean { required, default },
            _ => AttributeDescriptor::Unknown { kind: raw.kind, required },
        }
    }
}
