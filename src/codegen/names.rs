//! Name Resolution
//!
//! Turns schema display names into TypeScript declaration names and keeps
//! those names unique across the generated module:
//! - Pascal-casing of display names, attribute names and enum values
//! - `Component` suffixing of components (forced by config or on collision)
//! - Reference resolution from attribute targets to declaration names
//!
//! Name assignment runs while records are collected. Reference resolution
//! only ever sees the finished record list.

use std::collections::{HashMap, HashSet};

use super::collect::MEDIA_NAME;
use super::{SchemaOrigin, SchemaRecord};

/// Appended to a component name that needs disambiguation
pub const COMPONENT_SUFFIX: &str = "Component";

/// Component target that maps onto the built-in user type
pub const USERS_PERMISSIONS_USER: &str = "plugin::users-permissions.user";

/// Declarations the composer always emits; no schema may take these names
pub const RESERVED_NAMES: &[&str] = &[
    "MediaFormat",
    "ContentTypes",
    "Components",
    "ContentTypesUID",
    "ContentType",
    "APIResponseMany",
    "APIResponseSingle",
    "APIRequestParams",
];

// =============================================================================
// Casing
// =============================================================================

/// Convert arbitrary text to PascalCase.
///
/// Words are split on every run of characters that are not ASCII letters or
/// digits, and on case boundaries (`fooBar` -> `foo|Bar`, `HTTPServer` ->
/// `HTTP|Server`). Each word keeps its first character upper-cased and the
/// rest lower-cased. A word after the first that starts with a digit gets a
/// `_` prefix so `version 1.2` stays readable as `Version_1_2`.
pub fn pascal_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (index, word) in split_words(text).iter().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        if index > 0 && first.is_ascii_digit() {
            result.push('_');
        }
        result.push(first.to_ascii_uppercase());
        for c in chars {
            result.push(c.to_ascii_lowercase());
        }
    }
    result
}

fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let lower_to_upper =
                (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase()
                && c.is_ascii_uppercase()
                && next.map(|n| n.is_ascii_lowercase()).unwrap_or(false);
            if (lower_to_upper || acronym_end) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Declaration name for a schema display name
pub fn canonical_name(display_name: &str) -> String {
    pascal_case(display_name)
}

/// The part of a uid that names the schema (`api::category.category` -> `category`)
pub fn uid_tail(uid: &str) -> &str {
    uid.split('.').nth(1).unwrap_or(uid)
}

// =============================================================================
// Name assignment (collection phase)
// =============================================================================

/// Hands out unique declaration names while records are being collected.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
    always_suffix_components: bool,
}

/// A name handed out by [`NameAllocator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedName {
    pub canonical_name: String,
    pub needs_component_suffix: bool,
}

impl NameAllocator {
    pub fn new(always_suffix_components: bool) -> Self {
        Self {
            taken: RESERVED_NAMES.iter().map(|name| name.to_string()).collect(),
            always_suffix_components,
        }
    }

    /// Reserve a declaration name for a schema.
    ///
    /// Components are suffixed when the config forces it or when the plain
    /// name is already taken by an earlier record or a helper declaration
    /// ([`RESERVED_NAMES`]). Returns `None` when no
    /// unique name is available; the caller drops that record.
    pub fn allocate(&mut self, schema_name: &str, origin: SchemaOrigin) -> Option<AllocatedName> {
        let base = canonical_name(schema_name);

        let needs_component_suffix = origin == SchemaOrigin::Component
            && (self.always_suffix_components || self.taken.contains(&base));

        let name = if needs_component_suffix {
            format!("{}{}", base, COMPONENT_SUFFIX)
        } else {
            base
        };

        if !self.taken.insert(name.clone()) {
            return None;
        }

        Some(AllocatedName {
            canonical_name: name,
            needs_component_suffix,
        })
    }
}

// =============================================================================
// Reference resolution (assembly phase)
// =============================================================================

/// Find the component record a bare component name refers to.
///
/// Matches an unsuffixed component named exactly `property_name`, or a
/// suffixed one named `property_name` + `Component`.
pub fn find_component_by_property_name<'r, 'a>(
    property_name: &str,
    records: &'r [SchemaRecord<'a>],
) -> Option<&'r SchemaRecord<'a>> {
    let suffixed = format!("{}{}", property_name, COMPONENT_SUFFIX);
    records.iter().find(|record| {
        record.origin == SchemaOrigin::Component
            && if record.needs_component_suffix {
                record.canonical_name == suffixed
            } else {
                record.canonical_name == property_name
            }
    })
}

/// Read-only lookups over the finished record list
pub struct NameResolver<'r, 'a> {
    records: &'r [SchemaRecord<'a>],
    by_uid: HashMap<&'r str, usize>,
}

impl<'r, 'a> NameResolver<'r, 'a> {
    pub fn new(records: &'r [SchemaRecord<'a>]) -> Self {
        let by_uid = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.uid.as_str(), index))
            .collect();
        Self { records, by_uid }
    }

    /// Look up a record that will be declared.
    ///
    /// Records without a descriptor are skipped at assembly and never
    /// resolve.
    pub fn record_by_uid(&self, uid: &str) -> Option<&'r SchemaRecord<'a>> {
        self.by_uid
            .get(uid)
            .map(|&index| &self.records[index])
            .filter(|record| record.schema.is_some())
    }

    /// Declaration name for a relation target uid, if the target is declared
    pub fn relation_type_name(&self, target_uid: &str) -> Option<String> {
        self.record_by_uid(target_uid)
            .map(|record| record.canonical_name.clone())
    }

    /// Declaration name for a component reference, honouring suffixes.
    ///
    /// A uid (`category.name`) must match a declared component exactly. A
    /// bare name goes through [`find_component_by_property_name`].
    pub fn component_type_name(&self, component_ref: &str) -> Option<String> {
        let record = if component_ref.contains('.') {
            self.record_by_uid(component_ref)
                .filter(|r| r.origin == SchemaOrigin::Component)
        } else {
            find_component_by_property_name(&pascal_case(component_ref), self.records)
                .filter(|r| r.schema.is_some())
        };
        record.map(|r| r.canonical_name.clone())
    }

    /// Declaration name of the upload plugin's media type, if it is declared
    pub fn media_type_name(&self) -> Option<String> {
        self.records
            .iter()
            .find(|r| {
                r.origin == SchemaOrigin::ContentType
                    && r.schema_name == MEDIA_NAME
                    && r.schema.is_some()
            })
            .map(|r| r.canonical_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaDescriptor;
    use std::sync::OnceLock;

    fn descriptor() -> &'static SchemaDescriptor {
        static EMPTY: OnceLock<SchemaDescriptor> = OnceLock::new();
        EMPTY.get_or_init(SchemaDescriptor::default)
    }

    fn record(uid: &str, name: &str, origin: SchemaOrigin, suffixed: bool) -> SchemaRecord<'static> {
        SchemaRecord {
            uid: uid.to_string(),
            schema_name: name.to_string(),
            canonical_name: if suffixed {
                format!("{}{}", pascal_case(name), COMPONENT_SUFFIX)
            } else {
                pascal_case(name)
            },
            origin,
            needs_component_suffix: suffixed,
            schema: Some(descriptor()),
        }
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("article"), "Article");
        assert_eq!(pascal_case("blog post"), "BlogPost");
        assert_eq!(pascal_case("blog-post_item"), "BlogPostItem");
        assert_eq!(pascal_case("fooBar"), "FooBar");
        assert_eq!(pascal_case("HTTPServer"), "HttpServer");
        assert_eq!(pascal_case("SEO"), "Seo");
        assert_eq!(pascal_case("version 1.2"), "Version_1_2");
        assert_eq!(pascal_case("42"), "42");
        assert_eq!(pascal_case("  trimmed  "), "Trimmed");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_uid_tail() {
        assert_eq!(uid_tail("api::category.category"), "category");
        assert_eq!(uid_tail("shared.address"), "address");
        assert_eq!(uid_tail("standalone"), "standalone");
    }

    #[test]
    fn test_allocator_suffixes_colliding_components() {
        let mut names = NameAllocator::new(false);

        let first = names.allocate("Address", SchemaOrigin::Component).unwrap();
        assert_eq!(first.canonical_name, "Address");
        assert!(!first.needs_component_suffix);

        let second = names.allocate("address", SchemaOrigin::Component).unwrap();
        assert_eq!(second.canonical_name, "AddressComponent");
        assert!(second.needs_component_suffix);

        // Nothing unique left for a third one
        assert!(names.allocate("Address", SchemaOrigin::Component).is_none());
    }

    #[test]
    fn test_allocator_component_colliding_with_content_type() {
        let mut names = NameAllocator::new(false);
        names.allocate("article", SchemaOrigin::ContentType).unwrap();

        let component = names.allocate("Article", SchemaOrigin::Component).unwrap();
        assert_eq!(component.canonical_name, "ArticleComponent");
    }

    #[test]
    fn test_allocator_forced_suffix() {
        let mut names = NameAllocator::new(true);
        let content_type = names.allocate("seo", SchemaOrigin::ContentType).unwrap();
        assert_eq!(content_type.canonical_name, "Seo");

        let component = names.allocate("Hero", SchemaOrigin::Component).unwrap();
        assert_eq!(component.canonical_name, "HeroComponent");
        assert!(component.needs_component_suffix);
    }

    #[test]
    fn test_find_component_by_property_name() {
        let records = vec![
            record("api::address.address", "address", SchemaOrigin::ContentType, false),
            record("shared.address", "Address", SchemaOrigin::Component, true),
            record("shared.seo", "Seo", SchemaOrigin::Component, false),
        ];

        let found = find_component_by_property_name("Address", &records).unwrap();
        assert_eq!(found.uid, "shared.address");
        assert_eq!(found.canonical_name, "AddressComponent");

        let seo = find_component_by_property_name("Seo", &records).unwrap();
        assert_eq!(seo.canonical_name, "Seo");

        // A suffixed record is never matched by its full name
        assert!(find_component_by_property_name("AddressComponent", &records).is_none());
    }

    #[test]
    fn test_allocator_keeps_helper_names_free() {
        let mut names = NameAllocator::new(false);

        // A content type cannot be suffixed, so it is dropped
        assert!(names.allocate("content types", SchemaOrigin::ContentType).is_none());
        assert!(names.allocate("ContentType", SchemaOrigin::ContentType).is_none());

        let component = names.allocate("Media Format", SchemaOrigin::Component).unwrap();
        assert_eq!(component.canonical_name, "MediaFormatComponent");
        assert!(component.needs_component_suffix);
    }

    #[test]
    fn test_resolver_lookups() {
        let records = vec![
            record("api::category.category", "category", SchemaOrigin::ContentType, false),
            record("plugin::upload.file", "media", SchemaOrigin::ContentType, false),
            record("billing.address", "Address", SchemaOrigin::Component, false),
            record("shipping.address", "Address", SchemaOrigin::Component, true),
        ];
        let resolver = NameResolver::new(&records);

        assert_eq!(resolver.relation_type_name("api::category.category").as_deref(), Some("Category"));
        assert_eq!(resolver.relation_type_name("plugin::upload.file").as_deref(), Some("Media"));
        assert_eq!(resolver.media_type_name().as_deref(), Some("Media"));

        assert_eq!(resolver.component_type_name("billing.address").as_deref(), Some("Address"));
        assert_eq!(
            resolver.component_type_name("shipping.address").as_deref(),
            Some("AddressComponent")
        );
        // Bare names go through the property-name lookup
        assert_eq!(resolver.component_type_name("address").as_deref(), Some("Address"));
    }

    #[test]
    fn test_resolver_never_names_undeclared_types() {
        let mut empty = record("api::ghost.ghost", "ghost", SchemaOrigin::ContentType, false);
        empty.schema = None;
        let records = vec![
            record("api::post.post", "post", SchemaOrigin::ContentType, false),
            empty,
            record("shared.seo", "Seo", SchemaOrigin::Component, false),
        ];
        let resolver = NameResolver::new(&records);

        // Absent uid, even when another record carries the same name
        assert_eq!(resolver.relation_type_name("api::missing.missing"), None);
        assert_eq!(resolver.relation_type_name("plugin::blog.post"), None);
        // Record without a descriptor
        assert_eq!(resolver.relation_type_name("api::ghost.ghost"), None);
        // Unknown component uid, and a content type uid used as a component
        assert_eq!(resolver.component_type_name("other.seo"), None);
        assert_eq!(resolver.component_type_name("api::post.post"), None);
        assert_eq!(resolver.component_type_name("gallery"), None);
        // No media content type collected
        assert_eq!(resolver.media_type_name(), None);
    }
}
