//! Schema Collection
//!
//! Walks both registries, drops ignored ids and builds the record list the
//! assembler works on. Declaration names are final once this returns.

use regex::Regex;
use tracing::{debug, warn};

use super::names::{uid_tail, NameAllocator};
use super::{SchemaOrigin, SchemaRecord};
use crate::config::{IgnoreRule, PluginConfig};
use crate::schema::{SchemaDescriptor, SchemaInput, SchemaMap};

/// Ids in the CMS administration namespace are never converted
pub const ADMIN_NAMESPACE: &str = "admin::";

/// Singular name of the upload plugin's file content type
pub const UPLOAD_FILE_NAME: &str = "file";

/// Name the upload file content type is converted under
pub const MEDIA_NAME: &str = "media";

// =============================================================================
// Ignore matching
// =============================================================================

struct CompiledRule {
    exact: Option<String>,
    pattern: Option<Regex>,
}

/// Decides which schema ids stay out of the generated module.
///
/// Patterns are compiled once. A pattern that fails to compile is inert: it
/// never matches and never fails the run.
pub struct IgnoreMatcher {
    rules: Vec<CompiledRule>,
}

impl IgnoreMatcher {
    pub fn new(rules: &[IgnoreRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let pattern = match Regex::new(rule.pattern_source()) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        debug!("Ignoring invalid pattern {:?}: {}", rule.pattern_source(), e);
                        None
                    }
                };
                let exact = match rule {
                    IgnoreRule::Exact(id) => Some(id.clone()),
                    IgnoreRule::Pattern { .. } => None,
                };
                CompiledRule { exact, pattern }
            })
            .collect();
        Self { rules }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(&config.ids_to_ignore)
    }

    /// Whether `uid` is left out of the module
    pub fn should_skip(&self, uid: &str) -> bool {
        if uid.contains(ADMIN_NAMESPACE) {
            return true;
        }

        self.rules.iter().any(|rule| {
            rule.exact.as_deref() == Some(uid)
                || rule.pattern.as_ref().map(|p| p.is_match(uid)).unwrap_or(false)
        })
    }
}

// =============================================================================
// Collection
// =============================================================================

/// Result of the collection phase
#[derive(Debug)]
pub struct Collected<'a> {
    /// Content types first, then components, each in registry order
    pub records: Vec<SchemaRecord<'a>>,
    /// Ids that were filtered out or could not get a unique name
    pub skipped: Vec<String>,
}

/// Build the record list for both registries.
pub fn collect_records<'a>(
    input: &'a SchemaInput,
    config: &PluginConfig,
    matcher: &IgnoreMatcher,
) -> Collected<'a> {
    let mut names = NameAllocator::new(config.always_suffix_component_names);
    let mut collected = Collected {
        records: Vec::with_capacity(input.content_types.len() + input.components.len()),
        skipped: Vec::new(),
    };

    collect_map(&input.content_types, SchemaOrigin::ContentType, matcher, &mut names, &mut collected);
    collect_map(&input.components, SchemaOrigin::Component, matcher, &mut names, &mut collected);

    collected
}

fn collect_map<'a>(
    map: &'a SchemaMap,
    origin: SchemaOrigin,
    matcher: &IgnoreMatcher,
    names: &mut NameAllocator,
    collected: &mut Collected<'a>,
) {
    let label = match origin {
        SchemaOrigin::ContentType => "contentType",
        SchemaOrigin::Component => "component",
    };

    for (uid, schema) in map {
        if matcher.should_skip(uid) {
            debug!("Skipping {} {}", label, uid);
            collected.skipped.push(uid.clone());
            continue;
        }

        let schema_name = schema_name(uid, schema.as_ref(), origin);

        let Some(allocated) = names.allocate(&schema_name, origin) else {
            warn!(
                "Skipping {} {}: no unique declaration name left for '{}'",
                label, uid, schema_name
            );
            collected.skipped.push(uid.clone());
            continue;
        };

        debug!("Converting {} {} as {}", label, uid, allocated.canonical_name);

        collected.records.push(SchemaRecord {
            uid: uid.clone(),
            schema_name,
            canonical_name: allocated.canonical_name,
            origin,
            needs_component_suffix: allocated.needs_component_suffix,
            schema: schema.as_ref(),
        });
    }
}

/// Name a schema is converted under.
///
/// Content types use their singular name, components their display name;
/// both fall back to the uid. The upload plugin's `file` type becomes `media`.
fn schema_name(uid: &str, schema: Option<&SchemaDescriptor>, origin: SchemaOrigin) -> String {
    let info = schema.map(|s| &s.info);
    let name = match origin {
        SchemaOrigin::ContentType => info
            .and_then(|i| i.singular_name.clone().or_else(|| i.display_name.clone())),
        SchemaOrigin::Component => info.and_then(|i| i.display_name.clone()),
    }
    .unwrap_or_else(|| uid_tail(uid).to_string());

    if origin == SchemaOrigin::ContentType && name == UPLOAD_FILE_NAME {
        MEDIA_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> SchemaInput {
        SchemaInput::from_value(json!({
            "contentTypes": {
                "admin::user": { "info": { "singularName": "user", "displayName": "User" } },
                "api::article.article": { "info": { "singularName": "article", "displayName": "Article" } },
                "plugin::upload.file": { "info": { "singularName": "file", "displayName": "File" } },
                "plugin::upload.folder": { "info": { "singularName": "folder", "displayName": "Folder" } },
                "plugin::content-releases.release": { "info": { "singularName": "release", "displayName": "Release" } }
            },
            "components": {
                "shared.seo": { "info": { "displayName": "SEO" } },
                "shared.article": { "info": { "displayName": "Article" } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_should_skip_admin_namespace() {
        let matcher = IgnoreMatcher::new(&[]);
        assert!(matcher.should_skip("admin::permission"));
        assert!(!matcher.should_skip("api::article.article"));
    }

    #[test]
    fn test_should_skip_exact_and_pattern() {
        let matcher = IgnoreMatcher::new(&[
            IgnoreRule::from("api::secret.secret"),
            IgnoreRule::pattern(r"^plugin::review-workflows\."),
        ]);
        assert!(matcher.should_skip("api::secret.secret"));
        assert!(matcher.should_skip("plugin::review-workflows.workflow-stage"));
        assert!(!matcher.should_skip("api::article.article"));
    }

    #[test]
    fn test_exact_entries_are_also_patterns() {
        let matcher = IgnoreMatcher::new(&[IgnoreRule::from("api::draft-.*")]);
        assert!(matcher.should_skip("api::draft-post.draft-post"));
    }

    #[test]
    fn test_invalid_pattern_is_inert() {
        let matcher = IgnoreMatcher::new(&[
            IgnoreRule::pattern("api::(unclosed"),
            IgnoreRule::from("api::broken[.broken"),
        ]);
        assert!(!matcher.should_skip("api::(unclosed"));
        assert!(!matcher.should_skip("api::article.article"));
        // The exact half of an entry still works when its pattern does not compile
        assert!(matcher.should_skip("api::broken[.broken"));
    }

    #[test]
    fn test_collect_records_order_and_names() {
        let input = input();
        let config = PluginConfig::default();
        let matcher = IgnoreMatcher::from_config(&config);
        let Collected { records, skipped } = collect_records(&input, &config, &matcher);

        let names: Vec<&str> = records.iter().map(|r| r.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Article", "Media", "Seo", "ArticleComponent"]);

        assert_eq!(records[1].uid, "plugin::upload.file");
        assert_eq!(records[1].schema_name, "media");
        assert!(records[3].needs_component_suffix);
        assert_eq!(records[3].origin, SchemaOrigin::Component);

        assert_eq!(
            skipped,
            vec![
                "admin::user".to_string(),
                "plugin::upload.folder".to_string(),
                "plugin::content-releases.release".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_schema_keeps_a_record() {
        let input = SchemaInput::from_value(json!({
            "contentTypes": { "api::ghost.ghost": null }
        }))
        .unwrap();
        let config = PluginConfig::default();
        let matcher = IgnoreMatcher::from_config(&config);
        let collected = collect_records(&input, &config, &matcher);

        assert_eq!(collected.records.len(), 1);
        assert_eq!(collected.records[0].canonical_name, "Ghost");
        assert!(collected.records[0].schema.is_none());
    }
}
