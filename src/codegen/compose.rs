//! Module Composition
//!
//! Concatenates assembled schemas into the final declaration module, in a
//! fixed order: every enum, every interface, then the shared helper types.

use super::enums::escape_single_quoted;
use super::{AssembledSchema, SchemaOrigin};

const HEADER: &str = "\
// Generated from the CMS schemas - DO NOT EDIT
//
// Regenerate with `schemas-to-ts` after changing a content type or component.
";

const MEDIA_FORMAT: &str = "\
export interface MediaFormat {
  name: string;
  hash: string;
  ext: string;
  mime: string;
  width: number;
  height: number;
  size: number;
  path: string;
  url: string;
}
";

const CONTENT_TYPE_ALIAS: &str = "\
export type ContentType<T extends keyof ContentTypes, P extends boolean = true> = ContentTypes<P>[T];
";

const API_HELPERS: &str = r#"export interface APIResponseMany<T extends keyof ContentTypes> {
  data: ContentType<T>[];
  meta: {
    pagination: {
      page: number;
      pageSize: number;
      pageCount: number;
      total: number;
    };
  };
}

export interface APIResponseSingle<T extends keyof ContentTypes> {
  data: ContentType<T>;
}

export interface APIRequestParams<T extends keyof ContentTypes> {
  populate?: any;
  fields?: (keyof ContentType<T, false>)[];
  locale?: string | string[];
  filters?: any;
  sort?:
    | `${string & keyof ContentType<T, false>}:asc`
    | `${string & keyof ContentType<T, false>}:desc`
    | (`${string & keyof ContentType<T, false>}:asc` | `${string & keyof ContentType<T, false>}:desc`)[];
  pagination?: {
    page?: number;
    pageSize?: number;
  };
}
"#;

/// Compose the declaration module from assembled schemas, in collection order
pub fn compose(schemas: &[AssembledSchema]) -> String {
    let mut sections: Vec<String> = vec![HEADER.to_string()];

    sections.extend(schemas.iter().flat_map(|s| s.enums.iter().cloned()));
    sections.extend(schemas.iter().map(|s| s.body.clone()));

    sections.push(MEDIA_FORMAT.to_string());
    sections.push(keyed_union("ContentTypes", schemas, SchemaOrigin::ContentType));
    sections.push(keyed_union("Components", schemas, SchemaOrigin::Component));
    sections.push(content_types_uid(schemas));
    sections.push(CONTENT_TYPE_ALIAS.to_string());
    sections.push(API_HELPERS.to_string());

    sections.join("\n")
}

/// `export interface Name<P> { Member: Member<P>; ... }` over one origin
fn keyed_union(name: &str, schemas: &[AssembledSchema], origin: SchemaOrigin) -> String {
    let mut output = format!("export interface {}<P extends boolean = true> {{\n", name);
    for schema in schemas.iter().filter(|s| s.origin == origin) {
        output.push_str(&format!("  {0}: {0}<P>;\n", schema.canonical_name));
    }
    output.push_str("}\n");
    output
}

/// Enum from content type declaration name to its uid
fn content_types_uid(schemas: &[AssembledSchema]) -> String {
    let mut output = String::from("export enum ContentTypesUID {\n");
    for schema in schemas.iter().filter(|s| s.origin == SchemaOrigin::ContentType) {
        output.push_str(&format!(
            "  {} = '{}',\n",
            schema.canonical_name,
            escape_single_quoted(&schema.uid)
        ));
    }
    output.push_str("}\n");
    output
}
