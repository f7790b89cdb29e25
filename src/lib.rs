//! schemas-to-ts
//!
//! Compiles the content-type and component schemas of a headless CMS into a
//! single TypeScript declaration module for client code.
//!
//! ## Features
//!
//! - **Typed interfaces**: one generic interface per schema, switchable
//!   between populated relations and bare ids
//! - **Enums**: enumeration attributes become TypeScript enums with safe keys
//! - **Collision handling**: components that share a name are suffixed
//! - **Request helpers**: response envelopes and query parameter types
//!
//! ## Pipeline
//!
//! ```text
//! SchemaInput ──collect──▶ [SchemaRecord] ──assemble──▶ [AssembledSchema]
//!                                                            │
//!                      types/contentTypes.d.ts ◀──write── compose
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod output;
pub mod schema;

pub use codegen::{convert, Converter, GeneratedOutput, SchemaOrigin, SchemaRecord};
pub use config::{IgnoreRule, PluginConfig};
pub use error::{ConvertError, Result};
pub use output::{write_declarations, Formatter, PrettierFormatter};
pub use schema::{AttributeDescriptor, SchemaDescriptor, SchemaInput};
