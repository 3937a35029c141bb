//! # resq-schema: Form Schema Handling
//!
//! Turns a RES-Q form schema into the two things report validation needs.
//!
//! ## Form Model (`flatten`, `options`)
//!
//! [`flatten_schema`] walks the nested schema once and produces a
//! [`FormModel`]: the set of valid question ids (dot-paths of leaf
//! properties) and, for each, an [`OptionSet`] describing which answers
//! are acceptable. The transform is pure: schema in, model out.
//!
//! ## Structural Validation (`validate`)
//!
//! [`StructuralValidator`] compiles the same schema with the `jsonschema`
//! crate and checks reassembled answer documents for required fields and
//! nesting.
//!
//! ## Crate Policy
//!
//! - Depends only on `resq-core` internally.
//! - Schema problems are configuration errors: they fail at load time,
//!   never during report validation.

pub mod document;
pub mod flatten;
pub mod options;
pub mod validate;

pub use document::{load_document, load_schema, yaml_to_json_value};
pub use flatten::{flatten_schema, nest_answers, FormModel};
pub use options::{Bounds, EnumLiteral, FormOption, OptionSet};
pub use validate::{SchemaValidationError, StructuralValidator, ValidationViolations, Violation};
