//! # Structural Validation
//!
//! Runtime validation of reassembled answer documents against the form's
//! JSON Schema. This covers the shape rules the flattened model does not
//! capture: required fields, nesting, `additionalProperties`.
//!
//! The schema is compiled once at construction. `$ref`s are resolved
//! from the form schema itself; anything else resolves to a permissive
//! empty schema so validation never makes network requests.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Local retriever that resolves `$ref` URIs to the loaded form schema.
struct LocalSchemaRetriever {
    /// Map from URI string to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(value) = self.schemas_by_uri.get(uri.as_str()) {
            return Ok(value.clone());
        }

        // Metaschemas and unknown remote documents accept anything.
        Ok(serde_json::json!({}))
    }
}

/// Error loading, compiling, or validating against a form schema.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema file could not be loaded.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema path or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema path or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// A question declares a primitive type the form model cannot express.
    #[error("unsupported data type '{data_type}' for question '{question_id}'")]
    UnsupportedType {
        /// Question whose declaration is unsupported.
        question_id: String,
        /// The offending type name.
        data_type: String,
    },

    /// A question's `enum` is not a non-empty list of literals.
    #[error("invalid enum for question '{question_id}': {reason}")]
    InvalidEnum {
        /// Question whose enum is invalid.
        question_id: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl SchemaValidationError {
    /// Returns true for a document that failed the schema, as opposed to
    /// a schema that could not be loaded or compiled.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled form schema backed by the `jsonschema` crate.
///
/// ## Thread Safety
///
/// `StructuralValidator` is `Send + Sync`; one instance can serve any
/// number of concurrent validations.
pub struct StructuralValidator {
    schema_name: String,
    validator: Validator,
}

impl fmt::Debug for StructuralValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralValidator")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

impl StructuralValidator {
    /// Compile `schema`. The draft is taken from its `$schema` keyword.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema
    /// is not a valid JSON Schema.
    pub fn new(schema_name: impl Into<String>, schema: &Value) -> Result<Self, SchemaValidationError> {
        let schema_name = schema_name.into();

        let mut schemas_by_uri = HashMap::new();
        if let Some(id) = schema.get("$id").and_then(Value::as_str) {
            schemas_by_uri.insert(id.to_string(), schema.clone());
        }
        let retriever = LocalSchemaRetriever { schemas_by_uri };

        // Answer formats are checked by the form model with the form's own
        // date and time layouts, which carry no UTC offset.
        let validator = jsonschema::options()
            .with_retriever(retriever)
            .should_validate_formats(false)
            .build(schema)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            schema_name,
            validator,
        })
    }

    /// Returns true if `instance` conforms to the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate a JSON value against the form schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with every
    /// violation if the document is invalid.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.schema_name.clone(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }
}
