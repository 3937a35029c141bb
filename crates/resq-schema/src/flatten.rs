//! # Schema Flattening
//!
//! Walks a nested form schema once and derives the flat [`FormModel`]:
//! every leaf question's dot-path and its answer domain.
//!
//! ## Rules
//!
//! - `properties` extends the current path by each property name.
//! - Any other mapping or sequence (`anyOf`, `oneOf`, `items`, ...) is
//!   descended with the path unchanged, so alternative declarations of a
//!   leaf all contribute to the same question.
//! - A node with a `type` other than `"object"` is a question. Every
//!   listed primitive type contributes options.
//! - A node with no `type` but an `enum` is a string question.
//! - Pure containers are path segments only, never questions.
//! - An unsupported primitive type is a configuration error.
//!
//! Literal-valued keywords (`enum`, `const`, `default`, `examples`) and
//! definition tables (`definitions`, `$defs`) are not descended.

use std::collections::BTreeMap;

use resq_core::{DataType, QuestionId, PATH_SEPARATOR};
use serde_json::{Map, Value};

use crate::options::{Bounds, FormOption, OptionSet};
use crate::validate::SchemaValidationError;

/// Keywords whose values are never sub-schemas.
const OPAQUE_KEYWORDS: &[&str] = &["enum", "const", "default", "examples", "definitions", "$defs"];

/// The flattened form: every question id and its answer domain.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    possible_options: BTreeMap<QuestionId, OptionSet>,
}

impl FormModel {
    /// Returns true if `question_id` is a question of this form.
    pub fn contains(&self, question_id: &str) -> bool {
        self.possible_options.contains_key(question_id)
    }

    /// The answer domain of `question_id`.
    pub fn options_for(&self, question_id: &str) -> Option<&OptionSet> {
        self.possible_options.get(question_id)
    }

    /// All question ids, sorted.
    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.possible_options.keys()
    }

    /// Returns the number of questions.
    pub fn question_count(&self) -> usize {
        self.possible_options.len()
    }

    /// Iterate over `(question_id, options)` pairs, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &OptionSet)> {
        self.possible_options.iter()
    }

    /// Whether `question_id` accepts answers of kind `data_type`.
    /// Unknown questions accept nothing.
    pub fn includes_datatype(&self, question_id: &str, data_type: DataType) -> bool {
        self.options_for(question_id)
            .is_some_and(|options| options.includes(data_type))
    }

    fn add_option(&mut self, question_id: &QuestionId, option: FormOption) {
        self.possible_options
            .entry(question_id.clone())
            .or_default()
            .insert(option);
    }
}

/// Derive the [`FormModel`] of a schema.
///
/// # Errors
///
/// Returns `SchemaValidationError::UnsupportedType` for a primitive type
/// outside `boolean`, `integer`, `number`, `null`, `string`, and
/// `SchemaValidationError::InvalidEnum` for an `enum` that is not a
/// non-empty list of literals.
pub fn flatten_schema(schema: &Value) -> Result<FormModel, SchemaValidationError> {
    let mut model = FormModel::default();
    walk(schema, &QuestionId::root(), &mut model)?;
    Ok(model)
}

fn walk(node: &Value, path: &QuestionId, model: &mut FormModel) -> Result<(), SchemaValidationError> {
    match node {
        Value::Object(map) => {
            register(map, path, model)?;
            for (key, value) in map {
                if key == "properties" {
                    if let Value::Object(properties) = value {
                        for (name, property) in properties {
                            walk(property, &path.child(name), model)?;
                        }
                    }
                } else if !OPAQUE_KEYWORDS.contains(&key.as_str()) {
                    walk(value, path, model)?;
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(|item| walk(item, path, model)),
        _ => Ok(()),
    }
}

/// Register the options a single schema node declares for `path`.
fn register(
    node: &Map<String, Value>,
    path: &QuestionId,
    model: &mut FormModel,
) -> Result<(), SchemaValidationError> {
    let type_names: Vec<&Value> = match node.get("type") {
        Some(Value::String(s)) if s == "object" => return Ok(()),
        Some(Value::Array(names)) => names.iter().collect(),
        Some(single) => vec![single],
        None if node.contains_key("enum") => {
            for option in options_for_type("string", node, path)? {
                model.add_option(path, option);
            }
            return Ok(());
        }
        None => return Ok(()),
    };

    for name in type_names {
        let name = name.as_str().ok_or_else(|| SchemaValidationError::UnsupportedType {
            question_id: path.to_string(),
            data_type: name.to_string(),
        })?;
        for option in options_for_type(name, node, path)? {
            model.add_option(path, option);
        }
    }
    Ok(())
}

fn options_for_type(
    type_name: &str,
    node: &Map<String, Value>,
    path: &QuestionId,
) -> Result<Vec<FormOption>, SchemaValidationError> {
    match type_name {
        "boolean" => Ok(vec![FormOption::Boolean(true), FormOption::Boolean(false)]),
        "integer" => Ok(vec![FormOption::Integer(Bounds::from_schema(node))]),
        "number" => Ok(vec![FormOption::Number(Bounds::from_schema(node))]),
        "null" => Ok(vec![FormOption::Null]),
        "string" => string_options(node, path),
        other => Err(SchemaValidationError::UnsupportedType {
            question_id: path.to_string(),
            data_type: other.to_string(),
        }),
    }
}

/// A `format` of date/time/date-time wins over `enum`; otherwise an
/// `enum` lists the literals; otherwise any text.
fn string_options(
    node: &Map<String, Value>,
    path: &QuestionId,
) -> Result<Vec<FormOption>, SchemaValidationError> {
    match node.get("format").and_then(Value::as_str) {
        Some("date") => return Ok(vec![FormOption::Date]),
        Some("time") => return Ok(vec![FormOption::Time]),
        Some("date-time") => return Ok(vec![FormOption::DateTime]),
        _ => {}
    }

    let Some(values) = node.get("enum") else {
        return Ok(vec![FormOption::String]);
    };
    let invalid = |reason: &str| SchemaValidationError::InvalidEnum {
        question_id: path.to_string(),
        reason: reason.to_string(),
    };
    let values = values.as_array().ok_or_else(|| invalid("enum must be a list"))?;
    if values.is_empty() {
        return Err(invalid("enum must list at least one value"));
    }
    values
        .iter()
        .map(|v| {
            FormOption::from_literal(v)
                .ok_or_else(|| invalid(&format!("enum value {v} is not a literal")))
        })
        .collect()
}

/// Rebuild the nested answer document from flat `question_id -> value`
/// pairs, splitting each id on the path separator.
///
/// This is the inverse of [`flatten_schema`]'s path construction. When a
/// leaf answer occupies a position a later id needs as a container, the
/// container replaces it.
pub fn nest_answers<'a, I>(answers: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut root = Map::new();
    for (question_id, value) in answers {
        let segments: Vec<&str> = question_id.split(PATH_SEPARATOR).collect();
        insert_at(&mut root, &segments, value);
    }
    Value::Object(root)
}

fn insert_at(map: &mut Map<String, Value>, segments: &[&str], value: &Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value.clone());
        }
        [head, rest @ ..] => {
            let slot = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_at(child, rest, value);
            }
        }
    }
}
