//! # Answer Option Domains
//!
//! A question's answer domain is a small set of [`FormOption`]s. Literal
//! options (booleans, `null`, enum values) accept a value by equality;
//! typed options (integer, number, string, date, time, date-time) accept
//! a value by predicate.
//!
//! ## Merge Rule
//!
//! A question keeps at most one typed option per kind. When a schema
//! declares the same numeric kind twice for one question (a `type` list,
//! an `anyOf` branch, a repeated definition) the bounds are merged into
//! the union of the observed bounds: the smallest declared minimum and
//! the largest declared maximum. A side that no declaration bounds stays
//! unbounded.

use std::cmp::Ordering;
use std::fmt;

use resq_core::{is_date, is_date_time, is_time, DataType};
use serde_json::{Number, Value};

/// Inclusive numeric bounds read from `minimum` / `maximum`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Smallest accepted value, if bounded below.
    pub minimum: Option<f64>,
    /// Largest accepted value, if bounded above.
    pub maximum: Option<f64>,
}

impl Bounds {
    /// Bounds with the given limits.
    pub fn new(minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self { minimum, maximum }
    }

    /// Read `minimum` / `maximum` from a schema node. Non-numeric values
    /// are treated as absent.
    pub fn from_schema(node: &serde_json::Map<String, Value>) -> Self {
        Self {
            minimum: node.get("minimum").and_then(Value::as_f64),
            maximum: node.get("maximum").and_then(Value::as_f64),
        }
    }

    /// Returns true if `x` lies within the bounds.
    pub fn contains(&self, x: f64) -> bool {
        self.minimum.map_or(true, |min| x >= min) && self.maximum.map_or(true, |max| x <= max)
    }

    /// Returns true if the integer `x` lies within the bounds. Compared
    /// exactly, so values beyond 2^53 are not rounded onto a limit.
    pub fn contains_integer(&self, x: i128) -> bool {
        self.minimum.map_or(true, |min| cmp_integer_to_limit(x, min).is_ge())
            && self.maximum.map_or(true, |max| cmp_integer_to_limit(x, max).is_le())
    }

    /// Merge another declaration's bounds into these.
    pub fn widen(&mut self, other: &Bounds) {
        self.minimum = merge_limit(self.minimum, other.minimum, f64::min);
        self.maximum = merge_limit(self.maximum, other.maximum, f64::max);
    }
}

/// 2^127, the first float past `i128::MAX`.
const I128_EDGE: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Exact ordering of an integer against a finite float limit.
fn cmp_integer_to_limit(x: i128, limit: f64) -> Ordering {
    if limit >= I128_EDGE {
        return Ordering::Less;
    }
    if limit < -I128_EDGE {
        return Ordering::Greater;
    }
    let whole = limit.trunc();
    match x.cmp(&(whole as i128)) {
        Ordering::Equal => whole.partial_cmp(&limit).unwrap_or(Ordering::Equal),
        other => other,
    }
}

fn merge_limit(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn limit(v: Option<f64>) -> String {
            v.map_or_else(|| "none".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "minimum {}, maximum {}",
            limit(self.minimum),
            limit(self.maximum)
        )
    }
}

/// A literal value listed in a schema `enum`.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumLiteral {
    /// A textual enum value.
    Text(String),
    /// A numeric enum value.
    Number(Number),
}

impl EnumLiteral {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text(expected), Value::String(actual)) => expected == actual,
            (Self::Number(expected), Value::Number(actual)) => numbers_equal(expected, actual),
            _ => false,
        }
    }
}

/// Numeric equality across integer and float representations (`1 == 1.0`).
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => match (a.as_u64(), b.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
    }
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One member of a question's answer domain.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOption {
    /// Literal `true` or `false`.
    Boolean(bool),
    /// Literal `null`.
    Null,
    /// A literal value from a schema `enum`.
    Enum(EnumLiteral),
    /// Integral numbers within the bounds.
    Integer(Bounds),
    /// Any number within the bounds.
    Number(Bounds),
    /// Any text.
    String,
    /// Text matching `YYYY-MM-DD`.
    Date,
    /// Text matching `HH:MM:SS`.
    Time,
    /// Text matching `YYYY-MM-DDTHH:MM:SS`.
    DateTime,
}

impl FormOption {
    /// Convert an `enum` entry into an option. `true`/`false`/`null` map
    /// to the Boolean/Null options; arrays and objects are not literals.
    pub fn from_literal(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Boolean(*b)),
            Value::Null => Some(Self::Null),
            Value::String(s) => Some(Self::Enum(EnumLiteral::Text(s.clone()))),
            Value::Number(n) => Some(Self::Enum(EnumLiteral::Number(n.clone()))),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The answer kind this option belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Null => DataType::Null,
            Self::Enum(_) => DataType::Enum,
            Self::Integer(_) => DataType::Integer,
            Self::Number(_) => DataType::Number,
            Self::String => DataType::String,
            Self::Date => DataType::Date,
            Self::Time => DataType::Time,
            Self::DateTime => DataType::DateTime,
        }
    }

    /// Returns true if `value` is an acceptable answer under this option.
    pub fn is_valid(&self, value: &Value) -> bool {
        match self {
            Self::Boolean(b) => value.as_bool() == Some(*b),
            Self::Null => value.is_null(),
            Self::Enum(literal) => literal.matches(value),
            Self::Integer(bounds) => integral(value).is_some_and(|x| bounds.contains_integer(x)),
            Self::Number(bounds) => match integral(value) {
                Some(x) => bounds.contains_integer(x),
                None => value.as_f64().is_some_and(|x| bounds.contains(x)),
            },
            Self::String => value.is_string(),
            Self::Date => value.as_str().is_some_and(is_date),
            Self::Time => value.as_str().is_some_and(is_time),
            Self::DateTime => value.as_str().is_some_and(is_date_time),
        }
    }

    /// Fold `other` into `self` if both are the same typed kind.
    ///
    /// Returns false, leaving `self` untouched, when the kinds differ or
    /// either side is a literal.
    fn absorb(&mut self, other: &FormOption) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) | (Self::Number(a), Self::Number(b)) => {
                a.widen(b);
                true
            }
            (Self::String, Self::String)
            | (Self::Date, Self::Date)
            | (Self::Time, Self::Time)
            | (Self::DateTime, Self::DateTime) => true,
            _ => false,
        }
    }
}

/// Integral JSON numbers, widened to `i128`. `3.0` is not integral here.
fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}

impl fmt::Display for FormOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Enum(literal) => write!(f, "{literal}"),
            Self::Integer(bounds) => write!(f, "Integer({bounds})"),
            Self::Number(bounds) => write!(f, "Number({bounds})"),
            Self::String => f.write_str("String"),
            Self::Date => f.write_str("Date"),
            Self::Time => f.write_str("Time"),
            Self::DateTime => f.write_str("DateTime"),
        }
    }
}

/// The answer domain of one question, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    options: Vec<FormOption>,
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, merging typed kinds and dropping duplicate literals.
    pub fn insert(&mut self, option: FormOption) {
        if option.data_type().is_typed() {
            if self.options.iter_mut().any(|existing| existing.absorb(&option)) {
                return;
            }
        } else if self.options.iter().any(|existing| literal_eq(existing, &option)) {
            return;
        }
        self.options.push(option);
    }

    /// Returns true if any option accepts `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        self.options.iter().any(|option| option.is_valid(value))
    }

    /// Returns true if an option of kind `data_type` is present.
    pub fn includes(&self, data_type: DataType) -> bool {
        self.options.iter().any(|option| option.data_type() == data_type)
    }

    /// Human-readable rendering of every option, for error messages.
    pub fn describe(&self) -> Vec<String> {
        self.options.iter().map(ToString::to_string).collect()
    }

    /// Iterate over the options.
    pub fn iter(&self) -> std::slice::Iter<'_, FormOption> {
        self.options.iter()
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn literal_eq(a: &FormOption, b: &FormOption) -> bool {
    match (a, b) {
        (FormOption::Enum(EnumLiteral::Number(x)), FormOption::Enum(EnumLiteral::Number(y))) => {
            numbers_equal(x, y)
        }
        _ => a == b,
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a FormOption;
    type IntoIter = std::slice::Iter<'a, FormOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{option}")?;
        }
        f.write_str("]")
    }
}
