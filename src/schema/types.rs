//! Schema type definitions.
//!
//! A schema is an ordered list of field rules; declaration order is the
//! order fields are checked during validation.

use regex::Regex;

/// Declared field types.
///
/// Type matching is exact — no coercion between numbers and strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    String,
    Boolean,
    Object,
}

impl FieldType {
    /// Returns the type name as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
        }
    }
}

/// Rule set for a single field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Declared type, if any
    pub field_type: Option<FieldType>,
    /// Numeric lower bound (inclusive)
    pub min: Option<f64>,
    /// Numeric upper bound (inclusive)
    pub max: Option<f64>,
    /// Exact string length
    pub length: Option<usize>,
    /// Pattern the stringified value must match
    pub pattern: Option<Regex>,
}

impl FieldDef {
    /// Creates an unconstrained field rule.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            field_type: None,
            min: None,
            max: None,
            length: None,
            pattern: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declares the field type.
    pub fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the inclusive numeric lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive numeric upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Requires an exact string length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Requires the stringified value to match a pattern.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Shorthand for a required string field.
    pub fn required_string(name: impl Into<String>) -> Self {
        Self::new(name).required().of_type(FieldType::String)
    }

    /// Shorthand for a required number field.
    pub fn required_number(name: impl Into<String>) -> Self {
        Self::new(name).required().of_type(FieldType::Number)
    }

    /// Shorthand for an optional number field.
    pub fn optional_number(name: impl Into<String>) -> Self {
        Self::new(name).of_type(FieldType::Number)
    }

    /// Shorthand for a required boolean field.
    pub fn required_boolean(name: impl Into<String>) -> Self {
        Self::new(name).required().of_type(FieldType::Boolean)
    }
}

/// An ordered collection of field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field rule, preserving declaration order.
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    /// Field rules in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns true if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
