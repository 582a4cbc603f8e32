//! Record model descriptors
//!
//! The contract with the host data layer: a [`ModelDescriptor`] carries the
//! ordered columns and associations of one record type, and a [`ModelSet`]
//! resolves association targets by name during generation. Descriptors are
//! plain data and are never mutated by the engine.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Symbolic storage/declared type tag for a column
///
/// A closed set: conformance checking is defined only over the schema
/// primitive subset, while `json` and `binary` columns are representable but
/// carry no JSON Schema `type` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    Array,
    Object,
    Json,
    Binary,
    Null,
}

impl ColumnType {
    /// The JSON Schema `type` keyword for this column type, if one exists.
    ///
    /// Types without a mapping (`json`, `binary`, `null`) yield a property
    /// with no `type` keyword rather than an error.
    pub fn json_type(self) -> Option<&'static str> {
        match self {
            ColumnType::String | ColumnType::Text => Some("string"),
            ColumnType::Integer => Some("integer"),
            ColumnType::Float | ColumnType::Decimal | ColumnType::Number => Some("number"),
            ColumnType::Boolean => Some("boolean"),
            ColumnType::Date => Some("date"),
            ColumnType::DateTime => Some("date-time"),
            ColumnType::Time => Some("time"),
            ColumnType::Array => Some("array"),
            ColumnType::Object => Some("object"),
            ColumnType::Json | ColumnType::Binary | ColumnType::Null => None,
        }
    }

    /// Parse a type tag as it appears in a registered options bag
    pub fn parse(tag: &str) -> Option<Self> {
        let ty = match tag {
            "string" => ColumnType::String,
            "text" => ColumnType::Text,
            "integer" => ColumnType::Integer,
            "float" => ColumnType::Float,
            "decimal" => ColumnType::Decimal,
            "number" => ColumnType::Number,
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "datetime" | "date-time" => ColumnType::DateTime,
            "time" => ColumnType::Time,
            "array" => ColumnType::Array,
            "object" => ColumnType::Object,
            "json" => ColumnType::Json,
            "binary" => ColumnType::Binary,
            "null" => ColumnType::Null,
            _ => return None,
        };
        Some(ty)
    }

    fn tag(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
            ColumnType::Json => "json",
            ColumnType::Binary => "binary",
            ColumnType::Null => "null",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A real column of a record type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Symbolic storage type
    pub column_type: ColumnType,
    /// Whether the column accepts NULL
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Stored default value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Column {
    /// Create a nullable column with no default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
        }
    }

    /// Set the stored default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the column NOT NULL
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

fn default_true() -> bool {
    true
}

/// Cardinality of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// A named reference from one record type to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    /// Association name (also the property name in the document)
    pub name: String,
    /// Singular or plural
    pub cardinality: Cardinality,
    /// Name of the target record type, resolved through the [`ModelSet`]
    pub target: String,
    /// Foreign key column backing this association, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl Association {
    /// A singular (belongs-to / has-one) association
    pub fn one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::One,
            target: target.into(),
            foreign_key: None,
        }
    }

    /// A plural (has-many) association
    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Many,
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Set the backing foreign key column name
    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }
}

/// Introspected description of one record type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Short model name (e.g., "User")
    pub name: String,
    /// Declared root schema type; defaults to "object" when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    /// Ordered columns
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Ordered associations
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl ModelDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            columns: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Override the root schema type (escape hatch for non-object roots)
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    /// Append a column
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append an association
    pub fn association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// Resolve the symbolic type of a real column
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    /// Whether `name` is a column or association of this model
    pub fn has_attribute(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
            || self.associations.iter().any(|a| a.name == name)
    }
}

/// The set of record types known to the host data layer
///
/// Association targets are resolved against this set during generation;
/// building a schema for (or through) a name not present here is an
/// `InvalidModel` error.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    models: HashMap<String, ModelDescriptor>,
}

impl ModelSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model descriptor, replacing any prior descriptor of the
    /// same name
    pub fn register(&mut self, model: ModelDescriptor) {
        self.models.insert(model.name.clone(), model);
    }

    /// Look up a model by name
    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    /// Whether a model of this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_type_mappings() {
        assert_eq!(ColumnType::Text.json_type(), Some("string"));
        assert_eq!(ColumnType::Decimal.json_type(), Some("number"));
        assert_eq!(ColumnType::DateTime.json_type(), Some("date-time"));
        assert_eq!(ColumnType::Json.json_type(), None);
        assert_eq!(ColumnType::Binary.json_type(), None);
    }

    #[test]
    fn test_parse_type_tags() {
        assert_eq!(ColumnType::parse("datetime"), Some(ColumnType::DateTime));
        assert_eq!(ColumnType::parse("date-time"), Some(ColumnType::DateTime));
        assert_eq!(ColumnType::parse("uuid"), None);
    }

    #[test]
    fn test_has_attribute() {
        let model = ModelDescriptor::new("User")
            .column(Column::new("name", ColumnType::String))
            .association(Association::many("tasks", "Task"));

        assert!(model.has_attribute("name"));
        assert!(model.has_attribute("tasks"));
        assert!(!model.has_attribute("email"));
        assert_eq!(model.column_type("name"), Some(ColumnType::String));
        assert_eq!(model.column_type("tasks"), None);
    }
}
