//! Per-field schema keyword mapping
//!
//! A [`Property`] converts one field of a record type into its keyword map.
//! The field behind a property is a closed variant: a real column, an
//! association, or a virtual column declared entirely through enhancement
//! registration. Keywords resolving to null or an empty string are omitted
//! from the output.

use serde_json::{Map, Value};

use crate::builder::Builder;
use crate::cast;
use crate::error::Result;
use crate::model::{Association, Cardinality, Column, ColumnType};

/// Constraint keywords copied verbatim from a registered options bag, in
/// fixed order: generic, numeric, string, array, object, logical.
const PASSTHROUGH_KEYWORDS: &[&str] = &[
    "format",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "maxItems",
    "minItems",
    "uniqueItems",
    "maxProperties",
    "minProperties",
    "properties",
    "additionalProperties",
    "dependencies",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

/// A synthetic field with no storage backing, reconstructed from its
/// registered options bag
#[derive(Debug, Clone)]
pub struct VirtualColumn {
    pub name: String,
    pub column_type: Option<ColumnType>,
    pub item_type: Option<ColumnType>,
    pub default: Option<Value>,
}

impl VirtualColumn {
    /// Rebuild the virtual column from the options registered for it
    pub fn from_options(name: impl Into<String>, options: &Map<String, Value>) -> Self {
        let column_type = options
            .get("type")
            .and_then(Value::as_str)
            .and_then(ColumnType::parse);
        let item_type = options
            .get("items")
            .and_then(|items| items.get("type"))
            .and_then(Value::as_str)
            .and_then(ColumnType::parse);
        Self {
            name: name.into(),
            column_type,
            item_type,
            default: options.get("default").cloned(),
        }
    }
}

enum FieldSource<'a> {
    Column(&'a Column),
    Association(&'a Association),
    Virtual(VirtualColumn),
}

/// One field plus its registered options, ready to be mapped
pub struct Property<'a> {
    source: FieldSource<'a>,
    options: Option<&'a Map<String, Value>>,
}

impl<'a> Property<'a> {
    pub(crate) fn column(column: &'a Column, options: Option<&'a Map<String, Value>>) -> Self {
        Self {
            source: FieldSource::Column(column),
            options,
        }
    }

    pub(crate) fn association(association: &'a Association) -> Self {
        Self {
            source: FieldSource::Association(association),
            options: None,
        }
    }

    pub(crate) fn virtual_column(column: VirtualColumn, options: &'a Map<String, Value>) -> Self {
        Self {
            source: FieldSource::Virtual(column),
            options: Some(options),
        }
    }

    /// Map this field into its schema keyword representation.
    ///
    /// A singular association recurses into the builder and embeds the
    /// target's full document directly; everything else produces an ordered
    /// keyword map.
    pub fn as_json(&self, builder: &Builder<'_>) -> Result<Map<String, Value>> {
        if let FieldSource::Association(association) = &self.source {
            if association.cardinality == Cardinality::One {
                return builder.build_document(&association.target);
            }
        }

        let mut node = Map::new();
        insert(&mut node, "type", self.build_type());
        insert(&mut node, "default", self.build_default());
        insert(&mut node, "title", Some(Value::String(self.build_title())));
        insert(&mut node, "description", self.option("description"));
        insert(&mut node, "items", self.build_items(builder)?);
        insert(&mut node, "enum", self.option("enum"));
        insert(&mut node, "const", self.option("const"));
        for keyword in PASSTHROUGH_KEYWORDS {
            insert(&mut node, keyword, self.option(keyword));
        }
        Ok(node)
    }

    fn option(&self, keyword: &str) -> Option<Value> {
        self.options.and_then(|o| o.get(keyword)).cloned()
    }

    fn name(&self) -> &str {
        match &self.source {
            FieldSource::Column(c) => &c.name,
            FieldSource::Association(a) => &a.name,
            FieldSource::Virtual(v) => &v.name,
        }
    }

    fn build_type(&self) -> Option<Value> {
        let column_type = match &self.source {
            FieldSource::Association(_) => return Some(Value::String("array".to_string())),
            FieldSource::Column(c) => Some(c.column_type),
            FieldSource::Virtual(v) => v.column_type,
        };
        column_type
            .and_then(ColumnType::json_type)
            .map(|t| Value::String(t.to_string()))
    }

    fn build_title(&self) -> String {
        match self.option("title") {
            Some(Value::String(title)) if !title.is_empty() => title,
            _ => humanize(self.name()),
        }
    }

    fn build_default(&self) -> Option<Value> {
        let (column_type, stored) = match &self.source {
            FieldSource::Column(c) => (Some(c.column_type), c.default.clone()),
            FieldSource::Virtual(v) => (v.column_type, v.default.clone()),
            FieldSource::Association(_) => return None,
        };
        let raw = stored
            .filter(|v| !v.is_null())
            .or_else(|| self.option("default").filter(|v| !v.is_null()))?;
        cast::cast(column_type?, &raw)
    }

    fn build_items(&self, builder: &Builder<'_>) -> Result<Option<Value>> {
        match &self.source {
            FieldSource::Association(association) => {
                builder.build(&association.target).map(Some)
            }
            FieldSource::Column(c) if c.column_type == ColumnType::Array => {
                Ok(self.item_schema(None))
            }
            FieldSource::Virtual(v) if v.column_type == Some(ColumnType::Array) => {
                Ok(self.item_schema(v.item_type))
            }
            _ => Ok(None),
        }
    }

    fn item_schema(&self, item_type: Option<ColumnType>) -> Option<Value> {
        let json_type = item_type.and_then(ColumnType::json_type)?;
        Some(Value::Object(singleton(
            "type",
            Value::String(json_type.to_string()),
        )))
    }
}

fn insert(node: &mut Map<String, Value>, keyword: &str, value: Option<Value>) {
    let Some(value) = value else { return };
    if value.is_null() {
        return;
    }
    if value.as_str().is_some_and(str::is_empty) {
        return;
    }
    node.insert(keyword.to_string(), value);
}

fn singleton(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

/// Humanize a column, association, or model name into a title: a trailing
/// `_id` is stripped, separators become spaces, the first letter is
/// capitalized.
pub(crate) fn humanize(name: &str) -> String {
    let base = name.strip_suffix("_id").unwrap_or(name);
    let spaced = base.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::enhancement::EnhancementRegistry;
    use crate::model::ModelSet;
    use serde_json::json;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize("created_at"), "Created at");
        assert_eq!(humanize("company_id"), "Company");
        assert_eq!(humanize("employee_salary"), "Employee salary");
    }

    fn with_builder(f: impl FnOnce(&Builder<'_>)) {
        let models = ModelSet::new();
        let registry = EnhancementRegistry::new();
        let config = Config::default();
        let builder = Builder::new(&models, &registry, &config);
        f(&builder);
    }

    #[test]
    fn test_column_property() {
        with_builder(|builder| {
            let column = Column::new("active", ColumnType::Boolean).with_default(json!("false"));
            let property = Property::column(&column, None);
            let node = property.as_json(builder).unwrap();
            assert_eq!(
                Value::Object(node),
                json!({"type": "boolean", "title": "Active", "default": false})
            );
        });
    }

    #[test]
    fn test_unmapped_column_type_keeps_title_only() {
        with_builder(|builder| {
            let column = Column::new("preferences", ColumnType::Json);
            let node = Property::column(&column, None).as_json(builder).unwrap();
            assert_eq!(Value::Object(node), json!({"title": "Preferences"}));
        });
    }

    #[test]
    fn test_uncoercible_default_is_omitted() {
        with_builder(|builder| {
            let column = Column::new("group", ColumnType::Integer).with_default(json!("none"));
            let node = Property::column(&column, None).as_json(builder).unwrap();
            assert_eq!(Value::Object(node), json!({"type": "integer", "title": "Group"}));
        });
    }

    #[test]
    fn test_options_override_and_passthrough() {
        with_builder(|builder| {
            let column = Column::new("name", ColumnType::String);
            let options = json!({
                "title": "Full Name",
                "description": "The user's name",
                "minLength": 1,
                "maxLength": 80
            });
            let options = options.as_object().unwrap().clone();
            let node = Property::column(&column, Some(&options)).as_json(builder).unwrap();
            assert_eq!(
                Value::Object(node),
                json!({
                    "type": "string",
                    "title": "Full Name",
                    "description": "The user's name",
                    "minLength": 1,
                    "maxLength": 80
                })
            );
        });
    }

    #[test]
    fn test_virtual_array_items() {
        with_builder(|builder| {
            let options = json!({"type": "array", "items": {"type": "string"}, "virtual": true});
            let options = options.as_object().unwrap().clone();
            let column = VirtualColumn::from_options("tags", &options);
            let node = Property::virtual_column(column, &options).as_json(builder).unwrap();
            assert_eq!(
                Value::Object(node),
                json!({"type": "array", "title": "Tags", "items": {"type": "string"}})
            );
        });
    }
}
