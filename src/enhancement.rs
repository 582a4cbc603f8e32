//! Declarative schema enhancement registration
//!
//! An [`EnhancementRegistry`] holds per-model overrides: a model-level title
//! and description, extra keywords for named fields, and virtual fields with
//! no storage backing. Every registration is validated up front (field
//! existence, keyword allow-list, type conformance of `default`/`enum`/
//! `const`), so generation never trips over a bad enhancement.
//!
//! The registry is plain owned state handed to the builder by reference.
//! Registration is expected to happen during a single-threaded setup phase;
//! afterwards any number of builds may share the registry immutably.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::model::{Cardinality, ColumnType, ModelDescriptor};
use crate::validator;

/// Registered overrides for one record type
#[derive(Debug, Clone, Default)]
pub struct Enhancement {
    model_title: Option<String>,
    model_description: Option<String>,
    // Registration order is preserved so virtual fields surface in the
    // order they were declared.
    properties: Vec<(String, Map<String, Value>)>,
}

impl Enhancement {
    /// Registered model title, if non-empty
    pub fn model_title(&self) -> Option<&str> {
        self.model_title.as_deref().filter(|t| !t.is_empty())
    }

    /// Registered model description, if non-empty
    pub fn model_description(&self) -> Option<&str> {
        self.model_description.as_deref().filter(|d| !d.is_empty())
    }

    /// Options registered for a field
    pub fn options_for(&self, name: &str) -> Option<&Map<String, Value>> {
        self.properties
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, options)| options)
    }

    /// Virtual fields in registration order
    pub fn virtual_properties(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.properties
            .iter()
            .filter(|(_, options)| is_virtual(options))
            .map(|(name, options)| (name.as_str(), options))
    }

    // Last write wins, keeping the field's original position.
    fn set_property(&mut self, name: &str, options: Map<String, Value>) {
        match self.properties.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => *existing = options,
            None => self.properties.push((name.to_string(), options)),
        }
    }
}

fn is_virtual(options: &Map<String, Value>) -> bool {
    options
        .get("virtual")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Per-model enhancement entries, keyed by model name
#[derive(Debug, Clone, Default)]
pub struct EnhancementRegistry {
    entries: HashMap<String, Enhancement>,
}

impl EnhancementRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or continue) enhancing a model, creating its entry lazily
    pub fn enhance<'a>(&'a mut self, model: &'a ModelDescriptor) -> SchemaEnhancer<'a> {
        let entry = self.entries.entry(model.name.clone()).or_default();
        SchemaEnhancer { model, entry }
    }

    /// The enhancement entry for a model, if any registration happened
    pub fn get(&self, model_name: &str) -> Option<&Enhancement> {
        self.entries.get(model_name)
    }

    /// Drop every registered enhancement (test isolation)
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// Registration surface for one model's enhancement entry
pub struct SchemaEnhancer<'a> {
    model: &'a ModelDescriptor,
    entry: &'a mut Enhancement,
}

impl SchemaEnhancer<'_> {
    /// Set the document title for the model
    pub fn model_title(&mut self, title: impl Into<String>) {
        self.entry.model_title = Some(title.into());
    }

    /// Set the document description for the model
    pub fn model_description(&mut self, description: impl Into<String>) {
        self.entry.model_description = Some(description.into());
    }

    /// Register extra keywords for an existing column or association.
    ///
    /// The options must be a JSON object restricted to the keyword
    /// allow-list; `default`, `enum`, and `const` values are checked against
    /// the field's resolved type. Repeated registration for the same field
    /// replaces its prior options.
    ///
    /// Options registered against an association name are validated against
    /// its collection shape and stored, but association properties are
    /// mapped from introspection alone, so those options do not surface in
    /// the built document.
    pub fn property(&mut self, name: &str, options: Value) -> Result<()> {
        let options = into_options(name, options)?;

        if !is_virtual(&options) && !self.model.has_attribute(name) {
            return Err(SchemaError::UnknownField {
                model: self.model.name.clone(),
                field: name.to_string(),
            });
        }

        let column_type = self.resolve_type(name, &options)?;
        validator::validate(name, column_type, &options)?;

        debug!(model = %self.model.name, field = name, "registered property options");
        self.entry.set_property(name, options);
        Ok(())
    }

    /// Register a virtual field: a property with no backing column, known
    /// only through the registry.
    pub fn virtual_property(&mut self, name: &str, options: Value) -> Result<()> {
        let mut options_map = into_options(name, options)?;
        options_map.insert("virtual".to_string(), Value::Bool(true));
        self.property(name, Value::Object(options_map))
    }

    // The semantic type the keyword values are checked against: the
    // introspected column type for real columns, the declared `type` option
    // for virtual fields, and the collection shape for associations.
    fn resolve_type(&self, name: &str, options: &Map<String, Value>) -> Result<ColumnType> {
        if is_virtual(options) {
            let tag = options
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return ColumnType::parse(tag).ok_or_else(|| SchemaError::UnknownType(tag.to_string()));
        }

        if let Some(column_type) = self.model.column_type(name) {
            return Ok(column_type);
        }

        let association = self.model.associations.iter().find(|a| a.name == name);
        match association {
            Some(a) => Ok(match a.cardinality {
                Cardinality::One => ColumnType::Object,
                Cardinality::Many => ColumnType::Array,
            }),
            None => Err(SchemaError::UnknownField {
                model: self.model.name.clone(),
                field: name.to_string(),
            }),
        }
    }
}

fn into_options(field: &str, options: Value) -> Result<Map<String, Value>> {
    match options {
        Value::Object(map) => Ok(map),
        _ => Err(SchemaError::InvalidOption {
            field: field.to_string(),
            keyword: "options".to_string(),
            reason: "must be a JSON object".to_string(),
        }),
    }
}
