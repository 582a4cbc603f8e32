//! Schema document assembly
//!
//! The [`Builder`] orchestrates generation for one record type: columns
//! first, then associations filling gaps, then virtual fields from the
//! enhancement registry. Singular associations recurse into the target
//! model's full document; plural associations wrap it in an array schema.
//!
//! There is no cycle guard. Generation over a self-referential or mutually
//! referential association graph recurses without bound; callers composing
//! schemas for cyclic graphs must break the cycle themselves, for example
//! by excluding the back-reference association.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::Config;
use crate::enhancement::{Enhancement, EnhancementRegistry};
use crate::error::{Result, SchemaError};
use crate::model::{ModelDescriptor, ModelSet};
use crate::property::{humanize, Property, VirtualColumn};

/// Assembles schema documents for registered record types
///
/// Holds only borrowed collaborators, so it is cheap to construct per call.
/// Building has no side effects and repeated builds over unchanged inputs
/// yield structurally identical documents.
pub struct Builder<'a> {
    models: &'a ModelSet,
    registry: &'a EnhancementRegistry,
    config: &'a Config,
}

impl<'a> Builder<'a> {
    /// Create a builder over the given models, enhancements, and config
    pub fn new(models: &'a ModelSet, registry: &'a EnhancementRegistry, config: &'a Config) -> Self {
        Self {
            models,
            registry,
            config,
        }
    }

    /// Build the schema document for a model.
    ///
    /// Fails with [`SchemaError::InvalidModel`] if `model_name` (or any
    /// association target reached during recursion) is not registered.
    pub fn build(&self, model_name: &str) -> Result<Value> {
        self.build_document(model_name).map(Value::Object)
    }

    pub(crate) fn build_document(&self, model_name: &str) -> Result<Map<String, Value>> {
        let model = self
            .models
            .get(model_name)
            .ok_or_else(|| SchemaError::InvalidModel(model_name.to_string()))?;
        debug!(model = model_name, "building schema document");

        let enhancement = self.registry.get(&model.name);
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for column in &model.columns {
            if self.config.excluded_column(&column.name) {
                trace!(model = model_name, column = %column.name, "column excluded");
                continue;
            }
            if !required.iter().any(|r| r == &column.name) {
                required.push(column.name.clone());
            }
            if !properties.contains_key(&column.name) {
                let options = enhancement.and_then(|e| e.options_for(&column.name));
                let node = Property::column(column, options).as_json(self)?;
                properties.insert(column.name.clone(), Value::Object(node));
            }
        }

        if !self.config.exclude_associations {
            for association in &model.associations {
                if properties.contains_key(&association.name) {
                    continue;
                }
                let node = Property::association(association).as_json(self)?;
                properties.insert(association.name.clone(), Value::Object(node));
            }
        }

        if let Some(enhancement) = enhancement {
            for (name, options) in enhancement.virtual_properties() {
                if !required.iter().any(|r| r == name) {
                    required.push(name.to_string());
                }
                let column = VirtualColumn::from_options(name, options);
                let node = Property::virtual_column(column, options).as_json(self)?;
                // A virtual field overrides any same-named property.
                properties.insert(name.to_string(), Value::Object(node));
            }
        }

        let mut document = Map::new();
        document.insert("title".to_string(), Value::String(self.build_title(model, enhancement)));
        if let Some(description) = enhancement.and_then(|e| e.model_description()) {
            document.insert(
                "description".to_string(),
                Value::String(description.to_string()),
            );
        }
        document.insert("type".to_string(), Value::String(self.build_type(model)));
        document.insert("properties".to_string(), Value::Object(properties));
        document.insert(
            "required".to_string(),
            Value::Array(required.into_iter().map(Value::String).collect()),
        );
        Ok(document)
    }

    fn build_title(&self, model: &ModelDescriptor, enhancement: Option<&Enhancement>) -> String {
        if let Some(title) = enhancement.and_then(|e| e.model_title()) {
            return title.to_string();
        }
        let short_name = model.name.rsplit("::").next().unwrap_or(&model.name);
        humanize(short_name)
    }

    fn build_type(&self, model: &ModelDescriptor) -> String {
        model
            .declared_type
            .clone()
            .unwrap_or_else(|| "object".to_string())
    }
}
