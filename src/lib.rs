//! Introspec
//!
//! Derives JSON-Schema-style documents from introspected record model
//! definitions, so an application can expose a machine-readable contract
//! for its data model without hand-maintaining schema files.
//!
//! ## Features
//!
//! - **Introspection-Driven**: columns and associations become properties;
//!   singular associations embed the target model's document, plural ones
//!   become array schemas
//! - **Declarative Enhancement**: per-field validation keywords, virtual
//!   fields, and model titles/descriptions registered against an explicit
//!   [`EnhancementRegistry`]
//! - **Registration-Time Validation**: unknown fields, disallowed keywords,
//!   and type-mismatched `default`/`enum`/`const` values fail at declaration,
//!   never during generation
//! - **Configurable Exclusions**: foreign-key columns, named columns, and
//!   associations can be left out of the document
//!
//! ## Example
//!
//! ```
//! use introspec::{Builder, Column, ColumnType, Config, EnhancementRegistry,
//!                 ModelDescriptor, ModelSet};
//!
//! let mut models = ModelSet::new();
//! models.register(
//!     ModelDescriptor::new("User")
//!         .column(Column::new("name", ColumnType::String))
//!         .column(Column::new("active", ColumnType::Boolean)),
//! );
//!
//! let mut registry = EnhancementRegistry::new();
//! let user = models.get("User").unwrap().clone();
//! registry
//!     .enhance(&user)
//!     .property("name", serde_json::json!({"title": "Full Name"}))
//!     .unwrap();
//!
//! let config = Config::default();
//! let schema = Builder::new(&models, &registry, &config).build("User").unwrap();
//! assert_eq!(schema["properties"]["name"]["title"], "Full Name");
//! ```

pub mod builder;
pub mod cast;
pub mod config;
pub mod enhancement;
pub mod error;
pub mod model;
pub mod property;
pub mod validator;

pub use builder::Builder;
pub use config::Config;
pub use enhancement::{Enhancement, EnhancementRegistry, SchemaEnhancer};
pub use error::{Result, SchemaError};
pub use model::{Association, Cardinality, Column, ColumnType, ModelDescriptor, ModelSet};
pub use property::{Property, VirtualColumn};

/// Build a model's schema document and serialize it to compact JSON
pub fn json_schema(
    models: &ModelSet,
    registry: &EnhancementRegistry,
    config: &Config,
    model_name: &str,
) -> Result<String> {
    let schema = Builder::new(models, registry, config).build(model_name)?;
    Ok(serde_json::to_string(&schema)?)
}

/// Build a model's schema document and serialize it to pretty-printed JSON
pub fn json_schema_pretty(
    models: &ModelSet,
    registry: &EnhancementRegistry,
    config: &Config,
    model_name: &str,
) -> Result<String> {
    let schema = Builder::new(models, registry, config).build(model_name)?;
    Ok(serde_json::to_string_pretty(&schema)?)
}
