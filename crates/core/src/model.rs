//! Model type metadata.
//!
//! A [`ModelCatalog`] describes every type a form can bind to: objects with
//! named properties, single-element collections, and scalar leaves. It is
//! built once (usually from a [`crate::config::RuleCatalogConfig`]) and only
//! read afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A property declared on an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub value_type: String,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
        }
    }
}

/// The structural kind of a model type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    /// A type with named properties.
    Object {
        #[serde(default)]
        properties: Vec<PropertyDef>,
    },
    /// A generic collection with exactly one element type parameter.
    Collection { element: String },
    /// A leaf value (strings, numbers, dates ...).
    Scalar,
}

/// A named model type and its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelType {
    pub name: String,
    #[serde(flatten)]
    pub shape: TypeShape,
}

impl ModelType {
    /// Look up a property declared directly on this type.
    ///
    /// Always `None` for collections and scalars.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        match &self.shape {
            TypeShape::Object { properties } => properties.iter().find(|p| p.name == name),
            TypeShape::Collection { .. } | TypeShape::Scalar => None,
        }
    }

    /// Element type when this type is a collection.
    pub fn element_type(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Collection { element } => Some(element),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ModelCatalog
// ---------------------------------------------------------------------------

/// Read-only registry of model types keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    types: HashMap<String, ModelType>,
}

impl ModelCatalog {
    pub fn builder() -> ModelCatalogBuilder {
        ModelCatalogBuilder::default()
    }

    pub fn get(&self, type_name: &str) -> Option<&ModelType> {
        self.types.get(type_name)
    }

    /// Look up `property` on `type_name`. Unknown types have no properties.
    pub fn property(&self, type_name: &str, property: &str) -> Option<&PropertyDef> {
        self.get(type_name).and_then(|t| t.property(property))
    }

    /// Whether `type_name` is a single-element generic collection.
    ///
    /// A missing type is a caller defect and fails with
    /// [`CoreError::InvalidArgument`]. Types the catalog does not know about
    /// are not collections.
    pub fn is_collection(&self, type_name: Option<&str>) -> Result<bool, CoreError> {
        let type_name = type_name.ok_or(CoreError::InvalidArgument("type"))?;
        Ok(self
            .get(type_name)
            .is_some_and(|t| t.element_type().is_some()))
    }

    /// Element type of a collection type, `None` for anything else.
    pub fn element_type(&self, type_name: &str) -> Option<&str> {
        self.get(type_name).and_then(ModelType::element_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder for [`ModelCatalog`]. Later definitions of the same name replace
/// earlier ones.
#[derive(Debug, Default)]
pub struct ModelCatalogBuilder {
    types: HashMap<String, ModelType>,
}

impl ModelCatalogBuilder {
    /// Declare an object type with `(property, value type)` pairs.
    pub fn object(mut self, name: &str, properties: &[(&str, &str)]) -> Self {
        let properties = properties
            .iter()
            .map(|(prop, value_type)| PropertyDef::new(*prop, *value_type))
            .collect();
        self.types.insert(
            name.to_string(),
            ModelType {
                name: name.to_string(),
                shape: TypeShape::Object { properties },
            },
        );
        self
    }

    pub fn collection(mut self, name: &str, element: &str) -> Self {
        self.types.insert(
            name.to_string(),
            ModelType {
                name: name.to_string(),
                shape: TypeShape::Collection {
                    element: element.to_string(),
                },
            },
        );
        self
    }

    pub fn scalar(mut self, name: &str) -> Self {
        self.types.insert(
            name.to_string(),
            ModelType {
                name: name.to_string(),
                shape: TypeShape::Scalar,
            },
        );
        self
    }

    pub fn insert(mut self, model_type: ModelType) -> Self {
        self.types.insert(model_type.name.clone(), model_type);
        self
    }

    pub fn build(self) -> ModelCatalog {
        ModelCatalog { types: self.types }
    }
}
