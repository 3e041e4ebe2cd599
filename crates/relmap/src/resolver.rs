//! Attribute discovery for the two sides of a mapping.

use crate::{Error, Model, Object, Result};
use indexmap::IndexMap;
use relmap_core::{
    schema::{self, Field, ModelId},
    Schema,
};

/// Attribute names mapped to their field descriptors. Attributes without a
/// rich descriptor map to `None`.
pub type FieldDict<'a> = IndexMap<String, Option<&'a Field>>;

pub trait FieldResolver {
    fn field_dict(&self) -> FieldDict<'_>;

    fn field_names(&self) -> Vec<String> {
        self.field_dict().into_keys().collect()
    }
}

/// Resolves the stored attributes of a registered model.
#[derive(Debug, Clone, Copy)]
pub struct ModelFieldResolver<'a> {
    model: &'a schema::Model,
}

/// Resolves the attributes a plain [`Object`] declares.
#[derive(Debug, Clone, Copy)]
pub struct ResourceFieldResolver {
    names: &'static [&'static str],
}

impl<'a> ModelFieldResolver<'a> {
    pub fn new(schema: &'a Schema, model: ModelId) -> Result<Self> {
        Ok(Self {
            model: schema.get(model)?,
        })
    }

    /// The resolver for `M`. Fails if `M` was never registered.
    pub fn of<M: Model>(schema: &'a Schema) -> Result<Self> {
        let model = schema
            .models
            .get(&M::id())
            .ok_or_else(|| Error::metadata_unavailable(std::any::type_name::<M>()))?;
        Ok(Self { model })
    }

    pub fn model(&self) -> &'a schema::Model {
        self.model
    }
}

impl FieldResolver for ModelFieldResolver<'_> {
    fn field_dict(&self) -> FieldDict<'_> {
        stored_fields(self.model)
    }
}

impl ResourceFieldResolver {
    pub fn of<R: Object>() -> Self {
        Self {
            names: R::field_names(),
        }
    }
}

impl FieldResolver for ResourceFieldResolver {
    fn field_dict(&self) -> FieldDict<'_> {
        self.names
            .iter()
            .map(|name| (name.to_string(), None))
            .collect()
    }
}

/// Map each stored attribute of `instance`'s model to its field descriptor.
///
/// Reads type-level metadata only. Fails with a metadata unavailable error
/// if `M` is not registered in `schema`.
pub fn resolve<'a, M: Model>(schema: &'a Schema, _instance: &M) -> Result<FieldDict<'a>> {
    let resolver = ModelFieldResolver::of::<M>(schema)?;
    Ok(stored_fields(resolver.model()))
}

fn stored_fields(model: &schema::Model) -> FieldDict<'_> {
    model
        .concrete_fields()
        .map(|field| (field.storage_name().to_string(), Some(field)))
        .collect()
}
