//! Model metadata.
//!
//! A [`Schema`] is the registry of every model the application knows about.
//! It is built once, at startup, from the definitions each model type
//! provides, and is read-only afterwards.

mod builder;
pub use builder::Builder;

mod field;
pub use field::{Field, FieldId, FieldName, FieldPrimitive, FieldTy, ForeignKey};

mod model;
pub use model::{Model, ModelBuilder, ModelId};

mod name;
pub use name::Name;

mod relation;
pub use relation::{Relation, RelationKind};

use crate::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID, failing if it is not registered.
    pub fn get(&self, id: impl Into<ModelId>) -> Result<&Model> {
        let id = id.into();
        self.models
            .get(&id)
            .ok_or_else(|| Error::metadata_unavailable_for_id(id))
    }

    /// Get a model by ID
    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Get a field by ID
    #[track_caller]
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Returns true if `sub` is `sup` or inherits from it, directly or
    /// through its parents.
    pub fn is_subtype(&self, sub: ModelId, sup: ModelId) -> bool {
        let mut current = Some(sub);

        // Bounded by the model count; the builder rejects cycles.
        for _ in 0..=self.models.len() {
            match current {
                Some(id) if id == sup => return true,
                Some(id) => current = self.models.get(&id).and_then(|model| model.parent),
                None => return false,
            }
        }

        false
    }

    /// The foreign key on the relation's target that points back at the
    /// model declaring the relation.
    pub fn relation_pair(&self, relation: &Relation) -> Option<&Field> {
        let pair = relation.pair.as_deref()?;
        self.models.get(&relation.target)?.field_by_name(pair)
    }
}
