//! Building models whose related fields are set after the model exists.
//!
//! A model's related values (the rows a foreign key points at, the children
//! of a one-to-many relation, many-to-many associations) can usually only be
//! stored once the model itself has been saved. Mappings onto models
//! therefore split those values out of the flat field values, build the
//! model from what remains, and hand the related values back to the caller
//! in a [`RelatedItems`] context.

use super::{base, FieldMap, Mapping};
use crate::{
    resolver::{ModelFieldResolver, ResourceFieldResolver},
    Db, FieldValues, Model, Object, Result,
};
use relmap_core::{
    schema::{self, Field},
    stmt::Value,
};
use std::{fmt, marker::PhantomData, sync::Arc};

/// A destination model's related fields, grouped by relation kind.
///
/// Computed once per mapping and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct RelatedFields {
    pub one_to_many_fields: Vec<Field>,
    pub many_to_one_fields: Vec<Field>,
    pub many_to_many_fields: Vec<Field>,

    /// Every foreign key on the model. Collected independently of the
    /// relation descriptors, so a field may also sit in another bucket.
    pub foreign_key_fields: Vec<Field>,
}

/// One related value removed from a model's field values.
#[derive(Debug)]
pub struct RelationItem<T> {
    /// The model the value belongs to
    pub parent: Arc<T>,

    /// Descriptor of the related field
    pub field: Field,

    pub value: Value,
}

/// Related values collected while building models, one list per relation
/// kind. The lists accumulate across every model a mapping call builds.
#[derive(Debug)]
pub struct RelatedItems<T> {
    pub one_to_many_items: Vec<RelationItem<T>>,
    pub many_to_one_items: Vec<RelationItem<T>>,
    pub many_to_many_items: Vec<RelationItem<T>>,
    pub foreign_key_items: Vec<RelationItem<T>>,
}

impl RelatedFields {
    /// Group `model`'s related fields by kind.
    pub fn classify(model: &schema::Model) -> Self {
        let mut related = Self {
            foreign_key_fields: model.foreign_keys().cloned().collect(),
            ..Self::default()
        };

        for (field, relation) in model.related_objects() {
            let kind = relation.kind;

            if kind.is_many_to_many() {
                related.many_to_many_fields.push(field.clone());
            } else if kind.is_many_to_one() {
                related.many_to_one_fields.push(field.clone());
            } else if kind.is_one_to_many() {
                related.one_to_many_fields.push(field.clone());
            }
        }

        tracing::debug!(
            model = %model.name,
            one_to_many = related.one_to_many_fields.len(),
            many_to_one = related.many_to_one_fields.len(),
            many_to_many = related.many_to_many_fields.len(),
            foreign_key = related.foreign_key_fields.len(),
            "classified related fields"
        );

        related
    }

    /// Classify the related fields of a registered model.
    pub fn for_model(schema: &schema::Schema, model: schema::ModelId) -> Result<Self> {
        Ok(Self::classify(schema.get(model)?))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets().all(|(_, fields)| fields.is_empty())
    }

    /// True if a field named `name` is in any bucket.
    pub fn contains(&self, name: &str) -> bool {
        self.buckets()
            .flat_map(|(_, fields)| fields)
            .any(|field| field.app_name() == name)
    }

    /// Build a `T` from `values`, moving related values into `cx`.
    ///
    /// Related values are removed from `values` before the model is built,
    /// so the model never sees them. Each removed value is recorded against
    /// the newly built model.
    pub fn create_object<T: Object>(
        &self,
        mut values: FieldValues,
        cx: &mut RelatedItems<T>,
    ) -> Result<Arc<T>> {
        let mut removed = vec![];

        for (kind, fields) in self.buckets() {
            for field in fields {
                if let Some(value) = values.shift_remove(field.app_name()) {
                    removed.push((kind, field, value));
                }
            }
        }

        let parent = Arc::new(base::create_object::<T>(values)?);

        for (kind, field, value) in removed {
            tracing::trace!(field = field.app_name(), ?kind, "deferred related value");

            let item = RelationItem {
                parent: parent.clone(),
                field: field.clone(),
                value,
            };

            match kind {
                Bucket::OneToMany => cx.one_to_many_items.push(item),
                Bucket::ManyToOne => cx.many_to_one_items.push(item),
                Bucket::ManyToMany => cx.many_to_many_items.push(item),
                Bucket::ForeignKey => cx.foreign_key_items.push(item),
            }
        }

        Ok(parent)
    }

    fn buckets(&self) -> impl Iterator<Item = (Bucket, &Vec<Field>)> + '_ {
        [
            (Bucket::OneToMany, &self.one_to_many_fields),
            (Bucket::ManyToOne, &self.many_to_one_fields),
            (Bucket::ManyToMany, &self.many_to_many_fields),
            (Bucket::ForeignKey, &self.foreign_key_fields),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy)]
enum Bucket {
    OneToMany,
    ManyToOne,
    ManyToMany,
    ForeignKey,
}

impl<T> RelatedItems<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.one_to_many_items.len()
            + self.many_to_one_items.len()
            + self.many_to_many_items.len()
            + self.foreign_key_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for RelatedItems<T> {
    fn default() -> Self {
        Self {
            one_to_many_items: vec![],
            many_to_one_items: vec![],
            many_to_many_items: vec![],
            foreign_key_items: vec![],
        }
    }
}

/// A mapping onto a registered model `T` that defers `T`'s related fields.
///
/// Builds `Arc<T>` so that every deferred [`RelationItem`] can refer to the
/// model it came from.
pub struct ModelMapping<F, T> {
    fields: FieldMap,
    related: RelatedFields,
    _p: PhantomData<fn(&F) -> T>,
}

impl<F: Object, T: Model + Object> ModelMapping<F, T> {
    /// A mapping that copies every attribute `F` and `T` share by name.
    pub fn new(db: &Db) -> Result<Self> {
        let to = ModelFieldResolver::of::<T>(db.schema())?;
        let fields = FieldMap::auto(&ResourceFieldResolver::of::<F>(), &to);
        Self::with_fields(db, fields)
    }

    pub fn with_fields(db: &Db, fields: FieldMap) -> Result<Self> {
        let model = ModelFieldResolver::of::<T>(db.schema())?.model();

        Ok(Self {
            fields,
            related: RelatedFields::classify(model),
            _p: PhantomData,
        })
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn related_fields(&self) -> &RelatedFields {
        &self.related
    }
}

impl<F: Object, T: Model + Object> Mapping for ModelMapping<F, T> {
    type FromObj = F;
    type ToObj = Arc<T>;
    type Context = RelatedItems<T>;

    fn map_fields(&self, source: &F, _cx: &mut RelatedItems<T>) -> Result<FieldValues> {
        self.fields.apply(source)
    }

    fn create_object(&self, values: FieldValues, cx: &mut RelatedItems<T>) -> Result<Arc<T>> {
        self.related.create_object(values, cx)
    }
}

impl<F, T> fmt::Debug for ModelMapping<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMapping")
            .field("fields", &self.fields)
            .field("related", &self.related)
            .finish()
    }
}
