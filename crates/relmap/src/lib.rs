//! Maps relational model instances onto plain resources, and back.
//!
//! Models describe themselves to a [`Db`] through the [`Model`] trait. Any
//! type that can be read and built attribute-by-attribute implements
//! [`Object`]. A [`Mapping`] turns one object into another, and
//! [`map_queryset`] runs a mapping over a batch of rows fetched in one go.

pub mod db;
pub use db::Db;

pub mod mapping;
pub use mapping::{
    apply, apply_immediate, BaseMapping, Context, FieldMap, Mapping, ModelMapping, RelatedFields,
    RelatedItems, RelationItem,
};

mod model;
pub use model::{generate_unique_id, Model};

mod object;
pub use object::{FieldValues, Object};

mod queryset;
pub use queryset::map_queryset;

pub mod resolver;
pub use resolver::{resolve, FieldDict, FieldResolver, ModelFieldResolver, ResourceFieldResolver};

pub use relmap_core::{bail, driver, err, schema, stmt, Error, Result};

/// Expands to a [`schema::ModelId`] that is fixed for the enclosing
/// function. Used as the body of [`Model::id`].
#[macro_export]
macro_rules! model_id {
    () => {{
        static ID: ::std::sync::OnceLock<$crate::schema::ModelId> = ::std::sync::OnceLock::new();
        *ID.get_or_init($crate::generate_unique_id)
    }};
}
