//! Mappings between objects.
//!
//! A mapping runs in two steps. [`Mapping::map_fields`] reads the source and
//! produces a flat set of destination attribute values, and
//! [`Mapping::create_object`] builds the destination from them. Overriding the
//! second step is how [`BaseMapping`] and [`ModelMapping`] change the way
//! destinations are built.

pub mod base;
pub use base::BaseMapping;

mod context;
pub use context::Context;

mod field_map;
pub use field_map::FieldMap;

pub mod model;
pub use model::{ModelMapping, RelatedFields, RelatedItems, RelationItem};

use crate::{FieldValues, Object, Result};
use std::borrow::Borrow;

pub trait Mapping {
    /// Type the mapping reads from
    type FromObj;

    /// Type the mapping builds
    type ToObj: Object;

    /// Per-invocation state, threaded through every object a single
    /// `apply` call builds.
    type Context: Default;

    /// Name used in errors and logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Produce the destination's attribute values from one source object.
    fn map_fields(&self, source: &Self::FromObj, cx: &mut Self::Context) -> Result<FieldValues>;

    /// Build a destination object from its attribute values.
    ///
    /// Defaults to the destination's declared constructor.
    fn create_object(&self, values: FieldValues, _cx: &mut Self::Context) -> Result<Self::ToObj> {
        Self::ToObj::construct(values)
    }

    /// Map a single source object.
    fn apply_one(&self, source: &Self::FromObj, cx: &mut Self::Context) -> Result<Self::ToObj> {
        let values = self.map_fields(source, cx)?;
        self.create_object(values, cx)
    }
}

/// The lazy result of [`apply`]: each source is mapped as the iterator
/// reaches it.
pub struct MappingResult<'a, M: Mapping, I> {
    mapping: &'a M,
    sources: I,
    cx: &'a mut M::Context,
}

impl<M, I> Iterator for MappingResult<'_, M, I>
where
    M: Mapping,
    I: Iterator,
    I::Item: Borrow<M::FromObj>,
{
    type Item = Result<M::ToObj>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.sources.next()?;
        Some(self.mapping.apply_one(source.borrow(), self.cx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sources.size_hint()
    }
}

/// Map every source object lazily.
pub fn apply<'a, M, I>(
    mapping: &'a M,
    sources: I,
    cx: &'a mut M::Context,
) -> MappingResult<'a, M, I::IntoIter>
where
    M: Mapping,
    I: IntoIterator,
    I::Item: Borrow<M::FromObj>,
{
    MappingResult {
        mapping,
        sources: sources.into_iter(),
        cx,
    }
}

/// Map every source object now, stopping at the first error.
pub fn apply_immediate<M, I>(mapping: &M, sources: I, cx: &mut M::Context) -> Result<Vec<M::ToObj>>
where
    M: Mapping,
    I: IntoIterator,
    I::Item: Borrow<M::FromObj>,
{
    apply(mapping, sources, cx).collect()
}
