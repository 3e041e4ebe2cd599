//! Destination construction by attribute assignment.

use super::{Context, FieldMap, Mapping};
use crate::{FieldValues, Object, Result};
use std::marker::PhantomData;

/// Build a `T` by creating an empty instance and assigning each value.
///
/// Types that cannot start out empty, or that reject one of the
/// assignments as unsettable, are built through their declared
/// constructor instead. Any other error is returned as is. `values` is left
/// untouched by the assignment path, so the fallback sees every value.
pub fn create_object<T: Object>(values: FieldValues) -> Result<T> {
    let Some(mut object) = T::empty() else {
        return T::construct(values);
    };

    for (name, value) in &values {
        match object.set_attr(name, value.clone()) {
            Ok(()) => {}
            Err(err) if err.is_attribute_unsettable() => {
                tracing::debug!(
                    ty = std::any::type_name::<T>(),
                    attr = %name,
                    "attribute assignment rejected; using declared constructor"
                );
                return T::construct(values);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(object)
}

/// A mapping that copies fields according to a [`FieldMap`] and builds
/// its destination with [`create_object`].
pub struct BaseMapping<F, T> {
    fields: FieldMap,
    _p: PhantomData<fn(&F) -> T>,
}

impl<F: Object, T: Object> BaseMapping<F, T> {
    pub fn new(fields: FieldMap) -> Self {
        Self {
            fields,
            _p: PhantomData,
        }
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

impl<F: Object, T: Object> Mapping for BaseMapping<F, T> {
    type FromObj = F;
    type ToObj = T;
    type Context = Context;

    fn map_fields(&self, source: &F, _cx: &mut Context) -> Result<FieldValues> {
        self.fields.apply(source)
    }

    fn create_object(&self, values: FieldValues, _cx: &mut Context) -> Result<T> {
        create_object(values)
    }
}

impl<F, T> std::fmt::Debug for BaseMapping<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseMapping")
            .field("fields", &self.fields)
            .finish()
    }
}
