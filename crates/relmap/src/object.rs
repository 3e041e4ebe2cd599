use crate::{Error, Result};
use indexmap::IndexMap;
use relmap_core::stmt::Value;
use std::sync::Arc;

/// The flat set of attribute values a mapping produces for one destination
/// object, keyed by attribute name.
pub type FieldValues = IndexMap<String, Value>;

/// A value that mappings can read from and build.
///
/// Only [`construct`](Object::construct) is required. Types that can start
/// out empty and take attributes one at a time opt in by returning
/// `Some` from [`empty`](Object::empty) and overriding
/// [`set_attr`](Object::set_attr).
pub trait Object: Sized {
    /// Attribute names, in declaration order.
    fn field_names() -> &'static [&'static str] {
        &[]
    }

    /// Read an attribute. `None` if the type has no such attribute.
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// An instance with no attributes assigned yet, if the type supports
    /// being built that way.
    fn empty() -> Option<Self> {
        None
    }

    /// Assign one attribute.
    fn set_attr(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(Error::attribute_unsettable(
            std::any::type_name::<Self>(),
            Some(name),
        ))
    }

    /// The declared constructor: build an instance from every value at once.
    fn construct(values: FieldValues) -> Result<Self>;
}

impl<T: Object> Object for Arc<T> {
    fn field_names() -> &'static [&'static str] {
        T::field_names()
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        (**self).get_attr(name)
    }

    fn empty() -> Option<Self> {
        T::empty().map(Arc::new)
    }

    fn set_attr(&mut self, name: &str, value: Value) -> Result<()> {
        match Arc::get_mut(self) {
            Some(object) => object.set_attr(name, value),
            None => Err(Error::attribute_unsettable(
                std::any::type_name::<T>(),
                Some(name),
            )),
        }
    }

    fn construct(values: FieldValues) -> Result<Self> {
        T::construct(values).map(Arc::new)
    }
}
