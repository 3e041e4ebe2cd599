#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    I64,
    String,

    /// A list of values of the given item type
    List(Box<Type>),

    /// A positional record, such as a related row
    Record,

    /// The type of `Value::Null` when nothing more is known
    Null,
}

impl Type {
    pub fn list(item: impl Into<Self>) -> Self {
        Self::List(Box::new(item.into()))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns true if `value` may be stored in a field of this type.
    ///
    /// `Null` is accepted everywhere; nullability is checked by the field.
    pub fn accepts(&self, value: &super::Value) -> bool {
        use super::Value;

        match (self, value) {
            (_, Value::Null) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::I64, Value::I64(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Record, Value::Record(_)) => true,
            (Self::List(item), Value::List(items)) => items.iter().all(|v| item.accepts(v)),
            _ => false,
        }
    }
}
