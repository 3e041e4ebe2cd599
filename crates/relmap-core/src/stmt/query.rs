use super::Value;
use crate::schema::{FieldId, ModelId};

/// A request for the rows of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Model whose rows are returned
    pub model: ModelId,

    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every row of the model
    All,

    /// Rows where the field equals the value
    Eq(FieldId, Value),

    /// Rows where the field equals any of the values
    In(FieldId, Vec<Value>),
}

impl Query {
    pub fn all(model: ModelId) -> Self {
        Self {
            model,
            filter: Filter::All,
        }
    }

    pub fn filter(model: ModelId, filter: Filter) -> Self {
        Self { model, filter }
    }
}

impl Filter {
    /// Evaluates the filter against a record of the filtered model.
    pub fn matches(&self, record: &[Value]) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, value) => record.get(field.index) == Some(value),
            Self::In(field, values) => record
                .get(field.index)
                .is_some_and(|actual| values.contains(actual)),
        }
    }
}
