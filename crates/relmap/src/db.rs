mod builder;
pub use builder::Builder;

mod query_set;
pub use query_set::{Loaded, Manager, QuerySet, Rows};

use crate::{Model, Result};
use relmap_core::{
    driver::{Driver, Operation},
    stmt, Schema,
};
use std::sync::Arc;

/// A handle to the registered models and the driver that serves their rows.
///
/// Cloning is cheap; clones share the schema and the driver.
#[derive(Debug, Clone)]
pub struct Db {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The manager for `M`'s rows. Nothing is fetched until the manager is
    /// expanded and materialized.
    pub fn objects<M: Model>(&self) -> Manager<'_> {
        Manager::new(self, M::id())
    }

    /// Run one query against the driver.
    pub(crate) fn query(&self, query: stmt::Query) -> Result<Vec<stmt::ValueRecord>> {
        let response = self.driver.exec(&self.schema, Operation::Query(query))?;
        Ok(response.into_rows())
    }
}
