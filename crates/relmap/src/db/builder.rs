use super::Db;
use crate::{Model, Result};

use relmap_core::{driver::Driver, schema};

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,
}

impl Builder {
    pub fn register<T: Model>(&mut self) -> &mut Self {
        self.core.model(T::schema());
        self
    }

    pub fn build(&mut self, driver: impl Driver + 'static) -> Result<Db> {
        let schema = self.core.build()?;

        tracing::debug!(
            models = ?schema.models().map(|model| model.name.to_string()).collect::<Vec<_>>(),
            "db registered models"
        );

        Ok(Db {
            schema: Arc::new(schema),
            driver: Arc::new(driver),
        })
    }
}
