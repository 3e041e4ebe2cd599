use super::{FieldTy, Model, Schema};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Collects model definitions and validates them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<Model>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn build(&mut self) -> Result<Schema> {
        let mut models = IndexMap::new();

        for model in self.models.drain(..) {
            if models.contains_key(&model.id) {
                continue;
            }
            models.insert(model.id, model);
        }

        let schema = Schema { models };
        schema.verify()?;

        tracing::debug!(models = schema.models.len(), "schema built");
        Ok(schema)
    }
}

impl Schema {
    fn verify(&self) -> Result<()> {
        let mut names = HashSet::new();

        for model in self.models() {
            if !names.insert(model.name.snake_case()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    model.name
                )));
            }

            self.verify_fields(model)?;
            self.verify_parent(model)?;
        }

        Ok(())
    }

    fn verify_fields(&self, model: &Model) -> Result<()> {
        let mut names = HashSet::new();

        for field in &model.fields {
            if !names.insert(field.app_name()) {
                return Err(Error::invalid_schema(format!(
                    "`{}` declares `{}` more than once",
                    model.name,
                    field.app_name()
                )));
            }

            if let Some(target) = field.target() {
                if !self.contains(target) {
                    return Err(Error::invalid_schema(format!(
                        "`{}::{}` targets a model that is not registered ({target:?})",
                        model.name,
                        field.app_name()
                    )));
                }
            }

            let FieldTy::Relation(relation) = &field.ty else {
                continue;
            };

            if relation.pair.is_none() {
                continue;
            }

            let points_back = self
                .relation_pair(relation)
                .and_then(|pair| pair.ty.as_foreign_key())
                .is_some_and(|fk| self.is_subtype(model.id, fk.target));

            if !points_back {
                return Err(Error::invalid_schema(format!(
                    "`{}::{}` pairs with `{}`, which is not a foreign key to `{}`",
                    model.name,
                    field.app_name(),
                    relation.pair.as_deref().unwrap_or_default(),
                    model.name
                )));
            }
        }

        Ok(())
    }

    fn verify_parent(&self, model: &Model) -> Result<()> {
        let mut seen = HashSet::from([model.id]);
        let mut current = model.parent;

        while let Some(id) = current {
            let Some(parent) = self.models.get(&id) else {
                return Err(Error::invalid_schema(format!(
                    "`{}` inherits from a model that is not registered ({id:?})",
                    model.name
                )));
            };

            if !seen.insert(id) {
                return Err(Error::invalid_schema(format!(
                    "`{}` is part of an inheritance cycle",
                    model.name
                )));
            }

            current = parent.parent;
        }

        Ok(())
    }
}
