use super::Db;
use crate::{bail, err, Error, Model, Result};
use indexmap::{IndexMap, IndexSet};
use relmap_core::{
    schema::{self, Field, FieldTy, ModelId, Relation},
    stmt::{Filter, Query, Value, ValueRecord},
};

/// A lazy handle on every row of one model.
#[derive(Debug, Clone, Copy)]
pub struct Manager<'a> {
    db: &'a Db,
    model: ModelId,
}

/// A lazy, not yet executed query over one model's rows.
#[derive(Debug, Clone)]
pub struct QuerySet<'a> {
    db: &'a Db,
    query: Query,

    /// Relations to fetch alongside the rows, one extra query each
    prefetch: Vec<String>,
}

/// Rows that have already been fetched.
#[derive(Debug, Clone)]
pub struct Loaded<'a> {
    db: &'a Db,
    model: ModelId,
    records: Vec<ValueRecord>,
}

/// Any row collection a mapping can run over.
#[derive(Debug, Clone)]
pub enum Rows<'a> {
    Manager(Manager<'a>),
    QuerySet(QuerySet<'a>),
    Loaded(Loaded<'a>),
}

impl<'a> Manager<'a> {
    pub(crate) fn new(db: &'a Db, model: ModelId) -> Self {
        Self { db, model }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The query for every row.
    pub fn all(&self) -> QuerySet<'a> {
        QuerySet {
            db: self.db,
            query: Query::all(self.model),
            prefetch: vec![],
        }
    }

    /// Shorthand for `all().filter_by(..)`.
    pub fn filter_by(&self, name: &str, value: impl Into<Value>) -> Result<QuerySet<'a>> {
        self.all().filter_by(name, value)
    }
}

impl<'a> QuerySet<'a> {
    pub fn model(&self) -> ModelId {
        self.query.model
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Restrict the rows to those whose `name` attribute equals `value`.
    ///
    /// `name` may be a declared or a stored attribute name. Calling this
    /// again replaces the previous restriction.
    pub fn filter_by(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        let model = self.db.schema().get(self.query.model)?;
        let field = model
            .field_by_name(name)
            .or_else(|| model.field_by_storage_name(name))
            .filter(|field| field.is_concrete())
            .ok_or_else(|| err!("`{}` has no stored attribute `{name}`", model.name))?;

        self.query.filter = Filter::Eq(field.id, value.into());
        Ok(self)
    }

    /// Fetch the named relation alongside the rows, so mapping them does
    /// not need a query per row.
    pub fn prefetch_related(mut self, name: &str) -> Self {
        if !self.prefetch.iter().any(|existing| existing == name) {
            self.prefetch.push(name.to_string());
        }
        self
    }

    /// Execute the query, plus one query per prefetched relation.
    pub fn fetch(&self) -> Result<Loaded<'a>> {
        let schema = self.db.schema();
        let model = schema.get(self.query.model)?;

        let mut records = self.db.query(self.query.clone())?;
        check_shape(model, &records)?;

        for name in &self.prefetch {
            let Some(field) = model.field_by_name(name) else {
                bail!("cannot prefetch `{name}`: `{}` has no such field", model.name);
            };

            match &field.ty {
                FieldTy::Relation(relation) => {
                    self.prefetch_relation(model, field, relation, &mut records)?
                }
                FieldTy::ForeignKey(fk) => {
                    self.prefetch_foreign_key(field, fk.target, &mut records)?
                }
                FieldTy::Primitive(_) => {
                    bail!("cannot prefetch `{name}`: not a relation of `{}`", model.name)
                }
            }
        }

        tracing::debug!(
            model = %model.name,
            rows = records.len(),
            prefetch = ?self.prefetch,
            "queryset materialized"
        );

        Ok(Loaded {
            db: self.db,
            model: model.id,
            records,
        })
    }

    /// Load rows of the target that point back at the fetched rows, and
    /// attach them to each row's relation slot.
    fn prefetch_relation(
        &self,
        model: &schema::Model,
        field: &Field,
        relation: &Relation,
        records: &mut [ValueRecord],
    ) -> Result<()> {
        let schema = self.db.schema();

        let Some(pair) = schema.relation_pair(relation) else {
            bail!(
                "cannot prefetch `{}::{}`: the relation has no foreign key to follow",
                model.name,
                field.app_name()
            );
        };

        let Some(pk) = model.primary_key_field() else {
            bail!("cannot prefetch from `{}`: it has no primary key", model.name);
        };

        let keys = distinct_keys(records.iter().map(|record| &record[pk.id.index]));

        let mut grouped: IndexMap<i64, Vec<Value>> = IndexMap::new();
        if !keys.is_empty() {
            let related = self
                .db
                .query(Query::filter(relation.target, Filter::In(pair.id, keys)))?;
            check_shape(schema.get(relation.target)?, &related)?;

            for row in related {
                if let Some(key) = foreign_key_of(&row[pair.id.index], schema, pair)? {
                    grouped.entry(key).or_default().push(Value::Record(row));
                }
            }
        }

        for record in records.iter_mut() {
            let key = record[pk.id.index].as_i64();
            let rows = key.and_then(|key| grouped.get(&key)).cloned().unwrap_or_default();

            record[field.id.index] = if relation.kind.is_collection() {
                Value::List(rows)
            } else {
                rows.into_iter().next().unwrap_or_default()
            };
        }

        Ok(())
    }

    /// Replace each row's foreign key with the row it refers to.
    fn prefetch_foreign_key(
        &self,
        field: &Field,
        target: ModelId,
        records: &mut [ValueRecord],
    ) -> Result<()> {
        let schema = self.db.schema();
        let target_model = schema.get(target)?;

        let Some(pk) = target_model.primary_key_field() else {
            bail!(
                "cannot prefetch `{}`: `{}` has no primary key",
                field.app_name(),
                target_model.name
            );
        };

        let keys = distinct_keys(records.iter().map(|record| &record[field.id.index]));
        if keys.is_empty() {
            return Ok(());
        }

        let rows = self
            .db
            .query(Query::filter(target, Filter::In(pk.id, keys)))?;
        check_shape(target_model, &rows)?;

        let related: IndexMap<i64, ValueRecord> = rows
            .into_iter()
            .filter_map(|row| row[pk.id.index].as_i64().map(|key| (key, row)))
            .collect();

        for record in records.iter_mut() {
            let slot = &mut record[field.id.index];
            if let Some(row) = slot.as_i64().and_then(|key| related.get(&key)) {
                *slot = Value::Record(row.clone());
            }
        }

        Ok(())
    }
}

impl<'a> Loaded<'a> {
    /// Wrap rows of `model` that were fetched elsewhere.
    pub fn new(db: &'a Db, model: ModelId, records: Vec<ValueRecord>) -> Self {
        Self { db, model, records }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ValueRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ValueRecord> {
        self.records
    }

    /// Load every row as `M`.
    pub fn load<M: Model>(self) -> Result<Vec<M>> {
        self.records.into_iter().map(M::load).collect()
    }
}

impl<'a> Rows<'a> {
    pub(crate) fn db(&self) -> &'a Db {
        match self {
            Self::Manager(manager) => manager.db,
            Self::QuerySet(query_set) => query_set.db,
            Self::Loaded(loaded) => loaded.db,
        }
    }

    /// The model whose rows these are.
    pub fn model(&self) -> ModelId {
        match self {
            Self::Manager(manager) => manager.model,
            Self::QuerySet(query_set) => query_set.model(),
            Self::Loaded(loaded) => loaded.model,
        }
    }

    /// Fetch the rows, unless they are already loaded. A manager is expanded
    /// to its full query first.
    pub fn materialize(self) -> Result<Loaded<'a>> {
        match self {
            Self::Manager(manager) => manager.all().fetch(),
            Self::QuerySet(query_set) => query_set.fetch(),
            Self::Loaded(loaded) => Ok(loaded),
        }
    }
}

impl<'a> From<Manager<'a>> for Rows<'a> {
    fn from(value: Manager<'a>) -> Self {
        Self::Manager(value)
    }
}

impl<'a> From<QuerySet<'a>> for Rows<'a> {
    fn from(value: QuerySet<'a>) -> Self {
        Self::QuerySet(value)
    }
}

impl<'a> From<Loaded<'a>> for Rows<'a> {
    fn from(value: Loaded<'a>) -> Self {
        Self::Loaded(value)
    }
}

/// Records must line up with the model's fields before they are indexed.
fn check_shape(model: &schema::Model, records: &[ValueRecord]) -> Result<()> {
    let expected = model.fields.len();

    match records.iter().find(|record| record.len() != expected) {
        Some(record) => Err(err!(
            "driver returned {} values for a `{}` row, which has {expected} fields",
            record.len(),
            model.name
        )),
        None => Ok(()),
    }
}

/// Integer keys in first-seen order, without repeats. Other values are
/// skipped.
fn distinct_keys<'v>(values: impl Iterator<Item = &'v Value>) -> Vec<Value> {
    values
        .filter_map(Value::as_i64)
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(Value::I64)
        .collect()
}

/// The key held in a foreign key slot, which may hold the key itself or an
/// already-loaded row of the target.
fn foreign_key_of(value: &Value, schema: &schema::Schema, fk: &Field) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::I64(key) => Ok(Some(*key)),
        Value::Record(row) => {
            let target = fk
                .target()
                .ok_or_else(|| err!("`{}` is not a foreign key", fk.app_name()))?;
            let pk = schema
                .get(target)?
                .primary_key_field()
                .ok_or_else(|| err!("`{}` has no primary key", fk.app_name()))?;
            Ok(row.get(pk.id.index).and_then(Value::as_i64))
        }
        other => Err(Error::type_conversion(other.clone(), "foreign key")),
    }
}
