//! The data-store boundary.
//!
//! relmap never talks to a database directly. Everything it reads goes
//! through a [`Driver`], one [`Operation`] per round trip.

use crate::{stmt, Result, Schema};
use std::fmt::Debug;

pub trait Driver: Debug + Send + Sync {
    /// Execute a database operation
    fn exec(&self, schema: &Schema, op: Operation) -> Result<Response>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Fetch the rows matching a query
    Query(stmt::Query),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Rows(Vec<stmt::ValueRecord>),
}

impl Operation {
    pub fn as_query(&self) -> Option<&stmt::Query> {
        match self {
            Self::Query(query) => Some(query),
        }
    }
}

impl Response {
    pub fn into_rows(self) -> Vec<stmt::ValueRecord> {
        match self {
            Self::Rows(rows) => rows,
        }
    }
}

impl From<stmt::Query> for Operation {
    fn from(value: stmt::Query) -> Self {
        Self::Query(value)
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn exec(&self, schema: &Schema, op: Operation) -> Result<Response> {
        (**self).exec(schema, op)
    }
}

impl<D: Driver + ?Sized> Driver for std::sync::Arc<D> {
    fn exec(&self, schema: &Schema, op: Operation) -> Result<Response> {
        (**self).exec(schema, op)
    }
}
