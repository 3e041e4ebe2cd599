use relmap::{driver::Operation, schema::ModelId, stmt::Query};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count queries against the given model
    pub fn queries_for(&self, model: ModelId) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(Operation::as_query)
            .filter(|query| query.model == model)
            .count()
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first query from the log
    pub fn pop_query(&mut self) -> Option<Query> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            ops.remove(0).as_query().cloned()
        }
    }
}
