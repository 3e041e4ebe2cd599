use crate::Result;
use relmap_core::{
    schema::{self, ModelId},
    stmt,
};

/// Generate a unique model ID at runtime.
///
/// This function uses a global atomic counter to ensure each call returns
/// a unique ModelId. IDs start at 0 and increment with each call.
/// This is thread-safe and can be called concurrently.
pub fn generate_unique_id() -> ModelId {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_MODEL_ID: AtomicUsize = AtomicUsize::new(0);

    let id = NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed);
    ModelId(id)
}

pub trait Model: Sized {
    /// Unique identifier for this model within the schema.
    ///
    /// Identifiers are *not* unique across schemas. Implementations
    /// usually delegate to [`model_id!`](crate::model_id).
    fn id() -> ModelId;

    /// The model's metadata, registered with a [`Db`](crate::Db) at startup.
    fn schema() -> schema::Model;

    /// Load an instance of the model, populating fields using the given row.
    fn load(record: stmt::ValueRecord) -> Result<Self>;
}
