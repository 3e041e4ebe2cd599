//! Values, records and the queries a driver executes.

mod query;
pub use query::{Filter, Query};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
