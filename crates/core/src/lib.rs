//! Store-agnostic core of the item store.
//!
//! Pure functions and traits only: field extraction, update expression
//! building, key and query descriptors, the error taxonomy and the response
//! envelope. Nothing in this crate performs I/O.

pub mod context;
pub mod expression;
pub mod key;
pub mod query;
pub mod record;
pub mod response;
pub mod storage;
pub mod value;

pub use context::{RequestContext, RequestId};
pub use expression::{build_update, ExpressionError, SkipSet, UpdateExpression};
pub use key::{build_key, Key};
pub use query::IndexQuery;
pub use record::{extract_fields, normalize, UpdateDocument};
pub use value::FieldValue;
