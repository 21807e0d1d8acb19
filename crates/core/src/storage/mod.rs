mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result, StoreError};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{ItemRepository, StoreClient};
pub use types::{item_to_record, record_to_item, Item, ReadErrorPolicy};
