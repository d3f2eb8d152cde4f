//! HTTP boundary for the storage operations. Each handler validates its
//! inputs, delegates to [`crate::storage::Storage`], and wraps the
//! outcome in the response envelope; errno mapping lives in the error
//! type, not here.

mod copy;
mod create;
mod delete;
mod list;
mod move_op;

pub use copy::copy_entry;
pub use create::create_entry;
pub use delete::delete_entry;
pub use list::list_entries;
pub use move_op::move_entry;
