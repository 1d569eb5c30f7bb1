//! Storage seams. The application layer depends only on these traits;
//! PostgreSQL and in-memory implementations live in the infrastructure
//! crates.

pub mod accounts;
pub mod documents;

pub use accounts::AccountStore;
pub use dao_utils::{PaginationParams, StoreError};
pub use documents::DocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;
