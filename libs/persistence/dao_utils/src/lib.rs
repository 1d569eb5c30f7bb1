pub mod error_handling;
pub mod pagination;

pub use error_handling::StoreError;
pub use pagination::PaginationParams;
