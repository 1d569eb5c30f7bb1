//! Signed session tokens and password hashing.

mod jwt;
pub mod password;

pub use jwt::{Claims, TokenError, TokenIssuer};
