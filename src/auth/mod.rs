//! Accounts: password hashing, signed session tokens, live sessions and
//! the request extractors built on them.

pub mod extract;
pub mod password;
pub mod session;
pub mod token;

pub use extract::{AdminUser, AuthUser};
