//! Session authentication primitives.

pub mod token;

pub use token::{SessionClaims, TokenSigner};
