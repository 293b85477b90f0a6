//! Credential, token, and nonce models shared by resolvers and connectors.

pub mod credential;
pub mod nonce;
pub mod secret;
pub mod token;

pub use credential::*;
pub use nonce::*;
pub use secret::*;
pub use token::*;
