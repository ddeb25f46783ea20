//! Credential models: consumer/token credentials, signing toggles, and issued token pairs.

pub mod credentials;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use secret::*;
pub use token::*;
