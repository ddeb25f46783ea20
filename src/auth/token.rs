//! Token pairs issued by the OAuth endpoints.

// self
use crate::{_prelude::*, auth::Secret};

/// Token + secret pair returned by `request_token` or `access_token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Token value (`oauth_token`).
	pub token: String,
	/// Token secret (`oauth_token_secret`); callers must avoid logging it.
	pub token_secret: Secret,
}
impl TokenPair {
	/// Creates a token pair.
	pub fn new(token: impl Into<String>, token_secret: impl Into<Secret>) -> Self {
		Self { token: token.into(), token_secret: token_secret.into() }
	}
}
