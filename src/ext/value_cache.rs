//! Keys of the host-side value cache that remembers the last entered form values.
//!
//! The core never reads or writes the cache. Hosts that persist values use these keys so stored
//! entries stay interchangeable between frontends.

// std
use std::borrow::Cow;
// self
use crate::_prelude::*;

/// Key of one remembered form value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey<'a> {
	/// Last value typed for an argument of a method: `<method>#<argument>`.
	Argument {
		/// Method name.
		method: &'a str,
		/// Argument name.
		argument: &'a str,
	},
	/// Consumer key field.
	ConsumerKey,
	/// Consumer secret field.
	ConsumerSecret,
	/// Token field.
	Token,
	/// Token secret field.
	TokenSecret,
	/// "Use SSL" toggle.
	UseSsl,
	/// "Sign with consumer key" toggle.
	SignWithConsumerKey,
	/// "Sign with token" toggle.
	SignWithToken,
	/// "Make it readable" toggle for response rendering.
	MakeItReadable,
}
impl<'a> CacheKey<'a> {
	/// Key for an argument of a method.
	pub fn argument(method: &'a str, argument: &'a str) -> Self {
		Self::Argument { method, argument }
	}

	/// Storage key string.
	pub fn as_key(&self) -> Cow<'static, str> {
		match self {
			Self::Argument { method, argument } => Cow::Owned(format!("{method}#{argument}")),
			Self::ConsumerKey => Cow::Borrowed("consumer_key"),
			Self::ConsumerSecret => Cow::Borrowed("consumer_secret"),
			Self::Token => Cow::Borrowed("token"),
			Self::TokenSecret => Cow::Borrowed("token_secret"),
			Self::UseSsl => Cow::Borrowed("use_ssl"),
			Self::SignWithConsumerKey => Cow::Borrowed("sign_with_consumer_key"),
			Self::SignWithToken => Cow::Borrowed("sign_with_token"),
			Self::MakeItReadable => Cow::Borrowed("make_it_readable"),
		}
	}
}
impl Display for CacheKey<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.as_key())
	}
}
