// self
use crate::{_prelude::*, auth::TokenPair, error::ProtocolError};

/// Splits a `key=value&key=value` body literally, without percent-decoding.
///
/// The first `=` of each pair separates key from value. Pairs without `=` map to an empty value.
/// When a key repeats, its last occurrence wins.
pub fn parse_form_body(body: &str) -> HashMap<&str, &str> {
	let mut pairs = HashMap::new();

	for pair in body.trim().split('&').filter(|pair| !pair.is_empty()) {
		let (key, value) = pair.split_once('=').unwrap_or((pair, ""));

		pairs.insert(key, value);
	}

	pairs
}

/// Extracts `oauth_token` + `oauth_token_secret` from a token endpoint body.
///
/// `endpoint` labels the error when either key is absent.
pub fn parse_token_response(
	endpoint: &'static str,
	body: &str,
) -> Result<TokenPair, ProtocolError> {
	let pairs = parse_form_body(body);
	let field = |field: &'static str| {
		pairs.get(field).copied().ok_or_else(|| ProtocolError::MissingField {
			endpoint,
			field,
			body: body.to_owned(),
		})
	};
	let token = field("oauth_token")?;
	let token_secret = field("oauth_token_secret")?;

	Ok(TokenPair::new(token, token_secret))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_pairs_are_split_literally() {
		let pair = parse_token_response(
			"request_token",
			"oauth_token=abc%2Fdef&oauth_token_secret=s=e=c&oauth_callback_confirmed=true\n",
		)
		.expect("Token response should parse.");

		assert_eq!(pair.token, "abc%2Fdef");
		assert_eq!(pair.token_secret.expose(), "s=e=c");
	}

	#[test]
	fn missing_fields_are_protocol_errors() {
		let err = parse_token_response("access_token", "oauth_token=abc")
			.expect_err("Missing secret must fail.");

		assert!(matches!(
			err,
			ProtocolError::MissingField {
				endpoint: "access_token",
				field: "oauth_token_secret",
				ref body,
			} if body == "oauth_token=abc"
		));

		assert!(parse_token_response("access_token", "").is_err());
	}

	#[test]
	fn repeated_token_fields_keep_the_last_value() {
		let pair = parse_token_response(
			"request_token",
			"oauth_token=old&oauth_token_secret=s1&oauth_token=new&oauth_token_secret=s2",
		)
		.expect("Token response should parse.");

		assert_eq!(pair.token, "new");
		assert_eq!(pair.token_secret.expose(), "s2");
	}

	#[test]
	fn last_occurrence_wins() {
		let pairs = parse_form_body("a=1&a=2&flag&&b=");

		assert_eq!(pairs.get("a"), Some(&"2"));
		assert_eq!(pairs.get("flag"), Some(&""));
		assert_eq!(pairs.get("b"), Some(&""));
	}
}
