//! Authorization scopes advertised by an installation.

// self
use crate::_prelude::*;

/// Authorization scope that can be requested during token acquisition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
	/// Scope identifier sent in the `scopes` parameter.
	pub key: String,
	/// Developer-facing description.
	#[serde(default, alias = "developers_description")]
	pub description: String,
}
impl Scope {
	/// Creates a scope record.
	pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
		Self { key: key.into(), description: description.into() }
	}
}
impl AsRef<str> for Scope {
	fn as_ref(&self) -> &str {
		&self.key
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wire_description_field_is_accepted() {
		let scopes: Vec<Scope> = serde_json::from_str(
			r#"[{"key":"studies","developers_description":"Access to your studies."},{"key":"email"}]"#,
		)
		.expect("Scopes should decode.");

		assert_eq!(scopes[0], Scope::new("studies", "Access to your studies."));
		assert_eq!(scopes[1].description, "");
	}
}
