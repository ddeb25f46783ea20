//! Method records in their listing and detail forms.

// self
use crate::_prelude::*;

/// Name of the impersonation argument accepted by token-aware methods.
pub const AS_USER_ID_ARGUMENT: &str = "as_user_id";

/// Whether a method ignores, accepts, or demands a given kind of OAuth signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthRequirement {
	/// Signature is ignored.
	#[default]
	Ignored,
	/// Signature is accepted but not needed.
	Optional,
	/// Signature is mandatory.
	Required,
}
impl AuthRequirement {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Ignored => "ignored",
			Self::Optional => "optional",
			Self::Required => "required",
		}
	}
}
impl Display for AuthRequirement {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authorization requirements advertised by a method's detail record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOptions {
	/// Consumer signature requirement.
	pub consumer: AuthRequirement,
	/// Token signature requirement.
	pub token: AuthRequirement,
	/// Whether the method must be called over HTTPS.
	pub ssl_required: bool,
}

/// One argument accepted by a method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodArgument {
	/// Argument name.
	pub name: String,
	/// Whether callers must supply the argument.
	#[serde(default)]
	pub is_required: bool,
	/// Whether the argument is deprecated.
	#[serde(default)]
	pub is_deprecated: bool,
	/// Server-provided description (HTML).
	#[serde(default)]
	pub description: Option<String>,
	/// Server-provided default, kept opaque.
	#[serde(default)]
	pub default_value: Option<serde_json::Value>,
}
impl MethodArgument {
	/// Builds an argument with only a name and requirement flag.
	pub fn new(name: impl Into<String>, is_required: bool) -> Self {
		Self {
			name: name.into(),
			is_required,
			is_deprecated: false,
			description: None,
			default_value: None,
		}
	}
}

/// Which representation of a method a [`Method`] value holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodForm {
	/// Name + brief description only (from the method index).
	#[default]
	Listing,
	/// Full argument and authorization metadata.
	Detail,
}

/// One remotely callable API method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
	/// Slash-separated path, e.g. `services/oauth/request_token`.
	pub name: String,
	/// One-line description.
	#[serde(default)]
	pub brief_description: String,
	/// Link to the method's reference documentation.
	#[serde(default)]
	pub ref_url: String,
	/// Declared arguments, in server order.
	#[serde(default)]
	pub arguments: Vec<MethodArgument>,
	/// Authorization requirements.
	#[serde(default)]
	pub auth_options: AuthOptions,
	/// Representation held by this value.
	#[serde(default, skip_deserializing)]
	pub form: MethodForm,
}
impl Method {
	/// Builds a listing-form method.
	pub fn listing(name: impl Into<String>, brief_description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			brief_description: brief_description.into(),
			ref_url: String::new(),
			arguments: Vec::new(),
			auth_options: AuthOptions::default(),
			form: MethodForm::Listing,
		}
	}

	/// Returns true for detail-form values.
	pub fn is_detailed(&self) -> bool {
		matches!(self.form, MethodForm::Detail)
	}

	/// Token signature requirement.
	pub fn auth_options_token(&self) -> AuthRequirement {
		self.auth_options.token
	}

	/// Consumer signature requirement.
	pub fn auth_options_consumer(&self) -> AuthRequirement {
		self.auth_options.consumer
	}

	/// Whether the method demands HTTPS.
	pub fn auth_options_ssl_required(&self) -> bool {
		self.auth_options.ssl_required
	}

	/// Looks up a declared argument by name.
	pub fn argument(&self, name: &str) -> Option<&MethodArgument> {
		self.arguments.iter().find(|arg| arg.name == name)
	}

	/// Arguments a form for this method should offer.
	///
	/// Methods that accept a token can additionally be called on behalf of another user, so an
	/// optional `as_user_id` argument is appended unless the server already declares it.
	pub fn form_arguments(&self) -> Vec<MethodArgument> {
		let mut arguments = self.arguments.clone();

		if self.auth_options.token != AuthRequirement::Ignored
			&& self.argument(AS_USER_ID_ARGUMENT).is_none()
		{
			arguments.push(MethodArgument::new(AS_USER_ID_ARGUMENT, false));
		}

		arguments
	}

	/// Path segments of the method name, skipping empty ones.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.name.split('/').filter(|segment| !segment.is_empty())
	}
}

/// Wire shape of a method index entry.
#[derive(Debug, Deserialize)]
pub(crate) struct MethodIndexEntry {
	name: String,
	brief_description: String,
}
impl From<MethodIndexEntry> for Method {
	fn from(value: MethodIndexEntry) -> Self {
		Method::listing(value.name, value.brief_description)
	}
}

/// Wire shape of a method detail record; every field the server must supply is mandatory.
#[derive(Debug, Deserialize)]
pub(crate) struct MethodDetail {
	name: String,
	brief_description: String,
	ref_url: String,
	arguments: Vec<MethodDetailArgument>,
	auth_options: MethodDetailAuthOptions,
}
impl From<MethodDetail> for Method {
	fn from(value: MethodDetail) -> Self {
		let MethodDetailAuthOptions { consumer, token, ssl_required } = value.auth_options;

		Self {
			name: value.name,
			brief_description: value.brief_description,
			ref_url: value.ref_url,
			arguments: value.arguments.into_iter().map(MethodArgument::from).collect(),
			auth_options: AuthOptions { consumer, token, ssl_required },
			form: MethodForm::Detail,
		}
	}
}

#[derive(Debug, Deserialize)]
struct MethodDetailArgument {
	name: String,
	is_required: bool,
	#[serde(default)]
	is_deprecated: bool,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	default_value: Option<serde_json::Value>,
}
impl From<MethodDetailArgument> for MethodArgument {
	fn from(value: MethodDetailArgument) -> Self {
		Self {
			name: value.name,
			is_required: value.is_required,
			is_deprecated: value.is_deprecated,
			description: value.description,
			default_value: value.default_value,
		}
	}
}

#[derive(Debug, Deserialize)]
struct MethodDetailAuthOptions {
	consumer: AuthRequirement,
	token: AuthRequirement,
	ssl_required: bool,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const DETAIL: &str = r#"{
		"name": "services/users/user",
		"short_name": "user",
		"brief_description": "Get information on user",
		"ref_url": "https://usos.example.edu/developers/api/services/users/#user",
		"arguments": [
			{"name": "user_id", "is_required": false, "is_deprecated": false, "default_value": null},
			{"name": "fields", "is_required": false, "is_deprecated": false, "default_value": "id|first_name|last_name"}
		],
		"auth_options": {"consumer": "required", "token": "optional", "administrative_only": false, "ssl_required": false}
	}"#;

	#[test]
	fn detail_records_decode_auth_options() {
		let method: Method =
			serde_json::from_str::<MethodDetail>(DETAIL).expect("Detail should decode.").into();

		assert!(method.is_detailed());
		assert_eq!(method.auth_options_consumer(), AuthRequirement::Required);
		assert_eq!(method.auth_options_token(), AuthRequirement::Optional);
		assert!(!method.auth_options_ssl_required());
		assert_eq!(method.arguments.len(), 2);
		assert_eq!(
			method.argument("fields").and_then(|arg| arg.default_value.clone()),
			Some(serde_json::json!("id|first_name|last_name")),
		);
	}

	#[test]
	fn listing_entries_become_listing_methods() {
		let entry: MethodIndexEntry = serde_json::from_str(
			r#"{"name":"services/apiref/method","brief_description":"Describe a method"}"#,
		)
		.expect("Index entry should decode.");
		let method = Method::from(entry);

		assert!(!method.is_detailed());
		assert!(method.arguments.is_empty());
		assert_eq!(method.auth_options, AuthOptions::default());
	}

	#[test]
	fn form_arguments_append_as_user_id_for_token_methods() {
		let method: Method =
			serde_json::from_str::<MethodDetail>(DETAIL).expect("Detail should decode.").into();
		let names =
			method.form_arguments().into_iter().map(|arg| arg.name).collect::<Vec<_>>();

		assert_eq!(names, vec!["user_id", "fields", AS_USER_ID_ARGUMENT]);

		let anonymous = Method::listing("services/apisrv/now", "Current time");

		assert!(anonymous.form_arguments().is_empty());
	}

	#[test]
	fn incomplete_detail_records_are_rejected() {
		assert!(serde_json::from_str::<MethodDetail>(r#"{"name":"services/x/y"}"#).is_err());
		assert!(
			serde_json::from_str::<MethodDetail>(
				r#"{"name":"a","brief_description":"","ref_url":"","arguments":[{"name":"x"}],"auth_options":{"consumer":"ignored","token":"ignored","ssl_required":false}}"#,
			)
			.is_err()
		);
		assert!(
			serde_json::from_str::<MethodDetail>(
				r#"{"name":"a","brief_description":"","ref_url":"","arguments":[],"auth_options":{"consumer":"ignored","token":"ignored"}}"#,
			)
			.is_err()
		);
	}

	#[test]
	fn unknown_auth_requirement_is_rejected() {
		assert!(serde_json::from_str::<AuthRequirement>("\"sometimes\"").is_err());
	}
}
