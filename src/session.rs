//! Browsing session: the selected installation and its cached catalog.
//!
//! A [`Session`] owns the current installation together with everything fetched for it (method
//! listing, scopes, lazily fetched method details, the method tree). Switching installations
//! drops all of it at once; refreshing replaces it only when every fetch succeeds.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, SigningOptions},
	catalog::{CatalogClient, Installation, Method, MethodTree, Scope, TreeOptions, client},
	config::BrowserConfig,
	error::{ConfigError, DecodeError},
	flows::TokenAcquisitionFlow,
	http::{self, HttpTransport},
	oauth,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Page on each installation where developers register consumer keys.
pub const DEVELOPERS_PATH: &str = "developers/";

/// Body of an executed method call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodResponse {
	/// Signed URL that was requested, signature included.
	pub url: String,
	/// Raw response body.
	pub body: String,
}
impl MethodResponse {
	/// Pretty-printed JSON with escaped tabs and newlines expanded.
	///
	/// Falls back to the raw body when it is not JSON.
	pub fn readable(&self) -> String {
		match serde_json::from_str::<serde_json::Value>(&self.body)
			.and_then(|value| serde_json::to_string_pretty(&value))
		{
			Ok(pretty) => pretty.replace("\\t", "    ").replace("\\n", "\n"),
			Err(_) => self.body.clone(),
		}
	}

	/// Body decoded as JSON.
	pub fn json(&self) -> Result<serde_json::Value, DecodeError> {
		client::decode_json("method response", &self.body)
	}
}

/// Current installation plus its cached catalog.
///
/// Mutating operations take `&mut self`; hosts that share a session across threads serialize
/// access themselves.
pub struct Session<T>
where
	T: ?Sized + HttpTransport,
{
	client: CatalogClient<T>,
	installation: Installation,
	tree_options: TreeOptions,
	methods: Vec<Method>,
	scopes: Vec<Scope>,
	details: HashMap<String, Method>,
	tree: MethodTree,
}
impl<T> Session<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an empty session pointed at `installation`.
	pub fn new(
		transport: Arc<T>,
		config: BrowserConfig,
		installation: Installation,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			client: CatalogClient::new(transport, config)?,
			installation,
			tree_options: TreeOptions::default(),
			methods: Vec::new(),
			scopes: Vec::new(),
			details: HashMap::new(),
			tree: MethodTree::default(),
		})
	}

	/// Overrides how the method tree is built on the next refresh.
	pub fn with_tree_options(mut self, options: TreeOptions) -> Self {
		self.tree_options = options;

		self
	}

	/// Catalog client used by the session.
	pub fn client(&self) -> &CatalogClient<T> {
		&self.client
	}

	/// Currently selected installation.
	pub fn current_installation(&self) -> &Installation {
		&self.installation
	}

	/// Listing-form methods of the current installation.
	pub fn methods(&self) -> &[Method] {
		&self.methods
	}

	/// Scopes of the current installation.
	pub fn scopes(&self) -> &[Scope] {
		&self.scopes
	}

	/// Method tree built from the current listing.
	pub fn tree(&self) -> &MethodTree {
		&self.tree
	}

	/// Known installations, as published by the mother installation.
	pub fn list_installations(&self) -> Result<Vec<Installation>> {
		self.client.list_installations()
	}

	/// Selects `installation`, dropping every cached catalog entry.
	///
	/// No request is made; call [`Session::refresh`] to load the new catalog.
	pub fn switch_installation(&mut self, installation: Installation) {
		#[cfg(feature = "tracing")]
		tracing::debug!(installation = %installation, "Switching installation.");

		self.installation = installation;
		self.methods.clear();
		self.scopes.clear();
		self.details.clear();
		self.tree = MethodTree::default();
	}

	/// Reloads methods and scopes of the current installation and rebuilds the tree.
	///
	/// On failure the previous catalog is kept untouched.
	pub fn refresh(&mut self) -> Result<&MethodTree> {
		let methods = self.client.list_methods(&self.installation)?;
		let scopes = self.client.list_scopes(&self.installation)?;

		self.tree = MethodTree::build_with(&methods, self.tree_options);
		self.methods = methods;
		self.scopes = scopes;
		self.details.clear();

		Ok(&self.tree)
	}

	/// Listing-form method named `name`.
	pub fn method(&self, name: &str) -> Option<&Method> {
		self.methods.iter().find(|method| method.name == name)
	}

	/// Detail-form method named `name`, fetched on first access and cached afterwards.
	///
	/// Fails with [`Error::UnknownMethod`] when the current listing does not contain `name`.
	pub fn method_detail(&mut self, name: &str) -> Result<&Method> {
		if self.method(name).is_none() {
			return Err(Error::UnknownMethod { name: name.to_owned() });
		}
		if !self.details.contains_key(name) {
			let detail = self.client.get_method_detail(&self.installation, name)?;

			self.details.insert(name.to_owned(), detail);
		}

		self.details.get(name).ok_or_else(|| Error::UnknownMethod { name: name.to_owned() })
	}

	/// Signed URL calling `name` with `arguments`.
	///
	/// Arguments with empty values are left out. `options` decide which parts of `credentials`
	/// sign the call and whether HTTPS is used.
	pub fn method_url(
		&self,
		name: &str,
		arguments: &BTreeMap<String, String>,
		credentials: &Credentials,
		options: SigningOptions,
	) -> Result<String> {
		let params = arguments
			.iter()
			.filter(|(_, value)| !value.is_empty())
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect::<BTreeMap<_, _>>();
		let effective = options.apply(credentials)?;
		let url = oauth::build_signed_url(
			&self.installation,
			name,
			&params,
			&effective,
			options.use_ssl,
		)?;

		Ok(url)
	}

	/// Calls `name` and returns its body.
	///
	/// Non-2xx answers surface as [`TransportError::Status`](crate::error::TransportError::Status)
	/// carrying the server's body.
	pub fn execute(
		&self,
		name: &str,
		arguments: &BTreeMap<String, String>,
		credentials: &Credentials,
		options: SigningOptions,
	) -> Result<MethodResponse> {
		let _guard = FlowSpan::new(FlowKind::MethodCall, "execute").entered();
		let url = self.method_url(name, arguments, credentials, options)?;

		obs::record_flow_outcome(FlowKind::MethodCall, FlowOutcome::Attempt);

		let result = http::fetch_text(
			&**self.client.transport(),
			&url,
			Some(self.client.config().timeout),
		);

		obs::record_flow_outcome(FlowKind::MethodCall, FlowOutcome::of(&result));

		Ok(MethodResponse { url, body: result? })
	}

	/// Developer portal of the current installation, where consumer keys are issued.
	pub fn developers_url(&self) -> Result<Url, ConfigError> {
		self.installation.endpoint(DEVELOPERS_PATH)
	}

	/// Starts token acquisition against the current installation.
	pub fn start_token_acquisition(
		&self,
		credentials: &Credentials,
	) -> Result<TokenAcquisitionFlow<T>, ConfigError> {
		TokenAcquisitionFlow::new(
			self.client.transport().clone(),
			self.client.config().clone(),
			self.installation.clone(),
			credentials,
		)
	}
}
impl<T> Debug for Session<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("installation", &self.installation)
			.field("methods", &self.methods.len())
			.field("scopes", &self.scopes.len())
			.field("details", &self.details.len())
			.finish()
	}
}
