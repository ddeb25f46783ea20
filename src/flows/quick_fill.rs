//! Three-legged OAuth 1.0a token acquisition.
//!
//! The flow walks `request_token` → user authorization → verifier → `access_token`:
//!
//! ```text
//! Start -> RequestToken -> AwaitingUserAuthorization -> AwaitingVerifier -> AccessToken -> Done
//!                                       (any step) -> Failed
//! ```
//!
//! Each network step tries the schemes of the configured
//! [`SchemePolicy`](crate::http::SchemePolicy) in order. Operations called out of order fail with
//! [`ConfigError::InvalidFlowState`] and leave the state untouched; network or protocol failures
//! move the flow to [`FlowState::Failed`].

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenPair},
	catalog::Installation,
	config::BrowserConfig,
	error::ConfigError,
	ext::BrowserLauncher,
	flows::common::{self, TokenCall},
	http::{HttpTransport, Scheme},
	oauth,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Path of the request token endpoint.
pub const REQUEST_TOKEN_PATH: &str = "services/oauth/request_token";
/// Path of the user authorization page.
pub const AUTHORIZE_PATH: &str = "services/oauth/authorize";
/// Path of the access token endpoint.
pub const ACCESS_TOKEN_PATH: &str = "services/oauth/access_token";
/// Callback value for out-of-band (PIN) verification.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";

/// Position of a [`TokenAcquisitionFlow`] in the handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowState {
	/// Nothing requested yet.
	Start,
	/// Request token call in flight.
	RequestToken,
	/// Request token issued; the user has not been sent to the authorization page.
	AwaitingUserAuthorization,
	/// Authorization page handed off; waiting for the PIN.
	AwaitingVerifier,
	/// Access token call in flight.
	AccessToken,
	/// Access token issued.
	Done,
	/// A step failed; the flow cannot continue.
	Failed,
}
impl FlowState {
	/// Returns a stable label for logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowState::Start => "start",
			FlowState::RequestToken => "request_token",
			FlowState::AwaitingUserAuthorization => "awaiting_user_authorization",
			FlowState::AwaitingVerifier => "awaiting_verifier",
			FlowState::AccessToken => "access_token",
			FlowState::Done => "done",
			FlowState::Failed => "failed",
		}
	}

	/// Returns true for [`FlowState::Done`] and [`FlowState::Failed`].
	pub const fn is_terminal(self) -> bool {
		matches!(self, FlowState::Done | FlowState::Failed)
	}
}
impl Display for FlowState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of handing the authorization page to a [`BrowserLauncher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationPrompt {
	/// Authorization page URL; hosts show it when the launch failed.
	pub url: String,
	/// Whether the launcher reported success.
	pub launched: bool,
}

/// Drives one token acquisition against one installation.
///
/// The flow owns copies of everything it needs, so hosts can keep it across UI turns while the
/// user visits the authorization page.
pub struct TokenAcquisitionFlow<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	config: BrowserConfig,
	installation: Installation,
	consumer: Credentials,
	state: FlowState,
	request_token: Option<TokenPair>,
	authorize_scheme: Scheme,
	access_token: Option<TokenPair>,
}
impl<T> TokenAcquisitionFlow<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a flow signing with the consumer half of `credentials`.
	///
	/// Any token in `credentials` is ignored. A consumer key is mandatory and `config` must pass
	/// [`BrowserConfig::validate`].
	pub fn new(
		transport: Arc<T>,
		config: BrowserConfig,
		installation: Installation,
		credentials: &Credentials,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		if !credentials.has_consumer() {
			return Err(ConfigError::MissingConsumerKey);
		}

		let authorize_scheme = config.scheme_policy.iter().next().unwrap_or_default();

		Ok(Self {
			transport,
			config,
			installation,
			consumer: credentials.consumer_only(),
			state: FlowState::Start,
			request_token: None,
			authorize_scheme,
			access_token: None,
		})
	}

	/// Current state.
	pub fn state(&self) -> FlowState {
		self.state
	}

	/// Installation the flow talks to.
	pub fn installation(&self) -> &Installation {
		&self.installation
	}

	/// Request token pair, once issued.
	pub fn request_token_pair(&self) -> Option<&TokenPair> {
		self.request_token.as_ref()
	}

	/// Access token pair, once issued.
	pub fn access_token(&self) -> Option<&TokenPair> {
		self.access_token.as_ref()
	}

	/// Obtains a request token for `scopes` (pipe-joined, omitted when empty).
	pub fn request_token<I, S>(&mut self, scopes: I) -> Result<&TokenPair>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.expect_state("request a token", &[FlowState::Start])?;

		let _guard = FlowSpan::new(FlowKind::RequestToken, "request_token").entered();
		let mut params =
			BTreeMap::from([("oauth_callback".to_owned(), OUT_OF_BAND_CALLBACK.to_owned())]);

		if let Some(scopes) = common::format_scopes(scopes) {
			params.insert("scopes".into(), scopes);
		}

		self.state = FlowState::RequestToken;

		obs::record_flow_outcome(FlowKind::RequestToken, FlowOutcome::Attempt);

		let call = TokenCall {
			endpoint: "request_token",
			method_path: REQUEST_TOKEN_PATH,
			params,
			credentials: &self.consumer,
		};
		let result = common::call_token_endpoint(
			&*self.transport,
			&self.installation,
			&self.config,
			&call,
		);

		obs::record_flow_outcome(FlowKind::RequestToken, FlowOutcome::of(&result));

		match result {
			Ok(outcome) => {
				self.state = FlowState::AwaitingUserAuthorization;
				self.authorize_scheme = outcome.scheme;

				Ok(&*self.request_token.insert(outcome.pair))
			},
			Err(e) => {
				self.state = FlowState::Failed;

				Err(e)
			},
		}
	}

	/// Unsigned authorization page URL for the issued request token.
	///
	/// Uses the scheme that answered the request token call. The token is percent-encoded the
	/// same way the access token call signs it.
	pub fn authorize_url(&self) -> Result<String, ConfigError> {
		let pair = self.awaiting_authorization("build the authorization URL")?;
		let endpoint =
			self.installation.endpoint_with_scheme(AUTHORIZE_PATH, self.authorize_scheme)?;
		let params = BTreeMap::from([("oauth_token".to_owned(), pair.token.clone())]);

		Ok(oauth::unsigned_url(&endpoint, &params))
	}

	/// Hands the authorization page to `launcher` and starts waiting for the verifier.
	///
	/// A launcher failure is not an error; the prompt reports it so the host can show the URL.
	pub fn open_authorization(
		&mut self,
		launcher: &dyn BrowserLauncher,
	) -> Result<AuthorizationPrompt, ConfigError> {
		let url = self.authorize_url()?;
		let launched = match launcher.open(&url) {
			Ok(()) => true,
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %e, "Browser launch failed; show the URL instead.");
				#[cfg(not(feature = "tracing"))]
				let _ = e;

				false
			},
		};

		self.state = FlowState::AwaitingVerifier;

		Ok(AuthorizationPrompt { url, launched })
	}

	/// Exchanges the user's verifier (PIN) for the access token.
	pub fn submit_verifier(&mut self, verifier: &str) -> Result<&TokenPair> {
		let request = self.awaiting_authorization("submit a verifier")?.clone();
		let _guard = FlowSpan::new(FlowKind::AccessToken, "submit_verifier").entered();
		let credentials =
			self.consumer.clone().with_token(request.token, request.token_secret);
		let call = TokenCall {
			endpoint: "access_token",
			method_path: ACCESS_TOKEN_PATH,
			params: BTreeMap::from([("oauth_verifier".to_owned(), verifier.trim().to_owned())]),
			credentials: &credentials,
		};

		self.state = FlowState::AccessToken;

		obs::record_flow_outcome(FlowKind::AccessToken, FlowOutcome::Attempt);

		let result = common::call_token_endpoint(
			&*self.transport,
			&self.installation,
			&self.config,
			&call,
		);

		obs::record_flow_outcome(FlowKind::AccessToken, FlowOutcome::of(&result));

		match result {
			Ok(outcome) => {
				self.state = FlowState::Done;

				Ok(&*self.access_token.insert(outcome.pair))
			},
			Err(e) => {
				self.state = FlowState::Failed;

				Err(e)
			},
		}
	}

	fn expect_state(
		&self,
		operation: &'static str,
		allowed: &[FlowState],
	) -> Result<(), ConfigError> {
		if allowed.contains(&self.state) {
			Ok(())
		} else {
			Err(ConfigError::InvalidFlowState { operation, actual: self.state })
		}
	}

	fn awaiting_authorization(
		&self,
		operation: &'static str,
	) -> Result<&TokenPair, ConfigError> {
		self.expect_state(
			operation,
			&[FlowState::AwaitingUserAuthorization, FlowState::AwaitingVerifier],
		)?;

		self.request_token
			.as_ref()
			.ok_or(ConfigError::InvalidFlowState { operation, actual: self.state })
	}
}
impl<T> Debug for TokenAcquisitionFlow<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenAcquisitionFlow")
			.field("installation", &self.installation)
			.field("consumer_key", &self.consumer.consumer_key)
			.field("state", &self.state)
			.field("request_token_issued", &self.request_token.is_some())
			.field("access_token_issued", &self.access_token.is_some())
			.finish()
	}
}
