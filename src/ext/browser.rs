//! Browser launch contract used by token acquisition to show the authorization page.

// self
use crate::error::BoxError;

/// Opens a URL in the user's browser.
///
/// Failures are informational only; token acquisition keeps going and the host is expected to
/// show the URL so the user can open it by hand.
pub trait BrowserLauncher
where
	Self: Send + Sync,
{
	/// Asks the platform to open `url`.
	fn open(&self, url: &str) -> Result<(), BoxError>;
}
impl<F> BrowserLauncher for F
where
	F: Send + Sync + Fn(&str) -> Result<(), BoxError>,
{
	fn open(&self, url: &str) -> Result<(), BoxError> {
		self(url)
	}
}
