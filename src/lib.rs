//! Core of a USOS API browser: OAuth 1.0a request signing, three-legged token acquisition, and a
//! navigable method catalog for any USOS API installation.
//!
//! Presentation lives elsewhere. Hosts (CLI, TUI, web frontends) drive the synchronous operations
//! exposed here and own whatever state they render.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod session;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
