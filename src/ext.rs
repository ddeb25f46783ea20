//! Host-side extension contracts (browser launching, UI value-cache keys).
//!
//! The core never opens windows or persists form values. Hosts plug those concerns in through
//! the contracts here so frontends stay free to pick their own launcher and storage.

pub mod browser;
pub mod value_cache;

pub use browser::*;
pub use value_cache::*;
