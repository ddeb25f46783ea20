//! Three-legged token acquisition ("Quick Fill") and its shared helpers.

pub mod common;
pub mod quick_fill;

pub use common::*;
pub use quick_fill::*;
