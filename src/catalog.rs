//! Method catalog: installations, scopes, methods, the client that fetches them, and the tree
//! built from slash-separated method names.

pub mod client;
pub mod installation;
pub mod method;
pub mod scope;
pub mod tree;

pub use client::*;
pub use installation::*;
pub use method::*;
pub use scope::*;
pub use tree::*;
