//! Hierarchical namespace built from slash-separated method names.

// self
use crate::{_prelude::*, catalog::Method};

/// Knobs for [`MethodTree::build_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeOptions {
	/// Number of leading segments dropped from every name before insertion.
	///
	/// USOS method names all start with `services`; hosts that do not want a single top-level
	/// node set this to 1. Names left without segments are ignored.
	pub skip_leading_segments: usize,
}

/// One node of a [`MethodTree`].
///
/// Children keep first-seen order; lookups go through a per-node segment index.
#[derive(Clone, Debug, Default)]
pub struct MethodTreeNode {
	segment: String,
	method: Option<Method>,
	children: Vec<MethodTreeNode>,
	index: HashMap<String, usize>,
}
impl MethodTreeNode {
	fn new(segment: &str) -> Self {
		Self { segment: segment.to_owned(), ..Self::default() }
	}

	/// Path segment naming this node (empty for the root).
	pub fn segment(&self) -> &str {
		&self.segment
	}

	/// Method attached to this node, if any.
	pub fn method(&self) -> Option<&Method> {
		self.method.as_ref()
	}

	/// Child nodes in first-seen order.
	pub fn children(&self) -> &[MethodTreeNode] {
		&self.children
	}

	/// Child reached by `segment`.
	pub fn child(&self, segment: &str) -> Option<&MethodTreeNode> {
		self.index.get(segment).map(|&idx| &self.children[idx])
	}

	/// Returns true when the node has no children.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	fn child_mut_or_insert(&mut self, segment: &str) -> &mut MethodTreeNode {
		let idx = match self.index.get(segment) {
			Some(&idx) => idx,
			None => {
				self.children.push(MethodTreeNode::new(segment));
				self.index.insert(segment.to_owned(), self.children.len() - 1);

				self.children.len() - 1
			},
		};

		&mut self.children[idx]
	}
}

/// Tree of methods keyed by path segment.
///
/// Every inserted method is reachable by walking its name's segments in order. Internal nodes may
/// carry a method too, since a module and a method can share a prefix. Rebuilding produces a new
/// tree; nothing is shared with the previous one.
#[derive(Clone, Debug, Default)]
pub struct MethodTree {
	root: MethodTreeNode,
	len: usize,
}
impl MethodTree {
	/// Builds a tree from `methods` with default options.
	pub fn build<'a, I>(methods: I) -> Self
	where
		I: IntoIterator<Item = &'a Method>,
	{
		Self::build_with(methods, TreeOptions::default())
	}

	/// Builds a tree from `methods`.
	///
	/// Empty segments are skipped. A repeated full path replaces the previously attached method.
	pub fn build_with<'a, I>(methods: I, options: TreeOptions) -> Self
	where
		I: IntoIterator<Item = &'a Method>,
	{
		let mut tree = Self::default();

		for method in methods {
			let segments =
				method.segments().skip(options.skip_leading_segments).collect::<Vec<_>>();

			if segments.is_empty() {
				continue;
			}

			let mut node = &mut tree.root;

			for segment in segments {
				node = node.child_mut_or_insert(segment);
			}

			if node.method.replace(method.clone()).is_none() {
				tree.len += 1;
			}
		}

		tree
	}

	/// Root node; it never carries a method.
	pub fn root(&self) -> &MethodTreeNode {
		&self.root
	}

	/// Node reached by walking `path`'s non-empty segments.
	pub fn node(&self, path: &str) -> Option<&MethodTreeNode> {
		path.split('/')
			.filter(|segment| !segment.is_empty())
			.try_fold(&self.root, |node, segment| node.child(segment))
	}

	/// Method attached at `path`.
	pub fn find(&self, path: &str) -> Option<&Method> {
		self.node(path).and_then(MethodTreeNode::method)
	}

	/// Depth-first pre-order walk over `(path, method)` pairs, siblings in first-seen order.
	pub fn iter(&self) -> MethodTreeIter<'_> {
		let stack = self.root.children.iter().rev().map(|node| (String::new(), node)).collect();

		MethodTreeIter { stack }
	}

	/// Number of nodes carrying a method.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns true when no method was inserted.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

/// Iterator returned by [`MethodTree::iter`].
#[derive(Debug)]
pub struct MethodTreeIter<'a> {
	stack: Vec<(String, &'a MethodTreeNode)>,
}
impl<'a> Iterator for MethodTreeIter<'a> {
	type Item = (String, &'a Method);

	fn next(&mut self) -> Option<Self::Item> {
		while let Some((prefix, node)) = self.stack.pop() {
			let path = if prefix.is_empty() {
				node.segment.clone()
			} else {
				format!("{prefix}/{}", node.segment)
			};

			for child in node.children.iter().rev() {
				self.stack.push((path.clone(), child));
			}

			if let Some(method) = &node.method {
				return Some((path, method));
			}
		}

		None
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn methods(names: &[&str]) -> Vec<Method> {
		names.iter().map(|name| Method::listing(*name, "")).collect()
	}

	#[test]
	fn siblings_keep_first_seen_order() {
		let methods = methods(&["services/users/user", "services/apisrv/now", "services/users/me"]);
		let tree = MethodTree::build(&methods);
		let services = tree.node("services").expect("Module node should exist.");

		assert_eq!(
			services.children().iter().map(MethodTreeNode::segment).collect::<Vec<_>>(),
			vec!["users", "apisrv"],
		);
		assert_eq!(tree.len(), 3);
		assert!(tree.root().method().is_none());
	}

	#[test]
	fn modules_and_methods_share_prefixes() {
		let methods = methods(&["services/apiref/method", "services/apiref/method/extra"]);
		let tree = MethodTree::build(&methods);

		assert!(tree.find("services/apiref/method").is_some());
		assert!(tree.find("services/apiref/method/extra").is_some());
		assert!(tree.find("services/apiref").is_none());
		assert!(!tree.node("services/apiref/method").expect("Node should exist.").is_leaf());
	}

	#[test]
	fn duplicate_paths_keep_the_last_method() {
		let methods = vec![
			Method::listing("services/a/b", "first"),
			Method::listing("services/a/b", "second"),
		];
		let tree = MethodTree::build(&methods);

		assert_eq!(tree.len(), 1);
		assert_eq!(
			tree.find("services/a/b").map(|m| m.brief_description.as_str()),
			Some("second")
		);
	}

	#[test]
	fn empty_segments_and_skip_option() {
		let methods = methods(&["/services//apisrv/now/", "", "services"]);
		let tree = MethodTree::build_with(&methods, TreeOptions { skip_leading_segments: 1 });

		assert_eq!(tree.len(), 1);
		assert!(tree.find("apisrv/now").is_some());
		assert!(tree.node("services").is_none());
	}

	#[test]
	fn iteration_is_pre_order() {
		let methods = methods(&["a/x", "b", "a", "a/y/z"]);
		let tree = MethodTree::build(&methods);
		let paths = tree.iter().map(|(path, _)| path).collect::<Vec<_>>();

		assert_eq!(paths, vec!["a", "a/x", "a/y/z", "b"]);
	}
}
