//! Merged catalog entries.
//!
//! Entries are created by the merge engine and shared (`Arc`) between the merged
//! [`Namespace`] tables and the flat index, so the index builder can tell a real
//! full-name collision from the same entry being seen twice.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::{ActionDef, ParameterDef};

/// Separator between the namespace and the action key in a full name.
pub const FULL_NAME_SEPARATOR: char = ':';

/// Joins a namespace and an action key into a full name.
///
/// The action key is opaque: `component:name` keys produce `namespace:component:name`.
pub fn qualify(namespace: &str, key: &str) -> String {
	let mut full = String::with_capacity(namespace.len() + key.len() + 1);
	full.push_str(namespace);
	full.push(FULL_NAME_SEPARATOR);
	full.push_str(key);
	full
}

/// An action as published in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
	pub namespace: String,
	pub name: String,
	pub full_name: String,
	pub description: String,
	pub parameters: Vec<ParameterDef>,
	/// Path of the document that supplied the winning definition.
	pub source_path: PathBuf,
}

impl Action {
	/// Builds the merged record for `key` inside `namespace`.
	///
	/// The key of the source mapping is authoritative for the name.
	pub fn from_def(namespace: &str, key: &str, def: &ActionDef, source_path: PathBuf) -> Self {
		Self {
			namespace: namespace.to_string(),
			name: key.to_string(),
			full_name: qualify(namespace, key),
			description: def.description.clone(),
			parameters: def.parameters.clone(),
			source_path,
		}
	}

	/// Returns the required parameters in declaration order.
	pub fn required_params(&self) -> impl Iterator<Item = &ParameterDef> {
		self.parameters.iter().filter(|p| p.required)
	}

	/// Renders a one-line usage string: `ns:name <required> [optional]`.
	pub fn usage(&self) -> String {
		let mut usage = self.full_name.clone();
		for param in &self.parameters {
			usage.push(' ');
			if param.required {
				usage.push('<');
				usage.push_str(&param.name);
				usage.push('>');
			} else {
				usage.push('[');
				usage.push_str(&param.name);
				usage.push(']');
			}
		}
		usage
	}
}

/// A selector as published in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
	pub namespace: String,
	pub name: String,
	pub value: String,
	pub source_path: PathBuf,
}

/// A merged namespace.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
	pub name: String,
	pub actions: IndexMap<String, Arc<Action>>,
	pub selectors: IndexMap<String, Arc<Selector>>,
}

impl Namespace {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			actions: IndexMap::new(),
			selectors: IndexMap::new(),
		}
	}

	/// Looks up an action by its key within this namespace.
	pub fn action(&self, key: &str) -> Option<&Action> {
		self.actions.get(key).map(Arc::as_ref)
	}

	/// Looks up a selector by name within this namespace.
	pub fn selector(&self, name: &str) -> Option<&Selector> {
		self.selectors.get(name).map(Arc::as_ref)
	}
}

/// Counts derived from a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
	pub namespace_count: usize,
	pub action_count: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Multi-part keys are joined verbatim.
	#[test]
	fn test_qualify_multi_part_key() {
		assert_eq!(qualify("common", "login"), "common:login");
		assert_eq!(qualify("common", "auth:login"), "common:auth:login");
	}

	/// Usage lists required parameters in angle brackets and optional ones in square brackets.
	#[test]
	fn test_usage_brackets() {
		let def = ActionDef::new("login", "Log in")
			.with_param(ParameterDef::new("username", "string", true))
			.with_param(ParameterDef::new("remember", "bool", false));
		let action = Action::from_def("common", "login", &def, PathBuf::from("common.yaml"));

		assert_eq!(action.usage(), "common:login <username> [remember]");
		assert_eq!(action.required_params().count(), 1);
	}
}
