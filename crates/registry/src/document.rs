//! Parsed source documents: the input side of the pipeline.
//!
//! A [`SourceDocument`] is produced once per source file by a [`crate::DocumentSource`]
//! and never mutated afterwards. Field order inside `actions` and `selectors` is the
//! order of the source file, which later becomes first-appearance order in the merged
//! namespaces.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One parsed, validated namespace document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
	/// Target namespace name.
	pub namespace: String,
	/// Action definitions keyed by action name (may be a multi-part `component:name`).
	pub actions: IndexMap<String, ActionDef>,
	/// Selector definitions keyed by selector name.
	pub selectors: IndexMap<String, SelectorDef>,
	/// Path the document was read from.
	pub source_path: PathBuf,
	/// Position in the flattened load order; higher ranks override lower ones.
	pub rank: u32,
}

impl SourceDocument {
	/// Creates an empty document for `namespace`.
	pub fn new(namespace: impl Into<String>, source_path: impl Into<PathBuf>, rank: u32) -> Self {
		Self {
			namespace: namespace.into(),
			actions: IndexMap::new(),
			selectors: IndexMap::new(),
			source_path: source_path.into(),
			rank,
		}
	}

	/// Adds an action definition, keyed by its name.
	pub fn with_action(mut self, action: ActionDef) -> Self {
		self.actions.insert(action.name.clone(), action);
		self
	}

	/// Adds a selector definition, keyed by its name.
	pub fn with_selector(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let selector = SelectorDef {
			name: name.into(),
			value: value.into(),
		};
		self.selectors.insert(selector.name.clone(), selector);
		self
	}
}

/// Action definition as written in a source document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionDef {
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub parameters: Vec<ParameterDef>,
}

impl ActionDef {
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			parameters: Vec::new(),
		}
	}

	pub fn with_param(mut self, param: ParameterDef) -> Self {
		self.parameters.push(param);
		self
	}
}

/// A single typed action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterDef {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub required: bool,
}

impl ParameterDef {
	pub fn new(name: impl Into<String>, kind: impl Into<String>, required: bool) -> Self {
		Self {
			name: name.into(),
			kind: kind.into(),
			description: String::new(),
			required,
		}
	}

	pub fn described(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}
}

/// Named locator expression. The value is opaque to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorDef {
	pub name: String,
	pub value: String,
}
