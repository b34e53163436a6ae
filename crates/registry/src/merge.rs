//! Merge engine: ordered source documents into merged namespaces.
//!
//! # Precedence contract
//!
//! Documents are applied in the order given, which callers guarantee is ascending
//! rank. For every action or selector key the last document defining it wins and its
//! record replaces the previous one wholesale, provenance included. Namespaces are
//! created on first mention and never removed within a pass.
//!
//! The engine has no failure path. Structural problems are rejected before documents
//! reach it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::SourceDocument;
use crate::model::{Action, Namespace, Selector};

/// Kind of entry replaced during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
	Action,
	Selector,
}

impl fmt::Display for EntryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Action => write!(f, "action"),
			Self::Selector => write!(f, "selector"),
		}
	}
}

/// A key that was defined more than once; the later definition replaced the earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Override {
	pub kind: EntryKind,
	pub namespace: String,
	pub key: String,
	pub replaced_source: PathBuf,
	pub winning_source: PathBuf,
}

/// Output of one merge pass.
#[derive(Debug, Clone, Default)]
pub struct Merged {
	/// Namespaces in order of first appearance.
	pub namespaces: IndexMap<String, Namespace>,
	/// Replacements in the order they happened.
	pub overrides: Vec<Override>,
}

/// Merges `documents` (ascending rank) into namespaces.
pub fn merge(documents: &[SourceDocument]) -> Merged {
	let mut merged = Merged::default();

	for doc in documents {
		let ns = merged
			.namespaces
			.entry(doc.namespace.clone())
			.or_insert_with(|| Namespace::new(doc.namespace.clone()));

		for (key, def) in &doc.actions {
			let action =
				Arc::new(Action::from_def(&doc.namespace, key, def, doc.source_path.clone()));
			if let Some(previous) = ns.actions.insert(key.clone(), action) {
				record_override(
					&mut merged.overrides,
					EntryKind::Action,
					&doc.namespace,
					key,
					previous.source_path.clone(),
					doc,
				);
			}
		}

		for (name, def) in &doc.selectors {
			let selector = Arc::new(Selector {
				namespace: doc.namespace.clone(),
				name: name.clone(),
				value: def.value.clone(),
				source_path: doc.source_path.clone(),
			});
			if let Some(previous) = ns.selectors.insert(name.clone(), selector) {
				record_override(
					&mut merged.overrides,
					EntryKind::Selector,
					&doc.namespace,
					name,
					previous.source_path.clone(),
					doc,
				);
			}
		}
	}

	merged
}

fn record_override(
	overrides: &mut Vec<Override>,
	kind: EntryKind,
	namespace: &str,
	key: &str,
	replaced_source: PathBuf,
	doc: &SourceDocument,
) {
	tracing::debug!(
		%kind,
		namespace,
		key,
		replaced = %replaced_source.display(),
		winner = %doc.source_path.display(),
		rank = doc.rank,
		"definition overridden"
	);
	overrides.push(Override {
		kind,
		namespace: namespace.to_string(),
		key: key.to_string(),
		replaced_source,
		winning_source: doc.source_path.clone(),
	});
}
