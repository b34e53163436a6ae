//! Read-only accessors over a [`Snapshot`].
//!
//! Every accessor is a pure function of the snapshot it is called on. Lookups of
//! unknown names return `None` or an empty iterator rather than failing.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::merge::Override;
use crate::model::{Action, Namespace, Selector, Stats};
use crate::snapshot::Snapshot;

/// Maximum edit distance for "did you mean" suggestions.
pub const SUGGESTION_MAX_DISTANCE: usize = 3;

impl Snapshot {
	/// Namespaces in order of first appearance during the merge.
	pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> + '_ {
		self.namespaces.values()
	}

	pub fn namespace(&self, name: &str) -> Option<&Namespace> {
		self.namespaces.get(name)
	}

	/// All indexed actions in index insertion order.
	pub fn actions(&self) -> impl Iterator<Item = &Arc<Action>> + '_ {
		self.index.values()
	}

	/// Indexed actions belonging to `namespace`; empty for unknown namespaces.
	pub fn actions_in<'a>(
		&'a self,
		namespace: &'a str,
	) -> impl Iterator<Item = &'a Arc<Action>> + 'a {
		self.index.values().filter(move |a| a.namespace == namespace)
	}

	/// Looks up an action by full name.
	pub fn action(&self, full_name: &str) -> Option<&Arc<Action>> {
		self.index.get(full_name)
	}

	/// True iff [`Snapshot::action`] would return an entry.
	pub fn has_action(&self, full_name: &str) -> bool {
		self.index.contains_key(full_name)
	}

	/// Selectors of `namespace`; empty for unknown namespaces.
	pub fn selectors<'a>(
		&'a self,
		namespace: &str,
	) -> impl Iterator<Item = &'a Arc<Selector>> + use<'a> {
		self.selector_tables
			.get(namespace)
			.into_iter()
			.flat_map(|table| table.values())
	}

	pub fn selector(&self, namespace: &str, name: &str) -> Option<&Arc<Selector>> {
		self.selector_tables.get(namespace)?.get(name)
	}

	/// Counts computed from the current tables.
	pub fn stats(&self) -> Stats {
		Stats {
			namespace_count: self.namespaces.len(),
			action_count: self.index.len(),
		}
	}

	/// The merged namespace mapping, exactly as the merge engine produced it.
	pub fn raw_registry(&self) -> &IndexMap<String, Namespace> {
		&self.namespaces
	}

	/// Returns the closest full name to `query`, if one is within a small edit distance.
	pub fn suggest_action(&self, query: &str) -> Option<&str> {
		self.index
			.keys()
			.map(|k| (strsim::levenshtein(query, k), k))
			.filter(|(distance, _)| *distance <= SUGGESTION_MAX_DISTANCE)
			.min_by(|(da, ka), (db, kb)| da.cmp(db).then_with(|| ka.cmp(kb)))
			.map(|(_, k)| k.as_str())
	}

	/// Structural dump of the snapshot with provenance, for diagnostics.
	pub fn debug_info(&self) -> DebugInfo {
		let namespaces = self
			.namespaces
			.values()
			.map(|ns| NamespaceDebug {
				name: ns.name.clone(),
				actions: ns
					.actions
					.iter()
					.map(|(key, action)| EntryDebug {
						key: key.clone(),
						full_name: Some(action.full_name.clone()),
						indexed: self
							.index
							.get(action.full_name.as_str())
							.is_some_and(|indexed| Arc::ptr_eq(indexed, action)),
						source_path: action.source_path.clone(),
					})
					.collect(),
				selectors: ns
					.selectors
					.iter()
					.map(|(key, selector)| EntryDebug {
						key: key.clone(),
						full_name: None,
						indexed: self.selector(&ns.name, key).is_some(),
						source_path: selector.source_path.clone(),
					})
					.collect(),
			})
			.collect();

		DebugInfo {
			generation: self.generation,
			stats: self.stats(),
			namespaces,
			overrides: self.overrides.clone(),
			errors: self.errors.iter().map(ToString::to_string).collect(),
		}
	}
}

/// Diagnostic dump returned by [`Snapshot::debug_info`]. Not a stable format.
#[derive(Debug, Clone, Serialize)]
pub struct DebugInfo {
	pub generation: u64,
	pub stats: Stats,
	pub namespaces: Vec<NamespaceDebug>,
	pub overrides: Vec<Override>,
	pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceDebug {
	pub name: String,
	pub actions: Vec<EntryDebug>,
	pub selectors: Vec<EntryDebug>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryDebug {
	pub key: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub full_name: Option<String>,
	/// Whether the entry made it into the lookup tables.
	pub indexed: bool,
	pub source_path: PathBuf,
}
