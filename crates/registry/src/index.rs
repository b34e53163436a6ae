//! Index builder: merged namespaces into flat O(1) lookup tables.
//!
//! # Invariants
//!
//! - The index is always rebuilt from the complete merged set; there is no incremental
//!   path, so it can never diverge from the merge result.
//! - Full names are unique. A second, distinct action deriving an existing full name is
//!   rejected and reported; the first keeps the key.
//! - Entries from namespaces with blank names never reach the index.

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::IndexIntegrityError;
use crate::model::{Action, Namespace, Selector, qualify};

/// Flat action index keyed by full name.
pub type ActionIndex = IndexMap<String, Arc<Action>>;

/// Per-namespace selector tables.
pub type SelectorTables = IndexMap<String, IndexMap<String, Arc<Selector>>>;

/// Output of one index build.
#[derive(Debug, Clone, Default)]
pub struct BuiltIndex {
	pub index: ActionIndex,
	pub selector_tables: SelectorTables,
	/// Entries rejected during the build.
	pub errors: Vec<IndexIntegrityError>,
}

/// Builds the flat index and selector tables from merged namespaces.
pub fn build(namespaces: &IndexMap<String, Namespace>) -> BuiltIndex {
	let mut built = BuiltIndex::default();

	for (ns_name, ns) in namespaces {
		if ns_name.trim().is_empty() {
			reject_blank_namespace(&mut built, ns);
			continue;
		}

		for (key, action) in &ns.actions {
			let full_name = qualify(ns_name, key);
			match built.index.entry(full_name) {
				Entry::Vacant(slot) => {
					slot.insert(Arc::clone(action));
				}
				Entry::Occupied(slot) if Arc::ptr_eq(slot.get(), action) => {}
				Entry::Occupied(slot) => {
					let err = IndexIntegrityError::FullNameCollision {
						full_name: slot.key().clone(),
						existing: slot.get().source_path.clone(),
						rejected: action.source_path.clone(),
					};
					tracing::warn!(%err, "action dropped from index");
					built.errors.push(err);
				}
			}
		}

		if !ns.selectors.is_empty() {
			built
				.selector_tables
				.insert(ns_name.clone(), ns.selectors.clone());
		}
	}

	tracing::debug!(
		actions = built.index.len(),
		selector_tables = built.selector_tables.len(),
		rejected = built.errors.len(),
		"index built"
	);
	built
}

fn reject_blank_namespace(built: &mut BuiltIndex, ns: &Namespace) {
	let actions = ns.actions.iter().map(|(key, a)| ("action", key, &a.source_path));
	let selectors = ns.selectors.iter().map(|(key, s)| ("selector", key, &s.source_path));
	for (kind, key, source_path) in actions.chain(selectors) {
		let err = IndexIntegrityError::BlankNamespace {
			kind,
			key: key.clone(),
			source_path: source_path.clone(),
		};
		tracing::warn!(%err, "entry dropped from index");
		built.errors.push(err);
	}
}

#[cfg(test)]
mod tests;
