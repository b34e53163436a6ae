//! Immutable registry snapshots.
//!
//! # Role
//!
//! A [`Snapshot`] is the complete result of one pipeline run: merged namespaces, the
//! flat index, selector tables, and the errors collected along the way. It is built
//! off to the side and never mutated after construction. Readers pin it through an
//! `Arc`, so a reload that publishes a successor never disturbs queries in flight.

use indexmap::IndexMap;

use crate::document::SourceDocument;
use crate::error::LoadError;
use crate::index::{self, ActionIndex, SelectorTables};
use crate::merge::{self, Override};
use crate::model::Namespace;

/// Single source of truth for one catalog generation.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
	pub(crate) namespaces: IndexMap<String, Namespace>,
	pub(crate) index: ActionIndex,
	pub(crate) selector_tables: SelectorTables,
	pub(crate) errors: Vec<LoadError>,
	pub(crate) overrides: Vec<Override>,
	pub(crate) generation: u64,
}

impl Snapshot {
	/// Runs merge and index build over `documents` (ascending rank).
	///
	/// `errors` are the problems the document source already collected; index integrity
	/// errors are appended after them.
	pub fn build(
		documents: &[SourceDocument],
		mut errors: Vec<LoadError>,
		generation: u64,
	) -> Self {
		let merged = merge::merge(documents);
		let built = index::build(&merged.namespaces);
		errors.extend(built.errors.into_iter().map(LoadError::from));

		Self {
			namespaces: merged.namespaces,
			index: built.index,
			selector_tables: built.selector_tables,
			errors,
			overrides: merged.overrides,
			generation,
		}
	}

	/// An empty snapshot carrying only `errors`.
	pub fn empty(errors: Vec<LoadError>, generation: u64) -> Self {
		Self {
			errors,
			generation,
			..Self::default()
		}
	}

	/// Errors collected while this snapshot was assembled.
	pub fn errors(&self) -> &[LoadError] {
		&self.errors
	}

	/// Definitions replaced during the merge, in order.
	pub fn overrides(&self) -> &[Override] {
		&self.overrides
	}

	/// Publication counter; 0 for the placeholder created with the store.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}
