//! Registry store with atomic snapshot publication.
//!
//! # Mental model
//!
//! * Readers load the current `Arc<Snapshot>` and query that immutable view without
//!   taking any lock.
//! * A pipeline run (collect → merge → index) builds a complete replacement snapshot off
//!   to the side and publishes it with a single `ArcSwap::store`.
//! * Pipeline runs are serialized by `reload_gate`. [`RegistryStore::load`] waits for
//!   the gate; [`RegistryStore::reload`] refuses with [`ReloadError::InProgress`].
//!
//! # Failure modes
//!
//! * Per-source problems are collected into the published snapshot.
//! * If the source aborts, a reload keeps the previous snapshot. The very first load
//!   publishes an empty snapshot carrying the error so the store is never undefined.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::document::SourceDocument;
use crate::error::{LoadError, ReloadError};
use crate::model::{Action, Namespace, Selector, Stats};
use crate::query::DebugInfo;
use crate::search::{SearchHit, SearchOptions};
use crate::snapshot::Snapshot;

/// Produces the ordered documents for one pipeline run.
pub trait DocumentSource: Send + Sync {
	/// Discovers, parses and validates every source.
	///
	/// Documents must be returned in ascending rank. Per-source problems belong in
	/// [`SourceBatch::errors`]; `Err` means nothing could be enumerated at all.
	fn collect(&self) -> Result<SourceBatch, LoadError>;
}

/// Documents and collected errors from one [`DocumentSource::collect`] call.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
	pub documents: Vec<SourceDocument>,
	pub errors: Vec<LoadError>,
}

/// In-memory document source, useful for embedded built-ins and tests.
#[derive(Debug, Default)]
pub struct StaticSource {
	documents: RwLock<Vec<SourceDocument>>,
}

impl StaticSource {
	pub fn new(documents: Vec<SourceDocument>) -> Self {
		Self {
			documents: RwLock::new(documents),
		}
	}

	/// Replaces the documents returned by subsequent collections.
	pub fn replace(&self, documents: Vec<SourceDocument>) {
		*self.documents.write() = documents;
	}
}

impl DocumentSource for StaticSource {
	fn collect(&self) -> Result<SourceBatch, LoadError> {
		Ok(SourceBatch {
			documents: self.documents.read().clone(),
			errors: Vec::new(),
		})
	}
}

impl<S: DocumentSource + ?Sized> DocumentSource for Arc<S> {
	fn collect(&self) -> Result<SourceBatch, LoadError> {
		(**self).collect()
	}
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
	/// Generation of the snapshot that is current after the run.
	pub generation: u64,
	pub stats: Stats,
	/// Errors of the run, in collection order.
	pub errors: Vec<LoadError>,
}

impl LoadReport {
	fn of(snapshot: &Snapshot) -> Self {
		Self {
			generation: snapshot.generation(),
			stats: snapshot.stats(),
			errors: snapshot.errors().to_vec(),
		}
	}

	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Owns the current snapshot and orchestrates reloads.
pub struct RegistryStore {
	source: Box<dyn DocumentSource>,
	current: ArcSwap<Snapshot>,
	reload_gate: Mutex<()>,
	debug: bool,
}

impl std::fmt::Debug for RegistryStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.current.load();
		f.debug_struct("RegistryStore")
			.field("generation", &snap.generation())
			.field("stats", &snap.stats())
			.field("debug", &self.debug)
			.finish()
	}
}

impl RegistryStore {
	/// Creates a store holding an empty generation-0 snapshot. Call [`RegistryStore::load`] next.
	pub fn new(source: impl DocumentSource + 'static) -> Self {
		Self {
			source: Box::new(source),
			current: ArcSwap::from_pointee(Snapshot::default()),
			reload_gate: Mutex::new(()),
			debug: false,
		}
	}

	/// Logs merge overrides at `info` instead of `debug`.
	pub fn with_debug(mut self, on: bool) -> Self {
		self.debug = on;
		self
	}

	/// Runs the full pipeline, waiting for any reload already in progress.
	pub fn load(&self) -> LoadReport {
		let _gate = self.reload_gate.lock();
		match self.rebuild() {
			Ok(report) => report,
			Err(err) => {
				let current = self.current.load_full();
				if current.generation() == 0 {
					return self.publish(Snapshot::empty(vec![err], 1));
				}
				tracing::warn!(
					%err,
					generation = current.generation(),
					"load aborted; keeping current snapshot"
				);
				LoadReport {
					generation: current.generation(),
					stats: current.stats(),
					errors: vec![err],
				}
			}
		}
	}

	/// Re-runs the full pipeline and publishes the result.
	///
	/// Refuses with [`ReloadError::InProgress`] while another run holds the gate. If the
	/// source aborts, the previous snapshot stays current.
	pub fn reload(&self) -> Result<LoadReport, ReloadError> {
		let Some(_gate) = self.reload_gate.try_lock() else {
			tracing::debug!("reload rejected: already in progress");
			return Err(ReloadError::InProgress);
		};
		self.rebuild().map_err(|err| {
			tracing::warn!(%err, "reload aborted; keeping current snapshot");
			ReloadError::Aborted(err)
		})
	}

	/// Must be called with the gate held.
	fn rebuild(&self) -> Result<LoadReport, LoadError> {
		let batch = self.source.collect()?;
		if !batch.documents.is_sorted_by_key(|d| d.rank) {
			tracing::warn!(
				"document source returned documents out of rank order; merging as given"
			);
		}

		let generation = self.current.load().generation() + 1;
		let snapshot = Snapshot::build(&batch.documents, batch.errors, generation);
		Ok(self.publish(snapshot))
	}

	fn publish(&self, snapshot: Snapshot) -> LoadReport {
		for err in snapshot.errors() {
			tracing::warn!(%err, "load error");
		}
		if self.debug {
			for o in snapshot.overrides() {
				tracing::info!(
					kind = %o.kind,
					namespace = %o.namespace,
					key = %o.key,
					replaced = %o.replaced_source.display(),
					winner = %o.winning_source.display(),
					"override"
				);
			}
		}

		let report = LoadReport::of(&snapshot);
		self.current.store(Arc::new(snapshot));
		tracing::info!(
			generation = report.generation,
			namespaces = report.stats.namespace_count,
			actions = report.stats.action_count,
			errors = report.errors.len(),
			"registry snapshot published"
		);
		report
	}

	/// Pins the current snapshot. Use this for several queries that must agree.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.current.load_full()
	}

	pub fn namespaces(&self) -> Vec<Namespace> {
		self.current.load().namespaces().cloned().collect()
	}

	pub fn namespace(&self, name: &str) -> Option<Namespace> {
		self.current.load().namespace(name).cloned()
	}

	pub fn actions(&self) -> Vec<Arc<Action>> {
		self.current.load().actions().cloned().collect()
	}

	pub fn actions_in(&self, namespace: &str) -> Vec<Arc<Action>> {
		self.current.load().actions_in(namespace).cloned().collect()
	}

	pub fn action(&self, full_name: &str) -> Option<Arc<Action>> {
		self.current.load().action(full_name).cloned()
	}

	pub fn has_action(&self, full_name: &str) -> bool {
		self.current.load().has_action(full_name)
	}

	pub fn selectors(&self, namespace: &str) -> Vec<Arc<Selector>> {
		self.current.load().selectors(namespace).cloned().collect()
	}

	pub fn selector(&self, namespace: &str, name: &str) -> Option<Arc<Selector>> {
		self.current.load().selector(namespace, name).cloned()
	}

	pub fn stats(&self) -> Stats {
		self.current.load().stats()
	}

	pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
		self.current.load().search(query, options)
	}

	pub fn debug_info(&self) -> DebugInfo {
		self.current.load().debug_info()
	}

	pub fn raw_registry(&self) -> IndexMap<String, Namespace> {
		self.current.load().raw_registry().clone()
	}

	/// Errors collected by the run that produced the current snapshot.
	pub fn errors(&self) -> Vec<LoadError> {
		self.current.load().errors().to_vec()
	}
}
