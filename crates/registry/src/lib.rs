//! In-memory catalog of namespaced actions merged from ranked source documents.
//!
//! # Purpose
//!
//! Turns an ordered list of [`SourceDocument`]s into an immutable [`Snapshot`] that can
//! be queried and searched, and publishes snapshots atomically through
//! [`RegistryStore`].
//!
//! # Pipeline
//!
//! 1. A [`DocumentSource`] discovers and parses documents in ascending rank.
//! 2. [`merge()`] folds them into namespaces, later ranks replacing earlier entries.
//! 3. The index builder derives the `namespace:key` lookup table and rejects integrity
//!    violations into the error list.
//! 4. The finished [`Snapshot`] replaces the previous one in a single store.
//!
//! # Invariants
//!
//! * A published snapshot is never mutated.
//! * Every indexed action is reachable through its namespace and vice versa.
//! * Problems with individual sources never prevent a snapshot from being published.

mod config;
mod document;
mod error;
mod index;
mod merge;
mod model;
mod query;
mod search;
mod snapshot;
mod store;

pub use config::RegistryConfig;
pub use document::{ActionDef, ParameterDef, SelectorDef, SourceDocument};
pub use error::{IndexIntegrityError, LoadError, ReloadError};
pub use index::{ActionIndex, BuiltIndex, SelectorTables, build as build_index};
pub use merge::{EntryKind, Merged, Override, merge};
pub use model::{Action, FULL_NAME_SEPARATOR, Namespace, Selector, Stats, qualify};
pub use query::{DebugInfo, EntryDebug, NamespaceDebug, SUGGESTION_MAX_DISTANCE};
pub use search::{SearchHit, SearchOptions, SearchWeights};
pub use snapshot::Snapshot;
pub use store::{DocumentSource, LoadReport, RegistryStore, SourceBatch, StaticSource};
