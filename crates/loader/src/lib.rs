//! File-backed document source for the actionbook registry.
//!
//! # Purpose
//!
//! Finds namespace documents across the source tiers, parses them from YAML and hands
//! them to the registry in rank order.
//!
//! # Tiers
//!
//! | Tier | Root |
//! |---|---|
//! | built-in | [`FsLoader::with_builtin_dir`], else `$ACTIONBOOK_BUILTIN_DIR` |
//! | user | `<config dir>/actionbook/actions` |
//! | project | `<base path>/.actionbook/actions` |
//! | env | entries of `$ACTIONBOOK_PATH` |
//! | custom | [`RegistryConfig::paths`] |
//!
//! Each root is a directory scanned recursively for `*.yaml` and `*.yml`, or a single
//! file. Ranks are assigned in that order, starting at 1.

mod discover;
mod parse;
mod source;

use actionbook_registry::{RegistryConfig, RegistryStore};

pub use discover::{DiscoveredFile, Discovery, SourceRoot, SourceTier, discover, expand_path};
pub use parse::{DEFAULT_PARAM_TYPE, ParseError, parse_document, parse_file};
pub use source::{BUILTIN_DIR_ENV, FsLoader, PATH_ENV, PROJECT_DIR};

/// Builds a store over `loader`, honoring its debug setting. Call [`RegistryStore::load`] next.
pub fn store(loader: FsLoader) -> RegistryStore {
	let debug = loader.config().debug;
	RegistryStore::new(loader).with_debug(debug)
}

/// Creates a store for `config` and runs the first load.
pub fn open(config: RegistryConfig) -> RegistryStore {
	let store = store(FsLoader::new(config));
	store.load();
	store
}
