//! [`FsLoader`]: the file-backed [`DocumentSource`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;

use actionbook_registry::{DocumentSource, LoadError, RegistryConfig, SourceBatch, SourceDocument};

use crate::discover::{DiscoveredFile, SourceRoot, SourceTier, discover, expand_path};
use crate::parse::parse_file;

/// Colon- (or semicolon-) separated list of extra source paths.
pub const PATH_ENV: &str = "ACTIONBOOK_PATH";
/// Overrides the built-in documents directory.
pub const BUILTIN_DIR_ENV: &str = "ACTIONBOOK_BUILTIN_DIR";
/// Project-local source directory, relative to the base path.
pub const PROJECT_DIR: &str = ".actionbook/actions";

const MAX_WORKERS: usize = 8;

type EnvLookup = Arc<dyn Fn(&str) -> Option<OsString> + Send + Sync>;

/// Discovers and parses documents from the five source tiers.
#[derive(Clone)]
pub struct FsLoader {
	config: RegistryConfig,
	builtin_dir: Option<PathBuf>,
	user_dir: Option<PathBuf>,
	home_dir: Option<PathBuf>,
	env: EnvLookup,
	workers: usize,
}

impl std::fmt::Debug for FsLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FsLoader")
			.field("config", &self.config)
			.field("builtin_dir", &self.builtin_dir)
			.field("user_dir", &self.user_dir)
			.field("workers", &self.workers)
			.finish_non_exhaustive()
	}
}

impl FsLoader {
	/// Creates a loader reading the process environment and the platform config directory.
	pub fn new(config: RegistryConfig) -> Self {
		let workers = thread::available_parallelism()
			.map(|n| n.get())
			.unwrap_or(4)
			.min(MAX_WORKERS);
		Self {
			config,
			builtin_dir: None,
			user_dir: dirs::config_dir().map(|dir| dir.join("actionbook").join("actions")),
			home_dir: dirs::home_dir(),
			env: Arc::new(|key| std::env::var_os(key)),
			workers,
		}
	}

	/// Sets the built-in documents directory, taking precedence over [`BUILTIN_DIR_ENV`].
	pub fn with_builtin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.builtin_dir = Some(dir.into());
		self
	}

	/// Replaces the user-tier directory. `None` disables the tier.
	pub fn with_user_dir(mut self, dir: Option<PathBuf>) -> Self {
		self.user_dir = dir;
		self
	}

	/// Replaces the home directory used for `~` expansion.
	pub fn with_home_dir(mut self, dir: Option<PathBuf>) -> Self {
		self.home_dir = dir;
		self
	}

	/// Replaces environment lookups.
	pub fn with_env(
		mut self,
		lookup: impl Fn(&str) -> Option<OsString> + Send + Sync + 'static,
	) -> Self {
		self.env = Arc::new(lookup);
		self
	}

	/// Caps the number of parser threads.
	pub fn with_workers(mut self, workers: usize) -> Self {
		self.workers = workers.max(1);
		self
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Lists the roots of every tier in load order, whether or not they exist.
	pub fn roots(&self) -> Vec<SourceRoot> {
		let base = &self.config.base_path;
		let home = self.home_dir.as_deref();
		let mut roots = Vec::new();

		let builtin = self
			.builtin_dir
			.clone()
			.or_else(|| (self.env)(BUILTIN_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));
		if let Some(dir) = builtin {
			roots.push(SourceRoot::new(SourceTier::Builtin, expand_path(&dir, base, home)));
		}
		if let Some(dir) = &self.user_dir {
			roots.push(SourceRoot::new(SourceTier::User, dir));
		}
		roots.push(SourceRoot::new(SourceTier::Project, base.join(PROJECT_DIR)));
		if let Some(list) = (self.env)(PATH_ENV) {
			roots.extend(
				std::env::split_paths(&list)
					.filter(|p| !p.as_os_str().is_empty())
					.map(|p| SourceRoot::new(SourceTier::Env, expand_path(&p, base, home))),
			);
		}
		roots.extend(
			self.config
				.paths
				.iter()
				.map(|p| SourceRoot::new(SourceTier::Custom, expand_path(p, base, home))),
		);
		roots
	}
}

impl DocumentSource for FsLoader {
	fn collect(&self) -> Result<SourceBatch, LoadError> {
		let base = &self.config.base_path;
		if !base.is_dir() {
			return Err(LoadError::Source(format!(
				"base path {} is not a directory",
				base.display()
			)));
		}

		let discovery = discover(&self.roots());
		let mut errors = discovery.errors;
		if discovery.roots_found == 0 {
			errors.push(LoadError::NoSources);
			return Ok(SourceBatch {
				documents: Vec::new(),
				errors,
			});
		}

		let mut documents = Vec::with_capacity(discovery.files.len());
		for result in parse_all(discovery.files, self.workers) {
			match result {
				Ok(doc) => documents.push(doc),
				Err(err) => errors.push(err),
			}
		}

		tracing::debug!(
			documents = documents.len(),
			errors = errors.len(),
			"collected source documents"
		);
		Ok(SourceBatch { documents, errors })
	}
}

/// Parses `files` on up to `workers` threads and returns results in rank order.
///
/// Ranks are 1-based positions in `files`.
fn parse_all(files: Vec<DiscoveredFile>, workers: usize) -> Vec<Result<SourceDocument, LoadError>> {
	if files.is_empty() {
		return Vec::new();
	}

	let ranked: Vec<(u32, DiscoveredFile)> = files
		.into_iter()
		.enumerate()
		.map(|(i, file)| (u32::try_from(i + 1).unwrap_or(u32::MAX), file))
		.collect();
	let chunk_size = ranked.len().div_ceil(workers.max(1));
	let (tx, rx) = mpsc::channel();

	thread::scope(|scope| {
		for chunk in ranked.chunks(chunk_size) {
			let tx = tx.clone();
			scope.spawn(move || {
				for (rank, file) in chunk {
					let result = parse_file(&file.path, *rank)
						.map_err(|err| err.into_load_error(file.path.clone()));
					if let Err(err) = &result {
						tracing::debug!(tier = %file.tier, %err, "failed to parse source");
					}
					let _ = tx.send((*rank, result));
				}
			});
		}
	});
	drop(tx);

	let mut results: Vec<_> = rx.into_iter().collect();
	results.sort_by_key(|(rank, _)| *rank);
	results.into_iter().map(|(_, result)| result).collect()
}
