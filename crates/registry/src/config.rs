use std::path::PathBuf;

use serde::Deserialize;

/// Configuration accepted by a registry built from files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Additional search paths, loaded last (highest priority) in the given order.
	pub paths: Vec<PathBuf>,
	/// Log merge overrides at `info` instead of `debug`.
	pub debug: bool,
	/// Base for relative source paths and the project tier.
	pub base_path: PathBuf,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			paths: Vec::new(),
			debug: false,
			base_path: PathBuf::from("."),
		}
	}
}

impl RegistryConfig {
	pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
		self.base_path = base_path.into();
		self
	}

	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.paths.push(path.into());
		self
	}

	pub fn with_debug(mut self, on: bool) -> Self {
		self.debug = on;
		self
	}
}
