//! Source tiers and on-disk discovery.
//!
//! # Invariants
//!
//! * Files are returned tier by tier in [`SourceTier`] order, and lexicographically by path
//!   within a root.
//! * Optional tiers skip missing roots silently. Explicitly configured roots report them.

use std::fmt;
use std::path::{Path, PathBuf};

use actionbook_registry::LoadError;
use walkdir::WalkDir;

/// Where a source root came from. Later tiers override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceTier {
	Builtin,
	User,
	Project,
	Env,
	Custom,
}

impl SourceTier {
	/// Whether a missing root in this tier is an error.
	pub fn is_explicit(self) -> bool {
		matches!(self, Self::Env | Self::Custom)
	}
}

impl fmt::Display for SourceTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Builtin => "built-in",
			Self::User => "user",
			Self::Project => "project",
			Self::Env => "env",
			Self::Custom => "custom",
		})
	}
}

/// A file or directory to load documents from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
	pub tier: SourceTier,
	pub path: PathBuf,
}

impl SourceRoot {
	pub fn new(tier: SourceTier, path: impl Into<PathBuf>) -> Self {
		Self { tier, path: path.into() }
	}
}

/// A document file found under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
	pub tier: SourceTier,
	pub path: PathBuf,
}

/// Result of walking every root.
#[derive(Debug, Default)]
pub struct Discovery {
	/// Files in load order.
	pub files: Vec<DiscoveredFile>,
	/// Missing explicit roots and unreadable directories.
	pub errors: Vec<LoadError>,
	/// Number of roots that existed.
	pub roots_found: usize,
}

/// Expands a leading `~` against `home`, then resolves relative paths against `base`.
pub fn expand_path(path: &Path, base: &Path, home: Option<&Path>) -> PathBuf {
	let expanded = match (path.strip_prefix("~"), home) {
		(Ok(rest), Some(home)) => home.join(rest),
		_ => path.to_path_buf(),
	};
	if expanded.is_absolute() { expanded } else { base.join(expanded) }
}

/// Walks `roots` in order and lists the document files under each.
pub fn discover(roots: &[SourceRoot]) -> Discovery {
	let mut discovery = Discovery::default();

	for root in roots {
		if !root.path.exists() {
			if root.tier.is_explicit() {
				discovery.errors.push(LoadError::SourceRead {
					path: root.path.clone(),
					message: format!("{} source path does not exist", root.tier),
				});
			} else {
				tracing::debug!(
					tier = %root.tier,
					path = %root.path.display(),
					"source root absent; skipping"
				);
			}
			continue;
		}

		discovery.roots_found += 1;
		let files = if root.path.is_dir() {
			scan_dir(&root.path, &mut discovery.errors)
		} else {
			vec![root.path.clone()]
		};

		tracing::debug!(
			tier = %root.tier,
			path = %root.path.display(),
			count = files.len(),
			"scanned source root"
		);
		discovery
			.files
			.extend(files.into_iter().map(|path| DiscoveredFile { tier: root.tier, path }));
	}

	discovery
}

/// Lists document files under `dir` in path order. Symlinks below the root are not
/// followed.
fn scan_dir(dir: &Path, errors: &mut Vec<LoadError>) -> Vec<PathBuf> {
	let mut files = Vec::new();
	for entry in WalkDir::new(dir).sort_by_file_name() {
		match entry {
			Ok(entry) => {
				if !entry.file_type().is_dir() && is_document(entry.path()) {
					files.push(entry.into_path());
				}
			}
			Err(err) => errors.push(LoadError::SourceRead {
				path: err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
				message: err.to_string(),
			}),
		}
	}
	files
}

fn is_document(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tempfile::TempDir;

	use super::*;

	fn touch(dir: &Path, rel: &str) {
		let path = dir.join(rel);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).expect("parent should be creatable");
		}
		std::fs::write(path, "namespace: x\n").expect("file should be writable");
	}

	fn rel_paths(discovery: &Discovery, root: &Path) -> Vec<String> {
		discovery
			.files
			.iter()
			.map(|f| f.path.strip_prefix(root).unwrap_or(&f.path).display().to_string())
			.collect()
	}

	/// Directories are scanned recursively and sorted, other extensions ignored.
	#[test]
	fn test_scan_sorted_recursive() {
		let tmp = TempDir::new().expect("tempdir");
		touch(tmp.path(), "b.yaml");
		touch(tmp.path(), "a.yml");
		touch(tmp.path(), "nested/c.yaml");
		touch(tmp.path(), "notes.txt");

		let discovery = discover(&[SourceRoot::new(SourceTier::Custom, tmp.path())]);

		assert_eq!(rel_paths(&discovery, tmp.path()), vec!["a.yml", "b.yaml", "nested/c.yaml"]);
		assert_eq!(discovery.roots_found, 1);
		assert!(discovery.errors.is_empty());
	}

	/// Missing optional roots are skipped; missing explicit roots are errors.
	#[test]
	fn test_missing_roots() {
		let tmp = TempDir::new().expect("tempdir");
		let missing = tmp.path().join("nope");

		let discovery = discover(&[
			SourceRoot::new(SourceTier::User, &missing),
			SourceRoot::new(SourceTier::Env, &missing),
		]);

		assert_eq!(discovery.roots_found, 0);
		assert_eq!(discovery.errors.len(), 1);
		assert_eq!(discovery.errors[0].path(), Some(missing.as_path()));
	}

	/// A root may name a single file, whatever its extension.
	#[test]
	fn test_single_file_root() {
		let tmp = TempDir::new().expect("tempdir");
		touch(tmp.path(), "actions.txt");

		let root = SourceRoot::new(SourceTier::Custom, tmp.path().join("actions.txt"));
		let discovery = discover(&[root]);

		assert_eq!(discovery.files.len(), 1);
	}

	/// Tilde and relative paths expand as expected.
	#[test]
	fn test_expand_path() {
		let base = Path::new("/work");
		let home = Path::new("/home/me");
		let expand = |path: &str, home: Option<&Path>| expand_path(Path::new(path), base, home);
		assert_eq!(expand("~/acts", Some(home)), PathBuf::from("/home/me/acts"));
		assert_eq!(expand("acts", Some(home)), PathBuf::from("/work/acts"));
		assert_eq!(expand("/abs", Some(home)), PathBuf::from("/abs"));
		assert_eq!(expand("~/acts", None), PathBuf::from("/work/~/acts"));
	}

	/// A symlink pointing back at an ancestor does not repeat files.
	#[cfg(unix)]
	#[test]
	fn test_symlink_loop_is_not_followed() {
		let tmp = TempDir::new().expect("tempdir");
		touch(tmp.path(), "a.yaml");
		touch(tmp.path(), "nested/b.yaml");
		std::os::unix::fs::symlink(tmp.path(), tmp.path().join("nested/loop"))
			.expect("symlink should be creatable");
		std::os::unix::fs::symlink(".", tmp.path().join("self"))
			.expect("symlink should be creatable");

		let discovery = discover(&[SourceRoot::new(SourceTier::Custom, tmp.path())]);

		assert_eq!(rel_paths(&discovery, tmp.path()), vec!["a.yaml", "nested/b.yaml"]);
		assert!(discovery.errors.is_empty());
	}
}
