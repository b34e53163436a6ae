//! Discovery → parse → merge → index → store, on real files.

use std::path::{Path, PathBuf};

use actionbook_loader::{FsLoader, PROJECT_DIR, store};
use actionbook_registry::{LoadError, RegistryConfig, SearchOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, text: &str) -> PathBuf {
	let path = dir.join(rel);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).expect("parent should be creatable");
	}
	std::fs::write(&path, text).expect("file should be writable");
	path
}

fn isolated(config: RegistryConfig) -> FsLoader {
	FsLoader::new(config)
		.with_user_dir(None)
		.with_home_dir(None)
		.with_env(|_| None)
}

/// Two `common.yaml` files in successive tiers merge with the later one winning.
#[test]
fn test_common_scenario_across_tiers() {
	let tmp = TempDir::new().expect("tempdir");
	write(
		tmp.path(),
		"builtin/common.yaml",
		"namespace: common\nactions:\n  login:\n    description: Default login\n",
	);
	write(
		tmp.path(),
		&format!("{PROJECT_DIR}/common.yaml"),
		"namespace: common\nactions:\n  login:\n    description: Custom login\n  \
		 logout:\n    description: Logout\n",
	);

	let loader = isolated(RegistryConfig::default().with_base_path(tmp.path()))
		.with_builtin_dir(tmp.path().join("builtin"));
	let store = store(loader);
	let report = store.load();

	assert!(report.is_clean(), "{:?}", report.errors);
	assert_eq!(report.stats.action_count, 2);
	let login = store.action("common:login").expect("login should be indexed");
	assert_eq!(login.description, "Custom login");
	assert!(login.source_path.ends_with("common.yaml"));
	assert!(login.source_path.starts_with(tmp.path().join(PROJECT_DIR)));
	assert!(store.has_action("common:logout"));
	assert_eq!(store.snapshot().overrides().len(), 1);
}

/// Custom paths override the project tier, and missing custom paths are reported.
#[test]
fn test_custom_paths_win() {
	let tmp = TempDir::new().expect("tempdir");
	write(
		tmp.path(),
		&format!("{PROJECT_DIR}/shop.yaml"),
		"namespace: shop\nselectors:\n  cart: '#cart'\n",
	);
	write(tmp.path(), "mine/shop.yml", "namespace: shop\nselectors:\n  cart: '.cart-v2'\n");
	let config = RegistryConfig::default()
		.with_base_path(tmp.path())
		.with_path("mine")
		.with_path("missing");

	let store = store(isolated(config));
	let report = store.load();

	assert_eq!(
		store.selector("shop", "cart").map(|s| s.value.clone()),
		Some(".cart-v2".to_string())
	);
	assert_eq!(report.errors.len(), 1);
	assert!(matches!(
		&report.errors[0],
		LoadError::SourceRead { path, .. } if path.ends_with("missing")
	));
}

/// A schema error excludes only the offending document.
#[test]
fn test_schema_error_excludes_document() {
	let tmp = TempDir::new().expect("tempdir");
	write(tmp.path(), &format!("{PROJECT_DIR}/a.yaml"), "namespace: a\nactions:\n  go:\n");
	write(tmp.path(), &format!("{PROJECT_DIR}/b.yaml"), "actions:\n  go:\n");

	let store = store(isolated(RegistryConfig::default().with_base_path(tmp.path())));
	let report = store.load();

	assert_eq!(report.stats.namespace_count, 1);
	assert!(matches!(report.errors.as_slice(), [LoadError::Schema { .. }]));
	assert!(store.has_action("a:go"));
}

/// Editing files and reloading publishes the new state.
#[test]
fn test_reload_picks_up_changes() {
	let tmp = TempDir::new().expect("tempdir");
	let file = write(
		tmp.path(),
		&format!("{PROJECT_DIR}/nav.yaml"),
		"namespace: nav\nactions:\n  back:\n  forward:\n",
	);

	let store = store(isolated(RegistryConfig::default().with_base_path(tmp.path())));
	store.load();
	assert_eq!(store.stats().action_count, 2);

	std::fs::write(&file, "namespace: nav\nactions:\n  back:\n    description: Go back\n")
		.expect("rewrite");
	let report = store.reload().expect("reload should publish");

	assert_eq!(report.stats.action_count, 1);
	assert!(!store.has_action("nav:forward"));
	let hits = store.search("go back", &SearchOptions::default());
	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].action.full_name, "nav:back");
}

/// An empty workspace still yields a usable, empty registry.
#[test]
fn test_no_sources_yields_empty_registry() {
	let tmp = TempDir::new().expect("tempdir");

	let store = store(isolated(RegistryConfig::default().with_base_path(tmp.path())));
	let report = store.load();

	assert_eq!(report.errors, vec![LoadError::NoSources]);
	assert_eq!(report.stats.action_count, 0);
	assert!(store.namespaces().is_empty());
}
