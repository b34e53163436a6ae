use std::path::Path;

use pretty_assertions::assert_eq;

use super::*;
use crate::document::{ActionDef, SourceDocument};
use crate::merge::merge;

/// Every merged action is reachable under its full name, in merge order.
#[test]
fn test_index_covers_every_merged_action() {
	let merged = merge(&[
		SourceDocument::new("common", "common.yaml", 1)
			.with_action(ActionDef::new("login", ""))
			.with_action(ActionDef::new("auth:refresh", "")),
		SourceDocument::new("shop", "shop.yaml", 2).with_action(ActionDef::new("checkout", "")),
	]);

	let built = build(&merged.namespaces);

	assert_eq!(
		built.index.keys().collect::<Vec<_>>(),
		vec!["common:login", "common:auth:refresh", "shop:checkout"]
	);
	assert!(built.errors.is_empty());
	for ns in merged.namespaces.values() {
		for action in ns.actions.values() {
			let indexed = &built.index[action.full_name.as_str()];
			assert!(Arc::ptr_eq(indexed, action), "index must share the merged entry");
		}
	}
}

/// Two distinct actions deriving the same full name: first wins, second is reported.
#[test]
fn test_full_name_collision_is_rejected() {
	let merged = merge(&[
		SourceDocument::new("a", "first.yaml", 1).with_action(ActionDef::new("b:c", "first")),
		SourceDocument::new("a:b", "second.yaml", 2).with_action(ActionDef::new("c", "second")),
	]);

	let built = build(&merged.namespaces);

	assert_eq!(built.index.len(), 1);
	assert_eq!(built.index["a:b:c"].description, "first");
	assert_eq!(
		built.errors,
		vec![IndexIntegrityError::FullNameCollision {
			full_name: "a:b:c".to_string(),
			existing: "first.yaml".into(),
			rejected: "second.yaml".into(),
		}]
	);
}

/// Actions and selectors under a blank namespace are excluded and reported.
#[test]
fn test_blank_namespace_is_rejected() {
	let merged = merge(&[
		SourceDocument::new("  ", "blank.yaml", 1)
			.with_action(ActionDef::new("orphan", ""))
			.with_selector("button", "#b"),
		SourceDocument::new("ok", "ok.yaml", 2).with_action(ActionDef::new("fine", "")),
	]);

	let built = build(&merged.namespaces);

	assert_eq!(built.index.keys().collect::<Vec<_>>(), vec!["ok:fine"]);
	assert!(built.selector_tables.is_empty());
	assert_eq!(built.errors.len(), 2);
	assert!(built.errors.iter().all(|e| matches!(
		e,
		IndexIntegrityError::BlankNamespace { source_path, .. }
			if source_path == Path::new("blank.yaml")
	)));
}

/// Selector tables are keyed by namespace and carry the merged winners.
#[test]
fn test_selector_tables() {
	let merged = merge(&[
		SourceDocument::new("login", "a.yaml", 1).with_selector("submit", "#old"),
		SourceDocument::new("login", "b.yaml", 2).with_selector("submit", "#new"),
	]);

	let built = build(&merged.namespaces);

	assert_eq!(built.selector_tables["login"]["submit"].value, "#new");
}

/// Rebuilding from the same merge is deterministic.
#[test]
fn test_rebuild_is_deterministic() {
	let merged = merge(&[
		SourceDocument::new("x", "x.yaml", 1)
			.with_action(ActionDef::new("one", ""))
			.with_action(ActionDef::new("two", "")),
	]);

	let first = build(&merged.namespaces);
	let second = build(&merged.namespaces);

	assert_eq!(
		first.index.keys().collect::<Vec<_>>(),
		second.index.keys().collect::<Vec<_>>()
	);
}
