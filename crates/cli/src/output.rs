//! Command execution against a pinned snapshot, rendered as text or JSON.

use std::fmt::Write as _;

use actionbook_registry::{Action, Snapshot};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::Command;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	/// The command produced a result.
	Found { text: String, data: Value },
	/// The requested item does not exist.
	Missing(String),
}

impl Reply {
	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found { .. })
	}

	/// Renders the reply for stdout.
	pub fn render(&self, json: bool) -> String {
		match (self, json) {
			(Self::Found { data, .. }, true) => {
				json!({ "success": true, "data": data }).to_string()
			}
			(Self::Missing(error), true) => json!({ "success": false, "error": error }).to_string(),
			(Self::Found { text, .. }, false) => text.clone(),
			(Self::Missing(error), false) => format!("error: {error}"),
		}
	}
}

#[derive(Debug, Serialize)]
struct NamespaceSummary<'a> {
	name: &'a str,
	actions: usize,
	selectors: usize,
}

fn to_value(value: impl Serialize) -> Value {
	serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Runs `command` against `snapshot`.
pub fn execute(command: &Command, snapshot: &Snapshot) -> Reply {
	match command {
		Command::List { namespace } => {
			let actions: Vec<_> = match namespace {
				Some(ns) if snapshot.namespace(ns).is_none() => {
					return Reply::Missing(format!("namespace `{ns}` not found"));
				}
				Some(ns) => snapshot.actions_in(ns).collect(),
				None => snapshot.actions().collect(),
			};
			let mut text = String::new();
			for action in &actions {
				line(&mut text, &action.full_name, &action.description);
			}
			Reply::Found {
				text,
				data: json!({ "actions": to_value(&actions) }),
			}
		}
		Command::Namespaces => {
			let summaries: Vec<_> = snapshot
				.namespaces()
				.map(|ns| NamespaceSummary {
					name: &ns.name,
					actions: ns.actions.len(),
					selectors: ns.selectors.len(),
				})
				.collect();
			let mut text = String::new();
			for s in &summaries {
				let _ = writeln!(
					text,
					"{}  ({} actions, {} selectors)",
					s.name, s.actions, s.selectors
				);
			}
			Reply::Found {
				text,
				data: json!({ "namespaces": to_value(&summaries) }),
			}
		}
		Command::Show { full_name } => match snapshot.action(full_name) {
			Some(action) => Reply::Found {
				text: describe(action),
				data: json!({ "action": to_value(action), "usage": action.usage() }),
			},
			None => {
				let mut error = format!("action `{full_name}` not found");
				if let Some(suggestion) = snapshot.suggest_action(full_name) {
					let _ = write!(error, "; did you mean `{suggestion}`?");
				}
				Reply::Missing(error)
			}
		},
		Command::Selectors { namespace } => {
			if snapshot.namespace(namespace).is_none() {
				return Reply::Missing(format!("namespace `{namespace}` not found"));
			}
			let selectors: Vec<_> = snapshot.selectors(namespace).collect();
			let mut text = String::new();
			for selector in &selectors {
				line(&mut text, &selector.name, &selector.value);
			}
			Reply::Found {
				text,
				data: json!({ "selectors": to_value(&selectors) }),
			}
		}
		Command::Search(args) => {
			let hits = snapshot.search(&args.query, &args.options());
			let mut text = String::new();
			for hit in &hits {
				let _ = writeln!(
					text,
					"{:>4}  {}  {}",
					hit.score, hit.action.full_name, hit.action.description
				);
			}
			Reply::Found {
				text,
				data: json!({ "query": args.query, "hits": to_value(&hits) }),
			}
		}
		Command::Stats => {
			let stats = snapshot.stats();
			Reply::Found {
				text: format!(
					"namespaces: {}\nactions: {}\n",
					stats.namespace_count, stats.action_count
				),
				data: to_value(stats),
			}
		}
		Command::Debug => {
			let data = to_value(snapshot.debug_info());
			Reply::Found {
				text: serde_json::to_string_pretty(&data).unwrap_or_default() + "\n",
				data,
			}
		}
	}
}

fn line(out: &mut String, name: &str, detail: &str) {
	if detail.is_empty() {
		let _ = writeln!(out, "{name}");
	} else {
		let _ = writeln!(out, "{name}  {detail}");
	}
}

fn describe(action: &Action) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "{}", action.usage());
	if !action.description.is_empty() {
		let _ = writeln!(out, "\n  {}", action.description);
	}
	if !action.parameters.is_empty() {
		let _ = writeln!(out, "\nParameters:");
		for param in &action.parameters {
			let required = if param.required { ", required" } else { "" };
			let _ = write!(out, "  {} ({}{required})", param.name, param.kind);
			if !param.description.is_empty() {
				let _ = write!(out, "  {}", param.description);
			}
			out.push('\n');
		}
	}
	let _ = writeln!(out, "\nSource: {}", action.source_path.display());
	out
}

#[cfg(test)]
mod tests {
	use actionbook_registry::{ActionDef, ParameterDef, SourceDocument};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::cli::SearchArgs;

	fn snapshot() -> Snapshot {
		Snapshot::build(
			&[SourceDocument::new("common", "common.yaml", 1)
				.with_action(
					ActionDef::new("login", "Log in")
						.with_param(ParameterDef::new("user", "string", true))
						.with_param(ParameterDef::new("remember", "boolean", false)),
				)
				.with_action(ActionDef::new("logout", ""))
				.with_selector("button", "#login")],
			Vec::new(),
			1,
		)
	}

	fn search(query: &str) -> Command {
		Command::Search(SearchArgs {
			query: query.to_string(),
			namespace: None,
			limit: None,
			case_sensitive: false,
			no_names: false,
			no_descriptions: false,
			no_params: false,
		})
	}

	/// Listing prints one line per action.
	#[test]
	fn test_list_text() {
		let reply = execute(&Command::List { namespace: None }, &snapshot());
		assert_eq!(reply.render(false), "common:login  Log in\ncommon:logout\n");
	}

	/// Unknown namespaces are reported as missing.
	#[test]
	fn test_list_unknown_namespace() {
		let reply = execute(&Command::List { namespace: Some("nope".into()) }, &snapshot());
		assert!(!reply.is_found());
		assert_eq!(
			reply.render(true),
			r#"{"error":"namespace `nope` not found","success":false}"#
		);
	}

	/// `show` prints usage and parameters.
	#[test]
	fn test_show_text() {
		let reply = execute(&Command::Show { full_name: "common:login".into() }, &snapshot());
		let text = reply.render(false);
		assert!(text.starts_with("common:login <user> [remember]\n"), "{text}");
		assert!(text.contains("  user (string, required)\n"), "{text}");
		assert!(text.contains("Source: common.yaml"), "{text}");
	}

	/// A near miss suggests the closest action.
	#[test]
	fn test_show_suggests() {
		let reply = execute(&Command::Show { full_name: "common:logn".into() }, &snapshot());
		assert_eq!(
			reply,
			Reply::Missing(
				"action `common:logn` not found; did you mean `common:login`?".to_string()
			)
		);
	}

	/// JSON envelopes carry the data payload.
	#[test]
	fn test_json_envelope() {
		let reply = execute(&Command::Stats, &snapshot());
		let value: Value = serde_json::from_str(&reply.render(true)).expect("valid json");
		assert_eq!(value["success"], Value::Bool(true));
		assert_eq!(value["data"]["action_count"], json!(2));
	}

	/// Search hits are listed with scores.
	#[test]
	fn test_search_json() {
		let reply = execute(&search("login"), &snapshot());
		let value: Value = serde_json::from_str(&reply.render(true)).expect("valid json");
		assert_eq!(value["data"]["hits"][0]["action"]["full_name"], json!("common:login"));
		assert_eq!(value["data"]["hits"].as_array().map(Vec::len), Some(1));
	}

	/// Selectors of a namespace are listed.
	#[test]
	fn test_selectors_text() {
		let reply = execute(&Command::Selectors { namespace: "common".into() }, &snapshot());
		assert_eq!(reply.render(false), "button  #login\n");
	}
}
