//! YAML namespace documents to [`SourceDocument`].
//!
//! Parsing happens in two passes over the same text. The first pass only checks that the
//! text is well-formed YAML, so syntax problems surface as read errors. The second pass
//! deserializes into the typed raw layout below and validates it; anything rejected
//! there is a schema error and excludes the whole document.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use actionbook_registry::{ActionDef, LoadError, ParameterDef, SelectorDef, SourceDocument};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

/// Parameter type used when a document omits `type`.
pub const DEFAULT_PARAM_TYPE: &str = "string";

/// Why a single file did not produce a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("{0}")]
	Io(#[from] std::io::Error),

	#[error("{0}")]
	Syntax(serde_yaml::Error),

	#[error("{0}")]
	Schema(String),
}

impl ParseError {
	fn schema(message: impl Into<String>) -> Self {
		Self::Schema(message.into())
	}

	/// Converts into the error collected by the registry, attributed to `path`.
	pub fn into_load_error(self, path: PathBuf) -> LoadError {
		match self {
			Self::Io(_) | Self::Syntax(_) => LoadError::SourceRead {
				path,
				message: self.to_string(),
			},
			Self::Schema(message) => LoadError::Schema { path, message },
		}
	}
}

#[derive(Debug, Deserialize)]
struct RawDocument {
	namespace: Option<String>,
	#[serde(default)]
	actions: Option<UniqueKeys<Option<RawAction>>>,
	#[serde(default)]
	selectors: Option<UniqueKeys<serde_yaml::Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAction {
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	parameters: Option<Vec<RawParameter>>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
	name: String,
	#[serde(default, rename = "type")]
	kind: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	required: Option<bool>,
}

const MERGE_KEY: &str = "<<";

/// Mapping that rejects repeated keys and merge keys.
#[derive(Debug)]
struct UniqueKeys<V>(IndexMap<String, V>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueKeys<V> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct UniqueKeysVisitor<V>(PhantomData<V>);

		impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeysVisitor<V> {
			type Value = UniqueKeys<V>;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a mapping with unique keys")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
				let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
				while let Some(key) = access.next_key::<String>()? {
					if key == MERGE_KEY {
						return Err(de::Error::custom("YAML merge keys (`<<`) are not supported"));
					}
					if entries.contains_key(&key) {
						return Err(de::Error::custom(format_args!("duplicate key `{key}`")));
					}
					let value = access.next_value()?;
					entries.insert(key, value);
				}
				Ok(UniqueKeys(entries))
			}
		}

		deserializer.deserialize_map(UniqueKeysVisitor(PhantomData))
	}
}

/// Reads and parses the document at `path`.
pub fn parse_file(path: &Path, rank: u32) -> Result<SourceDocument, ParseError> {
	let text = std::fs::read_to_string(path)?;
	parse_document(&text, path, rank)
}

/// Parses one YAML namespace document.
pub fn parse_document(text: &str, path: &Path, rank: u32) -> Result<SourceDocument, ParseError> {
	if text.trim().is_empty() {
		return Err(ParseError::schema("document is empty"));
	}
	serde_yaml::from_str::<IgnoredAny>(text).map_err(ParseError::Syntax)?;
	let raw: RawDocument =
		serde_yaml::from_str(text).map_err(|err| ParseError::Schema(err.to_string()))?;
	validate(raw, path, rank)
}

fn validate(raw: RawDocument, path: &Path, rank: u32) -> Result<SourceDocument, ParseError> {
	let namespace = raw.namespace.ok_or_else(|| ParseError::schema("missing `namespace`"))?;
	if namespace.trim().is_empty() {
		return Err(ParseError::schema("`namespace` is blank"));
	}

	let mut doc = SourceDocument::new(namespace, path, rank);

	for (key, action) in raw.actions.map(|a| a.0).unwrap_or_default() {
		if key.trim().is_empty() {
			return Err(ParseError::schema("action with a blank name"));
		}
		let action = action.unwrap_or_default();
		let mut def = ActionDef::new(key.as_str(), action.description.unwrap_or_default());
		for param in action.parameters.unwrap_or_default() {
			if param.name.trim().is_empty() {
				return Err(ParseError::schema(format!(
					"action `{key}` has a parameter with a blank name"
				)));
			}
			let kind = param.kind.unwrap_or_else(|| DEFAULT_PARAM_TYPE.to_string());
			def = def.with_param(
				ParameterDef::new(param.name, kind, param.required.unwrap_or(false))
					.described(param.description.unwrap_or_default()),
			);
		}
		doc.actions.insert(key, def);
	}

	for (name, value) in raw.selectors.map(|s| s.0).unwrap_or_default() {
		if name.trim().is_empty() {
			return Err(ParseError::schema("selector with a blank name"));
		}
		let serde_yaml::Value::String(value) = value else {
			return Err(ParseError::schema(format!("selector `{name}` must be a string")));
		};
		doc.selectors.insert(name.clone(), SelectorDef { name, value });
	}

	Ok(doc)
}
