//! Relevance-scored free-text search over a snapshot.
//!
//! # Scoring
//!
//! Each enabled field contributes at most once:
//!
//! | Field | Match | Weight |
//! |---|---|---|
//! | name | equal to the query | [`SearchWeights::exact_name`] |
//! | name | contains the query | [`SearchWeights::name`] |
//! | description | contains the query | [`SearchWeights::description`] |
//! | parameters | any name or description contains the query | [`SearchWeights::parameter`] |
//!
//! Only the ordering `exact_name > name > description > parameter` is guaranteed; the
//! numbers are tuning. Zero scores are dropped, results sort by score descending and
//! then by full name ascending, and `limit` truncates after sorting. An empty query
//! matches nothing.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::model::Action;
use crate::snapshot::Snapshot;

/// Per-field contributions to a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWeights {
	pub exact_name: u32,
	pub name: u32,
	pub description: u32,
	pub parameter: u32,
}

impl SearchWeights {
	pub const DEFAULT: Self = Self {
		exact_name: 100,
		name: 50,
		description: 20,
		parameter: 10,
	};
}

impl Default for SearchWeights {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Which fields to search and how to filter the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
	pub search_names: bool,
	pub search_descriptions: bool,
	pub search_params: bool,
	/// Restrict candidates to one namespace.
	pub namespace: Option<String>,
	pub case_sensitive: bool,
	pub limit: Option<usize>,
}

impl Default for SearchOptions {
	fn default() -> Self {
		Self {
			search_names: true,
			search_descriptions: true,
			search_params: true,
			namespace: None,
			case_sensitive: false,
			limit: None,
		}
	}
}

impl SearchOptions {
	pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn case_sensitive(mut self, on: bool) -> Self {
		self.case_sensitive = on;
		self
	}
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
	pub action: Arc<Action>,
	pub score: u32,
}

impl Snapshot {
	/// Searches with [`SearchWeights::DEFAULT`].
	pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
		self.search_weighted(query, options, &SearchWeights::DEFAULT)
	}

	/// Searches with explicit weights.
	pub fn search_weighted(
		&self,
		query: &str,
		options: &SearchOptions,
		weights: &SearchWeights,
	) -> Vec<SearchHit> {
		let query = query.trim();
		if query.is_empty() {
			return Vec::new();
		}
		let needle = normalize(query, options.case_sensitive);

		let mut hits: Vec<SearchHit> = self
			.actions()
			.filter(|a| options.namespace.as_deref().is_none_or(|ns| a.namespace == ns))
			.filter_map(|action| {
				let score = score(action, &needle, options, weights);
				(score > 0).then(|| SearchHit {
					action: Arc::clone(action),
					score,
				})
			})
			.collect();

		hits.sort_by(cmp_hits);
		if let Some(limit) = options.limit {
			hits.truncate(limit);
		}
		hits
	}
}

fn cmp_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
	b.score
		.cmp(&a.score)
		.then_with(|| a.action.full_name.cmp(&b.action.full_name))
}

fn score(action: &Action, needle: &str, options: &SearchOptions, weights: &SearchWeights) -> u32 {
	let case_sensitive = options.case_sensitive;
	let contains = |haystack: &str| normalize(haystack, case_sensitive).contains(needle);
	let mut score = 0;

	if options.search_names {
		let name = normalize(&action.name, case_sensitive);
		if name == needle {
			score += weights.exact_name;
		} else if name.contains(needle) {
			score += weights.name;
		}
	}

	if options.search_descriptions && contains(&action.description) {
		score += weights.description;
	}

	if options.search_params
		&& action
			.parameters
			.iter()
			.any(|p| contains(&p.name) || contains(&p.description))
	{
		score += weights.parameter;
	}

	score
}

fn normalize(text: &str, case_sensitive: bool) -> Cow<'_, str> {
	if case_sensitive {
		Cow::Borrowed(text)
	} else {
		Cow::Owned(text.to_lowercase())
	}
}
