use std::path::PathBuf;

use actionbook_registry::{RegistryConfig, SearchOptions};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "actionbook")]
#[command(about = "Browse and search merged action catalogs")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Extra source file or directory, loaded after every other tier
	#[arg(long = "path", short = 'p', value_name = "PATH")]
	pub paths: Vec<PathBuf>,

	/// Base directory for relative paths and the project tier
	#[arg(long, value_name = "DIR")]
	pub base: Option<PathBuf>,

	/// Built-in documents directory
	#[arg(long, value_name = "DIR")]
	pub builtin: Option<PathBuf>,

	/// TOML file with `paths`, `debug` and `base_path`
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Log every override at info level
	#[arg(long)]
	pub debug: bool,

	/// Print `{"success": .., "data" | "error": ..}` envelopes
	#[arg(long)]
	pub json: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// List actions
	List {
		/// Only this namespace
		#[arg(long, short)]
		namespace: Option<String>,
	},
	/// List namespaces with entry counts
	Namespaces,
	/// Show one action
	Show {
		/// Full name, `namespace:key`
		full_name: String,
	},
	/// List the selectors of a namespace
	Selectors {
		namespace: String,
	},
	/// Relevance-ranked search
	Search(SearchArgs),
	/// Namespace and action counts
	Stats,
	/// Provenance dump of the loaded registry (always JSON)
	Debug,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
	pub query: String,

	/// Only this namespace
	#[arg(long, short)]
	pub namespace: Option<String>,

	/// Maximum number of hits
	#[arg(long, short)]
	pub limit: Option<usize>,

	#[arg(long)]
	pub case_sensitive: bool,

	/// Skip action names
	#[arg(long)]
	pub no_names: bool,

	/// Skip descriptions
	#[arg(long)]
	pub no_descriptions: bool,

	/// Skip parameter names and descriptions
	#[arg(long)]
	pub no_params: bool,
}

impl SearchArgs {
	pub fn options(&self) -> SearchOptions {
		SearchOptions {
			namespace: self.namespace.clone(),
			limit: self.limit,
			search_names: !self.no_names,
			search_descriptions: !self.no_descriptions,
			search_params: !self.no_params,
			case_sensitive: self.case_sensitive,
		}
	}
}

impl Cli {
	/// Layers command-line flags over the optional config file.
	pub fn registry_config(&self) -> anyhow::Result<RegistryConfig> {
		let mut config = match &self.config {
			Some(path) => {
				let text = std::fs::read_to_string(path)
					.with_context(|| format!("failed to read config file {}", path.display()))?;
				toml::from_str(&text)
					.with_context(|| format!("failed to parse config file {}", path.display()))?
			}
			None => RegistryConfig::default(),
		};

		if let Some(base) = &self.base {
			config.base_path = base.clone();
		}
		config.paths.extend(self.paths.iter().cloned());
		config.debug |= self.debug;
		Ok(config)
	}
}
