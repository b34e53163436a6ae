use std::path::PathBuf;

/// Non-fatal problems collected while assembling a snapshot.
///
/// These are stored inside the snapshot that was built despite them; a non-empty list
/// never means the snapshot is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
	/// A source file could not be read or parsed.
	#[error("failed to read {}: {message}", path.display())]
	SourceRead { path: PathBuf, message: String },

	/// A parsed document is structurally invalid and was excluded from the merge.
	#[error("invalid document {}: {message}", path.display())]
	Schema { path: PathBuf, message: String },

	/// An entry was dropped while building the index.
	#[error(transparent)]
	IndexIntegrity(#[from] IndexIntegrityError),

	/// Nothing could be loaded at all: no source tier resolved to an existing location.
	#[error("no action sources configured and no built-in directory found")]
	NoSources,

	/// The document source gave up before producing any documents.
	#[error("document source failed: {0}")]
	Source(String),
}

impl LoadError {
	/// Returns the source path this error refers to, if any.
	pub fn path(&self) -> Option<&std::path::Path> {
		match self {
			Self::SourceRead { path, .. } | Self::Schema { path, .. } => Some(path),
			Self::IndexIntegrity(err) => err.path(),
			Self::NoSources | Self::Source(_) => None,
		}
	}

	/// Whether this error means the pipeline had nothing to run on.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::NoSources | Self::Source(_))
	}
}

/// Entries rejected by the index builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexIntegrityError {
	/// An action or selector table belongs to a namespace with a blank name.
	#[error("{kind} '{key}' has a blank namespace (from {})", source_path.display())]
	BlankNamespace {
		kind: &'static str,
		key: String,
		source_path: PathBuf,
	},

	/// Two distinct actions derive the same full name.
	#[error(
		"full name '{full_name}' from {} collides with {}",
		rejected.display(),
		existing.display()
	)]
	FullNameCollision {
		full_name: String,
		existing: PathBuf,
		rejected: PathBuf,
	},
}

impl IndexIntegrityError {
	fn path(&self) -> Option<&std::path::Path> {
		match self {
			Self::BlankNamespace { source_path, .. } => Some(source_path),
			Self::FullNameCollision { rejected, .. } => Some(rejected),
		}
	}
}

/// Reasons a reload did not publish a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReloadError {
	/// Another reload is still running; the current snapshot is untouched.
	#[error("reload already in progress")]
	InProgress,

	/// The document source aborted; the previous snapshot was retained.
	#[error("reload aborted: {0}")]
	Aborted(LoadError),
}
