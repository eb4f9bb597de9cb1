use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or updating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid settings: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("setting `{key}` is empty")]
	EmptyKey { key: String },
	#[error("cannot set `{key}`: `{section}` is not a table")]
	NotATable { key: String, section: String },
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
