use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MergePolicy;
use crate::RosterError;
use crate::RosterResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["roster.toml", ".roster.toml", ".config/roster.toml"];

/// Which built-in codec reads the registry files.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CodecKind {
	/// `[key] label` lines, see [`BracketCodec`](crate::BracketCodec).
	#[default]
	Bracket,
	/// `key = value` lines, see [`KeyValueCodec`](crate::KeyValueCodec).
	KeyValue,
}

/// Configuration loaded from a `roster.toml` file.
///
/// ```toml
/// [registry]
/// codec = "bracket"
/// type_name = "Customer"
///
/// [merge]
/// policy = "add-new-as-disabled"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RosterConfig {
	/// How registry lines are read and written.
	#[serde(default)]
	pub registry: RegistryConfig,
	/// Defaults for `roster merge`.
	#[serde(default)]
	pub merge: MergeConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistryConfig {
	#[serde(default)]
	pub codec: CodecKind,
	/// Name shown in `#ERROR cannot parse <type_name>: ...` lines. Falls back
	/// to the codec's default when absent.
	#[serde(default)]
	pub type_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MergeConfig {
	#[serde(default)]
	pub policy: MergePolicy,
}

impl RosterConfig {
	/// Resolve the first config file found in `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> RosterResult<Option<RosterConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> RosterResult<RosterConfig> {
		toml::from_str(content).map_err(|e| RosterError::ConfigParse(e.to_string()))
	}
}
