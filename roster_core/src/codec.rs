use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::RosterError;
use crate::RosterResult;

/// Failure reported by [`RecordCodec::destringify`].
///
/// The two variants are handled very differently by the parser. An
/// [`Unparsable`](CodecError::Unparsable) result is ordinary input: the line
/// is kept as an error line or a comment and parsing carries on. A
/// [`Defect`](CodecError::Defect) means the codec itself is broken and is
/// propagated to the caller as a hard error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
	/// The text does not represent a valid value.
	#[error("cannot parse `{text}`: {reason}")]
	Unparsable { text: String, reason: String },
	/// The codec hit an internal fault unrelated to the shape of the text.
	#[error("codec defect: {0}")]
	Defect(String),
}

impl CodecError {
	pub fn unparsable(text: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Unparsable {
			text: text.into(),
			reason: reason.into(),
		}
	}
}

/// Teaches the generic registry engine how to read and write one concrete
/// entry type.
///
/// Implementations must satisfy the round-trip law
/// `destringify(&stringify(v)) == Ok(v)` for every valid value, and
/// `stringify` must never produce text starting with `#` (that prefix is
/// reserved for the disabled marker).
///
/// `destringify` should locate its own structure inside the text rather than
/// demand an exact match, so that disabled lines written as `# ## [c] Henry`
/// still resolve to a value.
pub trait RecordCodec {
	type Value: Clone + Debug;
	type Id: Clone + Debug + Display + Eq + Hash;

	/// Name used in `#ERROR cannot parse <type name>: ...` lines.
	fn type_name(&self) -> &str;

	fn stringify(&self, value: &Self::Value) -> String;

	fn destringify(&self, text: &str) -> Result<Self::Value, CodecError>;

	fn id_of(&self, value: &Self::Value) -> Self::Id;
}

/// A `[key] label` record, e.g. `[a] Jeff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketRecord {
	pub key: String,
	pub label: String,
}

impl BracketRecord {
	pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
		}
	}
}

/// Codec for [`BracketRecord`] lines.
///
/// Only `#` and whitespace may precede the first `[`, so `## [c] Henry`
/// parses to `("c", "Henry")` while `#REMOVED [b] Jane` stays a comment. The
/// key may not be empty or contain whitespace, and the label must be
/// non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketCodec {
	type_name: String,
}

impl BracketCodec {
	pub const DEFAULT_TYPE_NAME: &'static str = "Record";

	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
		}
	}
}

impl Default for BracketCodec {
	fn default() -> Self {
		Self::new(Self::DEFAULT_TYPE_NAME)
	}
}

impl RecordCodec for BracketCodec {
	type Id = String;
	type Value = BracketRecord;

	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn stringify(&self, value: &BracketRecord) -> String {
		format!("[{}] {}", value.key, value.label)
	}

	fn destringify(&self, text: &str) -> Result<BracketRecord, CodecError> {
		let Some(open) = text.find('[') else {
			return Err(CodecError::unparsable(text, "missing `[`"));
		};
		if !text[..open].chars().all(is_decoration) {
			return Err(CodecError::unparsable(text, "unexpected text before `[`"));
		}
		let after_open = &text[open + 1..];
		let Some(close) = after_open.find(']') else {
			return Err(CodecError::unparsable(text, "missing `]`"));
		};

		let key = &after_open[..close];
		if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '[') {
			return Err(CodecError::unparsable(text, "invalid key"));
		}

		let label = after_open[close + 1..].trim();
		if label.is_empty() {
			return Err(CodecError::unparsable(text, "missing label"));
		}

		Ok(BracketRecord::new(key, label))
	}

	fn id_of(&self, value: &BracketRecord) -> String {
		value.key.clone()
	}
}

/// A `key = value` setting, e.g. `LOG_LEVEL = debug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Setting {
	pub key: String,
	pub value: String,
}

impl Setting {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// Codec for [`Setting`] lines.
///
/// Leading `#` characters and whitespace before the key are tolerated. The
/// key must consist only of ASCII alphanumerics, `_`, `.` or `-`, which keeps
/// prose comments such as `# set this = later` from being read as entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueCodec {
	type_name: String,
}

impl KeyValueCodec {
	pub const DEFAULT_TYPE_NAME: &'static str = "Setting";

	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
		}
	}
}

impl Default for KeyValueCodec {
	fn default() -> Self {
		Self::new(Self::DEFAULT_TYPE_NAME)
	}
}

/// Characters a disabled line may carry in front of its value.
fn is_decoration(c: char) -> bool {
	c == '#' || c.is_whitespace()
}

/// Check that `name` can be rendered inside `#ERROR cannot parse <name>: ...`
/// without the line reading back as an entry.
///
/// The name must be non-empty and free of whitespace and of the characters
/// `#`, `[`, `]` and `=` that the built-in codecs treat as structure.
pub fn validate_type_name(name: &str) -> RosterResult<()> {
	let valid = !name.is_empty()
		&& !name
			.chars()
			.any(|c| c.is_whitespace() || matches!(c, '#' | '[' | ']' | '='));

	if valid {
		Ok(())
	} else {
		Err(RosterError::InvalidTypeName(name.to_string()))
	}
}

fn is_key_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

impl RecordCodec for KeyValueCodec {
	type Id = String;
	type Value = Setting;

	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn stringify(&self, value: &Setting) -> String {
		if value.value.is_empty() {
			format!("{} =", value.key)
		} else {
			format!("{} = {}", value.key, value.value)
		}
	}

	fn destringify(&self, text: &str) -> Result<Setting, CodecError> {
		let Some((left, right)) = text.split_once('=') else {
			return Err(CodecError::unparsable(text, "missing `=`"));
		};

		let key = left.trim_start_matches(is_decoration).trim_end();
		if key.is_empty() || !key.chars().all(is_key_char) {
			return Err(CodecError::unparsable(text, "invalid key"));
		}

		Ok(Setting::new(key, right.trim()))
	}

	fn id_of(&self, value: &Setting) -> String {
		value.key.clone()
	}
}
