use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum RosterError {
	#[error(transparent)]
	#[diagnostic(code(roster::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(roster::config_parse),
		help("check that roster.toml is valid TOML with [registry] and/or [merge] sections")
	)]
	ConfigParse(String),

	#[error("duplicate entry id `{id}` on lines {first_line} and {second_line}")]
	#[diagnostic(
		code(roster::duplicate_id),
		help("each entry id must appear at most once, remove or rename one of the lines")
	)]
	DuplicateId {
		id: String,
		first_line: usize,
		second_line: usize,
	},

	#[error("codec failure on line {line}: {message}")]
	#[diagnostic(code(roster::codec_defect))]
	CodecDefect { line: usize, message: String },

	#[error("invalid type name `{0}`")]
	#[diagnostic(
		code(roster::invalid_type_name),
		help("type names must be non-empty and may not contain whitespace, `#`, `[`, `]` or `=`")
	)]
	InvalidTypeName(String),

	#[error("no entry with id `{0}`")]
	#[diagnostic(
		code(roster::entry_not_found),
		help("run `roster list` to see the ids present in the registry")
	)]
	EntryNotFound(String),
}

pub type RosterResult<T> = Result<T, RosterError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
