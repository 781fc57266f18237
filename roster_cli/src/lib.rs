use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use roster_core::CodecKind;
use roster_core::MergePolicy;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Check, format, toggle and merge line-oriented registry files.",
	long_about = "roster maintains human-editable registries where every line is one entry, \
	              and an entry is switched off by prefixing it with a single `#`.\n\nLines that \
	              cannot be parsed are never dropped. They are kept as comments or flagged \
	              with `#ERROR`.\n\nQuick start:\n  roster init               Create a \
	              roster.toml\n  roster check FILE         Report unparsable lines\n  roster fmt \
	              FILE           Rewrite entries in canonical form\n  roster merge BASE UPDATE  \
	              Reconcile BASE against UPDATE"
)]
pub struct RosterCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, used to discover `roster.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Codec used to read registry lines. Overrides `registry.codec`.
	#[arg(long, global = true, value_enum)]
	pub codec: Option<CodecArg>,

	/// Entry type name shown in `#ERROR cannot parse <TYPE>` lines. Overrides
	/// `registry.type_name`.
	#[arg(long, global = true)]
	pub type_name: Option<String>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `roster.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Report every line of a registry that cannot be parsed.
	///
	/// Exits with a non-zero status code when unparsable lines are found,
	/// which makes it suitable for CI.
	Check {
		/// Registry file to check.
		file: PathBuf,

		/// Output format. `github` emits workflow annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the enabled and disabled entries of a registry.
	List {
		/// Registry file to read.
		file: PathBuf,

		/// Output format.
		#[arg(long, value_enum, default_value_t = ListOutputFormat::Text)]
		format: ListOutputFormat,
	},
	/// Rewrite a registry in canonical form.
	///
	/// Entries are re-rendered by the codec, which drops any decoration
	/// around them. Comments and blank lines are left untouched and
	/// unparsable lines are flagged with `#ERROR`.
	Fmt {
		/// Registry file to format.
		file: PathBuf,

		/// Exit with a non-zero status when the file is not canonical,
		/// without writing anything.
		#[arg(long, default_value_t = false)]
		check: bool,

		/// Print a diff of the changes instead of writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Merge an update registry into a base registry.
	///
	/// Base entries missing from the update are replaced with a `#REMOVED`
	/// marker. Update entries missing from the base are appended under a
	/// `#MERGED` header. Everything else in the base is kept as it is.
	Merge {
		/// Registry that is rewritten with the merge result.
		base: PathBuf,

		/// Registry holding the desired set of entries.
		update: PathBuf,

		/// How new entries are introduced. Overrides `merge.policy`.
		#[arg(long, value_enum)]
		policy: Option<PolicyArg>,

		/// Print a diff of the changes instead of writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Enable the entry with the given id.
	Enable {
		/// Registry file to edit.
		file: PathBuf,

		/// Id of the entry to enable.
		id: String,
	},
	/// Disable the entry with the given id.
	Disable {
		/// Registry file to edit.
		file: PathBuf,

		/// Id of the entry to disable.
		id: String,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CodecArg {
	/// `[key] label` lines.
	Bracket,
	/// `key = value` lines.
	KeyValue,
}

impl From<CodecArg> for CodecKind {
	fn from(value: CodecArg) -> Self {
		match value {
			CodecArg::Bracket => Self::Bracket,
			CodecArg::KeyValue => Self::KeyValue,
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
	/// Append new entries disabled.
	AddNewAsDisabled,
	/// Append new entries enabled.
	AddNewAsEnabled,
}

impl From<PolicyArg> for MergePolicy {
	fn from(value: PolicyArg) -> Self {
		match value {
			PolicyArg::AddNewAsDisabled => Self::AddNewAsDisabled,
			PolicyArg::AddNewAsEnabled => Self::AddNewAsEnabled,
		}
	}
}
