//! `roster_core` is the engine behind the `roster` command line tool. It maintains human-editable, line-oriented registries of typed entries, where each entry can be switched off by prefixing it with a single `#`.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Registry text
//!   → Parser (classifies each line as blank, comment, error or entry)
//!   → Listing (immutable lines + id index, queried and serialized)
//!   → Merger (reconciles a base listing against an update listing)
//!   → serialized text, written back by the caller
//! ```
//!
//! Malformed lines are never dropped. A line that cannot be read as an entry
//! is kept as a comment, or rendered as `#ERROR cannot parse <Type>: ...`.
//!
//! ## Key Types
//!
//! - [`RecordCodec`]: converts one entry type to and from text and gives
//!   each value a stable id. [`BracketCodec`] and [`KeyValueCodec`] are
//!   built in.
//! - [`Listing`]: the parsed registry.
//! - [`MergePolicy`]: whether update-only entries arrive enabled or
//!   disabled.
//! - [`RosterConfig`]: configuration loaded from `roster.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use roster_core::BracketCodec;
//! use roster_core::MergePolicy;
//! use roster_core::parse;
//!
//! let codec = BracketCodec::new("Customer");
//! let base = parse("[a] Jeff\n#[b] Jane\n", codec.clone()).unwrap();
//! let update = parse("[a] Jeff\n[c] Henry\n", codec).unwrap();
//!
//! let merged = base.merge(MergePolicy::AddNewAsDisabled, &update).unwrap();
//! assert_eq!(
//! 	merged.serialize(),
//! 	"[a] Jeff\n#REMOVED [b] Jane\n\n\n#MERGED\n#[c] Henry\n"
//! );
//! ```

pub use codec::*;
pub use config::*;
pub use error::*;
pub use listing::*;
pub use merge::MERGED_HEADER;
pub use merge::MergePolicy;
pub use merge::MergeReport;
pub use merge::REMOVED_PREFIX;
pub use merge::merge;
pub use merge::merge_with_report;
pub use parser::*;

mod codec;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod listing;
mod merge;
mod parser;
