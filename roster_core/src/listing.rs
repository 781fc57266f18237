use std::collections::HashMap;
use std::fmt;

use crate::MergePolicy;
use crate::MergeReport;
use crate::RecordCodec;
use crate::RosterError;
use crate::RosterResult;
use crate::merge;

/// Prefix of the line rendered for an [`Line::Error`].
pub const ERROR_PREFIX: &str = "#ERROR cannot parse";

/// One physical line of a registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<V> {
	/// A line with no non-whitespace characters.
	Blank,
	/// A `#` line that is not a disabled entry, kept byte-for-byte.
	Comment(String),
	/// A line that could not be parsed as an entry. `text` is the trimmed
	/// original.
	Error { type_name: String, text: String },
	/// A parsed entry together with its toggle state.
	Entry { value: V, enabled: bool },
}

impl<V> Line<V> {
	pub fn entry(value: V, enabled: bool) -> Self {
		Self::Entry { value, enabled }
	}

	pub fn is_entry(&self) -> bool {
		matches!(self, Self::Entry { .. })
	}
}

/// An immutable, ordered registry of lines.
///
/// A `Listing` is only produced by [`parse`](crate::parse), by merging two
/// listings or by toggling an entry. Each of those returns a fresh value, so
/// a listing can be shared freely once built.
///
/// Entry ids are unique. The id index is derived from the line sequence and
/// is never the source of truth.
#[derive(Clone)]
pub struct Listing<C: RecordCodec> {
	codec: C,
	lines: Vec<Line<C::Value>>,
	index: HashMap<C::Id, usize>,
}

impl<C: RecordCodec> Listing<C> {
	/// Parse `text` into a listing. See [`parse`](crate::parse).
	pub fn parse(text: impl AsRef<str>, codec: C) -> RosterResult<Self> {
		crate::parse(text, codec)
	}

	pub fn codec(&self) -> &C {
		&self.codec
	}

	pub fn lines(&self) -> &[Line<C::Value>] {
		&self.lines
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Values of enabled entries, in file order. Each call starts a fresh
	/// iteration.
	pub fn enabled(&self) -> impl Iterator<Item = &C::Value> + '_ {
		self.entries_with(true)
	}

	/// Values of disabled entries, in file order.
	pub fn disabled(&self) -> impl Iterator<Item = &C::Value> + '_ {
		self.entries_with(false)
	}

	fn entries_with(&self, wanted: bool) -> impl Iterator<Item = &C::Value> + '_ {
		self.lines.iter().filter_map(move |line| {
			match line {
				Line::Entry { value, enabled } if *enabled == wanted => Some(value),
				_ => None,
			}
		})
	}

	/// Entry ids in file order, regardless of toggle state.
	pub fn ids(&self) -> impl Iterator<Item = C::Id> + '_ {
		self.lines.iter().filter_map(|line| {
			match line {
				Line::Entry { value, .. } => Some(self.codec.id_of(value)),
				_ => None,
			}
		})
	}

	pub fn contains(&self, id: &C::Id) -> bool {
		self.index.contains_key(id)
	}

	/// Look up an entry by id, returning its value and whether it is enabled.
	pub fn get(&self, id: &C::Id) -> Option<(&C::Value, bool)> {
		let position = *self.index.get(id)?;
		match &self.lines[position] {
			Line::Entry { value, enabled } => Some((value, *enabled)),
			_ => None,
		}
	}

	pub fn is_enabled(&self, id: &C::Id) -> Option<bool> {
		self.get(id).map(|(_, enabled)| enabled)
	}

	/// The unparsable lines as `(line_number, type_name, text)`, with 1-indexed
	/// line numbers.
	pub fn error_lines(&self) -> impl Iterator<Item = (usize, &str, &str)> + '_ {
		self.lines
			.iter()
			.enumerate()
			.filter_map(|(position, line)| {
				match line {
					Line::Error { type_name, text } => {
						Some((position + 1, type_name.as_str(), text.as_str()))
					}
					_ => None,
				}
			})
	}

	/// Render the listing back to text, one `\n`-terminated line per [`Line`].
	///
	/// Entries are always re-derived from the codec, so any decoration on the
	/// original line is dropped. Comments and blanks are preserved.
	pub fn serialize(&self) -> String {
		let mut output = String::new();
		for line in &self.lines {
			output.push_str(&self.render_line(line));
			output.push('\n');
		}
		output
	}

	pub(crate) fn render_line(&self, line: &Line<C::Value>) -> String {
		match line {
			Line::Blank => String::new(),
			Line::Comment(text) => text.clone(),
			Line::Error { type_name, text } => format!("{ERROR_PREFIX} {type_name}: {text}"),
			Line::Entry { value, enabled } => {
				let rendered = self.codec.stringify(value);
				if *enabled {
					rendered
				} else {
					format!("#{rendered}")
				}
			}
		}
	}

	/// Merge `update` into this listing. See [`merge`](crate::merge()).
	pub fn merge(&self, policy: MergePolicy, update: &Self) -> RosterResult<Self>
	where
		C: Clone,
	{
		merge::merge(policy, self, update)
	}

	/// Like [`Listing::merge`] but also reports what changed.
	pub fn merge_with_report(
		&self,
		policy: MergePolicy,
		update: &Self,
	) -> RosterResult<(Self, MergeReport)>
	where
		C: Clone,
	{
		merge::merge_with_report(policy, self, update)
	}

	/// Return a copy of this listing with the entry `id` switched on or off.
	pub fn set_enabled(&self, id: &C::Id, enabled: bool) -> RosterResult<Self>
	where
		C: Clone,
	{
		let Some(&position) = self.index.get(id) else {
			return Err(RosterError::EntryNotFound(id.to_string()));
		};

		let mut lines = self.lines.clone();
		if let Line::Entry {
			enabled: current, ..
		} = &mut lines[position]
		{
			*current = enabled;
		}

		tracing::debug!(%id, enabled, "toggled entry");

		Ok(Self {
			codec: self.codec.clone(),
			lines,
			index: self.index.clone(),
		})
	}
}

impl<C: RecordCodec> fmt::Display for Listing<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.serialize())
	}
}

impl<C: RecordCodec> fmt::Debug for Listing<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Listing")
			.field("type_name", &self.codec.type_name())
			.field("lines", &self.lines)
			.finish_non_exhaustive()
	}
}

/// Append-only accumulator that freezes into a [`Listing`].
///
/// Pushing an entry whose id is already present fails with
/// [`RosterError::DuplicateId`]. Neither side wins.
pub struct ListingBuilder<C: RecordCodec> {
	codec: C,
	lines: Vec<Line<C::Value>>,
	index: HashMap<C::Id, usize>,
}

impl<C: RecordCodec> ListingBuilder<C> {
	pub fn new(codec: C) -> Self {
		Self {
			codec,
			lines: Vec::new(),
			index: HashMap::new(),
		}
	}

	pub fn codec(&self) -> &C {
		&self.codec
	}

	pub fn push(&mut self, line: Line<C::Value>) -> RosterResult<&mut Self> {
		if let Line::Entry { value, .. } = &line {
			let id = self.codec.id_of(value);
			let position = self.lines.len();
			if let Some(&first) = self.index.get(&id) {
				return Err(RosterError::DuplicateId {
					id: id.to_string(),
					first_line: first + 1,
					second_line: position + 1,
				});
			}
			self.index.insert(id, position);
		}

		self.lines.push(line);
		Ok(self)
	}

	pub fn finish(self) -> Listing<C> {
		Listing {
			codec: self.codec,
			lines: self.lines,
			index: self.index,
		}
	}
}
