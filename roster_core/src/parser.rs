use crate::CodecError;
use crate::Line;
use crate::Listing;
use crate::ListingBuilder;
use crate::RecordCodec;
use crate::RosterError;
use crate::RosterResult;

/// Parse registry text into a [`Listing`].
///
/// Every physical line becomes exactly one [`Line`]:
///
/// - whitespace-only lines are [`Line::Blank`];
/// - lines that do not start with `#` are enabled entries, or
///   [`Line::Error`] when the codec cannot read them;
/// - lines that start with `#` have exactly one `#` removed and the rest
///   handed to the codec. Success gives a disabled entry, failure keeps the
///   line verbatim as a [`Line::Comment`].
///
/// Malformed content never fails the parse. Only a duplicate entry id or a
/// [`CodecError::Defect`] does.
#[tracing::instrument(level = "debug", skip_all, fields(type_name = codec.type_name()))]
pub fn parse<C: RecordCodec>(text: impl AsRef<str>, codec: C) -> RosterResult<Listing<C>> {
	let mut builder = ListingBuilder::new(codec);

	for (position, raw) in text.as_ref().lines().enumerate() {
		let line = classify_line(raw, builder.codec(), position + 1)?;
		builder.push(line)?;
	}

	let listing = builder.finish();
	tracing::debug!(
		lines = listing.len(),
		enabled = listing.enabled().count(),
		disabled = listing.disabled().count(),
		errors = listing.error_lines().count(),
		"parsed listing"
	);

	Ok(listing)
}

/// Classify a single physical line. `line_number` is only used for error
/// reporting.
fn classify_line<C: RecordCodec>(
	raw: &str,
	codec: &C,
	line_number: usize,
) -> RosterResult<Line<C::Value>> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Ok(Line::Blank);
	}

	let line = match trimmed.strip_prefix('#') {
		None => {
			match destringify(codec, trimmed, line_number)? {
				Some(value) => Line::entry(value, true),
				None => {
					Line::Error {
						type_name: codec.type_name().to_string(),
						text: trimmed.to_string(),
					}
				}
			}
		}
		Some(remainder) => {
			match destringify(codec, remainder, line_number)? {
				Some(value) => Line::entry(value, false),
				None => Line::Comment(raw.to_string()),
			}
		}
	};

	tracing::trace!(line_number, kind = line_kind(&line), "classified line");

	Ok(line)
}

/// Run the codec, turning an ordinary parse failure into `None` and a codec
/// defect into an error.
fn destringify<C: RecordCodec>(
	codec: &C,
	text: &str,
	line_number: usize,
) -> RosterResult<Option<C::Value>> {
	match codec.destringify(text) {
		Ok(value) => Ok(Some(value)),
		Err(CodecError::Unparsable { .. }) => Ok(None),
		Err(CodecError::Defect(message)) => {
			Err(RosterError::CodecDefect {
				line: line_number,
				message,
			})
		}
	}
}

fn line_kind<V>(line: &Line<V>) -> &'static str {
	match line {
		Line::Blank => "blank",
		Line::Comment(_) => "comment",
		Line::Error { .. } => "error",
		Line::Entry { enabled: true, .. } => "enabled",
		Line::Entry { enabled: false, .. } => "disabled",
	}
}
