use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::Line;
use crate::Listing;
use crate::ListingBuilder;
use crate::RecordCodec;
use crate::RosterResult;

/// Prefix of the comment left behind for an entry missing from the update.
pub const REMOVED_PREFIX: &str = "#REMOVED ";
/// Header comment introducing entries that only exist in the update.
pub const MERGED_HEADER: &str = "#MERGED";

/// How entries that only exist in the update are introduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
	/// New entries are appended disabled, for a human to review.
	#[default]
	AddNewAsDisabled,
	/// New entries are appended enabled.
	AddNewAsEnabled,
}

impl MergePolicy {
	/// Toggle state given to newly merged entries.
	pub fn enables_new_entries(self) -> bool {
		matches!(self, Self::AddNewAsEnabled)
	}
}

impl std::fmt::Display for MergePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::AddNewAsDisabled => write!(f, "add-new-as-disabled"),
			Self::AddNewAsEnabled => write!(f, "add-new-as-enabled"),
		}
	}
}

/// Summary of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
	/// Number of base entries that were also present in the update.
	pub kept: usize,
	/// Ids of base entries replaced by a `#REMOVED` marker.
	pub removed: Vec<String>,
	/// Ids of update entries appended under `#MERGED`.
	pub added: Vec<String>,
}

impl MergeReport {
	/// Returns true when the merge left the base unchanged.
	pub fn is_noop(&self) -> bool {
		self.removed.is_empty() && self.added.is_empty()
	}
}

/// Reconcile `base` against `update`.
///
/// - Comments, blanks and error lines of `base` are kept in place.
/// - Base entries whose id also appears in `update` (enabled or not) are kept
///   exactly as they are in `base`, including their toggle state.
/// - Base entries missing from `update` become a `#REMOVED <entry>` comment
///   followed by a blank line.
/// - Update entries unknown to `base` are appended, in update order, after a
///   blank line and a `#MERGED` header, toggled according to `policy`.
///
/// When both sides carry the same ids the result equals `base`.
pub fn merge<C>(
	policy: MergePolicy,
	base: &Listing<C>,
	update: &Listing<C>,
) -> RosterResult<Listing<C>>
where
	C: RecordCodec + Clone,
{
	merge_with_report(policy, base, update).map(|(listing, _)| listing)
}

/// Like [`merge`] but also returns a [`MergeReport`].
#[tracing::instrument(level = "debug", skip_all, fields(%policy))]
pub fn merge_with_report<C>(
	policy: MergePolicy,
	base: &Listing<C>,
	update: &Listing<C>,
) -> RosterResult<(Listing<C>, MergeReport)>
where
	C: RecordCodec + Clone,
{
	let codec = base.codec();
	let update_ids: HashSet<C::Id> = update.ids().collect();
	let mut builder = ListingBuilder::new(codec.clone());
	let mut report = MergeReport::default();

	for line in base.lines() {
		match line {
			Line::Entry { value, .. } if !update_ids.contains(&codec.id_of(value)) => {
				report.removed.push(codec.id_of(value).to_string());
				builder.push(Line::Comment(format!(
					"{REMOVED_PREFIX}{}",
					codec.stringify(value)
				)))?;
				builder.push(Line::Blank)?;
			}
			Line::Entry { .. } => {
				report.kept += 1;
				builder.push(line.clone())?;
			}
			_ => {
				builder.push(line.clone())?;
			}
		}
	}

	let new_entries: Vec<&C::Value> = update
		.lines()
		.iter()
		.filter_map(|line| {
			match line {
				Line::Entry { value, .. } if !base.contains(&codec.id_of(value)) => Some(value),
				_ => None,
			}
		})
		.collect();

	if !new_entries.is_empty() {
		builder.push(Line::Blank)?;
		builder.push(Line::Comment(MERGED_HEADER.to_string()))?;
		for value in new_entries {
			report.added.push(codec.id_of(value).to_string());
			builder.push(Line::entry(value.clone(), policy.enables_new_entries()))?;
		}
	}

	tracing::debug!(
		kept = report.kept,
		removed = report.removed.len(),
		added = report.added.len(),
		"merged listings"
	);

	Ok((builder.finish(), report))
}
