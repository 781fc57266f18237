use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use roster_cli::Commands;
use roster_cli::ListOutputFormat;
use roster_cli::OutputFormat;
use roster_cli::RosterCli;
use roster_core::AnyEmptyResult;
use roster_core::AnyResult;
use roster_core::BracketCodec;
use roster_core::CONFIG_FILE_CANDIDATES;
use roster_core::CodecKind;
use roster_core::KeyValueCodec;
use roster_core::Listing;
use roster_core::MergePolicy;
use roster_core::RecordCodec;
use roster_core::RosterConfig;
use roster_core::RosterError;
use roster_core::validate_type_name;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = RosterCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(command) => run_registry_command(&args, command),
		None => {
			eprintln!("No subcommand specified. Run `roster --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<RosterError>() {
			Ok(roster_err) => {
				let report: miette::Report = (*roster_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over the defaults picked from `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"warn,roster_core=debug,roster=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &RosterCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &RosterCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = RosterConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let sample_config = "# roster configuration\n\n# How registry lines are read. `bracket` \
	                     reads `[id] label` lines, `key-value`\n# reads `key = value` \
	                     lines.\n[registry]\ncodec = \"bracket\"\n# type_name = \
	                     \"Customer\"\n\n# Whether entries that only exist in the update are \
	                     added\n# disabled (for review) or enabled.\n[merge]\npolicy = \
	                     \"add-new-as-disabled\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());

	Ok(())
}

/// Load the config and run `command` with the codec it selects.
fn run_registry_command(args: &RosterCli, command: &Commands) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = RosterConfig::load(&root)?.unwrap_or_default();
	let kind = args.codec.map_or(config.registry.codec, CodecKind::from);
	let type_name = args
		.type_name
		.clone()
		.or_else(|| config.registry.type_name.clone());
	if let Some(name) = &type_name {
		validate_type_name(name)?;
	}

	tracing::debug!(?kind, ?type_name, root = %root.display(), "resolved registry settings");

	match kind {
		CodecKind::Bracket => {
			let codec = type_name.map_or_else(BracketCodec::default, BracketCodec::new);
			run_command(args, command, &config, &root, codec)
		}
		CodecKind::KeyValue => {
			let codec = type_name.map_or_else(KeyValueCodec::default, KeyValueCodec::new);
			run_command(args, command, &config, &root, codec)
		}
	}
}

fn run_command<C: RecordCodec + Clone>(
	args: &RosterCli,
	command: &Commands,
	config: &RosterConfig,
	root: &Path,
	codec: C,
) -> AnyEmptyResult {
	match command {
		Commands::Init => run_init(args),
		Commands::Check { file, format } => run_check(&root.join(file), root, *format, codec),
		Commands::List { file, format } => run_list(&root.join(file), *format, codec),
		Commands::Fmt {
			file,
			check,
			dry_run,
		} => run_fmt(&root.join(file), root, *check, *dry_run, codec),
		Commands::Merge {
			base,
			update,
			policy,
			dry_run,
		} => {
			let policy = policy.map_or(config.merge.policy, MergePolicy::from);
			run_merge(
				args,
				&root.join(base),
				&root.join(update),
				root,
				policy,
				*dry_run,
				codec,
			)
		}
		Commands::Enable { file, id } => run_toggle(&root.join(file), root, id, true, codec),
		Commands::Disable { file, id } => run_toggle(&root.join(file), root, id, false, codec),
	}
}

fn read_registry<C: RecordCodec>(path: &Path, codec: C) -> AnyResult<(String, Listing<C>)> {
	let text = std::fs::read_to_string(path)
		.map_err(|e| format!("failed to read `{}`: {e}", path.display()))?;
	let listing = Listing::parse(&text, codec)?;
	Ok((text, listing))
}

fn run_check<C: RecordCodec>(
	file: &Path,
	root: &Path,
	format: OutputFormat,
	codec: C,
) -> AnyEmptyResult {
	let (_, listing) = read_registry(file, codec)?;
	let rel = make_relative(file, root);
	let errors: Vec<_> = listing.error_lines().collect();

	if errors.is_empty() {
		match format {
			OutputFormat::Json => {
				println!("{}", serde_json::json!({ "ok": true, "errors": [] }));
			}
			OutputFormat::Github => println!("No unparsable lines."),
			OutputFormat::Text => println!("Check passed: {rel} has no unparsable lines."),
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = errors
				.iter()
				.map(|(line, type_name, text)| {
					serde_json::json!({
						"file": rel,
						"line": line,
						"type": type_name,
						"text": text,
					})
				})
				.collect();
			let output = serde_json::json!({ "ok": false, "errors": entries });
			println!("{output}");
		}
		OutputFormat::Github => {
			for (line, type_name, text) in &errors {
				println!("::error file={rel},line={line}::cannot parse {type_name}: {text}");
			}
			eprintln!("{}", check_summary(errors.len()));
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			for (line, type_name, text) in &errors {
				eprintln!(
					"  {} {rel}:{line}: cannot parse {type_name}: {text}",
					colored!("error:", red)
				);
			}
			eprintln!();
			eprintln!("{}", check_summary(errors.len()));
		}
	}

	process::exit(1);
}

fn check_summary(count: usize) -> String {
	format!("{count} unparsable line(s). Fix them or comment them out with `#`.")
}

fn run_list<C: RecordCodec>(file: &Path, format: ListOutputFormat, codec: C) -> AnyEmptyResult {
	let (_, listing) = read_registry(file, codec)?;
	let codec = listing.codec();
	let describe = |value: &C::Value| (codec.id_of(value).to_string(), codec.stringify(value));

	let enabled: Vec<_> = listing.enabled().map(describe).collect();
	let disabled: Vec<_> = listing.disabled().map(describe).collect();
	let error_count = listing.error_lines().count();

	match format {
		ListOutputFormat::Json => {
			let to_json = |entries: &[(String, String)]| -> Vec<serde_json::Value> {
				entries
					.iter()
					.map(|(id, entry)| serde_json::json!({ "id": id, "entry": entry }))
					.collect()
			};
			let output = serde_json::json!({
				"enabled": to_json(&enabled),
				"disabled": to_json(&disabled),
				"errors": error_count,
			});
			println!("{output}");
		}
		ListOutputFormat::Text => {
			if enabled.is_empty() && disabled.is_empty() {
				println!("No entries found.");
			}

			if !enabled.is_empty() {
				println!("{}", colored!("Enabled:", bold));
				for (_, entry) in &enabled {
					println!("  {entry}");
				}
			}

			if !disabled.is_empty() {
				if !enabled.is_empty() {
					println!();
				}
				println!("{}", colored!("Disabled:", bold));
				for (_, entry) in &disabled {
					println!("  {entry}");
				}
			}

			println!(
				"\n{} enabled, {} disabled, {error_count} unparsable",
				enabled.len(),
				disabled.len()
			);
		}
	}

	Ok(())
}

fn run_fmt<C: RecordCodec>(
	file: &Path,
	root: &Path,
	check: bool,
	dry_run: bool,
	codec: C,
) -> AnyEmptyResult {
	let (original, listing) = read_registry(file, codec)?;
	let rel = make_relative(file, root);
	let formatted = listing.serialize();

	if formatted == original {
		println!("{rel} is already formatted.");
		return Ok(());
	}

	if check {
		eprintln!(
			"{} {rel} is not formatted. Run `roster fmt` to fix.",
			colored!("error:", red)
		);
		process::exit(1);
	}

	if dry_run {
		println!("Dry run: would reformat {rel}:");
		print_diff(&original, &formatted);
	} else {
		std::fs::write(file, formatted)?;
		println!("Formatted {rel}.");
	}

	Ok(())
}

fn run_merge<C: RecordCodec + Clone>(
	args: &RosterCli,
	base_file: &Path,
	update_file: &Path,
	root: &Path,
	policy: MergePolicy,
	dry_run: bool,
	codec: C,
) -> AnyEmptyResult {
	let (original, base) = read_registry(base_file, codec.clone())?;
	let (_, update) = read_registry(update_file, codec)?;
	let base_rel = make_relative(base_file, root);
	let update_rel = make_relative(update_file, root);

	let (merged, report) = base.merge_with_report(policy, &update)?;

	if report.is_noop() {
		println!("{base_rel} already matches {update_rel}.");
		return Ok(());
	}

	let merged_text = merged.serialize();
	let summary = format!(
		"{} kept, {} removed, {} added ({policy})",
		report.kept,
		report.removed.len(),
		report.added.len()
	);

	if dry_run {
		println!("Dry run: would merge {update_rel} into {base_rel}: {summary}");
		print_diff(&original, &merged_text);
		return Ok(());
	}

	std::fs::write(base_file, merged_text)?;
	println!("Merged {update_rel} into {base_rel}: {summary}");

	if args.verbose {
		for id in &report.removed {
			println!("  {} {id}", colored!("removed", yellow));
		}
		for id in &report.added {
			println!("  {} {id}", colored!("added", green));
		}
	}

	Ok(())
}

fn run_toggle<C: RecordCodec + Clone>(
	file: &Path,
	root: &Path,
	id: &str,
	enabled: bool,
	codec: C,
) -> AnyEmptyResult {
	let (_, listing) = read_registry(file, codec)?;
	let rel = make_relative(file, root);
	let state = if enabled { "enabled" } else { "disabled" };

	let Some(entry_id) = listing.ids().find(|candidate| candidate.to_string() == id) else {
		return Err(RosterError::EntryNotFound(id.to_string()).into());
	};

	if listing.is_enabled(&entry_id) == Some(enabled) {
		println!("Entry `{id}` is already {state} in {rel}.");
		return Ok(());
	}

	let toggled = listing.set_enabled(&entry_id, enabled)?;
	std::fs::write(file, toggled.serialize())?;
	println!("Entry `{id}` is now {state} in {rel}.");

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
