use super::CliError;
use super::helpers::*;
use sammy_core::cards::CommandCard;
use sammy_core::{
    CommandRegistry, CommandSpec, Document, DocumentKind, DocumentSummary, MergeOptions,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct CheckArgs {
    /// Parameter (.par) or input (.inp) file
    file: PathBuf,

    /// File kind; inferred from the extension when omitted
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Codec options JSON path
    #[arg(long)]
    options: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct FormatArgs {
    /// Parameter (.par) or input (.inp) file
    file: PathBuf,

    /// File kind; inferred from the extension when omitted
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Output path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Reorder card sets into canonical order
    #[arg(long)]
    canonical: bool,

    /// Codec options JSON path
    #[arg(long)]
    options: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct MergeArgs {
    /// Single-isotope parameter files, in group order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Index of the file whose document-wide cards are kept
    #[arg(long, default_value_t = 0)]
    primary: usize,

    /// Output path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Codec options JSON path
    #[arg(long)]
    options: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct LookupArgs {
    /// Command text, as written in the input file
    #[arg(required = true, value_name = "COMMAND")]
    words: Vec<String>,

    /// Print the matched command as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    #[serde(flatten)]
    summary: DocumentSummary,
    #[serde(rename = "unrecognizedCommands")]
    unrecognized_commands: Vec<String>,
}

pub(super) fn run_check_command(args: CheckArgs) -> Result<i32, CliError> {
    let kind = resolve_kind(&args.file, args.kind)?;
    let options = load_options(args.options.as_deref())?;
    let text = read_text(&args.file)?;
    let document = Document::deserialize_with(kind, &text, &options)?;
    document.validate()?;

    let report = CheckReport {
        file: args.file.display().to_string(),
        summary: document.summary()?,
        unrecognized_commands: document
            .get::<CommandCard>()
            .map(|card| card.unrecognized().into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|error| CliError::Internal(error.into()))?;
        println!("{rendered}");
    } else {
        print!("{}", render_check_summary(&report));
    }
    Ok(0)
}

fn render_check_summary(report: &CheckReport) -> String {
    let summary = &report.summary;
    let mut lines = vec![format!(
        "{}: {} file, {} card set(s){}",
        report.file,
        summary.kind,
        summary.cards.len(),
        if summary.canonical {
            ""
        } else {
            ", not in canonical order"
        }
    )];
    for card in &summary.cards {
        let header = card.header.map(|header| format!(" [{header}]")).unwrap_or_default();
        lines.push(format!(
            "  card {:>2} {:<22} {:>5} line(s){}",
            card.number, card.name, card.lines, header
        ));
    }
    for command in &report.unrecognized_commands {
        lines.push(format!("  unrecognized command: {command}"));
    }
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

pub(super) fn run_format_command(args: FormatArgs) -> Result<i32, CliError> {
    let kind = resolve_kind(&args.file, args.kind)?;
    let options = load_options(args.options.as_deref())?;
    let text = read_text(&args.file)?;
    let mut document = Document::deserialize_with(kind, &text, &options)?;
    if args.canonical {
        document.canonicalize();
    }
    let rendered = document.serialize_with(&options)?;
    write_output(args.output.as_deref(), &rendered)?;
    Ok(0)
}

pub(super) fn run_merge_command(args: MergeArgs) -> Result<i32, CliError> {
    let options = load_options(args.options.as_deref())?;
    if args.primary >= args.files.len() {
        return Err(CliError::Usage(format!(
            "--primary {} is out of range for {} file(s)",
            args.primary,
            args.files.len()
        )));
    }

    let mut sources = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if resolve_kind(path, None).is_ok_and(|kind| kind == DocumentKind::Input) {
            return Err(CliError::Usage(format!(
                "'{}' is an input file; only parameter files can be merged",
                path.display()
            )));
        }
        let text = read_text(path)?;
        debug!(file = %path.display(), "reading merge source");
        sources.push(Document::deserialize_with(DocumentKind::Parameter, &text, &options)?);
    }

    let merged = Document::merge(&sources, &MergeOptions::with_primary(args.primary))?;
    let rendered = merged.serialize_with(&options)?;
    write_output(args.output.as_deref(), &rendered)?;
    Ok(0)
}

pub(super) fn run_lookup_command(args: LookupArgs) -> Result<i32, CliError> {
    let text = args.words.join(" ");
    let registry = CommandRegistry::standard();
    let Some(command) = registry.lookup(&text) else {
        eprintln!("no command matches '{text}'");
        return Ok(1);
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(command)
            .map_err(|error| CliError::Internal(error.into()))?;
        println!("{rendered}");
    } else {
        print!("{}", render_command(command));
    }
    Ok(0)
}

fn render_command(command: &CommandSpec) -> String {
    let mut rendered = format!("{}\n  category: {}\n", command.phrase, command.category);
    if !command.aliases.is_empty() {
        rendered.push_str(&format!("  aliases: {}\n", command.aliases.join(", ")));
    }
    if let Some(group) = command.exclusive {
        rendered.push_str(&format!("  exclusive with other {group} options\n"));
    }
    rendered
}
