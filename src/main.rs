use clap::Parser;
use reqcap::{
    diff_snapshot, evaluate_assert, export_lines, format_output, ExportSpec, FilterConfig,
    ReqcapError, Response, SnapshotStore,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Inspect a captured HTTP response: filter it, export values, check
/// assertions, save snapshots and diff against them.
#[derive(Parser, Debug)]
#[command(name = "reqcap", author, version, about)]
struct Args {
    /// Captured response ({"status_code", "headers", "body"}). Reads stdin when omitted or `-`.
    input: Option<PathBuf>,
    /// Treat the input as a raw response body rather than a capture record.
    #[arg(long)]
    body_only: bool,
    /// Status code to assume with --body-only.
    #[arg(long, default_value_t = 200)]
    status: u16,
    /// Comma-separated body fields to keep, e.g. "id,data[].email".
    #[arg(short = 'f', long)]
    filter: Option<String>,
    /// Filter config as JSON: {"status", "headers", "body_fields"}. Ignored with -f.
    #[arg(long)]
    filter_config: Option<String>,
    /// Show response headers.
    #[arg(short, long)]
    verbose: bool,
    /// Print only the body.
    #[arg(long)]
    raw: bool,
    /// Export a value for the shell: NAME=PATH, or NAME for body.NAME.
    #[arg(long = "export", value_name = "SPEC")]
    exports: Vec<String>,
    /// Prefix for exported variable names.
    #[arg(long, default_value = "reqcap")]
    export_prefix: String,
    /// Assertion such as status=200 or "body.count!=0". Exits 1 on the first failure.
    #[arg(long = "assert", value_name = "EXPR")]
    asserts: Vec<String>,
    /// Save the response as a named snapshot.
    #[arg(long, value_name = "NAME")]
    snapshot: Option<String>,
    /// Diff the response against a saved snapshot. Exits 1 on differences.
    #[arg(long, value_name = "NAME")]
    diff: Option<String>,
    /// List saved snapshots and exit.
    #[arg(long)]
    list_snapshots: bool,
    #[arg(long, default_value = "snapshots")]
    snapshots_dir: PathBuf,
    /// Log level for diagnostics on stderr.
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e @ ReqcapError::InvalidExpression(_)) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> reqcap::Result<ExitCode> {
    let store = SnapshotStore::new(&args.snapshots_dir);

    if args.list_snapshots {
        list_snapshots(&store)?;
        return Ok(ExitCode::SUCCESS);
    }

    let text = read_input(args.input.as_ref())?;
    let response = if args.body_only {
        Response::from_text(args.status, &text)
    } else {
        serde_json::from_str::<Response>(&text)?
    };

    let filter_config = match (&args.filter, &args.filter_config) {
        (Some(fields), _) => Some(FilterConfig::from_fields(fields, args.verbose)),
        (None, Some(json)) => Some(serde_json::from_str::<FilterConfig>(json)?),
        (None, None) => None,
    };
    println!("{}", format_output(&response, filter_config.as_ref(), args.verbose, args.raw));

    for expr in &args.asserts {
        let outcome = evaluate_assert(expr, &response)?;
        if !outcome.passed {
            eprintln!("{}", outcome.message);
            return Ok(ExitCode::FAILURE);
        }
    }

    let exports = args.exports.iter().map(|s| ExportSpec::parse(s)).collect::<Vec<_>>();
    for line in export_lines(&response, &exports, &args.export_prefix) {
        eprintln!("{line}");
    }

    if let Some(name) = &args.snapshot {
        let path = store.save(name, &response)?;
        eprintln!("Snapshot saved: {}", path.display());
    }

    if let Some(name) = &args.diff {
        let snapshot = match store.load(name) {
            Ok(snapshot) => snapshot,
            Err(ReqcapError::SnapshotNotFound(_)) => {
                eprintln!("Snapshot '{name}' not found.");
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => return Err(e),
        };
        let diffs = diff_snapshot(&snapshot, &response);
        if !diffs.is_empty() {
            eprintln!("Differences found:");
            for line in diffs {
                eprintln!("  {line}");
            }
            return Ok(ExitCode::FAILURE);
        }
        eprintln!("No differences.");
    }

    Ok(ExitCode::SUCCESS)
}

fn read_input(input: Option<&PathBuf>) -> reqcap::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn list_snapshots(store: &SnapshotStore) -> reqcap::Result<()> {
    let snapshots = store.list()?;
    if snapshots.is_empty() {
        println!("No snapshots found in: {}", store.dir().display());
        return Ok(());
    }
    println!("Snapshots from: {}\n", store.dir().display());
    for snap in snapshots {
        println!("  {}  ({})", snap.name, snap.saved_at);
    }
    Ok(())
}
