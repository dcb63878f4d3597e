//! CLI entry point for `qidtrace`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

use qidtrace::config::Config;
use qidtrace::lookup::trace_message;
use qidtrace::output::json::{not_found_json, record_json};
use qidtrace::output::report::render_report;
use qidtrace::output::style::{ColorMode, Palette};
use qidtrace::parser::filter::QidMatcher;
use qidtrace::source::{parse_log_date, LogSource};

/// Search the mail gateway log for one message and print what happened to it.
#[derive(Parser)]
#[command(name = "qidtrace", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Queue id of the message
    ///
    /// Put `--` before a QID spelled like a subcommand (`completions`, `manpage`).
    #[arg(value_name = "QID")]
    qid: Option<String>,

    /// Day the message was processed (defaults to today)
    #[arg(short, long, value_name = "YYYYMMDD", value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Live log file
    #[arg(long, value_name = "PATH", env = "QIDTRACE_LIVE_LOG")]
    live_log: Option<PathBuf>,

    /// Archive path template; the placeholder is replaced by the archive date
    #[arg(long, value_name = "TEMPLATE", env = "QIDTRACE_ARCHIVE_LOG")]
    archive_log: Option<String>,

    /// Treat the QID as a regular expression instead of a literal string
    #[arg(long)]
    pattern: bool,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,

    /// When to use colors
    #[arg(long, value_enum, value_name = "WHEN")]
    color: Option<ColorMode>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Options for a single lookup, after merging CLI and config.
struct TraceOptions {
    qid: String,
    date: Option<NaiveDate>,
    pattern: bool,
    json: bool,
    color: ColorMode,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_log_date(raw).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let mut config = qidtrace::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    match cli.command {
        Some(Commands::Completions { shell }) => return cmd_completions(shell),
        Some(Commands::Manpage) => return cmd_manpage(),
        None => {}
    }

    let Some(qid) = cli.qid else {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "the QID argument is required",
            )
            .exit();
    };

    if let Some(live_log) = cli.live_log {
        config.sources.live_log = live_log;
    }
    if let Some(archive_log) = cli.archive_log {
        config.sources.archive_log = archive_log;
    }

    let options = TraceOptions {
        qid,
        date: cli.date,
        pattern: cli.pattern,
        json: cli.json,
        color: cli
            .color
            .unwrap_or_else(|| ColorMode::from_config(&config.display.color)),
    };
    cmd_trace(&options, &config)
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = qidtrace::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "qidtrace.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "qidtrace", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Look up one QID and print the report.
fn cmd_trace(options: &TraceOptions, config: &Config) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let source = LogSource::resolve(options.date, today, &config.sources);

    let matcher = if options.pattern {
        QidMatcher::pattern(&options.qid)?
    } else {
        QidMatcher::literal(&options.qid)
    };

    match trace_message(
        &options.qid,
        &matcher,
        &source,
        config.performance.read_buffer_size,
    ) {
        Ok(record) => {
            if options.json {
                println!("{}", record_json(&record)?);
            } else {
                print!("{}", render_report(&record, &Palette::for_mode(options.color)));
            }
            Ok(())
        }
        Err(err) if !err.is_fatal() => {
            if options.json {
                println!("{}", not_found_json(&options.qid, &source.display_name())?);
            } else {
                println!("{err}");
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
