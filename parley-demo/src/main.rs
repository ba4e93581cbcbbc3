mod error;

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::NaiveDateTime;
use lazy_format::lazy_format;
use parley::{Parse, SpecialCommandHandler, Value};
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::ByteSize;

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Debug,
    Info,
    #[parley(name = "warn")]
    Warning,
    Error,
}

impl Level {
    fn of_line(line: &str) -> Option<Self> {
        [Level::Error, Level::Warning, Level::Info, Level::Debug]
            .into_iter()
            .find(|level| {
                let marker = match level {
                    Level::Debug => "DEBUG",
                    Level::Info => "INFO",
                    Level::Warning => "WARN",
                    Level::Error => "ERROR",
                };

                line.contains(marker)
            })
    }
}

#[derive(Default)]
struct License;

impl SpecialCommandHandler for License {
    fn handle_command(&self) -> i32 {
        println!("logsift is distributed under the terms of the MPL-2.0.");
        0
    }
}

/// Search log files for matching lines.
#[derive(Parse, Debug)]
#[parley(
    name = "logsift",
    copyright = "2026 The Parley Developers",
    command(
        handler = "License",
        alias = "--license",
        description = "Show license information"
    )
)]
struct Arguments {
    /// Print the file and line number of each match
    #[parley(short, long)]
    verbose: bool,

    /// Highlight matches in the output
    #[parley(long)]
    color: Option<bool>,

    /// Hide entries below this severity
    #[parley(short, long, default = Level::Info)]
    level: Level,

    /// Only show entries with a timestamp after this one
    #[parley(long)]
    since: Option<NaiveDateTime>,

    /// Stop reading each file after this many bytes (e.g. 64k, 2M)
    #[parley(long)]
    max_size: Option<ByteSize>,

    /// Only show entries that also contain these tags. Give them all after
    /// one flag, as in `--tag db net`.
    #[parley(short, long = "tag")]
    tags: Vec<String>,

    /// The text to search for
    pattern: String,

    /// Files to search. Reads stdin if there are none.
    #[parley(remaining, name = "file")]
    files: Vec<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// The timestamp at the start of a log line, like `2026-01-02 03:04:05`
fn line_timestamp(line: &str) -> Option<NaiveDateTime> {
    let stamp = line.get(..19)?;
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").ok()
}

fn matches(args: &Arguments, line: &str) -> bool {
    if !line.contains(&args.pattern) {
        return false;
    }

    if !args.tags.iter().all(|tag| line.contains(tag.as_str())) {
        return false;
    }

    if Level::of_line(line).is_some_and(|level| level < args.level) {
        return false;
    }

    match (args.since, line_timestamp(line)) {
        (Some(since), Some(stamp)) => stamp > since,
        _ => true,
    }
}

fn search(args: &Arguments, name: &str, input: impl Read) -> anyhow::Result<usize> {
    let limit = args.max_size.map_or(u64::MAX, |ByteSize(limit)| limit);
    let input = input.take(limit);

    let color = args.color.unwrap_or(false);
    let mut count = 0;

    for (number, line) in BufReader::new(input).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read from {name}"))?;

        if !matches(args, &line) {
            continue;
        }

        count += 1;

        let line_number = number + 1;
        let location = lazy_format!(match (args.verbose) {
            true => "{name}:{line_number}: ",
            false => "",
        });

        if color {
            let highlighted = line.replace(
                args.pattern.as_str(),
                &format!("\x1b[1;31m{}\x1b[0m", args.pattern),
            );
            println!("{location}{highlighted}");
        } else {
            println!("{location}{line}");
        }
    }

    tracing::debug!(name, count, "finished input");
    Ok(count)
}

fn search_file(args: &Arguments, path: &Path) -> anyhow::Result<usize> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    search(args, &path.display().to_string(), file)
}

#[parley::main]
fn main(args: Arguments) -> anyhow::Result<()> {
    init_tracing();
    tracing::debug!(?args, "parsed arguments");

    let total = if args.files.is_empty() {
        search(&args, "<stdin>", io::stdin().lock())?
    } else {
        args.files
            .iter()
            .map(|path| search_file(&args, path))
            .sum::<anyhow::Result<usize>>()?
    };

    if total == 0 {
        tracing::info!("no matches");
    }

    Ok(())
}
