use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use itertools::Itertools;
use ropey::Rope;
use tracing_subscriber::EnvFilter;

use strand::{Compare, Pattern, Source, builtin};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("select").required(true).args(["pattern", "comment", "string", "regex"])))]
struct Args {
    /// Input file; standard input when omitted
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Built-in pattern to search for
    #[arg(short = 'p', long, value_name = "NAME")]
    pattern: Option<String>,

    /// Search for line comments starting with DELIM
    #[arg(short = 'c', long, value_name = "DELIM")]
    comment: Option<String>,

    /// Search for string literals enclosed in DELIM
    #[arg(short = 's', long, value_name = "DELIM")]
    string: Option<String>,

    /// Escape sequence inside string literals
    #[arg(short = 'e', long, value_name = "ESC", requires = "string")]
    escape: Option<String>,

    /// Search with an anchored regular expression
    #[arg(short = 'r', long, value_name = "EXPR")]
    regex: Option<String>,

    /// Compare literals without regard to case
    #[arg(short = 'i', long)]
    ignore_case: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("strand: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Scan the input and print every match. Returns whether anything matched.
fn run(args: &Args) -> Result<bool> {
    let mut pattern = select(args)?;
    if args.ignore_case {
        pattern = pattern.with(Compare::CaseInsensitive);
    }
    tracing::debug!(%pattern, "selected pattern");

    let rope = match &args.file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
            Rope::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to read {path}"))?
        }
        None => Rope::from_reader(io::stdin().lock()).context("failed to read stdin")?,
    };

    let mut out = io::stdout().lock();
    let mut matched = false;
    for (index, line) in rope.lines().enumerate() {
        let mut source = if args.ignore_case {
            Source::folded(&line.to_string())
        } else {
            Source::from(line)
        };
        while !source.is_eof() {
            let result = pattern.consume_source(&mut source);
            if result.is_success() && !result.is_empty() {
                writeln!(
                    out,
                    "{}:{}: {}",
                    index + 1,
                    result.start() + 1,
                    result.text(&source)
                )?;
                matched = true;
            } else {
                source.read();
            }
        }
    }
    Ok(matched)
}

fn select(args: &Args) -> Result<Pattern> {
    if let Some(name) = &args.pattern {
        let Some(pattern) = builtin::by_name(name) else {
            bail!(
                "unknown pattern `{name}`; expected one of: {}",
                builtin::BY_NAME.keys().sorted().join(", ")
            );
        };
        return Ok(pattern);
    }
    if let Some(delimiter) = &args.comment {
        return Ok(Pattern::line_comment(delimiter)?);
    }
    if let Some(delimiter) = &args.string {
        return Ok(match &args.escape {
            Some(escape) => Pattern::string_literal_escaped(delimiter, escape)?,
            None => Pattern::string_literal(delimiter)?,
        });
    }
    if let Some(expression) = &args.regex {
        return Pattern::regex(expression).context("invalid --regex expression");
    }
    bail!("no pattern selected")
}
