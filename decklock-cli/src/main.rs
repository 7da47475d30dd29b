mod driver;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use decklock_game::{Catalog, GameSession, format_clock};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use driver::{Driver, parse_command};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary
    Console,
    /// Machine-readable summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "decklock-cli", version)]
#[command(about = "Headless play-test driver for the Decklock escape-room engine")]
struct Args {
    /// Deck JSON file; defaults to the embedded standard deck
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Override the starting clock, in seconds
    #[arg(long)]
    seconds: Option<u32>,

    /// Script file with one command per line instead of interactive stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Report format printed when the run ends
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    match &args.deck {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading deck file {}", path.display()))?;
            Catalog::from_json(&json)
                .with_context(|| format!("validating deck file {}", path.display()))
        }
        None => Catalog::standard().context("validating the embedded standard deck"),
    }
}

fn run_script(driver: &mut Driver, lines: impl Iterator<Item = String>) {
    for line in lines {
        let Some(parsed) = parse_command(&line) else {
            continue;
        };
        match parsed {
            Ok(command) => {
                if !driver.apply(command) {
                    break;
                }
            }
            Err(message) => log::warn!("{message}"),
        }
        if !driver.running() {
            break;
        }
    }
}

fn run_interactive(driver: &mut Driver) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let Some(parsed) = parse_command(&line) else {
            continue;
        };
        match parsed {
            Ok(command) => {
                if !driver.apply(command) {
                    break;
                }
            }
            Err(message) => println!("{}", message.red()),
        }
        if !driver.running() {
            break;
        }
    }
    Ok(())
}

fn print_report(report: &driver::RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Console => {
            println!();
            println!("{}", "=== Run report ===".bold());
            println!("commands:  {}", report.commands);
            println!("clock:     {}", format_clock(report.remaining_seconds));
            println!("owned:     {}", report.owned.join(", "));
            println!("revealed:  {}", report.revealed.join(", "));
            println!("completed: {}", report.completed.join(", "));
            match report.ending {
                Some(ending) => println!("ending:    {ending}"),
                None => println!("ending:    (still running)"),
            }
            if !report.notes.is_empty() {
                println!("notes:");
                for line in report.notes.lines() {
                    println!("  {line}");
                }
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("serializing run report")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let catalog = Rc::new(load_catalog(&args)?);
    log::info!(
        "deck loaded: {} cards, clock {}",
        catalog.cards().count(),
        format_clock(args.seconds.unwrap_or_else(|| catalog.starting_seconds())),
    );

    let session = match args.seconds {
        Some(seconds) => GameSession::with_clock(catalog, seconds),
        None => GameSession::new(catalog),
    };
    let mut driver = Driver::new(session);

    match &args.script {
        Some(path) => {
            let script = fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            run_script(&mut driver, script.lines().map(str::to_string));
        }
        None => run_interactive(&mut driver)?,
    }

    print_report(&driver.report(), args.report)
}
