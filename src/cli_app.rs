//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::config::Config;
use crate::core::errors::{Result, SigError};
use crate::core::states::State;
use crate::logger::jsonl::{RunLog, ScoreRunRecord};
use crate::signals::{PHYSICAL_SIGNAL, PhysicalScorer, ScoreMap, SignalProvider};

/// Width of the score bar in table output.
const BAR_WIDTH: usize = 24;

/// State signals: per-state physical climate scores.
#[derive(Parser, Debug)]
#[command(name = "ssig", version, about)]
pub struct Cli {
    /// Config file (defaults to $SSIG_CONFIG, then ~/.config/ssig/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Emit machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the physical score for every state.
    Scores {
        /// Dataset file overriding `[data].path` (TOML or JSON).
        #[arg(long, value_name = "PATH")]
        data: Option<PathBuf>,
        /// Row order for table output.
        #[arg(long, value_enum, default_value_t = SortOrder::Score)]
        sort: SortOrder,
    },
    /// List every state code and name.
    States,
    /// Show configuration.
    Config {
        /// Defaults to `show`.
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `ssig config` actions.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
}

/// Table row order for `ssig scores`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest score first.
    #[default]
    Score,
    /// Enumeration order.
    State,
}

#[derive(Serialize)]
struct StateEntry {
    code: &'static str,
    name: &'static str,
}

/// Load config for `cli`, applying command-line overrides.
pub fn effective_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Command::Scores {
        data: Some(path), ..
    } = &cli.command
    {
        config.data.path = Some(path.clone());
        config.data.sha256 = None;
    }
    Ok(config)
}

/// Dispatch CLI commands against an already-loaded config.
///
/// # Errors
/// Returns an error if the subcommand fails.
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    match &cli.command {
        Command::Scores { sort, .. } => run_scores(config, *sort, cli.json).await,
        Command::States => print_states(cli.json),
        Command::Config { .. } => print_config(config, cli.json),
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "ssig", &mut io::stdout());
            Ok(())
        }
    }
}

async fn run_scores(config: &Config, sort: SortOrder, json: bool) -> Result<()> {
    let scorer = PhysicalScorer::from_config(config)?;
    let source = scorer.source_description();
    let started = Instant::now();
    let scores = scorer.scores().await?;

    if let Some(path) = &config.logging.jsonl_path {
        let record = ScoreRunRecord::from_scores(
            PHYSICAL_SIGNAL,
            &source,
            &scores,
            started.elapsed(),
            Utc::now(),
        );
        RunLog::new(path).append_or_warn(&record);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        print_score_table(&scores, sort);
    }
    Ok(())
}

fn print_score_table(scores: &ScoreMap, sort: SortOrder) {
    let rows = match sort {
        SortOrder::Score => scores.ranked(),
        SortOrder::State => scores.iter().collect(),
    };
    println!("{:>4}  {:<4}{:<16}{:>7}", "#", "CODE", "STATE", "SCORE");
    for (rank, (state, score)) in rows.into_iter().enumerate() {
        println!(
            "{:>4}  {:<4}{:<16}{:>7.3}  {}",
            rank + 1,
            state.code(),
            state.name(),
            score,
            score_bar(score)
        );
    }
    let summary = scores.summary();
    println!(
        "\n{} states  min {:.3}  max {:.3}  mean {:.3}",
        scores.len(),
        summary.min,
        summary.max,
        summary.mean
    );
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn score_bar(score: f64) -> ColoredString {
    let filled = (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    let bar = "█".repeat(filled);
    if score >= 0.75 {
        bar.green()
    } else if score >= 0.4 {
        bar.yellow()
    } else {
        bar.red()
    }
}

fn print_states(json: bool) -> Result<()> {
    if json {
        let entries: Vec<StateEntry> = State::ALL
            .iter()
            .map(|state| StateEntry {
                code: state.code(),
                name: state.name(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for state in State::ALL {
            println!("{}  {}", state.code().bold(), state.name());
        }
    }
    Ok(())
}

fn print_config(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}

/// Render an error for stderr with its stable code.
#[must_use]
pub fn render_error(err: &SigError) -> String {
    format!("error: {err}")
}
