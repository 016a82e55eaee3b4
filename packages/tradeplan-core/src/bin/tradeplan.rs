//! Tradeplan CLI - Command line front end for trade planning.
//!
//! Prints the text report by default, or an `ApiResponse` JSON envelope with `--json`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tradeplan_core::{
    candidates::{filter_by_close, read_candidates, write_candidates, StaticPriceSource},
    plan::plan_portfolio,
    report::{feasibility_message, render_text},
    risk::{required_win_rate, reward_tiers},
    ApiResponse, PlannerConfig, RiskParameters, WinRateFeasibility,
};

#[derive(Parser)]
#[command(name = "tradeplan")]
#[command(about = "Tradeplan CLI - risk budgeting and per-trade planning")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.tradeplan/config.toml or $TRADEPLAN_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a trade plan for the candidate list
    Plan {
        /// Candidate file with ticker,buy_price columns
        #[arg(long)]
        csv: Option<PathBuf>,
        #[command(flatten)]
        risk: RiskArgs,
    },
    /// Solve for the win rate required to cover monthly bills
    WinRate {
        #[arg(long)]
        bills: f64,
        /// Trades per month
        #[arg(long)]
        trades: u32,
        #[arg(long)]
        risk_per_trade: f64,
        #[arg(long)]
        reward_ratio: f64,
    },
    /// Show 1:1 through 4:1 rewards for a risked amount
    Tiers {
        #[arg(long)]
        risk: f64,
    },
    /// List the persisted candidates
    Candidates {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Screen symbols against a quotes file and persist the survivors
    Screen {
        /// Quotes file in the same ticker,buy_price format
        #[arg(long)]
        quotes: PathBuf,
        /// Symbols to screen (comma-separated, defaults to the configured watchlist)
        #[arg(long)]
        symbols: Option<String>,
        /// Highest last close to keep
        #[arg(long)]
        max_price: Option<f64>,
        /// Where to write the candidates
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

/// Overrides for the configured risk parameters.
#[derive(Args)]
struct RiskArgs {
    #[arg(long)]
    balance: Option<f64>,
    #[arg(long)]
    bills: Option<f64>,
    /// Estimated trades per month
    #[arg(long)]
    trades: Option<u32>,
    /// Max portfolio risk as a fraction (0.25 = 25%)
    #[arg(long)]
    max_risk: Option<f64>,
    /// Risk per trade as a fraction of max portfolio risk
    #[arg(long)]
    risk_per_trade: Option<f64>,
    #[arg(long)]
    reward_ratio: Option<f64>,
}

impl RiskArgs {
    fn apply(&self, mut params: RiskParameters) -> RiskParameters {
        if let Some(v) = self.balance {
            params.starting_balance = v;
        }
        if let Some(v) = self.bills {
            params.monthly_bills = v;
        }
        if let Some(v) = self.trades {
            params.estimated_trades_per_month = v;
        }
        if let Some(v) = self.max_risk {
            params.max_portfolio_risk_pct = v;
        }
        if let Some(v) = self.risk_per_trade {
            params.risk_per_trade_pct = v;
        }
        if let Some(v) = self.reward_ratio {
            params.reward_to_risk_ratio = v;
        }
        params
    }
}

/// Either rendered text or a JSON payload for the success envelope.
enum Output {
    Text(String),
    Json(serde_json::Value),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json_mode = cli.json;
    let config_path = cli.config.unwrap_or_else(PlannerConfig::default_path);

    match run(cli.command, &config_path, json_mode) {
        Ok(Output::Text(text)) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(Output::Json(value)) => print_json(&ApiResponse::ok(value)),
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            if json_mode {
                print_json(&ApiResponse::<()>::err(format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(response: &ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(text) => {
            println!("{}", text);
            if response.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: failed to encode response: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config_path: &Path, json_mode: bool) -> anyhow::Result<Output> {
    // `config --init` replaces whatever is on disk, so an unreadable file must not block it.
    if let Commands::Config { init: true } = command {
        let defaults = PlannerConfig::default();
        defaults
            .save(config_path)
            .with_context(|| format!("failed to write config to '{}'", config_path.display()))?;
        return handle_config(defaults, config_path, json_mode);
    }

    let config = PlannerConfig::load(config_path)
        .with_context(|| format!("failed to load config from '{}'", config_path.display()))?;

    match command {
        Commands::Plan { csv, risk } => handle_plan(&config, csv, &risk, json_mode),
        Commands::WinRate {
            bills,
            trades,
            risk_per_trade,
            reward_ratio,
        } => handle_win_rate(bills, trades, risk_per_trade, reward_ratio, json_mode),
        Commands::Tiers { risk } => handle_tiers(risk, json_mode),
        Commands::Candidates { csv } => handle_candidates(&config, csv, json_mode),
        Commands::Screen {
            quotes,
            symbols,
            max_price,
            output,
        } => handle_screen(&config, &quotes, symbols, max_price, output, json_mode),
        Commands::Config { .. } => handle_config(config, config_path, json_mode),
    }
}

fn handle_plan(
    config: &PlannerConfig,
    csv: Option<PathBuf>,
    risk: &RiskArgs,
    json_mode: bool,
) -> anyhow::Result<Output> {
    let path = csv.unwrap_or_else(|| config.candidates_file.clone());
    let params = risk.apply(config.risk.clone());

    let candidates = read_candidates(&path)
        .with_context(|| format!("failed to read candidates from '{}'", path.display()))?;
    let summary = plan_portfolio(&params, &candidates)
        .with_context(|| format!("cannot plan trades from '{}'", path.display()))?;

    if !summary.figures.feasibility().is_feasible() {
        tracing::warn!(
            required_win_rate = summary.figures.required_win_rate,
            "required win rate outside 0% to 100%"
        );
    }

    if json_mode {
        Ok(Output::Json(json!({
            "summary": summary,
            "feasibility": summary.figures.feasibility(),
        })))
    } else {
        Ok(Output::Text(render_text(&summary)))
    }
}

fn handle_win_rate(
    bills: f64,
    trades: u32,
    risk_per_trade: f64,
    reward_ratio: f64,
    json_mode: bool,
) -> anyhow::Result<Output> {
    let rate = required_win_rate(bills, trades, risk_per_trade, reward_ratio)?;
    let feasibility = WinRateFeasibility::classify(rate);

    if json_mode {
        return Ok(Output::Json(json!({
            "required_win_rate": rate,
            "feasibility": feasibility,
        })));
    }

    Ok(Output::Text(format!(
        "Required win rate: {:.2}%\n{}",
        rate * 100.0,
        feasibility_message(feasibility)
    )))
}

fn handle_tiers(risk: f64, json_mode: bool) -> anyhow::Result<Output> {
    let tiers = reward_tiers(risk);

    if json_mode {
        return Ok(Output::Json(json!({ "tiers": tiers })));
    }

    let lines: Vec<String> = tiers
        .iter()
        .map(|t| format!("{} => ${:.2}", t.label, t.reward))
        .collect();
    Ok(Output::Text(lines.join("\n")))
}

fn handle_candidates(
    config: &PlannerConfig,
    csv: Option<PathBuf>,
    json_mode: bool,
) -> anyhow::Result<Output> {
    let path = csv.unwrap_or_else(|| config.candidates_file.clone());
    let candidates = read_candidates(&path)
        .with_context(|| format!("failed to read candidates from '{}'", path.display()))?;

    if json_mode {
        return Ok(Output::Json(json!({
            "path": path,
            "candidates": candidates,
        })));
    }

    if candidates.is_empty() {
        return Ok(Output::Text(format!(
            "No companies found in '{}'.",
            path.display()
        )));
    }

    let lines: Vec<String> = candidates
        .iter()
        .map(|c| format!("{:<8} ${:.2}", c.ticker, c.reference_price))
        .collect();
    Ok(Output::Text(lines.join("\n")))
}

fn handle_screen(
    config: &PlannerConfig,
    quotes: &Path,
    symbols: Option<String>,
    max_price: Option<f64>,
    output: Option<PathBuf>,
    json_mode: bool,
) -> anyhow::Result<Output> {
    let symbols: Vec<String> = match symbols {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.watchlist.clone(),
    };
    let max_price = max_price.unwrap_or(config.max_close_price);
    let output = output.unwrap_or_else(|| config.candidates_file.clone());

    let quotes_list = read_candidates(quotes)
        .with_context(|| format!("failed to read quotes from '{}'", quotes.display()))?;
    let source = StaticPriceSource::from_candidates(&quotes_list);

    let survivors = filter_by_close(&source, symbols.as_slice(), max_price)?;
    write_candidates(&output, &survivors)
        .with_context(|| format!("failed to write candidates to '{}'", output.display()))?;

    if json_mode {
        return Ok(Output::Json(json!({
            "output": output,
            "max_price": max_price,
            "candidates": survivors,
        })));
    }

    Ok(Output::Text(format!(
        "Filtered stocks saved to '{}' ({} of {} symbols at or below ${:.2}).",
        output.display(),
        survivors.len(),
        symbols.len(),
        max_price
    )))
}

fn handle_config(
    config: PlannerConfig,
    config_path: &Path,
    json_mode: bool,
) -> anyhow::Result<Output> {
    if json_mode {
        return Ok(Output::Json(json!({
            "path": config_path,
            "config": config,
        })));
    }

    Ok(Output::Text(format!(
        "# {}\n{}",
        config_path.display(),
        config.to_toml()?
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_init_overwrites_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "risk = [").unwrap();

        let output = run(Commands::Config { init: true }, &path, false).unwrap();
        assert!(matches!(output, Output::Text(text) if text.starts_with("# ")));

        let reloaded = PlannerConfig::load(&path).unwrap();
        assert_eq!(reloaded, PlannerConfig::default());
    }

    #[test]
    fn test_config_show_reports_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "risk = [").unwrap();

        let err = match run(Commands::Config { init: false }, &path, false) {
            Ok(_) => panic!("malformed config should not load"),
            Err(e) => e,
        };
        assert!(format!("{:#}", err).contains("failed to load config"));
    }
}
