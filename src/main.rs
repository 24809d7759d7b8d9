//! Portfolio Engines CLI
//!
//! Command-line front end for the projection, payoff-decision and symbol-search engines

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use portfolio_engines::config::DEFAULT_SETTINGS_PATH;
use portfolio_engines::payoff::{DebtTrack, DecisionEngine, DecisionParams, TrackKind};
use portfolio_engines::projection::{Bucket, BucketConfig, BucketRates, ProjectionConfig, ProjectionPoint};
use portfolio_engines::symbols::{SymbolCatalog, SymbolMatcher};
use portfolio_engines::{ScenarioRunner, Settings};

#[derive(Debug, Parser)]
#[command(name = "portfolio-engines", version, about = "Portfolio calculator engines")]
struct Cli {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a principal with monthly contributions
    Project {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        /// Annual rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
        /// Only print the last month of each year
        #[arg(long)]
        yearly: bool,
    },
    /// Project several buckets with their own rates
    Buckets {
        /// NAME=PRINCIPAL, repeatable
        #[arg(long = "bucket", value_parser = parse_key_value)]
        buckets: Vec<(String, f64)>,
        /// NAME=RATE, repeatable; missing buckets use --default-rate
        #[arg(long = "rate-for", value_parser = parse_key_value)]
        rates: Vec<(String, f64)>,
        #[arg(long, default_value_t = 7.0)]
        default_rate: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
    },
    /// Compare paying down a mortgage with investing
    Decide {
        /// KIND:BALANCE:RATE:YEARS[:linked|:unlinked], repeatable
        #[arg(long = "track", value_parser = parse_track)]
        tracks: Vec<TrackArg>,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value_t = 7.0)]
        market_yield: f64,
        #[arg(long, default_value_t = 3.0)]
        inflation: f64,
        #[arg(long, default_value_t = 25.0)]
        tax: f64,
        #[arg(long)]
        horizon: Option<f64>,
    },
    /// Search a symbol catalog
    Search {
        /// Catalog file (.csv or .json)
        #[arg(long)]
        catalog: PathBuf,
        query: String,
    },
    /// Run one projection per annual rate
    Sweep {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        #[arg(long, default_value_t = 10)]
        years: u32,
        /// Comma-separated annual rates in percent
        #[arg(long, value_delimiter = ',')]
        rates: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
struct TrackArg {
    kind: TrackKind,
    balance: f64,
    rate: f64,
    years: f64,
    linked: Option<bool>,
}

fn parse_key_value(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {}", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number in {}", s))?;
    Ok((key.trim().to_string(), value))
}

fn parse_track(s: &str) -> Result<TrackArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 4 || parts.len() > 5 {
        return Err(format!("expected KIND:BALANCE:RATE:YEARS[:linked], got {}", s));
    }

    let kind = TrackKind::parse(parts[0]).ok_or_else(|| format!("unknown track kind: {}", parts[0]))?;
    let number = |field: &str| -> Result<f64, String> {
        field.trim().parse::<f64>().map_err(|_| format!("invalid number {} in {}", field, s))
    };
    let linked = match parts.get(4).map(|p| p.trim()) {
        None => None,
        Some("linked") => Some(true),
        Some("unlinked") => Some(false),
        Some(other) => return Err(format!("expected linked or unlinked, got {}", other)),
    };

    Ok(TrackArg {
        kind,
        balance: number(parts[1])?,
        rate: number(parts[2])?,
        years: number(parts[3])?,
        linked,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_json_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None if Path::new(DEFAULT_SETTINGS_PATH).exists() => Settings::from_json_path(Path::new(DEFAULT_SETTINGS_PATH))
            .with_context(|| format!("Failed to load settings from {}", DEFAULT_SETTINGS_PATH))?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Project {
            principal,
            contribution,
            rate,
            years,
            yearly,
        } => {
            let config = ProjectionConfig {
                initial_principal: principal.max(0.0),
                monthly_contribution: contribution.max(0.0),
                annual_rate_percent: rate.max(0.0),
                years,
            };
            let result = ScenarioRunner::with_settings(&settings).run(&config);
            let points = if yearly { result.yearly() } else { result.points.clone() };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                print_points(&points);
                let summary = result.summary(config.annual_rate_percent);
                println!("\nSummary:");
                println!("  Final Total: ${:.2}", summary.final_total);
                println!("  Contributions: ${:.2}", summary.total_contributions);
                println!("  Interest: ${:.2}", summary.total_interest);
                println!("  Effective Annual Rate: {:.4}%", summary.effective_annual_rate * 100.0);
            }
        }
        Command::Buckets {
            buckets,
            rates,
            default_rate,
            contribution,
            years,
        } => {
            let config = BucketConfig {
                buckets: buckets
                    .into_iter()
                    .map(|(name, principal)| Bucket::new(name, principal.max(0.0)))
                    .collect(),
                monthly_contribution: contribution.max(0.0),
                rates: rates
                    .into_iter()
                    .fold(BucketRates::new(default_rate), |acc, (name, rate)| acc.with_rate(name, rate)),
                years,
            };
            let result = ScenarioRunner::with_settings(&settings).engine().project_buckets(&config);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_points(&result.yearly());
                println!("\nBuckets:");
                println!("{:<16} {:>14} {:>8} {:>8} {:>16}", "Name", "Principal", "Rate", "Share", "Final");
                for b in &result.buckets {
                    println!(
                        "{:<16} {:>14.2} {:>7.2}% {:>7.2}% {:>16.2}",
                        b.name,
                        b.initial_principal,
                        b.annual_rate_percent,
                        b.contribution_share * 100.0,
                        b.final_value
                    );
                }
            }
        }
        Command::Decide {
            tracks,
            amount,
            market_yield,
            inflation,
            tax,
            horizon,
        } => {
            let tracks: Vec<DebtTrack> = tracks
                .into_iter()
                .enumerate()
                .map(|(idx, t)| {
                    let track = DebtTrack::new(idx as u32 + 1, t.kind, t.balance.max(0.0), t.rate.max(0.0), t.years.max(0.0));
                    match t.linked {
                        Some(linked) => track.with_inflation_linked(linked),
                        None => track,
                    }
                })
                .collect();
            let params = DecisionParams {
                investable_amount: amount.max(0.0),
                market_yield_percent: market_yield,
                horizon_years: horizon,
                inflation_percent: inflation,
                capital_gains_tax_percent: tax,
            };
            let decision = DecisionEngine::new(settings.payoff).decide(&tracks, &params);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                println!("Verdict: {}", decision.verdict);
                for warning in &decision.warnings {
                    println!("Warning: {}", warning);
                }
                if decision.verdict.is_comparison() {
                    println!("  Total Debt: ${:.2}", decision.total_debt);
                    println!("  Weighted Rate: {:.3}%", decision.weighted_rate);
                    println!("  Horizon: {:.1} years", decision.horizon_years);
                    println!("  Amount Compared: ${:.2}", decision.invest_amount);
                    for a in &decision.allocations {
                        println!(
                            "    Track {}: pay ${:.2} at {:.3}% for {:.1}y -> saves ${:.2}",
                            a.track_id, a.amount, a.effective_rate, a.years_used, a.profit
                        );
                    }
                    println!("  Mortgage Savings: ${:.2}", decision.mortgage_savings);
                    println!("  Investment Net Profit: ${:.2}", decision.investment.net_profit);
                    println!("  Investment Net CAGR: {:.3}%", decision.investment.net_cagr);
                    println!("  Advantage: ${:.2} ({:.2}%)", decision.advantage, decision.advantage_percent());
                    if let Some(y) = decision.break_even_yield {
                        println!("  Break-even Market Yield: {:.3}%", y);
                    }
                }
            }
        }
        Command::Search { catalog, query } => {
            let catalog = SymbolCatalog::load(&catalog)
                .with_context(|| format!("Failed to load catalog from {}", catalog.display()))?;
            let matcher = SymbolMatcher::new(settings.matcher);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&matcher.search(&catalog, &query))?);
            } else {
                let results = matcher.search_scored(&catalog, &query);
                if results.is_empty() {
                    println!("No matches for {:?}", query);
                }
                for c in results {
                    println!(
                        "{:>5} {:<14} {:<32} {:<6} {}",
                        c.score,
                        c.record.display_symbol.as_deref().unwrap_or(&c.record.symbol),
                        c.record.name,
                        c.record.currency,
                        c.reason
                    );
                }
            }
        }
        Command::Sweep {
            principal,
            contribution,
            years,
            rates,
        } => {
            if rates.is_empty() {
                bail!("--rates needs at least one value");
            }
            let base = ProjectionConfig {
                initial_principal: principal.max(0.0),
                monthly_contribution: contribution.max(0.0),
                annual_rate_percent: 0.0,
                years,
            };
            let results = ScenarioRunner::with_settings(&settings).sweep_rates(&base, &rates);

            if cli.json {
                let finals: Vec<_> = results
                    .iter()
                    .map(|(rate, res)| (rate, res.summary(*rate)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&finals)?);
            } else {
                println!("{:>8} {:>16} {:>16}", "Rate", "Final", "Interest");
                for (rate, res) in &results {
                    let last = res
                        .final_point()
                        .ok_or_else(|| anyhow!("empty projection for rate {}", rate))?;
                    println!("{:>7.2}% {:>16.2} {:>16.2}", rate, last.total, last.interest);
                }
            }
        }
    }

    Ok(())
}

fn print_points(points: &[ProjectionPoint]) {
    println!("{:>5} {:>4} {:>16} {:>16} {:>16}", "Month", "Year", "Total", "Contributions", "Interest");
    println!("{}", "-".repeat(61));
    for p in points {
        println!(
            "{:>5} {:>4} {:>16.2} {:>16.2} {:>16.2}",
            p.month, p.year, p.total, p.contributions, p.interest
        );
    }
}
