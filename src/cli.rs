//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::csv_signal_log::CsvSignalLog;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_engine_config;
use crate::domain::decision::{Action, TradingDecision, make_decision};
use crate::domain::error::HybridTraderError;
use crate::domain::macro_factors::{MacroScorer, MacroSentiment};
use crate::domain::order::{TradeOrder, build_order};
use crate::domain::rolling::compute_rolling_stats;
use crate::domain::settings::{
    AllocationConfig, EngineConfig, FactorWeights, MacroConfig, QuoteSymbols, RiskConfig,
    TradingConfig,
};
use crate::domain::signal::{TechnicalSignal, classify};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "hybridtrader",
    about = "Daily mean-reversion signals fused with macro sentiment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full analysis pipeline and print a trading decision
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Price cache CSV (overrides [data] price_file)
        #[arg(long)]
        prices: Option<PathBuf>,
        /// Current policy rate (%)
        #[arg(long)]
        policy_rate: Option<f64>,
        /// Previous policy rate (%)
        #[arg(long)]
        previous_policy_rate: Option<f64>,
        /// Net institutional flow
        #[arg(long)]
        net_flow: Option<f64>,
        /// Skip the quote cache; auto factors stay neutral
        #[arg(long)]
        offline: bool,
        /// Signal log CSV (overrides [data] signal_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the price cache data range
    Info {
        #[arg(short, long)]
        config: PathBuf,
        /// Price cache CSV (overrides [data] price_file)
        #[arg(long)]
        prices: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            prices,
            policy_rate,
            previous_policy_rate,
            net_flow,
            offline,
            output,
        } => {
            let manual = ManualFactors {
                policy_rate,
                previous_policy_rate,
                net_flow,
            };
            run_analyze(
                &config,
                prices.as_ref(),
                &manual,
                offline,
                output.as_ref(),
            )
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, prices } => run_info(&config, prices.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = HybridTraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the engine configuration in one pass. Runs after
/// [`validate_engine_config`], so defaults and ranges are already settled.
pub fn build_engine_config(adapter: &dyn ConfigPort) -> EngineConfig {
    // only the magnitude of the buy threshold drives classification; an
    // asymmetric sell threshold is accepted but ignored
    let zscore_threshold = adapter
        .get_double("trading", "zscore_buy_threshold", -2.0)
        .abs();

    EngineConfig {
        trading: TradingConfig {
            symbol: adapter
                .get_string("trading", "symbol")
                .unwrap_or_else(|| "NIFTY50".to_string()),
            lookback_period: adapter.get_int("trading", "lookback_period", 20) as usize,
            zscore_threshold,
            capital_base: adapter.get_double("trading", "capital_base", 100_000.0),
        },
        macro_factors: MacroConfig {
            weights: FactorWeights {
                policy_rate: adapter.get_int("macro_weights", "policy_rate", 3),
                capital_flow: adapter.get_int("macro_weights", "capital_flow", 2),
                global_index: adapter.get_int("macro_weights", "global_index", 2),
                fx_rate: adapter.get_int("macro_weights", "fx_rate", 1),
                volatility_index: adapter.get_int("macro_weights", "volatility_index", 2),
            },
            bullish_threshold: adapter.get_int("macro_thresholds", "bullish", 3),
            bearish_threshold: adapter.get_int("macro_thresholds", "bearish", -3),
            symbols: QuoteSymbols {
                global_index: adapter
                    .get_string("macro_symbols", "global_index")
                    .unwrap_or_else(|| "^GSPC".to_string()),
                fx_rate: adapter
                    .get_string("macro_symbols", "fx_rate")
                    .unwrap_or_else(|| "INR=X".to_string()),
                volatility_index: adapter
                    .get_string("macro_symbols", "volatility_index")
                    .unwrap_or_else(|| "^INDIAVIX".to_string()),
            },
        },
        allocation: AllocationConfig {
            high: adapter.get_double("allocation", "high", 80.0),
            medium: adapter.get_double("allocation", "medium", 50.0),
            low: adapter.get_double("allocation", "low", 20.0),
        },
        risk: RiskConfig {
            stop_loss_pct: adapter.get_double("risk", "stop_loss_pct", 1.0),
            exit_time: adapter
                .get_string("risk", "exit_time")
                .unwrap_or_else(|| "15:15".to_string()),
        },
    }
}

#[derive(Debug, Default, Clone)]
pub struct ManualFactors {
    pub policy_rate: Option<f64>,
    pub previous_policy_rate: Option<f64>,
    pub net_flow: Option<f64>,
}

fn config_double(adapter: &dyn ConfigPort, section: &str, key: &str) -> Option<f64> {
    adapter
        .get_string(section, key)
        .and_then(|s| s.trim().parse().ok())
}

/// CLI flags win over `[macro]` config keys; with neither, a factor stays
/// unset and votes neutral.
pub fn resolve_manual_factors(flags: &ManualFactors, adapter: &dyn ConfigPort) -> ManualFactors {
    ManualFactors {
        policy_rate: flags
            .policy_rate
            .or_else(|| config_double(adapter, "macro", "policy_rate")),
        previous_policy_rate: flags
            .previous_policy_rate
            .or_else(|| config_double(adapter, "macro", "previous_policy_rate")),
        net_flow: flags
            .net_flow
            .or_else(|| config_double(adapter, "macro", "net_flow")),
    }
}

fn run_analyze(
    config_path: &PathBuf,
    prices_override: Option<&PathBuf>,
    manual_flags: &ManualFactors,
    offline: bool,
    output_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = build_engine_config(&adapter);

    // Stage 2: load and sanitize the price series
    let price_path = match resolve_price_path(prices_override, &adapter) {
        Some(p) => p,
        None => {
            eprintln!("error: no price file configured");
            return ExitCode::from(2);
        }
    };

    let market_data = CsvMarketData::new(price_path.clone());
    let points = match market_data.load_daily() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match (points.first(), points.last()) {
        (Some(first), Some(last)) => eprintln!(
            "Loaded {} price points ({} to {})",
            points.len(),
            first.date,
            last.date
        ),
        _ => eprintln!("Loaded 0 price points from {}", price_path.display()),
    }

    // Stage 3: technical analysis
    let stats = compute_rolling_stats(&points, config.trading.lookback_period);
    let technical = classify(stats.last(), config.trading.zscore_threshold);
    print_technical_summary(&technical, config.trading.lookback_period);

    // Stage 4: macro sentiment
    let mut scorer = MacroScorer::new(&config.macro_factors);

    let manual = resolve_manual_factors(manual_flags, &adapter);
    if let Some(rate) = manual.policy_rate {
        scorer.set_policy_rate(rate, manual.previous_policy_rate);
    }
    if let Some(flow) = manual.net_flow {
        scorer.set_capital_flow(flow);
    }

    if offline {
        eprintln!("Offline mode: auto factors stay neutral");
    } else {
        match adapter.get_string("data", "quote_dir") {
            Some(dir) if !dir.trim().is_empty() => {
                let quotes = CsvQuoteAdapter::new(PathBuf::from(dir));
                for (factor, err) in scorer.fetch_all(&quotes) {
                    eprintln!("warning: could not fetch {factor}: {err}");
                }
            }
            _ => {
                eprintln!("warning: no quote_dir configured, auto factors stay neutral");
            }
        }
    }

    let sentiment = scorer.sentiment();
    print_macro_summary(&sentiment);

    // Stage 5: decision, risk, order
    let decision = match make_decision(&technical, &sentiment, &config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    print_decision_summary(&decision);

    let order = build_order(&decision, &config.trading.symbol, &config.risk.exit_time);
    if let Some(order) = &order {
        print_order(order);
        if order.quantity == 0 {
            eprintln!("warning: allocation too small for one unit at this price");
        }
    }

    // Stage 6: append to the signal log
    let signal_path = output_override
        .cloned()
        .or_else(|| adapter.get_string("data", "signal_file").map(PathBuf::from));

    if let Some(path) = signal_path {
        let Some(last) = points.last() else {
            eprintln!("warning: no price data, skipping signal log");
            return ExitCode::SUCCESS;
        };
        let log = CsvSignalLog::new(path.clone());
        match log.append(last.date, &decision, order.as_ref()) {
            Ok(()) => eprintln!("\nSignal appended to: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn resolve_price_path(
    prices_override: Option<&PathBuf>,
    config: &dyn ConfigPort,
) -> Option<PathBuf> {
    if let Some(p) = prices_override {
        return Some(p.clone());
    }
    config
        .get_string("data", "price_file")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string())
}

fn print_technical_summary(signal: &TechnicalSignal, lookback: usize) {
    eprintln!("\n=== Technical Analysis (Mean Reversion) ===");
    eprintln!("Signal:         {}", signal.kind);
    eprintln!("Current Price:  {}", fmt_opt(signal.current_price));
    eprintln!(
        "Mean Price:     {} ({lookback}-day)",
        fmt_opt(signal.mean_price)
    );
    eprintln!(
        "Deviation:      {} ({}%)",
        fmt_opt(signal.deviation),
        fmt_opt(signal.deviation_pct)
    );
    eprintln!("Z-Score:        {}", fmt_opt(signal.zscore));
    eprintln!("Reason:         {}", signal.reason);
}

fn print_macro_summary(sentiment: &MacroSentiment) {
    eprintln!("\n=== Macro Sentiment ===");
    eprintln!("Sentiment:      {}", sentiment.category);
    eprintln!("Score:          {}", sentiment.score);
    eprintln!("Breakdown:");
    for entry in &sentiment.breakdown {
        let raw = entry
            .raw_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unset".to_string());
        eprintln!(
            "  {:<17} value {:<10} {:<9} contribution {:+}",
            entry.factor.name(),
            raw,
            entry.polarity,
            entry.contribution
        );
    }
}

fn print_decision_summary(decision: &TradingDecision) {
    eprintln!("\n=== Trading Decision ===");
    eprintln!("Action:         {}", decision.action);
    eprintln!("Allocation:     {}%", decision.allocation_pct);
    eprintln!("Confidence:     {}", decision.confidence);
    eprintln!("Reasoning:");
    for line in &decision.reasoning {
        eprintln!("  {line}");
    }

    if decision.action != Action::NoTrade {
        eprintln!("Risk:");
        eprintln!("  Entry Price:        {}", fmt_opt(decision.risk.entry_price));
        eprintln!("  Stop Loss:          {}", fmt_opt(decision.risk.stop_loss));
        eprintln!("  Target:             {}", fmt_opt(decision.risk.target));
        eprintln!("  Capital Allocated:  {:.2}", decision.risk.capital_allocated);
        eprintln!("  Capital at Risk:    {:.2}", decision.risk.capital_at_risk);
        eprintln!(
            "  Risk:Reward:        {}",
            decision.risk.risk_reward.unwrap_or("n/a")
        );
    }
}

fn print_order(order: &TradeOrder) {
    println!("symbol:      {}", order.symbol);
    println!("action:      {}", order.action);
    println!("type:        {}", order.order_type);
    println!("quantity:    {}", order.quantity);
    println!("entry:       {:.2}", order.entry_price);
    println!("stop_loss:   {:.2}", order.stop_loss);
    println!("target:      {:.2}", order.target);
    println!("exit_time:   {}", order.exit_time);
    println!("confidence:  {}", order.confidence);
    println!(
        "zscore:      {}",
        order
            .technical_zscore
            .map(|z| format!("{z:.2}"))
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!("macro_score: {}", order.macro_score);
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = build_engine_config(&adapter);

    eprintln!("\nResolved configuration:");
    eprintln!("  symbol:            {}", config.trading.symbol);
    eprintln!("  lookback_period:   {}", config.trading.lookback_period);
    eprintln!("  zscore_threshold:  {}", config.trading.zscore_threshold);
    eprintln!("  capital_base:      {}", config.trading.capital_base);
    eprintln!(
        "  weights:           policy_rate={} capital_flow={} global_index={} fx_rate={} volatility_index={}",
        config.macro_factors.weights.policy_rate,
        config.macro_factors.weights.capital_flow,
        config.macro_factors.weights.global_index,
        config.macro_factors.weights.fx_rate,
        config.macro_factors.weights.volatility_index,
    );
    eprintln!(
        "  thresholds:        bullish={} bearish={}",
        config.macro_factors.bullish_threshold, config.macro_factors.bearish_threshold
    );
    eprintln!(
        "  allocation tiers:  high={} medium={} low={}",
        config.allocation.high, config.allocation.medium, config.allocation.low
    );
    eprintln!("  stop_loss_pct:     {}", config.risk.stop_loss_pct);
    eprintln!("  exit_time:         {}", config.risk.exit_time);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn run_info(config_path: &PathBuf, prices_override: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = build_engine_config(&adapter);

    let price_path = match resolve_price_path(prices_override, &adapter) {
        Some(p) => p,
        None => {
            eprintln!("error: no price file configured");
            return ExitCode::from(2);
        }
    };

    let market_data = CsvMarketData::new(price_path);
    match market_data.data_range() {
        Ok(Some((first, last, count))) => {
            println!(
                "{}: {} points, {} to {}",
                config.trading.symbol, count, first, last
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", config.trading.symbol);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
