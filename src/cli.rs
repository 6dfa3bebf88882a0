//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, Backtester, RunWindow};
use crate::domain::config_validation::{
    config_datetime, parse_symbols, strategy_kind, validate_backtest_config,
    validate_strategy_config, DEFAULT_COMMISSION, DEFAULT_INITIAL_CAPITAL, DEFAULT_SLIPPAGE,
};
use crate::domain::error::QuantopsError;
use crate::domain::replay::HistoricalData;
use crate::domain::strategy::{
    MaCrossoverParams, MaCrossoverStrategy, MomentumParams, MomentumStrategy, Strategy,
    StrategyKind,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

const DEFAULT_DATA_PATH: &str = "data";
const DEFAULT_LOG_LEVEL: &str = "info";
const TRADES_SHOWN: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "quantops", about = "Event-driven backtester for trading strategies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of per-symbol CSV files; overrides [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Comma separated symbols; overrides [data] symbols
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for configured symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            data,
            symbols,
        } => run_backtest(&config, data.as_deref(), symbols.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { data } => run_list_symbols(&data),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_LOG_LEVEL)));

    // A second install (tests, repeated runs in one process) is a no-op.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Loads the INI file and applies environment overrides.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, QuantopsError> {
    Ok(FileConfigAdapter::from_file(path)?.with_env_overrides())
}

fn load_config_with_tracing(path: &Path) -> Result<FileConfigAdapter, QuantopsError> {
    let adapter = load_config(path)?;
    init_tracing(adapter.get_string("logging", "level").as_deref());
    debug!(config = %path.display(), "configuration loaded");
    Ok(adapter)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    symbols_override: Option<&str>,
) -> Result<(), QuantopsError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config_with_tracing(config_path)?;

    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let bt_config = build_backtest_config(&adapter);
    let window = build_run_window(&adapter)?;

    let data_dir = resolve_data_path(data_override, &adapter);
    let symbols = resolve_symbols(symbols_override, &adapter)?;
    eprintln!(
        "Loading {} symbol(s) from {}",
        symbols.len(),
        data_dir.display()
    );

    let data_port = CsvAdapter::new(data_dir);
    let data = load_historical_data(&data_port, &symbols, window)?;

    let strategy = build_strategy(&adapter, &symbols)?;
    eprintln!("Running strategy: {}", strategy.name());

    let mut engine = Backtester::new(bt_config);
    let result = engine.run(strategy.as_ref(), &data, window)?;

    print_summary(&result);
    Ok(())
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        commission_rate: adapter.get_double("backtest", "commission", DEFAULT_COMMISSION),
        slippage_rate: adapter.get_double("backtest", "slippage", DEFAULT_SLIPPAGE),
    }
}

pub fn build_run_window(adapter: &dyn ConfigPort) -> Result<RunWindow, QuantopsError> {
    Ok(RunWindow::between(
        config_datetime(adapter, "backtest", "start_date")?,
        config_datetime(adapter, "backtest", "end_date")?,
    ))
}

/// Builds the configured strategy. `default_symbols` apply when
/// `[strategy] symbols` is absent.
pub fn build_strategy(
    adapter: &dyn ConfigPort,
    default_symbols: &[String],
) -> Result<Box<dyn Strategy>, QuantopsError> {
    let kind = strategy_kind(adapter)?;
    let name = adapter
        .get_string("strategy", "name")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| kind.to_string());
    let symbols = adapter
        .get_string("strategy", "symbols")
        .map(|s| parse_symbols(&s))
        .unwrap_or_else(|| default_symbols.to_vec());

    if symbols.is_empty() {
        return Err(QuantopsError::ConfigMissing {
            section: "strategy".into(),
            key: "symbols".into(),
        });
    }

    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::Momentum => {
            let d = MomentumParams::default();
            let params = MomentumParams {
                rsi_period: read_period(adapter, "rsi_period", d.rsi_period)?,
                rsi_oversold: adapter.get_double("strategy", "rsi_oversold", d.rsi_oversold),
                rsi_overbought: adapter.get_double("strategy", "rsi_overbought", d.rsi_overbought),
                position_size: adapter.get_double("strategy", "position_size", d.position_size),
            };
            Box::new(MomentumStrategy::new(name, symbols, params))
        }
        StrategyKind::MaCrossover => {
            let d = MaCrossoverParams::default();
            let params = MaCrossoverParams {
                fast_period: read_period(adapter, "fast_period", d.fast_period)?,
                slow_period: read_period(adapter, "slow_period", d.slow_period)?,
                position_size: adapter.get_double("strategy", "position_size", d.position_size),
            };
            Box::new(MaCrossoverStrategy::new(name, symbols, params))
        }
    };
    info!(strategy = strategy.name(), kind = %kind, "strategy configured");
    Ok(strategy)
}

fn read_period(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, QuantopsError> {
    let value = adapter.get_int("strategy", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|&p| p > 0)
        .ok_or_else(|| QuantopsError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("{key} must be a positive integer"),
        })
}

fn resolve_data_path(data_override: Option<&Path>, adapter: &dyn ConfigPort) -> PathBuf {
    match data_override {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(
            adapter
                .get_string("data", "path")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
        ),
    }
}

fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, QuantopsError> {
    let symbols = match symbols_override {
        Some(s) => parse_symbols(s),
        None => adapter
            .get_string("data", "symbols")
            .map(|s| parse_symbols(&s))
            .unwrap_or_default(),
    };
    if symbols.is_empty() {
        return Err(QuantopsError::ConfigMissing {
            section: "data".into(),
            key: "symbols".into(),
        });
    }
    Ok(symbols)
}

/// Loads every symbol in order; the first becomes the primary instrument.
///
/// Bars before the window start are kept so indicators can warm up; only the
/// window end bounds the fetch.
pub fn load_historical_data(
    port: &dyn DataPort,
    symbols: &[String],
    window: RunWindow,
) -> Result<HistoricalData, QuantopsError> {
    let mut data = HistoricalData::new();
    for symbol in symbols {
        let bars = port.fetch_bars(symbol, None, window.end)?;
        if bars.is_empty() {
            warn!(symbol = %symbol, "no bars loaded");
        }
        info!(symbol = %symbol, bars = bars.len(), "instrument loaded");
        data.insert(symbol.clone(), bars);
    }
    Ok(data)
}

fn print_summary(result: &BacktestResult) {
    eprintln!("\n=== Backtest Results: {} ===", result.strategy_name);
    eprintln!("Ticks:            {}", result.tick_count());
    eprintln!("Initial Capital:  {:.2}", result.initial_capital);
    eprintln!("Final Value:      {:.2}", result.final_value);
    eprintln!("Total Return:     {:.2}%", result.total_return_pct);
    eprintln!("Total Trades:     {}", result.trade_count);
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("Volatility:       {:.2}%", result.volatility * 100.0);
    eprintln!("Max Drawdown:     {:.2}%", result.max_drawdown_pct);

    if !result.trades.is_empty() {
        eprintln!("\n=== Trades (first {}) ===", TRADES_SHOWN.min(result.trades.len()));
        for trade in result.trades.iter().take(TRADES_SHOWN) {
            eprintln!(
                "  {}  {:<4} {:<10} {:>12.6} @ {:>12.4}  fee {:.4}  cash {:+.2}",
                trade.timestamp, trade.action, trade.symbol, trade.amount, trade.price,
                trade.commission, trade.cash_flow()
            );
        }
    }
}

fn run_validate(config_path: &Path) -> Result<(), QuantopsError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config_with_tracing(config_path)?;

    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter)?;

    let symbols = resolve_symbols(None, &adapter)?;
    let strategy = build_strategy(&adapter, &symbols)?;
    let bt_config = build_backtest_config(&adapter);

    eprintln!("  strategy:        {}", strategy.name());
    eprintln!("  symbols:         {}", symbols.join(", "));
    eprintln!("  initial capital: {:.2}", bt_config.initial_capital);
    eprintln!("  commission:      {}", bt_config.commission_rate);
    eprintln!("  slippage:        {}", bt_config.slippage_rate);
    eprintln!("\nConfiguration is valid");
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), QuantopsError> {
    let adapter = load_config_with_tracing(config_path)?;
    let data_port = CsvAdapter::new(resolve_data_path(None, &adapter));
    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => resolve_symbols(None, &adapter)?,
    };

    for symbol in &symbols {
        match data_port.data_range(symbol)? {
            Some((first, last, count)) => {
                println!("{symbol}: {first} to {last} ({count} bars)");
            }
            None => println!("{symbol}: no data"),
        }
    }
    Ok(())
}

fn run_list_symbols(data_dir: &Path) -> Result<(), QuantopsError> {
    init_tracing(None);
    let symbols = CsvAdapter::new(data_dir.to_path_buf()).list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
