//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::backtest::{
    cash_baseline, is_cash, rank_strategies, run_backtest, run_strategy_backtest,
    BacktestConfig, DEFAULT_INITIAL_CAPITAL,
};
use crate::domain::config_validation::{parse_optional_date, validate_config};
use crate::domain::error::TitanError;
use crate::domain::geometry::build_profile;
use crate::domain::rating::{classify, rules};
use crate::domain::resample::to_monthly;
use crate::domain::strategy::Strategy;
use crate::domain::universe::{load_universe, parse_symbols};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "titan", about = "Trend geometry rating and MA backtesting")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rate symbols by the geometry of their monthly trend
    Rate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Run the price-above-MA20 backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Rank the moving-average strategy catalog for one symbol
    Strategies {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Run a single strategy instead of the catalog
        /// (sma:N, asym:IN/OUT, cross:FAST/SLOW, triple:FAST/MID/SLOW)
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Print the tier rule ladder
    Tiers,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Cli {
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .finish();

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("warning: failed to set tracing subscriber: {e}");
        }
    }
}

/// Settings resolved from the INI file, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub history_start: NaiveDate,
    pub history_end: NaiveDate,
    pub backtest: BacktestConfig,
    pub curve_points: usize,
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_backtest_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn run(cli: Cli) -> ExitCode {
    cli.init_logging();

    match cli.command {
        Command::Rate { config, symbol } => run_rate(&config, symbol.as_deref()),
        Command::Backtest { config, symbol } => run_backtest_command(&config, symbol.as_deref()),
        Command::Strategies {
            config,
            symbol,
            strategy,
        } => run_strategies(&config, &symbol, strategy),
        Command::Tiers => run_tiers(),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TitanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Validate the config and resolve it into [`Settings`].
pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, TitanError> {
    validate_config(config)?;

    let data_dir = config
        .get_string("data", "directory")
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| TitanError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;

    let history_start =
        parse_optional_date(config, "data", "history_start")?.unwrap_or_else(default_history_start);
    let start_date = parse_optional_date(config, "backtest", "start_date")?
        .unwrap_or_else(default_backtest_start);
    let history_end = parse_optional_date(config, "backtest", "end_date")?.unwrap_or(NaiveDate::MAX);

    let curve_points = usize::try_from(config.get_int("report", "curve_points", 0)).unwrap_or(0);

    Ok(Settings {
        data_dir,
        history_start,
        history_end,
        backtest: BacktestConfig {
            initial_capital: config.get_double(
                "backtest",
                "initial_capital",
                DEFAULT_INITIAL_CAPITAL,
            ),
            start_date: Some(start_date),
        },
        curve_points,
    })
}

/// `--symbol` wins, then `[universe] symbols`, then every symbol the data
/// source knows about.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, TitanError> {
    if let Some(s) = symbol_override {
        return Ok(parse_symbols(s)?);
    }

    if let Some(symbols) = config.get_string("universe", "symbols") {
        return Ok(parse_symbols(&symbols)?);
    }

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        return Err(TitanError::NoData {
            symbol: "universe".into(),
        });
    }
    Ok(symbols)
}

/// Resample, profile and classify each symbol, writing one rating each.
/// Symbols without data are reported as unrated; when none has data the
/// unrated lines are still written before the error is returned.
pub fn rate_symbols(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    symbols: Vec<String>,
    settings: &Settings,
) -> Result<(), TitanError> {
    let universe = match load_universe(
        data_port,
        symbols.clone(),
        settings.history_start,
        settings.history_end,
        1,
    ) {
        Ok(universe) => universe,
        Err(e) => {
            for symbol in &symbols {
                report.write_rating(symbol, None, &classify(None))?;
            }
            return Err(e);
        }
    };

    for data in &universe.loaded {
        let monthly = to_monthly(&data.bars);
        let profile = build_profile(&monthly);
        let rating = classify(profile.as_ref());
        tracing::info!(
            "{}: {} monthly bars, rated {}",
            data.symbol,
            monthly.len(),
            rating.level
        );
        report.write_rating(&data.symbol, profile.as_ref(), &rating)?;
    }

    for skipped in &universe.skipped {
        report.write_rating(&skipped.symbol, None, &classify(None))?;
    }
    Ok(())
}

/// Run the canonical backtest for each symbol. Symbols too short after the
/// start date are skipped with a warning; an error is returned only when
/// none could be backtested. Cash tickers get the flat baseline over the
/// trading calendar of the first priced symbol that loaded.
pub fn backtest_symbols(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    symbols: Vec<String>,
    settings: &Settings,
) -> Result<(), TitanError> {
    let minimum = Strategy::CANONICAL.min_bars();
    let priced: Vec<String> = symbols.iter().filter(|s| !is_cash(s)).cloned().collect();
    let loaded = if priced.is_empty() {
        Vec::new()
    } else {
        load_universe(
            data_port,
            priced,
            settings.history_start,
            settings.history_end,
            minimum,
        )?
        .loaded
    };

    let calendar: Vec<NaiveDate> = loaded
        .first()
        .map(|data| {
            data.bars
                .iter()
                .map(|b| b.date)
                .filter(|&d| settings.backtest.start_date.is_none_or(|start| d >= start))
                .collect()
        })
        .unwrap_or_default();

    let mut written = 0;
    for symbol in &symbols {
        let result = if is_cash(symbol) {
            if calendar.is_empty() {
                tracing::warn!("skipping {} (no trading calendar to hold cash over)", symbol);
                continue;
            }
            Some(cash_baseline(&calendar, &settings.backtest))
        } else {
            match loaded.iter().find(|d| &d.symbol == symbol) {
                Some(data) => run_backtest(&data.bars, &settings.backtest),
                None => continue,
            }
        };

        match result {
            Some(result) => {
                tracing::info!(
                    "{}: {} trading days, CAGR {:.2}%",
                    symbol,
                    result.trade_count,
                    result.cagr * 100.0
                );
                report.write_backtest(symbol, &result)?;
                written += 1;
            }
            None => tracing::warn!(
                "skipping {} (fewer than {} bars after start date)",
                symbol,
                minimum
            ),
        }
    }

    if written == 0 {
        return Err(TitanError::InsufficientData {
            symbol: "all".into(),
            bars: 0,
            minimum,
        });
    }
    Ok(())
}

/// Backtest the full strategy catalog on one symbol and write the ranking.
/// With `only`, just that strategy is run and ranked alone.
pub fn rank_symbol(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    symbol: &str,
    only: Option<Strategy>,
    settings: &Settings,
) -> Result<(), TitanError> {
    let bars = data_port.fetch_daily(symbol, settings.history_start, settings.history_end)?;
    if bars.is_empty() {
        return Err(TitanError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let ranked = match only {
        Some(strategy) => run_strategy_backtest(&bars, strategy, &settings.backtest)
            .into_iter()
            .collect(),
        None => rank_strategies(&bars, &settings.backtest),
    };
    if ranked.is_empty() {
        return Err(TitanError::InsufficientData {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum: only.unwrap_or(Strategy::CANONICAL).min_bars(),
        });
    }

    tracing::info!("{}: ranked {} strategies", symbol, ranked.len());
    report.write_strategy_ranking(symbol, &ranked)
}

fn prepare(
    config_path: &PathBuf,
) -> Result<(FileConfigAdapter, Settings, CsvAdapter), ExitCode> {
    // Stage 1: Load config
    tracing::info!("loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    // Stage 2: Validate and resolve settings
    let settings = build_settings(&adapter).map_err(|e| report_error(&e))?;

    // Stage 3: Open the data directory
    let data_port = CsvAdapter::new(settings.data_dir.clone());
    Ok((adapter, settings, data_port))
}

fn report_error(err: &TitanError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn stdout_report(settings: &Settings) -> TextReportAdapter<io::StdoutLock<'static>> {
    TextReportAdapter::new(io::stdout().lock()).with_curve_points(settings.curve_points)
}

fn run_rate(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let (adapter, settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let result = resolve_symbols(symbol, &adapter, &data_port).and_then(|symbols| {
        tracing::info!("rating {} symbols", symbols.len());
        rate_symbols(&data_port, &mut stdout_report(&settings), symbols, &settings)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_backtest_command(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let (adapter, settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let result = resolve_symbols(symbol, &adapter, &data_port).and_then(|symbols| {
        tracing::info!(
            "backtesting {} symbols from {}",
            symbols.len(),
            settings
                .backtest
                .start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "the first bar".into())
        );
        backtest_symbols(&data_port, &mut stdout_report(&settings), symbols, &settings)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_strategies(config_path: &PathBuf, symbol: &str, only: Option<Strategy>) -> ExitCode {
    let (_adapter, settings, data_port) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let symbol = symbol.trim().to_uppercase();
    match rank_symbol(
        &data_port,
        &mut stdout_report(&settings),
        &symbol,
        only,
        &settings,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// The rule ladder in evaluation order, then the no-data fallback.
pub fn write_tiers(out: &mut dyn Write) -> Result<(), TitanError> {
    writeln!(out, "{:>3}  {:<10} {:<30} Condition", "#", "Tier", "Name")?;
    for (i, rule) in rules().iter().enumerate() {
        let result = rule.tier.result();
        writeln!(
            out,
            "{:>3}  {:<10} {:<30} {}",
            i + 1,
            rule.tier.code(),
            result.name,
            rule.condition
        )?;
    }
    let fallback = classify(None);
    writeln!(
        out,
        "{:>3}  {:<10} {:<30} no data",
        "-",
        fallback.level.code(),
        fallback.name
    )?;
    Ok(())
}

fn run_tiers() -> ExitCode {
    match write_tiers(&mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_settings(&adapter) {
        Ok(settings) => {
            eprintln!("Config is valid.");
            eprintln!("  Data directory:  {}", settings.data_dir.display());
            eprintln!("  History start:   {}", settings.history_start);
            eprintln!(
                "  Initial capital: {:.2}",
                settings.backtest.initial_capital
            );
            if let Some(start) = settings.backtest.start_date {
                eprintln!("  Backtest start:  {}", start);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
