use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use marketdesk::config::{Config, DEFAULT_CONFIG_PATH};
use marketdesk::market::alphavantage::{
    AlphaVantageClient, AvRequest, FREE_PLAN_LIMITS, FundamentalFunction, OutputSize,
};
use marketdesk::market::client::build_http_client;
use marketdesk::market::tiingo::{TiingoClient, TiingoRequest};
use marketdesk::market::MarketError;

#[derive(Debug, Parser)]
#[command(name = "marketdata", version, about = "Query Alpha Vantage and Tiingo from the terminal")]
struct Cli {
    /// TOML config file; MARKETDESK_* environment variables override it.
    #[arg(long, global = true, env = "MARKETDESK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log request URLs (keys redacted) and other debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    provider: Provider,
}

#[derive(Debug, Subcommand)]
enum Provider {
    /// Alpha Vantage (https://www.alphavantage.co)
    #[command(name = "alphavantage", visible_alias = "av")]
    AlphaVantage {
        /// Overrides `providers.alphavantage.api_key`.
        #[arg(long)]
        api_key: Option<String>,
        #[command(subcommand)]
        command: AvCommand,
    },
    /// Tiingo (https://api.tiingo.com)
    Tiingo {
        /// Overrides `providers.tiingo.api_token`.
        #[arg(long)]
        token: Option<String>,
        #[command(subcommand)]
        command: TiingoCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AvCommand {
    /// Check that the API answers with the configured key.
    Connection,
    /// Daily time series.
    Daily {
        #[arg(default_value = "AAPL")]
        symbol: String,
        #[arg(long, value_enum, default_value_t = OutputSize::Compact)]
        output_size: OutputSize,
    },
    /// Intraday time series.
    Intraday {
        #[arg(default_value = "MSFT")]
        symbol: String,
        /// 1min, 5min, 15min, 30min or 60min.
        #[arg(long, default_value = "5min")]
        interval: String,
        #[arg(long, value_enum, default_value_t = OutputSize::Compact)]
        output_size: OutputSize,
    },
    /// Symbol search by keywords.
    Search {
        #[arg(default_value = "Microsoft")]
        keywords: String,
    },
    /// Technical indicator (SMA, EMA, RSI, MACD, ...).
    Indicator {
        #[arg(default_value = "GOOGL")]
        symbol: String,
        #[arg(long, default_value = "SMA")]
        function: String,
        #[arg(long, default_value = "daily")]
        interval: String,
        #[arg(long, default_value_t = 50)]
        period: u32,
        #[arg(long, default_value = "close")]
        series_type: String,
    },
    /// Company fundamentals.
    Fundamentals {
        #[arg(default_value = "TSLA")]
        symbol: String,
        #[arg(long, value_enum, default_value_t = FundamentalFunction::Overview)]
        function: FundamentalFunction,
    },
    /// Foreign exchange series.
    Forex {
        #[arg(default_value = "EUR")]
        from: String,
        #[arg(default_value = "USD")]
        to: String,
        /// FX_DAILY, FX_WEEKLY or FX_MONTHLY.
        #[arg(long, default_value = "FX_DAILY")]
        function: String,
        #[arg(long, value_enum, default_value_t = OutputSize::Compact)]
        output_size: OutputSize,
    },
    /// Digital currency series.
    Crypto {
        #[arg(default_value = "BTC")]
        symbol: String,
        #[arg(default_value = "USD")]
        market: String,
        /// DIGITAL_CURRENCY_DAILY, _WEEKLY or _MONTHLY.
        #[arg(long, default_value = "DIGITAL_CURRENCY_DAILY")]
        function: String,
    },
    /// Economic indicator (REAL_GDP, CPI, TREASURY_YIELD, ...).
    Economic {
        #[arg(default_value = "REAL_GDP")]
        indicator: String,
        /// monthly, quarterly or annual.
        #[arg(long, default_value = "quarterly")]
        interval: String,
    },
    /// Run every call above with its defaults, pausing between calls.
    All,
}

impl AvCommand {
    fn into_request(self) -> Option<AvRequest> {
        let req = match self {
            AvCommand::Connection | AvCommand::All => return None,
            AvCommand::Daily {
                symbol,
                output_size,
            } => AvRequest::Daily {
                symbol,
                output_size,
            },
            AvCommand::Intraday {
                symbol,
                interval,
                output_size,
            } => AvRequest::Intraday {
                symbol,
                interval,
                output_size,
            },
            AvCommand::Search { keywords } => AvRequest::SymbolSearch { keywords },
            AvCommand::Indicator {
                symbol,
                function,
                interval,
                period,
                series_type,
            } => AvRequest::Indicator {
                symbol,
                function,
                interval,
                time_period: period,
                series_type,
            },
            AvCommand::Fundamentals { symbol, function } => {
                AvRequest::Fundamentals { symbol, function }
            }
            AvCommand::Forex {
                from,
                to,
                function,
                output_size,
            } => AvRequest::Forex {
                from_symbol: from,
                to_symbol: to,
                function,
                output_size,
            },
            AvCommand::Crypto {
                symbol,
                market,
                function,
            } => AvRequest::Crypto {
                symbol,
                market,
                function,
            },
            AvCommand::Economic {
                indicator,
                interval,
            } => AvRequest::Economic {
                indicator,
                interval,
            },
        };
        Some(req)
    }
}

#[derive(Debug, Subcommand)]
enum TiingoCommand {
    /// Check that the API answers with the configured token.
    Connection,
    /// End-of-day price history.
    History {
        #[arg(default_value = "AAPL")]
        ticker: String,
        #[command(flatten)]
        range: DateRange,
    },
    /// Ticker metadata.
    Meta {
        #[arg(default_value = "MSFT")]
        ticker: String,
    },
    /// Recent news for comma-separated tickers.
    News {
        #[arg(default_value = "AAPL,MSFT,GOOGL")]
        tickers: String,
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    /// Fundamentals (may require a paid plan).
    Fundamentals {
        #[arg(default_value = "AAPL")]
        ticker: String,
    },
    /// All supported tickers.
    Tickers,
    /// Crypto prices.
    Crypto {
        #[arg(default_value = "btcusd")]
        ticker: String,
        #[command(flatten)]
        range: DateRange,
        #[arg(long, default_value = "1day")]
        resample: String,
    },
    /// Forex prices.
    Forex {
        #[arg(default_value = "eurusd")]
        ticker: String,
        #[command(flatten)]
        range: DateRange,
        #[arg(long, default_value = "1day")]
        resample: String,
    },
    /// Run every call above with its defaults over the last 30 days.
    All,
}

#[derive(Debug, Clone, clap::Args)]
struct DateRange {
    /// YYYY-MM-DD; defaults to 30 days before --end.
    #[arg(long)]
    start: Option<NaiveDate>,
    /// YYYY-MM-DD; defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl DateRange {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        let start = self.start.unwrap_or_else(|| default_start(end));
        (start, end)
    }

    fn last_30_days() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

fn default_start(end: NaiveDate) -> NaiveDate {
    end.checked_sub_days(Days::new(30)).unwrap_or(end)
}

impl TiingoCommand {
    fn into_request(self) -> Option<TiingoRequest> {
        let req = match self {
            TiingoCommand::Connection | TiingoCommand::All => return None,
            TiingoCommand::History { ticker, range } => {
                let (start, end) = range.resolve();
                TiingoRequest::DailyPrices { ticker, start, end }
            }
            TiingoCommand::Meta { ticker } => TiingoRequest::Meta { ticker },
            TiingoCommand::News { tickers, limit } => TiingoRequest::News { tickers, limit },
            TiingoCommand::Fundamentals { ticker } => TiingoRequest::Fundamentals { ticker },
            TiingoCommand::Tickers => TiingoRequest::SupportedTickers,
            TiingoCommand::Crypto {
                ticker,
                range,
                resample,
            } => {
                let (start, end) = range.resolve();
                TiingoRequest::Crypto {
                    ticker,
                    start,
                    end,
                    resample,
                }
            }
            TiingoCommand::Forex {
                ticker,
                range,
                resample,
            } => {
                let (start, end) = range.resolve();
                TiingoRequest::Forex {
                    ticker,
                    start,
                    end,
                    resample,
                }
            }
        };
        Some(req)
    }
}

fn av_suite() -> Vec<AvRequest> {
    [
        AvCommand::Daily {
            symbol: "AAPL".into(),
            output_size: OutputSize::Compact,
        },
        AvCommand::Intraday {
            symbol: "MSFT".into(),
            interval: "5min".into(),
            output_size: OutputSize::Compact,
        },
        AvCommand::Search {
            keywords: "Microsoft".into(),
        },
        AvCommand::Indicator {
            symbol: "GOOGL".into(),
            function: "SMA".into(),
            interval: "daily".into(),
            period: 50,
            series_type: "close".into(),
        },
        AvCommand::Fundamentals {
            symbol: "TSLA".into(),
            function: FundamentalFunction::Overview,
        },
        AvCommand::Forex {
            from: "EUR".into(),
            to: "USD".into(),
            function: "FX_DAILY".into(),
            output_size: OutputSize::Compact,
        },
        AvCommand::Crypto {
            symbol: "BTC".into(),
            market: "USD".into(),
            function: "DIGITAL_CURRENCY_DAILY".into(),
        },
        AvCommand::Economic {
            indicator: "REAL_GDP".into(),
            interval: "quarterly".into(),
        },
    ]
    .into_iter()
    .filter_map(AvCommand::into_request)
    .collect()
}

fn tiingo_suite() -> Vec<TiingoRequest> {
    [
        TiingoCommand::History {
            ticker: "AAPL".into(),
            range: DateRange::last_30_days(),
        },
        TiingoCommand::Meta {
            ticker: "MSFT".into(),
        },
        TiingoCommand::News {
            tickers: "AAPL,MSFT,GOOGL".into(),
            limit: 5,
        },
        TiingoCommand::Fundamentals {
            ticker: "AAPL".into(),
        },
        TiingoCommand::Tickers,
        TiingoCommand::Crypto {
            ticker: "btcusd".into(),
            range: DateRange::last_30_days(),
            resample: "1day".into(),
        },
        TiingoCommand::Forex {
            ticker: "eurusd".into(),
            range: DateRange::last_30_days(),
            resample: "1day".into(),
        },
    ]
    .into_iter()
    .filter_map(TiingoCommand::into_request)
    .collect()
}

/// Print a report or its error. Returns whether the call succeeded.
fn print_outcome(result: Result<String, MarketError>) -> bool {
    match result {
        Ok(text) => {
            println!("{text}\n");
            true
        }
        Err(MarketError::RateLimited(note)) => {
            eprintln!("Call frequency notice: {note}\n{FREE_PLAN_LIMITS}\n");
            false
        }
        Err(e) => {
            eprintln!("Error: {e}\n");
            false
        }
    }
}

async fn run_alphavantage(
    client: AlphaVantageClient,
    command: AvCommand,
    pause: Duration,
) -> bool {
    match command {
        AvCommand::Connection => print_outcome(client.check_connection().await),
        AvCommand::All => {
            println!("=== Alpha Vantage API suite ===");
            println!("Free plan allows 5 calls per minute; pausing {}s between calls.\n", pause.as_secs());
            if !print_outcome(client.check_connection().await) {
                eprintln!("Connection check failed; verify the API key.");
                return false;
            }
            let mut all_ok = true;
            for req in av_suite() {
                info!(pause_secs = pause.as_secs(), "waiting before next call");
                tokio::time::sleep(pause).await;
                all_ok &= print_outcome(client.report(&req).await);
            }
            println!("=== Suite finished ===");
            all_ok
        }
        other => match other.into_request() {
            Some(req) => print_outcome(client.report(&req).await),
            None => false,
        },
    }
}

async fn run_tiingo(client: TiingoClient, command: TiingoCommand) -> bool {
    match command {
        TiingoCommand::Connection => print_outcome(client.check_connection().await),
        TiingoCommand::All => {
            println!("=== Tiingo API suite ===\n");
            if !print_outcome(client.check_connection().await) {
                eprintln!("Connection check failed; verify the token and connectivity.");
                return false;
            }
            let mut all_ok = true;
            for req in tiingo_suite() {
                all_ok &= run_tiingo_request(&client, &req).await;
            }
            println!("=== Suite finished ===");
            all_ok
        }
        other => match other.into_request() {
            Some(req) => run_tiingo_request(&client, &req).await,
            None => false,
        },
    }
}

async fn run_tiingo_request(client: &TiingoClient, req: &TiingoRequest) -> bool {
    let ok = print_outcome(client.report(req).await);
    if !ok && matches!(req, TiingoRequest::Fundamentals { .. }) {
        eprintln!("Note: fundamentals may require a premium Tiingo subscription.\n");
    }
    ok
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let cfg = Config::load_from(&cli.config)?;
    let http = build_http_client(&cfg.http)?;
    debug!(config = %cli.config.display(), "configuration loaded");

    let ok = match cli.provider {
        Provider::AlphaVantage { api_key, command } => {
            let client = AlphaVantageClient::from_config(http, &cfg.providers.alphavantage, api_key)?;
            let pause = Duration::from_secs(cfg.providers.alphavantage.call_pause_secs);
            run_alphavantage(client, command, pause).await
        }
        Provider::Tiingo { token, command } => {
            let client = TiingoClient::from_config(http, &cfg.providers.tiingo, token)?;
            run_tiingo(client, command).await
        }
    };
    Ok(ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
