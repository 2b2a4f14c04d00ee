use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One Tiingo REST call: a path under the base URL plus query parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum TiingoRequest {
    DailyPrices {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    Meta {
        ticker: String,
    },
    News {
        tickers: String,
        limit: u32,
    },
    Fundamentals {
        ticker: String,
    },
    SupportedTickers,
    Crypto {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
        resample: String,
    },
    Forex {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
        resample: String,
    },
}

impl TiingoRequest {
    /// The short AAPL price window used as a reachability probe.
    pub fn connection_probe() -> Self {
        TiingoRequest::DailyPrices {
            ticker: "AAPL".to_string(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap_or_default(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            TiingoRequest::DailyPrices { ticker, .. } => format!("tiingo/daily/{ticker}/prices"),
            TiingoRequest::Meta { ticker } => format!("tiingo/daily/{ticker}"),
            TiingoRequest::News { .. } => "tiingo/news".to_string(),
            TiingoRequest::Fundamentals { ticker } => format!("fundamentals/{ticker}"),
            TiingoRequest::SupportedTickers => "tiingo/utilities/supported/tickers".to_string(),
            TiingoRequest::Crypto { .. } => "tiingo/crypto/prices".to_string(),
            TiingoRequest::Forex { ticker, .. } => format!("tiingo/fx/{ticker}/prices"),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            TiingoRequest::DailyPrices { start, end, .. } => vec![
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
                ("format", "json".to_string()),
            ],
            TiingoRequest::News { tickers, limit } => vec![
                ("tickers", tickers.clone()),
                ("limit", limit.to_string()),
            ],
            TiingoRequest::Crypto {
                ticker,
                start,
                end,
                resample,
            } => vec![
                ("tickers", ticker.clone()),
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
                ("resampleFreq", resample.clone()),
            ],
            TiingoRequest::Forex {
                start,
                end,
                resample,
                ..
            } => vec![
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
                ("resampleFreq", resample.clone()),
            ],
            TiingoRequest::Meta { .. }
            | TiingoRequest::Fundamentals { .. }
            | TiingoRequest::SupportedTickers => Vec::new(),
        }
    }
}
