use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputSize {
    /// Latest 100 points.
    #[default]
    Compact,
    /// Full history.
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FundamentalFunction {
    #[default]
    #[value(alias = "OVERVIEW")]
    Overview,
    #[value(alias = "INCOME_STATEMENT")]
    IncomeStatement,
    #[value(alias = "BALANCE_SHEET")]
    BalanceSheet,
    #[value(alias = "CASH_FLOW")]
    CashFlow,
    #[value(alias = "EARNINGS")]
    Earnings,
}

impl FundamentalFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            FundamentalFunction::Overview => "OVERVIEW",
            FundamentalFunction::IncomeStatement => "INCOME_STATEMENT",
            FundamentalFunction::BalanceSheet => "BALANCE_SHEET",
            FundamentalFunction::CashFlow => "CASH_FLOW",
            FundamentalFunction::Earnings => "EARNINGS",
        }
    }
}

/// One Alpha Vantage `/query` call. `params` yields everything except `apikey`.
#[derive(Debug, Clone, PartialEq)]
pub enum AvRequest {
    Daily {
        symbol: String,
        output_size: OutputSize,
    },
    Intraday {
        symbol: String,
        interval: String,
        output_size: OutputSize,
    },
    SymbolSearch {
        keywords: String,
    },
    Indicator {
        symbol: String,
        function: String,
        interval: String,
        time_period: u32,
        series_type: String,
    },
    Fundamentals {
        symbol: String,
        function: FundamentalFunction,
    },
    Forex {
        from_symbol: String,
        to_symbol: String,
        function: String,
        output_size: OutputSize,
    },
    Crypto {
        symbol: String,
        market: String,
        function: String,
    },
    Economic {
        indicator: String,
        interval: String,
    },
}

impl AvRequest {
    /// The daily AAPL call used as a reachability probe.
    pub fn connection_probe() -> Self {
        AvRequest::Daily {
            symbol: "AAPL".to_string(),
            output_size: OutputSize::Compact,
        }
    }

    pub fn function(&self) -> &str {
        match self {
            AvRequest::Daily { .. } => "TIME_SERIES_DAILY",
            AvRequest::Intraday { .. } => "TIME_SERIES_INTRADAY",
            AvRequest::SymbolSearch { .. } => "SYMBOL_SEARCH",
            AvRequest::Indicator { function, .. } => function,
            AvRequest::Fundamentals { function, .. } => function.as_str(),
            AvRequest::Forex { function, .. } => function,
            AvRequest::Crypto { function, .. } => function,
            AvRequest::Economic { indicator, .. } => indicator,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("function", self.function().to_string())];
        match self {
            AvRequest::Daily {
                symbol,
                output_size,
            } => {
                params.push(("symbol", symbol.clone()));
                params.push(("outputsize", output_size.as_str().to_string()));
            }
            AvRequest::Intraday {
                symbol,
                interval,
                output_size,
            } => {
                params.push(("symbol", symbol.clone()));
                params.push(("interval", interval.clone()));
                params.push(("outputsize", output_size.as_str().to_string()));
            }
            AvRequest::SymbolSearch { keywords } => {
                params.push(("keywords", keywords.clone()));
            }
            AvRequest::Indicator {
                symbol,
                interval,
                time_period,
                series_type,
                ..
            } => {
                params.push(("symbol", symbol.clone()));
                params.push(("interval", interval.clone()));
                params.push(("time_period", time_period.to_string()));
                params.push(("series_type", series_type.clone()));
            }
            AvRequest::Fundamentals { symbol, .. } => {
                params.push(("symbol", symbol.clone()));
            }
            AvRequest::Forex {
                from_symbol,
                to_symbol,
                output_size,
                ..
            } => {
                params.push(("from_symbol", from_symbol.clone()));
                params.push(("to_symbol", to_symbol.clone()));
                params.push(("outputsize", output_size.as_str().to_string()));
            }
            AvRequest::Crypto { symbol, market, .. } => {
                params.push(("symbol", symbol.clone()));
                params.push(("market", market.clone()));
            }
            AvRequest::Economic {
                indicator,
                interval,
            } => {
                params.push(("interval", interval.clone()));
                // TREASURY_YIELD requires a maturity.
                if indicator == "TREASURY_YIELD" {
                    params.push(("maturity", "10year".to_string()));
                }
            }
        }
        params
    }
}
