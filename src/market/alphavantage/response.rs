use serde_json::{Map, Value};
use std::fmt::Write;

use super::request::{AvRequest, FundamentalFunction};
use crate::market::error::MarketError;
use crate::market::format::{cell, key_values, series_period, series_table};

/// Fields shown for a company OVERVIEW.
const OVERVIEW_FIELDS: [&str; 12] = [
    "Symbol",
    "Name",
    "Description",
    "Exchange",
    "Industry",
    "Sector",
    "MarketCapitalization",
    "PERatio",
    "DividendYield",
    "EPS",
    "52WeekHigh",
    "52WeekLow",
];

/// Alpha Vantage answers 200 for almost everything; the body says what really happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Data(Value),
    ApiError(String),
    RateLimited(String),
}

impl ApiOutcome {
    pub fn into_data(self) -> Result<Value, MarketError> {
        match self {
            ApiOutcome::Data(v) => Ok(v),
            ApiOutcome::ApiError(msg) => Err(MarketError::Api(msg)),
            ApiOutcome::RateLimited(note) => Err(MarketError::RateLimited(note)),
        }
    }
}

pub fn classify(body: Value) -> ApiOutcome {
    if let Some(msg) = body.get("Error Message").and_then(Value::as_str) {
        return ApiOutcome::ApiError(msg.to_string());
    }
    if let Some(note) = body.get("Note").and_then(Value::as_str)
        && note.contains("call frequency")
    {
        return ApiOutcome::RateLimited(note.to_string());
    }
    if let Some(info) = body.get("Information").and_then(Value::as_str) {
        if info.to_ascii_lowercase().contains("rate limit") {
            return ApiOutcome::RateLimited(info.to_string());
        }
        // A lone notice (premium endpoint, bad parameter) carries no data.
        if body.as_object().is_some_and(|obj| obj.len() == 1) {
            return ApiOutcome::ApiError(info.to_string());
        }
    }
    ApiOutcome::Data(body)
}

/// Render the metadata block printed by the connection check.
pub fn render_connection(body: &Value) -> String {
    let mut out = String::from("Connected to the Alpha Vantage API\nMetadata received:");
    if let Some(meta) = body.get("Meta Data").and_then(Value::as_object) {
        let _ = write!(out, "\n{}", key_values(meta, 2));
    }
    out
}

/// Render a successful response for `req`.
pub fn render(req: &AvRequest, body: &Value) -> Result<String, MarketError> {
    match req {
        AvRequest::Daily {
            symbol,
            output_size,
        } => {
            let series = object_at(body, "Time Series (Daily)")
                .ok_or_else(|| no_data(format!("daily series for {symbol}")))?;
            Ok(series_report(
                &format!("Daily data for {symbol} (size: {})", output_size.as_str()),
                series,
                5,
                |_| true,
            ))
        }
        AvRequest::Intraday {
            symbol,
            interval,
            output_size,
        } => {
            let key = format!("Time Series ({interval})");
            let series = object_at(body, &key)
                .ok_or_else(|| no_data(format!("intraday series for {symbol}")))?;
            Ok(series_report(
                &format!(
                    "Intraday data for {symbol} (interval: {interval}, size: {})",
                    output_size.as_str()
                ),
                series,
                5,
                |_| true,
            ))
        }
        AvRequest::SymbolSearch { keywords } => Ok(render_search(keywords, body)),
        AvRequest::Indicator {
            symbol,
            function,
            interval,
            time_period,
            ..
        } => {
            let (_, data) = body
                .as_object()
                .and_then(|obj| obj.iter().find(|(k, _)| !k.contains("Meta Data")))
                .and_then(|(k, v)| Some((k, v.as_object()?)))
                .ok_or_else(|| no_data("technical indicator data".to_string()))?;
            let mut out = format!(
                "Technical indicator {function} for {symbol} (interval: {interval}, period: {time_period}):"
            );
            push_meta(&mut out, body);
            out.push('\n');
            out.push_str(&series_report("", data, 5, |_| true));
            Ok(out)
        }
        AvRequest::Fundamentals { symbol, function } => render_fundamentals(symbol, *function, body),
        AvRequest::Forex {
            from_symbol,
            to_symbol,
            function,
            ..
        } => {
            let series = find_object(body, "Time Series FX")
                .ok_or_else(|| no_data("forex series".to_string()))?;
            let mut out = format!("Forex data for {from_symbol}/{to_symbol} ({function}):");
            push_meta(&mut out, body);
            out.push('\n');
            out.push_str(&series_report("", series, 3, |_| true));
            Ok(out)
        }
        AvRequest::Crypto {
            symbol,
            market,
            function,
        } => {
            let series = find_object(body, "Time Series (Digital Currency")
                .ok_or_else(|| no_data("digital currency series".to_string()))?;
            let mut out = format!("{symbol} in {market} ({function}):");
            push_meta(&mut out, body);
            out.push('\n');
            let has_usd = series
                .values()
                .filter_map(Value::as_object)
                .any(|day| day.keys().any(|k| k.contains("USD")));
            out.push_str(&series_report("", series, 3, |field| {
                !has_usd || field.contains("USD")
            }));
            Ok(out)
        }
        AvRequest::Economic { .. } => Ok(render_economic(body)),
    }
}

fn render_search(keywords: &str, body: &Value) -> String {
    let matches = body
        .get("bestMatches")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut out = format!(
        "Search results for '{keywords}':\nTotal matches: {}",
        matches.len()
    );
    for (i, m) in matches.iter().enumerate() {
        let _ = write!(
            out,
            "\n\nMatch {}:\nSymbol: {}\nName: {}\nType: {}\nRegion: {}\nTimezone: {}\nCurrency: {}",
            i + 1,
            cell(m.get("1. symbol")),
            cell(m.get("2. name")),
            cell(m.get("3. type")),
            cell(m.get("4. region")),
            cell(m.get("7. timezone")),
            cell(m.get("8. currency")),
        );
    }
    out
}

fn render_fundamentals(
    symbol: &str,
    function: FundamentalFunction,
    body: &Value,
) -> Result<String, MarketError> {
    let obj = body
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| {
            no_data(format!(
                "no fundamentals for {symbol} with function {}",
                function.as_str()
            ))
        })?;

    let mut out = format!("Fundamentals ({}) for {symbol}:", function.as_str());
    match function {
        FundamentalFunction::Overview => {
            for key in OVERVIEW_FIELDS {
                if let Some(v) = obj.get(key) {
                    let _ = write!(out, "\n{key}: {}", cell(Some(v)));
                }
            }
            let _ = write!(out, "\n\nTotal fields available: {}", obj.len());
        }
        FundamentalFunction::IncomeStatement
        | FundamentalFunction::BalanceSheet
        | FundamentalFunction::CashFlow => {
            let annual = array_at(obj, "annualReports");
            let quarterly = array_at(obj, "quarterlyReports");
            let _ = write!(
                out,
                "\nAnnual reports available: {}\nQuarterly reports available: {}",
                annual.len(),
                quarterly.len()
            );
            if let Some(report) = annual.first().and_then(Value::as_object) {
                let _ = write!(
                    out,
                    "\n\nLatest annual report:\nFiscal date: {}",
                    cell(report.get("fiscalDateEnding"))
                );
                for (k, v) in report.iter().take(10) {
                    let _ = write!(out, "\n  {k}: {}", cell(Some(v)));
                }
                out.push_str("\n  ...");
            }
        }
        FundamentalFunction::Earnings => {
            let annual = array_at(obj, "annualEarnings");
            let quarterly = array_at(obj, "quarterlyEarnings");
            let _ = write!(
                out,
                "\nAnnual earnings reports: {}\nQuarterly earnings reports: {}",
                annual.len(),
                quarterly.len()
            );
            if !quarterly.is_empty() {
                out.push_str("\n\nLatest quarterly earnings:");
            }
            for (i, q) in quarterly.iter().take(4).enumerate() {
                let _ = write!(
                    out,
                    "\n\nQuarter {}:\n  Fiscal date: {}\n  Reported date: {}\n  Estimated EPS: {}\n  Reported EPS: {}\n  Surprise: {}\n  Surprise %: {}",
                    i + 1,
                    cell(q.get("fiscalDateEnding")),
                    cell(q.get("reportedDate")),
                    cell(q.get("estimatedEPS")),
                    cell(q.get("reportedEPS")),
                    cell(q.get("surprise")),
                    cell(q.get("surprisePercentage")),
                );
            }
        }
    }
    Ok(out)
}

fn render_economic(body: &Value) -> String {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed indicator");
    let points = body
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut out = format!(
        "Economic indicator: {name}\nInterval: {}\nUnit: {}\nTotal records: {}",
        cell(body.get("interval")),
        cell(body.get("unit")),
        points.len()
    );
    if !points.is_empty() {
        out.push_str("\n\nMost recent data:");
    }
    for p in points.iter().take(5) {
        let date = p.get("date").and_then(Value::as_str).unwrap_or("no date");
        let value = p.get("value").and_then(Value::as_str).unwrap_or("no value");
        let _ = write!(out, "\n{date}: {value}");
    }
    out
}

/// Header line, period, record count and a table of the newest `limit` rows.
fn series_report(
    title: &str,
    series: &Map<String, Value>,
    limit: usize,
    keep: impl Fn(&str) -> bool,
) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        let _ = writeln!(out, "{title}:");
    }
    if let Some((oldest, newest)) = series_period(series) {
        let _ = writeln!(out, "Period: {oldest} to {newest}");
    }
    let _ = writeln!(out, "Total records: {}", series.len());
    if !series.is_empty() {
        let _ = writeln!(out, "Most recent entries:");
        out.push_str(&series_table(series, limit, keep));
    }
    out
}

fn push_meta(out: &mut String, body: &Value) {
    if let Some(meta) = body.get("Meta Data").and_then(Value::as_object) {
        let _ = write!(out, "\n\nMetadata:\n{}", key_values(meta, 2));
    }
}

fn object_at<'a>(body: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    body.get(key).and_then(Value::as_object)
}

fn find_object<'a>(body: &'a Value, key_fragment: &str) -> Option<&'a Map<String, Value>> {
    body.as_object()?
        .iter()
        .find(|(k, _)| k.contains(key_fragment))
        .and_then(|(_, v)| v.as_object())
}

fn array_at<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn no_data(what: String) -> MarketError {
    MarketError::NoData(what)
}
