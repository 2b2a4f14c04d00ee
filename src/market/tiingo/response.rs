use serde_json::Value;
use std::fmt::Write;

use super::request::TiingoRequest;
use crate::market::error::MarketError;
use crate::market::format::{SEPARATOR, cell, columns_of, key_values, pretty, records_table};

/// Rows shown for price-like record arrays.
const PREVIEW_ROWS: usize = 5;

pub fn render_connection(body: &Value) -> String {
    let records = as_records(body);
    let mut out = String::from("Connected to the Tiingo API\nSample of received data (first 2 records):");
    for (i, rec) in records.iter().take(2).enumerate() {
        let _ = write!(out, "\nRecord {}: {}", i + 1, pretty(rec));
    }
    out
}

pub fn render(req: &TiingoRequest, body: &Value) -> Result<String, MarketError> {
    match req {
        TiingoRequest::DailyPrices { ticker, start, end } => Ok(records_report(
            &format!("Historical prices for {ticker} from {start} to {end}"),
            as_records(body),
        )),
        TiingoRequest::Meta { ticker } => {
            let obj = body
                .as_object()
                .ok_or_else(|| MarketError::NoData(format!("metadata for {ticker}")))?;
            Ok(format!("Metadata for {ticker}:\n{}", key_values(obj, 0)))
        }
        TiingoRequest::News { tickers, limit } => Ok(render_news(tickers, *limit, body)),
        TiingoRequest::Fundamentals { ticker } => {
            let obj = body
                .as_object()
                .ok_or_else(|| MarketError::NoData(format!("fundamentals for {ticker}")))?;
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            let mut out = format!(
                "Fundamentals for {ticker}:\nAvailable sections: {}",
                keys.join(", ")
            );
            if let Some(financials) = obj.get("financials").and_then(Value::as_object) {
                out.push_str("\n\nLatest financial data:");
                for (k, v) in financials.iter().take(5) {
                    let _ = write!(out, "\n{k}: {}", cell(Some(v)));
                }
            }
            Ok(out)
        }
        TiingoRequest::SupportedTickers => {
            let tickers = as_records(body);
            let first: Vec<String> = tickers
                .iter()
                .take(10)
                .map(|t| cell(t.get("ticker")))
                .collect();
            Ok(format!(
                "Supported tickers: {}\nFirst 10 tickers: {}",
                tickers.len(),
                first.join(", ")
            ))
        }
        TiingoRequest::Crypto {
            ticker, start, end, ..
        } => {
            let data = body
                .get(0)
                .and_then(|first| first.get("data"))
                .and_then(Value::as_array)
                .ok_or_else(|| MarketError::NoData(format!("crypto prices for {ticker}")))?;
            Ok(records_report(
                &format!("Crypto prices for {ticker} from {start} to {end}"),
                data,
            ))
        }
        TiingoRequest::Forex {
            ticker, start, end, ..
        } => Ok(records_report(
            &format!("Forex prices for {ticker} from {start} to {end}"),
            as_records(body),
        )),
    }
}

fn render_news(tickers: &str, limit: u32, body: &Value) -> String {
    let mut out = format!("Latest {limit} news items for {tickers}:");
    for (i, item) in as_records(body).iter().enumerate() {
        let _ = write!(
            out,
            "\n\nNews {}:\nTitle: {}\nDate: {}\nSource: {}\nURL: {}",
            i + 1,
            cell(item.get("title")),
            cell(item.get("publishedDate")),
            cell(item.get("source")),
            cell(item.get("url")),
        );
    }
    out
}

fn records_report(title: &str, records: &[Value]) -> String {
    let mut out = format!("{title}\nTotal records: {}", records.len());
    if records.is_empty() {
        return out;
    }
    let _ = write!(
        out,
        "\nColumns: {}\n{SEPARATOR}\n{}",
        columns_of(records).join(", "),
        records_table(records, PREVIEW_ROWS)
    );
    out
}

fn as_records(body: &Value) -> &[Value] {
    body.as_array().map(Vec::as_slice).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_prices_render_as_table() {
        let body = json!([
            {"date": "2024-01-02T00:00:00.000Z", "close": 185.64, "volume": 82488700},
            {"date": "2024-01-03T00:00:00.000Z", "close": 184.25, "volume": 58414500}
        ]);
        let req = TiingoRequest::DailyPrices {
            ticker: "AAPL".into(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 31),
        };
        let out = render(&req, &body).unwrap();
        assert!(out.contains("Historical prices for AAPL from 2024-01-01 to 2024-01-31"));
        assert!(out.contains("Total records: 2"));
        assert!(out.contains("Columns: date, close, volume"));
        assert!(out.contains("184.25"));
    }

    #[test]
    fn crypto_reads_nested_data() {
        let body = json!([{"ticker": "btcusd", "data": [{"date": "2024-01-01", "close": 42000.5}]}]);
        let req = TiingoRequest::Crypto {
            ticker: "btcusd".into(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 2),
            resample: "1day".into(),
        };
        let out = render(&req, &body).unwrap();
        assert!(out.contains("42000.5"));
    }

    #[test]
    fn crypto_without_data_is_no_data() {
        let req = TiingoRequest::Crypto {
            ticker: "nope".into(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 2),
            resample: "1day".into(),
        };
        assert!(matches!(
            render(&req, &json!([])),
            Err(MarketError::NoData(_))
        ));
    }

    #[test]
    fn tickers_lists_first_ten() {
        let list: Vec<Value> = (0..12).map(|i| json!({"ticker": format!("T{i}")})).collect();
        let out = render(&TiingoRequest::SupportedTickers, &Value::Array(list)).unwrap();
        assert!(out.contains("Supported tickers: 12"));
        assert!(out.contains("T9"));
        assert!(!out.contains("T10"));
    }

    #[test]
    fn news_lists_titles() {
        let body = json!([{"title": "Apple ships", "publishedDate": "2024-01-01", "source": "x.com", "url": "https://x.com/a"}]);
        let req = TiingoRequest::News {
            tickers: "AAPL".into(),
            limit: 5,
        };
        let out = render(&req, &body).unwrap();
        assert!(out.contains("Title: Apple ships"));
        assert!(out.contains("URL: https://x.com/a"));
    }

    #[test]
    fn fundamentals_lists_sections_and_financials() {
        let body = json!({"statementData": [], "financials": {"revenue": 1, "eps": 2}});
        let req = TiingoRequest::Fundamentals {
            ticker: "AAPL".into(),
        };
        let out = render(&req, &body).unwrap();
        assert!(out.contains("Available sections: statementData, financials"));
        assert!(out.contains("revenue: 1"));
    }

    #[test]
    fn connection_shows_two_records() {
        let body = json!([{"close": 1}, {"close": 2}, {"close": 3}]);
        let out = render_connection(&body);
        assert!(out.contains("Record 2: {\n  \"close\": 2\n}"));
        assert!(!out.contains("Record 3"));
    }
}
