use crate::config::HttpConfig;
use crate::market::error::MarketError;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Build the shared HTTP client used by every provider.
pub fn build_http_client(cfg: &HttpConfig) -> Result<reqwest::Client, MarketError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .timeout(Duration::from_secs(cfg.timeout_secs));
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

/// Read a JSON body, turning any non-2xx status into [`MarketError::Http`] with the raw text.
pub async fn read_json(resp: reqwest::Response) -> Result<Value, MarketError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        debug!(%status, "upstream returned error status");
        return Err(MarketError::Http { status, body });
    }
    Ok(resp.json::<Value>().await?)
}

/// Render a request URL for logs with credential-bearing query values masked.
pub fn redact_url(url: &Url) -> String {
    const SECRET_KEYS: [&str; 3] = ["apikey", "token", "api_key"];
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_KEYS.iter().any(|s| k.eq_ignore_ascii_case(s)) {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_key_but_keeps_other_params() {
        let url = Url::parse(
            "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol=AAPL&apikey=SECRET",
        )
        .unwrap();
        let shown = redact_url(&url);
        assert!(!shown.contains("SECRET"));
        assert!(shown.contains("symbol=AAPL"));
        assert!(shown.contains("apikey=***") || shown.contains("apikey=%2A%2A%2A"));
    }

    #[test]
    fn url_without_query_is_unchanged() {
        let url = Url::parse("https://api.tiingo.com/tiingo/daily/AAPL").unwrap();
        assert_eq!(redact_url(&url), "https://api.tiingo.com/tiingo/daily/AAPL");
    }

    #[test]
    fn builds_client_with_defaults() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }
}
