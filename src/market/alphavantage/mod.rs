//! Alpha Vantage `/query` client.
//!
//! Every call is a single GET with the function name and parameters in the query string
//! and the key in `apikey`. Errors and rate-limit notes arrive as 200 responses, so the
//! body is run through [`classify`] before rendering.

pub mod request;
pub mod response;

pub use request::{AvRequest, FundamentalFunction, OutputSize};
pub use response::{ApiOutcome, classify, render, render_connection};

use crate::config::AlphaVantageConfig;
use crate::market::client::{read_json, redact_url};
use crate::market::error::MarketError;
use tracing::debug;
use url::Url;

/// Free-plan limits, printed alongside a rate-limit note.
pub const FREE_PLAN_LIMITS: &str =
    "Alpha Vantage allows 5 calls per minute and 500 per day on the free plan.";

#[derive(Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(http: reqwest::Client, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Build from config; `api_key` overrides the configured key.
    pub fn from_config(
        http: reqwest::Client,
        cfg: &AlphaVantageConfig,
        api_key: Option<String>,
    ) -> Result<Self, MarketError> {
        let key = api_key
            .or_else(|| cfg.api_key.clone())
            .filter(|k| !k.is_empty())
            .ok_or(MarketError::MissingApiKey("Alpha Vantage"))?;
        Ok(Self::new(http, cfg.base_url.clone(), key))
    }

    pub fn request_url(&self, req: &AvRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(req.params())
            .append_pair("apikey", &self.api_key);
        url
    }

    /// Issue the request and classify the body. Transport failures and non-2xx
    /// statuses are `Err`; API errors and rate-limit notes are `Ok` outcomes.
    pub async fn fetch(&self, req: &AvRequest) -> Result<ApiOutcome, MarketError> {
        let url = self.request_url(req);
        debug!(url = %redact_url(&url), "alpha vantage request");
        let resp = self.http.get(url).send().await?;
        let body = read_json(resp).await?;
        Ok(classify(body))
    }

    /// Fetch and render `req`.
    pub async fn report(&self, req: &AvRequest) -> Result<String, MarketError> {
        let body = self.fetch(req).await?.into_data()?;
        render(req, &body)
    }

    /// Reachability probe. A rate-limit note still proves the API and key are reachable,
    /// so it is reported as success.
    pub async fn check_connection(&self) -> Result<String, MarketError> {
        match self.fetch(&AvRequest::connection_probe()).await? {
            ApiOutcome::Data(body) => Ok(render_connection(&body)),
            ApiOutcome::RateLimited(note) => Ok(format!(
                "Call frequency notice: {note}\n{FREE_PLAN_LIMITS}"
            )),
            ApiOutcome::ApiError(msg) => Err(MarketError::Api(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::market::client::build_http_client;

    fn client(key: Option<&str>, override_key: Option<&str>) -> Result<AlphaVantageClient, MarketError> {
        let mut cfg = AlphaVantageConfig::default();
        cfg.api_key = key.map(str::to_string);
        AlphaVantageClient::from_config(
            build_http_client(&HttpConfig::default())?,
            &cfg,
            override_key.map(str::to_string),
        )
    }

    #[test]
    fn request_url_carries_params_and_key() {
        let c = client(Some("KEY123"), None).unwrap();
        let url = c.request_url(&AvRequest::SymbolSearch {
            keywords: "Microsoft Corp".into(),
        });
        assert_eq!(url.host_str(), Some("www.alphavantage.co"));
        assert_eq!(url.path(), "/query");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("function".into(), "SYMBOL_SEARCH".into())));
        assert!(pairs.contains(&("keywords".into(), "Microsoft Corp".into())));
        assert!(pairs.contains(&("apikey".into(), "KEY123".into())));
    }

    #[test]
    fn command_line_key_overrides_config() {
        let c = client(Some("from-config"), Some("from-cli")).unwrap();
        let url = c.request_url(&AvRequest::connection_probe());
        assert!(url.as_str().contains("apikey=from-cli"));
    }

    #[test]
    fn missing_key_is_an_error() {
        assert!(matches!(
            client(None, None),
            Err(MarketError::MissingApiKey(_))
        ));
        assert!(matches!(
            client(Some(""), None),
            Err(MarketError::MissingApiKey(_))
        ));
    }
}
