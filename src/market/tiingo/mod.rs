//! Tiingo REST client. Authenticates with `Authorization: Token <token>`.

pub mod request;
pub mod response;

pub use request::TiingoRequest;
pub use response::{render, render_connection};

use crate::config::TiingoConfig;
use crate::market::client::{read_json, redact_url};
use crate::market::error::MarketError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

#[derive(Clone)]
pub struct TiingoClient {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl TiingoClient {
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        token: impl AsRef<str>,
    ) -> Result<Self, MarketError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Token {}", token.as_ref()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    /// Build from config; `token` overrides the configured token.
    pub fn from_config(
        http: reqwest::Client,
        cfg: &TiingoConfig,
        token: Option<String>,
    ) -> Result<Self, MarketError> {
        let token = token
            .or_else(|| cfg.api_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or(MarketError::MissingApiKey("Tiingo"))?;
        Self::new(http, cfg.base_url.clone(), token)
    }

    pub fn request_url(&self, req: &TiingoRequest) -> Result<Url, MarketError> {
        let mut url = self.base_url.join(&req.path())?;
        let query = req.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Tiingo signals errors with HTTP status codes, so any 2xx body is data.
    pub async fn fetch(&self, req: &TiingoRequest) -> Result<Value, MarketError> {
        let url = self.request_url(req)?;
        debug!(url = %redact_url(&url), "tiingo request");
        let resp = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn report(&self, req: &TiingoRequest) -> Result<String, MarketError> {
        let body = self.fetch(req).await?;
        render(req, &body)
    }

    pub async fn check_connection(&self) -> Result<String, MarketError> {
        let body = self.fetch(&TiingoRequest::connection_probe()).await?;
        Ok(render_connection(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::market::client::build_http_client;

    fn client() -> TiingoClient {
        TiingoClient::from_config(
            build_http_client(&HttpConfig::default()).unwrap(),
            &TiingoConfig::default(),
            Some("tok".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn joins_path_and_query() {
        let url = client()
            .request_url(&TiingoRequest::News {
                tickers: "AAPL,MSFT".into(),
                limit: 3,
            })
            .unwrap();
        assert_eq!(url.path(), "/tiingo/news");
        assert_eq!(url.query(), Some("tickers=AAPL%2CMSFT&limit=3"));
    }

    #[test]
    fn no_query_string_without_params() {
        let url = client()
            .request_url(&TiingoRequest::Meta {
                ticker: "MSFT".into(),
            })
            .unwrap();
        assert_eq!(url.as_str(), "https://api.tiingo.com/tiingo/daily/MSFT");
    }

    #[test]
    fn token_header_is_set_and_sensitive() {
        let c = client();
        let auth = c.headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Token tok");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = TiingoClient::from_config(
            build_http_client(&HttpConfig::default()).unwrap(),
            &TiingoConfig::default(),
            None,
        );
        assert!(matches!(err, Err(MarketError::MissingApiKey("Tiingo"))));
    }
}
