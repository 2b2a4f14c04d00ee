use reqwest::StatusCode;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MarketError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("upstream returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("call frequency limit reached: {0}")]
    RateLimited(String),

    #[error("missing credential for {0}; set it in config.toml, the environment, or on the command line")]
    MissingApiKey(&'static str),

    #[error("no data: {0}")]
    NoData(String),
}
