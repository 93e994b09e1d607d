//! Upstream indicator fetchers.
//!
//! Each fetcher wraps an [`HttpClient`](crate::http_client::HttpClient) and
//! returns its indicator record by value. Fetchers never return `Err` to the
//! caller: transport, upstream, and parse failures are folded into the
//! record's `error` field so one bad indicator cannot take down the run.
//!
//! | Fetcher | Upstream | Record |
//! |---------|----------|--------|
//! | [`MoodIndexFetcher`] | Tickertape market mood index page | [`MmiReading`](crate::domain::MmiReading) |
//! | [`MarketDataFetcher`] | Yahoo Finance chart API (Nifty 50, India VIX) | [`MarketSnapshot`](crate::domain::MarketSnapshot) |
//! | [`FlowFetcher`] | Moneycontrol FII/DII activity page | [`FlowSnapshot`](crate::domain::FlowSnapshot) |

mod flow;
mod market;
mod mood;

use std::fmt::{Display, Formatter};

pub use flow::FlowFetcher;
pub use market::MarketDataFetcher;
pub use mood::MoodIndexFetcher;

/// Browser user agent sent to scraped pages; both Tickertape and
/// Moneycontrol serve reduced markup to non-browser agents.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default per-request timeout for upstream calls.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The HTTP call itself failed (connect, timeout, body read).
    Transport,
    /// The upstream answered, but with a non-success status or an
    /// API-level error payload.
    Upstream,
    /// The payload arrived but could not be interpreted.
    Parse,
}

/// Structured fetch error folded into indicator records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Upstream,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Parse,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::Upstream => "fetch.upstream",
            FetchErrorKind::Parse => "fetch.parse",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// Parse a decimal that may carry thousands separators ("1,234.56").
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
