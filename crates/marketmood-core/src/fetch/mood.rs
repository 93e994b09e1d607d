//! Market Mood Index fetcher (Tickertape).
//!
//! The value lives inside the page's `__NEXT_DATA__` JSON blob. The primary
//! extraction walks a typed optional path against the known page schema;
//! because that schema is not under our control, a raw text scan for the
//! `"currentValue"` field is kept as a documented degradation path.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{parse_decimal, FetchError, BROWSER_USER_AGENT, DEFAULT_TIMEOUT_MS};
use crate::domain::MmiReading;
use crate::http_client::{HttpClient, HttpRequest};

const MOOD_INDEX_URL: &str = "https://www.tickertape.in/market-mood-index";

static CURRENT_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""currentValue"\s*:\s*"?([0-9][0-9,]*(?:\.[0-9]+)?)"#)
        .expect("current value pattern is valid")
});

/// Fetches the Market Mood Index from Tickertape.
pub struct MoodIndexFetcher {
    http: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl MoodIndexFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Fetch the current reading. Failures are folded into the record.
    pub async fn fetch(&self) -> MmiReading {
        match self.try_fetch().await {
            Ok(reading) => {
                debug!(value = ?reading.value, zone = %reading.zone, "mood index fetched");
                reading
            }
            Err(error) => {
                warn!(code = error.code(), "mood index fetch failed: {error}");
                MmiReading::failed(error.to_string())
            }
        }
    }

    async fn try_fetch(&self) -> Result<MmiReading, FetchError> {
        let request = HttpRequest::get(MOOD_INDEX_URL)
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::transport(format!("mood index transport error: {e}")))?;

        if !response.is_success() {
            return Err(FetchError::upstream(format!(
                "mood index page returned status {}",
                response.status
            )));
        }

        Ok(extract_reading(&response.body))
    }
}

/// Extract a reading from the page body, trying the typed page-state path
/// first and the text scan second.
fn extract_reading(body: &str) -> MmiReading {
    if let Some(value) = extract_from_page_state(body) {
        return MmiReading::observed(value);
    }
    if let Some(value) = extract_from_text_scan(body) {
        return MmiReading::observed(value);
    }
    MmiReading::unparsed("could not locate a mood index value in the page")
}

// ============================================================================
// Page-state extraction (primary)
// ============================================================================

/// Schema of the `__NEXT_DATA__` blob, reduced to the paths carrying the
/// index value: `props.pageProps.nowData.currentValue` on current pages,
/// `props.pageProps.data.mmi` on older ones.
#[derive(Debug, Deserialize)]
struct PageState {
    #[serde(default)]
    props: Option<PageStateProps>,
}

#[derive(Debug, Deserialize)]
struct PageStateProps {
    #[serde(rename = "pageProps", default)]
    page_props: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(rename = "nowData", default)]
    now_data: Option<NowData>,
    #[serde(default)]
    data: Option<LegacyMoodData>,
}

#[derive(Debug, Deserialize)]
struct NowData {
    #[serde(rename = "currentValue", default)]
    current_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LegacyMoodData {
    #[serde(default)]
    mmi: Option<f64>,
}

fn extract_from_page_state(body: &str) -> Option<f64> {
    let blob = next_data_blob(body)?;
    let state: PageState = serde_json::from_str(blob).ok()?;
    let page_props = state.props?.page_props?;

    page_props
        .now_data
        .and_then(|now| now.current_value)
        .or_else(|| page_props.data.and_then(|data| data.mmi))
        .filter(|v| v.is_finite())
}

/// Slice out the JSON payload of the `__NEXT_DATA__` script tag.
fn next_data_blob(body: &str) -> Option<&str> {
    let marker = body.find("id=\"__NEXT_DATA__\"")?;
    let open = body[marker..].find('>')? + marker + 1;
    let close = body[open..].find("</script>")? + open;
    Some(body[open..close].trim())
}

// ============================================================================
// Text scan (degradation path)
// ============================================================================

fn extract_from_text_scan(body: &str) -> Option<f64> {
    CURRENT_VALUE_RE
        .captures(body)
        .and_then(|captures| parse_decimal(&captures[1]))
}
