//! Institutional flow fetcher (Moneycontrol FII/DII activity).
//!
//! The provisional activity page is plain server-rendered HTML; the first
//! table row whose leading cell carries a `DD-Mon-YYYY` date is the latest
//! session. FII net is the 4th cell, DII net the 7th, both in ₹ crore.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use super::{parse_decimal, FetchError, BROWSER_USER_AGENT, DEFAULT_TIMEOUT_MS};
use crate::domain::FlowSnapshot;
use crate::http_client::{HttpClient, HttpRequest};

const FLOW_URL: &str =
    "https://www.moneycontrol.com/stocks/marketstats/fii_dii_activity/index.php";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("row pattern is valid"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("cell pattern is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-[A-Za-z]{3}-\d{4}").expect("date pattern is valid"));

/// Fetches FII/DII net activity from Moneycontrol.
pub struct FlowFetcher {
    http: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl FlowFetcher {
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

    /// Fetch the latest session's flows. Failures are folded into the record.
    pub async fn fetch(&self) -> FlowSnapshot {
        match self.try_fetch().await {
            Ok(snapshot) => {
                debug!(data = ?snapshot.data, "flow data fetched");
                snapshot
            }
            Err(error) => {
                warn!(code = error.code(), "flow data fetch failed: {error}");
                FlowSnapshot::failed(error.to_string())
            }
        }
    }

    async fn try_fetch(&self) -> Result<FlowSnapshot, FetchError> {
        let request = HttpRequest::get(FLOW_URL)
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::transport(format!("flow transport error: {e}")))?;

        if !response.is_success() {
            return Err(FetchError::upstream(format!(
                "flow page returned status {}",
                response.status
            )));
        }

        parse_flow_table(&response.body)
    }
}

/// Scan the page for the first dated activity row.
fn parse_flow_table(body: &str) -> Result<FlowSnapshot, FetchError> {
    for row in ROW_RE.captures_iter(body) {
        let cells: Vec<String> = CELL_RE
            .captures_iter(&row[1])
            .map(|cell| cell_text(&cell[1]))
            .collect();

        if cells.len() < 7 {
            continue;
        }
        let Some(date) = DATE_RE.find(&cells[0]) else {
            continue;
        };

        // Empty net cells show up on holidays before data lands; treat them
        // as zero, matching the upstream table's own totals.
        let foreign_net = net_value(&cells[3], "FII net")?;
        let domestic_net = net_value(&cells[6], "DII net")?;

        return Ok(FlowSnapshot::observed(
            date.as_str(),
            foreign_net,
            domestic_net,
        ));
    }

    Err(FetchError::parse("could not parse FII/DII table"))
}

fn net_value(cell: &str, label: &str) -> Result<f64, FetchError> {
    if cell.trim().is_empty() {
        return Ok(0.0);
    }
    parse_decimal(cell)
        .ok_or_else(|| FetchError::parse(format!("unreadable {label} value '{}'", cell.trim())))
}

fn cell_text(cell: &str) -> String {
    TAG_RE.replace_all(cell, "").replace("&nbsp;", " ").trim().to_owned()
}
