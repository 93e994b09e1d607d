//! Text report rendering.
//!
//! The renderer returns the report as a plain string value; the caller
//! decides whether it goes to the console, to email, or both. Output is
//! locale-stable: every decimal is rendered with two fixed places, and
//! deltas carry an explicit `+` only when strictly positive.

use std::fmt::Write;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::domain::{FlowSnapshot, MarketSnapshot, MmiReading, SentimentResult};

const BANNER: &str = "============================================================";
const RULE: &str = "-------------------------------------------------------";

/// Render the full report for one run.
pub fn render_report(
    generated_at: OffsetDateTime,
    mmi: &MmiReading,
    market: &MarketSnapshot,
    flow: &FlowSnapshot,
    result: &SentimentResult,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(
        out,
        "   INDIAN MARKET SENTIMENT REPORT - {}",
        header_stamp(generated_at)
    );
    let _ = writeln!(out, "{BANNER}");

    let _ = writeln!(out, "\n-------------------- DATA SUMMARY --------------------");
    match (mmi.value, &mmi.error) {
        (Some(value), _) => {
            let _ = writeln!(out, "{:<16}: {value:.2} [{}]", "MMI Score", mmi.zone);
        }
        (None, error) => {
            let _ = writeln!(
                out,
                "{:<16}: Error ({})",
                "MMI Score",
                error.as_deref().unwrap_or("unknown")
            );
        }
    }

    match (&market.data, &market.error) {
        (Some(data), _) => {
            let _ = writeln!(
                out,
                "{:<16}: {:.2} ({}%)",
                "Nifty 50",
                data.index_price,
                signed(data.index_change_pct)
            );
            let _ = writeln!(
                out,
                "{:<16}: {:.2} ({}%)",
                "India VIX",
                data.volatility_price,
                signed(data.volatility_change_pct)
            );
        }
        (None, error) => {
            let _ = writeln!(
                out,
                "{:<16}: Error ({})",
                "Market Data",
                error.as_deref().unwrap_or("unknown")
            );
        }
    }

    match (&flow.data, &flow.error) {
        (Some(data), _) => {
            let _ = writeln!(out, "{:<16}: {} Cr", "FII Net Activity", signed(data.foreign_net));
            let _ = writeln!(out, "{:<16}: {} Cr", "DII Net Activity", signed(data.domestic_net));
            let _ = writeln!(out, "{:<16}: {}", "Flow Date", data.date);
        }
        (None, error) => {
            let _ = writeln!(
                out,
                "{:<16}: Error ({})",
                "Flow Data",
                error.as_deref().unwrap_or("unknown")
            );
        }
    }

    let _ = writeln!(out, "\n-------------------- FINAL PERSPECTIVE --------------------");
    let _ = writeln!(out, "   >>> {} <<<", result.perspective);
    let _ = writeln!(out, "{RULE}");

    let _ = writeln!(out, "\nKey Sentiment Drivers:");
    for reason in &result.reasons {
        let _ = writeln!(out, "  \u{2022} {reason}");
    }

    let _ = writeln!(out, "\n{BANNER}");
    let _ = writeln!(out, " Disclaimer: This analysis is for educational purposes only.");
    let _ = writeln!(out, "{BANNER}");

    out
}

/// Subject line for the emailed report.
pub fn email_subject(result: &SentimentResult, generated_at: OffsetDateTime) -> String {
    let stamp = generated_at
        .format(format_description!("[day] [month repr:short]"))
        .unwrap_or_default();
    format!("Market Sentiment Report: {} ({stamp})", result.perspective)
}

fn header_stamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[day] [month repr:short] [year] [hour]:[minute]"
    ))
    .unwrap_or_default()
}

/// Two-decimal rendering with an explicit `+` for strictly positive values;
/// zero and negatives carry no prefix beyond their own sign.
fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}
