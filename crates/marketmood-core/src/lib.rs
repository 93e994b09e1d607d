//! # Marketmood Core
//!
//! Indicator acquisition, sentiment scoring, and report rendering for the
//! `marketmood` Indian equity market sentiment tool.
//!
//! ## Overview
//!
//! One run of the tool fetches three independent market indicators, folds
//! them through a fixed additive scoring heuristic, and renders a text
//! report:
//!
//! - **Market Mood Index** (Tickertape) — a contrarian sentiment gauge
//! - **Nifty 50 / India VIX price action** (Yahoo Finance chart API)
//! - **FII/DII institutional flows** (Moneycontrol)
//!
//! Fetchers never fail the run: an upstream error is captured inside the
//! indicator record and that indicator simply contributes nothing to the
//! score.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered mail configuration (file + environment) |
//! | [`domain`] | Indicator records and the sentiment result |
//! | [`fetch`] | Upstream indicator fetchers |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`mail`] | SMTP report delivery |
//! | [`report`] | Text report rendering |
//! | [`scoring`] | The sentiment scoring heuristic |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketmood_core::{
//!     fetch::{FlowFetcher, MarketDataFetcher, MoodIndexFetcher},
//!     http_client::ReqwestHttpClient,
//!     report::render_report,
//!     scoring::score,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let (mmi, market, flow) = tokio::join!(
//!         MoodIndexFetcher::new(http.clone()).fetch(),
//!         MarketDataFetcher::new(http.clone()).fetch(),
//!         FlowFetcher::new(http).fetch(),
//!     );
//!     let result = score(&mmi, &market, &flow);
//!     println!("{}", render_report(time::OffsetDateTime::now_utc(), &mmi, &market, &flow, &result));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Acquisition failures become `error` strings inside [`domain::MmiReading`],
//! [`domain::MarketSnapshot`], and [`domain::FlowSnapshot`]. The scorer is
//! total over its inputs and cannot fail. Delivery failures surface as
//! [`mail::MailError`] after the report has already been produced.

pub mod config;
pub mod domain;
pub mod fetch;
pub mod http_client;
pub mod mail;
pub mod report;
pub mod scoring;

// Re-export commonly used types at crate root for convenience

pub use config::{ConfigError, MailConfig};
pub use domain::{FlowData, FlowSnapshot, MarketData, MarketSnapshot, MmiReading, MmiZone, Perspective, SentimentResult};
pub use fetch::{FetchError, FetchErrorKind, FlowFetcher, MarketDataFetcher, MoodIndexFetcher};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient};
pub use mail::{MailError, MailMessage, MailTransport, RecordingMailer, SmtpMailer};
pub use report::{email_subject, render_report};
pub use scoring::score;
