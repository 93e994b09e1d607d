//! Indicator records and scoring output types.
//!
//! All types here are immutable value records built once per run from fetch
//! results and consumed immediately by the scorer and renderer. Presence
//! invariants are enforced by the constructors: a record either carries its
//! observed values or an `error` string, never both.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Sentiment zone of the Market Mood Index.
///
/// `Unknown` and `Error` are reserved for readings without a value: the page
/// was fetched but no value was found, or the fetch itself failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MmiZone {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
    Unknown,
    Error,
}

impl MmiZone {
    /// Classify a reading into one of the five observable zones.
    ///
    /// Bands are half-open with no gaps or overlaps: `<30` extreme fear,
    /// `[30,50)` fear, `[50,70)` neutral, `[70,80)` greed, `>=80` extreme
    /// greed.
    pub fn classify(value: f64) -> Self {
        if value < 30.0 {
            Self::ExtremeFear
        } else if value < 50.0 {
            Self::Fear
        } else if value < 70.0 {
            Self::Neutral
        } else if value < 80.0 {
            Self::Greed
        } else {
            Self::ExtremeGreed
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeFear => "Extreme Fear",
            Self::Fear => "Fear",
            Self::Neutral => "Neutral",
            Self::Greed => "Greed",
            Self::ExtremeGreed => "Extreme Greed",
            Self::Unknown => "Unknown",
            Self::Error => "Error",
        }
    }
}

impl Display for MmiZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Market Mood Index observation.
///
/// Invariant: `zone` is `Unknown`/`Error` iff `value` is `None` iff `error`
/// is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MmiReading {
    pub value: Option<f64>,
    pub zone: MmiZone,
    pub error: Option<String>,
}

impl MmiReading {
    /// A successfully extracted reading. Rounds to two decimals and
    /// classifies the zone.
    pub fn observed(value: f64) -> Self {
        let value = round2(value);
        Self {
            value: Some(value),
            zone: MmiZone::classify(value),
            error: None,
        }
    }

    /// The page was fetched but no value could be located in it.
    pub fn unparsed(message: impl Into<String>) -> Self {
        Self {
            value: None,
            zone: MmiZone::Unknown,
            error: Some(message.into()),
        }
    }

    /// The fetch itself failed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            value: None,
            zone: MmiZone::Error,
            error: Some(message.into()),
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.value.is_some()
    }
}

/// Observed benchmark index and volatility values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketData {
    pub index_price: f64,
    pub index_change_pct: f64,
    pub volatility_price: f64,
    pub volatility_change_pct: f64,
}

/// Benchmark index / volatility snapshot.
///
/// Invariant: `data` is `Some` iff `error` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub data: Option<MarketData>,
    pub error: Option<String>,
}

impl MarketSnapshot {
    pub fn observed(
        index_price: f64,
        index_change_pct: f64,
        volatility_price: f64,
        volatility_change_pct: f64,
    ) -> Self {
        Self {
            data: Some(MarketData {
                index_price: round2(index_price),
                index_change_pct: round2(index_change_pct),
                volatility_price: round2(volatility_price),
                volatility_change_pct: round2(volatility_change_pct),
            }),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.data.is_some()
    }
}

/// Observed institutional flow values, in local-currency crore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowData {
    /// Trade date as reported upstream, `DD-Mon-YYYY`.
    pub date: String,
    pub foreign_net: f64,
    pub domestic_net: f64,
}

/// Institutional flow snapshot.
///
/// Invariant: `data` is `Some` iff `error` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub data: Option<FlowData>,
    pub error: Option<String>,
}

impl FlowSnapshot {
    pub fn observed(date: impl Into<String>, foreign_net: f64, domestic_net: f64) -> Self {
        Self {
            data: Some(FlowData {
                date: date.into(),
                foreign_net: round2(foreign_net),
                domestic_net: round2(domestic_net),
            }),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.data.is_some()
    }
}

/// Qualitative market perspective, ordered from most bullish to most bearish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Perspective {
    StronglyPositive,
    Positive,
    NeutralToPositive,
    Neutral,
    NeutralToNegative,
    Negative,
    StronglyNegative,
}

impl Perspective {
    /// Map a total score onto the perspective ladder.
    ///
    /// High-magnitude bands are checked before low-magnitude ones, so each
    /// score lands in exactly one band.
    pub const fn from_score(score: i32) -> Self {
        if score >= 6 {
            Self::StronglyPositive
        } else if score >= 3 {
            Self::Positive
        } else if score >= 1 {
            Self::NeutralToPositive
        } else if score <= -6 {
            Self::StronglyNegative
        } else if score <= -3 {
            Self::Negative
        } else if score <= -1 {
            Self::NeutralToNegative
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StronglyPositive => "STRONGLY POSITIVE",
            Self::Positive => "POSITIVE",
            Self::NeutralToPositive => "NEUTRAL TO POSITIVE",
            Self::Neutral => "NEUTRAL",
            Self::NeutralToNegative => "NEUTRAL TO NEGATIVE",
            Self::Negative => "NEGATIVE",
            Self::StronglyNegative => "STRONGLY NEGATIVE",
        }
    }
}

impl Display for Perspective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the sentiment scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub score: i32,
    pub perspective: Perspective,
    /// Human-readable driver annotations in evaluation order: mood index,
    /// index momentum, volatility, institutional flow.
    pub reasons: Vec<String>,
}

/// Round to two decimals, the precision every indicator is carried at.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
