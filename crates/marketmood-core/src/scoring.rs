//! The sentiment scoring heuristic.
//!
//! A rule-based additive model over four independent signal groups: mood
//! index (contrarian), index momentum, volatility, and institutional flow.
//! Each group adds to an integer accumulator and appends one reason string;
//! a group whose input carries an error contributes zero and no reason.
//! The scorer is total: it never fails, and an all-errors input yields a
//! neutral result with no reasons.

use crate::domain::{
    FlowSnapshot, MarketSnapshot, MmiReading, MmiZone, Perspective, SentimentResult,
};

/// Combine the three indicators into a score and perspective.
///
/// Pure and deterministic; evaluation order is fixed and determines the
/// order of `reasons`.
pub fn score(mmi: &MmiReading, market: &MarketSnapshot, flow: &FlowSnapshot) -> SentimentResult {
    let mut score = 0_i32;
    let mut reasons = Vec::new();

    // Mood index is a contrarian indicator at the extremes: fear zones are
    // read as buying opportunity, greed zones as risk.
    if let Some(value) = mmi.value {
        reasons.push(format!("MMI: {value:.2} ({})", mmi.zone));
        score += match mmi.zone {
            MmiZone::ExtremeFear => 2,
            MmiZone::Fear => 1,
            MmiZone::Greed => -1,
            MmiZone::ExtremeGreed => -2,
            _ => 0,
        };
    }

    if let Some(data) = &market.data {
        let c = data.index_change_pct;
        reasons.push(format!("Index: {c:.2}%"));
        score += if c > 1.5 {
            4
        } else if c > 0.8 {
            2
        } else if c > 0.3 {
            1
        } else if c < -1.5 {
            -4
        } else if c < -0.8 {
            -2
        } else if c < -0.3 {
            -1
        } else {
            0
        };
    }

    // Volatility shares the market snapshot's error gate: both come from the
    // same upstream fetch. Level and change components fire independently.
    if let Some(data) = &market.data {
        let v = data.volatility_price;
        let vc = data.volatility_change_pct;
        reasons.push(format!("Volatility: {v:.2} ({vc:.2}% change)"));
        score += if v > 22.0 {
            -3
        } else if v > 18.0 {
            -2
        } else if v > 15.0 {
            -1
        } else {
            0
        };
        score += if vc > 10.0 {
            -2
        } else if vc > 5.0 {
            -1
        } else if vc < -5.0 {
            1
        } else {
            0
        };
    }

    if let Some(data) = &flow.data {
        let f = data.foreign_net;
        reasons.push(format!("Foreign Net Flow: {f:.2} Cr"));
        score += if f > 3000.0 {
            2
        } else if f > 0.0 {
            1
        } else if f < -3000.0 {
            -2
        } else if f < 0.0 {
            -1
        } else {
            0
        };
    }

    SentimentResult {
        score,
        perspective: Perspective::from_score(score),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_mmi() -> MmiReading {
        MmiReading::failed("mmi fetch failed")
    }

    fn no_market() -> MarketSnapshot {
        MarketSnapshot::failed("market fetch failed")
    }

    fn no_flow() -> FlowSnapshot {
        FlowSnapshot::failed("flow fetch failed")
    }

    fn calm_market(index_change_pct: f64) -> MarketSnapshot {
        MarketSnapshot::observed(24_500.0, index_change_pct, 12.0, 0.0)
    }

    #[test]
    fn all_errors_input_is_a_valid_neutral_result() {
        let result = score(&no_mmi(), &no_market(), &no_flow());

        assert_eq!(result.score, 0);
        assert_eq!(result.perspective, Perspective::Neutral);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn errored_groups_contribute_nothing_while_others_still_count() {
        let flow = FlowSnapshot::observed("04-Aug-2026", 3500.0, 100.0);
        let result = score(&no_mmi(), &no_market(), &flow);

        assert_eq!(result.score, 2);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].starts_with("Foreign Net Flow:"));
    }

    #[test]
    fn mmi_zones_score_contrarian() {
        let cases = [
            (10.0, 2),  // extreme fear is bullish
            (40.0, 1),  // fear
            (60.0, 0),  // neutral
            (75.0, -1), // greed
            (90.0, -2), // extreme greed is bearish
        ];
        for (value, expected) in cases {
            let result = score(&MmiReading::observed(value), &no_market(), &no_flow());
            assert_eq!(result.score, expected, "mmi value {value}");
        }
    }

    #[test]
    fn index_momentum_thresholds_are_first_matching_not_cumulative() {
        let cases = [
            (2.0, 4),
            (1.5, 2), // not strictly above 1.5, falls to the next band
            (1.0, 2),
            (0.5, 1),
            (0.3, 0),
            (0.0, 0),
            (-0.3, 0),
            (-0.5, -1),
            (-1.0, -2),
            (-2.0, -4),
        ];
        for (change, expected) in cases {
            let market = MarketSnapshot::observed(24_500.0, change, 12.0, 0.0);
            let result = score(&no_mmi(), &market, &no_flow());
            assert_eq!(result.score, expected, "index change {change}");
        }
    }

    #[test]
    fn volatility_level_and_change_components_add_independently() {
        // Elevated level and spiking change both fire.
        let market = MarketSnapshot::observed(24_500.0, 0.0, 23.0, 12.0);
        let result = score(&no_mmi(), &market, &no_flow());
        assert_eq!(result.score, -5);

        // Cooling volatility claws back a point even at a mild level.
        let market = MarketSnapshot::observed(24_500.0, 0.0, 14.0, -6.0);
        let result = score(&no_mmi(), &market, &no_flow());
        assert_eq!(result.score, 1);

        // Mid-band level, flat change.
        let market = MarketSnapshot::observed(24_500.0, 0.0, 19.0, 0.0);
        let result = score(&no_mmi(), &market, &no_flow());
        assert_eq!(result.score, -2);
    }

    #[test]
    fn foreign_flow_bands_include_exact_zero() {
        let cases = [
            (5000.0, 2),
            (3000.0, 1), // not strictly above 3000
            (100.0, 1),
            (0.0, 0),
            (-100.0, -1),
            (-3000.0, -1),
            (-5000.0, -2),
        ];
        for (net, expected) in cases {
            let flow = FlowSnapshot::observed("04-Aug-2026", net, 0.0);
            let result = score(&no_mmi(), &no_market(), &flow);
            assert_eq!(result.score, expected, "foreign net {net}");
        }
    }

    #[test]
    fn bullish_scenario_hits_strongly_positive_with_four_ordered_reasons() {
        let mmi = MmiReading::observed(22.0);
        let market = MarketSnapshot::observed(24_800.0, 1.8, 14.0, -6.0);
        let flow = FlowSnapshot::observed("04-Aug-2026", 3500.0, 1200.0);

        let result = score(&mmi, &market, &flow);

        // 2 (mmi) + 4 (momentum) + 0 (vix level) + 1 (vix change) + 2 (flow)
        assert_eq!(result.score, 9);
        assert_eq!(result.perspective, Perspective::StronglyPositive);
        assert_eq!(result.reasons.len(), 4);
        assert!(result.reasons[0].starts_with("MMI:"));
        assert!(result.reasons[1].starts_with("Index:"));
        assert!(result.reasons[2].starts_with("Volatility:"));
        assert!(result.reasons[3].starts_with("Foreign Net Flow:"));
    }

    #[test]
    fn bearish_scenario_hits_strongly_negative() {
        let mmi = MmiReading::observed(85.0);
        let market = MarketSnapshot::observed(23_900.0, -2.0, 24.0, 12.0);
        let flow = FlowSnapshot::observed("04-Aug-2026", -4000.0, 500.0);

        let result = score(&mmi, &market, &flow);

        // -2 (mmi) - 4 (momentum) - 3 (vix level) - 2 (vix change) - 2 (flow)
        assert_eq!(result.score, -13);
        assert_eq!(result.perspective, Perspective::StronglyNegative);
        assert_eq!(result.reasons.len(), 4);
    }

    #[test]
    fn volatility_is_gated_on_the_market_error_flag() {
        // Market errored: neither momentum nor volatility contributes, even
        // though volatility is logically a separate signal.
        let flow = FlowSnapshot::observed("04-Aug-2026", 0.0, 0.0);
        let result = score(&no_mmi(), &no_market(), &flow);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].starts_with("Foreign Net Flow:"));
    }

    #[test]
    fn scoring_is_idempotent() {
        let mmi = MmiReading::observed(22.0);
        let market = MarketSnapshot::observed(24_800.0, 1.8, 14.0, -6.0);
        let flow = FlowSnapshot::observed("04-Aug-2026", 3500.0, 1200.0);

        let first = score(&mmi, &market, &flow);
        let second = score(&mmi, &market, &flow);
        assert_eq!(first, second);
    }

    #[test]
    fn reason_strings_use_fixed_two_decimal_formatting() {
        let result = score(
            &MmiReading::observed(22.0),
            &calm_market(1.8),
            &FlowSnapshot::observed("04-Aug-2026", 3500.0, 0.0),
        );

        assert_eq!(result.reasons[0], "MMI: 22.00 (Extreme Fear)");
        assert_eq!(result.reasons[1], "Index: 1.80%");
        assert_eq!(result.reasons[2], "Volatility: 12.00 (0.00% change)");
        assert_eq!(result.reasons[3], "Foreign Net Flow: 3500.00 Cr");
    }
}
