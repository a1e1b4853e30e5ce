use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use super::pnl::closing_events;
use crate::errors::AnalysisError;
use crate::models::{ClosingEvent, TradeRecord, WinRateSummary};

/// Win-rate statistics for a trade history.
pub fn calculate_winrate(trades: &[TradeRecord]) -> Result<WinRateSummary, AnalysisError> {
    let events = closing_events(trades)?;
    Ok(summarize_closing_events(&events))
}

/// Classify each closing event (win iff realized PnL > 0) and aggregate.
pub fn summarize_closing_events(events: &[ClosingEvent]) -> WinRateSummary {
    if events.is_empty() {
        return WinRateSummary::empty();
    }

    // coin -> (wins, total)
    let mut per_coin: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    let mut winning_trades = 0u32;
    let mut losing_trades = 0u32;

    for event in events {
        let tally = per_coin.entry(event.coin.as_str()).or_default();
        tally.1 += 1;
        if event.is_win() {
            tally.0 += 1;
            winning_trades += 1;
        } else {
            losing_trades += 1;
        }
    }

    let total_trades = winning_trades + losing_trades;
    let win_rates_by_coin = per_coin
        .into_iter()
        .map(|(coin, (wins, total))| (coin.to_string(), win_rate_pct(wins, total)))
        .collect();

    WinRateSummary {
        overall_win_rate: win_rate_pct(winning_trades, total_trades),
        total_trades,
        winning_trades,
        losing_trades,
        win_rates_by_coin,
    }
}

/// `wins / total * 100`, one decimal place. Zero when there is nothing to rate.
pub fn win_rate_pct(wins: u32, total: u32) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(wins) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal_macros::dec;

    fn make_trade(coin: &str, side: Side, amount: Decimal, price: Decimal, secs: i64) -> TradeRecord {
        TradeRecord {
            address: "0xtest".into(),
            coin: coin.into(),
            side,
            amount,
            price,
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
                + Duration::seconds(secs),
            tid: None,
            hash: None,
        }
    }

    #[test]
    fn test_win_rate_pct_rounding() {
        assert_eq!(win_rate_pct(2, 3), dec!(66.7));
        assert_eq!(win_rate_pct(1, 3), dec!(33.3));
        assert_eq!(win_rate_pct(1, 8), dec!(12.5));
        assert_eq!(win_rate_pct(1, 16), dec!(6.3));
        assert_eq!(win_rate_pct(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_empty_history() {
        let summary = calculate_winrate(&[]).unwrap();
        assert_eq!(summary, WinRateSummary::empty());
        assert_eq!(summary.overall_win_rate, Decimal::ZERO);
        assert!(summary.win_rates_by_coin.is_empty());
    }

    #[test]
    fn test_single_winning_round_trip() {
        let trades = vec![
            make_trade("BTC", Side::Buy, dec!(1), dec!(10000), 0),
            make_trade("BTC", Side::Sell, dec!(1), dec!(12000), 1),
        ];

        let summary = calculate_winrate(&trades).unwrap();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.losing_trades, 0);
        assert_eq!(summary.overall_win_rate, dec!(100.0));
        assert_eq!(summary.win_rates_by_coin["BTC"], dec!(100.0));
    }

    #[test]
    fn test_two_losing_sells() {
        let trades = vec![
            make_trade("ETH", Side::Buy, dec!(2), dec!(100), 0),
            make_trade("ETH", Side::Sell, dec!(1), dec!(90), 1),
            make_trade("ETH", Side::Sell, dec!(1), dec!(80), 2),
        ];

        let summary = calculate_winrate(&trades).unwrap();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.losing_trades, 2);
        assert_eq!(summary.overall_win_rate, dec!(0.0));
        assert_eq!(summary.win_rates_by_coin["ETH"], Decimal::ZERO);
    }

    #[test]
    fn test_mixed_coins() {
        let trades = vec![
            make_trade("BTC", Side::Buy, dec!(1), dec!(100), 0),
            make_trade("BTC", Side::Sell, dec!(1), dec!(150), 1),
            make_trade("ETH", Side::Buy, dec!(2), dec!(10), 2),
            make_trade("ETH", Side::Sell, dec!(1), dec!(8), 3),
            make_trade("ETH", Side::Sell, dec!(1), dec!(12), 4),
        ];

        let summary = calculate_winrate(&trades).unwrap();
        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.winning_trades, 2);
        assert_eq!(summary.losing_trades, 1);
        assert_eq!(summary.overall_win_rate, dec!(66.7));
        assert_eq!(summary.win_rates_by_coin["BTC"], dec!(100.0));
        assert_eq!(summary.win_rates_by_coin["ETH"], dec!(50.0));
    }

    #[test]
    fn test_break_even_counts_as_loss() {
        let trades = vec![
            make_trade("BTC", Side::Buy, dec!(1), dec!(100), 0),
            make_trade("BTC", Side::Sell, dec!(1), dec!(100), 1),
        ];

        let summary = calculate_winrate(&trades).unwrap();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 0);
        assert_eq!(summary.losing_trades, 1);
    }

    #[test]
    fn test_coins_without_closes_are_omitted() {
        let trades = vec![
            make_trade("BTC", Side::Buy, dec!(1), dec!(100), 0),
            make_trade("BTC", Side::Sell, dec!(1), dec!(110), 1),
            make_trade("DOGE", Side::Buy, dec!(100), dec!(0.1), 2),
        ];

        let summary = calculate_winrate(&trades).unwrap();
        assert!(summary.win_rates_by_coin.contains_key("BTC"));
        assert!(!summary.win_rates_by_coin.contains_key("DOGE"));
    }

    #[test]
    fn test_wins_plus_losses_equals_total() {
        let mut trades = Vec::new();
        for i in 0..20 {
            let price = if i % 3 == 0 { dec!(90) } else { dec!(110) };
            trades.push(make_trade("BTC", Side::Buy, dec!(1), dec!(100), i * 2));
            trades.push(make_trade("BTC", Side::Sell, dec!(1), price, i * 2 + 1));
        }

        let summary = calculate_winrate(&trades).unwrap();
        assert_eq!(summary.total_trades, 20);
        assert_eq!(summary.winning_trades + summary.losing_trades, summary.total_trades);
        assert_eq!(summary.losing_trades, 7);
    }

    #[test]
    fn test_invalid_record_propagates() {
        let trades = vec![make_trade("BTC", Side::Buy, dec!(-1), dec!(100), 0)];
        assert!(calculate_winrate(&trades).is_err());
    }
}
