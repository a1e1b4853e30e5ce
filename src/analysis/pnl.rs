use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::errors::AnalysisError;
use crate::models::{ClosingEvent, PnlRecord, Side, TradeRecord};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject the whole history if any record breaks the trade invariants.
pub fn validate_trades(trades: &[TradeRecord]) -> Result<(), AnalysisError> {
    for (index, trade) in trades.iter().enumerate() {
        let reason = if trade.coin.trim().is_empty() {
            Some("missing coin".to_string())
        } else if trade.amount <= Decimal::ZERO {
            Some(format!("non-positive amount {}", trade.amount))
        } else if trade.price < Decimal::ZERO {
            Some(format!("negative price {}", trade.price))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(AnalysisError::InvalidTradeRecord { index, reason });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Position: average-cost ledger for one coin
// ---------------------------------------------------------------------------

/// Open quantity (positive long, negative short) and its average entry price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

/// What a single trade did to a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub matched: Decimal,
    pub realized_pnl: Decimal,
}

impl Position {
    /// Apply one trade. Quantity moving against the open side is matched at the
    /// average cost and realizes PnL; any excess flips the position at `price`.
    ///
    /// Returns `None` if the arithmetic overflows `Decimal`. The position is
    /// left untouched in that case.
    pub fn apply(&mut self, side: Side, amount: Decimal, price: Decimal) -> Option<PositionChange> {
        let signed = match side {
            Side::Buy => amount,
            Side::Sell => -amount,
        };

        let same_direction = self.quantity.is_zero()
            || self.quantity.is_sign_positive() == signed.is_sign_positive();

        if same_direction {
            let open = self.quantity.abs();
            let cost = open
                .checked_mul(self.average_cost)?
                .checked_add(amount.checked_mul(price)?)?;
            // open + amount > 0 because amount > 0
            let average_cost = cost.checked_div(open.checked_add(amount)?)?;
            let quantity = self.quantity.checked_add(signed)?;

            self.average_cost = average_cost;
            self.quantity = quantity;
            return Some(PositionChange {
                matched: Decimal::ZERO,
                realized_pnl: Decimal::ZERO,
            });
        }

        let matched = amount.min(self.quantity.abs());
        let edge = if self.quantity.is_sign_positive() {
            price.checked_sub(self.average_cost)?
        } else {
            self.average_cost.checked_sub(price)?
        };
        let realized_pnl = matched.checked_mul(edge)?;

        // matched <= amount and matched <= |quantity|, so neither step can overflow
        let excess = amount - matched;
        if excess.is_zero() {
            self.quantity += signed;
            if self.quantity.is_zero() {
                self.average_cost = Decimal::ZERO;
            }
        } else {
            self.quantity = match side {
                Side::Buy => excess,
                Side::Sell => -excess,
            };
            self.average_cost = price;
        }

        Some(PositionChange {
            matched,
            realized_pnl,
        })
    }
}

// ---------------------------------------------------------------------------
// Per-coin fold
// ---------------------------------------------------------------------------

struct CoinLedger {
    position: Position,
    record: PnlRecord,
    closings: Vec<ClosingEvent>,
}

impl CoinLedger {
    fn new(coin: &str) -> Self {
        Self {
            position: Position::default(),
            record: PnlRecord {
                coin: coin.to_string(),
                realized_pnl: Decimal::ZERO,
                closed_trade_count: 0,
                trade_count: 0,
                open_quantity: Decimal::ZERO,
                average_cost: Decimal::ZERO,
            },
            closings: Vec::new(),
        }
    }

    /// `index` is the trade's position in the caller's input, for error reporting.
    fn apply(&mut self, index: usize, trade: &TradeRecord) -> Result<(), AnalysisError> {
        let overflow = || AnalysisError::InvalidTradeRecord {
            index,
            reason: "arithmetic overflow".to_string(),
        };

        let change = self
            .position
            .apply(trade.side, trade.amount, trade.price)
            .ok_or_else(overflow)?;
        let realized_pnl = self
            .record
            .realized_pnl
            .checked_add(change.realized_pnl)
            .ok_or_else(overflow)?;

        self.record.trade_count += 1;
        self.record.open_quantity = self.position.quantity;
        self.record.average_cost = self.position.average_cost;

        if change.matched > Decimal::ZERO {
            self.record.realized_pnl = realized_pnl;
            self.record.closed_trade_count += 1;
            self.closings.push(ClosingEvent {
                coin: trade.coin.clone(),
                timestamp: trade.timestamp,
                matched_quantity: change.matched,
                realized_pnl: change.realized_pnl,
            });
        }
        Ok(())
    }
}

/// Validate, order by time then exchange trade id, and fold per coin.
/// The sort is stable, so ties without a `tid` keep arrival order.
fn fold_by_coin(trades: &[TradeRecord]) -> Result<BTreeMap<String, CoinLedger>, AnalysisError> {
    validate_trades(trades)?;

    let mut ordered: Vec<(usize, &TradeRecord)> = trades.iter().enumerate().collect();
    ordered.sort_by_key(|(_, t)| t.replay_key());

    let mut ledgers: BTreeMap<String, CoinLedger> = BTreeMap::new();
    for (index, trade) in ordered {
        ledgers
            .entry(trade.coin.clone())
            .or_insert_with(|| CoinLedger::new(&trade.coin))
            .apply(index, trade)?;
    }

    Ok(ledgers)
}

/// Realized PnL per coin using average-cost matching.
///
/// Every coin present in `trades` appears in the result, even when nothing
/// was closed.
pub fn calculate_pnl_by_coin(
    trades: &[TradeRecord],
) -> Result<BTreeMap<String, PnlRecord>, AnalysisError> {
    let ledgers = fold_by_coin(trades)?;
    Ok(ledgers
        .into_iter()
        .map(|(coin, ledger)| (coin, ledger.record))
        .collect())
}

/// Every trade that reduced an open position, grouped by coin in key order
/// and chronological within a coin.
pub fn closing_events(trades: &[TradeRecord]) -> Result<Vec<ClosingEvent>, AnalysisError> {
    let ledgers = fold_by_coin(trades)?;
    Ok(ledgers
        .into_values()
        .flat_map(|ledger| ledger.closings)
        .collect())
}

/// Sum of realized PnL over all coins.
pub fn total_realized_pnl(pnl: &BTreeMap<String, PnlRecord>) -> Result<Decimal, AnalysisError> {
    pnl.values().try_fold(Decimal::ZERO, |total, record| {
        total
            .checked_add(record.realized_pnl)
            .ok_or_else(|| AnalysisError::Overflow(format!("total realized PnL at {}", record.coin)))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
