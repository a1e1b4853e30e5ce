pub mod analyzer;
pub mod pnl;
pub mod winrate;

pub use analyzer::TradeAnalyzer;
pub use pnl::{calculate_pnl_by_coin, closing_events, total_realized_pnl, validate_trades, Position};
pub use winrate::{calculate_winrate, summarize_closing_events, win_rate_pct};
