//! Trade candidate sources.
//!
//! Reading and writing the `ticker,buy_price` watchlist file, plus screening a
//! list of symbols against an external last-close price provider.

mod file;
mod source;

pub use file::{
    format_candidates, parse_candidates, read_candidates, write_candidates, BUY_PRICE_FIELD,
    TICKER_FIELD,
};
pub use source::{filter_by_close, PriceSource, StaticPriceSource};
