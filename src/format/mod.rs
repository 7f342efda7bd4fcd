//! Locale-aware display formatting shared across the UI.

pub mod currency;

pub use currency::{format_currency, CurrencyFormat, NOK};
