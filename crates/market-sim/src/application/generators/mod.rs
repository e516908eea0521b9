//! Synthetic market-data generators

mod exchange_book;
mod quote_generator;

pub use exchange_book::ExchangeBookGenerator;
pub use quote_generator::QuoteGenerator;
