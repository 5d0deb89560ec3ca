//! Core domain types and logic.

pub mod ohlcv;
pub mod grammar;
pub mod number;
pub mod row_shape;
pub mod date_order;
pub mod price_order;
pub mod inference;
pub mod row_parser;
pub mod indicator;
pub mod registry;
pub mod admission;
pub mod error;
