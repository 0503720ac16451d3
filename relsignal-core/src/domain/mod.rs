//! Domain types for relsignal

pub mod price;
pub mod signal;

pub use price::{PricePoint, PriceSeries};
pub use signal::{CrossDirection, CrossoverEvent, SignalEvent, SignalKind};
