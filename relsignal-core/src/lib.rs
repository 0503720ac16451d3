//! relsignal core: relative-performance divergence signals.
//!
//! This crate contains the signal pipeline:
//! - Domain types (price points and series, crossover and signal events)
//! - Cumulative return and slope series
//! - Divergence crossover detection
//! - The latching BUY/SELL state machine and its two crossover policies
//! - The weekly threshold strategy
//! - Target/benchmark alignment and the price provider seam

pub mod crossover;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod weekly;

pub use crossover::{detect_crossovers, divergence};
pub use domain::{CrossDirection, CrossoverEvent, PricePoint, PriceSeries, SignalEvent, SignalKind};
pub use engine::{generate_signals, CrossoverPolicy, EngineConfig, SignalEngine};
pub use error::SignalError;
pub use indicators::{compute_returns, compute_slope, ReturnSeries, SlopeSeries};
