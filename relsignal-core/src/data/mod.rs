//! Price data plumbing: alignment and the provider seam.

pub mod align;
pub mod provider;

pub use align::{align_pair, AlignedPair};
pub use provider::{DataError, PriceProvider, StaticProvider};
