//! HealthLog Extract: the `Extractor` seam, the deterministic fallback
//! extractor, domain routing and the multi-entity splitter.

pub mod extractor;
pub mod fallback;
pub mod markers;
pub mod router;
pub mod split;

pub use extractor::Extractor;
pub use fallback::FallbackExtractor;
pub use router::route_domain;
pub use split::{split, Entity};
