//! Entity normalization and cross-source matching.
//!
//! Sources disagree on how they spell the same product ("Coffee Gator" vs
//! "Coffee Gator Canister"). [`EntityNormalizer`] builds comparison keys and an
//! [`EntityMatcher`] decides when two keys name the same entity.

pub mod matcher;
pub mod normalizer;

pub use matcher::{EntityMatcher, LexicalMatcher, MatchStrategy, NormalizedEqualityMatcher};
pub use normalizer::{DEFAULT_STOP_WORDS, EntityNormalizer};
