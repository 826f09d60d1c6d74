//! Text primitives shared by the policy model: wildcard strings, canonical
//! stringification and the compiled pattern cache.

pub mod cache;
pub mod stringify;
pub mod wildcard;

pub use stringify::{content_hash, string_hash, stringify};
pub use wildcard::WildcardString;
