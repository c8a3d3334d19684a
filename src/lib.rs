//! A trie-based dictionary supporting exact match, bounded prefix match,
//! bounded optimal-string-alignment approximate match, and Aho-Corasick
//! substring search over three key alphabets (7-bit ASCII, full-byte
//! "extended ASCII", and opaque 32-bit tokens).
//!
//! See `DESIGN.md` in the repository root for how each piece here is
//! grounded, and the crate's `tests/` directory for end-to-end scenarios.

mod ahocorasick;
mod approx;
mod error;
mod mode;
mod node;
mod options;
mod trie;

pub use ahocorasick::{SubstringMatch, SubstringMatches};
pub use approx::{ApproxMatch, ApproxMatches};
pub use error::TrieError;
pub use mode::Mode;
pub use options::{TrieOptions, TrieOptionsBuilder};
pub use trie::{SearchResult, Trie};
