use crate::mode::Mode;

/// Everything that can go wrong calling into a [`crate::Trie`].
///
/// Mirrors the error kinds spelled out for the `fsmtrie` family of
/// libraries this crate is patterned after: an uninitialized trie, an
/// invalid key, a mode/operation mismatch, or a missing precondition.
/// Allocation failure is not a variant here, see `DESIGN.md` for why.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum TrieError {
    #[error("uninitialized trie")]
    Uninitialized,

    #[error("invalid key: {reason}")]
    InvalidKey { reason: String },

    #[error("{operation}() is incompatible with {mode} mode trie")]
    ModeMismatch {
        operation: &'static str,
        mode: Mode,
    },

    #[error("missing precondition: {reason}")]
    MissingPrecondition { reason: String },
}

pub(crate) type Result<T> = std::result::Result<T, TrieError>;
