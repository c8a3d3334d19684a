use crate::error::{Result, TrieError};
use crate::mode::Mode;
use crate::node::{Arena, NodeId};
use crate::options::TrieOptions;

/// Outcome of an exact/prefix search.
///
/// `Found` with `payload: None` is the "partial match" case: the query is
/// a non-empty proper prefix of some inserted key, `partial_match` is
/// enabled, but the query does not itself terminate at a leaf, so no
/// stored payload exists to return.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchResult {
    Found { payload: Option<String> },
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            SearchResult::Found { payload } => payload.as_deref(),
            SearchResult::NotFound => None,
        }
    }
}

/// A trie-based dictionary of keys, searchable by exact match, bounded
/// prefix, bounded optimal-string-alignment distance, and (for byte modes)
/// Aho-Corasick substring search.
///
/// See the crate docs for the overall design, and `DESIGN.md` in the
/// repository for how each piece is grounded.
pub struct Trie {
    pub(crate) arena: Arena,
    pub(crate) mode: Mode,
    pub(crate) max_len: u32,
    pub(crate) partial_match: bool,
    pub(crate) key_count: usize,
    pub(crate) ac_compiled: bool,
    last_error: Option<String>,
}

impl Trie {
    /// Create a new, empty trie. Fails only if `partial_match` is set on
    /// a `Mode::Token` trie, since the token alphabet has no notion of a
    /// "partial" key.
    pub fn new(options: TrieOptions) -> Result<Trie> {
        if options.mode == Mode::Token && options.partial_match {
            return Err(TrieError::ModeMismatch {
                operation: "partial_match",
                mode: Mode::Token,
            });
        }

        Ok(Trie {
            arena: Arena::new(options.mode),
            mode: options.mode,
            max_len: options.max_len,
            partial_match: options.partial_match,
            key_count: 0,
            ac_compiled: false,
            last_error: None,
        })
    }

    pub(crate) fn fail(&mut self, err: TrieError) -> TrieError {
        self.last_error = Some(err.to_string());
        err
    }

    /// The reason the most recent failing operation gave, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Number of trie nodes allocated beyond the root.
    pub fn node_count(&self) -> usize {
        self.arena.len() - 1
    }

    /// Number of distinct keys successfully inserted.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Whether Aho-Corasick failure links are currently up to date. Goes
    /// false on every insertion and true again on the next substring
    /// search.
    pub fn is_ac_compiled(&self) -> bool {
        self.ac_compiled
    }

    fn validate_byte_key(&self, key: &[u8]) -> std::result::Result<(), TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidKey {
                reason: "empty key".into(),
            });
        }
        if self.max_len > 0 && key.len() as u32 > self.max_len {
            return Err(TrieError::InvalidKey {
                reason: format!("key too long ({} > {})", key.len(), self.max_len),
            });
        }
        if self.mode == Mode::Ascii {
            for (i, &b) in key.iter().enumerate() {
                if b >= 128 {
                    return Err(TrieError::InvalidKey {
                        reason: format!("\"{}\" value at position {} out of range", b, i),
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert a byte-string key. Valid for `Mode::Ascii`/`Mode::EAscii`
    /// tries only. Duplicate insertion is a silent success that neither
    /// bumps `key_count` nor overwrites the first payload.
    pub fn insert_bytes(&mut self, key: &[u8], payload: Option<String>) -> Result<()> {
        if !self.mode.is_byte_mode() {
            let err = TrieError::ModeMismatch {
                operation: "insert_bytes",
                mode: self.mode,
            };
            return Err(self.fail(err));
        }

        if let Err(e) = self.validate_byte_key(key) {
            return Err(self.fail(e));
        }

        let mode = self.mode;
        let mut node = NodeId::ROOT;
        for &b in key {
            node = match self.arena.get(node).children.get_byte(b) {
                Some(next) => next,
                None => self.arena.insert_byte_child(node, b, mode),
            };
        }

        if self.arena.get(node).leaf {
            return Ok(());
        }

        let n = self.arena.get_mut(node);
        n.leaf = true;
        n.payload = payload;
        self.ac_compiled = false;
        self.key_count += 1;
        Ok(())
    }

    /// Insert a token-sequence key. Valid for `Mode::Token` tries only.
    pub fn insert_token(&mut self, key: &[u32], payload: Option<String>) -> Result<()> {
        if self.mode != Mode::Token {
            let err = TrieError::ModeMismatch {
                operation: "insert_token",
                mode: self.mode,
            };
            return Err(self.fail(err));
        }
        if key.is_empty() {
            let err = TrieError::InvalidKey {
                reason: "empty key".into(),
            };
            return Err(self.fail(err));
        }
        if self.max_len > 0 && key.len() as u32 > self.max_len {
            let err = TrieError::InvalidKey {
                reason: format!("token key too long ({} > {})", key.len(), self.max_len),
            };
            return Err(self.fail(err));
        }

        let mode = self.mode;
        let mut node = NodeId::ROOT;
        for &tok in key {
            node = match self.arena.get(node).children.get_token(tok) {
                Some(next) => next,
                None => self.arena.insert_token_child(node, tok, mode),
            };
        }

        if self.arena.get(node).leaf {
            return Ok(());
        }

        let n = self.arena.get_mut(node);
        n.leaf = true;
        n.payload = payload;
        self.ac_compiled = false;
        self.key_count += 1;
        Ok(())
    }

    /// Exact/bounded-prefix search for a byte-string key. Valid for
    /// `Mode::Ascii`/`Mode::EAscii` tries only.
    pub fn search(&mut self, key: &[u8]) -> Result<SearchResult> {
        if !self.mode.is_byte_mode() {
            let err = TrieError::ModeMismatch {
                operation: "search",
                mode: self.mode,
            };
            return Err(self.fail(err));
        }
        if key.is_empty() {
            let err = TrieError::InvalidKey {
                reason: "empty key".into(),
            };
            return Err(self.fail(err));
        }
        if self.mode == Mode::Ascii {
            for (i, &b) in key.iter().enumerate() {
                if b >= 128 {
                    let err = TrieError::InvalidKey {
                        reason: format!("key value \"{}\" out of range at position {}", b, i),
                    };
                    return Err(self.fail(err));
                }
            }
        }

        let mut node = NodeId::ROOT;
        for &b in key {
            match self.arena.get(node).children.get_byte(b) {
                Some(next) => node = next,
                None => return Ok(SearchResult::NotFound),
            }
        }

        let n = self.arena.get(node);
        if self.partial_match || n.leaf {
            let payload = if n.leaf {
                n.payload.clone()
            } else {
                None
            };
            Ok(SearchResult::Found { payload })
        } else {
            Ok(SearchResult::NotFound)
        }
    }

    /// Exact search for a token-sequence key. Valid for `Mode::Token`
    /// tries only. Token tries never support partial matching.
    pub fn search_token(&mut self, key: &[u32]) -> Result<SearchResult> {
        if self.mode != Mode::Token {
            let err = TrieError::ModeMismatch {
                operation: "search_token",
                mode: self.mode,
            };
            return Err(self.fail(err));
        }
        if key.is_empty() {
            let err = TrieError::InvalidKey {
                reason: "empty key".into(),
            };
            return Err(self.fail(err));
        }

        let mut node = NodeId::ROOT;
        for &tok in key {
            match self.arena.get(node).children.get_token(tok) {
                Some(next) => node = next,
                None => return Ok(SearchResult::NotFound),
            }
        }

        let n = self.arena.get(node);
        if n.leaf {
            Ok(SearchResult::Found {
                payload: n.payload.clone(),
            })
        } else {
            Ok(SearchResult::NotFound)
        }
    }

    /// Render every inserted leaf's payload, depth-first, one per line.
    /// A debug-dump convenience, favoring a simple, predictable rendering
    /// over any particular tool's exact text format.
    pub fn print_leaves(&self) -> String {
        let mut out = String::new();
        self.print_leaves_rec(NodeId::ROOT, &mut out);
        out
    }

    fn print_leaves_rec(&self, id: NodeId, out: &mut String) {
        let node = self.arena.get(id);
        if node.leaf {
            match (&node.payload, self.mode) {
                (Some(p), Mode::Token) => {
                    out.push_str(&format!("{} = [{}]\n", node.tval, p))
                }
                (Some(p), _) => out.push_str(&format!("{}\n", p)),
                (None, Mode::Token) => out.push_str(&format!("{}\n", node.tval)),
                (None, _) => {}
            }
        }
        for (_, child) in node.children.iter() {
            self.print_leaves_rec(child, out);
        }
    }
}
