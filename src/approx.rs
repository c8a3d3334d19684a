//! Bounded optimal-string-alignment (OSA) approximate search.
//!
//! Walks the trie depth-first, carrying one sparse DP row per depth level
//! rather than per node: a row only ever holds the handful of `(key
//! index, distance)` pairs that are still within `max_dist`, and a row
//! with nothing left in bounds prunes that whole subtree.

use crate::error::{Result, TrieError};
use crate::node::{Arena, NodeId};
use crate::trie::Trie;

type Row = Vec<(u32, u32)>;

fn row_get(row: &Row, index: u32) -> Option<u32> {
    row.iter().find(|&&(i, _)| i == index).map(|&(_, v)| v)
}

/// One depth-first branch of the search. `rows[i]` is the DP row for the
/// `i` characters of the candidate matched so far; `rows[i + 1]` is
/// computed here and, if non-empty, handed down to the recursive call for
/// `child`. `prev_char` is the edge byte consumed to reach `node` (the
/// byte at depth `i - 1`), needed for the transposition test.
fn walk(
    arena: &Arena,
    node: NodeId,
    i: usize,
    prev_char: Option<u8>,
    key: &[u8],
    max_dist: u32,
    max_len: u32,
    rows: &mut Vec<Row>,
    on_match: &mut dyn FnMut(&str, u32),
) {
    let keylen = key.len() as u32;
    let cur_row = rows[i].clone();

    for (c_u32, child) in arena.get(node).children.iter() {
        let c = c_u32 as u8;
        let mut next_row: Row = Vec::new();
        if (i as u32) < max_dist {
            next_row.push((0, i as u32 + 1));
        }

        for j in 0..cur_row.len() {
            let (index, value) = cur_row[j];
            let cost = if key.get(index as usize).copied() == Some(c) {
                0
            } else {
                1
            };
            let mut dist = value + cost;

            // adjacent previous element already placed in the next row
            // (an insertion).
            if let Some(&(lindex, lvalue)) = next_row.last() {
                if lindex == index && lvalue + 1 < dist {
                    dist = lvalue + 1;
                }
            }

            // element directly above the next element in this row
            // (a deletion).
            if j + 1 < cur_row.len() {
                let (lindex, lvalue) = cur_row[j + 1];
                if lindex == index + 1 && lvalue + 1 < dist {
                    dist = lvalue + 1;
                }
            }

            // transposition of the two characters just consumed,
            // counted as a single edit from the row above the previous
            // one: `key[index-1] == c` (the new character) and
            // `key[index] == prev_char` (the one consumed just before
            // it) together mean swapping them lines the key back up.
            if i > 0 && index > 0 {
                if let Some(prev) = prev_char {
                    if key.get(index as usize).copied() == Some(prev)
                        && key.get(index as usize - 1).copied() == Some(c)
                    {
                        if let Some(lvalue) = row_get(&rows[i - 1], index - 1) {
                            if lvalue + cost < dist {
                                dist = lvalue + cost;
                            }
                        }
                    }
                }
            }

            if dist <= max_dist && index < keylen {
                next_row.push((index + 1, dist));
            }
        }

        if next_row.is_empty() {
            // Adding this character pushed every candidate past
            // max_dist; prune this subtree.
            continue;
        }

        if arena.get(child).leaf {
            if let Some(&(last_index, last_value)) = next_row.last() {
                if last_index == keylen {
                    if let Some(payload) = arena.get(child).payload.as_deref() {
                        on_match(payload, last_value);
                    }
                }
            }
        }

        if (i as u32) < max_len {
            rows[i + 1] = next_row;
            walk(arena, child, i + 1, Some(c), key, max_dist, max_len, rows, on_match);
        }
    }
}

fn seed_row(max_dist: u32, max_len: u32) -> Row {
    let mut row = Vec::new();
    for j in 0..=max_dist {
        if j >= max_len {
            break;
        }
        row.push((j, j));
    }
    row
}

/// An approximate match: the matched leaf's payload and its edit distance
/// from the query key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ApproxMatch<'t> {
    pub payload: &'t str,
    pub distance: u32,
}

impl Trie {
    fn check_approx_preconditions(&mut self, operation: &'static str, key: &[u8]) -> Result<()> {
        if !self.mode.is_byte_mode() {
            let err = TrieError::ModeMismatch {
                operation,
                mode: self.mode,
            };
            return Err(self.fail(err));
        }
        if self.max_len == 0 {
            let err = TrieError::MissingPrecondition {
                reason: format!("{}() requires the trie to be initialized with max_len", operation),
            };
            return Err(self.fail(err));
        }
        if key.is_empty() {
            let err = TrieError::InvalidKey {
                reason: "empty key".into(),
            };
            return Err(self.fail(err));
        }
        Ok(())
    }

    /// Invoke `on_match` once for every inserted key within `max_dist`
    /// optimal-string-alignment edits of `key`, in trie traversal
    /// (ascending byte) order. Requires a byte-mode trie constructed with
    /// a non-zero `max_len`.
    pub fn search_approx(
        &mut self,
        key: &[u8],
        max_dist: u32,
        mut on_match: impl FnMut(&str, u32),
    ) -> Result<()> {
        self.check_approx_preconditions("search_approx", key)?;

        let max_len = self.max_len;
        let mut rows: Vec<Row> = vec![Vec::new(); max_len as usize + 1];
        rows[0] = seed_row(max_dist, max_len);

        walk(
            &self.arena,
            NodeId::ROOT,
            0,
            None,
            key,
            max_dist,
            max_len,
            &mut rows,
            &mut on_match,
        );
        Ok(())
    }

    /// Pull-based equivalent of [`Trie::search_approx`]. The full match
    /// set is gathered up front, since the depth-first, row-reusing
    /// traversal that makes `search_approx` cheap doesn't admit a cheap
    /// step-at-a-time resumption, so this trades eagerness for a plain
    /// `Iterator`.
    pub fn approx_matches<'t>(
        &'t mut self,
        key: &[u8],
        max_dist: u32,
    ) -> Result<ApproxMatches<'t>> {
        self.check_approx_preconditions("approx_matches", key)?;

        let max_len = self.max_len;
        let mut rows: Vec<Row> = vec![Vec::new(); max_len as usize + 1];
        rows[0] = seed_row(max_dist, max_len);

        let arena: &'t Arena = &self.arena;
        let mut matches: Vec<(&'t str, u32)> = Vec::new();
        walk(
            arena,
            NodeId::ROOT,
            0,
            None,
            key,
            max_dist,
            max_len,
            &mut rows,
            &mut |p, d| matches.push((p, d)),
        );

        Ok(ApproxMatches {
            inner: matches.into_iter(),
        })
    }
}

/// Iterator over [`ApproxMatch`]es returned by [`Trie::approx_matches`].
pub struct ApproxMatches<'t> {
    inner: std::vec::IntoIter<(&'t str, u32)>,
}

impl<'t> Iterator for ApproxMatches<'t> {
    type Item = ApproxMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(payload, distance)| ApproxMatch { payload, distance })
    }
}
