//! Aho-Corasick failure-link compilation and streaming substring search.
//!
//! Compilation is a breadth-first traversal that, for every node, finds
//! the longest proper suffix of its path that is itself present in the
//! trie and records it as a failure link, propagating an "output" bit up
//! from any leaf reachable via that chain. Matching then walks the
//! subject once, following failure links whenever the current node has
//! no transition for the next byte, and (whenever a node's output bit is
//! set) walks its own failure chain emitting every leaf found along it.

use std::collections::VecDeque;

use crate::error::{Result, TrieError};
use crate::node::{Arena, NodeId};
use crate::trie::Trie;

fn byte_child(arena: &Arena, node: NodeId, sym: u32) -> Option<NodeId> {
    arena.get(node).children.get_byte(sym as u8)
}

/// Follow `node`'s transition on `b`, falling back through failure links
/// (and ultimately to the root).
fn step(arena: &Arena, mut node: NodeId, b: u8) -> NodeId {
    loop {
        if let Some(next) = arena.get(node).children.get_byte(b) {
            return next;
        }
        match arena.get(node).fail {
            Some(f) => node = f,
            None => return NodeId::ROOT,
        }
    }
}

/// A substring match: the leaf payload found and the zero-based offset in
/// the subject at which it begins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubstringMatch<'t> {
    pub payload: &'t str,
    pub start: usize,
}

impl Trie {
    fn compile_ac(&mut self) {
        log::debug!(
            "compiling Aho-Corasick metadata ({} nodes)",
            self.arena.len()
        );

        let root = NodeId::ROOT;
        self.arena.get_mut(root).fail = None;

        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let root_children: Vec<(u32, NodeId)> = self.arena.get(root).children.iter().collect();
        for (_, child) in root_children {
            self.arena.get_mut(child).fail = Some(root);
            let leaf = self.arena.get(child).leaf;
            self.arena.get_mut(child).output = leaf;
            queue.push_back(child);
        }

        while let Some(n) = queue.pop_front() {
            let children: Vec<(u32, NodeId)> = self.arena.get(n).children.iter().collect();
            for (sym, child) in children {
                queue.push_back(child);

                let mut f = self.arena.get(n).fail;
                let suffix = loop {
                    match f {
                        None => break root,
                        Some(fid) => match byte_child(&self.arena, fid, sym) {
                            Some(c) => break c,
                            None => f = self.arena.get(fid).fail,
                        },
                    }
                };

                self.arena.get_mut(child).fail = Some(suffix);
                let leaf = self.arena.get(child).leaf;
                let suffix_output = self.arena.get(suffix).output;
                self.arena.get_mut(child).output = leaf || suffix_output;
            }
        }

        self.ac_compiled = true;
    }

    fn ensure_ac_compiled(&mut self, operation: &'static str) -> Result<()> {
        if !self.mode().is_byte_mode() {
            let err = TrieError::ModeMismatch {
                operation,
                mode: self.mode(),
            };
            return Err(self.fail(err));
        }
        if !self.ac_compiled {
            self.compile_ac();
        }
        Ok(())
    }

    /// Stream `subject`, invoking `on_match` once for every `(inserted
    /// key, starting offset)` occurrence, longest match first at a given
    /// position, strictly increasing position order across the subject.
    ///
    /// Disallowed on `Mode::Token` tries. Triggers a one-time Aho-Corasick
    /// compile on first use after any insertion.
    pub fn search_substring(
        &mut self,
        subject: &[u8],
        mut on_match: impl FnMut(&str, usize),
    ) -> Result<()> {
        self.ensure_ac_compiled("search_substring")?;

        let mut node = NodeId::ROOT;
        for (i, &b) in subject.iter().enumerate() {
            node = step(&self.arena, node, b);
            if self.arena.get(node).output {
                let mut n = Some(node);
                while let Some(nid) = n {
                    let nref = self.arena.get(nid);
                    if nref.leaf {
                        if let Some(payload) = nref.payload.as_deref() {
                            let start = (i + 1) - nref.depth as usize;
                            on_match(payload, start);
                        }
                    }
                    n = nref.fail;
                }
            }
        }
        Ok(())
    }

    /// Pull-based equivalent of [`Trie::search_substring`].
    pub fn substring_matches<'t, 's>(
        &'t mut self,
        subject: &'s [u8],
    ) -> Result<SubstringMatches<'t, 's>> {
        self.ensure_ac_compiled("substring_matches")?;
        Ok(SubstringMatches {
            trie: self,
            subject,
            pos: 0,
            node: NodeId::ROOT,
            pending: VecDeque::new(),
        })
    }
}

/// Streaming iterator over [`SubstringMatch`]es, mirroring
/// [`Trie::search_substring`]'s emission order.
pub struct SubstringMatches<'t, 's> {
    trie: &'t Trie,
    subject: &'s [u8],
    pos: usize,
    node: NodeId,
    pending: VecDeque<(&'t str, usize)>,
}

impl<'t, 's> Iterator for SubstringMatches<'t, 's> {
    type Item = SubstringMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((payload, start)) = self.pending.pop_front() {
                return Some(SubstringMatch { payload, start });
            }
            if self.pos >= self.subject.len() {
                return None;
            }
            let b = self.subject[self.pos];
            self.node = step(&self.trie.arena, self.node, b);
            self.pos += 1;

            if self.trie.arena.get(self.node).output {
                let mut n = Some(self.node);
                while let Some(nid) = n {
                    let nref = self.trie.arena.get(nid);
                    if nref.leaf {
                        if let Some(payload) = nref.payload.as_deref() {
                            let start = self.pos - nref.depth as usize;
                            self.pending.push_back((payload, start));
                        }
                    }
                    n = nref.fail;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use crate::options::TrieOptionsBuilder;

    fn build(keys: &[&str]) -> Trie {
        let opts = TrieOptionsBuilder::new()
            .mode(Mode::Ascii)
            .max_len(64)
            .build();
        let mut t = Trie::new(opts).unwrap();
        for k in keys {
            t.insert_bytes(k.as_bytes(), Some((*k).to_string()))
                .unwrap();
        }
        t
    }

    #[test]
    fn emits_longest_and_shortest_at_overlap() {
        let mut t = build(&["sigh", "farsightsecurity", "love"]);
        let mut hits = Vec::new();
        t.search_substring(b"farsightsecurity", |p, off| hits.push((p.to_string(), off)))
            .unwrap();
        assert_eq!(
            hits,
            vec![
                ("farsightsecurity".to_string(), 0),
                ("sigh".to_string(), 3),
            ]
        );
    }

    #[test]
    fn simple_single_match() {
        let mut t = build(&["sigh", "farsightsecurity", "love"]);
        let mut hits = Vec::new();
        t.search_substring(b"love", |p, off| hits.push((p.to_string(), off)))
            .unwrap();
        assert_eq!(hits, vec![("love".to_string(), 0)]);
    }

    #[test]
    fn token_mode_rejected() {
        let opts = TrieOptionsBuilder::new().mode(Mode::Token).build();
        let mut t = Trie::new(opts).unwrap();
        t.insert_token(&[1, 2, 3], None).unwrap();
        assert!(t.search_substring(b"abc", |_, _| {}).is_err());
    }

    #[test]
    fn iterator_matches_callback_order() {
        let mut t = build(&["sigh", "farsightsecurity", "love"]);
        let via_iter: Vec<_> = t
            .substring_matches(b"farsightsecurity")
            .unwrap()
            .map(|m| (m.payload.to_string(), m.start))
            .collect();
        assert_eq!(
            via_iter,
            vec![
                ("farsightsecurity".to_string(), 0),
                ("sigh".to_string(), 3),
            ]
        );
    }
}
