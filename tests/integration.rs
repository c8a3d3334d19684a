//! End-to-end scenarios exercising the crate the way an application would:
//! build a trie, insert a handful of keys, then search it.

use triematch::{Mode, Trie, TrieOptionsBuilder};

/// The crate only logs through the `log` facade and bundles no subscriber;
/// `RUST_LOG=debug cargo test -- --nocapture` surfaces AC-compile logging
/// once this is wired in.
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ascii_trie(keys: &[&str], partial_match: bool, max_len: u32) -> Trie {
    init_logger();
    let opts = TrieOptionsBuilder::new()
        .mode(Mode::Ascii)
        .partial_match(partial_match)
        .max_len(max_len)
        .build();
    let mut t = Trie::new(opts).unwrap();
    for k in keys {
        t.insert_bytes(k.as_bytes(), Some((*k).to_string())).unwrap();
    }
    t
}

#[test]
fn ascii_exact_and_partial_match() {
    let mut t = ascii_trie(&["foo", "bar", "baz", "foobarbaz", "dogs"], true, 64);

    let found = t.search(b"foo").unwrap();
    assert!(found.is_found());
    assert_eq!(found.payload(), Some("foo"));

    let partial = t.search(b"fo").unwrap();
    assert!(partial.is_found());
    assert_eq!(partial.payload(), None);

    assert!(!t.search(b"cats").unwrap().is_found());

    let full = t.search(b"foobarbaz").unwrap();
    assert!(full.is_found());
    assert_eq!(full.payload(), Some("foobarbaz"));
}

#[test]
fn eascii_opaque_bytes() {
    let keys = ["ϜɑᚱՏᎥԌᎻᎢ", "rԱϺᎥ", "ѡіΝᛕᏞĚＮ"];
    let opts = TrieOptionsBuilder::new()
        .mode(Mode::EAscii)
        .partial_match(true)
        .build();
    let mut t = Trie::new(opts).unwrap();
    for k in &keys {
        t.insert_bytes(k.as_bytes(), Some((*k).to_string())).unwrap();
    }

    for k in &keys {
        let found = t.search(k.as_bytes()).unwrap();
        assert!(found.is_found());
        assert_eq!(found.payload(), Some(*k));
    }

    let prefix: String = keys[0].chars().take(3).collect();
    let partial = t.search(prefix.as_bytes()).unwrap();
    assert!(partial.is_found());
    assert_eq!(partial.payload(), None);
}

#[test]
fn approximate_search_within_bounded_distance() {
    let mut t = ascii_trie(
        &["foo", "farsightsecurity", "sigh", "fsi", "love", "dogs"],
        false,
        64,
    );

    let mut hits = Vec::new();
    t.search_approx(b"tarsightsecuritz", 2, |p, d| hits.push((p.to_string(), d)))
        .unwrap();
    assert_eq!(hits, vec![("farsightsecurity".to_string(), 2)]);

    let mut hits = Vec::new();
    t.search_approx(b"foobar", 3, |p, d| hits.push((p.to_string(), d)))
        .unwrap();
    assert!(hits.contains(&("foo".to_string(), 2)) || hits.contains(&("foo".to_string(), 3)));
}

#[test]
fn substring_search_emits_overlapping_matches() {
    let mut t = ascii_trie(&["sigh", "farsightsecurity", "love"], false, 64);

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

    let mut hits = Vec::new();
    t.search_substring(b"love", |p, off| hits.push((p.to_string(), off)))
        .unwrap();
    assert_eq!(hits, vec![("love".to_string(), 0)]);
}

#[test]
fn token_keys_round_trip() {
    let opts = TrieOptionsBuilder::new().mode(Mode::Token).build();
    let mut t = Trie::new(opts).unwrap();

    let keys: Vec<Vec<u32>> = (0..10u32)
        .map(|row| (0..10u32).map(|i| row * 100 + i).collect())
        .collect();

    for (i, key) in keys.iter().enumerate() {
        t.insert_token(key, Some(format!("t{}", i + 1))).unwrap();
    }

    for (i, key) in keys.iter().enumerate() {
        let found = t.search_token(key).unwrap();
        assert!(found.is_found());
        assert_eq!(found.payload(), Some(format!("t{}", i + 1)).as_deref());
    }

    let bumped: Vec<Vec<u32>> = keys
        .iter()
        .map(|key| {
            let mut k = key.clone();
            k[0] += 1;
            k
        })
        .collect();

    for key in &bumped {
        assert!(!t.search_token(key).unwrap().is_found());
    }
}

#[test]
fn max_length_boundary() {
    let opts = TrieOptionsBuilder::new().mode(Mode::Ascii).max_len(4).build();
    let mut t = Trie::new(opts).unwrap();

    assert!(t.insert_bytes(b"abcd", Some("abcd".to_string())).is_ok());
    assert!(t.insert_bytes(b"abcde", None).is_err());
    assert!(t.last_error().unwrap().contains("too long"));

    assert!(!t.search(b"abcde").unwrap().is_found());
}

#[test]
fn partial_match_recognizes_any_prefix_of_a_longer_key() {
    // max_len bounds insertion only; once "doggies" is in, every proper
    // prefix of it is a partial match regardless of max_len.
    let opts = TrieOptionsBuilder::new()
        .mode(Mode::Ascii)
        .max_len(16)
        .partial_match(true)
        .build();
    let mut t = Trie::new(opts).unwrap();
    t.insert_bytes(b"doggies", Some("doggies".to_string())).unwrap();

    for prefix in ["dog", "dogg", "doggie", "doggies"] {
        let found = t.search(prefix.as_bytes()).unwrap();
        assert!(found.is_found(), "{} should be found", prefix);
    }
    assert_eq!(t.search(b"doggie").unwrap().payload(), None);
    assert_eq!(t.search(b"doggies").unwrap().payload(), Some("doggies"));
}
