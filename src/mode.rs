/// Alphabet and insertion/search flavor a [`crate::Trie`] is fixed to at
/// creation time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// 7-bit ASCII: 128 code points, `0..128`.
    Ascii,
    /// "Extended" ASCII: the full byte range, `0..256`. Multi-byte
    /// encodings (e.g. UTF-8) are stored as opaque byte strings.
    EAscii,
    /// Sequences of 32-bit tokens, addressed by value rather than by byte.
    Token,
}

impl Mode {
    pub(crate) fn alphabet_size(self) -> usize {
        match self {
            Mode::Ascii => 128,
            Mode::EAscii => 256,
            Mode::Token => 0,
        }
    }

    pub(crate) fn is_byte_mode(self) -> bool {
        matches!(self, Mode::Ascii | Mode::EAscii)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Ascii => "ascii",
            Mode::EAscii => "eascii",
            Mode::Token => "token",
        };
        f.write_str(s)
    }
}
