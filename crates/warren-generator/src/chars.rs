use crate::{CharSource, ALPHABET};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Draws each character uniformly at random from [`ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChars;

impl CharSource for RandomChars {
    fn next_char(&self) -> char {
        let alphabet = ALPHABET.as_bytes();
        let index = rand::thread_rng().gen_range(0..alphabet.len());
        alphabet[index] as char
    }
}

/// A deterministic source cycling through a fixed character sequence.
///
/// Useful in tests where the generated code must be known up front.
#[derive(Debug)]
pub struct SequenceChars {
    chars: Vec<char>,
    cursor: AtomicUsize,
}

impl SequenceChars {
    /// Creates a source that yields the characters of `sequence` in order,
    /// wrapping around at the end. An empty sequence falls back to `ALPHABET`.
    pub fn new(sequence: &str) -> Self {
        let chars: Vec<char> = if sequence.is_empty() {
            ALPHABET.chars().collect()
        } else {
            sequence.chars().collect()
        };
        Self {
            chars,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl CharSource for SequenceChars {
    fn next_char(&self) -> char {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.chars[index % self.chars.len()]
    }
}
