//! Resumable, paced short-code generation.
//!
//! A short code is produced one character at a time. [`CodeProgress`] is the
//! state machine tracking how far a code has come, a [`CharSource`] supplies
//! the next character and a [`Pacer`] spaces the characters out in time.

pub mod chars;
pub mod error;
pub mod pacer;
pub mod progress;

pub use chars::{RandomChars, SequenceChars};
pub use error::GeneratorError;
pub use pacer::{FixedDelay, NoDelay, Pacer};
pub use progress::{CodeProgress, Step};

/// Characters a generated short code is drawn from.
pub const ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a finished short code.
pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Trait for producing short-code characters.
///
/// Implementations are pure sources that don't interact with storage, and
/// must only return characters from [`ALPHABET`].
pub trait CharSource: Send + Sync + 'static {
    /// Returns the next character to append to a code.
    fn next_char(&self) -> char;
}

pub(crate) fn in_alphabet(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase()
}
