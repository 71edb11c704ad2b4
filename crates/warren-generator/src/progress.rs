use crate::error::GeneratorError;
use crate::in_alphabet;

/// One character appended to a code.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The code after the append.
    pub code: String,
    /// `code.len() / target_len` after the append.
    pub progress: f64,
}

/// Generation state of a single short code.
///
/// The state is just the prefix generated so far, so a job interrupted at any
/// point can be rebuilt from its stored code with [`CodeProgress::resume`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeProgress {
    code: String,
    target_len: usize,
}

impl CodeProgress {
    /// Starts a code from scratch.
    pub fn new(target_len: usize) -> Result<Self, GeneratorError> {
        Self::resume("", target_len)
    }

    /// Continues a code from an already-generated prefix.
    pub fn resume(prefix: impl Into<String>, target_len: usize) -> Result<Self, GeneratorError> {
        if target_len == 0 {
            return Err(GeneratorError::ZeroLength);
        }

        let code = prefix.into();
        if let Some(bad) = code.chars().find(|c| !in_alphabet(*c)) {
            return Err(GeneratorError::InvalidCharacter(bad));
        }
        if code.len() > target_len {
            return Err(GeneratorError::PrefixTooLong {
                len: code.len(),
                target: target_len,
            });
        }

        Ok(Self { code, target_len })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Characters still to be generated.
    pub fn remaining(&self) -> usize {
        self.target_len - self.code.len()
    }

    pub fn is_finished(&self) -> bool {
        self.code.len() == self.target_len
    }

    pub fn progress(&self) -> f64 {
        self.code.len() as f64 / self.target_len as f64
    }

    /// Appends `c` and returns the new state.
    pub fn advance(&mut self, c: char) -> Result<Step, GeneratorError> {
        if self.is_finished() {
            return Err(GeneratorError::AlreadyFinished);
        }
        if !in_alphabet(c) {
            return Err(GeneratorError::InvalidCharacter(c));
        }

        self.code.push(c);
        Ok(Step {
            code: self.code.clone(),
            progress: self.progress(),
        })
    }

    /// Consumes the state, returning the code generated so far.
    pub fn into_code(self) -> String {
        self.code
    }
}
