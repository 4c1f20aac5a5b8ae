//! Random printable payloads for load traffic.
//!
//! Payloads are drawn from a fixed 62-symbol alphabet (`A-Z`, `a-z`, `0-9`),
//! each character independently and uniformly with replacement.
//!
//! ## Example
//!
//! ```rust
//! use echoload::payload::{PayloadGenerator, SeededEntropy};
//!
//! let mut generator = PayloadGenerator::new(SeededEntropy::new(7));
//! let payload = generator.generate(32).unwrap();
//! assert_eq!(payload.len(), 32);
//! ```

mod entropy;

pub use entropy::{EntropySource, OsEntropy, SeededEntropy};

use crate::error::{Error, Result};

/// Symbols a payload is drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Bytes at or above this value are discarded so `byte % 62` stays uniform.
const REJECT_THRESHOLD: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Random bytes requested from the source per refill.
const CHUNK_SIZE: usize = 256;

/// A validated, non-negative payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PayloadSize(usize);

impl PayloadSize {
    /// Wrap a length.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self(size)
    }

    /// Get the length in characters.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for PayloadSize {
    fn from(size: usize) -> Self {
        Self(size)
    }
}

impl TryFrom<i64> for PayloadSize {
    type Error = Error;

    fn try_from(size: i64) -> Result<Self> {
        usize::try_from(size)
            .map(Self)
            .map_err(|_| Error::InvalidArgument(format!("payload size must be >= 0, got {size}")))
    }
}

/// Check whether `c` belongs to the payload alphabet.
#[must_use]
#[inline]
pub const fn is_alphabet_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Generates random payload strings from an injected entropy source.
#[derive(Debug, Clone)]
pub struct PayloadGenerator<E = OsEntropy> {
    entropy: E,
}

impl Default for PayloadGenerator<OsEntropy> {
    fn default() -> Self {
        Self::new(OsEntropy)
    }
}

impl<E: EntropySource> PayloadGenerator<E> {
    /// Create a generator over `entropy`.
    pub fn new(entropy: E) -> Self {
        Self { entropy }
    }

    /// Get mutable access to the entropy source.
    pub fn entropy_mut(&mut self) -> &mut E {
        &mut self.entropy
    }

    /// Generate a payload of exactly `size` characters.
    ///
    /// `size == 0` yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if the source fails.
    pub fn generate(&mut self, size: usize) -> Result<String> {
        let mut out = String::with_capacity(size);
        let mut chunk = [0u8; CHUNK_SIZE];

        while out.len() < size {
            // Never request more than the remaining length, so accepted bytes
            // cannot overshoot `size`.
            let want = (size - out.len()).min(CHUNK_SIZE);
            let buf = &mut chunk[..want];
            self.entropy.fill(buf)?;

            for &byte in buf.iter() {
                if byte < REJECT_THRESHOLD {
                    out.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
                }
            }
        }

        Ok(out)
    }

    /// Generate a payload from a signed length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size` is negative, or
    /// [`Error::Entropy`] if the source fails.
    pub fn generate_signed(&mut self, size: i64) -> Result<String> {
        let size = PayloadSize::try_from(size)?;
        self.generate(size.get())
    }
}
