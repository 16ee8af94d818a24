//! Per-call correlation identifiers
//!
//! A [`CallId`] pairs the enter and exit lines of one call when other calls
//! interleave with it. Tokens are short and random; they are practically
//! unique within a readable log stream, not globally unique.

use std::fmt;

use rand::Rng;

/// Default token length (64^6 ≈ 6.9e10 combinations)
pub const ID_LEN: usize = 6;

/// Default token alphabet
pub const ID_CHARS: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Short opaque token identifying one in-flight call
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CallId(Box<str>);

impl CallId {
    /// Fresh token using the default length and alphabet
    pub fn generate() -> Self {
        Self::generate_with(ID_LEN, ID_CHARS)
    }

    /// Fresh token drawn from `alphabet`.
    ///
    /// `alphabet` must be non-empty ASCII.
    pub fn generate_with(len: usize, alphabet: &[u8]) -> Self {
        debug_assert!(!alphabet.is_empty() && alphabet.is_ascii());

        let mut rng = rand::rng();
        let token: String = (0..len)
            .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
            .collect();
        Self(token.into_boxed_str())
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}
